//! Coordination tree abstractions.
//!
//! The coordination tree is a hierarchy of nodes addressed by `/` separated paths, each holding
//! an opaque byte payload. A node may only be created when its parent exists. The root `/` always
//! exists.
//!
//! This crate only depends upon the small set of primitives declared by `TreeClient`. All higher
//! level write behavior lives in the `writer` module.

pub mod database;
pub mod memory;
pub mod writer;
#[cfg(test)]
mod writer_test;

use async_trait::async_trait;

use crate::error::TreeResult;

pub use database::SledTree;
pub use memory::MemoryTree;
pub use writer::TreeWriter;

/// The width of the zero padded sequence suffix of sequential nodes.
pub const SEQUENCE_WIDTH: usize = 10;

/// The mode used when creating a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateMode {
    /// A node which exists until explicitly removed.
    Persistent,
    /// A persistent node whose name is suffixed with a monotonically increasing sequence number
    /// assigned by the tree.
    PersistentSequential,
}

/// The capabilities required of a coordination tree client.
///
/// Implementations must report a missing node, or a missing parent on create, as
/// `TreeError::NoNode`, and an already existing node on create as `TreeError::NodeExists`.
#[async_trait]
pub trait TreeClient: Send + Sync + 'static {
    /// Get the payload of the node at the given path.
    async fn get_data(&self, path: &str) -> TreeResult<Vec<u8>>;

    /// Overwrite the payload of the existing node at the given path.
    async fn set_data(&self, path: &str, data: &[u8]) -> TreeResult<()>;

    /// Create a node at the given path, returning the path of the created node.
    ///
    /// For sequential nodes the returned path includes the assigned sequence suffix.
    async fn create(&self, path: &str, data: &[u8], mode: CreateMode) -> TreeResult<String>;

    /// Check if a node exists at the given path.
    async fn exists(&self, path: &str) -> TreeResult<bool>;

    /// Get the names of the direct children of the node at the given path.
    async fn get_children(&self, path: &str) -> TreeResult<Vec<String>>;
}

/// Get the parent path of the given path, or `None` if the parent is the root.
pub fn parent_path(path: &str) -> Option<&str> {
    match path.rfind('/') {
        Some(idx) if idx > 0 => Some(&path[..idx]),
        _ => None,
    }
}

/// Join the given parent path & child name.
pub fn child_path(parent: &str, child: &str) -> String {
    if parent == "/" {
        format!("/{}", child)
    } else {
        format!("{}/{}", parent, child)
    }
}

/// Build the path of a sequential node from its prefix & assigned sequence number.
pub fn sequential_path(prefix: &str, seq: u64) -> String {
    format!("{}{:0width$}", prefix, seq, width = SEQUENCE_WIDTH)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn path_helpers() {
        assert_eq!(parent_path("/a/b/c"), Some("/a/b"));
        assert_eq!(parent_path("/a"), None);
        assert_eq!(parent_path("/"), None);
        assert_eq!(child_path("/", "a"), "/a");
        assert_eq!(child_path("/a", "b"), "/a/b");
        assert_eq!(sequential_path("/config/changes/config_change_", 42), "/config/changes/config_change_0000000042");
    }
}
