//! An in-memory coordination tree.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{TreeError, TreeResult};
use crate::tree::{parent_path, sequential_path, CreateMode, TreeClient};

/// A coordination tree held entirely in memory.
///
/// Clones share the same underlying tree.
#[derive(Clone, Default)]
pub struct MemoryTree {
    inner: Arc<Mutex<MemoryTreeInner>>,
}

#[derive(Default)]
struct MemoryTreeInner {
    /// All nodes keyed by path, the root is implicit.
    nodes: BTreeMap<String, Vec<u8>>,
    /// The next sequence number to assign to a sequential node.
    next_seq: u64,
}

impl MemoryTreeInner {
    fn exists(&self, path: &str) -> bool {
        path == "/" || self.nodes.contains_key(path)
    }
}

impl MemoryTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of all nodes currently in the tree.
    pub async fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.inner.lock().await.nodes.clone()
    }
}

#[async_trait]
impl TreeClient for MemoryTree {
    async fn get_data(&self, path: &str) -> TreeResult<Vec<u8>> {
        let inner = self.inner.lock().await;
        inner.nodes.get(path).cloned().ok_or_else(|| TreeError::NoNode(path.into()))
    }

    async fn set_data(&self, path: &str, data: &[u8]) -> TreeResult<()> {
        let mut inner = self.inner.lock().await;
        match inner.nodes.get_mut(path) {
            Some(node) => {
                *node = data.to_vec();
                Ok(())
            }
            None => Err(TreeError::NoNode(path.into())),
        }
    }

    async fn create(&self, path: &str, data: &[u8], mode: CreateMode) -> TreeResult<String> {
        let mut inner = self.inner.lock().await;
        if let Some(parent) = parent_path(path) {
            if !inner.exists(parent) {
                return Err(TreeError::NoNode(path.into()));
            }
        }
        let path = match mode {
            CreateMode::Persistent => path.to_string(),
            CreateMode::PersistentSequential => {
                let seq = inner.next_seq;
                inner.next_seq += 1;
                sequential_path(path, seq)
            }
        };
        if inner.exists(&path) {
            return Err(TreeError::NodeExists(path));
        }
        inner.nodes.insert(path.clone(), data.to_vec());
        Ok(path)
    }

    async fn exists(&self, path: &str) -> TreeResult<bool> {
        Ok(self.inner.lock().await.exists(path))
    }

    async fn get_children(&self, path: &str) -> TreeResult<Vec<String>> {
        let inner = self.inner.lock().await;
        if !inner.exists(path) {
            return Err(TreeError::NoNode(path.into()));
        }
        let prefix = if path == "/" { "/".to_string() } else { format!("{}/", path) };
        let children = inner
            .nodes
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, _)| {
                let name = &key[prefix.len()..];
                if name.contains('/') {
                    None
                } else {
                    Some(name.to_string())
                }
            })
            .collect();
        Ok(children)
    }
}
