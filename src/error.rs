//! Error abstractions.

use thiserror::Error;

/// Application error variants.
///
/// Public operations return `anyhow::Result`, carrying one of these variants so that callers
/// may downcast to decide how to react.
#[derive(Debug, Error)]
pub enum AppError {
    /// The given input was invalid.
    #[error("validation error: {0}")]
    InvalidInput(String),
    /// A configuration key is not registered in the schema in use.
    #[error("unknown configuration \"{0}\"")]
    UnknownProperty(String),
    /// A configuration value does not satisfy its validator.
    #[error("configuration \"{name}\" must be {doc}")]
    InvalidValue { name: String, doc: String },
    /// The target object already exists.
    #[error("{0} already exists")]
    AlreadyExists(String),
    /// The target object was not found.
    #[error("{0} not found")]
    NotFound(String),
    /// Any other failure from the tree or broker discovery collaborators.
    #[error("transport error: {0}")]
    Transport(anyhow::Error),
}

/// Errors returned from a coordination tree client.
///
/// Only `NoNode` & `NodeExists` are interpreted by this crate, everything else is opaque.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The node, or one of its ancestors, does not exist.
    #[error("no node exists at path {0}")]
    NoNode(String),
    /// A node already exists at the given path.
    #[error("a node already exists at path {0}")]
    NodeExists(String),
    /// Any other client error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A result type where the error is a `TreeError`.
pub type TreeResult<T> = ::std::result::Result<T, TreeError>;

impl From<TreeError> for AppError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::NoNode(path) => AppError::NotFound(format!("node {}", path)),
            TreeError::NodeExists(path) => AppError::AlreadyExists(format!("node {}", path)),
            TreeError::Other(err) => AppError::Transport(err),
        }
    }
}

impl AppError {
    /// Extract the app error carried by the given error, if any.
    pub fn downcast(err: &anyhow::Error) -> Option<&AppError> {
        err.downcast_ref::<AppError>()
    }
}
