//! Idempotent write primitives over a tree client.
//!
//! Every operation here tolerates concurrent writers performing the same operation. Missing
//! ancestors are created on demand, and the only errors absorbed are the specific missing node &
//! existing node conditions which drive the retry paths. Everything else is returned unchanged.

use std::sync::Arc;

use crate::error::{TreeError, TreeResult};
use crate::tree::{parent_path, CreateMode, TreeClient};

/// A writer of persistent & sequential nodes.
#[derive(Clone)]
pub struct TreeWriter {
    client: Arc<dyn TreeClient>,
}

impl TreeWriter {
    /// Create a new instance.
    pub fn new(client: Arc<dyn TreeClient>) -> Self {
        Self { client }
    }

    /// The underlying tree client, used for reads.
    pub fn client(&self) -> &dyn TreeClient {
        self.client.as_ref()
    }

    /// Create a persistent node with the given data, creating any missing ancestors.
    ///
    /// Fails with `TreeError::NodeExists` if the node already exists.
    #[tracing::instrument(level = "debug", skip(self, data), err)]
    pub async fn create_persistent_path(&self, path: &str, data: &[u8]) -> TreeResult<()> {
        match self.client.create(path, data, CreateMode::Persistent).await {
            Ok(_) => Ok(()),
            Err(TreeError::NoNode(_)) => {
                self.create_parent_path(path).await?;
                self.client.create(path, data, CreateMode::Persistent).await.map(|_| ())
            }
            Err(err) => Err(err),
        }
    }

    /// Set the data of a persistent node, creating the node & its ancestors as needed.
    ///
    /// This never returns `TreeError::NoNode` for the node itself or its ancestors.
    #[tracing::instrument(level = "debug", skip(self, data), err)]
    pub async fn update_persistent_path(&self, path: &str, data: &[u8]) -> TreeResult<()> {
        match self.client.set_data(path, data).await {
            Ok(()) => Ok(()),
            Err(TreeError::NoNode(_)) => {
                self.create_parent_path(path).await?;
                match self.client.create(path, data, CreateMode::Persistent).await {
                    Ok(_) => Ok(()),
                    // Another writer created the node after our first attempt.
                    Err(TreeError::NodeExists(_)) => self.client.set_data(path, data).await,
                    Err(err) => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Create a persistent sequential node under the given prefix, returning its full path.
    ///
    /// The prefix's parent is created if it does not yet exist.
    #[tracing::instrument(level = "debug", skip(self, data), err)]
    pub async fn append_sequential(&self, prefix: &str, data: &[u8]) -> TreeResult<String> {
        match self.client.create(prefix, data, CreateMode::PersistentSequential).await {
            Err(TreeError::NoNode(_)) => {
                self.create_parent_path(prefix).await?;
                self.client.create(prefix, data, CreateMode::PersistentSequential).await
            }
            res => res,
        }
    }

    /// Create every missing ancestor of the given path with an empty payload.
    ///
    /// Walks upward until an ancestor is found to exist, then creates the missing ancestors from
    /// the top down. The walk is bounded by the depth of the path.
    async fn create_parent_path(&self, path: &str) -> TreeResult<()> {
        let mut missing = Vec::new();
        let mut current = parent_path(path);
        while let Some(dir) = current {
            match self.client.create(dir, &[], CreateMode::Persistent).await {
                Ok(_) | Err(TreeError::NodeExists(_)) => break,
                Err(TreeError::NoNode(_)) => {
                    missing.push(dir);
                    current = parent_path(dir);
                }
                Err(err) => return Err(err),
            }
        }
        for dir in missing.into_iter().rev() {
            tracing::debug!(path = dir, "creating missing ancestor");
            match self.client.create(dir, &[], CreateMode::Persistent).await {
                Ok(_) | Err(TreeError::NodeExists(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}
