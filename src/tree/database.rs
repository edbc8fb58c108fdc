//! An embedded coordination tree backed by sled.
//!
//! Every node is stored under its full path as the key. This is primarily useful for local
//! development & tooling, where no external coordination service is available.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use sled::{Config as SledConfig, Db};

use crate::error::{TreeError, TreeResult};
use crate::tree::{parent_path, sequential_path, CreateMode, TreeClient};

/// The default path to use for data storage.
pub const DEFAULT_DATA_PATH: &str = "/usr/local/kafka-meta/db";

/// The default path to use for data storage.
pub fn default_data_path() -> String {
    DEFAULT_DATA_PATH.to_string()
}

/// A coordination tree stored in a sled database.
#[derive(Clone)]
pub struct SledTree {
    db: Db,
}

impl SledTree {
    /// Open the database at the given path for usage.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let dbpath = path.into();
        tokio::fs::create_dir_all(&dbpath)
            .await
            .context("error creating dir for tree database")?;

        Self::spawn_blocking(move || -> Result<Self> {
            let db = SledConfig::new().path(dbpath).open().context("error opening tree database")?;
            Ok(Self { db })
        })
        .await?
    }

    /// Flush all pending writes to disk.
    pub async fn flush(&self) -> Result<()> {
        self.db.flush_async().await.context("error flushing tree database")?;
        Ok(())
    }

    /// Spawn a blocking database-related function.
    async fn spawn_blocking<F, R>(f: F) -> TreeResult<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        tokio::task::spawn_blocking(f)
            .await
            .map_err(|err| TreeError::Other(anyhow!("error joining blocking tree task: {}", err)))
    }

    fn node_exists(db: &Db, path: &str) -> TreeResult<bool> {
        if path == "/" {
            return Ok(true);
        }
        db.contains_key(path).map_err(|err| db_err(err, path))
    }
}

/// Map a sled error into a tree error for the given path.
fn db_err(err: sled::Error, path: &str) -> TreeError {
    TreeError::Other(anyhow::Error::from(err).context(format!("tree database error at path {}", path)))
}

#[async_trait]
impl TreeClient for SledTree {
    async fn get_data(&self, path: &str) -> TreeResult<Vec<u8>> {
        let (db, path) = (self.db.clone(), path.to_string());
        Self::spawn_blocking(move || {
            let data = db.get(&path).map_err(|err| db_err(err, &path))?;
            match data {
                Some(data) => Ok(data.to_vec()),
                None => Err(TreeError::NoNode(path)),
            }
        })
        .await?
    }

    async fn set_data(&self, path: &str, data: &[u8]) -> TreeResult<()> {
        let (db, path, data) = (self.db.clone(), path.to_string(), data.to_vec());
        Self::spawn_blocking(move || {
            // Only replace the payload of an existing node, a missing node stays missing.
            let previous = db
                .fetch_and_update(&path, |old| old.map(|_| data.clone()))
                .map_err(|err| db_err(err, &path))?;
            match previous {
                Some(_) => Ok(()),
                None => Err(TreeError::NoNode(path)),
            }
        })
        .await?
    }

    async fn create(&self, path: &str, data: &[u8], mode: CreateMode) -> TreeResult<String> {
        let (db, path, data) = (self.db.clone(), path.to_string(), data.to_vec());
        Self::spawn_blocking(move || {
            if let Some(parent) = parent_path(&path) {
                if !Self::node_exists(&db, parent)? {
                    return Err(TreeError::NoNode(path));
                }
            }
            let path = match mode {
                CreateMode::Persistent => path,
                CreateMode::PersistentSequential => {
                    let seq = db.generate_id().map_err(|err| db_err(err, &path))?;
                    sequential_path(&path, seq)
                }
            };
            let swapped = db
                .compare_and_swap(&path, None as Option<&[u8]>, Some(data))
                .map_err(|err| db_err(err, &path))?;
            match swapped {
                Ok(()) => Ok(path),
                Err(_) => Err(TreeError::NodeExists(path)),
            }
        })
        .await?
    }

    async fn exists(&self, path: &str) -> TreeResult<bool> {
        let (db, path) = (self.db.clone(), path.to_string());
        Self::spawn_blocking(move || Self::node_exists(&db, &path)).await?
    }

    async fn get_children(&self, path: &str) -> TreeResult<Vec<String>> {
        let (db, path) = (self.db.clone(), path.to_string());
        Self::spawn_blocking(move || {
            if !Self::node_exists(&db, &path)? {
                return Err(TreeError::NoNode(path));
            }
            let prefix = if path == "/" { "/".to_string() } else { format!("{}/", path) };
            let mut children = Vec::new();
            for kv_res in db.scan_prefix(prefix.as_bytes()) {
                let (key, _) = kv_res.map_err(|err| db_err(err, &path))?;
                let name = String::from_utf8_lossy(&key[prefix.len()..]).into_owned();
                if !name.contains('/') {
                    children.push(name);
                }
            }
            Ok(children)
        })
        .await?
    }
}
