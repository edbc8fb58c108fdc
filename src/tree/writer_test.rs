use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::*;
use crate::error::{TreeError, TreeResult};
use crate::tree::{CreateMode, MemoryTree, TreeClient};

/// A tree which simulates a concurrent writer creating the target node between our set & create.
struct RacyTree {
    inner: MemoryTree,
    target: String,
    raced: AtomicBool,
}

#[async_trait]
impl TreeClient for RacyTree {
    async fn get_data(&self, path: &str) -> TreeResult<Vec<u8>> {
        self.inner.get_data(path).await
    }

    async fn set_data(&self, path: &str, data: &[u8]) -> TreeResult<()> {
        self.inner.set_data(path, data).await
    }

    async fn create(&self, path: &str, data: &[u8], mode: CreateMode) -> TreeResult<String> {
        if path == self.target && !self.raced.swap(true, Ordering::SeqCst) {
            self.inner.create(path, b"racer", mode).await?;
        }
        self.inner.create(path, data, mode).await
    }

    async fn exists(&self, path: &str) -> TreeResult<bool> {
        self.inner.exists(path).await
    }

    async fn get_children(&self, path: &str) -> TreeResult<Vec<String>> {
        self.inner.get_children(path).await
    }
}

/// A tree which fails every operation with an opaque error.
struct BrokenTree;

#[async_trait]
impl TreeClient for BrokenTree {
    async fn get_data(&self, _: &str) -> TreeResult<Vec<u8>> {
        Err(TreeError::Other(anyhow!("connection loss")))
    }

    async fn set_data(&self, _: &str, _: &[u8]) -> TreeResult<()> {
        Err(TreeError::Other(anyhow!("connection loss")))
    }

    async fn create(&self, _: &str, _: &[u8], _: CreateMode) -> TreeResult<String> {
        Err(TreeError::Other(anyhow!("connection loss")))
    }

    async fn exists(&self, _: &str) -> TreeResult<bool> {
        Err(TreeError::Other(anyhow!("connection loss")))
    }

    async fn get_children(&self, _: &str) -> TreeResult<Vec<String>> {
        Err(TreeError::Other(anyhow!("connection loss")))
    }
}

#[tokio::test]
async fn create_persistent_path_backfills_ancestors() -> Result<()> {
    let tree = MemoryTree::new();
    let writer = TreeWriter::new(Arc::new(tree.clone()));

    writer.create_persistent_path("/brokers/topics/orders", b"data").await?;

    let nodes = tree.snapshot().await;
    assert_eq!(nodes.get("/brokers").map(Vec::as_slice), Some(&b""[..]), "expected /brokers to be backfilled empty");
    assert_eq!(nodes.get("/brokers/topics").map(Vec::as_slice), Some(&b""[..]), "expected /brokers/topics to be backfilled empty");
    assert_eq!(nodes.get("/brokers/topics/orders").map(Vec::as_slice), Some(&b"data"[..]));
    assert_eq!(nodes.len(), 3, "expected exactly 3 nodes, got {:?}", nodes.keys().collect::<Vec<_>>());
    Ok(())
}

#[tokio::test]
async fn create_persistent_path_fails_on_existing_node() -> Result<()> {
    let tree = MemoryTree::new();
    let writer = TreeWriter::new(Arc::new(tree.clone()));

    writer.create_persistent_path("/admin/delete_topics/orders", b"").await?;
    let res = writer.create_persistent_path("/admin/delete_topics/orders", b"again").await;
    assert!(matches!(res, Err(TreeError::NodeExists(_))), "expected NodeExists on second create, got {:?}", res);
    Ok(())
}

#[tokio::test]
async fn update_persistent_path_is_idempotent() -> Result<()> {
    let tree = MemoryTree::new();
    let writer = TreeWriter::new(Arc::new(tree.clone()));

    writer.update_persistent_path("/config/topics/orders", b"v1").await?;
    writer.update_persistent_path("/config/topics/orders", b"v1").await?;
    assert_eq!(tree.get_data("/config/topics/orders").await?, b"v1");

    writer.update_persistent_path("/config/topics/orders", b"v2").await?;
    assert_eq!(tree.get_data("/config/topics/orders").await?, b"v2", "expected the second update to overwrite");
    Ok(())
}

#[tokio::test]
async fn update_persistent_path_falls_back_to_set_when_raced() -> Result<()> {
    let racy = Arc::new(RacyTree {
        inner: MemoryTree::new(),
        target: "/config/topics/orders".into(),
        raced: AtomicBool::new(false),
    });
    let writer = TreeWriter::new(racy.clone());

    writer.update_persistent_path("/config/topics/orders", b"ours").await?;
    assert!(racy.raced.load(Ordering::SeqCst), "expected the racing create to have happened");
    assert_eq!(racy.inner.get_data("/config/topics/orders").await?, b"ours", "expected our write to win after the race");
    Ok(())
}

#[tokio::test]
async fn append_sequential_assigns_padded_increasing_paths() -> Result<()> {
    let tree = MemoryTree::new();
    let writer = TreeWriter::new(Arc::new(tree.clone()));

    let first = writer.append_sequential("/config/changes/config_change_", b"a").await?;
    let second = writer.append_sequential("/config/changes/config_change_", b"b").await?;
    assert_eq!(first, "/config/changes/config_change_0000000000");
    assert_eq!(second, "/config/changes/config_change_0000000001");
    assert_eq!(tree.get_data(&second).await?, b"b");
    assert!(tree.exists("/config/changes").await?, "expected the parent to be backfilled");
    Ok(())
}

#[tokio::test]
async fn other_errors_propagate_unchanged() {
    let writer = TreeWriter::new(Arc::new(BrokenTree));

    let res = writer.create_persistent_path("/a/b", b"").await;
    assert!(matches!(res, Err(TreeError::Other(_))), "expected create error to propagate, got {:?}", res);
    let res = writer.update_persistent_path("/a/b", b"").await;
    assert!(matches!(res, Err(TreeError::Other(_))), "expected update error to propagate, got {:?}", res);
    let res = writer.append_sequential("/a/b_", b"").await;
    assert!(matches!(res, Err(TreeError::Other(_))), "expected append error to propagate, got {:?}", res);
}
