use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::models::NotificationFormat;
use crate::paths;
use crate::service::TopicService;
use crate::tree::{MemoryTree, TreeWriter};

/// Build a service over a fresh in-memory tree with brokers `0`, `1` & `2`.
pub fn setup_service(format: NotificationFormat) -> Result<(TopicService, MemoryTree)> {
    let (config, _tmpdir) = Config::new_test()?;
    let mut config = (*config).clone();
    config.notification_format = format;
    let tree = MemoryTree::new();
    let service = TopicService::from_config(Arc::new(config), Arc::new(tree.clone()));
    Ok((service, tree))
}

/// Register consumer group offsets for the given `(group, topic)` pairs.
pub async fn setup_group_offsets(tree: &MemoryTree, offsets: &[(&str, &str)]) -> Result<()> {
    let writer = TreeWriter::new(Arc::new(tree.clone()));
    for (group, topic) in offsets {
        writer.create_persistent_path(&paths::consumer_topic_offsets_path(group, topic), b"").await?;
    }
    Ok(())
}

/// Build a config map from the given pairs.
pub fn config(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Build a config change set from the given pairs.
pub fn changes(pairs: &[(&str, Option<&str>)]) -> BTreeMap<String, Option<String>> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.map(String::from))).collect()
}

/// Read & decode all change notifications written so far, in sequence order.
pub async fn notifications(tree: &MemoryTree) -> Result<Vec<serde_json::Value>> {
    let prefix = paths::config_change_prefix();
    let snapshot = tree.snapshot().await;
    snapshot
        .iter()
        .filter(|(path, _)| path.starts_with(&prefix))
        .map(|(_, data)| Ok(serde_json::from_slice(data)?))
        .collect()
}
