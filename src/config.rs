//! Runtime configuration.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::NotificationFormat;

/// Runtime configuration data.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// The logging config, which uses Rust's `env_logger` directives.
    #[serde(default = "Config::default_rust_log")]
    pub rust_log: String,

    /// The path to the embedded tree database on disk.
    #[serde(default = "crate::tree::database::default_data_path")]
    pub storage_data_path: String,

    /// The format of change notifications written for topic config changes.
    #[serde(default)]
    pub notification_format: NotificationFormat,

    /// A static set of broker IDs to assign replicas across.
    ///
    /// When empty, brokers are discovered from their registrations in the tree.
    #[serde(default, deserialize_with = "Config::parse_broker_ids")]
    pub broker_ids: Vec<i32>,
}

impl Config {
    /// Create a new config instance.
    ///
    /// This parses the runtime environment and builds the application config from that.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Result<Self> {
        envy::from_env().context("error building config from env")
    }

    fn default_rust_log() -> String {
        "info".into()
    }

    /// Parse a comma separated list of broker IDs.
    fn parse_broker_ids<'de, D: serde::Deserializer<'de>>(val: D) -> Result<Vec<i32>, D::Error> {
        use serde::de::Error as DeError;
        let raw: String = Deserialize::deserialize(val)?;
        raw.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| id.parse::<i32>().map_err(|err| DeError::custom(format!("invalid broker id {:?}: {}", id, err))))
            .collect()
    }
}

#[cfg(test)]
impl Config {
    /// Create a config for testing, along with the temp dir backing its storage path.
    pub fn new_test() -> Result<(std::sync::Arc<Self>, tempfile::TempDir)> {
        let tmpdir = tempfile::tempdir_in("/tmp").context("error creating tmp dir in /tmp")?;
        Ok((
            std::sync::Arc::new(Self {
                rust_log: "error".into(),
                storage_data_path: tmpdir.path().to_string_lossy().to_string(),
                notification_format: NotificationFormat::Versioned,
                broker_ids: vec![0, 1, 2],
            }),
            tmpdir,
        ))
    }
}
