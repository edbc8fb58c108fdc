//! Data models stored in the coordination tree.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::assignment::ReplicaAssignment;

/// The current version of all stored records.
pub const RECORD_VERSION: u32 = 1;

/// The replica assignment record of a topic, stored at `/brokers/topics/<topic>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    pub version: u32,
    pub partitions: ReplicaAssignment,
}

impl TopicRecord {
    /// Create a new record at the current version.
    pub fn new(partitions: ReplicaAssignment) -> Self {
        Self { version: RECORD_VERSION, partitions }
    }
}

/// The configuration overrides of an entity, stored at `/config/<entity_type>/<entity_name>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityConfigRecord {
    pub version: u32,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

impl EntityConfigRecord {
    /// Create a new record at the current version.
    pub fn new(config: BTreeMap<String, String>) -> Self {
        Self { version: RECORD_VERSION, config }
    }
}

/// The kinds of entity which may carry configuration overrides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigEntity {
    Topics,
    Clients,
}

impl ConfigEntity {
    /// The tree name of this entity type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Topics => "topics",
            Self::Clients => "clients",
        }
    }
}

impl fmt::Display for ConfigEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The format of the change notifications written for topic config changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationFormat {
    /// The bare JSON encoded topic name, understood by all brokers.
    Legacy,
    /// The `{version, entity_type, entity_name}` record.
    Versioned,
}

impl Default for NotificationFormat {
    fn default() -> Self {
        Self::Versioned
    }
}

/// A configuration change notification, appended under `/config/changes`.
///
/// Brokers watch for new notifications & reload the overrides of the named entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChangeNotification {
    /// The bare topic name.
    Legacy(String),
    Versioned {
        version: u32,
        entity_type: ConfigEntity,
        entity_name: String,
    },
}

impl ChangeNotification {
    /// Build a notification for the given entity in the given format.
    ///
    /// Client entities only exist in the versioned format, so they always produce a versioned
    /// notification.
    pub fn new(format: NotificationFormat, entity_type: ConfigEntity, entity_name: &str) -> Self {
        match (format, entity_type) {
            (NotificationFormat::Legacy, ConfigEntity::Topics) => Self::Legacy(entity_name.into()),
            _ => Self::Versioned {
                version: RECORD_VERSION,
                entity_type,
                entity_name: entity_name.into(),
            },
        }
    }

    /// The name of the entity this notification refers to.
    pub fn entity_name(&self) -> &str {
        match self {
            Self::Legacy(name) => name,
            Self::Versioned { entity_name, .. } => entity_name,
        }
    }
}

/// A topic along with its replica assignment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TopicDescription {
    pub name: String,
    pub version: u32,
    pub partitions: ReplicaAssignment,
}

/// A full view of a topic: its assignment, config overrides & consuming groups.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TopicDetails {
    pub topic: TopicDescription,
    pub config: BTreeMap<String, String>,
    pub groups: Vec<String>,
}

/// Encode the given model as JSON for storage.
pub fn encode_model<M: Serialize>(model: &M) -> Result<Vec<u8>> {
    serde_json::to_vec(model).context("error serializing data model")
}

/// Decode a model from the given JSON buffer.
pub fn decode_model<M: DeserializeOwned>(data: &[u8]) -> Result<M> {
    serde_json::from_slice(data).context("error decoding object from storage")
}

#[cfg(test)]
mod test {
    use anyhow::Result;

    use super::*;

    #[test]
    fn notifications_encode_in_the_broker_formats() -> Result<()> {
        let legacy = ChangeNotification::new(NotificationFormat::Legacy, ConfigEntity::Topics, "orders");
        assert_eq!(String::from_utf8(encode_model(&legacy)?)?, r#""orders""#);

        let versioned = ChangeNotification::new(NotificationFormat::Versioned, ConfigEntity::Topics, "orders");
        assert_eq!(
            String::from_utf8(encode_model(&versioned)?)?,
            r#"{"version":1,"entity_type":"topics","entity_name":"orders"}"#
        );

        let client = ChangeNotification::new(NotificationFormat::Legacy, ConfigEntity::Clients, "app-1");
        assert!(
            matches!(&client, ChangeNotification::Versioned { entity_type: ConfigEntity::Clients, .. }),
            "expected client notifications to always be versioned, got {:?}",
            client
        );

        let decoded: ChangeNotification = decode_model(br#"{"version":1,"entity_type":"clients","entity_name":"app-1"}"#)?;
        assert_eq!(decoded, client);
        let decoded: ChangeNotification = decode_model(br#""orders""#)?;
        assert_eq!(decoded.entity_name(), "orders");
        Ok(())
    }

    #[test]
    fn records_encode_in_the_broker_formats() -> Result<()> {
        let record = TopicRecord::new(vec![(0, vec![1, 2]), (1, vec![2, 1])].into_iter().collect());
        assert_eq!(String::from_utf8(encode_model(&record)?)?, r#"{"version":1,"partitions":{"0":[1,2],"1":[2,1]}}"#);

        let config: BTreeMap<String, String> = vec![("retention.ms".to_string(), "1000".to_string())].into_iter().collect();
        let record = EntityConfigRecord::new(config);
        assert_eq!(String::from_utf8(encode_model(&record)?)?, r#"{"version":1,"config":{"retention.ms":"1000"}}"#);

        let sparse: EntityConfigRecord = decode_model(br#"{"version":1}"#)?;
        assert!(sparse.config.is_empty(), "expected a missing config object to decode as empty");
        Ok(())
    }
}
