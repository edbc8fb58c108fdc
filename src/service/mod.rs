//! Topic metadata management.
//!
//! The service validates all input locally before touching the tree, then issues a short fixed
//! sequence of tree writes. The sequence is not transactional. A failure part way through leaves
//! the earlier writes in place, and each write may simply be retried.


use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use futures::future::try_join_all;

use crate::assignment::{assign_replicas, validate_counts, ReplicaAssignment};
use crate::config::Config;
use crate::discovery::{BrokerDiscovery, StaticBrokers, TreeBrokers};
use crate::error::{AppError, TreeError};
use crate::models::{decode_model, encode_model, ChangeNotification, ConfigEntity, EntityConfigRecord, TopicDescription, TopicDetails, TopicRecord};
use crate::names;
use crate::paths;
use crate::schema::{ConfigSchema, CLIENT_CONFIG, TOPIC_CONFIG};
use crate::tree::{TreeClient, TreeWriter};

/// A set of config changes, where a `None` value removes the override.
pub type ConfigChanges = BTreeMap<String, Option<String>>;

/// The topic metadata service.
#[derive(Clone)]
pub struct TopicService {
    config: Arc<Config>,
    writer: TreeWriter,
    brokers: Arc<dyn BrokerDiscovery>,
}

impl TopicService {
    /// Create a new instance.
    pub fn new(config: Arc<Config>, client: Arc<dyn TreeClient>, brokers: Arc<dyn BrokerDiscovery>) -> Self {
        Self {
            config,
            writer: TreeWriter::new(client),
            brokers,
        }
    }

    /// Create a new instance, using the configured brokers or else discovering them from the tree.
    pub fn from_config(config: Arc<Config>, client: Arc<dyn TreeClient>) -> Self {
        let brokers: Arc<dyn BrokerDiscovery> = if config.broker_ids.is_empty() {
            Arc::new(TreeBrokers::new(client.clone()))
        } else {
            Arc::new(StaticBrokers(config.broker_ids.clone()))
        };
        Self::new(config, client, brokers)
    }

    fn client(&self) -> &dyn TreeClient {
        self.writer.client()
    }

    /// Create a new topic, assigning its replicas across the live brokers.
    ///
    /// Returns the replica assignment which was written.
    #[tracing::instrument(level = "debug", skip(self, configs), err)]
    pub async fn create_topic(&self, topic: &str, partitions: i32, replication_factor: i32, configs: &BTreeMap<String, String>) -> Result<ReplicaAssignment> {
        names::validate_topic(topic)?;
        TOPIC_CONFIG.validate(configs)?;
        validate_counts(partitions, replication_factor)?;

        let brokers = self.brokers.live_brokers().await.context("error discovering live brokers")?;
        let assignment = assign_replicas(&brokers, partitions, replication_factor)?;
        tracing::debug!(?brokers, ?assignment, "computed replica assignment");

        self.write_topic(topic, &assignment, configs).await?;
        Ok(assignment)
    }

    /// Create a new topic with an explicit replica assignment.
    #[tracing::instrument(level = "debug", skip(self, assignment, configs), err)]
    pub async fn create_topic_with_assignment(&self, topic: &str, assignment: ReplicaAssignment, configs: &BTreeMap<String, String>) -> Result<ReplicaAssignment> {
        names::validate_topic(topic)?;
        TOPIC_CONFIG.validate(configs)?;
        assignment.validate()?;

        self.write_topic(topic, &assignment, configs).await?;
        Ok(assignment)
    }

    /// Write the config & assignment of a new topic.
    async fn write_topic(&self, topic: &str, assignment: &ReplicaAssignment, configs: &BTreeMap<String, String>) -> Result<()> {
        let topic_path = paths::topic_path(topic);
        if self.client().exists(&topic_path).await.map_err(AppError::from)? {
            bail!(AppError::AlreadyExists(format!("topic \"{}\"", topic)));
        }

        // Config goes first, brokers pick it up when they observe the new assignment.
        if !configs.is_empty() {
            let data = encode_model(&EntityConfigRecord::new(configs.clone()))?;
            self.writer
                .update_persistent_path(&paths::topic_config_path(topic), &data)
                .await
                .map_err(AppError::from)?;
        }

        let data = encode_model(&TopicRecord::new(assignment.clone()))?;
        match self.writer.create_persistent_path(&topic_path, &data).await {
            Ok(()) => {
                tracing::info!(topic, partitions = assignment.partitions(), "topic created");
                Ok(())
            }
            Err(TreeError::NodeExists(_)) => bail!(AppError::AlreadyExists(format!("topic \"{}\"", topic))),
            Err(err) => Err(AppError::from(err).into()),
        }
    }

    /// Apply the given changes to the config overrides of an existing topic.
    ///
    /// Returns the full set of overrides now in effect.
    #[tracing::instrument(level = "debug", skip(self, changes), err)]
    pub async fn update_topic_config(&self, topic: &str, changes: &ConfigChanges) -> Result<BTreeMap<String, String>> {
        names::validate_topic(topic)?;
        validate_changes(&TOPIC_CONFIG, changes)?;
        if !self.topic_exists(topic).await? {
            bail!(AppError::NotFound(format!("topic \"{}\"", topic)));
        }

        let path = paths::topic_config_path(topic);
        let merged = self.merge_config(&TOPIC_CONFIG, &path, changes).await?;
        let notification = ChangeNotification::new(self.config.notification_format, ConfigEntity::Topics, topic);
        self.notify(&notification).await?;
        Ok(merged)
    }

    /// Apply the given changes to the config overrides of a client.
    ///
    /// Clients need not exist anywhere else in the tree.
    #[tracing::instrument(level = "debug", skip(self, changes), err)]
    pub async fn update_client_config(&self, client_id: &str, changes: &ConfigChanges) -> Result<BTreeMap<String, String>> {
        names::validate_entity(client_id)?;
        validate_changes(&CLIENT_CONFIG, changes)?;

        let path = paths::client_config_path(client_id);
        let merged = self.merge_config(&CLIENT_CONFIG, &path, changes).await?;
        let notification = ChangeNotification::new(self.config.notification_format, ConfigEntity::Clients, client_id);
        self.notify(&notification).await?;
        Ok(merged)
    }

    /// Merge the given changes into the config stored at the given path & write it back.
    async fn merge_config(&self, schema: &ConfigSchema, path: &str, changes: &ConfigChanges) -> Result<BTreeMap<String, String>> {
        let mut config = self.read_config(path).await?;
        for (name, change) in changes {
            match change {
                Some(value) => config.insert(name.clone(), value.clone()),
                None => config.remove(name),
            };
        }
        schema.validate(&config)?;

        let data = encode_model(&EntityConfigRecord::new(config.clone()))?;
        self.writer.update_persistent_path(path, &data).await.map_err(AppError::from)?;
        Ok(config)
    }

    /// Append a change notification so that brokers reload the changed entity.
    async fn notify(&self, notification: &ChangeNotification) -> Result<()> {
        let data = encode_model(notification)?;
        let path = self
            .writer
            .append_sequential(&paths::config_change_prefix(), &data)
            .await
            .map_err(AppError::from)?;
        tracing::debug!(%path, entity = notification.entity_name(), "config change notification written");
        Ok(())
    }

    /// Request deletion of the given topics.
    ///
    /// This only marks the topics for deletion, the brokers perform the deletion asynchronously.
    /// Every topic of the batch is checked before the first tombstone is written.
    #[tracing::instrument(level = "debug", skip(self), err)]
    pub async fn delete_topics(&self, topics: &[String]) -> Result<()> {
        let mut pending: Vec<&String> = Vec::with_capacity(topics.len());
        for topic in topics {
            names::validate_topic(topic)?;
            if names::is_internal_topic(topic) {
                bail!(AppError::InvalidInput(format!("topic {} is an internal topic and can not be deleted", topic)));
            }
            if !pending.contains(&topic) {
                pending.push(topic);
            }
        }
        for topic in &pending {
            if !self.topic_exists(topic).await? {
                bail!(AppError::NotFound(format!("topic \"{}\"", topic)));
            }
            let tombstone = self.client().exists(&paths::delete_topic_path(topic)).await.map_err(AppError::from)?;
            if tombstone {
                bail!(AppError::AlreadyExists(format!("deletion request for topic \"{}\"", topic)));
            }
        }
        for topic in pending {
            match self.writer.create_persistent_path(&paths::delete_topic_path(topic), &[]).await {
                Ok(()) => tracing::info!(%topic, "topic marked for deletion"),
                Err(TreeError::NodeExists(_)) => bail!(AppError::AlreadyExists(format!("deletion request for topic \"{}\"", topic))),
                Err(err) => return Err(AppError::from(err).into()),
            }
        }
        Ok(())
    }

    /// List all topics along with their assignments, sorted by name.
    #[tracing::instrument(level = "debug", skip(self), err)]
    pub async fn list_topics(&self) -> Result<Vec<TopicDescription>> {
        let mut topic_names = self.children_or_empty(paths::BROKER_TOPICS_PATH).await?;
        topic_names.sort();
        let topics = try_join_all(topic_names.iter().map(|name| self.read_topic(name))).await?;
        Ok(topics.into_iter().flatten().collect())
    }

    /// Get the given topic, if it exists.
    #[tracing::instrument(level = "debug", skip(self), err)]
    pub async fn get_topic(&self, topic: &str) -> Result<Option<TopicDescription>> {
        names::validate_topic(topic)?;
        self.read_topic(topic).await
    }

    /// Check if the given topic exists.
    pub async fn topic_exists(&self, topic: &str) -> Result<bool> {
        Ok(self.client().exists(&paths::topic_path(topic)).await.map_err(AppError::from)?)
    }

    /// Get the config overrides of the given topic.
    pub async fn get_topic_config(&self, topic: &str) -> Result<BTreeMap<String, String>> {
        names::validate_topic(topic)?;
        self.read_config(&paths::topic_config_path(topic)).await
    }

    /// Get the config overrides of the given client.
    pub async fn get_client_config(&self, client_id: &str) -> Result<BTreeMap<String, String>> {
        names::validate_entity(client_id)?;
        self.read_config(&paths::client_config_path(client_id)).await
    }

    /// List the consumer groups which have committed offsets for the given topic, sorted by name.
    #[tracing::instrument(level = "debug", skip(self), err)]
    pub async fn list_groups_for_topic(&self, topic: &str) -> Result<Vec<String>> {
        let groups = self.children_or_empty(paths::CONSUMERS_PATH).await?;
        let checks = groups.iter().map(|group| async move {
            let exists = self
                .client()
                .exists(&paths::consumer_topic_offsets_path(group, topic))
                .await
                .map_err(AppError::from)?;
            Ok::<_, anyhow::Error>(exists.then(|| group.clone()))
        });
        let mut groups: Vec<_> = try_join_all(checks).await?.into_iter().flatten().collect();
        groups.sort();
        Ok(groups)
    }

    /// List the IDs of the live brokers, sorted ascending.
    #[tracing::instrument(level = "debug", skip(self), err)]
    pub async fn list_brokers(&self) -> Result<Vec<i32>> {
        let mut brokers = self.brokers.live_brokers().await.context("error discovering live brokers")?;
        brokers.sort_unstable();
        Ok(brokers)
    }

    /// Describe the given topic, along with its config overrides & consuming groups.
    #[tracing::instrument(level = "debug", skip(self), err)]
    pub async fn describe_topic(&self, topic: &str) -> Result<TopicDetails> {
        let description = self
            .get_topic(topic)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("topic \"{}\"", topic)))?;
        let (config, groups) = tokio::try_join!(self.get_topic_config(topic), self.list_groups_for_topic(topic))?;
        Ok(TopicDetails {
            topic: description,
            config,
            groups,
        })
    }

    /// Read the given topic's record, returning `None` if it does not exist.
    async fn read_topic(&self, topic: &str) -> Result<Option<TopicDescription>> {
        let data = match self.client().get_data(&paths::topic_path(topic)).await {
            Ok(data) => data,
            Err(TreeError::NoNode(_)) => return Ok(None),
            Err(err) => return Err(AppError::from(err).into()),
        };
        let record: TopicRecord = decode_model(&data).with_context(|| format!("error decoding record of topic {}", topic))?;
        Ok(Some(TopicDescription {
            name: topic.into(),
            version: record.version,
            partitions: record.partitions,
        }))
    }

    /// Read the config stored at the given path, where a missing node is an empty config.
    async fn read_config(&self, path: &str) -> Result<BTreeMap<String, String>> {
        let data = match self.client().get_data(path).await {
            Ok(data) => data,
            Err(TreeError::NoNode(_)) => return Ok(BTreeMap::new()),
            Err(err) => return Err(AppError::from(err).into()),
        };
        if data.is_empty() {
            return Ok(BTreeMap::new());
        }
        let record: EntityConfigRecord = decode_model(&data).with_context(|| format!("error decoding config at {}", path))?;
        Ok(record.config)
    }

    /// Get the children of the given path, where a missing node has no children.
    async fn children_or_empty(&self, path: &str) -> Result<Vec<String>> {
        match self.client().get_children(path).await {
            Ok(children) => Ok(children),
            Err(TreeError::NoNode(_)) => Ok(vec![]),
            Err(err) => Err(AppError::from(err).into()),
        }
    }
}

/// Validate the values of a change set, before merging.
///
/// Removals only need to name a registered property.
fn validate_changes(schema: &ConfigSchema, changes: &ConfigChanges) -> Result<()> {
    let upserts: BTreeMap<String, String> = changes
        .iter()
        .filter_map(|(name, value)| value.as_ref().map(|value| (name.clone(), value.clone())))
        .collect();
    schema.validate(&upserts)?;
    for name in changes.keys() {
        if schema.get(name).is_none() {
            bail!(AppError::UnknownProperty(name.clone()));
        }
    }
    Ok(())
}
