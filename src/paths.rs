//! The layout of the coordination tree shared with the brokers.

/// The root of all topic replica assignments.
pub const BROKER_TOPICS_PATH: &str = "/brokers/topics";
/// The root of all live broker registrations.
pub const BROKER_IDS_PATH: &str = "/brokers/ids";
/// The root of all topic configuration overrides.
pub const TOPIC_CONFIG_PATH: &str = "/config/topics";
/// The root of all client configuration overrides.
pub const CLIENT_CONFIG_PATH: &str = "/config/clients";
/// The root of all configuration change notifications.
pub const CONFIG_CHANGES_PATH: &str = "/config/changes";
/// The name prefix of configuration change notification nodes.
pub const CONFIG_CHANGE_PREFIX: &str = "config_change_";
/// The root of all pending topic deletion requests.
pub const DELETE_TOPICS_PATH: &str = "/admin/delete_topics";
/// The root of all consumer groups.
pub const CONSUMERS_PATH: &str = "/consumers";

/// The path holding the replica assignment of the given topic.
pub fn topic_path(topic: &str) -> String {
    format!("{}/{}", BROKER_TOPICS_PATH, topic)
}

/// The path holding the configuration overrides of the given topic.
pub fn topic_config_path(topic: &str) -> String {
    format!("{}/{}", TOPIC_CONFIG_PATH, topic)
}

/// The path holding the configuration overrides of the given client.
pub fn client_config_path(client_id: &str) -> String {
    format!("{}/{}", CLIENT_CONFIG_PATH, client_id)
}

/// The prefix used when appending a sequential change notification node.
pub fn config_change_prefix() -> String {
    format!("{}/{}", CONFIG_CHANGES_PATH, CONFIG_CHANGE_PREFIX)
}

/// The path of the deletion request tombstone of the given topic.
pub fn delete_topic_path(topic: &str) -> String {
    format!("{}/{}", DELETE_TOPICS_PATH, topic)
}

/// The path of the offsets of the given consumer group for the given topic.
pub fn consumer_topic_offsets_path(group: &str, topic: &str) -> String {
    format!("{}/{}/offsets/{}", CONSUMERS_PATH, group, topic)
}

/// The registration path of the given broker.
pub fn broker_path(id: i32) -> String {
    format!("{}/{}", BROKER_IDS_PATH, id)
}
