//! Name validation for topics & config entities.

use anyhow::{ensure, Result};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AppError;

/// The maximum length of a topic name.
pub const MAX_NAME_LENGTH: usize = 255;

/// Topics managed by the brokers themselves, which may not be deleted through this crate.
pub const INTERNAL_TOPICS: &[&str] = &["__consumer_offsets"];

lazy_static! {
    /// Regular expression used to validate topic names.
    static ref RE_TOPIC: Regex = Regex::new(r"^[-_.a-zA-Z0-9]+$").expect("failed to compile RE_TOPIC regex");
}

/// Validate the given topic name.
pub fn validate_topic(topic: &str) -> Result<()> {
    ensure!(!topic.is_empty(), AppError::InvalidInput("topic name is illegal, can't be empty".into()));
    ensure!(topic != "." && topic != "..", AppError::InvalidInput("topic name cannot be \".\" or \"..\"".into()));
    ensure!(
        topic.len() <= MAX_NAME_LENGTH,
        AppError::InvalidInput(format!("topic name is illegal, can't be longer than {} characters", MAX_NAME_LENGTH))
    );
    ensure!(
        RE_TOPIC.is_match(topic),
        AppError::InvalidInput(format!(
            "topic name {} is illegal, contains a character other than ASCII alphanumerics, '.', '_' and '-'",
            topic
        ))
    );
    Ok(())
}

/// Check if the given topic is one of the broker managed internal topics.
pub fn is_internal_topic(topic: &str) -> bool {
    INTERNAL_TOPICS.contains(&topic)
}

/// Validate the name of a non-topic config entity, such as a client id.
///
/// Such names are used verbatim as a single tree path segment.
pub fn validate_entity(name: &str) -> Result<()> {
    ensure!(!name.is_empty(), AppError::InvalidInput("entity name can't be empty".into()));
    ensure!(name != "." && name != "..", AppError::InvalidInput("entity name cannot be \".\" or \"..\"".into()));
    ensure!(!name.contains('/'), AppError::InvalidInput(format!("entity name {} is illegal, contains '/'", name)));
    Ok(())
}
