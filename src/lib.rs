//! Topic metadata administration for a partitioned, replicated log service.
//!
//! Topics, their partition to broker replica assignments, and per-topic & per-client config
//! overrides are stored in a hierarchical coordination tree shared by all brokers. This crate
//! validates & writes that metadata, and appends the change notifications which brokers watch in
//! order to reload config overrides without a restart.

pub mod assignment;
pub mod cmd;
pub mod config;
pub mod discovery;
pub mod error;
#[cfg(test)]
mod fixtures;
pub mod models;
pub mod names;
pub mod paths;
pub mod schema;
pub mod service;
pub mod tree;

pub use cmd::KafkaMeta;
pub use config::Config;
pub use error::{AppError, TreeError};
pub use service::TopicService;
