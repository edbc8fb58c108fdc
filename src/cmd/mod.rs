//! The kafka-meta CLI.

mod brokers;
mod clients;
mod configs;
mod topics;

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use structopt::StructOpt;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::models::NotificationFormat;
use crate::service::TopicService;
use crate::tree::SledTree;

/// Topic & config administration over the coordination tree.
#[derive(StructOpt)]
#[structopt(name = "kafka-meta")]
pub struct KafkaMeta {
    #[structopt(subcommand)]
    action: KafkaMetaSubcommands,
    /// Enable debug logging.
    #[structopt(short)]
    verbose: bool,
    /// Set the path of the tree database, overriding STORAGE_DATA_PATH.
    #[structopt(long)]
    data_path: Option<String>,
    /// Write topic config change notifications in the legacy format.
    #[structopt(long)]
    legacy_notifications: bool,
}

impl KafkaMeta {
    pub async fn run(self) -> Result<()> {
        let mut config = Config::new()?;

        // Initialize logging based on CLI config.
        let fmt_layer = fmt::layer().with_target(true);
        let (filter_layer, level_filter) = if self.verbose {
            (EnvFilter::new("debug"), LevelFilter::DEBUG)
        } else {
            (EnvFilter::new(&config.rust_log), LevelFilter::INFO)
        };
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .with(level_filter)
            .try_init()
            .context("error initializing logging/tracing system")?;

        if let Some(path) = &self.data_path {
            config.storage_data_path = path.clone();
        }
        if self.legacy_notifications {
            config.notification_format = NotificationFormat::Legacy;
        }
        let config = Arc::new(config);
        tracing::debug!(storage_data_path = %config.storage_data_path, notification_format = ?config.notification_format, "starting");

        // Listing supported properties needs no tree access.
        if let KafkaMetaSubcommands::Configs(inner) = &self.action {
            return inner.run();
        }

        let tree = SledTree::open(&config.storage_data_path).await?;
        let service = TopicService::from_config(config, Arc::new(tree.clone()));
        let res = match &self.action {
            KafkaMetaSubcommands::Topics(inner) => inner.run(&service).await,
            KafkaMetaSubcommands::Clients(inner) => inner.run(&service).await,
            KafkaMetaSubcommands::Brokers(inner) => inner.run(&service).await,
            KafkaMetaSubcommands::Configs(inner) => inner.run(),
        };
        tree.flush().await?;
        res
    }
}

#[derive(StructOpt)]
pub enum KafkaMetaSubcommands {
    /// Topic administration.
    #[structopt(name = "topics")]
    Topics(topics::Topics),
    /// Client config administration.
    #[structopt(name = "clients")]
    Clients(clients::Clients),
    /// Supported configuration properties.
    #[structopt(name = "configs")]
    Configs(configs::Configs),
    /// Broker inspection.
    #[structopt(name = "brokers")]
    Brokers(brokers::Brokers),
}

/// Print the given value to stdout as pretty JSON.
fn print_json<T: Serialize>(val: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(val).context("error serializing output")?;
    println!("{}", out);
    Ok(())
}

/// Parse a key-value pair from the given str.
fn parse_key_val<T, U>(s: &str) -> Result<(T, U), Box<dyn std::error::Error>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + 'static,
    U: std::str::FromStr,
    U::Err: std::error::Error + 'static,
{
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid key=value pair: no `=` found in `{}`", s))?;
    Ok((s[..pos].parse()?, s[pos + 1..].parse()?))
}

/// Build a config change set from the given upserts & removals.
fn build_changes(set: &[(String, String)], delete: &[String]) -> crate::service::ConfigChanges {
    set.iter()
        .map(|(key, val)| (key.clone(), Some(val.clone())))
        .chain(delete.iter().map(|key| (key.clone(), None)))
        .collect()
}
