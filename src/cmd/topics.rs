//! Topic administration.

use std::collections::BTreeMap;

use anyhow::Result;
use structopt::StructOpt;

use super::{build_changes, parse_key_val, print_json};
use crate::assignment::ReplicaAssignment;
use crate::service::TopicService;

/// Topic administration.
#[derive(StructOpt)]
#[structopt(name = "topics")]
pub struct Topics {
    #[structopt(subcommand)]
    action: TopicsSubcommands,
}

impl Topics {
    pub async fn run(&self, service: &TopicService) -> Result<()> {
        match &self.action {
            TopicsSubcommands::List(inner) => inner.run(service).await,
            TopicsSubcommands::Describe(inner) => inner.run(service).await,
            TopicsSubcommands::Create(inner) => inner.run(service).await,
            TopicsSubcommands::Alter(inner) => inner.run(service).await,
            TopicsSubcommands::Delete(inner) => inner.run(service).await,
        }
    }
}

#[derive(StructOpt)]
enum TopicsSubcommands {
    /// List all topics.
    List(List),
    /// Describe a topic, its config overrides & consumer groups.
    Describe(Describe),
    /// Create a new topic.
    Create(Create),
    /// Change the config overrides of a topic.
    Alter(Alter),
    /// Request deletion of topics.
    Delete(Delete),
}

/// List all topics.
#[derive(StructOpt)]
struct List {}

impl List {
    async fn run(&self, service: &TopicService) -> Result<()> {
        let topics = service.list_topics().await?;
        let width = topics.iter().map(|topic| topic.name.len()).max().unwrap_or(0);
        for topic in topics {
            println!(
                "{:>width$} (part: {} repl: {} ver: {})",
                topic.name,
                topic.partitions.partitions(),
                topic.partitions.replication_factor(),
                topic.version,
                width = width
            );
        }
        Ok(())
    }
}

/// Describe a topic.
#[derive(StructOpt)]
struct Describe {
    /// The name of the topic.
    topic: String,
}

impl Describe {
    async fn run(&self, service: &TopicService) -> Result<()> {
        let details = service.describe_topic(&self.topic).await?;
        print_json(&details)
    }
}

/// Create a new topic.
#[derive(StructOpt)]
struct Create {
    /// The name of the new topic.
    topic: String,
    /// The number of partitions of the new topic.
    #[structopt(short, long, required_unless("replica-assignment"))]
    partitions: Option<i32>,
    /// The replication factor of each partition.
    #[structopt(short, long, required_unless("replica-assignment"))]
    replication_factor: Option<i32>,
    /// An explicit replica assignment, as comma separated partitions of colon separated broker IDs.
    ///
    /// For example `1:2,2:0` places partition 0 on brokers 1 & 2, and partition 1 on brokers 2 & 0.
    #[structopt(long, conflicts_with_all(&["partitions", "replication-factor"]), parse(try_from_str = parse_replica_assignment))]
    replica_assignment: Option<ReplicaAssignment>,
    /// Config overrides of the new topic.
    #[structopt(short, long = "config", parse(try_from_str = parse_key_val), number_of_values = 1)]
    configs: Vec<(String, String)>,
}

impl Create {
    async fn run(&self, service: &TopicService) -> Result<()> {
        let configs: BTreeMap<String, String> = self.configs.iter().cloned().collect();
        let assignment = match (&self.replica_assignment, self.partitions, self.replication_factor) {
            (Some(assignment), _, _) => service.create_topic_with_assignment(&self.topic, assignment.clone(), &configs).await?,
            (None, Some(partitions), Some(replication_factor)) => service.create_topic(&self.topic, partitions, replication_factor, &configs).await?,
            _ => anyhow::bail!("either --replica-assignment or both --partitions & --replication-factor are required"),
        };
        tracing::info!(topic = %self.topic, "created topic");
        print_json(&assignment)
    }
}

/// Change the config overrides of a topic.
#[derive(StructOpt)]
struct Alter {
    /// The name of the topic.
    topic: String,
    /// Config overrides to add or change.
    #[structopt(short, long = "config", parse(try_from_str = parse_key_val), number_of_values = 1)]
    configs: Vec<(String, String)>,
    /// Config overrides to remove.
    #[structopt(short, long = "delete-config", number_of_values = 1)]
    delete_configs: Vec<String>,
}

impl Alter {
    async fn run(&self, service: &TopicService) -> Result<()> {
        let changes = build_changes(&self.configs, &self.delete_configs);
        let merged = service.update_topic_config(&self.topic, &changes).await?;
        tracing::info!(topic = %self.topic, "updated topic config");
        print_json(&merged)
    }
}

/// Request deletion of topics.
#[derive(StructOpt)]
struct Delete {
    /// The names of the topics to delete.
    #[structopt(required = true)]
    topics: Vec<String>,
}

impl Delete {
    async fn run(&self, service: &TopicService) -> Result<()> {
        service.delete_topics(&self.topics).await?;
        for topic in &self.topics {
            tracing::info!(%topic, "topic marked for deletion, brokers will delete it asynchronously");
        }
        Ok(())
    }
}

/// Parse a replica assignment of the form `1:2,2:0`.
fn parse_replica_assignment(s: &str) -> Result<ReplicaAssignment, Box<dyn std::error::Error>> {
    let mut assignment = Vec::new();
    for (partition, replicas) in s.split(',').enumerate() {
        let replicas = replicas
            .split(':')
            .map(|id| id.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| format!("invalid broker id in partition {} of `{}`: {}", partition, s, err))?;
        assignment.push((partition as i32, replicas));
    }
    Ok(assignment.into_iter().collect())
}
