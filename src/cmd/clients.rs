//! Client config administration.

use anyhow::Result;
use structopt::StructOpt;

use super::{build_changes, parse_key_val, print_json};
use crate::service::TopicService;

/// Client config administration.
#[derive(StructOpt)]
#[structopt(name = "clients")]
pub struct Clients {
    #[structopt(subcommand)]
    action: ClientsSubcommands,
}

impl Clients {
    pub async fn run(&self, service: &TopicService) -> Result<()> {
        match &self.action {
            ClientsSubcommands::Describe(inner) => inner.run(service).await,
            ClientsSubcommands::Alter(inner) => inner.run(service).await,
        }
    }
}

#[derive(StructOpt)]
enum ClientsSubcommands {
    /// Show the config overrides of a client.
    Describe(Describe),
    /// Change the config overrides of a client.
    Alter(Alter),
}

/// Show the config overrides of a client.
#[derive(StructOpt)]
struct Describe {
    /// The ID of the client.
    client_id: String,
}

impl Describe {
    async fn run(&self, service: &TopicService) -> Result<()> {
        let config = service.get_client_config(&self.client_id).await?;
        print_json(&config)
    }
}

/// Change the config overrides of a client.
#[derive(StructOpt)]
struct Alter {
    /// The ID of the client.
    client_id: String,
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
        let merged = service.update_client_config(&self.client_id, &changes).await?;
        tracing::info!(client_id = %self.client_id, "updated client config");
        print_json(&merged)
    }
}
