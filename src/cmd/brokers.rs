//! Broker inspection.

use anyhow::Result;
use structopt::StructOpt;

use crate::service::TopicService;

/// Broker inspection.
#[derive(StructOpt)]
#[structopt(name = "brokers")]
pub struct Brokers {}

impl Brokers {
    pub async fn run(&self, service: &TopicService) -> Result<()> {
        let brokers = service.list_brokers().await?;
        if brokers.is_empty() {
            tracing::warn!("no live brokers found");
        }
        for id in brokers {
            println!("{}", id);
        }
        Ok(())
    }
}
