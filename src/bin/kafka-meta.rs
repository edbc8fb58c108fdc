//! The kafka-meta CLI.

use anyhow::Result;
use structopt::StructOpt;

use kafka_meta::KafkaMeta;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = KafkaMeta::from_args();
    cli.run().await
}
