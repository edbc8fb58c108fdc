//! Supported configuration properties.

use anyhow::Result;
use structopt::StructOpt;

use crate::schema::{ConfigSchema, CLIENT_CONFIG, TOPIC_CONFIG};

/// List the supported configuration properties & their docs.
#[derive(StructOpt)]
#[structopt(name = "configs")]
pub struct Configs {
    /// List client properties instead of topic properties.
    #[structopt(long)]
    clients: bool,
}

impl Configs {
    pub fn run(&self) -> Result<()> {
        let schema: &ConfigSchema = if self.clients { &*CLIENT_CONFIG } else { &*TOPIC_CONFIG };
        for (name, doc) in schema.list() {
            let validator = schema.get(name).map(|prop| prop.validator.doc()).unwrap_or_default();
            println!("{} ({})\n    {}", name, validator, doc);
        }
        Ok(())
    }
}
