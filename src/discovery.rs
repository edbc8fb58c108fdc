//! Broker discovery.
//!
//! Replica assignment requires the set of brokers available at topic creation time. The set is
//! either configured statically or read from the broker registrations in the tree.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::error::{AppError, TreeError};
use crate::paths;
use crate::tree::TreeClient;

/// A source of the currently live broker IDs.
#[async_trait]
pub trait BrokerDiscovery: Send + Sync + 'static {
    /// Get the IDs of all live brokers, in no particular order.
    async fn live_brokers(&self) -> Result<Vec<i32>>;
}

/// A fixed set of brokers.
pub struct StaticBrokers(pub Vec<i32>);

#[async_trait]
impl BrokerDiscovery for StaticBrokers {
    async fn live_brokers(&self) -> Result<Vec<i32>> {
        Ok(self.0.clone())
    }
}

/// Brokers discovered from their registrations under `/brokers/ids`.
pub struct TreeBrokers {
    client: Arc<dyn TreeClient>,
}

impl TreeBrokers {
    /// Create a new instance.
    pub fn new(client: Arc<dyn TreeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BrokerDiscovery for TreeBrokers {
    #[tracing::instrument(level = "debug", skip(self), err)]
    async fn live_brokers(&self) -> Result<Vec<i32>> {
        let children = match self.client.get_children(paths::BROKER_IDS_PATH).await {
            Ok(children) => children,
            Err(TreeError::NoNode(_)) => return Ok(vec![]),
            Err(err) => return Err(AppError::from(err).into()),
        };
        children
            .iter()
            .map(|id| {
                id.parse::<i32>()
                    .with_context(|| format!("invalid broker registration {}/{}", paths::BROKER_IDS_PATH, id))
            })
            .collect()
    }
}
