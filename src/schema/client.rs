//! The client level quota config schema.

use lazy_static::lazy_static;

use super::{ConfigSchema, LONG_NOT_NEGATIVE};

pub const PRODUCER_BYTE_RATE: &str = "producer_byte_rate";
pub const CONSUMER_BYTE_RATE: &str = "consumer_byte_rate";

lazy_static! {
    /// The schema of all per-client config overrides.
    pub static ref CLIENT_CONFIG: ConfigSchema = ConfigSchema::new()
        .define(PRODUCER_BYTE_RATE, LONG_NOT_NEGATIVE.clone(), "The maximum bytes per second a client id may produce per broker before being throttled.")
        .define(CONSUMER_BYTE_RATE, LONG_NOT_NEGATIVE.clone(), "The maximum bytes per second a client id may fetch per broker before being throttled.");
}
