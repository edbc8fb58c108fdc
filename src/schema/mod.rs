//! Configuration schemas.
//!
//! A schema is an ordered registry of named properties, each bound to a validator. Values are
//! always handled as strings, exactly as they are stored in the coordination tree, and numeric
//! ranges are checked with the string comparisons of the `bounds` module.

pub mod bounds;
pub mod client;
#[cfg(test)]
mod mod_test;
pub mod topic;

use std::collections::{BTreeMap, HashMap};

use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AppError;

pub use client::CLIENT_CONFIG;
pub use topic::TOPIC_CONFIG;

const INT_MIN: &str = "-2147483648";
const INT_MAX: &str = "2147483647";
const LONG_MIN: &str = "-9223372036854775808";
const LONG_MAX: &str = "9223372036854775807";

lazy_static! {
    /// A signed 32-bit integer.
    pub static ref INT: Validator = Validator::standard(r"^-?[0-9]+$", Some(INT_MIN), Some(INT_MAX), "an INT");
    /// A 32-bit integer >= 0.
    pub static ref INT_NOT_NEGATIVE: Validator = Validator::standard(r"^[0-9]+$", Some("0"), Some(INT_MAX), "an INT >= 0");
    /// A 32-bit integer >= 1.
    pub static ref INT_1_OR_MORE: Validator = Validator::standard(r"^[0-9]+$", Some("1"), Some(INT_MAX), "an INT >= 1");
    /// A signed 64-bit integer.
    pub static ref LONG: Validator = Validator::standard(r"^-?[0-9]+$", Some(LONG_MIN), Some(LONG_MAX), "a LONG");
    /// A 64-bit integer >= 0.
    pub static ref LONG_NOT_NEGATIVE: Validator = Validator::standard(r"^[0-9]+$", Some("0"), Some(LONG_MAX), "a LONG >= 0");
    /// A decimal in the inclusive range `[0, 1]`.
    pub static ref DOUBLE_0_1: Validator = Validator::standard(r"^1$|^0(?:\.[0-9]+)?$", None, None, "a DOUBLE between 0 and 1");
    /// Either `true` or `false`.
    pub static ref BOOLEAN: Validator = Validator::standard(r"^true$|^false$", None, None, "\"true\" or \"false\"");
}

/// A config value validator: a pattern plus optional inclusive decimal string bounds.
#[derive(Clone, Debug)]
pub struct Validator {
    pattern: Regex,
    min: Option<String>,
    max: Option<String>,
    doc: String,
}

impl Validator {
    /// Create a new validator from the given pattern & bounds.
    pub fn new(pattern: &str, min: Option<&str>, max: Option<&str>, doc: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(pattern).with_context(|| format!("invalid validator pattern `{}`", pattern))?;
        Ok(Self {
            pattern,
            min: min.map(String::from),
            max: max.map(String::from),
            doc: doc.into(),
        })
    }

    /// Create a validator accepting exactly one of the given whitespace separated tokens.
    pub fn tokens(tokens: &str) -> Self {
        let tokens: Vec<_> = tokens.split_whitespace().collect();
        let pattern = tokens.iter().map(|token| format!("^{}$", regex::escape(token))).collect::<Vec<_>>().join("|");
        let doc = tokens.iter().map(|token| format!("\"{}\"", token)).collect::<Vec<_>>().join(" or ");
        // Every token is escaped, so the pattern is always well formed.
        Self::standard(&pattern, None, None, &doc)
    }

    /// Build one of the statically known validators.
    fn standard(pattern: &str, min: Option<&str>, max: Option<&str>, doc: &str) -> Self {
        Self::new(pattern, min, max, doc).expect("failed to compile standard validator pattern")
    }

    /// Check the given value against this validator.
    pub fn is_valid(&self, value: &str) -> bool {
        self.pattern.is_match(value) && bounds::within_bounds(value, self.min.as_deref(), self.max.as_deref())
    }

    /// A human readable description of accepted values, e.g. `an INT >= 1`.
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// The pattern used by this validator.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// A single named configuration property.
#[derive(Clone, Debug)]
pub struct Property {
    /// The dotted name of this property.
    pub name: String,
    /// The validator used for values of this property.
    pub validator: Validator,
    /// Operator facing documentation of this property.
    pub doc: String,
}

impl Property {
    /// Check the given value against this property's validator.
    pub fn is_valid(&self, value: &str) -> bool {
        self.validator.is_valid(value)
    }
}

/// An ordered registry of configuration properties.
#[derive(Clone, Debug, Default)]
pub struct ConfigSchema {
    /// All properties, in first registration order.
    properties: Vec<Property>,
    /// An index of property names to their position in `properties`.
    names: HashMap<String, usize>,
}

impl ConfigSchema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a property.
    ///
    /// Defining a name a second time replaces its validator & doc in place, keeping the position
    /// of the first registration.
    pub fn define(mut self, name: impl Into<String>, validator: Validator, doc: impl Into<String>) -> Self {
        let property = Property {
            name: name.into(),
            validator,
            doc: doc.into(),
        };
        match self.names.get(&property.name).copied() {
            Some(idx) => self.properties[idx] = property,
            None => {
                self.names.insert(property.name.clone(), self.properties.len());
                self.properties.push(property);
            }
        }
        self
    }

    /// Get the property registered under the given name.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.names.get(name).and_then(|idx| self.properties.get(*idx))
    }

    /// Iterate over all properties in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    /// The number of registered properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if this schema has no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Validate the given config set against this schema.
    pub fn validate(&self, config: &BTreeMap<String, String>) -> Result<&Self> {
        for (name, value) in config {
            self.validate_entry(name, value)?;
        }
        Ok(self)
    }

    /// Validate a raw JSON config set against this schema.
    ///
    /// The input must be an object whose values are all strings.
    pub fn validate_json(&self, config: &serde_json::Value) -> Result<&Self> {
        let config = match config.as_object() {
            Some(config) => config,
            None => bail!(AppError::InvalidInput("config is not an object".into())),
        };
        for (name, value) in config {
            let property = self.get(name).ok_or_else(|| AppError::UnknownProperty(name.clone()))?;
            let value = match value.as_str() {
                Some(value) => value,
                None => bail!(AppError::InvalidInput("configuration value must be a string".into())),
            };
            Self::check_value(property, value)?;
        }
        Ok(self)
    }

    /// The name & doc of every property, sorted by name.
    pub fn list(&self) -> Vec<(&str, &str)> {
        let mut props: Vec<_> = self.properties.iter().map(|prop| (prop.name.as_str(), prop.doc.as_str())).collect();
        props.sort_by(|a, b| a.0.cmp(b.0));
        props
    }

    fn validate_entry(&self, name: &str, value: &str) -> Result<()> {
        let property = self.get(name).ok_or_else(|| AppError::UnknownProperty(name.into()))?;
        Self::check_value(property, value)
    }

    fn check_value(property: &Property, value: &str) -> Result<()> {
        if !property.is_valid(value) {
            bail!(AppError::InvalidValue {
                name: property.name.clone(),
                doc: property.validator.doc().into(),
            });
        }
        Ok(())
    }
}
