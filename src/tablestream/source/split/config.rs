//! Chunk splitter configuration.
//!
//! Options arrive either as a struct built in code or as a string property
//! map from the configuration loader, keyed by the documented `split.*`
//! option names.

use crate::tablestream::source::split::error::{SplitError, SplitResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Property key for the target rows per chunk
pub const SPLIT_SIZE: &str = "split.size";
/// Property key for the even-distribution factor upper bound
pub const SPLIT_EVEN_DISTRIBUTION_FACTOR_UPPER_BOUND: &str =
    "split.even-distribution.factor.upper-bound";
/// Property key for the even-distribution factor lower bound
pub const SPLIT_EVEN_DISTRIBUTION_FACTOR_LOWER_BOUND: &str =
    "split.even-distribution.factor.lower-bound";
/// Property key for the shard count above which sampling kicks in
pub const SPLIT_SAMPLE_SHARDING_THRESHOLD: &str = "split.sample-sharding.threshold";
/// Property key for the 1-in-N sampling stride
pub const SPLIT_INVERSE_SAMPLING_RATE: &str = "split.inverse-sampling-rate";

/// Options governing how a table is split into chunks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Target rows per chunk
    pub split_size: usize,
    /// Upper bound of the distribution factor considered evenly distributed
    pub distribution_factor_upper: f64,
    /// Lower bound of the distribution factor considered evenly distributed
    pub distribution_factor_lower: f64,
    /// Shard count above which arithmetic chunking gives way to sampling
    pub sample_sharding_threshold: usize,
    /// The sample picks one of every N rows; clamped to `split_size` on use
    pub inverse_sampling_rate: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            split_size: 8192,
            distribution_factor_upper: 1000.0,
            distribution_factor_lower: 0.05,
            sample_sharding_threshold: 1000,
            inverse_sampling_rate: 1000,
        }
    }
}

impl SplitConfig {
    /// Build a config from a string property map, falling back to defaults
    /// for absent keys
    pub fn from_properties(properties: &HashMap<String, String>) -> SplitResult<Self> {
        let mut config = Self::default();
        if let Some(value) = properties.get(SPLIT_SIZE) {
            config.split_size = parse_property(SPLIT_SIZE, value)?;
        }
        if let Some(value) = properties.get(SPLIT_EVEN_DISTRIBUTION_FACTOR_UPPER_BOUND) {
            config.distribution_factor_upper =
                parse_property(SPLIT_EVEN_DISTRIBUTION_FACTOR_UPPER_BOUND, value)?;
        }
        if let Some(value) = properties.get(SPLIT_EVEN_DISTRIBUTION_FACTOR_LOWER_BOUND) {
            config.distribution_factor_lower =
                parse_property(SPLIT_EVEN_DISTRIBUTION_FACTOR_LOWER_BOUND, value)?;
        }
        if let Some(value) = properties.get(SPLIT_SAMPLE_SHARDING_THRESHOLD) {
            config.sample_sharding_threshold =
                parse_property(SPLIT_SAMPLE_SHARDING_THRESHOLD, value)?;
        }
        if let Some(value) = properties.get(SPLIT_INVERSE_SAMPLING_RATE) {
            config.inverse_sampling_rate = parse_property(SPLIT_INVERSE_SAMPLING_RATE, value)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the splitter cannot run with
    pub fn validate(&self) -> SplitResult<()> {
        if self.split_size == 0 {
            return Err(SplitError::config_error(format!(
                "'{}' must be a positive integer",
                SPLIT_SIZE
            )));
        }
        if self.sample_sharding_threshold == 0 {
            return Err(SplitError::config_error(format!(
                "'{}' must be a positive integer",
                SPLIT_SAMPLE_SHARDING_THRESHOLD
            )));
        }
        if self.inverse_sampling_rate == 0 {
            return Err(SplitError::config_error(format!(
                "'{}' must be a positive integer",
                SPLIT_INVERSE_SAMPLING_RATE
            )));
        }
        if self.distribution_factor_lower > self.distribution_factor_upper {
            return Err(SplitError::config_error(format!(
                "'{}' ({}) must not exceed '{}' ({})",
                SPLIT_EVEN_DISTRIBUTION_FACTOR_LOWER_BOUND,
                self.distribution_factor_lower,
                SPLIT_EVEN_DISTRIBUTION_FACTOR_UPPER_BOUND,
                self.distribution_factor_upper
            )));
        }
        Ok(())
    }
}

fn parse_property<T: std::str::FromStr>(key: &str, value: &str) -> SplitResult<T> {
    value.trim().parse::<T>().map_err(|_| {
        SplitError::config_error(format!("Invalid value '{}' for option '{}'", value, key))
    })
}
