//! Local search configuration.

use serde::{Deserialize, Serialize};

/// Stopping and move-size parameters shared by every local search operator.
///
/// # Examples
///
/// ```
/// use u_sequencing::local_search::LocalSearchConfig;
///
/// let config = LocalSearchConfig::default()
///     .with_max_stagnation(200)
///     .with_block_fraction(0.25);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalSearchConfig {
    /// Consecutive non-improving trials before an operator stops.
    pub max_stagnation: usize,

    /// Largest block moved by the block operators, as a fraction of the
    /// ordering length. Blocks always have at least 2 jobs.
    pub block_fraction: f64,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            max_stagnation: 1000,
            block_fraction: 0.4,
        }
    }
}

impl LocalSearchConfig {
    pub fn with_max_stagnation(mut self, n: usize) -> Self {
        self.max_stagnation = n;
        self
    }

    pub fn with_block_fraction(mut self, fraction: f64) -> Self {
        self.block_fraction = fraction;
        self
    }

    /// Largest block size for an ordering of `len` jobs.
    pub fn max_block(&self, len: usize) -> usize {
        ((self.block_fraction * len as f64).floor() as usize).max(2)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_stagnation == 0 {
            return Err("max_stagnation must be at least 1".into());
        }
        if !(self.block_fraction > 0.0 && self.block_fraction <= 1.0) {
            return Err(format!(
                "block_fraction must be in (0, 1], got {}",
                self.block_fraction
            ));
        }
        Ok(())
    }
}
