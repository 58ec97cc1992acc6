//! Tuning of the parallel dispatch.
//!
//! None of these values change conversion output; they only decide how rows
//! are split across the worker.

use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};

/// Rows (or multi-row iterations) below which a conversion stays on the
/// calling thread even when a worker is available.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 200;

/// Configuration for row and multi-row dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Minimum number of work units (rows for single-plane kernels,
    /// iterations for multi-row kernels) before the worker is used.
    pub parallel_threshold: usize,
    /// Smallest number of work units a parallel chunk may hold.
    pub min_rows_per_chunk: usize,
    /// Upper bound on parallel chunks, `0` for one chunk per
    /// `common::parallel::CHUNKS_PER_THREAD` worker threads.
    pub max_chunks: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            min_rows_per_chunk: 16,
            max_chunks: 0,
        }
    }
}

impl DispatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.parallel_threshold == 0 {
            return Err(Error::InvalidConfig(
                "parallel_threshold must be positive".to_string(),
            ));
        }
        if self.min_rows_per_chunk == 0 {
            return Err(Error::InvalidConfig(
                "min_rows_per_chunk must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a YAML document; missing fields keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yml::from_str(yaml).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yml::to_string(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Whether `units` work units are worth splitting across a worker.
    #[inline]
    pub(crate) fn should_parallelize(&self, units: usize) -> bool {
        units >= self.parallel_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = DispatchConfig::default();
        config.validate().unwrap();
        assert_eq!(config.parallel_threshold, 200);
        assert!(!config.should_parallelize(199));
        assert!(config.should_parallelize(200));
    }

    #[test]
    fn validate_rejects_zero_values() {
        let config = DispatchConfig {
            parallel_threshold: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = DispatchConfig {
            min_rows_per_chunk: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn yaml_round_trip() {
        let config = DispatchConfig {
            parallel_threshold: 64,
            min_rows_per_chunk: 4,
            max_chunks: 12,
        };
        let yaml = config.to_yaml_string().unwrap();
        assert_eq!(DispatchConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn yaml_missing_fields_use_defaults() {
        let config = DispatchConfig::from_yaml_str("max_chunks: 8\n").unwrap();
        assert_eq!(config.max_chunks, 8);
        assert_eq!(config.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
    }

    #[test]
    fn yaml_rejects_invalid_values() {
        assert!(DispatchConfig::from_yaml_str("parallel_threshold: 0\n").is_err());
    }
}
