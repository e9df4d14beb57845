//! Runtime configuration for the container codec and grid queries.

use crate::error::{Error, Result};

/// Default upper bound on the number of grid cells a query may scan.
pub const DEFAULT_MAX_GRID_CELLS: usize = 1_000_000;

/// Configuration parameters shared by encode, decode and the grid queries.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Treat bytes after the last declared record as a format error
    pub reject_trailing_bytes: bool,

    /// After decoding, check per-symbol totals against the persisted frequency table
    pub verify_frequencies: bool,

    /// Largest grid (rows * cols) a path query will build.
    /// Selection is a linear scan, so a query costs O(cells^2).
    pub max_grid_cells: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            reject_trailing_bytes: true,
            verify_frequencies: true,
            max_grid_cells: DEFAULT_MAX_GRID_CELLS,
        }
    }
}

impl Configuration {
    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.max_grid_cells == 0 {
            return Err(Error::validation("max_grid_cells must be positive"));
        }
        Ok(())
    }

    /// Log configuration parameters via tracing
    pub fn print(&self) {
        tracing::info!("Configuration:");
        tracing::info!("  reject_trailing_bytes = {}", self.reject_trailing_bytes);
        tracing::info!("  verify_frequencies = {}", self.verify_frequencies);
        tracing::debug!("  max_grid_cells = {}", self.max_grid_cells);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Configuration::default();
        assert!(config.reject_trailing_bytes);
        assert!(config.verify_frequencies);
        assert_eq!(config.max_grid_cells, DEFAULT_MAX_GRID_CELLS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_cells() {
        let config = Configuration {
            max_grid_cells: 0,
            ..Configuration::default()
        };
        assert!(config.validate().unwrap_err().is_validation());
    }
}
