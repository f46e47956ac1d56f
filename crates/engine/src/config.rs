use std::time::Duration;

use calibration::CalibrationConfig;
use scoring::{CategoryDimensionMap, CategoryWeights};

#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub calibration: CalibrationConfig,
    pub category_weights: CategoryWeights,
    pub category_dimensions: CategoryDimensionMap,
    /// Upper bound on one narrative call.
    pub narrative_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            calibration: CalibrationConfig::default(),
            category_weights: CategoryWeights::default(),
            category_dimensions: CategoryDimensionMap::default(),
            narrative_timeout: narrative::DEFAULT_TIMEOUT,
        }
    }
}
