//! Weight tables used by the overall scorer.
//!
//! The two tables have different key spaces:
//! [`CategoryWeights`] is a fixed table keyed by claim category, while
//! [`WeightSet`] is learned from reviewer feedback and keyed by evaluation
//! dimension (`founder`, `market`, ...). [`CategoryDimensionMap`] is the only
//! bridge between them.

use std::collections::BTreeMap;

use claims::ClaimCategory;
use serde::{Deserialize, Serialize};

use crate::{Result, ScoringError};

pub const MIN_WEIGHT: f64 = 0.1;
pub const MAX_WEIGHT: f64 = 2.0;
pub const DEFAULT_WEIGHT: f64 = 1.0;

pub type Dimension = String;

/// Clamps a proposed dimension weight into `[MIN_WEIGHT, MAX_WEIGHT]`.
///
/// This is the only place a weight gets clamped. Everything downstream
/// validates instead.
pub fn clamp_weight(weight: f64) -> f64 {
    weight.clamp(MIN_WEIGHT, MAX_WEIGHT)
}

fn check_weight(key: &str, weight: f64) -> Result<()> {
    if weight.is_finite() && (MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
        Ok(())
    } else {
        Err(ScoringError::WeightOutOfRange {
            key: key.to_string(),
            weight,
        })
    }
}

/// Learned per-dimension weights. Values are immutable once built; a
/// calibration run produces a new set with a bumped version.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeightSet")]
pub struct WeightSet {
    version: u64,
    weights: BTreeMap<Dimension, f64>,
}

#[derive(Deserialize)]
struct RawWeightSet {
    #[serde(default)]
    version: u64,
    #[serde(default)]
    weights: BTreeMap<Dimension, f64>,
}

impl TryFrom<RawWeightSet> for WeightSet {
    type Error = ScoringError;

    fn try_from(raw: RawWeightSet) -> Result<Self> {
        WeightSet::from_weights(raw.version, raw.weights)
    }
}

impl Default for WeightSet {
    fn default() -> Self {
        Self::new()
    }
}

impl WeightSet {
    /// Empty set at version 0; every dimension reads as [`DEFAULT_WEIGHT`].
    pub fn new() -> Self {
        Self {
            version: 0,
            weights: BTreeMap::new(),
        }
    }

    pub fn from_weights(
        version: u64,
        weights: impl IntoIterator<Item = (Dimension, f64)>,
    ) -> Result<Self> {
        let weights: BTreeMap<Dimension, f64> = weights.into_iter().collect();
        for (dim, w) in &weights {
            check_weight(dim, *w)?;
        }
        Ok(Self { version, weights })
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, dimension: &str) -> f64 {
        self.weights.get(dimension).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Returns the successor set with `updates` applied. Fails on any
    /// weight outside range rather than clamping it again.
    pub fn with_updates(
        &self,
        updates: impl IntoIterator<Item = (Dimension, f64)>,
    ) -> Result<Self> {
        let mut weights = self.weights.clone();
        for (dim, w) in updates {
            check_weight(&dim, w)?;
            weights.insert(dim, w);
        }
        Ok(Self {
            version: self.version + 1,
            weights,
        })
    }
}

/// Fixed per-category weights for the overall roll-up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights(BTreeMap<ClaimCategory, f64>);

impl Default for CategoryWeights {
    fn default() -> Self {
        use ClaimCategory::*;
        Self(BTreeMap::from([
            (RevenueMetrics, 1.5),
            (Traction, 1.4),
            (TeamBackground, 1.3),
            (CustomerReference, 1.2),
            (UserCustomer, 1.1),
            (MarketSize, 1.0),
            (TechnologyIp, 1.0),
            (Fundraising, 0.9),
            (Competitive, 0.8),
        ]))
    }
}

impl CategoryWeights {
    pub fn new(weights: impl IntoIterator<Item = (ClaimCategory, f64)>) -> Result<Self> {
        let weights: BTreeMap<_, _> = weights.into_iter().collect();
        for (cat, w) in &weights {
            if !(w.is_finite() && *w > 0.0) {
                return Err(ScoringError::WeightOutOfRange {
                    key: cat.to_string(),
                    weight: *w,
                });
            }
        }
        Ok(Self(weights))
    }

    /// Unlisted categories weigh [`DEFAULT_WEIGHT`].
    pub fn get(&self, category: ClaimCategory) -> f64 {
        self.0.get(&category).copied().unwrap_or(DEFAULT_WEIGHT)
    }
}

/// Which feedback dimension governs each claim category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryDimensionMap(BTreeMap<ClaimCategory, Dimension>);

impl Default for CategoryDimensionMap {
    fn default() -> Self {
        use ClaimCategory::*;
        Self(
            [
                (TeamBackground, "founder"),
                (MarketSize, "market"),
                (Competitive, "market"),
                (RevenueMetrics, "traction"),
                (Traction, "traction"),
                (UserCustomer, "traction"),
                (CustomerReference, "execution"),
                (TechnologyIp, "product"),
                (Fundraising, "execution"),
            ]
            .into_iter()
            .map(|(c, d)| (c, d.to_string()))
            .collect(),
        )
    }
}

impl CategoryDimensionMap {
    pub fn new(mapping: impl IntoIterator<Item = (ClaimCategory, Dimension)>) -> Self {
        Self(mapping.into_iter().collect())
    }

    pub fn dimension_for(&self, category: ClaimCategory) -> Option<&str> {
        self.0.get(&category).map(String::as_str)
    }
}

/// Everything the overall scorer needs to weigh categories.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub categories: CategoryWeights,
    pub dimensions: WeightSet,
    pub mapping: CategoryDimensionMap,
}

impl ScoringWeights {
    pub fn with_dimensions(dimensions: WeightSet) -> Self {
        Self {
            dimensions,
            ..Self::default()
        }
    }

    /// Category weight scaled by the learned weight of its mapped dimension.
    pub fn effective(&self, category: ClaimCategory) -> f64 {
        let dim = self
            .mapping
            .dimension_for(category)
            .map(|d| self.dimensions.get(d))
            .unwrap_or(DEFAULT_WEIGHT);
        self.categories.get(category) * dim
    }
}
