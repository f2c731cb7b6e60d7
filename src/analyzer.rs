//! Lens-change entry point combining configuration and the shared index.

use crate::compute::demographics::{self, DemographicsStats};
use crate::compute::land_use::{self, LandUseStats};
use crate::compute::transit::{self, TransitStats};
use crate::error::Result;
use crate::feature::Feature;
use crate::spatial_index::SharedPointIndex;
use crate::types::{Config, Lens, TransitFeatureSets};
use std::sync::Arc;

/// Facade over the three aggregators and the cached demographics index.
///
/// One `LensAnalyzer` lives for the process lifetime of a dataset. The
/// demographics index is rebuilt when data loads (or reloads) and read on
/// every lens change; each aggregation call is synchronous and returns a
/// fresh immutable result record.
///
/// The analyzer is cheaply cloneable; clones share the same index handle.
#[derive(Clone, Default)]
pub struct LensAnalyzer {
    config: Config,
    demographics_index: SharedPointIndex,
}

impl LensAnalyzer {
    /// Create an analyzer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with a validated configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            demographics_index: SharedPointIndex::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Bulk-build the demographics point index, replacing any previous one
    /// atomically. Returns the number of indexed points.
    pub fn build_demographics_index(
        &self,
        features: impl IntoIterator<Item = Arc<Feature>>,
    ) -> usize {
        self.demographics_index.rebuild(features)
    }

    /// Drop the demographics index; subsequent demographics calls fall back
    /// to scanning the input feature slice.
    pub fn clear_demographics_index(&self) {
        self.demographics_index.clear();
    }

    pub fn has_demographics_index(&self) -> bool {
        self.demographics_index.is_built()
    }

    /// Number of points in the current demographics index, zero when none
    /// has been built.
    pub fn demographics_index_len(&self) -> usize {
        self.demographics_index
            .snapshot()
            .map_or(0, |index| index.len())
    }

    /// Land-use composition of the features intersecting the lens polygon.
    pub fn land_use(&self, features: &[Arc<Feature>], lens: &Lens) -> Result<LandUseStats> {
        land_use::calculate(features, lens, &self.config)
    }

    /// Demographic makeup within the lens radius, using the current index
    /// snapshot when one has been built.
    pub fn demographics(
        &self,
        features: &[Arc<Feature>],
        lens: &Lens,
    ) -> Result<DemographicsStats> {
        let snapshot = self.demographics_index.snapshot();
        demographics::calculate(
            features,
            snapshot.as_deref(),
            &lens.center,
            lens.radius_miles,
            &self.config,
        )
    }

    /// Transit connectivity within the lens radius.
    pub fn transit(&self, sets: &TransitFeatureSets, lens: &Lens) -> Result<TransitStats> {
        transit::calculate(sets, &lens.center, lens.radius_miles)
    }
}
