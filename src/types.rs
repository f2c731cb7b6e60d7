//! Shared types and configuration for the analytics engine.
//!
//! This module provides the lens parameters, the fixed demographic age
//! cohorts, the transit feature-set grouping, and a small serializable
//! configuration for the empirical constants the aggregators depend on.

use crate::error::{LensError, Result};
use crate::feature::Feature;
use geo::{Point, Polygon};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Kilometers per statute mile.
pub const MILES_TO_KM: f64 = 1.60934;

/// Acres per square meter.
pub const SQUARE_METERS_TO_ACRES: f64 = 0.000247105;

/// Tunable analysis parameters.
///
/// The defaults reproduce the constants the engine was originally calibrated
/// with for a mid-latitude dataset. They are configuration rather than
/// hard-coded values because two of them are empirical and tied to the
/// latitude band of the source data.
///
/// # Example
///
/// ```rust
/// use urbanlens::Config;
///
/// let config = Config::default();
/// assert_eq!(config.acres_per_square_mile, 640.0);
///
/// let json = r#"{ "land_use_categories": 8 }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.land_use_categories, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Degrees of latitude/longitude per mile used to size the bounding-box
    /// prefilter in the demographics aggregator.
    ///
    /// The default (1/60) is a coarse equirectangular approximation valid at
    /// mid-latitudes. At high latitudes the box under-covers in longitude;
    /// this is a known approximation of the prefilter, and the exact
    /// distance filter still runs on every candidate it returns.
    #[serde(default = "Config::default_bbox_degrees_per_mile")]
    pub bbox_degrees_per_mile: f64,

    /// Acres per square mile, used to derive people-per-acre density.
    #[serde(default = "Config::default_acres_per_square_mile")]
    pub acres_per_square_mile: f64,

    /// Number of recognized land-use categories; normalizes the land-use
    /// entropy measure into `[0, 1]`.
    #[serde(default = "Config::default_land_use_categories")]
    pub land_use_categories: usize,
}

impl Config {
    fn default_bbox_degrees_per_mile() -> f64 {
        1.0 / 60.0
    }

    const fn default_acres_per_square_mile() -> f64 {
        640.0
    }

    const fn default_land_use_categories() -> usize {
        11
    }

    pub fn with_bbox_degrees_per_mile(mut self, degrees: f64) -> Self {
        self.bbox_degrees_per_mile = degrees;
        self
    }

    pub fn with_acres_per_square_mile(mut self, acres: f64) -> Self {
        self.acres_per_square_mile = acres;
        self
    }

    pub fn with_land_use_categories(mut self, categories: usize) -> Self {
        self.land_use_categories = categories;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !self.bbox_degrees_per_mile.is_finite() || self.bbox_degrees_per_mile <= 0.0 {
            return Err(LensError::InvalidConfig(format!(
                "bbox_degrees_per_mile must be positive and finite, got: {}",
                self.bbox_degrees_per_mile
            )));
        }

        if !self.acres_per_square_mile.is_finite() || self.acres_per_square_mile <= 0.0 {
            return Err(LensError::InvalidConfig(format!(
                "acres_per_square_mile must be positive and finite, got: {}",
                self.acres_per_square_mile
            )));
        }

        if self.land_use_categories < 2 {
            return Err(LensError::InvalidConfig(format!(
                "land_use_categories must be at least 2, got: {}",
                self.land_use_categories
            )));
        }

        Ok(())
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bbox_degrees_per_mile: Self::default_bbox_degrees_per_mile(),
            acres_per_square_mile: Self::default_acres_per_square_mile(),
            land_use_categories: Self::default_land_use_categories(),
        }
    }
}

/// The movable region of interest driving all aggregations.
///
/// The polygon is an approximate circle used for intersection tests against
/// polygon features; the radius is used for exact distance tests against
/// point features. Invariant: `radius_miles > 0` (enforced by the
/// aggregators via lens validation).
#[derive(Debug, Clone, PartialEq)]
pub struct Lens {
    /// Lens center in longitude/latitude degrees.
    pub center: Point,
    /// Lens radius in statute miles.
    pub radius_miles: f64,
    /// Polygonal outline of the lens.
    pub polygon: Polygon,
}

impl Lens {
    pub fn new(center: Point, radius_miles: f64, polygon: Polygon) -> Self {
        Self {
            center,
            radius_miles,
            polygon,
        }
    }

    /// Lens radius converted to kilometers.
    pub fn radius_km(&self) -> f64 {
        self.radius_miles * MILES_TO_KM
    }
}

/// Fixed age cohorts used by the demographics breakdown.
///
/// Source data labels cohorts with the strings `0-4`, `5-17`, `18-34`,
/// `35-59`, and `60+`; anything else is dropped from the age breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AgeBucket {
    #[serde(rename = "0-4")]
    Under5,
    #[serde(rename = "5-17")]
    Age5To17,
    #[serde(rename = "18-34")]
    Age18To34,
    #[serde(rename = "35-59")]
    Age35To59,
    #[serde(rename = "60+")]
    Age60Plus,
}

impl AgeBucket {
    /// Every cohort, in ascending age order.
    pub const ALL: [AgeBucket; 5] = [
        AgeBucket::Under5,
        AgeBucket::Age5To17,
        AgeBucket::Age18To34,
        AgeBucket::Age35To59,
        AgeBucket::Age60Plus,
    ];

    /// Parse a source-data cohort label.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "0-4" => Some(AgeBucket::Under5),
            "5-17" => Some(AgeBucket::Age5To17),
            "18-34" => Some(AgeBucket::Age18To34),
            "35-59" => Some(AgeBucket::Age35To59),
            "60+" => Some(AgeBucket::Age60Plus),
            _ => None,
        }
    }

    /// The cohort's source-data label.
    pub fn label(&self) -> &'static str {
        match self {
            AgeBucket::Under5 => "0-4",
            AgeBucket::Age5To17 => "5-17",
            AgeBucket::Age18To34 => "18-34",
            AgeBucket::Age35To59 => "35-59",
            AgeBucket::Age60Plus => "60+",
        }
    }
}

impl std::fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Feature collections consumed by the transit aggregator, one per layer.
///
/// Station and stop collections are expected to hold point features; track
/// and route collections hold linear features whose line identity is read
/// regardless of distance to the lens.
#[derive(Debug, Clone, Default)]
pub struct TransitFeatureSets {
    pub subway_stations: Vec<Arc<Feature>>,
    pub subway_tracks: Vec<Arc<Feature>>,
    pub rail_stations: Vec<Arc<Feature>>,
    pub rail_tracks: Vec<Arc<Feature>>,
    pub bus_stops: Vec<Arc<Feature>>,
    pub bus_routes: Vec<Arc<Feature>>,
}
