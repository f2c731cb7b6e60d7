//! Spatial indexing and aggregation engine for movable region-of-interest
//! ("lens") analytics over point/polygon geospatial datasets: land-use
//! composition, demographic makeup, and transit connectivity.
//!
//! ```rust
//! use std::sync::Arc;
//! use geo::{Geometry, Point};
//! use serde_json::json;
//! use urbanlens::{Feature, Lens, LensAnalyzer, MILES_TO_KM};
//! use urbanlens::spatial::approximate_circle;
//!
//! let analyzer = LensAnalyzer::new();
//! let center = Point::new(-73.9857, 40.7484);
//!
//! let dot = Arc::new(Feature::new(
//!     Geometry::Point(Point::new(-73.9851, 40.7480)),
//!     [("pop_est".to_string(), json!(25))].into_iter().collect(),
//! ));
//! analyzer.build_demographics_index(vec![Arc::clone(&dot)]);
//!
//! let lens = Lens::new(center, 0.5, approximate_circle(&center, 0.5 * MILES_TO_KM, 64));
//! let stats = analyzer.demographics(&[], &lens)?;
//! assert_eq!(stats.total_people, 25.0);
//! # Ok::<(), urbanlens::LensError>(())
//! ```

pub mod analyzer;
pub mod compute;
pub mod error;
pub mod feature;
pub mod spatial;
pub mod spatial_index;
pub mod types;

pub use analyzer::LensAnalyzer;
pub use error::{LensError, Result};

pub use feature::{Feature, FeatureKey, KeyRule, PARCEL_KEY_RULES};

pub use geo::{Geometry, Point, Polygon, Rect};

pub use spatial::{DistanceMetric, distance_between, distance_km};

pub use spatial_index::{PointIndex, SharedPointIndex};

pub use types::{
    AgeBucket, Config, Lens, MILES_TO_KM, SQUARE_METERS_TO_ACRES, TransitFeatureSets,
};

pub use compute::demographics::DemographicsStats;
pub use compute::land_use::LandUseStats;
pub use compute::transit::TransitStats;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{LensAnalyzer, LensError, Result};

    pub use geo::{Geometry, Point, Polygon, Rect};

    pub use crate::spatial::{DistanceMetric, distance_between, distance_km};

    pub use crate::{AgeBucket, Config, Feature, Lens, TransitFeatureSets};

    pub use crate::{DemographicsStats, LandUseStats, TransitStats};

    pub use crate::{PointIndex, SharedPointIndex};

    pub use std::sync::Arc;
}
