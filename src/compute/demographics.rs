//! Population makeup within the lens radius.
//!
//! Two-phase filter: an optional bounding-box prefilter through the point
//! index, then an exact Haversine distance test. Index queries are box
//! shaped and cheap; exact circular membership needs geometry distance,
//! which is expensive to run against the full dataset.

use crate::compute::validation;
use crate::error::Result;
use crate::feature::Feature;
use crate::spatial;
use crate::spatial_index::PointIndex;
use crate::types::{AgeBucket, Config, MILES_TO_KM};
use geo::{Point, Rect};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Population summary for one lens position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicsStats {
    /// Population within the radius.
    pub total_people: f64,
    /// People per acre over the lens disc.
    pub density_per_acre: f64,
    /// Population per ethnicity label.
    pub ethnicity_breakdown: BTreeMap<String, f64>,
    /// Simpson diversity index complement, in `[0, 1]`.
    pub diversity_index: f64,
    /// Share of female population, in `[0, 100]`.
    pub percent_female: f64,
    /// Population per age cohort; every cohort is always present.
    pub age_breakdown: BTreeMap<AgeBucket, f64>,
}

impl Default for DemographicsStats {
    fn default() -> Self {
        Self {
            total_people: 0.0,
            density_per_acre: 0.0,
            ethnicity_breakdown: BTreeMap::new(),
            diversity_index: 0.0,
            percent_female: 0.0,
            age_breakdown: zeroed_age_breakdown(),
        }
    }
}

fn zeroed_age_breakdown() -> BTreeMap<AgeBucket, f64> {
    AgeBucket::ALL.iter().map(|bucket| (*bucket, 0.0)).collect()
}

/// Compute demographic statistics for points within the lens radius.
///
/// When `index` is present, candidates are prefiltered with a degree-space
/// bounding box sized by `config.bbox_degrees_per_mile`; otherwise the full
/// input slice is scanned. Either way every candidate passes an exact
/// Haversine distance test before it contributes.
///
/// Per kept point, the population weight is `pop_est` (1 when absent),
/// ethnicity defaults to `"Other"`, and unrecognized age labels are dropped.
pub fn calculate(
    features: &[Arc<Feature>],
    index: Option<&PointIndex>,
    center: &Point,
    radius_miles: f64,
    config: &Config,
) -> Result<DemographicsStats> {
    validation::validate_geographic_point(center)?;
    validation::validate_radius_miles(radius_miles)?;

    let candidates: Vec<Arc<Feature>> = match index {
        Some(index) => {
            let delta = radius_miles * config.bbox_degrees_per_mile;
            let query = Rect::new(
                geo::coord! { x: center.x() - delta, y: center.y() - delta },
                geo::coord! { x: center.x() + delta, y: center.y() + delta },
            );
            index.query_box(&query)
        }
        None => features.to_vec(),
    };

    let radius_km = radius_miles * MILES_TO_KM;
    let mut total_people = 0.0;
    let mut female_count = 0.0;
    let mut ethnicity_breakdown: BTreeMap<String, f64> = BTreeMap::new();
    let mut age_breakdown = zeroed_age_breakdown();

    for feature in &candidates {
        let Some(point) = feature.point() else {
            continue;
        };
        if spatial::distance_km(center, &point) > radius_km {
            continue;
        }

        let pop = feature.prop_f64("pop_est").unwrap_or(1.0);
        total_people += pop;

        let ethnicity = feature.prop_str("ethnicity").unwrap_or("Other");
        *ethnicity_breakdown.entry(ethnicity.to_string()).or_insert(0.0) += pop;

        if feature.prop_str("sex") == Some("Female") {
            female_count += pop;
        }

        if let Some(bucket) = feature.prop_str("age_group").and_then(AgeBucket::parse) {
            *age_breakdown.entry(bucket).or_insert(0.0) += pop;
        }
    }

    let disc_acres =
        std::f64::consts::PI * radius_miles * radius_miles * config.acres_per_square_mile;

    Ok(DemographicsStats {
        total_people,
        density_per_acre: if disc_acres > 0.0 {
            total_people / disc_acres
        } else {
            0.0
        },
        diversity_index: simpson_diversity(&ethnicity_breakdown, total_people),
        percent_female: if total_people > 0.0 {
            100.0 * female_count / total_people
        } else {
            0.0
        },
        ethnicity_breakdown,
        age_breakdown,
    })
}

/// Simpson's diversity index complement: `1 - Σ share²`.
/// Zero when the population is empty or homogeneous.
fn simpson_diversity(breakdown: &BTreeMap<String, f64>, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }

    let sum_squares: f64 = breakdown
        .values()
        .map(|count| {
            let share = count / total;
            share * share
        })
        .sum();

    1.0 - sum_squares
}
