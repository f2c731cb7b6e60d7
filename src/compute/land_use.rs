//! Land-use composition within the lens.
//!
//! A single pass over the parcel features: deduplicate, intersect with the
//! lens polygon, bucket by normalized land-use code, and accumulate acreage.
//! The category distribution is summarized by a Shannon entropy measure
//! normalized into `[0, 1]` by the log of the recognized category count.

use crate::compute::validation;
use crate::error::Result;
use crate::feature::{Feature, PARCEL_KEY_RULES};
use crate::spatial;
use crate::types::{Config, Lens, SQUARE_METERS_TO_ACRES};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Land-use composition summary for one lens position.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct LandUseStats {
    /// Number of distinct features intersecting the lens.
    pub count: usize,
    /// Total bucketed area in acres.
    pub area_acres: f64,
    /// Acres per normalized land-use code.
    pub breakdown: BTreeMap<String, f64>,
    /// Normalized Shannon entropy of the category distribution, in `[0, 1]`.
    pub entropy: f64,
}

/// Compute land-use statistics for the features intersecting the lens.
///
/// Features are deduplicated by the parcel identity chain (explicit id,
/// parcel identifier, lot area). Features whose land-use code is missing or
/// unparsable still count toward `count` but contribute no area.
pub fn calculate(features: &[Arc<Feature>], lens: &Lens, config: &Config) -> Result<LandUseStats> {
    validation::validate_lens(lens)?;

    let mut seen = FxHashSet::default();
    let mut breakdown: BTreeMap<String, f64> = BTreeMap::new();
    let mut total_area = 0.0;
    let mut count = 0usize;

    for feature in features {
        let key = feature.dedup_key(PARCEL_KEY_RULES);
        if let Some(key) = &key {
            if seen.contains(key) {
                continue;
            }
        }

        if !spatial::intersects(&feature.geometry, &lens.polygon) {
            continue;
        }

        if let Some(key) = key {
            seen.insert(key);
        }
        count += 1;

        let Some(code) = feature.prop_str("LandUse").and_then(normalize_code) else {
            continue;
        };

        let square_meters = feature
            .prop_f64("LotArea")
            .unwrap_or_else(|| spatial::geometry_area_sqm(&feature.geometry));
        let acres = square_meters * SQUARE_METERS_TO_ACRES;

        *breakdown.entry(code).or_insert(0.0) += acres;
        total_area += acres;
    }

    let entropy = normalized_entropy(&breakdown, total_area, config.land_use_categories);

    Ok(LandUseStats {
        count,
        area_acres: total_area,
        breakdown,
        entropy,
    })
}

/// Normalize a raw land-use code to a small integer string by parsing the
/// leading numeric token: `"01 "` becomes `"1"`. Codes with no leading
/// digits are excluded.
fn normalize_code(raw: &str) -> Option<String> {
    let digits: &str = {
        let trimmed = raw.trim_start();
        let end = trimmed
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    };

    if digits.is_empty() {
        return None;
    }

    let stripped = digits.trim_start_matches('0');
    if stripped.is_empty() {
        Some("0".to_string())
    } else {
        Some(stripped.to_string())
    }
}

/// Shannon entropy of the area distribution, normalized by `ln(categories)`.
/// Zero when no area has been bucketed.
fn normalized_entropy(breakdown: &BTreeMap<String, f64>, total: f64, categories: usize) -> f64 {
    if total <= 0.0 || categories < 2 {
        return 0.0;
    }

    let h: f64 = breakdown
        .values()
        .filter(|area| **area > 0.0)
        .map(|area| {
            let p = area / total;
            -p * p.ln()
        })
        .sum();

    h / (categories as f64).ln()
}
