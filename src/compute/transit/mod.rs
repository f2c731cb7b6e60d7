//! Transit connectivity within the lens.
//!
//! Stations and stops are filtered by exact distance to the lens center.
//! Track and route features are linear, so distance-to-point tests do not
//! apply to them; their line identity contributes by dataset membership.

mod lines;

use crate::compute::validation;
use crate::error::Result;
use crate::feature::Feature;
use crate::spatial;
use crate::types::{MILES_TO_KM, TransitFeatureSets};
use geo::Point;
use rustc_hash::FxHashSet;
use serde::Serialize;

/// Transit counts and line sets for one lens position.
///
/// Line vectors are deduplicated and sorted: subway and rail
/// lexicographically, bus with a numeric-aware natural order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct TransitStats {
    pub subway_station_count: usize,
    pub rail_station_count: usize,
    pub bus_stop_count: usize,
    pub subway_lines: Vec<String>,
    pub rail_lines: Vec<String>,
    pub bus_lines: Vec<String>,
}

/// Compute transit connectivity statistics around the lens center.
pub fn calculate(
    sets: &TransitFeatureSets,
    center: &Point,
    radius_miles: f64,
) -> Result<TransitStats> {
    validation::validate_geographic_point(center)?;
    validation::validate_radius_miles(radius_miles)?;

    let radius_km = radius_miles * MILES_TO_KM;

    // Subway: stations yield tokenized line codes, tracks a direct field.
    let mut subway_lines: FxHashSet<String> = FxHashSet::default();
    let mut subway_station_count = 0;
    for station in &sets.subway_stations {
        if !within_radius(station, center, radius_km) {
            continue;
        }
        subway_station_count += 1;
        if let Some(text) = station.first_str(lines::SUBWAY_STATION_FIELDS) {
            for token in lines::subway_line_tokens(text) {
                subway_lines.insert(token.to_string());
            }
        }
    }
    for track in &sets.subway_tracks {
        if let Some(line) = track.first_str(lines::SUBWAY_TRACK_FIELDS) {
            subway_lines.insert(line.to_string());
        }
    }

    // Rail: agency inferred from the provider's layer identifier.
    let mut rail_lines: FxHashSet<String> = FxHashSet::default();
    let mut rail_station_count = 0;
    for station in &sets.rail_stations {
        if !within_radius(station, center, radius_km) {
            continue;
        }
        rail_station_count += 1;
        if let Some(agency) = rail_agency_of(station) {
            rail_lines.insert(agency.to_string());
        }
    }
    for track in &sets.rail_tracks {
        if let Some(agency) = rail_agency_of(track) {
            rail_lines.insert(agency.to_string());
        }
    }

    // Bus: stops are counted only; route names come from line features.
    let bus_stop_count = sets
        .bus_stops
        .iter()
        .filter(|stop| within_radius(stop, center, radius_km))
        .count();

    let mut bus_lines: FxHashSet<String> = FxHashSet::default();
    for route in &sets.bus_routes {
        if let Some(name) = route
            .first_str(lines::BUS_ROUTE_FIELDS)
            .and_then(lines::bus_route_name)
        {
            bus_lines.insert(name);
        }
    }

    let mut subway_lines: Vec<String> = subway_lines.into_iter().collect();
    subway_lines.sort();
    let mut rail_lines: Vec<String> = rail_lines.into_iter().collect();
    rail_lines.sort();
    let mut bus_lines: Vec<String> = bus_lines.into_iter().collect();
    bus_lines.sort_by(|a, b| lines::natural_cmp(a, b));

    Ok(TransitStats {
        subway_station_count,
        rail_station_count,
        bus_stop_count,
        subway_lines,
        rail_lines,
        bus_lines,
    })
}

fn within_radius(feature: &Feature, center: &Point, radius_km: f64) -> bool {
    match feature.point() {
        Some(point) => spatial::distance_km(center, &point) <= radius_km,
        None => false,
    }
}

fn rail_agency_of(feature: &Feature) -> Option<&'static str> {
    feature
        .first_str(lines::RAIL_LAYER_FIELDS)
        .and_then(lines::rail_agency)
}
