use geo::{Geometry, Point, Polygon, polygon, line_string};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use urbanlens::spatial::approximate_circle;
use urbanlens::{
    Config, Feature, Lens, LensAnalyzer, MILES_TO_KM, PointIndex, TransitFeatureSets,
};

const CENTER: (f64, f64) = (-74.0, 40.7);

fn center() -> Point {
    Point::new(CENTER.0, CENTER.1)
}

fn lens(radius_miles: f64) -> Lens {
    Lens::new(
        center(),
        radius_miles,
        approximate_circle(&center(), radius_miles * MILES_TO_KM, 64),
    )
}

fn props(entries: &[(&str, Value)]) -> Map<String, Value> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

fn dot(lon: f64, lat: f64, entries: &[(&str, Value)]) -> Arc<Feature> {
    Arc::new(Feature::new(
        Geometry::Point(Point::new(lon, lat)),
        props(entries),
    ))
}

fn parcel(lon: f64, lat: f64, entries: &[(&str, Value)]) -> Arc<Feature> {
    let d = 0.0005;
    let polygon: Polygon = polygon![
        (x: lon - d, y: lat - d),
        (x: lon + d, y: lat - d),
        (x: lon + d, y: lat + d),
        (x: lon - d, y: lat + d),
    ];
    Arc::new(Feature::new(Geometry::Polygon(polygon), props(entries)))
}

#[test]
fn test_land_use_single_parcel_scenario() {
    let analyzer = LensAnalyzer::new();
    let parcels = vec![parcel(
        CENTER.0,
        CENTER.1,
        &[("BBL", json!("1000470001")), ("LandUse", json!("01")), ("LotArea", json!(10000.0))],
    )];

    let stats = analyzer.land_use(&parcels, &lens(0.5)).unwrap();
    assert_eq!(stats.count, 1);
    assert!((stats.area_acres - 2.47105).abs() < 1e-6);
    assert!((stats.breakdown["1"] - 2.47105).abs() < 1e-6);
    assert_eq!(stats.entropy, 0.0);
}

#[test]
fn test_land_use_dedup_idempotence() {
    let analyzer = LensAnalyzer::new();
    let feature = parcel(
        CENTER.0,
        CENTER.1,
        &[("BBL", json!("3001230045")), ("LandUse", json!("2")), ("LotArea", json!(4000.0))],
    );

    let once = analyzer
        .land_use(std::slice::from_ref(&feature), &lens(0.5))
        .unwrap();
    let duplicated = analyzer
        .land_use(
            &[Arc::clone(&feature), Arc::clone(&feature), feature],
            &lens(0.5),
        )
        .unwrap();

    assert_eq!(once, duplicated);
}

#[test]
fn test_demographics_two_point_scenario() {
    let analyzer = LensAnalyzer::new();
    let dots = vec![
        dot(-74.0005, 40.7, &[("pop_est", json!(100)), ("ethnicity", json!("A"))]),
        dot(-73.9995, 40.7, &[("pop_est", json!(100)), ("ethnicity", json!("B"))]),
    ];

    let stats = analyzer.demographics(&dots, &lens(1.0)).unwrap();
    assert_eq!(stats.total_people, 200.0);
    assert!((stats.diversity_index - 0.5).abs() < 1e-12);
    assert_eq!(stats.ethnicity_breakdown["A"], 100.0);
    assert_eq!(stats.ethnicity_breakdown["B"], 100.0);
}

#[test]
fn test_demographics_through_built_index() {
    let analyzer = LensAnalyzer::new();
    let mut dots_in_grid = Vec::new();
    for i in 0..30 {
        for j in 0..30 {
            dots_in_grid.push(dot(
                -74.015 + i as f64 * 0.001,
                40.685 + j as f64 * 0.001,
                &[("pop_est", json!(3))],
            ));
        }
    }
    let indexed = analyzer.build_demographics_index(dots_in_grid.clone());
    assert_eq!(indexed, 900);

    let with_index = analyzer.demographics(&[], &lens(0.5)).unwrap();
    assert!(with_index.total_people > 0.0);

    // The index prefilter plus exact distance keeps only true in-radius
    // population; a direct scan with the same exact filter can only ever
    // see more candidates, never fewer matches than the indexed run.
    analyzer.clear_demographics_index();
    let scanned = analyzer.demographics(&dots_in_grid, &lens(0.5)).unwrap();
    assert!(with_index.total_people <= scanned.total_people);
}

#[test]
fn test_demographics_radius_monotonicity() {
    let analyzer = LensAnalyzer::new();
    let mut dots_along_avenue = Vec::new();
    for i in 0..50 {
        dots_along_avenue.push(dot(
            -74.0 + i as f64 * 0.0015,
            40.7,
            &[("pop_est", json!(4))],
        ));
    }

    let mut previous = 0.0;
    for radius in [0.1, 0.25, 0.5, 1.0, 2.0, 5.0] {
        let stats = analyzer
            .demographics(&dots_along_avenue, &lens(radius))
            .unwrap();
        assert!(stats.total_people >= previous);
        previous = stats.total_people;
    }
}

#[test]
fn test_index_query_superset_of_true_membership() {
    let mut features = Vec::new();
    for i in 0..60 {
        for j in 0..60 {
            features.push(dot(-74.03 + i as f64 * 0.001, 40.67 + j as f64 * 0.001, &[]));
        }
    }
    let index = PointIndex::bulk_load(features.clone());

    let query = geo::Rect::new(
        geo::coord! { x: -74.01, y: 40.69 },
        geo::coord! { x: -73.99, y: 40.71 },
    );
    let hits = index.query_box(&query);

    for feature in &features {
        let p = feature.point().unwrap();
        let inside =
            p.x() >= -74.01 && p.x() <= -73.99 && p.y() >= 40.69 && p.y() <= 40.71;
        if inside {
            assert!(
                hits.iter().any(|h| h.point() == Some(p)),
                "index dropped point {:?} inside the query box",
                p
            );
        }
    }
}

#[test]
fn test_transit_subway_scenario() {
    let analyzer = LensAnalyzer::new();
    let sets = TransitFeatureSets {
        subway_stations: vec![dot(-74.0005, 40.7, &[("trains", json!("A C E"))])],
        ..Default::default()
    };

    let stats = analyzer.transit(&sets, &lens(0.5)).unwrap();
    assert_eq!(stats.subway_station_count, 1);
    assert_eq!(stats.subway_lines, vec!["A", "C", "E"]);
}

#[test]
fn test_transit_full_feature_sets() {
    let analyzer = LensAnalyzer::new();
    let track = |entries: &[(&str, Value)]| -> Arc<Feature> {
        Arc::new(Feature::new(
            Geometry::LineString(line_string![
                (x: -74.02, y: 40.69),
                (x: -73.98, y: 40.71),
            ]),
            props(entries),
        ))
    };

    let sets = TransitFeatureSets {
        subway_stations: vec![
            dot(-74.0005, 40.7, &[("trains", json!("A C"))]),
            dot(-73.9995, 40.7005, &[("lines", json!("4 5 6"))]),
        ],
        subway_tracks: vec![track(&[("route_id", json!("L"))])],
        rail_stations: vec![dot(-74.0, 40.7005, &[("layer", json!("mnr-stations"))])],
        rail_tracks: vec![track(&[("layer", json!("amtrak-tracks"))])],
        bus_stops: vec![
            dot(-74.0002, 40.7, &[]),
            dot(-73.9998, 40.7, &[]),
            dot(-73.9, 40.7, &[]), // ~8km out
        ],
        bus_routes: vec![
            track(&[("route_id", json!("B41"))]),
            track(&[("route_short_name", json!("9"))]),
            track(&[("ref", json!("10"))]),
        ],
    };

    let stats = analyzer.transit(&sets, &lens(0.5)).unwrap();
    assert_eq!(stats.subway_station_count, 2);
    assert_eq!(stats.subway_lines, vec!["4", "5", "6", "A", "C", "L"]);
    assert_eq!(stats.rail_station_count, 1);
    assert_eq!(stats.rail_lines, vec!["Amtrak", "Metro-North"]);
    assert_eq!(stats.bus_stop_count, 2);
    assert_eq!(stats.bus_lines, vec!["9", "10", "B41"]);
}

#[test]
fn test_transit_line_order_deterministic() {
    let analyzer = LensAnalyzer::new();
    let mut stations = vec![
        dot(-74.0005, 40.7, &[("trains", json!("E"))]),
        dot(-73.9995, 40.7, &[("trains", json!("A"))]),
        dot(-74.0, 40.7005, &[("trains", json!("C"))]),
    ];

    let forward = analyzer
        .transit(
            &TransitFeatureSets {
                subway_stations: stations.clone(),
                ..Default::default()
            },
            &lens(0.5),
        )
        .unwrap();

    stations.reverse();
    let reversed = analyzer
        .transit(
            &TransitFeatureSets {
                subway_stations: stations,
                ..Default::default()
            },
            &lens(0.5),
        )
        .unwrap();

    assert_eq!(forward.subway_lines, vec!["A", "C", "E"]);
    assert_eq!(forward.subway_lines, reversed.subway_lines);
}

#[test]
fn test_all_aggregators_handle_empty_inputs() {
    let analyzer = LensAnalyzer::new();
    let lens = lens(1.0);

    let land_use = analyzer.land_use(&[], &lens).unwrap();
    assert_eq!(land_use.count, 0);
    assert_eq!(land_use.entropy, 0.0);

    let demographics = analyzer.demographics(&[], &lens).unwrap();
    assert_eq!(demographics.total_people, 0.0);
    assert_eq!(demographics.diversity_index, 0.0);
    assert_eq!(demographics.percent_female, 0.0);
    assert_eq!(demographics.age_breakdown.len(), 5);

    let transit = analyzer
        .transit(&TransitFeatureSets::default(), &lens)
        .unwrap();
    assert_eq!(transit.subway_station_count, 0);
    assert!(transit.bus_lines.is_empty());
}

#[test]
fn test_bounded_metrics_across_mixed_inputs() {
    let analyzer = LensAnalyzer::new();

    let mut parcels = Vec::new();
    let mut dots_mixed = Vec::new();
    for i in 0..25 {
        parcels.push(parcel(
            -74.0 + (i % 5) as f64 * 0.001,
            40.7 + (i / 5) as f64 * 0.001,
            &[
                ("BBL", json!(format!("bbl-{}", i))),
                ("LandUse", json!(format!("{}", (i % 11) + 1))),
                ("LotArea", json!(500.0 + i as f64 * 321.0)),
            ],
        ));
        dots_mixed.push(dot(
            -74.0 + (i % 5) as f64 * 0.001,
            40.7 + (i / 5) as f64 * 0.001,
            &[
                ("pop_est", json!(1 + i % 7)),
                ("ethnicity", json!(format!("group-{}", i % 4))),
                ("sex", json!(if i % 3 == 0 { "Female" } else { "Male" })),
                ("age_group", json!(["0-4", "5-17", "18-34", "35-59", "60+"][i % 5])),
            ],
        ));
    }

    let land_use = analyzer.land_use(&parcels, &lens(1.0)).unwrap();
    assert!(land_use.entropy >= 0.0 && land_use.entropy <= 1.0);

    let demographics = analyzer.demographics(&dots_mixed, &lens(1.0)).unwrap();
    assert!(demographics.diversity_index >= 0.0 && demographics.diversity_index <= 1.0);
    assert!(demographics.percent_female >= 0.0 && demographics.percent_female <= 100.0);
}

#[test]
fn test_custom_config_round_trip_through_analyzer() {
    let config = Config::default()
        .with_bbox_degrees_per_mile(1.0 / 50.0)
        .with_land_use_categories(8);
    let analyzer = LensAnalyzer::with_config(config.clone()).unwrap();
    assert_eq!(analyzer.config(), &config);

    // Entropy normalization follows the configured category count.
    let parcels = vec![
        parcel(CENTER.0, CENTER.1, &[("BBL", json!("1")), ("LandUse", json!("1")), ("LotArea", json!(1000.0))]),
        parcel(-74.001, CENTER.1, &[("BBL", json!("2")), ("LandUse", json!("2")), ("LotArea", json!(1000.0))]),
    ];
    let stats = analyzer.land_use(&parcels, &lens(0.5)).unwrap();
    let expected = (2.0_f64).ln() / (8.0_f64).ln();
    assert!((stats.entropy - expected).abs() < 1e-9);
}
