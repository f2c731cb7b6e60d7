use criterion::{Criterion, black_box, criterion_group, criterion_main};
use geo::{Geometry, Point, Polygon, polygon, line_string};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use urbanlens::spatial::approximate_circle;
use urbanlens::{Config, Feature, Lens, MILES_TO_KM, PointIndex, TransitFeatureSets, compute};

const CENTER: (f64, f64) = (-74.0, 40.7);

fn props(entries: &[(&str, Value)]) -> Map<String, Value> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

fn census_dots(count: usize) -> Vec<Arc<Feature>> {
    let side = (count as f64).sqrt().ceil() as usize;
    let mut dots = Vec::with_capacity(count);
    for i in 0..count {
        let (row, col) = (i / side, i % side);
        dots.push(Arc::new(Feature::new(
            Geometry::Point(Point::new(
                CENTER.0 - 0.05 + col as f64 * 0.001,
                CENTER.1 - 0.05 + row as f64 * 0.001,
            )),
            props(&[
                ("pop_est", json!(1 + i % 9)),
                ("ethnicity", json!(format!("group-{}", i % 6))),
                ("sex", json!(if i % 2 == 0 { "Female" } else { "Male" })),
                ("age_group", json!(["0-4", "5-17", "18-34", "35-59", "60+"][i % 5])),
            ]),
        )));
    }
    dots
}

fn parcels(count: usize) -> Vec<Arc<Feature>> {
    let side = (count as f64).sqrt().ceil() as usize;
    let mut features = Vec::with_capacity(count);
    for i in 0..count {
        let (row, col) = (i / side, i % side);
        let lon = CENTER.0 - 0.02 + col as f64 * 0.001;
        let lat = CENTER.1 - 0.02 + row as f64 * 0.001;
        let d = 0.0004;
        let polygon: Polygon = polygon![
            (x: lon - d, y: lat - d),
            (x: lon + d, y: lat - d),
            (x: lon + d, y: lat + d),
            (x: lon - d, y: lat + d),
        ];
        features.push(Arc::new(Feature::new(
            Geometry::Polygon(polygon),
            props(&[
                ("BBL", json!(format!("bbl-{}", i))),
                ("LandUse", json!(format!("{:02}", (i % 11) + 1))),
                ("LotArea", json!(500.0 + (i % 40) as f64 * 100.0)),
            ]),
        )));
    }
    features
}

fn lens(radius_miles: f64) -> Lens {
    let center = Point::new(CENTER.0, CENTER.1);
    Lens::new(
        center,
        radius_miles,
        approximate_circle(&center, radius_miles * MILES_TO_KM, 64),
    )
}

fn benchmark_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("index");

    let dots = census_dots(10_000);
    group.bench_function("bulk_load_10k", |b| {
        b.iter(|| PointIndex::bulk_load(black_box(dots.clone())))
    });

    let index = PointIndex::bulk_load(dots);
    let query = geo::Rect::new(
        geo::coord! { x: CENTER.0 - 0.01, y: CENTER.1 - 0.01 },
        geo::coord! { x: CENTER.0 + 0.01, y: CENTER.1 + 0.01 },
    );
    group.bench_function("query_box_10k", |b| {
        b.iter(|| index.query_box(black_box(&query)))
    });

    group.finish();
}

fn benchmark_aggregators(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregators");
    let config = Config::default();
    let lens = lens(0.5);

    let parcel_features = parcels(2_000);
    group.bench_function("land_use_2k_parcels", |b| {
        b.iter(|| {
            compute::land_use::calculate(black_box(&parcel_features), &lens, &config).unwrap()
        })
    });

    let dots = census_dots(10_000);
    group.bench_function("demographics_10k_full_scan", |b| {
        b.iter(|| {
            compute::demographics::calculate(
                black_box(&dots),
                None,
                &lens.center,
                lens.radius_miles,
                &config,
            )
            .unwrap()
        })
    });

    let index = PointIndex::bulk_load(dots.clone());
    group.bench_function("demographics_10k_indexed", |b| {
        b.iter(|| {
            compute::demographics::calculate(
                &[],
                Some(black_box(&index)),
                &lens.center,
                lens.radius_miles,
                &config,
            )
            .unwrap()
        })
    });

    let sets = TransitFeatureSets {
        subway_stations: census_dots(500),
        bus_stops: census_dots(2_000),
        bus_routes: (0..300)
            .map(|i| {
                Arc::new(Feature::new(
                    Geometry::LineString(line_string![
                        (x: CENTER.0 - 0.05, y: CENTER.1),
                        (x: CENTER.0 + 0.05, y: CENTER.1 + i as f64 * 0.0001),
                    ]),
                    props(&[("route_id", json!(format!("B{}", i)))]),
                ))
            })
            .collect(),
        ..Default::default()
    };
    group.bench_function("transit_mixed_sets", |b| {
        b.iter(|| {
            compute::transit::calculate(black_box(&sets), &lens.center, lens.radius_miles)
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_index, benchmark_aggregators);
criterion_main!(benches);
