//! Geospatial features and property access rules.
//!
//! Features arrive already decoded from whatever storage format the caller
//! uses: a geometry plus a free-form property map. Aggregators never reach
//! into the map directly; they go through the accessor helpers here, which
//! implement the explicit ordered-fallback semantics the engine relies on.

use geo::{Geometry, Point};
use serde_json::{Map, Value};

/// A single geospatial feature: geometry plus free-form properties.
///
/// Features are shared as `Arc<Feature>` between the caller, the spatial
/// index, and aggregation results; they are never deep-copied.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Explicit feature identifier, when the source data carries one.
    pub id: Option<String>,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self {
            id: None,
            geometry,
            properties,
        }
    }

    pub fn with_id(id: impl Into<String>, geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self {
            id: Some(id.into()),
            geometry,
            properties,
        }
    }

    /// Zero-valued point feature used where the R-tree needs a placeholder.
    pub(crate) fn placeholder() -> Self {
        Self {
            id: None,
            geometry: Geometry::Point(Point::new(0.0, 0.0)),
            properties: Map::new(),
        }
    }

    /// The feature's coordinates when its geometry is a point.
    pub fn point(&self) -> Option<Point> {
        match &self.geometry {
            Geometry::Point(point) => Some(*point),
            _ => None,
        }
    }

    /// String property value. Empty strings are treated as absent.
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Numeric property value; numeric strings are parsed.
    pub fn prop_f64(&self, key: &str) -> Option<f64> {
        match self.properties.get(key)? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// First present (non-empty) string among `keys`, evaluated in order.
    pub fn first_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.prop_str(key))
    }

    /// Resolve this feature's dedup identity via the first rule in `rules`
    /// that yields a value. `None` means the feature has no resolvable
    /// identity and is treated as unique.
    pub fn dedup_key(&self, rules: &[KeyRule]) -> Option<FeatureKey> {
        for rule in rules {
            match rule {
                KeyRule::ExplicitId => {
                    if let Some(id) = &self.id {
                        return Some(FeatureKey::Id(id.clone()));
                    }
                }
                KeyRule::Property(key) => match self.properties.get(*key) {
                    Some(Value::String(text)) if !text.is_empty() => {
                        return Some(FeatureKey::Text(text.clone()));
                    }
                    Some(Value::Number(number)) => {
                        if let Some(value) = number.as_f64() {
                            return Some(FeatureKey::Bits(value.to_bits()));
                        }
                    }
                    _ => {}
                },
            }
        }
        None
    }
}

/// One step of an identity resolution chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRule {
    /// Use the feature's explicit id.
    ExplicitId,
    /// Use a named property, string or numeric.
    Property(&'static str),
}

/// Identity rules for parcel-style polygon features: the explicit feature
/// id, then the parcel identifier, then the parcel lot area.
pub const PARCEL_KEY_RULES: &[KeyRule] = &[
    KeyRule::ExplicitId,
    KeyRule::Property("BBL"),
    KeyRule::Property("LotArea"),
];

/// Resolved dedup identity for a feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    /// Explicit feature id.
    Id(String),
    /// String-valued property.
    Text(String),
    /// Bit pattern of a numeric property, so f64 values can be hashed.
    Bits(u64),
}
