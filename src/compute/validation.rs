//! Validation for lens parameters and geographic coordinates.

use crate::error::{LensError, Result};
use crate::types::Lens;
use geo::Point;

/// Validates a point has valid longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use geo::Point;
/// use urbanlens::compute::validation::validate_geographic_point;
///
/// let nyc = Point::new(-74.0060, 40.7128);
/// assert!(validate_geographic_point(&nyc).is_ok());
///
/// let invalid = Point::new(200.0, 40.0);
/// assert!(validate_geographic_point(&invalid).is_err());
/// ```
pub fn validate_geographic_point(point: &Point) -> Result<()> {
    let (x, y) = (point.x(), point.y());

    if !x.is_finite() {
        return Err(LensError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            x
        )));
    }

    if !y.is_finite() {
        return Err(LensError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            y
        )));
    }

    if !(-180.0..=180.0).contains(&x) {
        return Err(LensError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            x
        )));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(LensError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            y
        )));
    }

    Ok(())
}

/// Validates a lens radius: positive and finite.
pub fn validate_radius_miles(radius_miles: f64) -> Result<()> {
    if !radius_miles.is_finite() {
        return Err(LensError::InvalidInput(format!(
            "Lens radius must be finite, got: {}",
            radius_miles
        )));
    }

    if radius_miles <= 0.0 {
        return Err(LensError::InvalidInput(format!(
            "Lens radius must be positive, got: {}",
            radius_miles
        )));
    }

    Ok(())
}

/// Validates the full lens: center coordinates and radius.
pub fn validate_lens(lens: &Lens) -> Result<()> {
    validate_geographic_point(&lens.center)
        .map_err(|e| LensError::InvalidInput(format!("Lens center: {}", e)))?;
    validate_radius_miles(lens.radius_miles)?;
    Ok(())
}
