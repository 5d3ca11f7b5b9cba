//! Longitude convention handling.

/// Bring a longitude into the archive's [0, 360) convention.
///
/// Equivalent to `(lon + 360) mod 360` for any finite input; values already
/// in [0, 360) are returned unchanged.
pub fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = lon % 360.0;
    let wrapped = if wrapped < 0.0 { wrapped + 360.0 } else { wrapped };
    // Tiny negatives round up to 360; adding 0.0 turns -0.0 into 0.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped + 0.0
    }
}

/// Check that a (lat, lon) pair can be looked up.
pub fn validate_location(lat: f64, lon: f64) -> Result<(), String> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(format!("location ({}, {}) must be finite", lat, lon));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {} outside [-90, 90]", lat));
    }
    Ok(())
}
