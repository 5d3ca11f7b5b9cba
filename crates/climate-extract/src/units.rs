//! Physical unit conversion for extracted values.

/// Kelvin offset for Celsius conversion.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Seconds per day, converting kg m-2 s-1 to mm/day.
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Conversion applied to values of a given archive variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitConversion {
    /// K -> degC, rounded to 2 decimals.
    KelvinToCelsius,
    /// kg m-2 s-1 -> mm/day, rounded to 2 decimals.
    FluxToMmPerDay,
    /// Values pass through unchanged.
    Identity,
}

impl UnitConversion {
    /// Conversion for an internal (archive) variable name.
    pub fn for_variable(name: &str) -> Self {
        match name {
            "temp_mm_1_5m" | "tas" => Self::KelvinToCelsius,
            "precip_mm_srf" | "pr" => Self::FluxToMmPerDay,
            _ => Self::Identity,
        }
    }

    /// Convert one value. NaN (masked) values stay NaN.
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Self::KelvinToCelsius => round2(value - KELVIN_OFFSET),
            Self::FluxToMmPerDay => round2(value * SECONDS_PER_DAY),
            Self::Identity => value,
        }
    }

    /// Convert a series in place, keeping its order.
    pub fn apply_all(&self, values: &mut [f64]) {
        for value in values.iter_mut() {
            *value = self.apply(*value);
        }
    }
}

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
