//! Point extraction from climate model archives.
//!
//! Two request shapes are served:
//!
//! - **Annual climatology**: one value per (model, location) pair from HadCM3
//!   `pdclann` files, in request order.
//! - **Time series**: the full time axis at one location from a CMIP6
//!   scenario file, in chronological order.
//!
//! Longitudes are accepted in either convention and normalized to [0, 360).
//! Temperatures are returned in degrees Celsius and precipitation in mm/day,
//! rounded to 2 decimal places.

pub mod archive;
pub mod coords;
pub mod error;
pub mod pipeline;
pub mod request;
pub mod units;
pub mod variables;

pub use archive::{
    validate_model_id, Archive, Frequency, Scenario, DEFAULT_FUTURE_PERIOD, DEFAULT_PI_PERIOD,
};
pub use coords::{normalize_longitude, validate_location};
pub use error::{ExtractionError, Result};
pub use pipeline::ExtractionPipeline;
pub use request::{ExtractionResult, LookupRequest};
pub use units::{round2, UnitConversion};
pub use variables::ClimateVariable;
