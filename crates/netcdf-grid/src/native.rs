//! Native NetCDF reading using the netcdf library.
//!
//! Files are read eagerly: every variable laid out on a latitude/longitude
//! grid is decoded into memory together with its coordinate axes, and the
//! underlying file is closed before [`open_grid`] returns. Point lookups on
//! the resulting [`GridData`] never touch the file again.

use std::path::Path;
use std::sync::Once;

use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::grid::{build_variable, is_latitude_dim, is_longitude_dim, GridData};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose diagnostics to stderr even when errors
/// are handled by the Rust code (e.g. when probing for optional attributes
/// such as `scale_factor`). Only needs to run once per process; safe to call
/// repeatedly.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and passing null handlers to
        // disable the automatic error stack printing is a documented use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Open a NetCDF file and load every gridded variable.
///
/// Fails with [`GridError::FileNotFound`] if `path` is not an existing file;
/// any other problem reading the file is reported as a format error.
pub fn open_grid<P: AsRef<Path>>(path: P) -> GridResult<GridData> {
    let path = path.as_ref();
    let source = path.to_string_lossy().into_owned();

    if !path.is_file() {
        return Err(GridError::FileNotFound(source));
    }

    silence_hdf5_errors();

    let file = netcdf::open(path)
        .map_err(|e| GridError::InvalidFormat(format!("Failed to open NetCDF {}: {}", source, e)))?;

    let mut grid = GridData::new(source.clone());
    let mut loaded = 0usize;

    for var in file.variables() {
        let name = var.name();
        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

        let has_lat = dims.iter().any(|d| is_latitude_dim(d));
        let has_lon = dims.iter().any(|d| is_longitude_dim(d));
        if !has_lat || !has_lon || dims.len() < 2 {
            continue;
        }

        for dim in dims.iter().filter(|d| is_latitude_dim(d) || is_longitude_dim(d)) {
            if grid.axis(dim).is_some() {
                continue;
            }
            let coord = file
                .variable(dim)
                .ok_or_else(|| GridError::MissingData(format!("coordinate variable {}", dim)))?;
            let values: Vec<f64> = coord
                .get_values(..)
                .map_err(|e| GridError::InvalidFormat(format!("Failed to read {}: {}", dim, e)))?;
            grid.insert_axis(dim.clone(), values);
        }

        let raw: Vec<f64> = var
            .get_values(..)
            .map_err(|e| GridError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;
        let packing = Packing::from_variable(&var);
        let values = raw.into_iter().map(|v| packing.decode(v)).collect();

        let variable = build_variable(&name, dims, shape, values)?;
        grid.insert_variable(name, variable);
        loaded += 1;
    }

    debug!(path = %source, variables = loaded, "Loaded NetCDF grid");

    Ok(grid)
}

/// CF packing and masking attributes of a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Packing {
    pub scale_factor: f64,
    pub add_offset: f64,
    pub fill_value: Option<f64>,
    pub missing_value: Option<f64>,
}

impl Default for Packing {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            add_offset: 0.0,
            fill_value: None,
            missing_value: None,
        }
    }
}

impl Packing {
    fn from_variable(var: &netcdf::Variable) -> Self {
        Self {
            scale_factor: get_f64_attr(var, "scale_factor").unwrap_or(1.0),
            add_offset: get_f64_attr(var, "add_offset").unwrap_or(0.0),
            fill_value: get_f64_attr(var, "_FillValue"),
            missing_value: get_f64_attr(var, "missing_value"),
        }
    }

    /// Decode one stored value: masked values become NaN, the rest are
    /// unpacked with `scale_factor` and `add_offset`.
    pub fn decode(&self, raw: f64) -> f64 {
        let masked = |marker: Option<f64>| marker.is_some_and(|m| m == raw);
        if raw.is_nan() || masked(self.fill_value) || masked(self.missing_value) {
            return f64::NAN;
        }
        raw * self.scale_factor + self.add_offset
    }
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packing_default_is_identity() {
        let packing = Packing::default();
        assert_eq!(packing.decode(287.5), 287.5);
    }

    #[test]
    fn test_packing_masks_fill_and_missing() {
        let packing = Packing {
            fill_value: Some(-999.0),
            missing_value: Some(2.0e20),
            ..Default::default()
        };
        assert!(packing.decode(-999.0).is_nan());
        assert!(packing.decode(2.0e20).is_nan());
        assert!(packing.decode(f64::NAN).is_nan());
        assert_eq!(packing.decode(1.0), 1.0);
    }

    #[test]
    fn test_packing_scale_and_offset() {
        let packing = Packing {
            scale_factor: 0.01,
            add_offset: 250.0,
            ..Default::default()
        };
        assert!((packing.decode(1000.0) - 260.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_file() {
        let err = open_grid("/nonexistent/climate/file.nc").unwrap_err();
        assert!(matches!(err, GridError::FileNotFound(_)));
    }
}
