//! In-memory gridded dataset model.
//!
//! A [`GridData`] holds the coordinate axes and decoded values of every
//! variable in one file that is laid out on a latitude/longitude grid. Values
//! are addressed by nearest grid cell; any further dimensions (time, height,
//! surface) are returned in native row-major order.

use std::collections::HashMap;

use crate::error::{GridError, GridResult};
use crate::nearest::nearest_index;

/// An opened gridded dataset that supports point sampling.
///
/// Implementations are shared across request tasks behind reference-counted
/// handles, so they must be `Send + Sync`.
pub trait GridDataset: Send + Sync + 'static {
    /// Identifier of the backing file.
    fn source(&self) -> &str;

    /// Whether `variable` can be sampled from this dataset.
    fn has_variable(&self, variable: &str) -> bool;

    /// Values of `variable` at the grid cell nearest to (`lat`, `lon`).
    ///
    /// The cell is chosen per axis. One value is returned per combination of
    /// the remaining dimensions, in row-major (native) order, so a variable
    /// shaped `(time, lat, lon)` yields its full time series.
    fn sample(&self, variable: &str, lat: f64, lon: f64) -> GridResult<Vec<f64>>;

    /// Release any resources held by the dataset.
    ///
    /// Called exactly once, when the last handle to the dataset is dropped.
    fn close(&mut self) -> GridResult<()> {
        Ok(())
    }
}

/// Returns true for dimension names that denote a latitude axis.
pub fn is_latitude_dim(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name == "lat" || name.starts_with("latitude")
}

/// Returns true for dimension names that denote a longitude axis.
pub fn is_longitude_dim(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name == "lon" || name.starts_with("longitude")
}

/// A single gridded variable with its shape.
#[derive(Debug, Clone)]
pub struct GridVariable {
    dims: Vec<String>,
    shape: Vec<usize>,
    lat_dim: usize,
    lon_dim: usize,
    values: Vec<f64>,
}

impl GridVariable {
    /// Number of values produced per sampled cell.
    pub fn values_per_cell(&self) -> usize {
        self.shape
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.lat_dim && *i != self.lon_dim)
            .map(|(_, len)| *len)
            .product()
    }

    /// All values at (`lat_idx`, `lon_idx`), iterating the remaining
    /// dimensions in row-major order.
    fn column(&self, lat_idx: usize, lon_idx: usize) -> Vec<f64> {
        let mut strides = vec![1usize; self.shape.len()];
        for i in (0..self.shape.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * self.shape[i + 1];
        }

        let extra: Vec<usize> = (0..self.shape.len())
            .filter(|i| *i != self.lat_dim && *i != self.lon_dim)
            .collect();
        let base = lat_idx * strides[self.lat_dim] + lon_idx * strides[self.lon_dim];
        let count = self.values_per_cell();

        let mut out = Vec::with_capacity(count);
        for n in 0..count {
            let mut rem = n;
            let mut offset = base;
            for &dim in extra.iter().rev() {
                let len = self.shape[dim];
                offset += (rem % len) * strides[dim];
                rem /= len;
            }
            out.push(self.values[offset]);
        }
        out
    }
}

/// A fully loaded gridded dataset.
#[derive(Debug, Clone)]
pub struct GridData {
    source: String,
    axes: HashMap<String, Vec<f64>>,
    variables: HashMap<String, GridVariable>,
}

impl GridData {
    /// Create an empty dataset for `source`.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            axes: HashMap::new(),
            variables: HashMap::new(),
        }
    }

    /// Register a 1-D coordinate axis.
    pub fn with_axis(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.axes.insert(name.into(), values);
        self
    }

    /// Register a variable laid out over `dims`.
    ///
    /// Every dimension must already be registered as an axis (or, for
    /// non-spatial dimensions, be supplied with its length through an axis of
    /// the same name), and `values` must match the implied shape.
    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        dims: &[&str],
        values: Vec<f64>,
    ) -> GridResult<Self> {
        let name = name.into();
        let shape = dims
            .iter()
            .map(|dim| {
                self.axes
                    .get(*dim)
                    .map(Vec::len)
                    .ok_or_else(|| GridError::MissingData(format!("axis {} for {}", dim, name)))
            })
            .collect::<GridResult<Vec<usize>>>()?;
        let dims = dims.iter().map(|d| d.to_string()).collect();
        let variable = build_variable(&name, dims, shape, values)?;
        self.variables.insert(name, variable);
        Ok(self)
    }

    pub(crate) fn insert_variable(&mut self, name: String, variable: GridVariable) {
        self.variables.insert(name, variable);
    }

    pub(crate) fn insert_axis(&mut self, name: String, values: Vec<f64>) {
        self.axes.insert(name, values);
    }

    /// Names of every sampleable variable.
    pub fn variable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&GridVariable> {
        self.variables.get(name)
    }

    /// Look up a coordinate axis by name.
    pub fn axis(&self, name: &str) -> Option<&[f64]> {
        self.axes.get(name).map(Vec::as_slice)
    }

    /// Grid indices (lat, lon) nearest to the target for `variable`.
    pub fn nearest_cell(&self, variable: &str, lat: f64, lon: f64) -> GridResult<(usize, usize)> {
        let var = self
            .variables
            .get(variable)
            .ok_or_else(|| GridError::VariableNotFound(variable.to_string()))?;

        let lat_name = &var.dims[var.lat_dim];
        let lon_name = &var.dims[var.lon_dim];
        let lat_axis = self
            .axes
            .get(lat_name)
            .ok_or_else(|| GridError::MissingData(format!("coordinate {}", lat_name)))?;
        let lon_axis = self
            .axes
            .get(lon_name)
            .ok_or_else(|| GridError::MissingData(format!("coordinate {}", lon_name)))?;

        let lat_idx = nearest_index(lat_axis, lat)
            .ok_or_else(|| GridError::InvalidFormat(format!("empty axis {}", lat_name)))?;
        let lon_idx = nearest_index(lon_axis, lon)
            .ok_or_else(|| GridError::InvalidFormat(format!("empty axis {}", lon_name)))?;

        Ok((lat_idx, lon_idx))
    }
}

impl GridDataset for GridData {
    fn source(&self) -> &str {
        &self.source
    }

    fn has_variable(&self, variable: &str) -> bool {
        self.variables.contains_key(variable)
    }

    fn sample(&self, variable: &str, lat: f64, lon: f64) -> GridResult<Vec<f64>> {
        let (lat_idx, lon_idx) = self.nearest_cell(variable, lat, lon)?;
        let var = self
            .variables
            .get(variable)
            .ok_or_else(|| GridError::VariableNotFound(variable.to_string()))?;
        Ok(var.column(lat_idx, lon_idx))
    }
}

/// Validate a variable's layout and wrap it.
pub(crate) fn build_variable(
    name: &str,
    dims: Vec<String>,
    shape: Vec<usize>,
    values: Vec<f64>,
) -> GridResult<GridVariable> {
    let lat_dim = dims
        .iter()
        .position(|d| is_latitude_dim(d))
        .ok_or_else(|| GridError::InvalidFormat(format!("{} has no latitude dimension", name)))?;
    let lon_dim = dims
        .iter()
        .position(|d| is_longitude_dim(d))
        .ok_or_else(|| GridError::InvalidFormat(format!("{} has no longitude dimension", name)))?;

    let expected: usize = shape.iter().product();
    if values.len() != expected {
        return Err(GridError::InvalidFormat(format!(
            "{} has {} values, shape {:?} needs {}",
            name,
            values.len(),
            shape,
            expected
        )));
    }

    Ok(GridVariable {
        dims,
        shape,
        lat_dim,
        lon_dim,
        values,
    })
}
