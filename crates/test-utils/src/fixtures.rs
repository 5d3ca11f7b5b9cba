//! NetCDF fixture files laid out like the climate archive.
//!
//! [`NcFixture`] writes a small NetCDF file with coordinate variables and
//! `f64` data variables. The `*_path` helpers spell out the archive's path
//! templates literally so integration tests exercise the real layout.

use std::error::Error;
use std::path::{Path, PathBuf};

/// Result type for fixture writing.
pub type FixtureResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// A data variable to be written into a fixture file.
#[derive(Debug, Clone)]
pub struct NcVariable {
    pub name: String,
    pub dims: Vec<String>,
    pub values: Vec<f64>,
    pub attributes: Vec<(String, f64)>,
}

/// Builder for a NetCDF file with 1-D coordinate dimensions.
#[derive(Debug, Clone, Default)]
pub struct NcFixture {
    dims: Vec<(String, Vec<f64>)>,
    variables: Vec<NcVariable>,
}

impl NcFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dimension together with its coordinate variable.
    pub fn dim(mut self, name: &str, values: Vec<f64>) -> Self {
        self.dims.push((name.to_string(), values));
        self
    }

    /// Add a data variable over previously declared dimensions.
    pub fn var(mut self, name: &str, dims: &[&str], values: Vec<f64>) -> Self {
        self.variables.push(NcVariable {
            name: name.to_string(),
            dims: dims.iter().map(|d| d.to_string()).collect(),
            values,
            attributes: Vec::new(),
        });
        self
    }

    /// Attach a numeric attribute to the most recently added variable.
    pub fn attr(mut self, name: &str, value: f64) -> Self {
        if let Some(var) = self.variables.last_mut() {
            var.attributes.push((name.to_string(), value));
        }
        self
    }

    /// Write the fixture to `path`, creating parent directories.
    pub fn write(&self, path: &Path) -> FixtureResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = netcdf::create(path)?;

        for (name, values) in &self.dims {
            file.add_dimension(name, values.len())?;
            let mut coord = file.add_variable::<f64>(name, &[name.as_str()])?;
            coord.put_values(values.as_slice(), ..)?;
        }

        for var in &self.variables {
            let dims: Vec<&str> = var.dims.iter().map(String::as_str).collect();
            let mut nc_var = file.add_variable::<f64>(&var.name, &dims)?;
            for (key, value) in &var.attributes {
                nc_var.put_attribute(key, *value)?;
            }
            nc_var.put_values(var.values.as_slice(), ..)?;
        }

        Ok(())
    }
}

/// `{root}/bridge_hadcm3/{model}/climate/{model}a.pdclann.nc`
pub fn climatology_path(root: &Path, model_id: &str) -> PathBuf {
    root.join(format!(
        "bridge_hadcm3/{model}/climate/{model}a.pdclann.nc",
        model = model_id
    ))
}

/// `{root}/cmip6/{variable}_mon_mod_{model}_192_ave.{period}.{frequency}.nc`
pub fn cmip_series_path(
    root: &Path,
    variable: &str,
    model_id: &str,
    period: &str,
    frequency: &str,
) -> PathBuf {
    root.join(format!(
        "cmip6/{}_mon_mod_{}_192_ave.{}.{}.nc",
        variable, model_id, period, frequency
    ))
}

/// A temporary archive root that is removed when dropped.
pub fn temp_archive() -> FixtureResult<tempfile::TempDir> {
    Ok(tempfile::Builder::new().prefix("climate-archive").tempdir()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_paths() {
        let root = Path::new("/data");
        assert_eq!(
            climatology_path(root, "tfgbi"),
            PathBuf::from("/data/bridge_hadcm3/tfgbi/climate/tfgbia.pdclann.nc")
        );
        assert_eq!(
            cmip_series_path(root, "pr", "PI", "1850-1900", "ym"),
            PathBuf::from("/data/cmip6/pr_mon_mod_PI_192_ave.1850-1900.ym.nc")
        );
    }

    #[test]
    fn test_attr_applies_to_last_variable() {
        let fixture = NcFixture::new()
            .dim("lat", vec![0.0])
            .dim("lon", vec![0.0])
            .var("a", &["lat", "lon"], vec![1.0])
            .var("b", &["lat", "lon"], vec![2.0])
            .attr("missing_value", -1.0);
        assert!(fixture.variables[0].attributes.is_empty());
        assert_eq!(fixture.variables[1].attributes.len(), 1);
    }
}
