//! Archive layout: where each model's files live on disk.
//!
//! The path templates are an external contract with the mounted archive and
//! must not change:
//!
//! - climatologies: `{root}/bridge_hadcm3/{model}/climate/{model}a.pdclann.nc`
//! - time series: `{root}/cmip6/{variable}_mon_mod_{model}_192_ave.{period}.{frequency}.nc`

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Result};
use crate::variables::ClimateVariable;

/// Default pre-industrial baseline period label.
pub const DEFAULT_PI_PERIOD: &str = "1850-1900";

/// Default running-mean future period label.
pub const DEFAULT_FUTURE_PERIOD: &str = "2015-2100_rm30";

/// Time-series aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// Monthly means.
    #[serde(rename = "mm")]
    Monthly,
    /// Annual means.
    #[serde(rename = "ym")]
    Annual,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "mm",
            Self::Annual => "ym",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mm" => Ok(Self::Monthly),
            "ym" => Ok(Self::Annual),
            other => Err(ExtractionError::validation(format!(
                "frequency must be \"mm\" or \"ym\", got {:?}",
                other
            ))),
        }
    }
}

/// CMIP6 scenario, or the pre-industrial baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    PreIndustrial,
    Ssp126,
    Ssp245,
    Ssp370,
    Ssp585,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::PreIndustrial,
        Scenario::Ssp126,
        Scenario::Ssp245,
        Scenario::Ssp370,
        Scenario::Ssp585,
    ];

    /// Identifier as used in file names and requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreIndustrial => "PI",
            Self::Ssp126 => "ssp126",
            Self::Ssp245 => "ssp245",
            Self::Ssp370 => "ssp370",
            Self::Ssp585 => "ssp585",
        }
    }

    pub fn is_pre_industrial(&self) -> bool {
        matches!(self, Self::PreIndustrial)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|scenario| scenario.as_str() == s)
            .ok_or_else(|| ExtractionError::ModelNotFound(s.to_string()))
    }
}

/// Reject model identifiers that could not be a single path component.
pub fn validate_model_id(model_id: &str) -> Result<()> {
    if model_id.is_empty() {
        return Err(ExtractionError::validation("model id must not be empty"));
    }
    if !model_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ExtractionError::validation(format!(
            "model id {:?} may only contain letters, digits, '_' and '-'",
            model_id
        )));
    }
    Ok(())
}

/// The mounted archive root plus the period labels used in file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    root: PathBuf,
    pi_period: String,
    future_period: String,
}

impl Archive {
    /// Archive at `root` with the default period labels.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pi_period: DEFAULT_PI_PERIOD.to_string(),
            future_period: DEFAULT_FUTURE_PERIOD.to_string(),
        }
    }

    pub fn with_periods(
        mut self,
        pi_period: impl Into<String>,
        future_period: impl Into<String>,
    ) -> Self {
        self.pi_period = pi_period.into();
        self.future_period = future_period.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Period label for a scenario.
    pub fn period(&self, scenario: Scenario) -> &str {
        if scenario.is_pre_industrial() {
            &self.pi_period
        } else {
            &self.future_period
        }
    }

    /// Annual climatology file of a HadCM3 model run.
    pub fn climatology_path(&self, model_id: &str) -> PathBuf {
        self.root.join(format!(
            "bridge_hadcm3/{model}/climate/{model}a.pdclann.nc",
            model = model_id
        ))
    }

    /// CMIP6 time-series file for a scenario.
    pub fn series_path(
        &self,
        variable: ClimateVariable,
        scenario: Scenario,
        frequency: Frequency,
    ) -> PathBuf {
        self.root.join(format!(
            "cmip6/{}_mon_mod_{}_192_ave.{}.{}.nc",
            variable.cmip_name(),
            scenario.as_str(),
            self.period(scenario),
            frequency.as_str()
        ))
    }
}
