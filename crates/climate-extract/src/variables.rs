//! User-facing climate variables and their archive names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// A variable that can be requested over the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClimateVariable {
    /// Near-surface air temperature.
    Tas,
    /// Precipitation flux.
    Pr,
}

impl ClimateVariable {
    /// User-facing name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tas => "tas",
            Self::Pr => "pr",
        }
    }

    /// Variable name inside HadCM3 climatology (`pdclann`) files.
    pub fn bridge_name(&self) -> &'static str {
        match self {
            Self::Tas => "temp_mm_1_5m",
            Self::Pr => "precip_mm_srf",
        }
    }

    /// Variable name inside CMIP6 time-series files.
    pub fn cmip_name(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ClimateVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClimateVariable {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tas" => Ok(Self::Tas),
            "pr" => Ok(Self::Pr),
            other => Err(ExtractionError::UnknownVariable(other.to_string())),
        }
    }
}
