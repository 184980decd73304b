//! Observation kinds and their conventional value columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ObsError;

/// The kind of quantity an observation measures.
///
/// The kind decides the default value column when series are handed to a
/// modelling library, and is recorded on assembled collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObsKind {
    /// Groundwater head in a piezometer filter.
    #[default]
    Groundwater,
    /// Surface water level.
    WaterLevel,
    /// Precipitation sum.
    Precipitation,
    /// Reference evaporation.
    Evaporation,
}

impl ObsKind {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Groundwater => "groundwater",
            Self::WaterLevel => "water_level",
            Self::Precipitation => "precipitation",
            Self::Evaporation => "evaporation",
        }
    }

    /// Name of the column that holds the measured values.
    pub fn value_column(self) -> &'static str {
        match self {
            Self::Groundwater => "stand_m_tov_nap",
            Self::WaterLevel => "stand_m_tov_nap",
            Self::Precipitation => "RH",
            Self::Evaporation => "EV24",
        }
    }
}

impl fmt::Display for ObsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObsKind {
    type Err = ObsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groundwater" => Ok(Self::Groundwater),
            "water_level" | "waterlevel" => Ok(Self::WaterLevel),
            "precipitation" => Ok(Self::Precipitation),
            "evaporation" => Ok(Self::Evaporation),
            _ => Err(ObsError::UnknownKind {
                name: s.to_string(),
            }),
        }
    }
}
