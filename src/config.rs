use serde::{Deserialize, Serialize};

use crate::decimal::MAX_SCALE;
use crate::errors::{EngineError, Result};
use crate::schedule::ScheduleGenerator;
use crate::types::{Periodicity, StatusLocale};

/// engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// fractional digits of the currency's minimal unit
    pub minor_units: u32,
    /// periodicity used when a request leaves it out
    pub default_periodicity: Periodicity,
    /// vocabulary for rendered status tokens
    pub status_locale: StatusLocale,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            minor_units: 2,
            default_periodicity: Periodicity::monthly(),
            status_locale: StatusLocale::English,
        }
    }
}

impl EngineConfig {
    /// monthly schedules in cents with Portuguese status tokens
    pub fn portuguese() -> Self {
        Self {
            status_locale: StatusLocale::Portuguese,
            ..Self::default()
        }
    }

    /// load from json, missing fields take their defaults
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(raw).map_err(|e| EngineError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.minor_units > MAX_SCALE {
            return Err(EngineError::InvalidConfiguration {
                message: format!(
                    "minor units must be at most {}, got {}",
                    MAX_SCALE, self.minor_units
                ),
            });
        }
        if self.default_periodicity.is_zero() {
            return Err(EngineError::InvalidConfiguration {
                message: "default periodicity must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    /// generator using the configured minor units
    pub fn generator(&self) -> ScheduleGenerator {
        ScheduleGenerator::with_minor_units(self.minor_units)
    }
}
