use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{EngineError, Result};

/// unique identifier for a contract
pub type ContractId = Uuid;

/// unique identifier for an installment
pub type InstallmentId = Uuid;

/// interval between two consecutive due dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Periodicity {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
}

impl Periodicity {
    pub fn daily() -> Self {
        Periodicity::Days(1)
    }

    pub fn weekly() -> Self {
        Periodicity::Weeks(1)
    }

    pub fn monthly() -> Self {
        Periodicity::Months(1)
    }

    pub fn quarterly() -> Self {
        Periodicity::Months(3)
    }

    pub fn yearly() -> Self {
        Periodicity::Years(1)
    }

    /// number of units per step
    pub fn count(&self) -> u32 {
        match *self {
            Periodicity::Days(n)
            | Periodicity::Weeks(n)
            | Periodicity::Months(n)
            | Periodicity::Years(n) => n,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.count() == 0
    }

    /// reject zero-length intervals
    pub fn validate(&self) -> Result<()> {
        if self.is_zero() {
            return Err(EngineError::schedule(format!(
                "periodicity must be a non-zero interval, got {}",
                self
            )));
        }
        Ok(())
    }
}

impl Default for Periodicity {
    fn default() -> Self {
        Periodicity::monthly()
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Periodicity::Days(n) => write!(f, "{} day(s)", n),
            Periodicity::Weeks(n) => write!(f, "{} week(s)", n),
            Periodicity::Months(n) => write!(f, "{} month(s)", n),
            Periodicity::Years(n) => write!(f, "{} year(s)", n),
        }
    }
}

/// installment lifecycle status, always derived from the dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InstallmentStatus {
    /// not yet due and not paid
    #[default]
    Open,
    /// past due date, unpaid
    Overdue,
    /// payment recorded
    Settled,
}

impl InstallmentStatus {
    /// wire token in the requested locale
    pub fn label(&self, locale: StatusLocale) -> &'static str {
        match (locale, self) {
            (StatusLocale::English, InstallmentStatus::Open) => "Open",
            (StatusLocale::English, InstallmentStatus::Overdue) => "Overdue",
            (StatusLocale::English, InstallmentStatus::Settled) => "Settled",
            (StatusLocale::Portuguese, InstallmentStatus::Open) => "Aberta",
            (StatusLocale::Portuguese, InstallmentStatus::Overdue) => "Atrasada",
            (StatusLocale::Portuguese, InstallmentStatus::Settled) => "Baixada",
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, InstallmentStatus::Settled)
    }
}

impl fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(StatusLocale::English))
    }
}

impl FromStr for InstallmentStatus {
    type Err = EngineError;

    /// accepts the tokens of every supported locale
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Open" | "Aberta" => Ok(InstallmentStatus::Open),
            "Overdue" | "Atrasada" => Ok(InstallmentStatus::Overdue),
            "Settled" | "Baixada" => Ok(InstallmentStatus::Settled),
            other => Err(EngineError::InvalidStatusToken {
                token: other.to_string(),
            }),
        }
    }
}

/// vocabulary used when rendering status tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StatusLocale {
    #[default]
    English,
    Portuguese,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periodicity_validation() {
        assert!(Periodicity::monthly().validate().is_ok());
        assert!(Periodicity::quarterly().validate().is_ok());

        let err = Periodicity::Weeks(0).validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidScheduleInput { .. }));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(InstallmentStatus::Overdue.label(StatusLocale::English), "Overdue");
        assert_eq!(InstallmentStatus::Overdue.label(StatusLocale::Portuguese), "Atrasada");
        assert_eq!(InstallmentStatus::Settled.to_string(), "Settled");
    }

    #[test]
    fn test_status_parse_both_locales() {
        assert_eq!("Baixada".parse::<InstallmentStatus>().unwrap(), InstallmentStatus::Settled);
        assert_eq!("Open".parse::<InstallmentStatus>().unwrap(), InstallmentStatus::Open);
        assert_eq!(
            "Paid".parse::<InstallmentStatus>().unwrap_err(),
            EngineError::InvalidStatusToken {
                token: "Paid".to_string()
            }
        );
    }

    #[test]
    fn test_status_serializes_as_bare_token() {
        let json = serde_json::to_string(&InstallmentStatus::Overdue).unwrap();
        assert_eq!(json, "\"Overdue\"");
    }
}
