use thiserror::Error;

use crate::types::{ContractId, InstallmentId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// non-positive principal, zero installments or a zero periodicity
    #[error("invalid schedule input: {message}")]
    InvalidScheduleInput {
        message: String,
    },

    /// missing or unparseable due date / payment date
    #[error("invalid date input: {message}")]
    InvalidDateInput {
        message: String,
    },

    #[error("contract not found: {id}")]
    ContractNotFound {
        id: ContractId,
    },

    #[error("installment not found: {id}")]
    InstallmentNotFound {
        id: InstallmentId,
    },

    #[error("unknown installment status token: {token}")]
    InvalidStatusToken {
        token: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl EngineError {
    pub(crate) fn schedule(message: impl Into<String>) -> Self {
        EngineError::InvalidScheduleInput {
            message: message.into(),
        }
    }

    pub(crate) fn date(message: impl Into<String>) -> Self {
        EngineError::InvalidDateInput {
            message: message.into(),
        }
    }

    /// true for the two local-validation failures raised by the engine itself
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidScheduleInput { .. } | EngineError::InvalidDateInput { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
