use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::status::StatusResolver;
use crate::types::{ContractId, InstallmentId, InstallmentStatus};

/// installment produced by the generator, not yet persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentDraft {
    /// 1-based position in the schedule
    pub sequence: u32,
    pub amount: Money,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub status: InstallmentStatus,
}

impl InstallmentDraft {
    pub fn new(sequence: u32, amount: Money, due_date: NaiveDate) -> Self {
        Self {
            sequence,
            amount,
            due_date,
            payment_date: None,
            status: InstallmentStatus::Open,
        }
    }

    /// attach persisted identity and the owning contract
    pub fn into_installment(self, id: InstallmentId, contract_id: ContractId) -> Installment {
        Installment {
            id,
            contract_id,
            sequence: self.sequence,
            amount: self.amount,
            due_date: self.due_date,
            payment_date: self.payment_date,
            status: self.status,
        }
    }
}

/// persisted installment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub id: InstallmentId,
    pub contract_id: ContractId,
    pub sequence: u32,
    pub amount: Money,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub status: InstallmentStatus,
}

impl Installment {
    /// recompute status against `now`, returning the previous value
    pub fn refresh_status(&mut self, now: DateTime<Utc>) -> InstallmentStatus {
        let previous = self.status;
        self.status = StatusResolver::resolve(self.payment_date, self.due_date, now);
        previous
    }

    /// copy with status recomputed against `now`
    pub fn resolved(&self, now: DateTime<Utc>) -> Self {
        let mut installment = self.clone();
        installment.refresh_status(now);
        installment
    }

    /// apply a client correction and recompute status
    pub fn apply_update(&mut self, update: &InstallmentUpdate, now: DateTime<Utc>) {
        self.due_date = update.due_date;
        self.payment_date = update.payment_date;
        self.refresh_status(now);
    }

    /// payment recorded strictly after the due date
    pub fn paid_late(&self) -> bool {
        StatusResolver::paid_late(self.payment_date, self.due_date)
    }

    pub fn is_settled(&self) -> bool {
        self.payment_date.is_some()
    }
}

/// client-writable fields of an installment
///
/// carries no status field: status is always server-derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentUpdate {
    pub due_date: NaiveDate,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
}

impl InstallmentUpdate {
    pub fn new(due_date: NaiveDate, payment_date: Option<NaiveDate>) -> Self {
        Self {
            due_date,
            payment_date,
        }
    }

    /// build from raw request fields, due date is mandatory
    pub fn parse(due_date: Option<&str>, payment_date: Option<&str>) -> Result<Self> {
        let due_date = due_date
            .filter(|raw| !raw.trim().is_empty())
            .ok_or_else(|| EngineError::date("due date is required"))?;

        Ok(Self {
            due_date: dates::parse_date(due_date)?,
            payment_date: dates::parse_optional_date(payment_date)?,
        })
    }
}
