use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::installment::Installment;
use crate::types::{ContractId, Periodicity};

/// client-supplied part of a contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTerms {
    pub principal: Money,
    pub installment_count: u32,
    pub periodicity: Periodicity,
}

impl ContractTerms {
    pub fn new(principal: Money, installment_count: u32, periodicity: Periodicity) -> Self {
        Self {
            principal,
            installment_count,
            periodicity,
        }
    }

    pub fn builder() -> ContractTermsBuilder {
        ContractTermsBuilder::new()
    }

    /// check the schedule preconditions
    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(EngineError::schedule(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }
        if self.installment_count == 0 {
            return Err(EngineError::schedule("installment count must be at least 1"));
        }
        self.periodicity.validate()
    }
}

/// contract creation request as received from a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRequest {
    pub principal: Money,
    pub installment_count: u32,
    #[serde(default)]
    pub periodicity: Option<Periodicity>,
}

impl ContractRequest {
    pub fn into_terms(self, default_periodicity: Periodicity) -> ContractTerms {
        ContractTerms::new(
            self.principal,
            self.installment_count,
            self.periodicity.unwrap_or(default_periodicity),
        )
    }
}

/// persisted contract owning its installments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub contracted_at: DateTime<Utc>,
    pub principal: Money,
    pub installment_count: u32,
    pub periodicity: Periodicity,
    pub installments: Vec<Installment>,
}

impl Contract {
    /// contract with identity and creation time, no schedule yet
    pub fn new(id: ContractId, terms: ContractTerms, contracted_at: DateTime<Utc>) -> Self {
        Self {
            id,
            contracted_at,
            principal: terms.principal,
            installment_count: terms.installment_count,
            periodicity: terms.periodicity,
            installments: Vec::new(),
        }
    }

    pub fn terms(&self) -> ContractTerms {
        ContractTerms::new(self.principal, self.installment_count, self.periodicity)
    }

    /// sum of installment amounts
    pub fn scheduled_total(&self) -> Money {
        self.installments.iter().map(|i| i.amount).sum()
    }

    /// sum of amounts without a recorded payment
    pub fn outstanding(&self) -> Money {
        self.installments
            .iter()
            .filter(|i| !i.is_settled())
            .map(|i| i.amount)
            .sum()
    }

    /// schedule complete and consistent with the terms
    pub fn is_fully_scheduled(&self) -> bool {
        self.installments.len() == self.installment_count as usize
            && self.scheduled_total() == self.principal
            && self
                .installments
                .iter()
                .enumerate()
                .all(|(idx, i)| i.sequence as usize == idx + 1 && i.contract_id == self.id)
            && self
                .installments
                .windows(2)
                .all(|pair| pair[0].due_date < pair[1].due_date)
    }

    /// recompute the status of every installment against `now`
    pub fn refresh_statuses(&mut self, now: DateTime<Utc>) {
        for installment in &mut self.installments {
            installment.refresh_status(now);
        }
    }
}

/// builder for contract terms
#[derive(Debug, Default)]
pub struct ContractTermsBuilder {
    principal: Option<Money>,
    installment_count: Option<u32>,
    periodicity: Option<Periodicity>,
}

impl ContractTermsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn installments(mut self, count: u32) -> Self {
        self.installment_count = Some(count);
        self
    }

    pub fn periodicity(mut self, periodicity: Periodicity) -> Self {
        self.periodicity = Some(periodicity);
        self
    }

    /// build and validate, periodicity defaults to monthly
    pub fn build(self) -> Result<ContractTerms> {
        let principal = self
            .principal
            .ok_or_else(|| EngineError::schedule("principal is required"))?;
        let installment_count = self
            .installment_count
            .ok_or_else(|| EngineError::schedule("installment count is required"))?;

        let terms = ContractTerms::new(
            principal,
            installment_count,
            self.periodicity.unwrap_or_default(),
        );
        terms.validate()?;
        Ok(terms)
    }
}
