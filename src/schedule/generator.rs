use chrono::{DateTime, Utc};
use tracing::debug;

use crate::contract::{Contract, ContractTerms};
use crate::dates;
use crate::errors::{EngineError, Result};
use crate::installment::InstallmentDraft;
use crate::schedule::distribution::{AmountDistribution, EqualShares};

/// turns contract terms into an ordered installment schedule
pub struct ScheduleGenerator {
    distribution: Box<dyn AmountDistribution>,
}

impl ScheduleGenerator {
    pub fn new(distribution: Box<dyn AmountDistribution>) -> Self {
        Self { distribution }
    }

    /// equal shares truncated to `minor_units` digits
    pub fn with_minor_units(minor_units: u32) -> Self {
        Self::new(Box::new(EqualShares::new(minor_units)))
    }

    /// generate the schedule of a created contract
    pub fn generate(&self, contract: &Contract) -> Result<Vec<InstallmentDraft>> {
        self.generate_for_terms(&contract.terms(), contract.contracted_at)
    }

    /// generate the schedule for terms contracted at `contracted_at`
    ///
    /// The first due date is one periodicity step after the contract date and
    /// every following one is one step after its predecessor. Amounts come from
    /// the distribution rule and sum exactly to the principal.
    pub fn generate_for_terms(
        &self,
        terms: &ContractTerms,
        contracted_at: DateTime<Utc>,
    ) -> Result<Vec<InstallmentDraft>> {
        terms.validate()?;

        let amounts = self
            .distribution
            .distribute(terms.principal, terms.installment_count)?;
        if amounts.len() != terms.installment_count as usize {
            return Err(EngineError::schedule(format!(
                "distribution produced {} amounts for {} installments",
                amounts.len(),
                terms.installment_count
            )));
        }

        let mut drafts = Vec::with_capacity(amounts.len());
        let mut due_date = contracted_at.date_naive();

        for (sequence, amount) in (1..).zip(amounts) {
            due_date = dates::advance(due_date, terms.periodicity)?;
            drafts.push(InstallmentDraft::new(sequence, amount, due_date));
        }

        debug!(
            principal = %terms.principal,
            installments = drafts.len(),
            periodicity = %terms.periodicity,
            first_due = ?drafts.first().map(|d| d.due_date),
            last_due = ?drafts.last().map(|d| d.due_date),
            "generated installment schedule"
        );

        Ok(drafts)
    }
}

impl Default for ScheduleGenerator {
    fn default() -> Self {
        Self::new(Box::new(EqualShares::default()))
    }
}
