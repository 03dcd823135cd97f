use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::contract::{Contract, ContractRequest, ContractTerms};
use crate::errors::{EngineError, Result};
use crate::events::{Event, EventStore};
use crate::installment::{Installment, InstallmentUpdate};
use crate::schedule::ScheduleGenerator;
use crate::types::{ContractId, InstallmentId};

/// contract row without its installments
#[derive(Debug, Clone)]
struct ContractRecord {
    contract: Contract,
    installment_ids: Vec<InstallmentId>,
}

#[derive(Debug, Default)]
struct LedgerState {
    contracts: HashMap<ContractId, ContractRecord>,
    installments: HashMap<InstallmentId, Installment>,
    /// creation order of contracts
    order: Vec<ContractId>,
    events: EventStore,
}

impl LedgerState {
    fn assemble(&self, record: &ContractRecord, now: DateTime<Utc>) -> Contract {
        let mut contract = record.contract.clone();
        contract.installments = record
            .installment_ids
            .iter()
            .filter_map(|id| self.installments.get(id))
            .map(|installment| installment.resolved(now))
            .collect();
        contract
    }
}

/// in-memory record store for contracts and their installments
///
/// Contract creation generates the complete schedule before touching the
/// store and inserts the contract with all of its installments under a single
/// write lock, so readers never observe a contract with a partial schedule.
/// Every installment handed out has its status recomputed from the clock of
/// the calling operation.
///
/// Emitted events are buffered in memory and only released by
/// [`ContractLedger::take_events`]; callers that never drain them keep every
/// event for the lifetime of the ledger.
pub struct ContractLedger {
    config: EngineConfig,
    generator: ScheduleGenerator,
    state: RwLock<LedgerState>,
}

impl ContractLedger {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let generator = config.generator();
        Ok(Self::with_generator(config, generator))
    }

    /// ledger with a custom schedule generator
    pub fn with_generator(config: EngineConfig, generator: ScheduleGenerator) -> Self {
        Self {
            config,
            generator,
            state: RwLock::new(LedgerState::default()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// create a contract and its schedule atomically
    pub fn create_contract(&self, terms: ContractTerms, time: &SafeTimeProvider) -> Result<Contract> {
        let now = time.now();
        let mut contract = Contract::new(Uuid::new_v4(), terms, now);

        let drafts = self.generator.generate(&contract).map_err(|e| {
            warn!(error = %e, principal = %terms.principal, "rejected contract");
            e
        })?;

        contract.installments = drafts
            .into_iter()
            .map(|draft| {
                let mut installment = draft.into_installment(Uuid::new_v4(), contract.id);
                installment.refresh_status(now);
                installment
            })
            .collect();

        let record = ContractRecord {
            contract: Contract {
                installments: Vec::new(),
                ..contract.clone()
            },
            installment_ids: contract.installments.iter().map(|i| i.id).collect(),
        };

        let mut state = self.write();
        for installment in &contract.installments {
            state.installments.insert(installment.id, installment.clone());
        }
        state.contracts.insert(contract.id, record);
        state.order.push(contract.id);

        state.events.emit(Event::ContractCreated {
            contract_id: contract.id,
            principal: contract.principal,
            installment_count: contract.installment_count,
            periodicity: contract.periodicity,
            timestamp: now,
        });
        if let (Some(first), Some(last)) = (contract.installments.first(), contract.installments.last()) {
            state.events.emit(Event::ScheduleGenerated {
                contract_id: contract.id,
                first_due_date: first.due_date,
                last_due_date: last.due_date,
                total: contract.scheduled_total(),
                timestamp: now,
            });
        }
        drop(state);

        info!(
            contract_id = %contract.id,
            principal = %contract.principal,
            installments = contract.installments.len(),
            "contract created"
        );

        Ok(contract)
    }

    /// create from a client request, filling the configured default periodicity
    pub fn submit(&self, request: ContractRequest, time: &SafeTimeProvider) -> Result<Contract> {
        let terms = request.into_terms(self.config.default_periodicity);
        self.create_contract(terms, time)
    }

    /// create a contract using system time
    pub fn create_contract_now(&self, terms: ContractTerms) -> Result<Contract> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.create_contract(terms, &time)
    }

    /// all contracts in creation order, statuses resolved
    pub fn contracts(&self, time: &SafeTimeProvider) -> Vec<Contract> {
        let now = time.now();
        let state = self.read();
        state
            .order
            .iter()
            .filter_map(|id| state.contracts.get(id))
            .map(|record| state.assemble(record, now))
            .collect()
    }

    /// single contract with its schedule, statuses resolved
    pub fn contract(&self, id: ContractId, time: &SafeTimeProvider) -> Result<Contract> {
        let now = time.now();
        let state = self.read();
        let record = state.contracts.get(&id).ok_or_else(|| {
            warn!(contract_id = %id, "contract not found");
            EngineError::ContractNotFound { id }
        })?;
        Ok(state.assemble(record, now))
    }

    /// installments of one contract ordered by sequence
    pub fn installments_for_contract(
        &self,
        contract_id: ContractId,
        time: &SafeTimeProvider,
    ) -> Result<Vec<Installment>> {
        self.contract(contract_id, time).map(|c| c.installments)
    }

    /// every installment, grouped by contract in creation order
    pub fn installments(&self, time: &SafeTimeProvider) -> Vec<Installment> {
        let now = time.now();
        let state = self.read();
        state
            .order
            .iter()
            .filter_map(|id| state.contracts.get(id))
            .flat_map(|record| record.installment_ids.iter())
            .filter_map(|id| state.installments.get(id))
            .map(|installment| installment.resolved(now))
            .collect()
    }

    pub fn installment(&self, id: InstallmentId, time: &SafeTimeProvider) -> Result<Installment> {
        let now = time.now();
        let state = self.read();
        state
            .installments
            .get(&id)
            .map(|installment| installment.resolved(now))
            .ok_or_else(|| {
                warn!(installment_id = %id, "installment not found");
                EngineError::InstallmentNotFound { id }
            })
    }

    /// apply a due/payment date correction, recompute status and store it
    pub fn update_installment(
        &self,
        id: InstallmentId,
        update: InstallmentUpdate,
        time: &SafeTimeProvider,
    ) -> Result<Installment> {
        let now = time.now();
        let mut state = self.write();

        let installment = state.installments.get_mut(&id).ok_or_else(|| {
            warn!(installment_id = %id, "installment not found");
            EngineError::InstallmentNotFound { id }
        })?;

        let old_status = installment.status;
        installment.apply_update(&update, now);
        let updated = installment.clone();

        state.events.emit(Event::InstallmentUpdated {
            installment_id: updated.id,
            contract_id: updated.contract_id,
            due_date: updated.due_date,
            payment_date: updated.payment_date,
            timestamp: now,
        });
        if old_status != updated.status {
            state.events.emit(Event::StatusChanged {
                installment_id: updated.id,
                contract_id: updated.contract_id,
                old_status,
                new_status: updated.status,
                timestamp: now,
            });
        }
        drop(state);

        info!(
            installment_id = %updated.id,
            contract_id = %updated.contract_id,
            status = %updated.status,
            "installment updated"
        );

        Ok(updated)
    }

    /// update from raw request fields, a missing due date is rejected
    pub fn update_installment_raw(
        &self,
        id: InstallmentId,
        due_date: Option<&str>,
        payment_date: Option<&str>,
        time: &SafeTimeProvider,
    ) -> Result<Installment> {
        let update = InstallmentUpdate::parse(due_date, payment_date)?;
        self.update_installment(id, update, time)
    }

    /// update using system time
    pub fn update_installment_now(&self, id: InstallmentId, update: InstallmentUpdate) -> Result<Installment> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.update_installment(id, update, &time)
    }

    /// recompute and store every installment status, returning how many changed
    pub fn refresh_statuses(&self, time: &SafeTimeProvider) -> usize {
        let now = time.now();
        let mut state = self.write();
        let mut changes = Vec::new();

        for installment in state.installments.values_mut() {
            let old_status = installment.refresh_status(now);
            if old_status != installment.status {
                changes.push(Event::StatusChanged {
                    installment_id: installment.id,
                    contract_id: installment.contract_id,
                    old_status,
                    new_status: installment.status,
                    timestamp: now,
                });
            }
        }

        let changed = changes.len();
        for event in changes {
            state.events.emit(event);
        }
        debug!(changed, "refreshed installment statuses");
        changed
    }

    /// remove a contract together with all of its installments
    pub fn remove_contract(&self, id: ContractId) -> Result<Contract> {
        let mut state = self.write();
        let record = state
            .contracts
            .remove(&id)
            .ok_or(EngineError::ContractNotFound { id })?;
        state.order.retain(|c| *c != id);

        let mut contract = record.contract;
        contract.installments = record
            .installment_ids
            .iter()
            .filter_map(|iid| state.installments.remove(iid))
            .collect();
        drop(state);

        info!(contract_id = %id, "contract removed");
        Ok(contract)
    }

    pub fn contract_count(&self) -> usize {
        self.read().contracts.len()
    }

    pub fn installment_count(&self) -> usize {
        self.read().installments.len()
    }

    /// drain the events collected so far
    pub fn take_events(&self) -> Vec<Event> {
        self.write().events.take_events()
    }
}

impl Default for ContractLedger {
    fn default() -> Self {
        let config = EngineConfig::default();
        let generator = config.generator();
        Self::with_generator(config, generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::types::{InstallmentStatus, Periodicity};
    use chrono::{Duration, NaiveDate, TimeZone};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
        ))
    }

    fn terms() -> ContractTerms {
        ContractTerms::new(Money::from_major(1000), 3, Periodicity::monthly())
    }

    #[test]
    fn test_create_contract() {
        let time = test_time();
        let ledger = ContractLedger::default();

        let contract = ledger.create_contract(terms(), &time).unwrap();
        assert_eq!(contract.contracted_at, time.now());
        assert_eq!(contract.installments.len(), 3);
        assert!(contract.is_fully_scheduled());
        assert!(contract.installments.iter().all(|i| i.status == InstallmentStatus::Open));

        assert_eq!(ledger.contract_count(), 1);
        assert_eq!(ledger.installment_count(), 3);

        let stored = ledger.contract(contract.id, &time).unwrap();
        assert_eq!(stored, contract);
    }

    #[test]
    fn test_rejected_contract_leaves_ledger_untouched() {
        let time = test_time();
        let ledger = ContractLedger::default();

        let bad = ContractTerms::new(Money::from_major(1000), 0, Periodicity::monthly());
        let err = ledger.create_contract(bad, &time).unwrap_err();
        assert!(matches!(err, EngineError::InvalidScheduleInput { .. }));

        assert_eq!(ledger.contract_count(), 0);
        assert_eq!(ledger.installment_count(), 0);
        assert!(ledger.take_events().is_empty());
    }

    #[test]
    fn test_status_recomputed_on_read() {
        let time = test_time();
        let control = time.test_control().unwrap();
        let ledger = ContractLedger::default();
        let contract = ledger.create_contract(terms(), &time).unwrap();

        // first installment due 2024-02-15
        control.advance(Duration::days(31));
        let installments = ledger.installments_for_contract(contract.id, &time).unwrap();
        assert_eq!(installments[0].status, InstallmentStatus::Open);

        control.advance(Duration::days(1));
        let installments = ledger.installments_for_contract(contract.id, &time).unwrap();
        assert_eq!(installments[0].status, InstallmentStatus::Overdue);
        assert_eq!(installments[1].status, InstallmentStatus::Open);
    }

    #[test]
    fn test_update_installment() {
        let time = test_time();
        let control = time.test_control().unwrap();
        let ledger = ContractLedger::default();
        let contract = ledger.create_contract(terms(), &time).unwrap();
        let first = contract.installments[0].id;
        ledger.take_events();

        control.advance(Duration::days(60));
        let updated = ledger
            .update_installment(first, InstallmentUpdate::new(ymd(2024, 2, 15), Some(ymd(2024, 3, 10))), &time)
            .unwrap();
        assert_eq!(updated.status, InstallmentStatus::Settled);
        assert!(updated.paid_late());

        let stored = ledger.installment(first, &time).unwrap();
        assert_eq!(stored, updated);

        let events = ledger.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            Event::StatusChanged {
                old_status: InstallmentStatus::Open,
                new_status: InstallmentStatus::Settled,
                ..
            }
        ));
    }

    #[test]
    fn test_update_raw_requires_due_date() {
        let time = test_time();
        let ledger = ContractLedger::default();
        let contract = ledger.create_contract(terms(), &time).unwrap();
        let first = contract.installments[0].id;

        let err = ledger
            .update_installment_raw(first, None, Some("2024-02-10"), &time)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDateInput { .. }));

        let stored = ledger.installment(first, &time).unwrap();
        assert_eq!(stored.payment_date, None);
    }

    #[test]
    fn test_unknown_ids() {
        let time = test_time();
        let ledger = ContractLedger::default();
        let missing = Uuid::new_v4();

        assert!(matches!(
            ledger.contract(missing, &time),
            Err(EngineError::ContractNotFound { .. })
        ));
        assert!(matches!(
            ledger.installment(missing, &time),
            Err(EngineError::InstallmentNotFound { .. })
        ));
        assert!(matches!(
            ledger.update_installment(missing, InstallmentUpdate::new(ymd(2024, 1, 1), None), &time),
            Err(EngineError::InstallmentNotFound { .. })
        ));
    }

    #[test]
    fn test_listing_order() {
        let time = test_time();
        let ledger = ContractLedger::default();
        let a = ledger.create_contract(terms(), &time).unwrap();
        let b = ledger
            .create_contract(ContractTerms::new(Money::from_major(500), 2, Periodicity::weekly()), &time)
            .unwrap();

        let ids: Vec<_> = ledger.contracts(&time).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);

        let installments = ledger.installments(&time);
        assert_eq!(installments.len(), 5);
        assert!(installments[..3].iter().all(|i| i.contract_id == a.id));
        assert!(installments[3..].iter().all(|i| i.contract_id == b.id));
    }

    #[test]
    fn test_refresh_statuses_persists() {
        let time = test_time();
        let control = time.test_control().unwrap();
        let ledger = ContractLedger::default();
        ledger.create_contract(terms(), &time).unwrap();
        ledger.take_events();

        control.advance(Duration::days(70));
        assert_eq!(ledger.refresh_statuses(&time), 2);
        assert_eq!(ledger.refresh_statuses(&time), 0);
        assert_eq!(ledger.take_events().len(), 2);
    }

    #[test]
    fn test_events_buffer_until_drained() {
        let time = test_time();
        let ledger = ContractLedger::default();
        let a = ledger.create_contract(terms(), &time).unwrap();
        ledger.create_contract(terms(), &time).unwrap();
        ledger
            .update_installment(a.installments[0].id, InstallmentUpdate::new(ymd(2024, 2, 15), None), &time)
            .unwrap();

        let events = ledger.take_events();
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], Event::ContractCreated { .. }));
        assert!(matches!(events[4], Event::InstallmentUpdated { .. }));
        assert!(ledger.take_events().is_empty());
    }

    #[test]
    fn test_submit_uses_default_periodicity() {
        let time = test_time();
        let config = EngineConfig {
            default_periodicity: Periodicity::weekly(),
            ..EngineConfig::default()
        };
        let ledger = ContractLedger::new(config).unwrap();

        let request = ContractRequest {
            principal: Money::from_major(100),
            installment_count: 2,
            periodicity: None,
        };
        let contract = ledger.submit(request, &time).unwrap();
        assert_eq!(contract.periodicity, Periodicity::weekly());
        assert_eq!(contract.installments[0].due_date, ymd(2024, 1, 22));
    }

    #[test]
    fn test_remove_contract_cascades() {
        let time = test_time();
        let ledger = ContractLedger::default();
        let contract = ledger.create_contract(terms(), &time).unwrap();

        let removed = ledger.remove_contract(contract.id).unwrap();
        assert_eq!(removed.installments.len(), 3);
        assert_eq!(ledger.contract_count(), 0);
        assert_eq!(ledger.installment_count(), 0);
        assert!(ledger.remove_contract(contract.id).is_err());
    }
}
