use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{ContractId, InstallmentId, InstallmentStatus, Periodicity};

/// all events that can be emitted by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // contract events
    ContractCreated {
        contract_id: ContractId,
        principal: Money,
        installment_count: u32,
        periodicity: Periodicity,
        timestamp: DateTime<Utc>,
    },
    ScheduleGenerated {
        contract_id: ContractId,
        first_due_date: NaiveDate,
        last_due_date: NaiveDate,
        total: Money,
        timestamp: DateTime<Utc>,
    },

    // installment events
    InstallmentUpdated {
        installment_id: InstallmentId,
        contract_id: ContractId,
        due_date: NaiveDate,
        payment_date: Option<NaiveDate>,
        timestamp: DateTime<Utc>,
    },
    StatusChanged {
        installment_id: InstallmentId,
        contract_id: ContractId,
        old_status: InstallmentStatus,
        new_status: InstallmentStatus,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events until they are drained
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
