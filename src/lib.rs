pub mod config;
pub mod contract;
pub mod dates;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod installment;
pub mod ledger;
pub mod schedule;
pub mod serialization;
pub mod status;
pub mod types;

// re-export key types
pub use config::EngineConfig;
pub use contract::{Contract, ContractRequest, ContractTerms, ContractTermsBuilder};
pub use decimal::Money;
pub use errors::{EngineError, Result};
pub use events::{Event, EventStore};
pub use installment::{Installment, InstallmentDraft, InstallmentUpdate};
pub use ledger::ContractLedger;
pub use schedule::{AmountDistribution, EqualShares, ScheduleGenerator};
pub use serialization::{ContractView, InstallmentView};
pub use status::StatusResolver;
pub use types::{ContractId, InstallmentId, InstallmentStatus, Periodicity, StatusLocale};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
