//! serializable views of contracts and installments

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::contract::Contract;
use crate::decimal::Money;
use crate::installment::Installment;
use crate::types::{ContractId, InstallmentId, Periodicity, StatusLocale};

/// serializable view of an installment, status rendered as a locale token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentView {
    pub id: InstallmentId,
    pub contract_id: ContractId,
    pub sequence: u32,
    pub amount: Money,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub status: String,
}

impl InstallmentView {
    pub fn from_installment(installment: &Installment, locale: StatusLocale) -> Self {
        InstallmentView {
            id: installment.id,
            contract_id: installment.contract_id,
            sequence: installment.sequence,
            amount: installment.amount,
            due_date: installment.due_date,
            payment_date: installment.payment_date,
            status: installment.status.label(locale).to_string(),
        }
    }
}

/// serializable view of a contract with its schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractView {
    pub id: ContractId,
    pub contracted_at: DateTime<Utc>,
    pub principal: Money,
    pub installment_count: u32,
    pub periodicity: Periodicity,
    pub outstanding: Money,
    pub installments: Vec<InstallmentView>,
}

impl ContractView {
    pub fn from_contract(contract: &Contract, locale: StatusLocale) -> Self {
        ContractView {
            id: contract.id,
            contracted_at: contract.contracted_at,
            principal: contract.principal,
            installment_count: contract.installment_count,
            periodicity: contract.periodicity,
            outstanding: contract.outstanding(),
            installments: contract
                .installments
                .iter()
                .map(|i| InstallmentView::from_installment(i, locale))
                .collect(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
