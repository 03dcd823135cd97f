use chrono::{DateTime, NaiveDate, Utc};

use crate::dates;
use crate::errors::{EngineError, Result};
use crate::types::InstallmentStatus;

/// derives installment status from its dates
///
/// Status is recomputed on every call. There is no stored previous status, so
/// the result depends only on the arguments:
///
/// - a recorded payment date means `Settled`, whatever the due date or clock
/// - otherwise a due date strictly before today (UTC) means `Overdue`
/// - otherwise `Open`, including on the due date itself
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusResolver;

impl StatusResolver {
    pub fn resolve(
        payment_date: Option<NaiveDate>,
        due_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> InstallmentStatus {
        if payment_date.is_some() {
            InstallmentStatus::Settled
        } else if due_date < now.date_naive() {
            InstallmentStatus::Overdue
        } else {
            InstallmentStatus::Open
        }
    }

    /// resolve from raw request fields
    ///
    /// A blank payment date counts as absent. A missing due date or any
    /// unparseable date fails with `InvalidDateInput`.
    pub fn resolve_raw(
        payment_date: Option<&str>,
        due_date: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<InstallmentStatus> {
        let due_date = due_date
            .filter(|raw| !raw.trim().is_empty())
            .ok_or_else(|| EngineError::date("due date is required"))?;
        let due_date = dates::parse_date(due_date)?;
        let payment_date = dates::parse_optional_date(payment_date)?;

        Ok(Self::resolve(payment_date, due_date, now))
    }

    /// payment recorded strictly after the due date
    pub fn paid_late(payment_date: Option<NaiveDate>, due_date: NaiveDate) -> bool {
        payment_date.map_or(false, |paid| paid > due_date)
    }
}
