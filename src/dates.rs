use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime, Utc};

use crate::errors::{EngineError, Result};
use crate::types::Periodicity;

/// advance a date by one periodicity step
///
/// month and year steps clamp to the last valid day of the target month,
/// so 2024-01-31 plus one month is 2024-02-29.
pub fn advance(date: NaiveDate, periodicity: Periodicity) -> Result<NaiveDate> {
    periodicity.validate()?;

    let next = match periodicity {
        Periodicity::Days(n) => date.checked_add_days(Days::new(n as u64)),
        Periodicity::Weeks(n) => date.checked_add_days(Days::new(n as u64 * 7)),
        Periodicity::Months(n) => date.checked_add_months(Months::new(n)),
        Periodicity::Years(n) => n
            .checked_mul(12)
            .and_then(|months| date.checked_add_months(Months::new(months))),
    };

    next.ok_or_else(|| {
        EngineError::schedule(format!(
            "due date out of range advancing {} by {}",
            date, periodicity
        ))
    })
}

/// parse a raw date field
///
/// accepts `YYYY-MM-DD`, RFC 3339 timestamps (reduced to their UTC date)
/// and `YYYY-MM-DDTHH:MM:SS` without offset.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(EngineError::date("empty date"));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc).date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.date());
    }

    Err(EngineError::date(format!("unparseable date: {:?}", raw)))
}

/// parse an optional field where empty or blank means absent
pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_advance_units() {
        let start = ymd(2024, 1, 15);
        assert_eq!(advance(start, Periodicity::daily()).unwrap(), ymd(2024, 1, 16));
        assert_eq!(advance(start, Periodicity::weekly()).unwrap(), ymd(2024, 1, 22));
        assert_eq!(advance(start, Periodicity::monthly()).unwrap(), ymd(2024, 2, 15));
        assert_eq!(advance(start, Periodicity::quarterly()).unwrap(), ymd(2024, 4, 15));
        assert_eq!(advance(start, Periodicity::yearly()).unwrap(), ymd(2025, 1, 15));
    }

    #[test]
    fn test_advance_clamps_month_end() {
        assert_eq!(advance(ymd(2024, 1, 31), Periodicity::monthly()).unwrap(), ymd(2024, 2, 29));
        assert_eq!(advance(ymd(2023, 1, 31), Periodicity::monthly()).unwrap(), ymd(2023, 2, 28));
        assert_eq!(advance(ymd(2024, 2, 29), Periodicity::yearly()).unwrap(), ymd(2025, 2, 28));
    }

    #[test]
    fn test_advance_rejects_zero_interval() {
        let err = advance(ymd(2024, 1, 1), Periodicity::Days(0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidScheduleInput { .. }));
    }

    #[test]
    fn test_advance_out_of_range() {
        let err = advance(NaiveDate::MAX, Periodicity::monthly()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidScheduleInput { .. }));
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(parse_date("2024-06-02").unwrap(), ymd(2024, 6, 2));
        assert_eq!(parse_date(" 2024-06-02 ").unwrap(), ymd(2024, 6, 2));
        assert_eq!(parse_date("2024-06-02T10:30:00Z").unwrap(), ymd(2024, 6, 2));
        assert_eq!(parse_date("2024-06-02T23:30:00-03:00").unwrap(), ymd(2024, 6, 3));
        assert_eq!(parse_date("2024-06-02T10:30:00").unwrap(), ymd(2024, 6, 2));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "   ", "yesterday", "2024-13-01", "02/06/2024"] {
            let err = parse_date(raw).unwrap_err();
            assert!(matches!(err, EngineError::InvalidDateInput { .. }), "{raw}");
        }
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(parse_optional_date(None).unwrap(), None);
        assert_eq!(parse_optional_date(Some("")).unwrap(), None);
        assert_eq!(parse_optional_date(Some("  ")).unwrap(), None);
        assert_eq!(parse_optional_date(Some("2024-06-02")).unwrap(), Some(ymd(2024, 6, 2)));
        assert!(parse_optional_date(Some("not a date")).is_err());
    }
}
