//! Resolves symbolic date-range selectors into concrete calendar bounds.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::domain::DateRangeKind;

/// Inclusive calendar-date bounds for a provider search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

/// Resolve a selector against a caller-supplied "today". The clock is an
/// explicit argument so resolution stays a pure function of its inputs.
///
/// `custom` bounds are passed through without ordering validation: a caller
/// may hand us `start > end` and we forward it unchanged. The provider simply
/// returns nothing for an inverted window; we do not second-guess the input.
pub fn resolve(
    kind: DateRangeKind,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
    today: NaiveDate,
) -> DateBounds {
    match kind {
        DateRangeKind::Tonight => DateBounds { min_date: today, max_date: today },
        DateRangeKind::Weekend => weekend_bounds(today),
        DateRangeKind::Next7 => DateBounds { min_date: today, max_date: today + Duration::days(7) },
        DateRangeKind::Next14 => DateBounds { min_date: today, max_date: today + Duration::days(14) },
        DateRangeKind::Custom => DateBounds {
            min_date: custom_start.unwrap_or(today),
            max_date: custom_end.unwrap_or(today),
        },
    }
}

/// The upcoming Friday-to-Sunday span. If today already falls on the weekend
/// (Fri/Sat/Sun), the span starts today and still ends on that Sunday.
fn weekend_bounds(today: NaiveDate) -> DateBounds {
    let (start, end) = match today.weekday() {
        Weekday::Fri => (today, today + Duration::days(2)),
        Weekday::Sat => (today, today + Duration::days(1)),
        Weekday::Sun => (today, today),
        wd => {
            let until_friday = (Weekday::Fri.num_days_from_monday() + 7
                - wd.num_days_from_monday())
                % 7;
            let friday = today + Duration::days(until_friday as i64);
            (friday, friday + Duration::days(2))
        }
    };
    DateBounds { min_date: start, max_date: end }
}
