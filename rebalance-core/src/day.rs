//! Day identifiers: symbolic days ("today", "tomorrow") and absolute dates.
//!
//! Symbolic days are resolved against a [`Clock`] before any arithmetic or
//! comparison happens; the task service still receives whichever form it
//! was handed.

use chrono::{Local, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::error::RebalanceError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayRef {
    Today,
    Tomorrow,
    Date(NaiveDate),
}

impl DayRef {
    /// Absolute date this day refers to, given today's date.
    pub fn resolve(&self, today: NaiveDate) -> NaiveDate {
        match self {
            DayRef::Today => today,
            DayRef::Tomorrow => today.succ_opt().unwrap_or(today),
            DayRef::Date(d) => *d,
        }
    }

    /// The calendar day after this one, always in absolute form.
    pub fn next(&self, today: NaiveDate) -> DayRef {
        let resolved = self.resolve(today);
        DayRef::Date(resolved.succ_opt().unwrap_or(resolved))
    }
}

impl fmt::Display for DayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayRef::Today => f.write_str("today"),
            DayRef::Tomorrow => f.write_str("tomorrow"),
            DayRef::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

impl FromStr for DayRef {
    type Err = RebalanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "today" => Ok(DayRef::Today),
            "tomorrow" => Ok(DayRef::Tomorrow),
            _ => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(DayRef::Date)
                .map_err(|e| {
                    RebalanceError::Configuration(format!(
                        "invalid day '{trimmed}' (expected today, tomorrow or YYYY-MM-DD): {e}"
                    ))
                }),
        }
    }
}

impl From<NaiveDate> for DayRef {
    fn from(d: NaiveDate) -> Self {
        DayRef::Date(d)
    }
}

/// Source of "today" for resolving symbolic days.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// System clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn resolves_symbolic_days() {
        let today = d(2026, 2, 28);
        assert_eq!(DayRef::Today.resolve(today), today);
        assert_eq!(DayRef::Tomorrow.resolve(today), d(2026, 3, 1));
        assert_eq!(DayRef::Date(d(2026, 1, 5)).resolve(today), d(2026, 1, 5));
    }

    #[test]
    fn next_crosses_month_and_year() {
        let today = d(2026, 12, 31);
        assert_eq!(DayRef::Today.next(today), DayRef::Date(d(2027, 1, 1)));
        assert_eq!(DayRef::Date(d(2028, 2, 28)).next(today), DayRef::Date(d(2028, 2, 29)));
    }

    #[test]
    fn display_and_parse() {
        assert_eq!(DayRef::Today.to_string(), "today");
        assert_eq!(DayRef::Date(d(2026, 3, 7)).to_string(), "2026-03-07");
        assert_eq!(format_date(d(2026, 3, 7)), "2026-03-07");

        assert_eq!("Today".parse::<DayRef>().unwrap(), DayRef::Today);
        assert_eq!("tomorrow".parse::<DayRef>().unwrap(), DayRef::Tomorrow);
        assert_eq!("2026-03-07".parse::<DayRef>().unwrap(), DayRef::Date(d(2026, 3, 7)));
        assert!(matches!(
            "next week".parse::<DayRef>(),
            Err(RebalanceError::Configuration(_))
        ));
    }
}
