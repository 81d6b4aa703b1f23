// Date handling for the ledger.
//
// Every date the skill touches is reduced to a calendar day in the ledger's
// timezone before it is compared, looked up, or spoken. Time-of-day never
// survives past this module.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Fixed UTC-5 zone. POSIX-style `Etc/` names invert the sign.
pub const DEFAULT_LEDGER_TIMEZONE: &str = "Etc/GMT+5";

/// Token the voice platform sends for "now" / "today".
const PRESENT_REF: &str = "PRESENT_REF";

/// Formats the spreadsheet may render a date cell in.
const LEDGER_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%B %d, %Y", "%A, %B %d, %Y"];
const LEDGER_DATETIME_FORMATS: &[&str] = &["%m/%d/%Y %H:%M:%S", "%Y-%m-%d %H:%M:%S"];

// ============================================================================
// DOMAIN MODELS
// ============================================================================

/// A day-granularity date in the ledger's local timezone.
///
/// Two values are equal iff year, month and day match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn new(day: NaiveDate) -> Self {
        Self(day)
    }

    /// Normalizes an instant to the calendar day it falls on in `tz`.
    pub fn from_instant(instant: DateTime<Utc>, tz: &Tz) -> Self {
        Self(instant.with_timezone(tz).date_naive())
    }

    pub fn day(&self) -> NaiveDate {
        self.0
    }

    /// Parses the text of a ledger date cell. Blank or unrecognized cells
    /// return `None` and therefore never match a lookup.
    pub fn parse_ledger_cell(cell: &str, tz: &Tz) -> Option<Self> {
        let cell = cell.trim();
        if cell.is_empty() {
            return None;
        }

        for format in LEDGER_DATE_FORMATS {
            if let Ok(day) = NaiveDate::parse_from_str(cell, format) {
                return Some(Self(day));
            }
        }

        for format in LEDGER_DATETIME_FORMATS {
            if let Ok(stamp) = NaiveDateTime::parse_from_str(cell, format) {
                return Some(Self(stamp.date()));
            }
        }

        DateTime::parse_from_rfc3339(cell)
            .ok()
            .map(|stamp| Self::from_instant(stamp.with_timezone(&Utc), tz))
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// A date resolved from a slot together with the way it should be spoken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDate {
    pub date: CalendarDate,
    pub label: String,
}

/// Which verb forms a reply should use for a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tense {
    Present,
    Past,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("Could not understand the date '{0}'")]
    Unparseable(String),
}

// ============================================================================
// CLOCK
// ============================================================================

/// Source of "now". Swapped for a fixed clock in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ============================================================================
// SPEECH FORMATTING
// ============================================================================

/// English ordinal suffix for a day of the month.
pub fn ordinal_suffix(day: u32) -> &'static str {
    let (tens, hundreds) = (day % 10, day % 100);
    if tens == 1 && hundreds != 11 {
        "st"
    } else if tens == 2 && hundreds != 12 {
        "nd"
    } else if tens == 3 && hundreds != 13 {
        "rd"
    } else {
        "th"
    }
}

/// `1` -> `"1st"`, `22` -> `"22nd"`.
pub fn ordinal(day: u32) -> String {
    format!("{}{}", day, ordinal_suffix(day))
}

/// "March 3rd"
pub fn speakable(date: CalendarDate) -> String {
    let day = date.day();
    format!("{} {}", day.format("%B"), ordinal(day.day()))
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct DateService {
    tz: Tz,
    clock: Arc<dyn Clock>,
}

impl DateService {
    pub fn new(tz: Tz) -> Self {
        Self::with_clock(tz, Arc::new(SystemClock))
    }

    pub fn with_clock(tz: Tz, clock: Arc<dyn Clock>) -> Self {
        Self { tz, clock }
    }

    /// Reads `LEDGER_TIMEZONE`, falling back to the fixed default offset.
    pub fn from_env() -> Self {
        let name = std::env::var("LEDGER_TIMEZONE")
            .unwrap_or_else(|_| DEFAULT_LEDGER_TIMEZONE.to_string());

        let tz: Tz = name.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Unknown LEDGER_TIMEZONE '{}', using {}",
                name,
                DEFAULT_LEDGER_TIMEZONE
            );
            chrono_tz::Etc::GMTPlus5
        });

        Self::new(tz)
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn today(&self) -> CalendarDate {
        CalendarDate::from_instant(self.clock.now(), &self.tz)
    }

    /// Turns an optional raw slot value into a date and its spoken label.
    ///
    /// Absent, blank, and `PRESENT_REF` values all mean today.
    pub fn resolve(&self, raw: Option<&str>) -> Result<ResolvedDate, DateError> {
        let raw = raw.map(str::trim).filter(|value| !value.is_empty());

        let date = match raw {
            None => self.today(),
            Some(value) if value.eq_ignore_ascii_case(PRESENT_REF) => self.today(),
            Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(CalendarDate::new)
                .map_err(|_| DateError::Unparseable(value.to_string()))?,
        };

        Ok(ResolvedDate {
            date,
            label: self.label_for(date),
        })
    }

    pub fn label_for(&self, date: CalendarDate) -> String {
        if date == self.today() {
            "today".to_string()
        } else {
            speakable(date)
        }
    }

    /// Today and later read in the present tense; anything earlier in the past.
    pub fn tense_for(&self, date: CalendarDate) -> Tense {
        if date >= self.today() {
            Tense::Present
        } else {
            Tense::Past
        }
    }
}
