//! Date and time literal validation.
//!
//! WFLang writes dates as `{YYYY-MM-DD}` and clock times as `{HH:MM}`, braces
//! included. A literal is accepted only when it matches the exact shape and
//! names a real calendar day between `{1900-01-01}` and `{3000-12-31}`, or a
//! clock time between `{00:00}` and `{23:59}`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

static DATE_SHAPE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\A\{(\d{4})-(\d{2})-(\d{2})\}\z").ok());
static TIME_SHAPE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\A\{(\d{2}):(\d{2})\}\z").ok());

pub const MIN_DATE: Date = Date {
    year: 1900,
    month: 1,
    day: 1,
};
pub const MAX_DATE: Date = Date {
    year: 3000,
    month: 12,
    day: 31,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid date format, must match pattern {{yyyy-MM-dd}} (including braces)")]
    DateFormat,
    #[error("date out of bounds, must be between {{1900-01-01}} and {{3000-12-31}}")]
    DateOutOfBounds,
    #[error("invalid calendar date")]
    InvalidCalendarDate,
    #[error("invalid time format, must match pattern {{hh:mm}} (including braces)")]
    TimeFormat,
    #[error("time out of range, must be between {{00:00}} and {{23:59}}")]
    TimeOutOfRange,
}

/// A calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{:04}-{:02}-{:02}}}", self.year, self.month, self.day)
    }
}

/// A wall-clock time with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Clock {
    pub hour: u8,
    pub minute: u8,
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{:02}:{:02}}}", self.hour, self.minute)
    }
}

pub(crate) fn is_date_shape(literal: &str) -> bool {
    DATE_SHAPE
        .as_ref()
        .map(|re| re.is_match(literal))
        .unwrap_or(false)
}

pub(crate) fn is_time_shape(literal: &str) -> bool {
    TIME_SHAPE
        .as_ref()
        .map(|re| re.is_match(literal))
        .unwrap_or(false)
}

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Parse a braced `{YYYY-MM-DD}` literal.
pub fn parse_date(literal: &str) -> Result<Date, DateError> {
    let captures = DATE_SHAPE
        .as_ref()
        .and_then(|re| re.captures(literal))
        .ok_or(DateError::DateFormat)?;
    let field = |idx: usize| {
        captures
            .get(idx)
            .and_then(|m| m.as_str().parse::<u16>().ok())
            .ok_or(DateError::DateFormat)
    };
    let (year, month, day) = (field(1)?, field(2)?, field(3)?);

    if month == 0 || month > 12 || day == 0 || day > u16::from(days_in_month(year, month as u8)) {
        return Err(DateError::InvalidCalendarDate);
    }
    let date = Date {
        year,
        month: month as u8,
        day: day as u8,
    };
    if date < MIN_DATE || date > MAX_DATE {
        return Err(DateError::DateOutOfBounds);
    }
    Ok(date)
}

/// Parse a braced `{HH:MM}` literal.
pub fn parse_time(literal: &str) -> Result<Clock, DateError> {
    let captures = TIME_SHAPE
        .as_ref()
        .and_then(|re| re.captures(literal))
        .ok_or(DateError::TimeFormat)?;
    let field = |idx: usize| {
        captures
            .get(idx)
            .and_then(|m| m.as_str().parse::<u8>().ok())
            .ok_or(DateError::TimeFormat)
    };
    let (hour, minute) = (field(1)?, field(2)?);
    if hour > 23 || minute > 59 {
        return Err(DateError::TimeOutOfRange);
    }
    Ok(Clock { hour, minute })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("{1900-01-01}", Some((1900, 1, 1)))]
    #[case("{3000-12-31}", Some((3000, 12, 31)))]
    #[case("{2024-02-29}", Some((2024, 2, 29)))]
    #[case("{1899-12-31}", None)]
    #[case("{3001-01-01}", None)]
    #[case(" {2001-01-01}", None)]
    #[case("{2001-01-01} ", None)]
    #[case("2001-01-01", None)]
    #[case("{23:59}", None)]
    #[case("{2023-02-29}", None)]
    #[case("{2023-13-01}", None)]
    fn parses_dates(#[case] literal: &str, #[case] expected: Option<(u16, u8, u8)>) {
        let parsed = parse_date(literal).ok().map(|d| (d.year, d.month, d.day));
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case("{00:00}", Some((0, 0)))]
    #[case("{23:59}", Some((23, 59)))]
    #[case("{24:00}", None)]
    #[case("{22:60}", None)]
    #[case(" {23:59}", None)]
    #[case("{23:59} ", None)]
    #[case("23:59", None)]
    #[case("{1900-01-01}", None)]
    fn parses_times(#[case] literal: &str, #[case] expected: Option<(u8, u8)>) {
        let parsed = parse_time(literal).ok().map(|c| (c.hour, c.minute));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn reports_dedicated_errors() {
        assert_eq!(parse_date("{1899-12-31}"), Err(DateError::DateOutOfBounds));
        assert_eq!(parse_date("1900-01-01"), Err(DateError::DateFormat));
        assert_eq!(parse_time("{24:00}"), Err(DateError::TimeOutOfRange));
        assert_eq!(
            DateError::DateFormat.to_string(),
            "invalid date format, must match pattern {yyyy-MM-dd} (including braces)"
        );
    }

    #[test]
    fn display_round_trips_literal() {
        let date = parse_date("{2024-03-07}").unwrap();
        assert_eq!(date.to_string(), "{2024-03-07}");
        let clock = parse_time("{07:05}").unwrap();
        assert_eq!(clock.to_string(), "{07:05}");
    }
}
