// 🎂 Birth dates - month/day with an optional year
//
// Two input forms are accepted: MM-DD and MM-DD-YYYY.
// In the file an unknown year is written as the sentinel 1900.

use crate::error::{BirthdayError, BirthdayResult};
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Year written to the file when the birth year is unknown
pub const NO_YEAR_SENTINEL: i32 = 1900;

/// Leap year used to validate dates given without a year (accepts 02-29)
const VALIDATION_LEAP_YEAR: i32 = 2000;

// ============================================================================
// BIRTHDAY DATE
// ============================================================================

/// A birth date whose year may be unknown.
///
/// Month and day are always a valid calendar pair; when the year is known
/// the full date is valid too (`02-29-2001` never exists).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BirthdayDate {
    month: u32,
    day: u32,
    year: Option<i32>,
}

impl BirthdayDate {
    /// Build a date, validating month/day (and the full date when a year is given).
    /// The sentinel year is normalised to "no year".
    pub fn new(month: u32, day: u32, year: Option<i32>) -> BirthdayResult<Self> {
        let year = year.filter(|y| *y != NO_YEAR_SENTINEL);
        let check_year = year.unwrap_or(VALIDATION_LEAP_YEAR);

        if NaiveDate::from_ymd_opt(check_year, month, day).is_none() {
            let shown = match year {
                Some(y) => format!("{:02}-{:02}-{:04}", month, day, y),
                None => format!("{:02}-{:02}", month, day),
            };
            return Err(BirthdayError::InvalidDate(shown));
        }

        Ok(BirthdayDate { month, day, year })
    }

    /// Parse user input: `MM-DD` or `MM-DD-YYYY`
    pub fn parse(input: &str) -> BirthdayResult<Self> {
        let text = input.trim();
        let invalid = || BirthdayError::InvalidDate(text.to_string());

        if !text.is_ascii() {
            return Err(invalid());
        }

        let (month, day, year) = match text.len() {
            5 => {
                let (m, d) = split_month_day(text).ok_or_else(invalid)?;
                (m, d, None)
            }
            10 => {
                let (m, d) = split_month_day(&text[..5]).ok_or_else(invalid)?;
                if text.as_bytes()[5] != b'-' {
                    return Err(invalid());
                }
                let y = parse_digits(&text[6..]).ok_or_else(invalid)?;
                (m, d, Some(y as i32))
            }
            _ => return Err(invalid()),
        };

        BirthdayDate::new(month, day, year).map_err(|_| invalid())
    }

    /// Parse the stored form. `MM-DD-1900` means no year; bare `MM-DD` is tolerated.
    pub fn from_stored(text: &str) -> BirthdayResult<Self> {
        Self::parse(text)
    }

    /// Render the stored form (always MM-DD-YYYY)
    pub fn to_stored(&self) -> String {
        format!(
            "{:02}-{:02}-{:04}",
            self.month,
            self.day,
            self.year.unwrap_or(NO_YEAR_SENTINEL)
        )
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Chronological ordering key: (month, day, year or sentinel)
    pub fn sort_key(&self) -> (u32, u32, i32) {
        (self.month, self.day, self.year.unwrap_or(NO_YEAR_SENTINEL))
    }

    /// The date this birthday is observed in `year`.
    /// Feb 29 falls back to Feb 28 outside leap years.
    pub fn occurrence_in(&self, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
            .or_else(|| NaiveDate::from_ymd_opt(year, self.month, self.day - 1))
            // unreachable for validated month/day pairs
            .unwrap_or(NaiveDate::MAX)
    }

    /// First observed birthday on or after `today`
    pub fn next_occurrence(&self, today: NaiveDate) -> NaiveDate {
        let this_year = self.occurrence_in(today.year());
        if this_year >= today {
            this_year
        } else {
            self.occurrence_in(today.year() + 1)
        }
    }

    /// Days from `today` until the next occurrence (0 = today)
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        (self.next_occurrence(today) - today).num_days()
    }

    /// Age turned on the birthday falling in `date`'s year
    pub fn age_on(&self, date: NaiveDate) -> Option<u32> {
        let born = self.year?;
        let years = date.year() - born;
        if years < 0 {
            None
        } else {
            Some(years as u32)
        }
    }
}

impl fmt::Display for BirthdayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{:02}-{:02}-{:04}", self.month, self.day, year),
            None => write!(f, "{:02}-{:02}", self.month, self.day),
        }
    }
}

impl std::str::FromStr for BirthdayDate {
    type Err = BirthdayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BirthdayDate::parse(s)
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Split "MM-DD" into numbers
fn split_month_day(text: &str) -> Option<(u32, u32)> {
    if text.len() != 5 || text.as_bytes()[2] != b'-' {
        return None;
    }
    let month = parse_digits(&text[..2])?;
    let day = parse_digits(&text[3..])?;
    Some((month, day))
}

/// Parse a run of ASCII digits (no signs, no spaces)
fn parse_digits(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_month_day() {
        let date = BirthdayDate::parse("03-14").unwrap();

        assert_eq!(date.month(), 3);
        assert_eq!(date.day(), 14);
        assert_eq!(date.year(), None);
        assert_eq!(date.to_string(), "03-14");
    }

    #[test]
    fn test_parse_full_date() {
        let date = BirthdayDate::parse(" 12-31-1985 ").unwrap();

        assert_eq!(date.year(), Some(1985));
        assert_eq!(date.to_string(), "12-31-1985");
        assert_eq!(date.to_stored(), "12-31-1985");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for bad in ["", "3-14", "03/14", "03-14-85", "13-01", "04-31", "ab-cd", "03-14-19x5", "+3-14"] {
            assert!(BirthdayDate::parse(bad).is_err(), "should reject {:?}", bad);
        }

        match BirthdayDate::parse("13-01") {
            Err(BirthdayError::InvalidDate(text)) => assert_eq!(text, "13-01"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_leap_day_rules() {
        // Without a year Feb 29 is a valid birthday
        assert!(BirthdayDate::parse("02-29").is_ok());
        assert!(BirthdayDate::parse("02-29-2004").is_ok());
        assert!(BirthdayDate::parse("02-29-2001").is_err());
        assert!(BirthdayDate::parse("02-30").is_err());
    }

    #[test]
    fn test_sentinel_year_round_trip() {
        let no_year = BirthdayDate::parse("07-04").unwrap();
        assert_eq!(no_year.to_stored(), "07-04-1900");

        let reloaded = BirthdayDate::from_stored("07-04-1900").unwrap();
        assert_eq!(reloaded, no_year);
        assert_eq!(reloaded.year(), None);
    }

    #[test]
    fn test_sort_key_orders_chronologically() {
        let mut dates = vec![
            BirthdayDate::parse("12-01").unwrap(),
            BirthdayDate::parse("01-15-1990").unwrap(),
            BirthdayDate::parse("01-15").unwrap(),
            BirthdayDate::parse("01-02-2000").unwrap(),
        ];
        dates.sort_by_key(|d| d.sort_key());

        let shown: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
        assert_eq!(shown, vec!["01-02-2000", "01-15", "01-15-1990", "12-01"]);
    }

    #[test]
    fn test_next_occurrence() {
        let date = BirthdayDate::parse("06-10").unwrap();

        assert_eq!(date.next_occurrence(ymd(2026, 6, 1)), ymd(2026, 6, 10));
        assert_eq!(date.next_occurrence(ymd(2026, 6, 10)), ymd(2026, 6, 10));
        assert_eq!(date.next_occurrence(ymd(2026, 6, 11)), ymd(2027, 6, 10));

        assert_eq!(date.days_until(ymd(2026, 6, 10)), 0);
        assert_eq!(date.days_until(ymd(2026, 6, 9)), 1);
    }

    #[test]
    fn test_next_occurrence_wraps_year_end() {
        let date = BirthdayDate::parse("01-03").unwrap();

        assert_eq!(date.next_occurrence(ymd(2026, 12, 30)), ymd(2027, 1, 3));
        assert_eq!(date.days_until(ymd(2026, 12, 30)), 4);
    }

    #[test]
    fn test_leap_day_observed_on_feb_28() {
        let date = BirthdayDate::parse("02-29-2000").unwrap();

        assert_eq!(date.next_occurrence(ymd(2027, 1, 1)), ymd(2027, 2, 28));
        assert_eq!(date.next_occurrence(ymd(2028, 1, 1)), ymd(2028, 2, 29));
        assert_eq!(date.days_until(ymd(2028, 2, 29)), 0);
    }

    #[test]
    fn test_age_on() {
        let date = BirthdayDate::parse("05-20-1990").unwrap();

        assert_eq!(date.age_on(ymd(2026, 5, 20)), Some(36));
        assert_eq!(date.age_on(ymd(1980, 1, 1)), None);
        assert_eq!(BirthdayDate::parse("05-20").unwrap().age_on(ymd(2026, 5, 20)), None);
    }
}
