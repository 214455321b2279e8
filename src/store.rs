// 📇 Record Store - names → birth dates
//
// Names are unique case-insensitively. The spelling given on add is
// kept for display; the lowercase form is the key.

use crate::date::BirthdayDate;
use crate::error::{BirthdayError, BirthdayResult};
use chrono::NaiveDate;
use std::collections::HashMap;

// ============================================================================
// RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayRecord {
    pub name: String,
    pub date: BirthdayDate,
}

impl BirthdayRecord {
    pub fn new(name: impl Into<String>, date: BirthdayDate) -> Self {
        BirthdayRecord {
            name: name.into(),
            date,
        }
    }

    /// Lookup key (case-insensitive)
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }
}

/// A record paired with its next occurrence, as returned by `upcoming`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingBirthday {
    pub record: BirthdayRecord,
    pub next_date: NaiveDate,
    pub days_until: i64,
    /// Age turned on `next_date`, when the birth year is known
    pub turning: Option<u32>,
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct BirthdayStore {
    records: HashMap<String, BirthdayRecord>,
}

impl BirthdayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded rows. Later duplicates of a name are dropped.
    pub fn from_records(records: Vec<BirthdayRecord>) -> Self {
        let mut store = BirthdayStore::new();

        for record in records {
            let key = record.key();
            if key.is_empty() {
                log::warn!("Skipping birthday with empty name ({})", record.date);
                continue;
            }
            if let Some(existing) = store.records.get(&key) {
                log::warn!(
                    "Dropping duplicate birthday for '{}' ({}); keeping {}",
                    record.name,
                    record.date,
                    existing.date
                );
                continue;
            }
            store.records.insert(key, record);
        }

        store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&BirthdayRecord> {
        self.records.get(&normalize_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(&normalize_name(name))
    }

    /// Insert a new record
    pub fn add(&mut self, name: &str, date: BirthdayDate) -> BirthdayResult<&BirthdayRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BirthdayError::EmptyName);
        }

        let key = normalize_name(name);
        if self.records.contains_key(&key) {
            return Err(BirthdayError::DuplicateName(name.to_string()));
        }

        log::debug!("Adding birthday for '{}': {}", name, date);
        let record = self
            .records
            .entry(key)
            .or_insert_with(|| BirthdayRecord::new(name, date));
        Ok(&*record)
    }

    /// Replace the date of an existing record, returning the previous date
    pub fn change(&mut self, name: &str, date: BirthdayDate) -> BirthdayResult<BirthdayDate> {
        let record = self
            .records
            .get_mut(&normalize_name(name))
            .ok_or_else(|| BirthdayError::NotFound(name.trim().to_string()))?;

        let previous = record.date;
        record.date = date;
        log::debug!("Changed birthday for '{}': {} -> {}", record.name, previous, date);

        Ok(previous)
    }

    /// Delete a record, returning it
    pub fn remove(&mut self, name: &str) -> BirthdayResult<BirthdayRecord> {
        let removed = self
            .records
            .remove(&normalize_name(name))
            .ok_or_else(|| BirthdayError::NotFound(name.trim().to_string()))?;

        log::debug!("Removed birthday for '{}'", removed.name);
        Ok(removed)
    }

    /// Every record, in chronological order (month, day, year)
    pub fn all(&self) -> Vec<&BirthdayRecord> {
        let mut records: Vec<&BirthdayRecord> = self.records.values().collect();
        sort_chronologically(&mut records);
        records
    }

    /// Records whose birthday is observed on `today` (Feb 29 on Feb 28 in common years)
    pub fn todays(&self, today: NaiveDate) -> Vec<&BirthdayRecord> {
        let mut records: Vec<&BirthdayRecord> = self
            .records
            .values()
            .filter(|r| r.date.next_occurrence(today) == today)
            .collect();
        sort_chronologically(&mut records);
        records
    }

    /// Birthdays whose next occurrence is at most `window_days` away, soonest first
    pub fn upcoming(&self, today: NaiveDate, window_days: u32) -> Vec<UpcomingBirthday> {
        let mut upcoming: Vec<UpcomingBirthday> = self
            .records
            .values()
            .filter_map(|record| {
                let next_date = record.date.next_occurrence(today);
                let days_until = (next_date - today).num_days();
                if days_until > window_days as i64 {
                    return None;
                }
                Some(UpcomingBirthday {
                    record: record.clone(),
                    next_date,
                    days_until,
                    turning: record.date.age_on(next_date),
                })
            })
            .collect();

        upcoming.sort_by(|a, b| {
            a.days_until
                .cmp(&b.days_until)
                .then_with(|| a.record.date.sort_key().cmp(&b.record.date.sort_key()))
                .then_with(|| a.record.key().cmp(&b.record.key()))
        });
        upcoming
    }
}

/// Case-insensitive key for a name
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn sort_chronologically(records: &mut [&BirthdayRecord]) {
    records.sort_by(|a, b| {
        a.date
            .sort_key()
            .cmp(&b.date.sort_key())
            .then_with(|| a.key().cmp(&b.key()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(text: &str) -> BirthdayDate {
        BirthdayDate::parse(text).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_store() -> BirthdayStore {
        let mut store = BirthdayStore::new();
        store.add("Alice", date("03-14-1990")).unwrap();
        store.add("bob", date("10-19")).unwrap();
        store.add("Carol", date("10-25-2001")).unwrap();
        store.add("Dave", date("01-02")).unwrap();
        store
    }

    #[test]
    fn test_add_and_get_case_insensitive() {
        let store = sample_store();

        assert_eq!(store.len(), 4);
        let alice = store.get("ALICE").unwrap();
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.date, date("03-14-1990"));
        assert!(store.contains("  carol "));
        assert!(store.get("Eve").is_none());
    }

    #[test]
    fn test_add_rejects_duplicates_and_empty_names() {
        let mut store = sample_store();

        assert_eq!(
            store.add("aLiCe", date("01-01")),
            Err(BirthdayError::DuplicateName("aLiCe".to_string()))
        );
        assert_eq!(store.add("   ", date("01-01")), Err(BirthdayError::EmptyName));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_change_returns_previous_date() {
        let mut store = sample_store();

        let previous = store.change("BOB", date("11-05-1970")).unwrap();

        assert_eq!(previous, date("10-19"));
        let bob = store.get("bob").unwrap();
        assert_eq!(bob.name, "bob");
        assert_eq!(bob.date, date("11-05-1970"));

        assert_eq!(
            store.change("Zed", date("01-01")),
            Err(BirthdayError::NotFound("Zed".to_string()))
        );
    }

    #[test]
    fn test_remove() {
        let mut store = sample_store();

        let removed = store.remove("dave").unwrap();
        assert_eq!(removed.name, "Dave");
        assert_eq!(store.len(), 3);
        assert!(!store.contains("Dave"));

        assert!(matches!(store.remove("dave"), Err(BirthdayError::NotFound(_))));
    }

    #[test]
    fn test_all_is_chronological() {
        let store = sample_store();

        let names: Vec<&str> = store.all().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Dave", "Alice", "bob", "Carol"]);
    }

    #[test]
    fn test_todays() {
        let store = sample_store();

        let today: Vec<&str> = store
            .todays(ymd(2026, 10, 19))
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(today, vec!["bob"]);

        assert!(store.todays(ymd(2026, 10, 20)).is_empty());
    }

    #[test]
    fn test_todays_leap_day_in_common_year() {
        let mut store = BirthdayStore::new();
        store.add("Leap", date("02-29-2000")).unwrap();
        store.add("Leap Unknown", date("02-29")).unwrap();
        store.add("Feb 28", date("02-28")).unwrap();

        let names: Vec<&str> = store
            .todays(ymd(2027, 2, 28))
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Feb 28", "Leap Unknown", "Leap"]);

        // In a leap year only the 02-28 birthday is on Feb 28
        assert_eq!(store.todays(ymd(2028, 2, 28)).len(), 1);
        assert_eq!(store.todays(ymd(2028, 2, 29)).len(), 2);
    }

    #[test]
    fn test_upcoming_window_and_order() {
        let store = sample_store();

        let upcoming = store.upcoming(ymd(2026, 10, 19), 30);
        let names: Vec<&str> = upcoming.iter().map(|u| u.record.name.as_str()).collect();
        assert_eq!(names, vec!["bob", "Carol"]);

        assert_eq!(upcoming[0].days_until, 0);
        assert_eq!(upcoming[0].turning, None);
        assert_eq!(upcoming[1].days_until, 6);
        assert_eq!(upcoming[1].next_date, ymd(2026, 10, 25));
        assert_eq!(upcoming[1].turning, Some(25));
    }

    #[test]
    fn test_upcoming_wraps_into_next_year() {
        let store = sample_store();

        let upcoming = store.upcoming(ymd(2026, 12, 20), 20);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].record.name, "Dave");
        assert_eq!(upcoming[0].next_date, ymd(2027, 1, 2));
        assert_eq!(upcoming[0].days_until, 13);
    }

    #[test]
    fn test_upcoming_ties_break_by_date_then_name() {
        let mut store = BirthdayStore::new();
        store.add("zoe", date("05-01-1999")).unwrap();
        store.add("Amy", date("05-01-1999")).unwrap();
        store.add("Max", date("05-01")).unwrap();

        let names: Vec<String> = store
            .upcoming(ymd(2026, 4, 30), 7)
            .into_iter()
            .map(|u| u.record.name)
            .collect();
        assert_eq!(names, vec!["Max", "Amy", "zoe"]);
    }

    #[test]
    fn test_from_records_drops_duplicates() {
        let store = BirthdayStore::from_records(vec![
            BirthdayRecord::new("Ann", date("01-01")),
            BirthdayRecord::new("ANN", date("02-02")),
            BirthdayRecord::new("", date("03-03")),
            BirthdayRecord::new("Ben", date("04-04")),
        ]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("ann").unwrap().date, date("01-01"));
    }
}
