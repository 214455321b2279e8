// 🎉 Interactive menu loop
//
// Reads choices from any BufRead and writes to any Write so the loop can be
// driven from tests. Every mutation rewrites the birthday file.

use crate::config::Config;
use crate::date::BirthdayDate;
use crate::error::BirthdayError;
use crate::storage::save_store;
use crate::store::BirthdayStore;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::io::{BufRead, Write};

const DATE_HINT: &str = "MM-DD or MM-DD-YYYY";

/// Today's date according to the local clock
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    Change,
    Remove,
    CheckToday,
    Upcoming,
    ListAll,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 7] = [
        MenuChoice::Add,
        MenuChoice::Change,
        MenuChoice::Remove,
        MenuChoice::CheckToday,
        MenuChoice::Upcoming,
        MenuChoice::ListAll,
        MenuChoice::Exit,
    ];

    pub fn from_input(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Add),
            "2" => Some(MenuChoice::Change),
            "3" => Some(MenuChoice::Remove),
            "4" => Some(MenuChoice::CheckToday),
            "5" => Some(MenuChoice::Upcoming),
            "6" => Some(MenuChoice::ListAll),
            "7" => Some(MenuChoice::Exit),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::Add => "ADD a Birthday",
            MenuChoice::Change => "CHANGE a Birthday",
            MenuChoice::Remove => "REMOVE a Birthday",
            MenuChoice::CheckToday => "CHECK Today's Birthdays",
            MenuChoice::Upcoming => "UPCOMING Birthdays",
            MenuChoice::ListAll => "LIST All Birthdays",
            MenuChoice::Exit => "EXIT",
        }
    }
}

pub struct Menu {
    store: BirthdayStore,
    config: Config,
    today: fn() -> NaiveDate,
}

impl Menu {
    pub fn new(store: BirthdayStore, config: Config) -> Self {
        Menu {
            store,
            config,
            today: local_today,
        }
    }

    /// Replace the clock (tests pin "today")
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn store(&self) -> &BirthdayStore {
        &self.store
    }

    /// Run until EXIT or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<()> {
        writeln!(out, "\nBirthday Checker")?;

        loop {
            writeln!(out)?;
            for (i, choice) in MenuChoice::ALL.iter().enumerate() {
                writeln!(out, "{}. {}", i + 1, choice.label())?;
            }

            let line = match prompt(input, out, "\nChoose an option: ")? {
                Some(line) => line,
                None => {
                    writeln!(out, "\nGoodbye!")?;
                    return Ok(());
                }
            };

            match MenuChoice::from_input(&line) {
                Some(MenuChoice::Add) => self.add(input, out)?,
                Some(MenuChoice::Change) => self.change(input, out)?,
                Some(MenuChoice::Remove) => self.remove(input, out)?,
                Some(MenuChoice::CheckToday) => {
                    print_todays(out, &self.store, (self.today)())?
                }
                Some(MenuChoice::Upcoming) => print_upcoming(
                    out,
                    &self.store,
                    (self.today)(),
                    self.config.upcoming_days,
                )?,
                Some(MenuChoice::ListAll) => print_all(out, &self.store)?,
                Some(MenuChoice::Exit) => {
                    writeln!(out, "Goodbye!")?;
                    return Ok(());
                }
                None => writeln!(out, "Invalid option. Please try again.")?,
            }
        }
    }

    fn add<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<()> {
        let Some(name) = prompt(input, out, "Enter name: ")? else {
            return Ok(());
        };
        let Some(raw_date) = prompt(input, out, &format!("Enter their birthday ({}): ", DATE_HINT))?
        else {
            return Ok(());
        };

        let date = match BirthdayDate::parse(&raw_date) {
            Ok(date) => date,
            Err(_) => {
                writeln!(out, "Invalid date format. Please use {}.", DATE_HINT)?;
                return Ok(());
            }
        };

        let added = self.store.add(&name, date).map(|record| record.name.clone());
        match added {
            Ok(added_name) => {
                if self.persist(out)? {
                    writeln!(out, "Birthday added for {}!", added_name)?;
                }
            }
            Err(BirthdayError::DuplicateName(name)) => writeln!(
                out,
                "A birthday for {} is already stored. Use CHANGE to update it.",
                name
            )?,
            Err(err) => writeln!(out, "Could not add birthday: {}.", err)?,
        }

        Ok(())
    }

    fn change<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<()> {
        if self.store.is_empty() {
            writeln!(out, "\nNo birthdays stored yet.")?;
            return Ok(());
        }

        let Some(name) = prompt(
            input,
            out,
            "Enter the name of the person whose birthday you want to change: ",
        )?
        else {
            return Ok(());
        };

        let Some(record) = self.store.get(&name) else {
            writeln!(out, "No birthday found for {}.", name.trim())?;
            return Ok(());
        };
        let stored_name = record.name.clone();
        writeln!(out, "Current birthday for {}: {}", stored_name, record.date)?;

        let Some(raw_date) =
            prompt(input, out, &format!("Enter the new birthday ({}): ", DATE_HINT))?
        else {
            return Ok(());
        };

        let date = match BirthdayDate::parse(&raw_date) {
            Ok(date) => date,
            Err(_) => {
                writeln!(out, "Invalid date format. Please use {}.", DATE_HINT)?;
                return Ok(());
            }
        };

        self.store.change(&name, date)?;
        if self.persist(out)? {
            writeln!(out, "Birthday updated for {} to {}!", stored_name, date)?;
        }
        Ok(())
    }

    fn remove<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<()> {
        if self.store.is_empty() {
            writeln!(out, "\nNo birthdays stored yet.")?;
            return Ok(());
        }

        let Some(name) = prompt(
            input,
            out,
            "Enter the name of the person whose birthday you want to remove: ",
        )?
        else {
            return Ok(());
        };

        match self.store.remove(&name) {
            Ok(record) => {
                writeln!(out, "Removing birthday for {}: {}", record.name, record.date)?;
                if self.persist(out)? {
                    writeln!(out, "Birthday for {} has been removed.", record.name)?;
                }
            }
            Err(_) => writeln!(out, "No birthday found for {}.", name.trim())?,
        }

        Ok(())
    }

    /// Rewrite the file. A failed save is reported on `out` and the session goes on;
    /// the in-memory change is kept so a later save can still write it.
    fn persist<W: Write>(&self, out: &mut W) -> Result<bool> {
        match save_store(&self.config.file, &self.store) {
            Ok(_) => Ok(true),
            Err(err) => {
                log::error!("Saving {} failed: {:#}", self.config.file.display(), err);
                writeln!(out, "Could not save birthdays: {:#}", err)?;
                Ok(false)
            }
        }
    }
}

/// Print a prompt and read one line. `None` means end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, text: &str) -> Result<Option<String>> {
    write!(out, "{}", text)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

// ============================================================================
// REPORTS (shared with the one-shot commands in main)
// ============================================================================

pub fn print_todays<W: Write>(out: &mut W, store: &BirthdayStore, today: NaiveDate) -> Result<()> {
    let todays = store.todays(today);

    if todays.is_empty() {
        writeln!(out, "\nNo birthdays today.")?;
        return Ok(());
    }

    writeln!(out, "\n🎉 Today's Birthdays 🎉")?;
    for record in todays {
        match record.date.age_on(today) {
            Some(age) => writeln!(out, "- {} (turns {})", record.name, age)?,
            None => writeln!(out, "- {}", record.name)?,
        }
    }
    Ok(())
}

pub fn print_upcoming<W: Write>(
    out: &mut W,
    store: &BirthdayStore,
    today: NaiveDate,
    window_days: u32,
) -> Result<()> {
    let upcoming = store.upcoming(today, window_days);

    if upcoming.is_empty() {
        writeln!(out, "\nNo birthdays in the next {} days.", window_days)?;
        return Ok(());
    }

    writeln!(out, "\nUpcoming Birthdays (next {} days):", window_days)?;
    for entry in upcoming {
        let when = match entry.days_until {
            0 => "today".to_string(),
            1 => "tomorrow".to_string(),
            n => format!("in {} days", n),
        };
        let turning = entry
            .turning
            .map(|age| format!(", turns {}", age))
            .unwrap_or_default();
        writeln!(
            out,
            "- {}: {} ({}{})",
            entry.record.name,
            entry.next_date.format("%m-%d"),
            when,
            turning
        )?;
    }
    Ok(())
}

pub fn print_all<W: Write>(out: &mut W, store: &BirthdayStore) -> Result<()> {
    if store.is_empty() {
        writeln!(out, "\nNo birthdays stored.")?;
        return Ok(());
    }

    writeln!(out, "\nStored Birthdays:")?;
    for record in store.all() {
        writeln!(out, "- {}: {}", record.name, record.date)?;
    }
    Ok(())
}

/// Shape of `bday list --json`
#[derive(Serialize)]
struct BirthdayJson<'a> {
    name: &'a str,
    month: u32,
    day: u32,
    year: Option<i32>,
}

/// All birthdays as a JSON array, chronological order
pub fn print_json<W: Write>(out: &mut W, store: &BirthdayStore) -> Result<()> {
    let rows: Vec<BirthdayJson> = store
        .all()
        .into_iter()
        .map(|r| BirthdayJson {
            name: &r.name,
            month: r.date.month(),
            day: r.date.day(),
            year: r.date.year(),
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &rows)?;
    writeln!(out)?;
    Ok(())
}
