// 💾 Flat-file persistence - CSV with a `name,date` header
//
// The whole set is read at startup and rewritten after every mutation.

use crate::date::BirthdayDate;
use crate::store::{BirthdayRecord, BirthdayStore};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One line of the birthday file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BirthdayRow {
    #[serde(rename = "name")]
    pub name: String,

    /// Stored form: MM-DD-YYYY, year 1900 = unknown
    #[serde(rename = "date")]
    pub date: String,
}

impl From<&BirthdayRecord> for BirthdayRow {
    fn from(record: &BirthdayRecord) -> Self {
        BirthdayRow {
            name: record.name.clone(),
            date: record.date.to_stored(),
        }
    }
}

/// Load all birthdays from `path`. A missing file is an empty list.
/// Rows with an unparseable date are skipped with a warning.
pub fn load_birthdays(path: &Path) -> Result<Vec<BirthdayRecord>> {
    if !path.exists() {
        log::info!("No birthday file at {}, starting empty", path.display());
        return Ok(Vec::new());
    }

    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open birthday file {}", path.display()))?;

    let mut records = Vec::new();
    let mut skipped = 0;

    for (index, result) in rdr.deserialize().enumerate() {
        let row: BirthdayRow = result.with_context(|| {
            format!("Failed to read row {} of {}", index + 2, path.display())
        })?;

        match BirthdayDate::from_stored(&row.date) {
            Ok(date) => records.push(BirthdayRecord::new(row.name.trim(), date)),
            Err(err) => {
                skipped += 1;
                log::warn!("Skipping '{}' on line {}: {}", row.name, index + 2, err);
            }
        }
    }

    log::info!(
        "Loaded {} birthdays from {} ({} skipped)",
        records.len(),
        path.display(),
        skipped
    );

    Ok(records)
}

/// Rewrite `path` with every record in chronological order.
/// Writes a sibling temp file first, then renames it into place.
pub fn save_birthdays<'a, I>(path: &Path, records: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a BirthdayRecord>,
{
    let mut rows: Vec<&BirthdayRecord> = records.into_iter().collect();
    rows.sort_by(|a, b| {
        a.date
            .sort_key()
            .cmp(&b.date.sort_key())
            .then_with(|| a.key().cmp(&b.key()))
    });

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let tmp_path = temp_path_for(path);
    let written = write_rows(&tmp_path, &rows).and_then(|_| {
        fs::rename(&tmp_path, path).with_context(|| {
            format!("Failed to move {} to {}", tmp_path.display(), path.display())
        })
    });

    if let Err(err) = written {
        if tmp_path.exists() {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                log::warn!("Could not remove {}: {}", tmp_path.display(), cleanup);
            }
        }
        return Err(err);
    }

    log::debug!("Saved {} birthdays to {}", rows.len(), path.display());
    Ok(rows.len())
}

/// Load the file straight into a store
pub fn load_store(path: &Path) -> Result<BirthdayStore> {
    Ok(BirthdayStore::from_records(load_birthdays(path)?))
}

/// Persist a whole store
pub fn save_store(path: &Path, store: &BirthdayStore) -> Result<usize> {
    save_birthdays(path, store.all())
}

fn write_rows(tmp_path: &Path, rows: &[&BirthdayRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(tmp_path)
        .with_context(|| format!("Failed to create {}", tmp_path.display()))?;

    // An empty set still gets its header
    if rows.is_empty() {
        wtr.write_record(["name", "date"])?;
    }
    for record in rows {
        wtr.serialize(BirthdayRow::from(*record))
            .context("Failed to write birthday row")?;
    }
    wtr.flush().context("Failed to flush birthday file")?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "bdays.csv".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(name: &str, date: &str) -> BirthdayRecord {
        BirthdayRecord::new(name, BirthdayDate::parse(date).unwrap())
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nothing.csv");

        let records = load_birthdays(&path).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_save_writes_sorted_stored_form() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bdays.csv");

        let records = vec![
            record("Zoe", "12-01-1999"),
            record("Ann", "02-14"),
            record("Max", "02-14-1980"),
        ];
        let written = save_birthdays(&path, &records).unwrap();
        assert_eq!(written, 3);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "name,date\nAnn,02-14-1900\nMax,02-14-1980\nZoe,12-01-1999\n"
        );
        assert!(!temp_path_for(&path).exists(), "temp file should be renamed away");
    }

    #[test]
    fn test_save_then_load_preserves_records() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("bdays.csv");

        let mut store = BirthdayStore::new();
        store.add("Grace", BirthdayDate::parse("12-09-1906").unwrap()).unwrap();
        store.add("Linus", BirthdayDate::parse("12-28").unwrap()).unwrap();
        save_store(&path, &store).unwrap();

        let loaded = load_store(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("grace").unwrap().date.year(), Some(1906));
        assert_eq!(loaded.get("LINUS").unwrap().date.year(), None);
    }

    #[test]
    fn test_load_skips_bad_dates() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bdays.csv");
        fs::write(
            &path,
            "name,date\nAnn,02-14-1900\nBroken,14-02-1990\nShort,03-05\n",
        )
        .unwrap();

        let records = load_birthdays(&path).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Short"]);
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let temp = TempDir::new().unwrap();
        // A directory at the target path makes the rename fail
        let path = temp.path().join("bdays.csv");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep.txt"), "x").unwrap();

        let result = save_birthdays(&path, &[record("Ann", "02-14")]);

        assert!(result.is_err());
        assert!(!temp_path_for(&path).exists(), "temp file should be cleaned up");
        assert!(path.join("keep.txt").exists());
    }

    #[test]
    fn test_empty_store_keeps_header() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bdays.csv");

        save_store(&path, &BirthdayStore::new()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "name,date\n");
        assert!(load_birthdays(&path).unwrap().is_empty());
    }
}
