// Runtime settings, read from the environment (and a .env file if present).

use std::path::PathBuf;

pub const DEFAULT_FILE: &str = "bdays.csv";
pub const DEFAULT_UPCOMING_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Birthday file (BDAY_FILE)
    pub file: PathBuf,

    /// Window used by the upcoming listing (BDAY_UPCOMING_DAYS)
    pub upcoming_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            file: PathBuf::from(DEFAULT_FILE),
            upcoming_days: DEFAULT_UPCOMING_DAYS,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unusable values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let file = lookup("BDAY_FILE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.file);

        let upcoming_days = match lookup("BDAY_UPCOMING_DAYS") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!(
                    "Ignoring BDAY_UPCOMING_DAYS={:?}, using {}",
                    raw,
                    defaults.upcoming_days
                );
                defaults.upcoming_days
            }),
            None => defaults.upcoming_days,
        };

        Config {
            file,
            upcoming_days,
        }
    }
}
