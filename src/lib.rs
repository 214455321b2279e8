// Birthday Tracker - Core Library
// Exposes all modules for use in the CLI and tests

pub mod config;
pub mod date;
pub mod error;
pub mod menu;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use date::{BirthdayDate, NO_YEAR_SENTINEL};
pub use error::{BirthdayError, BirthdayResult};
pub use menu::{
    local_today, print_all, print_json, print_todays, print_upcoming, Menu, MenuChoice,
};
pub use storage::{load_birthdays, load_store, save_birthdays, save_store, BirthdayRow};
pub use store::{normalize_name, BirthdayRecord, BirthdayStore, UpcomingBirthday};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
