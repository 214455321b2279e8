// Error kinds surfaced by the record store and date parser.
// Everything else (I/O, CSV, terminal) travels as anyhow::Error.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BirthdayError {
    /// Input was not MM-DD or MM-DD-YYYY, or not a real calendar date
    #[error("invalid date '{0}': use MM-DD or MM-DD-YYYY")]
    InvalidDate(String),

    #[error("name must not be empty")]
    EmptyName,

    #[error("a birthday for '{0}' is already stored")]
    DuplicateName(String),

    #[error("no birthday found for '{0}'")]
    NotFound(String),
}

pub type BirthdayResult<T> = std::result::Result<T, BirthdayError>;
