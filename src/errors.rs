//! Unified error type for `HabitBuddy`.
//!
//! Every fallible function in the crate returns [`Result`]. Database errors from
//! `SeaORM` and framework errors from poise/serenity convert automatically so
//! callers can propagate with `?`.

use poise::serenity_prelude as serenity;
use thiserror::Error;

/// All errors that can occur in `HabitBuddy`.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A habit failed validation (empty name, unknown icon or color)
    #[error("Invalid habit: {message}")]
    InvalidHabit {
        /// What went wrong
        message: String,
    },

    /// Target count outside the accepted 1-20 range
    #[error("Target count {count} is outside the allowed range 1-20")]
    InvalidTargetCount {
        /// The rejected value
        count: i32,
    },

    /// No stored habit matches the given identifier or name
    #[error("Habit not found: {id}")]
    HabitNotFound {
        /// The identifier or name that was looked up
        id: String,
    },

    /// A string that should have been a habit identifier is not a valid UUID
    #[error("Malformed habit identifier: '{value}'")]
    MalformedHabitId {
        /// The raw value that failed to parse
        value: String,
    },

    /// A preference value failed validation
    #[error("Invalid value for preference '{key}': '{value}'")]
    InvalidPreference {
        /// Preference key
        key: String,
        /// The rejected value
        value: String,
    },

    /// An onboarding suggestion selection could not be parsed
    #[error("Invalid selection '{value}': {message}")]
    InvalidSelection {
        /// The raw selection text
        value: String,
        /// What went wrong
        message: String,
    },

    /// Any error raised by the shared store
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem errors (store directory, config file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or unreadable environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Writing into a response buffer failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<serenity::Error>),
}

impl From<serenity::Error> for Error {
    fn from(value: serenity::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
