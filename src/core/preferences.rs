//! User preferences stored as key/value rows in the `preferences` table.
//!
//! Missing rows read as their defaults, so a fresh store needs no seeding. Values
//! are written with an upsert on the unique key.

use crate::{
    entities::{Preference, preference},
    errors::{Error, Result},
};
use chrono::{NaiveTime, Utc};
use sea_orm::{Set, prelude::*};
use std::collections::HashMap;
use tracing::info;

/// Key of the dark mode flag
pub const DARK_MODE_KEY: &str = "dark_mode";
/// Key of the notifications flag
pub const NOTIFICATIONS_KEY: &str = "notifications_enabled";
/// Key of the daily reminder time
pub const REMINDER_TIME_KEY: &str = "reminder_time";
/// Key of the onboarding-completed flag
pub const ONBOARDING_COMPLETED_KEY: &str = "onboarding_completed";

/// Reminder time used until the user picks one
pub const DEFAULT_REMINDER_TIME: &str = "09:00";

const REMINDER_FORMAT: &str = "%H:%M";

/// Every preference with its current value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    /// Dark appearance
    pub dark_mode: bool,
    /// Whether reminders are wanted; they are stored only, never scheduled
    pub notifications_enabled: bool,
    /// Daily reminder time
    pub reminder_time: NaiveTime,
    /// Whether onboarding has been finished or skipped
    pub onboarding_completed: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            notifications_enabled: true,
            reminder_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            onboarding_completed: false,
        }
    }
}

impl Preferences {
    /// The reminder time as `HH:MM`
    #[must_use]
    pub fn reminder_time_label(&self) -> String {
        self.reminder_time.format(REMINDER_FORMAT).to_string()
    }
}

/// Parses a `HH:MM` reminder time.
pub fn parse_reminder_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), REMINDER_FORMAT).map_err(|_| {
        Error::InvalidPreference {
            key: REMINDER_TIME_KEY.to_string(),
            value: value.to_string(),
        }
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::InvalidPreference {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Loads every preference, filling in defaults for missing keys.
///
/// A stored value that does not parse is reported as [`Error::InvalidPreference`].
pub async fn load_preferences(db: &DatabaseConnection) -> Result<Preferences> {
    let stored: HashMap<String, String> = Preference::find()
        .all(db)
        .await?
        .into_iter()
        .map(|row| (row.key, row.value))
        .collect();

    let mut prefs = Preferences::default();
    if let Some(value) = stored.get(DARK_MODE_KEY) {
        prefs.dark_mode = parse_flag(DARK_MODE_KEY, value)?;
    }
    if let Some(value) = stored.get(NOTIFICATIONS_KEY) {
        prefs.notifications_enabled = parse_flag(NOTIFICATIONS_KEY, value)?;
    }
    if let Some(value) = stored.get(REMINDER_TIME_KEY) {
        prefs.reminder_time = parse_reminder_time(value)?;
    }
    if let Some(value) = stored.get(ONBOARDING_COMPLETED_KEY) {
        prefs.onboarding_completed = parse_flag(ONBOARDING_COMPLETED_KEY, value)?;
    }
    Ok(prefs)
}

/// Inserts or updates a single preference row.
pub(crate) async fn set_value<C>(db: &C, key: &str, value: String) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = Utc::now().naive_utc();

    let existing = Preference::find()
        .filter(preference::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(row) = existing {
        let mut active_model: preference::ActiveModel = row.into();
        active_model.value = Set(value);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let row = preference::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(now),
            ..Default::default()
        };
        row.insert(db).await?;
    }

    Ok(())
}

/// Turns dark mode on or off.
pub async fn set_dark_mode(db: &DatabaseConnection, enabled: bool) -> Result<()> {
    set_value(db, DARK_MODE_KEY, enabled.to_string()).await?;
    info!(enabled, "Dark mode preference saved");
    Ok(())
}

/// Turns reminder notifications on or off.
pub async fn set_notifications_enabled(db: &DatabaseConnection, enabled: bool) -> Result<()> {
    set_value(db, NOTIFICATIONS_KEY, enabled.to_string()).await?;
    info!(enabled, "Notification preference saved");
    Ok(())
}

/// Stores the daily reminder time after validating the `HH:MM` format.
pub async fn set_reminder_time(db: &DatabaseConnection, value: &str) -> Result<NaiveTime> {
    let time = parse_reminder_time(value)?;
    set_value(db, REMINDER_TIME_KEY, time.format(REMINDER_FORMAT).to_string()).await?;
    info!(reminder_time = %time.format(REMINDER_FORMAT), "Reminder time saved");
    Ok(time)
}

/// Records whether onboarding has been completed.
pub async fn set_onboarding_completed<C>(db: &C, completed: bool) -> Result<()>
where
    C: ConnectionTrait,
{
    set_value(db, ONBOARDING_COMPLETED_KEY, completed.to_string()).await
}
