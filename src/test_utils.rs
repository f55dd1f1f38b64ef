//! Shared test utilities for `HabitBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating habits and completions with sensible defaults.

use crate::{
    core::{
        habit::{self, HabitDraft},
        refresh::RefreshSignal,
    },
    entities,
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test habit with sensible defaults.
///
/// # Defaults
/// * `icon`: `"star.fill"`
/// * `color`: `"blue"`
/// * `cadence`: daily
/// * `target_count`: 1
/// * `category`: `"General"`
pub async fn create_test_habit(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::habit::Model> {
    habit::create_habit(db, &RefreshSignal::new(), HabitDraft::named(name)).await
}

/// Creates a test habit with a custom daily target.
pub async fn create_custom_habit(
    db: &DatabaseConnection,
    name: &str,
    target_count: i32,
) -> Result<entities::habit::Model> {
    let draft = HabitDraft {
        target_count,
        ..HabitDraft::named(name)
    };
    habit::create_habit(db, &RefreshSignal::new(), draft).await
}

/// Inserts a completion with an explicit timestamp, bypassing the toggle.
/// Use this to build history or orphaned records.
pub async fn insert_completion_at(
    db: &DatabaseConnection,
    habit_id: Uuid,
    completed_at: DateTime<Utc>,
) -> Result<entities::completion::Model> {
    let completion = entities::completion::ActiveModel {
        id: Set(Uuid::new_v4()),
        habit_id: Set(habit_id),
        completed_at: Set(completed_at),
    };
    Ok(completion.insert(db).await?)
}

/// Builds an unsaved habit model for the pure query functions.
#[must_use]
pub fn habit_model(name: &str, target_count: i32) -> entities::habit::Model {
    entities::habit::Model {
        id: Uuid::new_v4(),
        name: name.to_string(),
        icon: "star.fill".to_string(),
        color: "blue".to_string(),
        cadence: "daily".to_string(),
        target_count,
        created_at: Utc::now(),
        is_active: true,
        category: "General".to_string(),
    }
}

/// Builds an unsaved completion model for the pure query functions.
#[must_use]
pub fn completion_model(
    habit_id: Uuid,
    completed_at: DateTime<Utc>,
) -> entities::completion::Model {
    entities::completion::Model {
        id: Uuid::new_v4(),
        habit_id,
        completed_at,
    }
}
