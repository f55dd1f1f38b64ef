//! Habit entity - A named, configured tracking target.
//!
//! Each habit has a display name, an icon and color key from fixed sets, a cadence,
//! a daily target count, and metadata. Completions reference habits by `id` value only;
//! there is no storage-level foreign key between the two tables.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Habit database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "habits")]
pub struct Model {
    /// Globally unique identifier assigned at creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Display name (e.g., "Meditation", "Drink 8 glasses of water")
    pub name: String,
    /// Icon key (e.g., `"figure.run"`)
    pub icon: String,
    /// Color key from the fixed palette (e.g., `"teal"`)
    pub color: String,
    /// Cadence: `"daily"`, `"weekly"` or `"custom"`
    pub cadence: String,
    /// Completions needed on one day for the day to count as done
    pub target_count: i32,
    /// When the habit was created
    pub created_at: DateTimeUtc,
    /// Soft-disable flag
    pub is_active: bool,
    /// Free-text category label (e.g., "Fitness")
    pub category: String,
}

/// `Habit` has no storage-level relationships; completions match by value
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
