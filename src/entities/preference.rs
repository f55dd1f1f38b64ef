//! Preference entity - Stores key-value pairs for user preferences.
//! Used for the dark-mode toggle, notification flag, reminder time,
//! and the onboarding-completed flag.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Preference database model - stores key-value preference pairs
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "preferences")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Preference key (e.g., `"reminder_time"`)
    #[sea_orm(unique)]
    pub key: String,
    /// Preference value stored as string
    pub value: String,
    /// When this preference was last modified
    pub updated_at: DateTime,
}

/// `Preference` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
