//! Completion entity - One unit of progress toward a habit's daily target.
//!
//! Several completions for the same habit on the same calendar day are expected:
//! a habit with a target of 8 is done for the day once 8 records exist.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Completion database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "completions")]
pub struct Model {
    /// Unique identifier for the completion
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// `id` of the habit this completion counts toward
    pub habit_id: Uuid,
    /// Event time; back-dated to the start of the day when toggling a past day
    pub completed_at: DateTimeUtc,
}

/// Completions are associated with habits by `habit_id` value only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
