//! Habit business logic - Handles all habit-related operations.
//!
//! Provides functions for creating, retrieving, editing and deleting habits, together
//! with the fixed icon set, color palette and cadence values a habit may use. Every
//! successful write commits first and then fires the widget refresh signal.

use crate::{
    core::refresh::{RefreshReason, RefreshSignal},
    entities::{Completion, Habit, completion, habit},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::{fmt, str::FromStr};
use tracing::info;

/// Smallest accepted daily target
pub const MIN_TARGET_COUNT: i32 = 1;
/// Largest accepted daily target
pub const MAX_TARGET_COUNT: i32 = 20;

/// Icon keys a habit may use
pub const ICONS: &[&str] = &[
    "star.fill",
    "heart.fill",
    "leaf.fill",
    "flame.fill",
    "drop.fill",
    "figure.run",
    "dumbbell.fill",
    "book.fill",
    "pencil",
    "lightbulb.fill",
    "moon.fill",
    "sun.max.fill",
    "cup.and.saucer.fill",
    "pills.fill",
    "brain.head.profile",
    "leaf",
    "book",
    "drop",
    "square.and.pencil",
    "figure.walk",
];

/// Color keys a habit may use
pub const COLORS: &[&str] = &[
    "blue", "green", "orange", "red", "purple", "pink", "yellow", "mint", "teal", "indigo",
];

/// Suggested categories; the category itself is free text
pub const CATEGORIES: &[&str] = &[
    "Fitness",
    "Health",
    "Wellness",
    "Education",
    "Creativity",
    "Social",
    "Productivity",
    "General",
];

/// Category used when none is given
pub const DEFAULT_CATEGORY: &str = "General";

/// How often a habit is meant to be done.
///
/// Only recorded: every query evaluates habits per day regardless of cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cadence {
    /// Every day
    #[default]
    Daily,
    /// Once a week
    Weekly,
    /// User-defined schedule
    Custom,
}

impl Cadence {
    /// All cadences in display order
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Custom];

    /// Value stored in the `cadence` column
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Custom => "custom",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Cadence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // The German spellings are what older stores contain
        match s.trim().to_lowercase().as_str() {
            "daily" | "täglich" => Ok(Self::Daily),
            "weekly" | "wöchentlich" => Ok(Self::Weekly),
            "custom" | "benutzerdefiniert" => Ok(Self::Custom),
            other => Err(Error::InvalidHabit {
                message: format!("Unknown cadence '{other}'"),
            }),
        }
    }
}

/// Everything needed to create a habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitDraft {
    /// Display name; trimmed before storing
    pub name: String,
    /// Icon key from [`ICONS`]
    pub icon: String,
    /// Color key from [`COLORS`]
    pub color: String,
    /// Recorded cadence
    pub cadence: Cadence,
    /// Daily target, 1-20
    pub target_count: i32,
    /// Category label; blank becomes [`DEFAULT_CATEGORY`]
    pub category: String,
}

impl HabitDraft {
    /// A draft with the given name and default styling.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for HabitDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            icon: "star.fill".to_string(),
            color: "blue".to_string(),
            cadence: Cadence::Daily,
            target_count: 1,
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

/// Edits to apply to an existing habit; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitChanges {
    /// New display name
    pub name: Option<String>,
    /// New icon key
    pub icon: Option<String>,
    /// New color key
    pub color: Option<String>,
    /// New cadence
    pub cadence: Option<Cadence>,
    /// New daily target
    pub target_count: Option<i32>,
    /// New category label
    pub category: Option<String>,
    /// Enable or soft-disable the habit
    pub is_active: Option<bool>,
}

impl HabitChanges {
    /// Whether no field would change
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.icon.is_none()
            && self.color.is_none()
            && self.cadence.is_none()
            && self.target_count.is_none()
            && self.category.is_none()
            && self.is_active.is_none()
    }
}

/// Counts removed by [`delete_all_data`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataResetSummary {
    /// Habits deleted
    pub habits: u64,
    /// Completions deleted
    pub completions: u64,
}

/// Trims a habit name and rejects blank names.
pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidHabit {
            message: "Habit name cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Rejects targets outside 1-20.
pub fn validate_target_count(count: i32) -> Result<()> {
    if count < MIN_TARGET_COUNT || count > MAX_TARGET_COUNT {
        return Err(Error::InvalidTargetCount { count });
    }
    Ok(())
}

/// Rejects icon keys outside [`ICONS`].
pub fn validate_icon(icon: &str) -> Result<()> {
    if ICONS.contains(&icon) {
        Ok(())
    } else {
        Err(Error::InvalidHabit {
            message: format!("Unknown icon '{icon}'"),
        })
    }
}

/// Rejects color keys outside [`COLORS`].
pub fn validate_color(color: &str) -> Result<()> {
    if COLORS.contains(&color) {
        Ok(())
    } else {
        Err(Error::InvalidHabit {
            message: format!("Unknown color '{color}'"),
        })
    }
}

fn normalize_category(category: &str) -> String {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        trimmed.to_string()
    }
}

/// The cadence stored on a habit; unknown values read as daily.
#[must_use]
pub fn cadence_of(habit: &habit::Model) -> Cadence {
    habit.cadence.parse().unwrap_or_default()
}

/// Retrieves every habit, oldest first.
pub async fn get_all_habits(db: &DatabaseConnection) -> Result<Vec<habit::Model>> {
    Habit::find()
        .order_by_asc(habit::Column::CreatedAt)
        .order_by_asc(habit::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves habits that are not soft-disabled, oldest first.
pub async fn get_active_habits(db: &DatabaseConnection) -> Result<Vec<habit::Model>> {
    Habit::find()
        .filter(habit::Column::IsActive.eq(true))
        .order_by_asc(habit::Column::CreatedAt)
        .order_by_asc(habit::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a habit by its identifier.
pub async fn get_habit_by_id<C>(db: &C, habit_id: Uuid) -> Result<Option<habit::Model>>
where
    C: ConnectionTrait,
{
    Habit::find_by_id(habit_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a habit by name, ignoring case and surrounding whitespace.
///
/// Names are not unique; the oldest match wins.
pub async fn get_habit_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<habit::Model>> {
    let wanted = name.trim().to_lowercase();
    let habits = get_all_habits(db).await?;
    Ok(habits
        .into_iter()
        .find(|habit| habit.name.to_lowercase() == wanted))
}

/// Validates a draft and inserts it without signalling.
pub(crate) async fn insert_habit<C>(db: &C, draft: HabitDraft) -> Result<habit::Model>
where
    C: ConnectionTrait,
{
    let name = validate_name(&draft.name)?;
    validate_target_count(draft.target_count)?;
    validate_icon(&draft.icon)?;
    validate_color(&draft.color)?;

    let habit = habit::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        icon: Set(draft.icon),
        color: Set(draft.color),
        cadence: Set(draft.cadence.as_str().to_string()),
        target_count: Set(draft.target_count),
        created_at: Set(Utc::now()),
        is_active: Set(true),
        category: Set(normalize_category(&draft.category)),
    };

    Ok(habit.insert(db).await?)
}

/// Creates a new habit after validating the draft.
///
/// The name is trimmed and must not be empty, the target must be within 1-20, and
/// the icon and color must come from the fixed sets.
pub async fn create_habit(
    db: &DatabaseConnection,
    refresh: &RefreshSignal,
    draft: HabitDraft,
) -> Result<habit::Model> {
    let habit = insert_habit(db, draft).await?;
    info!(habit_id = %habit.id, name = %habit.name, "Habit created");
    refresh.notify(RefreshReason::HabitCreated { habit_id: habit.id });
    Ok(habit)
}

/// Applies user edits to a habit.
///
/// Changing the target count re-evaluates every past day against the new target;
/// no historical target is kept.
pub async fn update_habit(
    db: &DatabaseConnection,
    refresh: &RefreshSignal,
    habit_id: Uuid,
    changes: HabitChanges,
) -> Result<habit::Model> {
    let existing = get_habit_by_id(db, habit_id)
        .await?
        .ok_or_else(|| Error::HabitNotFound {
            id: habit_id.to_string(),
        })?;

    if changes.is_empty() {
        return Ok(existing);
    }

    let mut habit: habit::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        habit.name = Set(validate_name(&name)?);
    }
    if let Some(icon) = changes.icon {
        validate_icon(&icon)?;
        habit.icon = Set(icon);
    }
    if let Some(color) = changes.color {
        validate_color(&color)?;
        habit.color = Set(color);
    }
    if let Some(cadence) = changes.cadence {
        habit.cadence = Set(cadence.as_str().to_string());
    }
    if let Some(target_count) = changes.target_count {
        validate_target_count(target_count)?;
        habit.target_count = Set(target_count);
    }
    if let Some(category) = changes.category {
        habit.category = Set(normalize_category(&category));
    }
    if let Some(is_active) = changes.is_active {
        habit.is_active = Set(is_active);
    }

    let updated = habit.update(db).await?;
    info!(habit_id = %updated.id, "Habit updated");
    refresh.notify(RefreshReason::HabitUpdated {
        habit_id: updated.id,
    });
    Ok(updated)
}

/// Deletes a habit together with all of its completions.
///
/// Both deletions run in one transaction so no orphaned completions are left behind.
/// Returns the number of completions removed.
pub async fn delete_habit(
    db: &DatabaseConnection,
    refresh: &RefreshSignal,
    habit_id: Uuid,
) -> Result<u64> {
    let txn = db.begin().await?;

    let habit = get_habit_by_id(&txn, habit_id)
        .await?
        .ok_or_else(|| Error::HabitNotFound {
            id: habit_id.to_string(),
        })?;

    let removed = Completion::delete_many()
        .filter(completion::Column::HabitId.eq(habit_id))
        .exec(&txn)
        .await?
        .rows_affected;

    Habit::delete_by_id(habit_id).exec(&txn).await?;

    txn.commit().await?;

    info!(
        habit_id = %habit_id,
        name = %habit.name,
        completions = removed,
        "Habit deleted"
    );
    refresh.notify(RefreshReason::HabitDeleted { habit_id });
    Ok(removed)
}

/// Removes every habit and every completion in one transaction.
pub async fn delete_all_data(
    db: &DatabaseConnection,
    refresh: &RefreshSignal,
) -> Result<DataResetSummary> {
    let txn = db.begin().await?;
    let completions = Completion::delete_many().exec(&txn).await?.rows_affected;
    let habits = Habit::delete_many().exec(&txn).await?.rows_affected;
    txn.commit().await?;

    info!(habits, completions, "All habit data deleted");
    refresh.notify(RefreshReason::DataReset);
    Ok(DataResetSummary {
        habits,
        completions,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_create_habit_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let refresh = RefreshSignal::new();

        // Empty and whitespace-only names
        let result = create_habit(&db, &refresh, HabitDraft::named("")).await;
        assert!(matches!(result, Err(Error::InvalidHabit { .. })));
        let result = create_habit(&db, &refresh, HabitDraft::named("   ")).await;
        assert!(matches!(result, Err(Error::InvalidHabit { .. })));

        // Target count bounds
        let draft = HabitDraft {
            target_count: 0,
            ..HabitDraft::named("Water")
        };
        let result = create_habit(&db, &refresh, draft).await;
        assert!(matches!(
            result,
            Err(Error::InvalidTargetCount { count: 0 })
        ));
        let draft = HabitDraft {
            target_count: 21,
            ..HabitDraft::named("Water")
        };
        let result = create_habit(&db, &refresh, draft).await;
        assert!(matches!(
            result,
            Err(Error::InvalidTargetCount { count: 21 })
        ));

        // Unknown palette entries
        let draft = HabitDraft {
            color: "chartreuse".to_string(),
            ..HabitDraft::named("Water")
        };
        let result = create_habit(&db, &refresh, draft).await;
        assert!(matches!(result, Err(Error::InvalidHabit { .. })));
        let draft = HabitDraft {
            icon: "rocket".to_string(),
            ..HabitDraft::named("Water")
        };
        let result = create_habit(&db, &refresh, draft).await;
        assert!(matches!(result, Err(Error::InvalidHabit { .. })));

        assert!(get_all_habits(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_habit_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let refresh = RefreshSignal::new();
        let mut receiver = refresh.subscribe();

        let draft = HabitDraft {
            name: "  Drink water  ".to_string(),
            icon: "drop".to_string(),
            color: "teal".to_string(),
            cadence: Cadence::Daily,
            target_count: 8,
            category: "Health".to_string(),
        };
        let habit = create_habit(&db, &refresh, draft).await?;

        assert_eq!(habit.name, "Drink water");
        assert_eq!(habit.target_count, 8);
        assert_eq!(habit.cadence, "daily");
        assert_eq!(habit.category, "Health");
        assert!(habit.is_active);

        let stored = get_habit_by_id(&db, habit.id).await?.unwrap();
        assert_eq!(stored, habit);
        assert_eq!(
            receiver.try_recv().unwrap(),
            RefreshReason::HabitCreated { habit_id: habit.id }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_category_defaults_to_general() -> Result<()> {
        let db = setup_test_db().await?;
        let draft = HabitDraft {
            category: "  ".to_string(),
            ..HabitDraft::named("Stretch")
        };
        let habit = create_habit(&db, &RefreshSignal::new(), draft).await?;
        assert_eq!(habit.category, DEFAULT_CATEGORY);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_habit_by_name_is_case_insensitive() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_habit(&db, "Meditation").await?;

        let found = get_habit_by_name(&db, "  meditation ").await?;
        assert_eq!(found.map(|h| h.id), Some(created.id));
        assert!(get_habit_by_name(&db, "Yoga").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_habits_oldest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let newer = create_test_habit(&db, "Reading").await?;
        let older = create_test_habit(&db, "Workout").await?;

        // Back-date one habit so the ordering does not depend on clock resolution
        let mut active: habit::ActiveModel = older.clone().into();
        active.created_at = Set(newer.created_at - Duration::days(1));
        active.update(&db).await?;

        let habits = get_all_habits(&db).await?;
        assert_eq!(habits.len(), 2);
        assert_eq!(habits[0].id, older.id);
        assert_eq!(habits[1].id, newer.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_active_habits_skips_disabled() -> Result<()> {
        let db = setup_test_db().await?;
        let refresh = RefreshSignal::new();
        let kept = create_test_habit(&db, "Reading").await?;
        let disabled = create_test_habit(&db, "Workout").await?;

        update_habit(
            &db,
            &refresh,
            disabled.id,
            HabitChanges {
                is_active: Some(false),
                ..HabitChanges::default()
            },
        )
        .await?;

        let active = get_active_habits(&db).await?;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, kept.id);
        assert_eq!(get_all_habits(&db).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_habit_applies_changes() -> Result<()> {
        let db = setup_test_db().await?;
        let refresh = RefreshSignal::new();
        let habit = create_test_habit(&db, "Read").await?;

        let updated = update_habit(
            &db,
            &refresh,
            habit.id,
            HabitChanges {
                name: Some(" Read 30 minutes ".to_string()),
                color: Some("purple".to_string()),
                cadence: Some(Cadence::Weekly),
                target_count: Some(2),
                ..HabitChanges::default()
            },
        )
        .await?;

        assert_eq!(updated.id, habit.id);
        assert_eq!(updated.name, "Read 30 minutes");
        assert_eq!(updated.color, "purple");
        assert_eq!(cadence_of(&updated), Cadence::Weekly);
        assert_eq!(updated.target_count, 2);
        assert_eq!(updated.created_at, habit.created_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_habit_rejects_invalid_target() -> Result<()> {
        let db = setup_test_db().await?;
        let habit = create_test_habit(&db, "Read").await?;

        let result = update_habit(
            &db,
            &RefreshSignal::new(),
            habit.id,
            HabitChanges {
                target_count: Some(0),
                ..HabitChanges::default()
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(Error::InvalidTargetCount { count: 0 })
        ));

        let stored = get_habit_by_id(&db, habit.id).await?.unwrap();
        assert_eq!(stored.target_count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_habit() -> Result<()> {
        let db = setup_test_db().await?;
        let result = update_habit(
            &db,
            &RefreshSignal::new(),
            Uuid::new_v4(),
            HabitChanges {
                name: Some("Anything".to_string()),
                ..HabitChanges::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::HabitNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_habit_cascades_to_completions() -> Result<()> {
        let db = setup_test_db().await?;
        let refresh = RefreshSignal::new();
        let habit = create_test_habit(&db, "Workout").await?;
        let other = create_test_habit(&db, "Reading").await?;

        let now = Utc::now();
        insert_completion_at(&db, habit.id, now).await?;
        insert_completion_at(&db, habit.id, now - Duration::days(1)).await?;
        insert_completion_at(&db, other.id, now).await?;

        let removed = delete_habit(&db, &refresh, habit.id).await?;
        assert_eq!(removed, 2);

        assert!(get_habit_by_id(&db, habit.id).await?.is_none());
        let remaining = Completion::find()
            .filter(completion::Column::HabitId.eq(habit.id))
            .all(&db)
            .await?;
        assert!(remaining.is_empty());

        // Other habits keep their data
        let others = Completion::find()
            .filter(completion::Column::HabitId.eq(other.id))
            .all(&db)
            .await?;
        assert_eq!(others.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_habit() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_habit(&db, &RefreshSignal::new(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(Error::HabitNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_all_data() -> Result<()> {
        let db = setup_test_db().await?;
        let refresh = RefreshSignal::new();
        let mut receiver = refresh.subscribe();
        let habit = create_test_habit(&db, "Workout").await?;
        create_test_habit(&db, "Reading").await?;
        insert_completion_at(&db, habit.id, Utc::now()).await?;
        // An orphan left behind by some earlier failure is wiped as well
        insert_completion_at(&db, Uuid::new_v4(), Utc::now()).await?;

        let summary = delete_all_data(&db, &refresh).await?;
        assert_eq!(
            summary,
            DataResetSummary {
                habits: 2,
                completions: 2
            }
        );
        assert!(get_all_habits(&db).await?.is_empty());
        assert!(Completion::find().all(&db).await?.is_empty());
        assert_eq!(receiver.try_recv().unwrap(), RefreshReason::DataReset);
        Ok(())
    }

    #[test]
    fn test_cadence_parsing() {
        assert_eq!("daily".parse::<Cadence>().unwrap(), Cadence::Daily);
        assert_eq!("Weekly".parse::<Cadence>().unwrap(), Cadence::Weekly);
        assert_eq!("Täglich".parse::<Cadence>().unwrap(), Cadence::Daily);
        assert_eq!("Wöchentlich".parse::<Cadence>().unwrap(), Cadence::Weekly);
        assert_eq!(
            "Benutzerdefiniert".parse::<Cadence>().unwrap(),
            Cadence::Custom
        );
        assert!("hourly".parse::<Cadence>().is_err());
    }

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("  Walk ").unwrap(), "Walk");
        assert!(validate_name("\n\t").is_err());
    }
}
