//! Widget view of the shared store.
//!
//! The dashboard shows the first few habits with today's progress and a Monday-first
//! week row, and offers a one-tap toggle per habit. The toggle arrives as a raw habit
//! identifier string and is applied straight to the store with the same semantics as
//! [`toggle_completion`], independent of any command flow.

use crate::{
    core::{
        calendar::{self, DayWindow},
        completion::{self, ToggleOutcome, toggle_completion},
        habit::{get_active_habits, get_habit_by_id},
        refresh::RefreshSignal,
    },
    entities::{completion as completion_entity, habit},
    errors::{Error, Result},
};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use tracing::{debug, warn};
use uuid::Uuid;

/// Default number of habits on the dashboard
pub const DEFAULT_WIDGET_LIMIT: usize = 6;

/// Most habits the dashboard can show: Discord allows 25 embed fields and 5 rows of 5 buttons
pub const MAX_WIDGET_HABITS: usize = 25;

/// Prefix of the component id carried by each toggle button
pub const TOGGLE_PREFIX: &str = "habit_toggle:";

/// One habit row as the widget shows it
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetHabit {
    /// Habit identifier; `None` for placeholder rows, which cannot be toggled
    pub id: Option<Uuid>,
    /// Display name
    pub name: String,
    /// Icon key
    pub icon: String,
    /// Color key
    pub color: String,
    /// Daily target
    pub target_count: usize,
    /// Completions recorded today
    pub completed_count: usize,
    /// Whether today reached the target
    pub is_completed: bool,
    /// Completion flag for each day of the current Monday-first week
    pub week: Vec<(NaiveDate, bool)>,
}

impl WidgetHabit {
    /// Today's progress towards the target, capped at 1.0
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        let target = self.target_count.max(1) as f64;
        (self.completed_count as f64 / target).min(1.0)
    }

    /// Component id for this row's toggle button, if it can be toggled
    #[must_use]
    pub fn toggle_id(&self) -> Option<String> {
        self.id.map(|id| format!("{TOGGLE_PREFIX}{id}"))
    }
}

/// Everything the dashboard renders at one moment
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSnapshot {
    /// When the snapshot was taken
    pub generated_at: DateTime<Utc>,
    /// The local day the rows describe
    pub today: NaiveDate,
    /// Rows in creation order
    pub habits: Vec<WidgetHabit>,
    /// Sample data shown because the store could not be read
    pub is_placeholder: bool,
}

impl WidgetSnapshot {
    /// Number of rows completed today
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.habits.iter().filter(|h| h.is_completed).count()
    }
}

fn widget_habit<Tz: TimeZone>(
    habit: &habit::Model,
    completions: &[completion_entity::Model],
    today: NaiveDate,
    tz: &Tz,
) -> WidgetHabit {
    let window = DayWindow::new(today, tz);
    let completed_count = completion::completions_on_day(habit, completions, &window);
    let target_count = completion::target_of(habit);

    let week = calendar::week_of(today)
        .into_iter()
        .map(|day| {
            let done = completion::is_completed_on_day(habit, completions, &DayWindow::new(day, tz));
            (day, done)
        })
        .collect();

    WidgetHabit {
        id: Some(habit.id),
        name: habit.name.clone(),
        icon: habit.icon.clone(),
        color: habit.color.clone(),
        target_count,
        completed_count,
        is_completed: completed_count >= target_count,
        week,
    }
}

/// Builds the widget rows for the first `limit` habits, in the order given.
///
/// `limit` is clamped to `1..=MAX_WIDGET_HABITS`.
pub fn build_snapshot<Tz: TimeZone>(
    habits: &[habit::Model],
    completions: &[completion_entity::Model],
    limit: usize,
    now: DateTime<Utc>,
    tz: &Tz,
) -> WidgetSnapshot {
    let today = calendar::local_day(now, tz);
    let limit = limit.clamp(1, MAX_WIDGET_HABITS);
    WidgetSnapshot {
        generated_at: now,
        today,
        habits: habits
            .iter()
            .take(limit)
            .map(|habit| widget_habit(habit, completions, today, tz))
            .collect(),
        is_placeholder: false,
    }
}

/// Sample rows shown when the store cannot be read.
#[must_use]
pub fn placeholder_snapshot(now: DateTime<Utc>) -> WidgetSnapshot {
    let today = now.with_timezone(&Local).date_naive();
    let sample = |name: &str, icon: &str, color: &str, target: usize, done: usize| WidgetHabit {
        id: None,
        name: name.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        target_count: target,
        completed_count: done,
        is_completed: done >= target,
        week: calendar::week_of(today)
            .into_iter()
            .map(|day| (day, false))
            .collect(),
    };

    WidgetSnapshot {
        generated_at: now,
        today,
        habits: vec![
            sample("Workout", "figure.run", "orange", 1, 1),
            sample("Meditation", "leaf", "green", 1, 0),
            sample("Reading", "book", "blue", 1, 0),
            sample("Water", "drop", "teal", 8, 3),
        ],
        is_placeholder: true,
    }
}

async fn read_snapshot(db: &DatabaseConnection, limit: usize) -> Result<WidgetSnapshot> {
    let habits = get_active_habits(db).await?;
    let completions = completion::get_all_completions(db).await?;
    Ok(build_snapshot(&habits, &completions, limit, Utc::now(), &Local))
}

/// Reads the store and builds the current snapshot.
///
/// A read failure is logged and yields [`placeholder_snapshot`] instead of an error.
pub async fn load_snapshot(db: &DatabaseConnection, limit: usize) -> WidgetSnapshot {
    match read_snapshot(db, limit).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Failed to load widget data, showing placeholder: {}", e);
            placeholder_snapshot(Utc::now())
        }
    }
}

/// Parses the habit id out of a toggle button's component id.
///
/// Returns `None` when the component id does not belong to a toggle button.
#[must_use]
pub fn parse_toggle_id(custom_id: &str) -> Option<&str> {
    custom_id.strip_prefix(TOGGLE_PREFIX)
}

/// Toggles today's completion for the habit named by a raw identifier string.
///
/// # Errors
/// * [`Error::MalformedHabitId`] when `raw_id` is not a UUID
/// * [`Error::HabitNotFound`] when no habit has that id
pub async fn toggle_from_widget(
    db: &DatabaseConnection,
    refresh: &RefreshSignal,
    raw_id: &str,
) -> Result<ToggleOutcome> {
    let habit_id = Uuid::parse_str(raw_id.trim()).map_err(|_| Error::MalformedHabitId {
        value: raw_id.to_string(),
    })?;

    let habit = get_habit_by_id(db, habit_id)
        .await?
        .ok_or_else(|| Error::HabitNotFound {
            id: habit_id.to_string(),
        })?;

    debug!(habit_id = %habit.id, "Widget toggle");
    toggle_completion(db, refresh, &habit, &DayWindow::today()).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]
    use super::*;
    use crate::core::{
        completion::{get_all_completions, is_completed_on_day},
        refresh::RefreshReason,
    };
    use crate::test_utils::*;

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_build_snapshot_rows() {
        let water = habit_model("Water", 8);
        let read = habit_model("Read", 1);
        // 2025-06-25 is a Wednesday
        let now = noon(2025, 6, 25);
        let completions = vec![
            completion_model(water.id, now),
            completion_model(water.id, now),
            completion_model(water.id, now),
            completion_model(read.id, noon(2025, 6, 23)),
            completion_model(read.id, now),
        ];

        let snapshot = build_snapshot(&[water.clone(), read.clone()], &completions, 6, now, &Utc);
        assert!(!snapshot.is_placeholder);
        assert_eq!(snapshot.today, NaiveDate::from_ymd_opt(2025, 6, 25).unwrap());

        let row = &snapshot.habits[0];
        assert_eq!(row.id, Some(water.id));
        assert_eq!(row.completed_count, 3);
        assert!(!row.is_completed);
        assert_eq!(row.progress(), 3.0 / 8.0);

        let row = &snapshot.habits[1];
        assert!(row.is_completed);
        assert_eq!(row.progress(), 1.0);
        let flags: Vec<bool> = row.week.iter().map(|(_, done)| *done).collect();
        assert_eq!(flags, vec![true, false, true, false, false, false, false]);
        assert_eq!(snapshot.completed_count(), 1);
    }

    #[test]
    fn test_build_snapshot_respects_limit() {
        let habits: Vec<_> = (0..8).map(|i| habit_model(&format!("H{i}"), 1)).collect();
        let snapshot = build_snapshot(&habits, &[], DEFAULT_WIDGET_LIMIT, noon(2025, 6, 25), &Utc);
        assert_eq!(snapshot.habits.len(), 6);
        assert_eq!(snapshot.habits[0].name, "H0");
        assert_eq!(snapshot.habits[5].name, "H5");
    }

    #[test]
    fn test_build_snapshot_clamps_limit() {
        let habits: Vec<_> = (0..30).map(|i| habit_model(&format!("H{i}"), 1)).collect();
        let now = noon(2025, 6, 25);

        let snapshot = build_snapshot(&habits, &[], 30, now, &Utc);
        assert_eq!(snapshot.habits.len(), MAX_WIDGET_HABITS);

        let snapshot = build_snapshot(&habits, &[], 0, now, &Utc);
        assert_eq!(snapshot.habits.len(), 1);
    }

    #[test]
    fn test_progress_is_capped() {
        let habit = habit_model("Read", 1);
        let now = noon(2025, 6, 25);
        let completions = vec![completion_model(habit.id, now), completion_model(habit.id, now)];
        let snapshot = build_snapshot(&[habit], &completions, 6, now, &Utc);
        assert_eq!(snapshot.habits[0].completed_count, 2);
        assert_eq!(snapshot.habits[0].progress(), 1.0);
    }

    #[test]
    fn test_placeholder_rows_cannot_be_toggled() {
        let snapshot = placeholder_snapshot(Utc::now());
        assert!(snapshot.is_placeholder);
        assert_eq!(snapshot.habits.len(), 4);
        assert!(snapshot.habits.iter().all(|h| h.toggle_id().is_none()));
    }

    #[test]
    fn test_toggle_id_round_trip() {
        let habit = habit_model("Read", 1);
        let snapshot = build_snapshot(&[habit.clone()], &[], 6, Utc::now(), &Utc);
        let custom_id = snapshot.habits[0].toggle_id().unwrap();

        assert_eq!(custom_id, format!("habit_toggle:{}", habit.id));
        assert_eq!(parse_toggle_id(&custom_id), Some(habit.id.to_string().as_str()));
        assert_eq!(parse_toggle_id("settings:dark_mode"), None);
    }

    #[tokio::test]
    async fn test_load_snapshot_reads_store() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_habit(&db, "Workout").await?;
        create_test_habit(&db, "Reading").await?;

        let snapshot = load_snapshot(&db, DEFAULT_WIDGET_LIMIT).await;
        assert!(!snapshot.is_placeholder);
        assert_eq!(snapshot.habits.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_snapshot_falls_back_to_placeholder() -> Result<()> {
        // A connection without tables makes every read fail
        let db = sea_orm::Database::connect("sqlite::memory:").await?;
        let snapshot = load_snapshot(&db, DEFAULT_WIDGET_LIMIT).await;
        assert!(snapshot.is_placeholder);
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_from_widget_matches_app_toggle() -> Result<()> {
        let db = setup_test_db().await?;
        let refresh = RefreshSignal::new();
        let mut receiver = refresh.subscribe();
        let habit = create_test_habit(&db, "Meditation").await?;
        let today = DayWindow::today();

        let outcome = toggle_from_widget(&db, &refresh, &habit.id.to_string()).await?;
        assert_eq!(outcome, ToggleOutcome::Completed { target: 1 });
        assert!(is_completed_on_day(&habit, &get_all_completions(&db).await?, &today));
        assert_eq!(
            receiver.try_recv().unwrap(),
            RefreshReason::CompletionToggled { habit_id: habit.id }
        );

        let outcome = toggle_from_widget(&db, &refresh, &habit.id.to_string()).await?;
        assert_eq!(outcome, ToggleOutcome::Cleared { removed: 1 });
        assert!(!is_completed_on_day(&habit, &get_all_completions(&db).await?, &today));
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_from_widget_rejects_bad_ids() -> Result<()> {
        let db = setup_test_db().await?;
        let refresh = RefreshSignal::new();
        let mut receiver = refresh.subscribe();

        let result = toggle_from_widget(&db, &refresh, "not-a-uuid").await;
        assert!(matches!(result, Err(Error::MalformedHabitId { .. })));

        let result = toggle_from_widget(&db, &refresh, &Uuid::new_v4().to_string()).await;
        assert!(matches!(result, Err(Error::HabitNotFound { .. })));

        // Nothing was written and nothing was signalled
        assert!(get_all_completions(&db).await?.is_empty());
        assert!(receiver.try_recv().is_err());
        Ok(())
    }
}
