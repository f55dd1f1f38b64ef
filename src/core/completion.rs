//! Completion business logic - the completion query engine and the daily toggle.
//!
//! The query functions are pure: they take a habit, the full unfiltered list of
//! completion records (for every habit), and a day, and answer how many times the
//! habit was done that day, whether the day counts as completed, and how long the
//! current streak is. Records are matched to the habit by `habit_id` value, so
//! completions left behind by a deleted habit are simply never counted.
//!
//! A day counts as completed when it holds at least `target_count` records, using
//! the habit's *current* target. Editing the target therefore re-evaluates history.
//!
//! [`toggle_completion`] is intentionally asymmetric: below the target each call adds
//! one record, but once the target is met the next call clears every record of that
//! day in one step.

use crate::{
    core::{
        calendar::{self, DayWindow},
        refresh::{RefreshReason, RefreshSignal},
    },
    entities::{Completion, completion, habit},
    errors::Result,
};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{debug, info};

/// Result of one [`toggle_completion`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// One completion was added and the day is still below target
    Progressed {
        /// Completions now recorded for the day
        count: usize,
        /// The habit's daily target
        target: usize,
    },
    /// One completion was added and the day reached its target
    Completed {
        /// The habit's daily target
        target: usize,
    },
    /// The day was already complete; all of its completions were removed
    Cleared {
        /// Number of completions deleted
        removed: u64,
    },
}

/// The daily target as a count; stored values below 1 are treated as 1.
#[must_use]
pub fn target_of(habit: &habit::Model) -> usize {
    usize::try_from(habit.target_count.max(1)).unwrap_or(1)
}

fn belongs_to<'a>(
    habit: &'a habit::Model,
    all_completions: &'a [completion::Model],
) -> impl Iterator<Item = &'a completion::Model> + 'a {
    all_completions
        .iter()
        .filter(move |completion| completion.habit_id == habit.id)
}

/// Number of completions of `habit` recorded inside `day`.
///
/// No upper bound is applied: more completions than the target are all counted.
#[must_use]
pub fn completions_on_day(
    habit: &habit::Model,
    all_completions: &[completion::Model],
    day: &DayWindow,
) -> usize {
    belongs_to(habit, all_completions)
        .filter(|completion| day.contains(completion.completed_at))
        .count()
}

/// Whether `habit` reached its current target on `day`.
#[must_use]
pub fn is_completed_on_day(
    habit: &habit::Model,
    all_completions: &[completion::Model],
    day: &DayWindow,
) -> bool {
    completions_on_day(habit, all_completions, day) >= target_of(habit)
}

/// Per-local-day completion counts for one habit.
pub fn daily_counts<Tz: TimeZone>(
    habit: &habit::Model,
    all_completions: &[completion::Model],
    tz: &Tz,
) -> HashMap<NaiveDate, usize> {
    let mut counts = HashMap::new();
    for completion in belongs_to(habit, all_completions) {
        *counts
            .entry(calendar::local_day(completion.completed_at, tz))
            .or_insert(0) += 1;
    }
    counts
}

/// Consecutive completed days ending today, in the local timezone.
///
/// If today is not complete yet the streak is 0, even when yesterday was complete.
#[must_use]
pub fn current_streak(habit: &habit::Model, all_completions: &[completion::Model]) -> u32 {
    current_streak_as_of(habit, all_completions, Local::now().date_naive(), &Local)
}

/// Consecutive completed days ending at `today`, walking strictly backwards.
///
/// The walk stops at the first incomplete day. Each counted day needs at least one
/// record, so the walk is bounded by the number of records; a habit that was never
/// completed stops on the very first day.
pub fn current_streak_as_of<Tz: TimeZone>(
    habit: &habit::Model,
    all_completions: &[completion::Model],
    today: NaiveDate,
    tz: &Tz,
) -> u32 {
    let counts = daily_counts(habit, all_completions, tz);
    let target = target_of(habit);

    let mut streak = 0;
    let mut day = today;
    while counts.get(&day).copied().unwrap_or(0) >= target {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

/// Retrieves every completion record, oldest first.
pub async fn get_all_completions(db: &DatabaseConnection) -> Result<Vec<completion::Model>> {
    Completion::find()
        .order_by_asc(completion::Column::CompletedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the completion records of one habit, oldest first.
pub async fn get_completions_for_habit<C>(
    db: &C,
    habit_id: Uuid,
) -> Result<Vec<completion::Model>>
where
    C: ConnectionTrait,
{
    Completion::find()
        .filter(completion::Column::HabitId.eq(habit_id))
        .order_by_asc(completion::Column::CompletedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Records one unit of progress for `habit` at `completed_at`.
pub async fn record_completion<C>(
    db: &C,
    habit_id: Uuid,
    completed_at: DateTime<Utc>,
) -> Result<completion::Model>
where
    C: ConnectionTrait,
{
    let completion = completion::ActiveModel {
        id: Set(Uuid::new_v4()),
        habit_id: Set(habit_id),
        completed_at: Set(completed_at),
    };
    Ok(completion.insert(db).await?)
}

/// Toggles `habit`'s progress for `day`.
///
/// If the day already holds at least `target_count` completions, all of them are
/// deleted. Otherwise exactly one completion timestamped at the start of the day is
/// added. The count and the write happen in one transaction against the store's
/// current contents; the refresh signal fires after the commit.
pub async fn toggle_completion(
    db: &DatabaseConnection,
    refresh: &RefreshSignal,
    habit: &habit::Model,
    day: &DayWindow,
) -> Result<ToggleOutcome> {
    let target = target_of(habit);
    let txn = db.begin().await?;

    let existing = get_completions_for_habit(&txn, habit.id).await?;
    let on_day: Vec<Uuid> = existing
        .iter()
        .filter(|completion| day.contains(completion.completed_at))
        .map(|completion| completion.id)
        .collect();

    let outcome = if on_day.len() >= target {
        let removed = Completion::delete_many()
            .filter(completion::Column::Id.is_in(on_day))
            .exec(&txn)
            .await?
            .rows_affected;
        ToggleOutcome::Cleared { removed }
    } else {
        record_completion(&txn, habit.id, day.start).await?;
        let count = on_day.len() + 1;
        if count >= target {
            ToggleOutcome::Completed { target }
        } else {
            ToggleOutcome::Progressed { count, target }
        }
    };

    txn.commit().await?;

    info!(habit_id = %habit.id, day = %day.day, ?outcome, "Completion toggled");
    refresh.notify(RefreshReason::CompletionToggled { habit_id: habit.id });
    Ok(outcome)
}

/// Toggles `habit` for the current local day.
pub async fn toggle_today(
    db: &DatabaseConnection,
    refresh: &RefreshSignal,
    habit: &habit::Model,
) -> Result<ToggleOutcome> {
    let today = DayWindow::today();
    debug!(habit_id = %habit.id, day = %today.day, "Toggling today's completion");
    toggle_completion(db, refresh, habit, &today).await
}
