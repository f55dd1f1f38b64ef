//! Statistics over habits and their completions.
//!
//! Everything here is a pure function over already-loaded habits and completion
//! records, so the bot layer loads once and formats whatever it needs. Functions
//! that depend on "now" come in two forms: a convenience form using the local clock
//! and an `_as_of` form taking the moment and timezone explicitly.

use crate::{
    core::{
        calendar::{self, DayWindow},
        completion::{self, current_streak_as_of, is_completed_on_day},
    },
    entities::{completion as completion_entity, habit},
    errors::{Error, Result},
};
use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, TimeZone, Utc, Weekday};
use std::{fmt::Write as _, str::FromStr};

/// Period that rate statistics are computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFrame {
    /// The last 7 days
    #[default]
    Week,
    /// The last 30 days
    Month,
    /// The last 365 days
    Year,
}

impl TimeFrame {
    /// Length of the period in days
    #[must_use]
    pub const fn days(self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Year => "Year",
        }
    }
}

impl FromStr for TimeFrame {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(Error::Config {
                message: format!("Unknown time frame '{other}'"),
            }),
        }
    }
}

/// Headline numbers for the statistics view
#[derive(Debug, Clone, PartialEq)]
pub struct StatsOverview {
    /// Number of habits considered
    pub total_habits: usize,
    /// Habits that reached their target today
    pub completed_today: usize,
    /// Average completion over the time frame, 0.0-1.0 (can exceed 1.0 with extra completions)
    pub average_completion: f64,
    /// Longest current streak among all habits
    pub best_streak: u32,
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn days_in(frame: TimeFrame) -> usize {
    usize::try_from(frame.days()).unwrap_or(0)
}

/// Builds the overview for `habits` using the local clock.
#[must_use]
pub fn overview(
    habits: &[habit::Model],
    completions: &[completion_entity::Model],
    frame: TimeFrame,
) -> StatsOverview {
    overview_as_of(habits, completions, frame, Utc::now(), &Local)
}

/// Builds the overview for `habits` as seen at `now` in `tz`.
pub fn overview_as_of<Tz: TimeZone>(
    habits: &[habit::Model],
    completions: &[completion_entity::Model],
    frame: TimeFrame,
    now: DateTime<Utc>,
    tz: &Tz,
) -> StatsOverview {
    let today = DayWindow::containing(now, tz);
    StatsOverview {
        total_habits: habits.len(),
        completed_today: completed_count_on(habits, completions, &today),
        average_completion: average_completion(habits, completions, frame, now),
        best_streak: best_streak_as_of(habits, completions, today.day, tz),
    }
}

/// Number of habits that reached their target on `day`.
#[must_use]
pub fn completed_count_on(
    habits: &[habit::Model],
    completions: &[completion_entity::Model],
    day: &DayWindow,
) -> usize {
    habits
        .iter()
        .filter(|habit| is_completed_on_day(habit, completions, day))
        .count()
}

/// Number of habits that reached their target today.
#[must_use]
pub fn completed_today_count(
    habits: &[habit::Model],
    completions: &[completion_entity::Model],
) -> usize {
    completed_count_on(habits, completions, &DayWindow::today())
}

/// Longest current streak among `habits`, 0 when there are none.
#[must_use]
pub fn best_streak(habits: &[habit::Model], completions: &[completion_entity::Model]) -> u32 {
    best_streak_as_of(habits, completions, Local::now().date_naive(), &Local)
}

/// Longest streak ending at `today` among `habits`.
pub fn best_streak_as_of<Tz: TimeZone>(
    habits: &[habit::Model],
    completions: &[completion_entity::Model],
    today: NaiveDate,
    tz: &Tz,
) -> u32 {
    habits
        .iter()
        .map(|habit| current_streak_as_of(habit, completions, today, tz))
        .max()
        .unwrap_or(0)
}

/// The `limit` habits with the longest current streaks, longest first.
///
/// Ties keep the input order.
pub fn top_streaks<'a, Tz: TimeZone>(
    habits: &'a [habit::Model],
    completions: &[completion_entity::Model],
    limit: usize,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<(&'a habit::Model, u32)> {
    let mut ranked: Vec<_> = habits
        .iter()
        .map(|habit| (habit, current_streak_as_of(habit, completions, today, tz)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

/// Records of `habit` with a timestamp in `[now - frame, now]`.
#[must_use]
pub fn completions_in_time_frame(
    habit: &habit::Model,
    completions: &[completion_entity::Model],
    frame: TimeFrame,
    now: DateTime<Utc>,
) -> usize {
    let since = now - Duration::days(frame.days());
    completions
        .iter()
        .filter(|c| c.habit_id == habit.id && c.completed_at >= since && c.completed_at <= now)
        .count()
}

/// Completions in the time frame divided by the possible completions (days × target).
#[must_use]
pub fn habit_completion_rate(
    habit: &habit::Model,
    completions: &[completion_entity::Model],
    frame: TimeFrame,
    now: DateTime<Utc>,
) -> f64 {
    ratio(
        completions_in_time_frame(habit, completions, frame, now),
        days_in(frame) * completion::target_of(habit),
    )
}

/// Sum of every habit's completions in the time frame divided by habits × days.
///
/// Targets are not part of the denominator, so habits with a target above 1 can push
/// this above 1.0. Returns 0.0 when there are no habits.
#[must_use]
pub fn average_completion(
    habits: &[habit::Model],
    completions: &[completion_entity::Model],
    frame: TimeFrame,
    now: DateTime<Utc>,
) -> f64 {
    let total: usize = habits
        .iter()
        .map(|habit| completions_in_time_frame(habit, completions, frame, now))
        .sum();
    ratio(total, habits.len() * days_in(frame))
}

/// Completions of `habits` inside a local calendar month divided by habits × days in month.
///
/// Returns 0.0 when there are no habits or the month is invalid.
pub fn monthly_completion_rate<Tz: TimeZone>(
    habits: &[habit::Model],
    completions: &[completion_entity::Model],
    year: i32,
    month: u32,
    tz: &Tz,
) -> f64 {
    let (Some((start, end)), Some(days)) = (
        calendar::month_bounds(year, month, tz),
        calendar::days_in_month(year, month),
    ) else {
        return 0.0;
    };

    let actual = completions
        .iter()
        .filter(|c| c.completed_at >= start && c.completed_at < end)
        .filter(|c| habits.iter().any(|habit| habit.id == c.habit_id))
        .count();
    ratio(actual, habits.len() * usize::try_from(days).unwrap_or(0))
}

/// Share of `weekday`s in the last month on which `habit` was recorded, capped at 1.0.
///
/// The window runs from one calendar month before `now` up to `now`, in local days.
pub fn weekday_completion_rate<Tz: TimeZone>(
    habit: &habit::Model,
    completions: &[completion_entity::Model],
    weekday: Weekday,
    now: DateTime<Utc>,
    tz: &Tz,
) -> f64 {
    let end_day = calendar::local_day(now, tz);
    let start_day = end_day
        .checked_sub_months(Months::new(1))
        .unwrap_or(end_day);

    let occurrences = start_day
        .iter_days()
        .take_while(|day| *day <= end_day)
        .filter(|day| day.weekday() == weekday)
        .count();

    let hits = completions
        .iter()
        .filter(|c| c.habit_id == habit.id)
        .map(|c| calendar::local_day(c.completed_at, tz))
        .filter(|day| *day >= start_day && *day <= end_day && day.weekday() == weekday)
        .count();

    ratio(hits, occurrences).min(1.0)
}

/// Formats a 0.0-1.0 fraction as a whole percentage, like `"42%"`.
#[must_use]
pub fn format_percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

/// Generates a progress bar for a 0.0-1.0 fraction, like `[████████░░] 80%`.
#[must_use]
pub fn format_progress_bar(fraction: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = fraction.clamp(0.0, 1.0);

    // clamped is in [0, 1] and length is small, so the product fits in usize
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = (clamped * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!(
        "[{}{}] {}",
        "█".repeat(filled),
        "░".repeat(empty),
        format_percent(clamped)
    )
}

/// Plain-text export of every habit, as of today in the local timezone.
pub fn export_text(
    habits: &[habit::Model],
    completions: &[completion_entity::Model],
) -> Result<String> {
    export_text_as_of(habits, completions, Local::now().date_naive(), &Local)
}

/// Plain-text export of every habit with its streak at `today`.
pub fn export_text_as_of<Tz: TimeZone>(
    habits: &[habit::Model],
    completions: &[completion_entity::Model],
    today: NaiveDate,
    tz: &Tz,
) -> Result<String> {
    let mut text = String::from("HABIT TRACKER EXPORT\n");
    text.push_str("====================\n\n");

    for habit in habits {
        let total = completions.iter().filter(|c| c.habit_id == habit.id).count();
        writeln!(text, "Habit: {}", habit.name)?;
        writeln!(text, "Icon: {}", habit.icon)?;
        writeln!(text, "Color: {}", habit.color)?;
        writeln!(text, "Category: {}", habit.category)?;
        writeln!(text, "Target: {}x daily", habit.target_count)?;
        writeln!(
            text,
            "Created: {}",
            calendar::local_day(habit.created_at, tz).format("%Y-%m-%d")
        )?;
        writeln!(
            text,
            "Streak: {} days",
            current_streak_as_of(habit, completions, today, tz)
        )?;
        writeln!(text, "Completions: {total}")?;
        text.push('\n');
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_time_frame_days() {
        assert_eq!(TimeFrame::Week.days(), 7);
        assert_eq!(TimeFrame::Month.days(), 30);
        assert_eq!(TimeFrame::Year.days(), 365);
        assert_eq!("MONTH".parse::<TimeFrame>().unwrap(), TimeFrame::Month);
        assert!("decade".parse::<TimeFrame>().is_err());
    }

    #[test]
    fn test_completions_in_time_frame_bounds() {
        let habit = habit_model("Workout", 1);
        let now = noon(2025, 6, 24);
        let completions = vec![
            completion_model(habit.id, now),
            completion_model(habit.id, now - Duration::days(7)),
            completion_model(habit.id, now - Duration::days(8)),
            completion_model(habit.id, now + Duration::hours(1)),
        ];

        assert_eq!(
            completions_in_time_frame(&habit, &completions, TimeFrame::Week, now),
            2
        );
        assert_eq!(
            completions_in_time_frame(&habit, &completions, TimeFrame::Month, now),
            3
        );
    }

    #[test]
    fn test_habit_completion_rate_uses_target() {
        let habit = habit_model("Water", 2);
        let now = noon(2025, 6, 24);
        let completions: Vec<_> = (0..7)
            .map(|d| completion_model(habit.id, now - Duration::days(d)))
            .collect();

        // 7 of 14 possible
        assert_eq!(
            habit_completion_rate(&habit, &completions, TimeFrame::Week, now),
            0.5
        );
    }

    #[test]
    fn test_average_completion() {
        let now = noon(2025, 6, 24);
        assert_eq!(average_completion(&[], &[], TimeFrame::Week, now), 0.0);

        let a = habit_model("A", 1);
        let b = habit_model("B", 1);
        let completions: Vec<_> = (0..7)
            .map(|d| completion_model(a.id, now - Duration::days(d)))
            .collect();

        // 7 completions over 2 habits × 7 days
        let habits = vec![a, b];
        assert_eq!(
            average_completion(&habits, &completions, TimeFrame::Week, now),
            0.5
        );
    }

    #[test]
    fn test_monthly_completion_rate_only_counts_given_habits() {
        let habit = habit_model("A", 1);
        let completions = vec![
            completion_model(habit.id, noon(2025, 2, 1)),
            completion_model(habit.id, noon(2025, 2, 28)),
            completion_model(habit.id, noon(2025, 3, 1)),
            completion_model(uuid::Uuid::new_v4(), noon(2025, 2, 10)),
        ];

        let rate = monthly_completion_rate(&[habit], &completions, 2025, 2, &Utc);
        assert_eq!(rate, 2.0 / 28.0);
        assert_eq!(monthly_completion_rate(&[], &completions, 2025, 2, &Utc), 0.0);
        assert_eq!(monthly_completion_rate(&[], &[], 2025, 13, &Utc), 0.0);
    }

    #[test]
    fn test_weekday_completion_rate() {
        let habit = habit_model("Workout", 1);
        // 2025-06-24 is a Tuesday; the window starts on 2025-05-24
        let now = noon(2025, 6, 24);
        let tuesdays = [
            noon(2025, 5, 27),
            noon(2025, 6, 3),
            noon(2025, 6, 10),
            noon(2025, 6, 17),
            noon(2025, 6, 24),
        ];
        let completions: Vec<_> = tuesdays[..4]
            .iter()
            .map(|ts| completion_model(habit.id, *ts))
            .collect();

        let rate = weekday_completion_rate(&habit, &completions, Weekday::Tue, now, &Utc);
        assert_eq!(rate, 4.0 / 5.0);
        assert_eq!(
            weekday_completion_rate(&habit, &completions, Weekday::Wed, now, &Utc),
            0.0
        );

        // Several records on the same Tuesdays cannot push the rate above 1
        let mut doubled = completions.clone();
        doubled.extend(tuesdays.iter().map(|ts| completion_model(habit.id, *ts)));
        assert_eq!(
            weekday_completion_rate(&habit, &doubled, Weekday::Tue, now, &Utc),
            1.0
        );
    }

    #[test]
    fn test_streak_statistics() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 24).unwrap();
        let long = habit_model("Long", 1);
        let short = habit_model("Short", 1);
        let none = habit_model("None", 1);

        let mut completions: Vec<_> = (0..4)
            .map(|d| completion_model(long.id, noon(2025, 6, 24) - Duration::days(d)))
            .collect();
        completions.push(completion_model(short.id, noon(2025, 6, 24)));

        let habits = vec![none, short, long];
        assert_eq!(best_streak_as_of(&habits, &completions, today, &Utc), 4);
        assert_eq!(best_streak_as_of(&[], &completions, today, &Utc), 0);

        let top = top_streaks(&habits, &completions, 2, today, &Utc);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0.name, "Long");
        assert_eq!(top[0].1, 4);
        assert_eq!(top[1].0.name, "Short");

        let window = DayWindow::new(today, &Utc);
        assert_eq!(completed_count_on(&habits, &completions, &window), 2);
    }

    #[test]
    fn test_overview_as_of() {
        let now = noon(2025, 6, 24);
        let habit = habit_model("Read", 1);
        let completions = vec![completion_model(habit.id, now)];

        let stats = overview_as_of(&[habit], &completions, TimeFrame::Week, now, &Utc);
        assert_eq!(stats.total_habits, 1);
        assert_eq!(stats.completed_today, 1);
        assert_eq!(stats.best_streak, 1);
        assert_eq!(stats.average_completion, 1.0 / 7.0);
    }

    #[test]
    fn test_format_progress_bar() {
        assert_eq!(format_progress_bar(0.8, None), "[████████░░] 80%");
        assert_eq!(format_progress_bar(0.0, Some(4)), "[░░░░] 0%");
        assert_eq!(format_progress_bar(1.7, Some(4)), "[████] 100%");
    }

    #[test]
    fn test_export_text() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 24).unwrap();
        let mut habit = habit_model("Drink water", 8);
        habit.created_at = noon(2025, 6, 1);
        let completions = vec![
            completion_model(habit.id, noon(2025, 6, 20)),
            completion_model(habit.id, noon(2025, 6, 21)),
        ];

        let text = export_text_as_of(&[habit], &completions, today, &Utc).unwrap();
        assert!(text.starts_with("HABIT TRACKER EXPORT\n"));
        assert!(text.contains("Habit: Drink water\n"));
        assert!(text.contains("Target: 8x daily\n"));
        assert!(text.contains("Created: 2025-06-01\n"));
        assert!(text.contains("Streak: 0 days\n"));
        assert!(text.contains("Completions: 2\n"));
    }

    #[test]
    fn test_export_text_created_date_uses_local_day() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 24).unwrap();
        let mut habit = habit_model("Late night reading", 1);
        habit.created_at = Utc.with_ymd_and_hms(2025, 6, 1, 23, 30, 0).unwrap();
        let tz = chrono::FixedOffset::east_opt(2 * 3600).unwrap();

        let text = export_text_as_of(&[habit], &[], today, &tz).unwrap();
        assert!(text.contains("Created: 2025-06-02\n"));
    }
}
