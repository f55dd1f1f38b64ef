//! Core business logic - framework-agnostic habit tracking
//!
//! Everything in here works on `SeaORM` connections and entity models only, so the
//! bot layer and the tests drive exactly the same code.

/// Local-day windows, weeks and months
pub mod calendar;
/// Completion query engine and the daily toggle
pub mod completion;
/// Habit creation, editing and deletion
pub mod habit;
/// Onboarding steps, suggestions and sample data
pub mod onboarding;
/// Key/value user preferences
pub mod preferences;
/// Store-changed broadcast consumed by the widget dashboard
pub mod refresh;
/// Streaks, rates and the text export
pub mod stats;
/// Widget snapshot and quick-action toggle
pub mod widget;
