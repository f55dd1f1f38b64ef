//! First-run onboarding: a linear step progression, a pick list of suggested
//! habits, and the sample data created when the store is still empty afterwards.

use crate::{
    config::settings::SuggestionConfig,
    core::{
        habit::{Cadence, HabitDraft, get_all_habits, insert_habit},
        preferences::set_onboarding_completed,
        refresh::{RefreshReason, RefreshSignal},
    },
    entities::habit,
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::collections::BTreeSet;
use tracing::info;

/// Onboarding screens, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnboardingStep {
    /// Greeting
    #[default]
    Welcome,
    /// Feature overview
    Features,
    /// Rating request
    Rating,
    /// Habit suggestions
    Habits,
    /// Done
    Complete,
}

impl OnboardingStep {
    /// All steps in order
    pub const ALL: [Self; 5] = [
        Self::Welcome,
        Self::Features,
        Self::Rating,
        Self::Habits,
        Self::Complete,
    ];

    /// The following step; `Complete` stays `Complete`
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Welcome => Self::Features,
            Self::Features => Self::Rating,
            Self::Rating => Self::Habits,
            Self::Habits | Self::Complete => Self::Complete,
        }
    }

    /// Human-readable title
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::Features => "Features",
            Self::Rating => "Rate the app",
            Self::Habits => "Pick your habits",
            Self::Complete => "All set",
        }
    }
}

/// A habit offered during onboarding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitSuggestion {
    /// Habit name
    pub name: String,
    /// Icon key
    pub icon: String,
    /// Color key
    pub color: String,
    /// Category label
    pub category: String,
    /// Daily target
    pub target_count: i32,
}

impl HabitSuggestion {
    fn new(name: &str, icon: &str, color: &str, category: &str, target_count: i32) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            category: category.to_string(),
            target_count,
        }
    }

    /// The draft this suggestion creates
    #[must_use]
    pub fn to_draft(&self) -> HabitDraft {
        HabitDraft {
            name: self.name.clone(),
            icon: self.icon.clone(),
            color: self.color.clone(),
            cadence: Cadence::Daily,
            target_count: self.target_count,
            category: self.category.clone(),
        }
    }
}

impl From<&SuggestionConfig> for HabitSuggestion {
    fn from(config: &SuggestionConfig) -> Self {
        Self {
            name: config.name.clone(),
            icon: config.icon.clone(),
            color: config.color.clone(),
            category: config.category.clone(),
            target_count: config.target_count,
        }
    }
}

/// Built-in suggestions
#[must_use]
pub fn default_suggestions() -> Vec<HabitSuggestion> {
    vec![
        HabitSuggestion::new("Daily Workout", "figure.run", "orange", "Fitness", 1),
        HabitSuggestion::new("Meditation", "leaf", "green", "Wellness", 1),
        HabitSuggestion::new("Read 30 minutes", "book", "blue", "Education", 1),
        HabitSuggestion::new("Drink 8 glasses of water", "drop", "teal", "Health", 8),
        HabitSuggestion::new("Write in journal", "square.and.pencil", "purple", "Wellness", 1),
        HabitSuggestion::new("Take a walk", "figure.walk", "indigo", "Fitness", 1),
    ]
}

/// Suggestions from the config file, or the built-in list when none are configured.
#[must_use]
pub fn suggestions_from_config(configured: &[SuggestionConfig]) -> Vec<HabitSuggestion> {
    if configured.is_empty() {
        default_suggestions()
    } else {
        configured.iter().map(HabitSuggestion::from).collect()
    }
}

/// Habits created when the store is empty once onboarding is over
#[must_use]
pub fn sample_habits() -> Vec<HabitDraft> {
    vec![
        HabitSuggestion::new("Workout", "figure.run", "orange", "Fitness", 1).to_draft(),
        HabitSuggestion::new("Meditation", "leaf", "green", "Wellness", 1).to_draft(),
        HabitSuggestion::new("Reading", "book", "blue", "Education", 1).to_draft(),
        HabitSuggestion::new("Water", "drop", "teal", "Health", 8).to_draft(),
    ]
}

/// Parses a comma or space separated list of 1-based suggestion numbers, like `"1, 3"`.
///
/// Returns 0-based indices. Every number must be between 1 and `available`.
pub fn parse_selection(input: &str, available: usize) -> Result<BTreeSet<usize>> {
    let invalid = |message: String| Error::InvalidSelection {
        value: input.to_string(),
        message,
    };

    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let number: usize = part
                .parse()
                .map_err(|_| invalid(format!("'{part}' is not a number")))?;
            if number == 0 || number > available {
                return Err(invalid(format!("{number} is not between 1 and {available}")));
            }
            Ok(number - 1)
        })
        .collect()
}

/// State of one onboarding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingFlow {
    step: OnboardingStep,
    suggestions: Vec<HabitSuggestion>,
    selected: BTreeSet<usize>,
}

impl OnboardingFlow {
    /// Starts at the welcome step with nothing selected.
    #[must_use]
    pub const fn new(suggestions: Vec<HabitSuggestion>) -> Self {
        Self {
            step: OnboardingStep::Welcome,
            suggestions,
            selected: BTreeSet::new(),
        }
    }

    /// The current step
    #[must_use]
    pub const fn step(&self) -> OnboardingStep {
        self.step
    }

    /// Every suggestion on offer
    #[must_use]
    pub fn suggestions(&self) -> &[HabitSuggestion] {
        &self.suggestions
    }

    /// Moves to the next step and returns it.
    pub const fn advance(&mut self) -> OnboardingStep {
        self.step = self.step.next();
        self.step
    }

    /// Jumps straight to the final step.
    pub const fn skip_to_end(&mut self) {
        self.step = OnboardingStep::Complete;
    }

    /// Selects or deselects the suggestion at `index`; returns whether it is now selected.
    pub fn toggle(&mut self, index: usize) -> bool {
        if index >= self.suggestions.len() {
            return false;
        }
        if self.selected.remove(&index) {
            false
        } else {
            self.selected.insert(index);
            true
        }
    }

    /// Replaces the selection with the given indices; out-of-range indices are ignored.
    pub fn select(&mut self, indices: impl IntoIterator<Item = usize>) {
        let available = self.suggestions.len();
        self.selected = indices.into_iter().filter(|i| *i < available).collect();
    }

    /// The currently selected suggestions, in list order
    pub fn selected(&self) -> impl Iterator<Item = &HabitSuggestion> {
        self.selected
            .iter()
            .filter_map(|index| self.suggestions.get(*index))
    }

    /// Creates the selected habits and marks onboarding as completed.
    ///
    /// All habits and the preference are written in one transaction. The refresh
    /// signal fires once after the commit when at least one habit was created.
    pub async fn finish(
        &mut self,
        db: &DatabaseConnection,
        refresh: &RefreshSignal,
    ) -> Result<Vec<habit::Model>> {
        let drafts: Vec<HabitDraft> = self.selected().map(HabitSuggestion::to_draft).collect();

        let txn = db.begin().await?;
        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            created.push(insert_habit(&txn, draft).await?);
        }
        set_onboarding_completed(&txn, true).await?;
        txn.commit().await?;

        self.skip_to_end();
        info!(count = created.len(), "Onboarding finished");
        if !created.is_empty() {
            refresh.notify(RefreshReason::HabitsSeeded {
                count: created.len(),
            });
        }
        Ok(created)
    }
}

/// Marks onboarding as not completed so it is offered again.
pub async fn reset_onboarding(db: &DatabaseConnection) -> Result<()> {
    set_onboarding_completed(db, false).await?;
    info!("Onboarding reset");
    Ok(())
}

/// Creates the sample habits when the store has none; returns how many were created.
pub async fn seed_sample_habits_if_empty(
    db: &DatabaseConnection,
    refresh: &RefreshSignal,
) -> Result<usize> {
    if !get_all_habits(db).await?.is_empty() {
        return Ok(0);
    }

    let txn = db.begin().await?;
    let mut count = 0;
    for draft in sample_habits() {
        insert_habit(&txn, draft).await?;
        count += 1;
    }
    txn.commit().await?;

    info!(count, "Sample habits created");
    refresh.notify(RefreshReason::HabitsSeeded { count });
    Ok(count)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::preferences::load_preferences;
    use crate::test_utils::*;

    #[test]
    fn test_steps_progress_linearly() {
        let mut step = OnboardingStep::default();
        let mut seen = vec![step];
        while step != OnboardingStep::Complete {
            step = step.next();
            seen.push(step);
        }
        assert_eq!(seen, OnboardingStep::ALL.to_vec());
        assert_eq!(OnboardingStep::Complete.next(), OnboardingStep::Complete);
    }

    #[test]
    fn test_flow_skip_to_end() {
        let mut flow = OnboardingFlow::new(default_suggestions());
        assert_eq!(flow.advance(), OnboardingStep::Features);
        flow.skip_to_end();
        assert_eq!(flow.step(), OnboardingStep::Complete);
    }

    #[test]
    fn test_parse_selection() {
        let selection = parse_selection("1, 3 3", 6).unwrap();
        assert_eq!(selection.into_iter().collect::<Vec<_>>(), vec![0, 2]);
        assert!(parse_selection("", 6).unwrap().is_empty());

        assert!(matches!(
            parse_selection("0", 6),
            Err(Error::InvalidSelection { .. })
        ));
        assert!(matches!(
            parse_selection("7", 6),
            Err(Error::InvalidSelection { .. })
        ));
        assert!(matches!(
            parse_selection("two", 6),
            Err(Error::InvalidSelection { .. })
        ));
    }

    #[test]
    fn test_toggle_selection() {
        let mut flow = OnboardingFlow::new(default_suggestions());
        assert!(flow.toggle(1));
        assert!(flow.toggle(3));
        assert!(!flow.toggle(1));
        assert!(!flow.toggle(42));

        let names: Vec<_> = flow.selected().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Drink 8 glasses of water"]);
    }

    #[test]
    fn test_configured_suggestions_replace_defaults() {
        assert_eq!(suggestions_from_config(&[]).len(), 6);

        let configured = vec![SuggestionConfig {
            name: "Stretch".to_string(),
            icon: "figure.walk".to_string(),
            color: "mint".to_string(),
            category: "Fitness".to_string(),
            target_count: 2,
        }];
        let suggestions = suggestions_from_config(&configured);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].name, "Stretch");
        assert_eq!(suggestions[0].target_count, 2);
    }

    #[tokio::test]
    async fn test_finish_creates_selected_habits() -> Result<()> {
        let db = setup_test_db().await?;
        let refresh = RefreshSignal::new();
        let mut receiver = refresh.subscribe();

        let mut flow = OnboardingFlow::new(default_suggestions());
        flow.select(parse_selection("1,4", 6)?);
        let created = flow.finish(&db, &refresh).await?;

        assert_eq!(created.len(), 2);
        let habits = get_all_habits(&db).await?;
        assert_eq!(habits.len(), 2);
        assert!(habits.iter().any(|h| h.name == "Drink 8 glasses of water" && h.target_count == 8));
        assert!(load_preferences(&db).await?.onboarding_completed);
        assert_eq!(
            receiver.try_recv().unwrap(),
            RefreshReason::HabitsSeeded { count: 2 }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_finish_rolls_back_on_invalid_suggestion() -> Result<()> {
        let db = setup_test_db().await?;
        let mut suggestions = default_suggestions();
        suggestions[1].color = "chartreuse".to_string();

        let mut flow = OnboardingFlow::new(suggestions);
        flow.select([0, 1]);
        let result = flow.finish(&db, &RefreshSignal::new()).await;

        assert!(matches!(result, Err(Error::InvalidHabit { .. })));
        assert!(get_all_habits(&db).await?.is_empty());
        assert!(!load_preferences(&db).await?.onboarding_completed);
        Ok(())
    }

    #[tokio::test]
    async fn test_reset_onboarding() -> Result<()> {
        let db = setup_test_db().await?;
        OnboardingFlow::new(default_suggestions())
            .finish(&db, &RefreshSignal::new())
            .await?;
        assert!(load_preferences(&db).await?.onboarding_completed);

        reset_onboarding(&db).await?;
        assert!(!load_preferences(&db).await?.onboarding_completed);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_sample_habits_only_when_empty() -> Result<()> {
        let db = setup_test_db().await?;
        let refresh = RefreshSignal::new();

        assert_eq!(seed_sample_habits_if_empty(&db, &refresh).await?, 4);
        let habits = get_all_habits(&db).await?;
        assert_eq!(habits.len(), 4);
        assert!(habits.iter().any(|h| h.name == "Water" && h.target_count == 8));

        // A second run leaves the existing habits alone
        assert_eq!(seed_sample_habits_if_empty(&db, &refresh).await?, 0);
        assert_eq!(get_all_habits(&db).await?.len(), 4);
        Ok(())
    }
}
