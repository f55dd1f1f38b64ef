//! Autocomplete handlers for Discord slash command parameters.
//!
//! This module provides autocomplete functionality for command parameters like
//! habit names and the fixed icon and color sets, so users pick valid values
//! instead of typing them.

use crate::{
    bot::BotData,
    core::habit::{self, CATEGORIES, COLORS, ICONS},
    errors::Error,
};

/// Discord accepts at most 25 autocomplete choices
const MAX_CHOICES: usize = 25;

fn matching(options: &[&str], partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    options
        .iter()
        .filter(|option| option.to_lowercase().contains(&partial_lower))
        .take(MAX_CHOICES)
        .map(|&option| option.to_string())
        .collect()
}

/// Provides autocomplete suggestions for habit names.
///
/// Queries the store for every habit whose name contains the partial input
/// (case-insensitive) and returns up to 25 names, sorted alphabetically.
pub async fn autocomplete_habit_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(habits) = habit::get_all_habits(db).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    let mut names: Vec<String> = habits
        .into_iter()
        .filter(|h| h.name.to_lowercase().contains(&partial_lower))
        .map(|h| h.name)
        .take(MAX_CHOICES)
        .collect();

    names.sort();
    names
}

/// Provides autocomplete suggestions for icon keys.
pub async fn autocomplete_icon(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching(ICONS, partial)
}

/// Provides autocomplete suggestions for color keys.
pub async fn autocomplete_color(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching(COLORS, partial)
}

/// Provides autocomplete suggestions for category names.
///
/// Categories are free text; these are only the common ones.
pub async fn autocomplete_category(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching(CATEGORIES, partial)
}
