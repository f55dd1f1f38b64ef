//! Habit Discord commands - `/habit add|list|info|edit|delete`.
//!
//! This module contains the habit management commands. All validation happens in
//! `core::habit`; validation failures are turned into a short reply and every other
//! error is propagated to the framework's error handler.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::utils::{find_habit_or_reply, say_chunked, validation_message},
            handlers::{autocomplete, widget::icon_emoji},
        },
        core::{
            calendar::{self, DayWindow},
            completion,
            habit::{self, Cadence, HabitChanges, HabitDraft},
            stats::{self, TimeFrame},
        },
        errors::{Error, Result},
    };
    use chrono::{Local, Utc};
    use std::fmt::Write;

    /// Reply for `/habit list` when there are no habits
    pub(crate) const NO_HABITS_MESSAGE: &str =
        "📂 No habits yet. Create one with `/habit add` or run `/onboarding start`.";

    /// Cadence offered as a slash command choice
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum CadenceChoice {
        Daily,
        Weekly,
        Custom,
    }

    impl From<CadenceChoice> for Cadence {
        fn from(choice: CadenceChoice) -> Self {
            match choice {
                CadenceChoice::Daily => Self::Daily,
                CadenceChoice::Weekly => Self::Weekly,
                CadenceChoice::Custom => Self::Custom,
            }
        }
    }

    /// Parent command for creating, listing, editing and deleting habits.
    #[poise::command(
        slash_command,
        subcommands("habit_add", "habit_list", "habit_info", "habit_edit", "habit_delete")
    )]
    pub async fn habit(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Habit management command. Available subcommands:\n\
            `/habit add` - Create a new habit\n\
            `/habit list` - List all habits\n\
            `/habit info` - Show details and statistics for one habit\n\
            `/habit edit` - Change a habit's name, style, target or category\n\
            `/habit delete` - Delete a habit and all of its completions";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Creates a new habit.
    ///
    /// Icon and color must come from the fixed sets (autocomplete lists them). The
    /// daily target defaults to 1 and must be between 1 and 20.
    #[poise::command(slash_command, rename = "add")]
    pub async fn habit_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name of the habit (e.g., 'Drink water')"] name: String,
        #[description = "Icon (default: star.fill)"]
        #[autocomplete = "autocomplete::autocomplete_icon"]
        icon: Option<String>,
        #[description = "Color (default: blue)"]
        #[autocomplete = "autocomplete::autocomplete_color"]
        color: Option<String>,
        #[description = "How often (default: daily)"] cadence: Option<CadenceChoice>,
        #[description = "Completions needed per day, 1-20 (default: 1)"]
        #[min = 1]
        #[max = 20]
        target: Option<i32>,
        #[description = "Category (default: General)"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let defaults = HabitDraft::default();
        let draft = HabitDraft {
            name,
            icon: icon.unwrap_or(defaults.icon),
            color: color.unwrap_or(defaults.color),
            cadence: cadence.map_or(defaults.cadence, Cadence::from),
            target_count: target.unwrap_or(defaults.target_count),
            category: category.unwrap_or(defaults.category),
        };

        match habit::create_habit(&data.database, &data.refresh, draft).await {
            Ok(created) => {
                let target_str = if created.target_count > 1 {
                    format!(" ({}x daily)", created.target_count)
                } else {
                    String::new()
                };
                ctx.say(format!(
                    "✅ Created habit {} **{}**{target_str} in category '{}'.",
                    icon_emoji(&created.icon),
                    created.name,
                    created.category
                ))
                .await?;
            }
            Err(e) => {
                let Some(message) = validation_message(&e) else {
                    return Err(e);
                };
                ctx.say(message).await?;
            }
        }

        Ok(())
    }

    /// Lists all habits with today's progress and current streak.
    #[poise::command(slash_command, rename = "list")]
    pub async fn habit_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;

        let habits = habit::get_all_habits(db).await?;
        if habits.is_empty() {
            ctx.say(NO_HABITS_MESSAGE).await?;
            return Ok(());
        }

        let completions = completion::get_all_completions(db).await?;
        let today = DayWindow::today();

        let mut response = String::from("📂 **All Habits**\n\n");
        for h in &habits {
            let count = completion::completions_on_day(h, &completions, &today);
            let target = completion::target_of(h);
            let status = if count >= target { "✅" } else { "▫️" };
            let streak = completion::current_streak(h, &completions);
            let inactive = if h.is_active { "" } else { " _(paused)_" };
            writeln!(
                &mut response,
                "{status} {} **{}** - {count}/{target} today, 🔥 {streak} ({}){inactive}",
                icon_emoji(&h.icon),
                h.name,
                h.category
            )?;
        }

        say_chunked(ctx, &response).await?;
        Ok(())
    }

    /// Shows detailed information and statistics for one habit.
    #[poise::command(slash_command, rename = "info")]
    pub async fn habit_info(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name of the habit"]
        #[autocomplete = "autocomplete::autocomplete_habit_name"]
        name: String,
    ) -> Result<()> {
        let Some(h) = find_habit_or_reply(ctx, &name).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;
        let completions = completion::get_all_completions(db).await?;
        let now = Utc::now();
        let today = DayWindow::today();

        let mut response = format!("📋 **{} {}**\n\n", icon_emoji(&h.icon), h.name);
        writeln!(&mut response, "🎨 Icon: `{}` | Color: `{}`", h.icon, h.color)?;
        writeln!(&mut response, "📅 Cadence: {}", habit::cadence_of(&h))?;
        writeln!(&mut response, "🎯 Target: {}x daily", h.target_count)?;
        writeln!(&mut response, "📊 Category: {}", h.category)?;
        writeln!(
            &mut response,
            "🕒 Created: {}",
            h.created_at.with_timezone(&Local).format("%Y-%m-%d")
        )?;
        if !h.is_active {
            writeln!(&mut response, "⏸️ Paused")?;
        }
        writeln!(&mut response)?;

        let count = completion::completions_on_day(&h, &completions, &today);
        writeln!(
            &mut response,
            "**Today:** {count}/{}",
            completion::target_of(&h)
        )?;
        writeln!(
            &mut response,
            "**Current streak:** 🔥 {}",
            completion::current_streak(&h, &completions)
        )?;

        let week: String = calendar::week_of(today.day)
            .into_iter()
            .map(|day| {
                if completion::is_completed_on_day(&h, &completions, &DayWindow::local(day)) {
                    "🟩"
                } else {
                    "⬜"
                }
            })
            .collect();
        writeln!(&mut response, "**This week:** {week}")?;
        writeln!(&mut response)?;

        for frame in [TimeFrame::Week, TimeFrame::Month, TimeFrame::Year] {
            let rate = stats::habit_completion_rate(&h, &completions, frame, now);
            writeln!(
                &mut response,
                "**{}:** {}",
                frame.label(),
                stats::format_progress_bar(rate, Some(10))
            )?;
        }
        let total = completions.iter().filter(|c| c.habit_id == h.id).count();
        writeln!(&mut response, "**Total completions:** {total}")?;

        ctx.say(response).await?;
        Ok(())
    }

    /// Edits an existing habit.
    ///
    /// Changing the target re-evaluates every past day against the new target.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn habit_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name of the habit to edit"]
        #[autocomplete = "autocomplete::autocomplete_habit_name"]
        name: String,
        #[description = "New name (optional)"] new_name: Option<String>,
        #[description = "New icon (optional)"]
        #[autocomplete = "autocomplete::autocomplete_icon"]
        icon: Option<String>,
        #[description = "New color (optional)"]
        #[autocomplete = "autocomplete::autocomplete_color"]
        color: Option<String>,
        #[description = "New cadence (optional)"] cadence: Option<CadenceChoice>,
        #[description = "New daily target, 1-20 (optional)"]
        #[min = 1]
        #[max = 20]
        target: Option<i32>,
        #[description = "New category (optional)"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
        #[description = "Pause (false) or resume (true) the habit"] active: Option<bool>,
    ) -> Result<()> {
        let changes = HabitChanges {
            name: new_name,
            icon,
            color,
            cadence: cadence.map(Cadence::from),
            target_count: target,
            category,
            is_active: active,
        };

        if changes.is_empty() {
            ctx.say("❌ Please specify at least one field to change.")
                .await?;
            return Ok(());
        }

        let Some(existing) = find_habit_or_reply(ctx, &name).await? else {
            return Ok(());
        };

        let data = ctx.data();
        match habit::update_habit(&data.database, &data.refresh, existing.id, changes).await {
            Ok(updated) => {
                ctx.say(format!(
                    "✅ Updated habit **{}** {} - target {}x daily, {} ({})",
                    updated.name,
                    icon_emoji(&updated.icon),
                    updated.target_count,
                    habit::cadence_of(&updated),
                    updated.category
                ))
                .await?;
            }
            Err(e) => {
                let Some(message) = validation_message(&e) else {
                    return Err(e);
                };
                ctx.say(message).await?;
            }
        }
        Ok(())
    }

    /// Deletes a habit together with all of its completions.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn habit_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name of the habit to delete"]
        #[autocomplete = "autocomplete::autocomplete_habit_name"]
        name: String,
    ) -> Result<()> {
        let Some(existing) = find_habit_or_reply(ctx, &name).await? else {
            return Ok(());
        };

        let data = ctx.data();
        let removed = habit::delete_habit(&data.database, &data.refresh, existing.id).await?;

        ctx.say(format!(
            "🗑️ Deleted habit **{}** and {removed} completion{}.",
            existing.name,
            if removed == 1 { "" } else { "s" }
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
