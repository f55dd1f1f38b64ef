//! Daily progress commands - `/done`, `/toggle_day`, `/today`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::utils::{describe_toggle, find_habit_or_reply, say_chunked},
            handlers::{autocomplete, widget::icon_emoji},
        },
        core::{calendar::DayWindow, completion, habit, stats},
        errors::{Error, Result},
    };
    use chrono::{Local, NaiveDate};
    use std::fmt::Write;

    /// Toggles today's progress for a habit.
    ///
    /// Below the daily target this adds one completion. Once the target is reached,
    /// running it again clears the day.
    #[poise::command(slash_command, prefix_command)]
    pub async fn done(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name of the habit"]
        #[autocomplete = "autocomplete::autocomplete_habit_name"]
        habit: String,
    ) -> Result<()> {
        let Some(found) = find_habit_or_reply(ctx, &habit).await? else {
            return Ok(());
        };

        let data = ctx.data();
        let outcome = completion::toggle_today(&data.database, &data.refresh, &found).await?;
        ctx.say(describe_toggle(&found.name, outcome, "today"))
            .await?;
        Ok(())
    }

    /// Toggles a habit's progress for a past (or future) day.
    #[poise::command(slash_command, prefix_command)]
    pub async fn toggle_day(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name of the habit"]
        #[autocomplete = "autocomplete::autocomplete_habit_name"]
        habit: String,
        #[description = "Day to toggle (YYYY-MM-DD)"] date: String,
    ) -> Result<()> {
        let Ok(day) = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") else {
            ctx.say(format!("❌ '{date}' is not a date. Use the form YYYY-MM-DD."))
                .await?;
            return Ok(());
        };

        let Some(found) = find_habit_or_reply(ctx, &habit).await? else {
            return Ok(());
        };

        let data = ctx.data();
        let window = DayWindow::local(day);
        let outcome =
            completion::toggle_completion(&data.database, &data.refresh, &found, &window).await?;
        let when = format!("on {}", day.format("%Y-%m-%d"));
        ctx.say(describe_toggle(&found.name, outcome, &when)).await?;
        Ok(())
    }

    /// Shows today's progress for every active habit.
    #[poise::command(slash_command, prefix_command)]
    pub async fn today(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;

        let habits = habit::get_active_habits(db).await?;
        if habits.is_empty() {
            ctx.say("🗓️ No active habits. Create one with `/habit add`.")
                .await?;
            return Ok(());
        }

        let completions = completion::get_all_completions(db).await?;
        let today = DayWindow::today();
        let done = stats::completed_count_on(&habits, &completions, &today);

        let mut response = format!(
            "🗓️ **{}** - {done}/{} habits done\n\n",
            Local::now().format("%A, %Y-%m-%d"),
            habits.len()
        );
        for h in &habits {
            let count = completion::completions_on_day(h, &completions, &today);
            let target = completion::target_of(h);
            let status = if count >= target { "✅" } else { "▫️" };
            #[allow(clippy::cast_precision_loss)]
            let fraction = count as f64 / target as f64;
            writeln!(
                &mut response,
                "{status} {} **{}** {} ({count}/{target}) 🔥 {}",
                icon_emoji(&h.icon),
                h.name,
                stats::format_progress_bar(fraction, Some(8)),
                completion::current_streak(h, &completions)
            )?;
        }

        say_chunked(ctx, &response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
