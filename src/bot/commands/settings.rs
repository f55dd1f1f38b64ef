//! Preference commands - `/settings show|dark_mode|notifications|reminder|wipe`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::utils::validation_message},
        core::{habit, preferences},
        errors::{Error, Result},
    };
    use tracing::warn;

    fn on_off(enabled: bool) -> &'static str {
        if enabled { "on" } else { "off" }
    }

    /// Parent command for viewing and changing preferences.
    #[poise::command(
        slash_command,
        subcommands(
            "settings_show",
            "settings_dark_mode",
            "settings_notifications",
            "settings_reminder",
            "settings_wipe"
        )
    )]
    pub async fn settings(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Settings command. Available subcommands:\n\
            `/settings show` - Show the current preferences\n\
            `/settings dark_mode` - Turn dark mode on or off\n\
            `/settings notifications` - Turn reminders on or off\n\
            `/settings reminder` - Set the daily reminder time (HH:MM)\n\
            `/settings wipe` - Delete all habits and completions";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows the current preferences.
    #[poise::command(slash_command, rename = "show")]
    pub async fn settings_show(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let prefs = preferences::load_preferences(&ctx.data().database).await?;

        let response = format!(
            "⚙️ **Settings**\n\n\
            🌙 Dark mode: {}\n\
            🔔 Notifications: {}\n\
            ⏰ Reminder time: {}\n\
            👋 Onboarding completed: {}",
            on_off(prefs.dark_mode),
            on_off(prefs.notifications_enabled),
            prefs.reminder_time_label(),
            if prefs.onboarding_completed { "yes" } else { "no" }
        );

        ctx.say(response).await?;
        Ok(())
    }

    /// Turns dark mode on or off.
    #[poise::command(slash_command, rename = "dark_mode")]
    pub async fn settings_dark_mode(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Enable dark mode"] enabled: bool,
    ) -> Result<()> {
        preferences::set_dark_mode(&ctx.data().database, enabled).await?;
        ctx.say(format!("🌙 Dark mode turned {}.", on_off(enabled)))
            .await?;
        Ok(())
    }

    /// Turns daily reminders on or off.
    #[poise::command(slash_command, rename = "notifications")]
    pub async fn settings_notifications(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Enable reminders"] enabled: bool,
    ) -> Result<()> {
        preferences::set_notifications_enabled(&ctx.data().database, enabled).await?;
        ctx.say(format!("🔔 Notifications turned {}.", on_off(enabled)))
            .await?;
        Ok(())
    }

    /// Sets the daily reminder time.
    #[poise::command(slash_command, rename = "reminder")]
    pub async fn settings_reminder(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Time of day, HH:MM (e.g., 07:30)"] time: String,
    ) -> Result<()> {
        match preferences::set_reminder_time(&ctx.data().database, &time).await {
            Ok(parsed) => {
                ctx.say(format!("⏰ Reminder time set to {}.", parsed.format("%H:%M")))
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

    /// Deletes every habit and every completion.
    ///
    /// Nothing happens unless `confirm` is set to true.
    #[poise::command(slash_command, rename = "wipe")]
    pub async fn settings_wipe(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Set to true to really delete everything"] confirm: bool,
    ) -> Result<()> {
        if !confirm {
            ctx.say("⚠️ Nothing deleted. Run `/settings wipe confirm:true` to delete all habits and completions.")
                .await?;
            return Ok(());
        }

        let data = ctx.data();
        let summary = habit::delete_all_data(&data.database, &data.refresh).await?;
        warn!(
            user = %ctx.author().name,
            habits = summary.habits,
            completions = summary.completions,
            "All habit data wiped"
        );
        ctx.say(format!(
            "🗑️ Deleted {} habits and {} completions.",
            summary.habits, summary.completions
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
