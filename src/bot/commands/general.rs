//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**HabitBuddy Help**\n\
        Here is a summary of all available commands for HabitBuddy.\n\n\
        **Daily Commands**\n\
        • `/done <habit>` - Adds one completion for today, or resets today once the target is met.\n\
        • `/toggle_day <habit> <YYYY-MM-DD>` - Same as `/done`, for another day.\n\
        • `/today` - Shows today's progress for every habit.\n\
        • `/widget` - Posts the live dashboard with one-tap toggle buttons.\n\n\
        **Habit Commands**\n\
        • `/habit <subcommand>` - Manage habits (add, list, info, edit, delete).\n\n\
        **Statistics**\n\
        • `/stats [timeframe]` - Overview for the last week, month or year.\n\
        • `/streaks` - Habits ranked by current streak.\n\
        • `/month [YYYY-MM]` - Calendar view and completion rate for a month.\n\
        • `/export` - Plain-text export of all habits.\n\n\
        **Settings**\n\
        • `/settings <subcommand>` - Dark mode, notifications, reminder time, wipe data.\n\
        • `/onboarding <subcommand>` - Pick suggested habits to get started.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
