//! Statistics Discord commands - `/stats`, `/streaks`, `/month`, `/export`.
//!
//! These commands load all habits and completions once and hand them to the pure
//! functions in `core::stats` for the numbers.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::utils::{export_reply, find_habit_or_reply, say_chunked},
            handlers::{autocomplete, widget::icon_emoji},
        },
        core::{
            calendar::{self, DayWindow},
            completion,
            habit,
            stats::{self as habit_stats, TimeFrame},
        },
        errors::{Error, Result},
    };
    use chrono::{Datelike, Local, NaiveDate, Utc, Weekday};
    use std::fmt::Write;

    const TOP_STREAKS: usize = 5;
    const WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Time frame offered as a slash command choice
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum TimeFrameChoice {
        Week,
        Month,
        Year,
    }

    impl From<TimeFrameChoice> for TimeFrame {
        fn from(choice: TimeFrameChoice) -> Self {
            match choice {
                TimeFrameChoice::Week => Self::Week,
                TimeFrameChoice::Month => Self::Month,
                TimeFrameChoice::Year => Self::Year,
            }
        }
    }

    /// Shows the statistics overview and per-habit completion rates.
    #[poise::command(slash_command, prefix_command)]
    pub async fn stats(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Time frame (default: week)"] timeframe: Option<TimeFrameChoice>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let frame = timeframe.map_or_else(TimeFrame::default, TimeFrame::from);

        let habits = habit::get_all_habits(db).await?;
        let completions = completion::get_all_completions(db).await?;
        let overview = habit_stats::overview(&habits, &completions, frame);
        let now = Utc::now();

        let mut response = format!("📊 **Statistics - last {}**\n\n", frame.label());
        writeln!(&mut response, "Habits: {}", overview.total_habits)?;
        writeln!(
            &mut response,
            "Done today: {}/{}",
            overview.completed_today, overview.total_habits
        )?;
        writeln!(
            &mut response,
            "Average completion: {}",
            habit_stats::format_percent(overview.average_completion)
        )?;
        writeln!(&mut response, "Best streak: 🔥 {}", overview.best_streak)?;

        if !habits.is_empty() {
            writeln!(&mut response, "\n**Completion rate per habit**")?;
            for h in &habits {
                let rate = habit_stats::habit_completion_rate(h, &completions, frame, now);
                writeln!(
                    &mut response,
                    "{} {}: {} ({} done)",
                    icon_emoji(&h.icon),
                    h.name,
                    habit_stats::format_progress_bar(rate, Some(10)),
                    habit_stats::completions_in_time_frame(h, &completions, frame, now)
                )?;
            }
        }

        say_chunked(ctx, &response).await?;
        Ok(())
    }

    /// Shows the habits with the longest current streaks.
    #[poise::command(slash_command, prefix_command)]
    pub async fn streaks(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let habits = habit::get_all_habits(db).await?;
        let completions = completion::get_all_completions(db).await?;

        let today = Local::now().date_naive();
        let ranked = habit_stats::top_streaks(&habits, &completions, TOP_STREAKS, today, &Local);

        if ranked.iter().all(|(_, streak)| *streak == 0) {
            ctx.say("🔥 No active streaks yet. Complete a habit today to start one!")
                .await?;
            return Ok(());
        }

        let mut response = String::from("🔥 **Top Streaks**\n\n");
        for (rank, (h, streak)) in ranked.iter().enumerate() {
            writeln!(
                &mut response,
                "{}. {} **{}** - {streak} day{}",
                rank + 1,
                icon_emoji(&h.icon),
                h.name,
                if *streak == 1 { "" } else { "s" }
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows a month calendar with the overall completion rate.
    ///
    /// With a habit given, also shows how often that habit was done on each weekday
    /// over the last month.
    #[poise::command(slash_command, prefix_command)]
    pub async fn month(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Month to show (YYYY-MM, default: current month)"] month: Option<String>,
        #[description = "Habit to break down by weekday"]
        #[autocomplete = "autocomplete::autocomplete_habit_name"]
        habit: Option<String>,
    ) -> Result<()> {
        let first = match month.as_deref().map(str::trim) {
            None => Local::now().date_naive().with_day(1),
            Some(raw) => NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok(),
        };
        let Some(first) = first else {
            ctx.say("❌ Please give the month as YYYY-MM, for example `2025-06`.")
                .await?;
            return Ok(());
        };

        let selected = match habit {
            Some(name) => match find_habit_or_reply(ctx, &name).await? {
                Some(found) => Some(found),
                None => return Ok(()),
            },
            None => None,
        };

        let db = &ctx.data().database;
        let habits = habit::get_all_habits(db).await?;
        let completions = completion::get_all_completions(db).await?;
        let (year, month_number) = (first.year(), first.month());

        let rate =
            habit_stats::monthly_completion_rate(&habits, &completions, year, month_number, &Local);
        let mut response = format!(
            "📅 **{}**\nCompletion rate: {}\n\n",
            first.format("%B %Y"),
            habit_stats::format_progress_bar(rate, Some(10))
        );

        response.push_str("`Mo Tu We Th Fr Sa Su`\n");
        let days = calendar::days_in_month(year, month_number).unwrap_or(0);
        let mut line = "   ".repeat(first.weekday().num_days_from_monday() as usize);
        for day in first.iter_days().take(days as usize) {
            let done = habit_stats::completed_count_on(&habits, &completions, &DayWindow::local(day));
            let cell = if habits.is_empty() || done == 0 {
                "·"
            } else if done == habits.len() {
                "█"
            } else {
                "▒"
            };
            write!(&mut line, "{cell}  ")?;
            if day.weekday() == Weekday::Sun {
                writeln!(&mut response, "`{}`", line.trim_end())?;
                line.clear();
            }
        }
        if !line.is_empty() {
            writeln!(&mut response, "`{}`", line.trim_end())?;
        }
        response.push_str("█ all done  ▒ some done  · none\n");

        if let Some(h) = selected {
            writeln!(
                &mut response,
                "\n**{} {} by weekday (last month)**",
                icon_emoji(&h.icon),
                h.name
            )?;
            let now = Utc::now();
            for weekday in WEEKDAYS {
                let share =
                    habit_stats::weekday_completion_rate(&h, &completions, weekday, now, &Local);
                writeln!(
                    &mut response,
                    "`{weekday}` {}",
                    habit_stats::format_progress_bar(share, Some(10))
                )?;
            }
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Exports every habit with its streak and completion count as plain text.
    #[poise::command(slash_command, prefix_command)]
    pub async fn export(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let habits = habit::get_all_habits(db).await?;
        let completions = completion::get_all_completions(db).await?;

        let text = habit_stats::export_text(&habits, &completions)?;
        ctx.send(export_reply(text)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
