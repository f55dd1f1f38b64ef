//! Onboarding Discord commands - `/onboarding start|finish|reset`.
//!
//! `start` walks through the onboarding screens and lists the suggested habits.
//! `finish` creates the picked suggestions, marks onboarding as done and, when the
//! store is still empty afterwards, adds the sample habits.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::utils::validation_message, handlers::widget::icon_emoji},
        core::{
            onboarding::{self, OnboardingFlow, OnboardingStep},
            preferences,
        },
        errors::{Error, Result},
    };
    use std::fmt::Write;

    fn step_body(step: OnboardingStep) -> &'static str {
        match step {
            OnboardingStep::Welcome => "Build better habits, one day at a time.",
            OnboardingStep::Features => {
                "Track daily goals with `/done`, keep streaks alive, see trends with `/stats` \
                 and pin a live dashboard with `/widget`."
            }
            OnboardingStep::Rating => "Enjoying HabitBuddy? Tell a friend!",
            OnboardingStep::Habits => "Pick the habits you want to start with:",
            OnboardingStep::Complete => "",
        }
    }

    /// Parent command for the first-run onboarding.
    #[poise::command(
        slash_command,
        subcommands("onboarding_start", "onboarding_finish", "onboarding_reset")
    )]
    pub async fn onboarding(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Onboarding command. Available subcommands:\n\
            `/onboarding start` - Show the introduction and suggested habits\n\
            `/onboarding finish` - Create the habits you picked and complete onboarding\n\
            `/onboarding reset` - Offer onboarding again";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows the onboarding screens and the numbered habit suggestions.
    #[poise::command(slash_command, rename = "start")]
    pub async fn onboarding_start(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let prefs = preferences::load_preferences(&data.database).await?;
        let mut flow = OnboardingFlow::new(onboarding::suggestions_from_config(
            &data.config.suggestions,
        ));

        let mut response = String::from("👋 **Welcome to HabitBuddy**\n");
        if prefs.onboarding_completed {
            response.push_str("_Onboarding was already completed; finishing again only adds habits._\n");
        }
        response.push('\n');

        let mut step = flow.step();
        while step != OnboardingStep::Complete {
            writeln!(&mut response, "**{}**\n{}", step.title(), step_body(step))?;
            if step == OnboardingStep::Habits {
                for (number, suggestion) in flow.suggestions().iter().enumerate() {
                    let target = if suggestion.target_count > 1 {
                        format!(" ({}x daily)", suggestion.target_count)
                    } else {
                        String::new()
                    };
                    writeln!(
                        &mut response,
                        "`{}` {} {}{target} - {}",
                        number + 1,
                        icon_emoji(&suggestion.icon),
                        suggestion.name,
                        suggestion.category
                    )?;
                }
            }
            response.push('\n');
            step = flow.advance();
        }

        response.push_str(
            "Run `/onboarding finish selection:1,3` with the numbers you want, \
             or `/onboarding finish` to skip.",
        );

        ctx.say(response).await?;
        Ok(())
    }

    /// Creates the selected suggestions and completes onboarding.
    #[poise::command(slash_command, rename = "finish")]
    pub async fn onboarding_finish(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Suggestion numbers, e.g. '1, 3, 4' (empty to skip)"]
        selection: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let mut flow = OnboardingFlow::new(onboarding::suggestions_from_config(
            &data.config.suggestions,
        ));
        while flow.step() != OnboardingStep::Habits {
            flow.advance();
        }

        let picked = match onboarding::parse_selection(
            selection.as_deref().unwrap_or_default(),
            flow.suggestions().len(),
        ) {
            Ok(picked) => picked,
            Err(e) => {
                let Some(message) = validation_message(&e) else {
                    return Err(e);
                };
                ctx.say(message).await?;
                return Ok(());
            }
        };
        flow.select(picked);

        let created = flow.finish(&data.database, &data.refresh).await?;
        let seeded = onboarding::seed_sample_habits_if_empty(&data.database, &data.refresh).await?;

        let mut response = format!("🎉 **{}!**\n", flow.step().title());
        if created.is_empty() {
            response.push_str("No habits picked.\n");
        } else {
            writeln!(&mut response, "Created {} habits:", created.len())?;
            for h in &created {
                writeln!(&mut response, "{} {}", icon_emoji(&h.icon), h.name)?;
            }
        }
        if seeded > 0 {
            writeln!(
                &mut response,
                "Added {seeded} sample habits to get you started."
            )?;
        }
        response.push_str("\nUse `/today` to see your day or `/widget` to pin a dashboard.");

        ctx.say(response).await?;
        Ok(())
    }

    /// Marks onboarding as not completed so it can be run again.
    #[poise::command(slash_command, rename = "reset")]
    pub async fn onboarding_reset(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        onboarding::reset_onboarding(&ctx.data().database).await?;
        ctx.say("🔄 Onboarding reset. Run `/onboarding start` to go through it again.")
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
