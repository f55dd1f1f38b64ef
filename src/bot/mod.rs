//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `HabitBuddy` application,
//! including all slash commands, autocomplete handlers, the widget dashboard, and
//! bot context management.

/// Discord command implementations (habits, progress, stats, settings, onboarding, widget)
pub mod commands;
/// Discord interaction handlers (autocomplete, widget buttons and refresh)
pub mod handlers;

use crate::{
    config::settings::AppConfig,
    core::refresh::RefreshSignal,
    errors::{Error, Result},
};
use handlers::widget::DashboardSlot;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands.
/// This structure holds the store connection, the refresh signal every write fires,
/// the loaded configuration, and the location of the live dashboard message.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Fired after every committed write
    pub refresh: RefreshSignal,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Where the widget dashboard was posted, if anywhere
    pub dashboard: DashboardSlot,
}

impl BotData {
    /// Creates a new `BotData` instance with no dashboard registered yet.
    #[must_use]
    pub fn new(
        database: DatabaseConnection,
        refresh: RefreshSignal,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            database,
            refresh,
            config,
            dashboard: DashboardSlot::default(),
        }
    }
}

/// Every slash command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::habit(),
        commands::done(),
        commands::toggle_day(),
        commands::today(),
        commands::stats(),
        commands::streaks(),
        commands::month(),
        commands::export(),
        commands::settings(),
        commands::onboarding(),
        commands::widget(),
    ]
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            // Logged only; no error dialog is shown to the user
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    if let serenity::FullEvent::InteractionCreate {
        interaction: serenity::Interaction::Component(component),
    } = event
    {
        handlers::widget::handle_component(ctx, component, data).await?;
    }
    Ok(())
}

/// Connects to Discord and runs until the client stops.
///
/// The widget refresh listener is started once the bot is ready; it re-renders the
/// registered dashboard on every refresh signal and on a periodic fallback timer.
#[instrument(skip(token, config, database, refresh))]
pub async fn run_bot(
    token: String,
    config: Arc<AppConfig>,
    database: DatabaseConnection,
    refresh: RefreshSignal,
) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                let data = BotData::new(database, refresh, config);
                let period =
                    Duration::from_secs(data.config.widget.refresh_interval_minutes.max(1) * 60);
                tokio::spawn(handlers::widget::run_refresh_listener(
                    Arc::clone(&ctx.http),
                    data.database.clone(),
                    data.refresh.subscribe(),
                    data.dashboard.clone(),
                    data.config.widget.max_habits,
                    period,
                ));
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    if let Err(why) = client.start().await {
        warn!("Client stopped with error: {:?}", why);
        return Err(why.into());
    }
    Ok(())
}
