use dotenvy::dotenv;
use habit_buddy::{
    bot,
    config::{database, settings},
    core::{onboarding, preferences, refresh::RefreshSignal},
    errors::{Error, Result},
};
use std::{env, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = settings::load_app_configuration()?;

    // 4. Open the shared store; nothing works without it
    let db = database::init_store(&app_config.store)
        .await
        .inspect(|_| info!("Store initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize store: {}", e))?;

    let refresh = RefreshSignal::new();

    // 5. Returning users with an empty store get the sample habits
    match preferences::load_preferences(&db).await {
        Ok(prefs) if prefs.onboarding_completed => {
            let seeded = onboarding::seed_sample_habits_if_empty(&db, &refresh).await?;
            if seeded > 0 {
                info!(seeded, "Store was empty, sample habits created.");
            }
        }
        Ok(_) => info!("Onboarding not completed yet."),
        Err(e) => warn!("Could not read preferences, skipping sample data: {}", e),
    }

    // 6. Run the bot; the token is read right before use and never stored in config
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, Arc::new(app_config), db, refresh).await
}
