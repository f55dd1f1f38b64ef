//! Widget dashboard - a live Discord message standing in for the home-screen widget.
//!
//! `/widget` posts the dashboard and registers its location here. Every press of a
//! habit button goes through [`widget::toggle_from_widget`] and answers with the
//! re-rendered dashboard. Independently, [`run_refresh_listener`] re-renders the
//! registered message whenever the refresh signal fires and on a fallback timer.

use crate::{
    bot::BotData,
    core::{
        refresh::RefreshReason,
        stats,
        widget::{self, WidgetHabit, WidgetSnapshot},
    },
    errors::Result,
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{Mutex, broadcast},
    time::MissedTickBehavior,
};
use tracing::{debug, info, trace, warn};

const BUTTONS_PER_ROW: usize = 5;
const MAX_LABEL_CHARS: usize = 60;

/// Where the dashboard message lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLocation {
    /// Channel holding the message
    pub channel_id: serenity::ChannelId,
    /// The dashboard message
    pub message_id: serenity::MessageId,
}

/// Shared, replaceable dashboard location; empty until `/widget` is used.
#[derive(Debug, Clone, Default)]
pub struct DashboardSlot(Arc<Mutex<Option<DashboardLocation>>>);

impl DashboardSlot {
    /// Registers a new dashboard, replacing any previous one.
    pub async fn set(&self, location: DashboardLocation) {
        *self.0.lock().await = Some(location);
    }

    /// The registered dashboard, if any.
    pub async fn get(&self) -> Option<DashboardLocation> {
        *self.0.lock().await
    }
}

/// Emoji for an icon key
#[must_use]
pub fn icon_emoji(icon: &str) -> &'static str {
    match icon {
        "heart.fill" => "❤️",
        "leaf.fill" | "leaf" => "🌿",
        "flame.fill" => "🔥",
        "drop.fill" | "drop" => "💧",
        "figure.run" => "🏃",
        "figure.walk" => "🚶",
        "dumbbell.fill" => "🏋️",
        "book.fill" | "book" => "📚",
        "pencil" | "square.and.pencil" => "✏️",
        "lightbulb.fill" => "💡",
        "moon.fill" => "🌙",
        "sun.max.fill" => "☀️",
        "cup.and.saucer.fill" => "☕",
        "pills.fill" => "💊",
        "brain.head.profile" => "🧠",
        _ => "⭐",
    }
}

/// One square per day of the current week, Monday first.
#[must_use]
pub fn week_row(habit: &WidgetHabit) -> String {
    habit
        .week
        .iter()
        .map(|(_, done)| if *done { "🟩" } else { "⬜" })
        .collect()
}

fn button_label(habit: &WidgetHabit) -> String {
    let name: String = habit.name.chars().take(MAX_LABEL_CHARS).collect();
    if habit.target_count > 1 {
        format!("{name} {}/{}", habit.completed_count, habit.target_count)
    } else {
        name
    }
}

/// Builds the dashboard embed.
#[must_use]
pub fn render_embed(snapshot: &WidgetSnapshot) -> serenity::CreateEmbed {
    let total = snapshot.habits.len();
    let done = snapshot.completed_count();

    let fields: Vec<(String, String, bool)> = snapshot
        .habits
        .iter()
        .map(|habit| {
            let status = if habit.is_completed { "✅" } else { "▫️" };
            let name = format!("{status} {} {}", icon_emoji(&habit.icon), habit.name);
            let value = format!(
                "{} ({}/{})\n{}",
                stats::format_progress_bar(habit.progress(), Some(8)),
                habit.completed_count,
                habit.target_count,
                week_row(habit)
            );
            (name, value, false)
        })
        .collect();

    let description = if total == 0 {
        "No habits yet. Add one with `/habit add`.".to_string()
    } else {
        format!("**{done}/{total}** done on {}", snapshot.today.format("%A, %Y-%m-%d"))
    };

    let footer = if snapshot.is_placeholder {
        "Sample data - the store could not be read".to_string()
    } else {
        format!("Updated {}", snapshot.generated_at.format("%H:%M UTC"))
    };

    serenity::CreateEmbed::default()
        .title("🗓️ Today's Habits")
        .description(description)
        .color(if total > 0 && done == total {
            0x002E_CC71
        } else {
            0x0034_98DB
        })
        .fields(fields)
        .footer(serenity::CreateEmbedFooter::new(footer))
}

/// Builds one toggle button per habit; placeholder rows get none.
#[must_use]
pub fn render_buttons(snapshot: &WidgetSnapshot) -> Vec<serenity::CreateActionRow> {
    let buttons: Vec<serenity::CreateButton> = snapshot
        .habits
        .iter()
        .filter_map(|habit| {
            let custom_id = habit.toggle_id()?;
            let style = if habit.is_completed {
                serenity::ButtonStyle::Success
            } else {
                serenity::ButtonStyle::Secondary
            };
            Some(
                serenity::CreateButton::new(custom_id)
                    .label(button_label(habit))
                    .style(style),
            )
        })
        .collect();

    buttons
        .chunks(BUTTONS_PER_ROW)
        .map(|row| serenity::CreateActionRow::Buttons(row.to_vec()))
        .collect()
}

/// Handles a button press; presses that are not habit toggles are ignored.
///
/// A toggle that fails (malformed id, unknown habit, store error) is logged and
/// leaves the store untouched. The pressed message is re-rendered either way.
pub async fn handle_component(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &BotData,
) -> Result<()> {
    let Some(raw_id) = widget::parse_toggle_id(&component.data.custom_id) else {
        return Ok(());
    };

    match widget::toggle_from_widget(&data.database, &data.refresh, raw_id).await {
        Ok(outcome) => debug!(?outcome, "Widget toggle applied"),
        Err(e) => warn!("Widget toggle ignored: {}", e),
    }

    let snapshot = widget::load_snapshot(&data.database, data.config.widget.max_habits).await;
    let response = serenity::CreateInteractionResponseMessage::new()
        .embed(render_embed(&snapshot))
        .components(render_buttons(&snapshot));
    component
        .create_response(ctx, serenity::CreateInteractionResponse::UpdateMessage(response))
        .await?;
    Ok(())
}

/// Re-renders the registered dashboard message, if there is one.
pub async fn refresh_dashboard(
    http: &serenity::Http,
    database: &DatabaseConnection,
    slot: &DashboardSlot,
    limit: usize,
) -> Result<()> {
    let Some(location) = slot.get().await else {
        trace!("No dashboard registered, skipping refresh");
        return Ok(());
    };

    let snapshot = widget::load_snapshot(database, limit).await;
    let edit = serenity::EditMessage::new()
        .embed(render_embed(&snapshot))
        .components(render_buttons(&snapshot));
    location
        .channel_id
        .edit_message(http, location.message_id, edit)
        .await?;
    debug!(message_id = %location.message_id, "Dashboard refreshed");
    Ok(())
}

/// Keeps the dashboard current until the refresh signal is dropped.
///
/// Re-renders after every signal and on every tick of `period`. A lagging receiver
/// skips the missed signals, since one re-render covers them all.
pub async fn run_refresh_listener(
    http: Arc<serenity::Http>,
    database: DatabaseConnection,
    mut receiver: broadcast::Receiver<RefreshReason>,
    slot: DashboardSlot,
    limit: usize,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(period_secs = period.as_secs(), "Widget refresh listener started");

    loop {
        tokio::select! {
            received = receiver.recv() => match received {
                Ok(reason) => debug!(?reason, "Refresh signal received"),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Refresh listener lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("Refresh signal closed, stopping listener");
                    break;
                }
            },
            _ = ticker.tick() => trace!("Periodic dashboard refresh"),
        }

        if let Err(e) = refresh_dashboard(&http, &database, &slot, limit).await {
            warn!("Failed to refresh dashboard: {}", e);
        }
    }
}
