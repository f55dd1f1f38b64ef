//! Widget Discord command - `/widget`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::widget::{DashboardLocation, render_buttons, render_embed},
        },
        core::widget,
        errors::{Error, Result},
    };
    use tracing::info;

    /// Posts the live habit dashboard in this channel.
    ///
    /// The dashboard has one button per habit to toggle today's progress and is kept
    /// up to date after every change. Posting it again moves it to the new message.
    #[poise::command(slash_command, prefix_command)]
    pub async fn widget(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let snapshot = widget::load_snapshot(&data.database, data.config.widget.max_habits).await;

        let reply = poise::CreateReply::default()
            .embed(render_embed(&snapshot))
            .components(render_buttons(&snapshot));
        let handle = ctx.send(reply).await?;
        let message = handle.message().await?;

        let location = DashboardLocation {
            channel_id: message.channel_id,
            message_id: message.id,
        };
        data.dashboard.set(location).await;
        info!(
            channel_id = %location.channel_id,
            message_id = %location.message_id,
            "Dashboard posted"
        );
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
