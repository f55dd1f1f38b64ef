//! Helpers shared by several commands.

use crate::{
    bot::BotData,
    core::{completion::ToggleOutcome, habit},
    entities::habit::Model as HabitModel,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;

/// Discord rejects messages longer than this many characters
pub(crate) const MAX_MESSAGE_CHARS: usize = 2000;

/// File name used when the export is sent as an attachment
pub(crate) const EXPORT_FILE_NAME: &str = "habits.txt";

/// Looks a habit up by name, telling the user when it does not exist.
pub(crate) async fn find_habit_or_reply(
    ctx: poise::Context<'_, BotData, Error>,
    name: &str,
) -> Result<Option<HabitModel>> {
    let found = habit::get_habit_by_name(&ctx.data().database, name).await?;
    if found.is_none() {
        ctx.say(format!(
            "❌ Habit '{name}' not found. Use `/habit list` to see all habits."
        ))
        .await?;
    }
    Ok(found)
}

/// User-facing message for a validation error, or `None` for anything else.
pub(crate) fn validation_message(error: &Error) -> Option<String> {
    match error {
        Error::InvalidHabit { .. }
        | Error::InvalidTargetCount { .. }
        | Error::InvalidPreference { .. }
        | Error::InvalidSelection { .. } => Some(format!("❌ {error}")),
        _ => None,
    }
}

/// Describes a toggle result for `habit_name`.
pub(crate) fn describe_toggle(habit_name: &str, outcome: ToggleOutcome, when: &str) -> String {
    match outcome {
        ToggleOutcome::Progressed { count, target } => {
            format!("➕ **{habit_name}**: {count}/{target} {when}.")
        }
        ToggleOutcome::Completed { target } if target > 1 => {
            format!("✅ **{habit_name}** completed {when} ({target}/{target})!")
        }
        ToggleOutcome::Completed { .. } => format!("✅ **{habit_name}** completed {when}!"),
        ToggleOutcome::Cleared { removed } => format!(
            "↩️ **{habit_name}** reset {when} ({removed} completion{} removed).",
            if removed == 1 { "" } else { "s" }
        ),
    }
}

/// Splits `text` into pieces of at most `limit` characters, breaking between lines.
///
/// A single line longer than `limit` is cut at the character limit.
pub(crate) fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > limit {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(limit) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }
        current.push_str(line);
        current_len += line_len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Sends `text` as one or more messages that each fit Discord's length limit.
pub(crate) async fn say_chunked(ctx: poise::Context<'_, BotData, Error>, text: &str) -> Result<()> {
    for chunk in split_message(text, MAX_MESSAGE_CHARS) {
        ctx.say(chunk).await?;
    }
    Ok(())
}

/// Reply carrying the export: inline in a code block when it fits, otherwise as a file.
pub(crate) fn export_reply(text: String) -> poise::CreateReply {
    let inline = format!("```\n{text}```");
    if inline.chars().count() <= MAX_MESSAGE_CHARS {
        return poise::CreateReply::default().content(inline);
    }
    poise::CreateReply::default()
        .content("📄 The export is too long for a message, so it is attached as a file.")
        .attachment(serenity::CreateAttachment::bytes(
            text.into_bytes(),
            EXPORT_FILE_NAME,
        ))
}
