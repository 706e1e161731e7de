use std::sync::Arc;

use teloxide::prelude::*;

use crate::registry::EventRegistry;
use crate::utils::{datetime::format_remaining, feedback::CommandFeedback};

pub async fn handle_remaining(
    bot: Bot,
    msg: Message,
    name: String,
    registry: Arc<EventRegistry>,
) -> ResponseResult<()> {
    let name = name.trim().to_string();
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    match registry.remaining(&name) {
        Ok(remaining) => {
            feedback
                .info(&format!(
                    "{} will happen in {}",
                    name,
                    format_remaining(remaining)
                ))
                .await?;
        }
        Err(e) => {
            feedback
                .error(&format!("{}, please try again", e))
                .await?;
        }
    }

    Ok(())
}

pub async fn handle_list_all(
    bot: Bot,
    msg: Message,
    registry: Arc<EventRegistry>,
) -> ResponseResult<()> {
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    let listing = registry.list_all();
    if listing.is_empty() {
        feedback
            .info("There are no events currently scheduled")
            .await?;
        return Ok(());
    }

    let lines: Vec<String> = listing
        .iter()
        .map(|(name, remaining)| {
            format!("{} will happen in {}", name, format_remaining(*remaining))
        })
        .collect();
    feedback.info(&lines.join("\n")).await?;

    Ok(())
}
