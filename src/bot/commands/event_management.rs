use std::sync::Arc;

use teloxide::prelude::*;

use crate::registry::EventRegistry;
use crate::utils::{
    datetime::{format_event_time, parse_event_time},
    feedback::CommandFeedback,
    logging::{log_command_error, log_command_start, log_command_success, log_validation_error},
};

pub async fn handle_reschedule(
    bot: Bot,
    msg: Message,
    name: String,
    time: String,
    registry: Arc<EventRegistry>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    let user_id = msg.from().map(|u| u.id.0 as i64).unwrap_or(0);
    let username = msg
        .from()
        .and_then(|u| u.username.as_deref())
        .unwrap_or("unknown");

    log_command_start(
        "reschedule",
        username,
        user_id,
        chat_id,
        Some(&format!("name: '{}', time: '{}'", name, time)),
    );

    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    let resolved = match parse_event_time(&time) {
        Ok(resolved) => resolved,
        Err(e) => {
            log_validation_error(
                "reschedule",
                "time",
                &time,
                &e.to_string(),
                username,
                user_id,
                chat_id,
            );
            feedback.error(&e.to_string()).await?;
            return Ok(());
        }
    };

    match registry.reschedule(&name, resolved.duration) {
        Ok(()) => {
            log_command_success("reschedule", username, user_id, chat_id, Some(&name));
            feedback
                .success(&format!(
                    "{} has been rescheduled to {}",
                    name,
                    format_event_time(&resolved.local)
                ))
                .await?;
        }
        Err(e) => {
            log_command_error("reschedule", username, user_id, chat_id, &e.to_string());
            feedback
                .error(&format!("{}, please try again", e))
                .await?;
        }
    }

    Ok(())
}

pub async fn handle_cancel(
    bot: Bot,
    msg: Message,
    name: String,
    registry: Arc<EventRegistry>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    let name = name.trim().to_string();
    let user_id = msg.from().map(|u| u.id.0 as i64).unwrap_or(0);
    let username = msg
        .from()
        .and_then(|u| u.username.as_deref())
        .unwrap_or("unknown");

    log_command_start("cancel", username, user_id, chat_id, Some(&name));

    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    if name.is_empty() {
        feedback.error("Please provide an event name").await?;
        return Ok(());
    }

    match registry.cancel(&name) {
        Ok(()) => {
            log_command_success("cancel", username, user_id, chat_id, Some(&name));
            feedback.success(&format!("{} was canceled", name)).await?;
        }
        Err(e) => {
            log_command_error("cancel", username, user_id, chat_id, &e.to_string());
            feedback
                .error(&format!("{}, please try again", e))
                .await?;
        }
    }

    Ok(())
}
