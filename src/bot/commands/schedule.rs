use std::sync::Arc;

use teloxide::prelude::*;

use crate::registry::roster::Participant;
use crate::registry::{EventKind, EventRegistry, EventSpec};
use crate::utils::{
    datetime::{format_event_time, parse_event_time},
    feedback::CommandFeedback,
    logging::{log_command_start, log_command_success, log_validation_error},
    validation::{validate_event_name, validate_participants},
};

pub async fn handle_schedule(
    bot: Bot,
    msg: Message,
    name: String,
    time: String,
    participants: String,
    registry: Arc<EventRegistry>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    let user_id = msg.from().map(|u| u.id.0 as i64).unwrap_or(0);
    let username = msg
        .from()
        .and_then(|u| u.username.as_deref())
        .unwrap_or("unknown");

    log_command_start(
        "schedule",
        username,
        user_id,
        chat_id,
        Some(&format!("name: '{}', time: '{}'", name, time)),
    );

    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    if let Err(e) = validate_event_name(&name) {
        log_validation_error(
            "schedule",
            "name",
            &name,
            &e.to_string(),
            username,
            user_id,
            chat_id,
        );
        feedback
            .validation_error(&e.to_string(), "Use a short single-word name like 'raid'")
            .await?;
        return Ok(());
    }

    let mentions = match validate_participants(&participants) {
        Ok(mentions) => mentions,
        Err(e) => {
            log_validation_error(
                "schedule",
                "participants",
                &participants,
                &e.to_string(),
                username,
                user_id,
                chat_id,
            );
            feedback
                .validation_error(&e.to_string(), "List everyone to mention, like '@alice @bob'")
                .await?;
            return Ok(());
        }
    };

    let resolved = match parse_event_time(&time) {
        Ok(resolved) => resolved,
        Err(e) => {
            log_validation_error(
                "schedule",
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

    let spec = EventSpec {
        name: name.clone(),
        chat_id,
        duration: resolved.duration,
        kind: EventKind::Fixed,
        capacity: 0,
        participants: mentions.into_iter().map(Participant::named).collect(),
    };

    match registry.schedule(spec) {
        Ok(()) => {
            log_command_success("schedule", username, user_id, chat_id, Some(&name));
            feedback
                .success(&format!(
                    "{} has been scheduled for {}",
                    name,
                    format_event_time(&resolved.local)
                ))
                .await?;
        }
        Err(e) => {
            feedback
                .error(&format!(
                    "{}. Please use another name, or cancel the other timer with /cancel {} and then add this one again",
                    e, name
                ))
                .await?;
        }
    }

    Ok(())
}
