use std::sync::Arc;

use teloxide::prelude::*;

use crate::registry::roster::Participant;
use crate::registry::{EventKind, EventRegistry, EventSpec};
use crate::utils::{
    datetime::{format_event_time, parse_event_time},
    feedback::CommandFeedback,
    logging::{log_command_error, log_command_start, log_command_success, log_validation_error},
    mention::user_mention,
    validation::{validate_capacity, validate_event_name},
};

pub async fn handle_party(
    bot: Bot,
    msg: Message,
    name: String,
    time: String,
    capacity: u32,
    registry: Arc<EventRegistry>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    let Some(user) = msg.from() else {
        feedback
            .error("Could not tell who sent this command, so the party has no organizer")
            .await?;
        return Ok(());
    };
    let user_id = user.id.0 as i64;
    let username = user.username.as_deref().unwrap_or("unknown");

    log_command_start(
        "party",
        username,
        user_id,
        chat_id,
        Some(&format!("name: '{}', time: '{}', capacity: {}", name, time, capacity)),
    );

    if let Err(e) = validate_event_name(&name) {
        log_validation_error("party", "name", &name, &e.to_string(), username, user_id, chat_id);
        feedback
            .validation_error(&e.to_string(), "Use a short single-word name like 'raid'")
            .await?;
        return Ok(());
    }

    if let Err(e) = validate_capacity(capacity) {
        log_validation_error(
            "party",
            "capacity",
            &capacity.to_string(),
            &e.to_string(),
            username,
            user_id,
            chat_id,
        );
        feedback
            .validation_error(&e.to_string(), "Use 0 for an open party or a smaller limit")
            .await?;
        return Ok(());
    }

    let resolved = match parse_event_time(&time) {
        Ok(resolved) => resolved,
        Err(e) => {
            log_validation_error("party", "time", &time, &e.to_string(), username, user_id, chat_id);
            feedback.error(&e.to_string()).await?;
            return Ok(());
        }
    };

    let organizer = Participant::with_id(user_id, user_mention(user));
    let spec = EventSpec {
        name: name.clone(),
        chat_id,
        duration: resolved.duration,
        kind: EventKind::Party,
        capacity,
        participants: vec![organizer],
    };

    match registry.schedule(spec) {
        Ok(()) => {
            log_command_success("party", username, user_id, chat_id, Some(&name));
            let when = format_event_time(&resolved.local);
            let text = match registry.spots_left(&name).ok().flatten() {
                Some(spots) => format!(
                    "{} has been scheduled for {}. Join with /join {} ({} spots open)",
                    name, when, name, spots
                ),
                None => format!(
                    "{} has been scheduled for {}. Join with /join {}",
                    name, when, name
                ),
            };
            feedback.success(&text).await?;
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

pub async fn handle_join(
    bot: Bot,
    msg: Message,
    name: String,
    registry: Arc<EventRegistry>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    let name = name.trim().to_string();
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    let Some(user) = msg.from() else {
        feedback.error("Could not tell who wants to join").await?;
        return Ok(());
    };
    let user_id = user.id.0 as i64;
    let username = user.username.as_deref().unwrap_or("unknown");

    log_command_start("join", username, user_id, chat_id, Some(&name));

    let participant = Participant::with_id(user_id, user_mention(user));
    match registry.join(&name, participant) {
        Ok(Some(spots)) => {
            log_command_success("join", username, user_id, chat_id, Some(&name));
            feedback
                .success(&format!("You are in! {} has {} spots left", name, spots))
                .await?;
        }
        Ok(None) => {
            log_command_success("join", username, user_id, chat_id, Some(&name));
            feedback.success(&format!("You are in for {}", name)).await?;
        }
        Err(e) => {
            log_command_error("join", username, user_id, chat_id, &e.to_string());
            feedback.error(&e.to_string()).await?;
        }
    }

    Ok(())
}

pub async fn handle_leave(
    bot: Bot,
    msg: Message,
    name: String,
    registry: Arc<EventRegistry>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    let name = name.trim().to_string();
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    let Some(user) = msg.from() else {
        feedback.error("Could not tell who wants to leave").await?;
        return Ok(());
    };
    let user_id = user.id.0 as i64;
    let username = user.username.as_deref().unwrap_or("unknown");

    log_command_start("leave", username, user_id, chat_id, Some(&name));

    match registry.leave(&name, user_id) {
        Ok(()) => {
            log_command_success("leave", username, user_id, chat_id, Some(&name));
            feedback.success(&format!("You have left {}", name)).await?;
        }
        Err(e) => {
            log_command_error("leave", username, user_id, chat_id, &e.to_string());
            feedback.error(&e.to_string()).await?;
        }
    }

    Ok(())
}
