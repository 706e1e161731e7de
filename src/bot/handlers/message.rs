use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::Command;
use crate::registry::EventRegistry;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    registry: Arc<EventRegistry>,
) -> ResponseResult<()> {
    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Start => {
            bot.send_message(
                msg.chat.id,
                "📅 Welcome to Event Scheduler Bot!\n\nUse /schedule to plan an event or /party to open one up for joins.\nUse /help to see all commands.",
            )
            .await?;
        }
        Command::Schedule {
            name,
            time,
            participants,
        } => {
            crate::bot::commands::schedule::handle_schedule(
                bot,
                msg,
                name,
                time,
                participants,
                registry,
            )
            .await?;
        }
        Command::Party {
            name,
            time,
            capacity,
        } => {
            crate::bot::commands::party::handle_party(bot, msg, name, time, capacity, registry)
                .await?;
        }
        Command::Join { name } => {
            crate::bot::commands::party::handle_join(bot, msg, name, registry).await?;
        }
        Command::Leave { name } => {
            crate::bot::commands::party::handle_leave(bot, msg, name, registry).await?;
        }
        Command::Reschedule { name, time } => {
            crate::bot::commands::event_management::handle_reschedule(
                bot, msg, name, time, registry,
            )
            .await?;
        }
        Command::Cancel { name } => {
            crate::bot::commands::event_management::handle_cancel(bot, msg, name, registry)
                .await?;
        }
        Command::Remaining { name } => {
            crate::bot::commands::list::handle_remaining(bot, msg, name, registry).await?;
        }
        Command::ListAll => {
            crate::bot::commands::list::handle_list_all(bot, msg, registry).await?;
        }
    }
    Ok(())
}
