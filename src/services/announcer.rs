use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;

use crate::registry::roster::Participant;

/// Everything the firing path needs to announce one event: where to send,
/// what to call it, and who to mention. Built from a roster snapshot at
/// fire time, so the timer itself never touches chat-platform types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FireAction {
    pub chat_id: i64,
    pub event_name: String,
    pub participants: Vec<Participant>,
}

impl FireAction {
    /// The announcement line sent to the chat.
    pub fn message_text(&self) -> String {
        let mentions: Vec<&str> = self
            .participants
            .iter()
            .map(|p| p.mention.as_str())
            .collect();
        format!("{}, {} is starting now!!", mentions.join(" "), self.event_name)
    }
}

/// Outbound side of the firing path. The registry only ever sees this
/// trait; production wires in Telegram, tests wire in a recorder.
#[async_trait]
pub trait Announcer: Send + Sync {
    async fn announce(&self, action: FireAction) -> Result<()>;
}

/// Sends announcements to the chat the event was scheduled from.
pub struct TelegramAnnouncer {
    bot: Bot,
}

impl TelegramAnnouncer {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Announcer for TelegramAnnouncer {
    async fn announce(&self, action: FireAction) -> Result<()> {
        let text = action.message_text();
        self.bot
            .send_message(teloxide::types::ChatId(action.chat_id), text)
            .await?;
        Ok(())
    }
}
