pub mod message;

use std::sync::Arc;

use teloxide::{dispatching::UpdateHandler, prelude::*};

use crate::bot::commands::Command;
use crate::registry::EventRegistry;

pub struct BotHandler {
    pub registry: Arc<EventRegistry>,
}

impl BotHandler {
    pub fn new(registry: Arc<EventRegistry>) -> Self {
        Self { registry }
    }

    pub fn schema(&self) -> UpdateHandler<teloxide::RequestError> {
        use teloxide::dispatching::UpdateFilterExt;

        let registry = Arc::clone(&self.registry);

        Update::filter_message()
            .filter_command::<Command>()
            .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                let registry = Arc::clone(&registry);
                async move { message::command_handler(bot, msg, cmd, registry).await }
            })
    }
}
