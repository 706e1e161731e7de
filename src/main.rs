//! # Event Scheduler Bot Main Entry Point
//!
//! This is the main entry point for the Event Scheduler Bot application.
//! It initializes logging, loads configuration, wires the event registry to
//! the Telegram announcer, and runs the bot alongside the health server.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bot;
mod config;
mod registry;
mod services;
mod utils;

use crate::bot::handlers::BotHandler;
use crate::config::Config;
use crate::registry::EventRegistry;
use crate::services::announcer::TelegramAnnouncer;
use crate::services::health::HealthService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "event_scheduler_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Event Scheduler Bot v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded - HTTP Port: {}", config.http_port);

    // Initialize bot and the shared event registry
    info!("Initializing Telegram bot...");
    let telegram_bot = Bot::new(&config.telegram_bot_token);
    let announcer = Arc::new(TelegramAnnouncer::new(telegram_bot.clone()));
    let registry = Arc::new(EventRegistry::new(announcer));
    let handler = BotHandler::new(Arc::clone(&registry));
    info!("Telegram bot initialized successfully");

    // Initialize health service
    let health_service = HealthService::new(Arc::clone(&registry));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    // Run both the bot and health server concurrently
    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(telegram_bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Wait for either task to complete (which would indicate shutdown)
    tokio::select! {
        result1 = bot_task => {
            if let Err(e) = result1 {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result2 = health_task => {
            if let Err(e) = result2 {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    info!("Application stopped");
    Ok(())
}
