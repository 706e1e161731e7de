//! # Event Scheduler Bot
//!
//! A Telegram bot for scheduling named events with countdown timers and
//! participant mentions.
//!
//! ## Features
//! - Schedule events at a future time with a fixed mention list
//! - Party mode with open join/leave and a capacity limit
//! - Reschedule, cancel, and countdown queries per event
//! - Automatic announcement mentioning everyone when time is up

/// Bot command handlers and message processing
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Named event registry and countdown timers
pub mod registry;
/// Announcement delivery and health endpoints
pub mod services;
/// Utility functions for datetime, validation, and formatting
pub mod utils;
