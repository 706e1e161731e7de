/// Command definitions and argument parsers
pub mod commands;
/// Update dispatch wiring
pub mod handlers;
