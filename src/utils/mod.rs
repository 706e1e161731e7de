/// Time phrase parsing and countdown formatting
pub mod datetime;
/// User-facing feedback messages
pub mod feedback;
/// Structured log helpers
pub mod logging;
/// Mention text and MarkdownV2 escaping
pub mod mention;
/// Command input validation
pub mod validation;
