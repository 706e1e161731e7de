/// Firing actions and the outbound announcement seam
pub mod announcer;
/// HTTP health endpoints
pub mod health;
