/// Liveness and version endpoints
pub mod health;
/// Dashboard view endpoints
pub mod view;
