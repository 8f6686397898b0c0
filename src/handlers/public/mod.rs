// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and liveness. Nothing here sees an AuthUser, so every
// input is validated by the services before use.

pub mod auth;
pub mod health;

pub use auth::{login_post, register_post};
pub use health::health_get;
