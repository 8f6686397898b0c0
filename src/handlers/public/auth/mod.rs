// handlers/public/auth/mod.rs - Public authentication handlers
//
// Both endpoints accept the same credential body and hand back a session token.

use serde::Deserialize;

pub mod login;    // POST /api/login - verify credentials and get JWT
pub mod register; // POST /api/register - create account and get JWT

pub use login::login_post;
pub use register::register_post;

/// Request body shared by register and login
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}
