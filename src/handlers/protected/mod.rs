// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here sits behind jwt_auth_middleware, which inserts the
// verified AuthUser into request extensions before the handler runs.

pub mod color_schemes;

pub use color_schemes::*;
