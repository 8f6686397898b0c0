// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth via the access gate)
pub mod protected; // Bearer token required (/api/color-schemes/*)
pub mod public;    // No authentication (/api/register, /api/login, /health)
