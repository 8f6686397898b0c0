pub mod manager;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod schema;
pub mod sqlite;

pub use manager::{Backend, Database, DatabaseError};
pub use repository::{CredentialStore, SchemeStore};
