pub mod color_scheme;
pub mod user;

pub use color_scheme::{fold_scheme_rows, ColorScheme, SchemeColorRow};
pub use user::User;
