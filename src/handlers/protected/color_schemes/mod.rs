// handlers/protected/color_schemes/mod.rs - Color scheme CRUD
//
//   GET    /api/color-schemes       → list (caller's own schemes)
//   POST   /api/color-schemes       → create
//   PUT    /api/color-schemes       → update (id in body)
//   GET    /api/color-schemes/:id   → show
//   DELETE /api/color-schemes/:id   → delete

pub mod create;
pub mod delete;
pub mod list;
pub mod show;
pub mod update;

pub use create::scheme_post;
pub use delete::scheme_delete;
pub use list::schemes_get;
pub use show::scheme_get;
pub use update::scheme_put;
