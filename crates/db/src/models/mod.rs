//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts where this app performs them
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! `metal` and `status` are stored as their canonical wire strings; the
//! typed enums in `picklijst_core::picking` guard every write path.

pub mod audit;
pub mod line;
pub mod run;
pub mod session;
pub mod store;
pub mod template;
pub mod user;
