//! Domain logic for the academy progress service.
//!
//! Everything here is pure: no database, no async runtime. The `db`,
//! `pipeline` and `api` crates all build on these types and rules.

pub mod badges;
pub mod course;
pub mod error;
pub mod learning_events;
pub mod lesson;
pub mod retry;
pub mod types;
pub mod xp;
