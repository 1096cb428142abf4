//! Row models and DTOs, one module per table family.

pub mod achievement;
pub mod completion;
pub mod course;
pub mod event;
pub mod lesson;
pub mod progress;
pub mod user;
