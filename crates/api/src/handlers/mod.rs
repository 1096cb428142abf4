pub mod achievements;
pub mod courses;
pub mod progress;
pub mod user;
