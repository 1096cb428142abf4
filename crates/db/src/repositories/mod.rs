//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod achievement_repo;
pub mod completion_repo;
pub mod course_repo;
pub mod event_repo;
pub mod lesson_repo;
pub mod progress_repo;
pub mod user_repo;

pub use achievement_repo::AchievementRepo;
pub use completion_repo::CompletionRepo;
pub use course_repo::CourseRepo;
pub use event_repo::EventRepo;
pub use lesson_repo::LessonRepo;
pub use progress_repo::ProgressRepo;
pub use user_repo::UserRepo;
