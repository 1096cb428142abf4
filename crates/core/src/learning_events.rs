//! Event type names published on the event bus by the progress pipeline.

/// A lesson completion row was recorded.
pub const EVENT_LESSON_COMPLETED: &str = "lesson.completed";
/// XP was added to a user's total.
pub const EVENT_XP_AWARDED: &str = "xp.awarded";
/// A user's level went up.
pub const EVENT_LEVEL_UP: &str = "level.up";
/// A user finished every lesson of a course.
pub const EVENT_COURSE_COMPLETED: &str = "course.completed";
/// An achievement was granted.
pub const EVENT_BADGE_AWARDED: &str = "badge.awarded";

/// Entity kind used as `source_entity_type` for lesson events.
pub const ENTITY_LESSON: &str = "lesson";
/// Entity kind used as `source_entity_type` for course events.
pub const ENTITY_COURSE: &str = "course";
/// Entity kind used as `source_entity_type` for achievement events.
pub const ENTITY_ACHIEVEMENT: &str = "achievement";
