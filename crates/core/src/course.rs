//! Course-completion predicates over the per-(user, course) progress
//! aggregate.

/// A course is complete once every lesson has a completion. Empty courses
/// are never complete.
pub fn is_course_complete(lessons_completed: i32, total_lessons: i32) -> bool {
    total_lessons > 0 && lessons_completed >= total_lessons
}

/// Whole-number completion percentage, capped at 100.
pub fn progress_percentage(lessons_completed: i32, total_lessons: i32) -> i32 {
    if total_lessons <= 0 {
        return 0;
    }
    let done = lessons_completed.clamp(0, total_lessons) as f64;
    ((done / total_lessons as f64) * 100.0).round() as i32
}
