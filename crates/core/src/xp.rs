//! Experience-point rules.
//!
//! This is the single place where lesson XP values and the level curve are
//! defined. The `award_xp` database function mirrors [`level_for_xp`]; the
//! `db` crate has a test that keeps the two in agreement.

use serde::Serialize;

use crate::lesson::LessonType;

/// XP for finishing a text lesson.
pub const TEXT_LESSON_XP: i32 = 10;
/// XP for finishing an interactive lesson.
pub const INTERACTIVE_LESSON_XP: i32 = 10;
/// XP for finishing a practical lesson.
pub const PRACTICAL_LESSON_XP: i32 = 50;
/// XP for passing a quiz with a score between the pass mark and 99.
pub const QUIZ_PASS_XP: i32 = 20;
/// XP for a perfect quiz score.
pub const QUIZ_PERFECT_XP: i32 = 30;

/// Minimum quiz score (percent) that counts as passing.
pub const QUIZ_PASS_THRESHOLD: i32 = 70;
/// Quiz score (percent) that counts as perfect.
pub const QUIZ_PERFECT_SCORE: i32 = 100;

/// One-time bonus for finishing every lesson in a course.
pub const COURSE_COMPLETION_BONUS_XP: i32 = 100;

/// XP per "unit" in the square-root level curve.
pub const XP_PER_LEVEL_UNIT: i64 = 100;
/// Lowest reachable level.
pub const MIN_LEVEL: i32 = 1;
/// Highest reachable level.
pub const MAX_LEVEL: i32 = 100;

/// XP awarded for completing a lesson of `lesson_type`.
///
/// Quiz XP depends on the score: below the pass mark (or no score at all)
/// earns nothing, a perfect score earns [`QUIZ_PERFECT_XP`], anything else
/// earns [`QUIZ_PASS_XP`].
pub fn xp_for_lesson(lesson_type: LessonType, score: Option<i32>) -> i32 {
    match lesson_type {
        LessonType::Text => TEXT_LESSON_XP,
        LessonType::Interactive => INTERACTIVE_LESSON_XP,
        LessonType::Practical => PRACTICAL_LESSON_XP,
        LessonType::Quiz => match score {
            None => 0,
            Some(s) if s < QUIZ_PASS_THRESHOLD => 0,
            Some(s) if s >= QUIZ_PERFECT_SCORE => QUIZ_PERFECT_XP,
            Some(_) => QUIZ_PASS_XP,
        },
    }
}

/// Level for a running XP total: `floor(sqrt(total_xp / 100))`, clamped to
/// `[MIN_LEVEL, MAX_LEVEL]`.
pub fn level_for_xp(total_xp: i64) -> i32 {
    if total_xp <= 0 {
        return MIN_LEVEL;
    }
    let units = total_xp / XP_PER_LEVEL_UNIT;
    let mut level = (units as f64).sqrt().floor() as i64;
    // Guard against float rounding at perfect squares.
    while (level + 1) * (level + 1) <= units {
        level += 1;
    }
    while level * level > units {
        level -= 1;
    }
    level.clamp(MIN_LEVEL as i64, MAX_LEVEL as i64) as i32
}

/// Total XP needed to reach `level` (the inverse of [`level_for_xp`]).
///
/// Level 1 is the floor of the curve and needs no XP.
pub fn xp_for_level(level: i32) -> i64 {
    let level = level.clamp(MIN_LEVEL, MAX_LEVEL) as i64;
    if level == MIN_LEVEL as i64 {
        return 0;
    }
    level * level * XP_PER_LEVEL_UNIT
}

/// Where a user sits between their current level and the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelProgress {
    pub level: i32,
    pub total_xp: i64,
    /// XP threshold of the current level.
    pub level_floor_xp: i64,
    /// XP threshold of the next level, `None` at [`MAX_LEVEL`].
    pub next_level_xp: Option<i64>,
    /// XP still missing for the next level (0 at [`MAX_LEVEL`]).
    pub xp_to_next_level: i64,
}

impl LevelProgress {
    pub fn for_total_xp(total_xp: i64) -> Self {
        let total_xp = total_xp.max(0);
        let level = level_for_xp(total_xp);
        let next_level_xp = (level < MAX_LEVEL).then(|| xp_for_level(level + 1));
        Self {
            level,
            total_xp,
            level_floor_xp: xp_for_level(level),
            next_level_xp,
            xp_to_next_level: next_level_xp.map_or(0, |next| next - total_xp),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
