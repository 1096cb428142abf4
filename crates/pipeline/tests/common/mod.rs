//! In-memory [`LearningStore`] and badge evaluator for pipeline tests.
//!
//! `MemoryStore` mirrors the database behaviour the pipeline relies on:
//! the completion insert is a no-op for a duplicate (user, lesson) pair and
//! recomputes the progress aggregate the way `update_course_progress` does.
//! Individual operations can be switched to fail.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use academy_core::badges::UserCounters;
use academy_core::course::progress_percentage;
use academy_core::lesson::LessonType;
use academy_core::retry::RetryPolicy;
use academy_core::types::DbId;
use academy_core::xp::level_for_xp;
use academy_db::models::completion::{LessonCompletion, NewLessonCompletion};
use academy_db::models::lesson::Lesson;
use academy_db::models::progress::UserProgress;
use academy_db::models::user::{User, XpTotals};
use academy_pipeline::{
    BadgeAward, BadgeEvaluator, LearningStore, PipelineConfig, ProgressPipeline, StoreError,
};
use async_trait::async_trait;
use chrono::Utc;

// ---------------------------------------------------------------------------
// Failure switches
// ---------------------------------------------------------------------------

/// Operations that can be made to fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct Failures {
    pub find_progress: bool,
    pub find_progress_permanent: bool,
    pub insert_completion: bool,
    pub increment_lessons: bool,
    /// `award_xp` errors without writing.
    pub award_xp: bool,
    /// `award_xp` writes, then reports an error.
    pub award_xp_after_commit: bool,
    pub set_current_lesson: bool,
}

fn unreachable() -> StoreError {
    StoreError::Database(sqlx::Error::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionReset,
        "NetworkError when attempting to fetch resource",
    )))
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct State {
    users: HashMap<DbId, User>,
    lessons: HashMap<DbId, Lesson>,
    completions: Vec<LessonCompletion>,
    progress: HashMap<(DbId, DbId), UserProgress>,
    next_id: DbId,
}

impl State {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    pub failures: Mutex<Failures>,
    pub progress_reads: AtomicU32,
    pub current_lesson_writes: AtomicU32,
    pub award_xp_calls: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail(&self, f: impl FnOnce(&mut Failures)) {
        f(&mut self.failures.lock().unwrap());
    }

    fn failures(&self) -> Failures {
        *self.failures.lock().unwrap()
    }

    pub fn add_user(&self, total_xp: i64) -> DbId {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let now = Utc::now();
        state.users.insert(
            id,
            User {
                id,
                username: format!("user{id}"),
                email: format!("user{id}@example.com"),
                total_xp,
                current_level: level_for_xp(total_xp),
                lessons_completed: 0,
                courses_completed: 0,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    /// Create a course with one lesson per type; returns (course_id, lesson_ids).
    pub fn add_course(&self, lesson_types: &[LessonType]) -> (DbId, Vec<DbId>) {
        let mut state = self.state.lock().unwrap();
        let course_id = state.next_id();
        let now = Utc::now();
        let mut ids = Vec::new();
        for (i, lesson_type) in lesson_types.iter().enumerate() {
            let id = state.next_id();
            state.lessons.insert(
                id,
                Lesson {
                    id,
                    course_id,
                    title: format!("Lesson {}", i + 1),
                    lesson_type: lesson_type.as_str().to_string(),
                    sort_order: i as i32,
                    content: serde_json::json!({}),
                    created_at: now,
                    updated_at: now,
                },
            );
            ids.push(id);
        }
        (course_id, ids)
    }

    pub fn enroll(&self, user_id: DbId, course_id: DbId) {
        let mut state = self.state.lock().unwrap();
        let total = state
            .lessons
            .values()
            .filter(|l| l.course_id == course_id)
            .count() as i32;
        let id = state.next_id();
        let now = Utc::now();
        state.progress.insert(
            (user_id, course_id),
            UserProgress {
                id,
                user_id,
                course_id,
                lessons_completed: 0,
                total_lessons: total,
                progress_percentage: 0,
                current_lesson_id: None,
                started_at: None,
                completed_at: None,
                bonus_awarded_at: None,
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn user(&self, user_id: DbId) -> User {
        self.state.lock().unwrap().users[&user_id].clone()
    }

    pub fn progress(&self, user_id: DbId, course_id: DbId) -> UserProgress {
        self.state.lock().unwrap().progress[&(user_id, course_id)].clone()
    }

    pub fn completion_count(&self, user_id: DbId) -> usize {
        self.state
            .lock()
            .unwrap()
            .completions
            .iter()
            .filter(|c| c.user_id == user_id)
            .count()
    }

    /// Add XP directly, as a badge reward would.
    pub fn grant_xp(&self, user_id: DbId, amount: i32) {
        let mut state = self.state.lock().unwrap();
        let user = state.users.get_mut(&user_id).unwrap();
        user.total_xp += amount as i64;
        user.current_level = level_for_xp(user.total_xp);
    }

    /// Recompute the (user, course) aggregate like the database trigger.
    fn recompute_progress(state: &mut State, user_id: DbId, course_id: DbId) {
        let done = state
            .completions
            .iter()
            .filter(|c| c.user_id == user_id && c.course_id == course_id)
            .count() as i32;
        let total = state
            .lessons
            .values()
            .filter(|l| l.course_id == course_id)
            .count() as i32;
        if let Some(p) = state.progress.get_mut(&(user_id, course_id)) {
            p.lessons_completed = done;
            p.total_lessons = total;
            p.progress_percentage = progress_percentage(done, total);
            if p.completed_at.is_none() && total > 0 && done >= total {
                p.completed_at = Some(Utc::now());
            }
        }
    }
}

#[async_trait]
impl LearningStore for MemoryStore {
    async fn find_completion(
        &self,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<Option<LessonCompletion>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .completions
            .iter()
            .find(|c| c.user_id == user_id && c.lesson_id == lesson_id)
            .cloned())
    }

    async fn find_lesson(&self, lesson_id: DbId) -> Result<Option<Lesson>, StoreError> {
        Ok(self.state.lock().unwrap().lessons.get(&lesson_id).cloned())
    }

    async fn insert_completion(
        &self,
        input: &NewLessonCompletion,
    ) -> Result<Option<LessonCompletion>, StoreError> {
        if self.failures().insert_completion {
            return Err(unreachable());
        }
        let mut state = self.state.lock().unwrap();
        if state
            .completions
            .iter()
            .any(|c| c.user_id == input.user_id && c.lesson_id == input.lesson_id)
        {
            return Ok(None);
        }
        let id = state.next_id();
        let row = LessonCompletion {
            id,
            user_id: input.user_id,
            lesson_id: input.lesson_id,
            course_id: input.course_id,
            completed_at: Utc::now(),
            time_spent_seconds: input.time_spent_seconds,
            score_percentage: input.score_percentage,
            attempts: 1,
            xp_earned: input.xp_earned,
        };
        state.completions.push(row.clone());
        Self::recompute_progress(&mut state, input.user_id, input.course_id);
        Ok(Some(row))
    }

    async fn increment_lessons_completed(&self, user_id: DbId) -> Result<(), StoreError> {
        if self.failures().increment_lessons {
            return Err(unreachable());
        }
        if let Some(u) = self.state.lock().unwrap().users.get_mut(&user_id) {
            u.lessons_completed += 1;
        }
        Ok(())
    }

    async fn increment_courses_completed(&self, user_id: DbId) -> Result<(), StoreError> {
        if let Some(u) = self.state.lock().unwrap().users.get_mut(&user_id) {
            u.courses_completed += 1;
        }
        Ok(())
    }

    async fn find_user(&self, user_id: DbId) -> Result<Option<User>, StoreError> {
        Ok(self.state.lock().unwrap().users.get(&user_id).cloned())
    }

    async fn award_xp(&self, user_id: DbId, amount: i32) -> Result<Option<XpTotals>, StoreError> {
        self.award_xp_calls.fetch_add(1, Ordering::SeqCst);
        let failures = self.failures();
        if failures.award_xp {
            return Err(unreachable());
        }
        let mut state = self.state.lock().unwrap();
        let Some(user) = state.users.get_mut(&user_id) else {
            return Ok(None);
        };
        user.total_xp += amount as i64;
        user.current_level = level_for_xp(user.total_xp);
        if failures.award_xp_after_commit {
            return Err(unreachable());
        }
        Ok(Some(XpTotals {
            total_xp: user.total_xp,
            current_level: user.current_level,
        }))
    }

    async fn set_xp_if_unchanged(
        &self,
        user_id: DbId,
        expected_total_xp: i64,
        totals: XpTotals,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        match state.users.get_mut(&user_id) {
            Some(u) if u.total_xp == expected_total_xp => {
                u.total_xp = totals.total_xp;
                u.current_level = totals.current_level;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_progress(
        &self,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<UserProgress>, StoreError> {
        self.progress_reads.fetch_add(1, Ordering::SeqCst);
        let failures = self.failures();
        if failures.find_progress {
            return Err(unreachable());
        }
        if failures.find_progress_permanent {
            return Err(StoreError::Database(sqlx::Error::ColumnNotFound(
                "progress_percentage".into(),
            )));
        }
        Ok(self
            .state
            .lock()
            .unwrap()
            .progress
            .get(&(user_id, course_id))
            .cloned())
    }

    async fn claim_course_bonus(&self, user_id: DbId, course_id: DbId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        match state.progress.get_mut(&(user_id, course_id)) {
            Some(p) if p.completed_at.is_some() && p.bonus_awarded_at.is_none() => {
                p.bonus_awarded_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_current_lesson(
        &self,
        user_id: DbId,
        course_id: DbId,
        lesson_id: DbId,
    ) -> Result<bool, StoreError> {
        self.current_lesson_writes.fetch_add(1, Ordering::SeqCst);
        if self.failures().set_current_lesson {
            return Err(unreachable());
        }
        let mut state = self.state.lock().unwrap();
        match state.progress.get_mut(&(user_id, course_id)) {
            Some(p) => {
                p.current_lesson_id = Some(lesson_id);
                p.started_at.get_or_insert_with(Utc::now);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Badge evaluators
// ---------------------------------------------------------------------------

/// Grants nothing.
pub struct NoBadges;

#[async_trait]
impl BadgeEvaluator for NoBadges {
    async fn check_and_award_badges(&self, _user_id: DbId) -> Result<Vec<BadgeAward>, StoreError> {
        Ok(Vec::new())
    }
}

/// Grants one badge worth `xp_reward` once `lessons_completed` reaches
/// `threshold`, adding the XP straight into the store.
pub struct ThresholdBadge {
    pub store: Arc<MemoryStore>,
    pub threshold: i32,
    pub xp_reward: i32,
    granted: Mutex<bool>,
}

impl ThresholdBadge {
    pub fn new(store: Arc<MemoryStore>, threshold: i32, xp_reward: i32) -> Self {
        Self {
            store,
            threshold,
            xp_reward,
            granted: Mutex::new(false),
        }
    }
}

#[async_trait]
impl BadgeEvaluator for ThresholdBadge {
    async fn check_and_award_badges(&self, user_id: DbId) -> Result<Vec<BadgeAward>, StoreError> {
        let user = self.store.user(user_id);
        let counters = UserCounters {
            lessons_completed: user.lessons_completed,
            ..Default::default()
        };
        let mut granted = self.granted.lock().unwrap();
        if *granted || counters.lessons_completed < self.threshold {
            return Ok(Vec::new());
        }
        *granted = true;
        self.store.grant_xp(user_id, self.xp_reward);
        Ok(vec![BadgeAward {
            achievement_id: 1,
            code: "threshold".to_string(),
            name: "Threshold".to_string(),
            xp_reward: self.xp_reward,
        }])
    }
}

/// Always fails.
pub struct BrokenBadges;

#[async_trait]
impl BadgeEvaluator for BrokenBadges {
    async fn check_and_award_badges(&self, _user_id: DbId) -> Result<Vec<BadgeAward>, StoreError> {
        Err(unreachable())
    }
}

// ---------------------------------------------------------------------------
// Pipeline builders
// ---------------------------------------------------------------------------

pub fn test_config() -> PipelineConfig {
    PipelineConfig {
        progress_retry: RetryPolicy::new(2, Duration::from_millis(500)),
        settle_delay: Duration::ZERO,
    }
}

pub fn pipeline(store: &Arc<MemoryStore>) -> ProgressPipeline {
    pipeline_with_badges(store, Arc::new(NoBadges))
}

pub fn pipeline_with_badges(
    store: &Arc<MemoryStore>,
    badges: Arc<dyn BadgeEvaluator>,
) -> ProgressPipeline {
    ProgressPipeline::new(store.clone(), badges, test_config())
}

/// Pipeline that waits `settle_delay` after each completion insert, so
/// concurrent calls interleave before reading the aggregate.
pub fn pipeline_with_settle_delay(store: &Arc<MemoryStore>, settle_delay: Duration) -> ProgressPipeline {
    let config = PipelineConfig {
        settle_delay,
        ..test_config()
    };
    ProgressPipeline::new(store.clone(), Arc::new(NoBadges), config)
}
