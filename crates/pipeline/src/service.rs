//! Caller-facing pipeline operations: mark a lesson complete, read course
//! progress, track the current lesson.

use std::sync::Arc;

use academy_core::error::CoreError;
use academy_core::lesson::{validate_completion_score, LessonType};
use academy_core::types::DbId;
use academy_core::xp::{level_for_xp, xp_for_lesson, COURSE_COMPLETION_BONUS_XP};
use academy_db::models::completion::NewLessonCompletion;
use academy_db::models::progress::UserProgress;
use academy_db::models::user::XpTotals;
use academy_db::DbPool;
use academy_events::{EventBus, LearningEvent};
use serde::Serialize;

use crate::badges::{BadgeAward, BadgeEvaluator, CatalogBadgeEvaluator};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, StoreError};
use crate::pg::PgLearningStore;
use crate::store::LearningStore;

const XP_REASON_LESSON: &str = "lesson";
const XP_REASON_COURSE_BONUS: &str = "course_bonus";

/// Input to [`ProgressPipeline::mark_lesson_complete`].
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest {
    pub user_id: DbId,
    pub lesson_id: DbId,
    pub course_id: DbId,
    /// Percentage score; required for quizzes.
    pub score: Option<i32>,
    pub time_spent_seconds: Option<i32>,
}

/// Result of a completion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionOutcome {
    /// Lesson XP plus the course bonus, when each was actually awarded.
    pub xp_earned: i32,
    pub old_level: i32,
    /// Level after lesson XP, bonus and badge rewards.
    pub new_level: i32,
    pub leveled_up: bool,
    pub course_complete: bool,
    /// The lesson had been completed before; nothing changed.
    pub already_completed: bool,
    pub badges_earned: Vec<BadgeAward>,
}

/// The progress and reward pipeline.
///
/// Steps after the completion insert are separate remote calls with no
/// enclosing transaction. Best-effort steps (counters, bonus, badges) log
/// their failures and carry on.
#[derive(Clone)]
pub struct ProgressPipeline {
    store: Arc<dyn LearningStore>,
    badges: Arc<dyn BadgeEvaluator>,
    events: Option<Arc<EventBus>>,
    config: PipelineConfig,
}

impl ProgressPipeline {
    pub fn new(
        store: Arc<dyn LearningStore>,
        badges: Arc<dyn BadgeEvaluator>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            badges,
            events: None,
            config,
        }
    }

    /// Pipeline over PostgreSQL with the catalog badge evaluator.
    pub fn postgres(pool: DbPool, config: PipelineConfig) -> Self {
        Self::new(
            Arc::new(PgLearningStore::new(pool.clone())),
            Arc::new(CatalogBadgeEvaluator::new(pool)),
            config,
        )
    }

    /// Publish progress events on `bus`.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.events = Some(bus);
        self
    }

    // -----------------------------------------------------------------------
    // mark_lesson_complete
    // -----------------------------------------------------------------------

    /// Record that a user finished a lesson and hand out the rewards.
    ///
    /// Completing a lesson a second time is a no-op that reports zero XP.
    /// Fails without writing anything when the lesson is unknown, belongs to
    /// another course, the quiz score is failing, or the user is not
    /// enrolled.
    pub async fn mark_lesson_complete(
        &self,
        req: &CompletionRequest,
    ) -> Result<CompletionOutcome, PipelineError> {
        let CompletionRequest {
            user_id,
            lesson_id,
            course_id,
            score,
            time_spent_seconds,
        } = *req;

        if self.store.find_completion(user_id, lesson_id).await?.is_some() {
            tracing::debug!(user_id, lesson_id, "Lesson already completed");
            return self.already_completed(user_id, course_id).await;
        }

        let lesson = self
            .store
            .find_lesson(lesson_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "lesson",
                id: lesson_id,
            })?;
        if lesson.course_id != course_id {
            return Err(CoreError::Validation(format!(
                "Lesson {lesson_id} does not belong to course {course_id}"
            ))
            .into());
        }
        let lesson_type = lesson.kind()?;

        validate_completion_score(lesson_type, score)?;
        let lesson_xp = xp_for_lesson(lesson_type, score);

        if self.read_progress(user_id, course_id).await?.is_none() {
            return Err(CoreError::Precondition(format!(
                "User is not enrolled in course {course_id}"
            ))
            .into());
        }

        let input = NewLessonCompletion {
            user_id,
            lesson_id,
            course_id,
            time_spent_seconds: time_spent_seconds.unwrap_or(0).max(0),
            score_percentage: if lesson_type == LessonType::Quiz { score } else { None },
            xp_earned: lesson_xp,
        };
        if self.store.insert_completion(&input).await?.is_none() {
            tracing::info!(
                user_id,
                lesson_id,
                "Completion already recorded by a concurrent request",
            );
            return self.already_completed(user_id, course_id).await;
        }
        tracing::info!(user_id, lesson_id, course_id, lesson_xp, "Lesson completion recorded");
        self.publish(LearningEvent::lesson_completed(
            user_id, lesson_id, course_id, lesson_xp,
        ));

        if let Err(e) = self.store.increment_lessons_completed(user_id).await {
            tracing::warn!(user_id, error = %e, "Failed to increment lessons_completed");
        }

        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: user_id,
            })?;
        let old_level = user.current_level;
        let mut totals = XpTotals {
            total_xp: user.total_xp,
            current_level: user.current_level,
        };
        let mut xp_earned = 0;

        if lesson_xp > 0 {
            if let Some(t) = self
                .award_xp(user_id, lesson_xp, totals.total_xp, XP_REASON_LESSON)
                .await
            {
                totals = t;
                xp_earned += lesson_xp;
            }
        }

        if !self.config.settle_delay.is_zero() {
            tokio::time::sleep(self.config.settle_delay).await;
        }
        let after = self.get_course_progress(user_id, course_id).await;
        if after.is_none() {
            tracing::warn!(
                user_id,
                course_id,
                "Progress unavailable after completion, reporting course as incomplete",
            );
        }
        let course_complete = after.as_ref().is_some_and(UserProgress::is_course_complete);

        if course_complete && self.claim_course_bonus(user_id, course_id).await {
            tracing::info!(user_id, course_id, "Course completed");
            let mut bonus = 0;
            if let Some(t) = self
                .award_xp(
                    user_id,
                    COURSE_COMPLETION_BONUS_XP,
                    totals.total_xp,
                    XP_REASON_COURSE_BONUS,
                )
                .await
            {
                totals = t;
                bonus = COURSE_COMPLETION_BONUS_XP;
                xp_earned += bonus;
            }
            if let Err(e) = self.store.increment_courses_completed(user_id).await {
                tracing::warn!(user_id, error = %e, "Failed to increment courses_completed");
            }
            self.publish(LearningEvent::course_completed(user_id, course_id, bonus));
        }

        let badges_earned = match self.badges.check_and_award_badges(user_id).await {
            Ok(badges) => badges,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Badge evaluation failed");
                Vec::new()
            }
        };
        for badge in &badges_earned {
            self.publish(LearningEvent::badge_awarded(
                user_id,
                badge.achievement_id,
                &badge.code,
                badge.xp_reward,
            ));
        }

        // Badges may have granted XP, so the level is read back rather than
        // taken from the last award.
        let new_level = match self.store.find_user(user_id).await {
            Ok(Some(u)) => u.current_level,
            Ok(None) => totals.current_level,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to re-read level after badges");
                totals.current_level
            }
        };
        let leveled_up = new_level > old_level;
        if leveled_up {
            tracing::info!(user_id, old_level, new_level, "Level up");
            self.publish(LearningEvent::level_up(user_id, old_level, new_level));
        }

        Ok(CompletionOutcome {
            xp_earned,
            old_level,
            new_level,
            leveled_up,
            course_complete,
            already_completed: false,
            badges_earned,
        })
    }

    /// Zero-XP outcome for a lesson that was already completed.
    async fn already_completed(
        &self,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<CompletionOutcome, PipelineError> {
        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: user_id,
            })?;
        let course_complete = self
            .get_course_progress(user_id, course_id)
            .await
            .is_some_and(|p| p.is_course_complete());

        Ok(CompletionOutcome {
            xp_earned: 0,
            old_level: user.current_level,
            new_level: user.current_level,
            leveled_up: false,
            course_complete,
            already_completed: true,
            badges_earned: Vec::new(),
        })
    }

    /// Claim the one-time completion bonus for a finished course.
    ///
    /// Concurrent completions of a course's last lessons can all observe
    /// the finished aggregate; only the call whose claim lands pays out.
    async fn claim_course_bonus(&self, user_id: DbId, course_id: DbId) -> bool {
        match self.store.claim_course_bonus(user_id, course_id).await {
            Ok(true) => true,
            Ok(false) => {
                tracing::debug!(user_id, course_id, "Course bonus already claimed");
                false
            }
            Err(e) => {
                tracing::warn!(user_id, course_id, error = %e, "Failed to claim course bonus");
                false
            }
        }
    }

    /// Award XP through the store's `award_xp`, falling back to a direct
    /// compare-and-set write only when the primary call definitively did
    /// not land.
    ///
    /// `total_before` is the user's XP total as last observed. Returns the
    /// new totals, or `None` if no XP could be awarded.
    async fn award_xp(
        &self,
        user_id: DbId,
        amount: i32,
        total_before: i64,
        reason: &str,
    ) -> Option<XpTotals> {
        let totals = match self.store.award_xp(user_id, amount).await {
            Ok(Some(t)) => t,
            Ok(None) => {
                tracing::error!(user_id, amount, "award_xp found no user row");
                return None;
            }
            Err(e) => {
                tracing::warn!(user_id, amount, error = %e, "award_xp failed, checking before fallback");
                self.fallback_award_xp(user_id, amount, total_before).await?
            }
        };

        self.publish(LearningEvent::xp_awarded(
            user_id,
            amount,
            totals.total_xp,
            reason,
        ));
        Some(totals)
    }

    async fn fallback_award_xp(
        &self,
        user_id: DbId,
        amount: i32,
        total_before: i64,
    ) -> Option<XpTotals> {
        let current = match self.store.find_user(user_id).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                tracing::error!(user_id, "User vanished during XP fallback");
                return None;
            }
            Err(e) => {
                tracing::error!(
                    user_id,
                    amount,
                    error = %e,
                    "Cannot verify whether award_xp committed, skipping fallback",
                );
                return None;
            }
        };

        let expected_after = total_before + amount as i64;
        if current.total_xp == expected_after {
            tracing::info!(user_id, amount, "award_xp had committed despite the error");
            return Some(XpTotals {
                total_xp: current.total_xp,
                current_level: current.current_level,
            });
        }
        if current.total_xp != total_before {
            tracing::error!(
                user_id,
                amount,
                total_before,
                observed = current.total_xp,
                "XP total changed concurrently, skipping fallback",
            );
            return None;
        }

        let totals = XpTotals {
            total_xp: expected_after,
            current_level: level_for_xp(expected_after),
        };
        match self
            .store
            .set_xp_if_unchanged(user_id, total_before, totals)
            .await
        {
            Ok(true) => {
                tracing::info!(user_id, amount, "XP awarded through fallback update");
                Some(totals)
            }
            Ok(false) => {
                tracing::error!(user_id, amount, "Fallback XP update lost a race, XP not awarded");
                None
            }
            Err(e) => {
                tracing::error!(user_id, amount, error = %e, "Fallback XP update failed");
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // get_course_progress
    // -----------------------------------------------------------------------

    /// Read the progress aggregate for a (user, course) pair.
    ///
    /// Transient errors are retried per the configured policy. Any failure
    /// yields `None`, so callers cannot tell "not enrolled" from "store
    /// unreachable".
    pub async fn get_course_progress(
        &self,
        user_id: DbId,
        course_id: DbId,
    ) -> Option<UserProgress> {
        self.read_progress(user_id, course_id).await.unwrap_or_default()
    }

    async fn read_progress(
        &self,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<UserProgress>, StoreError> {
        let policy = self.config.progress_retry;
        let mut attempt = 1;
        loop {
            match self.store.find_progress(user_id, course_id).await {
                Ok(progress) => return Ok(progress),
                Err(e) if e.is_transient() && policy.should_retry(attempt) => {
                    tracing::warn!(
                        user_id,
                        course_id,
                        attempt,
                        error = %e,
                        "Transient error reading course progress, retrying",
                    );
                    tokio::time::sleep(policy.backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        user_id,
                        course_id,
                        attempt,
                        error = %e,
                        "Failed to read course progress",
                    );
                    return Err(e);
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // update_current_lesson
    // -----------------------------------------------------------------------

    /// Mark `lesson_id` as the learner's current position in a course.
    ///
    /// Skips the write when it is already current. Returns `false` when the
    /// user is not enrolled or the store fails.
    pub async fn update_current_lesson(
        &self,
        user_id: DbId,
        course_id: DbId,
        lesson_id: DbId,
    ) -> bool {
        let progress = match self.store.find_progress(user_id, course_id).await {
            Ok(Some(p)) => p,
            Ok(None) => {
                tracing::warn!(
                    user_id,
                    course_id,
                    "No enrollment row, cannot track current lesson",
                );
                return false;
            }
            Err(e) if e.is_transient() => {
                tracing::error!(
                    user_id,
                    course_id,
                    error = %e,
                    "Store unreachable while reading enrollment",
                );
                return false;
            }
            Err(e) => {
                tracing::error!(user_id, course_id, error = %e, "Failed to read enrollment");
                return false;
            }
        };

        if progress.current_lesson_id == Some(lesson_id) {
            return true;
        }

        match self
            .store
            .set_current_lesson(user_id, course_id, lesson_id)
            .await
        {
            Ok(true) => true,
            Ok(false) => {
                tracing::warn!(user_id, course_id, "Enrollment disappeared before update");
                false
            }
            Err(e) => {
                tracing::error!(
                    user_id,
                    course_id,
                    lesson_id,
                    error = %e,
                    "Failed to update current lesson",
                );
                false
            }
        }
    }

    fn publish(&self, event: LearningEvent) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }
}
