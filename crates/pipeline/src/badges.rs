//! Badge evaluation.
//!
//! The pipeline treats badge evaluation as a black box that may grant XP
//! as a side effect; it re-reads the user's level afterwards rather than
//! trusting anything returned here for level.

use academy_core::badges::BadgeCriteria;
use academy_core::types::DbId;
use academy_db::models::achievement::Achievement;
use academy_db::repositories::{AchievementRepo, UserRepo};
use academy_db::DbPool;
use async_trait::async_trait;
use serde::Serialize;

use crate::error::StoreError;

/// An achievement granted during one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeAward {
    pub achievement_id: DbId,
    pub code: String,
    pub name: String,
    pub xp_reward: i32,
}

impl From<&Achievement> for BadgeAward {
    fn from(a: &Achievement) -> Self {
        Self {
            achievement_id: a.id,
            code: a.code.clone(),
            name: a.name.clone(),
            xp_reward: a.xp_reward,
        }
    }
}

/// Grants whatever achievements a user newly qualifies for.
#[async_trait]
pub trait BadgeEvaluator: Send + Sync {
    /// Returns the achievements granted by this call (possibly empty).
    async fn check_and_award_badges(&self, user_id: DbId) -> Result<Vec<BadgeAward>, StoreError>;
}

/// [`BadgeEvaluator`] over the `achievements` catalog table.
///
/// Each achievement's `xp_reward` goes through `award_xp`, so a reward can
/// unlock XP- or level-based achievements; evaluation repeats until a pass
/// grants nothing new.
#[derive(Clone)]
pub struct CatalogBadgeEvaluator {
    pool: DbPool,
}

impl CatalogBadgeEvaluator {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BadgeEvaluator for CatalogBadgeEvaluator {
    async fn check_and_award_badges(&self, user_id: DbId) -> Result<Vec<BadgeAward>, StoreError> {
        let mut awarded = Vec::new();

        loop {
            let Some(user) = UserRepo::find_by_id(&self.pool, user_id).await? else {
                return Ok(awarded);
            };
            let counters = user.counters();
            let mut granted_this_pass = false;

            for achievement in AchievementRepo::list_unearned(&self.pool, user_id).await? {
                let criteria = match achievement.criteria_type.parse::<BadgeCriteria>() {
                    Ok(c) => c,
                    Err(e) => {
                        tracing::warn!(
                            achievement_id = achievement.id,
                            error = %e,
                            "Skipping achievement with unknown criteria",
                        );
                        continue;
                    }
                };

                if !criteria.is_met(achievement.threshold, &counters) {
                    continue;
                }

                // A concurrent evaluation may have granted it first.
                if !AchievementRepo::grant(&self.pool, user_id, achievement.id).await? {
                    continue;
                }
                granted_this_pass = true;

                if achievement.xp_reward > 0 {
                    if let Err(e) =
                        UserRepo::award_xp(&self.pool, user_id, achievement.xp_reward).await
                    {
                        tracing::warn!(
                            user_id,
                            achievement_id = achievement.id,
                            error = %e,
                            "Failed to award achievement XP",
                        );
                    }
                }

                tracing::info!(
                    user_id,
                    code = %achievement.code,
                    xp_reward = achievement.xp_reward,
                    "Achievement granted",
                );
                awarded.push(BadgeAward::from(&achievement));
            }

            if !granted_this_pass {
                return Ok(awarded);
            }
        }
    }
}
