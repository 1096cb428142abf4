//! The progress and reward pipeline.
//!
//! [`ProgressPipeline`] records lesson completions, awards XP, detects
//! level-ups and course completion, and runs the badge evaluator. It talks
//! to storage only through the [`LearningStore`] trait and to the badge
//! catalog only through [`BadgeEvaluator`], so both can be swapped in
//! tests.

pub mod badges;
pub mod config;
pub mod error;
pub mod pg;
pub mod service;
pub mod store;

pub use badges::{BadgeAward, BadgeEvaluator, CatalogBadgeEvaluator};
pub use config::PipelineConfig;
pub use error::{PipelineError, StoreError};
pub use pg::PgLearningStore;
pub use service::{CompletionOutcome, CompletionRequest, ProgressPipeline};
pub use store::LearningStore;
