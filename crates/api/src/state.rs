use std::sync::Arc;

use academy_events::EventBus;
use academy_pipeline::ProgressPipeline;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: everything inside is an `Arc` or a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: academy_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Lesson completion, progress and current-lesson operations.
    pub pipeline: Arc<ProgressPipeline>,
    /// Bus the pipeline publishes learning events on.
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    /// Build state with a PostgreSQL-backed pipeline wired to `event_bus`.
    pub fn new(
        pool: academy_db::DbPool,
        config: ServerConfig,
        pipeline_config: academy_pipeline::PipelineConfig,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let pipeline = ProgressPipeline::postgres(pool.clone(), pipeline_config)
            .with_event_bus(Arc::clone(&event_bus));
        Self {
            pool,
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            event_bus,
        }
    }
}
