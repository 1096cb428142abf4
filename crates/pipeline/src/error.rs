use academy_core::error::CoreError;
use academy_core::retry::is_transient_message;

/// Failure talking to the backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Whether retrying the same call might succeed.
    ///
    /// Connection-level failures are transient; anything the database
    /// itself rejected is not.
    pub fn is_transient(&self) -> bool {
        let StoreError::Database(err) = self;
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => true,
            sqlx::Error::Database(_) | sqlx::Error::RowNotFound => false,
            other => is_transient_message(&other.to_string()),
        }
    }
}

/// Error returned by the pipeline's caller-facing operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Not-found, validation and precondition failures.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage failure on a step that is not best-effort.
    #[error(transparent)]
    Store(#[from] StoreError),
}
