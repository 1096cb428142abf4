//! Learning event bus.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`. The progress pipeline publishes to it;
//!   anything that wants to react to progress changes subscribes instead of
//!   polling the database.
//! - [`LearningEvent`] -- the event envelope, with constructors for each
//!   progress event.
//! - [`EventPersistence`] -- background service that writes every event to
//!   the `events` table.

pub mod bus;
pub mod persistence;

pub use bus::{EventBus, LearningEvent};
pub use persistence::EventPersistence;
