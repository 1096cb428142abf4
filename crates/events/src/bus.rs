//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` between the progress pipeline
//! (publisher) and the persistence task (subscriber).

use academy_core::learning_events::{
    ENTITY_ACHIEVEMENT, ENTITY_COURSE, ENTITY_LESSON, EVENT_BADGE_AWARDED,
    EVENT_COURSE_COMPLETED, EVENT_LESSON_COMPLETED, EVENT_LEVEL_UP, EVENT_XP_AWARDED,
};
use academy_core::types::DbId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// LearningEvent
// ---------------------------------------------------------------------------

/// Something that happened to a learner's progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningEvent {
    /// Dot-separated event name, e.g. `"lesson.completed"`.
    pub event_type: String,

    /// Entity kind the event is about (`"lesson"`, `"course"`, ...).
    pub source_entity_type: Option<String>,

    /// Database id of that entity.
    pub source_entity_id: Option<DbId>,

    /// The learner the event belongs to.
    pub actor_user_id: Option<DbId>,

    /// Event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl LearningEvent {
    /// Create a bare event with only the `event_type` set.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// A completion row was recorded for `lesson_id`.
    pub fn lesson_completed(user_id: DbId, lesson_id: DbId, course_id: DbId, xp: i32) -> Self {
        Self::new(EVENT_LESSON_COMPLETED)
            .with_source(ENTITY_LESSON, lesson_id)
            .with_actor(user_id)
            .with_payload(json!({ "course_id": course_id, "xp_earned": xp }))
    }

    /// XP was added; `reason` is `"lesson"`, `"course_bonus"` or `"badge"`.
    pub fn xp_awarded(user_id: DbId, amount: i32, total_xp: i64, reason: &str) -> Self {
        Self::new(EVENT_XP_AWARDED)
            .with_actor(user_id)
            .with_payload(json!({ "amount": amount, "total_xp": total_xp, "reason": reason }))
    }

    pub fn level_up(user_id: DbId, old_level: i32, new_level: i32) -> Self {
        Self::new(EVENT_LEVEL_UP)
            .with_actor(user_id)
            .with_payload(json!({ "old_level": old_level, "new_level": new_level }))
    }

    pub fn course_completed(user_id: DbId, course_id: DbId, bonus_xp: i32) -> Self {
        Self::new(EVENT_COURSE_COMPLETED)
            .with_source(ENTITY_COURSE, course_id)
            .with_actor(user_id)
            .with_payload(json!({ "bonus_xp": bonus_xp }))
    }

    pub fn badge_awarded(user_id: DbId, achievement_id: DbId, code: &str, xp_reward: i32) -> Self {
        Self::new(EVENT_BADGE_AWARDED)
            .with_source(ENTITY_ACHIEVEMENT, achievement_id)
            .with_actor(user_id)
            .with_payload(json!({ "code": code, "xp_reward": xp_reward }))
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use academy_events::bus::{EventBus, LearningEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(LearningEvent::level_up(1, 2, 3));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<LearningEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unread events are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers. With no subscribers the
    /// event is dropped.
    pub fn publish(&self, event: LearningEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LearningEvent> {
        self.sender.subscribe()
    }

    /// Number of live receivers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
