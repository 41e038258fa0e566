use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ActorRole;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: i64,
    pub appointment_id: Uuid,
    pub actor_role: Option<ActorRole>,
    pub actor_name: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
