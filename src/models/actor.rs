use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ActorRole;

/// Resolved caller identity handed in by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: ActorRole,
    pub display_name: String,
}

impl Actor {
    pub fn new(id: Uuid, role: ActorRole, display_name: impl Into<String>) -> Self {
        Self {
            id,
            role,
            display_name: display_name.into(),
        }
    }

    pub fn patient(id: Uuid, display_name: impl Into<String>) -> Self {
        Self::new(id, ActorRole::Patient, display_name)
    }

    pub fn doctor(id: Uuid, display_name: impl Into<String>) -> Self {
        Self::new(id, ActorRole::Doctor, display_name)
    }

    pub fn admin(id: Uuid, display_name: impl Into<String>) -> Self {
        Self::new(id, ActorRole::Admin, display_name)
    }
}
