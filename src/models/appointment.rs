use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::actor::Actor;
use super::enums::{ActorRole, AppointmentStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub day: NaiveDate,
    pub label: String,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub cancelled_by: Option<ActorRole>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn is_booked(&self) -> bool {
        self.status == AppointmentStatus::Booked
    }

    /// Patients and doctors see their own appointments; admins see all.
    pub fn is_visible_to(&self, actor: &Actor) -> bool {
        match actor.role {
            ActorRole::Admin => true,
            ActorRole::Doctor => self.doctor_id == actor.id,
            ActorRole::Patient => self.patient_id == actor.id,
        }
    }
}
