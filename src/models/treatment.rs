use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::appointment::Appointment;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentRecord {
    pub appointment_id: Uuid,
    pub visit_type: Option<String>,
    pub test_done: Option<String>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub medicines: Option<String>,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TreatmentRecord {
    pub fn empty(appointment_id: Uuid, updated_at: DateTime<Utc>) -> Self {
        Self {
            appointment_id,
            visit_type: None,
            test_done: None,
            diagnosis: None,
            prescription: None,
            medicines: None,
            notes: None,
            updated_at,
        }
    }
}

/// Submitted clinical note fields. `None` means the field was not
/// submitted and the stored value is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentFields {
    #[serde(default)]
    pub visit_type: Option<String>,
    #[serde(default)]
    pub test_done: Option<String>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub prescription: Option<String>,
    #[serde(default)]
    pub medicines: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// An appointment together with its clinical note, for history views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentHistoryEntry {
    pub appointment: Appointment,
    pub record: TreatmentRecord,
}
