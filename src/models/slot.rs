use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub day: NaiveDate,
    pub label: String,
    pub is_open: bool,
}

/// One (day, label) pair ticked by a doctor when declaring availability.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotSelection {
    pub day: NaiveDate,
    pub label: String,
}

impl SlotSelection {
    pub fn new(day: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            day,
            label: label.into(),
        }
    }
}
