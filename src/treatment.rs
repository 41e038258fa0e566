//! Treatment record store: the optional clinical note attached 1:1 to an
//! appointment.
//!
//! Writes merge: a field that was not submitted keeps its stored value,
//! and a submitted blank is stored as unset rather than as an empty string.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::config;
use crate::db::{repository, DatabaseError};
use crate::models::{TreatmentFields, TreatmentHistoryEntry, TreatmentRecord};

pub fn get(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Option<TreatmentRecord>, DatabaseError> {
    repository::get_treatment_record(conn, appointment_id)
}

/// Create or update the record for an appointment.
pub fn upsert(
    conn: &Connection,
    appointment_id: &Uuid,
    fields: &TreatmentFields,
    at: DateTime<Utc>,
) -> Result<TreatmentRecord, DatabaseError> {
    let mut record = get(conn, appointment_id)?
        .unwrap_or_else(|| TreatmentRecord::empty(*appointment_id, at));
    merge_fields(&mut record, fields);
    record.updated_at = at;
    repository::upsert_treatment_record(conn, &record)?;
    Ok(record)
}

/// Record written when a visit is completed with no notes taken.
pub fn create_default(
    conn: &Connection,
    appointment_id: &Uuid,
    at: DateTime<Utc>,
) -> Result<TreatmentRecord, DatabaseError> {
    let mut record = TreatmentRecord::empty(*appointment_id, at);
    record.visit_type = Some(config::DEFAULT_VISIT_TYPE.to_string());
    repository::upsert_treatment_record(conn, &record)?;
    Ok(record)
}

/// A patient's visits that carry a record, newest first, optionally
/// limited to one doctor.
pub fn history(
    conn: &Connection,
    patient_id: &Uuid,
    doctor_id: Option<&Uuid>,
) -> Result<Vec<TreatmentHistoryEntry>, DatabaseError> {
    repository::list_treatment_history(conn, patient_id, doctor_id)
}

fn merge_fields(record: &mut TreatmentRecord, fields: &TreatmentFields) {
    let pairs = [
        (&mut record.visit_type, &fields.visit_type),
        (&mut record.test_done, &fields.test_done),
        (&mut record.diagnosis, &fields.diagnosis),
        (&mut record.prescription, &fields.prescription),
        (&mut record.medicines, &fields.medicines),
        (&mut record.notes, &fields.notes),
    ];
    for (slot, submitted) in pairs {
        if let Some(value) = submitted {
            *slot = normalize(value);
        }
    }
}

fn normalize(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
