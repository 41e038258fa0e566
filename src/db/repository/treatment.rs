use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::appointment::{appointment_from_row, APPOINTMENT_COLUMNS};
use super::uuid_column;
use crate::db::DatabaseError;
use crate::models::*;

const RECORD_COLUMNS: &str =
    "t.appointment_id, t.visit_type, t.test_done, t.diagnosis, t.prescription,
     t.medicines, t.notes, t.updated_at";

fn record_from_row(row: &Row, offset: usize) -> rusqlite::Result<TreatmentRecord> {
    Ok(TreatmentRecord {
        appointment_id: uuid_column(row, offset)?,
        visit_type: row.get(offset + 1)?,
        test_done: row.get(offset + 2)?,
        diagnosis: row.get(offset + 3)?,
        prescription: row.get(offset + 4)?,
        medicines: row.get(offset + 5)?,
        notes: row.get(offset + 6)?,
        updated_at: row.get(offset + 7)?,
    })
}

pub fn get_treatment_record(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Option<TreatmentRecord>, DatabaseError> {
    let record = conn
        .query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM treatment_records t WHERE t.appointment_id = ?1"),
            params![appointment_id.to_string()],
            |row| record_from_row(row, 0),
        )
        .optional()?;
    Ok(record)
}

/// Insert the record, or overwrite every column of the existing one.
pub fn upsert_treatment_record(
    conn: &Connection,
    record: &TreatmentRecord,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO treatment_records (appointment_id, visit_type, test_done, diagnosis,
         prescription, medicines, notes, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(appointment_id) DO UPDATE SET
             visit_type = excluded.visit_type,
             test_done = excluded.test_done,
             diagnosis = excluded.diagnosis,
             prescription = excluded.prescription,
             medicines = excluded.medicines,
             notes = excluded.notes,
             updated_at = excluded.updated_at",
        params![
            record.appointment_id.to_string(),
            record.visit_type,
            record.test_done,
            record.diagnosis,
            record.prescription,
            record.medicines,
            record.notes,
            record.updated_at,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(())
}

/// A patient's appointments that carry a treatment record, newest day first.
/// `doctor_id` narrows the history to visits with one doctor.
pub fn list_treatment_history(
    conn: &Connection,
    patient_id: &Uuid,
    doctor_id: Option<&Uuid>,
) -> Result<Vec<TreatmentHistoryEntry>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS}, {RECORD_COLUMNS}
         FROM appointments a
         JOIN treatment_records t ON t.appointment_id = a.id
         WHERE a.patient_id = ?1 AND (?2 IS NULL OR a.doctor_id = ?2)
         ORDER BY a.day DESC, a.created_at DESC"
    ))?;

    let rows = stmt.query_map(
        params![patient_id.to_string(), doctor_id.map(|id| id.to_string())],
        |row| {
            Ok(TreatmentHistoryEntry {
                appointment: appointment_from_row(row, 0)?,
                record: record_from_row(row, 10)?,
            })
        },
    )?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}
