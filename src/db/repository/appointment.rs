use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{enum_column, optional_enum_column, uuid_column};
use crate::db::DatabaseError;
use crate::models::enums::*;
use crate::models::*;

pub(crate) const APPOINTMENT_COLUMNS: &str =
    "a.id, a.patient_id, a.doctor_id, a.day, a.label, a.status, a.reason,
     a.cancelled_by, a.created_at, a.updated_at";

/// Maps the ten `APPOINTMENT_COLUMNS` starting at `offset`.
pub(crate) fn appointment_from_row(row: &Row, offset: usize) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: uuid_column(row, offset)?,
        patient_id: uuid_column(row, offset + 1)?,
        doctor_id: uuid_column(row, offset + 2)?,
        day: row.get(offset + 3)?,
        label: row.get(offset + 4)?,
        status: enum_column(row, offset + 5)?,
        reason: row.get(offset + 6)?,
        cancelled_by: optional_enum_column(row, offset + 7)?,
        created_at: row.get(offset + 8)?,
        updated_at: row.get(offset + 9)?,
    })
}

fn collect_appointments(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| appointment_from_row(row, 0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Insert a new appointment. A second booked row for the same
/// (doctor, day, label) trips the partial unique index and surfaces
/// as `ConstraintViolation`.
pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, patient_id, doctor_id, day, label, status, reason,
         cancelled_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            appt.id.to_string(),
            appt.patient_id.to_string(),
            appt.doctor_id.to_string(),
            appt.day,
            appt.label,
            appt.status.as_str(),
            appt.reason,
            appt.cancelled_by.map(|r| r.as_str()),
            appt.created_at,
            appt.updated_at,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Option<Appointment>, DatabaseError> {
    let appt = conn
        .query_row(
            &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments a WHERE a.id = ?1"),
            params![id.to_string()],
            |row| appointment_from_row(row, 0),
        )
        .optional()?;
    Ok(appt)
}

/// The booked appointment currently holding (doctor, day, label), if any.
pub fn find_booked_appointment(
    conn: &Connection,
    doctor_id: &Uuid,
    day: &NaiveDate,
    label: &str,
) -> Result<Option<Appointment>, DatabaseError> {
    let appt = conn
        .query_row(
            &format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments a
                 WHERE a.doctor_id = ?1 AND a.day = ?2 AND a.label = ?3 AND a.status = 'booked'"
            ),
            params![doctor_id.to_string(), day, label],
            |row| appointment_from_row(row, 0),
        )
        .optional()?;
    Ok(appt)
}

/// (day, label) keys of a doctor's booked appointments within a date range.
pub fn list_booked_keys_in_range(
    conn: &Connection,
    doctor_id: &Uuid,
    from: &NaiveDate,
    to: &NaiveDate,
) -> Result<Vec<(NaiveDate, String)>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT day, label FROM appointments
         WHERE doctor_id = ?1 AND day >= ?2 AND day <= ?3 AND status = 'booked'",
    )?;
    let rows = stmt.query_map(params![doctor_id.to_string(), from, to], |row| {
        Ok((row.get::<_, NaiveDate>(0)?, row.get::<_, String>(1)?))
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Move a booked appointment to `to`. The update only matches rows that are
/// still booked; returns false when the appointment was already terminal.
pub fn transition_appointment(
    conn: &Connection,
    id: &Uuid,
    to: AppointmentStatus,
    cancelled_by: Option<ActorRole>,
    updated_at: &DateTime<Utc>,
) -> Result<bool, DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE appointments SET status = ?1, cancelled_by = ?2, updated_at = ?3
             WHERE id = ?4 AND status = 'booked'",
            params![
                to.as_str(),
                cancelled_by.map(|r| r.as_str()),
                updated_at,
                id.to_string(),
            ],
        )
        .map_err(DatabaseError::from_write)?;
    Ok(changed == 1)
}

/// Booked appointments for a doctor from `today` on, soonest first.
pub fn list_upcoming_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
    today: &NaiveDate,
) -> Result<Vec<Appointment>, DatabaseError> {
    collect_appointments(
        conn,
        &format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments a
             WHERE a.doctor_id = ?1 AND a.day >= ?2 AND a.status = 'booked'
             ORDER BY a.day ASC, a.label ASC"
        ),
        params![doctor_id.to_string(), today],
    )
}

/// Most recently completed or cancelled appointments for a doctor.
pub fn list_recent_activity_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
    limit: u32,
) -> Result<Vec<Appointment>, DatabaseError> {
    collect_appointments(
        conn,
        &format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments a
             WHERE a.doctor_id = ?1 AND a.status IN ('completed', 'cancelled')
             ORDER BY a.updated_at DESC, a.created_at DESC
             LIMIT ?2"
        ),
        params![doctor_id.to_string(), limit],
    )
}

pub fn list_upcoming_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
    today: &NaiveDate,
) -> Result<Vec<Appointment>, DatabaseError> {
    collect_appointments(
        conn,
        &format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments a
             WHERE a.patient_id = ?1 AND a.day >= ?2 AND a.status = 'booked'
             ORDER BY a.day ASC, a.label ASC"
        ),
        params![patient_id.to_string(), today],
    )
}

/// Past appointments of a patient in any status, newest first.
pub fn list_history_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
    today: &NaiveDate,
) -> Result<Vec<Appointment>, DatabaseError> {
    collect_appointments(
        conn,
        &format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments a
             WHERE a.patient_id = ?1 AND a.day < ?2
             ORDER BY a.day DESC, a.created_at DESC"
        ),
        params![patient_id.to_string(), today],
    )
}
