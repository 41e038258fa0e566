use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{optional_enum_column, uuid_column};
use crate::db::DatabaseError;
use crate::models::enums::ActorRole;
use crate::models::*;

const EVENT_COLUMNS: &str =
    "e.id, e.appointment_id, e.actor_role, e.actor_name, e.message, e.created_at";

fn event_from_row(row: &Row) -> rusqlite::Result<TimelineEvent> {
    Ok(TimelineEvent {
        id: row.get(0)?,
        appointment_id: uuid_column(row, 1)?,
        actor_role: optional_enum_column(row, 2)?,
        actor_name: row.get(3)?,
        message: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Append one event. The table has no update path; rows are only ever
/// removed by the appointment cascade.
pub fn insert_timeline_event(
    conn: &Connection,
    appointment_id: &Uuid,
    actor_role: Option<ActorRole>,
    actor_name: Option<&str>,
    message: &str,
    created_at: &DateTime<Utc>,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO timeline_events (appointment_id, actor_role, actor_name, message, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            appointment_id.to_string(),
            actor_role.map(|r| r.as_str()),
            actor_name,
            message,
            created_at,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(conn.last_insert_rowid())
}

/// Events for one appointment in the order they were recorded.
pub fn list_timeline_for_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Vec<TimelineEvent>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EVENT_COLUMNS} FROM timeline_events e
         WHERE e.appointment_id = ?1
         ORDER BY e.id ASC"
    ))?;
    let rows = stmt.query_map(params![appointment_id.to_string()], event_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Newest events across all of a doctor's appointments.
pub fn list_recent_timeline_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
    limit: u32,
) -> Result<Vec<TimelineEvent>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EVENT_COLUMNS} FROM timeline_events e
         JOIN appointments a ON a.id = e.appointment_id
         WHERE a.doctor_id = ?1
         ORDER BY e.created_at DESC, e.id DESC
         LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![doctor_id.to_string(), limit], event_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}
