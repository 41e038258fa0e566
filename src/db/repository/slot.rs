use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::uuid_column;
use crate::db::DatabaseError;
use crate::models::*;

const SLOT_COLUMNS: &str = "id, doctor_id, day, label, is_open";

fn slot_from_row(row: &Row) -> rusqlite::Result<Slot> {
    Ok(Slot {
        id: uuid_column(row, 0)?,
        doctor_id: uuid_column(row, 1)?,
        day: row.get(2)?,
        label: row.get(3)?,
        is_open: row.get(4)?,
    })
}

pub fn insert_slot(conn: &Connection, slot: &Slot) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO slots (id, doctor_id, day, label, is_open) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            slot.id.to_string(),
            slot.doctor_id.to_string(),
            slot.day,
            slot.label,
            slot.is_open,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(())
}

pub fn get_slot(conn: &Connection, id: &Uuid) -> Result<Option<Slot>, DatabaseError> {
    let slot = conn
        .query_row(
            &format!("SELECT {SLOT_COLUMNS} FROM slots WHERE id = ?1"),
            params![id.to_string()],
            slot_from_row,
        )
        .optional()?;
    Ok(slot)
}

/// Slots for a doctor with `from <= day <= to`, ordered by day then label.
pub fn list_slots_in_range(
    conn: &Connection,
    doctor_id: &Uuid,
    from: &NaiveDate,
    to: &NaiveDate,
    open_only: bool,
) -> Result<Vec<Slot>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SLOT_COLUMNS} FROM slots
         WHERE doctor_id = ?1 AND day >= ?2 AND day <= ?3 AND (?4 = 0 OR is_open = 1)
         ORDER BY day ASC, label ASC"
    ))?;

    let rows = stmt.query_map(
        params![doctor_id.to_string(), from, to, open_only],
        slot_from_row,
    )?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn delete_slots_in_range(
    conn: &Connection,
    doctor_id: &Uuid,
    from: &NaiveDate,
    to: &NaiveDate,
) -> Result<usize, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM slots WHERE doctor_id = ?1 AND day >= ?2 AND day <= ?3",
        params![doctor_id.to_string(), from, to],
    )?;
    Ok(deleted)
}

/// Flip an open slot to closed. Returns false when the slot was already
/// closed (or gone), i.e. another booking won the race.
pub fn close_slot(conn: &Connection, id: &Uuid) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "UPDATE slots SET is_open = 0 WHERE id = ?1 AND is_open = 1",
        params![id.to_string()],
    )?;
    Ok(changed == 1)
}

/// Mark the slot with this key open. Returns false if no such slot exists.
pub fn open_slot_by_key(
    conn: &Connection,
    doctor_id: &Uuid,
    day: &NaiveDate,
    label: &str,
) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "UPDATE slots SET is_open = 1 WHERE doctor_id = ?1 AND day = ?2 AND label = ?3",
        params![doctor_id.to_string(), day, label],
    )?;
    Ok(changed > 0)
}
