//! Slot registry: a doctor's bookable horizon.
//!
//! A doctor declares availability for a rolling window (today through
//! `AVAILABILITY_WINDOW_DAYS` ahead). Resubmitting the window replaces
//! every slot inside it in one transaction; slots outside the window are
//! never touched. `close`/`reopen` are the primitives the booking engine
//! uses to flip a slot as appointments claim and release it.

use std::collections::{BTreeSet, HashSet};

use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::BookingError;
use crate::config;
use crate::db::{self, repository, DatabaseError};
use crate::models::{Slot, SlotSelection};

// ═══════════════════════════════════════════
// Window
// ═══════════════════════════════════════════

/// Inclusive date range a doctor's availability is declared over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AvailabilityWindow {
    /// `None` when `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Today through `AVAILABILITY_WINDOW_DAYS` days ahead.
    pub fn rolling(today: NaiveDate) -> Self {
        Self {
            start: today,
            end: today + Duration::days(config::AVAILABILITY_WINDOW_DAYS),
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

// ═══════════════════════════════════════════
// Registry operations
// ═══════════════════════════════════════════

/// Replace a doctor's slots inside `window` with `selections`.
///
/// Deletes every slot of this doctor with a day in the window, then inserts
/// one slot per distinct selection that falls inside it. A selection whose
/// (day, label) is still held by a booked appointment is inserted closed so
/// the open flag keeps tracking the active booking. All-or-nothing: on error
/// nothing is replaced.
///
/// Returns the new slots ordered by day, then label.
pub fn replace_window(
    conn: &Connection,
    doctor_id: &Uuid,
    window: &AvailabilityWindow,
    selections: &[SlotSelection],
) -> Result<Vec<Slot>, BookingError> {
    let tx = db::begin_immediate(conn)?;

    let booked: HashSet<(NaiveDate, String)> =
        repository::list_booked_keys_in_range(&tx, doctor_id, &window.start, &window.end)?
            .into_iter()
            .collect();

    let removed = repository::delete_slots_in_range(&tx, doctor_id, &window.start, &window.end)?;

    let wanted: BTreeSet<(NaiveDate, &str)> = selections
        .iter()
        .filter(|s| window.contains(s.day))
        .map(|s| (s.day, s.label.trim()))
        .filter(|(_, label)| !label.is_empty())
        .collect();

    let mut slots = Vec::with_capacity(wanted.len());
    for (day, label) in wanted {
        let slot = Slot {
            id: Uuid::new_v4(),
            doctor_id: *doctor_id,
            day,
            label: label.to_string(),
            is_open: !booked.contains(&(day, label.to_string())),
        };
        repository::insert_slot(&tx, &slot)?;
        slots.push(slot);
    }

    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(
        doctor_id = %doctor_id,
        window_start = %window.start,
        window_end = %window.end,
        removed,
        inserted = slots.len(),
        "Availability window replaced"
    );

    Ok(slots)
}

/// Open slots in the window, ordered by day then label.
pub fn list_open(
    conn: &Connection,
    doctor_id: &Uuid,
    window: &AvailabilityWindow,
) -> Result<Vec<Slot>, DatabaseError> {
    repository::list_slots_in_range(conn, doctor_id, &window.start, &window.end, true)
}

/// Every slot in the window, open or claimed, ordered by day then label.
pub fn list_all(
    conn: &Connection,
    doctor_id: &Uuid,
    window: &AvailabilityWindow,
) -> Result<Vec<Slot>, DatabaseError> {
    repository::list_slots_in_range(conn, doctor_id, &window.start, &window.end, false)
}

pub fn find(conn: &Connection, slot_id: &Uuid) -> Result<Option<Slot>, DatabaseError> {
    repository::get_slot(conn, slot_id)
}

/// Claim an open slot. False means it was already closed.
pub(crate) fn close(conn: &Connection, slot: &Slot) -> Result<bool, DatabaseError> {
    repository::close_slot(conn, &slot.id)
}

/// Release the slot matching an appointment's key. A slot removed by a
/// window replace since the booking is not an error; returns false.
pub(crate) fn reopen(
    conn: &Connection,
    doctor_id: &Uuid,
    day: &NaiveDate,
    label: &str,
) -> Result<bool, DatabaseError> {
    let reopened = repository::open_slot_by_key(conn, doctor_id, day, label)?;
    if !reopened {
        tracing::debug!(doctor_id = %doctor_id, %day, label, "No slot left to reopen");
    }
    Ok(reopened)
}
