use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BookingError;
use crate::db::{self, repository, DatabaseError};
use crate::models::enums::{ActorRole, AppointmentStatus};
use crate::models::{Actor, Appointment, TreatmentFields, TreatmentRecord};
use crate::{slots, timeline, treatment};

/// Result of saving a clinical note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentOutcome {
    pub appointment: Appointment,
    pub record: TreatmentRecord,
    /// True when the save moved the appointment from Booked to Completed.
    pub completed_now: bool,
}

// ─── Operations ───────────────────────────────────────────────────────────────

/// Book an open slot for the calling patient.
pub fn book(
    conn: &Connection,
    actor: &Actor,
    slot_id: &Uuid,
    reason: Option<&str>,
) -> Result<Appointment, BookingError> {
    require_role(actor, &[ActorRole::Patient], "book appointments")?;

    let tx = db::begin_immediate(conn)?;

    let slot = slots::find(&tx, slot_id)?.ok_or(BookingError::SlotNotFound(*slot_id))?;
    if !slot.is_open {
        tracing::warn!(slot_id = %slot_id, "Booking rejected: slot closed");
        return Err(BookingError::SlotUnavailable);
    }
    if repository::find_booked_appointment(&tx, &slot.doctor_id, &slot.day, &slot.label)?.is_some() {
        tracing::warn!(slot_id = %slot_id, "Booking rejected: active appointment holds slot");
        return Err(BookingError::DuplicateBooking);
    }
    if !slots::close(&tx, &slot)? {
        return Err(BookingError::SlotUnavailable);
    }

    let now = Utc::now();
    let appointment = Appointment {
        id: Uuid::new_v4(),
        patient_id: actor.id,
        doctor_id: slot.doctor_id,
        day: slot.day,
        label: slot.label.clone(),
        status: AppointmentStatus::Booked,
        reason: reason.map(str::trim).filter(|r| !r.is_empty()).map(String::from),
        cancelled_by: None,
        created_at: now,
        updated_at: now,
    };
    repository::insert_appointment(&tx, &appointment).map_err(|e| match e {
        DatabaseError::ConstraintViolation(_) => BookingError::DuplicateBooking,
        other => BookingError::from(other),
    })?;

    timeline::record(
        &tx,
        &appointment.id,
        actor,
        &timeline::booked_message(actor, &slot.label, &slot.day),
        now,
    )?;

    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(
        appointment_id = %appointment.id,
        doctor_id = %appointment.doctor_id,
        day = %appointment.day,
        "Appointment booked"
    );
    Ok(appointment)
}

/// Cancel a booked appointment. Either party to the appointment may cancel.
pub fn cancel(
    conn: &Connection,
    actor: &Actor,
    appointment_id: &Uuid,
) -> Result<Appointment, BookingError> {
    require_role(actor, &[ActorRole::Doctor, ActorRole::Patient], "cancel appointments")?;

    let tx = db::begin_immediate(conn)?;
    let mut appointment = load_visible(&tx, actor, appointment_id)?;
    ensure_booked(&appointment)?;

    let now = Utc::now();
    transition(&tx, &mut appointment, AppointmentStatus::Cancelled, Some(actor.role), now)?;
    timeline::record(
        &tx,
        &appointment.id,
        actor,
        &timeline::cancelled_message(actor, &appointment),
        now,
    )?;

    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(
        appointment_id = %appointment.id,
        cancelled_by = %actor.role,
        "Appointment cancelled"
    );
    Ok(appointment)
}

/// Mark a booked visit complete, writing a default record if no notes exist.
pub fn complete(
    conn: &Connection,
    actor: &Actor,
    appointment_id: &Uuid,
) -> Result<Appointment, BookingError> {
    require_role(actor, &[ActorRole::Doctor], "complete appointments")?;

    let tx = db::begin_immediate(conn)?;
    let mut appointment = load_visible(&tx, actor, appointment_id)?;
    ensure_booked(&appointment)?;

    let now = Utc::now();
    if treatment::get(&tx, &appointment.id)?.is_none() {
        treatment::create_default(&tx, &appointment.id, now)?;
    }
    transition(&tx, &mut appointment, AppointmentStatus::Completed, None, now)?;
    timeline::record(&tx, &appointment.id, actor, &timeline::completed_message(actor), now)?;

    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(appointment_id = %appointment.id, "Appointment completed");
    Ok(appointment)
}

/// Save the doctor's clinical note. A booked appointment is completed by
/// the save; a completed one only has its record updated.
pub fn save_treatment(
    conn: &Connection,
    actor: &Actor,
    appointment_id: &Uuid,
    fields: &TreatmentFields,
) -> Result<TreatmentOutcome, BookingError> {
    require_role(actor, &[ActorRole::Doctor], "record treatment")?;

    let tx = db::begin_immediate(conn)?;
    let mut appointment = load_visible(&tx, actor, appointment_id)?;

    // A cancelled visit never took place. A record on it would break
    // "a treatment record exists only for a completed appointment", so the
    // record-only path for terminal appointments covers Completed alone.
    if appointment.status == AppointmentStatus::Cancelled {
        tracing::warn!(appointment_id = %appointment.id, "Treatment rejected: appointment cancelled");
        return Err(BookingError::InvalidTransition {
            from: AppointmentStatus::Cancelled,
        });
    }

    let now = Utc::now();
    let record = treatment::upsert(&tx, &appointment.id, fields, now)?;

    let completed_now = appointment.is_booked();
    if completed_now {
        transition(&tx, &mut appointment, AppointmentStatus::Completed, None, now)?;
        timeline::record(
            &tx,
            &appointment.id,
            actor,
            &timeline::treatment_saved_message(actor),
            now,
        )?;
    }

    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(
        appointment_id = %appointment.id,
        completed_now,
        "Treatment record saved"
    );
    Ok(TreatmentOutcome {
        appointment,
        record,
        completed_now,
    })
}

/// Edit an existing clinical note without touching the appointment.
pub fn amend_treatment(
    conn: &Connection,
    actor: &Actor,
    appointment_id: &Uuid,
    fields: &TreatmentFields,
) -> Result<TreatmentRecord, BookingError> {
    require_role(actor, &[ActorRole::Doctor], "edit treatment records")?;

    let tx = db::begin_immediate(conn)?;
    let appointment = load_visible(&tx, actor, appointment_id)?;
    if treatment::get(&tx, &appointment.id)?.is_none() {
        return Err(BookingError::TreatmentRecordNotFound(appointment.id));
    }
    let record = treatment::upsert(&tx, &appointment.id, fields, Utc::now())?;

    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(appointment_id = %appointment.id, "Treatment record amended");
    Ok(record)
}

/// Read an appointment the actor is allowed to see.
pub fn get_appointment(
    conn: &Connection,
    actor: &Actor,
    appointment_id: &Uuid,
) -> Result<Appointment, BookingError> {
    load_visible(conn, actor, appointment_id)
}

// ─── Internals ────────────────────────────────────────────────────────────────

fn require_role(
    actor: &Actor,
    allowed: &[ActorRole],
    operation: &'static str,
) -> Result<(), BookingError> {
    if allowed.contains(&actor.role) {
        Ok(())
    } else {
        Err(BookingError::RoleNotPermitted {
            role: actor.role,
            operation,
        })
    }
}

/// Appointments owned by someone else are reported as missing.
fn load_visible(
    conn: &Connection,
    actor: &Actor,
    appointment_id: &Uuid,
) -> Result<Appointment, BookingError> {
    repository::get_appointment(conn, appointment_id)?
        .filter(|a| a.is_visible_to(actor))
        .ok_or(BookingError::AppointmentNotFound(*appointment_id))
}

fn ensure_booked(appointment: &Appointment) -> Result<(), BookingError> {
    if appointment.status.is_terminal() {
        tracing::warn!(
            appointment_id = %appointment.id,
            status = %appointment.status,
            "Transition rejected: appointment already terminal"
        );
        return Err(BookingError::InvalidTransition {
            from: appointment.status,
        });
    }
    Ok(())
}

/// Booked → `to`, stamping `updated_at` and releasing the slot.
fn transition(
    conn: &Connection,
    appointment: &mut Appointment,
    to: AppointmentStatus,
    cancelled_by: Option<ActorRole>,
    at: DateTime<Utc>,
) -> Result<(), BookingError> {
    if !repository::transition_appointment(conn, &appointment.id, to, cancelled_by, &at)? {
        return Err(BookingError::InvalidTransition {
            from: appointment.status,
        });
    }
    // Completion releases the slot as well as cancellation does.
    slots::reopen(conn, &appointment.doctor_id, &appointment.day, &appointment.label)?;

    appointment.status = to;
    appointment.cancelled_by = cancelled_by;
    appointment.updated_at = at;
    Ok(())
}
