//! Role-specific dashboard reads and the scoped treatment-history view.
//!
//! Read-only; every query is scoped to the calling actor.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::BookingError;
use crate::config;
use crate::db::repository;
use crate::models::enums::ActorRole;
use crate::models::{Actor, Appointment, TimelineEvent, TreatmentHistoryEntry};
use crate::{timeline, treatment};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorDashboard {
    /// Booked visits from today on, soonest first.
    pub upcoming: Vec<Appointment>,
    /// Latest completed or cancelled visits.
    pub recent_activity: Vec<Appointment>,
    /// Latest timeline events across all of the doctor's appointments.
    pub timeline: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientDashboard {
    pub upcoming: Vec<Appointment>,
    /// Visits before today in any status, newest first.
    pub history: Vec<Appointment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Dashboard {
    Doctor(DoctorDashboard),
    Patient(PatientDashboard),
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

pub fn load(conn: &Connection, actor: &Actor, today: NaiveDate) -> Result<Dashboard, BookingError> {
    match actor.role {
        ActorRole::Doctor => Ok(Dashboard::Doctor(doctor_dashboard(conn, &actor.id, today)?)),
        ActorRole::Patient => Ok(Dashboard::Patient(patient_dashboard(conn, &actor.id, today)?)),
        ActorRole::Admin => Err(BookingError::RoleNotPermitted {
            role: actor.role,
            operation: "open a dashboard",
        }),
    }
}

pub fn doctor_dashboard(
    conn: &Connection,
    doctor_id: &Uuid,
    today: NaiveDate,
) -> Result<DoctorDashboard, BookingError> {
    Ok(DoctorDashboard {
        upcoming: repository::list_upcoming_for_doctor(conn, doctor_id, &today)?,
        recent_activity: repository::list_recent_activity_for_doctor(
            conn,
            doctor_id,
            config::RECENT_ACTIVITY_LIMIT,
        )?,
        timeline: timeline::recent_for_doctor(conn, doctor_id, config::TIMELINE_FEED_LIMIT)?,
    })
}

pub fn patient_dashboard(
    conn: &Connection,
    patient_id: &Uuid,
    today: NaiveDate,
) -> Result<PatientDashboard, BookingError> {
    Ok(PatientDashboard {
        upcoming: repository::list_upcoming_for_patient(conn, patient_id, &today)?,
        history: repository::list_history_for_patient(conn, patient_id, &today)?,
    })
}

/// Treatment history of one patient as the actor may see it: patients
/// their own, doctors only visits they held, admins everything.
pub fn treatment_history(
    conn: &Connection,
    actor: &Actor,
    patient_id: &Uuid,
) -> Result<Vec<TreatmentHistoryEntry>, BookingError> {
    let doctor_filter = match actor.role {
        ActorRole::Patient if actor.id != *patient_id => {
            return Err(BookingError::RoleNotPermitted {
                role: actor.role,
                operation: "view another patient's history",
            })
        }
        ActorRole::Patient | ActorRole::Admin => None,
        ActorRole::Doctor => Some(&actor.id),
    };
    Ok(treatment::history(conn, patient_id, doctor_filter)?)
}
