//! Timeline recorder: append-only audit trail per appointment.
//!
//! Every status transition writes exactly one event inside the
//! transition's own transaction, so a failed append rolls the transition
//! back with it. Message builders live here so the wording of the trail
//! stays in one place.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{repository, DatabaseError};
use crate::models::enums::ActorRole;
use crate::models::{Actor, Appointment, TimelineEvent};

/// Append one event authored by `actor`.
pub fn record(
    conn: &Connection,
    appointment_id: &Uuid,
    actor: &Actor,
    message: &str,
    at: DateTime<Utc>,
) -> Result<TimelineEvent, DatabaseError> {
    let message = message.trim();
    let id = repository::insert_timeline_event(
        conn,
        appointment_id,
        Some(actor.role),
        Some(&actor.display_name),
        message,
        &at,
    )?;

    Ok(TimelineEvent {
        id,
        appointment_id: *appointment_id,
        actor_role: Some(actor.role),
        actor_name: Some(actor.display_name.clone()),
        message: message.to_string(),
        created_at: at,
    })
}

/// All events for an appointment, oldest first.
pub fn for_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Vec<TimelineEvent>, DatabaseError> {
    repository::list_timeline_for_appointment(conn, appointment_id)
}

/// Newest events across a doctor's appointments.
pub fn recent_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
    limit: u32,
) -> Result<Vec<TimelineEvent>, DatabaseError> {
    repository::list_recent_timeline_for_doctor(conn, doctor_id, limit)
}

// ─── Messages ─────────────────────────────────────────────────────────────────

fn display_day(day: &NaiveDate) -> String {
    day.format("%d %b %Y").to_string()
}

fn display_actor(actor: &Actor) -> String {
    match actor.role {
        ActorRole::Doctor => format!("Dr. {}", actor.display_name),
        _ => actor.display_name.clone(),
    }
}

pub fn booked_message(actor: &Actor, label: &str, day: &NaiveDate) -> String {
    format!("{} booked {} on {}.", actor.display_name, label, display_day(day))
}

pub fn cancelled_message(actor: &Actor, appointment: &Appointment) -> String {
    format!(
        "{} cancelled {} on {}.",
        display_actor(actor),
        appointment.label,
        display_day(&appointment.day)
    )
}

pub fn completed_message(actor: &Actor) -> String {
    format!("{} marked the visit complete.", display_actor(actor))
}

pub fn treatment_saved_message(actor: &Actor) -> String {
    format!(
        "Treatment details saved and visit marked complete by {}.",
        display_actor(actor)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::enums::AppointmentStatus;

    fn seed_appointment(conn: &Connection, doctor_id: Uuid) -> Appointment {
        let now = Utc::now();
        let appt = Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id,
            day: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            label: "morning".into(),
            status: AppointmentStatus::Booked,
            reason: None,
            cancelled_by: None,
            created_at: now,
            updated_at: now,
        };
        repository::insert_appointment(conn, &appt).unwrap();
        appt
    }

    #[test]
    fn record_appends_in_order() {
        let conn = open_memory_database().unwrap();
        let doctor = Actor::doctor(Uuid::new_v4(), "House");
        let appt = seed_appointment(&conn, doctor.id);

        record(&conn, &appt.id, &doctor, "first", Utc::now()).unwrap();
        record(&conn, &appt.id, &doctor, "  second  ", Utc::now()).unwrap();

        let events = for_appointment(&conn, &appt.id).unwrap();
        let messages: Vec<_> = events.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(events[0].actor_name.as_deref(), Some("House"));
        assert_eq!(events[0].actor_role, Some(ActorRole::Doctor));
    }

    #[test]
    fn doctor_feed_is_newest_first_and_scoped() {
        let conn = open_memory_database().unwrap();
        let doctor = Actor::doctor(Uuid::new_v4(), "House");
        let other = Actor::doctor(Uuid::new_v4(), "Wilson");
        let a = seed_appointment(&conn, doctor.id);
        let b = seed_appointment(&conn, other.id);

        let t0 = Utc::now();
        record(&conn, &a.id, &doctor, "older", t0).unwrap();
        record(&conn, &a.id, &doctor, "newer", t0 + chrono::Duration::seconds(5)).unwrap();
        record(&conn, &b.id, &other, "elsewhere", t0).unwrap();

        let feed = recent_for_doctor(&conn, &doctor.id, 10).unwrap();
        let messages: Vec<_> = feed.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["newer", "older"]);

        let limited = recent_for_doctor(&conn, &doctor.id, 1).unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn messages_name_actor_slot_and_day() {
        let patient = Actor::patient(Uuid::new_v4(), "Ada Lovelace");
        let doctor = Actor::doctor(Uuid::new_v4(), "Gregory House");
        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();

        assert_eq!(
            booked_message(&patient, "08:00 - 12:00 am", &day),
            "Ada Lovelace booked 08:00 - 12:00 am on 10 Jun 2024."
        );
        assert_eq!(
            completed_message(&doctor),
            "Dr. Gregory House marked the visit complete."
        );
        assert_eq!(
            treatment_saved_message(&doctor),
            "Treatment details saved and visit marked complete by Dr. Gregory House."
        );
    }

    #[test]
    fn cancellation_message_depends_on_who_cancelled() {
        let conn = open_memory_database().unwrap();
        let appt = seed_appointment(&conn, Uuid::new_v4());
        let patient = Actor::patient(appt.patient_id, "Ada");
        let doctor = Actor::doctor(appt.doctor_id, "House");

        assert_eq!(
            cancelled_message(&patient, &appt),
            "Ada cancelled morning on 10 Jun 2024."
        );
        assert_eq!(
            cancelled_message(&doctor, &appt),
            "Dr. House cancelled morning on 10 Jun 2024."
        );
    }
}
