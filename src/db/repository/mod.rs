//! Repository layer: entity-scoped database operations.
//!
//! Plain functions over `&Connection`, so callers can pass either a
//! connection or an open `Transaction`. All public functions are
//! re-exported here.

mod appointment;
mod slot;
mod timeline;
mod treatment;

use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::Row;
use uuid::Uuid;

use super::DatabaseError;

// Re-export all public items from sub-modules
pub use appointment::*;
pub use slot::*;
pub use timeline::*;
pub use treatment::*;

/// Ids are stored as hyphenated UUID text.
pub(crate) fn uuid_column(row: &Row, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn enum_column<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = DatabaseError>,
{
    let raw: String = row.get(idx)?;
    T::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn optional_enum_column<T>(row: &Row, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr<Err = DatabaseError>,
{
    match row.get::<_, Option<String>>(idx)? {
        Some(raw) => T::from_str(&raw)
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use crate::db::sqlite::open_memory_database;
    use crate::models::*;
    use crate::models::enums::*;
    use rusqlite::Connection;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn make_slot(conn: &Connection, doctor_id: Uuid, d: u32, label: &str) -> Slot {
        let slot = Slot {
            id: Uuid::new_v4(),
            doctor_id,
            day: day(d),
            label: label.into(),
            is_open: true,
        };
        insert_slot(conn, &slot).unwrap();
        slot
    }

    fn make_appointment(conn: &Connection, doctor_id: Uuid, d: u32, label: &str) -> Appointment {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let appt = Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id,
            day: day(d),
            label: label.into(),
            status: AppointmentStatus::Booked,
            reason: Some("Checkup".into()),
            cancelled_by: None,
            created_at: now,
            updated_at: now,
        };
        insert_appointment(conn, &appt).unwrap();
        appt
    }

    #[test]
    fn slot_insert_and_retrieve() {
        let conn = test_db();
        let doctor = Uuid::new_v4();
        let slot = make_slot(&conn, doctor, 10, "morning");

        let loaded = get_slot(&conn, &slot.id).unwrap().unwrap();
        assert_eq!(loaded, slot);
        assert!(get_slot(&conn, &Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn slot_triple_is_unique() {
        let conn = test_db();
        let doctor = Uuid::new_v4();
        make_slot(&conn, doctor, 10, "morning");

        let dup = Slot {
            id: Uuid::new_v4(),
            doctor_id: doctor,
            day: day(10),
            label: "morning".into(),
            is_open: true,
        };
        let err = insert_slot(&conn, &dup).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn slots_listed_by_day_then_label() {
        let conn = test_db();
        let doctor = Uuid::new_v4();
        make_slot(&conn, doctor, 12, "b");
        make_slot(&conn, doctor, 11, "b");
        make_slot(&conn, doctor, 11, "a");

        let slots = list_slots_in_range(&conn, &doctor, &day(10), &day(12), false).unwrap();
        let keys: Vec<_> = slots.iter().map(|s| (s.day, s.label.as_str())).collect();
        assert_eq!(keys, vec![(day(11), "a"), (day(11), "b"), (day(12), "b")]);
    }

    #[test]
    fn close_slot_is_compare_and_swap() {
        let conn = test_db();
        let slot = make_slot(&conn, Uuid::new_v4(), 10, "morning");

        assert!(close_slot(&conn, &slot.id).unwrap());
        assert!(!close_slot(&conn, &slot.id).unwrap());

        let open = list_slots_in_range(&conn, &slot.doctor_id, &day(10), &day(10), true).unwrap();
        assert!(open.is_empty());
    }

    #[test]
    fn open_missing_slot_reports_false() {
        let conn = test_db();
        let opened = open_slot_by_key(&conn, &Uuid::new_v4(), &day(10), "morning").unwrap();
        assert!(!opened);
    }

    #[test]
    fn second_booked_appointment_for_same_key_is_rejected() {
        let conn = test_db();
        let doctor = Uuid::new_v4();
        let first = make_appointment(&conn, doctor, 10, "morning");

        let mut second = first.clone();
        second.id = Uuid::new_v4();
        let err = insert_appointment(&conn, &second).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn cancelled_appointment_frees_the_active_index() {
        let conn = test_db();
        let doctor = Uuid::new_v4();
        let first = make_appointment(&conn, doctor, 10, "morning");
        let now = Utc::now();
        assert!(transition_appointment(
            &conn,
            &first.id,
            AppointmentStatus::Cancelled,
            Some(ActorRole::Patient),
            &now,
        )
        .unwrap());

        let again = make_appointment(&conn, doctor, 10, "morning");
        let booked = find_booked_appointment(&conn, &doctor, &day(10), "morning").unwrap();
        assert_eq!(booked.map(|a| a.id), Some(again.id));
    }

    #[test]
    fn transition_only_leaves_booked() {
        let conn = test_db();
        let appt = make_appointment(&conn, Uuid::new_v4(), 10, "morning");
        let now = Utc::now();

        assert!(transition_appointment(&conn, &appt.id, AppointmentStatus::Completed, None, &now).unwrap());
        assert!(!transition_appointment(
            &conn,
            &appt.id,
            AppointmentStatus::Cancelled,
            Some(ActorRole::Doctor),
            &now,
        )
        .unwrap());

        let loaded = get_appointment(&conn, &appt.id).unwrap().unwrap();
        assert_eq!(loaded.status, AppointmentStatus::Completed);
        assert_eq!(loaded.cancelled_by, None);
        assert_eq!(loaded.updated_at, now);
    }

    #[test]
    fn appointment_round_trips_all_columns() {
        let conn = test_db();
        let appt = make_appointment(&conn, Uuid::new_v4(), 10, "morning");
        let loaded = get_appointment(&conn, &appt.id).unwrap().unwrap();
        assert_eq!(loaded, appt);
    }

    #[test]
    fn timeline_rejects_updates() {
        let conn = test_db();
        let appt = make_appointment(&conn, Uuid::new_v4(), 10, "morning");
        let id = insert_timeline_event(
            &conn,
            &appt.id,
            Some(ActorRole::Patient),
            Some("Pat"),
            "booked",
            &Utc::now(),
        )
        .unwrap();

        let result = conn.execute(
            "UPDATE timeline_events SET message = 'edited' WHERE id = ?1",
            [id],
        );
        assert!(result.is_err());

        let events = list_timeline_for_appointment(&conn, &appt.id).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "booked");
        assert_eq!(events[0].actor_role, Some(ActorRole::Patient));
    }

    #[test]
    fn timeline_requires_existing_appointment() {
        let conn = test_db();
        let err = insert_timeline_event(&conn, &Uuid::new_v4(), None, None, "orphan", &Utc::now())
            .unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn treatment_upsert_overwrites_in_place() {
        let conn = test_db();
        let appt = make_appointment(&conn, Uuid::new_v4(), 10, "morning");
        let mut record = TreatmentRecord::empty(appt.id, Utc::now());
        record.visit_type = Some("In-person".into());
        upsert_treatment_record(&conn, &record).unwrap();

        record.diagnosis = Some("Migraine".into());
        upsert_treatment_record(&conn, &record).unwrap();

        let loaded = get_treatment_record(&conn, &appt.id).unwrap().unwrap();
        assert_eq!(loaded.visit_type.as_deref(), Some("In-person"));
        assert_eq!(loaded.diagnosis.as_deref(), Some("Migraine"));
    }

    #[test]
    fn treatment_history_joins_records_and_filters_by_doctor() {
        let conn = test_db();
        let doctor_a = Uuid::new_v4();
        let doctor_b = Uuid::new_v4();
        let first = make_appointment(&conn, doctor_a, 10, "morning");
        let patient = first.patient_id;

        let mut second = first.clone();
        second.id = Uuid::new_v4();
        second.doctor_id = doctor_b;
        second.day = day(12);
        insert_appointment(&conn, &second).unwrap();

        // no record: must not show up
        let mut third = first.clone();
        third.id = Uuid::new_v4();
        third.day = day(14);
        insert_appointment(&conn, &third).unwrap();

        for appt in [&first, &second] {
            upsert_treatment_record(&conn, &TreatmentRecord::empty(appt.id, Utc::now())).unwrap();
        }

        let all = list_treatment_history(&conn, &patient, None).unwrap();
        let ids: Vec<_> = all.iter().map(|e| e.appointment.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        let only_a = list_treatment_history(&conn, &patient, Some(&doctor_a)).unwrap();
        assert_eq!(only_a.len(), 1);
        assert_eq!(only_a[0].record.appointment_id, first.id);
    }

    #[test]
    fn deleting_appointment_cascades_to_record_and_timeline() {
        let conn = test_db();
        let appt = make_appointment(&conn, Uuid::new_v4(), 10, "morning");
        upsert_treatment_record(&conn, &TreatmentRecord::empty(appt.id, Utc::now())).unwrap();
        insert_timeline_event(&conn, &appt.id, None, None, "booked", &Utc::now()).unwrap();

        conn.execute("DELETE FROM appointments WHERE id = ?1", [appt.id.to_string()])
            .unwrap();

        assert!(get_treatment_record(&conn, &appt.id).unwrap().is_none());
        assert!(list_timeline_for_appointment(&conn, &appt.id).unwrap().is_empty());
    }

    #[test]
    fn dashboard_queries_split_upcoming_and_history() {
        let conn = test_db();
        let doctor = Uuid::new_v4();
        let past = make_appointment(&conn, doctor, 5, "morning");
        let mut future = past.clone();
        future.id = Uuid::new_v4();
        future.day = day(20);
        insert_appointment(&conn, &future).unwrap();

        let today = day(10);
        let upcoming = list_upcoming_for_patient(&conn, &past.patient_id, &today).unwrap();
        assert_eq!(upcoming.iter().map(|a| a.id).collect::<Vec<_>>(), vec![future.id]);

        let history = list_history_for_patient(&conn, &past.patient_id, &today).unwrap();
        assert_eq!(history.iter().map(|a| a.id).collect::<Vec<_>>(), vec![past.id]);

        let doctor_upcoming = list_upcoming_for_doctor(&conn, &doctor, &today).unwrap();
        assert_eq!(doctor_upcoming.len(), 1);

        let now = Utc::now();
        transition_appointment(&conn, &past.id, AppointmentStatus::Completed, None, &now).unwrap();
        let recent = list_recent_activity_for_doctor(&conn, &doctor, 5).unwrap();
        assert_eq!(recent.iter().map(|a| a.id).collect::<Vec<_>>(), vec![past.id]);
    }
}
