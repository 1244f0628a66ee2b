use super::*;
use crate::core::booking::{Booking, ClientDetails, RequiredFields, Session, SessionTypeOption};
use crate::core::calendar::CalendarDate;
use crate::core::dashboard::{Dashboard, NewGoal};
use crate::core::error::{BookingError, StorageError};
use crate::core::slots::TimeSlot;
use crate::core::wizard::{WizardSession, WizardStep};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

struct FailingStore;

impl Store for FailingStore {
    fn append(&mut self, _collection: Collection, _record: Value) -> Result<(), StorageError> {
        Err(StorageError::Io("disk full".into()))
    }

    fn read_all(&self, _collection: Collection) -> Result<Vec<Value>, StorageError> {
        Ok(vec![])
    }

    fn replace_all(
        &mut self,
        _collection: Collection,
        _records: Vec<Value>,
    ) -> Result<(), StorageError> {
        Err(StorageError::Io("disk full".into()))
    }
}

fn today() -> CalendarDate {
    CalendarDate::new(2026, 9, 17).unwrap()
}

fn details(first: &str) -> ClientDetails {
    ClientDetails {
        first_name: first.into(),
        last_name: "B".into(),
        email: "a@b.com".into(),
        ..Default::default()
    }
}

fn ready_wizard(first: &str) -> WizardSession {
    let mut wizard = WizardSession::new(today(), RequiredFields::default());
    wizard
        .select_session_type(SessionTypeOption::new("individual", "Individual Session", 7500, 45))
        .unwrap();
    wizard.next_step().unwrap();
    wizard
        .select_date(CalendarDate::new(2026, 9, 20).unwrap(), today())
        .unwrap();
    wizard.select_time(TimeSlot::from_hour(14).unwrap()).unwrap();
    wizard.next_step().unwrap();
    wizard.enter_details(details(first)).unwrap();
    wizard
}

#[test]
fn test_json_store_missing_collection_is_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let store = JsonStore::open_at(tmp.path().join("data")).unwrap();
    assert!(store.read_all(Collection::Bookings).unwrap().is_empty());
    assert!(tmp.path().join("data").is_dir());
}

#[test]
fn test_json_store_append_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let mut store = JsonStore::open_at(tmp.path()).unwrap();
        store.append(Collection::Goals, json!({"n": 1})).unwrap();
        store.append(Collection::Goals, json!({"n": 2})).unwrap();
    }

    let store = JsonStore::open_at(tmp.path()).unwrap();
    let records = store.read_all(Collection::Goals).unwrap();
    assert_eq!(records, vec![json!({"n": 1}), json!({"n": 2})]);
    assert!(store.read_all(Collection::Sessions).unwrap().is_empty());
    assert!(store.collection_path(Collection::Goals).ends_with("goals.json"));
}

#[test]
fn test_json_store_replace_all_overwrites() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = JsonStore::open_at(tmp.path()).unwrap();
    store.append(Collection::Sessions, json!({"old": true})).unwrap();
    store
        .replace_all(Collection::Sessions, vec![json!({"new": true})])
        .unwrap();
    assert_eq!(
        store.read_all(Collection::Sessions).unwrap(),
        vec![json!({"new": true})]
    );
}

#[test]
fn test_json_store_rejects_non_array() {
    let tmp = tempfile::tempdir().unwrap();
    let store = JsonStore::open_at(tmp.path()).unwrap();
    std::fs::write(store.collection_path(Collection::Bookings), "{\"a\":1}").unwrap();
    let err = store.read_all(Collection::Bookings).unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[test]
fn test_read_records_skips_malformed() {
    let mut store = MemoryStore::new();
    let booking = ready_wizard("A").confirm(Utc::now()).unwrap().booking;
    append_record(&mut store, Collection::Bookings, &booking).unwrap();
    store
        .append(Collection::Bookings, json!({"sessionType": "legacy"}))
        .unwrap();

    let bookings: Vec<Booking> = read_records(&store, Collection::Bookings).unwrap();
    assert_eq!(store.len(Collection::Bookings), 2);
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0], booking);
}

#[test]
fn test_read_records_skips_impossible_dates() {
    let mut store = MemoryStore::new();
    let booking = ready_wizard("A").confirm(Utc::now()).unwrap().booking;
    let mut record = serde_json::to_value(&booking).unwrap();
    record["date"] = json!("2026-11-31");
    store.append(Collection::Bookings, record).unwrap();

    let bookings: Vec<Booking> = read_records(&store, Collection::Bookings).unwrap();
    assert!(bookings.is_empty());
}

#[test]
fn test_last_client_details_uses_newest_booking() {
    let mut store = MemoryStore::new();
    assert!(last_client_details(&store).unwrap().is_none());

    let newer = ready_wizard("Newer")
        .confirm(Utc.with_ymd_and_hms(2026, 10, 2, 9, 0, 0).unwrap())
        .unwrap();
    let older = ready_wizard("Older")
        .confirm(Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap())
        .unwrap();
    append_record(&mut store, Collection::Bookings, &newer.booking).unwrap();
    append_record(&mut store, Collection::Bookings, &older.booking).unwrap();

    let prefill = last_client_details(&store).unwrap().unwrap();
    assert_eq!(prefill.first_name, "Newer");
}

#[test]
fn test_confirm_and_save_writes_booking_and_session() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = JsonStore::open_at(tmp.path()).unwrap();
    let mut wizard = ready_wizard("A");

    let confirmation = wizard.confirm_and_save(&mut store, Utc::now()).unwrap();

    let bookings: Vec<Booking> = read_records(&store, Collection::Bookings).unwrap();
    let sessions: Vec<Session> = read_records(&store, Collection::Sessions).unwrap();
    assert_eq!(bookings, vec![confirmation.booking.clone()]);
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].booking_id.as_deref(), Some(bookings[0].id.as_str()));
    assert_eq!(wizard.step(), WizardStep::Confirmed);
}

#[test]
fn test_persistence_failure_keeps_confirmation() {
    let mut wizard = ready_wizard("A");
    let err = wizard.confirm_and_save(&mut FailingStore, Utc::now()).unwrap_err();

    let booking_id = match err {
        BookingError::PersistenceFailure { booking_id, .. } => booking_id,
        other => panic!("Expected PersistenceFailure, got {other:?}"),
    };
    assert_eq!(wizard.step(), WizardStep::Confirmed);
    let kept = wizard.confirmation().unwrap();
    assert_eq!(kept.booking.id, booking_id);

    // The wizard is finished; a retry must not emit a second booking.
    let retry = wizard.confirm_and_save(&mut MemoryStore::new(), Utc::now());
    assert!(matches!(
        retry,
        Err(BookingError::InvalidStateTransition { .. })
    ));
}

#[test]
fn test_dashboard_round_trip_and_sync() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = JsonStore::open_at(tmp.path()).unwrap();

    let confirmation = ready_wizard("A").confirm(Utc::now()).unwrap();
    append_record(&mut store, Collection::Bookings, &confirmation.booking).unwrap();

    let mut dashboard = Dashboard::load(&store).unwrap();
    assert!(dashboard.goals.is_empty());
    dashboard.create_goal(
        NewGoal {
            title: "Morning Meditation".into(),
            milestones: vec!["Download app".into(), "  ".into()],
            ..Default::default()
        },
        Utc::now(),
    );
    let bookings: Vec<Booking> = read_records(&store, Collection::Bookings).unwrap();
    assert_eq!(dashboard.sync_from_bookings(&bookings), 1);
    dashboard.save(&mut store).unwrap();

    let reloaded = Dashboard::load(&store).unwrap();
    assert_eq!(reloaded.goals.len(), 1);
    assert_eq!(reloaded.goals[0].milestones.len(), 1);
    assert_eq!(reloaded.sessions.len(), 1);
    assert_eq!(
        reloaded.sessions[0].booking_id.as_deref(),
        Some(confirmation.booking.id.as_str())
    );
}

#[test]
fn test_dashboard_save_surfaces_storage_error() {
    let dashboard = Dashboard::default();
    assert!(dashboard.save(&mut FailingStore).is_err());
}
