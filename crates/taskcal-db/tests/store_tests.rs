// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use taskcal_app::{
    Category, DateRange, EventDate, EventDraft, EventId, EventPatch, FilterCriteria, Mutation,
    Reschedule, visible,
};
use taskcal_db::{
    Applied, DEFAULT_STORAGE_KEY, EventStore, KeyValueStore, MemoryKv, Store, TaskFaker,
    validate_db_path,
};
use taskcal_testkit::{RecordingKv, draft_event, event, temp_db_path};
use time::{Date, Month};

fn seeded_with_draft() -> Result<RecordingKv> {
    RecordingKv::with_entry(
        DEFAULT_STORAGE_KEY,
        &serde_json::to_string(&[draft_event()])?,
    )
}

#[test]
fn validate_db_path_rejects_uri_forms() {
    assert!(validate_db_path("file:test.db").is_err());
    assert!(validate_db_path("https://example.com/db.sqlite").is_err());
    assert!(validate_db_path("db.sqlite?mode=ro").is_err());
    assert!(validate_db_path("").is_err());
    assert!(validate_db_path(":memory:").is_ok());
    assert!(validate_db_path("/tmp/taskcal.db").is_ok());
}

#[test]
fn create_into_empty_store_saves_one_element_array() -> Result<()> {
    let mut store = EventStore::load(RecordingKv::new());
    let created = store.create(
        EventDraft {
            title: "Write spec".to_owned(),
            category: Category::Todo,
        },
        DateRange::new("2024-01-01", None),
    )?;

    assert!(!created.id.as_str().is_empty());
    assert_eq!(store.events(), std::slice::from_ref(&created));
    assert_eq!(store.kv().write_count(), 1);
    assert_eq!(store.kv().writes()[0].0, DEFAULT_STORAGE_KEY);
    assert_eq!(store.kv().last_written_events()?, Some(vec![created]));
    Ok(())
}

#[test]
fn back_to_back_creates_get_distinct_ids() -> Result<()> {
    let mut store = EventStore::load(MemoryKv::new());
    let range = DateRange::new("2024-01-01", None);
    let first = store.create(EventDraft::blank(), range.clone())?;
    let second = store.create(EventDraft::blank(), range)?;
    assert_ne!(first.id, second.id);
    Ok(())
}

#[test]
fn save_then_load_round_trips_generated_lists() -> Result<()> {
    let month = Date::from_calendar_date(2024, Month::March, 1)?;
    let mut tasks = TaskFaker::new(11).tasks(25, month);
    tasks.push(event("odd", "", "not a date", Some(""), Category::parse("in progress")));

    let mut kv = MemoryKv::new();
    kv.set(DEFAULT_STORAGE_KEY, &serde_json::to_string(&tasks)?)?;
    let mut store = EventStore::load(kv);
    store.save()?;

    let reloaded = EventStore::load(store.into_kv());
    assert_eq!(reloaded.events(), tasks.as_slice());
    Ok(())
}

#[test]
fn reschedule_commits_new_dates_and_survives_reload() -> Result<()> {
    let mut store = EventStore::load(seeded_with_draft()?);
    let applied = store.apply(Mutation::Reschedule {
        id: EventId::from("1"),
        change: Reschedule {
            start: EventDate::from("2024-02-01"),
            end: Some(EventDate::from("2024-02-02")),
        },
    })?;
    assert_eq!(applied, Applied::Rescheduled(EventId::from("1")));
    assert_eq!(store.kv().write_count(), 1);

    let reloaded = EventStore::load(store.into_kv());
    let moved = reloaded
        .get(&EventId::from("1"))
        .expect("event survives reschedule");
    assert_eq!(moved.start, EventDate::from("2024-02-01"));
    assert_eq!(moved.end, Some(EventDate::from("2024-02-02")));
    assert_eq!(moved.title, "Draft");
    Ok(())
}

#[test]
fn update_replaces_fields_in_place() -> Result<()> {
    let mut store = EventStore::load(seeded_with_draft()?);
    store.create(EventDraft::blank(), DateRange::new("2024-01-09", None))?;

    let changed = store.update(
        &EventId::from("1"),
        EventPatch {
            title: "Draft v2".to_owned(),
            category: Category::Review,
            start: EventDate::from("2024-01-02"),
            end: None,
        },
    )?;
    assert!(changed);
    assert_eq!(store.events()[0].id, EventId::from("1"));
    assert_eq!(store.events()[0].title, "Draft v2");
    assert_eq!(store.events()[0].end, None);
    assert_eq!(store.events().len(), 2);
    Ok(())
}

#[test]
fn deleted_event_is_never_visible_again() -> Result<()> {
    let mut store = EventStore::load(seeded_with_draft()?);
    let applied = store.apply(Mutation::Delete {
        id: EventId::from("1"),
    })?;
    assert_eq!(applied, Applied::Deleted(EventId::from("1")));
    assert!(store.events().is_empty());
    assert!(visible(store.events(), &FilterCriteria::default()).is_empty());

    let reloaded = EventStore::load(store.into_kv());
    assert!(reloaded.get(&EventId::from("1")).is_none());
    Ok(())
}

#[test]
fn sqlite_store_persists_across_connections() -> Result<()> {
    let (_dir, path) = temp_db_path()?;
    {
        let store = Store::open(&path)?;
        store.bootstrap()?;
        let mut events = EventStore::load(store);
        events.create(
            EventDraft {
                title: "Persist me".to_owned(),
                category: Category::Completed,
            },
            DateRange::new("2024-04-01", Some(EventDate::from("2024-04-02"))),
        )?;
    }

    let store = Store::open(&path)?;
    store.bootstrap()?;
    assert_eq!(store.keys()?, vec![DEFAULT_STORAGE_KEY.to_owned()]);
    let events = EventStore::load(store);
    assert_eq!(events.events().len(), 1);
    assert_eq!(events.events()[0].title, "Persist me");
    assert_eq!(events.events()[0].category, Category::Completed);
    Ok(())
}

#[test]
fn sqlite_set_overwrites_previous_value() -> Result<()> {
    let mut store = Store::open_memory()?;
    store.bootstrap()?;
    assert_eq!(store.get("k")?, None);
    store.set("k", "one")?;
    store.set("k", "two")?;
    assert_eq!(store.get("k")?.as_deref(), Some("two"));
    Ok(())
}

#[test]
fn bootstrap_rejects_table_missing_required_column() -> Result<()> {
    let store = Store::open_memory()?;
    store
        .raw_connection()
        .execute_batch("CREATE TABLE kv_entries (key TEXT PRIMARY KEY, value TEXT NOT NULL);")?;

    let err = store
        .bootstrap()
        .expect_err("schema validation should fail");
    let message = err.to_string();
    assert!(message.contains("table `kv_entries` is missing required columns"));
    assert!(message.contains("updated_at"));
    Ok(())
}

#[test]
fn corrupt_sqlite_payload_loads_empty() -> Result<()> {
    let mut store = Store::open_memory()?;
    store.bootstrap()?;
    store.set(DEFAULT_STORAGE_KEY, "[{\"id\":")?;
    let events = EventStore::load(store);
    assert!(events.events().is_empty());
    Ok(())
}
