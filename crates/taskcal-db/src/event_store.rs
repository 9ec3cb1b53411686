// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use taskcal_app::{DateRange, Event, EventDraft, EventId, EventPatch, Mutation, Reschedule};
use time::Date;
use uuid::Uuid;

use crate::KeyValueStore;
use crate::demo::TaskFaker;

/// Key the task list has always been stored under.
pub const DEFAULT_STORAGE_KEY: &str = "calendarEvents";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Created(Event),
    Updated(EventId),
    Rescheduled(EventId),
    Deleted(EventId),
    /// The id was not in the list; nothing changed and nothing was written.
    Missing(EventId),
}

/// Authoritative task list, written through to a [`KeyValueStore`] after
/// every mutation.
pub struct EventStore<K> {
    kv: K,
    key: String,
    events: Vec<Event>,
}

impl<K: KeyValueStore> EventStore<K> {
    pub fn load(kv: K) -> Self {
        Self::load_with_key(kv, DEFAULT_STORAGE_KEY)
    }

    /// Reads the persisted list once. A missing, unreadable or malformed
    /// payload starts an empty list.
    pub fn load_with_key(kv: K, key: impl Into<String>) -> Self {
        let key = key.into();
        let events = read_events(&kv, &key);
        tracing::debug!(key = %key, count = events.len(), "loaded events");
        Self { kv, key, events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|event| &event.id == id)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn into_kv(self) -> K {
        self.kv
    }

    pub fn save(&mut self) -> Result<()> {
        let payload = serde_json::to_string(&self.events).context("serialize events")?;
        self.kv
            .set(&self.key, &payload)
            .with_context(|| format!("write events under key {:?}", self.key))?;
        tracing::debug!(key = %self.key, count = self.events.len(), "saved events");
        Ok(())
    }

    /// Appends `count` generated tasks starting in the month of `month_start`
    /// and saves once.
    pub fn seed_demo_data(&mut self, seed: u64, count: usize, month_start: Date) -> Result<usize> {
        let tasks = TaskFaker::new(seed).tasks(count, month_start);
        self.events.extend(tasks);
        self.save()?;
        tracing::info!(count, "seeded demo tasks");
        Ok(count)
    }

    pub fn create(&mut self, draft: EventDraft, range: DateRange) -> Result<Event> {
        let event = Event {
            id: EventId::new(Uuid::new_v4().to_string()),
            title: draft.title,
            start: range.start,
            end: range.end,
            category: draft.category,
        };
        tracing::info!(id = %event.id, start = %event.start, "created event");
        self.events.push(event.clone());
        self.save()?;
        Ok(event)
    }

    /// Returns `false` without writing when `id` is unknown.
    pub fn update(&mut self, id: &EventId, patch: EventPatch) -> Result<bool> {
        let Some(event) = self.find_mut(id) else {
            tracing::debug!(id = %id, "update skipped; unknown id");
            return Ok(false);
        };
        patch.apply_to(event);
        tracing::info!(id = %id, "updated event");
        self.save()?;
        Ok(true)
    }

    pub fn reschedule(&mut self, id: &EventId, change: Reschedule) -> Result<bool> {
        let Some(event) = self.find_mut(id) else {
            tracing::debug!(id = %id, "reschedule skipped; unknown id");
            return Ok(false);
        };
        change.apply_to(event);
        tracing::info!(id = %id, start = %event.start, "rescheduled event");
        self.save()?;
        Ok(true)
    }

    pub fn delete(&mut self, id: &EventId) -> Result<bool> {
        let before = self.events.len();
        self.events.retain(|event| &event.id != id);
        if self.events.len() == before {
            tracing::debug!(id = %id, "delete skipped; unknown id");
            return Ok(false);
        }
        tracing::info!(id = %id, "deleted event");
        self.save()?;
        Ok(true)
    }

    pub fn apply(&mut self, mutation: Mutation) -> Result<Applied> {
        let (id, changed, applied) = match mutation {
            Mutation::Create { draft, range } => {
                return self.create(draft, range).map(Applied::Created);
            }
            Mutation::Update { id, patch } => {
                let changed = self.update(&id, patch)?;
                (id.clone(), changed, Applied::Updated(id))
            }
            Mutation::Reschedule { id, change } => {
                let changed = self.reschedule(&id, change)?;
                (id.clone(), changed, Applied::Rescheduled(id))
            }
            Mutation::Delete { id } => {
                let changed = self.delete(&id)?;
                (id.clone(), changed, Applied::Deleted(id))
            }
        };
        Ok(if changed { applied } else { Applied::Missing(id) })
    }

    fn find_mut(&mut self, id: &EventId) -> Option<&mut Event> {
        self.events.iter_mut().find(|event| &event.id == id)
    }
}

fn read_events<K: KeyValueStore>(kv: &K, key: &str) -> Vec<Event> {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(error) => {
            let error = format!("{error:#}");
            tracing::warn!(key = %key, error = %error, "cannot read stored events, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Event>>(&raw) {
        Ok(events) => events,
        Err(error) => {
            tracing::warn!(key = %key, error = %error, "stored events are malformed, starting empty");
            Vec::new()
        }
    }
}
