// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::path::PathBuf;
use taskcal_app::{Category, Event, EventDate, EventId};
use taskcal_db::{KeyValueStore, MemoryKv};

/// In-memory [`KeyValueStore`] that remembers every write.
#[derive(Debug, Clone, Default)]
pub struct RecordingKv {
    inner: MemoryKv,
    writes: Vec<(String, String)>,
}

impl RecordingKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates `key` without counting it as a write.
    pub fn with_entry(key: &str, value: &str) -> Result<Self> {
        let mut inner = MemoryKv::new();
        inner.set(key, value)?;
        Ok(Self {
            inner,
            writes: Vec::new(),
        })
    }

    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    pub fn writes(&self) -> &[(String, String)] {
        &self.writes
    }

    /// Decodes the payload of the most recent write.
    pub fn last_written_events(&self) -> Result<Option<Vec<Event>>> {
        self.writes
            .last()
            .map(|(key, payload)| {
                serde_json::from_str(payload)
                    .with_context(|| format!("decode payload written under {key}"))
            })
            .transpose()
    }
}

impl KeyValueStore for RecordingKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.writes.push((key.to_owned(), value.to_owned()));
        self.inner.set(key, value)
    }
}

pub fn event(id: &str, title: &str, start: &str, end: Option<&str>, category: Category) -> Event {
    Event {
        id: EventId::from(id),
        title: title.to_owned(),
        start: EventDate::from(start),
        end: end.map(EventDate::from),
        category,
    }
}

/// Two-day todo used across the store and runtime scenarios.
pub fn draft_event() -> Event {
    event(
        "1",
        "Draft",
        "2024-01-01",
        Some("2024-01-03"),
        Category::Todo,
    )
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("taskcal.db");
    Ok((dir, db_path))
}

#[cfg(test)]
mod tests {
    use super::{RecordingKv, draft_event};
    use anyhow::Result;
    use taskcal_app::Category;
    use taskcal_db::KeyValueStore;

    #[test]
    fn recording_kv_counts_only_writes() -> Result<()> {
        let mut kv = RecordingKv::with_entry("k", "[]")?;
        assert_eq!(kv.write_count(), 0);
        assert_eq!(kv.get("k")?.as_deref(), Some("[]"));

        kv.set("k", &serde_json::to_string(&[draft_event()])?)?;
        assert_eq!(kv.write_count(), 1);
        let written = kv.last_written_events()?.unwrap_or_default();
        assert_eq!(written, vec![draft_event()]);
        assert_eq!(written[0].category, Category::Todo);
        Ok(())
    }

    #[test]
    fn last_written_events_is_none_before_any_write() -> Result<()> {
        let kv = RecordingKv::new();
        assert_eq!(kv.last_written_events()?, None);
        assert!(kv.writes().is_empty());
        Ok(())
    }
}
