// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use taskcal_app::{
    Category, DateRange, DialogView, EditorSession, Event, EventDate, EventId, FilterCriteria,
    Mutation, Reschedule, SessionCommand, SessionEvent, TimeWindow, visible,
};
use taskcal_db::{Applied, EventStore, KeyValueStore};

/// Routes calendar gestures and dialog intents to the editor session and
/// the event store, and answers what the calendar should show.
pub struct CalendarRuntime<K> {
    store: EventStore<K>,
    session: EditorSession,
    criteria: FilterCriteria,
}

impl<K: KeyValueStore> CalendarRuntime<K> {
    pub fn new(store: EventStore<K>) -> Self {
        Self {
            store,
            session: EditorSession::new(),
            criteria: FilterCriteria::default(),
        }
    }

    pub fn store(&self) -> &EventStore<K> {
        &self.store
    }

    pub fn into_store(self) -> EventStore<K> {
        self.store
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn dialog(&self) -> Option<DialogView> {
        self.session.view()
    }

    pub fn visible(&self) -> Vec<Event> {
        if self.criteria.is_identity() {
            return self.store.events().to_vec();
        }
        visible(self.store.events(), &self.criteria)
    }

    pub fn on_range_select(&mut self, start: EventDate, end: Option<EventDate>) -> Result<()> {
        self.dispatch(SessionCommand::SelectRange(DateRange { start, end }))
            .map(|_| ())
    }

    /// Opens the edit dialog. Clicking an id that is not in the store does nothing.
    pub fn on_event_click(&mut self, id: &EventId) -> Result<bool> {
        let Some(event) = self.store.get(id).cloned() else {
            tracing::debug!(id = %id, "click on unknown event ignored");
            return Ok(false);
        };
        self.dispatch(SessionCommand::OpenEvent(event))?;
        Ok(self.session.is_open())
    }

    /// Drag or resize commit. Bypasses the dialog entirely.
    pub fn on_event_change(
        &mut self,
        id: &EventId,
        start: EventDate,
        end: Option<EventDate>,
    ) -> Result<Applied> {
        self.store.apply(Mutation::Reschedule {
            id: id.clone(),
            change: Reschedule { start, end },
        })
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.dispatch(SessionCommand::SetTitle(title.into()))
            .map(|_| ())
    }

    pub fn set_category(&mut self, category: Category) -> Result<()> {
        self.dispatch(SessionCommand::SetCategory(category))
            .map(|_| ())
    }

    pub fn set_range(&mut self, range: DateRange) -> Result<()> {
        self.dispatch(SessionCommand::SetRange(range)).map(|_| ())
    }

    pub fn save(&mut self) -> Result<Option<Applied>> {
        self.dispatch(SessionCommand::Save)
    }

    pub fn delete(&mut self) -> Result<Option<Applied>> {
        self.dispatch(SessionCommand::Delete)
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.dispatch(SessionCommand::Cancel).map(|_| ())
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.criteria.search_term = term.into();
    }

    pub fn set_category_filter(&mut self, category: Option<Category>) {
        self.criteria.category = category;
    }

    pub fn set_time_window(&mut self, window: TimeWindow) {
        self.criteria.time_window = window;
    }

    fn dispatch(&mut self, command: SessionCommand) -> Result<Option<Applied>> {
        let mut applied = None;
        for event in self.session.dispatch(command) {
            match event {
                SessionEvent::Commit(mutation) => {
                    applied = Some(self.store.apply(mutation)?);
                }
                SessionEvent::Ignored => {
                    tracing::debug!(state = ?self.session.state(), "dialog command ignored");
                }
                SessionEvent::Opened(_) | SessionEvent::DraftChanged | SessionEvent::Closed => {}
            }
        }
        Ok(applied)
    }
}
