// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Category, Event, EventDate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub category: Category,
}

impl EventDraft {
    pub fn blank() -> Self {
        Self {
            title: String::new(),
            category: Category::Todo,
        }
    }

    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            category: event.category.clone(),
        }
    }
}

impl Default for EventDraft {
    fn default() -> Self {
        Self::blank()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: EventDate,
    pub end: Option<EventDate>,
}

impl DateRange {
    pub fn new(start: impl Into<EventDate>, end: Option<EventDate>) -> Self {
        Self {
            start: start.into(),
            end,
        }
    }

    pub fn of_event(event: &Event) -> Self {
        Self {
            start: event.start.clone(),
            end: event.end.clone(),
        }
    }

    pub fn empty() -> Self {
        Self {
            start: EventDate::new(""),
            end: None,
        }
    }
}

/// Replacement for every mutable field of a task, produced by a dialog save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPatch {
    pub title: String,
    pub category: Category,
    pub start: EventDate,
    pub end: Option<EventDate>,
}

impl EventPatch {
    pub fn from_parts(draft: EventDraft, range: DateRange) -> Self {
        Self {
            title: draft.title,
            category: draft.category,
            start: range.start,
            end: range.end,
        }
    }

    pub fn apply_to(self, event: &mut Event) {
        event.title = self.title;
        event.category = self.category;
        event.start = self.start;
        event.end = self.end;
    }
}

/// New span from a drag or resize; title and category are untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reschedule {
    pub start: EventDate,
    pub end: Option<EventDate>,
}

impl Reschedule {
    pub fn apply_to(self, event: &mut Event) {
        event.start = self.start;
        event.end = self.end;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit,
}

/// What the dialog needs to render itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub mode: DialogMode,
    pub draft: EventDraft,
    pub range: DateRange,
}

impl DialogView {
    pub const fn title(&self) -> &'static str {
        match self.mode {
            DialogMode::Create => "Add Task",
            DialogMode::Edit => "Edit Task",
        }
    }

    pub const fn can_delete(&self) -> bool {
        matches!(self.mode, DialogMode::Edit)
    }
}
