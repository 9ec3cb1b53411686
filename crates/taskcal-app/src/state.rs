// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    Category, DateRange, DialogMode, DialogView, Event, EventDraft, EventId, EventPatch,
    Reschedule,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Closed,
    Creating,
    Editing(EventId),
}

/// A change to the persisted task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create { draft: EventDraft, range: DateRange },
    Update { id: EventId, patch: EventPatch },
    Delete { id: EventId },
    /// Drag or resize on the calendar. Never produced by the dialog.
    Reschedule { id: EventId, change: Reschedule },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SelectRange(DateRange),
    OpenEvent(Event),
    SetTitle(String),
    SetCategory(Category),
    SetRange(DateRange),
    Save,
    Delete,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Opened(DialogMode),
    DraftChanged,
    Commit(Mutation),
    Closed,
    Ignored,
}

/// Create/edit dialog state. Discarded on close whatever the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSession {
    state: SessionState,
    draft: EventDraft,
    range: DateRange,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self {
            state: SessionState::Closed,
            draft: EventDraft::blank(),
            range: DateRange::empty(),
        }
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, SessionState::Closed)
    }

    pub fn selected_event_id(&self) -> Option<&EventId> {
        match &self.state {
            SessionState::Editing(id) => Some(id),
            SessionState::Closed | SessionState::Creating => None,
        }
    }

    pub fn draft(&self) -> &EventDraft {
        &self.draft
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn view(&self) -> Option<DialogView> {
        let mode = match self.state {
            SessionState::Closed => return None,
            SessionState::Creating => DialogMode::Create,
            SessionState::Editing(_) => DialogMode::Edit,
        };
        Some(DialogView {
            mode,
            draft: self.draft.clone(),
            range: self.range.clone(),
        })
    }

    pub fn dispatch(&mut self, command: SessionCommand) -> Vec<SessionEvent> {
        match command {
            SessionCommand::SelectRange(range) => {
                if self.is_open() {
                    return vec![SessionEvent::Ignored];
                }
                self.state = SessionState::Creating;
                self.draft = EventDraft::blank();
                self.range = range;
                vec![SessionEvent::Opened(DialogMode::Create)]
            }
            SessionCommand::OpenEvent(event) => {
                if self.is_open() {
                    return vec![SessionEvent::Ignored];
                }
                self.draft = EventDraft::from_event(&event);
                self.range = DateRange::of_event(&event);
                self.state = SessionState::Editing(event.id);
                vec![SessionEvent::Opened(DialogMode::Edit)]
            }
            SessionCommand::SetTitle(title) => self.edit(|draft, _| draft.title = title),
            SessionCommand::SetCategory(category) => {
                self.edit(|draft, _| draft.category = category)
            }
            SessionCommand::SetRange(range) => self.edit(|_, current| *current = range),
            SessionCommand::Save => self.save(),
            SessionCommand::Delete => self.delete(),
            SessionCommand::Cancel => {
                if !self.is_open() {
                    return vec![SessionEvent::Ignored];
                }
                self.close();
                vec![SessionEvent::Closed]
            }
        }
    }

    fn edit(&mut self, apply: impl FnOnce(&mut EventDraft, &mut DateRange)) -> Vec<SessionEvent> {
        if !self.is_open() {
            return vec![SessionEvent::Ignored];
        }
        apply(&mut self.draft, &mut self.range);
        vec![SessionEvent::DraftChanged]
    }

    fn save(&mut self) -> Vec<SessionEvent> {
        let draft = self.draft.clone();
        let range = self.range.clone();
        let mutation = match &self.state {
            SessionState::Closed => return vec![SessionEvent::Ignored],
            SessionState::Creating => Mutation::Create { draft, range },
            SessionState::Editing(id) => Mutation::Update {
                id: id.clone(),
                patch: EventPatch::from_parts(draft, range),
            },
        };
        self.close();
        vec![SessionEvent::Commit(mutation), SessionEvent::Closed]
    }

    fn delete(&mut self) -> Vec<SessionEvent> {
        let SessionState::Editing(id) = &self.state else {
            return vec![SessionEvent::Ignored];
        };
        let mutation = Mutation::Delete { id: id.clone() };
        self.close();
        vec![SessionEvent::Commit(mutation), SessionEvent::Closed]
    }

    fn close(&mut self) {
        *self = Self::default();
    }
}
