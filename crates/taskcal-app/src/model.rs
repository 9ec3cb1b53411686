// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::ids::EventId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Category {
    Todo,
    InProgress,
    Review,
    Completed,
    /// Any other non-empty label found in stored data.
    Other(String),
    /// Absent or empty on the wire.
    #[default]
    Unset,
}

impl Category {
    /// Choices offered by the task dialog, in display order.
    pub const CHOICES: [Self; 4] = [Self::Todo, Self::InProgress, Self::Review, Self::Completed];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inprogress",
            Self::Review => "review",
            Self::Completed => "completed",
            Self::Other(label) => label.as_str(),
            Self::Unset => "",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "" => Self::Unset,
            "todo" => Self::Todo,
            "inprogress" => Self::InProgress,
            "review" => Self::Review,
            "completed" => Self::Completed,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Review => "Review",
            Self::Completed => "Completed",
            Self::Other(_) => "Other",
            Self::Unset => "Uncategorized",
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn style(&self) -> CategoryStyle {
        match self {
            Self::Todo => CategoryStyle::new("#fef3c7", "#92400e"),
            Self::InProgress => CategoryStyle::new("#dbeafe", "#1e3a8a"),
            Self::Review => CategoryStyle::new("#ede9fe", "#6b21a8"),
            Self::Completed => CategoryStyle::new("#dcfce7", "#166534"),
            Self::Other(_) | Self::Unset => CategoryStyle::NEUTRAL,
        }
    }
}

impl From<Option<String>> for Category {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Self::parse).unwrap_or_default()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Other(label) => label,
            other => other.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryStyle {
    pub background: &'static str,
    pub text: &'static str,
}

impl CategoryStyle {
    pub const NEUTRAL: Self = Self::new("#f3f4f6", "#111827");

    const fn new(background: &'static str, text: &'static str) -> Self {
        Self { background, text }
    }
}

/// Date string exactly as reported by a calendar gesture or read from storage.
///
/// Accepted shapes are `2024-01-01`, `2024-01-01T10:00:00` and RFC 3339.
/// Anything else is kept verbatim and simply has no [`EventDate::instant`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventDate(String);

impl EventDate {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Gesture end dates arrive as empty strings when the calendar has none.
    pub fn optional(value: &str) -> Option<Self> {
        if value.is_empty() {
            None
        } else {
            Some(Self::new(value))
        }
    }

    pub fn from_date(date: Date) -> Self {
        Self(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn instant(&self) -> Option<OffsetDateTime> {
        let raw = self.0.trim();
        if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
            return Some(value);
        }

        if let Ok(value) = PrimitiveDateTime::parse(
            raw,
            &format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        ) {
            return Some(value.assume_utc());
        }

        if let Ok(value) = PrimitiveDateTime::parse(
            raw,
            &format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        ) {
            return Some(value.assume_utc());
        }

        Date::parse(raw, &format_description!("[year]-[month]-[day]"))
            .ok()
            .map(|date| date.midnight().assume_utc())
    }
}

impl From<&str> for EventDate {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(default)]
    pub title: String,
    pub start: EventDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDate>,
    #[serde(default, skip_serializing_if = "Category::is_unset")]
    pub category: Category,
}

impl Event {
    /// End of the span, falling back to `start` for single-day tasks.
    ///
    /// A stored empty `end` counts as no end.
    pub fn effective_end(&self) -> &EventDate {
        self.end
            .as_ref()
            .filter(|end| !end.as_str().is_empty())
            .unwrap_or(&self.start)
    }
}
