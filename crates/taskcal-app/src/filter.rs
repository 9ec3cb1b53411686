// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::{Category, Event};

const MILLIS_PER_DAY: i128 = 24 * 60 * 60 * 1000;

/// Upper bound on a task's own span length, in days.
///
/// This measures `end - start` of each task, not its distance from today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    #[default]
    All,
    Within(i64),
}

impl TimeWindow {
    pub const ONE_WEEK: Self = Self::Within(7);
    pub const TWO_WEEKS: Self = Self::Within(14);
    pub const THREE_WEEKS: Self = Self::Within(21);

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "" | "all" => Ok(Self::All),
            "1week" => Ok(Self::ONE_WEEK),
            "2weeks" => Ok(Self::TWO_WEEKS),
            "3weeks" => Ok(Self::THREE_WEEKS),
            other => bail!("unknown time window {other:?}; use one of: 1week, 2weeks, 3weeks, all"),
        }
    }

    pub const fn threshold_days(self) -> Option<i64> {
        match self {
            Self::All => None,
            Self::Within(days) => Some(days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub search_term: String,
    pub category: Option<Category>,
    pub time_window: TimeWindow,
}

impl FilterCriteria {
    /// True when no predicate can reject a task.
    pub fn is_identity(&self) -> bool {
        self.search_term.is_empty()
            && self.category.as_ref().is_none_or(|c| c.as_str().is_empty())
            && self.time_window == TimeWindow::All
    }
}

/// Tasks passing every predicate in `criteria`, in their original order.
pub fn visible(events: &[Event], criteria: &FilterCriteria) -> Vec<Event> {
    let needle = criteria.search_term.to_lowercase();
    events
        .iter()
        .filter(|event| matches_with(event, criteria, &needle))
        .cloned()
        .collect()
}

pub fn matches(event: &Event, criteria: &FilterCriteria) -> bool {
    matches_with(event, criteria, &criteria.search_term.to_lowercase())
}

fn matches_with(event: &Event, criteria: &FilterCriteria, needle: &str) -> bool {
    matches_text(event, needle)
        && matches_category(event, criteria.category.as_ref())
        && matches_window(event, criteria.time_window)
}

fn matches_text(event: &Event, needle: &str) -> bool {
    needle.is_empty() || event.title.to_lowercase().contains(needle)
}

fn matches_category(event: &Event, filter: Option<&Category>) -> bool {
    match filter.map(Category::as_str) {
        None | Some("") => true,
        Some(wanted) => event.category.as_str() == wanted,
    }
}

fn matches_window(event: &Event, window: TimeWindow) -> bool {
    let Some(threshold) = window.threshold_days() else {
        return true;
    };
    // An unparsable date has no span and never satisfies a threshold.
    span_days(event).is_some_and(|days| days <= threshold)
}

/// Whole days from `start` to `end` (or `start` when there is no end), rounded up.
///
/// Negative when `end` precedes `start`; `None` when either date does not parse.
pub fn span_days(event: &Event) -> Option<i64> {
    let start = event.start.instant()?;
    let end = event.effective_end().instant()?;
    let millis = (end - start).whole_milliseconds();
    let mut days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
        days += 1;
    }
    i64::try_from(days).ok()
}

#[cfg(test)]
mod tests {
    use super::{FilterCriteria, TimeWindow, matches, span_days, visible};
    use crate::{Category, Event, EventDate, EventId};

    fn event(id: &str, title: &str, start: &str, end: Option<&str>, category: Category) -> Event {
        Event {
            id: EventId::from(id),
            title: title.to_owned(),
            start: EventDate::from(start),
            end: end.map(EventDate::from),
            category,
        }
    }

    fn draft_event() -> Event {
        event(
            "1",
            "Draft",
            "2024-01-01",
            Some("2024-01-03"),
            Category::Todo,
        )
    }

    fn sample_list() -> Vec<Event> {
        vec![
            draft_event(),
            event("2", "Review PR", "2024-01-05", None, Category::Review),
            event(
                "3",
                "Long migration",
                "2024-01-01",
                Some("2024-01-20"),
                Category::InProgress,
            ),
            event("4", "Loose end", "2024-01-09", None, Category::Unset),
            event(
                "5",
                "Ship draft",
                "2024-02-01",
                Some("2024-03-01"),
                Category::Completed,
            ),
        ]
    }

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|event| event.id.as_str()).collect()
    }

    #[test]
    fn empty_criteria_is_identity() {
        let list = sample_list();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_identity());
        assert_eq!(visible(&list, &criteria), list);
    }

    #[test]
    fn filtered_result_preserves_relative_order() {
        let list = sample_list();
        let criteria = FilterCriteria {
            search_term: "DRAFT".to_owned(),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&visible(&list, &criteria)), vec!["1", "5"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let criteria = FilterCriteria {
            search_term: "raF".to_owned(),
            ..FilterCriteria::default()
        };
        assert!(matches(&draft_event(), &criteria));

        let criteria = FilterCriteria {
            search_term: "nope".to_owned(),
            ..FilterCriteria::default()
        };
        assert!(!matches(&draft_event(), &criteria));
    }

    #[test]
    fn unset_category_only_matches_all() {
        let loose = event("4", "Loose end", "2024-01-09", None, Category::Unset);
        for wanted in Category::CHOICES {
            let criteria = FilterCriteria {
                category: Some(wanted),
                ..FilterCriteria::default()
            };
            assert!(!matches(&loose, &criteria));
        }

        let all = FilterCriteria {
            category: Some(Category::Unset),
            ..FilterCriteria::default()
        };
        assert!(matches(&loose, &all));
        assert!(matches(&loose, &FilterCriteria::default()));
    }

    #[test]
    fn category_mismatch_excludes_event() {
        let criteria = FilterCriteria {
            category: Some(Category::Review),
            ..FilterCriteria::default()
        };
        assert!(visible(&[draft_event()], &criteria).is_empty());
    }

    #[test]
    fn legacy_spaced_label_does_not_match_inprogress_filter() {
        let legacy = event(
            "9",
            "Old",
            "2024-01-01",
            None,
            Category::parse("in progress"),
        );
        let criteria = FilterCriteria {
            category: Some(Category::InProgress),
            ..FilterCriteria::default()
        };
        assert!(!matches(&legacy, &criteria));
    }

    #[test]
    fn one_week_window_keeps_two_day_span() {
        let draft = draft_event();
        assert_eq!(span_days(&draft), Some(2));
        let criteria = FilterCriteria {
            time_window: TimeWindow::parse("1week").expect("known window"),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&visible(&[draft], &criteria)), vec!["1"]);
    }

    #[test]
    fn windows_compare_span_length_against_threshold() {
        let list = sample_list();
        let within = |window| FilterCriteria {
            time_window: window,
            ..FilterCriteria::default()
        };
        assert_eq!(
            ids(&visible(&list, &within(TimeWindow::ONE_WEEK))),
            vec!["1", "2", "4"]
        );
        assert_eq!(
            ids(&visible(&list, &within(TimeWindow::THREE_WEEKS))),
            vec!["1", "2", "3", "4"]
        );
    }

    #[test]
    fn end_before_start_always_passes_window() {
        let backwards = event(
            "6",
            "Backwards",
            "2024-03-10",
            Some("2024-01-01"),
            Category::Todo,
        );
        assert!(span_days(&backwards).is_some_and(|days| days < 0));
        let criteria = FilterCriteria {
            time_window: TimeWindow::ONE_WEEK,
            ..FilterCriteria::default()
        };
        assert!(matches(&backwards, &criteria));
    }

    #[test]
    fn malformed_dates_fail_window_but_not_other_filters() {
        let broken = event("7", "Broken", "soon", None, Category::Todo);
        assert_eq!(span_days(&broken), None);

        let windowed = FilterCriteria {
            time_window: TimeWindow::TWO_WEEKS,
            ..FilterCriteria::default()
        };
        assert!(!matches(&broken, &windowed));
        assert!(matches(&broken, &FilterCriteria::default()));
    }

    #[test]
    fn stored_empty_end_falls_back_to_start() -> Result<(), serde_json::Error> {
        let stored: Event = serde_json::from_str(
            r#"{"id":"1","title":"Draft","start":"2024-01-01","end":"","category":"todo"}"#,
        )?;
        assert_eq!(stored.end, Some(EventDate::from("")));
        assert_eq!(span_days(&stored), Some(0));

        let within_week = FilterCriteria {
            time_window: TimeWindow::ONE_WEEK,
            ..FilterCriteria::default()
        };
        assert_eq!(visible(std::slice::from_ref(&stored), &within_week).len(), 1);
        Ok(())
    }

    #[test]
    fn partial_days_round_up() {
        let timed = event(
            "8",
            "Timed",
            "2024-01-01T10:00:00",
            Some("2024-01-02T11:00:00"),
            Category::Todo,
        );
        assert_eq!(span_days(&timed), Some(2));

        let backwards = event(
            "9",
            "Backwards timed",
            "2024-01-02T12:00:00",
            Some("2024-01-01T00:00:00"),
            Category::Todo,
        );
        assert_eq!(span_days(&backwards), Some(-1));
    }

    #[test]
    fn time_window_parse_rejects_unknown_values() {
        assert_eq!(TimeWindow::parse("").ok(), Some(TimeWindow::All));
        assert_eq!(TimeWindow::parse("3weeks").ok(), Some(TimeWindow::THREE_WEEKS));
        let error = TimeWindow::parse("fortnight").expect_err("unknown window should fail");
        assert!(error.to_string().contains("unknown time window"));
    }
}
