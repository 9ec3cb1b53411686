// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use taskcal_app::{Category, Event, EventDate, EventId};
use time::{Date, Duration};

const TASK_VERBS: [&str; 12] = [
    "Write", "Review", "Draft", "Ship", "Plan", "Fix", "Test", "Deploy", "Refactor", "Document",
    "Triage", "Demo",
];

const TASK_SUBJECTS: [&str; 14] = [
    "release notes",
    "login flow",
    "billing report",
    "API docs",
    "onboarding guide",
    "search index",
    "backup job",
    "roadmap",
    "design review",
    "sprint board",
    "metrics page",
    "error budget",
    "invoice export",
    "team offsite",
];

/// Span lengths in days, weighted toward short tasks.
const SPAN_DAYS: [i64; 10] = [0, 0, 1, 2, 3, 5, 8, 13, 20, 30];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Deterministic generator of plausible tasks for `--demo` and tests.
#[derive(Debug, Clone)]
pub struct TaskFaker {
    rng: DeterministicRng,
    issued: usize,
}

impl TaskFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            issued: 0,
        }
    }

    /// A task starting within four weeks of `month_start`.
    pub fn task(&mut self, month_start: Date) -> Event {
        self.issued += 1;
        let title = format!(
            "{} {}",
            self.pick(&TASK_VERBS),
            self.pick(&TASK_SUBJECTS)
        );
        let start = month_start + Duration::days(self.rng.int_n(28) as i64);
        let span = SPAN_DAYS[self.rng.int_n(SPAN_DAYS.len())];
        let end = (span > 0).then(|| EventDate::from_date(start + Duration::days(span)));
        // Roughly one in eight tasks predates categories.
        let category = if self.rng.int_n(8) == 0 {
            Category::Unset
        } else {
            Category::CHOICES[self.rng.int_n(Category::CHOICES.len())].clone()
        };

        Event {
            id: EventId::new(format!("demo-{}", self.issued)),
            title,
            start: EventDate::from_date(start),
            end,
            category,
        }
    }

    pub fn tasks(&mut self, count: usize, month_start: Date) -> Vec<Event> {
        (0..count).map(|_| self.task(month_start)).collect()
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}
