//! Scripted replacement for hosts without addressable ranges: N backspaces at
//! fixed intervals, then an insert.
//!
//! Every backspace the queue posts comes back through the key pipeline. The
//! session counts them in `expected_deletes` and forwards them untouched.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::host::TextSurface;
use crate::mirror::TextMirror;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Task {
    Delete,
    Insert(String),
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: Instant,
    task: Task,
}

#[derive(Debug)]
pub struct ReplayQueue {
    tasks: VecDeque<Scheduled>,
    expected_deletes: usize,
    delay: Duration,
    limit: usize,
}

impl ReplayQueue {
    pub fn new(delay: Duration, limit: usize) -> Self {
        Self {
            tasks: VecDeque::new(),
            expected_deletes: 0,
            delay,
            limit,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn scheduled(&self) -> usize {
        self.tasks.len()
    }

    /// Synthetic deletes posted but not yet seen as key events.
    pub fn expected_deletes(&self) -> usize {
        self.expected_deletes
    }

    /// Schedule `deletes` backspaces followed by inserting `text`. Refused
    /// (returns false) above the configured count limit.
    pub fn schedule_replace(&mut self, now: Instant, deletes: usize, text: &str) -> bool {
        if deletes > self.limit {
            warn!(deletes, limit = self.limit, "replay: too many deletes, refused");
            return false;
        }
        // Queue after anything still in flight.
        let base = self.tasks.back().map_or(now, |s| s.due.max(now));
        let mut due = base;
        for _ in 0..deletes {
            due += self.delay;
            self.tasks.push_back(Scheduled {
                due,
                task: Task::Delete,
            });
        }
        if !text.is_empty() {
            self.tasks.push_back(Scheduled {
                due: due + self.delay,
                task: Task::Insert(text.to_string()),
            });
        }
        debug!(deletes, text, "replay scheduled");
        true
    }

    /// Run every task due at `now`. Returns how many ran.
    pub fn tick(&mut self, host: &mut dyn TextSurface, mirror: &mut TextMirror, now: Instant) -> usize {
        let mut ran = 0;
        while self.tasks.front().is_some_and(|s| s.due <= now) {
            if let Some(s) = self.tasks.pop_front() {
                self.run(s.task, host, mirror);
                ran += 1;
            }
        }
        ran
    }

    /// Run every remaining task immediately.
    pub fn flush(&mut self, host: &mut dyn TextSurface, mirror: &mut TextMirror) -> usize {
        let mut ran = 0;
        while let Some(s) = self.tasks.pop_front() {
            self.run(s.task, host, mirror);
            ran += 1;
        }
        ran
    }

    /// Drop tasks not yet run.
    pub fn cancel(&mut self) {
        if !self.tasks.is_empty() {
            debug!(dropped = self.tasks.len(), "replay cancelled");
            self.tasks.clear();
        }
    }

    /// Classify an incoming delete event. True when it is one of ours.
    pub fn observe_delete(&mut self) -> bool {
        if self.expected_deletes == 0 {
            return false;
        }
        self.expected_deletes -= 1;
        true
    }

    fn run(&mut self, task: Task, host: &mut dyn TextSurface, mirror: &mut TextMirror) {
        match task {
            Task::Delete => {
                self.expected_deletes += 1;
                host.delete_one_unit();
                mirror.pop(1);
            }
            Task::Insert(text) => {
                host.insert_text(&text, None);
                mirror.push_str(&text);
            }
        }
    }
}
