//! Fan-out of dungeon updates to observers and the notification sink.
//!
//! Observers run synchronously on the caller's thread. A panicking observer
//! is logged and skipped; the remaining observers still run.

use super::types::DungeonSnapshot;
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    LevelUp,
    Item,
    Warning,
    Success,
    Gold,
    Quest,
}

type Listener = Box<dyn FnMut(&DungeonSnapshot)>;
type NotificationSink = Box<dyn FnMut(NotificationKind, &str)>;

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
    sink: Option<NotificationSink>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&DungeonSnapshot) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Replaces the notification sink.
    pub fn set_sink(&mut self, sink: impl FnMut(NotificationKind, &str) + 'static) {
        self.sink = Some(Box::new(sink));
    }

    /// Sends `snapshot` to every listener. Returns how many panicked.
    pub fn publish(&mut self, snapshot: &DungeonSnapshot) -> usize {
        let mut failures = 0;
        for (index, listener) in self.listeners.iter_mut().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| listener(snapshot))).is_err() {
                log::error!("dungeon update listener {index} panicked");
                failures += 1;
            }
        }
        failures
    }

    /// Best-effort message to the sink. Does nothing without a sink.
    pub fn notify(&mut self, kind: NotificationKind, message: &str) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if catch_unwind(AssertUnwindSafe(|| sink(kind, message))).is_err() {
            log::error!("notification sink panicked on {kind:?}: {message}");
        }
    }
}
