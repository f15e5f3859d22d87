//! Session event emission
//!
//! Captures lifecycle events for:
//! - Host integration debugging
//! - Resource-leak auditing (handle create/release pairing)
//! - Structured CLI reports

use crate::types::{LifecycleSignal, ResumeState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session event types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A player handle was created and configured from resume state
    HandleCreated {
        window_index: u32,
        position_ms: u64,
        auto_play: bool,
    },

    /// A media source was submitted for preparation
    Prepared {
        uri: String,
    },

    /// The handle was released; resume state captured from it
    Deactivated {
        resume: ResumeState,
    },

    /// A host signal arrived that the active policy takes no action on
    SignalIgnored {
        signal: LifecycleSignal,
    },

    /// A redundant lifecycle call was absorbed as a no-op
    RedundantCall {
        operation: String,
    },
}

/// A recorded event with its wall-clock timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: SessionEvent,
}

/// Bounded in-process event recorder
///
/// Oldest events are dropped once the capacity is reached; a session that
/// cycles through activation many times stays bounded in memory.
#[derive(Debug)]
pub struct EventLog {
    events: std::collections::VecDeque<LoggedEvent>,
    capacity: usize,
}

impl EventLog {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new(capacity: usize) -> Self {
        Self {
            events: std::collections::VecDeque::with_capacity(capacity.min(Self::DEFAULT_CAPACITY)),
            capacity,
        }
    }

    pub fn record(&mut self, event: SessionEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(LoggedEvent {
            at: Utc::now(),
            event,
        });
    }

    /// All retained events, oldest first
    pub fn events(&self) -> impl Iterator<Item = &LoggedEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Count of retained events matching a predicate
    pub fn count_matching(&self, predicate: impl Fn(&SessionEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(&e.event)).count()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_records_in_order() {
        let mut log = EventLog::default();
        log.record(SessionEvent::HandleCreated {
            window_index: 0,
            position_ms: 0,
            auto_play: true,
        });
        log.record(SessionEvent::Prepared {
            uri: "https://example.com/a.mp3".into(),
        });

        let kinds: Vec<_> = log.events().map(|e| e.event.clone()).collect();
        assert_eq!(kinds.len(), 2);
        assert!(matches!(kinds[0], SessionEvent::HandleCreated { .. }));
        assert!(matches!(kinds[1], SessionEvent::Prepared { .. }));
    }

    #[test]
    fn test_log_is_bounded() {
        let mut log = EventLog::new(3);
        for i in 0..10 {
            log.record(SessionEvent::Prepared {
                uri: format!("uri-{i}"),
            });
        }
        assert_eq!(log.len(), 3);
        // Oldest dropped, newest retained
        let last = log.events().last().unwrap();
        assert_eq!(
            last.event,
            SessionEvent::Prepared {
                uri: "uri-9".into()
            }
        );
    }

    #[test]
    fn test_event_serialization_tag() {
        let event = SessionEvent::SignalIgnored {
            signal: crate::types::LifecycleSignal::LostFocus,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"signal_ignored\""));
        assert!(json.contains("lost_focus"));
    }
}
