//! Import session state, folded from decoded events.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::event::ImportEvent;

/// Lifecycle of one import session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No event consumed yet.
    #[default]
    Idle,
    /// At least one event consumed, no terminal event yet.
    Streaming,
    /// A `done` event sealed the session.
    Completed,
    /// An `error` event sealed the session.
    Failed,
}

/// Terminal result of a session that reached a terminal state.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Completed {
        overview: Value,
        students: Vec<Value>,
    },
    Failed {
        message: String,
    },
}

/// Folds the event sequence into running aggregates and a terminal state.
///
/// Progress snapshots overwrite the running counters and distribution;
/// events arriving after a terminal transition are counted and otherwise
/// ignored. Each session owns its state exclusively; nothing is shared
/// across sessions.
#[derive(Debug, Default)]
pub struct ImportSession {
    state: SessionState,
    processed: u64,
    total: u64,
    distribution: BTreeMap<String, u64>,
    events: Vec<ImportEvent>,
    overview: Option<Value>,
    students: Vec<Value>,
    error: Option<String>,
    ignored: usize,
}

impl ImportSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, SessionState::Completed | SessionState::Failed)
    }

    /// Records processed so far, per the latest progress snapshot.
    #[must_use]
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Total records expected, per the latest progress snapshot.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Latest risk-category distribution snapshot.
    #[must_use]
    pub fn distribution(&self) -> &BTreeMap<String, u64> {
        &self.distribution
    }

    /// All accepted events, in arrival order.
    #[must_use]
    pub fn events(&self) -> &[ImportEvent] {
        &self.events
    }

    /// Events discarded because they arrived after a terminal transition.
    #[must_use]
    pub fn ignored(&self) -> usize {
        self.ignored
    }

    /// Consume one decoded event.
    pub fn apply(&mut self, event: ImportEvent) {
        if self.is_terminal() {
            self.ignored += 1;
            debug!("ignoring event after terminal state");
            return;
        }
        if self.state == SessionState::Idle {
            self.state = SessionState::Streaming;
        }
        match &event {
            ImportEvent::Progress {
                processed,
                total,
                distribution,
                ..
            } => {
                if let Some(processed) = processed {
                    self.processed = *processed;
                }
                if let Some(total) = total {
                    self.total = *total;
                }
                if let Some(distribution) = distribution {
                    self.distribution = distribution.clone();
                }
            }
            ImportEvent::Done { overview, students } => {
                self.state = SessionState::Completed;
                self.overview = Some(overview.clone());
                self.students = students.clone();
            }
            ImportEvent::Error { message } => {
                self.state = SessionState::Failed;
                self.error = Some(message.clone());
            }
        }
        self.events.push(event);
    }

    /// The terminal result, once a terminal event has been consumed.
    #[must_use]
    pub fn into_outcome(self) -> Option<ImportOutcome> {
        match self.state {
            SessionState::Completed => Some(ImportOutcome::Completed {
                overview: self.overview.unwrap_or(Value::Null),
                students: self.students,
            }),
            SessionState::Failed => Some(ImportOutcome::Failed {
                message: self.error.unwrap_or_default(),
            }),
            SessionState::Idle | SessionState::Streaming => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn progress(processed: u64, total: u64) -> ImportEvent {
        ImportEvent::Progress {
            phase: None,
            message: None,
            processed: Some(processed),
            total: Some(total),
            latest_student: None,
            latest_risk: None,
            distribution: None,
        }
    }

    #[test]
    fn progress_snapshots_overwrite_counters() {
        let mut session = ImportSession::new();
        assert_eq!(session.state(), SessionState::Idle);
        session.apply(progress(1, 5));
        assert_eq!(session.state(), SessionState::Streaming);
        session.apply(progress(4, 5));
        assert_eq!(session.processed(), 4);
        assert_eq!(session.total(), 5);
    }

    #[test]
    fn distribution_snapshot_is_authoritative() {
        let mut session = ImportSession::new();
        let with_dist = |entries: &[(&str, u64)]| ImportEvent::Progress {
            phase: None,
            message: None,
            processed: None,
            total: None,
            latest_student: None,
            latest_risk: None,
            distribution: Some(
                entries
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), *v))
                    .collect(),
            ),
        };
        session.apply(with_dist(&[("High", 2), ("Low", 1)]));
        session.apply(with_dist(&[("High", 3)]));
        assert_eq!(session.distribution().get("High"), Some(&3));
        assert_eq!(session.distribution().get("Low"), None);
    }

    #[test]
    fn done_seals_the_session() {
        let mut session = ImportSession::new();
        session.apply(progress(5, 5));
        session.apply(ImportEvent::Done {
            overview: json!({"total_students": 5}),
            students: vec![json!({"id": "S1"})],
        });
        assert!(session.is_terminal());
        session.apply(progress(6, 6));
        assert_eq!(session.ignored(), 1);
        assert_eq!(session.processed(), 5);
        match session.into_outcome() {
            Some(ImportOutcome::Completed { students, .. }) => assert_eq!(students.len(), 1),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn error_seals_the_session_with_its_message() {
        let mut session = ImportSession::new();
        session.apply(ImportEvent::Error {
            message: "bad header row".to_string(),
        });
        assert_eq!(session.state(), SessionState::Failed);
        session.apply(ImportEvent::Done {
            overview: Value::Null,
            students: vec![],
        });
        assert_eq!(session.ignored(), 1);
        assert_eq!(
            session.into_outcome(),
            Some(ImportOutcome::Failed {
                message: "bad header row".to_string()
            })
        );
    }

    #[test]
    fn unterminated_session_has_no_outcome() {
        let mut session = ImportSession::new();
        session.apply(progress(2, 5));
        assert!(session.into_outcome().is_none());
    }
}
