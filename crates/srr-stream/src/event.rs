//! Wire events arriving on the import stream.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line-delimited event from the import service.
///
/// Exactly one `done` or `error` terminates a session. All payload fields
/// are optional on the wire except the error message; absent fields keep
/// the previous session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ImportEvent {
    /// Periodic progress snapshot. The distribution is authoritative, not
    /// cumulative: each snapshot supersedes the previous one.
    Progress {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        phase: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        processed: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        total: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        latest_student: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        latest_risk: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        distribution: Option<BTreeMap<String, u64>>,
    },
    /// Terminal success, carrying the finished aggregate payload.
    Done {
        #[serde(default)]
        overview: Value,
        #[serde(default)]
        students: Vec<Value>,
    },
    /// Terminal failure.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_parses_with_partial_fields() {
        let event: ImportEvent =
            serde_json::from_str(r#"{"type":"progress","processed":1,"total":5}"#)
                .expect("parse progress");
        match event {
            ImportEvent::Progress {
                processed, total, phase, ..
            } => {
                assert_eq!(processed, Some(1));
                assert_eq!(total, Some(5));
                assert_eq!(phase, None);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn error_requires_a_message() {
        let event: ImportEvent =
            serde_json::from_str(r#"{"type":"error","message":"model unavailable"}"#)
                .expect("parse error event");
        assert_eq!(
            event,
            ImportEvent::Error {
                message: "model unavailable".to_string()
            }
        );
        assert!(serde_json::from_str::<ImportEvent>(r#"{"type":"error"}"#).is_err());
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(serde_json::from_str::<ImportEvent>(r#"{"type":"noise"}"#).is_err());
    }
}
