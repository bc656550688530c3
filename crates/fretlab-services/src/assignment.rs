//! Assignment records shared between teacher and student surfaces

use fretlab_core::SelectionSnapshot;
use serde::{Deserialize, Serialize};

use crate::session::{InstrumentSession, SessionError};

/// A titled board snapshot, the unit the classroom layer stores and
/// hands out. The JSON string is the persisted record; storage itself
/// lives elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentDraft {
    pub title: String,
    pub instrument: String,
    pub snapshot: SelectionSnapshot,
}

impl AssignmentDraft {
    pub fn from_session(title: impl Into<String>, session: &InstrumentSession) -> Self {
        let snapshot = session.snapshot();
        Self {
            title: title.into(),
            instrument: snapshot.instrument.clone(),
            snapshot,
        }
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }
}
