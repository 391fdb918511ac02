//! State coders and the time-travel monitor.
//!
//! The monitor keeps a bounded history of `(action, state)` pairs in encoded
//! form. Jumping back decodes an entry into a [`State`] again; when decoding
//! fails, only that restore is abandoned.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::{Msg, State, DEFAULT_THEME};
use crate::router::Page;

/// Action label of the first history entry.
pub const INIT_ACTION: &str = "@@INIT";

/// Errors raised by the developer tooling.
#[derive(Debug, thiserror::Error)]
pub enum DevtoolsError {
    #[error("Unsupported state encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("State coders failed their self check: {0}")]
    SelfCheck(String),

    #[error("State decoding is disabled (coders fell back to pass-through)")]
    DecodingDisabled,

    #[error("Failed to decode state: {0}")]
    InvalidState(#[from] serde_json::Error),

    #[error("No history entry at index {0}")]
    UnknownEntry(usize),

    #[error("No monitor is attached to this program")]
    Detached,
}

/// Encoder/decoder pair for [`State`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coders {
    /// serde JSON mapping; round-trips
    Json,
    /// Debug text only; decoding always fails
    PassThrough,
}

impl Coders {
    /// Build coders for `encoding`, verifying them with a round trip.
    pub fn try_new(encoding: &str) -> Result<Self, DevtoolsError> {
        let coders = match encoding {
            "json" => Coders::Json,
            other => return Err(DevtoolsError::UnsupportedEncoding(other.to_string())),
        };

        let probe = State {
            page: Page::QueryTable,
            theme: DEFAULT_THEME.to_string(),
        };
        let decoded = coders.decode(&coders.encode(&probe))?;
        if decoded != probe {
            return Err(DevtoolsError::SelfCheck(format!(
                "{:?} decoded as {:?}",
                probe, decoded
            )));
        }

        Ok(coders)
    }

    /// Like [`Coders::try_new`], degrading to pass-through on failure.
    pub fn setup(encoding: &str) -> Self {
        match Self::try_new(encoding) {
            Ok(coders) => coders,
            Err(e) => {
                tracing::warn!(
                    "Could not set up state coders ({}); monitor will not be able to restore state",
                    e
                );
                Coders::PassThrough
            }
        }
    }

    pub fn encode(&self, state: &State) -> Value {
        match self {
            Coders::Json => encode_json(state),
            Coders::PassThrough => Value::String(format!("{:?}", state)),
        }
    }

    pub fn decode(&self, value: &Value) -> Result<State, DevtoolsError> {
        match self {
            Coders::Json => Ok(State::deserialize(value)?),
            Coders::PassThrough => Err(DevtoolsError::DecodingDisabled),
        }
    }

    fn encode_action(&self, msg: &Msg) -> Value {
        match self {
            Coders::Json => encode_json(msg),
            Coders::PassThrough => Value::String(format!("{:?}", msg)),
        }
    }
}

fn encode_json<T: Serialize + std::fmt::Debug>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|_| Value::String(format!("{:?}", value)))
}

/// One recorded step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub action: Value,
    pub state: Value,
}

/// Bounded action/state history of one program.
#[derive(Debug, Clone)]
pub struct Monitor {
    coders: Coders,
    history: VecDeque<Entry>,
    max_age: usize,
}

impl Monitor {
    pub fn new(coders: Coders, max_age: usize) -> Self {
        Self {
            coders,
            history: VecDeque::new(),
            max_age: max_age.max(1),
        }
    }

    pub fn coders(&self) -> Coders {
        self.coders
    }

    /// Record the initial state.
    pub fn init(&mut self, state: &State) {
        self.history.clear();
        self.push(Entry {
            action: Value::String(INIT_ACTION.to_string()),
            state: self.coders.encode(state),
        });
    }

    /// Record a message and the state it produced.
    pub fn record(&mut self, msg: &Msg, state: &State) {
        self.push(Entry {
            action: self.coders.encode_action(msg),
            state: self.coders.encode(state),
        });
    }

    pub fn history(&self) -> &VecDeque<Entry> {
        &self.history
    }

    /// Decode the state recorded at `index`.
    pub fn state_at(&self, index: usize) -> Result<State, DevtoolsError> {
        let entry = self
            .history
            .get(index)
            .ok_or(DevtoolsError::UnknownEntry(index))?;
        self.coders.decode(&entry.state)
    }

    /// Decode an externally supplied state.
    pub fn decode(&self, value: &Value) -> Result<State, DevtoolsError> {
        self.coders.decode(value)
    }

    fn push(&mut self, entry: Entry) {
        if self.history.len() == self.max_age {
            self.history.pop_front();
        }
        self.history.push_back(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn dark_use() -> State {
        State {
            page: Page::Use,
            theme: "dark".to_string(),
        }
    }

    #[test]
    fn json_coders_round_trip() {
        let coders = Coders::try_new("json").unwrap();
        let state = dark_use();

        assert_eq!(coders.decode(&coders.encode(&state)).unwrap(), state);
    }

    #[test]
    fn json_encoding_shape() {
        let value = Coders::Json.encode(&dark_use());
        assert_eq!(value, json!({ "page": "Use", "theme": "dark" }));
    }

    #[test]
    fn unknown_encoding_falls_back_to_pass_through() {
        assert!(matches!(
            Coders::try_new("msgpack"),
            Err(DevtoolsError::UnsupportedEncoding(_))
        ));
        assert_eq!(Coders::setup("msgpack"), Coders::PassThrough);
    }

    #[test]
    fn pass_through_never_decodes() {
        let coders = Coders::PassThrough;
        let encoded = coders.encode(&dark_use());

        assert!(encoded.is_string());
        assert!(matches!(
            coders.decode(&encoded),
            Err(DevtoolsError::DecodingDisabled)
        ));
        assert!(matches!(
            coders.decode(&json!({ "page": "Use", "theme": "dark" })),
            Err(DevtoolsError::DecodingDisabled)
        ));
    }

    #[test]
    fn rejects_malformed_state() {
        let err = Coders::Json
            .decode(&json!({ "page": "Nowhere", "theme": "dark" }))
            .unwrap_err();
        assert!(matches!(err, DevtoolsError::InvalidState(_)));
    }

    #[test]
    fn monitor_records_history() {
        let mut monitor = Monitor::new(Coders::Json, 10);
        let initial = State {
            page: Page::Install,
            theme: "light".to_string(),
        };
        monitor.init(&initial);
        monitor.record(&Msg::UrlChanged(Page::Use), &dark_use());

        assert_eq!(monitor.history().len(), 2);
        assert_eq!(monitor.history()[0].action, json!(INIT_ACTION));
        assert_eq!(monitor.history()[1].action, json!({ "UrlChanged": "Use" }));
        assert_eq!(monitor.state_at(0).unwrap(), initial);
        assert_eq!(monitor.state_at(1).unwrap(), dark_use());
        assert!(matches!(
            monitor.state_at(7),
            Err(DevtoolsError::UnknownEntry(7))
        ));
    }

    #[test]
    fn monitor_drops_oldest_entries() {
        let mut monitor = Monitor::new(Coders::Json, 3);
        monitor.init(&dark_use());
        for theme in ["a", "b", "c"] {
            let state = State {
                page: Page::Use,
                theme: theme.to_string(),
            };
            monitor.record(&Msg::SetTheme(theme.to_string()), &state);
        }

        assert_eq!(monitor.history().len(), 3);
        assert_eq!(monitor.state_at(0).unwrap().theme, "a");
        assert_eq!(monitor.state_at(2).unwrap().theme, "c");
    }
}
