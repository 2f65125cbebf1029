//! Interaction logging boundary.
//!
//! Logging is fire-and-forget: `log_quietly` swallows failures so they can
//! never reach session state.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    KeyPress,
    WordSpoken,
    TextSubmit,
    PredictionSelected,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeyPress => "key_press",
            Self::WordSpoken => "word_spoken",
            Self::TextSubmit => "text_submit",
            Self::PredictionSelected => "prediction_selected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub content: String,
}

pub trait InteractionLog: Send + Sync {
    fn log(&self, kind: InteractionKind, content: &str) -> Result<()>;
}

/// Log an interaction, reporting failures only as a warning.
pub fn log_quietly(log: &dyn InteractionLog, kind: InteractionKind, content: &str) {
    if let Err(e) = log.log(kind, content) {
        tracing::warn!(kind = kind.as_str(), "interaction log failed: {}", e);
    }
}

/// Emits each interaction as a structured `tracing` event.
#[derive(Debug, Clone, Default)]
pub struct TracingInteractionLog {
    user_id: Option<String>,
}

impl TracingInteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_user<S: Into<String>>(user_id: S) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }
}

impl InteractionLog for TracingInteractionLog {
    fn log(&self, kind: InteractionKind, content: &str) -> Result<()> {
        tracing::info!(
            kind = kind.as_str(),
            content,
            user_id = self.user_id.as_deref().unwrap_or("anonymous"),
            "interaction"
        );
        Ok(())
    }
}

/// Keeps interactions in memory.
#[derive(Debug, Default)]
pub struct MemoryInteractionLog {
    entries: Mutex<Vec<Interaction>>,
}

impl MemoryInteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Interaction> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn kinds(&self) -> Vec<InteractionKind> {
        self.snapshot().into_iter().map(|i| i.kind).collect()
    }
}

impl InteractionLog for MemoryInteractionLog {
    fn log(&self, kind: InteractionKind, content: &str) -> Result<()> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(Interaction {
                kind,
                content: content.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LetterboardError;

    struct FailingLog;

    impl InteractionLog for FailingLog {
        fn log(&self, _kind: InteractionKind, _content: &str) -> Result<()> {
            Err(LetterboardError::ExternalService("insert rejected".into()))
        }
    }

    #[test]
    fn kinds_serialize_as_event_names() {
        let i = Interaction {
            kind: InteractionKind::PredictionSelected,
            content: "hello".into(),
        };
        let json = serde_json::to_string(&i).unwrap();
        assert_eq!(json, r#"{"type":"prediction_selected","content":"hello"}"#);
    }

    #[test]
    fn failures_are_swallowed() {
        log_quietly(&FailingLog, InteractionKind::KeyPress, "a");
    }

    #[test]
    fn memory_log_records_in_order() {
        let log = MemoryInteractionLog::new();
        log_quietly(&log, InteractionKind::KeyPress, "h");
        log_quietly(&log, InteractionKind::TextSubmit, "hi");
        assert_eq!(log.kinds(), vec![InteractionKind::KeyPress, InteractionKind::TextSubmit]);
        assert_eq!(log.snapshot()[1].content, "hi");
    }
}
