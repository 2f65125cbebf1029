//! letterboard-core
//!
//! Word prediction, word-board selection and composition sessions for an
//! AAC letterboard. Users compose text one key or word tile at a time;
//! this crate keeps the transcript, ranks completions against named
//! vocabulary sets, and picks which word tiles to show.
//!
//! Public API:
//! - `Letterboard` - Coordinator driving a session from board events
//! - `CompositionSession` - Transcript, sentence accumulator and board mode
//! - `Predictor` / `PrefixPredictor` / `RemotePredictor` - Completion strategies
//! - `build_board` - Word-board selection policy
//! - `VocabularyRegistry` - Named, swappable vocabulary sets
//! - `CorpusProvider` / `WordBankSource` / `RedbBankStore` - Word sources
//! - `Config` - Engine configuration (TOML)
//! - `UserSettings` - Per-user display settings (JSON)

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub mod error;
pub use error::{LetterboardError, Result};

pub mod word;
pub use word::{CommonWord, WordBank, WordEntry};

pub mod corpus;
pub use corpus::{CommonWords, CorpusProvider, InMemoryBankSource, WordBankSource};

pub mod bankstore;
pub use bankstore::RedbBankStore;

pub mod vocabulary;
pub use vocabulary::{VocabularyRegistry, VocabularySet, DEFAULT_SET};

pub mod predictor;
pub use predictor::{current_word, Predictor, PrefixPredictor};

pub mod remote;
pub use remote::RemotePredictor;

pub mod board;
pub use board::{build_board, BoardOptions};

pub mod scheduler;
pub use scheduler::{Debouncer, PredictionScheduler, PredictionTicket};

pub mod session;
pub use session::{is_terminator, CompositionSession, SubmitTarget};

pub mod settings;
pub use settings::{LetterCase, UserSettings};

pub mod keyboard;

pub mod interaction;
pub use interaction::{
    InteractionKind, InteractionLog, MemoryInteractionLog, TracingInteractionLog,
};

pub mod speech;
pub use speech::{HttpSpeech, SilentSpeech, SpeechDispatcher, SpeechSynthesizer, SubmitStatus};

pub mod letterboard;
pub use letterboard::{BoardEvent, Letterboard};

/// Which completion strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictorKind {
    #[default]
    Local,
    Remote,
}

/// Engine configuration.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of predictions shown
    pub prediction_limit: usize,

    /// Number of tiles on the word board
    pub board_size: usize,
    /// Top-ranked common words always on the word board
    pub min_common_words: usize,

    /// Quiet period before predictions are recomputed (0 = every keystroke)
    pub debounce_ms: u64,
    /// Entries in the local prediction cache (0 disables it)
    pub max_cache_size: usize,

    pub predictor: PredictorKind,
    /// Completion service, required when `predictor = "remote"`
    pub remote_endpoint: Option<String>,
    pub remote_timeout_ms: u64,

    /// Text-to-speech endpoint; speech is discarded when unset
    pub speech_endpoint: Option<String>,
    pub voice_id: String,
    pub speech_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prediction_limit: 5,
            board_size: 30,
            min_common_words: 8,
            debounce_ms: 150,
            max_cache_size: 256,
            predictor: PredictorKind::Local,
            remote_endpoint: None,
            remote_timeout_ms: 500,
            speech_endpoint: None,
            voice_id: "default".to_string(),
            speech_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn board_options(&self) -> BoardOptions {
        BoardOptions {
            board_size: self.board_size,
            min_common_words: self.min_common_words,
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The configured predictor. A remote predictor without an endpoint
    /// falls back to local prediction.
    pub fn build_predictor(&self) -> Arc<dyn Predictor> {
        match (self.predictor, &self.remote_endpoint) {
            (PredictorKind::Remote, Some(url)) => {
                Arc::new(RemotePredictor::new(url.clone()).with_timeout(self.remote_timeout_ms))
            }
            (PredictorKind::Remote, None) => {
                tracing::warn!("remote predictor selected without remote_endpoint, using local");
                Arc::new(PrefixPredictor::new(self.max_cache_size))
            }
            (PredictorKind::Local, _) => Arc::new(PrefixPredictor::new(self.max_cache_size)),
        }
    }

    pub fn build_speech(&self) -> Arc<dyn SpeechSynthesizer> {
        match &self.speech_endpoint {
            Some(url) => Arc::new(
                HttpSpeech::new(url.clone(), self.voice_id.clone())
                    .with_timeout(self.speech_timeout_ms),
            ),
            None => Arc::new(SilentSpeech),
        }
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.prediction_limit, 5);
        assert_eq!(cfg.board_options(), BoardOptions::default());
        assert_eq!(cfg.debounce(), Duration::from_millis(150));
        assert!(!cfg.build_predictor().is_remote());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml_str("board_size = 12\npredictor = \"remote\"\n").unwrap();
        assert_eq!(cfg.board_size, 12);
        assert_eq!(cfg.min_common_words, 8);
        assert_eq!(cfg.predictor, PredictorKind::Remote);
        // No endpoint configured.
        assert!(!cfg.build_predictor().is_remote());
    }

    #[test]
    fn toml_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("letterboard.toml");
        let mut cfg = Config::default();
        cfg.remote_endpoint = Some("http://localhost:8080/words".into());
        cfg.save_toml(&path).unwrap();
        assert_eq!(Config::load_toml(&path).unwrap(), cfg);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = Config::from_toml_str("board_size = \"many\"").unwrap_err();
        assert!(matches!(err, LetterboardError::ConfigParse(_)));
    }

    #[test]
    fn normalize_composes_and_trims() {
        assert_eq!(utils::normalize("  cafe\u{301} "), "café");
    }
}
