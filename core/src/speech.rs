//! Speech synthesis boundary.
//!
//! `SpeechDispatcher` runs each request on its own thread and reports the
//! outcome through `poll()`, so composing text never waits on audio. The
//! status reflects the most recent request only.

use crate::error::{LetterboardError, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub trait SpeechSynthesizer: Send + Sync {
    /// Speak `text`, returning once playback data has been produced.
    fn speak(&self, text: &str) -> Result<()>;
}

/// Discards speech. Used when no TTS endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeech;

impl SpeechSynthesizer for SilentSpeech {
    fn speak(&self, _text: &str) -> Result<()> {
        Ok(())
    }
}

/// Posts `{"text", "voice_id"}` to a TTS endpoint. The audio body is not
/// inspected.
pub struct HttpSpeech {
    endpoint: String,
    voice_id: String,
    timeout_ms: u64,
    client: OnceCell<Client>,
}

impl HttpSpeech {
    pub fn new<E: Into<String>, V: Into<String>>(endpoint: E, voice_id: V) -> Self {
        Self {
            endpoint: endpoint.into(),
            voice_id: voice_id.into(),
            timeout_ms: 5000,
            client: OnceCell::new(),
        }
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn client(&self) -> Result<&Client> {
        self.client.get_or_try_init(|| {
            Client::builder()
                .build()
                .map_err(|e| LetterboardError::ExternalService(e.to_string()))
        })
    }
}

impl SpeechSynthesizer for HttpSpeech {
    fn speak(&self, text: &str) -> Result<()> {
        let body = serde_json::json!({
            "text": text,
            "voice_id": self.voice_id,
        });

        let response = self
            .client()?
            .post(&self.endpoint)
            .timeout(Duration::from_millis(self.timeout_ms))
            .json(&body)
            .send()
            .map_err(|e| LetterboardError::ExternalService(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LetterboardError::ExternalService(format!(
                "speech request failed with status {}",
                response.status()
            )));
        }
        response
            .bytes()
            .map_err(|e| LetterboardError::ExternalService(e.to_string()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

type Outcome = (u64, std::result::Result<(), String>);

pub struct SpeechDispatcher {
    synth: Arc<dyn SpeechSynthesizer>,
    tx: Sender<Outcome>,
    rx: Receiver<Outcome>,
    latest: u64,
    in_flight: usize,
    status: SubmitStatus,
}

impl SpeechDispatcher {
    pub fn new(synth: Arc<dyn SpeechSynthesizer>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            synth,
            tx,
            rx,
            latest: 0,
            in_flight: 0,
            status: SubmitStatus::Idle,
        }
    }

    /// Start speaking `text` in the background.
    pub fn dispatch(&mut self, text: String) -> SubmitStatus {
        self.latest += 1;
        self.in_flight += 1;
        self.status = SubmitStatus::Submitting;

        let id = self.latest;
        let synth = Arc::clone(&self.synth);
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let outcome = synth.speak(&text).map_err(|e| e.to_string());
            // The dispatcher may be gone; nothing to report to then.
            let _ = tx.send((id, outcome));
        });
        self.status
    }

    /// Apply any finished requests and return the current status.
    pub fn poll(&mut self) -> SubmitStatus {
        while let Ok(outcome) = self.rx.try_recv() {
            self.apply(outcome);
        }
        self.status
    }

    /// Block until nothing is in flight or `timeout` elapses.
    pub fn wait_idle(&mut self, timeout: Duration) -> SubmitStatus {
        let deadline = Instant::now() + timeout;
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => self.apply(outcome),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.status
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn apply(&mut self, (id, outcome): Outcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if let Err(e) = &outcome {
            tracing::warn!("speech synthesis failed: {}", e);
        }
        if id == self.latest {
            self.status = match outcome {
                Ok(()) => SubmitStatus::Success,
                Err(_) => SubmitStatus::Error,
            };
        }
    }
}
