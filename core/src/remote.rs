//! Remote completion service.
//!
//! Uses the `reqwest` blocking client; the coordinator runs remote
//! predictions on a worker thread so the input path never waits on them.
//!
//! Request: `GET {endpoint}?prefix=<word>&limit=<n>`
//! Response: JSON array of words, e.g. `["help", "hello"]`.
//!
//! Any failure is treated as "no data" and yields no predictions.

use crate::error::{LetterboardError, Result};
use crate::predictor::{current_word, Predictor};
use crate::vocabulary::VocabularySet;
use ahash::AHashSet;
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use std::time::Duration;

pub struct RemotePredictor {
    endpoint: String,
    timeout_ms: u64,
    // Built on first use and shared by every request.
    client: OnceCell<Client>,
}

impl RemotePredictor {
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_ms: 500,
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
                .map_err(|e| LetterboardError::DataUnavailable(e.to_string()))
        })
    }

    fn query_url(endpoint: &str, prefix: &str, limit: usize) -> String {
        let sep = if endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{}prefix={}&limit={}",
            endpoint,
            sep,
            urlencoding::encode(prefix),
            limit
        )
    }

    fn query(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let response = self
            .client()?
            .get(Self::query_url(&self.endpoint, prefix, limit))
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| LetterboardError::DataUnavailable(e.to_string()))?;

        response
            .json::<Vec<String>>()
            .map_err(|e| LetterboardError::DataUnavailable(e.to_string()))
    }
}

/// Keep only distinct words that start with `prefix`, up to `limit`.
fn sanitize(words: Vec<String>, prefix: &str, limit: usize) -> Vec<String> {
    let mut seen = AHashSet::new();
    words
        .into_iter()
        .map(|w| w.trim().to_string())
        .filter(|w| {
            let key = w.to_lowercase();
            !w.is_empty() && key.starts_with(prefix) && seen.insert(key)
        })
        .take(limit)
        .collect()
}

impl Predictor for RemotePredictor {
    fn predict(&self, text: &str, _vocabulary: &VocabularySet, limit: usize) -> Vec<String> {
        let word = current_word(text).to_lowercase();
        if word.is_empty() || limit == 0 {
            return Vec::new();
        }

        match self.query(&word, limit) {
            Ok(words) => sanitize(words, &word, limit),
            Err(e) => {
                tracing::warn!("remote prediction failed for {:?}: {}", word, e);
                Vec::new()
            }
        }
    }

    fn is_remote(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_url_encodes_prefix() {
        assert_eq!(
            RemotePredictor::query_url("http://x/words", "café", 5),
            "http://x/words?prefix=caf%C3%A9&limit=5"
        );
        assert_eq!(
            RemotePredictor::query_url("http://x/words?lang=en", "he", 3),
            "http://x/words?lang=en&prefix=he&limit=3"
        );
    }

    #[test]
    fn sanitize_enforces_prefix_dedup_and_limit() {
        let raw = vec!["help".into(), "Hello".into(), "world".into(), "HELP".into(), "held".into()];
        assert_eq!(sanitize(raw, "hel", 2), vec!["help", "Hello"]);
    }

    #[test]
    fn unreachable_endpoint_is_no_data() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let p = RemotePredictor::new("http://127.0.0.1:9/words").with_timeout(200);
        let v = VocabularySet::new("s", ["hello"]);
        assert!(p.predict("he", &v, 5).is_empty());
        assert_eq!(p.timeout_ms, 200);
        // The client built for the failed request is kept.
        assert!(p.client.get().is_some());
        assert!(p.predict("he", &v, 5).is_empty());
    }
}
