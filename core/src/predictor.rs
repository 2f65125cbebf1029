//! Word completion.
//!
//! `Predictor` is the strategy seam: `PrefixPredictor` filters the active
//! vocabulary locally, `RemotePredictor` (see `remote`) asks a service.
//! Both return at most `limit` words that start with the word being typed.

use crate::utils;
use crate::vocabulary::VocabularySet;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub trait Predictor: Send + Sync {
    /// Completions for the last token of `text`.
    fn predict(&self, text: &str, vocabulary: &VocabularySet, limit: usize) -> Vec<String>;

    /// Remote predictors are run off the input path and may resolve late.
    fn is_remote(&self) -> bool {
        false
    }
}

/// The word currently being typed: the last whitespace-delimited token,
/// or `""` when `text` is empty or ends in whitespace.
pub fn current_word(text: &str) -> &str {
    match text.char_indices().rev().find(|(_, c)| c.is_whitespace()) {
        Some((i, c)) => &text[i + c.len_utf8()..],
        None => text,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    set: String,
    revision: u64,
    word: String,
    limit: usize,
}

/// Local prefix filter over the vocabulary, shortest completions first.
///
/// Ties keep vocabulary order.
pub struct PrefixPredictor {
    cache: Option<Mutex<LruCache<CacheKey, Vec<String>>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl PrefixPredictor {
    /// `cache_size == 0` disables caching.
    pub fn new(cache_size: usize) -> Self {
        Self {
            cache: NonZeroUsize::new(cache_size).map(|n| Mutex::new(LruCache::new(n))),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// `(hits, misses)` since creation.
    pub fn cache_stats(&self) -> (usize, usize) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    fn rank(word: &str, vocabulary: &VocabularySet, limit: usize) -> Vec<String> {
        let words = vocabulary.words();
        let mut positions = vocabulary.prefix_matches(word);
        // Stable: equal lengths keep vocabulary order.
        positions.sort_by_key(|&i| words[i].chars().count());
        positions
            .into_iter()
            .take(limit)
            .map(|i| words[i].clone())
            .collect()
    }
}

impl Default for PrefixPredictor {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Predictor for PrefixPredictor {
    fn predict(&self, text: &str, vocabulary: &VocabularySet, limit: usize) -> Vec<String> {
        let word = utils::normalize(current_word(text)).to_lowercase();
        if word.is_empty() || limit == 0 || vocabulary.is_empty() {
            return Vec::new();
        }

        let Some(cache) = &self.cache else {
            return Self::rank(&word, vocabulary, limit);
        };

        let key = CacheKey {
            set: vocabulary.name().to_string(),
            revision: vocabulary.revision(),
            word,
            limit,
        };
        if let Ok(mut cache) = cache.lock() {
            if let Some(hit) = cache.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return hit.clone();
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let ranked = Self::rank(&key.word, vocabulary, limit);
        if let Ok(mut cache) = cache.lock() {
            cache.put(key, ranked.clone());
        }
        ranked
    }
}
