//! Word corpus provider.
//!
//! Supplies the static common-word list (bundled at build time, ranked
//! ascending) and user word banks through the `WordBankSource` boundary.
//! Bank failures never propagate past `CorpusProvider`: they degrade to an
//! empty bank so predictions and boards fall back to the corpus alone.

use crate::error::{LetterboardError, Result};
use crate::word::{CommonWord, WordBank, WordEntry};
use ahash::AHashSet;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

static BUNDLED_JSON: &str = include_str!("../data/common_words.json");

static BUNDLED: Lazy<Arc<CommonWords>> = Lazy::new(|| {
    let words = CommonWords::from_json(BUNDLED_JSON).unwrap_or_else(|e| {
        tracing::warn!("bundled common-word list is unreadable: {}", e);
        CommonWords::default()
    });
    Arc::new(words)
});

/// Rank-ordered list of high-frequency words.
#[derive(Debug, Clone, Default)]
pub struct CommonWords {
    entries: Vec<WordEntry>,
}

impl CommonWords {
    /// The corpus shipped with the crate.
    pub fn bundled() -> Arc<CommonWords> {
        Arc::clone(&BUNDLED)
    }

    /// Parse a JSON array of `{"rank": "1", "word": "the"}` records.
    ///
    /// Records whose rank is not a number are skipped.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<CommonWord> = serde_json::from_str(json)?;
        let mut ranked = Vec::with_capacity(raw.len());
        for cw in raw {
            match cw.rank.trim().parse::<u32>() {
                Ok(rank) => ranked.push((rank, cw.word)),
                Err(_) => tracing::warn!("skipping corpus word {:?} with rank {:?}", cw.word, cw.rank),
            }
        }
        Ok(Self::from_ranked(ranked))
    }

    /// Build from `(rank, word)` pairs in any order.
    pub fn from_ranked<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: AsRef<str>,
    {
        let mut entries: Vec<WordEntry> = pairs
            .into_iter()
            .filter_map(|(rank, w)| WordEntry::common(rank, w))
            .collect();
        entries.sort_by_key(|e| e.rank);
        Self { entries }
    }

    /// Build from words already in rank order (rank 1..N).
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_ranked(words.into_iter().zip(1u32..).map(|(w, r)| (r, w)))
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where user word banks come from.
pub trait WordBankSource: Send + Sync {
    /// The bank currently selected by `user_id`.
    fn fetch(&self, user_id: &str) -> Result<WordBank>;

    /// A bank by id; `NotFound` if it does not exist.
    fn get_bank(&self, bank_id: &str) -> Result<WordBank>;
}

/// Bank source held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBankSource {
    banks: HashMap<String, WordBank>,
    selected: HashMap<String, String>,
}

impl InMemoryBankSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bank: WordBank) {
        self.banks.insert(bank.id.clone(), bank);
    }

    /// Mark `bank_id` as the selected bank of `user_id`.
    pub fn select(&mut self, user_id: &str, bank_id: &str) -> Result<()> {
        if !self.banks.contains_key(bank_id) {
            return Err(LetterboardError::NotFound(bank_id.to_string()));
        }
        self.selected.insert(user_id.to_string(), bank_id.to_string());
        Ok(())
    }
}

impl WordBankSource for InMemoryBankSource {
    fn fetch(&self, user_id: &str) -> Result<WordBank> {
        let bank_id = self
            .selected
            .get(user_id)
            .ok_or_else(|| LetterboardError::NotFound(format!("no bank selected for {user_id}")))?;
        self.get_bank(bank_id)
    }

    fn get_bank(&self, bank_id: &str) -> Result<WordBank> {
        self.banks
            .get(bank_id)
            .cloned()
            .ok_or_else(|| LetterboardError::NotFound(bank_id.to_string()))
    }
}

/// Combines the common corpus with an optional bank source.
pub struct CorpusProvider {
    common: Arc<CommonWords>,
    source: Option<Box<dyn WordBankSource>>,
}

impl CorpusProvider {
    pub fn new(common: Arc<CommonWords>) -> Self {
        Self {
            common,
            source: None,
        }
    }

    /// Provider backed by the bundled corpus and no bank source.
    pub fn bundled() -> Self {
        Self::new(CommonWords::bundled())
    }

    pub fn with_source(mut self, source: Box<dyn WordBankSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn common_words(&self) -> &CommonWords {
        &self.common
    }

    /// Fetch the user's selected bank, treating any failure as an empty bank.
    pub fn bank_or_empty(&self, user_id: &str) -> WordBank {
        let Some(source) = &self.source else {
            return WordBank::empty();
        };
        match source.fetch(user_id) {
            Ok(bank) => bank,
            Err(e) => {
                tracing::warn!(user_id, "word bank unavailable, using corpus only: {}", e);
                WordBank::empty()
            }
        }
    }

    /// Bank words followed by corpus words, deduplicated case-insensitively.
    pub fn word_set(&self, bank: &WordBank) -> Vec<String> {
        let mut seen = AHashSet::new();
        bank.words()
            .chain(self.common.words())
            .filter(|w| seen.insert(w.to_lowercase()))
            .map(str::to_string)
            .collect()
    }
}
