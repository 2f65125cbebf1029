//! Vocabulary items and user word banks.
//!
//! A `WordEntry` always holds non-empty, trimmed, NFC-normalized text with
//! its stored case. Matching and deduplication compare `key()`, the
//! lower-cased form.

use crate::utils;
use serde::{Deserialize, Serialize};

/// One vocabulary item.
///
/// `rank` is the corpus frequency rank (lower is more frequent) and is
/// absent for words that only exist in a user bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    #[serde(alias = "word")]
    pub text: String,
    #[serde(default, alias = "isHighlighted")]
    pub is_highlighted: bool,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default, alias = "isCommon")]
    pub is_common: bool,
}

impl WordEntry {
    /// Create a bank entry. Returns `None` when the text is blank.
    pub fn new<S: AsRef<str>>(text: S, is_highlighted: bool) -> Option<Self> {
        let text = utils::normalize(text.as_ref());
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text,
            is_highlighted,
            rank: None,
            is_common: false,
        })
    }

    /// Create a corpus entry with its frequency rank.
    pub fn common<S: AsRef<str>>(rank: u32, text: S) -> Option<Self> {
        let mut entry = Self::new(text, false)?;
        entry.rank = Some(rank);
        entry.is_common = true;
        Some(entry)
    }

    /// Case-insensitive comparison key.
    pub fn key(&self) -> String {
        self.text.to_lowercase()
    }
}

/// A user-owned collection of words, loaded as an immutable snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WordBank {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "words")]
    pub entries: Vec<WordEntry>,
}

impl WordBank {
    pub fn new<I: Into<String>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// The bank used whenever a fetch fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a bank from `(word, highlighted)` pairs, dropping blank words.
    pub fn from_words<I, S>(id: &str, name: &str, words: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        let mut bank = Self::new(id, name);
        bank.entries = words
            .into_iter()
            .filter_map(|(w, highlighted)| WordEntry::new(w, highlighted))
            .collect();
        bank
    }

    /// Append an entry if its text is not blank.
    pub fn push<S: AsRef<str>>(&mut self, text: S, is_highlighted: bool) {
        if let Some(entry) = WordEntry::new(text, is_highlighted) {
            self.entries.push(entry);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn highlighted(&self) -> impl Iterator<Item = &WordEntry> {
        self.entries.iter().filter(|e| e.is_highlighted)
    }

    pub fn non_highlighted(&self) -> impl Iterator<Item = &WordEntry> {
        self.entries.iter().filter(|e| !e.is_highlighted)
    }

    /// Word texts in stored order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.text.as_str())
    }
}

/// Corpus record as shipped in the bundled word list (rank is a string).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommonWord {
    pub rank: String,
    pub word: String,
}
