//! Named vocabulary sets and the registry that tracks the active one.
//!
//! A `VocabularySet` is a flattened word list, deduplicated
//! case-insensitively with the first occurrence winning. Each set carries
//! an `fst::Map` from lower-cased word to position for prefix search.

use crate::utils;
use ahash::AHashSet;
use fst::automaton::{Automaton, Str};
use fst::{IntoStreamer, Map, Streamer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Name of the always-present base set.
pub const DEFAULT_SET: &str = "default";

pub struct VocabularySet {
    name: String,
    words: Vec<String>,
    revision: u64,
    index: Option<Map<Vec<u8>>>,
}

impl VocabularySet {
    pub fn new<N, I, S>(name: N, words: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_revision(name, words, 0)
    }

    pub(crate) fn with_revision<N, I, S>(name: N, words: I, revision: u64) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = AHashSet::new();
        let mut deduped = Vec::new();
        for w in words {
            let w = utils::normalize(w.as_ref());
            if !w.is_empty() && seen.insert(w.to_lowercase()) {
                deduped.push(w);
            }
        }

        let name = name.into();
        let index = build_index(&deduped);
        if index.is_none() && !deduped.is_empty() {
            tracing::warn!(set = %name, "prefix index unavailable, falling back to linear scan");
        }

        Self {
            name,
            words: deduped,
            revision,
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Changes whenever the registry replaces a set under the same name.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contains(&self, word: &str) -> bool {
        let key = word.to_lowercase();
        match &self.index {
            Some(map) => map.contains_key(key.as_bytes()),
            None => self.words.iter().any(|w| w.to_lowercase() == key),
        }
    }

    /// Positions of words whose lower-cased form starts with `prefix`
    /// (already lower-cased), in vocabulary order.
    pub fn prefix_matches(&self, prefix: &str) -> Vec<usize> {
        let mut positions = match &self.index {
            Some(map) => {
                let matcher = Str::new(prefix).starts_with();
                let mut stream = map.search(matcher).into_stream();
                let mut out = Vec::new();
                while let Some((_, pos)) = stream.next() {
                    out.push(pos as usize);
                }
                out
            }
            None => self
                .words
                .iter()
                .enumerate()
                .filter(|(_, w)| w.to_lowercase().starts_with(prefix))
                .map(|(i, _)| i)
                .collect(),
        };
        positions.sort_unstable();
        positions
    }
}

fn build_index(words: &[String]) -> Option<Map<Vec<u8>>> {
    let keys: BTreeMap<String, u64> = words
        .iter()
        .enumerate()
        .map(|(i, w)| (w.to_lowercase(), i as u64))
        .collect();
    Map::from_iter(keys).ok()
}

impl fmt::Debug for VocabularySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VocabularySet")
            .field("name", &self.name)
            .field("len", &self.words.len())
            .field("revision", &self.revision)
            .finish()
    }
}

/// Name → set map with exactly one active set.
#[derive(Debug)]
pub struct VocabularyRegistry {
    sets: HashMap<String, Arc<VocabularySet>>,
    active: String,
    next_revision: u64,
}

impl VocabularyRegistry {
    /// Registry holding an empty `default` set, which is active.
    pub fn new() -> Self {
        let mut sets = HashMap::new();
        sets.insert(
            DEFAULT_SET.to_string(),
            Arc::new(VocabularySet::with_revision(DEFAULT_SET, Vec::<String>::new(), 0)),
        );
        Self {
            sets,
            active: DEFAULT_SET.to_string(),
            next_revision: 1,
        }
    }

    fn bump(&mut self) -> u64 {
        let r = self.next_revision;
        self.next_revision += 1;
        r
    }

    /// Replace the base set. Other sets keep the words they were merged with.
    pub fn set_default<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let revision = self.bump();
        let set = VocabularySet::with_revision(DEFAULT_SET, words, revision);
        tracing::debug!(words = set.len(), "default vocabulary replaced");
        self.sets.insert(DEFAULT_SET.to_string(), Arc::new(set));
    }

    /// Store `words` merged with the default set under `name` and activate it.
    ///
    /// An existing set with the same name is replaced wholesale.
    pub fn add_set<I, S>(&mut self, name: &str, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let default = self.default_set();
        let merged: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().to_string())
            .chain(default.words().iter().cloned())
            .collect();
        let revision = self.bump();
        let set = VocabularySet::with_revision(name, merged, revision);
        tracing::debug!(set = name, words = set.len(), "vocabulary set added");
        self.sets.insert(name.to_string(), Arc::new(set));
        self.active = name.to_string();
    }

    /// Switch the active set. Unknown names leave the current set active.
    pub fn activate(&mut self, name: &str) -> bool {
        if self.sets.contains_key(name) {
            self.active = name.to_string();
            true
        } else {
            tracing::warn!(set = name, active = %self.active, "ignoring activation of unknown vocabulary set");
            false
        }
    }

    pub fn active(&self) -> Arc<VocabularySet> {
        self.sets
            .get(&self.active)
            .cloned()
            .unwrap_or_else(|| self.default_set())
    }

    pub fn active_name(&self) -> &str {
        &self.active
    }

    pub fn default_set(&self) -> Arc<VocabularySet> {
        self.sets
            .get(DEFAULT_SET)
            .cloned()
            .unwrap_or_else(|| Arc::new(VocabularySet::new(DEFAULT_SET, Vec::<String>::new())))
    }

    /// Set names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sets.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for VocabularyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
