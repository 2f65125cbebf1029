//! Word-board selection.
//!
//! Highlighted bank words come first, then non-highlighted bank words up
//! to `board_size - min_common_words`, then a floor of the top-ranked
//! common words, then more common words until the board is full. A word
//! never appears twice (case-insensitive).
//!
//! While bank words are placed, one slot stays reserved for every floor
//! word not yet on the board, so the floor survives the final truncation
//! even when the bank alone could fill the board. A bank word that is
//! itself a floor word uses its own reserved slot. If the corpus runs out
//! before the board is full, leftover bank words are used.

use crate::word::{WordBank, WordEntry};
use ahash::AHashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardOptions {
    pub board_size: usize,
    pub min_common_words: usize,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            board_size: 30,
            min_common_words: 8,
        }
    }
}

struct Board {
    size: usize,
    words: Vec<String>,
    seen: AHashSet<String>,
    floor: AHashSet<String>,
}

impl Board {
    fn push(&mut self, text: &str) -> bool {
        if self.seen.insert(text.to_lowercase()) {
            self.words.push(text.to_string());
            true
        } else {
            false
        }
    }

    /// Floor words still waiting for a slot.
    fn reserved(&self) -> usize {
        self.floor.iter().filter(|k| !self.seen.contains(*k)).count()
    }

    /// Whether a bank word fits without crowding out the floor.
    fn has_room_for(&self, entry: &WordEntry) -> bool {
        let key = entry.key();
        if self.seen.contains(&key) {
            true
        } else if self.floor.contains(&key) {
            self.words.len() < self.size
        } else {
            self.words.len() + self.reserved() < self.size
        }
    }
}

/// Build the word tiles for `bank` against a rank-ordered `common` list.
///
/// Deterministic for identical inputs.
pub fn build_board(bank: &WordBank, common: &[WordEntry], options: BoardOptions) -> Vec<String> {
    let size = options.board_size;
    if size == 0 {
        return Vec::new();
    }

    // Distinct top-ranked common words that must be on the board.
    let mut floor_keys = AHashSet::new();
    let floor: Vec<&WordEntry> = common
        .iter()
        .filter(|e| floor_keys.insert(e.key()))
        .take(options.min_common_words.min(size))
        .collect();

    let non_highlighted_cap = size.saturating_sub(options.min_common_words);

    let mut board = Board {
        size,
        words: Vec::with_capacity(size),
        seen: AHashSet::new(),
        floor: floor.iter().map(|e| e.key()).collect(),
    };

    let highlighted: Vec<&WordEntry> = bank.highlighted().collect();
    let non_highlighted: Vec<&WordEntry> = bank.non_highlighted().collect();

    let mut next_highlighted = 0;
    while next_highlighted < highlighted.len()
        && board.has_room_for(highlighted[next_highlighted])
    {
        board.push(&highlighted[next_highlighted].text);
        next_highlighted += 1;
    }

    let mut next_other = 0;
    while next_other < non_highlighted.len()
        && board.words.len() < non_highlighted_cap
        && board.has_room_for(non_highlighted[next_other])
    {
        board.push(&non_highlighted[next_other].text);
        next_other += 1;
    }

    for entry in &floor {
        board.push(&entry.text);
    }

    for entry in common {
        if board.words.len() >= size {
            break;
        }
        board.push(&entry.text);
    }

    let leftovers = non_highlighted[next_other..]
        .iter()
        .chain(highlighted[next_highlighted..].iter());
    for entry in leftovers {
        if board.words.len() >= size {
            break;
        }
        board.push(&entry.text);
    }

    board.words.truncate(size);
    board.words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CommonWords;

    fn common(n: usize) -> CommonWords {
        CommonWords::from_words((1..=n).map(|i| format!("c{i}")))
    }

    fn opts(board_size: usize, min_common_words: usize) -> BoardOptions {
        BoardOptions {
            board_size,
            min_common_words,
        }
    }

    #[test]
    fn bank_words_fill_before_common_floor() {
        let bank = WordBank::from_words("b", "b", [("apple", true), ("banana", false)]);
        let board = build_board(&bank, common(20).entries(), opts(5, 3));
        assert_eq!(board, vec!["apple", "banana", "c1", "c2", "c3"]);
    }

    #[test]
    fn empty_bank_is_pure_common_words() {
        let board = build_board(&WordBank::empty(), common(40).entries(), opts(30, 8));
        assert_eq!(board.len(), 30);
        assert_eq!(board[0], "c1");
        assert_eq!(board[29], "c30");
    }

    #[test]
    fn floor_survives_a_large_highlighted_bank() {
        let bank = WordBank::from_words("b", "b", (0..50).map(|i| (format!("h{i}"), true)));
        let board = build_board(&bank, common(20).entries(), opts(30, 8));
        assert_eq!(board.len(), 30);
        assert_eq!(&board[..2], &["h0", "h1"]);
        for i in 1..=8 {
            assert!(board.contains(&format!("c{i}")));
        }
        assert!(!board.contains(&"c9".to_string()));
    }

    #[test]
    fn no_duplicates_across_sources() {
        let bank = WordBank::from_words("b", "b", [("C1", true), ("x", false), ("c2", false)]);
        let board = build_board(&bank, common(10).entries(), opts(6, 3));
        assert_eq!(board, vec!["C1", "x", "c2", "c3", "c4", "c5"]);
        let keys: AHashSet<String> = board.iter().map(|w| w.to_lowercase()).collect();
        assert_eq!(keys.len(), board.len());
    }

    #[test]
    fn highlighted_floor_words_keep_other_highlights() {
        let bank = WordBank::from_words("b", "b", [("c1", true), ("h1", true), ("h2", true)]);
        let board = build_board(&bank, common(20).entries(), opts(10, 8));
        assert_eq!(
            board,
            vec!["c1", "h1", "h2", "c2", "c3", "c4", "c5", "c6", "c7", "c8"]
        );
    }

    #[test]
    fn non_highlighted_floor_word_uses_its_own_slot() {
        let bank = WordBank::from_words("b", "b", [("h1", true), ("c3", false), ("n1", false)]);
        let board = build_board(&bank, common(20).entries(), opts(6, 4));
        // Non-highlighted words stop at board_size - min_common_words.
        assert_eq!(board, vec!["h1", "c3", "c1", "c2", "c4", "c5"]);
    }

    #[test]
    fn case_variant_of_a_floor_word_counts_toward_the_floor() {
        let bank = WordBank::from_words("b", "b", [("The", true), ("apple", true)]);
        let common = CommonWords::from_words(["the", "and", "a", "to", "of"]);
        let board = build_board(&bank, common.entries(), opts(4, 3));
        assert_eq!(board, vec!["The", "apple", "and", "a"]);
    }

    #[test]
    fn whole_floor_in_bank_frees_every_reserved_slot() {
        let words = (1..=8)
            .map(|i| (format!("c{i}"), true))
            .chain((0..40).map(|i| (format!("h{i}"), true)));
        let bank = WordBank::from_words("b", "b", words);
        let board = build_board(&bank, common(40).entries(), opts(30, 8));
        assert_eq!(board.len(), 30);
        assert_eq!(board[8], "h0");
        assert_eq!(board[29], "h21");
        assert!(!board.contains(&"c9".to_string()));
    }

    #[test]
    fn leftover_bank_words_fill_when_corpus_is_short() {
        let bank = WordBank::from_words("b", "b", (0..10).map(|i| (format!("n{i}"), false)));
        let board = build_board(&bank, common(2).entries(), opts(8, 4));
        // Four bank slots, both common words, then leftovers.
        assert_eq!(board, vec!["n0", "n1", "n2", "n3", "c1", "c2", "n4", "n5"]);
    }

    #[test]
    fn exhausted_sources_give_a_short_board() {
        let bank = WordBank::from_words("b", "b", [("a", true)]);
        let board = build_board(&bank, common(2).entries(), opts(30, 8));
        assert_eq!(board, vec!["a", "c1", "c2"]);
        assert!(build_board(&bank, common(2).entries(), opts(0, 8)).is_empty());
    }
}
