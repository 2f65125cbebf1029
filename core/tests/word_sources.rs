// core/tests/word_sources.rs
//
// Integration tests for where board and prediction words come from.
//
// Tests cover:
// - Loading a user's selected bank from a redb store
// - Degrading to a corpus-only board when the bank source fails
// - Bundled corpus as the default vocabulary
// - Board size and common-word floor properties

use letterboard_core::{
    build_board, BoardOptions, CommonWords, Config, CorpusProvider, Letterboard,
    LetterboardError, RedbBankStore, UserSettings, WordBank, WordBankSource,
};
use std::collections::HashSet;
use std::sync::Arc;

struct OfflineSource;

impl WordBankSource for OfflineSource {
    fn fetch(&self, _user_id: &str) -> letterboard_core::Result<WordBank> {
        Err(LetterboardError::DataUnavailable("connection refused".into()))
    }

    fn get_bank(&self, bank_id: &str) -> letterboard_core::Result<WordBank> {
        Err(LetterboardError::NotFound(bank_id.into()))
    }
}

fn config() -> Config {
    Config {
        debounce_ms: 0,
        ..Config::default()
    }
}

fn lowercase() -> UserSettings {
    UserSettings {
        letter_case: "lowercase".into(),
        ..UserSettings::default()
    }
}

#[test]
fn selected_bank_from_redb_drives_board_and_predictions() {
    let dir = tempfile::tempdir().unwrap();
    let store = RedbBankStore::open(dir.path().join("banks.redb")).unwrap();
    store
        .put_bank(&WordBank::from_words(
            "snacks",
            "Snacks",
            [("pretzel", true), ("popcorn", false)],
        ))
        .unwrap();
    store.select_bank("u1", "snacks").unwrap();

    let corpus = CorpusProvider::bundled().with_source(Box::new(store));
    let mut lb = Letterboard::new(config(), lowercase(), corpus);
    lb.load_bank("u1");

    let board = lb.board_words();
    assert_eq!(board.len(), 30);
    assert_eq!(&board[..3], &["pretzel", "popcorn", "the"]);

    lb.append_letter("p");
    lb.append_letter("r");
    assert_eq!(lb.predictions()[0], "pretzel");
}

#[test]
fn unavailable_bank_source_falls_back_to_corpus() {
    let corpus = CorpusProvider::new(Arc::new(CommonWords::from_words(["yes", "no", "more"])))
        .with_source(Box::new(OfflineSource));
    let mut lb = Letterboard::new(config(), lowercase(), corpus);
    lb.load_bank("u1");
    assert_eq!(lb.board_words(), vec!["yes", "no", "more"]);

    lb.append_letter("m");
    assert_eq!(lb.predictions(), &["more".to_string()]);
}

#[test]
fn missing_selection_falls_back_to_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let store = RedbBankStore::open(dir.path().join("banks.redb")).unwrap();
    let corpus = CorpusProvider::new(Arc::new(CommonWords::from_words(["go", "stop"])))
        .with_source(Box::new(store));
    let mut lb = Letterboard::new(config(), lowercase(), corpus);
    lb.load_bank("nobody");
    assert_eq!(lb.board_words(), vec!["go", "stop"]);
}

#[test]
fn bundled_corpus_backs_a_fresh_letterboard() {
    let mut lb = Letterboard::new(config(), lowercase(), CorpusProvider::bundled());
    assert_eq!(lb.board_words().len(), 30);
    assert_eq!(lb.board_words()[0], "the");

    lb.append_letter("p");
    lb.append_letter("l");
    let predictions = lb.predictions().to_vec();
    assert!(!predictions.is_empty());
    assert!(predictions.len() <= 5);
    assert!(predictions.iter().all(|p| p.to_lowercase().starts_with("pl")));
}

#[test]
fn board_properties_hold_across_bank_sizes() {
    let common = CommonWords::from_words((1..=40).map(|i| format!("c{i}")));
    let options = BoardOptions::default();

    for highlighted in [0usize, 3, 22, 40] {
        for other in [0usize, 5, 30] {
            let words = (0..highlighted)
                .map(|i| (format!("h{i}"), true))
                .chain((0..other).map(|i| (format!("n{i}"), false)));
            let bank = WordBank::from_words("b", "b", words);
            let board = build_board(&bank, common.entries(), options);

            assert_eq!(board.len(), options.board_size);
            let distinct: HashSet<&String> = board.iter().collect();
            assert_eq!(distinct.len(), board.len());
            for i in 1..=options.min_common_words {
                assert!(board.contains(&format!("c{i}")), "c{i} missing");
            }
            // Highlighted words lead in bank order.
            let leading = highlighted.min(options.board_size - options.min_common_words);
            for (i, word) in board.iter().take(leading).enumerate() {
                assert_eq!(word, &format!("h{i}"));
            }
        }
    }
}

#[test]
fn board_properties_hold_when_bank_overlaps_the_corpus() {
    let common = CommonWords::from_words((1..=40).map(|i| format!("c{i}")));
    let options = BoardOptions::default();

    for overlap in [1usize, 4, 8] {
        for extra in [0usize, 5, 19, 30] {
            // Floor words in the bank, alternating case.
            let highlighted: Vec<String> = (1..=overlap)
                .map(|i| if i % 2 == 0 { format!("C{i}") } else { format!("c{i}") })
                .chain((0..extra).map(|i| format!("h{i}")))
                .collect();
            let others = ["c5", "n0", "C12", "n1"];
            let words = highlighted
                .iter()
                .map(|w| (w.clone(), true))
                .chain(others.iter().map(|w| (w.to_string(), false)));
            let bank = WordBank::from_words("b", "b", words);
            let board = build_board(&bank, common.entries(), options);

            let keys: HashSet<String> = board.iter().map(|w| w.to_lowercase()).collect();
            assert_eq!(keys.len(), board.len(), "repeated word in {board:?}");
            assert_eq!(board.len(), options.board_size);
            for i in 1..=options.min_common_words {
                assert!(keys.contains(&format!("c{i}")), "c{i} missing from {board:?}");
            }

            // Floor words already in the bank need no reserved slot.
            let room = options.board_size - (options.min_common_words - overlap);
            if highlighted.len() <= room {
                assert_eq!(&board[..highlighted.len()], highlighted.as_slice());
            }
        }
    }
}

#[test]
fn board_is_deterministic() {
    let bank = WordBank::from_words("b", "b", [("cat", true), ("dog", false), ("fish", true)]);
    let common = CommonWords::bundled();
    let first = build_board(&bank, common.entries(), BoardOptions::default());
    let second = build_board(&bank, common.entries(), BoardOptions::default());
    assert_eq!(first, second);
    assert_eq!(&first[..3], &["cat", "fish", "dog"]);
}
