//! letterboard - terminal letterboard and word-bank import
//!
//! Usage:
//!   letterboard import-bank --db banks.redb --user u1 --name Food --highlight apple,bread words.txt
//!   letterboard run --db banks.redb --user u1
//!   letterboard run --config letterboard.toml --settings settings.json
//!
//! `run` reads one command per line:
//!   type <s> | space | back | clear | pick <n> | word <n> | toggle | board
//!   submit | set <name> <words...> | use <name> | sets | quit

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use letterboard_core::{
    current_word, utils::normalize, Config, CorpusProvider, Letterboard, PredictorKind,
    RedbBankStore, SubmitTarget, TracingInteractionLog, UserSettings, WordBank,
};
use std::collections::HashSet;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "letterboard")]
#[command(about = "Terminal AAC letterboard")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose text interactively
    Run {
        /// Engine configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// User settings (JSON)
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Word bank database
        #[arg(short, long)]
        db: Option<PathBuf>,

        #[arg(short, long, default_value = "local")]
        user: String,
    },

    /// Store a word bank and select it for a user
    ImportBank {
        /// Word bank database
        #[arg(short, long)]
        db: PathBuf,

        #[arg(short, long)]
        user: String,

        /// Bank display name
        #[arg(short, long)]
        name: String,

        /// Comma-separated words to highlight
        #[arg(long, value_delimiter = ',')]
        highlight: Vec<String>,

        /// File with one word per line
        words: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Run {
            config,
            settings,
            db,
            user,
        } => run(config.as_deref(), settings.as_deref(), db.as_deref(), &user),
        Command::ImportBank {
            db,
            user,
            name,
            highlight,
            words,
        } => import_bank(&db, &user, &name, &highlight, &words),
    }
}

// ========== import-bank ==========

fn bank_id(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn import_bank(
    db: &Path,
    user: &str,
    name: &str,
    highlight: &[String],
    words: &Path,
) -> Result<()> {
    let content = std::fs::read_to_string(words)
        .with_context(|| format!("Failed to read word file {}", words.display()))?;

    let highlighted: HashSet<String> = highlight
        .iter()
        .map(|w| normalize(w).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();

    let id = bank_id(name);
    if id.is_empty() {
        anyhow::bail!("Bank name must not be blank");
    }

    let mut bank = WordBank::new(id, normalize(name));
    let mut seen = HashSet::new();
    for line in content.lines() {
        let word = normalize(line);
        if word.is_empty() || !seen.insert(word.to_lowercase()) {
            continue;
        }
        let is_highlighted = highlighted.contains(&word.to_lowercase());
        bank.push(&word, is_highlighted);
    }
    if bank.is_empty() {
        anyhow::bail!("No words found in {}", words.display());
    }

    let store = RedbBankStore::open(db)
        .with_context(|| format!("Failed to open bank database {}", db.display()))?;
    store.put_bank(&bank)?;
    store.select_bank(user, &bank.id)?;

    println!(
        "Imported {} words ({} highlighted) as bank '{}' for user {}",
        bank.len(),
        bank.highlighted().count(),
        bank.id,
        user
    );
    Ok(())
}

// ========== run ==========

enum Step {
    Continue,
    Quit,
}

fn run(
    config_path: Option<&Path>,
    settings_path: Option<&Path>,
    db: Option<&Path>,
    user: &str,
) -> Result<()> {
    let config = match config_path {
        Some(path) => Config::load_toml(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    let settings = match settings_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings {}", path.display()))?;
            UserSettings::from_json(&json)?
        }
        // Without a settings file, show predictions.
        None => UserSettings {
            auto_completion: true,
            ..UserSettings::default()
        },
    };

    tracing::debug!(user, predictor = ?config.predictor, "starting letterboard");

    let mut corpus = CorpusProvider::bundled();
    if let Some(db) = db {
        let store = RedbBankStore::open(db)
            .with_context(|| format!("Failed to open bank database {}", db.display()))?;
        corpus = corpus.with_source(Box::new(store));
    }

    let mut board = Letterboard::new(config.clone(), settings, corpus)
        .with_log(Arc::new(TracingInteractionLog::for_user(user)));
    board.load_bank(user);
    print_state(&board);

    let speech_timeout = Duration::from_millis(config.speech_timeout_ms);
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match execute(&mut board, line.trim(), speech_timeout) {
            Ok(Step::Quit) => break,
            Ok(Step::Continue) => {}
            Err(msg) => {
                eprintln!("  ⚠ {}", msg);
                continue;
            }
        }
        settle(&mut board, &config);
        print_state(&board);
    }
    Ok(())
}

fn execute(
    board: &mut Letterboard,
    line: &str,
    speech_timeout: Duration,
) -> std::result::Result<Step, String> {
    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
    match cmd {
        "" => {}
        "type" => board.append_letter(rest),
        "space" => board.space(),
        "back" => board.backspace(),
        "clear" => board.clear(),
        "pick" => {
            let n = index(rest)?;
            if !board.select_prediction_at(n) {
                return Err(format!("No prediction {}", n + 1));
            }
        }
        "word" => {
            let n = index(rest)?;
            if !board.select_board_word_at(n) {
                return Err(format!("No board word {}", n + 1));
            }
        }
        "toggle" => board.toggle_board(),
        "board" => {
            for row in board.keys() {
                println!("  {}", row.join(" "));
            }
        }
        "submit" => {
            board.submit(SubmitTarget::Text);
            println!("  speech: {:?}", board.wait_for_speech(speech_timeout));
        }
        "set" => {
            let mut parts = rest.split_whitespace();
            let name = parts.next().ok_or("Usage: set <name> <words...>")?;
            board.add_word_set(name, parts);
        }
        "use" => {
            let name = rest.trim();
            if !board.use_word_set(name) {
                return Err(format!("Unknown word set '{}'", name));
            }
        }
        "sets" => {
            let active = board.active_word_set().to_string();
            for name in board.word_set_names() {
                let marker = if name == active { '*' } else { ' ' };
                println!("  {} {}", marker, name);
            }
        }
        "quit" | "exit" => return Ok(Step::Quit),
        other => return Err(format!("Unknown command '{}'", other)),
    }
    Ok(Step::Continue)
}

/// Parse a 1-based position.
fn index(arg: &str) -> std::result::Result<usize, String> {
    match arg.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("Expected a position starting at 1, got '{}'", arg.trim())),
    }
}

/// Each line is a quiet period: flush debounced work and let a remote
/// predictor answer before printing.
fn settle(board: &mut Letterboard, config: &Config) {
    board.tick(Instant::now() + config.debounce());
    if config.predictor == PredictorKind::Remote && !current_word(board.text()).is_empty() {
        board.wait_for_predictions(Duration::from_millis(config.remote_timeout_ms + 100));
    }
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, w)| format!("{}.{}", i + 1, w))
        .collect::<Vec<_>>()
        .join("  ")
}

fn print_state(board: &Letterboard) {
    println!("  text:        {:?}", board.text());
    println!("  sentence:    {:?}", board.current_sentence());
    println!("  predictions: {}", numbered(&board.visible_predictions()));
    println!(
        "  board ({}, {}): {}",
        board.active_word_set(),
        if board.session().is_letter_board() {
            board.settings().keyboard_layout.as_str()
        } else {
            "numbers"
        },
        numbered(&board.board_words())
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use letterboard_core::CommonWords;

    fn letterboard() -> Letterboard {
        let corpus = CorpusProvider::new(Arc::new(CommonWords::from_words(["hello", "help"])));
        let config = Config {
            debounce_ms: 0,
            ..Config::default()
        };
        Letterboard::new(config, UserSettings::default(), corpus)
    }

    #[test]
    fn bank_ids_are_slugs() {
        assert_eq!(bank_id("  Food and Drink "), "food-and-drink");
        assert_eq!(bank_id("   "), "");
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(index("1"), Ok(0));
        assert!(index("0").is_err());
        assert!(index("x").is_err());
    }

    #[test]
    fn commands_drive_the_session() {
        let mut board = letterboard();
        let timeout = Duration::from_millis(10);
        for line in ["type h", "type e", "pick 1", "type x", "back"] {
            assert!(matches!(execute(&mut board, line, timeout), Ok(Step::Continue)));
        }
        assert_eq!(board.text(), "help ");
        assert!(execute(&mut board, "pick 9", timeout).is_err());
        assert!(execute(&mut board, "use nothing", timeout).is_err());
        assert!(execute(&mut board, "dance", timeout).is_err());
        assert!(matches!(execute(&mut board, "quit", timeout), Ok(Step::Quit)));
    }

    #[test]
    fn set_adds_and_activates_a_word_set() {
        let mut board = letterboard();
        let timeout = Duration::from_millis(10);
        assert!(execute(&mut board, "set zoo zebra yak", timeout).is_ok());
        assert_eq!(board.active_word_set(), "zoo");
        assert!(execute(&mut board, "type z", timeout).is_ok());
        assert_eq!(board.predictions(), &["zebra".to_string()]);
    }

    #[test]
    fn sets_lists_word_sets_without_switching() {
        let mut board = letterboard();
        let timeout = Duration::from_millis(10);
        assert!(execute(&mut board, "set zoo zebra", timeout).is_ok());
        assert!(execute(&mut board, "set food apple", timeout).is_ok());
        assert!(execute(&mut board, "sets", timeout).is_ok());
        assert_eq!(board.word_set_names(), vec!["default", "food", "zoo"]);
        assert_eq!(board.active_word_set(), "food");
    }

    #[test]
    fn import_stores_and_selects_the_bank() {
        let dir = tempfile::tempdir().unwrap();
        let words = dir.path().join("words.txt");
        std::fs::write(&words, "apple\n\n  bread \nApple\nmilk\n").unwrap();
        let db = dir.path().join("banks.redb");

        import_bank(&db, "u1", "Breakfast", &["bread".into()], &words).unwrap();

        let store = RedbBankStore::open(&db).unwrap();
        assert_eq!(store.selected_bank("u1").unwrap().as_deref(), Some("breakfast"));
        let bank = letterboard_core::WordBankSource::get_bank(&store, "breakfast").unwrap();
        let words: Vec<&str> = bank.words().collect();
        assert_eq!(words, vec!["apple", "bread", "milk"]);
        assert_eq!(bank.highlighted().count(), 1);
    }
}
