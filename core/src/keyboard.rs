//! On-screen key layouts.
//!
//! The letter board comes in several layouts keyed by the `keyboardLayout`
//! setting; `toggle_board` swaps to the shared numeric/symbol board.

use crate::settings::LetterCase;
use phf::phf_map;

const ABCD_ROWS: &[&[&str]] = &[
    &["A", "B", "C", "D", "E"],
    &["F", "G", "H", "I", "J"],
    &["K", "L", "M", "N", "O"],
    &["P", "Q", "R", "S", "T"],
    &["U", "V", "W", "X", "Y"],
    &["Z", "!", "#", "&", "?"],
];

const QWERTY_ROWS: &[&[&str]] = &[
    &["Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P"],
    &["A", "S", "D", "F", "G", "H", "J", "K", "L"],
    &["Z", "X", "C", "V", "B", "N", "M"],
    &[".", "!", "?"],
];

const AZERTY_ROWS: &[&[&str]] = &[
    &["A", "Z", "E", "R", "T", "Y", "U", "I", "O", "P"],
    &["Q", "S", "D", "F", "G", "H", "J", "K", "L", "M"],
    &["W", "X", "C", "V", "B", "N"],
    &[".", "!", "?"],
];

const DVORAK_ROWS: &[&[&str]] = &[
    &["P", "Y", "F", "G", "C", "R", "L"],
    &["A", "O", "E", "U", "I", "D", "H", "T", "N", "S"],
    &["Q", "J", "K", "X", "B", "M", "W", "V", "Z"],
    &[".", "!", "?"],
];

pub const NUMERIC_ROWS: &[&[&str]] = &[
    &["1", "2", "3"],
    &["4", "5", "6"],
    &["7", "8", "9"],
    &["0", "+", "-"],
    &["*", "/", "%"],
    &["(", ")", "."],
];

static LAYOUTS: phf::Map<&'static str, &'static [&'static [&'static str]]> = phf_map! {
    "abcd" => ABCD_ROWS,
    "qwerty" => QWERTY_ROWS,
    "azerty" => AZERTY_ROWS,
    "dvorak" => DVORAK_ROWS,
};

pub const DEFAULT_LAYOUT: &str = "abcd";

/// Letter rows for `layout`; unknown names fall back to `abcd`.
pub fn alpha_rows(layout: &str) -> &'static [&'static [&'static str]] {
    let name = layout.trim().to_ascii_lowercase();
    LAYOUTS.get(name.as_str()).copied().unwrap_or(ABCD_ROWS)
}

pub fn is_known_layout(layout: &str) -> bool {
    LAYOUTS.contains_key(layout.trim().to_ascii_lowercase().as_str())
}

/// Rows to display, cased for output.
pub fn render_rows(layout: &str, is_letter_board: bool, case: LetterCase) -> Vec<Vec<String>> {
    let rows = if is_letter_board {
        alpha_rows(layout)
    } else {
        NUMERIC_ROWS
    };
    rows.iter()
        .map(|row| row.iter().map(|k| case.apply(k)).collect())
        .collect()
}
