//! Per-user display and behaviour settings.
//!
//! Stored by the account layer as camelCase JSON; the core only reads them.

use crate::error::Result;
use crate::keyboard;
use serde::{Deserialize, Serialize};

/// Case applied to predictions, board tiles and keys at output time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LetterCase {
    #[default]
    Uppercase,
    Lowercase,
}

impl LetterCase {
    /// Anything other than `"lowercase"` renders uppercase.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("lowercase") {
            Self::Lowercase
        } else {
            Self::Uppercase
        }
    }

    pub fn apply(&self, s: &str) -> String {
        match self {
            Self::Uppercase => s.to_uppercase(),
            Self::Lowercase => s.to_lowercase(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uppercase => "uppercase",
            Self::Lowercase => "lowercase",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub theme: String,
    pub input_mode: String,
    pub text_to_speech: bool,
    pub auto_completion: bool,
    pub text_color: String,
    pub button_color: String,
    pub keyboard_delay: u32,
    pub font_size: u32,
    pub keyboard_layout: String,
    pub font: String,
    pub letter_case: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            input_mode: "letter".to_string(),
            text_to_speech: false,
            auto_completion: false,
            text_color: "#ffffff".to_string(),
            button_color: "#000000".to_string(),
            keyboard_delay: 0,
            font_size: 32,
            keyboard_layout: keyboard::DEFAULT_LAYOUT.to_string(),
            font: "inter".to_string(),
            letter_case: LetterCase::default().as_str().to_string(),
        }
    }
}

impl UserSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn letter_case(&self) -> LetterCase {
        LetterCase::parse(&self.letter_case)
    }

    /// Whether the session starts on the word board instead of letters.
    pub fn starts_on_word_board(&self) -> bool {
        self.input_mode == "word"
    }
}
