//! Composition session state.
//!
//! `CompositionSession` is the record behind the letterboard: the full
//! transcript, the sentence accumulator, which board is shown, and the
//! latest predictions and board tiles. Every operation is total.
//!
//! `current_sentence` is always a suffix of `text`.

/// Characters that end the pending sentence.
pub const TERMINATORS: [char; 4] = [' ', '.', '!', '?'];

pub fn is_terminator(ch: char) -> bool {
    TERMINATORS.contains(&ch)
}

/// Which buffer `submit` hands to speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitTarget {
    #[default]
    Text,
    Sentence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionSession {
    text: String,
    current_sentence: String,
    is_letter_board: bool,
    predictions: Vec<String>,
    selected_board_words: Vec<String>,
}

impl CompositionSession {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            current_sentence: String::new(),
            is_letter_board: true,
            predictions: Vec::new(),
            selected_board_words: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn current_sentence(&self) -> &str {
        &self.current_sentence
    }

    pub fn is_letter_board(&self) -> bool {
        self.is_letter_board
    }

    pub fn predictions(&self) -> &[String] {
        &self.predictions
    }

    pub fn selected_board_words(&self) -> &[String] {
        &self.selected_board_words
    }

    /// Append `s` to the transcript.
    ///
    /// If `s` contains a terminator, the sentence including `s` is complete:
    /// it is returned and the accumulator resets.
    pub fn append_letter(&mut self, s: &str) -> Option<String> {
        self.text.push_str(s);
        self.current_sentence.push_str(s);
        if s.chars().any(is_terminator) {
            Some(std::mem::take(&mut self.current_sentence))
        } else {
            None
        }
    }

    /// Remove one trailing character from the transcript and the sentence.
    pub fn backspace(&mut self) {
        self.text.pop();
        self.current_sentence.pop();
    }

    /// Reset transcript, sentence and predictions.
    pub fn clear(&mut self) {
        self.text.clear();
        self.current_sentence.clear();
        self.predictions.clear();
    }

    /// Replace the word being typed with `prediction` and add a space.
    pub fn select_prediction(&mut self, prediction: &str) {
        let keep = self
            .text
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        self.text.truncate(keep);
        self.text.push_str(prediction);
        self.text.push(' ');
        self.resync_sentence();
    }

    pub fn toggle_board(&mut self) {
        self.is_letter_board = !self.is_letter_board;
    }

    pub fn set_letter_board(&mut self, is_letter_board: bool) {
        self.is_letter_board = is_letter_board;
    }

    pub fn set_predictions(&mut self, predictions: Vec<String>) {
        self.predictions = predictions;
    }

    pub fn set_board_words(&mut self, words: Vec<String>) {
        self.selected_board_words = words;
    }

    /// Trimmed text to hand to speech, or `None` if there is nothing to say.
    pub fn submission(&self, target: SubmitTarget) -> Option<String> {
        let source = match target {
            SubmitTarget::Text => &self.text,
            SubmitTarget::Sentence => &self.current_sentence,
        };
        let trimmed = source.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Recompute the sentence as the text after the last terminator.
    fn resync_sentence(&mut self) {
        let start = self
            .text
            .char_indices()
            .rev()
            .find(|(_, c)| is_terminator(*c))
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        self.current_sentence = self.text[start..].to_string();
    }
}

impl Default for CompositionSession {
    fn default() -> Self {
        Self::new()
    }
}
