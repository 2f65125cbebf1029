//! The letterboard coordinator.
//!
//! `Letterboard` owns a `CompositionSession` and funnels every input event
//! through it, then refreshes predictions against the active vocabulary.
//! Speech and interaction logging happen at the edges and can never
//! change the composed text.
//!
//! Local predictions are computed inline (or after the debounce delay).
//! Remote predictions run on a worker thread; `poll()` applies a result
//! only if no newer recomputation has been issued since.

use crate::board::build_board;
use crate::corpus::CorpusProvider;
use crate::interaction::{log_quietly, InteractionKind, InteractionLog, TracingInteractionLog};
use crate::keyboard;
use crate::predictor::{current_word, Predictor};
use crate::scheduler::{Debouncer, PredictionScheduler, PredictionTicket};
use crate::session::{CompositionSession, SubmitTarget};
use crate::settings::UserSettings;
use crate::speech::{SpeechDispatcher, SpeechSynthesizer, SubmitStatus};
use crate::vocabulary::VocabularyRegistry;
use crate::word::WordBank;
use crate::Config;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Input events from the on-screen boards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// A key or string typed on the letter/numeric board
    Letter(String),
    Space,
    Backspace,
    Clear,
    /// Index into the current predictions
    SelectPrediction(usize),
    /// Index into the current word board
    SelectBoardWord(usize),
    ToggleBoard,
    Submit(SubmitTarget),
}

type PredictionResult = (PredictionTicket, Vec<String>);

pub struct Letterboard {
    config: Config,
    settings: UserSettings,
    session: CompositionSession,
    registry: VocabularyRegistry,
    corpus: CorpusProvider,
    bank: WordBank,
    predictor: Arc<dyn Predictor>,
    scheduler: PredictionScheduler,
    debouncer: Debouncer,
    results_tx: Sender<PredictionResult>,
    results_rx: Receiver<PredictionResult>,
    speech: SpeechDispatcher,
    log: Arc<dyn InteractionLog>,
}

impl Letterboard {
    /// Build a letterboard whose default vocabulary is the common corpus.
    ///
    /// Call `load_bank` or `set_bank` to add the user's words.
    pub fn new(config: Config, settings: UserSettings, corpus: CorpusProvider) -> Self {
        let (results_tx, results_rx) = mpsc::channel();
        if !keyboard::is_known_layout(&settings.keyboard_layout) {
            tracing::warn!(
                layout = %settings.keyboard_layout,
                fallback = keyboard::DEFAULT_LAYOUT,
                "unknown keyboard layout"
            );
        }
        let mut session = CompositionSession::new();
        session.set_letter_board(!settings.starts_on_word_board());

        let mut registry = VocabularyRegistry::new();
        registry.set_default(corpus.word_set(&WordBank::empty()));

        let mut board = Self {
            predictor: config.build_predictor(),
            speech: SpeechDispatcher::new(config.build_speech()),
            debouncer: Debouncer::new(config.debounce()),
            config,
            settings,
            session,
            registry,
            corpus,
            bank: WordBank::empty(),
            scheduler: PredictionScheduler::new(),
            results_tx,
            results_rx,
            log: Arc::new(TracingInteractionLog::new()),
        };
        board.refresh_board();
        board
    }

    pub fn with_predictor(mut self, predictor: Arc<dyn Predictor>) -> Self {
        self.predictor = predictor;
        self
    }

    pub fn with_speech(mut self, synth: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech = SpeechDispatcher::new(synth);
        self
    }

    pub fn with_log(mut self, log: Arc<dyn InteractionLog>) -> Self {
        self.log = log;
        self
    }

    /// Fetch the user's selected bank; failures leave a corpus-only board.
    pub fn load_bank(&mut self, user_id: &str) {
        let bank = self.corpus.bank_or_empty(user_id);
        self.set_bank(bank);
    }

    /// Replace the bank snapshot, rebuilding the default vocabulary and board.
    pub fn set_bank(&mut self, bank: WordBank) {
        self.registry.set_default(self.corpus.word_set(&bank));
        tracing::debug!(bank = %bank.id, words = bank.len(), "word bank loaded");
        self.bank = bank;
        self.refresh_board();
        self.schedule_predictions();
    }

    // ========== Session operations ==========

    pub fn append_letter(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let completed = self.session.append_letter(s);
        log_quietly(self.log.as_ref(), InteractionKind::KeyPress, s);

        if self.settings.text_to_speech {
            match completed {
                Some(sentence) => self.speak(sentence.trim()),
                None => self.speak(s),
            }
        }
        self.schedule_predictions();
    }

    pub fn space(&mut self) {
        self.append_letter(" ");
    }

    pub fn backspace(&mut self) {
        self.session.backspace();
        self.schedule_predictions();
    }

    pub fn clear(&mut self) {
        self.session.clear();
        self.debouncer.cancel();
        // Anything still in flight belongs to the cleared text.
        self.scheduler.issue();
    }

    pub fn select_prediction(&mut self, prediction: &str) {
        self.session.select_prediction(prediction);
        log_quietly(self.log.as_ref(), InteractionKind::PredictionSelected, prediction);
        self.schedule_predictions();
    }

    /// Select the `index`th current prediction. Returns false if out of range.
    pub fn select_prediction_at(&mut self, index: usize) -> bool {
        match self.session.predictions().get(index).cloned() {
            Some(p) => {
                self.select_prediction(&p);
                true
            }
            None => false,
        }
    }

    /// Append a word tile followed by a space.
    pub fn select_board_word(&mut self, word: &str) {
        self.session.append_letter(&format!("{word} "));
        log_quietly(self.log.as_ref(), InteractionKind::WordSpoken, word);
        if self.settings.text_to_speech {
            self.speak(word);
        }
        self.schedule_predictions();
    }

    pub fn select_board_word_at(&mut self, index: usize) -> bool {
        match self.session.selected_board_words().get(index).cloned() {
            Some(w) => {
                self.select_board_word(&w);
                true
            }
            None => false,
        }
    }

    pub fn toggle_board(&mut self) {
        self.session.toggle_board();
    }

    /// Hand the trimmed text (or pending sentence) to speech.
    ///
    /// The text itself is left alone; callers decide whether to clear.
    pub fn submit(&mut self, target: SubmitTarget) -> SubmitStatus {
        let Some(text) = self.session.submission(target) else {
            return self.speech.status();
        };
        log_quietly(self.log.as_ref(), InteractionKind::TextSubmit, &text);
        self.speech.dispatch(text)
    }

    pub fn handle(&mut self, event: BoardEvent) {
        match event {
            BoardEvent::Letter(s) => self.append_letter(&s),
            BoardEvent::Space => self.space(),
            BoardEvent::Backspace => self.backspace(),
            BoardEvent::Clear => self.clear(),
            BoardEvent::SelectPrediction(i) => {
                self.select_prediction_at(i);
            }
            BoardEvent::SelectBoardWord(i) => {
                self.select_board_word_at(i);
            }
            BoardEvent::ToggleBoard => self.toggle_board(),
            BoardEvent::Submit(target) => {
                self.submit(target);
            }
        }
    }

    // ========== Vocabulary ==========

    pub fn add_word_set<I, S>(&mut self, name: &str, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.registry.add_set(name, words);
        self.schedule_predictions();
    }

    /// Switch vocabulary; unknown names are ignored.
    pub fn use_word_set(&mut self, name: &str) -> bool {
        let switched = self.registry.activate(name);
        if switched {
            self.schedule_predictions();
        }
        switched
    }

    pub fn active_word_set(&self) -> &str {
        self.registry.active_name()
    }

    /// Every known word set, sorted.
    pub fn word_set_names(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn refresh_board(&mut self) {
        let words = build_board(
            &self.bank,
            self.corpus.common_words().entries(),
            self.config.board_options(),
        );
        self.session.set_board_words(words);
    }

    // ========== Recomputation ==========

    fn schedule_predictions(&mut self) {
        if self.debouncer.is_immediate() {
            self.recompute_predictions();
        } else {
            self.debouncer.trigger(Instant::now());
        }
    }

    /// Recompute now, superseding any pending or in-flight recomputation.
    pub fn recompute_predictions(&mut self) {
        self.debouncer.cancel();
        let ticket = self.scheduler.issue();
        let text = self.session.text().to_string();

        if current_word(&text).is_empty() {
            self.session.set_predictions(Vec::new());
            return;
        }

        if !self.predictor.is_remote() {
            let vocabulary = self.registry.active();
            let predictions = self
                .predictor
                .predict(&text, &vocabulary, self.config.prediction_limit);
            self.session.set_predictions(predictions);
            return;
        }

        let predictor = Arc::clone(&self.predictor);
        let vocabulary = self.registry.active();
        let limit = self.config.prediction_limit;
        let tx = self.results_tx.clone();
        std::thread::spawn(move || {
            let predictions = predictor.predict(&text, &vocabulary, limit);
            let _ = tx.send((ticket, predictions));
        });
    }

    /// Run a due debounced recomputation, then apply finished background work.
    pub fn tick(&mut self, now: Instant) {
        if self.debouncer.take_ready(now) {
            self.recompute_predictions();
        }
        self.poll();
    }

    /// Apply finished remote predictions and speech outcomes.
    pub fn poll(&mut self) -> SubmitStatus {
        while let Ok(result) = self.results_rx.try_recv() {
            self.apply_result(result);
        }
        self.speech.poll()
    }

    /// Block until the latest remote prediction lands or `timeout` passes.
    /// Returns true if predictions are current.
    pub fn wait_for_predictions(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.results_rx.recv_timeout(remaining) {
                Ok(result) => {
                    if self.apply_result(result) {
                        return true;
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return false
                }
            }
        }
    }

    fn apply_result(&mut self, (ticket, predictions): PredictionResult) -> bool {
        if self.scheduler.is_current(ticket) {
            self.session.set_predictions(predictions);
            true
        } else {
            tracing::debug!(generation = ticket.generation(), "dropping stale predictions");
            false
        }
    }

    pub fn wait_for_speech(&mut self, timeout: Duration) -> SubmitStatus {
        self.speech.wait_idle(timeout)
    }

    fn speak(&mut self, text: &str) {
        if !text.is_empty() {
            self.speech.dispatch(text.to_string());
        }
    }

    // ========== Output ==========

    pub fn session(&self) -> &CompositionSession {
        &self.session
    }

    pub fn text(&self) -> &str {
        self.session.text()
    }

    pub fn current_sentence(&self) -> &str {
        self.session.current_sentence()
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn speech_status(&self) -> SubmitStatus {
        self.speech.status()
    }

    /// Predictions as stored, regardless of display settings.
    pub fn predictions(&self) -> &[String] {
        self.session.predictions()
    }

    /// Predictions to show: empty when auto-completion is off, cased otherwise.
    pub fn visible_predictions(&self) -> Vec<String> {
        if !self.settings.auto_completion {
            return Vec::new();
        }
        let case = self.settings.letter_case();
        self.session.predictions().iter().map(|p| case.apply(p)).collect()
    }

    /// Word tiles, cased for display.
    pub fn board_words(&self) -> Vec<String> {
        let case = self.settings.letter_case();
        self.session
            .selected_board_words()
            .iter()
            .map(|w| case.apply(w))
            .collect()
    }

    /// Keys of whichever board is showing, cased for display.
    pub fn keys(&self) -> Vec<Vec<String>> {
        keyboard::render_rows(
            &self.settings.keyboard_layout,
            self.session.is_letter_board(),
            self.settings.letter_case(),
        )
    }
}
