use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::evaluator::{classify, Classification};
use crate::puzzle::{Cell, Puzzle};
use crate::selection::Selection;
use crate::session::SessionState;
use crate::store::ProgressStore;

/// How long a feedback message stays on screen.
pub const FEEDBACK_TTL: Duration = Duration::from_secs(2);

const STORAGE_PREFIX: &str = "strands-progress";

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// press, drag across letters, release to submit
    #[default]
    Drag,
    /// tap letters one by one, submit explicitly
    Tap,
}

impl InputMode {
    pub fn toggled(self) -> Self {
        match self {
            InputMode::Drag => InputMode::Tap,
            InputMode::Tap => InputMode::Drag,
        }
    }
}

/// Transient message shown after a gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub shown_at: Instant,
}

impl Feedback {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= FEEDBACK_TTL
    }
}

/// Reported once, when the last word is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub puzzle: String,
    pub elapsed_seconds: u64,
    pub words: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub text: String,
    pub is_spangram: bool,
}

/// Owns one puzzle session: the selection, the found words, the clock, and
/// write-through persistence. Every gesture from the presentation layer goes
/// through here.
#[derive(Debug)]
pub struct Game<S: ProgressStore> {
    puzzle: Puzzle,
    store: S,
    selection: Selection,
    session: SessionState,
    locked: HashSet<Cell>,
    input_mode: InputMode,
    dragging: bool,
    visible: bool,
    feedback: Option<Feedback>,
    completion: Option<Completion>,
}

impl<S: ProgressStore> Game<S> {
    /// Start a session, resuming saved progress when the store has any.
    pub fn new(puzzle: Puzzle, store: S) -> Self {
        let key = storage_key(&puzzle);
        let session = match store.load(&key).and_then(SessionState::from_json) {
            Some(saved) => {
                let restored = saved.sanitize(&puzzle);
                info!(
                    puzzle = %puzzle.name,
                    found = restored.found_words.len(),
                    elapsed = restored.elapsed_seconds,
                    "resuming saved progress"
                );
                restored
            }
            None => SessionState::new(),
        };

        let mut game = Self {
            puzzle,
            store,
            selection: Selection::new(),
            visible: true,
            session,
            locked: HashSet::new(),
            input_mode: InputMode::default(),
            dragging: false,
            feedback: None,
            completion: None,
        };
        game.rebuild_locked();
        game
    }

    pub fn with_input_mode(mut self, mode: InputMode) -> Self {
        self.input_mode = mode;
        self
    }

    pub fn storage_key(&self) -> String {
        storage_key(&self.puzzle)
    }

    /// Append a cell to the selection. Silently refused for out-of-bounds,
    /// locked, repeated, or non-adjacent cells and once the puzzle is solved.
    pub fn try_append(&mut self, cell: Cell) -> bool {
        if self.session.is_complete || !self.puzzle.grid().contains(cell) {
            return false;
        }
        let appended = self.selection.try_append(cell, &self.locked);
        debug!(%cell, appended, "append");
        appended
    }

    pub fn remove_last(&mut self, cell: Cell) -> bool {
        if self.session.is_complete {
            return false;
        }
        self.selection.remove_last(cell)
    }

    pub fn clear(&mut self) {
        self.selection.clear();
        self.dragging = false;
    }

    /// Classify the current selection and apply the result. The selection is
    /// always empty afterwards.
    pub fn submit(&mut self) -> Classification {
        let path = self.selection.take();
        self.dragging = false;

        let result = classify(&path, &self.puzzle, &self.session.found_words);
        debug!(len = path.len(), ?result, "submit");

        if self.session.is_complete {
            return result;
        }

        if let Classification::NewMatch { word, .. } = &result {
            self.record_found(word.clone());
        }

        if !self.session.is_complete {
            self.feedback = Some(Feedback::new(result.message()));
        }
        result
    }

    /// Pointer down / pointer move / tap, whatever the input mode.
    pub fn begin_or_extend(&mut self, cell: Cell) -> bool {
        if self.session.is_complete || !self.puzzle.grid().contains(cell) {
            return false;
        }

        match self.input_mode {
            InputMode::Drag if !self.dragging => {
                // a refused press only clears; moves are ignored until the next press
                let cleared = !self.selection.is_empty();
                self.selection.clear();
                self.dragging = self.try_append(cell);
                self.dragging || cleared
            }
            InputMode::Drag => self.try_append(cell),
            InputMode::Tap => {
                if self.selection.last() == Some(cell) {
                    return self.remove_last(cell);
                }
                let appended = self.try_append(cell);
                if !appended && !self.selection.is_empty() && !self.selection.contains(cell) {
                    self.feedback = Some(Feedback::new("Select adjacent letters"));
                }
                appended
            }
        }
    }

    /// Pointer up. A drag of at least three letters is submitted; shorter
    /// drags stay selected. Tap mode submits explicitly, so this is a no-op there.
    pub fn end_selection(&mut self) -> Option<Classification> {
        if self.input_mode != InputMode::Drag || !self.dragging {
            return None;
        }
        self.dragging = false;
        if self.selection.len() >= crate::evaluator::MIN_WORD_LEN {
            Some(self.submit())
        } else {
            None
        }
    }

    /// Throw away the current session and its saved progress. Idempotent.
    pub fn new_game(&mut self) {
        if let Err(e) = self.store.clear(&self.storage_key()) {
            warn!(error = %e, "could not clear saved progress");
        }
        self.session = SessionState::new();
        self.selection.clear();
        self.locked.clear();
        self.dragging = false;
        self.feedback = None;
        self.completion = None;
        info!(puzzle = %self.puzzle.name, "new game");
    }

    /// One timer period. Only counts while running and unsolved.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.session.elapsed_seconds += 1;
        self.persist();
        true
    }

    /// Visibility of the hosting view. The clock never resumes once solved.
    pub fn set_running(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_running(&self) -> bool {
        self.visible && !self.session.is_complete
    }

    pub fn set_input_mode(&mut self, mode: InputMode) {
        if mode != self.input_mode {
            self.input_mode = mode;
            self.clear();
        }
    }

    pub fn toggle_input_mode(&mut self) -> InputMode {
        self.set_input_mode(self.input_mode.toggled());
        self.input_mode
    }

    pub fn dismiss_expired_feedback(&mut self, now: Instant) {
        if self.feedback.as_ref().is_some_and(|f| f.is_expired(now)) {
            self.feedback = None;
        }
    }

    /// Hands out the completion exactly once.
    pub fn take_completion(&mut self) -> Option<Completion> {
        self.completion.take()
    }

    pub fn is_selected(&self, cell: Cell) -> bool {
        self.selection.contains(cell)
    }

    pub fn is_found(&self, cell: Cell) -> bool {
        self.locked.contains(&cell)
    }

    pub fn is_spangram_revealed(&self, cell: Cell) -> bool {
        self.puzzle
            .spangram()
            .is_some_and(|s| self.session.has_found(&s.word) && s.covers(cell))
    }

    /// Hints for the words still hidden, in puzzle order.
    pub fn hints(&self) -> Vec<Hint> {
        self.puzzle
            .words()
            .iter()
            .filter(|w| !self.session.has_found(&w.word))
            .map(|w| Hint {
                text: w.hint.clone(),
                is_spangram: w.is_spangram,
            })
            .collect()
    }

    pub fn progress(&self) -> (usize, usize) {
        (self.session.found_words.len(), self.puzzle.total_words())
    }

    pub fn current_letters(&self) -> String {
        self.selection.current_letters(self.puzzle.grid())
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_complete(&self) -> bool {
        self.session.is_complete
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    fn record_found(&mut self, word: String) {
        if let Some(def) = self.puzzle.word(&word) {
            self.locked.extend(def.path.iter().copied());
        }
        self.session.found_words.push(word);

        if self.session.found_words.len() == self.puzzle.total_words() {
            self.session.is_complete = true;
            self.feedback = Some(Feedback::new("Puzzle complete!"));
            self.completion = Some(Completion {
                puzzle: self.puzzle.name.clone(),
                elapsed_seconds: self.session.elapsed_seconds,
                words: self.puzzle.total_words(),
            });
            info!(
                puzzle = %self.puzzle.name,
                elapsed = self.session.elapsed_seconds,
                "puzzle complete"
            );
        }
        self.persist();
    }

    fn rebuild_locked(&mut self) {
        self.locked = self
            .session
            .found_words
            .iter()
            .filter_map(|w| self.puzzle.word(w))
            .flat_map(|def| def.path.iter().copied())
            .collect();
    }

    fn persist(&self) {
        if self.session.is_empty() {
            return;
        }
        if let Err(e) = self.store.save(&self.storage_key(), &self.session.to_json()) {
            warn!(error = %e, "could not save progress");
        }
    }
}

fn storage_key(puzzle: &Puzzle) -> String {
    format!("{STORAGE_PREFIX}-{}", puzzle.name)
}
