use serde::{Deserialize, Serialize};

use crate::puzzle::Puzzle;

/// Progress through one puzzle. This is exactly what gets persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionState {
    /// Found words in the order they were found.
    pub found_words: Vec<String>,
    pub elapsed_seconds: u64,
    pub is_complete: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing found and no time on the clock: not worth persisting.
    pub fn is_empty(&self) -> bool {
        self.found_words.is_empty() && self.elapsed_seconds == 0 && !self.is_complete
    }

    pub fn has_found(&self, word: &str) -> bool {
        self.found_words.iter().any(|w| w == word)
    }

    /// Make restored state consistent with `puzzle`: unknown and repeated
    /// words are dropped and completion is recomputed from the word count.
    pub fn sanitize(mut self, puzzle: &Puzzle) -> Self {
        let mut kept: Vec<String> = Vec::with_capacity(self.found_words.len());
        for word in self.found_words.drain(..) {
            if puzzle.word(&word).is_some() && !kept.contains(&word) {
                kept.push(word);
            }
        }
        self.found_words = kept;
        self.is_complete = self.found_words.len() == puzzle.total_words();
        self
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "foundWords": self.found_words,
            "elapsedSeconds": self.elapsed_seconds,
            "isComplete": self.is_complete,
        })
    }

    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }
}
