use crate::puzzle::{Cell, Puzzle, WordDefinition};

/// Shortest path that is worth checking against the word list.
pub const MIN_WORD_LEN: usize = 3;

/// Outcome of submitting a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    TooShort,
    NewMatch { word: String, is_spangram: bool },
    AlreadyFound { word: String },
    NoMatch,
}

impl Classification {
    pub fn message(&self) -> &'static str {
        match self {
            Classification::TooShort => "Word too short!",
            Classification::NewMatch {
                is_spangram: true, ..
            } => "Spangram found!",
            Classification::NewMatch { .. } => "Great job!",
            Classification::AlreadyFound { .. } => "Already found!",
            Classification::NoMatch => "Not a valid word",
        }
    }

    pub fn is_new_match(&self) -> bool {
        matches!(self, Classification::NewMatch { .. })
    }
}

/// Find the word a submitted path refers to.
///
/// An exact, in-order path match wins. Otherwise the letters along the path
/// are compared with each word, which lets a different route that spells
/// the same letters count. Words are unique within a puzzle, so the letter
/// rule can match at most one definition.
pub fn find_match<'p>(path: &[Cell], puzzle: &'p Puzzle) -> Option<&'p WordDefinition> {
    if let Some(def) = puzzle.words().iter().find(|w| w.path == path) {
        return Some(def);
    }
    let letters = puzzle.grid().spell(path);
    puzzle.words().iter().find(|w| w.word == letters)
}

/// Classify a finished selection against the puzzle and the words found so far.
pub fn classify(path: &[Cell], puzzle: &Puzzle, found: &[String]) -> Classification {
    if path.len() < MIN_WORD_LEN {
        return Classification::TooShort;
    }

    match find_match(path, puzzle) {
        Some(def) if found.iter().any(|w| *w == def.word) => Classification::AlreadyFound {
            word: def.word.clone(),
        },
        Some(def) => Classification::NewMatch {
            word: def.word.clone(),
            is_spangram: def.is_spangram,
        },
        None => Classification::NoMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // C A T
    // A R S
    // T S K
    fn puzzle() -> Puzzle {
        Puzzle::from_json(
            r#"{
                "grid": ["CAT", "ARS", "TSK"],
                "words": [
                    { "word": "CAT", "positions": [[0,0],[0,1],[0,2]] },
                    { "word": "ARTS", "positions": [[1,0],[1,1],[0,2],[1,2]], "isSpangram": true }
                ]
            }"#,
        )
        .unwrap()
    }

    fn cells(coords: &[(usize, usize)]) -> Vec<Cell> {
        coords.iter().copied().map(Cell::from).collect()
    }

    #[test]
    fn test_too_short() {
        let p = puzzle();
        assert_eq!(classify(&[], &p, &[]), Classification::TooShort);
        assert_eq!(classify(&cells(&[(0, 0), (0, 1)]), &p, &[]), Classification::TooShort);
    }

    #[test]
    fn test_exact_path_match() {
        let p = puzzle();
        assert_eq!(
            classify(&cells(&[(0, 0), (0, 1), (0, 2)]), &p, &[]),
            Classification::NewMatch {
                word: "CAT".into(),
                is_spangram: false
            }
        );
    }

    #[test]
    fn test_spangram_flag() {
        let p = puzzle();
        let result = classify(&cells(&[(1, 0), (1, 1), (0, 2), (1, 2)]), &p, &[]);
        assert_matches!(result, Classification::NewMatch { is_spangram: true, ref word } if word == "ARTS");
        assert_eq!(result.message(), "Spangram found!");
    }

    #[test]
    fn test_letter_match_on_another_route() {
        // C(0,0) A(1,0) T(2,0) spells CAT down the first column
        let p = puzzle();
        assert_matches!(
            classify(&cells(&[(0, 0), (1, 0), (2, 0)]), &p, &[]),
            Classification::NewMatch { ref word, .. } if word == "CAT"
        );
    }

    #[test]
    fn test_already_found_by_either_rule() {
        let p = puzzle();
        let found = vec!["CAT".to_string()];
        assert_eq!(
            classify(&cells(&[(0, 0), (1, 0), (2, 0)]), &p, &found),
            Classification::AlreadyFound { word: "CAT".into() }
        );
        assert_eq!(
            classify(&cells(&[(0, 0), (0, 1), (0, 2)]), &p, &found),
            Classification::AlreadyFound { word: "CAT".into() }
        );
    }

    #[test]
    fn test_no_match() {
        let p = puzzle();
        let result = classify(&cells(&[(2, 2), (2, 1), (1, 1)]), &p, &[]);
        assert_eq!(result, Classification::NoMatch);
        assert_eq!(result.message(), "Not a valid word");
    }

    #[test]
    fn test_messages() {
        assert_eq!(Classification::TooShort.message(), "Word too short!");
        assert_eq!(
            Classification::AlreadyFound { word: "X".into() }.message(),
            "Already found!"
        );
        assert!(Classification::NewMatch {
            word: "CAT".into(),
            is_spangram: false
        }
        .is_new_match());
        assert!(!Classification::NoMatch.is_new_match());
    }
}
