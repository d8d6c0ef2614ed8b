use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A grid coordinate. `(0, 0)` is the top left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// 8-directional adjacency: both deltas at most one, and not the same cell.
    pub fn is_adjacent_to(&self, other: &Cell) -> bool {
        let row_delta = self.row.abs_diff(other.row);
        let col_delta = self.col.abs_diff(other.col);
        row_delta <= 1 && col_delta <= 1 && self != other
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<Cell> for (usize, usize) {
    fn from(cell: Cell) -> Self {
        (cell.row, cell.col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Immutable rectangular matrix of uppercase letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<char>>,
    cols: usize,
}

impl Grid {
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.cols)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows.len() && cell.col < self.cols
    }

    pub fn letter_at(&self, cell: Cell) -> Option<char> {
        self.rows.get(cell.row)?.get(cell.col).copied()
    }

    /// Letters along `path`, skipping anything out of bounds.
    pub fn spell(&self, path: &[Cell]) -> String {
        path.iter().filter_map(|c| self.letter_at(*c)).collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordDefinition {
    pub word: String,
    pub path: Vec<Cell>,
    pub is_spangram: bool,
    pub hint: String,
}

impl WordDefinition {
    pub fn covers(&self, cell: Cell) -> bool {
        self.path.contains(&cell)
    }
}

/// Serialized word entry as it appears in puzzle JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordData {
    pub word: String,
    pub positions: Vec<(usize, usize)>,
    #[serde(default)]
    pub is_spangram: bool,
    #[serde(default)]
    pub hint: String,
}

/// Serialized puzzle document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    pub grid: Vec<String>,
    pub words: Vec<WordData>,
}

/// Puzzle data that cannot be played. Raised at load time only.
#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error("puzzle JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read puzzle file: {0}")]
    Io(#[from] std::io::Error),
    #[error("no bundled puzzle named `{0}`")]
    UnknownPuzzle(String),
    #[error("the grid has no letters")]
    EmptyGrid,
    #[error("grid row {row} has {found} letters, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("grid cell {cell} holds `{letter}`, expected an uppercase letter")]
    InvalidLetter { cell: Cell, letter: char },
    #[error("word `{0}` has no positions")]
    EmptyWord(String),
    #[error("word `{word}` has {path_len} positions for {word_len} letters")]
    LengthMismatch {
        word: String,
        word_len: usize,
        path_len: usize,
    },
    #[error("word `{word}` references {cell}, outside the {rows}x{cols} grid")]
    OutOfBounds {
        word: String,
        cell: Cell,
        rows: usize,
        cols: usize,
    },
    #[error("word `{word}` visits {cell} twice")]
    RepeatedCell { word: String, cell: Cell },
    #[error("word `{word}` jumps from {from} to {to}")]
    NotAdjacent { word: String, from: Cell, to: Cell },
    #[error("word `{word}` spells `{spelled}` along its path")]
    SpellingMismatch { word: String, spelled: String },
    #[error("word `{0}` is defined twice")]
    DuplicateWord(String),
    #[error("more than one spangram: `{first}` and `{second}`")]
    MultipleSpangrams { first: String, second: String },
}

/// A validated puzzle: grid plus word definitions.
#[derive(Debug, Clone)]
pub struct Puzzle {
    pub name: String,
    pub title: String,
    pub theme: Option<String>,
    grid: Grid,
    words: Vec<WordDefinition>,
}

impl Puzzle {
    pub fn from_json(json: &str) -> Result<Self, PuzzleError> {
        let data: PuzzleData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    pub fn from_data(data: PuzzleData) -> Result<Self, PuzzleError> {
        let grid = build_grid(&data.grid)?;
        let (rows, cols) = grid.dimensions();

        let mut words: Vec<WordDefinition> = Vec::with_capacity(data.words.len());
        let mut spangram: Option<String> = None;

        for entry in data.words {
            let word = entry.word.trim().to_uppercase();
            if entry.positions.is_empty() {
                return Err(PuzzleError::EmptyWord(word));
            }
            let path: Vec<Cell> = entry.positions.into_iter().map(Cell::from).collect();
            let word_len = word.chars().count();
            if path.len() != word_len {
                return Err(PuzzleError::LengthMismatch {
                    word,
                    word_len,
                    path_len: path.len(),
                });
            }

            let mut seen = HashSet::with_capacity(path.len());
            for cell in &path {
                if !grid.contains(*cell) {
                    return Err(PuzzleError::OutOfBounds {
                        word,
                        cell: *cell,
                        rows,
                        cols,
                    });
                }
                if !seen.insert(*cell) {
                    return Err(PuzzleError::RepeatedCell { word, cell: *cell });
                }
            }
            if let Some(pair) = path.windows(2).find(|w| !w[0].is_adjacent_to(&w[1])) {
                return Err(PuzzleError::NotAdjacent {
                    word,
                    from: pair[0],
                    to: pair[1],
                });
            }

            let spelled = grid.spell(&path);
            if spelled != word {
                return Err(PuzzleError::SpellingMismatch { word, spelled });
            }
            if words.iter().any(|w| w.word == word) {
                return Err(PuzzleError::DuplicateWord(word));
            }
            if entry.is_spangram {
                if let Some(first) = spangram.take() {
                    return Err(PuzzleError::MultipleSpangrams {
                        first,
                        second: word,
                    });
                }
                spangram = Some(word.clone());
            }

            words.push(WordDefinition {
                word,
                path,
                is_spangram: entry.is_spangram,
                hint: entry.hint,
            });
        }

        let name = data.name.unwrap_or_else(|| "custom".to_string());
        let title = data.title.unwrap_or_else(|| name.clone());

        Ok(Self {
            name,
            title,
            theme: data.theme,
            grid,
            words,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn words(&self) -> &[WordDefinition] {
        &self.words
    }

    pub fn total_words(&self) -> usize {
        self.words.len()
    }

    pub fn word(&self, word: &str) -> Option<&WordDefinition> {
        self.words.iter().find(|w| w.word == word)
    }

    pub fn spangram(&self) -> Option<&WordDefinition> {
        self.words.iter().find(|w| w.is_spangram)
    }

    pub fn letter_at(&self, cell: Cell) -> Option<char> {
        self.grid.letter_at(cell)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }
}

fn build_grid(rows: &[String]) -> Result<Grid, PuzzleError> {
    let rows: Vec<Vec<char>> = rows
        .iter()
        .map(|r| r.trim().chars().map(|c| c.to_ascii_uppercase()).collect())
        .collect();

    let cols = rows.first().map(Vec::len).unwrap_or(0);
    if cols == 0 {
        return Err(PuzzleError::EmptyGrid);
    }

    for (r, letters) in rows.iter().enumerate() {
        if letters.len() != cols {
            return Err(PuzzleError::RaggedRow {
                row: r,
                expected: cols,
                found: letters.len(),
            });
        }
        if let Some((c, letter)) = letters
            .iter()
            .enumerate()
            .find(|(_, l)| !l.is_ascii_uppercase())
        {
            return Err(PuzzleError::InvalidLetter {
                cell: Cell::new(r, c),
                letter: *letter,
            });
        }
    }

    Ok(Grid { rows, cols })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const CAT: &str = r#"
    {
        "grid": ["CAT", "ARS", "TSK"],
        "words": [
            { "word": "CAT", "positions": [[0, 0], [0, 1], [0, 2]], "isSpangram": false, "hint": "meow" }
        ]
    }
    "#;

    fn data(grid: &[&str], words: Vec<WordData>) -> PuzzleData {
        PuzzleData {
            name: Some("test".into()),
            title: None,
            theme: None,
            grid: grid.iter().map(|s| s.to_string()).collect(),
            words,
        }
    }

    fn word(w: &str, positions: &[(usize, usize)], is_spangram: bool) -> WordData {
        WordData {
            word: w.into(),
            positions: positions.to_vec(),
            is_spangram,
            hint: String::new(),
        }
    }

    #[test]
    fn test_adjacency() {
        let c = Cell::new(1, 1);
        for (r, col) in [(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)] {
            assert!(c.is_adjacent_to(&Cell::new(r, col)), "({r}, {col})");
        }
        assert!(!c.is_adjacent_to(&c));
        assert!(!c.is_adjacent_to(&Cell::new(3, 1)));
        assert!(!Cell::new(0, 0).is_adjacent_to(&Cell::new(2, 2)));
    }

    #[test]
    fn test_parse_cat_puzzle() {
        let puzzle = Puzzle::from_json(CAT).unwrap();
        assert_eq!(puzzle.dimensions(), (3, 3));
        assert_eq!(puzzle.letter_at(Cell::new(2, 2)), Some('K'));
        assert_eq!(puzzle.letter_at(Cell::new(3, 0)), None);
        assert_eq!(puzzle.total_words(), 1);
        assert_eq!(puzzle.name, "custom");
        assert_eq!(puzzle.word("CAT").unwrap().hint, "meow");
        assert!(puzzle.spangram().is_none());
    }

    #[test]
    fn test_lowercase_input_is_normalised() {
        let puzzle =
            Puzzle::from_data(data(&["cat", "ars"], vec![word("cat", &[(0, 0), (0, 1), (0, 2)], false)]))
                .unwrap();
        assert_eq!(puzzle.letter_at(Cell::new(0, 0)), Some('C'));
        assert!(puzzle.word("CAT").is_some());
    }

    #[test]
    fn test_rejects_ragged_and_empty_grids() {
        assert_matches!(
            Puzzle::from_data(data(&[], vec![])),
            Err(PuzzleError::EmptyGrid)
        );
        assert_matches!(
            Puzzle::from_data(data(&["CAT", "AR"], vec![])),
            Err(PuzzleError::RaggedRow { row: 1, expected: 3, found: 2 })
        );
        assert_matches!(
            Puzzle::from_data(data(&["CA1"], vec![])),
            Err(PuzzleError::InvalidLetter { letter: '1', .. })
        );
    }

    #[test]
    fn test_rejects_out_of_bounds_path() {
        let result = Puzzle::from_data(data(
            &["CAT", "ARS"],
            vec![word("CAT", &[(0, 0), (0, 1), (0, 3)], false)],
        ));
        assert_matches!(result, Err(PuzzleError::OutOfBounds { cell, .. }) if cell == Cell::new(0, 3));
    }

    #[test]
    fn test_rejects_length_and_spelling_mismatch() {
        assert_matches!(
            Puzzle::from_data(data(&["CAT"], vec![word("CATS", &[(0, 0), (0, 1), (0, 2)], false)])),
            Err(PuzzleError::LengthMismatch { word_len: 4, path_len: 3, .. })
        );
        assert_matches!(
            Puzzle::from_data(data(&["CAT"], vec![word("TAC", &[(0, 0), (0, 1), (0, 2)], false)])),
            Err(PuzzleError::SpellingMismatch { spelled, .. }) if spelled == "CAT"
        );
    }

    #[test]
    fn test_rejects_repeats_and_jumps() {
        assert_matches!(
            Puzzle::from_data(data(&["ABA"], vec![word("ABA", &[(0, 0), (0, 1), (0, 0)], false)])),
            Err(PuzzleError::RepeatedCell { .. })
        );
        assert_matches!(
            Puzzle::from_data(data(&["CAT"], vec![word("CT", &[(0, 0), (0, 2)], false)])),
            Err(PuzzleError::NotAdjacent { .. })
        );
    }

    #[test]
    fn test_rejects_duplicate_words_and_spangrams() {
        assert_matches!(
            Puzzle::from_data(data(
                &["CAT", "CAT"],
                vec![
                    word("CAT", &[(0, 0), (0, 1), (0, 2)], false),
                    word("CAT", &[(1, 0), (1, 1), (1, 2)], false)
                ]
            )),
            Err(PuzzleError::DuplicateWord(w)) if w == "CAT"
        );
        assert_matches!(
            Puzzle::from_data(data(
                &["CAT", "DOG"],
                vec![
                    word("CAT", &[(0, 0), (0, 1), (0, 2)], true),
                    word("DOG", &[(1, 0), (1, 1), (1, 2)], true)
                ]
            )),
            Err(PuzzleError::MultipleSpangrams { .. })
        );
    }

    #[test]
    fn test_malformed_json() {
        assert_matches!(Puzzle::from_json("{ not json"), Err(PuzzleError::Json(_)));
    }

    #[test]
    fn test_cell_serializes_as_pair() {
        let json = serde_json::to_string(&Cell::new(2, 5)).unwrap();
        assert_eq!(json, "[2,5]");
    }
}
