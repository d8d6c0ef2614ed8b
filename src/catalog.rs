use include_dir::{include_dir, Dir};
use itertools::Itertools;
use std::path::Path;

use crate::puzzle::{Puzzle, PuzzleData, PuzzleError};

static PUZZLE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/puzzles");

pub const DEFAULT_PUZZLE: &str = "wedding";

/// Names of the bundled puzzles, sorted.
pub fn names() -> Vec<String> {
    PUZZLE_DIR
        .files()
        .filter(|f| f.path().extension().is_some_and(|e| e == "json"))
        .filter_map(|f| f.path().file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .sorted()
        .collect()
}

/// Load and validate a bundled puzzle by name.
pub fn load(name: &str) -> Result<Puzzle, PuzzleError> {
    let file = PUZZLE_DIR
        .get_file(format!("{name}.json"))
        .ok_or_else(|| PuzzleError::UnknownPuzzle(name.to_string()))?;
    let contents = file
        .contents_utf8()
        .ok_or_else(|| PuzzleError::UnknownPuzzle(name.to_string()))?;

    let mut puzzle = Puzzle::from_json(contents)?;
    puzzle.name = name.to_string();
    Ok(puzzle)
}

/// Load a puzzle from a JSON file on disk. Without a `name` field the file stem is used.
pub fn load_file(path: &Path) -> Result<Puzzle, PuzzleError> {
    let contents = std::fs::read_to_string(path)?;
    let mut data: PuzzleData = serde_json::from_str(&contents)?;
    if data.name.is_none() {
        data.name = path.file_stem().map(|s| s.to_string_lossy().into_owned());
    }
    Puzzle::from_data(data)
}
