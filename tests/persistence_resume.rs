use std::fs;

use serde_json::json;
use strands::game::Game;
use strands::puzzle::{Cell, Puzzle};
use strands::store::{FileProgressStore, ProgressStore};
use tempfile::tempdir;

fn puzzle() -> Puzzle {
    Puzzle::from_json(
        r#"{
            "name": "cat",
            "grid": ["CAT", "ARS", "TSK"],
            "words": [
                { "word": "CAT", "positions": [[0,0],[0,1],[0,2]], "hint": "meow" },
                { "word": "SKS", "positions": [[1,2],[2,2],[2,1]], "isSpangram": true, "hint": "corner" }
            ]
        }"#,
    )
    .unwrap()
}

fn find_cat<S: ProgressStore>(game: &mut Game<S>) {
    for col in 0..3 {
        assert!(game.try_append(Cell::new(0, col)));
    }
    assert!(game.submit().is_new_match());
}

#[test]
fn progress_survives_a_restart() {
    let dir = tempdir().unwrap();
    let store = FileProgressStore::with_dir(dir.path());

    {
        let mut game = Game::new(puzzle(), store.clone());
        find_cat(&mut game);
        game.tick();
        game.tick();
        // half-built selections are not progress
        game.try_append(Cell::new(1, 1));
    }

    let path = store.path_for("strands-progress-cat");
    let saved: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(
        saved,
        json!({ "foundWords": ["CAT"], "elapsedSeconds": 2, "isComplete": false })
    );

    let mut game = Game::new(puzzle(), store.clone());
    assert_eq!(game.session().found_words, vec!["CAT".to_string()]);
    assert_eq!(game.session().elapsed_seconds, 2);
    assert!(game.selection().is_empty());
    assert!(game.is_found(Cell::new(0, 0)));
    assert!(!game.try_append(Cell::new(0, 1)));
    assert_eq!(game.progress(), (1, 2));

    game.new_game();
    assert!(!path.exists());
}

#[test]
fn untouched_game_writes_nothing() {
    let dir = tempdir().unwrap();
    let store = FileProgressStore::with_dir(dir.path().join("progress"));

    let mut game = Game::new(puzzle(), store.clone());
    game.try_append(Cell::new(0, 0));
    game.clear();

    assert!(!store.path_for("strands-progress-cat").exists());
}

#[test]
fn corrupt_file_starts_fresh() {
    let dir = tempdir().unwrap();
    let store = FileProgressStore::with_dir(dir.path());
    fs::write(store.path_for("strands-progress-cat"), "{ not json").unwrap();

    let game = Game::new(puzzle(), store);
    assert!(game.session().found_words.is_empty());
    assert_eq!(game.session().elapsed_seconds, 0);
    assert!(game.is_running());
}

#[test]
fn inconsistent_file_is_sanitized() {
    let dir = tempdir().unwrap();
    let store = FileProgressStore::with_dir(dir.path());
    store
        .save(
            "strands-progress-cat",
            &json!({
                "foundWords": ["CAT", "CAT", "DOG"],
                "elapsedSeconds": 30,
                "isComplete": true
            }),
        )
        .unwrap();

    let mut game = Game::new(puzzle(), store);
    assert_eq!(game.session().found_words, vec!["CAT".to_string()]);
    assert!(!game.is_complete());
    assert!(game.is_running());

    // still playable: the spangram finishes it
    for (r, c) in [(1, 2), (2, 2), (2, 1)] {
        assert!(game.try_append(Cell::new(r, c)));
    }
    game.submit();
    assert!(game.is_complete());
    assert_eq!(game.take_completion().unwrap().elapsed_seconds, 30);
}

#[test]
fn solved_puzzle_stays_solved_after_restart() {
    let dir = tempdir().unwrap();
    let store = FileProgressStore::with_dir(dir.path());
    store
        .save(
            "strands-progress-cat",
            &json!({ "foundWords": ["SKS", "CAT"], "elapsedSeconds": 12, "isComplete": false }),
        )
        .unwrap();

    let mut game = Game::new(puzzle(), store);
    assert!(game.is_complete());
    assert!(!game.is_running());
    assert!(!game.tick());
    assert!(!game.try_append(Cell::new(1, 0)));
    // already solved before this run: nothing new to report
    assert!(game.take_completion().is_none());
}
