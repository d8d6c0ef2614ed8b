pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, KeyCode,
        KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use strands::{
    app_dirs::AppDirs,
    catalog::{self, DEFAULT_PUZZLE},
    celebration::Celebration,
    config::{Config, ConfigStore, FileConfigStore},
    game::{Game, InputMode},
    history::{CompletionRecord, HistoryDb},
    logging,
    puzzle::{Cell, Puzzle, PuzzleError},
    runtime::{
        CrosstermEventSource, FixedTicker, GameEvent, GameEventSource, Runner, SecondCounter,
        Ticker,
    },
    store::{FileProgressStore, MemoryProgressStore, ProgressStore},
    util::format_time,
};
use tracing::{info, warn};

use crate::ui::{history::HistoryView, screen::current_screen, GridLayout};

/// themed word-search puzzles in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Trace themed words through a grid of letters. Every letter belongs to exactly one word, and one special word, the spangram, spans the board."
)]
pub struct Cli {
    /// bundled puzzle to play (see --list)
    #[clap(short = 'p', long)]
    puzzle: Option<String>,

    /// play a puzzle from a JSON file instead of a bundled one
    #[clap(short = 'f', long, conflicts_with = "puzzle")]
    puzzle_file: Option<PathBuf>,

    /// how letters are selected with the mouse
    #[clap(short = 'm', long, value_enum)]
    mode: Option<InputMode>,

    /// show hints for the words still hidden
    #[clap(long)]
    hints: bool,

    /// play without saving progress, history, or preferences
    #[clap(long)]
    no_save: bool,

    /// list the bundled puzzles and exit
    #[clap(long)]
    list: bool,

    /// print solve history and exit
    #[clap(long)]
    history: bool,

    /// discard saved progress for the puzzle and start over
    #[clap(long)]
    reset: bool,
}

impl Cli {
    /// Command-line values win over the stored preferences.
    fn merge_into(&self, mut config: Config) -> Config {
        if let Some(puzzle) = &self.puzzle {
            config.puzzle = puzzle.clone();
        }
        if let Some(mode) = self.mode {
            config.input_mode = mode;
        }
        if self.hints {
            config.show_hints = true;
        }
        config
    }

    fn load_puzzle(&self, config: &Config) -> Result<Puzzle, PuzzleError> {
        if let Some(path) = &self.puzzle_file {
            return catalog::load_file(path);
        }
        match catalog::load(&config.puzzle) {
            // a stale name in the config file is not worth refusing to start over
            Err(PuzzleError::UnknownPuzzle(name)) if self.puzzle.is_none() => {
                warn!(%name, "configured puzzle not found, using default");
                catalog::load(DEFAULT_PUZZLE)
            }
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Playing,
    History,
}

pub struct App {
    pub game: Game<Box<dyn ProgressStore>>,
    pub state: AppState,
    pub cursor: Cell,
    pub show_hints: bool,
    pub celebration: Celebration,
    pub history: Option<HistoryDb>,
    pub history_view: HistoryView,
    pub best_time: Option<u64>,
    seconds: SecondCounter,
}

impl App {
    pub fn new(
        game: Game<Box<dyn ProgressStore>>,
        history: Option<HistoryDb>,
        show_hints: bool,
    ) -> Self {
        let mut app = Self {
            game,
            state: AppState::Playing,
            cursor: Cell::new(0, 0),
            show_hints,
            celebration: Celebration::new(),
            history,
            history_view: HistoryView::default(),
            best_time: None,
            seconds: SecondCounter::default(),
        };
        if app.game.is_complete() {
            app.best_time = app.lookup_best_time();
        }
        app
    }

    fn lookup_best_time(&self) -> Option<u64> {
        let db = self.history.as_ref()?;
        match db.best_time(&self.game.puzzle().name) {
            Ok(best) => best,
            Err(e) => {
                warn!(error = %e, "could not read best time");
                None
            }
        }
    }

    /// Wall time since the last call. Drives the game clock, feedback expiry
    /// and the celebration.
    pub fn on_tick(&mut self, elapsed: Duration, now: Instant) {
        for _ in 0..self.seconds.advance(elapsed) {
            self.game.tick();
        }
        self.game.dismiss_expired_feedback(now);
        self.celebration.update(elapsed.as_secs_f64());
    }

    pub fn on_focus(&mut self, focused: bool) {
        self.game.set_running(focused);
        if !focused {
            self.seconds.reset();
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent, area: Rect) {
        if self.state != AppState::Playing {
            return;
        }
        let grid = GridLayout::compute(area, self.game.puzzle().dimensions());
        let hit = grid.cell_at(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(cell) = hit {
                    self.cursor = cell;
                    self.game.begin_or_extend(cell);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let (Some(cell), true) = (hit, self.game.is_dragging()) {
                    self.cursor = cell;
                    self.game.begin_or_extend(cell);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.game.end_selection();
            }
            _ => {}
        }
        self.collect_completion(area);
    }

    /// Returns true when the app should quit.
    pub fn on_key(&mut self, key: KeyEvent, area: Rect) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match (self.state, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q')) => return true,
            (_, KeyCode::Char('n')) => self.new_game(),
            (AppState::History, KeyCode::Char('b') | KeyCode::Backspace) => {
                self.state = AppState::Playing;
            }
            (AppState::History, _) => {}
            (AppState::Playing, KeyCode::Up) => self.move_cursor(-1, 0),
            (AppState::Playing, KeyCode::Down) => self.move_cursor(1, 0),
            (AppState::Playing, KeyCode::Left) => self.move_cursor(0, -1),
            (AppState::Playing, KeyCode::Right) => self.move_cursor(0, 1),
            (AppState::Playing, KeyCode::Char(' ')) => self.select_at_cursor(),
            (AppState::Playing, KeyCode::Enter) => {
                if !self.game.selection().is_empty() {
                    self.game.submit();
                }
            }
            (AppState::Playing, KeyCode::Backspace) => {
                if let Some(last) = self.game.selection().last() {
                    self.game.remove_last(last);
                }
            }
            (AppState::Playing, KeyCode::Char('c')) => self.game.clear(),
            (AppState::Playing, KeyCode::Char('m')) => {
                let mode = self.game.toggle_input_mode();
                info!(%mode, "input mode");
            }
            (AppState::Playing, KeyCode::Char('h')) => self.show_hints = !self.show_hints,
            (AppState::Playing, KeyCode::Char('s')) => self.open_history(),
            (AppState::Playing, _) => {}
        }
        self.collect_completion(area);
        false
    }

    fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let (rows, cols) = self.game.puzzle().dimensions();
        let row = self.cursor.row.saturating_add_signed(d_row).min(rows - 1);
        let col = self.cursor.col.saturating_add_signed(d_col).min(cols - 1);
        self.cursor = Cell::new(row, col);
    }

    /// Keyboard selection always uses tap semantics, whatever the mouse mode.
    fn select_at_cursor(&mut self) {
        let cell = self.cursor;
        if self.game.selection().last() == Some(cell) {
            self.game.remove_last(cell);
        } else {
            self.game.try_append(cell);
        }
    }

    fn open_history(&mut self) {
        self.history_view = match &self.history {
            Some(db) => HistoryView::load(db).unwrap_or_else(|e| {
                warn!(error = %e, "could not read history");
                HistoryView::default()
            }),
            None => HistoryView::default(),
        };
        self.state = AppState::History;
    }

    pub fn new_game(&mut self) {
        self.game.new_game();
        self.celebration = Celebration::new();
        self.seconds.reset();
        self.cursor = Cell::new(0, 0);
        self.best_time = None;
        self.state = AppState::Playing;
    }

    /// Record a fresh completion and start the celebration.
    pub fn collect_completion(&mut self, area: Rect) {
        let Some(completion) = self.game.take_completion() else {
            return;
        };
        if let Some(db) = &self.history {
            if let Err(e) = db.record_completion(&CompletionRecord::from(&completion)) {
                warn!(error = %e, "could not record completion");
            }
        }
        self.best_time = self.lookup_best_time();
        self.celebration.start(area.width, area.height);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = logging::init(&path) {
            eprintln!("warning: could not open log file {}: {e}", path.display());
        }
    }

    if cli.list {
        for name in catalog::names() {
            match catalog::load(&name) {
                Ok(puzzle) => println!("{name:<16} {}", puzzle.title),
                Err(e) => println!("{name:<16} (invalid: {e})"),
            }
        }
        return Ok(());
    }

    if cli.history {
        print_history()?;
        return Ok(());
    }

    let config_store = FileConfigStore::new();
    let config = cli.merge_into(config_store.load());

    let puzzle = match cli.load_puzzle(&config) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, e.to_string()).exit();
        }
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store: Box<dyn ProgressStore> = if cli.no_save {
        Box::new(MemoryProgressStore::new())
    } else {
        Box::new(FileProgressStore::new())
    };
    let history = if cli.no_save {
        None
    } else {
        HistoryDb::new()
            .map_err(|e| warn!(error = %e, "history unavailable"))
            .ok()
    };

    let mut game = Game::new(puzzle, store).with_input_mode(config.input_mode);
    if cli.reset {
        game.new_game();
    }
    info!(puzzle = %game.puzzle().name, mode = %config.input_mode, "starting");

    if !cli.no_save {
        if let Err(e) = config_store.save(&config) {
            warn!(error = %e, "could not save config");
        }
    }

    let mut app = App::new(game, history, config.show_hints);
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(config.tick_rate_ms.max(10))),
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;

    if !cli.no_save {
        let config = Config {
            input_mode: app.game.input_mode(),
            show_hints: app.show_hints,
            ..config
        };
        if let Err(e) = config_store.save(&config) {
            warn!(error = %e, "could not save config");
        }
    }

    result
}

fn start_tui<B: Backend, E: GameEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let mut last_tick = Instant::now();
    terminal.draw(|f| ui(app, f))?;

    loop {
        let event = runner.step();
        let size = terminal.size().unwrap_or_default();
        let area = Rect::new(0, 0, size.width, size.height);

        match event {
            GameEvent::Key(key) => {
                if app.on_key(key, area) {
                    break;
                }
            }
            GameEvent::Mouse(mouse) => app.on_mouse(mouse, area),
            GameEvent::Focus(focused) => app.on_focus(focused),
            GameEvent::Resize | GameEvent::Tick => {}
        }

        // any wake-up advances the clock by the wall time that passed
        let now = Instant::now();
        app.on_tick(now.duration_since(last_tick), now);
        last_tick = now;

        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn print_history() -> Result<(), Box<dyn Error>> {
    let db = HistoryDb::new()?;
    let summary = db.summary()?;
    if summary.is_empty() {
        println!("No puzzles solved yet.");
        return Ok(());
    }
    println!("{:<16} {:>6} {:>6} {:>8}", "puzzle", "solves", "best", "average");
    for s in summary {
        println!(
            "{:<16} {:>6} {:>6} {:>8}",
            s.puzzle,
            s.solves,
            format_time(s.best_seconds),
            format_time(s.avg_seconds.round() as u64)
        );
    }
    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    current_screen(&app.state).render(app, f);
}
