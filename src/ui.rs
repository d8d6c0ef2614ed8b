pub mod history;
pub mod layout;
pub mod screen;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use strands::{celebration::Celebration, puzzle::Cell, util::format_time};

pub use layout::GridLayout;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game = &self.game;
        let puzzle = game.puzzle();
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let inner = Rect {
            x: area.x + HORIZONTAL_MARGIN.min(area.width / 2),
            width: area.width.saturating_sub(HORIZONTAL_MARGIN * 2),
            ..area
        };

        // header: title, then timer / progress / mode
        let title = match &puzzle.theme {
            Some(theme) => format!("{} · {}", puzzle.title, theme),
            None => puzzle.title.clone(),
        };
        Paragraph::new(Span::styled(title, bold_style))
            .alignment(Alignment::Center)
            .render(line(inner, 0), buf);

        let (found, total) = game.progress();
        let paused = !game.is_running() && !game.is_complete();
        let status = format!(
            "{}{}   {} / {}   {} mode",
            format_time(game.session().elapsed_seconds),
            if paused { " (paused)" } else { "" },
            found,
            total,
            game.input_mode(),
        );
        Paragraph::new(Span::styled(status, dim_style))
            .alignment(Alignment::Center)
            .render(line(inner, 1), buf);

        let grid = GridLayout::compute(area, puzzle.dimensions());
        render_grid(self, &grid, buf);

        // below the grid: selection, feedback, found words, hints, legend
        let mut y = grid.y + grid.height() + 1;
        let mut next_line = || {
            let r = line(inner, y.saturating_sub(inner.y));
            y += 1;
            r
        };

        let letters = game.current_letters();
        Paragraph::new(Span::styled(letters, bold_style.fg(Color::Blue)))
            .alignment(Alignment::Center)
            .render(next_line(), buf);

        let feedback = game
            .feedback()
            .map(|f| f.message.clone())
            .unwrap_or_default();
        Paragraph::new(Span::styled(feedback, bold_style))
            .alignment(Alignment::Center)
            .render(next_line(), buf);

        let spangram = puzzle.spangram().map(|s| s.word.as_str());
        let found_spans = Itertools::intersperse(
            game.session().found_words.iter().map(|w| {
                if Some(w.as_str()) == spangram {
                    Span::styled(format!("{w} ★"), bold_style.fg(Color::Yellow))
                } else {
                    Span::raw(w.clone())
                }
            }),
            Span::raw("  "),
        )
        .collect::<Vec<_>>();
        Paragraph::new(Line::from(found_spans))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(next_line(), buf);

        if self.show_hints && !game.is_complete() {
            for hint in game.hints() {
                let text = if hint.is_spangram {
                    format!("• {} (spangram)", hint.text)
                } else {
                    format!("• {}", hint.text)
                };
                Paragraph::new(Span::styled(text, italic_style))
                    .alignment(Alignment::Center)
                    .render(next_line(), buf);
            }
        }

        if game.is_complete() {
            let mut summary = format!(
                "You found all the words in {}!",
                format_time(game.session().elapsed_seconds)
            );
            if let Some(best) = self.best_time {
                summary.push_str(&format!("   best {}", format_time(best)));
            }
            Paragraph::new(Span::styled(summary, bold_style.fg(Color::Green)))
                .alignment(Alignment::Center)
                .render(next_line(), buf);
        }

        let legend = if game.is_complete() {
            "(n)ew game / (s)tats / (esc)ape"
        } else {
            "(enter) submit / (bksp) undo / (c)lear / (m)ode / (h)ints / (n)ew / (s)tats / (esc)ape"
        };
        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(line(inner, area.height.saturating_sub(1)), buf);

        if self.celebration.is_active() {
            render_celebration(&self.celebration, area, buf);
        }
    }
}

/// A one-line rect `offset` rows into `area`, clamped to its bottom edge.
fn line(area: Rect, offset: u16) -> Rect {
    let y = area.y + offset.min(area.height.saturating_sub(1));
    Rect::new(area.x, y, area.width, 1.min(area.height))
}

fn cell_style(app: &App, cell: Cell) -> Style {
    let game = &app.game;
    let base = Style::default().add_modifier(Modifier::BOLD);
    let style = if game.is_selected(cell) {
        base.bg(Color::Blue).fg(Color::White)
    } else if game.is_spangram_revealed(cell) {
        base.bg(Color::Yellow).fg(Color::Black)
    } else if game.is_found(cell) {
        base.bg(Color::Cyan).fg(Color::Black)
    } else {
        base.bg(Color::DarkGray).fg(Color::White)
    };
    if app.cursor == cell && !game.is_complete() {
        style.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED)
    } else {
        style
    }
}

fn render_grid(app: &App, grid: &GridLayout, buf: &mut Buffer) {
    let puzzle = app.game.puzzle();
    let bounds = buf.area;

    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let cell = Cell::new(row, col);
            let Some(letter) = puzzle.letter_at(cell) else {
                continue;
            };
            let (x, y) = grid.origin(cell);
            let style = cell_style(app, cell);
            for (i, symbol) in [" ".to_string(), letter.to_string(), " ".to_string()]
                .iter()
                .enumerate()
            {
                let pos = (x + i as u16, y);
                if bounds.contains(pos.into()) {
                    if let Some(c) = buf.cell_mut(pos) {
                        c.set_symbol(symbol);
                        c.set_style(style);
                    }
                }
            }
        }
    }

    let connector_style = Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD);
    for (a, b) in app.game.selection().path().iter().tuple_windows() {
        if let Some((x, y, glyph)) = grid.connector(*a, *b) {
            if let Some(c) = buf.cell_mut((x, y)) {
                c.set_symbol(&glyph.to_string());
                c.set_style(connector_style);
            }
        }
    }
}

fn render_celebration(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for p in &celebration.particles {
        if p.x < 0.0 || p.y < 0.0 {
            continue;
        }
        let (x, y) = (p.x as u16, p.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }
        let mut style = Style::default().fg(colors[p.color_index % colors.len()]);
        if p.target.is_some() {
            style = style.add_modifier(Modifier::BOLD);
        }
        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&p.symbol.to_string());
            cell.set_style(style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strands::{
        catalog,
        game::{Game, InputMode},
        store::{MemoryProgressStore, ProgressStore},
    };

    fn app() -> App {
        let puzzle = catalog::load("wedding").unwrap();
        let store: Box<dyn ProgressStore> = Box::new(MemoryProgressStore::new());
        App::new(Game::new(puzzle, store), None, false)
    }

    fn rendered(app: &App, area: Rect) -> (Buffer, String) {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        let text = buffer.content().iter().map(|c| c.symbol()).collect::<String>();
        (buffer, text)
    }

    #[test]
    fn test_renders_header_and_grid() {
        let app = app();
        let area = Rect::new(0, 0, 80, 30);
        let (buffer, text) = rendered(&app, area);

        assert!(text.contains("Wedding Day"));
        assert!(text.contains("0:00"));
        assert!(text.contains("0 / 9"));
        assert!(text.contains("Drag mode"));

        let grid = GridLayout::compute(area, (8, 6));
        let (x, y) = grid.origin(Cell::new(3, 0));
        assert_eq!(buffer[(x + 1, y)].symbol(), "C");
    }

    #[test]
    fn test_selection_is_highlighted_and_spelled() {
        let mut app = app();
        app.game.try_append(Cell::new(3, 0));
        app.game.try_append(Cell::new(3, 1));
        let area = Rect::new(0, 0, 80, 30);
        let (buffer, text) = rendered(&app, area);

        assert!(text.contains("CE"));
        let grid = GridLayout::compute(area, (8, 6));
        let (x, y) = grid.origin(Cell::new(3, 0));
        assert_eq!(buffer[(x + 1, y)].style().bg, Some(Color::Blue));
        assert_eq!(buffer[(x + 3, y)].symbol(), "─");
    }

    #[test]
    fn test_hints_and_found_words() {
        let mut app = app();
        app.show_hints = true;
        for (r, c) in [(1, 4), (0, 4), (1, 3), (0, 3)] {
            app.game.try_append(Cell::new(r, c));
        }
        app.game.submit();
        let (_, text) = rendered(&app, Rect::new(0, 0, 100, 50));

        assert!(text.contains("RING"));
        assert!(text.contains("Great job!"));
        assert!(text.contains("The main event! (spangram)"));
        assert!(!text.contains("Symbol of commitment"));
    }

    #[test]
    fn test_tap_mode_is_shown() {
        let mut app = app();
        app.game.set_input_mode(InputMode::Tap);
        let (_, text) = rendered(&app, Rect::new(0, 0, 80, 30));
        assert!(text.contains("Tap mode"));
    }

    #[test]
    fn test_small_area_does_not_panic() {
        let app = app();
        for (w, h) in [(10, 4), (1, 1), (30, 8)] {
            let area = Rect::new(0, 0, w, h);
            let (buffer, _) = rendered(&app, area);
            assert_eq!(*buffer.area(), area);
        }
    }

    #[test]
    fn test_celebration_renders_on_top() {
        let mut app = app();
        app.celebration.start(80, 30);
        let (_, text) = rendered(&app, Rect::new(0, 0, 80, 30));
        let symbols = ['*', '+', '✦', '✧', '•', '❤'];
        assert!(text.chars().any(|c| symbols.contains(&c)));
    }
}
