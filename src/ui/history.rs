use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};
use strands::{
    history::{CompletionRecord, HistoryDb, PuzzleSummary},
    util::format_time,
};
use unicode_width::UnicodeWidthStr;

const RECENT_LIMIT: usize = 10;

/// Snapshot of the solve history, taken when the screen is opened.
#[derive(Debug, Default, Clone)]
pub struct HistoryView {
    pub summaries: Vec<PuzzleSummary>,
    pub recent: Vec<CompletionRecord>,
}

impl HistoryView {
    pub fn load(db: &HistoryDb) -> rusqlite::Result<Self> {
        Ok(Self {
            summaries: db.summary()?,
            recent: db.recent(RECENT_LIMIT)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Width of the puzzle column: the widest name, never narrower than its header.
    fn puzzle_column_width(&self) -> u16 {
        self.summaries
            .iter()
            .map(|s| s.puzzle.as_str())
            .chain(self.recent.iter().map(|r| r.puzzle.as_str()))
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0)
            .max("Puzzle".width()) as u16
    }
}

pub fn present_summary_row(summary: &PuzzleSummary) -> Row<'static> {
    Row::new(vec![
        Cell::from(summary.puzzle.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(summary.solves.to_string()),
        Cell::from(format_time(summary.best_seconds)).style(Style::default().fg(Color::Green)),
        Cell::from(format_time(summary.avg_seconds.round() as u64)),
    ])
}

pub fn present_recent_row(record: &CompletionRecord) -> Row<'static> {
    Row::new(vec![
        Cell::from(record.puzzle.clone()),
        Cell::from(format_time(record.elapsed_seconds)),
        Cell::from(record.words.to_string()),
        Cell::from(record.completed_at.format("%Y-%m-%d %H:%M").to_string()),
    ])
}

impl Widget for &HistoryView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(area);

        Paragraph::new("Solve History")
            .block(Block::default().borders(Borders::ALL))
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        if self.is_empty() {
            Paragraph::new("No puzzles solved yet.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray))
                .render(chunks[1], buf);
        } else {
            let tables = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(self.summaries.len() as u16 + 3),
                    Constraint::Min(0),
                ])
                .split(chunks[1]);

            let header_style = Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD);
            let name_width = self.puzzle_column_width();

            Table::new(
                self.summaries.iter().map(present_summary_row),
                [
                    Constraint::Length(name_width),
                    Constraint::Length(6),
                    Constraint::Length(6),
                    Constraint::Min(6),
                ],
            )
            .header(Row::new(vec!["Puzzle", "Solves", "Best", "Average"]).style(header_style))
            .block(Block::default().borders(Borders::ALL).title("By puzzle"))
            .column_spacing(2)
            .render(tables[0], buf);

            Table::new(
                self.recent.iter().map(present_recent_row),
                [
                    Constraint::Length(name_width),
                    Constraint::Length(6),
                    Constraint::Length(5),
                    Constraint::Min(16),
                ],
            )
            .header(Row::new(vec!["Puzzle", "Time", "Words", "Solved"]).style(header_style))
            .block(Block::default().borders(Borders::ALL).title("Recent"))
            .column_spacing(2)
            .render(tables[1], buf);
        }

        Paragraph::new("(b/bksp) back  (n) new game  (esc) quit")
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn record(puzzle: &str, secs: u64) -> CompletionRecord {
        CompletionRecord {
            puzzle: puzzle.to_string(),
            elapsed_seconds: secs,
            words: 9,
            completed_at: Local.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap(),
        }
    }

    fn text(view: &HistoryView) -> String {
        let area = Rect::new(0, 0, 70, 24);
        let mut buffer = Buffer::empty(area);
        view.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_empty_history() {
        let view = HistoryView::default();
        assert!(view.is_empty());
        assert!(text(&view).contains("No puzzles solved yet."));
    }

    #[test]
    fn test_load_and_render_from_db() {
        let db = HistoryDb::open_in_memory().unwrap();
        db.record_completion(&record("wedding", 125)).unwrap();
        db.record_completion(&record("wedding", 95)).unwrap();
        db.record_completion(&record("wedding-wide", 300)).unwrap();

        let view = HistoryView::load(&db).unwrap();
        assert_eq!(view.summaries.len(), 2);
        assert_eq!(view.recent.len(), 3);

        let rendered = text(&view);
        assert!(rendered.contains("Solve History"));
        assert!(rendered.contains("wedding-wide"));
        assert!(rendered.contains("1:35"));
        assert!(rendered.contains("2024-06-01 12:30"));
    }

    #[test]
    fn test_puzzle_column_width() {
        let view = HistoryView {
            summaries: vec![],
            recent: vec![record("ab", 1)],
        };
        assert_eq!(view.puzzle_column_width(), 6);
        let view = HistoryView {
            summaries: vec![],
            recent: vec![record("wedding-wide", 1)],
        };
        assert_eq!(view.puzzle_column_width(), 12);
    }

    #[test]
    fn test_summary_row_formats_times() {
        let summary = PuzzleSummary {
            puzzle: "wedding".to_string(),
            solves: 3,
            best_seconds: 61,
            avg_seconds: 89.6,
        };
        // rows are opaque, so just make sure presenting doesn't panic
        let _ = present_summary_row(&summary);
        assert_eq!(format_time(summary.avg_seconds.round() as u64), "1:30");
    }
}
