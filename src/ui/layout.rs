use ratatui::layout::Rect;
use strands::puzzle::Cell;

/// Columns per grid cell: the letter box is three wide, then a one column gap.
pub const CELL_WIDTH: u16 = 4;
/// Rows per grid cell: the letter line, then a one row gap.
pub const CELL_HEIGHT: u16 = 2;
/// Lines above the grid: title, status, blank.
pub const HEADER_LINES: u16 = 3;

/// Where the letter grid sits on screen. Shared by rendering and mouse
/// hit-testing, so both always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub x: u16,
    pub y: u16,
    pub rows: usize,
    pub cols: usize,
}

impl GridLayout {
    pub fn compute(area: Rect, (rows, cols): (usize, usize)) -> Self {
        let width = Self::span(cols, CELL_WIDTH);
        Self {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y + HEADER_LINES,
            rows,
            cols,
        }
    }

    fn span(n: usize, step: u16) -> u16 {
        (n as u16).saturating_mul(step).saturating_sub(1)
    }

    pub fn width(&self) -> u16 {
        Self::span(self.cols, CELL_WIDTH)
    }

    pub fn height(&self) -> u16 {
        Self::span(self.rows, CELL_HEIGHT)
    }

    /// Top left of the three-wide letter box for `cell`.
    pub fn origin(&self, cell: Cell) -> (u16, u16) {
        (
            self.x + cell.col as u16 * CELL_WIDTH,
            self.y + cell.row as u16 * CELL_HEIGHT,
        )
    }

    /// The cell whose letter box contains the terminal position, if any.
    /// Gaps between letters do not hit, so a diagonal drag does not graze
    /// the orthogonal neighbours on its way.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<Cell> {
        let dx = column.checked_sub(self.x)?;
        let dy = row.checked_sub(self.y)?;
        if dx % CELL_WIDTH == CELL_WIDTH - 1 || dy % CELL_HEIGHT != 0 {
            return None;
        }
        let cell = Cell::new((dy / CELL_HEIGHT) as usize, (dx / CELL_WIDTH) as usize);
        (cell.row < self.rows && cell.col < self.cols).then_some(cell)
    }

    /// Screen position and glyph of the line joining two adjacent cells,
    /// drawn in the gap between them.
    pub fn connector(&self, a: Cell, b: Cell) -> Option<(u16, u16, char)> {
        if !a.is_adjacent_to(&b) {
            return None;
        }
        let top = a.row.min(b.row);
        let left = a.col.min(b.col);
        let (x, y) = self.origin(Cell::new(top, left));

        let glyph = match (a.row == b.row, a.col == b.col) {
            (true, _) => return Some((x + CELL_WIDTH - 1, y, '─')),
            (_, true) => return Some((x + 1, y + 1, '│')),
            // down-right or up-left
            _ if (b.row > a.row) == (b.col > a.col) => '╲',
            _ => '╱',
        };
        Some((x + CELL_WIDTH - 1, y + 1, glyph))
    }
}
