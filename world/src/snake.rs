//! Ordered body of the snake together with its per-segment headings.

use std::collections::VecDeque;

use snake_arcade_core::{Cell, Heading, LayoutError};

use crate::Board;

/// Number of segments in the default layout.
pub const DEFAULT_LENGTH: u32 = 3;

/// Snake body, head first.
///
/// Between ticks `cells`, `directions` and `length` always agree. During a
/// tick the head has been prepended but the tail not yet retracted, so both
/// sequences briefly hold `length + 1` entries.
#[derive(Clone, Debug)]
pub struct Snake {
    cells: VecDeque<Cell>,
    directions: VecDeque<Heading>,
    length: u32,
    alive: bool,
    next_direction: Heading,
    growth_pending: bool,
}

impl Snake {
    /// Creates a straight snake running from `head` towards `tail`.
    ///
    /// The body spans `head.chebyshev_distance(tail)` cells starting at the
    /// head; the tail endpoint itself is not occupied. The initial heading
    /// points away from the body.
    pub fn from_endpoints(head: Cell, tail: Cell, board: &Board) -> Result<Self, LayoutError> {
        if head.column() != tail.column() && head.row() != tail.row() {
            return Err(LayoutError::NotAligned { head, tail });
        }

        let length = head.chebyshev_distance(tail);
        if length < 2 {
            return Err(LayoutError::TooShort);
        }

        let toward_tail = (
            (tail.column() - head.column()).signum(),
            (tail.row() - head.row()).signum(),
        );
        let heading = Heading::ALL
            .into_iter()
            .find(|heading| heading.unit_offset() == (-toward_tail.0, -toward_tail.1))
            .unwrap_or(Heading::Right);

        let snake = Self::straight(head, length, heading);
        if let Some(cell) = snake.cells.iter().copied().find(|cell| !board.contains(*cell)) {
            return Err(LayoutError::OutOfBounds { cell });
        }
        Ok(snake)
    }

    /// Endpoints of the default horizontal layout centred on a grid.
    #[must_use]
    pub fn default_endpoints(columns: u32, rows: u32) -> (Cell, Cell) {
        let column = (columns / 2) as i32;
        let row = (rows / 2) as i32;
        (
            Cell::new(column, row),
            Cell::new(column - DEFAULT_LENGTH as i32, row),
        )
    }

    pub(crate) fn straight(head: Cell, length: u32, heading: Heading) -> Self {
        let (dc, dr) = heading.unit_offset();
        let cells: VecDeque<Cell> = (0..length as i32)
            .map(|i| Cell::new(head.column() - dc * i, head.row() - dr * i))
            .collect();
        let directions = std::iter::repeat(heading)
            .take(cells.len())
            .collect::<VecDeque<_>>();

        Self {
            cells,
            directions,
            length,
            alive: true,
            next_direction: heading,
            growth_pending: false,
        }
    }

    /// Occupied cells, head first.
    #[must_use]
    pub fn cells(&self) -> &VecDeque<Cell> {
        &self.cells
    }

    /// Heading of each segment, index-aligned with [`Snake::cells`].
    #[must_use]
    pub fn directions(&self) -> &VecDeque<Heading> {
        &self.directions
    }

    /// Number of committed segments.
    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    /// Cell occupied by the head.
    #[must_use]
    pub fn head(&self) -> Option<Cell> {
        self.cells.front().copied()
    }

    /// Whether the snake survived every tick so far.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Heading applied on the next advance.
    #[must_use]
    pub const fn next_direction(&self) -> Heading {
        self.next_direction
    }

    /// Whether the current tick consumed food and will keep its tail.
    #[must_use]
    pub const fn growth_pending(&self) -> bool {
        self.growth_pending
    }

    /// Reports whether the head has moved this tick but the tail has not settled.
    #[must_use]
    pub fn mid_tick(&self) -> bool {
        self.cells.len() as u64 > u64::from(self.length)
    }

    /// Reports whether any segment sits on the cell.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub(crate) fn set_next_direction(&mut self, heading: Heading) -> bool {
        let changed = self.next_direction != heading;
        self.next_direction = heading;
        changed
    }

    pub(crate) fn push_head(&mut self) -> (Cell, Cell, Heading) {
        let heading = self.next_direction;
        let from = self.cells.front().copied().unwrap_or_else(|| Cell::new(1, 1));
        let to = from.step(heading);
        self.directions.push_front(heading);
        self.cells.push_front(to);
        (from, to, heading)
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }

    pub(crate) fn mark_growth(&mut self) {
        self.growth_pending = true;
    }

    pub(crate) fn settle(&mut self) -> bool {
        if self.growth_pending {
            self.growth_pending = false;
            self.length = self.length.saturating_add(1);
            true
        } else {
            let _ = self.cells.pop_back();
            let _ = self.directions.pop_back();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(20, 20, 750.0, 750.0).expect("valid board")
    }

    #[test]
    fn default_layout_is_three_cells_facing_right() {
        let (head, tail) = Snake::default_endpoints(20, 20);
        assert_eq!(head, Cell::new(10, 10));
        assert_eq!(tail, Cell::new(7, 10));

        let snake = Snake::from_endpoints(head, tail, &board()).expect("valid layout");
        assert_eq!(
            snake.cells().iter().copied().collect::<Vec<_>>(),
            vec![Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]
        );
        assert_eq!(snake.length(), 3);
        assert!(snake.directions().iter().all(|h| *h == Heading::Right));
        assert_eq!(snake.next_direction(), Heading::Right);
    }

    #[test]
    fn vertical_layout_points_away_from_tail() {
        let snake = Snake::from_endpoints(Cell::new(5, 5), Cell::new(5, 9), &board())
            .expect("valid layout");
        assert_eq!(snake.next_direction(), Heading::Up);
        assert_eq!(snake.cells().back().copied(), Some(Cell::new(5, 8)));
    }

    #[test]
    fn rejects_diagonal_short_and_off_board_layouts() {
        let board = board();
        assert!(matches!(
            Snake::from_endpoints(Cell::new(5, 5), Cell::new(7, 7), &board),
            Err(LayoutError::NotAligned { .. })
        ));
        assert_eq!(
            Snake::from_endpoints(Cell::new(5, 5), Cell::new(6, 5), &board).unwrap_err(),
            LayoutError::TooShort
        );
        assert_eq!(
            Snake::from_endpoints(Cell::new(2, 5), Cell::new(-2, 5), &board).unwrap_err(),
            LayoutError::OutOfBounds {
                cell: Cell::new(0, 5)
            }
        );
    }

    #[test]
    fn settle_retracts_or_keeps_tail() {
        let mut snake = Snake::straight(Cell::new(10, 10), 3, Heading::Right);
        let _ = snake.push_head();
        assert!(snake.mid_tick());
        assert!(!snake.settle());
        assert_eq!(snake.cells().len(), 3);

        let _ = snake.push_head();
        snake.mark_growth();
        assert!(snake.settle());
        assert_eq!(snake.length(), 4);
        assert_eq!(snake.cells().len(), 4);
        assert_eq!(snake.directions().len(), 4);
        assert!(!snake.mid_tick());
    }
}
