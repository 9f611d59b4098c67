//! Line completion checks over a mark grid.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{card::MarkGrid, constants::CARD_SIZE};

/// One of the twelve lines that can complete a bingo.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Line {
    Row(usize),
    Column(usize),
    /// (0,0) to (4,4)
    Diagonal,
    /// (0,4) to (4,0)
    AntiDiagonal,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(row) => write!(f, "row {}", row + 1),
            Self::Column(col) => write!(f, "column {}", col + 1),
            Self::Diagonal => write!(f, "diagonal"),
            Self::AntiDiagonal => write!(f, "anti-diagonal"),
        }
    }
}

impl Line {
    /// All twelve lines.
    pub fn all() -> impl Iterator<Item = Line> {
        (0..CARD_SIZE)
            .map(Line::Row)
            .chain((0..CARD_SIZE).map(Line::Column))
            .chain([Line::Diagonal, Line::AntiDiagonal])
    }

    /// `(row, col)` coordinates covered by this line.
    #[must_use]
    pub fn cells(self) -> [(usize, usize); CARD_SIZE] {
        std::array::from_fn(|i| match self {
            Self::Row(row) => (row, i),
            Self::Column(col) => (i, col),
            Self::Diagonal => (i, i),
            Self::AntiDiagonal => (i, CARD_SIZE - 1 - i),
        })
    }

    #[must_use]
    pub fn is_complete(self, grid: &MarkGrid) -> bool {
        self.cells().iter().all(|&(row, col)| grid[row][col])
    }
}

/// Whether any row, column or diagonal of `grid` is fully marked.
#[must_use]
pub fn has_bingo(grid: &MarkGrid) -> bool {
    Line::all().any(|line| line.is_complete(grid))
}

/// Every completed line on `grid`, rows first.
#[must_use]
pub fn winning_lines(grid: &MarkGrid) -> Vec<Line> {
    Line::all().filter(|line| line.is_complete(grid)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_only() -> MarkGrid {
        let mut grid = [[false; CARD_SIZE]; CARD_SIZE];
        grid[2][2] = true;
        grid
    }

    #[test]
    fn test_empty_grid_has_no_bingo() {
        assert!(!has_bingo(&[[false; CARD_SIZE]; CARD_SIZE]));
    }

    #[test]
    fn test_free_cell_alone_is_not_bingo() {
        assert!(!has_bingo(&free_only()));
        assert!(winning_lines(&free_only()).is_empty());
    }

    #[test]
    fn test_full_grid_is_bingo() {
        let grid = [[true; CARD_SIZE]; CARD_SIZE];
        assert!(has_bingo(&grid));
        assert_eq!(winning_lines(&grid).len(), 12);
    }

    #[test]
    fn test_middle_row() {
        let mut grid = free_only();
        for col in 0..CARD_SIZE {
            grid[2][col] = true;
        }
        assert!(has_bingo(&grid));
        assert_eq!(winning_lines(&grid), vec![Line::Row(2)]);
    }

    #[test]
    fn test_column() {
        let mut grid = free_only();
        for row in 0..CARD_SIZE {
            grid[row][4] = true;
        }
        assert_eq!(winning_lines(&grid), vec![Line::Column(4)]);
    }

    #[test]
    fn test_diagonals() {
        let mut grid = free_only();
        for i in 0..CARD_SIZE {
            grid[i][i] = true;
        }
        assert_eq!(winning_lines(&grid), vec![Line::Diagonal]);

        let mut grid = free_only();
        for i in 0..CARD_SIZE {
            grid[i][CARD_SIZE - 1 - i] = true;
        }
        assert_eq!(winning_lines(&grid), vec![Line::AntiDiagonal]);
    }

    #[test]
    fn test_four_of_five_everywhere_is_not_bingo() {
        // One hole per row, per column and per diagonal; center stays marked.
        let mut grid = [[true; CARD_SIZE]; CARD_SIZE];
        for (row, col) in [(0, 0), (1, 3), (2, 4), (3, 2), (4, 1)] {
            grid[row][col] = false;
        }
        for line in Line::all() {
            let marked = line.cells().iter().filter(|&&(r, c)| grid[r][c]).count();
            assert_eq!(marked, 4, "{line}");
        }
        assert!(!has_bingo(&grid));
    }

    #[test]
    fn test_line_cells() {
        assert_eq!(
            Line::AntiDiagonal.cells(),
            [(0, 4), (1, 3), (2, 2), (3, 1), (4, 0)]
        );
        assert_eq!(Line::all().count(), 12);
    }
}
