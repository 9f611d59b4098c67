//! Bingo cards, cell identifiers and mark sets.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    fmt,
    ops::RangeInclusive,
};
use thiserror::Error;

use super::{
    constants::{CARD_SIZE, COLUMN_LETTERS, COLUMN_SPAN, FREE_CELL, MAX_NUMBER},
    draw::draw_without_replacement,
};

/// A callable number, 1 through 75.
pub type BingoNumber = u8;

/// A 5x5 grid of marked/unmarked flags, indexed `[row][col]`.
pub type MarkGrid = [[bool; CARD_SIZE]; CARD_SIZE];

/// Range of numbers that belong to column `col` (0 = B ... 4 = O), or
/// `None` past the last column.
#[must_use]
pub fn column_range(col: usize) -> Option<RangeInclusive<BingoNumber>> {
    column_ranges().nth(col)
}

/// Column ranges left to right.
fn column_ranges() -> impl Iterator<Item = RangeInclusive<BingoNumber>> {
    (1..=MAX_NUMBER)
        .step_by(usize::from(COLUMN_SPAN))
        .map(|start| start..=start + COLUMN_SPAN - 1)
}

/// Column letter for a number, or `None` if it isn't callable.
#[must_use]
pub fn column_letter(number: BingoNumber) -> Option<char> {
    if number == 0 || number > MAX_NUMBER {
        return None;
    }
    Some(COLUMN_LETTERS[usize::from((number - 1) / COLUMN_SPAN)])
}

/// Identifier of a cell on a card. Also used as the member type of a
/// [`MarkSet`], where `Free` is the sentinel for the center cell.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Cell {
    Free,
    Number(BingoNumber),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => write!(f, "FREE"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Errors from building a card out of explicit columns
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CardError {
    #[error("{value} doesn't belong in column {column}")]
    OutOfRange { column: char, value: BingoNumber },
    #[error("{value} appears twice in column {column}")]
    DuplicateInColumn { column: char, value: BingoNumber },
}

/// A 5x5 bingo card with a free center cell.
///
/// Column `k` holds distinct numbers from [`column_range(k)`]. The column
/// ranges are disjoint, so every number on a card is unique.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Card {
    rows: [[Cell; CARD_SIZE]; CARD_SIZE],
}

impl Card {
    /// Generate a fresh card.
    ///
    /// Each column draws five numbers from its own pool; draw order becomes
    /// row order top to bottom. The center draw is replaced by the free cell.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut rows = [[Cell::Free; CARD_SIZE]; CARD_SIZE];
        for (col, range) in column_ranges().enumerate() {
            let mut pool: Vec<BingoNumber> = range.collect();
            for (row, cells) in rows.iter_mut().enumerate() {
                // Column pools hold 15 values and we only take 5.
                let Ok((value, rest)) = draw_without_replacement(&pool, rng) else {
                    break;
                };
                pool = rest;
                if (row, col) != FREE_CELL {
                    cells[col] = Cell::Number(value);
                }
            }
        }
        Self { rows }
    }

    /// Build a card from explicit columns (top to bottom).
    ///
    /// The value given for the center cell is ignored.
    ///
    /// # Errors
    ///
    /// Fails if a value is outside its column's range or repeats within a
    /// column.
    pub fn from_columns(
        columns: [[BingoNumber; CARD_SIZE]; CARD_SIZE],
    ) -> Result<Self, CardError> {
        let mut rows = [[Cell::Free; CARD_SIZE]; CARD_SIZE];
        for ((col, values), range) in columns.iter().enumerate().zip(column_ranges()) {
            let letter = COLUMN_LETTERS[col];
            let mut seen = BTreeSet::new();
            for (row, &value) in values.iter().enumerate() {
                if (row, col) == FREE_CELL {
                    continue;
                }
                if !range.contains(&value) {
                    return Err(CardError::OutOfRange {
                        column: letter,
                        value,
                    });
                }
                if !seen.insert(value) {
                    return Err(CardError::DuplicateInColumn {
                        column: letter,
                        value,
                    });
                }
                rows[row][col] = Cell::Number(value);
            }
        }
        Ok(Self { rows })
    }

    #[must_use]
    pub fn rows(&self) -> &[[Cell; CARD_SIZE]; CARD_SIZE] {
        &self.rows
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.rows.get(row).and_then(|cells| cells.get(col)).copied()
    }

    #[must_use]
    pub fn column(&self, col: usize) -> Option<[Cell; CARD_SIZE]> {
        if col >= CARD_SIZE {
            return None;
        }
        Some(std::array::from_fn(|row| self.rows[row][col]))
    }

    /// Numbers on the card in row-major order (free cell skipped).
    pub fn numbers(&self) -> impl Iterator<Item = BingoNumber> + '_ {
        self.rows.iter().flatten().filter_map(|cell| match cell {
            Cell::Number(n) => Some(*n),
            Cell::Free => None,
        })
    }

    #[must_use]
    pub fn contains(&self, number: BingoNumber) -> bool {
        self.position_of(number).is_some()
    }

    #[must_use]
    pub fn position_of(&self, number: BingoNumber) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(row, cells)| {
            cells
                .iter()
                .position(|&cell| cell == Cell::Number(number))
                .map(|col| (row, col))
        })
    }

    /// Project a mark set onto this card's layout.
    #[must_use]
    pub fn mark_grid(&self, marks: &MarkSet) -> MarkGrid {
        let mut grid = [[false; CARD_SIZE]; CARD_SIZE];
        for (row, cells) in self.rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                grid[row][col] = marks.contains(*cell);
            }
        }
        grid
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in COLUMN_LETTERS {
            write!(f, "{letter:>5}")?;
        }
        writeln!(f)?;
        for cells in &self.rows {
            for cell in cells {
                write!(f, "{:>5}", cell.to_string())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Cells currently marked on a player's card. The free cell is always in.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "BTreeSet<Cell>")]
pub struct MarkSet(BTreeSet<Cell>);

impl From<BTreeSet<Cell>> for MarkSet {
    fn from(mut cells: BTreeSet<Cell>) -> Self {
        cells.insert(Cell::Free);
        Self(cells)
    }
}

impl Default for MarkSet {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkSet {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::from([Cell::Free]))
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.0.contains(&cell)
    }

    #[must_use]
    pub fn is_marked(&self, number: BingoNumber) -> bool {
        self.contains(Cell::Number(number))
    }

    /// Returns `true` if the number wasn't already marked.
    pub fn mark(&mut self, number: BingoNumber) -> bool {
        self.0.insert(Cell::Number(number))
    }

    /// Returns `true` if the number was marked.
    pub fn unmark(&mut self, number: BingoNumber) -> bool {
        self.0.remove(&Cell::Number(number))
    }

    /// Marked numbers, ascending. The free cell isn't included.
    pub fn numbers(&self) -> impl Iterator<Item = BingoNumber> + '_ {
        self.0.iter().filter_map(|cell| match cell {
            Cell::Number(n) => Some(*n),
            Cell::Free => None,
        })
    }

    /// Number of marked cells, free cell included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true; the free cell is always marked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.0.iter()
    }
}
