//! Fixed dimensions of a bingo game.

/// Cards are 5x5.
pub const CARD_SIZE: usize = 5;

/// Row and column of the free cell.
pub const FREE_CELL: (usize, usize) = (2, 2);

/// Numbers per column range (B is 1-15, I is 16-30, ...).
pub const COLUMN_SPAN: u8 = 15;

/// Highest number the caller can draw.
pub const MAX_NUMBER: u8 = 75;

/// Column headers, left to right.
pub const COLUMN_LETTERS: [char; CARD_SIZE] = ['B', 'I', 'N', 'G', 'O'];

/// Seats on the selection board are numbered 1..=MAX_SEAT.
pub const MAX_SEAT: u8 = 100;

/// Default number of recent calls shown in the call history strip.
pub const DEFAULT_HISTORY_LEN: usize = 5;
