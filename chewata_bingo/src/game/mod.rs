//! Bingo game pieces that don't know about sessions or timers.
//!
//! - Sampling without replacement ([`draw`])
//! - Card generation and marks ([`card`])
//! - Number calling ([`caller`])
//! - Line detection ([`win`])

pub mod caller;
pub mod card;
pub mod constants;
pub mod draw;
pub mod win;

pub use caller::{CallOutcome, Caller};
pub use card::{BingoNumber, Card, CardError, Cell, MarkGrid, MarkSet, column_letter, column_range};
pub use draw::{DrawError, draw_without_replacement};
pub use win::{Line, has_bingo, winning_lines};
