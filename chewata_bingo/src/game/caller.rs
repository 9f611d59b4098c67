//! The number caller: draws 1-75 without replacement and remembers the order.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};

use super::{
    card::{BingoNumber, column_letter},
    constants::MAX_NUMBER,
    draw::{DrawError, draw_without_replacement},
};

/// Result of asking the caller for the next number
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CallOutcome {
    Called(BingoNumber),
    /// Every number has already been called.
    Exhausted,
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Called(n) => match column_letter(*n) {
                Some(letter) => write!(f, "{letter}-{n}"),
                None => write!(f, "{n}"),
            },
            Self::Exhausted => write!(f, "no more numbers"),
        }
    }
}

/// Pool of uncalled numbers plus the ordered call sequence.
///
/// The pool and the sequence always partition 1..=75. A caller is never
/// rewound; a new game gets a new caller.
#[derive(Clone, Debug)]
pub struct Caller {
    pool: Vec<BingoNumber>,
    called: Vec<BingoNumber>,
}

impl Default for Caller {
    fn default() -> Self {
        Self::new()
    }
}

impl Caller {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pool: (1..=MAX_NUMBER).collect(),
            called: Vec::with_capacity(usize::from(MAX_NUMBER)),
        }
    }

    pub fn call_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> CallOutcome {
        match draw_without_replacement(&self.pool, rng) {
            Ok((number, rest)) => {
                self.pool = rest;
                self.called.push(number);
                debug!(
                    "called {} ({} left)",
                    CallOutcome::Called(number),
                    self.pool.len()
                );
                CallOutcome::Called(number)
            }
            Err(DrawError::EmptyPool) => CallOutcome::Exhausted,
        }
    }

    #[must_use]
    pub fn has_been_called(&self, number: BingoNumber) -> bool {
        self.called.contains(&number)
    }

    /// The last `n` calls, most recent first.
    #[must_use]
    pub fn history(&self, n: usize) -> Vec<BingoNumber> {
        self.called.iter().rev().take(n).copied().collect()
    }

    #[must_use]
    pub fn latest(&self) -> Option<BingoNumber> {
        self.called.last().copied()
    }

    /// Every call so far, in call order.
    #[must_use]
    pub fn called(&self) -> &[BingoNumber] {
        &self.called
    }

    #[must_use]
    pub fn called_set(&self) -> BTreeSet<BingoNumber> {
        self.called.iter().copied().collect()
    }

    /// Numbers still in the pool.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.pool.is_empty()
    }
}
