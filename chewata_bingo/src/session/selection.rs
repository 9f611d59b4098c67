//! The seat selection board shown before each round.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::game::constants::MAX_SEAT;

/// Seat number on the selection board, 1 through 100.
pub type SeatId = u8;

#[must_use]
pub fn is_valid_seat(seat: SeatId) -> bool {
    (1..=MAX_SEAT).contains(&seat)
}

/// Which seats show as taken. Purely decorative; nothing else holds them.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SeatBoard {
    taken: BTreeSet<SeatId>,
}

impl SeatBoard {
    /// Each seat is independently taken with probability `taken_probability`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, taken_probability: f64) -> Self {
        let p = taken_probability.clamp(0.0, 1.0);
        let taken = (1..=MAX_SEAT).filter(|_| rng.random_bool(p)).collect();
        Self { taken }
    }

    #[must_use]
    pub fn with_taken(taken: impl IntoIterator<Item = SeatId>) -> Self {
        Self {
            taken: taken.into_iter().filter(|&s| is_valid_seat(s)).collect(),
        }
    }

    #[must_use]
    pub fn is_taken(&self, seat: SeatId) -> bool {
        self.taken.contains(&seat)
    }

    #[must_use]
    pub fn taken(&self) -> &BTreeSet<SeatId> {
        &self.taken
    }

    /// Seats a player could still pick, ascending.
    pub fn free_seats(&self) -> impl Iterator<Item = SeatId> + '_ {
        (1..=MAX_SEAT).filter(|seat| !self.taken.contains(seat))
    }
}

/// The player's pick on the selection board.
///
/// Once confirmed the selection is locked and further picks are refused.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CardSelection {
    pub seat: Option<SeatId>,
    pub confirmed: bool,
    pub locked: bool,
}

impl CardSelection {
    /// The seat that goes into the game, if the pick was confirmed.
    #[must_use]
    pub fn confirmed_seat(&self) -> Option<SeatId> {
        if self.confirmed { self.seat } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_seat_bounds() {
        assert!(!is_valid_seat(0));
        assert!(is_valid_seat(1));
        assert!(is_valid_seat(100));
        assert!(!is_valid_seat(101));
    }

    #[test]
    fn test_generate_extremes() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(SeatBoard::generate(&mut rng, 0.0).taken().is_empty());
        assert_eq!(SeatBoard::generate(&mut rng, 1.0).taken().len(), 100);
    }

    #[test]
    fn test_generate_roughly_matches_probability() {
        let mut rng = StdRng::seed_from_u64(17);
        let total: usize = (0..50)
            .map(|_| SeatBoard::generate(&mut rng, 0.3).taken().len())
            .sum();
        // 5000 seats at 30%; allow a generous margin
        assert!((1200..=1800).contains(&total), "got {total}");
    }

    #[test]
    fn test_free_seats_excludes_taken() {
        let board = SeatBoard::with_taken([1, 2, 3, 250]);
        assert_eq!(board.taken().len(), 3);
        assert_eq!(board.free_seats().next(), Some(4));
        assert_eq!(board.free_seats().count(), 97);
    }

    #[test]
    fn test_confirmed_seat() {
        let mut selection = CardSelection {
            seat: Some(7),
            ..CardSelection::default()
        };
        assert_eq!(selection.confirmed_seat(), None);
        selection.confirmed = true;
        assert_eq!(selection.confirmed_seat(), Some(7));
    }
}
