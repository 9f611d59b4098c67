//! Console presenter that writes session frames to the log.

use std::collections::BTreeSet;

use chewata_bingo::{
    BingoNumber, CallOutcome, Card, MarkSet, PhaseKind,
    session::{CallCircle, Presenter, SeatId, Stake, TimerKind},
};
use log::{debug, info, warn};

/// Logs what a graphical front end would draw, skipping frames that
/// didn't change.
#[derive(Debug, Default)]
pub struct LogPresenter {
    phase: Option<PhaseKind>,
    circle: Option<CallCircle>,
    card: Option<Card>,
    bingo_ready: bool,
}

impl LogPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for LogPresenter {
    fn render_phase(&mut self, phase: PhaseKind, stake: Stake) {
        if self.phase != Some(phase) {
            info!("== {phase} (stake {stake}) ==");
            self.phase = Some(phase);
            if phase != PhaseKind::Game {
                self.circle = None;
                self.card = None;
                self.bingo_ready = false;
            }
        }
    }

    fn render_master_board(&mut self, called: &BTreeSet<BingoNumber>) {
        debug!("{} of 75 called", called.len());
    }

    fn render_call_circle(&mut self, circle: CallCircle) {
        if self.circle == Some(circle) {
            return;
        }
        match circle {
            CallCircle::Idle => {}
            CallCircle::Latest(n) => info!("called {}", CallOutcome::Called(n)),
            CallCircle::Exhausted => info!("no more numbers"),
        }
        self.circle = Some(circle);
    }

    fn render_call_history(&mut self, history: &[BingoNumber]) {
        debug!("recent calls {history:?}");
    }

    fn render_player_card(
        &mut self,
        card: Option<&Card>,
        marks: Option<&MarkSet>,
        bingo_ready: bool,
    ) {
        match card {
            Some(card) if self.card.as_ref() != Some(card) => {
                info!("your card\n{card}");
                self.card = Some(card.clone());
            }
            Some(_) => {}
            None if self.card.is_none() && self.phase == Some(PhaseKind::Game) => {
                debug!("watching only");
            }
            None => {}
        }
        if let Some(marks) = marks {
            debug!("marked {:?}", marks.numbers().collect::<Vec<_>>());
        }
        if bingo_ready && !self.bingo_ready {
            info!("BINGO is available");
        }
        self.bingo_ready = bingo_ready;
    }

    fn render_selection_board(
        &mut self,
        taken: &BTreeSet<SeatId>,
        selected: Option<SeatId>,
        confirmed: bool,
    ) {
        debug!(
            "{} seats taken, selected {selected:?}, confirmed {confirmed}",
            taken.len()
        );
    }

    fn render_countdown(&mut self, kind: TimerKind, secs: u32) {
        if secs % 10 == 0 || secs <= 3 {
            debug!("{kind}: {secs}s");
        }
    }

    fn show_message(&mut self, message: &str) {
        warn!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_leaving_game_forgets_card() {
        let card = Card::generate(&mut StdRng::seed_from_u64(0));
        let mut presenter = LogPresenter::new();
        presenter.render_phase(PhaseKind::Game, 10);
        presenter.render_call_circle(CallCircle::Latest(4));
        presenter.render_player_card(Some(&card), Some(&MarkSet::new()), true);
        assert_eq!(presenter.card.as_ref(), Some(&card));
        assert!(presenter.bingo_ready);

        presenter.render_phase(PhaseKind::Selection, 10);
        assert!(presenter.card.is_none());
        assert!(presenter.circle.is_none());
        assert!(!presenter.bingo_ready);
    }
}
