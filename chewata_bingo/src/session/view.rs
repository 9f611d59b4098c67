//! Rendering snapshots and the presentation adapter interface.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{
    config::Stake,
    selection::SeatId,
    state_machine::{PhaseKind, RoundOutcome},
    timers::TimerKind,
};
use crate::game::{BingoNumber, Card, MarkSet};

/// A running countdown as shown to the player
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Countdown {
    pub kind: TimerKind,
    pub secs: u32,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SelectionView {
    pub taken: BTreeSet<SeatId>,
    pub selected: Option<SeatId>,
    pub confirmed: bool,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameView {
    pub seat: Option<SeatId>,
    /// `None` when watching only.
    pub card: Option<Card>,
    pub marks: Option<MarkSet>,
    pub bingo_ready: bool,
    pub called: BTreeSet<BingoNumber>,
    pub latest: Option<BingoNumber>,
    /// Most recent first.
    pub history: Vec<BingoNumber>,
    pub exhausted: bool,
    pub outcome: Option<RoundOutcome>,
}

/// Everything a presenter needs to draw one frame. Always taken from a
/// settled session, never mid-transition.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SessionView {
    pub phase: PhaseKind,
    pub stake: Stake,
    pub countdown: Option<Countdown>,
    pub selection: Option<SelectionView>,
    pub game: Option<GameView>,
}

/// What the big call circle shows
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CallCircle {
    Idle,
    Latest(BingoNumber),
    Exhausted,
}

/// Presentation adapter. Implementations draw; they never change session
/// state, and they only ever see settled snapshots.
pub trait Presenter {
    fn render_phase(&mut self, phase: PhaseKind, stake: Stake);

    fn render_master_board(&mut self, called: &BTreeSet<BingoNumber>);

    fn render_call_circle(&mut self, circle: CallCircle);

    fn render_call_history(&mut self, history: &[BingoNumber]);

    /// `card` is `None` when watching only.
    fn render_player_card(
        &mut self,
        card: Option<&Card>,
        marks: Option<&MarkSet>,
        bingo_ready: bool,
    );

    fn render_selection_board(
        &mut self,
        taken: &BTreeSet<SeatId>,
        selected: Option<SeatId>,
        confirmed: bool,
    );

    fn render_countdown(&mut self, kind: TimerKind, secs: u32);

    /// Transient notice, e.g. why an intent was refused.
    fn show_message(&mut self, _message: &str) {}
}

/// Draw a whole snapshot through `presenter`.
pub fn present<P: Presenter + ?Sized>(view: &SessionView, presenter: &mut P) {
    presenter.render_phase(view.phase, view.stake);

    if let Some(selection) = &view.selection {
        presenter.render_selection_board(
            &selection.taken,
            selection.selected,
            selection.confirmed,
        );
    }

    if let Some(game) = &view.game {
        presenter.render_master_board(&game.called);
        let circle = match (game.latest, game.exhausted) {
            (_, true) => CallCircle::Exhausted,
            (Some(n), false) => CallCircle::Latest(n),
            (None, false) => CallCircle::Idle,
        };
        presenter.render_call_circle(circle);
        presenter.render_call_history(&game.history);
        presenter.render_player_card(game.card.as_ref(), game.marks.as_ref(), game.bingo_ready);
    }

    if let Some(countdown) = view.countdown {
        presenter.render_countdown(countdown.kind, countdown.secs);
    }
}
