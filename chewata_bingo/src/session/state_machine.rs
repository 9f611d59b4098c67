//! The bingo session state machine.
//!
//! A [`Session`] owns everything a single player's session needs: the stake,
//! the current phase with its data, the timers and the RNG. Intents and
//! ticks are the only ways in; both run to completion, and rejected intents
//! never change state.

use log::{debug, info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt};
use thiserror::Error;

use super::{
    config::{ConfigError, MarkPolicy, SessionConfig, Stake},
    selection::{CardSelection, SeatBoard, SeatId, is_valid_seat},
    timers::{TimerFamily, TimerFired, TimerKind, Timers},
    view::{Countdown, GameView, SelectionView, SessionView},
};
use crate::game::{BingoNumber, CallOutcome, Caller, Card, Cell, Line, MarkSet, winning_lines};

/// Intents that are refused. A refused intent leaves the session untouched.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum IntentError {
    #[error("not allowed during {0}")]
    WrongPhase(PhaseKind),
    #[error("stake {0} isn't offered")]
    UnknownStake(Stake),
    #[error("seat {0} doesn't exist")]
    InvalidSeat(SeatId),
    #[error("seat {0} is taken")]
    SeatTaken(SeatId),
    #[error("seat selection is locked")]
    SelectionLocked,
    #[error("pick a seat first")]
    NoSeatPicked,
    #[error("watching only; no card this round")]
    WatchOnly,
    #[error("the free cell is always marked")]
    FreeCell,
    #[error("{0} isn't on your card")]
    NotOnCard(BingoNumber),
    #[error("{0} hasn't been called")]
    NotCalled(BingoNumber),
    #[error("not yet! keep playing")]
    NoBingo,
    #[error("round is over")]
    RoundOver,
    #[error("can't swap a card that has marks")]
    CardInPlay,
    #[error("all numbers have been called")]
    NoNumbersLeft,
}

/// Player intents forwarded by the presentation layer
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Intent {
    ChooseStake(Stake),
    RequestPlay,
    PickSeat(SeatId),
    ConfirmSeat,
    ToggleMark(Cell),
    ClaimBingo,
    RequestNewCard,
    CallNumber,
    LeaveGame,
    ReturnToLanding,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChooseStake(stake) => write!(f, "choose stake {stake}"),
            Self::RequestPlay => write!(f, "play"),
            Self::PickSeat(seat) => write!(f, "pick seat {seat}"),
            Self::ConfirmSeat => write!(f, "confirm seat"),
            Self::ToggleMark(cell) => write!(f, "toggle {cell}"),
            Self::ClaimBingo => write!(f, "claim bingo"),
            Self::RequestNewCard => write!(f, "new card"),
            Self::CallNumber => write!(f, "call"),
            Self::LeaveGame => write!(f, "leave game"),
            Self::ReturnToLanding => write!(f, "back to landing"),
        }
    }
}

/// Which phase is active
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum PhaseKind {
    Landing,
    Selection,
    Game,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Landing => "landing",
            Self::Selection => "selection",
            Self::Game => "game",
        };
        write!(f, "{repr}")
    }
}

/// How a round ended
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RoundOutcome {
    /// The player claimed a verified bingo.
    Bingo,
    /// The game countdown ran out.
    TimeUp,
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bingo => write!(f, "BINGO!"),
            Self::TimeUp => write!(f, "time's up"),
        }
    }
}

/// Things that happened in the session, for logging and transient notices
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum SessionEvent {
    StakeChosen(Stake),
    SelectionStarted,
    SeatPicked(SeatId),
    SeatConfirmed(SeatId),
    GameStarted { seat: Option<SeatId> },
    NumberCalled(BingoNumber),
    NumbersExhausted,
    Marked(BingoNumber),
    Unmarked(BingoNumber),
    BingoAvailable,
    NewCard,
    RoundEnded(RoundOutcome),
    LeftGame,
    ReturnedToLanding,
    Rejected(IntentError),
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StakeChosen(stake) => write!(f, "stake set to {stake}"),
            Self::SelectionStarted => write!(f, "pick a card"),
            Self::SeatPicked(seat) => write!(f, "picked card {seat}"),
            Self::SeatConfirmed(seat) => write!(f, "card {seat} confirmed"),
            Self::GameStarted { seat: Some(seat) } => write!(f, "game started with card {seat}"),
            Self::GameStarted { seat: None } => write!(f, "game started; watching only"),
            Self::NumberCalled(n) => write!(f, "{}", CallOutcome::Called(*n)),
            Self::NumbersExhausted => write!(f, "all numbers have been called"),
            Self::Marked(n) => write!(f, "marked {n}"),
            Self::Unmarked(n) => write!(f, "unmarked {n}"),
            Self::BingoAvailable => write!(f, "you have a line! claim it"),
            Self::NewCard => write!(f, "new card dealt"),
            Self::RoundEnded(outcome) => write!(f, "round over: {outcome}"),
            Self::LeftGame => write!(f, "left the game"),
            Self::ReturnedToLanding => write!(f, "back to landing"),
            Self::Rejected(err) => write!(f, "{err}"),
        }
    }
}

/// Selection phase data
#[derive(Clone, Debug, Default)]
pub struct SelectionPhase {
    pub board: SeatBoard,
    pub selection: CardSelection,
}

/// The player's card for one round
#[derive(Clone, Debug)]
pub struct PlayerCard {
    pub card: Card,
    pub marks: MarkSet,
    /// Set when the marks complete a line; cleared if an unmark breaks it.
    pub bingo_ready: bool,
}

impl PlayerCard {
    #[must_use]
    pub fn new(card: Card) -> Self {
        Self {
            card,
            marks: MarkSet::new(),
            bingo_ready: false,
        }
    }

    #[must_use]
    pub fn winning_lines(&self) -> Vec<Line> {
        winning_lines(&self.card.mark_grid(&self.marks))
    }
}

/// Game phase data
#[derive(Clone, Debug)]
pub struct GameRound {
    pub seat: Option<SeatId>,
    /// `None` when watching only.
    pub player: Option<PlayerCard>,
    pub caller: Caller,
    /// All 75 numbers have been called; the round waits on the countdown.
    pub exhausted: bool,
    /// Set once the round is over and the outcome is on display.
    pub outcome: Option<RoundOutcome>,
}

impl GameRound {
    #[must_use]
    pub fn is_watch_only(&self) -> bool {
        self.player.is_none()
    }
}

#[derive(Clone, Debug)]
enum Phase {
    Landing,
    Selection(SelectionPhase),
    Game(GameRound),
}

impl Phase {
    fn kind(&self) -> PhaseKind {
        match self {
            Self::Landing => PhaseKind::Landing,
            Self::Selection(_) => PhaseKind::Selection,
            Self::Game(_) => PhaseKind::Game,
        }
    }
}

/// A single player's bingo session.
#[derive(Debug)]
pub struct Session<R = StdRng> {
    config: SessionConfig,
    stake: Stake,
    phase: Phase,
    timers: Timers,
    rng: R,
    events: VecDeque<SessionEvent>,
    rounds_played: u32,
}

impl Session<StdRng> {
    /// Create a session seeded from the OS.
    ///
    /// # Errors
    ///
    /// Fails if `config` doesn't validate.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_os_rng())
    }
}

impl<R: Rng> Session<R> {
    /// Create a session with an injected RNG (seeded in tests).
    ///
    /// # Errors
    ///
    /// Fails if `config` doesn't validate.
    pub fn with_rng(config: SessionConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            stake: config.default_stake(),
            config,
            phase: Phase::Landing,
            timers: Timers::new(),
            rng,
            events: VecDeque::new(),
            rounds_played: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> PhaseKind {
        self.phase.kind()
    }

    #[must_use]
    pub fn stake(&self) -> Stake {
        self.stake
    }

    #[must_use]
    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    #[must_use]
    pub fn selection(&self) -> Option<&SelectionPhase> {
        match &self.phase {
            Phase::Selection(selection) => Some(selection),
            _ => None,
        }
    }

    #[must_use]
    pub fn round(&self) -> Option<&GameRound> {
        match &self.phase {
            Phase::Game(round) => Some(round),
            _ => None,
        }
    }

    pub fn drain_events(&mut self) -> VecDeque<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply an intent, recording a `Rejected` event if it's refused.
    ///
    /// # Errors
    ///
    /// Returns why the intent was refused.
    pub fn apply(&mut self, intent: Intent) -> Result<(), IntentError> {
        let result = match intent {
            Intent::ChooseStake(stake) => self.choose_stake(stake),
            Intent::RequestPlay => self.request_play(),
            Intent::PickSeat(seat) => self.pick_seat(seat),
            Intent::ConfirmSeat => self.confirm_seat(),
            Intent::ToggleMark(cell) => self.toggle_mark(cell).map(|_| ()),
            Intent::ClaimBingo => self.claim_bingo().map(|_| ()),
            Intent::RequestNewCard => self.request_new_card(),
            Intent::CallNumber => self.call_number().map(|_| ()),
            Intent::LeaveGame => self.leave_game(),
            Intent::ReturnToLanding => self.return_to_landing(),
        };
        if let Err(err) = &result {
            debug!("rejected {intent}: {err}");
            self.events.push_back(SessionEvent::Rejected(err.clone()));
        }
        result
    }

    /// Change the stake. Allowed on the landing screen, and during selection
    /// until the seat is confirmed.
    ///
    /// # Errors
    ///
    /// Refused in the game phase, after confirmation, or for an amount that
    /// isn't offered.
    pub fn choose_stake(&mut self, stake: Stake) -> Result<(), IntentError> {
        match &self.phase {
            Phase::Landing => {}
            Phase::Selection(selection) if selection.selection.locked => {
                return Err(IntentError::SelectionLocked);
            }
            Phase::Selection(_) => {}
            Phase::Game(_) => return Err(IntentError::WrongPhase(PhaseKind::Game)),
        }
        if !self.config.stakes.contains(&stake) {
            return Err(IntentError::UnknownStake(stake));
        }
        self.stake = stake;
        self.events.push_back(SessionEvent::StakeChosen(stake));
        Ok(())
    }

    /// Landing -> Selection.
    ///
    /// # Errors
    ///
    /// Refused outside the landing phase.
    pub fn request_play(&mut self) -> Result<(), IntentError> {
        if !matches!(self.phase, Phase::Landing) {
            return Err(IntentError::WrongPhase(self.phase.kind()));
        }
        info!("playing for {}", self.stake);
        self.begin_selection();
        Ok(())
    }

    /// Pick a seat, replacing any earlier pick.
    ///
    /// # Errors
    ///
    /// Refused outside selection, once confirmed, or for a seat that's out
    /// of range or taken.
    pub fn pick_seat(&mut self, seat: SeatId) -> Result<(), IntentError> {
        let phase = selection_mut(&mut self.phase)?;
        if phase.selection.locked {
            return Err(IntentError::SelectionLocked);
        }
        if !is_valid_seat(seat) {
            return Err(IntentError::InvalidSeat(seat));
        }
        if phase.board.is_taken(seat) {
            return Err(IntentError::SeatTaken(seat));
        }
        phase.selection.seat = Some(seat);
        self.events.push_back(SessionEvent::SeatPicked(seat));
        Ok(())
    }

    /// Confirm the picked seat and lock the board. Doesn't start the game;
    /// only the selection countdown does that.
    ///
    /// # Errors
    ///
    /// Refused outside selection, when nothing is picked, or when already
    /// confirmed.
    pub fn confirm_seat(&mut self) -> Result<(), IntentError> {
        let phase = selection_mut(&mut self.phase)?;
        if phase.selection.confirmed {
            return Err(IntentError::SelectionLocked);
        }
        let Some(seat) = phase.selection.seat else {
            return Err(IntentError::NoSeatPicked);
        };
        phase.selection.confirmed = true;
        phase.selection.locked = true;
        self.events.push_back(SessionEvent::SeatConfirmed(seat));
        Ok(())
    }

    /// Selection -> Landing, while the pick is still open.
    ///
    /// # Errors
    ///
    /// Refused outside selection or once confirmed.
    pub fn return_to_landing(&mut self) -> Result<(), IntentError> {
        if selection_mut(&mut self.phase)?.selection.locked {
            return Err(IntentError::SelectionLocked);
        }
        self.timers.cancel_all();
        self.phase = Phase::Landing;
        self.events.push_back(SessionEvent::ReturnedToLanding);
        Ok(())
    }

    /// Mark or unmark a called number on the player's card.
    ///
    /// Returns whether the number is marked afterwards.
    ///
    /// # Errors
    ///
    /// Refused outside a live round, when watching only, for the free cell,
    /// and for numbers that aren't on the card or haven't been called.
    pub fn toggle_mark(&mut self, cell: Cell) -> Result<bool, IntentError> {
        let round = live_round_mut(&mut self.phase)?;
        let caller = &round.caller;
        let player = round.player.as_mut().ok_or(IntentError::WatchOnly)?;
        let number = match cell {
            Cell::Free => return Err(IntentError::FreeCell),
            Cell::Number(n) => n,
        };
        if !player.card.contains(number) {
            return Err(IntentError::NotOnCard(number));
        }
        if !caller.has_been_called(number) {
            return Err(IntentError::NotCalled(number));
        }

        let marked = if player.marks.unmark(number) {
            self.events.push_back(SessionEvent::Unmarked(number));
            false
        } else {
            player.marks.mark(number);
            self.events.push_back(SessionEvent::Marked(number));
            true
        };
        if Self::refresh_bingo(player) {
            self.events.push_back(SessionEvent::BingoAvailable);
        }
        Ok(marked)
    }

    /// Claim a bingo. The card is checked again here, independent of the
    /// flag set while marking.
    ///
    /// Returns the completed lines on success and ends the round.
    ///
    /// # Errors
    ///
    /// Refused outside a live round, when watching only, or when no line is
    /// complete.
    pub fn claim_bingo(&mut self) -> Result<Vec<Line>, IntentError> {
        let round = live_round_mut(&mut self.phase)?;
        let player = round.player.as_ref().ok_or(IntentError::WatchOnly)?;
        let lines = player.winning_lines();
        if lines.is_empty() {
            return Err(IntentError::NoBingo);
        }
        info!(
            "bingo on {}",
            lines
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.end_round(RoundOutcome::Bingo);
        Ok(lines)
    }

    /// Swap the player's card for a fresh one before anything is marked.
    /// Under the auto policy the new card comes with everything already
    /// called marked.
    ///
    /// # Errors
    ///
    /// Refused outside a live round, when watching only, or once the card
    /// has marks beyond the free cell.
    pub fn request_new_card(&mut self) -> Result<(), IntentError> {
        let round = live_round_mut(&mut self.phase)?;
        let player = round.player.as_mut().ok_or(IntentError::WatchOnly)?;
        if player.marks.numbers().next().is_some() {
            return Err(IntentError::CardInPlay);
        }
        *player = PlayerCard::new(Card::generate(&mut self.rng));
        self.events.push_back(SessionEvent::NewCard);

        if self.config.mark_policy == MarkPolicy::Auto {
            let called: Vec<_> = player
                .card
                .numbers()
                .filter(|&n| round.caller.has_been_called(n))
                .collect();
            for number in called {
                player.marks.mark(number);
                self.events.push_back(SessionEvent::Marked(number));
            }
            if Self::refresh_bingo(player) {
                self.events.push_back(SessionEvent::BingoAvailable);
            }
        }
        Ok(())
    }

    /// Call the next number now instead of waiting for the auto-call. The
    /// auto-call keeps its own schedule.
    ///
    /// Returns the number called.
    ///
    /// # Errors
    ///
    /// Refused outside a live round or once every number is out.
    pub fn call_number(&mut self) -> Result<BingoNumber, IntentError> {
        let round = live_round_mut(&mut self.phase)?;
        if round.exhausted || round.caller.is_exhausted() {
            return Err(IntentError::NoNumbersLeft);
        }
        match self.call_next() {
            Some(CallOutcome::Called(number)) => Ok(number),
            _ => Err(IntentError::NoNumbersLeft),
        }
    }

    /// Game -> Selection immediately, dropping the round.
    ///
    /// # Errors
    ///
    /// Refused outside the game phase.
    pub fn leave_game(&mut self) -> Result<(), IntentError> {
        if !matches!(self.phase, Phase::Game(_)) {
            return Err(IntentError::WrongPhase(self.phase.kind()));
        }
        self.events.push_back(SessionEvent::LeftGame);
        self.begin_selection();
        Ok(())
    }

    /// Advance session time by one second.
    pub fn tick(&mut self) {
        for fired in self.timers.advance() {
            if !self.timers.is_current(fired) {
                debug!("dropping cancelled {}", fired.kind);
                continue;
            }
            self.on_timer(fired);
        }
    }

    fn on_timer(&mut self, fired: TimerFired) {
        match fired.kind {
            TimerKind::SelectionCountdown => self.start_game(),
            TimerKind::AutoCall => {
                self.call_next();
            }
            TimerKind::GameCountdown => self.end_round(RoundOutcome::TimeUp),
            TimerKind::PostRound => self.begin_selection(),
        }
    }

    /// Fresh selection: new board, cleared pick, restarted countdown.
    fn begin_selection(&mut self) {
        self.timers.cancel_all();
        let board = SeatBoard::generate(&mut self.rng, self.config.taken_probability);
        debug!("{} seats taken", board.taken().len());
        self.phase = Phase::Selection(SelectionPhase {
            board,
            selection: CardSelection::default(),
        });
        self.timers
            .start(TimerKind::SelectionCountdown, self.config.selection_secs);
        self.events.push_back(SessionEvent::SelectionStarted);
    }

    fn start_game(&mut self) {
        self.timers.cancel_family(TimerFamily::Selection);
        let seat = match &self.phase {
            Phase::Selection(phase) => phase.selection.confirmed_seat(),
            phase => {
                warn!("selection countdown fired during {}", phase.kind());
                return;
            }
        };
        let player = seat.map(|_| PlayerCard::new(Card::generate(&mut self.rng)));
        self.phase = Phase::Game(GameRound {
            seat,
            player,
            caller: Caller::new(),
            exhausted: false,
            outcome: None,
        });
        self.timers
            .start_repeating(TimerKind::AutoCall, self.config.call_interval_secs);
        self.timers
            .start(TimerKind::GameCountdown, self.config.game_secs);
        match seat {
            Some(seat) => info!("game started with card {seat}"),
            None => info!("game started; watching only"),
        }
        self.events.push_back(SessionEvent::GameStarted { seat });
    }

    /// Draw into the live round, marking under the auto policy. `None` when
    /// there's no live round.
    fn call_next(&mut self) -> Option<CallOutcome> {
        let round = live_round_mut(&mut self.phase).ok()?;
        let outcome = round.caller.call_next(&mut self.rng);
        match outcome {
            CallOutcome::Called(number) => {
                self.events.push_back(SessionEvent::NumberCalled(number));
                if self.config.mark_policy == MarkPolicy::Auto
                    && let Some(player) = round.player.as_mut()
                    && player.card.contains(number)
                {
                    player.marks.mark(number);
                    self.events.push_back(SessionEvent::Marked(number));
                    if Self::refresh_bingo(player) {
                        self.events.push_back(SessionEvent::BingoAvailable);
                    }
                }
            }
            CallOutcome::Exhausted => {
                self.timers.cancel(TimerKind::AutoCall);
                round.exhausted = true;
                info!("all numbers called");
                self.events.push_back(SessionEvent::NumbersExhausted);
            }
        }
        Some(outcome)
    }

    fn end_round(&mut self, outcome: RoundOutcome) {
        let Phase::Game(round) = &mut self.phase else {
            return;
        };
        if round.outcome.is_some() {
            return;
        }
        self.timers.cancel(TimerKind::AutoCall);
        self.timers.cancel(TimerKind::GameCountdown);
        round.outcome = Some(outcome);
        self.rounds_played += 1;
        info!(
            "round {} over: {outcome} after {} calls",
            self.rounds_played,
            round.caller.called().len()
        );
        self.events.push_back(SessionEvent::RoundEnded(outcome));
        self.timers
            .start(TimerKind::PostRound, self.config.post_round_secs);
    }

    /// Recompute the claimable flag. Returns `true` if it just turned on.
    fn refresh_bingo(player: &mut PlayerCard) -> bool {
        let was_ready = player.bingo_ready;
        player.bingo_ready = !player.winning_lines().is_empty();
        player.bingo_ready && !was_ready
    }

    /// Snapshot of the settled state for rendering.
    #[must_use]
    pub fn view(&self) -> SessionView {
        let countdown = [
            TimerKind::SelectionCountdown,
            TimerKind::GameCountdown,
            TimerKind::PostRound,
        ]
        .into_iter()
        .find_map(|kind| {
            self.timers
                .remaining(kind)
                .map(|secs| Countdown { kind, secs })
        });

        let selection = self.selection().map(|phase| SelectionView {
            taken: phase.board.taken().clone(),
            selected: phase.selection.seat,
            confirmed: phase.selection.confirmed,
        });

        let game = self.round().map(|round| GameView {
            seat: round.seat,
            card: round.player.as_ref().map(|p| p.card.clone()),
            marks: round.player.as_ref().map(|p| p.marks.clone()),
            bingo_ready: round.player.as_ref().is_some_and(|p| p.bingo_ready),
            called: round.caller.called_set(),
            latest: round.caller.latest(),
            history: round.caller.history(self.config.history_len),
            exhausted: round.exhausted,
            outcome: round.outcome,
        });

        SessionView {
            phase: self.phase(),
            stake: self.stake,
            countdown,
            selection,
            game,
        }
    }
}

fn selection_mut(phase: &mut Phase) -> Result<&mut SelectionPhase, IntentError> {
    match phase {
        Phase::Selection(selection) => Ok(selection),
        phase => Err(IntentError::WrongPhase(phase.kind())),
    }
}

fn live_round_mut(phase: &mut Phase) -> Result<&mut GameRound, IntentError> {
    match phase {
        Phase::Game(round) if round.outcome.is_some() => Err(IntentError::RoundOver),
        Phase::Game(round) => Ok(round),
        phase => Err(IntentError::WrongPhase(phase.kind())),
    }
}
