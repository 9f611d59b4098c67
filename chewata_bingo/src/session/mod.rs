//! Session module: the phase state machine and its async host.
//!
//! This module implements:
//! - Session: Landing, Selection and Game phases driven by intents and ticks
//! - Timers: one-second countdowns with cancellation tokens
//! - SessionActor: a Tokio task that owns a session and ticks it
//! - Presenter: the rendering interface fed with settled snapshots
//!
//! ## Architecture
//!
//! [`Session`] is synchronous and owns all state. Intents and ticks each run
//! to completion, so a presenter never observes a half-finished transition.
//! [`SessionActor`] wraps a session in an mpsc inbox and a tick interval,
//! renders after every change, and fans updates out to subscribers.
//!
//! ## Example
//!
//! ```no_run
//! use chewata_bingo::session::{Intent, Session, SessionActor, SessionConfig};
//! # use chewata_bingo::session::{CallCircle, PhaseKind, Presenter, TimerKind, SeatId, Stake};
//! # use chewata_bingo::game::{BingoNumber, Card, MarkSet};
//! # use std::collections::BTreeSet;
//! # struct Quiet;
//! # impl Presenter for Quiet {
//! #     fn render_phase(&mut self, _: PhaseKind, _: Stake) {}
//! #     fn render_master_board(&mut self, _: &BTreeSet<BingoNumber>) {}
//! #     fn render_call_circle(&mut self, _: CallCircle) {}
//! #     fn render_call_history(&mut self, _: &[BingoNumber]) {}
//! #     fn render_player_card(&mut self, _: Option<&Card>, _: Option<&MarkSet>, _: bool) {}
//! #     fn render_selection_board(&mut self, _: &BTreeSet<SeatId>, _: Option<SeatId>, _: bool) {}
//! #     fn render_countdown(&mut self, _: TimerKind, _: u32) {}
//! # }
//!
//! #[tokio::main]
//! async fn main() {
//!     let session = Session::new(SessionConfig::default()).unwrap();
//!     let (actor, handle) = SessionActor::new(session, Quiet);
//!     tokio::spawn(actor.run());
//!
//!     handle.intent(Intent::ChooseStake(20)).await.unwrap();
//!     handle.intent(Intent::RequestPlay).await.unwrap();
//! }
//! ```

pub mod actor;
pub mod config;
pub mod messages;
pub mod selection;
pub mod state_machine;
pub mod timers;
pub mod view;

pub use actor::{DEFAULT_TICK_PERIOD, HandleError, SessionActor, SessionHandle};
pub use config::{ConfigError, DEFAULT_STAKES, MarkPolicy, SessionConfig, Stake};
pub use messages::{SessionMessage, SessionResponse, SessionUpdate};
pub use selection::{CardSelection, SeatBoard, SeatId, is_valid_seat};
pub use state_machine::{
    GameRound, Intent, IntentError, PhaseKind, PlayerCard, RoundOutcome, SelectionPhase, Session,
    SessionEvent,
};
pub use timers::{TimerFamily, TimerFired, TimerKind, TimerToken, Timers};
pub use view::{
    CallCircle, Countdown, GameView, Presenter, SelectionView, SessionView, present,
};
