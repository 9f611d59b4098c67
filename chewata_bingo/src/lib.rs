//! # Chewata Bingo
//!
//! A single-player 75-ball bingo session engine.
//!
//! A session walks through three phases:
//!
//! - **Landing**: pick a stake and ask to play
//! - **Selection**: pick one of 100 seats before the countdown runs out
//! - **Game**: numbers are auto-called onto the master board while the
//!   player marks a 5x5 card and claims a line
//!
//! When a round ends, by a verified claim or by the game countdown, the
//! outcome stays up for a short delay and the session goes back to
//! selection with the same stake.
//!
//! ## Core Modules
//!
//! - [`game`]: Cards, the number caller and line detection
//! - [`session`]: Phase state machine, timers, presenter interface and the
//!   async session actor
//!
//! ## Example
//!
//! ```
//! use chewata_bingo::{Intent, PhaseKind, Session, SessionConfig};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let rng = StdRng::seed_from_u64(7);
//! let mut session = Session::with_rng(SessionConfig::default(), rng).unwrap();
//! session.apply(Intent::RequestPlay).unwrap();
//! assert_eq!(session.phase(), PhaseKind::Selection);
//! ```

/// Bingo game pieces: cards, calling and win detection.
pub mod game;
pub use game::{
    BingoNumber, CallOutcome, Caller, Card, Cell, Line, MarkSet,
    constants::{self, CARD_SIZE, MAX_NUMBER, MAX_SEAT},
    has_bingo,
};

/// Session phases, timers and the async host.
pub mod session;
pub use session::{
    Intent, IntentError, MarkPolicy, PhaseKind, Presenter, RoundOutcome, Session, SessionActor,
    SessionConfig, SessionEvent, SessionHandle, SessionView,
};
