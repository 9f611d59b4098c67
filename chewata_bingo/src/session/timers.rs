//! Session timers driven by a one-second tick.
//!
//! Every started timer gets a fresh [`TimerToken`]. Starting a timer of a
//! kind that's already running replaces it, so there is never more than one
//! of each kind. A fired event whose token is no longer current belongs to a
//! cancelled timer and must be dropped by the receiver.
//!
//! One-shot timers that fired on the last tick stay current until the next
//! tick, or until their kind is cancelled or restarted.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Phase a timer belongs to
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum TimerFamily {
    Selection,
    Game,
}

/// Kinds of session timers. Declaration order is firing order within a tick.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum TimerKind {
    SelectionCountdown,
    AutoCall,
    GameCountdown,
    PostRound,
}

impl TimerKind {
    #[must_use]
    pub const fn family(self) -> TimerFamily {
        match self {
            Self::SelectionCountdown => TimerFamily::Selection,
            Self::AutoCall | Self::GameCountdown | Self::PostRound => TimerFamily::Game,
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::SelectionCountdown => "selection countdown",
            Self::AutoCall => "auto-call",
            Self::GameCountdown => "game countdown",
            Self::PostRound => "post-round delay",
        };
        write!(f, "{repr}")
    }
}

/// Cancellation token identifying one started timer.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct TimerToken(u64);

/// A timer that ran down during [`Timers::advance`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimerFired {
    pub kind: TimerKind,
    pub token: TimerToken,
}

#[derive(Clone, Debug)]
struct Timer {
    token: TimerToken,
    remaining: u32,
    /// Repeating timers rearm with this period after firing.
    period: Option<u32>,
}

/// The set of running timers.
#[derive(Debug, Default)]
pub struct Timers {
    active: BTreeMap<TimerKind, Timer>,
    /// One-shot timers that fired on the last tick.
    expired: Vec<TimerFired>,
    next_token: u64,
}

impl Timers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a one-shot timer, cancelling any running timer of this kind.
    pub fn start(&mut self, kind: TimerKind, secs: u32) -> TimerToken {
        self.insert(kind, secs, None)
    }

    /// Start a timer that fires every `period` seconds until cancelled.
    pub fn start_repeating(&mut self, kind: TimerKind, period: u32) -> TimerToken {
        self.insert(kind, period, Some(period))
    }

    fn insert(&mut self, kind: TimerKind, secs: u32, period: Option<u32>) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.expired.retain(|fired| fired.kind != kind);
        if self
            .active
            .insert(
                kind,
                Timer {
                    token,
                    remaining: secs,
                    period,
                },
            )
            .is_some()
        {
            log::debug!("restarted {kind}");
        }
        token
    }

    /// Returns `true` if a timer of this kind was running.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.expired.retain(|fired| fired.kind != kind);
        self.active.remove(&kind).is_some()
    }

    pub fn cancel_family(&mut self, family: TimerFamily) {
        self.expired.retain(|fired| fired.kind.family() != family);
        self.active.retain(|kind, _| kind.family() != family);
    }

    pub fn cancel_all(&mut self) {
        self.expired.clear();
        self.active.clear();
    }

    #[must_use]
    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.active.contains_key(&kind)
    }

    #[must_use]
    pub fn is_current(&self, fired: TimerFired) -> bool {
        self.token(fired.kind) == Some(fired.token) || self.expired.contains(&fired)
    }

    #[must_use]
    pub fn token(&self, kind: TimerKind) -> Option<TimerToken> {
        self.active.get(&kind).map(|timer| timer.token)
    }

    /// Seconds left before this timer fires.
    #[must_use]
    pub fn remaining(&self, kind: TimerKind) -> Option<u32> {
        self.active.get(&kind).map(|timer| timer.remaining)
    }

    /// Number of running timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Move time forward one second and collect the timers that fired.
    pub fn advance(&mut self) -> Vec<TimerFired> {
        self.expired.clear();
        let mut fired = Vec::new();
        let expired = &mut self.expired;
        self.active.retain(|&kind, timer| {
            timer.remaining = timer.remaining.saturating_sub(1);
            if timer.remaining > 0 {
                return true;
            }
            let event = TimerFired {
                kind,
                token: timer.token,
            };
            fired.push(event);
            match timer.period {
                Some(period) => {
                    timer.remaining = period;
                    true
                }
                None => {
                    expired.push(event);
                    false
                }
            }
        });
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_after_duration() {
        let mut timers = Timers::new();
        let token = timers.start(TimerKind::GameCountdown, 3);
        assert!(timers.advance().is_empty());
        assert!(timers.advance().is_empty());
        assert_eq!(timers.remaining(TimerKind::GameCountdown), Some(1));
        let fired = timers.advance();
        assert_eq!(
            fired,
            vec![TimerFired {
                kind: TimerKind::GameCountdown,
                token
            }]
        );
        assert!(!timers.is_active(TimerKind::GameCountdown));
    }

    #[test]
    fn test_repeating_rearms() {
        let mut timers = Timers::new();
        timers.start_repeating(TimerKind::AutoCall, 2);
        let mut fires = 0;
        for _ in 0..6 {
            fires += timers.advance().len();
        }
        assert_eq!(fires, 3);
        assert_eq!(timers.remaining(TimerKind::AutoCall), Some(2));
    }

    #[test]
    fn test_restart_replaces_instead_of_stacking() {
        let mut timers = Timers::new();
        let first = timers.start_repeating(TimerKind::AutoCall, 1);
        let second = timers.start_repeating(TimerKind::AutoCall, 1);
        assert_ne!(first, second);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.advance().len(), 1);
    }

    #[test]
    fn test_stale_token_is_not_current() {
        let mut timers = Timers::new();
        let old = timers.start(TimerKind::PostRound, 1);
        let fired = timers.advance()[0];
        assert!(timers.is_current(fired));
        assert!(!timers.is_active(TimerKind::PostRound));

        let new = timers.start(TimerKind::PostRound, 1);
        assert!(!timers.is_current(TimerFired {
            kind: TimerKind::PostRound,
            token: old
        }));
        assert!(timers.is_current(TimerFired {
            kind: TimerKind::PostRound,
            token: new
        }));
    }

    #[test]
    fn test_cancel_invalidates_fired_one_shot() {
        let mut timers = Timers::new();
        timers.start(TimerKind::GameCountdown, 1);
        timers.start(TimerKind::PostRound, 1);
        let fired = timers.advance();
        assert_eq!(fired.len(), 2);
        timers.cancel(TimerKind::PostRound);
        assert!(timers.is_current(fired[0]));
        assert!(!timers.is_current(fired[1]));
        timers.advance();
        assert!(!timers.is_current(fired[0]));
    }

    #[test]
    fn test_cancel_family() {
        let mut timers = Timers::new();
        timers.start(TimerKind::SelectionCountdown, 10);
        timers.start(TimerKind::GameCountdown, 10);
        timers.start_repeating(TimerKind::AutoCall, 3);
        timers.cancel_family(TimerFamily::Game);
        assert_eq!(timers.len(), 1);
        assert!(timers.is_active(TimerKind::SelectionCountdown));
        assert!(timers.cancel(TimerKind::SelectionCountdown));
        assert!(!timers.cancel(TimerKind::SelectionCountdown));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_zero_duration_fires_next_tick() {
        let mut timers = Timers::new();
        timers.start(TimerKind::PostRound, 0);
        assert_eq!(timers.advance().len(), 1);
    }

    #[test]
    fn test_fire_order_within_tick() {
        let mut timers = Timers::new();
        timers.start(TimerKind::GameCountdown, 1);
        timers.start_repeating(TimerKind::AutoCall, 1);
        let kinds: Vec<_> = timers.advance().into_iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![TimerKind::AutoCall, TimerKind::GameCountdown]);
    }
}
