//! A scripted local player that drives the session through its handle.

use anyhow::Error;
use chewata_bingo::{
    Cell, Intent, MAX_SEAT, PhaseKind, SessionEvent, SessionHandle,
    session::{SessionResponse, SessionUpdate, Stake},
};
use log::{debug, info, warn};
use rand::{Rng, rngs::StdRng};
use tokio::sync::mpsc;

pub struct ScriptedPlayer {
    handle: SessionHandle,
    stake: Option<Stake>,
    rounds: u32,
    rng: StdRng,
    json: bool,
    rounds_done: u32,
    started: bool,
}

impl ScriptedPlayer {
    pub fn new(
        handle: SessionHandle,
        stake: Option<Stake>,
        rounds: u32,
        rng: StdRng,
        json: bool,
    ) -> Self {
        Self {
            handle,
            stake,
            rounds,
            rng,
            json,
            rounds_done: 0,
            started: false,
        }
    }

    /// Play until `rounds` rounds have ended (0 plays on) or the session
    /// goes away. Returns the number of rounds seen to the end.
    pub async fn run(mut self, mut updates: mpsc::Receiver<SessionUpdate>) -> Result<u32, Error> {
        while let Some(update) = updates.recv().await {
            if self.json {
                println!("{}", serde_json::to_string(&update.view)?);
            }

            for event in &update.events {
                match event {
                    SessionEvent::SelectionStarted => self.pick_seat(&update).await?,
                    SessionEvent::RoundEnded(outcome) => {
                        self.rounds_done += 1;
                        info!("round {} of {}: {outcome}", self.rounds_done, self.rounds);
                    }
                    _ => {}
                }
            }

            if self.rounds != 0 && self.rounds_done >= self.rounds {
                break;
            }

            match update.view.phase {
                PhaseKind::Landing if !self.started => self.start().await?,
                PhaseKind::Game => self.play().await?,
                _ => {}
            }
        }
        Ok(self.rounds_done)
    }

    async fn start(&mut self) -> Result<(), Error> {
        self.started = true;
        if let Some(stake) = self.stake {
            self.send(Intent::ChooseStake(stake)).await?;
        }
        self.send(Intent::RequestPlay).await?;
        Ok(())
    }

    async fn pick_seat(&mut self, update: &SessionUpdate) -> Result<(), Error> {
        // The update carrying SelectionStarted may already be stale.
        let view = self.handle.view().await?;
        let Some(selection) = view.selection.or_else(|| update.view.selection.clone()) else {
            return Ok(());
        };
        let free: Vec<_> = (1..=MAX_SEAT)
            .filter(|seat| !selection.taken.contains(seat))
            .collect();
        if free.is_empty() {
            warn!("every seat is taken; watching this round");
            return Ok(());
        }
        let seat = free[self.rng.random_range(0..free.len())];
        if self.send(Intent::PickSeat(seat)).await? {
            self.send(Intent::ConfirmSeat).await?;
        }
        Ok(())
    }

    /// Mark whatever's been called and claim once a line is up. Works off a
    /// fresh view; queued updates can predate our own marks and toggling
    /// from them would unmark.
    async fn play(&mut self) -> Result<(), Error> {
        let Some(game) = self.handle.view().await?.game else {
            return Ok(());
        };
        if game.outcome.is_some() {
            return Ok(());
        }
        let (Some(card), Some(marks)) = (&game.card, &game.marks) else {
            return Ok(());
        };

        let to_mark: Vec<_> = card
            .numbers()
            .filter(|n| game.called.contains(n) && !marks.is_marked(*n))
            .collect();
        for number in to_mark {
            self.send(Intent::ToggleMark(Cell::Number(number)))
                .await?;
        }

        let view = self.handle.view().await?;
        if view
            .game
            .is_some_and(|game| game.bingo_ready && game.outcome.is_none())
        {
            self.send(Intent::ClaimBingo).await?;
        }
        Ok(())
    }

    /// Returns whether the intent was accepted. Refusals are expected when
    /// the round moves on between an update and the reply.
    async fn send(&self, intent: Intent) -> Result<bool, Error> {
        match self.handle.intent(intent).await? {
            SessionResponse::Success => {
                debug!("{intent}");
                Ok(true)
            }
            SessionResponse::Rejected(err) => {
                debug!("{intent} refused: {err}");
                Ok(false)
            }
        }
    }
}
