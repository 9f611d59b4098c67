//! Session actor implementation with async message handling.

use rand::{Rng, rngs::StdRng};
use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot},
    time::{Duration, Instant, interval_at},
};

use super::{
    messages::{SessionMessage, SessionResponse, SessionUpdate},
    state_machine::{Intent, Session, SessionEvent},
    view::{Presenter, SessionView, present},
};

/// Default length of one session second
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Errors from talking to a session actor
#[derive(Debug, Error)]
pub enum HandleError {
    #[error("session is closed")]
    Closed,
}

/// Session actor handle for sending messages
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
}

impl SessionHandle {
    /// Create a new session handle
    pub fn new(sender: mpsc::Sender<SessionMessage>) -> Self {
        Self { sender }
    }

    /// Send a message to the session
    pub async fn send(&self, message: SessionMessage) -> Result<(), HandleError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| HandleError::Closed)
    }

    /// Forward a player intent and wait for the verdict
    pub async fn intent(&self, intent: Intent) -> Result<SessionResponse, HandleError> {
        let (response, rx) = oneshot::channel();
        self.send(SessionMessage::Intent { intent, response }).await?;
        rx.await.map_err(|_| HandleError::Closed)
    }

    /// Get a snapshot of the session
    pub async fn view(&self) -> Result<SessionView, HandleError> {
        let (response, rx) = oneshot::channel();
        self.send(SessionMessage::GetView { response }).await?;
        rx.await.map_err(|_| HandleError::Closed)
    }

    /// Subscribe to updates; the receiver gets one update per settled change
    pub async fn subscribe(
        &self,
        buffer: usize,
    ) -> Result<mpsc::Receiver<SessionUpdate>, HandleError> {
        let (sender, receiver) = mpsc::channel(buffer);
        self.send(SessionMessage::Subscribe { sender }).await?;
        Ok(receiver)
    }

    /// Stop the actor
    pub async fn close(&self) -> Result<(), HandleError> {
        let (response, rx) = oneshot::channel();
        self.send(SessionMessage::Close { response }).await?;
        rx.await.map(|_| ()).map_err(|_| HandleError::Closed)
    }
}

/// Actor owning a single bingo session
pub struct SessionActor<P, R = StdRng> {
    /// Session state machine
    session: Session<R>,

    /// Message inbox
    inbox: mpsc::Receiver<SessionMessage>,

    /// Presentation adapter every settled state is rendered through
    presenter: P,

    /// Subscribers for state change notifications
    subscribers: Vec<mpsc::Sender<SessionUpdate>>,

    /// Wall-clock length of one session second
    tick_period: Duration,

    /// Is session closed
    is_closed: bool,
}

impl<P, R> SessionActor<P, R>
where
    P: Presenter + Send + 'static,
    R: Rng + Send + 'static,
{
    /// Create a new session actor
    ///
    /// # Returns
    ///
    /// * `(SessionActor, SessionHandle)` - Actor and handle for sending messages
    pub fn new(session: Session<R>, presenter: P) -> (Self, SessionHandle) {
        let (sender, inbox) = mpsc::channel(100);

        let actor = Self {
            session,
            inbox,
            presenter,
            subscribers: Vec::new(),
            tick_period: DEFAULT_TICK_PERIOD,
            is_closed: false,
        };

        (actor, SessionHandle::new(sender))
    }

    /// Run faster or slower than real time
    #[must_use]
    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    /// Run the session actor event loop
    pub async fn run(mut self) -> Session<R> {
        log::info!("Session starting (stake {})", self.session.stake());
        self.publish();

        let mut tick_interval = interval_at(Instant::now() + self.tick_period, self.tick_period);

        loop {
            tokio::select! {
                message = self.inbox.recv() => {
                    let Some(message) = message else {
                        log::debug!("All session handles dropped");
                        break;
                    };
                    self.handle_message(message);

                    if self.is_closed {
                        break;
                    }
                }

                _ = tick_interval.tick() => {
                    self.tick();
                }
            }
        }

        log::info!(
            "Session closed after {} round(s)",
            self.session.rounds_played()
        );
        self.session
    }

    /// Handle a session message
    fn handle_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::Intent { intent, response } => {
                let result = self.session.apply(intent);
                self.publish();
                let _ = response.send(result.into());
            }

            SessionMessage::GetView { response } => {
                let _ = response.send(self.session.view());
            }

            SessionMessage::Tick => self.tick(),

            SessionMessage::Subscribe { sender } => {
                let update = SessionUpdate {
                    view: self.session.view(),
                    events: Vec::new(),
                };
                if sender.try_send(update).is_ok() {
                    self.subscribers.push(sender);
                }
            }

            SessionMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(SessionResponse::Success);
            }
        }
    }

    /// Advance session time by one second
    fn tick(&mut self) {
        self.session.tick();
        self.publish();
    }

    /// Render the settled state and fan it out to subscribers
    fn publish(&mut self) {
        let events: Vec<SessionEvent> = self.session.drain_events().into();
        for event in &events {
            match event {
                SessionEvent::Rejected(err) => self.presenter.show_message(&err.to_string()),
                SessionEvent::NumberCalled(_) | SessionEvent::Marked(_) => {
                    log::debug!("{event}");
                }
                _ => log::info!("{event}"),
            }
        }

        let view = self.session.view();
        present(&view, &mut self.presenter);
        self.notify_subscribers(SessionUpdate { view, events });
    }

    fn notify_subscribers(&mut self, update: SessionUpdate) {
        self.subscribers.retain(|sender| {
            match sender.try_send(update.clone()) {
                Ok(_) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!("Subscriber channel full, dropping update");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber disconnected, removing");
                    false
                }
            }
        });
    }
}
