//! Session actor message types.

use tokio::sync::{mpsc, oneshot};

use super::{
    state_machine::{Intent, IntentError, SessionEvent},
    view::SessionView,
};

/// Messages that can be sent to a SessionActor
#[derive(Debug)]
pub enum SessionMessage {
    /// A player intent
    Intent {
        intent: Intent,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Get a snapshot of the current state
    GetView {
        response: oneshot::Sender<SessionView>,
    },

    /// Advance session time by one second, on top of the actor's own clock
    Tick,

    /// Subscribe to state updates
    Subscribe {
        sender: mpsc::Sender<SessionUpdate>,
    },

    /// Stop the actor
    Close {
        response: oneshot::Sender<SessionResponse>,
    },
}

/// Sent to subscribers after every settled change
#[derive(Debug, Clone)]
pub struct SessionUpdate {
    pub view: SessionView,
    /// Events since the previous update, oldest first
    pub events: Vec<SessionEvent>,
}

/// Response from session operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResponse {
    /// Intent accepted
    Success,

    /// Intent refused; nothing changed
    Rejected(IntentError),
}

impl SessionResponse {
    /// Check if response is success
    pub fn is_success(&self) -> bool {
        matches!(self, SessionResponse::Success)
    }

    /// Get error message if the intent was refused
    pub fn error_message(&self) -> Option<String> {
        match self {
            SessionResponse::Success => None,
            SessionResponse::Rejected(err) => Some(err.to_string()),
        }
    }
}

impl From<Result<(), IntentError>> for SessionResponse {
    fn from(value: Result<(), IntentError>) -> Self {
        match value {
            Ok(()) => SessionResponse::Success,
            Err(err) => SessionResponse::Rejected(err),
        }
    }
}
