//! View State Reducer
//!
//! ```text
//!            Fire                 Resolve(T)
//!   Idle ──────────► Loading ─────────────────► Loaded(T)
//!    ▲                 │  ▲                         │
//!    │ Reset           │  └──── Fire (any state) ───┘
//!    │                 │ Reject(msg)
//!    └──── any ◄───────┴──────────────────────► Failed(msg)
//! ```
//!
//! There is no terminal state. A binder keeps folding events into its state
//! for as long as the card is mounted.

use crate::envelope::Payload;

/// Exhaustive status of one card
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    /// No key has been set, or the key is empty
    Idle,
    Loading,
    /// Resource-specific, human-readable message
    Failed(String),
    Loaded(T),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent<T> {
    /// A request for a new (or re-armed) key went out
    Fire,
    Resolve(T),
    Reject(String),
    /// The key became empty
    Reset,
}

/// What a renderer should draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewStatus {
    Idle,
    Loading,
    Failed,
    /// Loaded with at least one item
    Ready,
    /// Loaded with zero items (a valid result, not an error)
    Empty,
}

impl<T> ViewState<T> {
    pub fn reduce(self, event: ViewEvent<T>) -> Self {
        match (self, event) {
            (_, ViewEvent::Fire) => ViewState::Loading,
            (_, ViewEvent::Reset) => ViewState::Idle,
            (ViewState::Loading, ViewEvent::Resolve(payload)) => ViewState::Loaded(payload),
            (ViewState::Loading, ViewEvent::Reject(message)) => ViewState::Failed(message),
            // A late outcome for a request nobody is waiting on
            (state, ViewEvent::Resolve(_) | ViewEvent::Reject(_)) => state,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ViewState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl<T: Payload> ViewState<T> {
    pub fn status(&self) -> ViewStatus {
        match self {
            ViewState::Idle => ViewStatus::Idle,
            ViewState::Loading => ViewStatus::Loading,
            ViewState::Failed(_) => ViewStatus::Failed,
            ViewState::Loaded(payload) if payload.is_empty() => ViewStatus::Empty,
            ViewState::Loaded(_) => ViewStatus::Ready,
        }
    }

    /// Loaded payload, or the empty result while idle / loading / failed.
    /// Input-gated cards render `Idle` as an empty result set.
    pub fn payload_or_empty(&self) -> T {
        self.loaded().cloned().unwrap_or_else(T::empty)
    }
}
