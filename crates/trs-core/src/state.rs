//! The open/closed entry state machine.
//!
//! State is never cached between calls: the store recomputes it before every
//! transition and applies the transition inside the same write transaction.

use std::fmt;

use thiserror::Error;

/// Whether the store currently holds an open entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Every entry is closed (also the state of an empty store).
    NoOpenEntry,
    /// Exactly one entry is open.
    OneOpenEntry,
}

/// A user-requested change of state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    Stop,
}

/// A transition that is not valid from the current state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("found unfinished time entry; run `trs stop` before starting a new time entry")]
    EntryAlreadyOpen,
    #[error("found no unfinished time entry; run `trs start` to start a new time entry")]
    NoOpenEntry,
}

impl EntryState {
    /// Derives the state from whether an open entry exists.
    pub const fn from_open(has_open_entry: bool) -> Self {
        if has_open_entry {
            Self::OneOpenEntry
        } else {
            Self::NoOpenEntry
        }
    }

    /// Returns the state reached by applying `transition`.
    pub const fn apply(self, transition: Transition) -> Result<Self, TransitionError> {
        match (self, transition) {
            (Self::NoOpenEntry, Transition::Start) => Ok(Self::OneOpenEntry),
            (Self::OneOpenEntry, Transition::Stop) => Ok(Self::NoOpenEntry),
            (Self::OneOpenEntry, Transition::Start) => Err(TransitionError::EntryAlreadyOpen),
            (Self::NoOpenEntry, Transition::Stop) => Err(TransitionError::NoOpenEntry),
        }
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOpenEntry => write!(f, "no open entry"),
            Self::OneOpenEntry => write!(f, "one open entry"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_from_closed_opens_an_entry() {
        assert_eq!(
            EntryState::NoOpenEntry.apply(Transition::Start),
            Ok(EntryState::OneOpenEntry)
        );
    }

    #[test]
    fn stop_from_open_closes_the_entry() {
        assert_eq!(
            EntryState::OneOpenEntry.apply(Transition::Stop),
            Ok(EntryState::NoOpenEntry)
        );
    }

    #[test]
    fn start_while_open_is_rejected() {
        assert_eq!(
            EntryState::OneOpenEntry.apply(Transition::Start),
            Err(TransitionError::EntryAlreadyOpen)
        );
    }

    #[test]
    fn stop_while_closed_is_rejected() {
        assert_eq!(
            EntryState::NoOpenEntry.apply(Transition::Stop),
            Err(TransitionError::NoOpenEntry)
        );
    }

    #[test]
    fn state_follows_open_flag() {
        assert_eq!(EntryState::from_open(false), EntryState::NoOpenEntry);
        assert_eq!(EntryState::from_open(true), EntryState::OneOpenEntry);
    }

    #[test]
    fn state_displays_as_plain_words() {
        assert_eq!(EntryState::NoOpenEntry.to_string(), "no open entry");
        assert_eq!(EntryState::OneOpenEntry.to_string(), "one open entry");
    }

    #[test]
    fn rejection_messages_point_at_the_fix() {
        assert!(TransitionError::EntryAlreadyOpen.to_string().contains("trs stop"));
        assert!(TransitionError::NoOpenEntry.to_string().contains("trs start"));
    }
}
