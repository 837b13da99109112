use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Lifecycle states a game session can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// The session is running; answers can be submitted and rounds advanced.
    Active,
    /// The session finished normally and is archived in history.
    Completed,
    /// The session was abandoned before finishing.
    Abandoned,
}

/// Events that move a session between lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Close the current round and open the next one.
    AdvanceRound,
    /// Finish the game normally.
    Complete,
    /// Give up on the game without finishing it.
    Abandon,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while {from:?}")]
pub struct InvalidTransition {
    /// The status the session was in when the invalid event was received.
    pub from: GameStatus,
    /// The event that cannot be applied from this status.
    pub event: SessionEvent,
}

impl GameStatus {
    /// Whether the session reached a terminal state. Terminal states are
    /// absorbing: no event may leave them.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Active)
    }

    /// Compute the status reached by applying `event`, rejecting anything
    /// not permitted by the session lifecycle.
    pub fn apply(self, event: SessionEvent) -> Result<GameStatus, InvalidTransition> {
        let next = match (self, event) {
            (GameStatus::Active, SessionEvent::AdvanceRound) => GameStatus::Active,
            (GameStatus::Active, SessionEvent::Complete) => GameStatus::Completed,
            (GameStatus::Active, SessionEvent::Abandon) => GameStatus::Abandoned,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advancing_keeps_the_session_active() {
        assert_eq!(
            GameStatus::Active.apply(SessionEvent::AdvanceRound),
            Ok(GameStatus::Active)
        );
    }

    #[test]
    fn active_can_complete_or_abandon() {
        assert_eq!(
            GameStatus::Active.apply(SessionEvent::Complete),
            Ok(GameStatus::Completed)
        );
        assert_eq!(
            GameStatus::Active.apply(SessionEvent::Abandon),
            Ok(GameStatus::Abandoned)
        );
    }

    #[test]
    fn terminal_states_are_absorbing() {
        for status in [GameStatus::Completed, GameStatus::Abandoned] {
            for event in [
                SessionEvent::AdvanceRound,
                SessionEvent::Complete,
                SessionEvent::Abandon,
            ] {
                let err = status.apply(event).unwrap_err();
                assert_eq!(err.from, status);
                assert_eq!(err.event, event);
            }
        }
    }

    #[test]
    fn terminal_flag_matches_variants() {
        assert!(!GameStatus::Active.is_terminal());
        assert!(GameStatus::Completed.is_terminal());
        assert!(GameStatus::Abandoned.is_terminal());
    }
}
