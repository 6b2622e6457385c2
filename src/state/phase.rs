//! Game lifecycle phases and the flag transitions between them.

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Lifecycle phase of a single game, derived from its persisted flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Scheduled, not played yet.
    Upcoming,
    /// Played; voting closed and no points assigned yet.
    Completed,
    /// Players can submit or edit ballots.
    VotingOpen,
    /// Voting closed after points were assigned.
    VotingClosed,
}

/// Commands that move a game through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Mark the game as played.
    Complete,
    /// Open the voting window.
    OpenVoting,
    /// Close the voting window.
    CloseVoting,
    /// Record the 3/2/1 placement points.
    AssignPoints,
}

/// The three lifecycle flags stored on every game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseFlags {
    /// The game has been played.
    pub is_completed: bool,
    /// Ballots are accepted.
    pub voting_open: bool,
    /// Placement points have been recorded.
    pub points_assigned: bool,
}

/// Error returned when an event cannot be applied to a game in its current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while {from:?}")]
pub struct InvalidTransition {
    /// Phase the game was in.
    pub from: GamePhase,
    /// Rejected event.
    pub event: GameEvent,
}

impl PhaseFlags {
    /// Phase shown to clients.
    ///
    /// A completed game with voting closed and no points is indistinguishable from one whose
    /// voting was opened then closed, so both report [`GamePhase::Completed`].
    pub fn phase(self) -> GamePhase {
        if !self.is_completed {
            GamePhase::Upcoming
        } else if self.voting_open {
            GamePhase::VotingOpen
        } else if self.points_assigned {
            GamePhase::VotingClosed
        } else {
            GamePhase::Completed
        }
    }

    /// Compute the flags after `event`, or reject it.
    ///
    /// Every legal event is idempotent; `voting_open` can only be set on a completed game.
    pub fn apply(self, event: GameEvent) -> Result<PhaseFlags, InvalidTransition> {
        let next = match (self.is_completed, event) {
            (_, GameEvent::Complete) => PhaseFlags {
                is_completed: true,
                ..self
            },
            (_, GameEvent::CloseVoting) => PhaseFlags {
                voting_open: false,
                ..self
            },
            (true, GameEvent::OpenVoting) => PhaseFlags {
                voting_open: true,
                ..self
            },
            (true, GameEvent::AssignPoints) => PhaseFlags {
                points_assigned: true,
                ..self
            },
            (false, event) => {
                return Err(InvalidTransition {
                    from: self.phase(),
                    event,
                });
            }
        };

        Ok(next)
    }
}
