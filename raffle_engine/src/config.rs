// ********* Input data structures ***********

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::Display;
use std::time::Duration;

/// An employee as reported by the roster, before any eligibility filtering.
///
/// This is the shape of one element of the employee list returned by the dashboard API.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: String,
    pub name: String,
    pub total_entries: u64,
    #[serde(default)]
    pub department: Option<String>,
}

/// One entity eligible for the weighted draw.
///
/// The weight is the number of raffle entries and is at least 1 inside a session.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub weight: u64,
}

// ******** Output data structures *********

/// The lifecycle of a raffle session.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Ready to draw.
    Idle,
    /// A draw has started and the reveal is pending.
    Spinning,
    /// The winner has been revealed. Only a reset leads back to `Idle`.
    Revealed,
}

impl Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionState::Idle => "idle",
            SessionState::Spinning => "spinning",
            SessionState::Revealed => "revealed",
        };
        write!(f, "{}", s)
    }
}

/// The outcome of one completed draw.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DrawResult {
    pub winner: Participant,
    /// weight / total weight * 100, independent of the draw itself.
    pub win_probability_percent: f64,
}

/// Display row for one participant of a session.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantSnapshot {
    pub id: String,
    pub name: String,
    pub entries: u64,
    pub chance: f64,
}

/// A read-only view of a session, as consumed by the presentation layer.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub participants: Vec<ParticipantSnapshot>,
    pub total_participants: usize,
    pub total_entries: u64,
    pub state: SessionState,
}

/// Errors that prevent an operation from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RaffleErrors {
    /// No eligible participant, or a total weight of zero.
    InvalidSession,
    /// The operation is not allowed in the current state of the session.
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
}

impl Error for RaffleErrors {}

impl Display for RaffleErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RaffleErrors::InvalidSession => {
                write!(f, "No eligible participants: add entries before drawing")
            }
            RaffleErrors::InvalidState { operation, state } => {
                write!(f, "Cannot {} while the raffle is {}", operation, state)
            }
        }
    }
}

// ********* Configuration **********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct EngineRules {
    /// How long the reveal is held back after a draw begins.
    /// It is a presentation delay: the winner is already known when the draw begins.
    pub reveal_delay: Duration,
    /// If provided, the draws are reproducible. The seed is hashed into the generator state.
    pub seed: Option<String>,
}

impl EngineRules {
    pub const DEFAULT_RULES: EngineRules = EngineRules {
        reveal_delay: Duration::from_millis(4000),
        seed: None,
    };
}

impl Default for EngineRules {
    fn default() -> Self {
        EngineRules::DEFAULT_RULES
    }
}
