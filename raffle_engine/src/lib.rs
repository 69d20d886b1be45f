mod config;
pub mod builder;
pub mod engine;
pub mod manual;
pub mod quick_start;
pub mod stats;

use log::{debug, info, warn};
use rand::Rng;

pub use crate::config::*;
pub use crate::engine::{RaffleEngine, RevealToken};

/// One instance of the draw process over a fixed set of participants.
///
/// Invariants, established at construction:
/// - there is at least one participant
/// - every participant has a weight of at least 1
/// - `total_weight` is the sum of all the weights
#[derive(PartialEq, Debug, Clone)]
pub struct RaffleSession {
    participants: Vec<Participant>,
    total_weight: u64,
    state: SessionState,
    result: Option<DrawResult>,
}

impl RaffleSession {
    /// Creates a new session in the `Idle` state.
    ///
    /// The caller is expected to filter out the participants without entries beforehand
    /// (see [`builder::Builder`]). An empty list, a participant with a weight of zero, or a
    /// total weight that does not fit in a `u64` is rejected with [`RaffleErrors::InvalidSession`].
    pub fn new(participants: Vec<Participant>) -> Result<RaffleSession, RaffleErrors> {
        if participants.is_empty() {
            debug!("RaffleSession::new: empty participant list");
            return Err(RaffleErrors::InvalidSession);
        }
        if let Some(p) = participants.iter().find(|p| p.weight == 0) {
            debug!("RaffleSession::new: participant without entries: {:?}", p);
            return Err(RaffleErrors::InvalidSession);
        }
        let total_weight: u64 = match participants
            .iter()
            .try_fold(0u64, |acc, p| acc.checked_add(p.weight))
        {
            Some(total) => total,
            None => {
                debug!("RaffleSession::new: the total number of entries overflows");
                return Err(RaffleErrors::InvalidSession);
            }
        };
        info!(
            "New raffle session: {} participants, {} entries",
            participants.len(),
            total_weight
        );
        Ok(RaffleSession {
            participants,
            total_weight,
            state: SessionState::Idle,
            result: None,
        })
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The result of the draw, only available once the session has been revealed.
    pub fn result(&self) -> Option<&DrawResult> {
        self.result.as_ref()
    }

    pub fn win_probability_percent(&self, participant: &Participant) -> f64 {
        participant.weight as f64 / self.total_weight as f64 * 100.0
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let participants = self
            .participants
            .iter()
            .map(|p| ParticipantSnapshot {
                id: p.id.clone(),
                name: p.name.clone(),
                entries: p.weight,
                chance: round_percent(self.win_probability_percent(p)),
            })
            .collect();
        SessionSnapshot {
            participants,
            total_participants: self.participants.len(),
            total_entries: self.total_weight,
            state: self.state,
        }
    }

    /// Starts a draw. Only one draw may be in flight at a time.
    pub fn begin_draw(&mut self) -> Result<(), RaffleErrors> {
        self.check_state(SessionState::Idle, "begin a draw")?;
        self.state = SessionState::Spinning;
        debug!("begin_draw: session is now {}", self.state);
        Ok(())
    }

    /// Draws a winner using the given source of randomness.
    ///
    /// The value is drawn uniformly in `[0, total_weight)`, see [`RaffleSession::select_winner_at`].
    /// This does not change the state of the session.
    pub fn select_winner<R: Rng>(&self, rng: &mut R) -> DrawResult {
        let r: f64 = rng.gen_range(0.0..self.total_weight as f64);
        self.select_winner_at(r)
    }

    /// Selects the participant whose weight interval contains `r`.
    ///
    /// `[0, total_weight)` is partitioned into contiguous half-open intervals, one per
    /// participant in list order, each as wide as the participant's weight. If no interval
    /// contains `r`, the first participant is returned.
    pub fn select_winner_at(&self, r: f64) -> DrawResult {
        let idx = match locate_interval(&self.participants, r) {
            Some(idx) => idx,
            None => {
                warn!(
                    "select_winner_at: value {} is outside of [0, {}), falling back to the first participant",
                    r, self.total_weight
                );
                0
            }
        };
        let winner = self.participants[idx].clone();
        debug!("select_winner_at: r={} -> {:?}", r, winner);
        DrawResult {
            win_probability_percent: self.win_probability_percent(&winner),
            winner,
        }
    }

    /// Reveals the result of the draw in progress.
    pub fn complete_draw(&mut self, result: DrawResult) -> Result<(), RaffleErrors> {
        self.check_state(SessionState::Spinning, "complete a draw")?;
        info!(
            "Raffle winner: {} ({} entries, {:.1}% chance)",
            result.winner.name, result.winner.weight, result.win_probability_percent
        );
        self.state = SessionState::Revealed;
        self.result = Some(result);
        Ok(())
    }

    /// A fresh `Idle` session over the same participants. Any result is dropped.
    pub fn reset(self) -> RaffleSession {
        debug!("reset: discarding session in state {}", self.state);
        RaffleSession {
            participants: self.participants,
            total_weight: self.total_weight,
            state: SessionState::Idle,
            result: None,
        }
    }

    fn check_state(
        &self,
        expected: SessionState,
        operation: &'static str,
    ) -> Result<(), RaffleErrors> {
        if self.state == expected {
            Ok(())
        } else {
            Err(RaffleErrors::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}

// Index of the participant whose cumulative interval contains r.
fn locate_interval(participants: &[Participant], r: f64) -> Option<usize> {
    let mut cumulative: f64 = 0.0;
    for (idx, p) in participants.iter().enumerate() {
        cumulative += p.weight as f64;
        if r < cumulative {
            return Some(idx);
        }
    }
    None
}

fn round_percent(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
