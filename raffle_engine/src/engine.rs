//! The raffle service: owns at most one session and the reveal scheduled for it.
//!
//! The engine does not own a clock. Callers pass the current [`Instant`] when starting a
//! draw and when polling for the reveal, which keeps the whole lifecycle on the caller's
//! thread. [`RaffleEngine::draw_blocking`] is provided for callers that simply want to wait.

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::time::{Duration, Instant};

use crate::config::*;
use crate::RaffleSession;

/// Handle on a scheduled reveal. It is only valid until the reveal fires or is cancelled.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct RevealToken(u64);

// The winner is chosen when the draw begins and held back until `due`.
#[derive(PartialEq, Debug, Clone)]
struct PendingReveal {
    token: RevealToken,
    due: Instant,
    result: DrawResult,
}

pub struct RaffleEngine<R = ChaCha20Rng> {
    rules: EngineRules,
    rng: R,
    session: Option<RaffleSession>,
    pending: Option<PendingReveal>,
    next_token: u64,
}

impl RaffleEngine<ChaCha20Rng> {
    /// Creates an engine with the default generator.
    ///
    /// With a seed in the rules, the sequence of draws is reproducible.
    pub fn new(rules: &EngineRules) -> RaffleEngine<ChaCha20Rng> {
        let rng = match &rules.seed {
            Some(seed) => {
                debug!("RaffleEngine::new: using seed {:?}", seed);
                ChaCha20Rng::from_seed(seed_from_text(seed))
            }
            None => ChaCha20Rng::from_entropy(),
        };
        RaffleEngine::with_rng(rules, rng)
    }
}

impl<R: Rng> RaffleEngine<R> {
    pub fn with_rng(rules: &EngineRules, rng: R) -> RaffleEngine<R> {
        RaffleEngine {
            rules: rules.clone(),
            rng,
            session: None,
            pending: None,
            next_token: 1,
        }
    }

    pub fn rules(&self) -> &EngineRules {
        &self.rules
    }

    pub fn session(&self) -> Option<&RaffleSession> {
        self.session.as_ref()
    }

    /// Replaces the current session with a new one over the given participants.
    ///
    /// Any pending reveal is cancelled. If the participants do not form a valid session,
    /// the engine is left untouched.
    pub fn load(&mut self, participants: Vec<Participant>) -> Result<&RaffleSession, RaffleErrors> {
        let session = RaffleSession::new(participants)?;
        self.cancel_pending();
        let s: &RaffleSession = self.session.insert(session);
        Ok(s)
    }

    /// Begins a draw and schedules its reveal after the configured delay.
    pub fn spin(&mut self, now: Instant) -> Result<RevealToken, RaffleErrors> {
        let session = self.session.as_mut().ok_or(RaffleErrors::InvalidSession)?;
        session.begin_draw()?;
        let result = session.select_winner(&mut self.rng);

        let token = RevealToken(self.next_token);
        self.next_token += 1;
        let due = now + self.rules.reveal_delay;
        debug!(
            "spin: reveal {:?} scheduled in {:?}",
            token, self.rules.reveal_delay
        );
        self.pending = Some(PendingReveal { token, due, result });
        Ok(token)
    }

    /// The time left before the pending reveal is due, if there is one.
    pub fn time_until_reveal(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.due.saturating_duration_since(now))
    }

    /// Fires the pending reveal if it is due, and returns the revealed result.
    pub fn poll(&mut self, now: Instant) -> Result<Option<DrawResult>, RaffleErrors> {
        let pending = match self.pending.take() {
            Some(p) if p.due <= now => p,
            other => {
                self.pending = other;
                return Ok(None);
            }
        };
        let session = self.session.as_mut().ok_or(RaffleErrors::InvalidSession)?;
        debug!("poll: firing reveal {:?}", pending.token);
        session.complete_draw(pending.result.clone())?;
        Ok(Some(pending.result))
    }

    /// Cancels the draw behind the given reveal. The session goes back to `Idle`.
    ///
    /// Returns false if the token does not correspond to the pending reveal.
    pub fn cancel(&mut self, token: RevealToken) -> bool {
        let is_pending = matches!(&self.pending, Some(p) if p.token == token);
        if is_pending {
            self.cancel_pending();
            self.session = self.session.take().map(|s| s.reset());
        }
        is_pending
    }

    /// Resets the current session, whatever its state. Any pending reveal is cancelled.
    pub fn reset(&mut self) -> Result<&RaffleSession, RaffleErrors> {
        self.cancel_pending();
        let session = self.session.take().ok_or(RaffleErrors::InvalidSession)?;
        let s: &RaffleSession = self.session.insert(session.reset());
        Ok(s)
    }

    /// Runs one complete draw, sleeping on the current thread until the reveal.
    pub fn draw_blocking(&mut self) -> Result<DrawResult, RaffleErrors> {
        self.spin(Instant::now())?;
        loop {
            if let Some(res) = self.poll(Instant::now())? {
                return Ok(res);
            }
            let wait = self
                .time_until_reveal(Instant::now())
                .ok_or(RaffleErrors::InvalidState {
                    operation: "wait for the reveal",
                    state: self
                        .session
                        .as_ref()
                        .map(|s| s.state())
                        .unwrap_or(SessionState::Idle),
                })?;
            std::thread::sleep(wait);
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(p) = self.pending.take() {
            info!("Cancelling pending reveal {:?}", p.token);
        }
    }
}

// ChaCha wants 32 bytes of seed: this is the SHA-256 of the textual seed.
fn seed_from_text(seed: &str) -> [u8; 32] {
    let digest: String = sha256::digest(seed);
    let mut res = [0u8; 32];
    for (idx, byte) in res.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&digest[2 * idx..2 * idx + 2], 16).unwrap_or(0);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn roster() -> Vec<Participant> {
        vec![
            Participant {
                id: "1".to_string(),
                name: "Anna".to_string(),
                weight: 2,
            },
            Participant {
                id: "2".to_string(),
                name: "Bob".to_string(),
                weight: 5,
            },
            Participant {
                id: "3".to_string(),
                name: "Clara".to_string(),
                weight: 1,
            },
        ]
    }

    fn rules(seed: &str) -> EngineRules {
        EngineRules {
            reveal_delay: Duration::from_millis(4000),
            seed: Some(seed.to_string()),
        }
    }

    #[test]
    fn seed_is_hashed() {
        let a = seed_from_text("quarterly");
        assert_eq!(a, seed_from_text("quarterly"));
        assert_ne!(a, seed_from_text("monthly"));
        assert_ne!(a, [0u8; 32]);
    }

    #[test]
    fn spin_without_session() {
        init();
        let mut engine = RaffleEngine::new(&rules("x"));
        assert_eq!(
            engine.spin(Instant::now()),
            Err(RaffleErrors::InvalidSession)
        );
        assert!(engine.reset().is_err());
    }

    #[test]
    fn load_rejects_empty_roster() {
        init();
        let mut engine = RaffleEngine::new(&rules("x"));
        engine.load(roster()).unwrap();
        assert_eq!(engine.load(vec![]).err(), Some(RaffleErrors::InvalidSession));
        // The previous session survives.
        assert_eq!(engine.session().map(|s| s.total_weight()), Some(8));
    }

    #[test]
    fn reveal_after_delay() {
        init();
        let mut engine = RaffleEngine::new(&rules("reveal"));
        engine.load(roster()).unwrap();
        let t0 = Instant::now();
        engine.spin(t0).unwrap();
        assert_eq!(
            engine.session().map(|s| s.state()),
            Some(SessionState::Spinning)
        );
        assert_eq!(
            engine.time_until_reveal(t0),
            Some(Duration::from_millis(4000))
        );
        assert_eq!(engine.poll(t0 + Duration::from_millis(3999)), Ok(None));

        let res = engine
            .poll(t0 + Duration::from_millis(4000))
            .unwrap()
            .unwrap();
        assert!(roster().contains(&res.winner));
        let session = engine.session().unwrap();
        assert_eq!(session.state(), SessionState::Revealed);
        assert_eq!(session.result(), Some(&res));
        // Nothing left to fire.
        assert_eq!(engine.poll(t0 + Duration::from_secs(10)), Ok(None));
        assert_eq!(engine.time_until_reveal(t0), None);
    }

    #[test]
    fn one_draw_in_flight() {
        init();
        let mut engine = RaffleEngine::new(&rules("guard"));
        engine.load(roster()).unwrap();
        let t0 = Instant::now();
        engine.spin(t0).unwrap();
        assert_eq!(
            engine.spin(t0),
            Err(RaffleErrors::InvalidState {
                operation: "begin a draw",
                state: SessionState::Spinning
            })
        );
        engine.poll(t0 + Duration::from_secs(5)).unwrap();
        assert!(engine.spin(t0 + Duration::from_secs(6)).is_err());
    }

    #[test]
    fn reset_cancels_stale_reveal() {
        init();
        let mut engine = RaffleEngine::new(&rules("stale"));
        engine.load(roster()).unwrap();
        let t0 = Instant::now();
        let first = engine.spin(t0).unwrap();
        let session = engine.reset().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(engine.time_until_reveal(t0), None);

        let t1 = t0 + Duration::from_millis(2000);
        let second = engine.spin(t1).unwrap();
        assert_ne!(first, second);
        // The first reveal would have been due here.
        assert_eq!(engine.poll(t0 + Duration::from_millis(4500)), Ok(None));
        assert!(!engine.cancel(first));
        assert!(engine
            .poll(t1 + Duration::from_millis(4000))
            .unwrap()
            .is_some());
    }

    #[test]
    fn reset_discards_result() {
        init();
        let mut engine = RaffleEngine::new(&rules("discard"));
        engine.load(roster()).unwrap();
        let t0 = Instant::now();
        engine.spin(t0).unwrap();
        engine.poll(t0 + Duration::from_secs(4)).unwrap();
        let session = engine.reset().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.participants(), roster().as_slice());
        assert_eq!(session.total_weight(), 8);
        assert!(session.result().is_none());
    }

    #[test]
    fn cancel_returns_to_idle() {
        init();
        let mut engine = RaffleEngine::new(&rules("cancel"));
        engine.load(roster()).unwrap();
        let t0 = Instant::now();
        let token = engine.spin(t0).unwrap();
        assert!(engine.cancel(token));
        assert!(!engine.cancel(token));
        assert_eq!(engine.session().map(|s| s.state()), Some(SessionState::Idle));
        assert_eq!(engine.poll(t0 + Duration::from_secs(10)), Ok(None));
    }

    #[test]
    fn loading_cancels_pending_reveal() {
        init();
        let mut engine = RaffleEngine::new(&rules("reload"));
        engine.load(roster()).unwrap();
        let t0 = Instant::now();
        engine.spin(t0).unwrap();
        engine.load(roster()[..2].to_vec()).unwrap();
        assert_eq!(engine.time_until_reveal(t0), None);
        assert_eq!(engine.session().map(|s| s.state()), Some(SessionState::Idle));
        assert_eq!(engine.session().map(|s| s.total_weight()), Some(7));
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        init();
        let rules = EngineRules {
            reveal_delay: Duration::ZERO,
            seed: Some("2024-Q3".to_string()),
        };
        let mut winners: Vec<Vec<String>> = Vec::new();
        for _ in 0..2 {
            let mut engine = RaffleEngine::new(&rules);
            engine.load(roster()).unwrap();
            let mut w = Vec::new();
            for _ in 0..20 {
                w.push(engine.draw_blocking().unwrap().winner.id);
                engine.reset().unwrap();
            }
            winners.push(w);
        }
        assert_eq!(winners[0], winners[1]);
    }

    #[test]
    fn draw_blocking_reveals() {
        init();
        let rules = EngineRules {
            reveal_delay: Duration::from_millis(5),
            seed: None,
        };
        let mut engine = RaffleEngine::new(&rules);
        engine.load(roster()).unwrap();
        let res = engine.draw_blocking().unwrap();
        assert_eq!(
            engine.session().map(|s| s.state()),
            Some(SessionState::Revealed)
        );
        let expected = res.winner.weight as f64 / 8.0 * 100.0;
        assert!((res.win_probability_percent - expected).abs() < 1e-9);
        assert!(engine.draw_blocking().is_err());
    }
}
