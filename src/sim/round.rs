//! Round lifecycle and session bookkeeping
//!
//! Both simulators implement [`RoundSim`]; a [`Session`] drives one of them
//! through idle → playing → finished → idle, keeps the win tally and can
//! restart rounds automatically after a countdown.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entity::Candidate;
use crate::error::ConfigError;

/// Phase of the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// No round started yet
    #[default]
    Idle,
    /// Simulation running
    Playing,
    /// Terminal condition reached
    Finished,
}

/// How a finished round ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RoundOutcome {
    /// Exactly one entity left standing
    Winner(String),
    /// The last entities went out on the same tick; no winner is picked
    NoSurvivor,
}

impl RoundOutcome {
    pub fn winner(&self) -> Option<&str> {
        match self {
            RoundOutcome::Winner(id) => Some(id),
            RoundOutcome::NoSurvivor => None,
        }
    }
}

/// A simulation that plays rounds to a terminal outcome
pub trait RoundSim {
    /// Reset all per-round state and spawn up to `count` entities from `candidates`
    fn start_round(&mut self, candidates: &[Candidate], count: usize) -> Result<(), ConfigError>;
    /// Advance by one frame of `dt_ms` milliseconds
    fn step(&mut self, dt_ms: f32);
    fn phase(&self) -> RoundPhase;
    fn outcome(&self) -> Option<&RoundOutcome>;
}

/// Reject empty or ambiguous candidate lists before a round starts
pub(crate) fn validate_candidates(
    candidates: &[Candidate],
    count: usize,
) -> Result<(), ConfigError> {
    if count == 0 {
        return Err(ConfigError::ZeroEntities);
    }
    if candidates.is_empty() {
        return Err(ConfigError::NoCandidates);
    }
    let mut seen = std::collections::HashSet::with_capacity(candidates.len());
    for candidate in candidates {
        if !seen.insert(candidate.id.as_str()) {
            return Err(ConfigError::DuplicateCandidate(candidate.id.clone()));
        }
    }
    Ok(())
}

/// Drives a simulator across rounds and keeps score
#[derive(Debug)]
pub struct Session<S: RoundSim> {
    sim: S,
    candidates: Vec<Candidate>,
    count: usize,
    /// Delay before the next round starts automatically (None = manual)
    auto_restart_ms: Option<f32>,
    countdown_ms: Option<f32>,
    rounds_played: u32,
    /// Wins per candidate id
    wins: BTreeMap<String, u32>,
    /// Whether the current round's result has already been tallied
    tallied: bool,
}

impl<S: RoundSim> Session<S> {
    pub fn new(sim: S) -> Self {
        Self {
            sim,
            candidates: Vec::new(),
            count: 0,
            auto_restart_ms: None,
            countdown_ms: None,
            rounds_played: 0,
            wins: BTreeMap::new(),
            tallied: false,
        }
    }

    /// Enable automatic restarts `delay_ms` after each round ends
    pub fn with_auto_restart(mut self, delay_ms: f32) -> Self {
        self.auto_restart_ms = Some(delay_ms.max(0.0));
        self
    }

    /// Change the restart delay; `None` switches to manual restarts
    pub fn set_auto_restart(&mut self, delay_ms: Option<f32>) {
        self.auto_restart_ms = delay_ms.map(|d| d.max(0.0));
        if self.auto_restart_ms.is_none() {
            self.countdown_ms = None;
        }
    }

    /// Start a round with a new roster (idle/finished → playing)
    pub fn start(&mut self, candidates: Vec<Candidate>, count: usize) -> Result<(), ConfigError> {
        self.sim.start_round(&candidates, count)?;
        self.candidates = candidates;
        self.count = count;
        self.countdown_ms = None;
        self.tallied = false;
        Ok(())
    }

    /// Start another round with the previous roster
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        let candidates = std::mem::take(&mut self.candidates);
        let result = self.start(candidates.clone(), self.count);
        if result.is_err() {
            self.candidates = candidates;
        }
        result
    }

    /// Drop back to idle without starting a new round
    pub fn reset(&mut self) {
        self.countdown_ms = None;
        self.tallied = true;
        self.candidates.clear();
        self.count = 0;
    }

    /// Advance one frame; tallies finished rounds and runs the restart countdown
    pub fn step(&mut self, dt_ms: f32) {
        if self.candidates.is_empty() {
            return;
        }
        if self.sim.phase() == RoundPhase::Playing {
            self.sim.step(dt_ms);
        }

        if self.sim.phase() == RoundPhase::Finished && !self.tallied {
            self.tallied = true;
            self.rounds_played += 1;
            match self.sim.outcome() {
                Some(RoundOutcome::Winner(id)) => {
                    let wins = self.wins.entry(id.clone()).or_insert(0);
                    *wins += 1;
                    log::info!("Round {} won by {} ({} wins)", self.rounds_played, id, wins);
                }
                Some(RoundOutcome::NoSurvivor) | None => {
                    log::info!("Round {} ended with no survivor", self.rounds_played);
                }
            }
            self.countdown_ms = self.auto_restart_ms;
            return;
        }

        if let Some(remaining) = self.countdown_ms.as_mut() {
            *remaining -= dt_ms.max(0.0);
            if *remaining <= 0.0 {
                self.countdown_ms = None;
                if let Err(err) = self.restart() {
                    log::warn!("Auto-restart failed: {}", err);
                }
            }
        }
    }

    /// Session-level phase (idle until the first round starts or after a reset)
    pub fn phase(&self) -> RoundPhase {
        if self.candidates.is_empty() {
            RoundPhase::Idle
        } else {
            self.sim.phase()
        }
    }

    pub fn sim(&self) -> &S {
        &self.sim
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn wins(&self) -> &BTreeMap<String, u32> {
        &self.wins
    }

    pub fn wins_for(&self, id: &str) -> u32 {
        self.wins.get(id).copied().unwrap_or(0)
    }

    /// Milliseconds until the automatic restart, if one is pending
    pub fn restart_countdown(&self) -> Option<f32> {
        self.countdown_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal sim: the first candidate wins after `ticks` steps
    #[derive(Debug, Default)]
    struct ScriptedSim {
        phase: RoundPhase,
        outcome: Option<RoundOutcome>,
        ticks_left: u32,
        leader: String,
        starts: u32,
    }

    impl RoundSim for ScriptedSim {
        fn start_round(
            &mut self,
            candidates: &[Candidate],
            count: usize,
        ) -> Result<(), ConfigError> {
            validate_candidates(candidates, count)?;
            self.phase = RoundPhase::Playing;
            self.outcome = None;
            self.ticks_left = 3;
            self.leader = candidates[0].id.clone();
            self.starts += 1;
            Ok(())
        }

        fn step(&mut self, _dt_ms: f32) {
            self.ticks_left = self.ticks_left.saturating_sub(1);
            if self.ticks_left == 0 {
                self.phase = RoundPhase::Finished;
                self.outcome = Some(RoundOutcome::Winner(self.leader.clone()));
            }
        }

        fn phase(&self) -> RoundPhase {
            self.phase
        }

        fn outcome(&self) -> Option<&RoundOutcome> {
            self.outcome.as_ref()
        }
    }

    fn roster() -> Vec<Candidate> {
        vec![
            Candidate::new("br", "Brazil", "🇧🇷"),
            Candidate::new("de", "Germany", "🇩🇪"),
        ]
    }

    #[test]
    fn test_session_starts_idle() {
        let session = Session::new(ScriptedSim::default());
        assert_eq!(session.phase(), RoundPhase::Idle);
        assert_eq!(session.rounds_played(), 0);
    }

    #[test]
    fn test_win_is_tallied_once() {
        let mut session = Session::new(ScriptedSim::default());
        session.start(roster(), 2).unwrap();
        assert_eq!(session.phase(), RoundPhase::Playing);
        for _ in 0..10 {
            session.step(16.0);
        }
        assert_eq!(session.phase(), RoundPhase::Finished);
        assert_eq!(session.rounds_played(), 1);
        assert_eq!(session.wins_for("br"), 1);
        assert_eq!(session.wins_for("de"), 0);
    }

    #[test]
    fn test_auto_restart_after_countdown() {
        let mut session = Session::new(ScriptedSim::default()).with_auto_restart(50.0);
        session.start(roster(), 2).unwrap();
        for _ in 0..3 {
            session.step(16.0);
        }
        assert_eq!(session.phase(), RoundPhase::Finished);
        assert_eq!(session.restart_countdown(), Some(50.0));

        for _ in 0..4 {
            session.step(16.0);
        }
        assert_eq!(session.phase(), RoundPhase::Playing);
        assert_eq!(session.sim().starts, 2);
        assert_eq!(session.restart_countdown(), None);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut session = Session::new(ScriptedSim::default());
        session.start(roster(), 2).unwrap();
        session.reset();
        assert_eq!(session.phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_bad_roster_rejected() {
        let mut session = Session::new(ScriptedSim::default());
        assert_eq!(session.start(Vec::new(), 2), Err(ConfigError::NoCandidates));
        assert_eq!(session.start(roster(), 0), Err(ConfigError::ZeroEntities));
        let dupes = vec![
            Candidate::new("fr", "France", "🇫🇷"),
            Candidate::new("fr", "France", "🇫🇷"),
        ];
        assert_eq!(
            session.start(dupes, 2),
            Err(ConfigError::DuplicateCandidate("fr".into()))
        );
        assert_eq!(session.phase(), RoundPhase::Idle);
    }
}
