//! Elimination search
//!
//! Gantree: L3_Estimate → EliminationSearch
//!
//! Narrows a candidate set by comparing forward simulations of each
//! hypothesis with a simulation of the true qubit at randomly drawn, shrinking
//! evolution times. The tolerance halves every round.

use crate::candidates::CandidateSet;
use crate::config::EliminationConfig;
use qest_core::{
    BlochVector, Duration, Parameter, PhysicalParameters, QestError, QestResult, Samples,
};
use qest_measure::Simulator;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Record of a single round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Round number (1-based)
    pub round: usize,

    /// Evolution time drawn for this round
    pub time: f64,

    /// Tolerance applied
    pub tolerance: f64,

    /// Empirical mean of the true qubit
    pub reference_mean: f64,

    /// Candidates at the start of the round
    pub entering: usize,

    /// Candidates that passed
    pub surviving: usize,
}

/// Accepted estimate with its round history
/// Gantree: EliminationOutcome // 탐색 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliminationOutcome {
    /// Lone survivor
    pub estimate: f64,

    /// Round history
    pub rounds: Vec<RoundRecord>,
}

impl EliminationOutcome {
    /// Number of rounds played
    pub fn num_rounds(&self) -> usize {
        self.rounds.len()
    }
}

/// Elimination search over one unknown parameter
/// Gantree: EliminationSearch<S> // 소거 탐색
pub struct EliminationSearch<S: Simulator> {
    /// Forward model
    simulator: S,

    /// Unknown being searched
    parameter: Parameter,

    /// The qubit under test
    truth: PhysicalParameters,

    /// Shared initial Bloch vector
    initial: BlochVector,

    /// Shots per simulated mean
    samples: Samples,

    /// Settings
    config: EliminationConfig,
}

impl<S: Simulator> EliminationSearch<S> {
    // ========================================================================
    // Constructor
    // ========================================================================

    /// Create new search
    pub fn new(
        simulator: S,
        parameter: Parameter,
        truth: PhysicalParameters,
        initial: BlochVector,
        samples: Samples,
        config: EliminationConfig,
    ) -> Self {
        Self {
            simulator,
            parameter,
            truth,
            initial,
            samples,
            config,
        }
    }

    /// Forward model
    pub fn simulator(&self) -> &S {
        &self.simulator
    }

    /// Settings
    pub fn config(&self) -> &EliminationConfig {
        &self.config
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Run until one candidate remains
    /// Gantree: run(candidates,t1,rng) -> Result<EliminationOutcome> // 소거 루프
    ///
    /// `t1` is the evolution time of the principal-angle measurement; round
    /// times are drawn from [t/2, t] of the previous round's time.
    pub fn run<R: Rng>(
        &self,
        mut candidates: CandidateSet,
        t1: Duration,
        rng: &mut R,
    ) -> QestResult<EliminationOutcome> {
        self.config.validate().map_err(QestError::ConfigError)?;
        if !(t1 > 0.0 && t1.is_finite()) {
            return Err(QestError::InvalidDuration(t1));
        }
        if candidates.is_empty() {
            return Err(QestError::EliminationExhausted { rounds: 0 });
        }

        let mut tolerance = self.config.initial_tolerance;
        let mut time = t1;
        let mut rounds: Vec<RoundRecord> = Vec::new();

        while candidates.len() > 1 {
            if rounds.len() >= self.config.max_rounds || tolerance < self.config.min_tolerance {
                log::debug!(
                    "{} search undecided: {} candidates after {} rounds (tol={:e})",
                    self.parameter,
                    candidates.len(),
                    rounds.len(),
                    tolerance
                );
                return Err(QestError::EliminationAmbiguous {
                    rounds: rounds.len(),
                    remaining: candidates.len(),
                });
            }

            let t_new = rng.gen_range(time / 2.0..=time);

            let hypotheses = candidates
                .iter()
                .map(|c| self.parameter.substitute(&self.truth, c))
                .collect::<QestResult<Vec<_>>>()?;
            let means = self.simulator.simulate_all(
                &hypotheses,
                self.initial,
                t_new,
                self.samples,
                rng,
            )?;
            let reference =
                self.simulator
                    .simulate(&self.truth, self.initial, t_new, self.samples, rng)?;

            let keep: Vec<bool> = means
                .iter()
                .map(|m| (m - reference).abs() <= tolerance)
                .collect();
            let entering = candidates.len();
            candidates.retain_flags(&keep);

            let record = RoundRecord {
                round: rounds.len() + 1,
                time: t_new,
                tolerance,
                reference_mean: reference,
                entering,
                surviving: candidates.len(),
            };
            log::debug!(
                "{} round {}: t={:.6}, tol={:.3e}, {} -> {} candidates",
                self.parameter,
                record.round,
                record.time,
                record.tolerance,
                record.entering,
                record.surviving
            );
            rounds.push(record);

            if candidates.is_empty() {
                return Err(QestError::EliminationExhausted {
                    rounds: rounds.len(),
                });
            }

            tolerance /= 2.0;
            time = t_new;
        }

        let estimate = candidates
            .single()
            .ok_or(QestError::EliminationExhausted {
                rounds: rounds.len(),
            })?;
        self.check_truth(estimate)?;

        log::debug!(
            "{} search accepted {:.6} after {} rounds",
            self.parameter,
            estimate,
            rounds.len()
        );
        Ok(EliminationOutcome { estimate, rounds })
    }

    fn check_truth(&self, estimate: f64) -> QestResult<()> {
        let Some(tolerance) = self.config.truth_tolerance else {
            return Ok(());
        };

        let truth = self.parameter.get(&self.truth);
        if (estimate - truth).abs() > tolerance {
            log::debug!(
                "{} survivor {:.6} rejected against {:.6} (±{})",
                self.parameter,
                estimate,
                truth,
                tolerance
            );
            return Err(QestError::SelfConsistencyRejected {
                estimate,
                truth,
                tolerance,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
