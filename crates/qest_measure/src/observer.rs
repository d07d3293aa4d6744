//! Measurement model
//!
//! Gantree: L2_Measure → Observer
//!
//! Evolve, form ρ, compute p = Re Tr(O·ρ) in the chosen frame, then sample.

use crate::observable::{Observable, Rotation};
use crate::sampler::sample_successes;
use qest_core::{
    BlochVector, ControlInput, Duration, PhysicalParameters, Probability, QestResult, Samples,
};
use qest_dynamics::{QuantumState, SolverOptions};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One sampled readout
/// Gantree: Measurement // 측정 결과
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Evolution time before readout
    pub duration: Duration,

    /// Number of shots
    pub samples: Samples,

    /// Exact outcome probability
    pub probability: f64,

    /// Empirical mean
    pub mean: f64,

    /// Shots that returned 1
    pub successes: u64,
}

impl Measurement {
    /// |mean − p|
    pub fn sampling_error(&self) -> f64 {
        (self.mean - self.probability).abs()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> QestResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:.4}: {}/{} (mean={:.5}, p={:.5})",
            self.duration, self.successes, self.samples, self.mean, self.probability
        )
    }
}

/// Observable together with its measurement frame
/// Gantree: Observer // 측정기
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    observable: Observable,
    rotation: Rotation,
    options: SolverOptions,
}

impl Observer {
    /// Create
    pub fn new(observable: Observable, rotation: Rotation) -> Self {
        Self {
            observable,
            rotation,
            options: SolverOptions::default(),
        }
    }

    /// Excited-state projector, computational basis
    pub fn excited() -> Self {
        Self::new(Observable::EXCITED, Rotation::None)
    }

    /// Excited-state projector after exp(iπ/4·σx), reads (1 − y)/2
    pub fn excited_rotated() -> Self {
        Self::new(Observable::EXCITED, Rotation::QUARTER_X)
    }

    /// Builder: solver options used by `measure`
    pub fn with_solver(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Observable
    pub fn observable(&self) -> &Observable {
        &self.observable
    }

    /// Frame
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Solver options
    pub fn solver(&self) -> &SolverOptions {
        &self.options
    }

    /// Outcome probability for a Bloch vector
    /// Gantree: probability(v) -> Result<Probability> // 보른 규칙
    pub fn probability(&self, v: &BlochVector) -> QestResult<Probability> {
        let p = self.observable.expectation(&self.rotation.frame(v));
        if !(0.0..=1.0).contains(&p) {
            log::trace!("clamping probability {:e} for {}", p, v);
        }
        Probability::clamped(p)
    }

    /// Evolve `state` by `duration`, then sample; returns the empirical mean
    /// Gantree: measure(state,params,control,t,n,rng) -> Result<f64> // 측정
    ///
    /// The state is left at its evolved coordinates.
    pub fn measure<R: Rng>(
        &self,
        state: &mut QuantumState,
        params: &PhysicalParameters,
        control: &ControlInput,
        duration: Duration,
        samples: Samples,
        rng: &mut R,
    ) -> QestResult<f64> {
        self.record(state, params, control, duration, samples, rng)
            .map(|m| m.mean)
    }

    /// Like `measure`, keeping the full readout
    pub fn record<R: Rng>(
        &self,
        state: &mut QuantumState,
        params: &PhysicalParameters,
        control: &ControlInput,
        duration: Duration,
        samples: Samples,
        rng: &mut R,
    ) -> QestResult<Measurement> {
        state.evolve_with(params, control, duration, &self.options)?;
        let p = self.probability(&state.coordinates())?;
        let successes = sample_successes(p, samples, rng)?;

        Ok(Measurement {
            duration,
            samples,
            probability: p.value(),
            mean: successes as f64 / samples as f64,
            successes,
        })
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::excited()
    }
}

impl fmt::Display for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.observable, self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use qest_core::QestError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_probability_direct_and_rotated() {
        let v = BlochVector::new(0.2, 0.6, -0.4);
        let direct = Observer::excited().probability(&v).unwrap();
        let rotated = Observer::excited_rotated().probability(&v).unwrap();
        assert_abs_diff_eq!(direct.value(), 0.7, epsilon = 1e-14);
        assert_abs_diff_eq!(rotated.value(), 0.2, epsilon = 1e-14);
    }

    #[test]
    fn test_probability_outside_ball_rejected() {
        let v = BlochVector::new(0.0, 0.0, -1.5);
        assert!(matches!(
            Observer::excited().probability(&v),
            Err(QestError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_measure_mutates_state() {
        let params = PhysicalParameters::new(2.0, 1.0, 0.5, 0.1).unwrap();
        let mut state = QuantumState::prepared(BlochVector::KET_1);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        Observer::excited()
            .measure(&mut state, &params, &ControlInput::idle(), 1.0, 100, &mut rng)
            .unwrap();
        assert!(state.is_evolved());
    }

    #[test]
    fn test_record_matches_exact_probability() {
        let params = PhysicalParameters::new(2.0, 1.0, 0.3, 0.1).unwrap();
        let mut state = QuantumState::prepared(BlochVector::KET_1);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let m = Observer::excited()
            .record(&mut state, &params, &ControlInput::idle(), 2.0, 1_000_000, &mut rng)
            .unwrap();
        assert_abs_diff_eq!(m.probability, (-0.6f64).exp(), epsilon = 1e-7);
        assert!(m.sampling_error() < 0.01);
        assert_eq!(m.samples, 1_000_000);
    }

    #[test]
    fn test_measurement_json() {
        let m = Measurement {
            duration: 0.5,
            samples: 1000,
            probability: 0.25,
            mean: 0.243,
            successes: 243,
        };
        let json = m.to_json().unwrap();
        assert!(json.contains("\"successes\":243"));
        let back: Measurement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_zero_samples() {
        let params = PhysicalParameters::new(2.0, 1.0, 0.3, 0.1).unwrap();
        let mut state = QuantumState::prepared(BlochVector::KET_1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = Observer::excited()
            .measure(&mut state, &params, &ControlInput::idle(), 1.0, 0, &mut rng)
            .unwrap_err();
        assert_eq!(err, QestError::InvalidSampleCount(0));
    }
}
