//! Forward simulation for hypothesis testing
//!
//! Gantree: L2_Measure → ForwardModel
//!
//! A forward model answers "what empirical mean would a qubit with these
//! parameters produce from `v0` after `t`?". Elimination searches depend on
//! the [`Simulator`] trait so that deterministic models can stand in for
//! tests.

use crate::observer::Observer;
use qest_core::{BlochVector, ControlInput, Duration, PhysicalParameters, QestResult, Samples};
use qest_dynamics::QuantumState;
use rand::Rng;
use std::fmt;

/// Forward-simulation interface
/// Gantree: SimulatorTrait // 순방향 시뮬레이터 인터페이스
pub trait Simulator {
    /// Model name
    fn name(&self) -> &str;

    /// Empirical mean after evolving `v0` for `duration` under `params`
    /// Gantree: simulate(params,v0,t,n,rng) -> Result<f64>
    fn simulate<R: Rng>(
        &self,
        params: &PhysicalParameters,
        v0: BlochVector,
        duration: Duration,
        samples: Samples,
        rng: &mut R,
    ) -> QestResult<f64>;

    /// Simulate every parameter set at the same time
    fn simulate_all<R: Rng>(
        &self,
        params: &[PhysicalParameters],
        v0: BlochVector,
        duration: Duration,
        samples: Samples,
        rng: &mut R,
    ) -> QestResult<Vec<f64>> {
        params
            .iter()
            .map(|p| self.simulate(p, v0, duration, samples, rng))
            .collect()
    }
}

/// ODE evolution + observer readout
/// Gantree: ForwardModel // 순방향 모델
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardModel {
    observer: Observer,
    control: ControlInput,
}

impl ForwardModel {
    /// Create
    pub fn new(observer: Observer, control: ControlInput) -> Self {
        Self { observer, control }
    }

    /// Observer
    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    /// Control held during the evolution
    pub fn control(&self) -> ControlInput {
        self.control
    }
}

impl Simulator for ForwardModel {
    fn name(&self) -> &str {
        "ode_forward_model"
    }

    fn simulate<R: Rng>(
        &self,
        params: &PhysicalParameters,
        v0: BlochVector,
        duration: Duration,
        samples: Samples,
        rng: &mut R,
    ) -> QestResult<f64> {
        let mut state = QuantumState::prepared(v0);
        self.observer
            .measure(&mut state, params, &self.control, duration, samples, rng)
    }
}

impl fmt::Display for ForwardModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ForwardModel({}, {})", self.observer, self.control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_forward_model_matches_observer() {
        let params = PhysicalParameters::new(2.0, 1.0, 0.3, 0.1).unwrap();
        let model = ForwardModel::new(Observer::excited_rotated(), ControlInput::idle());

        let a = model
            .simulate(&params, BlochVector::KET_PLUS_I, 0.7, 1000, &mut ChaCha8Rng::seed_from_u64(5))
            .unwrap();

        let mut state = QuantumState::prepared(BlochVector::KET_PLUS_I);
        let b = Observer::excited_rotated()
            .measure(
                &mut state,
                &params,
                &ControlInput::idle(),
                0.7,
                1000,
                &mut ChaCha8Rng::seed_from_u64(5),
            )
            .unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_simulate_all_order() {
        let model = ForwardModel::new(Observer::excited(), ControlInput::idle());
        let params = [
            PhysicalParameters::new(1.0, 1.0, 0.0, 0.0).unwrap(),
            PhysicalParameters::new(1.0, 1.0, 50.0, 0.0).unwrap(),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let means = model
            .simulate_all(&params, BlochVector::KET_1, 1.0, 200, &mut rng)
            .unwrap();

        // No decay keeps |1⟩ excited, fast decay empties it
        assert_eq!(means[0], 1.0);
        assert!(means[1] < 0.05);
    }
}
