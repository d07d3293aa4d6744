//! Qubit state under evolution
//!
//! Gantree: L1_Dynamics → QuantumState
//!
//! A Bloch vector that evolves in place and remembers where it started.

use crate::generator::Generator;
use crate::solver::{integrate, SolverOptions, SolverStats};
use qest_core::{BlochVector, ControlInput, Duration, PhysicalParameters, QestError, QestResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============================================================================
// Propagation
// ============================================================================

/// Solve dv/dt = J·v + b from `v0` over `duration`
/// Gantree: propagate(params,control,v0,t,opts) -> Result<BlochVector> // 상태 전파
pub fn propagate(
    params: &PhysicalParameters,
    control: &ControlInput,
    v0: BlochVector,
    duration: Duration,
    options: &SolverOptions,
) -> QestResult<BlochVector> {
    propagate_with_stats(params, control, v0, duration, options).map(|(v, _)| v)
}

fn propagate_with_stats(
    params: &PhysicalParameters,
    control: &ControlInput,
    v0: BlochVector,
    duration: Duration,
    options: &SolverOptions,
) -> QestResult<(BlochVector, SolverStats)> {
    let generator = Generator::new(params, control);
    let (y, stats) = integrate(|_, v| generator.rhs(v), v0.to_array(), duration, options)?;
    Ok((BlochVector::from_array(y), stats))
}

// ============================================================================
// QuantumState
// ============================================================================

/// Bloch vector with a remembered initial condition
/// Gantree: QuantumState // 양자 상태
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantumState {
    current: BlochVector,
    initial: BlochVector,
}

#[derive(Deserialize)]
struct RawState {
    current: BlochVector,
    initial: BlochVector,
}

impl<'de> Deserialize<'de> for QuantumState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawState::deserialize(deserializer)?;
        let checked = |v: BlochVector| -> Result<BlochVector, D::Error> {
            BlochVector::try_new(v.x, v.y, v.z).map_err(serde::de::Error::custom)
        };
        Ok(Self {
            current: checked(raw.current)?,
            initial: checked(raw.initial)?,
        })
    }
}

impl QuantumState {
    /// Create from coordinates
    /// Gantree: new(x,y,z) -> Result<Self> // 생성+검증
    pub fn new(x: f64, y: f64, z: f64) -> QestResult<Self> {
        Ok(Self::prepared(BlochVector::try_new(x, y, z)?))
    }

    /// Create from a vector
    pub fn from_vector(v: BlochVector) -> QestResult<Self> {
        Self::new(v.x, v.y, v.z)
    }

    /// Create from a known-good vector such as a preset
    pub fn prepared(v: BlochVector) -> Self {
        Self {
            current: v,
            initial: v,
        }
    }

    /// Current coordinates
    #[inline]
    pub fn coordinates(&self) -> BlochVector {
        self.current
    }

    /// Remembered initial coordinates
    #[inline]
    pub fn initial(&self) -> BlochVector {
        self.initial
    }

    /// Evolve in place with default solver options
    /// Gantree: evolve(params,control,t) -> Result<()> // 시간 발전
    pub fn evolve(
        &mut self,
        params: &PhysicalParameters,
        control: &ControlInput,
        duration: Duration,
    ) -> QestResult<()> {
        self.evolve_with(params, control, duration, &SolverOptions::default())
            .map(|_| ())
    }

    /// Evolve in place with explicit solver options
    pub fn evolve_with(
        &mut self,
        params: &PhysicalParameters,
        control: &ControlInput,
        duration: Duration,
        options: &SolverOptions,
    ) -> QestResult<SolverStats> {
        let (v, stats) = propagate_with_stats(params, control, self.current, duration, options)?;
        self.current = v;
        Ok(stats)
    }

    /// Evolved copy; `self` is unchanged
    pub fn evolved(
        &self,
        params: &PhysicalParameters,
        control: &ControlInput,
        duration: Duration,
    ) -> QestResult<Self> {
        let mut next = *self;
        next.evolve(params, control, duration)?;
        Ok(next)
    }

    /// Restore the initial coordinates
    /// Gantree: reset() // 초기화
    pub fn reset(&mut self) {
        self.current = self.initial;
    }

    /// Has the state moved away from its initial coordinates
    pub fn is_evolved(&self) -> bool {
        self.current != self.initial
    }

    /// Sample the trajectory from the initial coordinates on a uniform grid
    /// of `points` times spanning [0, t_end]
    /// Gantree: trace(params,control,t_end,n) -> Result<Trajectory> // 궤적
    pub fn trace(
        &self,
        params: &PhysicalParameters,
        control: &ControlInput,
        t_end: Duration,
        points: usize,
    ) -> QestResult<Trajectory> {
        if !t_end.is_finite() || t_end < 0.0 {
            return Err(QestError::InvalidDuration(t_end));
        }

        let options = SolverOptions::default();
        let times = linspace(t_end, points);
        let mut samples = Vec::with_capacity(points);
        for &t in &times {
            samples.push(propagate(params, control, self.initial, t, &options)?);
        }

        Ok(Trajectory {
            times,
            points: samples,
        })
    }
}

impl fmt::Display for QuantumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State{}", self.current)
    }
}

fn linspace(t_end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![0.0],
        n => (0..n)
            .map(|i| t_end * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

// ============================================================================
// Trajectory
// ============================================================================

/// Sampled Bloch trajectory
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trajectory {
    /// Sample times
    pub times: Vec<f64>,

    /// Bloch vector at each time
    pub points: Vec<BlochVector>,
}

impl Trajectory {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// No samples
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Last sample
    pub fn final_point(&self) -> Option<BlochVector> {
        self.points.last().copied()
    }

    /// x(t) series
    pub fn x_series(&self) -> Vec<f64> {
        self.points.iter().map(|v| v.x).collect()
    }

    /// y(t) series
    pub fn y_series(&self) -> Vec<f64> {
        self.points.iter().map(|v| v.y).collect()
    }

    /// z(t) series
    pub fn z_series(&self) -> Vec<f64> {
        self.points.iter().map(|v| v.z).collect()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> QestResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn qubit() -> PhysicalParameters {
        PhysicalParameters::new(2.0, 1.0, 0.4, 0.1).unwrap()
    }

    #[test]
    fn test_new_rejects_non_finite() {
        assert!(QuantumState::new(0.0, 0.0, 1.0).is_ok());
        assert!(matches!(
            QuantumState::new(f64::NAN, 0.0, 0.0),
            Err(QestError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn test_state_json_round_trip() {
        let mut s = QuantumState::prepared(BlochVector::KET_1);
        s.evolve(&qubit(), &ControlInput::idle(), 0.5).unwrap();

        let json = serde_json::to_string(&s).unwrap();
        let back: QuantumState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
        assert_eq!(back.initial(), BlochVector::KET_1);

        // Coordinates arrive as null when a non-finite value was written
        let broken = r#"{"current":{"x":null,"y":0.0,"z":1.0},"initial":{"x":0.0,"y":0.0,"z":1.0}}"#;
        assert!(serde_json::from_str::<QuantumState>(broken).is_err());
    }

    #[test]
    fn test_zero_duration_noop() {
        let mut s = QuantumState::new(0.3, -0.2, 0.5).unwrap();
        s.evolve(&qubit(), &ControlInput::idle(), 0.0).unwrap();
        assert_eq!(s.coordinates(), BlochVector::new(0.3, -0.2, 0.5));
        assert!(!s.is_evolved());
    }

    #[test]
    fn test_negative_duration_rejected() {
        let mut s = QuantumState::prepared(BlochVector::KET_1);
        let err = s.evolve(&qubit(), &ControlInput::idle(), -1.0).unwrap_err();
        assert_eq!(err, QestError::InvalidDuration(-1.0));
        assert_eq!(s.coordinates(), BlochVector::KET_1);
    }

    #[test]
    fn test_reset_restores_initial() {
        let mut s = QuantumState::prepared(BlochVector::KET_PLUS_I);
        s.evolve(&qubit(), &ControlInput::idle(), 1.0).unwrap();
        assert!(s.is_evolved());
        s.reset();
        assert_eq!(s.coordinates(), BlochVector::KET_PLUS_I);
        s.reset();
        assert_eq!(s.coordinates(), s.initial());
    }

    #[test]
    fn test_evolved_is_pure() {
        let s = QuantumState::prepared(BlochVector::KET_1);
        let next = s.evolved(&qubit(), &ControlInput::idle(), 1.0).unwrap();
        assert_eq!(s.coordinates(), BlochVector::KET_1);
        assert_eq!(next.initial(), BlochVector::KET_1);
        assert!(next.coordinates().z > -1.0);
    }

    #[test]
    fn test_relaxation_from_excited() {
        // u = 0 decouples z: z(t) = 1 - 2 e^{-γ₁ t}
        let params = qubit();
        let mut s = QuantumState::prepared(BlochVector::KET_1);
        s.evolve(&params, &ControlInput::idle(), 2.0).unwrap();

        let expected = 1.0 - 2.0 * (-params.gamma1() * 2.0).exp();
        assert_abs_diff_eq!(s.coordinates().z, expected, epsilon = 1e-7);
        assert_abs_diff_eq!(s.coordinates().x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_free_precession_preserves_norm() {
        let params = PhysicalParameters::new(1.5, 0.7, 0.0, 0.0).unwrap();
        let mut s = QuantumState::prepared(BlochVector::KET_PLUS);
        s.evolve(&params, &ControlInput::idle(), 3.0).unwrap();

        let v = s.coordinates();
        assert_abs_diff_eq!(v.norm(), 1.0, epsilon = 1e-7);
        assert_abs_diff_eq!(v.x, (1.5f64 * 3.0).cos(), epsilon = 1e-7);
        assert_abs_diff_eq!(v.y, (1.5f64 * 3.0).sin(), epsilon = 1e-7);
    }

    #[test]
    fn test_kappa_pulse_rotates_by_kappa() {
        // Strong drive for t = 1/u turns |1⟩ by an angle ≈ κ about x
        let params = PhysicalParameters::new(2.0, 0.9, 0.3, 0.1).unwrap();
        let control = ControlInput::new(1000.0).unwrap();
        let mut s = QuantumState::prepared(BlochVector::KET_1);
        s.evolve(&params, &control, 1e-3).unwrap();

        let p = (1.0 - s.coordinates().z) / 2.0;
        let theta = (2.0 * p - 1.0).acos();
        assert_abs_diff_eq!(theta, 0.9, epsilon = 5e-3);
    }

    #[test]
    fn test_trace_grid() {
        let s = QuantumState::prepared(BlochVector::KET_PLUS_I);
        let traj = s.trace(&qubit(), &ControlInput::idle(), 2.0, 5).unwrap();
        assert_eq!(traj.len(), 5);
        assert_eq!(traj.times, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(traj.points[0], BlochVector::KET_PLUS_I);

        let end = s.evolved(&qubit(), &ControlInput::idle(), 2.0).unwrap();
        let last = traj.final_point().unwrap();
        assert!(last.max_abs_diff(&end.coordinates()) < 1e-12);
    }

    #[test]
    fn test_trace_degenerate_sizes() {
        let s = QuantumState::prepared(BlochVector::KET_0);
        assert!(s.trace(&qubit(), &ControlInput::idle(), 1.0, 0).unwrap().is_empty());
        assert_eq!(s.trace(&qubit(), &ControlInput::idle(), 1.0, 1).unwrap().times, vec![0.0]);
    }

    #[test]
    fn test_display() {
        let s = QuantumState::prepared(BlochVector::KET_1);
        assert_eq!(s.to_string(), "State(0.00000, 0.00000, -1.00000)");
    }
}
