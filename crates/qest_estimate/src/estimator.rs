//! Parameter estimators
//!
//! Gantree: L3_Estimate → Estimator
//!
//! Closed-form protocols for γ₁ and γ₂ and elimination searches for κ and ω,
//! all driven by one owned state, configuration and random source.

use crate::candidates::{principal_angle, CandidateSet};
use crate::config::{EstimatorConfig, Gamma1Reference};
use crate::elimination::{EliminationOutcome, EliminationSearch};
use qest_core::{
    ControlInput, Duration, Parameter, PhysicalParameters, QestError, QestResult, Samples,
};
use qest_dynamics::QuantumState;
use qest_measure::{ForwardModel, Observer};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Closed-form Inversions
// ============================================================================

/// γ₁ = −ln(p)/t
/// Gantree: gamma1_from_probability(p,t) -> Result<f64> // γ₁ 역산
pub fn gamma1_from_probability(p: f64, t: Duration) -> QestResult<f64> {
    if p.is_nan() || p <= 0.0 {
        return Err(QestError::InvalidMeasurement {
            quantity: "excited population".to_string(),
            value: p,
        });
    }
    Ok(-p.ln() / t)
}

/// γ₂ = −ln(arg)/(4t) − γ₁/4 with arg = 2·s2 − 1 + 2·(1 − 2·s1)²
/// Gantree: gamma2_from_means(s1,s2,t,γ₁) -> Result<f64> // γ₂ 역산
///
/// `s1` and `s2` are rotated-frame means at t and 2t; arg estimates e^{−2Γt}.
pub fn gamma2_from_means(s1: f64, s2: f64, t: Duration, gamma1: f64) -> QestResult<f64> {
    let arg = 2.0 * s2 - 1.0 + 2.0 * (1.0 - 2.0 * s1).powi(2);
    if arg.is_nan() || arg <= 0.0 {
        return Err(QestError::InvalidMeasurement {
            quantity: "coherence decay argument".to_string(),
            value: arg,
        });
    }
    Ok(-arg.ln() / (4.0 * t) - gamma1 / 4.0)
}

// ============================================================================
// Estimate
// ============================================================================

/// One estimated parameter next to its true value
/// Gantree: Estimate // 추정 결과
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Which parameter
    pub parameter: Parameter,

    /// Estimated value
    pub value: f64,

    /// True value of the qubit under test
    pub truth: f64,
}

impl Estimate {
    /// |value − truth|
    pub fn abs_error(&self) -> f64 {
        (self.value - self.truth).abs()
    }

    /// |value − truth| / |truth|
    pub fn rel_error(&self) -> f64 {
        if self.truth.abs() < 1e-12 {
            return self.abs_error();
        }
        self.abs_error() / self.truth.abs()
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {:.5} (true {:.5}, err {:.2e})",
            self.parameter,
            self.value,
            self.truth,
            self.abs_error()
        )
    }
}

// ============================================================================
// Estimator
// ============================================================================

/// Estimator owning the probe state and random source
/// Gantree: Estimator<R> // 추정기
pub struct Estimator<R: Rng = ChaCha8Rng> {
    /// Probe state; reset before every protocol
    state: QuantumState,

    /// Configuration
    config: EstimatorConfig,

    /// Random generator
    rng: R,
}

impl Estimator<ChaCha8Rng> {
    /// Create, seeding from `config.seed` or entropy
    pub fn new(state: QuantumState, config: EstimatorConfig) -> QestResult<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(state, config, rng)
    }
}

impl<R: Rng> Estimator<R> {
    // ========================================================================
    // Constructor
    // ========================================================================

    /// Create with an explicit random source; `config.seed` is ignored
    pub fn with_rng(state: QuantumState, config: EstimatorConfig, rng: R) -> QestResult<Self> {
        config.validate().map_err(QestError::ConfigError)?;
        Ok(Self { state, config, rng })
    }

    /// Probe state
    pub fn state(&self) -> &QuantumState {
        &self.state
    }

    /// Replace the probe state
    pub fn prepare(&mut self, state: QuantumState) {
        self.state = state;
    }

    /// Configuration
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Change where the γ₂ protocol takes γ₁ from
    pub fn set_gamma1_reference(&mut self, reference: Gamma1Reference) {
        self.config.gamma1_reference = reference;
    }

    /// Random source
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    // ========================================================================
    // Closed-form Protocols
    // ========================================================================

    /// γ₁ from one excited-population readout at `gamma1_duration`
    /// Gantree: estimate_gamma1(params,control,n) -> Result<f64> // γ₁ 추정
    pub fn estimate_gamma1(
        &mut self,
        params: &PhysicalParameters,
        control: ControlInput,
        samples: Samples,
    ) -> QestResult<f64> {
        require_idle(Parameter::Gamma1, &control)?;
        self.state.reset();

        let t = self.config.gamma1_duration;
        let p = self
            .direct()
            .measure(&mut self.state, params, &control, t, samples, &mut self.rng)?;
        log::debug!("γ₁ protocol: p({}) = {:.6}", t, p);

        gamma1_from_probability(p, t)
    }

    /// γ₂ from rotated readouts at t and 2t
    /// Gantree: estimate_gamma2(params,control,n) -> Result<f64> // γ₂ 추정
    pub fn estimate_gamma2(
        &mut self,
        params: &PhysicalParameters,
        control: ControlInput,
        samples: Samples,
    ) -> QestResult<f64> {
        require_idle(Parameter::Gamma2, &control)?;

        let t = self.config.gamma2_duration;
        let observer = self.rotated();

        self.state.reset();
        let s1 = observer.measure(&mut self.state, params, &control, t, samples, &mut self.rng)?;
        self.state.reset();
        let s2 =
            observer.measure(&mut self.state, params, &control, 2.0 * t, samples, &mut self.rng)?;

        let gamma1 = match self.config.gamma1_reference {
            Gamma1Reference::GroundTruth => params.gamma1(),
            Gamma1Reference::Supplied(value) => value,
        };
        log::debug!(
            "γ₂ protocol: s1 = {:.6}, s2 = {:.6}, γ₁ ({}) = {:.5}",
            s1,
            s2,
            self.config.gamma1_reference,
            gamma1
        );

        gamma2_from_means(s1, s2, t, gamma1)
    }

    // ========================================================================
    // Elimination Protocols
    // ========================================================================

    /// κ from a short strong pulse of length 1/u, disambiguated by elimination
    /// Gantree: estimate_kappa(params,control,n) -> Result<f64> // κ 추정
    pub fn estimate_kappa(
        &mut self,
        params: &PhysicalParameters,
        control: ControlInput,
        samples: Samples,
    ) -> QestResult<f64> {
        self.kappa_search(params, control, samples)
            .map(|outcome| outcome.estimate)
    }

    /// κ search with its round history
    pub fn kappa_search(
        &mut self,
        params: &PhysicalParameters,
        control: ControlInput,
        samples: Samples,
    ) -> QestResult<EliminationOutcome> {
        if control.is_idle() {
            log::warn!("κ protocol needs a drive, got {}", control);
            return Err(QestError::InvalidControl {
                protocol: Parameter::Kappa.name().to_string(),
                u: control.u(),
                reason: "requires u > 0".to_string(),
            });
        }

        let t = 1.0 / control.u();
        let observer = self.direct();

        self.state.reset();
        let p = observer.measure(&mut self.state, params, &control, t, samples, &mut self.rng)?;
        let theta = principal_angle(2.0 * p - 1.0);
        let candidates = CandidateSet::from_principal_angle(theta, self.config.kappa_aliases, 1.0);
        log::debug!(
            "κ protocol: p = {:.6}, θ = {:.6}, {} candidates",
            p,
            theta,
            candidates.len()
        );

        let search = EliminationSearch::new(
            ForwardModel::new(observer, control),
            Parameter::Kappa,
            *params,
            self.state.initial(),
            samples,
            self.config.kappa_search,
        );
        search.run(candidates, t, &mut self.rng)
    }

    /// ω from one rotated readout, disambiguated by elimination
    /// Gantree: estimate_omega(params,control,n) -> Result<f64> // ω 추정
    pub fn estimate_omega(
        &mut self,
        params: &PhysicalParameters,
        control: ControlInput,
        samples: Samples,
    ) -> QestResult<f64> {
        self.omega_search(params, control, samples)
            .map(|outcome| outcome.estimate)
    }

    /// ω search with its round history
    pub fn omega_search(
        &mut self,
        params: &PhysicalParameters,
        control: ControlInput,
        samples: Samples,
    ) -> QestResult<EliminationOutcome> {
        require_idle(Parameter::Omega, &control)?;

        let t = self.config.omega_duration;
        let observer = self.rotated();

        self.state.reset();
        let s1 = observer.measure(&mut self.state, params, &control, t, samples, &mut self.rng)?;
        let decay = (params.transverse_decay() * t).exp();
        let theta = principal_angle((1.0 - 2.0 * s1) * decay);
        let candidates = CandidateSet::from_principal_angle(theta, self.config.omega_aliases, t);
        log::debug!(
            "ω protocol: s1 = {:.6}, θ = {:.6}, {} candidates",
            s1,
            theta,
            candidates.len()
        );

        let search = EliminationSearch::new(
            ForwardModel::new(observer, control),
            Parameter::Omega,
            *params,
            self.state.initial(),
            samples,
            self.config.omega_search,
        );
        search.run(candidates, t, &mut self.rng)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Run the protocol for `parameter`
    pub fn estimate(
        &mut self,
        parameter: Parameter,
        params: &PhysicalParameters,
        control: ControlInput,
        samples: Samples,
    ) -> QestResult<Estimate> {
        let value = match parameter {
            Parameter::Gamma1 => self.estimate_gamma1(params, control, samples)?,
            Parameter::Gamma2 => self.estimate_gamma2(params, control, samples)?,
            Parameter::Kappa => self.estimate_kappa(params, control, samples)?,
            Parameter::Omega => self.estimate_omega(params, control, samples)?,
        };
        Ok(Estimate {
            parameter,
            value,
            truth: parameter.get(params),
        })
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn direct(&self) -> Observer {
        Observer::excited().with_solver(self.config.solver)
    }

    fn rotated(&self) -> Observer {
        Observer::excited_rotated().with_solver(self.config.solver)
    }
}

fn require_idle(parameter: Parameter, control: &ControlInput) -> QestResult<()> {
    if control.is_idle() {
        return Ok(());
    }
    log::warn!("{} protocol runs undriven, got {}", parameter, control);
    Err(QestError::InvalidControl {
        protocol: parameter.name().to_string(),
        u: control.u(),
        reason: "requires u = 0".to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================
