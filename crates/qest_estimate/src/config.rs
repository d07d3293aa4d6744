//! Estimator configuration
//!
//! Gantree: L3_Estimate → EstimatorConfig
//!
//! Probe durations, alias ranges, elimination settings and the source of γ₁
//! used by the γ₂ protocol.

use qest_core::{protocol, QestResult};
use qest_dynamics::SolverOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// EliminationConfig
// ============================================================================

/// Elimination-search settings
/// Gantree: EliminationConfig // 소거 탐색 설정
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EliminationConfig {
    /// Tolerance of the first round
    /// Gantree: initial_tolerance: f64 // 초기 허용오차 (0.15)
    pub initial_tolerance: f64,

    /// Floor below which an undecided search is abandoned
    pub min_tolerance: f64,

    /// Round cap
    pub max_rounds: usize,

    /// Accept the lone survivor only within this distance of the true value
    /// Gantree: truth_tolerance: Option<f64> // 자기 일관성 검사
    pub truth_tolerance: Option<f64>,
}

impl EliminationConfig {
    /// κ search: survivor checked within 0.012 of the truth
    pub fn kappa() -> Self {
        Self {
            truth_tolerance: Some(protocol::KAPPA_TRUTH_TOLERANCE),
            ..Self::omega()
        }
    }

    /// ω search: survivor accepted unconditionally
    pub fn omega() -> Self {
        Self {
            initial_tolerance: protocol::INITIAL_TOLERANCE,
            min_tolerance: protocol::MIN_TOLERANCE,
            max_rounds: protocol::MAX_ROUNDS,
            truth_tolerance: None,
        }
    }

    /// Builder: initial tolerance
    pub fn with_initial_tolerance(mut self, tol: f64) -> Self {
        self.initial_tolerance = tol;
        self
    }

    /// Builder: tolerance floor
    pub fn with_min_tolerance(mut self, tol: f64) -> Self {
        self.min_tolerance = tol;
        self
    }

    /// Builder: round cap
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Builder: self-consistency check
    pub fn with_truth_tolerance(mut self, tol: Option<f64>) -> Self {
        self.truth_tolerance = tol;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.initial_tolerance > 0.0 && self.initial_tolerance.is_finite()) {
            return Err(format!(
                "initial_tolerance must be positive, got {}",
                self.initial_tolerance
            ));
        }
        if self.min_tolerance.is_nan()
            || self.min_tolerance <= 0.0
            || self.min_tolerance > self.initial_tolerance
        {
            return Err(format!(
                "min_tolerance must be in (0, {}], got {}",
                self.initial_tolerance, self.min_tolerance
            ));
        }
        if self.max_rounds == 0 {
            return Err("max_rounds must be > 0".to_string());
        }
        if let Some(tol) = self.truth_tolerance {
            if !(tol >= 0.0 && tol.is_finite()) {
                return Err(format!("truth_tolerance must be >= 0, got {}", tol));
            }
        }
        Ok(())
    }
}

impl Default for EliminationConfig {
    fn default() -> Self {
        Self::omega()
    }
}

impl fmt::Display for EliminationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Elimination(tol={}, floor={:e}, rounds<={}",
            self.initial_tolerance, self.min_tolerance, self.max_rounds
        )?;
        match self.truth_tolerance {
            Some(tol) => write!(f, ", truth±{})", tol),
            None => write!(f, ")"),
        }
    }
}

// ============================================================================
// Gamma1Reference
// ============================================================================

/// Where the γ₂ protocol takes γ₁ from
/// Gantree: Gamma1Reference // γ₁ 출처
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Gamma1Reference {
    /// The true γ₁ of the qubit under test
    #[default]
    GroundTruth,

    /// A separately estimated value
    Supplied(f64),
}

impl fmt::Display for Gamma1Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GroundTruth => write!(f, "ground-truth"),
            Self::Supplied(v) => write!(f, "supplied({:.5})", v),
        }
    }
}

// ============================================================================
// EstimatorConfig
// ============================================================================

/// Estimator configuration
/// Gantree: EstimatorConfig // 추정기 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Random seed (None = entropy)
    pub seed: Option<u64>,

    /// γ₁ probe time
    /// Gantree: gamma1_duration: f64 // (2.0)
    pub gamma1_duration: f64,

    /// First γ₂ probe time; the second is twice this
    /// Gantree: gamma2_duration: f64 // (1.0)
    pub gamma2_duration: f64,

    /// ω principal-angle probe time
    pub omega_duration: f64,

    /// Branch index range k ∈ [lo, hi) for κ candidates
    pub kappa_aliases: (i32, i32),

    /// Branch index range k ∈ [lo, hi) for ω candidates
    pub omega_aliases: (i32, i32),

    /// κ elimination settings
    pub kappa_search: EliminationConfig,

    /// ω elimination settings
    pub omega_search: EliminationConfig,

    /// γ₁ source for the γ₂ protocol
    pub gamma1_reference: Gamma1Reference,

    /// ODE solver options
    pub solver: SolverOptions,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            gamma1_duration: protocol::GAMMA1_DURATION,
            gamma2_duration: protocol::GAMMA2_DURATION,
            omega_duration: protocol::OMEGA_DURATION,
            kappa_aliases: protocol::KAPPA_ALIASES,
            omega_aliases: protocol::OMEGA_ALIASES,
            kappa_search: EliminationConfig::kappa(),
            omega_search: EliminationConfig::omega(),
            gamma1_reference: Gamma1Reference::GroundTruth,
            solver: SolverOptions::default(),
        }
    }
}

impl EstimatorConfig {
    /// Create with default values
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set γ₁ probe time
    pub fn with_gamma1_duration(mut self, t: f64) -> Self {
        self.gamma1_duration = t;
        self
    }

    /// Set first γ₂ probe time
    pub fn with_gamma2_duration(mut self, t: f64) -> Self {
        self.gamma2_duration = t;
        self
    }

    /// Set ω probe time
    pub fn with_omega_duration(mut self, t: f64) -> Self {
        self.omega_duration = t;
        self
    }

    /// Set κ branch range
    pub fn with_kappa_aliases(mut self, lo: i32, hi: i32) -> Self {
        self.kappa_aliases = (lo, hi);
        self
    }

    /// Set ω branch range
    pub fn with_omega_aliases(mut self, lo: i32, hi: i32) -> Self {
        self.omega_aliases = (lo, hi);
        self
    }

    /// Set κ elimination settings
    pub fn with_kappa_search(mut self, search: EliminationConfig) -> Self {
        self.kappa_search = search;
        self
    }

    /// Set ω elimination settings
    pub fn with_omega_search(mut self, search: EliminationConfig) -> Self {
        self.omega_search = search;
        self
    }

    /// Set γ₁ source
    pub fn with_gamma1_reference(mut self, reference: Gamma1Reference) -> Self {
        self.gamma1_reference = reference;
        self
    }

    /// Set solver options
    pub fn with_solver(mut self, solver: SolverOptions) -> Self {
        self.solver = solver;
        self
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    /// Gantree: validate(&self) -> Result // 검증
    pub fn validate(&self) -> Result<(), String> {
        for (name, t) in [
            ("gamma1_duration", self.gamma1_duration),
            ("gamma2_duration", self.gamma2_duration),
            ("omega_duration", self.omega_duration),
        ] {
            if !(t > 0.0 && t.is_finite()) {
                return Err(format!("{} must be positive, got {}", name, t));
            }
        }

        for (name, (lo, hi)) in [
            ("kappa_aliases", self.kappa_aliases),
            ("omega_aliases", self.omega_aliases),
        ] {
            if lo >= hi {
                return Err(format!("{} must satisfy lo < hi, got [{}, {})", name, lo, hi));
            }
        }

        if let Gamma1Reference::Supplied(v) = self.gamma1_reference {
            if !(v >= 0.0 && v.is_finite()) {
                return Err(format!("supplied gamma1 must be >= 0, got {}", v));
            }
        }

        self.kappa_search
            .validate()
            .map_err(|e| format!("kappa_search: {}", e))?;
        self.omega_search
            .validate()
            .map_err(|e| format!("omega_search: {}", e))?;
        self.solver.validate().map_err(|e| format!("solver: {}", e))
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serialize to JSON
    pub fn to_json(&self) -> QestResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> QestResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for EstimatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EstimatorConfig(t_γ1={}, t_γ2={}, t_ω={}, γ1 ref={}, seed={:?})",
            self.gamma1_duration,
            self.gamma2_duration,
            self.omega_duration,
            self.gamma1_reference,
            self.seed
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EstimatorConfig::default();
        assert_eq!(config.gamma1_duration, 2.0);
        assert_eq!(config.gamma2_duration, 1.0);
        assert_eq!(config.kappa_aliases, (-5, 5));
        assert_eq!(config.omega_aliases, (-30, 30));
        assert_eq!(config.kappa_search.truth_tolerance, Some(0.012));
        assert_eq!(config.omega_search.truth_tolerance, None);
        assert_eq!(config.gamma1_reference, Gamma1Reference::GroundTruth);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = EstimatorConfig::new()
            .with_seed(42)
            .with_gamma1_duration(3.0)
            .with_omega_aliases(-10, 10)
            .with_gamma1_reference(Gamma1Reference::Supplied(0.25))
            .with_kappa_search(EliminationConfig::kappa().with_truth_tolerance(None));

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.gamma1_duration, 3.0);
        assert_eq!(config.omega_aliases, (-10, 10));
        assert_eq!(config.kappa_search.truth_tolerance, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(EstimatorConfig::new().with_omega_duration(0.0).validate().is_err());
        assert!(EstimatorConfig::new().with_kappa_aliases(3, 3).validate().is_err());
        assert!(EstimatorConfig::new()
            .with_gamma1_reference(Gamma1Reference::Supplied(-0.1))
            .validate()
            .is_err());

        let bad_search = EliminationConfig::omega().with_min_tolerance(1.0);
        let err = EstimatorConfig::new()
            .with_omega_search(bad_search)
            .validate()
            .unwrap_err();
        assert!(err.starts_with("omega_search"));
    }

    #[test]
    fn test_elimination_validation() {
        assert!(EliminationConfig::kappa().validate().is_ok());
        assert!(EliminationConfig::omega().with_max_rounds(0).validate().is_err());
        assert!(EliminationConfig::omega()
            .with_truth_tolerance(Some(f64::NAN))
            .validate()
            .is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EstimatorConfig::new()
            .with_seed(7)
            .with_gamma1_reference(Gamma1Reference::Supplied(0.3));
        let json = config.to_json().unwrap();
        let back = EstimatorConfig::from_json(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_display() {
        let s = EliminationConfig::kappa().to_string();
        assert!(s.contains("truth±0.012"));
        assert!(EstimatorConfig::default().to_string().contains("ground-truth"));
    }
}
