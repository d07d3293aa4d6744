//! Qubit physical parameters and control input
//!
//! Gantree: L0_Foundation → QubitParams
//!
//! `PhysicalParameters` holds ω, κ, γ₁, γ₂ and is only ever replaced, never
//! mutated. `ControlInput` holds the drive amplitude u.

use crate::constants::ranges;
use crate::error::{QestError, QestResult};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============================================================================
// Parameter Selector
// ============================================================================

/// One of the four physical parameters
/// Gantree: Parameter // 파라미터 선택자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    /// Transition frequency ω
    Omega,
    /// Drive coupling κ
    Kappa,
    /// Relaxation rate γ₁
    Gamma1,
    /// Dephasing rate γ₂
    Gamma2,
}

impl Parameter {
    /// All parameters in estimation order
    pub const ALL: [Parameter; 4] = [
        Parameter::Gamma1,
        Parameter::Kappa,
        Parameter::Gamma2,
        Parameter::Omega,
    ];

    /// Short ASCII name
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::Omega => "omega",
            Parameter::Kappa => "kappa",
            Parameter::Gamma1 => "gamma1",
            Parameter::Gamma2 => "gamma2",
        }
    }

    /// Greek symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Parameter::Omega => "ω",
            Parameter::Kappa => "κ",
            Parameter::Gamma1 => "γ₁",
            Parameter::Gamma2 => "γ₂",
        }
    }

    /// Read this parameter from a record
    pub fn get(&self, params: &PhysicalParameters) -> f64 {
        match self {
            Parameter::Omega => params.omega,
            Parameter::Kappa => params.kappa,
            Parameter::Gamma1 => params.gamma1,
            Parameter::Gamma2 => params.gamma2,
        }
    }

    /// Copy of `params` with this parameter replaced by `value`
    pub fn substitute(
        &self,
        params: &PhysicalParameters,
        value: f64,
    ) -> QestResult<PhysicalParameters> {
        let update = ParameterUpdate::default();
        let update = match self {
            Parameter::Omega => update.omega(value),
            Parameter::Kappa => update.kappa(value),
            Parameter::Gamma1 => update.gamma1(value),
            Parameter::Gamma2 => update.gamma2(value),
        };
        params.updated(&update)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ============================================================================
// PhysicalParameters
// ============================================================================

/// Decay and coupling parameters of the qubit under test
/// Gantree: PhysicalParameters // 큐비트 파라미터
///
/// Deserialization goes through `new`, so invalid records are refused.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicalParameters {
    /// Transition frequency ω
    /// Gantree: omega: f64 // 전이 주파수
    omega: f64,

    /// Drive coupling κ
    /// Gantree: kappa: f64 // 구동 결합
    kappa: f64,

    /// Relaxation rate γ₁
    /// Gantree: gamma1: f64 // 이완율
    gamma1: f64,

    /// Dephasing rate γ₂
    /// Gantree: gamma2: f64 // 위상 이완율
    gamma2: f64,
}

impl PhysicalParameters {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create with validation
    /// Gantree: new(ω,κ,γ1,γ2) -> Result<Self> // 생성+검증
    pub fn new(omega: f64, kappa: f64, gamma1: f64, gamma2: f64) -> QestResult<Self> {
        let params = Self {
            omega,
            kappa,
            gamma1,
            gamma2,
        };
        params.validate()?;
        Ok(params)
    }

    /// Uniform sample within the standard ranges
    /// Gantree: random(rng) -> Self // 무작위 생성
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            omega: rng.gen_range(ranges::OMEGA.0..ranges::OMEGA.1),
            kappa: rng.gen_range(ranges::KAPPA.0..ranges::KAPPA.1),
            gamma1: rng.gen_range(ranges::GAMMA1.0..ranges::GAMMA1.1),
            gamma2: rng.gen_range(ranges::GAMMA2.0..ranges::GAMMA2.1),
        }
    }

    /// Replace only the fields present in `update`
    /// Gantree: updated(&self,update) -> Result<Self> // 부분 갱신
    pub fn updated(&self, update: &ParameterUpdate) -> QestResult<Self> {
        Self::new(
            update.omega.unwrap_or(self.omega),
            update.kappa.unwrap_or(self.kappa),
            update.gamma1.unwrap_or(self.gamma1),
            update.gamma2.unwrap_or(self.gamma2),
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// ω
    #[inline]
    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// κ
    #[inline]
    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    /// γ₁
    #[inline]
    pub fn gamma1(&self) -> f64 {
        self.gamma1
    }

    /// γ₂
    #[inline]
    pub fn gamma2(&self) -> f64 {
        self.gamma2
    }

    /// [ω, κ, γ₁, γ₂]
    pub fn to_array(&self) -> [f64; 4] {
        [self.omega, self.kappa, self.gamma1, self.gamma2]
    }

    /// Transverse decay rate Γ = γ₁/2 + 2γ₂
    #[inline]
    pub fn transverse_decay(&self) -> f64 {
        0.5 * self.gamma1 + 2.0 * self.gamma2
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// All finite; decay rates non-negative
    pub fn validate(&self) -> QestResult<()> {
        for (param, value) in [
            (Parameter::Omega, self.omega),
            (Parameter::Kappa, self.kappa),
            (Parameter::Gamma1, self.gamma1),
            (Parameter::Gamma2, self.gamma2),
        ] {
            if !value.is_finite() {
                return Err(invalid(param, value, "must be finite"));
            }
        }
        if self.gamma1 < 0.0 {
            return Err(invalid(Parameter::Gamma1, self.gamma1, "decay rate must be >= 0"));
        }
        if self.gamma2 < 0.0 {
            return Err(invalid(Parameter::Gamma2, self.gamma2, "decay rate must be >= 0"));
        }
        Ok(())
    }

    /// Inside the standard sampling ranges
    pub fn is_typical(&self) -> bool {
        let inside = |(lo, hi): (f64, f64), v: f64| (lo..=hi).contains(&v);
        inside(ranges::OMEGA, self.omega)
            && inside(ranges::KAPPA, self.kappa)
            && inside(ranges::GAMMA1, self.gamma1)
            && inside(ranges::GAMMA2, self.gamma2)
    }
}

fn invalid(param: Parameter, value: f64, reason: &str) -> QestError {
    QestError::InvalidParameter {
        name: param.name().to_string(),
        value,
        reason: reason.to_string(),
    }
}

#[derive(Deserialize)]
struct RawParameters {
    omega: f64,
    kappa: f64,
    gamma1: f64,
    gamma2: f64,
}

impl<'de> Deserialize<'de> for PhysicalParameters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawParameters::deserialize(deserializer)?;
        Self::new(raw.omega, raw.kappa, raw.gamma1, raw.gamma2).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for PhysicalParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Qubit(omega={:.5}, kappa={:.5}, gamma1={:.5}, gamma2={:.5})",
            self.omega, self.kappa, self.gamma1, self.gamma2
        )
    }
}

// ============================================================================
// ParameterUpdate
// ============================================================================

/// Partial update: `None` fields keep their current value
/// Gantree: ParameterUpdate // 부분 갱신 요청
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterUpdate {
    /// New ω
    pub omega: Option<f64>,
    /// New κ
    pub kappa: Option<f64>,
    /// New γ₁
    pub gamma1: Option<f64>,
    /// New γ₂
    pub gamma2: Option<f64>,
}

impl ParameterUpdate {
    /// Set ω
    pub fn omega(mut self, value: f64) -> Self {
        self.omega = Some(value);
        self
    }

    /// Set κ
    pub fn kappa(mut self, value: f64) -> Self {
        self.kappa = Some(value);
        self
    }

    /// Set γ₁
    pub fn gamma1(mut self, value: f64) -> Self {
        self.gamma1 = Some(value);
        self
    }

    /// Set γ₂
    pub fn gamma2(mut self, value: f64) -> Self {
        self.gamma2 = Some(value);
        self
    }
}

// ============================================================================
// ControlInput
// ============================================================================

/// Drive amplitude u
/// Gantree: ControlInput // 제어 입력
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ControlInput {
    u: f64,
}

#[derive(Deserialize)]
struct RawControl {
    u: f64,
}

impl<'de> Deserialize<'de> for ControlInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawControl::deserialize(deserializer)?;
        Self::new(raw.u).map_err(serde::de::Error::custom)
    }
}

impl ControlInput {
    /// Create with validation (finite, >= 0)
    pub fn new(u: f64) -> QestResult<Self> {
        if !u.is_finite() || u < 0.0 {
            return Err(QestError::InvalidControl {
                protocol: "construction".to_string(),
                u,
                reason: "drive amplitude must be finite and >= 0".to_string(),
            });
        }
        Ok(Self { u })
    }

    /// No drive (u = 0)
    pub const fn idle() -> Self {
        Self { u: 0.0 }
    }

    /// Drive amplitude
    #[inline]
    pub fn u(&self) -> f64 {
        self.u
    }

    /// u == 0
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.u == 0.0
    }
}

impl fmt::Display for ControlInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Control(u={})", self.u)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample() -> PhysicalParameters {
        PhysicalParameters::new(2.0, 1.0, 0.3, 0.1).unwrap()
    }

    #[test]
    fn test_new_valid() {
        let p = sample();
        assert_eq!(p.to_array(), [2.0, 1.0, 0.3, 0.1]);
        assert!(p.is_typical());
    }

    #[test]
    fn test_new_rejects_negative_decay() {
        let err = PhysicalParameters::new(2.0, 1.0, -0.1, 0.1).unwrap_err();
        assert!(err.is_validation_error());
        assert!(err.to_string().contains("gamma1"));
        assert!(PhysicalParameters::new(2.0, 1.0, 0.1, -0.1).is_err());
    }

    #[test]
    fn test_new_rejects_non_finite() {
        assert!(PhysicalParameters::new(f64::NAN, 1.0, 0.1, 0.1).is_err());
        assert!(PhysicalParameters::new(1.0, f64::INFINITY, 0.1, 0.1).is_err());
    }

    #[test]
    fn test_random_within_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let p = PhysicalParameters::random(&mut rng);
            assert!(p.is_typical(), "{}", p);
            assert!(p.validate().is_ok());
        }
    }

    #[test]
    fn test_random_reproducible() {
        let a = PhysicalParameters::random(&mut ChaCha8Rng::seed_from_u64(42));
        let b = PhysicalParameters::random(&mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_partial_update() {
        let p = sample();
        let q = p.updated(&ParameterUpdate::default().kappa(1.7)).unwrap();
        assert_eq!(q.kappa(), 1.7);
        assert_eq!(q.omega(), p.omega());
        assert_eq!(q.gamma1(), p.gamma1());
        assert_eq!(q.gamma2(), p.gamma2());
        // source record untouched
        assert_eq!(p.kappa(), 1.0);
    }

    #[test]
    fn test_update_revalidates() {
        let p = sample();
        assert!(p.updated(&ParameterUpdate::default().gamma2(-1.0)).is_err());
    }

    #[test]
    fn test_substitute() {
        let p = sample();
        let q = Parameter::Omega.substitute(&p, 4.5).unwrap();
        assert_eq!(Parameter::Omega.get(&q), 4.5);
        assert_eq!(Parameter::Kappa.get(&q), 1.0);
    }

    #[test]
    fn test_transverse_decay() {
        let p = sample();
        assert!((p.transverse_decay() - (0.15 + 0.2)).abs() < 1e-15);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample().to_string(),
            "Qubit(omega=2.00000, kappa=1.00000, gamma1=0.30000, gamma2=0.10000)"
        );
    }

    #[test]
    fn test_control_validation() {
        assert!(ControlInput::new(0.0).unwrap().is_idle());
        assert_eq!(ControlInput::new(1000.0).unwrap().u(), 1000.0);
        assert!(ControlInput::new(-1.0).is_err());
        assert!(ControlInput::new(f64::NAN).is_err());
        assert_eq!(ControlInput::idle(), ControlInput::default());
    }

    #[test]
    fn test_deserialize_validates() {
        let p: PhysicalParameters =
            serde_json::from_str(r#"{"omega":2.0,"kappa":1.0,"gamma1":0.3,"gamma2":0.1}"#)
                .unwrap();
        assert_eq!(p, sample());

        let err = serde_json::from_str::<PhysicalParameters>(
            r#"{"omega":2.0,"kappa":1.0,"gamma1":-0.3,"gamma2":0.1}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("gamma1"));

        let u: ControlInput = serde_json::from_str(r#"{"u":1000.0}"#).unwrap();
        assert_eq!(u.u(), 1000.0);
        assert!(serde_json::from_str::<ControlInput>(r#"{"u":-1.0}"#).is_err());
    }
}
