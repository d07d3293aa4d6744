//! Core types for QEST
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Validated wrapper types shared by the dynamics, measurement and
//! estimation layers.

use crate::constants::protocol;
use crate::error::{QestError, QestResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Number of Bernoulli samples behind one empirical mean
/// Gantree: Samples // pub type Samples = u64
pub type Samples = u64;

/// Evolution time (dimensionless, same units as 1/ω)
pub type Duration = f64;

// ============================================================================
// Probability (Validated Wrapper)
// ============================================================================

/// Probability value in range [0, 1]
/// Gantree: Probability // 범위 검증 구조체
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probability(f64);

impl Probability {
    /// Create a new Probability with validation
    /// Gantree: new(f64) -> Result<Self> // 생성+검증
    pub fn new(value: f64) -> QestResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(QestError::InvalidProbability(value));
        }
        Ok(Self(value))
    }

    /// Clamp small numerical excursions back into [0, 1]
    ///
    /// Values further than [`protocol::PROBABILITY_SLACK`] outside the range,
    /// and NaN, are rejected.
    /// Gantree: clamped(f64) -> Result<Self> // 수치 오차 보정
    pub fn clamped(value: f64) -> QestResult<Self> {
        let slack = protocol::PROBABILITY_SLACK;
        if value.is_nan() || value < -slack || value > 1.0 + slack {
            return Err(QestError::InvalidProbability(value));
        }
        Ok(Self(value.clamp(0.0, 1.0)))
    }

    /// Get the probability value
    /// Gantree: value() -> f64 // 값 반환
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Get the complement (1 - p)
    #[inline]
    pub fn complement(&self) -> f64 {
        1.0 - self.0
    }

    /// Standard error of an n-sample Bernoulli mean
    pub fn standard_error(&self, samples: Samples) -> f64 {
        if samples == 0 {
            return f64::INFINITY;
        }
        (self.0 * (1.0 - self.0) / samples as f64).sqrt()
    }

    /// Zero probability
    pub const ZERO: Self = Self(0.0);

    /// Certainty (p = 1)
    pub const ONE: Self = Self(1.0);

    /// Half probability
    pub const HALF: Self = Self(0.5);
}

impl Default for Probability {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

impl TryFrom<f64> for Probability {
    type Error = QestError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

// ============================================================================
// BlochVector
// ============================================================================

/// Bloch-vector coordinates (x, y, z) of a single qubit
/// Gantree: BlochVector // 블로흐 벡터
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BlochVector {
    /// ⟨σx⟩
    pub x: f64,
    /// ⟨σy⟩
    pub y: f64,
    /// ⟨σz⟩
    pub z: f64,
}

impl BlochVector {
    /// |0⟩
    pub const KET_0: Self = Self::new(0.0, 0.0, 1.0);
    /// |1⟩
    pub const KET_1: Self = Self::new(0.0, 0.0, -1.0);
    /// |+⟩
    pub const KET_PLUS: Self = Self::new(1.0, 0.0, 0.0);
    /// |−⟩
    pub const KET_MINUS: Self = Self::new(-1.0, 0.0, 0.0);
    /// |+i⟩
    pub const KET_PLUS_I: Self = Self::new(0.0, 1.0, 0.0);
    /// |−i⟩
    pub const KET_MINUS_I: Self = Self::new(0.0, -1.0, 0.0);

    /// Create without validation
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create, rejecting non-finite coordinates
    pub fn try_new(x: f64, y: f64, z: f64) -> QestResult<Self> {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err(QestError::InvalidCoordinates { x, y, z });
        }
        Ok(Self { x, y, z })
    }

    /// Look up a named preset ("|0⟩", "|1⟩", "|+⟩", "|-⟩", "|i⟩", "|-i⟩")
    pub fn preset(label: &str) -> Option<Self> {
        match label {
            "|0⟩" => Some(Self::KET_0),
            "|1⟩" => Some(Self::KET_1),
            "|+⟩" => Some(Self::KET_PLUS),
            "|-⟩" | "|−⟩" => Some(Self::KET_MINUS),
            "|i⟩" | "|+i⟩" => Some(Self::KET_PLUS_I),
            "|-i⟩" | "|−i⟩" => Some(Self::KET_MINUS_I),
            _ => None,
        }
    }

    /// As [x, y, z]
    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// From [x, y, z]
    #[inline]
    pub fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    /// Euclidean norm (purity radius)
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Inside the closed unit ball within `tol`
    pub fn is_physical(&self, tol: f64) -> bool {
        self.norm() <= 1.0 + tol
    }

    /// Largest component-wise distance
    pub fn max_abs_diff(&self, other: &BlochVector) -> f64 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.z - other.z).abs())
    }
}

impl From<[f64; 3]> for BlochVector {
    fn from(v: [f64; 3]) -> Self {
        Self::from_array(v)
    }
}

impl From<(f64, f64, f64)> for BlochVector {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for BlochVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5}, {:.5})", self.x, self.y, self.z)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_valid() {
        assert!(Probability::new(0.0).is_ok());
        assert!(Probability::new(0.5).is_ok());
        assert!(Probability::new(1.0).is_ok());
    }

    #[test]
    fn test_probability_invalid() {
        assert!(Probability::new(-0.1).is_err());
        assert!(Probability::new(1.1).is_err());
    }

    #[test]
    fn test_probability_clamped() {
        assert_eq!(Probability::clamped(1.0 + 1e-9).unwrap(), Probability::ONE);
        assert_eq!(Probability::clamped(-1e-9).unwrap(), Probability::ZERO);
        assert!(Probability::clamped(1.01).is_err());
        assert!(Probability::clamped(f64::NAN).is_err());
    }

    #[test]
    fn test_probability_standard_error() {
        let p = Probability::new(0.5).unwrap();
        assert!((p.standard_error(10_000) - 0.005).abs() < 1e-12);
        assert!(p.standard_error(0).is_infinite());
    }

    #[test]
    fn test_presets() {
        assert_eq!(BlochVector::preset("|1⟩"), Some(BlochVector::KET_1));
        assert_eq!(BlochVector::preset("|i⟩"), Some(BlochVector::KET_PLUS_I));
        assert_eq!(BlochVector::preset("|2⟩"), None);
        for v in [
            BlochVector::KET_0,
            BlochVector::KET_1,
            BlochVector::KET_PLUS,
            BlochVector::KET_MINUS,
            BlochVector::KET_PLUS_I,
            BlochVector::KET_MINUS_I,
        ] {
            assert!((v.norm() - 1.0).abs() < 1e-15);
        }
    }

    #[test]
    fn test_bloch_try_new() {
        assert!(BlochVector::try_new(0.0, 1.0, 0.0).is_ok());
        assert!(BlochVector::try_new(f64::NAN, 0.0, 0.0).is_err());
        assert!(BlochVector::try_new(0.0, f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn test_bloch_display() {
        let v = BlochVector::new(0.0, 1.0, -0.5);
        assert_eq!(v.to_string(), "(0.00000, 1.00000, -0.50000)");
    }
}
