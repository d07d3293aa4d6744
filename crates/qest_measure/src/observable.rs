//! Observables and measurement bases
//!
//! Gantree: L2_Measure → Observable

use qest_core::{pauli, protocol, BlochVector, Matrix2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named Hermitian 2×2 observable
/// Gantree: Observable // 관측량
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observable {
    name: &'static str,
    matrix: Matrix2,
}

impl Observable {
    /// |1⟩⟨1|, used by every estimation protocol
    pub const EXCITED: Self = Self::new("E1", pauli::EXCITED_PROJECTOR);

    /// |0⟩⟨0|
    pub const GROUND: Self = Self::new("E0", pauli::GROUND_PROJECTOR);

    /// σz
    pub const SIGMA_Z: Self = Self::new("Z", pauli::SIGMA_Z);

    /// Create from a matrix
    pub const fn new(name: &'static str, matrix: Matrix2) -> Self {
        Self { name, matrix }
    }

    /// Name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Matrix
    pub fn matrix(&self) -> &Matrix2 {
        &self.matrix
    }

    /// Re Tr(O·ρ)
    pub fn expectation(&self, rho: &Matrix2) -> f64 {
        (self.matrix * *rho).trace().re
    }

    /// O = O† and O² = O within `tol`
    pub fn is_projector_like(&self, tol: f64) -> bool {
        self.matrix.is_hermitian(tol) && (self.matrix * self.matrix).approx_eq(&self.matrix, tol)
    }
}

impl fmt::Display for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Basis change applied to ρ before the trace
/// Gantree: Rotation // 측정 기저
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// Computational basis
    #[default]
    None,
    /// ρ' = U†ρU with U = exp(iθσx)
    AboutX(f64),
}

impl Rotation {
    /// U = exp(iπ/4·σx); with the excited projector this reads out (1 − y)/2
    pub const QUARTER_X: Self = Self::AboutX(protocol::ROTATION_ANGLE);

    /// ρ in the measurement frame
    pub fn apply(&self, rho: &Matrix2) -> Matrix2 {
        match self {
            Self::None => *rho,
            Self::AboutX(theta) => rho.conjugated_by(&Matrix2::exp_i_sigma_x(*theta)),
        }
    }

    /// Density matrix of `v` in the measurement frame
    pub fn frame(&self, v: &BlochVector) -> Matrix2 {
        self.apply(&Matrix2::density(v))
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "direct"),
            Self::AboutX(theta) => write!(f, "exp(i{:.4}σx)", theta),
        }
    }
}
