//! 2×2 complex matrices
//!
//! Gantree: L0_Foundation → Matrix2
//!
//! Density matrices, observables and single-qubit unitaries all live in
//! this one fixed-size type.

use crate::constants::pauli;
use crate::types::BlochVector;
use num_complex::Complex64;
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// 0
pub const C_ZERO: Complex64 = Complex64::new(0.0, 0.0);
/// 1
pub const C_ONE: Complex64 = Complex64::new(1.0, 0.0);
/// -1
pub const C_NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);
/// i
pub const C_I: Complex64 = Complex64::new(0.0, 1.0);
/// -i
pub const C_NEG_I: Complex64 = Complex64::new(0.0, -1.0);

/// Row-major 2×2 complex matrix
/// Gantree: Matrix2 // 2x2 복소 행렬
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix2 {
    m: [[Complex64; 2]; 2],
}

impl Matrix2 {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create from rows
    pub const fn new(m: [[Complex64; 2]; 2]) -> Self {
        Self { m }
    }

    /// Zero matrix
    pub const fn zero() -> Self {
        Self::new([[C_ZERO, C_ZERO], [C_ZERO, C_ZERO]])
    }

    /// Density matrix ρ = ½(I + xσx + yσy + zσz)
    /// Gantree: density(v) -> Matrix2 // 밀도 행렬
    pub fn density(v: &BlochVector) -> Self {
        (pauli::IDENTITY + pauli::SIGMA_X * v.x + pauli::SIGMA_Y * v.y + pauli::SIGMA_Z * v.z)
            * 0.5
    }

    /// exp(iθσx) = cos θ·I + i sin θ·σx
    ///
    /// Closed form because σx² = I.
    pub fn exp_i_sigma_x(theta: f64) -> Self {
        let c = Complex64::new(theta.cos(), 0.0);
        let s = Complex64::new(0.0, theta.sin());
        Self::new([[c, s], [s, c]])
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Entry at (row, col)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.m[row][col]
    }

    /// Trace
    #[inline]
    pub fn trace(&self) -> Complex64 {
        self.m[0][0] + self.m[1][1]
    }

    /// Conjugate transpose
    pub fn dagger(&self) -> Self {
        Self::new([
            [self.m[0][0].conj(), self.m[1][0].conj()],
            [self.m[0][1].conj(), self.m[1][1].conj()],
        ])
    }

    /// U†·M·U
    pub fn conjugated_by(&self, unitary: &Matrix2) -> Self {
        unitary.dagger() * *self * *unitary
    }

    /// Bloch components (Tr ρσx, Tr ρσy, Tr ρσz)
    pub fn bloch_components(&self) -> BlochVector {
        BlochVector {
            x: (pauli::SIGMA_X * *self).trace().re,
            y: (pauli::SIGMA_Y * *self).trace().re,
            z: (pauli::SIGMA_Z * *self).trace().re,
        }
    }

    // ========================================================================
    // Predicates
    // ========================================================================

    /// Entry-wise comparison within `tol`
    pub fn approx_eq(&self, other: &Matrix2, tol: f64) -> bool {
        (0..2).all(|r| (0..2).all(|c| (self.m[r][c] - other.m[r][c]).norm() <= tol))
    }

    /// M == M† within `tol`
    pub fn is_hermitian(&self, tol: f64) -> bool {
        self.approx_eq(&self.dagger(), tol)
    }

    /// M·M† == I within `tol`
    pub fn is_unitary(&self, tol: f64) -> bool {
        (*self * self.dagger()).approx_eq(&pauli::IDENTITY, tol)
    }
}

impl Default for Matrix2 {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Matrix2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        let mut m = self.m;
        for (r, row) in m.iter_mut().enumerate() {
            for (c, entry) in row.iter_mut().enumerate() {
                *entry += other.m[r][c];
            }
        }
        Self::new(m)
    }
}

impl Sub for Matrix2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        self + other * -1.0
    }
}

impl Mul for Matrix2 {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        let a = &self.m;
        let b = &other.m;
        Self::new([
            [
                a[0][0] * b[0][0] + a[0][1] * b[1][0],
                a[0][0] * b[0][1] + a[0][1] * b[1][1],
            ],
            [
                a[1][0] * b[0][0] + a[1][1] * b[1][0],
                a[1][0] * b[0][1] + a[1][1] * b[1][1],
            ],
        ])
    }
}

impl Mul<f64> for Matrix2 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        let mut m = self.m;
        for entry in m.iter_mut().flatten() {
            *entry *= scalar;
        }
        Self::new(m)
    }
}

impl Mul<Complex64> for Matrix2 {
    type Output = Self;
    fn mul(self, scalar: Complex64) -> Self {
        let mut m = self.m;
        for entry in m.iter_mut().flatten() {
            *entry *= scalar;
        }
        Self::new(m)
    }
}

impl fmt::Display for Matrix2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[[{:.4}, {:.4}], [{:.4}, {:.4}]]",
            self.m[0][0], self.m[0][1], self.m[1][0], self.m[1][1]
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
