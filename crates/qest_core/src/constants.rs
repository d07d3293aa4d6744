//! Constants for QEST
//!
//! Gantree: L0_Foundation → Constants
//!
//! Pauli matrices, physical parameter ranges, estimation protocol settings,
//! and solver tolerances. All values are frozen; components that need them
//! receive them explicitly.

// ============================================================================
// Pauli Constants
// Gantree: pauli // 파울리 행렬
// ============================================================================

pub mod pauli {
    //! Pauli basis and single-qubit projectors

    use crate::matrix::{Matrix2, C_I, C_NEG_I, C_NEG_ONE, C_ONE, C_ZERO};

    /// 2×2 identity
    pub const IDENTITY: Matrix2 = Matrix2::new([[C_ONE, C_ZERO], [C_ZERO, C_ONE]]);

    /// σx
    /// Gantree: SIGMA_X = [[0,1],[1,0]]
    pub const SIGMA_X: Matrix2 = Matrix2::new([[C_ZERO, C_ONE], [C_ONE, C_ZERO]]);

    /// σy
    /// Gantree: SIGMA_Y = [[0,-i],[i,0]]
    pub const SIGMA_Y: Matrix2 = Matrix2::new([[C_ZERO, C_NEG_I], [C_I, C_ZERO]]);

    /// σz
    /// Gantree: SIGMA_Z = [[1,0],[0,-1]]
    pub const SIGMA_Z: Matrix2 = Matrix2::new([[C_ONE, C_ZERO], [C_ZERO, C_NEG_ONE]]);

    /// Projector onto the excited state |1⟩⟨1|
    /// Gantree: E1 = [[0,0],[0,1]] // 여기 상태
    pub const EXCITED_PROJECTOR: Matrix2 = Matrix2::new([[C_ZERO, C_ZERO], [C_ZERO, C_ONE]]);

    /// Projector onto the ground state |0⟩⟨0|
    pub const GROUND_PROJECTOR: Matrix2 = Matrix2::new([[C_ONE, C_ZERO], [C_ZERO, C_ZERO]]);
}

// ============================================================================
// Parameter Ranges
// Gantree: ranges // 샘플링 범위
// ============================================================================

pub mod ranges {
    //! Uniform sampling ranges for random qubits (half-open, low..high)

    /// Transition frequency ω
    pub const OMEGA: (f64, f64) = (0.5, 5.0);

    /// Drive coupling κ
    pub const KAPPA: (f64, f64) = (0.1, 2.0);

    /// Relaxation rate γ₁
    pub const GAMMA1: (f64, f64) = (0.1, 1.0);

    /// Dephasing rate γ₂
    pub const GAMMA2: (f64, f64) = (0.01, 0.5);
}

// ============================================================================
// Protocol Constants
// Gantree: protocol // 추정 프로토콜
// ============================================================================

pub mod protocol {
    //! Durations, drives and alias ranges for the four estimators

    use std::f64::consts::FRAC_PI_4;

    /// Free-decay duration for the γ₁ protocol
    /// Gantree: GAMMA1_DURATION: f64 = 2.0
    pub const GAMMA1_DURATION: f64 = 2.0;

    /// Base duration t for the γ₂ protocol (measured at t and 2t)
    pub const GAMMA2_DURATION: f64 = 1.0;

    /// Precession duration for the ω protocol
    pub const OMEGA_DURATION: f64 = 1.0;

    /// Default drive amplitude for the κ protocol (probe time = 1/u)
    /// Gantree: KAPPA_DRIVE: f64 = 1000.0
    pub const KAPPA_DRIVE: f64 = 1000.0;

    /// Alias integers k for κ candidates (half-open)
    pub const KAPPA_ALIASES: (i32, i32) = (-5, 5);

    /// Alias integers k for ω candidates (half-open)
    pub const OMEGA_ALIASES: (i32, i32) = (-30, 30);

    /// Rotation angle about x for the rotated measurement
    pub const ROTATION_ANGLE: f64 = FRAC_PI_4;

    /// Initial acceptance tolerance of the elimination search
    /// Gantree: INITIAL_TOLERANCE: f64 = 0.15
    pub const INITIAL_TOLERANCE: f64 = 0.15;

    /// Final absolute check applied to the κ survivor
    /// Gantree: KAPPA_TRUTH_TOLERANCE: f64 = 0.012
    pub const KAPPA_TRUTH_TOLERANCE: f64 = 0.012;

    /// Tolerance floor below which the search gives up
    pub const MIN_TOLERANCE: f64 = 1e-9;

    /// Round cap of the elimination search
    pub const MAX_ROUNDS: usize = 64;

    /// Allowed excursion of a Born probability outside [0, 1] before it is
    /// rejected instead of clamped
    pub const PROBABILITY_SLACK: f64 = 1e-6;
}

// ============================================================================
// Solver Constants
// Gantree: solver // ODE 허용오차
// ============================================================================

pub mod solver {
    //! Defaults for the adaptive Dormand-Prince integrator

    /// Absolute tolerance
    pub const ABSTOL: f64 = 1e-10;

    /// Relative tolerance
    pub const RELTOL: f64 = 1e-8;

    /// Smallest step before the solver reports failure
    pub const MIN_STEP: f64 = 1e-14;

    /// Accepted + rejected step cap
    pub const MAX_STEPS: usize = 1_000_000;
}
