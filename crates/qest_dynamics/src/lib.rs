//! # QEST Dynamics
//!
//! Bloch-equation evolution of a single qubit under relaxation, dephasing,
//! free precession and a transverse drive.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qest_dynamics // L1: Dynamics (완료)
//!     Generator // J, b 생성 (완료)
//!         new(), rhs(), fixed_point()
//!     Solver // Dormand-Prince 5(4) (완료)
//!         SolverOptions, SolverStats
//!         integrate()
//!     QuantumState // 상태 + 초기값 기억 (완료)
//!         new(), coordinates(), evolve(), evolved(), reset()
//!         trace() -> Trajectory
//!         propagate()
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qest_dynamics::prelude::*;
//! use qest_core::{ControlInput, PhysicalParameters};
//!
//! let qubit = PhysicalParameters::new(2.0, 1.0, 0.3, 0.1).unwrap();
//! let mut state = QuantumState::new(0.0, 0.0, -1.0).unwrap();
//!
//! state.evolve(&qubit, &ControlInput::idle(), 2.0).unwrap();
//! let z = state.coordinates().z;
//! assert!((z - (1.0 - 2.0 * (-0.6f64).exp())).abs() < 1e-6);
//!
//! state.reset();
//! assert_eq!(state.coordinates().z, -1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Bloch generator (Gantree: L1_Dynamics → Generator)
pub mod generator;

/// Adaptive integrator (Gantree: L1_Dynamics → Solver)
pub mod solver;

/// Evolving state (Gantree: L1_Dynamics → QuantumState)
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use generator::Generator;
pub use solver::{integrate, SolverOptions, SolverStats};
pub use state::{propagate, QuantumState, Trajectory};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qest_dynamics::prelude::*;
    //! ```

    pub use crate::generator::Generator;
    pub use crate::solver::{SolverOptions, SolverStats};
    pub use crate::state::{propagate, QuantumState, Trajectory};
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use qest_core::{BlochVector, ControlInput, PhysicalParameters};

    #[test]
    fn test_relaxes_to_fixed_point() {
        let qubit = PhysicalParameters::new(1.3, 0.6, 0.8, 0.2).unwrap();
        let control = ControlInput::new(1.5).unwrap();
        let target = Generator::new(&qubit, &control).fixed_point().unwrap();

        let mut state = QuantumState::prepared(BlochVector::KET_PLUS);
        state.evolve(&qubit, &control, 60.0).unwrap();

        let v = state.coordinates();
        assert!(v.max_abs_diff(&target) < 1e-6, "{} vs {}", v, target);
    }

    #[test]
    fn test_decay_shrinks_norm() {
        let qubit = PhysicalParameters::new(2.0, 1.0, 0.0, 0.25).unwrap();
        let mut state = QuantumState::prepared(BlochVector::KET_PLUS_I);
        state.evolve(&qubit, &ControlInput::idle(), 1.0).unwrap();

        // Pure dephasing: radius e^{-2γ₂ t}
        assert!((state.coordinates().norm() - (-0.5f64).exp()).abs() < 1e-7);
    }

    #[test]
    fn test_split_evolution_matches_single() {
        let qubit = PhysicalParameters::new(2.5, 1.1, 0.4, 0.05).unwrap();
        let control = ControlInput::idle();

        let mut split = QuantumState::prepared(BlochVector::KET_PLUS_I);
        split.evolve(&qubit, &control, 0.4).unwrap();
        split.evolve(&qubit, &control, 0.6).unwrap();

        let whole = propagate(
            &qubit,
            &control,
            BlochVector::KET_PLUS_I,
            1.0,
            &SolverOptions::default(),
        )
        .unwrap();

        assert!(split.coordinates().max_abs_diff(&whole) < 1e-7);
    }

    #[test]
    fn test_tighter_tolerance_takes_more_steps() {
        let qubit = PhysicalParameters::new(3.0, 1.0, 0.2, 0.1).unwrap();
        let control = ControlInput::idle();
        let loose = SolverOptions::new().with_tolerances(1e-6, 1e-4);
        let tight = SolverOptions::new().with_tolerances(1e-12, 1e-10);

        let mut a = QuantumState::prepared(BlochVector::KET_PLUS);
        let mut b = a;
        let sa = a.evolve_with(&qubit, &control, 5.0, &loose).unwrap();
        let sb = b.evolve_with(&qubit, &control, 5.0, &tight).unwrap();

        assert!(sb.n_steps > sa.n_steps);
        assert!(a.coordinates().max_abs_diff(&b.coordinates()) < 1e-3);
    }
}
