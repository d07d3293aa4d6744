//! # QEST Measure
//!
//! Readout model for synthetic qubit experiments: observables, measurement
//! frames, finite-shot Bernoulli sampling and forward simulation.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qest_measure // L2: Measurement (완료)
//!     Observable // 관측량 상수 (완료)
//!         EXCITED, GROUND, SIGMA_Z
//!         Rotation::None, Rotation::QUARTER_X
//!     Sampler // 베르누이 샘플링 (완료)
//!         sample_successes(), sample_mean()
//!     Observer // 측정기 (완료)
//!         probability(), measure(), record() -> Measurement
//!     ForwardModel // 순방향 시뮬레이션 (완료)
//!         Simulator trait: simulate(), simulate_all()
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qest_measure::prelude::*;
//! use qest_core::{BlochVector, ControlInput, PhysicalParameters};
//! use qest_dynamics::QuantumState;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let qubit = PhysicalParameters::new(2.0, 1.0, 0.3, 0.1).unwrap();
//! let mut state = QuantumState::prepared(BlochVector::KET_1);
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//!
//! let mean = Observer::excited()
//!     .measure(&mut state, &qubit, &ControlInput::idle(), 2.0, 100_000, &mut rng)
//!     .unwrap();
//! assert!((mean - (-0.6f64).exp()).abs() < 0.01);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Observables and frames (Gantree: L2_Measure → Observable)
pub mod observable;

/// Bernoulli sampling (Gantree: L2_Measure → Sampler)
pub mod sampler;

/// Measurement model (Gantree: L2_Measure → Observer)
pub mod observer;

/// Forward simulation (Gantree: L2_Measure → ForwardModel)
pub mod simulation;

// ============================================================================
// Re-exports
// ============================================================================

pub use observable::{Observable, Rotation};
pub use observer::{Measurement, Observer};
pub use sampler::{sample_mean, sample_successes};
pub use simulation::{ForwardModel, Simulator};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qest_measure::prelude::*;
    //! ```

    pub use crate::observable::{Observable, Rotation};
    pub use crate::observer::{Measurement, Observer};
    pub use crate::sampler::sample_mean;
    pub use crate::simulation::{ForwardModel, Simulator};
}

// ============================================================================
// Integration Tests
// ============================================================================
