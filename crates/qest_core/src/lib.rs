//! # QEST Core
//!
//! Core types, constants, and qubit parameters for the QEST qubit
//! parameter estimator.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qest_core // L0: Foundation (완료)
//!     CoreTypes // 핵심 타입 (완료)
//!         Probability, BlochVector, Samples
//!     Constants // 파울리/범위/프로토콜 상수 (완료)
//!     Errors // 에러 타입 (완료)
//!     Matrix2 // 2x2 복소 행렬 (완료)
//!         density(), exp_i_sigma_x(), conjugated_by()
//!     QubitParams // 큐비트 파라미터 (완료)
//!         PhysicalParameters, ParameterUpdate, Parameter
//!         ControlInput
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qest_core::prelude::*;
//!
//! let qubit = PhysicalParameters::new(2.0, 1.0, 0.3, 0.1).unwrap();
//! let control = ControlInput::idle();
//!
//! // Replace a single field
//! let detuned = qubit
//!     .updated(&ParameterUpdate::default().omega(2.5))
//!     .unwrap();
//! assert_eq!(detuned.omega(), 2.5);
//! assert_eq!(detuned.kappa(), qubit.kappa());
//! assert!(control.is_idle());
//! ```
//!
//! ## Density Matrices
//!
//! ```rust
//! use qest_core::prelude::*;
//!
//! let rho = Matrix2::density(&BlochVector::KET_1);
//! let p = (pauli::EXCITED_PROJECTOR * rho).trace().re;
//! assert!((p - 1.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// 2×2 complex matrices (Gantree: L0_Foundation → Matrix2)
pub mod matrix;

/// Qubit parameters and control (Gantree: L0_Foundation → QubitParams)
pub mod params;

// ============================================================================
// Re-exports
// ============================================================================

pub use constants::{pauli, protocol, ranges, solver};
pub use error::{QestError, QestResult};
pub use matrix::Matrix2;
pub use params::{ControlInput, Parameter, ParameterUpdate, PhysicalParameters};
pub use types::{BlochVector, Duration, Probability, Samples};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qest_core::prelude::*;
    //! ```

    pub use crate::constants::{pauli, protocol, ranges, solver};
    pub use crate::error::{QestError, QestResult};
    pub use crate::matrix::Matrix2;
    pub use crate::params::{ControlInput, Parameter, ParameterUpdate, PhysicalParameters};
    pub use crate::types::{BlochVector, Duration, Probability, Samples};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================
