//! # QEST Estimate
//!
//! Recovers ω, κ, γ₁ and γ₂ of a simulated qubit from finite-shot readouts.
//! γ₁ and γ₂ follow from closed-form inversions; κ and ω are fixed only up to
//! aliases by a single cosine readout and are settled by an elimination
//! search that compares forward simulations of every alias with the qubit
//! under test.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qest_estimate // L3: Estimation (완료)
//!     EstimatorConfig // 설정 (완료)
//!         EliminationConfig, Gamma1Reference
//!     CandidateSet // 후보 집합 (완료)
//!         principal_angle(), from_principal_angle()
//!     EliminationSearch // 소거 탐색 (완료)
//!         run() -> EliminationOutcome { estimate, rounds }
//!     Estimator // 추정기 (완료)
//!         estimate_gamma1(), estimate_gamma2()
//!         estimate_kappa(), estimate_omega()
//!         estimate() -> Estimate
//!     Protocol // 프로토콜 프리셋 (완료)
//!         preparation(), ProtocolPlan
//!     EstimationSuite // 전체 실행 (완료)
//!         run() -> SuiteReport
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qest_estimate::prelude::*;
//! use qest_core::{BlochVector, ControlInput, PhysicalParameters};
//! use qest_dynamics::QuantumState;
//!
//! let qubit = PhysicalParameters::new(2.0, 1.0, 0.3, 0.1).unwrap();
//! let config = EstimatorConfig::new().with_seed(42);
//! let mut estimator = Estimator::new(QuantumState::prepared(BlochVector::KET_1), config).unwrap();
//!
//! let gamma1 = estimator
//!     .estimate_gamma1(&qubit, ControlInput::idle(), 1_000_000)
//!     .unwrap();
//! assert!((gamma1 - 0.3).abs() < 0.02);
//! ```
//!
//! ## Full Suite
//!
//! ```rust,no_run
//! use qest_estimate::prelude::*;
//! use qest_core::PhysicalParameters;
//!
//! let qubit = PhysicalParameters::new(2.0, 1.0, 0.3, 0.1).unwrap();
//! let report = EstimationSuite::new(EstimatorConfig::new().with_seed(7))
//!     .unwrap()
//!     .run(&qubit)
//!     .unwrap();
//! println!("{}", report);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Configuration (Gantree: L3_Estimate → EstimatorConfig)
pub mod config;

/// Candidate sets (Gantree: L3_Estimate → CandidateSet)
pub mod candidates;

/// Elimination search (Gantree: L3_Estimate → EliminationSearch)
pub mod elimination;

/// Estimators (Gantree: L3_Estimate → Estimator)
pub mod estimator;

/// Protocol presets (Gantree: L3_Estimate → Protocol)
pub mod protocol;

/// Suite runner (Gantree: L3_Estimate → EstimationSuite)
pub mod suite;

// ============================================================================
// Re-exports
// ============================================================================

pub use candidates::{principal_angle, CandidateSet};
pub use config::{EliminationConfig, EstimatorConfig, Gamma1Reference};
pub use elimination::{EliminationOutcome, EliminationSearch, RoundRecord};
pub use estimator::{gamma1_from_probability, gamma2_from_means, Estimate, Estimator};
pub use protocol::{preparation, prepared_state, ProtocolPlan};
pub use suite::{EstimationSuite, ParameterOutcome, SuiteReport};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qest_estimate::prelude::*;
    //! ```

    pub use crate::candidates::CandidateSet;
    pub use crate::config::{EliminationConfig, EstimatorConfig, Gamma1Reference};
    pub use crate::elimination::{EliminationOutcome, EliminationSearch};
    pub use crate::estimator::{Estimate, Estimator};
    pub use crate::protocol::{preparation, ProtocolPlan};
    pub use crate::suite::{EstimationSuite, SuiteReport};
}

// ============================================================================
// Integration Tests
// ============================================================================
