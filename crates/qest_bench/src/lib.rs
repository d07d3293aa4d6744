//! # QEST Bench
//!
//! Repeated estimation trials over random, reference and swept qubits,
//! with per-parameter accuracy statistics and report rendering.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qest_bench // L4: Benchmark (완료)
//!     QubitGenerator // 큐비트 생성 (완료)
//!         reference(), random_batch(), sweep()
//!     BenchSuite // 시행 스위트 (완료)
//!         trial(), run_random(), run_sample_scaling(), run_sweep()
//!         statistics() -> TrialStatistics
//!     Reporter // 결과 리포팅 (완료)
//!         Markdown, Json, Csv, Text
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qest_bench::prelude::*;
//!
//! // γ₁ and γ₂ on the reference qubit
//! let mut suite = BenchSuite::with_seed(42);
//! let results = suite.run_quick().unwrap();
//!
//! let report = Reporter::to_markdown(&results);
//! assert!(report.contains("γ₁"));
//! ```
//!
//! ## Random Qubits
//!
//! ```rust,no_run
//! use qest_bench::prelude::*;
//! use qest_core::Parameter;
//!
//! let mut suite = BenchSuite::with_seed(42).verbose();
//! suite.run_random(Parameter::Kappa, 20, 100_000).unwrap();
//!
//! for (parameter, stats) in suite.statistics_by_parameter() {
//!     println!("{}: {:.1}% succeeded", parameter, stats.success_rate * 100.0);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Qubit generators (Gantree: L4_Benchmark → Generators)
pub mod generators;

/// Trial suite (Gantree: L4_Benchmark → BenchSuite)
pub mod suite;

/// Reporting (Gantree: L4_Benchmark → Reporter)
pub mod reporter;

// ============================================================================
// Re-exports
// ============================================================================

pub use generators::QubitGenerator;
pub use reporter::{ReportFormat, Reporter};
pub use suite::{by_parameter, BenchSuite, TrialResult, TrialStatistics};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qest_bench::prelude::*;
    //! ```

    pub use crate::generators::QubitGenerator;
    pub use crate::reporter::{ReportFormat, Reporter};
    pub use crate::suite::{BenchSuite, TrialResult, TrialStatistics};
}

// ============================================================================
// Integration Tests
// ============================================================================
