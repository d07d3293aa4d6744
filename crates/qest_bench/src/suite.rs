//! Trial suite for QEST
//!
//! Gantree: L4_Benchmark → BenchSuite
//!
//! Repeats estimation protocols over many qubits and collects accuracy,
//! failure and timing figures.

use crate::generators::QubitGenerator;
use qest_core::{Parameter, PhysicalParameters, QestResult, Samples};
use qest_estimate::{prepared_state, EstimatorConfig, Estimator, ProtocolPlan};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Single trial result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    /// Trial name
    pub name: String,

    /// Estimated parameter
    pub parameter: Parameter,

    /// Qubit under test
    pub qubit: PhysicalParameters,

    /// True value
    pub truth: f64,

    /// Estimate, when the protocol succeeded
    pub estimate: Option<f64>,

    /// Failure message, when it did not
    pub error: Option<String>,

    /// Failure was a search without a unique answer
    pub no_unique_solution: bool,

    /// Shots per mean
    pub samples: Samples,

    /// Estimator seed
    pub seed: u64,

    /// Execution time (milliseconds)
    pub time_ms: u64,
}

impl TrialResult {
    /// Protocol produced a value
    pub fn succeeded(&self) -> bool {
        self.estimate.is_some()
    }

    /// |estimate − truth|
    pub fn abs_error(&self) -> Option<f64> {
        self.estimate.map(|v| (v - self.truth).abs())
    }

    /// |estimate − truth| / |truth|; the absolute error when truth is zero
    pub fn rel_error(&self) -> Option<f64> {
        self.abs_error().map(|e| {
            if self.truth.abs() < 1e-12 {
                e
            } else {
                e / self.truth.abs()
            }
        })
    }
}

/// Trial suite
/// Gantree: BenchSuite // 시행 스위트
pub struct BenchSuite {
    /// Base seed for reproducibility
    seed: u64,

    /// Estimator configuration (seed is overridden per trial)
    config: EstimatorConfig,

    /// Results
    results: Vec<TrialResult>,

    /// Verbose output
    verbose: bool,
}

impl BenchSuite {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create new suite
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    /// Create with seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            config: EstimatorConfig::default(),
            results: Vec::new(),
            verbose: false,
        }
    }

    /// Builder: estimator configuration
    pub fn with_config(mut self, config: EstimatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    // ========================================================================
    // Individual Trials
    // ========================================================================

    /// Run one protocol against one qubit
    ///
    /// Estimation failures are recorded in the result; only an invalid
    /// configuration is returned as an error.
    pub fn trial(
        &mut self,
        name: &str,
        qubit: &PhysicalParameters,
        plan: ProtocolPlan,
    ) -> QestResult<TrialResult> {
        let seed = self.seed.wrapping_add(self.results.len() as u64);
        if self.verbose {
            log::info!("Running trial: {} ({}, seed={})", name, plan, seed);
        }

        let config = self.config.clone().with_seed(seed);
        let mut estimator = Estimator::new(prepared_state(plan.parameter), config)?;

        let start = Instant::now();
        let outcome = estimator.estimate(plan.parameter, qubit, plan.control, plan.samples);
        let time_ms = start.elapsed().as_millis() as u64;

        let (estimate, error, no_unique_solution) = match outcome {
            Ok(e) => (Some(e.value), None, false),
            Err(e) => (None, Some(e.to_string()), e.is_no_unique_solution()),
        };
        let result = TrialResult {
            name: name.to_string(),
            parameter: plan.parameter,
            qubit: *qubit,
            truth: plan.parameter.get(qubit),
            estimate,
            error,
            no_unique_solution,
            samples: plan.samples,
            seed,
            time_ms,
        };
        log::debug!("{}: {:?} in {} ms", name, result.estimate, time_ms);

        self.results.push(result.clone());
        Ok(result)
    }

    // ========================================================================
    // Trial Series
    // ========================================================================

    /// `trials` random qubits, one protocol each
    pub fn run_random(
        &mut self,
        parameter: Parameter,
        trials: usize,
        samples: Samples,
    ) -> QestResult<Vec<TrialResult>> {
        if self.verbose {
            log::info!("=== Random Qubits: {} x{} ===", parameter, trials);
        }

        let plan = ProtocolPlan::standard(parameter)?.with_samples(samples);
        let qubits = QubitGenerator::with_seed(self.seed).random_batch(trials);

        qubits
            .iter()
            .enumerate()
            .map(|(i, q)| self.trial(&format!("random_{}_{}", parameter.name(), i), q, plan))
            .collect()
    }

    /// One qubit, increasing shot counts
    pub fn run_sample_scaling(
        &mut self,
        parameter: Parameter,
        qubit: &PhysicalParameters,
        sample_counts: &[Samples],
    ) -> QestResult<Vec<TrialResult>> {
        if self.verbose {
            log::info!("=== Sample Scaling: {} ===", parameter);
        }

        let plan = ProtocolPlan::standard(parameter)?;
        sample_counts
            .iter()
            .map(|&n| {
                let name = format!("samples_{}_{}", parameter.name(), n);
                self.trial(&name, qubit, plan.with_samples(n))
            })
            .collect()
    }

    /// `base` swept over `values` of `parameter`, estimating that parameter
    pub fn run_sweep(
        &mut self,
        parameter: Parameter,
        base: &PhysicalParameters,
        values: &[f64],
        samples: Samples,
    ) -> QestResult<Vec<TrialResult>> {
        if self.verbose {
            log::info!("=== Sweep: {} over {} values ===", parameter, values.len());
        }

        let plan = ProtocolPlan::standard(parameter)?.with_samples(samples);
        let qubits = QubitGenerator::sweep(base, parameter, values)?;
        qubits
            .iter()
            .map(|q| {
                let name = format!("sweep_{}_{:.3}", parameter.name(), parameter.get(q));
                self.trial(&name, q, plan)
            })
            .collect()
    }

    /// Random trials for every parameter
    pub fn run_all(&mut self, trials: usize, samples: Samples) -> QestResult<Vec<TrialResult>> {
        if self.verbose {
            log::info!("=== Running Full Trial Suite ===");
        }

        let mut all_results = Vec::new();
        for parameter in Parameter::ALL {
            all_results.extend(self.run_random(parameter, trials, samples)?);
        }
        Ok(all_results)
    }

    /// Reference qubit, closed-form protocols only
    pub fn run_quick(&mut self) -> QestResult<Vec<TrialResult>> {
        if self.verbose {
            log::info!("=== Running Quick Trials ===");
        }

        let qubit = QubitGenerator::reference()?;
        let gamma1 = ProtocolPlan::standard(Parameter::Gamma1)?;
        let gamma2 = ProtocolPlan::standard(Parameter::Gamma2)?;

        Ok(vec![
            self.trial("quick_gamma1", &qubit, gamma1)?,
            self.trial("quick_gamma2", &qubit, gamma2)?,
        ])
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// Get all results
    pub fn results(&self) -> &[TrialResult] {
        &self.results
    }

    /// Clear results
    pub fn clear(&mut self) {
        self.results.clear();
    }

    /// Statistics over all results
    pub fn statistics(&self) -> TrialStatistics {
        TrialStatistics::from_results(&self.results)
    }

    /// Statistics per parameter, for parameters with at least one trial
    pub fn statistics_by_parameter(&self) -> Vec<(Parameter, TrialStatistics)> {
        by_parameter(&self.results)
    }
}

impl Default for BenchSuite {
    fn default() -> Self {
        Self::new()
    }
}

/// Group `results` by parameter in estimation order
pub fn by_parameter(results: &[TrialResult]) -> Vec<(Parameter, TrialStatistics)> {
    Parameter::ALL
        .iter()
        .filter_map(|&p| {
            let subset: Vec<TrialResult> = results
                .iter()
                .filter(|r| r.parameter == p)
                .cloned()
                .collect();
            (!subset.is_empty()).then(|| (p, TrialStatistics::from_results(&subset)))
        })
        .collect()
}

/// Trial statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialStatistics {
    /// Number of trials
    pub count: usize,

    /// Trials that produced a value
    pub successes: usize,

    /// successes / count
    pub success_rate: f64,

    /// Failures without a unique answer
    pub no_unique_count: usize,

    /// Mean |estimate − truth| over successes
    pub mean_abs_error: f64,

    /// Standard deviation of |estimate − truth| over successes
    pub std_abs_error: f64,

    /// Largest |estimate − truth|
    pub max_abs_error: f64,

    /// Mean relative error over successes
    pub mean_rel_error: f64,

    /// Average execution time (ms)
    pub avg_time_ms: f64,

    /// Total execution time (ms)
    pub total_time_ms: u64,
}

impl TrialStatistics {
    /// Compute statistics from results
    pub fn from_results(results: &[TrialResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }

        let count = results.len();
        let errors: Vec<f64> = results.iter().filter_map(|r| r.abs_error()).collect();
        let rel_errors: Vec<f64> = results.iter().filter_map(|r| r.rel_error()).collect();
        let no_unique_count = results.iter().filter(|r| r.no_unique_solution).count();
        let total_time_ms: u64 = results.iter().map(|r| r.time_ms).sum();

        let successes = errors.len();
        let mean = |xs: &[f64]| {
            if xs.is_empty() {
                0.0
            } else {
                xs.iter().sum::<f64>() / xs.len() as f64
            }
        };
        let mean_abs_error = mean(&errors);
        let std_abs_error = if successes > 1 {
            let var = errors
                .iter()
                .map(|e| (e - mean_abs_error).powi(2))
                .sum::<f64>()
                / (successes - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };

        Self {
            count,
            successes,
            success_rate: successes as f64 / count as f64,
            no_unique_count,
            mean_abs_error,
            std_abs_error,
            max_abs_error: errors.iter().cloned().fold(0.0, f64::max),
            mean_rel_error: mean(&rel_errors),
            avg_time_ms: total_time_ms as f64 / count as f64,
            total_time_ms,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn result(parameter: Parameter, truth: f64, estimate: Option<f64>) -> TrialResult {
        TrialResult {
            name: "t".to_string(),
            parameter,
            qubit: QubitGenerator::reference().unwrap(),
            truth,
            estimate,
            error: estimate.is_none().then(|| "no unique".to_string()),
            no_unique_solution: estimate.is_none(),
            samples: 100,
            seed: 0,
            time_ms: 4,
        }
    }

    #[test]
    fn test_bench_suite_new() {
        let suite = BenchSuite::new();
        assert!(suite.results().is_empty());
        assert_eq!(suite.statistics().count, 0);
    }

    #[test]
    fn test_statistics() {
        let results = vec![
            result(Parameter::Kappa, 1.0, Some(1.01)),
            result(Parameter::Kappa, 1.0, Some(0.97)),
            result(Parameter::Kappa, 1.0, None),
        ];
        let stats = TrialStatistics::from_results(&results);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.successes, 2);
        assert_eq!(stats.no_unique_count, 1);
        assert_relative_eq!(stats.success_rate, 2.0 / 3.0);
        assert_relative_eq!(stats.mean_abs_error, 0.02, epsilon = 1e-12);
        assert_relative_eq!(stats.max_abs_error, 0.03, epsilon = 1e-12);
        assert_relative_eq!(stats.std_abs_error, 0.0002_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(stats.total_time_ms, 12);
    }

    #[test]
    fn test_rel_error_zero_truth() {
        let dephasing_free = result(Parameter::Gamma2, 0.0, Some(0.004));
        assert_relative_eq!(dephasing_free.rel_error().unwrap(), 0.004);

        let stats = TrialStatistics::from_results(&[dephasing_free]);
        assert!(stats.mean_rel_error.is_finite());

        let regular = result(Parameter::Gamma2, 0.2, Some(0.19));
        assert_relative_eq!(regular.rel_error().unwrap(), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_by_parameter_order() {
        let results = vec![
            result(Parameter::Omega, 2.0, Some(2.0)),
            result(Parameter::Gamma1, 0.3, Some(0.31)),
        ];
        let groups = by_parameter(&results);
        let order: Vec<Parameter> = groups.iter().map(|(p, _)| *p).collect();
        assert_eq!(order, vec![Parameter::Gamma1, Parameter::Omega]);
    }

    #[test]
    fn test_quick_trials() {
        let mut suite = BenchSuite::with_seed(42);
        let results = suite.run_quick().unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.succeeded()));
        assert!(results[0].abs_error().unwrap() < 0.02);
        assert_ne!(results[0].seed, results[1].seed);
        assert_eq!(suite.results().len(), 2);
    }

    #[test]
    fn test_sample_scaling_names() {
        let mut suite = BenchSuite::with_seed(1);
        let qubit = QubitGenerator::reference().unwrap();
        let results = suite
            .run_sample_scaling(Parameter::Gamma2, &qubit, &[1000, 10_000])
            .unwrap();

        assert_eq!(results[0].name, "samples_gamma2_1000");
        assert_eq!(results[1].samples, 10_000);
        suite.clear();
        assert!(suite.results().is_empty());
    }

    #[test]
    fn test_random_reproducible() {
        let run = || {
            BenchSuite::with_seed(7)
                .run_random(Parameter::Gamma1, 2, 100_000)
                .unwrap()
                .into_iter()
                .map(|r| (r.truth, r.estimate))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
