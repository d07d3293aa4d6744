//! Estimation suite
//!
//! Gantree: L3_Estimate → EstimationSuite
//!
//! Runs the four protocols against one qubit, each from its own
//! preparation, and collects per-parameter results. A failing protocol is
//! recorded and does not stop the others.

use crate::config::{EstimatorConfig, Gamma1Reference};
use crate::estimator::Estimator;
use crate::protocol::{prepared_state, ProtocolPlan};
use qest_core::{Parameter, PhysicalParameters, QestError, QestResult, Samples};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Report Types
// ============================================================================

/// Result of one protocol inside a suite run
/// Gantree: ParameterOutcome // 파라미터 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterOutcome {
    /// Target parameter
    pub parameter: Parameter,

    /// True value
    pub truth: f64,

    /// Estimate, when the protocol succeeded
    pub estimate: Option<f64>,

    /// Failure message, when it did not
    pub error: Option<String>,

    /// Failure was a search without a unique answer
    pub no_unique_solution: bool,
}

impl ParameterOutcome {
    fn from_result(parameter: Parameter, truth: f64, result: QestResult<f64>) -> Self {
        match result {
            Ok(value) => Self {
                parameter,
                truth,
                estimate: Some(value),
                error: None,
                no_unique_solution: false,
            },
            Err(e) => Self {
                parameter,
                truth,
                estimate: None,
                no_unique_solution: e.is_no_unique_solution(),
                error: Some(e.to_string()),
            },
        }
    }

    /// Protocol produced a value
    pub fn succeeded(&self) -> bool {
        self.estimate.is_some()
    }

    /// |estimate − truth|
    pub fn abs_error(&self) -> Option<f64> {
        self.estimate.map(|v| (v - self.truth).abs())
    }
}

impl fmt::Display for ParameterOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.estimate, &self.error) {
            (Some(v), _) => write!(
                f,
                "{}: {:.5} (true {:.5}, err {:.2e})",
                self.parameter,
                v,
                self.truth,
                (v - self.truth).abs()
            ),
            (None, Some(e)) => write!(f, "{}: failed ({})", self.parameter, e),
            (None, None) => write!(f, "{}: no result", self.parameter),
        }
    }
}

/// All outcomes of a suite run
/// Gantree: SuiteReport // 스위트 보고서
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// The qubit under test
    pub qubit: PhysicalParameters,

    /// Seed used, if any
    pub seed: Option<u64>,

    /// Per-parameter outcomes in run order
    pub outcomes: Vec<ParameterOutcome>,
}

impl SuiteReport {
    /// Outcome for `parameter`
    pub fn get(&self, parameter: Parameter) -> Option<&ParameterOutcome> {
        self.outcomes.iter().find(|o| o.parameter == parameter)
    }

    /// Number of protocols that produced a value
    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    /// Every protocol produced a value
    pub fn all_succeeded(&self) -> bool {
        self.successes() == self.outcomes.len()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> QestResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.qubit)?;
        for outcome in &self.outcomes {
            writeln!(f, "  {}", outcome)?;
        }
        write!(f, "  {}/{} succeeded", self.successes(), self.outcomes.len())
    }
}

// ============================================================================
// EstimationSuite
// ============================================================================

/// Runs a list of protocol plans against one qubit
/// Gantree: EstimationSuite // 추정 스위트
#[derive(Debug, Clone)]
pub struct EstimationSuite {
    /// Estimator configuration
    config: EstimatorConfig,

    /// Plans in run order
    plans: Vec<ProtocolPlan>,

    /// Feed the γ₁ estimate into the γ₂ protocol
    chain_gamma1: bool,
}

impl EstimationSuite {
    /// Standard plans for all four parameters (γ₁, κ, γ₂, ω)
    pub fn new(config: EstimatorConfig) -> QestResult<Self> {
        let plans = Parameter::ALL
            .iter()
            .map(|&p| ProtocolPlan::standard(p))
            .collect::<QestResult<Vec<_>>>()?;
        Ok(Self {
            config,
            plans,
            chain_gamma1: false,
        })
    }

    /// Builder: same shot count for every plan
    pub fn with_samples(mut self, samples: Samples) -> Self {
        for plan in &mut self.plans {
            plan.samples = samples;
        }
        self
    }

    /// Builder: replace the plan for its parameter, or append it
    pub fn with_plan(mut self, plan: ProtocolPlan) -> Self {
        match self.plans.iter_mut().find(|p| p.parameter == plan.parameter) {
            Some(existing) => *existing = plan,
            None => self.plans.push(plan),
        }
        self
    }

    /// Builder: restrict to these parameters, keeping run order
    pub fn only(mut self, parameters: &[Parameter]) -> Self {
        self.plans.retain(|p| parameters.contains(&p.parameter));
        self
    }

    /// Builder: use the γ₁ estimate instead of the true γ₁ for γ₂
    pub fn with_chained_gamma1(mut self, enabled: bool) -> Self {
        self.chain_gamma1 = enabled;
        self
    }

    /// Plans in run order
    pub fn plans(&self) -> &[ProtocolPlan] {
        &self.plans
    }

    /// Run every plan
    /// Gantree: run(params) -> Result<SuiteReport> // 전체 실행
    ///
    /// Only configuration errors abort the run.
    pub fn run(&self, qubit: &PhysicalParameters) -> QestResult<SuiteReport> {
        let first = self
            .plans
            .first()
            .map(|p| p.parameter)
            .ok_or_else(|| QestError::ConfigError("suite has no protocol plans".to_string()))?;
        let mut estimator = Estimator::new(prepared_state(first), self.config.clone())?;

        let mut outcomes = Vec::with_capacity(self.plans.len());
        for plan in &self.plans {
            estimator.prepare(prepared_state(plan.parameter));

            if plan.parameter == Parameter::Gamma2 && self.chain_gamma1 {
                let reference = outcomes
                    .iter()
                    .find(|o: &&ParameterOutcome| o.parameter == Parameter::Gamma1)
                    .and_then(|o| o.estimate)
                    .map(Gamma1Reference::Supplied)
                    .unwrap_or(self.config.gamma1_reference);
                estimator.set_gamma1_reference(reference);
            }

            let result = estimator.estimate(plan.parameter, qubit, plan.control, plan.samples);
            let outcome = ParameterOutcome::from_result(
                plan.parameter,
                plan.parameter.get(qubit),
                result.map(|e| e.value),
            );
            log::info!("{}", outcome);
            outcomes.push(outcome);
        }

        Ok(SuiteReport {
            qubit: *qubit,
            seed: self.config.seed,
            outcomes,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn qubit() -> PhysicalParameters {
        PhysicalParameters::new(2.0, 1.0, 0.3, 0.1).unwrap()
    }

    #[test]
    fn test_standard_plan_order() {
        let suite = EstimationSuite::new(EstimatorConfig::default()).unwrap();
        let order: Vec<Parameter> = suite.plans().iter().map(|p| p.parameter).collect();
        assert_eq!(order, Parameter::ALL.to_vec());
    }

    #[test]
    fn test_with_plan_replaces() {
        let plan = ProtocolPlan::standard(Parameter::Gamma1)
            .unwrap()
            .with_samples(7);
        let suite = EstimationSuite::new(EstimatorConfig::default())
            .unwrap()
            .with_plan(plan);
        assert_eq!(suite.plans().len(), 4);
        assert_eq!(suite.plans()[0].samples, 7);
    }

    #[test]
    fn test_closed_form_subset() {
        let suite = EstimationSuite::new(EstimatorConfig::new().with_seed(42))
            .unwrap()
            .only(&[Parameter::Gamma1, Parameter::Gamma2])
            .with_samples(1_000_000);
        let report = suite.run(&qubit()).unwrap();

        assert_eq!(report.outcomes.len(), 2);
        assert!(report.all_succeeded());
        assert!(report.get(Parameter::Gamma1).unwrap().abs_error().unwrap() < 0.02);
        assert!(report.get(Parameter::Gamma2).unwrap().abs_error().unwrap() < 0.02);
        assert!(report.get(Parameter::Omega).is_none());
    }

    #[test]
    fn test_failure_is_recorded() {
        // γ₁ = 50 empties |1⟩ before the readout
        let fast = PhysicalParameters::new(2.0, 1.0, 50.0, 0.1).unwrap();
        let report = EstimationSuite::new(EstimatorConfig::new().with_seed(1))
            .unwrap()
            .only(&[Parameter::Gamma1])
            .with_samples(1000)
            .run(&fast)
            .unwrap();

        let outcome = report.get(Parameter::Gamma1).unwrap();
        assert!(!outcome.succeeded());
        assert!(!outcome.no_unique_solution);
        assert!(outcome.error.as_deref().unwrap().contains("Invalid measurement"));
        assert_eq!(report.successes(), 0);
    }

    #[test]
    fn test_empty_suite_rejected() {
        let suite = EstimationSuite::new(EstimatorConfig::default())
            .unwrap()
            .only(&[]);
        assert!(matches!(suite.run(&qubit()), Err(QestError::ConfigError(_))));
    }

    #[test]
    fn test_report_json() {
        let report = SuiteReport {
            qubit: qubit(),
            seed: Some(3),
            outcomes: vec![ParameterOutcome::from_result(
                Parameter::Kappa,
                1.0,
                Err(QestError::EliminationExhausted { rounds: 2 }),
            )],
        };
        let json = report.to_json().unwrap();
        assert!(json.contains("\"no_unique_solution\": true"));
        let back: SuiteReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
