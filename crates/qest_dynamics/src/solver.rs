//! Adaptive ODE integration
//!
//! Gantree: L1_Dynamics → Solver
//!
//! Dormand–Prince 5(4) with first-same-as-last stage reuse, specialised to
//! the three Bloch coordinates. Step control uses the RMS of the scaled
//! embedded error estimate.

use qest_core::{solver, QestError, QestResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-component state (x, y, z)
pub type State = [f64; 3];

// ============================================================================
// Butcher Tableau
// ============================================================================

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// 5th minus 4th order weights
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

// ============================================================================
// Options
// ============================================================================

/// Integrator tolerances and limits
/// Gantree: SolverOptions // 적분기 설정
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Absolute tolerance
    pub abstol: f64,

    /// Relative tolerance
    pub reltol: f64,

    /// Smallest step before giving up
    pub min_step: f64,

    /// Upper bound on the step (None = unbounded)
    pub max_step: Option<f64>,

    /// Accepted plus rejected step budget
    pub max_steps: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            abstol: solver::ABSTOL,
            reltol: solver::RELTOL,
            min_step: solver::MIN_STEP,
            max_step: None,
            max_steps: solver::MAX_STEPS,
        }
    }
}

impl SolverOptions {
    /// Create with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: tolerances
    pub fn with_tolerances(mut self, abstol: f64, reltol: f64) -> Self {
        self.abstol = abstol;
        self.reltol = reltol;
        self
    }

    /// Builder: max step
    pub fn with_max_step(mut self, max_step: f64) -> Self {
        self.max_step = Some(max_step);
        self
    }

    /// Builder: step budget
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Validate
    /// Gantree: validate() -> Result<(), String> // 검증
    pub fn validate(&self) -> Result<(), String> {
        if !(self.abstol > 0.0 && self.abstol.is_finite()) {
            return Err(format!("abstol must be positive, got {}", self.abstol));
        }
        if !(self.reltol > 0.0 && self.reltol.is_finite()) {
            return Err(format!("reltol must be positive, got {}", self.reltol));
        }
        if !(self.min_step > 0.0 && self.min_step.is_finite()) {
            return Err(format!("min_step must be positive, got {}", self.min_step));
        }
        if let Some(max_step) = self.max_step {
            if max_step.is_nan() || max_step < self.min_step {
                return Err(format!(
                    "max_step ({}) must be at least min_step ({})",
                    max_step, self.min_step
                ));
            }
        }
        if self.max_steps == 0 {
            return Err("max_steps must be > 0".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for SolverOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DoPri5(abstol={:e}, reltol={:e}, max_steps={})",
            self.abstol, self.reltol, self.max_steps
        )
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Work counters of one integration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverStats {
    /// Right-hand side evaluations
    pub n_evals: usize,

    /// Accepted steps
    pub n_steps: usize,

    /// Rejected steps
    pub n_rejected: usize,
}

impl SolverStats {
    /// Accepted plus rejected
    pub fn attempts(&self) -> usize {
        self.n_steps + self.n_rejected
    }
}

// ============================================================================
// Integration
// ============================================================================

/// Integrate dy/dt = f(t, y) from 0 to `t_end`
/// Gantree: integrate(f,y0,t_end,opts) -> Result<(State,Stats)> // 적응형 적분
///
/// `t_end` must be finite and non-negative; zero returns `y0` untouched.
pub fn integrate<F>(
    f: F,
    y0: State,
    t_end: f64,
    options: &SolverOptions,
) -> QestResult<(State, SolverStats)>
where
    F: Fn(f64, &State) -> State,
{
    if !t_end.is_finite() || t_end < 0.0 {
        return Err(QestError::InvalidDuration(t_end));
    }
    options.validate().map_err(QestError::ConfigError)?;

    let mut stats = SolverStats::default();
    if t_end == 0.0 {
        return Ok((y0, stats));
    }

    let max_step = options.max_step.unwrap_or(f64::INFINITY);
    let mut t = 0.0;
    let mut y = y0;
    let mut h = (t_end / 100.0).min(max_step).max(options.min_step);

    let mut k1 = f(t, &y);
    stats.n_evals += 1;

    while t < t_end {
        if stats.attempts() >= options.max_steps {
            return Err(QestError::SolverFailed(format!(
                "step budget of {} exhausted at t = {:e} of {:e}",
                options.max_steps, t, t_end
            )));
        }

        let remaining = t_end - t;
        let last = h >= remaining;
        let step = if last { remaining } else { h };

        let k2 = f(t + step / 5.0, &combine(&y, step, &[(A21, &k1)]));
        let k3 = f(
            t + 3.0 * step / 10.0,
            &combine(&y, step, &[(A31, &k1), (A32, &k2)]),
        );
        let k4 = f(
            t + 4.0 * step / 5.0,
            &combine(&y, step, &[(A41, &k1), (A42, &k2), (A43, &k3)]),
        );
        let k5 = f(
            t + 8.0 * step / 9.0,
            &combine(&y, step, &[(A51, &k1), (A52, &k2), (A53, &k3), (A54, &k4)]),
        );
        let k6 = f(
            t + step,
            &combine(
                &y,
                step,
                &[(A61, &k1), (A62, &k2), (A63, &k3), (A64, &k4), (A65, &k5)],
            ),
        );
        let y_new = combine(
            &y,
            step,
            &[(B1, &k1), (B3, &k3), (B4, &k4), (B5, &k5), (B6, &k6)],
        );
        let k7 = f(t + step, &y_new);
        stats.n_evals += 6;

        let mut err = 0.0;
        for i in 0..3 {
            let sc = options.abstol + options.reltol * y[i].abs().max(y_new[i].abs());
            let ei = step
                * (E1 * k1[i] + E3 * k3[i] + E4 * k4[i] + E5 * k5[i] + E6 * k6[i] + E7 * k7[i]);
            err += (ei / sc).powi(2);
        }
        let err = (err / 3.0).sqrt();

        if !err.is_finite() || y_new.iter().any(|c| !c.is_finite()) {
            return Err(QestError::SolverFailed(format!(
                "non-finite state at t = {:e}",
                t
            )));
        }

        if err <= 1.0 {
            t = if last { t_end } else { t + step };
            y = y_new;
            k1 = k7;
            stats.n_steps += 1;
        } else {
            stats.n_rejected += 1;
            if step <= options.min_step {
                return Err(QestError::SolverFailed(format!(
                    "step underflow ({:e}) at t = {:e}",
                    step, t
                )));
            }
        }

        let factor = if err > 0.0 {
            SAFETY * err.powf(-0.2)
        } else {
            MAX_FACTOR
        };
        h = (step * factor.clamp(MIN_FACTOR, MAX_FACTOR))
            .min(max_step)
            .max(options.min_step);
    }

    log::trace!(
        "dopri5: t_end={:e}, steps={}, rejected={}, evals={}",
        t_end,
        stats.n_steps,
        stats.n_rejected,
        stats.n_evals
    );

    Ok((y, stats))
}

/// y + h·Σ aᵢ·kᵢ
#[inline]
fn combine(y: &State, h: f64, terms: &[(f64, &State)]) -> State {
    let mut out = *y;
    for (i, o) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (a, k) in terms {
            acc += a * k[i];
        }
        *o += h * acc;
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
