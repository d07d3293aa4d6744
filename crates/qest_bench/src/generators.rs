//! Qubit generators for benchmarking
//!
//! Gantree: L4_Benchmark → Generators
//!
//! Produces the qubits that trials are run against: random draws from the
//! typical ranges, fixed reference qubits and one-parameter sweeps.

use qest_core::{Parameter, PhysicalParameters, QestResult};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Qubit generator for benchmarks
/// Gantree: QubitGenerator // 큐비트 생성기
pub struct QubitGenerator {
    /// Random generator
    rng: ChaCha8Rng,
}

impl QubitGenerator {
    /// Create generator seeded from entropy
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Create generator with seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    // ========================================================================
    // Reference Qubits
    // ========================================================================

    /// Mid-range qubit (ω=2, κ=1, γ₁=0.3, γ₂=0.1)
    pub fn reference() -> QestResult<PhysicalParameters> {
        PhysicalParameters::new(2.0, 1.0, 0.3, 0.1)
    }

    /// Weakly damped qubit
    pub fn low_noise() -> QestResult<PhysicalParameters> {
        PhysicalParameters::new(1.5, 0.8, 0.1, 0.01)
    }

    /// Strongly damped qubit at the top of the typical ranges
    pub fn high_noise() -> QestResult<PhysicalParameters> {
        PhysicalParameters::new(4.5, 1.8, 1.0, 0.5)
    }

    // ========================================================================
    // Random Qubits
    // ========================================================================

    /// One qubit drawn uniformly from the typical ranges
    pub fn random(&mut self) -> PhysicalParameters {
        PhysicalParameters::random(&mut self.rng)
    }

    /// `count` random qubits
    pub fn random_batch(&mut self, count: usize) -> Vec<PhysicalParameters> {
        (0..count).map(|_| self.random()).collect()
    }

    // ========================================================================
    // Sweeps
    // ========================================================================

    /// `base` with `parameter` replaced by each of `values`
    pub fn sweep(
        base: &PhysicalParameters,
        parameter: Parameter,
        values: &[f64],
    ) -> QestResult<Vec<PhysicalParameters>> {
        values
            .iter()
            .map(|&v| parameter.substitute(base, v))
            .collect()
    }

    /// `points` evenly spaced values of `parameter` over [lo, hi]
    pub fn linear_sweep(
        base: &PhysicalParameters,
        parameter: Parameter,
        (lo, hi): (f64, f64),
        points: usize,
    ) -> QestResult<Vec<PhysicalParameters>> {
        let values: Vec<f64> = match points {
            0 => Vec::new(),
            1 => vec![lo],
            n => (0..n)
                .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
                .collect(),
        };
        Self::sweep(base, parameter, &values)
    }
}

impl Default for QubitGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_qubits() {
        assert!(QubitGenerator::reference().unwrap().is_typical());
        assert!(QubitGenerator::low_noise().is_ok());
        assert!(QubitGenerator::high_noise().is_ok());
    }

    #[test]
    fn test_random_reproducible() {
        let a = QubitGenerator::with_seed(42).random_batch(5);
        let b = QubitGenerator::with_seed(42).random_batch(5);
        assert_eq!(a, b);
        assert!(a.iter().all(|q| q.is_typical()));
    }

    #[test]
    fn test_sweep() {
        let base = QubitGenerator::reference().unwrap();
        let qubits = QubitGenerator::sweep(&base, Parameter::Kappa, &[0.5, 1.5]).unwrap();
        assert_eq!(qubits.len(), 2);
        assert_eq!(qubits[1].kappa(), 1.5);
        assert_eq!(qubits[1].omega(), base.omega());
    }

    #[test]
    fn test_linear_sweep() {
        let base = QubitGenerator::reference().unwrap();
        let qubits =
            QubitGenerator::linear_sweep(&base, Parameter::Gamma1, (0.1, 0.5), 5).unwrap();
        let g: Vec<f64> = qubits.iter().map(|q| q.gamma1()).collect();
        assert_eq!(g.len(), 5);
        assert!((g[2] - 0.3).abs() < 1e-12);
        assert!(QubitGenerator::sweep(&base, Parameter::Gamma2, &[-1.0]).is_err());
    }
}
