//! Bernoulli sampling
//!
//! Gantree: L2_Measure → Sampler
//!
//! Turns an exact outcome probability into the empirical mean of a finite
//! number of single-shot readouts.

use qest_core::{Probability, QestError, QestResult, Samples};
use rand::distributions::{Bernoulli, Distribution};
use rand::Rng;

/// Number of ones among `samples` Bernoulli(p) draws
/// Gantree: sample_successes(p,n,rng) -> Result<u64> // 베르누이 샘플링
pub fn sample_successes<R: Rng>(p: Probability, samples: Samples, rng: &mut R) -> QestResult<u64> {
    if samples == 0 {
        return Err(QestError::InvalidSampleCount(samples));
    }

    let bernoulli =
        Bernoulli::new(p.value()).map_err(|_| QestError::InvalidProbability(p.value()))?;
    Ok(bernoulli
        .sample_iter(rng)
        .take(samples as usize)
        .filter(|&hit| hit)
        .count() as u64)
}

/// Empirical mean of `samples` Bernoulli(p) draws
/// Gantree: sample_mean(p,n,rng) -> Result<f64> // 표본 평균
pub fn sample_mean<R: Rng>(p: Probability, samples: Samples, rng: &mut R) -> QestResult<f64> {
    let successes = sample_successes(p, samples, rng)?;
    Ok(successes as f64 / samples as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_zero_samples_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            sample_mean(Probability::HALF, 0, &mut rng),
            Err(QestError::InvalidSampleCount(0))
        );
    }

    #[test]
    fn test_degenerate_probabilities() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert_eq!(sample_mean(Probability::ZERO, 1000, &mut rng).unwrap(), 0.0);
        assert_eq!(sample_mean(Probability::ONE, 1000, &mut rng).unwrap(), 1.0);
    }

    #[test]
    fn test_mean_converges() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let p = Probability::new(0.37).unwrap();
        let mean = sample_mean(p, 1_000_000, &mut rng).unwrap();
        assert!((mean - 0.37).abs() < 0.01, "mean = {}", mean);
    }

    #[test]
    fn test_seeded_reproducible() {
        let p = Probability::new(0.6).unwrap();
        let a = sample_successes(p, 500, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let b = sample_successes(p, 500, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
        assert!(a <= 500);
    }
}
