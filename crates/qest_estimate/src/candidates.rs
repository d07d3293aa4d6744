//! Candidate sets
//!
//! Gantree: L3_Estimate → CandidateSet
//!
//! A cosine measurement fixes an angle only up to sign and multiples of π.
//! The candidate set enumerates those aliases for the elimination search.

use std::f64::consts::PI;
use std::fmt;

/// Candidates closer than this are merged
const MERGE_EPS: f64 = 1e-12;

/// arccos with the argument clamped into [−1, 1]
/// Gantree: principal_angle(c) -> f64 // 주각
pub fn principal_angle(cos_arg: f64) -> f64 {
    if !(-1.0..=1.0).contains(&cos_arg) {
        log::trace!("clamping arccos argument {:.6}", cos_arg);
    }
    cos_arg.clamp(-1.0, 1.0).acos()
}

/// Ordered, de-duplicated positive hypotheses for one unknown
/// Gantree: CandidateSet // 후보 집합
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CandidateSet {
    values: Vec<f64>,
}

impl CandidateSet {
    /// {(θ + kπ)/scale, (−θ + kπ)/scale : k ∈ [lo, hi)}, positive only
    /// Gantree: from_principal_angle(θ,aliases,scale) -> Self // 별칭 전개
    pub fn from_principal_angle(theta: f64, aliases: (i32, i32), scale: f64) -> Self {
        let (lo, hi) = aliases;
        let values = (lo..hi)
            .flat_map(|k| {
                let shift = k as f64 * PI;
                [(theta + shift) / scale, (-theta + shift) / scale]
            })
            .collect();
        Self::from_values(values)
    }

    /// Keep the positive finite values, sorted, near-duplicates merged
    pub fn from_values(mut values: Vec<f64>) -> Self {
        values.retain(|v| v.is_finite() && *v > 0.0);
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup_by(|a, b| (*a - *b).abs() < MERGE_EPS);
        Self { values }
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// No candidates left
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Candidates in ascending order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// The lone survivor, if exactly one remains
    pub fn single(&self) -> Option<f64> {
        match self.values.as_slice() {
            [v] => Some(*v),
            _ => None,
        }
    }

    /// Keep candidates whose flag is set; `keep` is aligned with `values()`
    pub fn retain_flags(&mut self, keep: &[bool]) {
        let mut flags = keep.iter();
        self.values.retain(|_| flags.next().copied().unwrap_or(false));
    }

    /// Closest candidate to `target`
    pub fn nearest(&self, target: f64) -> Option<f64> {
        self.iter()
            .min_by(|a, b| (a - target).abs().total_cmp(&(b - target).abs()))
    }
}

impl fmt::Display for CandidateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.4}", v)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_principal_angle_clamps() {
        assert_eq!(principal_angle(1.3), 0.0);
        assert_abs_diff_eq!(principal_angle(-1.0001), PI, epsilon = 1e-15);
        assert_abs_diff_eq!(principal_angle(0.0), PI / 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_kappa_aliases() {
        let set = CandidateSet::from_principal_angle(1.3, (-5, 5), 1.0);

        // Every candidate positive, ascending, true value present
        assert!(set.iter().all(|v| v > 0.0));
        assert!(set.values().windows(2).all(|w| w[0] < w[1]));
        assert_abs_diff_eq!(set.nearest(1.3).unwrap(), 1.3, epsilon = 1e-12);
        assert_abs_diff_eq!(set.values()[0], 1.3, epsilon = 1e-12);

        // k = 0..4 with +θ, k = 1..4 with −θ
        assert_eq!(set.len(), 9);
    }

    #[test]
    fn test_omega_aliases_scaled() {
        let t: f64 = 2.0;
        let omega: f64 = 2.7;
        let theta = principal_angle((omega * t).cos());
        let set = CandidateSet::from_principal_angle(theta, (-30, 30), t);
        let nearest = set.nearest(omega).unwrap();
        assert_abs_diff_eq!(nearest, omega, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_angle_deduplicates() {
        let set = CandidateSet::from_principal_angle(0.0, (-2, 3), 1.0);
        // θ = 0: ±θ + kπ coincide; positive ones are π and 2π
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_retain_flags_and_single() {
        let mut set = CandidateSet::from_values(vec![3.0, 1.0, 2.0, -1.0]);
        assert_eq!(set.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(set.single(), None);

        set.retain_flags(&[false, true, false]);
        assert_eq!(set.single(), Some(2.0));
        assert_eq!(set.to_string(), "{2.0000}");
    }
}
