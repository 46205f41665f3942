//! Integer-programming drivers wrapping the LP core
//!
//! Both drivers solve LP relaxations through the linear module and differ
//! in how they exclude fractional points: branch-and-bound splits the
//! feasible region on one variable at a time, the cutting-plane driver
//! shaves it with Gomory fractional cuts.

pub mod branch_bound;
pub mod cutting_plane;

use simplexlab_types::SolverConfig;

use crate::standard::StandardModel;

/// Original-variable indices with an integrality requirement whose value is
/// fractional beyond `frac_eps`
///
/// Binary variables use the same fractional-part test: their `≤ 1` row
/// keeps them inside `[0, 1]`, so any non-`{0,1}` value shows up as a
/// fractional part.
pub(crate) fn fractional_vars(
    std: &StandardModel,
    orig_x: &[f64],
    config: &SolverConfig,
) -> Vec<usize> {
    std.signs
        .iter()
        .enumerate()
        .filter(|(j, s)| {
            if !s.is_integral() {
                return false;
            }
            let frac = orig_x[*j] - orig_x[*j].floor();
            frac > config.frac_eps && frac < 1.0 - config.frac_eps
        })
        .map(|(j, _)| j)
        .collect()
}

/// The fractional variable closest to 0.5, the "most fractional" branching
/// heuristic
pub(crate) fn most_fractional(fractional: &[usize], orig_x: &[f64]) -> Option<usize> {
    let mut best = None;
    let mut best_score = f64::INFINITY;
    for &j in fractional {
        let frac = orig_x[j] - orig_x[j].floor();
        let score = (frac - 0.5).abs();
        if score < best_score {
            best_score = score;
            best = Some(j);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard::standardize;
    use simplexlab_types::{Constraint, Model, Sense, SignRestriction};

    #[test]
    fn test_fractional_detection_ignores_continuous() {
        let model = Model::new(
            Sense::Max,
            vec![1.0, 1.0, 1.0],
            vec![Constraint::less_eq(vec![1.0, 1.0, 1.0], 10.0)],
            vec![
                SignRestriction::NonNegative,
                SignRestriction::Integer,
                SignRestriction::Binary,
            ],
        )
        .unwrap();
        let std = standardize(&model).unwrap();
        let cfg = SolverConfig::default();

        // x₁ fractional but continuous, x₂ integral, x₃ fractional binary
        let fractional = fractional_vars(&std, &[0.7, 2.0, 0.4], &cfg);
        assert_eq!(fractional, vec![2]);

        // Near-integral values stay out within frac_eps
        let fractional = fractional_vars(&std, &[0.7, 2.0 + 1e-9, 1.0 - 1e-9], &cfg);
        assert!(fractional.is_empty());
    }

    #[test]
    fn test_most_fractional_picks_closest_to_half() {
        let x = vec![3.1, 2.5, 1.8];
        assert_eq!(most_fractional(&[0, 1, 2], &x), Some(1));
        assert_eq!(most_fractional(&[0, 2], &x), Some(2));
        assert_eq!(most_fractional(&[], &x), None);
    }
}
