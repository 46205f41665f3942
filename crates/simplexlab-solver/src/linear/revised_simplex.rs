//! Revised simplex driver (phase II, basis-inverse form)
//!
//! Instead of carrying the full tableau, each iteration rebuilds the basis
//! inverse `B⁻¹` by Gauss–Jordan elimination and prices columns on demand:
//!
//! 1. `x_B = B⁻¹ b`, `y = c_B B⁻¹`
//! 2. reduced costs `r_j = c_j − y · A_j` for non-basic `j`
//! 3. entering column: largest positive `r_j`; none → optimal
//! 4. direction `d = B⁻¹ A_j`, ratio test on `d > eps`; none → unbounded
//!
//! A production implementation would maintain `B⁻¹` incrementally (product
//! form or LU); rebuilding it keeps every step visible, which is the point
//! here.

use simplexlab_types::{SolveStatus, SolverConfig, SolverError, Trace};

use crate::standard::StandardModel;

/// Result of a revised-simplex drive (no tableau to hand back)
#[derive(Debug, Clone)]
pub struct RevisedSolve {
    /// Structural-column values at the final basic solution
    pub std_x: Vec<f64>,
    /// Objective value of the maximization form
    pub z: f64,
    pub status: SolveStatus,
}

/// Solve a standard model in basis-inverse form
///
/// Requires a primal-feasible start: every `b_i ≥ 0` and an identity basis
/// locatable among the columns of `[A | I]`. Anything else is a
/// [`SolverError::NeedsPhaseOne`] diagnostic, not a silent fallback.
pub fn solve(
    std: &StandardModel,
    config: &SolverConfig,
    trace: &mut Trace,
) -> Result<RevisedSolve, SolverError> {
    let n = std.num_cols();
    let m = std.num_rows();

    if std.b.iter().any(|&bi| bi < -config.eps) {
        return Err(SolverError::NeedsPhaseOne);
    }

    // Augmented column set [A | I]; column j ≥ n is the slack of row j - n
    let total = n + m;
    let column = |j: usize, i: usize| -> f64 {
        if j < n {
            std.a.get(i, j)
        } else if j - n == i {
            1.0
        } else {
            0.0
        }
    };
    let cost = |j: usize| -> f64 { if j < n { std.c[j] } else { 0.0 } };

    let mut basis = locate_identity_basis(std, config)?;
    trace.step(format!(
        "revised: initial identity basis [{}]",
        basis
            .iter()
            .map(|j| column_name(std, *j))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    for iteration in 1..=config.max_revised_iters {
        let b_inv = basis_inverse(std, &basis, config)?;
        let x_b = mat_vec(&b_inv, &std.b, m);
        let c_b: Vec<f64> = basis.iter().map(|&j| cost(j)).collect();
        let y = vec_mat(&c_b, &b_inv, m);

        // Pricing: largest positive reduced cost enters
        let mut entering = None;
        let mut best_r = config.eps;
        for j in 0..total {
            if basis.contains(&j) {
                continue;
            }
            let a_j: Vec<f64> = (0..m).map(|i| column(j, i)).collect();
            let r_j = cost(j) - dot(&y, &a_j);
            if r_j > best_r {
                best_r = r_j;
                entering = Some(j);
            }
        }

        let entering = match entering {
            Some(j) => j,
            None => {
                let z = dot(&c_b, &x_b);
                trace.step(format!(
                    "revised: optimal after {} iterations, Z = {:.4}",
                    iteration - 1,
                    z
                ));
                return Ok(RevisedSolve {
                    std_x: structural_values(std, &basis, &x_b),
                    z,
                    status: SolveStatus::Optimal,
                });
            }
        };

        // Direction d = B⁻¹ A_entering and minimum ratio test
        let a_e: Vec<f64> = (0..m).map(|i| column(entering, i)).collect();
        let d = mat_vec(&b_inv, &a_e, m);

        let mut leaving = None;
        let mut min_ratio = f64::INFINITY;
        for i in 0..m {
            if d[i] > config.eps {
                let ratio = x_b[i] / d[i];
                if ratio < min_ratio {
                    min_ratio = ratio;
                    leaving = Some(i);
                }
            }
        }

        let leaving = match leaving {
            Some(i) => i,
            None => {
                trace.step(format!(
                    "revised: {} has no positive direction entry, problem is unbounded",
                    column_name(std, entering)
                ));
                return Ok(RevisedSolve {
                    std_x: structural_values(std, &basis, &x_b),
                    z: dot(&c_b, &x_b),
                    status: SolveStatus::Unbounded,
                });
            }
        };

        trace.step(format!(
            "revised pivot {}: {} enters (r = {:.4}), {} leaves (ratio {:.4})",
            iteration,
            column_name(std, entering),
            best_r,
            column_name(std, basis[leaving]),
            min_ratio
        ));
        basis[leaving] = entering;
    }

    trace.step(format!(
        "revised: iteration cap {} reached",
        config.max_revised_iters
    ));
    let b_inv = basis_inverse(std, &basis, config)?;
    let x_b = mat_vec(&b_inv, &std.b, m);
    let c_b: Vec<f64> = basis.iter().map(|&j| cost(j)).collect();
    Ok(RevisedSolve {
        std_x: structural_values(std, &basis, &x_b),
        z: dot(&c_b, &x_b),
        status: SolveStatus::IterationLimit,
    })
}

/// Find, for each row, a column of `[A | I]` equal to that unit vector
fn locate_identity_basis(
    std: &StandardModel,
    config: &SolverConfig,
) -> Result<Vec<usize>, SolverError> {
    let n = std.num_cols();
    let m = std.num_rows();
    let total = n + m;
    let mut basis = Vec::with_capacity(m);

    for i in 0..m {
        let mut found = None;
        for j in 0..total {
            if basis.contains(&j) {
                continue;
            }
            let is_unit = (0..m).all(|k| {
                let v = if j < n {
                    std.a.get(k, j)
                } else if j - n == k {
                    1.0
                } else {
                    0.0
                };
                let want = if k == i { 1.0 } else { 0.0 };
                (v - want).abs() <= config.eps
            });
            if is_unit {
                found = Some(j);
                break;
            }
        }
        match found {
            Some(j) => basis.push(j),
            None => return Err(SolverError::NeedsPhaseOne),
        }
    }

    Ok(basis)
}

/// Invert the basis matrix by Gauss–Jordan with partial pivoting
fn basis_inverse(
    std: &StandardModel,
    basis: &[usize],
    config: &SolverConfig,
) -> Result<Vec<f64>, SolverError> {
    let n = std.num_cols();
    let m = basis.len();

    // Augmented [B | I]
    let width = 2 * m;
    let mut aug = vec![0.0; m * width];
    for (col_pos, &j) in basis.iter().enumerate() {
        for i in 0..m {
            let v = if j < n {
                std.a.get(i, j)
            } else if j - n == i {
                1.0
            } else {
                0.0
            };
            aug[i * width + col_pos] = v;
        }
    }
    for i in 0..m {
        aug[i * width + m + i] = 1.0;
    }

    for k in 0..m {
        // Partial pivoting on column k
        let mut max_row = k;
        let mut max_val = aug[k * width + k].abs();
        for i in (k + 1)..m {
            let v = aug[i * width + k].abs();
            if v > max_val {
                max_val = v;
                max_row = i;
            }
        }
        if max_val < config.basis_eps {
            return Err(SolverError::Singular);
        }
        if max_row != k {
            for j in 0..width {
                aug.swap(k * width + j, max_row * width + j);
            }
        }

        let pivot = aug[k * width + k];
        for j in 0..width {
            aug[k * width + j] /= pivot;
        }
        for i in 0..m {
            if i != k {
                let factor = aug[i * width + k];
                if factor != 0.0 {
                    for j in 0..width {
                        aug[i * width + j] -= factor * aug[k * width + j];
                    }
                }
            }
        }
    }

    let mut inv = vec![0.0; m * m];
    for i in 0..m {
        for j in 0..m {
            inv[i * m + j] = aug[i * width + m + j];
        }
    }
    Ok(inv)
}

fn structural_values(std: &StandardModel, basis: &[usize], x_b: &[f64]) -> Vec<f64> {
    let mut values = vec![0.0; std.num_cols()];
    for (i, &j) in basis.iter().enumerate() {
        if j < std.num_cols() {
            values[j] = x_b[i];
        }
    }
    values
}

fn column_name(std: &StandardModel, j: usize) -> String {
    if j < std.num_cols() {
        std.cols[j].name.clone()
    } else {
        format!("S{}", j - std.num_cols() + 1)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// `M · v` for a square row-major `m × m` matrix
fn mat_vec(mat: &[f64], v: &[f64], m: usize) -> Vec<f64> {
    (0..m)
        .map(|i| (0..m).map(|j| mat[i * m + j] * v[j]).sum())
        .collect()
}

/// `vᵀ · M` for a square row-major `m × m` matrix
fn vec_mat(v: &[f64], mat: &[f64], m: usize) -> Vec<f64> {
    (0..m)
        .map(|j| (0..m).map(|i| v[i] * mat[i * m + j]).sum())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard::standardize;
    use approx::assert_relative_eq;
    use simplexlab_types::{Constraint, Model, Sense, SignRestriction};

    fn wyndor() -> StandardModel {
        let model = Model::new(
            Sense::Max,
            vec![3.0, 5.0],
            vec![
                Constraint::less_eq(vec![1.0, 0.0], 4.0),
                Constraint::less_eq(vec![0.0, 2.0], 12.0),
                Constraint::less_eq(vec![3.0, 2.0], 18.0),
            ],
            vec![SignRestriction::NonNegative, SignRestriction::NonNegative],
        )
        .unwrap();
        standardize(&model).unwrap()
    }

    #[test]
    fn test_wyndor_optimum() {
        let std = wyndor();
        let mut trace = Trace::new();
        let result = solve(&std, &SolverConfig::default(), &mut trace).unwrap();

        assert_eq!(result.status, SolveStatus::Optimal);
        assert_relative_eq!(result.z, 36.0, epsilon = 1e-6);
        assert_relative_eq!(result.std_x[0], 2.0, epsilon = 1e-6);
        assert_relative_eq!(result.std_x[1], 6.0, epsilon = 1e-6);
        assert!(trace.contains("initial identity basis"));
    }

    #[test]
    fn test_matches_tableau_driver() {
        let std = wyndor();
        let cfg = SolverConfig::default();

        let mut t1 = Trace::new();
        let revised = solve(&std, &cfg, &mut t1).unwrap();

        let mut t2 = Trace::new();
        let tableau = super::super::simplex::solve(&std, &cfg, &mut t2).unwrap();

        assert_relative_eq!(revised.z, tableau.z(), epsilon = 1e-6);
    }

    #[test]
    fn test_unbounded() {
        let model = Model::new(
            Sense::Max,
            vec![1.0, 1.0],
            vec![Constraint::less_eq(vec![1.0, -1.0], 1.0)],
            vec![SignRestriction::NonNegative, SignRestriction::NonNegative],
        )
        .unwrap();
        let std = standardize(&model).unwrap();

        let mut trace = Trace::new();
        let result = solve(&std, &SolverConfig::default(), &mut trace).unwrap();
        assert_eq!(result.status, SolveStatus::Unbounded);
    }

    #[test]
    fn test_negative_rhs_needs_phase_one() {
        let mut std = wyndor();
        std.b[0] = -1.0;
        let mut trace = Trace::new();
        let err = solve(&std, &SolverConfig::default(), &mut trace).unwrap_err();
        assert_eq!(err, SolverError::NeedsPhaseOne);
    }
}
