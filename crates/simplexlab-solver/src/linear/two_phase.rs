//! Two-phase driver: phase-I repair without artificial variables
//!
//! Phase I here is a repair heuristic, not the textbook artificial-variable
//! construction: while any RHS is negative, pivot on the most-negative-RHS
//! row using the column that disturbs the objective row least. Once the
//! tableau is primal feasible, phase II is the ordinary primal driver.
//!
//! This is the entry point for relaxed standard forms (flipped `≥` rows
//! carry negative RHS); when the initial tableau is already feasible the
//! driver records the skip and goes straight to primal.

use simplexlab_types::{SolveStatus, SolverConfig, SolverError, Trace};

use super::tableau::Tableau;
use super::{simplex, LpOutcome};
use crate::standard::StandardModel;

/// Solve a standard model, repairing negative RHS rows first if needed
pub fn solve(
    std: &StandardModel,
    config: &SolverConfig,
    trace: &mut Trace,
) -> Result<LpOutcome, SolverError> {
    let mut tableau = Tableau::from_standard(std);

    if tableau.is_primal_feasible(config) {
        trace.step("phase I: no negative RHS, skipping to primal");
    } else {
        match repair(&mut tableau, config, trace)? {
            SolveStatus::Optimal => {}
            status => return Ok(LpOutcome { tableau, status }),
        }
    }

    trace.step("phase II: primal simplex");
    let status = simplex::solve_tableau(&mut tableau, config, trace)?;
    Ok(LpOutcome { tableau, status })
}

/// Phase-I loop: returns `Optimal` when every RHS is non-negative
fn repair(
    tableau: &mut Tableau,
    config: &SolverConfig,
    trace: &mut Trace,
) -> Result<SolveStatus, SolverError> {
    let mut clamped_pivots = 0;

    for iteration in 1..=config.max_phase1_iters {
        let row = match tableau.most_negative_rhs_row(config) {
            Some(r) => r,
            None => {
                trace.step(format!(
                    "phase I: feasible after {} repair pivots",
                    iteration - 1
                ));
                return Ok(SolveStatus::Optimal);
            }
        };

        let col = match find_repair_column(tableau, row, config) {
            Some(c) => c,
            None => {
                trace.step(format!(
                    "phase I: row {} ({}) has RHS {:.4} and no admissible column, problem is infeasible",
                    row + 1,
                    tableau.basis_name(row),
                    tableau.rhs(row)
                ));
                return Ok(SolveStatus::Infeasible);
            }
        };

        trace.step(format!(
            "phase I pivot {}: row {} ({}, rhs {:.4}) repaired via {}",
            iteration,
            row + 1,
            tableau.basis_name(row),
            tableau.rhs(row),
            tableau.col_name(col)
        ));

        if tableau.pivot(col, row, config) {
            clamped_pivots += 1;
            trace.step(format!(
                "phase I: pivot element clamped to ±eps at row {}, column {}",
                row + 1,
                tableau.col_name(col)
            ));
            if clamped_pivots > 1 {
                return Err(SolverError::NumericallyDegenerate { row, col });
            }
        }
    }

    trace.step(format!(
        "phase I: iteration cap {} reached",
        config.max_phase1_iters
    ));
    Ok(SolveStatus::IterationLimit)
}

/// Column with `T[r,c] < 0` minimizing `|T[obj,c] / T[r,c]|`
fn find_repair_column(tableau: &Tableau, row: usize, config: &SolverConfig) -> Option<usize> {
    let obj = tableau.obj_row();
    let mut min_ratio = f64::INFINITY;
    let mut col = None;

    for j in 0..tableau.rhs_col() {
        let a_rj = tableau.data[row][j];
        if a_rj < -config.eps {
            let ratio = (tableau.data[obj][j] / a_rj).abs();
            if ratio < min_ratio {
                min_ratio = ratio;
                col = Some(j);
            }
        }
    }

    col
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard::{standardize, standardize_relaxed};
    use approx::assert_relative_eq;
    use simplexlab_types::{Constraint, Model, Relation, Sense, SignRestriction};

    #[test]
    fn test_repair_then_optimize() {
        // maximize x₁ + x₂ with x₁ + x₂ ≥ 2 and x₁ + x₂ ≤ 5
        let model = Model::new(
            Sense::Max,
            vec![1.0, 1.0],
            vec![
                Constraint::new(vec![1.0, 1.0], Relation::GreaterEq, 2.0),
                Constraint::less_eq(vec![1.0, 1.0], 5.0),
            ],
            vec![SignRestriction::NonNegative, SignRestriction::NonNegative],
        )
        .unwrap();
        let std = standardize_relaxed(&model).unwrap();

        let mut trace = Trace::new();
        let outcome = solve(&std, &SolverConfig::default(), &mut trace).unwrap();

        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_relative_eq!(outcome.z(), 5.0, epsilon = 1e-9);
        assert!(trace.contains("phase I pivot 1:"));
        assert!(trace.contains("phase II"));
    }

    #[test]
    fn test_feasible_start_skips_phase_one() {
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
        let std = standardize(&model).unwrap();

        let mut trace = Trace::new();
        let outcome = solve(&std, &SolverConfig::default(), &mut trace).unwrap();

        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_relative_eq!(outcome.z(), 36.0, epsilon = 1e-9);
        assert!(trace.contains("skipping to primal"));
    }

    #[test]
    fn test_infeasible_repair() {
        // x₁ ≤ 1 and x₁ ≥ 3
        let model = Model::new(
            Sense::Max,
            vec![1.0],
            vec![
                Constraint::less_eq(vec![1.0], 1.0),
                Constraint::new(vec![1.0], Relation::GreaterEq, 3.0),
            ],
            vec![SignRestriction::NonNegative],
        )
        .unwrap();
        let std = standardize_relaxed(&model).unwrap();

        let mut trace = Trace::new();
        let outcome = solve(&std, &SolverConfig::default(), &mut trace).unwrap();
        assert_eq!(outcome.status, SolveStatus::Infeasible);
        assert!(trace.contains("infeasible"));
    }
}
