//! Dual simplex driver
//!
//! The dual method starts from a dual-feasible tableau (objective row
//! non-negative) whose basic solution is primal-infeasible, and pivots on
//! negative-RHS rows until feasibility. The cut loop and the editor use it
//! to re-optimize after appending a violated row, which is exactly the
//! situation it is built for.

use simplexlab_types::{SolveStatus, SolverConfig, SolverError, Trace};

use super::tableau::Tableau;
use super::LpOutcome;
use crate::standard::StandardModel;

/// Solve a standard model dual-first from its slack basis
pub fn solve(
    std: &StandardModel,
    config: &SolverConfig,
    trace: &mut Trace,
) -> Result<LpOutcome, SolverError> {
    let mut tableau = Tableau::from_standard(std);
    let status = solve_tableau(&mut tableau, config, trace)?;
    Ok(LpOutcome { tableau, status })
}

/// Run dual iterations on an existing tableau until primal feasibility,
/// infeasibility or the iteration cap
///
/// Row rule: the most negative RHS. Column rule: among entries
/// `T[r,j] < -eps`, minimize `|T[obj,j] / T[r,j]|` (smaller column index on
/// ties). A row with no negative entry certifies infeasibility.
pub fn solve_tableau(
    tableau: &mut Tableau,
    config: &SolverConfig,
    trace: &mut Trace,
) -> Result<SolveStatus, SolverError> {
    let mut clamped_pivots = 0;

    for iteration in 1..=config.max_simplex_iters {
        let leaving = match tableau.most_negative_rhs_row(config) {
            Some(row) => row,
            None => {
                trace.step(format!(
                    "dual: feasible after {} iterations, Z = {:.4}",
                    iteration - 1,
                    tableau.z()
                ));
                return Ok(SolveStatus::Optimal);
            }
        };

        let entering = match find_entering_column(tableau, leaving, config) {
            Some(col) => col,
            None => {
                trace.step(format!(
                    "dual: row {} ({}) has RHS {:.4} and no negative entry, problem is infeasible",
                    leaving + 1,
                    tableau.basis_name(leaving),
                    tableau.rhs(leaving)
                ));
                return Ok(SolveStatus::Infeasible);
            }
        };

        trace.step(format!(
            "dual pivot {}: row {} ({}, rhs {:.4}) leaves, {} enters",
            iteration,
            leaving + 1,
            tableau.basis_name(leaving),
            tableau.rhs(leaving),
            tableau.col_name(entering)
        ));

        if tableau.pivot(entering, leaving, config) {
            clamped_pivots += 1;
            trace.step(format!(
                "dual: pivot element clamped to ±eps at row {}, column {}",
                leaving + 1,
                tableau.col_name(entering)
            ));
            if clamped_pivots > 1 {
                return Err(SolverError::NumericallyDegenerate {
                    row: leaving,
                    col: entering,
                });
            }
        }
    }

    trace.step(format!(
        "dual: iteration cap {} reached",
        config.max_simplex_iters
    ));
    Ok(SolveStatus::IterationLimit)
}

/// Dual ratio test over the leaving row
fn find_entering_column(
    tableau: &Tableau,
    leaving: usize,
    config: &SolverConfig,
) -> Option<usize> {
    let obj = tableau.obj_row();
    let mut min_ratio = f64::INFINITY;
    let mut entering = None;

    for j in 0..tableau.rhs_col() {
        let a_rj = tableau.data[leaving][j];
        if a_rj < -config.eps {
            let ratio = (tableau.data[obj][j] / a_rj).abs();
            if ratio < min_ratio {
                min_ratio = ratio;
                entering = Some(j);
            }
        }
    }

    entering
}
