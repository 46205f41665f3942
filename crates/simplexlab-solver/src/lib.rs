//! Teaching-grade LP/MIP solver core
//!
//! Turns a structured [`Model`] into an optimal solution (or an unambiguous
//! infeasibility/unboundedness verdict) together with a step-by-step
//! [`Trace`] suitable for classroom demonstration. The core performs no
//! interactive I/O; parsing, menus and table rendering live elsewhere.
//!
//! Pipeline: `Model` → [`standard`] (canonical ≤-only maximization form) →
//! [`linear`] (primal, dual, revised and two-phase simplex over a dense
//! tableau) → [`integer`] (branch-and-bound, Gomory cuts) → [`analysis`]
//! (ranging, guarded edits, duality).
//!
//! # Ejemplo
//!
//! ```
//! use simplexlab_solver::Algorithm;
//! use simplexlab_types::{Constraint, Model, Sense, SignRestriction, SolverConfig};
//!
//! // maximize z = 3x₁ + 5x₂ subject to x₁ ≤ 4, 2x₂ ≤ 12, 3x₁ + 2x₂ ≤ 18
//! let model = Model::new(
//!     Sense::Max,
//!     vec![3.0, 5.0],
//!     vec![
//!         Constraint::less_eq(vec![1.0, 0.0], 4.0),
//!         Constraint::less_eq(vec![0.0, 2.0], 12.0),
//!         Constraint::less_eq(vec![3.0, 2.0], 18.0),
//!     ],
//!     vec![SignRestriction::NonNegative, SignRestriction::NonNegative],
//! )
//! .unwrap();
//!
//! let (solution, trace) = Algorithm::Primal
//!     .solve(&model, &SolverConfig::default())
//!     .unwrap();
//! assert!((solution.z - 36.0).abs() < 1e-9);
//! assert!(!trace.is_empty());
//! ```

pub mod analysis;
pub mod integer;
pub mod linear;
pub mod report;
pub mod standard;

use std::path::{Path, PathBuf};

use simplexlab_types::{Model, Solution, SolveStatus, SolverConfig, SolverError, Trace};

use crate::standard::{standardize, standardize_relaxed};

/// The closed set of solver drivers
///
/// Every variant implements the same contract: `solve(model) → (solution,
/// trace)`. Infeasibility, unboundedness and exhausted caps are statuses on
/// the solution; only unsupported or degenerate inputs are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Dantzig-rule primal simplex on the strict standard form
    Primal,
    /// Dual simplex (accepts flipped `≥` rows), primal finish if needed
    Dual,
    /// Revised simplex in basis-inverse form (phase II only)
    Revised,
    /// Best-first branch-and-bound for `int`/`bin` variables
    BranchAndBound,
    /// Gomory fractional cutting planes for `int`/`bin` variables
    CuttingPlane,
}

impl Algorithm {
    /// Driver name as used in result file names
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Primal => "PrimalSimplex",
            Algorithm::Dual => "DualSimplex",
            Algorithm::Revised => "RevisedSimplex",
            Algorithm::BranchAndBound => "BranchAndBound",
            Algorithm::CuttingPlane => "CuttingPlane",
        }
    }

    /// Solve `model` and return the solution with its full step trace
    pub fn solve(
        &self,
        model: &Model,
        config: &SolverConfig,
    ) -> Result<(Solution, Trace), SolverError> {
        let mut trace = Trace::new();
        let solution = match self {
            Algorithm::Primal => {
                let std = standardize(model)?;
                let outcome = linear::simplex::solve(&std, config, &mut trace)?;
                tableau_solution(&std, &outcome)
            }
            Algorithm::Dual => {
                // The relaxed form admits flipped ≥ rows, the natural diet
                // of the dual method
                let std = standardize_relaxed(model)?;
                let mut tableau = linear::Tableau::from_standard(&std);
                let mut status =
                    linear::dual_simplex::solve_tableau(&mut tableau, config, &mut trace)?;
                if status == SolveStatus::Optimal && !tableau.is_optimal(config) {
                    trace.step("dual: feasible but not optimal, handing to primal");
                    status = linear::simplex::solve_tableau(&mut tableau, config, &mut trace)?;
                }
                let outcome = linear::LpOutcome { tableau, status };
                tableau_solution(&std, &outcome)
            }
            Algorithm::Revised => {
                let std = standardize(model)?;
                let result = linear::revised_simplex::solve(&std, config, &mut trace)?;
                Solution {
                    z: std.original_z(result.z),
                    x: std.back_map(&result.std_x),
                    status: result.status,
                    note: None,
                }
            }
            Algorithm::BranchAndBound => integer::branch_bound::solve(model, config, &mut trace)?,
            Algorithm::CuttingPlane => integer::cutting_plane::solve(model, config, &mut trace)?,
        };
        Ok((solution, trace))
    }

    /// Solve and, for the integer drivers, persist a
    /// `<Driver>_Result_<timestamp>.txt` file in `dir`
    ///
    /// The returned path is `None` for the plain LP drivers and on write
    /// failure (which is recorded in the trace, never fatal).
    pub fn solve_with_report(
        &self,
        model: &Model,
        config: &SolverConfig,
        dir: &Path,
        timestamp: u64,
    ) -> Result<(Solution, Trace, Option<PathBuf>), SolverError> {
        let (solution, mut trace) = self.solve(model, config)?;
        let path = match self {
            Algorithm::BranchAndBound | Algorithm::CuttingPlane => {
                report::write_driver_result(dir, self.name(), &solution, &mut trace, timestamp)
            }
            _ => None,
        };
        Ok((solution, trace, path))
    }
}

/// Back-map a tableau driver's outcome into an original-variable solution
fn tableau_solution(std: &standard::StandardModel, outcome: &linear::LpOutcome) -> Solution {
    match outcome.status {
        SolveStatus::Optimal => Solution {
            z: std.original_z(outcome.z()),
            x: std.back_map(&outcome.std_values()),
            status: SolveStatus::Optimal,
            note: None,
        },
        status => Solution::verdict(status),
    }
}
