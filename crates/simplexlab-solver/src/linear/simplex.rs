//! Primal simplex driver (Dantzig rule)

use simplexlab_types::{SolveStatus, SolverConfig, SolverError, Trace};

use super::tableau::Tableau;
use super::LpOutcome;
use crate::standard::StandardModel;

/// Solve a standard model from its initial slack basis
pub fn solve(
    std: &StandardModel,
    config: &SolverConfig,
    trace: &mut Trace,
) -> Result<LpOutcome, SolverError> {
    let mut tableau = Tableau::from_standard(std);
    let status = solve_tableau(&mut tableau, config, trace)?;
    Ok(LpOutcome { tableau, status })
}

/// Run primal iterations on an existing tableau until optimality,
/// unboundedness or the iteration cap
///
/// Pricing picks the column with the most negative reduced cost; the ratio
/// test picks the row minimizing `RHS/coeff` over positive entries, smaller
/// index on ties. A second clamped pivot in one drive aborts with
/// [`SolverError::NumericallyDegenerate`].
pub fn solve_tableau(
    tableau: &mut Tableau,
    config: &SolverConfig,
    trace: &mut Trace,
) -> Result<SolveStatus, SolverError> {
    let mut clamped_pivots = 0;

    for iteration in 1..=config.max_simplex_iters {
        let entering = match tableau.find_entering_variable(config) {
            Some(col) => col,
            None => {
                trace.step(format!(
                    "primal: optimal after {} iterations, Z = {:.4}",
                    iteration - 1,
                    tableau.z()
                ));
                return Ok(SolveStatus::Optimal);
            }
        };

        let leaving = match tableau.find_leaving_variable(entering, config) {
            Some(row) => row,
            None => {
                trace.step(format!(
                    "primal: {} has no positive column entry, problem is unbounded",
                    tableau.col_name(entering)
                ));
                return Ok(SolveStatus::Unbounded);
            }
        };

        trace.step(format!(
            "primal pivot {}: {} enters, {} leaves (row {}, ratio {:.4})",
            iteration,
            tableau.col_name(entering),
            tableau.basis_name(leaving),
            leaving + 1,
            tableau.rhs(leaving) / tableau.data[leaving][entering]
        ));

        if tableau.pivot(entering, leaving, config) {
            clamped_pivots += 1;
            trace.step(format!(
                "primal: pivot element clamped to ±eps at row {}, column {}",
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
        "primal: iteration cap {} reached",
        config.max_simplex_iters
    ));
    Ok(SolveStatus::IterationLimit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard::standardize;
    use approx::assert_relative_eq;
    use simplexlab_types::{Constraint, Model, Sense, SignRestriction};

    fn solve_model(model: &Model) -> (LpOutcome, Trace) {
        let std = standardize(model).unwrap();
        let mut trace = Trace::new();
        let outcome = solve(&std, &SolverConfig::default(), &mut trace).unwrap();
        (outcome, trace)
    }

    #[test]
    fn test_wyndor_optimum() {
        // maximize z = 3x₁ + 5x₂ → Z = 36 at (2, 6)
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

        let (outcome, trace) = solve_model(&model);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_relative_eq!(outcome.z(), 36.0, epsilon = 1e-9);

        let x = outcome.std_values();
        assert_relative_eq!(x[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(x[1], 6.0, epsilon = 1e-9);

        assert!(trace.contains("optimal"));
    }

    #[test]
    fn test_unbounded_detection() {
        // maximize x₁ + x₂ with a cone that lets both grow forever
        let model = Model::new(
            Sense::Max,
            vec![1.0, 1.0],
            vec![
                Constraint::less_eq(vec![1.0, -1.0], 1.0),
                Constraint::less_eq(vec![-1.0, 1.0], 1.0),
            ],
            vec![SignRestriction::NonNegative, SignRestriction::NonNegative],
        )
        .unwrap();

        let (outcome, trace) = solve_model(&model);
        assert_eq!(outcome.status, SolveStatus::Unbounded);
        assert!(trace.contains("unbounded"));
    }

    #[test]
    fn test_min_problem_through_negation() {
        // minimize 2x₁ + 3x₂ with x₁ + x₂ ≤ 4 → optimum at origin, Z = 0
        let model = Model::new(
            Sense::Min,
            vec![2.0, 3.0],
            vec![Constraint::less_eq(vec![1.0, 1.0], 4.0)],
            vec![SignRestriction::NonNegative, SignRestriction::NonNegative],
        )
        .unwrap();

        let (outcome, _) = solve_model(&model);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_relative_eq!(outcome.z(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_trace_records_each_pivot() {
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

        let (_, trace) = solve_model(&model);
        assert!(trace.contains("primal pivot 1:"));
        assert!(trace.contains("enters"));
    }
}
