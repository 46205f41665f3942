//! Primal↔dual construction and strong-duality verification
//!
//! The dual swaps `b` with `c`, transposes `A` and flips the sense; dual
//! variables are non-negative and the dual relations are `≥` for a `max`
//! primal, `≤` for a `min` primal. The dual of a `max`/`≤` model therefore
//! carries `≥` rows, which the strict standard form refuses; it is solved
//! through the relaxed standardization (flipped rows, negative RHS) and the
//! two-phase driver, which hands the tableau to the primal simplex as soon
//! as it is feasible.

use simplexlab_types::{
    Constraint, Model, Relation, Sense, Solution, SolveStatus, SolverConfig, SolverError, Trace,
};

use crate::linear::two_phase;
use crate::standard::standardize_relaxed;

/// `|z_primal - z_dual|` below this counts as strong duality
pub const STRONG_DUALITY_EPS: f64 = 1e-6;

/// Outcome of solving a primal/dual pair
#[derive(Debug, Clone)]
pub struct DualityReport {
    pub primal: Solution,
    pub dual: Solution,
    /// `true` when both solves are optimal and the optima agree within
    /// [`STRONG_DUALITY_EPS`]
    pub strong: bool,
}

/// Construct the dual model (`Y1..Ym` variables, all non-negative)
pub fn dual_model(model: &Model) -> Result<Model, SolverError> {
    let m = model.num_constraints();
    let n = model.num_vars();

    let (dual_sense, dual_relation) = match model.sense {
        Sense::Max => (Sense::Min, Relation::GreaterEq),
        Sense::Min => (Sense::Max, Relation::LessEq),
    };

    // Dual objective is the primal RHS
    let objective: Vec<f64> = model.constraints.iter().map(|c| c.rhs).collect();

    // One dual constraint per primal variable: Aᵀ rows against c
    let mut constraints = Vec::with_capacity(n);
    for j in 0..n {
        let coeffs: Vec<f64> = model.constraints.iter().map(|c| c.coeffs[j]).collect();
        constraints.push(Constraint::new(coeffs, dual_relation, model.objective[j]));
    }

    let signs = vec![simplexlab_types::SignRestriction::NonNegative; m];
    let labels = (1..=m).map(|i| format!("Y{}", i)).collect();
    Model::with_labels(dual_sense, objective, constraints, signs, labels)
}

/// Solve both problems and compare their optima
pub fn verify_strong_duality(
    model: &Model,
    config: &SolverConfig,
    trace: &mut Trace,
) -> Result<DualityReport, SolverError> {
    trace.step("duality: solving the primal");
    let primal = solve_general(model, config, trace)?;

    let dual = dual_model(model)?;
    trace.step("duality: solving the constructed dual");
    let dual = solve_general(&dual, config, trace)?;

    let strong = primal.status == SolveStatus::Optimal
        && dual.status == SolveStatus::Optimal
        && (primal.z - dual.z).abs() < STRONG_DUALITY_EPS;
    trace.step(if strong {
        format!(
            "duality: strong duality holds, Z_primal = {:.6}, Z_dual = {:.6}",
            primal.z, dual.z
        )
    } else {
        format!(
            "duality: weak duality only ({:?} / {:?})",
            primal.status, dual.status
        )
    });

    Ok(DualityReport {
        primal,
        dual,
        strong,
    })
}

/// Solve a model that may carry `≥` rows: relaxed standardization, then the
/// two-phase driver
fn solve_general(
    model: &Model,
    config: &SolverConfig,
    trace: &mut Trace,
) -> Result<Solution, SolverError> {
    let std = standardize_relaxed(model)?;
    let outcome = two_phase::solve(&std, config, trace)?;
    let x = std.back_map(&outcome.std_values());
    Ok(Solution {
        z: std.original_z(outcome.z()),
        x,
        status: outcome.status,
        note: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use simplexlab_types::SignRestriction;

    fn wyndor() -> Model {
        Model::new(
            Sense::Max,
            vec![3.0, 5.0],
            vec![
                Constraint::less_eq(vec![1.0, 0.0], 4.0),
                Constraint::less_eq(vec![0.0, 2.0], 12.0),
                Constraint::less_eq(vec![3.0, 2.0], 18.0),
            ],
            vec![SignRestriction::NonNegative, SignRestriction::NonNegative],
        )
        .unwrap()
    }

    #[test]
    fn test_dual_construction() {
        let dual = dual_model(&wyndor()).unwrap();

        assert_eq!(dual.sense, Sense::Min);
        assert_eq!(dual.objective, vec![4.0, 12.0, 18.0]);
        assert_eq!(dual.num_constraints(), 2);
        assert_eq!(dual.constraints[0].coeffs, vec![1.0, 0.0, 3.0]);
        assert_eq!(dual.constraints[0].relation, Relation::GreaterEq);
        assert_eq!(dual.constraints[0].rhs, 3.0);
        assert_eq!(dual.constraints[1].coeffs, vec![0.0, 2.0, 2.0]);
        assert_eq!(dual.labels, vec!["Y1", "Y2", "Y3"]);
    }

    #[test]
    fn test_strong_duality_on_bounded_primal() {
        let mut trace = Trace::new();
        let report =
            verify_strong_duality(&wyndor(), &SolverConfig::default(), &mut trace).unwrap();

        assert!(report.strong);
        assert_relative_eq!(report.primal.z, 36.0, epsilon = 1e-6);
        assert_relative_eq!(report.dual.z, 36.0, epsilon = 1e-6);

        // Dual optimum is the shadow-price vector (0, 1.5, 1)
        assert_relative_eq!(report.dual.value("Y1"), 0.0, epsilon = 1e-6);
        assert_relative_eq!(report.dual.value("Y2"), 1.5, epsilon = 1e-6);
        assert_relative_eq!(report.dual.value("Y3"), 1.0, epsilon = 1e-6);
        assert!(trace.contains("strong duality holds"));
    }

    #[test]
    fn test_unbounded_primal_reports_weak() {
        // Unbounded primal pairs with an infeasible dual
        let model = Model::new(
            Sense::Max,
            vec![1.0, 1.0],
            vec![Constraint::less_eq(vec![1.0, -1.0], 1.0)],
            vec![SignRestriction::NonNegative, SignRestriction::NonNegative],
        )
        .unwrap();

        let mut trace = Trace::new();
        let report =
            verify_strong_duality(&model, &SolverConfig::default(), &mut trace).unwrap();
        assert!(!report.strong);
        assert_eq!(report.primal.status, SolveStatus::Unbounded);
        assert_ne!(report.dual.status, SolveStatus::Optimal);
        assert!(trace.contains("weak duality"));
    }

    #[test]
    fn test_dual_of_dual_objective_matches() {
        // min over the dual of the dual reproduces the primal optimum
        let dual = dual_model(&wyndor()).unwrap();
        let bidual = dual_model(&dual).unwrap();

        assert_eq!(bidual.sense, Sense::Max);
        assert_eq!(bidual.objective, vec![3.0, 5.0]);
        assert_eq!(bidual.constraints[0].relation, Relation::LessEq);
    }
}
