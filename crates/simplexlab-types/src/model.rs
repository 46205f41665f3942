//! The structured problem description
//!
//! [`Model`] is what the external text parser produces. For reference, the
//! text form it consumes is:
//!
//! ```text
//! max +2 +3 -5          line 1: sense and n signed objective coefficients
//! 1 1 0 <= 40           lines 2..k: coefficients, relation (<=, >=, =), RHS
//! + bin urs             last line: one sign token per variable
//! ```
//!
//! Tokens are whitespace-separated (a trailing `<=40` without a space is
//! accepted and split by the parser); numbers use the invariant locale.
//! The solver core never reads this text itself.

use serde::{Deserialize, Serialize};

use crate::error::SolverError;

/// Optimization sense of the objective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    Max,
    Min,
}

/// Constraint relation as written in the model file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    LessEq,
    GreaterEq,
    Eq,
}

impl Relation {
    /// Token as it appears in the input format (`<=`, `>=`, `=`)
    pub fn token(&self) -> &'static str {
        match self {
            Relation::LessEq => "<=",
            Relation::GreaterEq => ">=",
            Relation::Eq => "=",
        }
    }
}

/// Sign restriction of one decision variable
///
/// Exactly one restriction per variable. `Integer` and `Binary` imply
/// non-negativity; `Binary` additionally implies an upper bound of 1, which
/// the standardizer materializes as an explicit row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignRestriction {
    /// `x ≥ 0` (token `+`)
    NonNegative,
    /// `x ≤ 0` (token `-`)
    NonPositive,
    /// Unrestricted in sign (token `urs`)
    Unrestricted,
    /// Non-negative integer (token `int`)
    Integer,
    /// `x ∈ {0, 1}` (token `bin`)
    Binary,
}

impl SignRestriction {
    /// Whether the variable carries an integrality requirement
    pub fn is_integral(&self) -> bool {
        matches!(self, SignRestriction::Integer | SignRestriction::Binary)
    }
}

/// One constraint row: `coeffs · x  relation  rhs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub coeffs: Vec<f64>,
    pub relation: Relation,
    pub rhs: f64,
}

impl Constraint {
    pub fn new(coeffs: Vec<f64>, relation: Relation, rhs: f64) -> Self {
        Constraint {
            coeffs,
            relation,
            rhs,
        }
    }

    /// `≤` constraint, the only relation the strict standard form accepts
    pub fn less_eq(coeffs: Vec<f64>, rhs: f64) -> Self {
        Constraint::new(coeffs, Relation::LessEq, rhs)
    }
}

/// Immutable LP/MIP description
///
/// This is the structured form the external text parser produces and every
/// driver consumes. Invariants (checked by [`Model::new`]):
/// - every constraint row has exactly `n = objective.len()` coefficients,
/// - there are exactly `n` sign restrictions and `n` labels.
///
/// # Ejemplo
///
/// ```
/// use simplexlab_types::{Constraint, Model, Sense, SignRestriction};
///
/// // maximize z = 3x₁ + 5x₂
/// // subject to:
/// //   x₁ ≤ 4
/// //   2x₂ ≤ 12
/// //   3x₁ + 2x₂ ≤ 18
/// //   x₁, x₂ ≥ 0
/// let model = Model::new(
///     Sense::Max,
///     vec![3.0, 5.0],
///     vec![
///         Constraint::less_eq(vec![1.0, 0.0], 4.0),
///         Constraint::less_eq(vec![0.0, 2.0], 12.0),
///         Constraint::less_eq(vec![3.0, 2.0], 18.0),
///     ],
///     vec![SignRestriction::NonNegative, SignRestriction::NonNegative],
/// )
/// .unwrap();
/// assert_eq!(model.num_vars(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub sense: Sense,
    pub objective: Vec<f64>,
    pub constraints: Vec<Constraint>,
    pub signs: Vec<SignRestriction>,
    pub labels: Vec<String>,
}

impl Model {
    /// Build a model with default labels `X1..Xn`
    pub fn new(
        sense: Sense,
        objective: Vec<f64>,
        constraints: Vec<Constraint>,
        signs: Vec<SignRestriction>,
    ) -> Result<Self, SolverError> {
        let n = objective.len();
        let labels = (1..=n).map(|j| format!("X{}", j)).collect();
        Model::with_labels(sense, objective, constraints, signs, labels)
    }

    /// Build a model with explicit variable labels
    pub fn with_labels(
        sense: Sense,
        objective: Vec<f64>,
        constraints: Vec<Constraint>,
        signs: Vec<SignRestriction>,
        labels: Vec<String>,
    ) -> Result<Self, SolverError> {
        let n = objective.len();
        if signs.len() != n {
            return Err(SolverError::Shape(format!(
                "{} sign restrictions for {} variables",
                signs.len(),
                n
            )));
        }
        if labels.len() != n {
            return Err(SolverError::Shape(format!(
                "{} labels for {} variables",
                labels.len(),
                n
            )));
        }
        for (i, con) in constraints.iter().enumerate() {
            if con.coeffs.len() != n {
                return Err(SolverError::Shape(format!(
                    "constraint {} has {} coefficients, expected {}",
                    i + 1,
                    con.coeffs.len(),
                    n
                )));
            }
        }

        Ok(Model {
            sense,
            objective,
            constraints,
            signs,
            labels,
        })
    }

    /// Number of decision variables (n)
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Number of constraints (m)
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective value of a point given in original variable order
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x.iter()).map(|(c, v)| c * v).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_model() -> Model {
        Model::new(
            Sense::Max,
            vec![2.0, 3.0],
            vec![Constraint::less_eq(vec![1.0, 1.0], 5.0)],
            vec![SignRestriction::NonNegative, SignRestriction::Binary],
        )
        .unwrap()
    }

    #[test]
    fn test_default_labels() {
        let model = small_model();
        assert_eq!(model.labels, vec!["X1", "X2"]);
    }

    #[test]
    fn test_shape_validation() {
        let err = Model::new(
            Sense::Min,
            vec![1.0, 2.0],
            vec![Constraint::less_eq(vec![1.0], 3.0)],
            vec![SignRestriction::NonNegative, SignRestriction::NonNegative],
        )
        .unwrap_err();
        assert!(matches!(err, SolverError::Shape(_)));

        let err = Model::new(
            Sense::Min,
            vec![1.0, 2.0],
            vec![],
            vec![SignRestriction::NonNegative],
        )
        .unwrap_err();
        assert!(matches!(err, SolverError::Shape(_)));
    }

    #[test]
    fn test_objective_value() {
        let model = small_model();
        assert_eq!(model.objective_value(&[4.0, 1.0]), 11.0);
    }

    #[test]
    fn test_integrality_flags() {
        assert!(SignRestriction::Integer.is_integral());
        assert!(SignRestriction::Binary.is_integral());
        assert!(!SignRestriction::Unrestricted.is_integral());
    }
}
