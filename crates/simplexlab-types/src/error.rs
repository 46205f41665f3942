//! Error taxonomy for the solver core
//!
//! Only conditions that abort a solve are errors. Infeasibility,
//! unboundedness and exhausted iteration/node/cut caps are *verdicts*: the
//! drivers report them through `Solution::status` so the step trace always
//! survives alongside them.

use thiserror::Error;

/// Everything that can go wrong before or during a solve
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// Malformed or ambiguous input, surfaced from the external parser
    #[error("parse error: {0}")]
    Parse(String),

    /// The standardizer rejected the model (non-≤ constraint, negative RHS)
    #[error("unsupported form: {0}")]
    UnsupportedForm(String),

    /// Dimension mismatch between coefficient rows, signs and labels
    #[error("shape error: {0}")]
    Shape(String),

    /// Pivot element under tolerance and the one-shot clamp did not resolve
    #[error("numerically degenerate pivot at row {row}, column {col}")]
    NumericallyDegenerate { row: usize, col: usize },

    /// Basis matrix is not invertible (revised simplex)
    #[error("basis matrix is singular")]
    Singular,

    /// Revised simplex found no identity basis in A; run phase I first
    #[error("no identity basis in A: a phase-I method is required")]
    NeedsPhaseOne,
}
