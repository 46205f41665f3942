//! Linear-programming drivers over the dense simplex tableau
//!
//! All four variants share the [`Tableau`] pivot primitive: the primal and
//! dual drivers mutate a tableau in place, the two-phase driver chains a
//! repair loop into the primal driver, and the revised driver works on the
//! standard model through an explicit basis inverse instead.

pub mod dual_simplex;
pub mod revised_simplex;
pub mod simplex;
pub mod tableau;
pub mod two_phase;

pub use tableau::Tableau;

use simplexlab_types::SolveStatus;

/// A tableau driver's result: the final tableau plus its verdict
///
/// The tableau is returned even on non-optimal verdicts so post-mortem
/// inspection (and the editor's re-solve path) can look at where the drive
/// stopped.
#[derive(Debug, Clone)]
pub struct LpOutcome {
    pub tableau: Tableau,
    pub status: SolveStatus,
}

impl LpOutcome {
    /// Current objective value of the maximization form
    pub fn z(&self) -> f64 {
        self.tableau.z()
    }

    /// Structural-column values at the final basic solution
    pub fn std_values(&self) -> Vec<f64> {
        self.tableau.structural_values()
    }
}
