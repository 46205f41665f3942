use serde::{Deserialize, Serialize};

/// Process-wide numerical tolerances and iteration caps
///
/// These are the only tuning knobs of the core. They are configuration
/// *values*, not mutable globals: every driver takes a `&SolverConfig` and
/// the defaults below are the documented behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Matrix tolerance: pivot admissibility, reduced-cost signs, RHS signs
    pub eps: f64,

    /// Integrality tolerance for branch-and-bound and the cut loop
    pub frac_eps: f64,

    /// Unit-column tolerance when classifying basic variables
    pub basis_eps: f64,

    /// Fractional parts within this of 0 or 1 are treated as whole when a
    /// Gomory cut row is built
    pub frac_clamp: f64,

    /// Primal and dual simplex iteration cap
    pub max_simplex_iters: usize,

    /// Phase-I repair loop iteration cap
    pub max_phase1_iters: usize,

    /// Revised simplex iteration cap
    pub max_revised_iters: usize,

    /// Gomory cut cap
    pub max_cuts: usize,

    /// Branch-and-bound node cap
    pub max_nodes: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            eps: 1e-9,
            frac_eps: 1e-6,
            basis_eps: 1e-10,
            frac_clamp: 1e-12,
            max_simplex_iters: 2000,
            max_phase1_iters: 1000,
            max_revised_iters: 500,
            max_cuts: 50,
            max_nodes: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_defaults() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.eps, 1e-9);
        assert_eq!(cfg.frac_eps, 1e-6);
        assert_eq!(cfg.max_simplex_iters, 2000);
        assert_eq!(cfg.max_phase1_iters, 1000);
        assert_eq!(cfg.max_revised_iters, 500);
        assert_eq!(cfg.max_cuts, 50);
        assert_eq!(cfg.max_nodes, 2000);
    }
}
