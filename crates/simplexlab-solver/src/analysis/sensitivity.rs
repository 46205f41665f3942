//! Ranging and shadow-price analysis on the optimal tableau
//!
//! A target coefficient is addressed by `(row_name, col_name)`:
//! - `("Z", "X1")`: objective coefficient of `X1`
//! - `("C2", "RHS")`: right-hand side of constraint 2
//! - `("C2", "X1")`: constraint coefficient
//!
//! The RHS range uses a simplified closed form (allowable decrease equal to
//! the current RHS); the trace marks it as such.

use simplexlab_types::{SolveStatus, SolverConfig, SolverError, Trace};

use crate::linear::Tableau;

/// Name of the objective row in analysis coordinates
pub const OBJ_ROW: &str = "Z";
/// Name of the right-hand-side column in analysis coordinates
pub const RHS_COL: &str = "RHS";

/// What kind of coefficient a coordinate addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    ObjectiveNonBasic,
    ObjectiveBasic,
    Rhs,
    ConstraintCoeff,
}

/// Allowable range around one coefficient of the optimal tableau
///
/// Decrease/increase are magnitudes; `f64::INFINITY` means unbounded in
/// that direction. A `ConstraintCoeff` target carries a zero-width range:
/// its true range would require re-solving after perturbation.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranging {
    pub kind: TargetKind,
    pub row_name: String,
    pub col_name: String,
    pub current: f64,
    pub allowable_decrease: f64,
    pub allowable_increase: f64,
    /// Only set for RHS targets
    pub shadow_price: Option<f64>,
    pub note: Option<String>,
}

impl Ranging {
    /// Whether a move of `delta` stays inside the allowable range
    ///
    /// The editor computes `delta` against the *model's* coefficient; for a
    /// basic objective target the tableau no longer stores that value, so
    /// the range is inherently delta-shaped.
    pub fn contains_delta(&self, delta: f64) -> bool {
        if delta < 0.0 {
            self.allowable_decrease.is_infinite() || -delta <= self.allowable_decrease + 1e-9
        } else {
            self.allowable_increase.is_infinite() || delta <= self.allowable_increase + 1e-9
        }
    }

    /// Whether `new_value` stays inside `[current - decrease, current + increase]`
    pub fn contains(&self, new_value: f64) -> bool {
        self.contains_delta(new_value - self.current)
    }
}

/// Ranging queries against one optimal tableau
#[derive(Debug)]
pub struct Analysis<'a> {
    tableau: &'a Tableau,
    config: &'a SolverConfig,
}

impl<'a> Analysis<'a> {
    /// Requires an optimal tableau; anything else makes ranging meaningless
    pub fn new(
        tableau: &'a Tableau,
        status: SolveStatus,
        config: &'a SolverConfig,
    ) -> Result<Self, SolverError> {
        if status != SolveStatus::Optimal {
            return Err(SolverError::UnsupportedForm(format!(
                "sensitivity analysis requires an optimal tableau, got {:?}",
                status
            )));
        }
        Ok(Analysis { tableau, config })
    }

    /// `(row, column)` pairs where a column acts as the identity for a row
    ///
    /// Scans every non-RHS column for a single 1 with zeros elsewhere,
    /// within the basis classification tolerance.
    pub fn basic_variables(&self) -> Vec<(usize, usize)> {
        let t = self.tableau;
        let eps = self.config.basis_eps;
        let mut found = Vec::new();

        for j in 0..t.rhs_col() {
            let mut one_row = None;
            let mut is_unit = true;
            for i in 0..t.num_rows() {
                let v = t.data[i][j];
                if (v - 1.0).abs() <= eps {
                    if one_row.is_some() {
                        is_unit = false;
                        break;
                    }
                    one_row = Some(i);
                } else if v.abs() > eps {
                    is_unit = false;
                    break;
                }
            }
            // The objective row entry must vanish too, or the column is not
            // a basis vector of the optimal tableau
            if is_unit && t.data[t.obj_row()][j].abs() > eps {
                is_unit = false;
            }
            if is_unit {
                if let Some(i) = one_row {
                    found.push((i, j));
                }
            }
        }

        found
    }

    /// Range the coefficient addressed by `(row_name, col_name)`
    pub fn range(
        &self,
        row_name: &str,
        col_name: &str,
        trace: &mut Trace,
    ) -> Result<Ranging, SolverError> {
        if row_name == OBJ_ROW {
            let col = self.column_index(col_name)?;
            return Ok(self.range_objective(col_name, col, trace));
        }

        let row = self.row_index(row_name)?;
        if col_name == RHS_COL {
            return Ok(self.range_rhs(row_name, row, trace));
        }

        let col = self.column_index(col_name)?;
        Ok(self.range_constraint_coeff(row_name, row, col_name, col, trace))
    }

    fn range_objective(&self, col_name: &str, col: usize, trace: &mut Trace) -> Ranging {
        let t = self.tableau;
        let basic_row = self
            .basic_variables()
            .into_iter()
            .find(|&(_, j)| j == col)
            .map(|(i, _)| i);

        match basic_row {
            None => {
                // Non-basic: the reduced cost itself bounds the move
                let reduced_cost = t.data[t.obj_row()][col];
                let allowable_decrease = if reduced_cost > 0.0 {
                    reduced_cost
                } else {
                    f64::INFINITY
                };
                let allowable_increase = if reduced_cost < 0.0 {
                    -reduced_cost
                } else {
                    f64::INFINITY
                };
                trace.step(format!(
                    "ranging Z/{}: non-basic, reduced cost {:.4}",
                    col_name, reduced_cost
                ));
                Ranging {
                    kind: TargetKind::ObjectiveNonBasic,
                    row_name: OBJ_ROW.to_string(),
                    col_name: col_name.to_string(),
                    current: reduced_cost,
                    allowable_decrease,
                    allowable_increase,
                    shadow_price: None,
                    note: None,
                }
            }
            Some(r) => {
                // Basic in row r: per-column ratios bound the coefficient
                let obj = t.obj_row();
                let mut allowable_decrease = f64::INFINITY;
                let mut allowable_increase = f64::INFINITY;
                for k in 0..t.rhs_col() {
                    if k == col || t.data[r][k].abs() <= self.config.eps {
                        continue;
                    }
                    let rho = -t.data[obj][k] / t.data[r][k];
                    if rho > 0.0 && rho < allowable_increase {
                        allowable_increase = rho;
                    }
                    if rho < 0.0 && -rho < allowable_decrease {
                        allowable_decrease = -rho;
                    }
                }
                trace.step(format!(
                    "ranging Z/{}: basic in row {}, range -{:.4}/+{:.4}",
                    col_name,
                    r + 1,
                    allowable_decrease,
                    allowable_increase
                ));
                Ranging {
                    kind: TargetKind::ObjectiveBasic,
                    row_name: OBJ_ROW.to_string(),
                    col_name: col_name.to_string(),
                    current: 0.0,
                    allowable_decrease,
                    allowable_increase,
                    shadow_price: None,
                    note: None,
                }
            }
        }
    }

    fn range_rhs(&self, row_name: &str, row: usize, trace: &mut Trace) -> Ranging {
        let t = self.tableau;
        // B⁻¹ lives in the slack columns, so the slack of this row prices it
        let slack_col = t.num_structural + row;
        let shadow_price = t.data[t.obj_row()][slack_col];
        let current = t.rhs(row);

        trace.step(format!(
            "ranging {}/RHS: shadow price {:.4}, allowable decrease {:.4} (simplified)",
            row_name, shadow_price, current
        ));
        Ranging {
            kind: TargetKind::Rhs,
            row_name: row_name.to_string(),
            col_name: RHS_COL.to_string(),
            current,
            allowable_decrease: current,
            allowable_increase: f64::INFINITY,
            shadow_price: Some(shadow_price),
            note: Some("simplified closed form".to_string()),
        }
    }

    fn range_constraint_coeff(
        &self,
        row_name: &str,
        row: usize,
        col_name: &str,
        col: usize,
        trace: &mut Trace,
    ) -> Ranging {
        let current = self.tableau.data[row][col];
        trace.step(format!(
            "ranging {}/{}: constraint coefficient {:.4}, full range requires re-solving",
            row_name, col_name, current
        ));
        Ranging {
            kind: TargetKind::ConstraintCoeff,
            row_name: row_name.to_string(),
            col_name: col_name.to_string(),
            current,
            allowable_decrease: 0.0,
            allowable_increase: 0.0,
            shadow_price: None,
            note: Some("full range requires re-solving after perturbation".to_string()),
        }
    }

    fn column_index(&self, col_name: &str) -> Result<usize, SolverError> {
        self.tableau
            .col_names
            .iter()
            .position(|n| n == col_name)
            .ok_or_else(|| SolverError::UnsupportedForm(format!("unknown column '{}'", col_name)))
    }

    fn row_index(&self, row_name: &str) -> Result<usize, SolverError> {
        let idx = row_name
            .strip_prefix('C')
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&i| i >= 1 && i <= self.tableau.num_rows());
        match idx {
            Some(i) => Ok(i - 1),
            None => Err(SolverError::UnsupportedForm(format!(
                "unknown row '{}'",
                row_name
            ))),
        }
    }
}
