//! Guarded model edits on an optimal solve
//!
//! The editor owns a model together with its optimal tableau. Every edit
//! goes through ranging first: a move inside the allowable range updates
//! the tableau algebraically and keeps the basis (zero further pivots); a
//! move outside it re-standardizes the model and re-solves from scratch,
//! with a dual→primal repair when the fresh tableau starts infeasible.
//!
//! Edits address original-model coordinates: `("Z", "X1")` for an objective
//! entry, `("C2", "RHS")` for a right-hand side, `("C2", "X1")` for a
//! constraint coefficient. Each applied edit is appended to
//! `sensitivity_analysis_log.txt` when a log directory is configured.

use std::path::PathBuf;

use simplexlab_types::{
    Constraint, Model, Sense, SignRestriction, Solution, SolveStatus, SolverConfig, SolverError,
    Trace,
};

use super::sensitivity::{Analysis, Ranging, TargetKind, OBJ_ROW, RHS_COL};
use crate::linear::{dual_simplex, simplex, Tableau};
use crate::report;
use crate::standard::{standardize, standardize_relaxed, Part, StandardModel};

/// What an edit did to the stored solve
#[derive(Debug, Clone)]
pub enum EditVerdict {
    /// New value inside the allowable range: tableau updated in place, the
    /// current basis stays optimal
    InRange(Ranging),
    /// Re-standardized and re-solved; the verdict of the fresh solve
    Reoptimized(SolveStatus),
}

/// A model plus its optimal tableau, open for post-optimality edits
#[derive(Debug)]
pub struct Editor {
    model: Model,
    std: StandardModel,
    tableau: Tableau,
    status: SolveStatus,
    config: SolverConfig,
    log_dir: Option<PathBuf>,
}

impl Editor {
    /// Solve the model with the primal driver and hold its tableau
    pub fn new(
        model: Model,
        config: SolverConfig,
        trace: &mut Trace,
    ) -> Result<Self, SolverError> {
        let std = standardize(&model)?;
        let outcome = simplex::solve(&std, &config, trace)?;
        Ok(Editor {
            model,
            std,
            tableau: outcome.tableau,
            status: outcome.status,
            config,
            log_dir: None,
        })
    }

    /// Append each edit to `<dir>/sensitivity_analysis_log.txt`
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    /// Current solution in original variables
    pub fn solution(&self) -> Solution {
        let orig_x = self.std.back_map(&self.tableau.structural_values());
        Solution {
            z: self.std.original_z(self.tableau.z()),
            x: orig_x,
            status: self.status,
            note: None,
        }
    }

    /// Apply `(row_name, col_name) := new_value` with a ranging guard
    pub fn edit(
        &mut self,
        row_name: &str,
        col_name: &str,
        new_value: f64,
        trace: &mut Trace,
    ) -> Result<EditVerdict, SolverError> {
        let target = self.resolve_target(row_name, col_name)?;
        let old_value = target.model_value(&self.model);
        let delta = new_value - old_value;

        let ranging = {
            let analysis = Analysis::new(&self.tableau, self.status, &self.config)?;
            analysis.range(row_name, col_name, trace)?
        };

        target.write_model(&mut self.model, new_value);

        let verdict = if ranging.contains_delta(delta) {
            self.apply_in_place(&target, delta, &ranging, trace);
            // Keep the standard form in sync with the edited model; the
            // relaxed build tolerates an RHS that was edited below zero
            self.std = standardize_relaxed(&self.model)?;
            trace.step(format!(
                "edit {}/{}: {:.4} -> {:.4} in range, basis unchanged, Z = {:.4}",
                row_name,
                col_name,
                old_value,
                new_value,
                self.std.original_z(self.tableau.z())
            ));
            EditVerdict::InRange(ranging)
        } else {
            trace.step(format!(
                "edit {}/{}: {:.4} -> {:.4} outside range, re-optimizing",
                row_name, col_name, old_value, new_value
            ));
            let status = self.resolve(trace)?;
            EditVerdict::Reoptimized(status)
        };

        self.log_edit(row_name, col_name, old_value, new_value, &verdict, trace);
        Ok(verdict)
    }

    /// Append a constraint and re-solve
    pub fn add_constraint(
        &mut self,
        constraint: Constraint,
        trace: &mut Trace,
    ) -> Result<SolveStatus, SolverError> {
        let mut candidate = self.model.clone();
        candidate.constraints.push(constraint);
        // Validate before committing: a >= or = row is rejected here
        standardize(&candidate)?;
        self.model = candidate;
        trace.step(format!(
            "add constraint C{}: re-optimizing",
            self.model.num_constraints()
        ));
        self.resolve(trace)
    }

    /// Append a variable (objective entry, one coefficient per constraint,
    /// sign restriction) and re-solve
    pub fn add_variable(
        &mut self,
        label: impl Into<String>,
        objective: f64,
        column: &[f64],
        sign: SignRestriction,
        trace: &mut Trace,
    ) -> Result<SolveStatus, SolverError> {
        if column.len() != self.model.num_constraints() {
            return Err(SolverError::Shape(format!(
                "variable column has {} coefficients for {} constraints",
                column.len(),
                self.model.num_constraints()
            )));
        }
        let label = label.into();
        self.model.objective.push(objective);
        self.model.signs.push(sign);
        self.model.labels.push(label.clone());
        for (con, &coeff) in self.model.constraints.iter_mut().zip(column.iter()) {
            con.coeffs.push(coeff);
        }
        trace.step(format!("add variable {}: re-optimizing", label));
        self.resolve(trace)
    }

    /// In-range updates: algebraic tableau maintenance, no pivots
    fn apply_in_place(
        &mut self,
        target: &Target,
        delta: f64,
        ranging: &Ranging,
        trace: &mut Trace,
    ) {
        let obj = self.tableau.obj_row();
        match (&ranging.kind, target) {
            (TargetKind::ObjectiveBasic, Target::Objective { std_col, .. }) => {
                // c_B changed: objective row absorbs delta times the basic
                // row, except the variable's own column which stays zero
                let std_delta = self.std_delta(delta);
                let row = self
                    .tableau
                    .basis
                    .iter()
                    .position(|&c| c == *std_col)
                    .expect("ranging classified the column as basic");
                for j in 0..self.tableau.width() {
                    let v = self.tableau.data[row][j];
                    self.tableau.data[obj][j] += std_delta * v;
                }
                self.tableau.data[obj][*std_col] -= std_delta;
            }
            (TargetKind::ObjectiveNonBasic, Target::Objective { std_col, .. }) => {
                let std_delta = self.std_delta(delta);
                self.tableau.data[obj][*std_col] -= std_delta;
            }
            (TargetKind::Rhs, Target::Rhs { row }) => {
                // B⁻¹ e_i sits in the slack column of row i, so the RHS
                // column moves by delta times that column
                let slack_col = self.tableau.num_structural + row;
                let rhs_col = self.tableau.rhs_col();
                for i in 0..=obj {
                    let v = self.tableau.data[i][slack_col];
                    self.tableau.data[i][rhs_col] += delta * v;
                }
            }
            _ => {
                // Zero-width ranges only admit delta == 0: nothing to write
                trace.step("edit is a no-op on the tableau".to_string());
            }
        }
    }

    /// Objective deltas live in the maximization form
    fn std_delta(&self, delta: f64) -> f64 {
        match self.model.sense {
            Sense::Max => delta,
            Sense::Min => -delta,
        }
    }

    /// Re-standardize and re-solve: primal, then dual repair + primal when
    /// the fresh tableau starts with a negative RHS (an RHS edited below
    /// zero survives the relaxed build and lands in the dual branch)
    fn resolve(&mut self, trace: &mut Trace) -> Result<SolveStatus, SolverError> {
        self.std = standardize_relaxed(&self.model)?;
        let mut tableau = Tableau::from_standard(&self.std);

        if !tableau.is_primal_feasible(&self.config) {
            trace.step("re-solve starts primal-infeasible, dual simplex first");
            let status = dual_simplex::solve_tableau(&mut tableau, &self.config, trace)?;
            if status != SolveStatus::Optimal {
                self.tableau = tableau;
                self.status = status;
                return Ok(status);
            }
        }

        let status = simplex::solve_tableau(&mut tableau, &self.config, trace)?;
        self.tableau = tableau;
        self.status = status;
        Ok(status)
    }

    fn resolve_target(&self, row_name: &str, col_name: &str) -> Result<Target, SolverError> {
        if row_name == OBJ_ROW {
            let (orig, std_col) = self.structural_column(col_name)?;
            return Ok(Target::Objective { orig, std_col });
        }

        let row = row_name
            .strip_prefix('C')
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&i| i >= 1 && i <= self.model.num_constraints())
            .map(|i| i - 1)
            .ok_or_else(|| {
                SolverError::UnsupportedForm(format!("unknown constraint row '{}'", row_name))
            })?;

        if col_name == RHS_COL {
            return Ok(Target::Rhs { row });
        }
        let (orig, _) = self.structural_column(col_name)?;
        Ok(Target::Coefficient { row, orig })
    }

    /// Original index and standard column of a plainly-mapped variable
    ///
    /// Only `Plus` columns keep the original label; flipped and urs-split
    /// variables have no single tableau cell to edit, so they are
    /// addressed through re-optimization by construction.
    fn structural_column(&self, label: &str) -> Result<(usize, usize), SolverError> {
        self.std
            .cols
            .iter()
            .position(|c| c.name == label && c.part == Part::Plus)
            .map(|k| (self.std.cols[k].orig_index, k))
            .ok_or_else(|| {
                SolverError::UnsupportedForm(format!("unknown variable column '{}'", label))
            })
    }

    fn log_edit(
        &self,
        row_name: &str,
        col_name: &str,
        old_value: f64,
        new_value: f64,
        verdict: &EditVerdict,
        trace: &mut Trace,
    ) {
        let Some(dir) = &self.log_dir else {
            return;
        };
        let entry = match verdict {
            EditVerdict::InRange(r) => format!(
                "edit {}/{}: {:.6} -> {:.6} | range -{:.6}/+{:.6} | in range, Z = {:.6}",
                row_name,
                col_name,
                old_value,
                new_value,
                r.allowable_decrease,
                r.allowable_increase,
                self.std.original_z(self.tableau.z())
            ),
            EditVerdict::Reoptimized(status) => format!(
                "edit {}/{}: {:.6} -> {:.6} | out of range | re-solved: {:?}",
                row_name, col_name, old_value, new_value, status
            ),
        };
        report::append_sensitivity_log(dir, &entry, trace);
    }
}

/// Resolved edit coordinate
enum Target {
    Objective { orig: usize, std_col: usize },
    Rhs { row: usize },
    Coefficient { row: usize, orig: usize },
}

impl Target {
    fn model_value(&self, model: &Model) -> f64 {
        match self {
            Target::Objective { orig, .. } => model.objective[*orig],
            Target::Rhs { row } => model.constraints[*row].rhs,
            Target::Coefficient { row, orig } => model.constraints[*row].coeffs[*orig],
        }
    }

    fn write_model(&self, model: &mut Model, value: f64) {
        match self {
            Target::Objective { orig, .. } => model.objective[*orig] = value,
            Target::Rhs { row } => model.constraints[*row].rhs = value,
            Target::Coefficient { row, orig } => model.constraints[*row].coeffs[*orig] = value,
        }
    }

}
