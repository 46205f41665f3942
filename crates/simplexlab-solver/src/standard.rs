//! Canonical-form builder
//!
//! Transforms a [`Model`] into the ≤-only, `b ≥ 0`, maximize-only standard
//! form every simplex driver works on, and records the back-mapping from
//! standard columns to original variables.
//!
//! Per original variable `j` with sign restriction `s`:
//! - `≥0`, `int`, `bin` → one column (`Plus`)
//! - `≤0` → one column `Xj~` substituting `y = -x ≥ 0` (`Flipped`)
//! - `urs` → two columns `Xj+`, `Xj-` with `x = x⁺ - x⁻` (`Plus`/`Minus`)
//!
//! Every binary column additionally appends an `e_k·x ≤ 1` row.
//!
//! A `min` objective is negated so the tableau always maximizes; the
//! original sense is kept so reported `Z` values come back un-negated.

use std::collections::BTreeMap;

use simplexlab_types::{Matrix, Model, Relation, Sense, SignRestriction, SolverError};

/// Which piece of an original variable a standard column carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    /// `x'` enters the back-map with `+1`
    Plus,
    /// The negative half of an urs split, back-map sign `-1`
    Minus,
    /// A flipped `≤0` variable, back-map sign `-1`
    Flipped,
}

impl Part {
    /// Back-map sign: `x_j = Σ sign(part_k) · x'_k`
    pub fn sign(&self) -> f64 {
        match self {
            Part::Plus => 1.0,
            Part::Minus | Part::Flipped => -1.0,
        }
    }
}

/// One standard-form column and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct StdCol {
    /// Display label, e.g. `X1`, `X3~`, `X2+`
    pub name: String,
    /// Index of the original variable this column expands
    pub orig_index: usize,
    pub part: Part,
    pub is_integer: bool,
    pub is_binary: bool,
}

/// ≤-only standard form with the original-model bookkeeping attached
///
/// Rows of `a` correspond to ≤ constraints only; `c` is the maximization
/// objective (negated for `min` models). Branch-and-bound appends rows to a
/// cloned copy, so `a`/`b` stay growable.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardModel {
    pub a: Matrix,
    pub b: Vec<f64>,
    pub c: Vec<f64>,
    pub cols: Vec<StdCol>,

    /// Original objective sense, to un-negate reported `Z`
    pub sense: Sense,
    /// Original variable labels, in original order
    pub labels: Vec<String>,
    /// Original sign restrictions, in original order
    pub signs: Vec<SignRestriction>,
}

impl StandardModel {
    /// Number of structural (standard) columns
    pub fn num_cols(&self) -> usize {
        self.cols.len()
    }

    /// Number of ≤ rows
    pub fn num_rows(&self) -> usize {
        self.b.len()
    }

    /// Map a standard-space point back to original variables
    ///
    /// `x_j = Σ sign(part_k) · x'_k` over every column `k` expanding `j`.
    pub fn back_map(&self, std_x: &[f64]) -> BTreeMap<String, f64> {
        let mut out: BTreeMap<String, f64> = self
            .labels
            .iter()
            .map(|l| (l.clone(), 0.0))
            .collect();
        for (k, col) in self.cols.iter().enumerate() {
            let entry = out
                .get_mut(&self.labels[col.orig_index])
                .expect("std column maps to a known label");
            *entry += col.part.sign() * std_x[k];
        }
        out
    }

    /// Original-variable values in original index order
    pub fn back_map_vec(&self, std_x: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.labels.len()];
        for (k, col) in self.cols.iter().enumerate() {
            out[col.orig_index] += col.part.sign() * std_x[k];
        }
        out
    }

    /// Un-negate a standard (maximization) objective value into the
    /// original sense
    pub fn original_z(&self, std_z: f64) -> f64 {
        match self.sense {
            Sense::Max => std_z,
            Sense::Min => -std_z,
        }
    }

    /// Standard-space row expressing `+1 · x_j` for original variable `j`
    ///
    /// Used by branch-and-bound to encode `x_j ≤ ⌊v⌋` (as-is) and
    /// `x_j ≥ ⌈v⌉` (negated) as appended ≤ rows.
    pub fn unit_row(&self, orig_j: usize) -> Vec<f64> {
        let mut row = vec![0.0; self.num_cols()];
        for (k, col) in self.cols.iter().enumerate() {
            if col.orig_index == orig_j {
                row[k] = col.part.sign();
            }
        }
        row
    }

    /// Append one ≤ row (coefficients over standard columns)
    pub fn push_row(&mut self, row: &[f64], rhs: f64) -> Result<(), SolverError> {
        self.a.push_row(row)?;
        self.b.push(rhs);
        Ok(())
    }

    /// Whether `row ≤ rhs` duplicates an existing row component-wise
    /// within `eps`
    pub fn has_duplicate_row(&self, row: &[f64], rhs: f64, eps: f64) -> bool {
        (0..self.num_rows()).any(|i| {
            (self.b[i] - rhs).abs() <= eps
                && self
                    .a
                    .row(i)
                    .iter()
                    .zip(row.iter())
                    .all(|(a, b)| (a - b).abs() <= eps)
        })
    }
}

/// Build the strict standard form: every constraint must already be `≤`
/// with a non-negative RHS
pub fn standardize(model: &Model) -> Result<StandardModel, SolverError> {
    for (i, con) in model.constraints.iter().enumerate() {
        if con.relation != Relation::LessEq {
            return Err(SolverError::UnsupportedForm(format!(
                "constraint {} uses '{}': only <= constraints are supported",
                i + 1,
                con.relation.token()
            )));
        }
        if con.rhs < 0.0 {
            return Err(SolverError::UnsupportedForm(format!(
                "constraint {} has negative RHS {}",
                i + 1,
                con.rhs
            )));
        }
    }
    build(model, model.constraints.iter().map(|c| (c.coeffs.clone(), c.rhs)))
}

/// Build the relaxed standard form: `≥` rows are flipped into `≤` rows with
/// negated coefficients, and a negative RHS is permitted
///
/// The resulting tableau is generally primal-infeasible at the slack basis;
/// it is meant for the two-phase driver (the duality module solves the
/// constructed dual this way). `=` rows remain unsupported.
pub fn standardize_relaxed(model: &Model) -> Result<StandardModel, SolverError> {
    let mut rows = Vec::with_capacity(model.num_constraints());
    for (i, con) in model.constraints.iter().enumerate() {
        match con.relation {
            Relation::LessEq => rows.push((con.coeffs.clone(), con.rhs)),
            Relation::GreaterEq => {
                let flipped = con.coeffs.iter().map(|v| -v).collect();
                rows.push((flipped, -con.rhs));
            }
            Relation::Eq => {
                return Err(SolverError::UnsupportedForm(format!(
                    "constraint {} uses '=': equality rows are not supported",
                    i + 1
                )));
            }
        }
    }
    build(model, rows.into_iter())
}

fn build(
    model: &Model,
    rows: impl Iterator<Item = (Vec<f64>, f64)>,
) -> Result<StandardModel, SolverError> {
    let n = model.num_vars();

    // Expand sign restrictions into standard columns
    let mut cols: Vec<StdCol> = Vec::with_capacity(n);
    for j in 0..n {
        let label = &model.labels[j];
        match model.signs[j] {
            SignRestriction::NonNegative
            | SignRestriction::Integer
            | SignRestriction::Binary => {
                // One SignRestriction per variable makes the bin+urs and
                // bin+<=0 combinations unrepresentable here.
                let s = model.signs[j];
                cols.push(StdCol {
                    name: label.clone(),
                    orig_index: j,
                    part: Part::Plus,
                    is_integer: s.is_integral(),
                    is_binary: s == SignRestriction::Binary,
                });
            }
            SignRestriction::NonPositive => {
                cols.push(StdCol {
                    name: format!("{}~", label),
                    orig_index: j,
                    part: Part::Flipped,
                    is_integer: false,
                    is_binary: false,
                });
            }
            SignRestriction::Unrestricted => {
                cols.push(StdCol {
                    name: format!("{}+", label),
                    orig_index: j,
                    part: Part::Plus,
                    is_integer: false,
                    is_binary: false,
                });
                cols.push(StdCol {
                    name: format!("{}-", label),
                    orig_index: j,
                    part: Part::Minus,
                    is_integer: false,
                    is_binary: false,
                });
            }
        }
    }
    let n_std = cols.len();

    // Objective, always as maximization: c'_k = ±c_j · sign(part_k)
    let sense_factor = match model.sense {
        Sense::Max => 1.0,
        Sense::Min => -1.0,
    };
    let c: Vec<f64> = cols
        .iter()
        .map(|col| sense_factor * model.objective[col.orig_index] * col.part.sign())
        .collect();

    // Constraint rows under the same substitution
    let mut a = Matrix::zeros(0, n_std);
    let mut b = Vec::new();
    for (coeffs, rhs) in rows {
        let row: Vec<f64> = cols
            .iter()
            .map(|col| coeffs[col.orig_index] * col.part.sign())
            .collect();
        a.push_row(&row)?;
        b.push(rhs);
    }

    // One e_k·x ≤ 1 row per binary column
    for k in 0..n_std {
        if cols[k].is_binary {
            let mut row = vec![0.0; n_std];
            row[k] = 1.0;
            a.push_row(&row)?;
            b.push(1.0);
        }
    }

    Ok(StandardModel {
        a,
        b,
        c,
        cols,
        sense: model.sense,
        labels: model.labels.clone(),
        signs: model.signs.clone(),
    })
}
