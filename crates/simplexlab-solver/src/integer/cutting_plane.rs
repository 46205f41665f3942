//! Gomory fractional cutting planes
//!
//! After each LP optimum with fractional integer variables, one cut is
//! derived from the basic row whose RHS fractional part lies closest to
//! 0.5. For source row `r` the appended row is
//!
//! ```text
//! -frac(T[r,j]) · x_j  (every current column)  + SC_k = -frac(T[r,RHS])
//! ```
//!
//! which every integer-feasible point satisfies and the current fractional
//! optimum violates. The new slack `SC_k` enters the basis on a negative
//! RHS, so the grown tableau is dual-feasible but primal-infeasible: the
//! dual simplex restores feasibility, the primal re-optimizes, and the loop
//! repeats up to the cut cap.
//!
//! Each cut allocates a fresh tableau one row and one column larger rather
//! than reshaping in place.

use simplexlab_types::{
    Model, Solution, SolveStatus, SolverConfig, SolverError, Trace,
};

use super::fractional_vars;
use crate::linear::{dual_simplex, simplex, Tableau};
use crate::standard::{standardize, StandardModel};

/// Solve a mixed-integer model by pure cutting planes
pub fn solve(
    model: &Model,
    config: &SolverConfig,
    trace: &mut Trace,
) -> Result<Solution, SolverError> {
    let std = standardize(model)?;

    trace.step("cut loop: solving the LP relaxation");
    let mut tableau = Tableau::from_standard(&std);
    match simplex::solve_tableau(&mut tableau, config, trace)? {
        SolveStatus::Optimal => {}
        status => return Ok(Solution::verdict(status)),
    }

    for cut_number in 1..=config.max_cuts {
        let orig_x = std.back_map_vec(&tableau.structural_values());
        if fractional_vars(&std, &orig_x, config).is_empty() {
            trace.step(format!(
                "cut loop: integral after {} cuts, Z = {:.4}",
                cut_number - 1,
                std.original_z(tableau.z())
            ));
            return Ok(assemble(&std, &tableau, model, config, SolveStatus::Optimal, None));
        }

        let source = match pick_source_row(&std, &tableau, config) {
            Some(row) => row,
            None => {
                trace.step(
                    "cut loop: no suitable cut row (integer variable non-basic or degenerate)",
                );
                return Ok(assemble(
                    &std,
                    &tableau,
                    model,
                    config,
                    SolveStatus::CutLimit,
                    Some("no suitable cut row".to_string()),
                ));
            }
        };

        trace.step(format!(
            "cut {}: source row {} ({}, rhs {:.4})",
            cut_number,
            source + 1,
            tableau.basis_name(source),
            tableau.rhs(source)
        ));
        tableau = append_cut(&tableau, source, cut_number, config);

        trace.step(format!("cut {}: dual simplex to restore feasibility", cut_number));
        match dual_simplex::solve_tableau(&mut tableau, config, trace)? {
            SolveStatus::Optimal => {}
            status => return Ok(Solution::verdict(status).with_note(format!(
                "cut {} re-optimization failed",
                cut_number
            ))),
        }
        match simplex::solve_tableau(&mut tableau, config, trace)? {
            SolveStatus::Optimal => {}
            SolveStatus::Unbounded => {
                return Ok(Solution::verdict(SolveStatus::Unbounded))
            }
            status => return Ok(Solution::verdict(status)),
        }
    }

    // The cap counts cuts, not checks: the last re-optimization still gets
    // its integrality verdict
    let orig_x = std.back_map_vec(&tableau.structural_values());
    if fractional_vars(&std, &orig_x, config).is_empty() {
        trace.step(format!(
            "cut loop: integral after {} cuts, Z = {:.4}",
            config.max_cuts,
            std.original_z(tableau.z())
        ));
        return Ok(assemble(&std, &tableau, model, config, SolveStatus::Optimal, None));
    }

    trace.step(format!("cut cap {} reached", config.max_cuts));
    Ok(assemble(
        &std,
        &tableau,
        model,
        config,
        SolveStatus::CutLimit,
        Some(format!("cut cap {} reached", config.max_cuts)),
    ))
}

/// Basic integer structural column whose RHS fractional part is closest to
/// 0.5
fn pick_source_row(
    std: &StandardModel,
    tableau: &Tableau,
    config: &SolverConfig,
) -> Option<usize> {
    let mut best = None;
    let mut best_score = f64::INFINITY;

    for (i, &col) in tableau.basis.iter().enumerate() {
        if col >= std.num_cols() || !std.cols[col].is_integer {
            continue;
        }
        let frac = clamped_frac(tableau.rhs(i), config);
        if frac <= config.frac_eps || frac >= 1.0 - config.frac_eps {
            continue;
        }
        let score = (frac - 0.5).abs();
        if score < best_score {
            best_score = score;
            best = Some(i);
        }
    }

    best
}

/// Fractional part in `[0, 1)`, snapped to 0 within `frac_clamp` of either
/// end
fn clamped_frac(value: f64, config: &SolverConfig) -> f64 {
    let frac = value - value.floor();
    if frac < config.frac_clamp || frac > 1.0 - config.frac_clamp {
        0.0
    } else {
        frac
    }
}

/// Fresh tableau with the Gomory row of `source` appended and its new
/// slack (`SC<k>`) made basic
fn append_cut(tableau: &Tableau, source: usize, cut_number: usize, config: &SolverConfig) -> Tableau {
    let old_width = tableau.width();
    let old_rhs = old_width - 1;
    let rows = tableau.num_rows();

    // Every old row gains one zero column before the RHS; the cut row gets
    // -frac(...) everywhere, +1 in the new slack column
    let mut data = Vec::with_capacity(rows + 2);
    for i in 0..=rows {
        let mut row = Vec::with_capacity(old_width + 1);
        row.extend_from_slice(&tableau.data[i][..old_rhs]);
        row.push(0.0);
        row.push(tableau.data[i][old_rhs]);
        if i == rows {
            // Cut row sits between the constraints and the objective row
            let mut cut = Vec::with_capacity(old_width + 1);
            for j in 0..old_rhs {
                cut.push(-clamped_frac(tableau.data[source][j], config));
            }
            cut.push(1.0);
            cut.push(-clamped_frac(tableau.data[source][old_rhs], config));
            data.push(cut);
        }
        data.push(row);
    }

    let mut basis = tableau.basis.clone();
    basis.push(old_rhs); // the new slack occupies the old RHS position

    let mut col_names = tableau.col_names.clone();
    col_names.push(format!("SC{}", cut_number));

    Tableau::from_parts(data, basis, col_names, tableau.num_structural)
}

/// Solution from the current tableau's basic point
fn assemble(
    std: &StandardModel,
    tableau: &Tableau,
    model: &Model,
    config: &SolverConfig,
    status: SolveStatus,
    note: Option<String>,
) -> Solution {
    let mut orig_x = std.back_map_vec(&tableau.structural_values());
    for (j, sign) in std.signs.iter().enumerate() {
        if sign.is_integral() && (orig_x[j] - orig_x[j].round()).abs() <= config.frac_eps {
            orig_x[j] = orig_x[j].round();
        }
    }
    Solution {
        z: std.original_z(tableau.z()),
        x: model
            .labels
            .iter()
            .cloned()
            .zip(orig_x.iter().copied())
            .collect(),
        status,
        note,
    }
}
