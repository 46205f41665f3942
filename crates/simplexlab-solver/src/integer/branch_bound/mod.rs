//! Integer programming by best-first branch-and-bound
//!
//! # Algorithm
//! 1. Solve the LP relaxation of the standardized model (root node `p1`)
//! 2. If every `int`/`bin` original is integral → candidate incumbent
//! 3. Otherwise branch on the fractional variable closest to 0.5:
//!    two children with `x_j ≤ ⌊v⌋` and `x_j ≥ ⌈v⌉` appended as standard
//!    ≤ rows (the ≥ branch as `-x_j ≤ -⌈v⌉`)
//! 4. Best-first: always expand the open node with the highest LP bound;
//!    prune any node whose bound cannot beat the incumbent
//!
//! Children whose new row duplicates an existing row are rejected, which
//! terminates cycling on equivalent branches. Every node's LP starts from
//! the parent's standardized model plus the new row, with a fresh slack
//! basis; the appended ≥ rows make that start primal-infeasible, so the
//! relaxation is solved primal-first with a dual→primal fallback.

pub mod node;

use std::collections::BinaryHeap;

use simplexlab_types::{
    Model, Solution, SolveStatus, SolverConfig, SolverError, Trace,
};

use self::node::Node;
use super::{fractional_vars, most_fractional};
use crate::linear::{dual_simplex, simplex, LpOutcome, Tableau};
use crate::standard::{standardize, StandardModel};

/// Solve a mixed-integer model; the trace records every node, branch and
/// prune
pub fn solve(
    model: &Model,
    config: &SolverConfig,
    trace: &mut Trace,
) -> Result<Solution, SolverError> {
    let std = standardize(model)?;

    let mut nodes_solved = 1usize;
    let root = match expand_root(&std, config, trace)? {
        Ok(root) => root,
        Err(status) => return Ok(Solution::verdict(status)),
    };

    let mut incumbent: Option<(f64, Vec<f64>)> = None;
    let mut heap = BinaryHeap::new();
    heap.push(root);

    while let Some(node) = heap.pop() {
        // Bound pruning against the incumbent (maximization form)
        if let Some((z_best, _)) = &incumbent {
            if node.lp_bound <= z_best + 1e-9 {
                trace.step(format!(
                    "prune {}: bound {:.4} cannot beat incumbent {:.4}",
                    node.label, node.lp_bound, z_best
                ));
                continue;
            }
        }

        if let Some(header) = &node.branch_header {
            trace.step(format!(
                "expand {} ('{}'), bound {:.4}",
                node.label, header, node.lp_bound
            ));
        }

        let fractional = fractional_vars(&node.std, &node.orig_x, config);
        if fractional.is_empty() {
            let z = node.lp_bound;
            let better = incumbent
                .as_ref()
                .map(|(z_best, _)| z > z_best + 1e-9)
                .unwrap_or(true);
            if better {
                trace.step(format!(
                    "node {}: integer feasible, new incumbent Z = {:.4}",
                    node.label,
                    node.std.original_z(z)
                ));
                incumbent = Some((z, node.orig_x.clone()));
            } else {
                trace.step(format!(
                    "node {}: integer feasible but not better, Z = {:.4}",
                    node.label,
                    node.std.original_z(z)
                ));
            }
            continue;
        }

        let j = most_fractional(&fractional, &node.orig_x)
            .expect("non-empty fractional set has a most fractional member");
        let v = node.orig_x[j];
        trace.step(format!(
            "node {}: branch on {} = {:.4}",
            node.label, node.std.labels[j], v
        ));

        for right in [false, true] {
            if nodes_solved >= config.max_nodes {
                trace.step(format!("node cap {} reached", config.max_nodes));
                return Ok(finish(
                    &std,
                    incumbent,
                    SolveStatus::NodeLimit,
                    model,
                    config,
                ));
            }

            let unit = node.std.unit_row(j);
            let (row, rhs, header) = if right {
                // X_j ≥ ⌈v⌉ encoded as -X_j ≤ -⌈v⌉
                let flipped: Vec<f64> = unit.iter().map(|c| -c).collect();
                (
                    flipped,
                    -v.ceil(),
                    format!("{} ≥ {}", node.std.labels[j], v.ceil()),
                )
            } else {
                (
                    unit,
                    v.floor(),
                    format!("{} ≤ {}", node.std.labels[j], v.floor()),
                )
            };

            let label = node.child_label(right);
            if node.std.has_duplicate_row(&row, rhs, config.eps) {
                trace.step(format!(
                    "reject {}: row for '{}' duplicates an existing row",
                    label, header
                ));
                continue;
            }

            let mut child_std = node.std.clone();
            child_std.push_row(&row, rhs)?;
            nodes_solved += 1;

            let outcome = solve_relaxation(&child_std, config, trace)?;
            match outcome.status {
                SolveStatus::Optimal => {
                    let bound = outcome.z();
                    trace.step(format!(
                        "node {}: '{}', LP bound {:.4}",
                        label,
                        header,
                        child_std.original_z(bound)
                    ));
                    if let Some((z_best, _)) = &incumbent {
                        if bound <= z_best + 1e-9 {
                            trace.step(format!(
                                "prune {}: bound {:.4} cannot beat incumbent {:.4}",
                                label, bound, z_best
                            ));
                            continue;
                        }
                    }
                    let orig_x = child_std.back_map_vec(&outcome.std_values());
                    heap.push(Node {
                        std: child_std,
                        label,
                        branch_header: Some(header),
                        lp_bound: bound,
                        orig_x,
                    });
                }
                SolveStatus::Infeasible => {
                    trace.step(format!("prune {}: '{}' is infeasible", label, header));
                }
                status => {
                    trace.step(format!(
                        "prune {}: relaxation ended with {:?}",
                        label, status
                    ));
                }
            }
        }
    }

    match incumbent {
        Some(_) => Ok(finish(&std, incumbent, SolveStatus::Optimal, model, config)),
        None => {
            trace.step("no integer feasible point found");
            Ok(Solution::verdict(SolveStatus::Infeasible))
        }
    }
}

/// Root LP: failure verdicts bubble out as the whole solve's verdict
fn expand_root(
    std: &StandardModel,
    config: &SolverConfig,
    trace: &mut Trace,
) -> Result<Result<Node, SolveStatus>, SolverError> {
    trace.step("node p1: LP relaxation of the standardized model");
    let outcome = solve_relaxation(std, config, trace)?;
    if outcome.status != SolveStatus::Optimal {
        trace.step(format!("root relaxation ended with {:?}", outcome.status));
        return Ok(Err(outcome.status));
    }
    let orig_x = std.back_map_vec(&outcome.std_values());
    Ok(Ok(Node {
        std: std.clone(),
        label: "p1".to_string(),
        branch_header: None,
        lp_bound: outcome.z(),
        orig_x,
    }))
}

/// LP relaxation from a fresh slack basis: primal when feasible, otherwise
/// dual repair first, then primal
fn solve_relaxation(
    std: &StandardModel,
    config: &SolverConfig,
    trace: &mut Trace,
) -> Result<LpOutcome, SolverError> {
    let mut tableau = Tableau::from_standard(std);

    if !tableau.is_primal_feasible(config) {
        trace.step("relaxation starts primal-infeasible, dual simplex first");
        let status = dual_simplex::solve_tableau(&mut tableau, config, trace)?;
        if status != SolveStatus::Optimal {
            return Ok(LpOutcome { tableau, status });
        }
    }

    let status = simplex::solve_tableau(&mut tableau, config, trace)?;
    Ok(LpOutcome { tableau, status })
}

/// Assemble the final solution from the incumbent, if any
fn finish(
    std: &StandardModel,
    incumbent: Option<(f64, Vec<f64>)>,
    status: SolveStatus,
    model: &Model,
    config: &SolverConfig,
) -> Solution {
    match incumbent {
        Some((z, orig_x)) => {
            // Snap integral variables onto the grid they are within
            // frac_eps of
            let mut x = orig_x;
            for (j, sign) in std.signs.iter().enumerate() {
                if sign.is_integral() && (x[j] - x[j].round()).abs() <= config.frac_eps {
                    x[j] = x[j].round();
                }
            }
            Solution {
                z: std.original_z(z),
                x: model
                    .labels
                    .iter()
                    .cloned()
                    .zip(x.iter().copied())
                    .collect(),
                status,
                note: None,
            }
        }
        None => Solution::verdict(status),
    }
}
