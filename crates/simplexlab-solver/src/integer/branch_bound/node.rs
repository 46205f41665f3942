use std::cmp::Ordering;

use crate::standard::StandardModel;

/// One branch-and-bound node: a standardized model plus its solved LP
/// relaxation
///
/// Nodes are immutable once the bound is set. `label` is the dotted path
/// from the root (`p1`, `p1.2`, `p1.2.1`, …), `branch_header` the human
/// form of the row that created it (`"X2 ≤ 3"`); the root has none.
#[derive(Debug, Clone)]
pub struct Node {
    pub std: StandardModel,
    pub label: String,
    pub branch_header: Option<String>,

    /// Optimal value of this node's LP relaxation (maximization form)
    pub lp_bound: f64,

    /// LP optimum mapped back to original variables, original index order
    pub orig_x: Vec<f64>,
}

impl Node {
    /// Left/right child labels: `.1` is the ≤ branch, `.2` the ≥ branch
    pub fn child_label(&self, right: bool) -> String {
        format!("{}.{}", self.label, if right { 2 } else { 1 })
    }
}

/// Heap ordering: highest LP bound first, then lexicographically smaller
/// label so sibling pops are deterministic
impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lp_bound
            .total_cmp(&other.lp_bound)
            .then_with(|| other.label.cmp(&self.label))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}
