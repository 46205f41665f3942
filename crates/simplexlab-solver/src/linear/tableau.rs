use simplexlab_types::SolverConfig;

use crate::standard::StandardModel;

/// Simplex tableau
///
/// Layout for a standard model with `n'` structural columns and `m` rows:
///
/// ```text
///       X₁ .. Xₙ'  S₁ .. Sₘ | RHS
/// row 0 [   A     |    I    |  b ]
///  ...  [---------+---------+----]
/// row m [  -c     |    0    |  Z ]   ← objective row
/// ```
///
/// `basis[i]` is the column index currently acting as identity in row `i`;
/// `col_names` carries one display label per non-RHS column (slacks
/// `S1..Sm`, Gomory slacks `SC1, SC2, …`). The objective row stores `-c_j`
/// per structural column so its RHS cell always equals the current `Z` of
/// the maximization form.
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    /// `(m+1) × (width)` buffer, last row objective, last column RHS
    pub data: Vec<Vec<f64>>,

    /// Number of structural (standard-model) columns
    pub num_structural: usize,

    /// Column occupying each constraint row
    pub basis: Vec<usize>,

    /// Display labels, one per non-RHS column
    pub col_names: Vec<String>,
}

impl Tableau {
    /// Initial tableau `[A | I | b]` with the slack basis
    pub fn from_standard(std: &StandardModel) -> Self {
        let n = std.num_cols();
        let m = std.num_rows();
        let width = n + m + 1;

        let mut data = vec![vec![0.0; width]; m + 1];
        for i in 0..m {
            for j in 0..n {
                data[i][j] = std.a.get(i, j);
            }
            data[i][n + i] = 1.0;
            data[i][n + m] = std.b[i];
        }
        for j in 0..n {
            data[m][j] = -std.c[j];
        }

        let mut col_names: Vec<String> = std.cols.iter().map(|c| c.name.clone()).collect();
        for i in 1..=m {
            col_names.push(format!("S{}", i));
        }

        Tableau {
            data,
            num_structural: n,
            basis: (n..n + m).collect(),
            col_names,
        }
    }

    /// Rebuild from raw parts (the cut loop allocates grown tableaus)
    pub fn from_parts(
        data: Vec<Vec<f64>>,
        basis: Vec<usize>,
        col_names: Vec<String>,
        num_structural: usize,
    ) -> Self {
        debug_assert_eq!(data.len(), basis.len() + 1);
        debug_assert_eq!(data[0].len(), col_names.len() + 1);
        Tableau {
            data,
            num_structural,
            basis,
            col_names,
        }
    }

    /// Number of constraint rows (m)
    pub fn num_rows(&self) -> usize {
        self.basis.len()
    }

    /// Total column count including RHS
    pub fn width(&self) -> usize {
        self.data[0].len()
    }

    /// Index of the objective row
    pub fn obj_row(&self) -> usize {
        self.num_rows()
    }

    /// Index of the RHS column
    pub fn rhs_col(&self) -> usize {
        self.width() - 1
    }

    /// RHS value of constraint row `i`
    pub fn rhs(&self, i: usize) -> f64 {
        self.data[i][self.rhs_col()]
    }

    /// Current objective value of the maximization form
    pub fn z(&self) -> f64 {
        self.data[self.obj_row()][self.rhs_col()]
    }

    /// Display label for a non-RHS column
    pub fn col_name(&self, j: usize) -> &str {
        &self.col_names[j]
    }

    /// Label of the variable basic in row `i`
    pub fn basis_name(&self, i: usize) -> &str {
        self.col_name(self.basis[i])
    }

    /// Gauss–Jordan pivot on `(leaving row, entering column)`
    ///
    /// Scales the pivot row so the pivot element becomes 1, eliminates the
    /// entering column everywhere else (objective row included) and updates
    /// the basis. A pivot element under `config.eps` is clamped to `±eps`
    /// (sign-preserving, `+eps` at exact zero); the return value reports
    /// whether the clamp fired so drivers can abort on repeated degeneracy.
    pub fn pivot(&mut self, entering: usize, leaving: usize, config: &SolverConfig) -> bool {
        let width = self.width();

        let mut pivot_element = self.data[leaving][entering];
        let clamped = pivot_element.abs() < config.eps;
        if clamped {
            pivot_element = if pivot_element < 0.0 {
                -config.eps
            } else {
                config.eps
            };
            self.data[leaving][entering] = pivot_element;
        }

        for j in 0..width {
            self.data[leaving][j] /= pivot_element;
        }

        for i in 0..=self.num_rows() {
            if i != leaving {
                let factor = self.data[i][entering];
                if factor != 0.0 {
                    for j in 0..width {
                        self.data[i][j] -= factor * self.data[leaving][j];
                    }
                }
            }
        }

        self.basis[leaving] = entering;
        clamped
    }

    /// Whether every reduced cost is non-negative (maximization form)
    pub fn is_optimal(&self, config: &SolverConfig) -> bool {
        let obj = self.obj_row();
        (0..self.rhs_col()).all(|j| self.data[obj][j] >= -config.eps)
    }

    /// Whether every basic variable is non-negative
    pub fn is_primal_feasible(&self, config: &SolverConfig) -> bool {
        (0..self.num_rows()).all(|i| self.rhs(i) >= -config.eps)
    }

    /// Entering column for the primal step: most negative reduced cost
    ///
    /// Ties resolve to the smaller column index (strict comparison).
    pub fn find_entering_variable(&self, config: &SolverConfig) -> Option<usize> {
        let obj = self.obj_row();
        let mut min_coeff = -config.eps;
        let mut entering = None;
        for j in 0..self.rhs_col() {
            if self.data[obj][j] < min_coeff {
                min_coeff = self.data[obj][j];
                entering = Some(j);
            }
        }
        entering
    }

    /// Leaving row for the primal step: minimum ratio `RHS/coeff` over
    /// `coeff > eps`; ties resolve to the smaller row index
    ///
    /// `None` means no positive entry exists: the problem is unbounded in
    /// the entering direction.
    pub fn find_leaving_variable(&self, entering: usize, config: &SolverConfig) -> Option<usize> {
        let rhs_col = self.rhs_col();
        let mut min_ratio = f64::INFINITY;
        let mut leaving = None;
        for i in 0..self.num_rows() {
            let coeff = self.data[i][entering];
            if coeff > config.eps {
                let ratio = self.data[i][rhs_col] / coeff;
                if ratio < min_ratio {
                    min_ratio = ratio;
                    leaving = Some(i);
                }
            }
        }
        leaving
    }

    /// Row with the most negative RHS, if any is below `-eps`
    ///
    /// This is both the dual-simplex row rule and the phase-I repair target.
    pub fn most_negative_rhs_row(&self, config: &SolverConfig) -> Option<usize> {
        let mut min_rhs = -config.eps;
        let mut row = None;
        for i in 0..self.num_rows() {
            if self.rhs(i) < min_rhs {
                min_rhs = self.rhs(i);
                row = Some(i);
            }
        }
        row
    }

    /// Values of the structural columns at the current basic solution
    pub fn structural_values(&self) -> Vec<f64> {
        let mut values = vec![0.0; self.num_structural];
        for (i, &col) in self.basis.iter().enumerate() {
            if col < self.num_structural {
                values[col] = self.rhs(i);
            }
        }
        values
    }
}
