//! End-to-end scenarios over the public driver API

use approx::assert_relative_eq;
use simplexlab_solver::analysis::duality;
use simplexlab_solver::analysis::editor::{EditVerdict, Editor};
use simplexlab_solver::Algorithm;
use simplexlab_types::{
    Constraint, Model, Relation, Sense, SignRestriction, SolveStatus, SolverConfig, SolverError,
    Trace,
};

fn wyndor() -> Model {
    // max +3 +5 / 1 0 <= 4 / 0 2 <= 12 / 3 2 <= 18 / + +
    Model::new(
        Sense::Max,
        vec![3.0, 5.0],
        vec![
            Constraint::less_eq(vec![1.0, 0.0], 4.0),
            Constraint::less_eq(vec![0.0, 2.0], 12.0),
            Constraint::less_eq(vec![3.0, 2.0], 18.0),
        ],
        vec![SignRestriction::NonNegative, SignRestriction::NonNegative],
    )
    .unwrap()
}

fn mixed_binary() -> Model {
    // max +2 +3 / 1 1 <= 5 / 1 2 <= 8 / + bin
    Model::new(
        Sense::Max,
        vec![2.0, 3.0],
        vec![
            Constraint::less_eq(vec![1.0, 1.0], 5.0),
            Constraint::less_eq(vec![1.0, 2.0], 8.0),
        ],
        vec![SignRestriction::NonNegative, SignRestriction::Binary],
    )
    .unwrap()
}

#[test]
fn scenario_1_primal_textbook_optimum() {
    let (solution, trace) = Algorithm::Primal
        .solve(&wyndor(), &SolverConfig::default())
        .unwrap();

    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_relative_eq!(solution.z, 36.0, epsilon = 1e-9);
    assert_relative_eq!(solution.value("X1"), 2.0, epsilon = 1e-9);
    assert_relative_eq!(solution.value("X2"), 6.0, epsilon = 1e-9);
    // One trace entry per pivot plus the closing verdict
    assert!(trace.contains("primal pivot 1:"));
    assert!(trace.contains("optimal"));
}

#[test]
fn scenario_2_branch_and_bound_binary() {
    let (solution, trace) = Algorithm::BranchAndBound
        .solve(&mixed_binary(), &SolverConfig::default())
        .unwrap();

    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_relative_eq!(solution.z, 11.0, epsilon = 1e-6);
    assert_relative_eq!(solution.value("X1"), 4.0, epsilon = 1e-6);
    assert_relative_eq!(solution.value("X2"), 1.0, epsilon = 1e-6);
    assert!(trace.contains("node p1"));
}

#[test]
fn scenario_3_non_less_eq_rejected_at_standardization() {
    // min +4 +1 / 3 1 = 3 / 4 3 >= 6 / 1 2 <= 4 / + +
    let model = Model::new(
        Sense::Min,
        vec![4.0, 1.0],
        vec![
            Constraint::new(vec![3.0, 1.0], Relation::Eq, 3.0),
            Constraint::new(vec![4.0, 3.0], Relation::GreaterEq, 6.0),
            Constraint::less_eq(vec![1.0, 2.0], 4.0),
        ],
        vec![SignRestriction::NonNegative, SignRestriction::NonNegative],
    )
    .unwrap();

    for algorithm in [
        Algorithm::Primal,
        Algorithm::Revised,
        Algorithm::BranchAndBound,
        Algorithm::CuttingPlane,
    ] {
        let err = algorithm.solve(&model, &SolverConfig::default()).unwrap_err();
        assert!(
            matches!(err, SolverError::UnsupportedForm(_)),
            "{} should reject the form",
            algorithm.name()
        );
    }
}

#[test]
fn scenario_4_unbounded_verdict() {
    // max +1 +1 / 1 -1 <= 1 / -1 1 <= 1 / + +
    let model = Model::new(
        Sense::Max,
        vec![1.0, 1.0],
        vec![
            Constraint::less_eq(vec![1.0, -1.0], 1.0),
            Constraint::less_eq(vec![-1.0, 1.0], 1.0),
        ],
        vec![SignRestriction::NonNegative, SignRestriction::NonNegative],
    )
    .unwrap();

    let (solution, trace) = Algorithm::Primal
        .solve(&model, &SolverConfig::default())
        .unwrap();
    assert_eq!(solution.status, SolveStatus::Unbounded);
    assert!(trace.contains("unbounded"));
}

#[test]
fn scenario_5_cutting_plane_integer_program() {
    // max +5 +4 / 6 4 <= 24 / 1 2 <= 6 / int int
    // LP relaxation peaks at (3, 1.5); the unique integer optimum is (4, 0)
    // with Z = 20
    let model = Model::new(
        Sense::Max,
        vec![5.0, 4.0],
        vec![
            Constraint::less_eq(vec![6.0, 4.0], 24.0),
            Constraint::less_eq(vec![1.0, 2.0], 6.0),
        ],
        vec![SignRestriction::Integer, SignRestriction::Integer],
    )
    .unwrap();

    let (solution, trace) = Algorithm::CuttingPlane
        .solve(&model, &SolverConfig::default())
        .unwrap();
    assert!(trace.contains("cut 1: source row"));

    match solution.status {
        SolveStatus::Optimal => {
            // Optimality is proven by the absence of fractional integers
            assert_relative_eq!(solution.z, 20.0, epsilon = 1e-4);
            assert_relative_eq!(solution.value("X1"), 4.0, epsilon = 1e-4);
            assert_relative_eq!(solution.value("X2"), 0.0, epsilon = 1e-4);
        }
        SolveStatus::CutLimit => {
            assert!(solution.note.is_some(), "a stalled cut loop must say why");
        }
        other => panic!("unexpected cutting-plane status {:?}", other),
    }
}

#[test]
fn scenario_6_in_range_objective_edit() {
    let mut trace = Trace::new();
    let mut editor = Editor::new(wyndor(), SolverConfig::default(), &mut trace).unwrap();

    // c₁: 3 -> 4 stays in range; same basis, Z = 38
    let verdict = editor.edit("Z", "X1", 4.0, &mut trace).unwrap();
    assert!(matches!(verdict, EditVerdict::InRange(_)));

    let solution = editor.solution();
    assert_relative_eq!(solution.z, 38.0, epsilon = 1e-9);
    assert_relative_eq!(solution.value("X1"), 2.0, epsilon = 1e-9);
    assert_relative_eq!(solution.value("X2"), 6.0, epsilon = 1e-9);
}

#[test]
fn scenario_7_strong_duality() {
    let mut trace = Trace::new();
    let report =
        duality::verify_strong_duality(&wyndor(), &SolverConfig::default(), &mut trace).unwrap();

    assert!(report.strong);
    assert_relative_eq!(report.primal.z, 36.0, epsilon = 1e-6);
    assert_relative_eq!(report.dual.z, 36.0, epsilon = 1e-6);
}

#[test]
fn scenario_8_gomory_cut_separates_correctly() {
    use simplexlab_solver::linear::{simplex, Tableau};
    use simplexlab_solver::standard::standardize;

    let model = Model::new(
        Sense::Max,
        vec![5.0, 4.0],
        vec![
            Constraint::less_eq(vec![6.0, 4.0], 24.0),
            Constraint::less_eq(vec![1.0, 2.0], 6.0),
        ],
        vec![SignRestriction::Integer, SignRestriction::Integer],
    )
    .unwrap();
    let std = standardize(&model).unwrap();
    let cfg = SolverConfig::default();

    let mut trace = Trace::new();
    let outcome = simplex::solve(&std, &cfg, &mut trace).unwrap();
    assert_eq!(outcome.status, SolveStatus::Optimal);

    // Reproduce the first cut from the optimal tableau: the source row is
    // the X2 row (value 1.5, the only fractional basic integer)
    let t: &Tableau = &outcome.tableau;
    let source = t
        .basis
        .iter()
        .position(|&c| c == 1)
        .expect("X2 is basic at the LP optimum");
    let frac = |v: f64| v - v.floor();

    // Cut over (X1, X2, S1, S2): -frac(row) ≤ -frac(rhs)
    let cut: Vec<f64> = (0..t.rhs_col()).map(|j| -frac(t.data[source][j])).collect();
    let cut_rhs = -frac(t.rhs(source));
    assert!(cut_rhs < -1e-9, "source row must be fractional");

    // Evaluates a point (x₁, x₂) through its slack values
    let eval = |x1: f64, x2: f64| -> f64 {
        let s1 = 24.0 - 6.0 * x1 - 4.0 * x2;
        let s2 = 6.0 - x1 - 2.0 * x2;
        cut[0] * x1 + cut[1] * x2 + cut[2] * s1 + cut[3] * s2
    };

    // Violated by the fractional LP optimum
    assert!(eval(3.0, 1.5) > cut_rhs + 1e-9);
    // Satisfied by the integer-feasible candidates
    assert!(eval(3.0, 1.0) <= cut_rhs + 1e-9);
    assert!(eval(4.0, 0.0) <= cut_rhs + 1e-9);
    assert!(eval(2.0, 2.0) <= cut_rhs + 1e-9);
}

#[test]
fn scenario_9_branch_and_bound_result_file() {
    let dir = tempfile::tempdir().unwrap();
    let (solution, _, path) = Algorithm::BranchAndBound
        .solve_with_report(&mixed_binary(), &SolverConfig::default(), dir.path(), 7)
        .unwrap();
    assert_eq!(solution.status, SolveStatus::Optimal);

    let path = path.expect("integer drivers persist a result file");
    assert!(path.ends_with("BranchAndBound_Result_7.txt"));

    let body = std::fs::read_to_string(&path).unwrap();
    assert!(body.contains("Z = 11.000000"));
    let x1 = body.find("X1 = 4").expect("X1 line present");
    let x2 = body.find("X2 = 1").expect("X2 line present");
    assert!(x1 < x2, "variable lines sorted by label");
    assert!(body.contains("Steps:"));
}
