//! Shared leaf types for the simplexlab workspace
//!
//! Everything the solver crates exchange lives here: the immutable problem
//! description ([`Model`]), the dense matrix buffer ([`Matrix`]), the solver
//! output ([`Solution`] plus [`Trace`]), the error taxonomy
//! ([`SolverError`]) and the tolerance/cap configuration ([`SolverConfig`]).
//! No algorithm logic belongs in this crate.

pub mod config;
pub mod error;
pub mod matrix;
pub mod model;
pub mod solution;
pub mod trace;

pub use config::SolverConfig;
pub use error::SolverError;
pub use matrix::Matrix;
pub use model::{Constraint, Model, Relation, Sense, SignRestriction};
pub use solution::{Solution, SolveStatus};
pub use trace::Trace;
