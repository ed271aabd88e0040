//! Scalar nonlinear solvers for EOS inversion and stellar-structure searches.
//!
//! This crate provides a Newton/secant root finder, an inversion adapter that
//! turns non-convergence into a sentinel instead of an error, and a bounded
//! Brent minimizer. Objective functions may fail; their errors propagate out of
//! the search unchanged so callers can tell a physical failure from a
//! numerical one.

pub mod error;
pub mod minimize;
pub mod newton;

pub use error::{SolverError, SolverResult};
pub use minimize::{MinimizeConfig, MinimizeResult, minimize_bounded};
pub use newton::{Inversion, NewtonConfig, NewtonRoot, invert, invert_many, newton, secant};
