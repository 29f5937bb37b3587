//! Solvers for single-degree-of-freedom structural response.

pub mod transient;
