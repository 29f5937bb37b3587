//! Time-stepping solvers.

pub mod central_difference;
