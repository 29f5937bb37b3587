//! Core traits for the Ductile workspace.
//!
//! This crate defines the shared abstractions that solvers and callers build on:
//!
//! - [`Observer`]: receives solver events and optionally returns control actions

mod observer;

pub use observer::Observer;
