//! Thin I/O wrappers around the engine
//!
//! These load the input collections and write the output tables; all
//! reconciliation semantics live in the engine. A malformed input aborts
//! the run before any reconciliation logic executes.

pub mod csv;

pub use self::csv::*;
