//! Shared test infrastructure.


/// Simulator wiring, program loading and run loops.
pub mod harness;
