//! The ROAST coordinator: a networked runtime wrapping `roast_core`'s pure
//! state machine with a priority action queue, per-connection TCP workers,
//! and a benchmark-oriented attacker simulation.

pub mod error;
pub mod queue;
pub mod runtime;

pub use error::RuntimeError;
pub use runtime::{Coordinator, RunStats};
