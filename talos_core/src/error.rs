// talos_core/src/error.rs

use thiserror::Error;

/// Errors surfaced by simulation construction and stepping.
///
/// All of these are fatal to the current simulation instance: there is no
/// internal retry, and the state is never mutated on an error path. The
/// shorter-than-minimum step is deliberately *not* represented here; it is
/// a defined no-op, not a failure (see `Simulation::advance`).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// A physical constant or simulation parameter failed validation at
    /// construction time.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// `advance` was called with a negative or non-finite elapsed time.
    #[error("invalid step duration: {0}")]
    InvalidStep(f64),

    /// Integration produced a non-finite state component. The offending
    /// state was discarded; the simulation still holds the last good state.
    #[error("numerical instability at t = {time}: integration produced a non-finite state")]
    NumericalInstability { time: f64 },
}
