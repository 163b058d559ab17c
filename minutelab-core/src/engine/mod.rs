//! Simulation engine: position ledger and the chronological record loop.

pub mod ledger;
pub mod simulation;

pub use ledger::Ledger;
pub use simulation::{run_simulation, EngineError, EngineParams, SimulationResult};
