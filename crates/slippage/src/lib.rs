//! Order book slippage simulation with a historical feedback loop.
//!
//! [`SlippageEngine::simulate`] walks a book snapshot to measure price
//! impact; [`SlippageEngine::estimate`] blends that with an adjusted
//! baseline and the learned per-market history in [`history`]. The engine
//! never errors: missing or thin data degrades to documented defaults.

pub mod engine;
pub mod history;

pub use engine::{momentum_factor, SimulationResult, SlippageEngine, SlippageEstimate};
pub use history::{HistoryKey, SlippageHistory, SlippageObservation, SlippageTracker};
