// Library root: player model, stat catalog, roster loading, the valuation
// engine and the contract structure simulator.

pub mod contract;
pub mod player;
pub mod roster;
pub mod stats;
pub mod valuation;
