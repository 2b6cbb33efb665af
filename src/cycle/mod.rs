//! Investment cycles and cycle stream loading

mod data;
pub mod loader;

pub use data::{Cycle, CycleKind, Liquidity};
pub use loader::{load_cycles, load_cycles_from_reader};
