//! Carry bracket table and its CSV loader

mod table;
pub mod loader;

pub use table::{Bracket, BracketTable};
pub use loader::{load_brackets, load_brackets_from_reader};
