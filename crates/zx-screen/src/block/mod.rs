//! Per-block color selection.

mod selector;

pub use selector::{select_mono, BlockChoice, BlockSelector, UlaPlusSelector};
