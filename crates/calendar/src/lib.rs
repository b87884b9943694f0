//! Economic calendar impact scoring.

pub mod impact;

pub use impact::{decay_factor, score, severity};
