//! Deterministic recommendation mapping and batch evaluation.
//!
//! The ordered rule table replaces the usual nest of threshold
//! conditionals: it is loaded from configuration, checked for totality once
//! at startup, and evaluated top-down with first-match-wins semantics.

pub mod evaluate;
pub mod recommend;
pub mod rules;

pub use evaluate::{Evaluator, PairOutcome};
pub use recommend::recommend;
pub use rules::{check_totality, RuleTable};
