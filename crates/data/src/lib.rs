//! Snapshot file sources.
//!
//! The scoring core consumes plain data snapshots; these sources load them
//! from local files (CSV candles per pair, one JSON calendar). Exchange and
//! calendar connectivity lives outside this repository.

pub mod csv_source;
pub mod json_source;

pub use csv_source::CsvCandleSource;
pub use json_source::JsonEventSource;
