//! Core data types
//!
//! Raw production-log records and the derived dataset rows produced by the
//! aggregation pipeline.

mod dataset;
mod production;

pub use dataset::{DailyRate, Georeferenced, SummaryRow, WellLocation, WellTotal};
pub use production::ProductionRecord;
