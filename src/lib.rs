//! acmprod: ACM production distribution core
//!
//! Turns a raw per-well-per-date production log for the ACM lease into the
//! georeferenced datasets a production dashboard consumes.
//!
//! ## Pipeline
//!
//! - **Ingestion**: strict parsing of the comma-separated production
//!   export into typed records
//! - **Aggregator**: total cumulative, fixed-horizon normalized, and
//!   latest-date daily production, plus the per-(well, zone) summary
//! - **Coordinate Projector**: UTM -> WGS84 for every derived row, the
//!   well listing, and the lease boundary ring
//! - **Zone Filter**: read-only zone selection over any derived table

pub mod aggregate;
pub mod config;
pub mod filter;
pub mod geo;
pub mod ingest;
pub mod pipeline;
pub mod types;

// Re-export the pipeline surface
pub use config::PipelineConfig;
pub use pipeline::{Pipeline, PipelineError, ProductionAtlas};

// Re-export commonly used types
pub use filter::{select, ZoneSelection, Zoned};
pub use geo::{GeoPosition, GridPosition, UtmProjector};
pub use ingest::{DataError, ProductionLog};
pub use types::{DailyRate, ProductionRecord, SummaryRow, WellLocation, WellTotal};
