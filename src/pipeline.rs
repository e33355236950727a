//! Pipeline orchestration
//!
//! One eager pass per uploaded log: aggregate the raw records, then
//! georeference every derived table plus the well listing with one batch
//! projection each. The boundary ring is projected once at construction
//! and reused across runs. No state survives a run; re-running the same
//! log derives everything afresh.

use crate::aggregate::{Aggregates, Aggregator};
use crate::config::{ConfigError, PipelineConfig};
use crate::geo::{GeoError, GeoPosition, GridPosition, UtmProjector};
use crate::ingest::{DataError, ProductionLog};
use crate::types::{DailyRate, Georeferenced, SummaryRow, WellLocation, WellTotal};
use serde::Serialize;
use thiserror::Error;

/// Anything that can stop a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error(transparent)]
    Data(#[from] DataError),
}

/// The full output contract for the presentation layer: four derived
/// tables, the well listing, and the lease boundary, all georeferenced.
#[derive(Debug, Clone, Serialize)]
pub struct ProductionAtlas {
    /// Distinct well markers
    pub wells: Vec<WellLocation>,
    /// Total cumulative production per (well, zone)
    pub cumulative: Vec<WellTotal>,
    /// Cumulative production at the fixed horizon
    pub normalized: Vec<WellTotal>,
    /// Daily production at the as-of date
    pub daily: Vec<DailyRate>,
    /// Volumes next to months-active, no coordinates
    pub summary: Vec<SummaryRow>,
    /// Lease outline as WGS84 vertices, first == last
    pub boundary: Vec<GeoPosition>,
}

/// Replace the placeholder geographic positions of a whole table with one
/// batch projection. Rebuilds the rows; nothing upstream is mutated.
fn attach_geo<T: Georeferenced>(mut rows: Vec<T>, projector: &UtmProjector) -> Vec<T> {
    let positions: Vec<GridPosition> = rows.iter().map(Georeferenced::position).collect();
    let geos = projector.inverse_batch(&positions);
    for (row, geo) in rows.iter_mut().zip(geos) {
        row.set_geo(geo);
    }
    rows
}

/// The aggregation + georeferencing pipeline for one configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    aggregator: Aggregator,
    projector: UtmProjector,
    boundary_geo: Vec<GeoPosition>,
}

impl Pipeline {
    /// Build a pipeline from an explicit configuration. The boundary ring
    /// is projected here, once.
    pub fn new(config: &PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;

        let projector = UtmProjector::new(
            config.projection.utm_zone,
            config.projection.northern_hemisphere,
        )?;

        let ring: Vec<GridPosition> = config
            .boundary
            .ring_utm
            .iter()
            .map(|v| GridPosition {
                easting: v[0],
                northing: v[1],
            })
            .collect();
        let boundary_geo = projector.inverse_batch(&ring);

        Ok(Self {
            aggregator: Aggregator::new(config.aggregation.cutoff_months),
            projector,
            boundary_geo,
        })
    }

    /// The lease outline in WGS84, as computed at construction.
    pub fn boundary(&self) -> &[GeoPosition] {
        &self.boundary_geo
    }

    /// Derive the full atlas from a parsed production log.
    pub fn run(&self, log: &ProductionLog) -> Result<ProductionAtlas, PipelineError> {
        let Aggregates {
            cumulative,
            normalized,
            daily,
            summary,
            wells,
        } = self.aggregator.aggregate(log.records())?;

        let atlas = ProductionAtlas {
            wells: attach_geo(wells, &self.projector),
            cumulative: attach_geo(cumulative, &self.projector),
            normalized: attach_geo(normalized, &self.projector),
            daily: attach_geo(daily, &self.projector),
            summary,
            boundary: self.boundary_geo.clone(),
        };

        tracing::info!(
            wells = atlas.wells.len(),
            cumulative = atlas.cumulative.len(),
            normalized = atlas.normalized.len(),
            daily = atlas.daily.len(),
            zone = self.projector.zone(),
            "atlas derived"
        );

        Ok(atlas)
    }
}
