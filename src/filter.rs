//! Zone filtering
//!
//! Read-only selection of derived rows by zone. The underlying datasets
//! are never touched; an empty selection selects nothing.

use crate::types::{DailyRate, SummaryRow, WellLocation, WellTotal};
use std::collections::HashSet;

/// Anything carrying a zone tag can be filtered.
pub trait Zoned {
    fn zone(&self) -> &str;
}

impl Zoned for WellTotal {
    fn zone(&self) -> &str {
        &self.zone
    }
}

impl Zoned for DailyRate {
    fn zone(&self) -> &str {
        &self.zone
    }
}

impl Zoned for SummaryRow {
    fn zone(&self) -> &str {
        &self.zone
    }
}

impl Zoned for WellLocation {
    fn zone(&self) -> &str {
        &self.zone
    }
}

/// A user-chosen set of zone names. Not persisted anywhere.
#[derive(Debug, Clone, Default)]
pub struct ZoneSelection {
    zones: HashSet<String>,
}

impl ZoneSelection {
    pub fn new<I, S>(zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            zones: zones.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn contains(&self, zone: &str) -> bool {
        self.zones.contains(zone)
    }
}

/// Rows whose zone is in the selection, in dataset order.
///
/// An empty selection yields an empty result — deliberately not the
/// unfiltered dataset, matching the dashboard's "nothing selected"
/// behaviour.
pub fn select<'a, R: Zoned>(rows: &'a [R], selection: &ZoneSelection) -> Vec<&'a R> {
    rows.iter().filter(|r| selection.contains(r.zone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_row(well: &str, zone: &str) -> SummaryRow {
        SummaryRow {
            well: well.to_string(),
            zone: zone.to_string(),
            months_active: 12,
            oil_mbbl: 1.0,
            water_mbbl: 1.0,
            gas_mmcf: 1.0,
        }
    }

    #[test]
    fn test_empty_selection_selects_nothing() {
        let rows = vec![summary_row("ACM-1", "JUR"), summary_row("ACM-2", "CRET")];
        let selected = select(&rows, &ZoneSelection::default());
        assert!(selected.is_empty());
    }

    #[test]
    fn test_selection_keeps_matching_zones_only() {
        let rows = vec![
            summary_row("ACM-1", "JUR"),
            summary_row("ACM-2", "CRET"),
            summary_row("ACM-3", "JUR"),
        ];
        let selection = ZoneSelection::new(["JUR"]);
        let selected = select(&rows, &selection);
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|r| r.zone == "JUR"));
    }

    #[test]
    fn test_unknown_zone_matches_nothing() {
        let rows = vec![summary_row("ACM-1", "JUR")];
        let selection = ZoneSelection::new(["PALEOZOICO"]);
        assert!(select(&rows, &selection).is_empty());
    }

    #[test]
    fn test_source_rows_are_untouched() {
        let rows = vec![summary_row("ACM-1", "JUR")];
        let selection = ZoneSelection::new(["JUR"]);
        let _ = select(&rows, &selection);
        assert_eq!(rows.len(), 1);
    }
}
