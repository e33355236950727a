//! Production-log ingestion
//!
//! Parses the comma-separated ACM production export into typed
//! [`ProductionRecord`]s. Column names are fixed by the exporting system
//! and matched exactly (case- and accent-sensitive); rows are parsed
//! strictly, because a malformed row invalidates every downstream table —
//! unlike a telemetry replay, nothing here may be skipped silently.

use crate::geo::GridPosition;
use crate::types::ProductionRecord;
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Timestamp layout used by the `FECHA` column.
const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Required input columns, exactly as the exporting system names them.
pub mod columns {
    pub const WELL: &str = "POZO";
    pub const COMPLETION: &str = "POZO ID";
    pub const ZONE: &str = "ZONA";
    pub const DATE: &str = "FECHA";
    pub const MONTHS_ACTIVE: &str = "MESES ACTIVO";
    pub const CUM_OIL: &str = "NP Mbbl";
    pub const CUM_WATER: &str = "WP Mbbl";
    pub const CUM_GAS: &str = "GP MMcf";
    pub const DAILY_OIL: &str = "ACEITE DIARIO BPD";
    pub const DAILY_WATER: &str = "AGUA DIARIA BPD";
    pub const DAILY_GAS: &str = "GAS DIARIO MMcfd";
    pub const UTM_X: &str = "WGS84_UTMX_OBJETIVO";
    pub const UTM_Y: &str = "WGS84_UTMY_OBJETIVO";
}

/// Input-data errors. All of these invalidate the whole run and propagate
/// to the caller; none are downgraded to warnings.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no input file supplied")]
    InputMissing,

    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("required column `{0}` not found in header")]
    MissingColumn(&'static str),

    #[error("input contains no data rows")]
    EmptyInput,

    #[error("line {line}: row has {found} fields, expected at least {expected}")]
    ShortRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: unparsable timestamp `{value}` (expected DD/MM/YYYY HH:MM)")]
    BadTimestamp { line: usize, value: String },

    #[error("line {line}: unparsable value `{value}` in column `{column}`")]
    BadNumber {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Split a CSV line respecting quoted fields (commas inside quotes stay in
/// the field, `""` unescapes to a literal quote).
fn csv_split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Column-name-to-index map built from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    well: usize,
    completion: usize,
    zone: usize,
    date: usize,
    months_active: usize,
    cum_oil: usize,
    cum_water: usize,
    cum_gas: usize,
    daily_oil: usize,
    daily_water: usize,
    daily_gas: usize,
    utm_x: usize,
    utm_y: usize,
    /// Highest mapped index, for short-row detection
    max_index: usize,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self, DataError> {
        let names = csv_split(header);
        let find = |name: &'static str| -> Result<usize, DataError> {
            names
                .iter()
                .position(|n| n.trim() == name)
                .ok_or(DataError::MissingColumn(name))
        };

        let well = find(columns::WELL)?;
        let completion = find(columns::COMPLETION)?;
        let zone = find(columns::ZONE)?;
        let date = find(columns::DATE)?;
        let months_active = find(columns::MONTHS_ACTIVE)?;
        let cum_oil = find(columns::CUM_OIL)?;
        let cum_water = find(columns::CUM_WATER)?;
        let cum_gas = find(columns::CUM_GAS)?;
        let daily_oil = find(columns::DAILY_OIL)?;
        let daily_water = find(columns::DAILY_WATER)?;
        let daily_gas = find(columns::DAILY_GAS)?;
        let utm_x = find(columns::UTM_X)?;
        let utm_y = find(columns::UTM_Y)?;

        let max_index = [
            well, completion, zone, date, months_active, cum_oil, cum_water,
            cum_gas, daily_oil, daily_water, daily_gas, utm_x, utm_y,
        ]
        .into_iter()
        .max()
        .unwrap_or(0);

        Ok(Self {
            well,
            completion,
            zone,
            date,
            months_active,
            cum_oil,
            cum_water,
            cum_gas,
            daily_oil,
            daily_water,
            daily_gas,
            utm_x,
            utm_y,
            max_index,
        })
    }
}

fn parse_f64(
    fields: &[String],
    idx: usize,
    column: &'static str,
    line: usize,
) -> Result<f64, DataError> {
    let raw = fields[idx].trim();
    raw.parse::<f64>().map_err(|_| DataError::BadNumber {
        line,
        column,
        value: raw.to_string(),
    })
}

fn parse_row(line_text: &str, cols: &Columns, line: usize) -> Result<ProductionRecord, DataError> {
    let fields = csv_split(line_text);
    if fields.len() <= cols.max_index {
        return Err(DataError::ShortRow {
            line,
            expected: cols.max_index + 1,
            found: fields.len(),
        });
    }

    let raw_stamp = fields[cols.date].trim();
    let stamp = NaiveDateTime::parse_from_str(raw_stamp, DATE_FORMAT).map_err(|_| {
        DataError::BadTimestamp {
            line,
            value: raw_stamp.to_string(),
        }
    })?;

    let months = parse_f64(&fields, cols.months_active, columns::MONTHS_ACTIVE, line)?;
    if !months.is_finite() || months < 0.0 {
        return Err(DataError::BadNumber {
            line,
            column: columns::MONTHS_ACTIVE,
            value: fields[cols.months_active].trim().to_string(),
        });
    }

    Ok(ProductionRecord {
        well: fields[cols.well].trim().to_string(),
        completion: fields[cols.completion].trim().to_string(),
        zone: fields[cols.zone].trim().to_string(),
        stamp,
        months_active: months as u32,
        cum_oil_mbbl: parse_f64(&fields, cols.cum_oil, columns::CUM_OIL, line)?,
        cum_water_mbbl: parse_f64(&fields, cols.cum_water, columns::CUM_WATER, line)?,
        cum_gas_mmcf: parse_f64(&fields, cols.cum_gas, columns::CUM_GAS, line)?,
        oil_bpd: parse_f64(&fields, cols.daily_oil, columns::DAILY_OIL, line)?,
        water_bpd: parse_f64(&fields, cols.daily_water, columns::DAILY_WATER, line)?,
        gas_mmcfd: parse_f64(&fields, cols.daily_gas, columns::DAILY_GAS, line)?,
        position: GridPosition {
            easting: parse_f64(&fields, cols.utm_x, columns::UTM_X, line)?,
            northing: parse_f64(&fields, cols.utm_y, columns::UTM_Y, line)?,
        },
    })
}

/// Load statistics, for logging and the CLI summary.
#[derive(Debug, Clone)]
pub struct LoadSummary {
    /// Where the log came from
    pub source: String,
    /// Parsed data rows
    pub record_count: usize,
    /// Distinct well names
    pub well_count: usize,
    /// Distinct zones
    pub zone_count: usize,
    /// First and last timestamp seen
    pub date_range: (NaiveDateTime, NaiveDateTime),
}

/// A fully parsed production log, ready for aggregation.
#[derive(Debug, Clone)]
pub struct ProductionLog {
    records: Vec<ProductionRecord>,
    pub summary: LoadSummary,
}

impl ProductionLog {
    /// Load and parse a production CSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DataError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Parse a production log from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R, source: &str) -> Result<Self, DataError> {
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(Ok(h)) => h,
            Some(Err(e)) => {
                return Err(DataError::Io {
                    path: PathBuf::from(source),
                    source: e,
                })
            }
            None => return Err(DataError::EmptyInput),
        };

        let cols = Columns::from_header(&header)?;

        let mut records = Vec::new();
        let mut line_num = 1usize;
        for line_result in lines {
            line_num += 1;
            let line = line_result.map_err(|e| DataError::Io {
                path: PathBuf::from(source),
                source: e,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(parse_row(&line, &cols, line_num)?);
        }

        if records.is_empty() {
            return Err(DataError::EmptyInput);
        }

        let wells: HashSet<&str> = records.iter().map(|r| r.well.as_str()).collect();
        let zones: HashSet<&str> = records.iter().map(|r| r.zone.as_str()).collect();
        let first = records.iter().map(|r| r.stamp).min().unwrap_or_default();
        let last = records.iter().map(|r| r.stamp).max().unwrap_or_default();

        let summary = LoadSummary {
            source: source.to_string(),
            record_count: records.len(),
            well_count: wells.len(),
            zone_count: zones.len(),
            date_range: (first, last),
        };

        tracing::info!(
            source = %summary.source,
            records = summary.record_count,
            wells = summary.well_count,
            zones = summary.zone_count,
            from = %summary.date_range.0,
            to = %summary.date_range.1,
            "production log loaded"
        );

        Ok(Self { records, summary })
    }

    pub fn records(&self) -> &[ProductionRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ProductionRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "POZO,POZO ID,ZONA,FECHA,MESES ACTIVO,NP Mbbl,WP Mbbl,GP MMcf,ACEITE DIARIO BPD,AGUA DIARIA BPD,GAS DIARIO MMcfd,WGS84_UTMX_OBJETIVO,WGS84_UTMY_OBJETIVO";

    fn load_str(body: &str) -> Result<ProductionLog, DataError> {
        ProductionLog::from_reader(Cursor::new(body.to_string()), "test")
    }

    #[test]
    fn test_csv_split_quoted_fields() {
        let fields = csv_split(r#"A-1,"POZA, NORTE",12.5"#);
        assert_eq!(fields, vec!["A-1", "POZA, NORTE", "12.5"]);

        let fields = csv_split(r#""say ""hi""",2"#);
        assert_eq!(fields, vec![r#"say "hi""#, "2"]);

        let fields = csv_split("a,,b");
        assert_eq!(fields, vec!["a", "", "b"]);
    }

    #[test]
    fn test_load_happy_path() {
        let body = format!(
            "{HEADER}\n\
             ACM-1,ACM-1-H1,JURASICO,01/06/2024 00:00,11,120.5,40.1,310.2,85.0,30.5,0.9,629500,2295500\n\
             ACM-1,ACM-1-H1,JURASICO,01/07/2024 00:00,12,130.5,45.1,330.2,80.0,31.5,0.8,629500,2295500\n"
        );
        let log = load_str(&body).expect("load");
        assert_eq!(log.records().len(), 2);
        assert_eq!(log.summary.well_count, 1);
        assert_eq!(log.summary.zone_count, 1);

        let r = &log.records()[1];
        assert_eq!(r.well, "ACM-1");
        assert_eq!(r.completion, "ACM-1-H1");
        assert_eq!(r.months_active, 12);
        assert!((r.cum_oil_mbbl - 130.5).abs() < 1e-9);
        assert!((r.position.easting - 629_500.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_column_names_the_column() {
        let body = "POZO,ZONA,FECHA\nACM-1,J,01/06/2024 00:00\n";
        match load_str(body) {
            Err(DataError::MissingColumn(name)) => assert_eq!(name, columns::COMPLETION),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_column_names_are_accent_sensitive() {
        // "ACEITE DIARIO BPD" misspelled with an accent must not match.
        let body = HEADER.replace("ACEITE DIARIO BPD", "ACEITE DIÁRIO BPD");
        match load_str(&body) {
            Err(DataError::MissingColumn(name)) => assert_eq!(name, columns::DAILY_OIL),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_header_only_is_empty_input() {
        match load_str(&format!("{HEADER}\n")) {
            Err(DataError::EmptyInput) => {}
            other => panic!("expected EmptyInput, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_timestamp_is_fatal_with_line_number() {
        let body = format!(
            "{HEADER}\n\
             ACM-1,ACM-1-H1,JURASICO,2024-06-01,11,1,1,1,1,1,1,629500,2295500\n"
        );
        match load_str(&body) {
            Err(DataError::BadTimestamp { line, value }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "2024-06-01");
            }
            other => panic!("expected BadTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_number_is_fatal() {
        let body = format!(
            "{HEADER}\n\
             ACM-1,ACM-1-H1,JURASICO,01/06/2024 00:00,11,oops,1,1,1,1,1,629500,2295500\n"
        );
        match load_str(&body) {
            Err(DataError::BadNumber { line, column, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(column, columns::CUM_OIL);
            }
            other => panic!("expected BadNumber, got {other:?}"),
        }
    }

    #[test]
    fn test_short_row_is_fatal() {
        let body = format!("{HEADER}\nACM-1,ACM-1-H1,JURASICO\n");
        assert!(matches!(
            load_str(&body),
            Err(DataError::ShortRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let body = format!(
            "{HEADER}\n\n\
             ACM-1,ACM-1-H1,JURASICO,01/06/2024 00:00,11,1,1,1,1,1,1,629500,2295500\n\n"
        );
        let log = load_str(&body).expect("load");
        assert_eq!(log.records().len(), 1);
    }
}
