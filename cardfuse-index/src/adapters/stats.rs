//! Statistics adapter
//!
//! Tab-separated tables with one row per card, keyed by the card's primary
//! display name. Header cells are matched after trimming whitespace; the
//! name column is any header containing `Card Name`, the numeric columns
//! must match exactly (`PWR`, `ADP`, `APR`, `Plays`, `Drafted`).

use crate::derive::{draw_play_ratio, parse_number};
use crate::types::{StatsContext, StatsEntry};
use cardfuse_common::{Error, Result};
use csv::StringRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

const NAME_HEADER: &str = "Card Name";
const PWR_HEADER: &str = "PWR";
const ADP_HEADER: &str = "ADP";
const APR_HEADER: &str = "APR";
const PLAYS_HEADER: &str = "Plays";
const DRAFTED_HEADER: &str = "Drafted";

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy, Default)]
struct Columns {
    name: usize,
    pwr: Option<usize>,
    adp: Option<usize>,
    apr: Option<usize>,
    plays: Option<usize>,
    drafted: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> std::result::Result<Self, Option<String>> {
        let cleaned: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();
        let exact = |wanted: &str| cleaned.iter().position(|h| *h == wanted);

        let Some(name) = cleaned.iter().position(|h| h.contains(NAME_HEADER)) else {
            return Err(closest_header(&cleaned, NAME_HEADER));
        };

        Ok(Self {
            name,
            pwr: exact(PWR_HEADER),
            adp: exact(ADP_HEADER),
            apr: exact(APR_HEADER),
            plays: exact(PLAYS_HEADER),
            drafted: exact(DRAFTED_HEADER),
        })
    }
}

/// Header most similar to `wanted`, for the missing-column warning
fn closest_header(headers: &[&str], wanted: &str) -> Option<String> {
    headers
        .iter()
        .filter(|h| !h.is_empty())
        .map(|h| (strsim::normalized_levenshtein(h, wanted), *h))
        .filter(|(similarity, _)| *similarity > 0.5)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, header)| header.to_string())
}

/// One statistics table: display name → entry
#[derive(Debug, Clone)]
pub struct StatsTable {
    context: StatsContext,
    entries: HashMap<String, StatsEntry>,
}

impl StatsTable {
    pub fn empty(context: StatsContext) -> Self {
        Self {
            context,
            entries: HashMap::new(),
        }
    }

    pub fn load(path: &Path, context: StatsContext) -> Result<Self> {
        let file = File::open(path)?;
        let table = Self::parse(BufReader::new(file), context).map_err(|e| match e {
            Error::Csv(e) => Error::invalid_input(path, e),
            other => other,
        })?;
        debug!(
            path = %path.display(),
            context = context.label(),
            entries = table.len(),
            "Statistics table loaded"
        );
        Ok(table)
    }

    /// Parse a table; a missing name column yields an empty table
    pub fn parse<R: Read>(reader: R, context: StatsContext) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let columns = match Columns::resolve(&headers) {
            Ok(columns) => columns,
            Err(suggestion) => {
                warn!(
                    context = context.label(),
                    suggestion = suggestion.as_deref().unwrap_or("none"),
                    "No '{}' column in statistics table, ignoring it",
                    NAME_HEADER
                );
                return Ok(Self::empty(context));
            }
        };

        let mut table = Self::empty(context);
        for record in reader.records() {
            let record = record?;
            let cell = |column: Option<usize>| column.and_then(|i| record.get(i)).and_then(parse_number);

            let Some(name) = record.get(columns.name).map(str::trim).filter(|n| !n.is_empty()) else {
                continue;
            };

            let entry = StatsEntry {
                pwr: cell(columns.pwr),
                adp: cell(columns.adp),
                apr: cell(columns.apr),
                draw_play_rate: draw_play_ratio(cell(columns.plays), cell(columns.drafted)),
            };
            table.entries.insert(name.to_string(), entry);
        }

        Ok(table)
    }

    pub fn context(&self) -> StatsContext {
        self.context
    }

    pub fn get(&self, name: &str) -> Option<StatsEntry> {
        self.entries.get(name.trim()).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name.trim())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
