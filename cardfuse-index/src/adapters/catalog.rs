//! Primary catalog adapter
//!
//! Reads the structured card tables (`Deck`, `Number`, `Name`, `Text`
//! columns). Every table row with a valid deck code, a number and a name
//! introduces one identity. Tables are read in order, so when a key appears
//! twice the earlier table wins.

use super::read_csv_rows;
use crate::key;
use crate::ledger::{FusionPass, LinkStrategy};
use crate::types::{FieldUpdates, LinkHint, PartialRecord};
use cardfuse_common::Result;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

pub const SOURCE: &str = "catalog";

/// One row of a catalog table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogRow {
    #[serde(rename = "Deck", default)]
    pub deck: String,
    #[serde(rename = "Number", default)]
    pub number: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Text", default)]
    pub text: String,
}

/// Catalog rows turned into a pass, with the rows filtered out on the way
#[derive(Debug, Clone)]
pub struct CatalogPass {
    pub pass: FusionPass,
    /// Rows read across all tables
    pub rows_read: usize,
    /// Rows without a number or name, or with a deck outside the alphabet
    pub skipped: usize,
}

pub fn load(path: &Path) -> Result<Vec<CatalogRow>> {
    let rows = read_csv_rows(path)?;
    debug!(path = %path.display(), rows = rows.len(), "Catalog table loaded");
    Ok(rows)
}

/// Build the identity-creating pass from tables in priority order
pub fn to_pass(tables: &[Vec<CatalogRow>]) -> CatalogPass {
    let mut rows = Vec::new();
    let mut rows_read = 0;
    let mut skipped = 0;

    for row in tables.iter().flatten() {
        rows_read += 1;

        let number = row.number.trim();
        let name = row.name.trim();
        if number.is_empty() || name.is_empty() || !key::is_valid_group(&row.deck) {
            skipped += 1;
            continue;
        }

        let Some(canonical) = key::canonical_key(&row.deck, number) else {
            skipped += 1;
            continue;
        };

        rows.push(PartialRecord::new(
            LinkHint::both(Some(canonical), name),
            FieldUpdates {
                primary_name: Some(name.to_string()),
                ruling: Some(row.text.trim().to_string()),
                ..Default::default()
            },
        ));
    }

    CatalogPass {
        pass: FusionPass::new(SOURCE, LinkStrategy::Create, rows),
        rows_read,
        skipped,
    }
}
