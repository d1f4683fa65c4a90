//! Chinese name overlay
//!
//! CSV with `no` and `name` columns. Overrides whatever secondary name an
//! earlier pass set for the same key; rows missing either field are ignored.

use super::read_csv_rows;
use crate::ledger::{FusionPass, LinkStrategy};
use crate::types::{non_empty, CanonicalKey, FieldUpdates, LinkHint, NameUpdate, PartialRecord};
use cardfuse_common::Result;
use serde::Deserialize;
use std::path::Path;

pub const SOURCE: &str = "name-overlay";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameOverlayRow {
    #[serde(default)]
    pub no: String,
    #[serde(default)]
    pub name: String,
}

pub fn load(path: &Path) -> Result<Vec<NameOverlayRow>> {
    read_csv_rows(path)
}

pub fn to_pass(rows: &[NameOverlayRow]) -> FusionPass {
    let partials = rows
        .iter()
        .filter_map(|row| {
            let key = CanonicalKey::parse(&row.no)?;
            let name = non_empty(&row.name)?;
            Some(PartialRecord::new(
                LinkHint::key(Some(key)),
                FieldUpdates {
                    secondary_name: Some(NameUpdate::Overwrite(name)),
                    ..Default::default()
                },
            ))
        })
        .collect();

    FusionPass::new(SOURCE, LinkStrategy::ByKey, partials)
}
