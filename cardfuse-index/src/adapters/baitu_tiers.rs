//! Baitu tier list
//!
//! JSON array of `{no, name, tier, desc}` keyed by canonical key. Supplies
//! the secondary (Chinese) display name and a tier + rationale opinion.

use super::{lenient_string, read_json_rows};
use crate::ledger::{FusionPass, LinkStrategy};
use crate::types::{non_empty, CanonicalKey, FieldUpdates, LinkHint, NameUpdate, Opinion, PartialRecord, Rater};
use cardfuse_common::Result;
use serde::Deserialize;
use std::path::Path;

pub const SOURCE: &str = "baitu-tiers";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BaituRow {
    #[serde(default, deserialize_with = "lenient_string")]
    pub no: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tier: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub desc: String,
}

pub fn load(path: &Path) -> Result<Vec<BaituRow>> {
    read_json_rows(path)
}

/// Rows without a key cannot link and are left out
pub fn to_pass(rows: &[BaituRow]) -> FusionPass {
    let partials = rows
        .iter()
        .filter_map(|row| {
            let key = CanonicalKey::parse(&row.no)?;
            Some(PartialRecord::new(
                LinkHint::both(Some(key), &row.name),
                FieldUpdates {
                    secondary_name: non_empty(&row.name).map(NameUpdate::Overwrite),
                    opinion: Some(Opinion::new(Rater::Baitu, &row.tier, &row.desc)),
                    ..Default::default()
                },
            ))
        })
        .collect();

    FusionPass::new(SOURCE, LinkStrategy::ByKey, partials)
}
