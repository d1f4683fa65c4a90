//! Chen tier list for the minor-improvement supplement
//!
//! JSON array of `{no, name, tier, desc}`. Rows link by key where they carry
//! one; the rest link by secondary display name onto identities the key pass
//! did not claim. Every identity this source reaches is always published.

use super::{lenient_string, read_json_rows};
use crate::ledger::{FusionPass, LinkStrategy};
use crate::types::{non_empty, CanonicalKey, FieldUpdates, LinkHint, NameUpdate, Opinion, PartialRecord, Rater};
use cardfuse_common::Result;
use serde::Deserialize;
use std::path::Path;

pub const SOURCE: &str = "chen-tiers";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChenRow {
    #[serde(default, deserialize_with = "lenient_string")]
    pub no: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tier: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub desc: String,
}

pub fn load(path: &Path) -> Result<Vec<ChenRow>> {
    read_json_rows(path)
}

pub fn to_pass(rows: &[ChenRow]) -> FusionPass {
    let partials = rows
        .iter()
        .map(|row| {
            PartialRecord::new(
                LinkHint::both(CanonicalKey::parse(&row.no), &row.name),
                FieldUpdates {
                    // Only applies when the row resolves by key; a name match
                    // already agrees on the name
                    secondary_name: non_empty(&row.name).map(NameUpdate::FillIfEmpty),
                    opinion: Some(Opinion::new(Rater::Chen, &row.tier, &row.desc)),
                    ..Default::default()
                },
            )
        })
        .collect();

    FusionPass::new(SOURCE, LinkStrategy::KeyThenSecondaryName, partials).always_keep()
}
