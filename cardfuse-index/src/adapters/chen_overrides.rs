//! Chen overrides, linked by Chinese name only
//!
//! JSON array of `{name, tier, desc}` matched against the current secondary
//! display names. Matches replace the `chen` opinion outright.

use super::{lenient_string, read_json_rows};
use crate::ledger::{FusionPass, LinkStrategy};
use crate::types::{FieldUpdates, LinkHint, Opinion, PartialRecord, Rater};
use cardfuse_common::Result;
use serde::Deserialize;
use std::path::Path;

pub const SOURCE: &str = "chen-overrides";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChenOverrideRow {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tier: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub desc: String,
}

pub fn load(path: &Path) -> Result<Vec<ChenOverrideRow>> {
    read_json_rows(path)
}

pub fn to_pass(rows: &[ChenOverrideRow]) -> FusionPass {
    let partials = rows
        .iter()
        .filter(|row| !row.name.trim().is_empty())
        .map(|row| {
            PartialRecord::new(
                LinkHint::name(&row.name),
                FieldUpdates {
                    opinion: Some(Opinion::new(Rater::Chen, &row.tier, &row.desc)),
                    ..Default::default()
                },
            )
        })
        .collect();

    FusionPass::new(SOURCE, LinkStrategy::BySecondaryName, partials)
}
