//! Export overlay adapter
//!
//! JSON array keyed by `id` carrying the Chinese rendering of the English
//! rating rationale and an external 10-point rating with its comment. The rating
//! becomes a `jpwiki` opinion with no tier letter; the rendering becomes the
//! `zh` variant of the `mark` rationale.

use super::{lenient_string, read_json_rows};
use crate::derive::json_number;
use crate::ledger::{FusionPass, LinkStrategy};
use crate::types::{
    non_empty, CanonicalKey, FieldUpdates, LinkHint, Opinion, PartialRecord, Rater, Score, Translation,
    LOCALE_ZH,
};
use cardfuse_common::Result;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

pub const SOURCE: &str = "export";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportRow {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "enDesc_trans2zh", default, deserialize_with = "lenient_string")]
    pub rationale_zh: String,
    #[serde(rename = "jpwiki_score", default)]
    pub external_score: Value,
    #[serde(rename = "comment_jpwiki_cn", default, deserialize_with = "lenient_string")]
    pub external_comment: String,
}

pub fn load(path: &Path) -> Result<Vec<ExportRow>> {
    read_json_rows(path)
}

/// The `jpwiki` opinion for a row, if it carries a usable score or comment
fn external_opinion(row: &ExportRow) -> Option<Opinion> {
    let score = json_number(&row.external_score);
    let comment = row.external_comment.trim();
    if score.is_none() && comment.is_empty() {
        return None;
    }

    Some(Opinion::new(Rater::Jpwiki, "", comment).with_score(score.map(Score::Rating)))
}

pub fn to_pass(rows: &[ExportRow]) -> FusionPass {
    let partials = rows
        .iter()
        .filter_map(|row| {
            let key = CanonicalKey::parse(&row.id)?;
            let translation = non_empty(&row.rationale_zh).map(|text| Translation {
                rater: Rater::Mark,
                locale: LOCALE_ZH.to_string(),
                text,
            });
            let opinion = external_opinion(row);
            if translation.is_none() && opinion.is_none() {
                return None;
            }

            Some(PartialRecord::new(
                LinkHint::key(Some(key)),
                FieldUpdates {
                    opinion,
                    translation,
                    ..Default::default()
                },
            ))
        })
        .collect();

    FusionPass::new(SOURCE, LinkStrategy::ByKey, partials)
}
