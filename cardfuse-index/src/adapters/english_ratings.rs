//! English ratings (`mark`)
//!
//! JSON array of `{card_title, rating, insight}`. Carries no key; rows link
//! by matching `card_title` against primary display names. The five-point
//! `rating` becomes the tier letter and the rank score.

use super::{lenient_string, read_json_rows};
use crate::derive::{json_integer, rating_to_tier, tier_rank};
use crate::ledger::{FusionPass, LinkStrategy};
use crate::types::{FieldUpdates, LinkHint, Opinion, PartialRecord, Rater, Tier, LOCALE_ZH};
use cardfuse_common::Result;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

pub const SOURCE: &str = "english-ratings";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnglishRatingRow {
    #[serde(default, deserialize_with = "lenient_string")]
    pub card_title: String,
    #[serde(default)]
    pub rating: Value,
    #[serde(default, deserialize_with = "lenient_string")]
    pub insight: String,
}

pub fn load(path: &Path) -> Result<Vec<EnglishRatingRow>> {
    read_json_rows(path)
}

pub fn to_pass(rows: &[EnglishRatingRow]) -> FusionPass {
    let partials = rows
        .iter()
        .filter(|row| !row.card_title.trim().is_empty())
        .map(|row| {
            let tier = json_integer(&row.rating)
                .and_then(rating_to_tier)
                .map(Tier::as_str)
                .unwrap_or_default();

            // Until a translation arrives the Chinese variant mirrors the English text
            let opinion = Opinion::new(Rater::Mark, tier, &row.insight)
                .with_score(tier_rank(tier))
                .with_localized(LOCALE_ZH, &row.insight);

            PartialRecord::new(
                LinkHint::name(&row.card_title),
                FieldUpdates {
                    opinion: Some(opinion),
                    ..Default::default()
                },
            )
        })
        .collect();

    FusionPass::new(SOURCE, LinkStrategy::ByPrimaryName, partials)
}
