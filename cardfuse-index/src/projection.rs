//! Public output shapes
//!
//! - [`FlatRow`]: one row per identity, one column pair per rater
//!   (`index*.csv`)
//! - [`FlatCard`]: the flat row plus statistics (`card_all.json`)
//! - [`StructuredCard`]: localized names and an ordered list of opinions
//!   (`card_all_v2.json`), the shape downstream display layers read

use crate::types::{CardStats, FusedRecord, Opinion, Rater, Score, LOCALE_EN};
use serde::Serialize;
use std::collections::BTreeMap;

/// Column order of the flat CSV artifacts
pub const FLAT_COLUMNS: [&str; 10] = [
    "no", "cnName", "enName", "baituTier", "enTier", "chenTier", "effect", "baituDesc", "enDesc", "chenDesc",
];

// ============================================================================
// Flat shapes
// ============================================================================

/// Field order matches [`FLAT_COLUMNS`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlatRow {
    pub no: String,
    #[serde(rename = "cnName")]
    pub cn_name: String,
    #[serde(rename = "enName")]
    pub en_name: String,
    #[serde(rename = "baituTier")]
    pub baitu_tier: String,
    #[serde(rename = "enTier")]
    pub en_tier: String,
    #[serde(rename = "chenTier")]
    pub chen_tier: String,
    pub effect: String,
    #[serde(rename = "baituDesc")]
    pub baitu_desc: String,
    #[serde(rename = "enDesc")]
    pub en_desc: String,
    #[serde(rename = "chenDesc")]
    pub chen_desc: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlatCard {
    pub no: String,
    #[serde(rename = "cnName")]
    pub cn_name: String,
    #[serde(rename = "enName")]
    pub en_name: String,
    #[serde(rename = "baituTier")]
    pub baitu_tier: String,
    #[serde(rename = "enTier")]
    pub en_tier: String,
    #[serde(rename = "chenTier")]
    pub chen_tier: String,
    #[serde(rename = "baituDesc")]
    pub baitu_desc: String,
    #[serde(rename = "enDesc")]
    pub en_desc: String,
    #[serde(rename = "chenDesc")]
    pub chen_desc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CardStats>,
}

fn tier_of(record: &FusedRecord, rater: Rater) -> String {
    record.opinion(rater).map(|o| o.tier.clone()).unwrap_or_default()
}

fn rationale_of(record: &FusedRecord, rater: Rater) -> String {
    record.opinion(rater).map(|o| o.rationale.clone()).unwrap_or_default()
}

pub fn flat_row(record: &FusedRecord) -> FlatRow {
    FlatRow {
        no: record.key().to_string(),
        cn_name: record.secondary_name().unwrap_or_default().to_string(),
        en_name: record.primary_name.clone(),
        baitu_tier: tier_of(record, Rater::Baitu),
        en_tier: tier_of(record, Rater::Mark),
        chen_tier: tier_of(record, Rater::Chen),
        effect: record.ruling.clone(),
        baitu_desc: rationale_of(record, Rater::Baitu),
        en_desc: rationale_of(record, Rater::Mark),
        chen_desc: rationale_of(record, Rater::Chen),
    }
}

pub fn flat_card(record: &FusedRecord) -> FlatCard {
    let row = flat_row(record);
    FlatCard {
        no: row.no,
        cn_name: row.cn_name,
        en_name: row.en_name,
        baitu_tier: row.baitu_tier,
        en_tier: row.en_tier,
        chen_tier: row.chen_tier,
        baitu_desc: row.baitu_desc,
        en_desc: row.en_desc,
        chen_desc: row.chen_desc,
        stats: record.stats.clone().filter(|s| !s.is_empty()),
    }
}

// ============================================================================
// Structured shape
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocaleNames {
    pub en: String,
    pub zh: String,
}

/// One opinion in the structured shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierEntry {
    pub author: &'static str,
    pub tier: String,
    pub score: Option<Score>,
    pub desc: String,
    #[serde(rename = "localeDescs")]
    pub locale_descs: BTreeMap<String, String>,
}

impl From<&Opinion> for TierEntry {
    fn from(opinion: &Opinion) -> Self {
        Self {
            author: opinion.rater.author(),
            tier: opinion.tier.clone(),
            score: opinion.score,
            desc: opinion.rationale.clone(),
            locale_descs: opinion.localized.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredCard {
    pub no: String,
    #[serde(rename = "localeNames")]
    pub locale_names: LocaleNames,
    #[serde(rename = "localeDescs")]
    pub locale_descs: BTreeMap<String, String>,
    pub tiers: Vec<TierEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CardStats>,
}

pub fn structured_card(record: &FusedRecord) -> StructuredCard {
    let mut locale_descs = BTreeMap::new();
    if !record.ruling.is_empty() {
        locale_descs.insert(LOCALE_EN.to_string(), record.ruling.clone());
    }

    StructuredCard {
        no: record.key().to_string(),
        locale_names: LocaleNames {
            en: record.primary_name.clone(),
            zh: record.secondary_name().unwrap_or_default().to_string(),
        },
        locale_descs,
        tiers: record.opinions().map(TierEntry::from).collect(),
        stats: record.stats.clone().filter(|s| !s.is_empty()),
    }
}
