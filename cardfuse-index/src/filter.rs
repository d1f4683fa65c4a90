//! Retention filter
//!
//! Decides which fused records carry enough signal to be published. The raw
//! artifact keeps everything; the published one keeps records that have an
//! opinion, were touched by an always-keep source, or have statistics in
//! the default context.

use crate::types::{FusedRecord, StatsContext};

/// Why a record made it into the published catalog (first reason that applies)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    Opinion,
    AlwaysKeep,
    Statistics,
}

pub fn retention(record: &FusedRecord) -> Option<Retention> {
    if record.has_opinion() {
        Some(Retention::Opinion)
    } else if record.is_pinned() {
        Some(Retention::AlwaysKeep)
    } else if record
        .stats
        .as_ref()
        .and_then(|stats| stats.get(StatsContext::Default))
        .is_some()
    {
        Some(Retention::Statistics)
    } else {
        None
    }
}

/// Records split into the three catalog views, each in ledger order
#[derive(Debug, Clone, Default)]
pub struct CatalogViews<'a> {
    pub raw: Vec<&'a FusedRecord>,
    pub published: Vec<&'a FusedRecord>,
    /// Published records without a secondary display name
    pub missing_translation: Vec<&'a FusedRecord>,
    pub kept_by_opinion: usize,
    pub kept_by_always_keep: usize,
    pub kept_by_statistics: usize,
}

impl CatalogViews<'_> {
    pub fn dropped(&self) -> usize {
        self.raw.len() - self.published.len()
    }
}

pub fn partition(records: &[FusedRecord]) -> CatalogViews<'_> {
    let mut views = CatalogViews::default();

    for record in records {
        views.raw.push(record);

        let Some(reason) = retention(record) else {
            continue;
        };
        match reason {
            Retention::Opinion => views.kept_by_opinion += 1,
            Retention::AlwaysKeep => views.kept_by_always_keep += 1,
            Retention::Statistics => views.kept_by_statistics += 1,
        }

        views.published.push(record);
        if record.secondary_name().is_none() {
            views.missing_translation.push(record);
        }
    }

    views
}
