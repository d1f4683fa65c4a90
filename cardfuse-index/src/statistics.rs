//! Run statistics
//!
//! Per-stage counters collected by the pipeline. Each stage renders its own
//! display string; the binary logs them once the run completes.

use crate::adapters::spreadsheet::ReconcileOutcome;
use crate::filter::CatalogViews;
use crate::ledger::PassOutcome;
use crate::publish::PublishOutcome;
use crate::types::StatsContext;

/// **Catalog stage**
///
/// Display: "N rows from T tables, S skipped, D duplicates, C identities"
#[derive(Debug, Clone, Default)]
pub struct CatalogStats {
    pub tables: usize,
    pub rows_read: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub created: usize,
}

impl CatalogStats {
    pub fn display_string(&self) -> String {
        format!(
            "{} rows from {} tables, {} skipped, {} duplicates, {} identities",
            self.rows_read, self.tables, self.skipped, self.duplicates, self.created
        )
    }
}

/// **Statistics stage**, one per context
///
/// Display: "default: N entries, M attached"
#[derive(Debug, Clone)]
pub struct StatsTableStats {
    pub context: StatsContext,
    pub entries: usize,
    pub attached: usize,
}

impl StatsTableStats {
    pub fn display_string(&self) -> String {
        format!("{}: {} entries, {} attached", self.context.label(), self.entries, self.attached)
    }
}

/// **Filter stage**
///
/// Display: "R raw, P published (O opinion, K always-keep, S statistics), D dropped, M missing translation"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputStats {
    pub raw: usize,
    pub published: usize,
    pub dropped: usize,
    pub missing_translation: usize,
    pub kept_by_opinion: usize,
    pub kept_by_always_keep: usize,
    pub kept_by_statistics: usize,
}

impl OutputStats {
    pub fn from_views(views: &CatalogViews<'_>) -> Self {
        Self {
            raw: views.raw.len(),
            published: views.published.len(),
            dropped: views.dropped(),
            missing_translation: views.missing_translation.len(),
            kept_by_opinion: views.kept_by_opinion,
            kept_by_always_keep: views.kept_by_always_keep,
            kept_by_statistics: views.kept_by_statistics,
        }
    }

    pub fn display_string(&self) -> String {
        format!(
            "{} raw, {} published ({} opinion, {} always-keep, {} statistics), {} dropped, {} missing translation",
            self.raw,
            self.published,
            self.kept_by_opinion,
            self.kept_by_always_keep,
            self.kept_by_statistics,
            self.dropped,
            self.missing_translation
        )
    }
}

/// Counters for a whole run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub catalog: CatalogStats,
    /// `None` when no spreadsheet was available
    pub reconcile: Option<ReconcileOutcome>,
    /// Passes in fold order, catalog excluded
    pub passes: Vec<PassOutcome>,
    pub stats_tables: Vec<StatsTableStats>,
    pub outputs: OutputStats,
    pub publish: PublishOutcome,
}

impl PipelineStats {
    /// Outcome of the pass folded from `source`, if it ran
    pub fn pass(&self, source: &str) -> Option<&PassOutcome> {
        self.passes.iter().find(|p| p.source == source)
    }

    /// One line per stage, in run order
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("catalog: {}", self.catalog.display_string())];
        if let Some(reconcile) = &self.reconcile {
            lines.push(format!("spreadsheet: {}", reconcile.display_string()));
        }
        lines.extend(self.passes.iter().map(PassOutcome::display_string));
        lines.extend(self.stats_tables.iter().map(|s| format!("stats {}", s.display_string())));
        lines.push(format!("outputs: {}", self.outputs.display_string()));
        lines.push(format!("publish: {}", self.publish.display_string()));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_display() {
        let stats = CatalogStats {
            tables: 2,
            rows_read: 10,
            skipped: 3,
            duplicates: 1,
            created: 6,
        };
        assert_eq!(
            stats.display_string(),
            "10 rows from 2 tables, 3 skipped, 1 duplicates, 6 identities"
        );
    }

    #[test]
    fn test_summary_skips_absent_spreadsheet() {
        let stats = PipelineStats {
            passes: vec![PassOutcome {
                source: "english-ratings".to_string(),
                rows: 4,
                linked_by_name: 3,
                unlinked: 1,
                ..Default::default()
            }],
            ..Default::default()
        };

        let lines = stats.summary_lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "english-ratings: 4 rows, 0 by key, 3 by name, 1 unmatched");
        assert!(stats.pass("english-ratings").is_some());
        assert!(stats.pass("chen-tiers").is_none());
    }
}
