//! Fusion pipeline coordinator
//!
//! Owns the [`FusionLedger`] for one run and drives every stage in order.
//!
//! # Stage Progression
//! CATALOG → BAITU TIERS (after spreadsheet reconciliation) → NAME OVERLAY →
//! ENGLISH RATINGS → CHEN TIERS → CHEN OVERRIDES → STATISTICS → EXPORT →
//! FILTER → PROJECT → WRITE → PUBLISH
//!
//! Each pass completes before the next starts, since name-linked passes
//! resolve against names set by earlier ones. The export overlay only
//! enriches records that are already published, so it never changes what
//! the filter keeps. Required inputs are checked before any work starts and
//! nothing is written until every artifact has rendered.

use crate::adapters::{
    self, baitu_tiers, catalog, chen_overrides, chen_tiers, english_ratings, export, name_overlay, spreadsheet,
    Requirement,
};
use crate::adapters::spreadsheet::SheetIndex;
use crate::adapters::stats::StatsTable;
use crate::artifacts::{self, Artifact};
use crate::config::IndexConfig;
use crate::filter;
use crate::ledger::{FusionLedger, FusionPass};
use crate::projection::{self, FLAT_COLUMNS};
use crate::publish;
use crate::statistics::{CatalogStats, OutputStats, PipelineStats, StatsTableStats};
use crate::types::{CanonicalKey, FusedRecord, StatsContext};
use cardfuse_common::Result;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of the fusion stages, before anything is written
#[derive(Debug)]
pub struct FusedCatalog {
    pub ledger: FusionLedger,
    pub stats: PipelineStats,
}

pub struct Pipeline {
    config: IndexConfig,
}

impl Pipeline {
    pub fn new(config: IndexConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Full run: fuse, write artifacts, publish
    pub fn run(&self) -> Result<PipelineStats> {
        let FusedCatalog { ledger, mut stats } = self.build()?;

        let views = filter::partition(ledger.records());
        stats.outputs = OutputStats::from_views(&views);
        info!("Filter: {}", stats.outputs.display_string());

        let artifacts = self.render(&views)?;
        artifacts::write_all(&artifacts)?;
        info!(
            "Wrote {} artifacts to {}",
            artifacts.len(),
            self.config.output_folder.display()
        );

        let structured = self.config.output_path(&self.config.outputs.structured);
        stats.publish = publish::publish(&structured, &self.config.publish_targets);

        Ok(stats)
    }

    /// Fold every source into a fresh ledger and attach statistics
    pub fn build(&self) -> Result<FusedCatalog> {
        self.check_required()?;

        let mut ledger = FusionLedger::new();
        let mut stats = PipelineStats::default();

        self.fold_catalog(&mut ledger, &mut stats)?;
        self.fold_baitu_tiers(&mut ledger, &mut stats)?;

        if let Some(path) = self.optional(name_overlay::SOURCE, &self.config.sources.name_overlay)? {
            fold_pass(&mut ledger, &mut stats, name_overlay::to_pass(&name_overlay::load(&path)?));
        }
        if let Some(path) = self.optional(english_ratings::SOURCE, &self.config.sources.english_ratings)? {
            fold_pass(&mut ledger, &mut stats, english_ratings::to_pass(&english_ratings::load(&path)?));
        }
        if let Some(path) = self.optional(chen_tiers::SOURCE, &self.config.sources.chen_tiers)? {
            fold_pass(&mut ledger, &mut stats, chen_tiers::to_pass(&chen_tiers::load(&path)?));
        }
        if let Some(path) = self.optional(chen_overrides::SOURCE, &self.config.sources.chen_overrides)? {
            fold_pass(&mut ledger, &mut stats, chen_overrides::to_pass(&chen_overrides::load(&path)?));
        }

        self.attach_stats(&mut ledger, &mut stats)?;
        self.fold_export(&mut ledger, &mut stats)?;

        Ok(FusedCatalog { ledger, stats })
    }

    // ------------------------------------------------------------------------
    // Stages
    // ------------------------------------------------------------------------

    fn required_sources(&self) -> Vec<(&'static str, PathBuf)> {
        let sources = &self.config.sources;
        let mut required: Vec<(&'static str, PathBuf)> = sources
            .catalog
            .iter()
            .map(|name| (catalog::SOURCE, self.config.source_path(name)))
            .collect();
        required.push(("stats-default", self.config.source_path(&sources.stats_default)));
        required.push(("stats-alternate", self.config.source_path(&sources.stats_alternate)));
        required
    }

    fn check_required(&self) -> Result<()> {
        for (source, path) in self.required_sources() {
            adapters::locate(source, &path, Requirement::Required)?;
        }
        Ok(())
    }

    fn optional(&self, source: &str, name: &Path) -> Result<Option<PathBuf>> {
        adapters::locate(source, &self.config.source_path(name), Requirement::Optional)
    }

    fn fold_catalog(&self, ledger: &mut FusionLedger, stats: &mut PipelineStats) -> Result<()> {
        let tables = self
            .config
            .sources
            .catalog
            .iter()
            .map(|name| catalog::load(&self.config.source_path(name)))
            .collect::<Result<Vec<_>>>()?;

        let catalog_pass = catalog::to_pass(&tables);
        let outcome = ledger.fold(&catalog_pass.pass);

        stats.catalog = CatalogStats {
            tables: tables.len(),
            rows_read: catalog_pass.rows_read,
            skipped: catalog_pass.skipped,
            duplicates: outcome.duplicates,
            created: outcome.created,
        };
        info!("Catalog: {}", stats.catalog.display_string());
        Ok(())
    }

    fn fold_baitu_tiers(&self, ledger: &mut FusionLedger, stats: &mut PipelineStats) -> Result<()> {
        let Some(path) = self.optional(baitu_tiers::SOURCE, &self.config.sources.baitu_tiers)? else {
            return Ok(());
        };
        let mut rows = baitu_tiers::load(&path)?;

        if let Some(sheet) = self.optional(spreadsheet::SOURCE, &self.config.sources.spreadsheet)? {
            let index = SheetIndex::new(&spreadsheet::load(&sheet)?);
            let outcome = index.reconcile(&mut rows);
            info!("Spreadsheet: {}", outcome.display_string());
            stats.reconcile = Some(outcome);
        }

        fold_pass(ledger, stats, baitu_tiers::to_pass(&rows));
        Ok(())
    }

    fn attach_stats(&self, ledger: &mut FusionLedger, stats: &mut PipelineStats) -> Result<()> {
        let sources = &self.config.sources;
        let tables = [
            (StatsContext::Default, &sources.stats_default),
            (StatsContext::Alternate, &sources.stats_alternate),
        ];

        for (context, name) in tables {
            let table = StatsTable::load(&self.config.source_path(name), context)?;
            let attached = ledger.attach_stats(context, |primary_name| table.get(primary_name));

            let table_stats = StatsTableStats {
                context,
                entries: table.len(),
                attached,
            };
            info!("Statistics {}", table_stats.display_string());
            stats.stats_tables.push(table_stats);
        }
        Ok(())
    }

    /// Translations and external scores for records the filter already keeps
    ///
    /// An unreadable overlay is skipped with a warning rather than failing
    /// the run.
    fn fold_export(&self, ledger: &mut FusionLedger, stats: &mut PipelineStats) -> Result<()> {
        let Some(path) = self.optional(export::SOURCE, &self.config.sources.export_overlay)? else {
            return Ok(());
        };
        let rows = match export::load(&path) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(
                    source = export::SOURCE,
                    path = %path.display(),
                    "Export overlay unreadable, skipping: {}",
                    e
                );
                return Ok(());
            }
        };

        let published: BTreeSet<CanonicalKey> = filter::partition(ledger.records())
            .published
            .iter()
            .map(|record| record.key().clone())
            .collect();
        let total = rows.len();
        let rows: Vec<_> = rows
            .into_iter()
            .filter(|row| CanonicalKey::parse(&row.id).is_some_and(|key| published.contains(&key)))
            .collect();
        debug!("Export overlay: {} of {} rows target published records", rows.len(), total);

        fold_pass(ledger, stats, export::to_pass(&rows));
        Ok(())
    }

    /// Render every artifact to memory
    pub fn render(&self, views: &filter::CatalogViews<'_>) -> Result<Vec<Artifact>> {
        let outputs = &self.config.outputs;
        let flat_rows = |records: &[&FusedRecord]| {
            records.iter().map(|r| projection::flat_row(r)).collect::<Vec<_>>()
        };

        let flat_cards: Vec<_> = views.published.iter().map(|r| projection::flat_card(r)).collect();
        let structured: Vec<_> = views.published.iter().map(|r| projection::structured_card(r)).collect();

        Ok(vec![
            Artifact::csv(self.config.output_path(&outputs.raw), &FLAT_COLUMNS, &flat_rows(&views.raw))?,
            Artifact::csv(
                self.config.output_path(&outputs.published),
                &FLAT_COLUMNS,
                &flat_rows(&views.published),
            )?,
            Artifact::csv(
                self.config.output_path(&outputs.missing),
                &FLAT_COLUMNS,
                &flat_rows(&views.missing_translation),
            )?,
            Artifact::json(self.config.output_path(&outputs.flat_json), &flat_cards)?,
            Artifact::json(self.config.output_path(&outputs.structured), &structured)?,
        ])
    }
}

fn fold_pass(ledger: &mut FusionLedger, stats: &mut PipelineStats, pass: FusionPass) {
    let outcome = ledger.fold(&pass);
    info!("{}", outcome.display_string());
    stats.passes.push(outcome);
}
