//! # cardfuse-index
//!
//! Builds the canonical card catalog by fusing a primary catalog, several
//! rater sources, a translation spreadsheet and two statistics tables.
//!
//! **Architecture:** sequential fusion passes into one owned ledger
//!
//! - [`adapters`] read each source and emit [`ledger::FusionPass`]es
//! - [`ledger`] applies passes under the merge policy and linking strategies
//! - [`filter`] and [`projection`] decide what is published and in which shape
//! - [`pipeline`] runs everything in order and writes the artifacts

pub mod adapters;
pub mod artifacts;
pub mod config;
pub mod derive;
pub mod filter;
pub mod key;
pub mod ledger;
pub mod pipeline;
pub mod projection;
pub mod publish;
pub mod statistics;
pub mod types;

pub use config::{CliOverrides, IndexConfig, IndexToml};
pub use ledger::{FusionLedger, FusionPass, LinkState, LinkStrategy, PassOutcome};
pub use pipeline::{FusedCatalog, Pipeline};
pub use statistics::PipelineStats;
pub use types::{CanonicalKey, FusedRecord, Opinion, Rater, Score, Tier};
