//! Service configuration for cardfuse-index
//!
//! Extends the shared bootstrap TOML with the input file names (`[sources]`)
//! and output file names (`[outputs]`). Source names are relative to the
//! root folder, output names to the output folder. Command-line overrides
//! are applied on top.

use cardfuse_common::config::{RootFolderResolver, TomlConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Full TOML document for this service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexToml {
    #[serde(flatten)]
    pub base: TomlConfig,

    #[serde(default)]
    pub sources: SourceFiles,

    #[serde(default)]
    pub outputs: OutputFiles,
}

/// Input file names
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    /// Catalog tables in priority order (required)
    pub catalog: Vec<PathBuf>,
    pub baitu_tiers: PathBuf,
    pub name_overlay: PathBuf,
    pub english_ratings: PathBuf,
    pub chen_tiers: PathBuf,
    pub chen_overrides: PathBuf,
    /// Default-context statistics table (required)
    pub stats_default: PathBuf,
    /// Alternate-context statistics table (required)
    pub stats_alternate: PathBuf,
    pub spreadsheet: PathBuf,
    pub export_overlay: PathBuf,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            catalog: vec![
                PathBuf::from("Agricola Database - Database.csv"),
                PathBuf::from("Agricola Database - Database (in progress).csv"),
            ],
            baitu_tiers: PathBuf::from("cards.json"),
            name_overlay: PathBuf::from("e.csv"),
            english_ratings: PathBuf::from("en.json"),
            chen_tiers: PathBuf::from("even_more_set_minor_improvements.json"),
            chen_overrides: PathBuf::from("set_o.json"),
            stats_default: PathBuf::from("4p_de.tsv"),
            stats_alternate: PathBuf::from("4p_nb.tsv"),
            spreadsheet: PathBuf::from("cards_sheet.csv"),
            export_overlay: PathBuf::from("cards_export.json"),
        }
    }
}

/// Output file names
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputFiles {
    pub raw: PathBuf,
    pub published: PathBuf,
    pub missing: PathBuf,
    pub flat_json: PathBuf,
    pub structured: PathBuf,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            raw: PathBuf::from("index_raw.csv"),
            published: PathBuf::from("index.csv"),
            missing: PathBuf::from("index_missing.csv"),
            flat_json: PathBuf::from("card_all.json"),
            structured: PathBuf::from("card_all_v2.json"),
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
    /// Replaces the TOML publish targets when non-empty
    pub publish: Vec<PathBuf>,
    pub no_publish: bool,
}

/// Resolved configuration for one run
#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub root_folder: PathBuf,
    pub output_folder: PathBuf,
    pub sources: SourceFiles,
    pub outputs: OutputFiles,
    pub publish_targets: Vec<PathBuf>,
}

impl IndexConfig {
    /// All defaults, reading from and writing to `root_folder`
    pub fn from_root(root_folder: impl Into<PathBuf>) -> Self {
        let root_folder = root_folder.into();
        Self {
            output_folder: root_folder.clone(),
            root_folder,
            sources: SourceFiles::default(),
            outputs: OutputFiles::default(),
            publish_targets: Vec::new(),
        }
    }

    pub fn resolve(toml: IndexToml, cli: CliOverrides) -> Self {
        Self::resolve_with(&RootFolderResolver::new(), toml, cli)
    }

    pub fn resolve_with(resolver: &RootFolderResolver, toml: IndexToml, cli: CliOverrides) -> Self {
        let root_folder = resolver.resolve(cli.root_folder.as_deref(), &toml.base);
        let output_folder = cli
            .output_folder
            .or(toml.base.output_folder)
            .unwrap_or_else(|| root_folder.clone());

        let publish_targets = if cli.no_publish {
            Vec::new()
        } else if !cli.publish.is_empty() {
            cli.publish
        } else {
            toml.base.publish_targets
        };

        Self {
            publish_targets: publish_targets.iter().map(|t| root_folder.join(t)).collect(),
            root_folder,
            output_folder,
            sources: toml.sources,
            outputs: toml.outputs,
        }
    }

    /// Source file path (absolute names pass through `join` unchanged)
    pub fn source_path(&self, name: &Path) -> PathBuf {
        self.root_folder.join(name)
    }

    pub fn output_path(&self, name: &Path) -> PathBuf {
        self.output_folder.join(name)
    }
}
