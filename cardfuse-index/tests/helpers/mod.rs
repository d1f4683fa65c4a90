//! Test Helper Utilities
//!
//! Source-file fixtures for pipeline tests. Every fixture lives in its own
//! temporary root folder using the default source file names.

#![allow(dead_code)]

use cardfuse_index::IndexConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const CATALOG: &str = "Agricola Database - Database.csv";
pub const CATALOG_IN_PROGRESS: &str = "Agricola Database - Database (in progress).csv";
pub const STATS_DEFAULT: &str = "4p_de.tsv";
pub const STATS_ALTERNATE: &str = "4p_nb.tsv";
pub const EXPORT: &str = "cards_export.json";

pub const RAW: &str = "index_raw.csv";
pub const PUBLISHED: &str = "index.csv";
pub const MISSING: &str = "index_missing.csv";
pub const FLAT_JSON: &str = "card_all.json";
pub const STRUCTURED: &str = "card_all_v2.json";

pub const ALL_OUTPUTS: [&str; 5] = [RAW, PUBLISHED, MISSING, FLAT_JSON, STRUCTURED];

pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Catalog tables, both statistics tables and the English ratings file
    ///
    /// A001 Farmer appears twice in the first table; Z004 has an invalid deck.
    pub fn minimal() -> Self {
        let fixture = Self::empty();
        fixture.write(
            CATALOG,
            "Deck,Number,Name,Text\n\
             A,1,Farmer,Sow grain\n\
             A,1,Farmer,Sow grain\n\
             B,2,Baker,Bake bread\n\
             C,3,Potter,\n\
             Z,4,Ghost,Boo\n\
             D,5,Well,Draw water\n\
             E,6,Oven,\n",
        );
        fixture.write(CATALOG_IN_PROGRESS, "Deck,Number,Name,Text\nA,7,Mason,Build\nB,02,Baker Copy,\n");
        fixture.write(
            STATS_DEFAULT,
            "Card Name \tPWR\tADP\tAPR\tPlays\tDrafted\nPotter\t1.5\t2.25\t0.5\t10\t20\n",
        );
        fixture.write(STATS_ALTERNATE, " Card Name\tPWR\nFarmer\t0.75\n");
        fixture.write(
            "en.json",
            r#"[{"card_title": "Farmer", "rating": 5, "insight": "Take it"}]"#,
        );
        fixture
    }

    /// Every source, exercising each linking strategy
    pub fn full() -> Self {
        let fixture = Self::minimal();
        fixture.write(
            "cards.json",
            r#"[{"no": "A001", "name": "农夫", "tier": "B", "desc": "稳定"},
                {"no": "", "name": "Baker", "tier": "C", "desc": ""}]"#,
        );
        fixture.write("cards_sheet.csv", "no,cnName,enName\nB002,面包师,Baker\n");
        fixture.write("e.csv", "no,name\nA001,农民\n");
        fixture.write(
            "even_more_set_minor_improvements.json",
            r#"[{"no": "D005", "name": "水井", "tier": "A", "desc": "强"},
                {"no": "", "name": "面包师", "tier": "D", "desc": "弱"}]"#,
        );
        fixture.write("set_o.json", r#"[{"name": "水井", "tier": "B", "desc": "改"}]"#);
        fixture.write(
            EXPORT,
            r#"[{"id": "A001", "enDesc_trans2zh": "拿走", "jpwiki_score": "8", "comment_jpwiki_cn": "好"}]"#,
        );
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture dir");
        }
        fs::write(&path, contents).expect("write fixture");
        path
    }

    pub fn remove(&self, name: &str) {
        fs::remove_file(self.path(name)).expect("remove fixture");
    }

    pub fn config(&self) -> IndexConfig {
        IndexConfig::from_root(self.root())
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name)).expect("read output")
    }

    pub fn read_bytes(&self, name: &str) -> Vec<u8> {
        fs::read(self.path(name)).expect("read output")
    }

    pub fn read_json(&self, name: &str) -> serde_json::Value {
        serde_json::from_str(&self.read(name)).expect("parse output json")
    }

    /// `no` column of a flat CSV artifact
    pub fn keys_in(&self, name: &str) -> Vec<String> {
        self.read(name)
            .lines()
            .skip(1)
            .filter_map(|line| line.split(',').next().map(str::to_string))
            .collect()
    }
}

/// Structured card with the given key
pub fn card<'a>(cards: &'a serde_json::Value, key: &str) -> &'a serde_json::Value {
    cards
        .as_array()
        .and_then(|cards| cards.iter().find(|c| c["no"] == key))
        .unwrap_or_else(|| panic!("no card {key}"))
}
