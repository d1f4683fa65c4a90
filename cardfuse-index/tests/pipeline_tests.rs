//! Pipeline Integration Tests
//!
//! Full runs over fixture source folders, checking the written artifacts.

mod helpers;

use cardfuse_common::Error;
use cardfuse_index::{Pipeline, Rater};
use helpers::{
    card, Fixture, ALL_OUTPUTS, EXPORT, FLAT_JSON, MISSING, PUBLISHED, RAW, STATS_ALTERNATE, STRUCTURED,
};
use serde_json::json;

// ================================================================================================
// Catalog identity and primary-name linking
// ================================================================================================

#[test]
fn test_duplicate_catalog_rows_fuse_into_one_record() {
    let fixture = Fixture::minimal();
    let stats = Pipeline::new(fixture.config()).run().unwrap();

    assert_eq!(stats.catalog.tables, 2);
    assert_eq!(stats.catalog.rows_read, 9);
    assert_eq!(stats.catalog.skipped, 1);
    assert_eq!(stats.catalog.duplicates, 2);
    assert_eq!(stats.catalog.created, 6);

    let raw = fixture.keys_in(RAW);
    assert_eq!(raw, vec!["A001", "B002", "C003", "D005", "E006", "A007"]);
}

#[test]
fn test_primary_name_link_adds_ranked_opinion() {
    let fixture = Fixture::minimal();
    Pipeline::new(fixture.config()).run().unwrap();

    let cards = fixture.read_json(STRUCTURED);
    let farmer = card(&cards, "A001");
    assert_eq!(
        farmer["tiers"],
        json!([{
            "author": "mark",
            "tier": "A",
            "score": 5,
            "desc": "Take it",
            "localeDescs": {"en": "Take it", "zh": "Take it"}
        }])
    );
    assert_eq!(farmer["localeDescs"], json!({"en": "Sow grain"}));
    assert_eq!(farmer["stats"], json!({"nb": {"pwr": 0.75, "adp": null, "apr": null, "drawPlayRate": null}}));
}

// ================================================================================================
// Filtering
// ================================================================================================

#[test]
fn test_records_without_signal_are_raw_only() {
    let fixture = Fixture::minimal();
    let stats = Pipeline::new(fixture.config()).run().unwrap();

    // A001 has an opinion, C003 has default-context statistics
    assert_eq!(fixture.keys_in(PUBLISHED), vec!["A001", "C003"]);
    assert_eq!(fixture.keys_in(MISSING), vec!["A001", "C003"]);
    assert_eq!(stats.outputs.raw, 6);
    assert_eq!(stats.outputs.published, 2);
    assert_eq!(stats.outputs.dropped, 4);
    assert_eq!(stats.outputs.kept_by_statistics, 1);
}

#[test]
fn test_published_csv_layout() {
    let fixture = Fixture::minimal();
    Pipeline::new(fixture.config()).run().unwrap();

    assert_eq!(
        fixture.read(PUBLISHED),
        "no,cnName,enName,baituTier,enTier,chenTier,effect,baituDesc,enDesc,chenDesc\r\n\
         A001,,Farmer,,A,,Sow grain,,Take it,\r\n\
         C003,,Potter,,,,,,,\r\n"
    );
}

#[test]
fn test_flat_json_carries_statistics() {
    let fixture = Fixture::minimal();
    Pipeline::new(fixture.config()).run().unwrap();

    let cards = fixture.read_json(FLAT_JSON);
    let potter = card(&cards, "C003");
    assert_eq!(
        potter["stats"]["default"],
        json!({"pwr": 1.5, "adp": 2.25, "apr": 0.5, "drawPlayRate": 0.5})
    );
    assert!(potter.get("effect").is_none());
    assert!(card(&cards, "A001").get("stats").is_some());
}

// ================================================================================================
// All sources
// ================================================================================================

#[test]
fn test_full_run_applies_every_source_in_order() {
    let fixture = Fixture::full();
    let stats = Pipeline::new(fixture.config()).run().unwrap();

    let reconcile = stats.reconcile.as_ref().unwrap();
    assert_eq!(reconcile.matched_by_name, 1);
    assert_eq!(reconcile.keys_assigned, 1);

    let cards = fixture.read_json(STRUCTURED);

    // The name overlay overrides the baitu name; the export overlay translates
    // mark and adds an untiered jpwiki score
    let farmer = card(&cards, "A001");
    assert_eq!(farmer["localeNames"], json!({"en": "Farmer", "zh": "农民"}));
    let authors: Vec<&str> = farmer["tiers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["author"].as_str().unwrap())
        .collect();
    assert_eq!(authors, vec!["baitu", "mark", "jpwiki"]);
    assert_eq!(farmer["tiers"][1]["localeDescs"]["zh"], json!("拿走"));
    assert_eq!(
        farmer["tiers"][2],
        json!({"author": "jpwiki", "tier": "", "score": 8.0, "desc": "好", "localeDescs": {"zh": "好"}})
    );

    // Spreadsheet gave the key-less baitu row its key; chen tiers linked by that name
    let baker = card(&cards, "B002");
    assert_eq!(baker["localeNames"]["zh"], json!("面包师"));
    assert_eq!(baker["tiers"][0]["tier"], json!("C"));
    assert_eq!(baker["tiers"][1], json!({"author": "chen", "tier": "D", "score": null, "desc": "弱", "localeDescs": {"zh": "弱"}}));

    // Chen tiers filled the name by key, chen overrides then replaced the opinion by that name
    let well = card(&cards, "D005");
    assert_eq!(well["localeNames"]["zh"], json!("水井"));
    assert_eq!(well["tiers"][0]["tier"], json!("B"));
    assert_eq!(well["tiers"][0]["desc"], json!("改"));

    assert_eq!(fixture.keys_in(PUBLISHED), vec!["A001", "B002", "C003", "D005"]);
    assert_eq!(fixture.keys_in(MISSING), vec!["C003"]);

    let chen_tiers = stats.pass("chen-tiers").unwrap();
    assert_eq!(chen_tiers.linked_by_key, 1);
    assert_eq!(chen_tiers.linked_by_name, 1);
}

// ================================================================================================
// Export overlay
// ================================================================================================

#[test]
fn test_export_score_alone_does_not_publish_record() {
    let fixture = Fixture::minimal();
    // B002 Baker has no opinion and no default-context statistics
    fixture.write(
        EXPORT,
        r#"[{"id": "B002", "jpwiki_score": "2"}, {"id": "C003", "jpwiki_score": 6}]"#,
    );

    let stats = Pipeline::new(fixture.config()).run().unwrap();

    assert_eq!(fixture.keys_in(PUBLISHED), vec!["A001", "C003"]);
    assert_eq!(fixture.keys_in(MISSING), vec!["A001", "C003"]);
    assert_eq!(stats.pass("export").unwrap().rows, 1);

    let cards = fixture.read_json(STRUCTURED);
    assert!(cards.as_array().unwrap().iter().all(|c| c["no"] != "B002"));
    assert_eq!(
        card(&cards, "C003")["tiers"],
        json!([{"author": "jpwiki", "tier": "", "score": 6.0, "desc": "", "localeDescs": {}}])
    );
}

#[test]
fn test_unreadable_export_overlay_is_skipped() {
    let fixture = Fixture::minimal();
    fixture.write(EXPORT, "[{\"id\": ");

    let stats = Pipeline::new(fixture.config()).run().unwrap();

    assert!(stats.pass("export").is_none());
    assert_eq!(fixture.keys_in(PUBLISHED), vec!["A001", "C003"]);
}

#[test]
fn test_rerun_is_byte_identical() {
    let fixture = Fixture::full();

    Pipeline::new(fixture.config()).run().unwrap();
    let first: Vec<Vec<u8>> = ALL_OUTPUTS.iter().map(|name| fixture.read_bytes(name)).collect();

    Pipeline::new(fixture.config()).run().unwrap();
    let second: Vec<Vec<u8>> = ALL_OUTPUTS.iter().map(|name| fixture.read_bytes(name)).collect();

    assert_eq!(first, second);
}

// ================================================================================================
// Missing sources
// ================================================================================================

#[test]
fn test_missing_optional_source_is_skipped() {
    let fixture = Fixture::minimal();
    fixture.remove("en.json");

    let stats = Pipeline::new(fixture.config()).run().unwrap();

    assert!(stats.pass("english-ratings").is_none());
    assert_eq!(fixture.keys_in(PUBLISHED), vec!["C003"]);
}

#[test]
fn test_missing_required_source_writes_nothing() {
    let fixture = Fixture::minimal();
    fixture.remove(STATS_ALTERNATE);

    let result = Pipeline::new(fixture.config()).run();

    match result {
        Err(Error::MissingInput { source_name, path }) => {
            assert_eq!(source_name, "stats-alternate");
            assert_eq!(path, fixture.path(STATS_ALTERNATE));
        }
        other => panic!("expected MissingInput, got {other:?}"),
    }
    for name in ALL_OUTPUTS {
        assert!(!fixture.path(name).exists(), "{name} should not exist");
    }
}

#[test]
fn test_broken_optional_source_is_fatal() {
    let fixture = Fixture::minimal();
    fixture.write("cards.json", "[{\"no\": ");

    let result = Pipeline::new(fixture.config()).run();

    assert!(matches!(result, Err(Error::InvalidInput { .. })));
    assert!(!fixture.path(PUBLISHED).exists());
}

// ================================================================================================
// Output folder and publication
// ================================================================================================

#[test]
fn test_outputs_go_to_output_folder_and_publish_targets() {
    let fixture = Fixture::minimal();
    let mut config = fixture.config();
    config.output_folder = fixture.path("out");
    config.publish_targets = vec![fixture.path("web/public/cards.json"), fixture.path("plugin/assets/cards.json")];

    let stats = Pipeline::new(config).run().unwrap();

    assert!(!fixture.path(PUBLISHED).exists());
    let structured = fixture.read_bytes(&format!("out/{STRUCTURED}"));
    assert_eq!(fixture.read_bytes("web/public/cards.json"), structured);
    assert_eq!(fixture.read_bytes("plugin/assets/cards.json"), structured);
    assert_eq!(stats.publish.copied, 2);
    assert_eq!(stats.publish.failed, 0);
}

#[test]
fn test_build_without_writing() {
    let fixture = Fixture::minimal();
    let catalog = Pipeline::new(fixture.config()).build().unwrap();

    assert_eq!(catalog.ledger.len(), 6);
    assert!(catalog.ledger.get("A001").unwrap().opinion(Rater::Mark).is_some());
    assert_eq!(catalog.stats.stats_tables.len(), 2);
    assert!(!fixture.path(RAW).exists());
}
