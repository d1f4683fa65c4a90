//! Spreadsheet reconciliation for baitu tier rows
//!
//! The translation spreadsheet (exported as CSV with `no`, `cnName`,
//! `enName` columns) is the authority for Chinese names. Before the baitu
//! tier list is folded, each of its rows is checked against the sheet:
//!
//! 1. a row whose key is in the sheet takes the sheet's Chinese name;
//! 2. otherwise a row whose name equals a sheet Chinese name, or failing
//!    that a sheet English name, takes that sheet row's key and Chinese name;
//! 3. anything else is left untouched.
//!
//! Chinese-name matches always take priority over English-name matches.

use super::baitu_tiers::BaituRow;
use super::read_csv_rows;
use cardfuse_common::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

pub const SOURCE: &str = "spreadsheet";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SheetRow {
    #[serde(default)]
    pub no: String,
    #[serde(rename = "cnName", default)]
    pub cn_name: String,
    #[serde(rename = "enName", default)]
    pub en_name: String,
}

pub fn load(path: &Path) -> Result<Vec<SheetRow>> {
    read_csv_rows(path)
}

/// Identity a sheet name resolves to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SheetIdentity {
    no: String,
    cn_name: String,
}

/// Lookup tables built from the sheet; later rows win on collisions
#[derive(Debug, Clone, Default)]
pub struct SheetIndex {
    by_key: HashMap<String, String>,
    by_cn_name: HashMap<String, SheetIdentity>,
    by_en_name: HashMap<String, SheetIdentity>,
}

/// Counters for one reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub matched_by_key: usize,
    pub matched_by_name: usize,
    pub unmatched: usize,
    pub keys_assigned: usize,
}

impl ReconcileOutcome {
    pub fn display_string(&self) -> String {
        format!(
            "{} by key, {} by name, {} unmatched, {} keys assigned",
            self.matched_by_key, self.matched_by_name, self.unmatched, self.keys_assigned
        )
    }
}

impl SheetIndex {
    pub fn new(rows: &[SheetRow]) -> Self {
        let mut index = Self::default();

        for row in rows {
            let no = row.no.trim();
            let cn_name = row.cn_name.trim();
            let en_name = row.en_name.trim();

            if !no.is_empty() && !cn_name.is_empty() {
                index.by_key.insert(no.to_string(), cn_name.to_string());
            }

            let identity = SheetIdentity {
                no: no.to_string(),
                cn_name: cn_name.to_string(),
            };
            if !cn_name.is_empty() {
                index.by_cn_name.insert(cn_name.to_string(), identity.clone());
            }
            if !en_name.is_empty() {
                index.by_en_name.insert(en_name.to_string(), identity);
            }
        }

        index
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty() && self.by_cn_name.is_empty() && self.by_en_name.is_empty()
    }

    /// Rewrite keys and names of baitu tier rows in place
    pub fn reconcile(&self, rows: &mut [BaituRow]) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();

        for row in rows.iter_mut() {
            let no = row.no.trim();
            if !no.is_empty() {
                if let Some(cn_name) = self.by_key.get(no) {
                    row.name = cn_name.clone();
                    outcome.matched_by_key += 1;
                    continue;
                }
            }

            let name = row.name.trim();
            let identity = if name.is_empty() {
                None
            } else {
                self.by_cn_name.get(name).or_else(|| self.by_en_name.get(name))
            };

            match identity {
                Some(identity) => {
                    if !identity.no.is_empty() {
                        debug!(name = %row.name, no = %identity.no, "Key assigned from spreadsheet");
                        row.no = identity.no.clone();
                        outcome.keys_assigned += 1;
                    }
                    if !identity.cn_name.is_empty() {
                        row.name = identity.cn_name.clone();
                    }
                    outcome.matched_by_name += 1;
                }
                None => outcome.unmatched += 1,
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_row(no: &str, cn: &str, en: &str) -> SheetRow {
        SheetRow {
            no: no.to_string(),
            cn_name: cn.to_string(),
            en_name: en.to_string(),
        }
    }

    fn baitu_row(no: &str, name: &str) -> BaituRow {
        BaituRow {
            no: no.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn sheet() -> SheetIndex {
        SheetIndex::new(&[
            sheet_row("A001", "农夫", "Farmer"),
            sheet_row("A002", "面包师", "Baker"),
            sheet_row("", "无编号", "Nameless"),
        ])
    }

    #[test]
    fn test_key_match_takes_sheet_name() {
        let mut rows = vec![baitu_row("A001", "旧名")];
        let outcome = sheet().reconcile(&mut rows);

        assert_eq!(rows[0].name, "农夫");
        assert_eq!(outcome.matched_by_key, 1);
    }

    #[test]
    fn test_name_match_assigns_key() {
        let mut rows = vec![baitu_row("", "面包师")];
        let outcome = sheet().reconcile(&mut rows);

        assert_eq!(rows[0].no, "A002");
        assert_eq!(outcome.matched_by_name, 1);
        assert_eq!(outcome.keys_assigned, 1);
    }

    #[test]
    fn test_english_name_is_fallback() {
        let mut rows = vec![baitu_row("", "Farmer")];
        sheet().reconcile(&mut rows);

        assert_eq!(rows[0].no, "A001");
        assert_eq!(rows[0].name, "农夫");
    }

    #[test]
    fn test_chinese_name_beats_english_name() {
        // "Baker" is both a Chinese-name entry (row 2) and an English name (row 1)
        let index = SheetIndex::new(&[sheet_row("A001", "农夫", "Baker"), sheet_row("B002", "Baker", "Other")]);
        let mut rows = vec![baitu_row("", "Baker")];
        index.reconcile(&mut rows);

        assert_eq!(rows[0].no, "B002");
    }

    #[test]
    fn test_unknown_key_falls_through_to_name() {
        let mut rows = vec![baitu_row("Z999", "农夫")];
        let outcome = sheet().reconcile(&mut rows);

        assert_eq!(rows[0].no, "A001");
        assert_eq!(outcome.matched_by_name, 1);
    }

    #[test]
    fn test_sheet_row_without_key_keeps_row_key() {
        let mut rows = vec![baitu_row("", "无编号")];
        let outcome = sheet().reconcile(&mut rows);

        assert_eq!(rows[0].no, "");
        assert_eq!(outcome.keys_assigned, 0);
        assert_eq!(outcome.matched_by_name, 1);
    }

    #[test]
    fn test_unmatched_rows_are_untouched() {
        let mut rows = vec![baitu_row("", "陌生"), baitu_row("", "")];
        let outcome = sheet().reconcile(&mut rows);

        assert_eq!(outcome.unmatched, 2);
        assert_eq!(rows[0].name, "陌生");
    }
}
