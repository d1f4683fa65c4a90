//! Fusion Ledger
//!
//! Owns the canonical-key → [`FusedRecord`] mapping and the two
//! name-to-identity indexes, and folds adapter passes into them.
//!
//! # Merge policy
//! - A pass's explicit field value replaces the earlier value for the same
//!   field on the same identity; fields a pass does not mention are left alone.
//! - The first record to claim a key owns it; later `Create` rows for the
//!   same key are dropped.
//! - Within one pass, duplicate source rows resolve last-wins per link value.
//!
//! # Name indexes
//! Both indexes are maintained incrementally on every name write, so a pass
//! that links by name always sees the names set by strictly earlier passes.
//! A display name may map to several identities; a name-linked row updates
//! all of them.

use crate::types::{CanonicalKey, FieldUpdates, FusedRecord, NameUpdate, PartialRecord, StatsContext, StatsEntry};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

// ============================================================================
// Passes
// ============================================================================

/// How a pass resolves its rows to identities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStrategy {
    /// Rows introduce identities; a key already present is a duplicate
    Create,
    /// Rows link by canonical key only
    ByKey,
    /// Rows link by matching their name against primary display names
    ByPrimaryName,
    /// Rows link by matching their name against secondary display names
    BySecondaryName,
    /// Link by key first; remaining rows link by secondary name, restricted
    /// to identities not claimed by the key pass
    KeyThenSecondaryName,
}

/// How an identity was reached by a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Unlinked,
    LinkedByKey,
    LinkedByName,
}

/// One source adapter's contribution, ready to fold
#[derive(Debug, Clone)]
pub struct FusionPass {
    pub source: &'static str,
    pub strategy: LinkStrategy,
    /// Identities this pass touches are published regardless of other signal
    pub always_keep: bool,
    pub rows: Vec<PartialRecord>,
}

impl FusionPass {
    pub fn new(source: &'static str, strategy: LinkStrategy, rows: Vec<PartialRecord>) -> Self {
        Self {
            source,
            strategy,
            always_keep: false,
            rows,
        }
    }

    pub fn always_keep(mut self) -> Self {
        self.always_keep = true;
        self
    }
}

/// What folding one pass did
#[derive(Debug, Clone, Default)]
pub struct PassOutcome {
    pub source: String,
    /// Rows offered by the adapter
    pub rows: usize,
    /// Rows missing the field this pass links on
    pub rejected: usize,
    /// New identities created (`Create` passes)
    pub created: usize,
    /// Rows dropped because their key was already claimed (`Create` passes)
    pub duplicates: usize,
    /// Distinct source entries resolved by key
    pub linked_by_key: usize,
    /// Distinct source entries resolved by name
    pub linked_by_name: usize,
    /// Distinct source entries that matched nothing
    pub unlinked: usize,
    /// Identities touched by this pass and how they were reached
    pub claims: BTreeMap<CanonicalKey, LinkState>,
}

impl PassOutcome {
    fn new(pass: &FusionPass) -> Self {
        Self {
            source: pass.source.to_string(),
            rows: pass.rows.len(),
            ..Default::default()
        }
    }

    pub fn matched(&self) -> usize {
        self.linked_by_key + self.linked_by_name
    }

    pub fn display_string(&self) -> String {
        format!(
            "{}: {} rows, {} by key, {} by name, {} unmatched",
            self.source, self.rows, self.linked_by_key, self.linked_by_name, self.unlinked
        )
    }
}

// ============================================================================
// Name index
// ============================================================================

/// Display name → identities carrying that name, in order of assignment
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    entries: HashMap<String, Vec<CanonicalKey>>,
}

impl NameIndex {
    pub fn lookup(&self, name: &str) -> &[CanonicalKey] {
        self.entries.get(name.trim()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, name: &str, key: &CanonicalKey) {
        if name.is_empty() {
            return;
        }
        let keys = self.entries.entry(name.to_string()).or_default();
        if !keys.contains(key) {
            keys.push(key.clone());
        }
    }

    fn remove(&mut self, name: &str, key: &CanonicalKey) {
        if let Some(keys) = self.entries.get_mut(name) {
            keys.retain(|k| k != key);
            if keys.is_empty() {
                self.entries.remove(name);
            }
        }
    }
}

// ============================================================================
// Ledger
// ============================================================================

/// In-memory catalog under construction
#[derive(Debug, Clone, Default)]
pub struct FusionLedger {
    records: Vec<FusedRecord>,
    positions: HashMap<CanonicalKey, usize>,
    primary_names: NameIndex,
    secondary_names: NameIndex,
}

impl FusionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&FusedRecord> {
        self.positions.get(key).map(|&i| &self.records[i])
    }

    /// Records in creation order
    pub fn records(&self) -> &[FusedRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<FusedRecord> {
        self.records
    }

    pub fn primary_names(&self) -> &NameIndex {
        &self.primary_names
    }

    pub fn secondary_names(&self) -> &NameIndex {
        &self.secondary_names
    }

    /// Fold a pass by value: `(ledger, pass) -> ledger'`
    pub fn folded(mut self, pass: &FusionPass) -> (Self, PassOutcome) {
        let outcome = self.fold(pass);
        (self, outcome)
    }

    /// Fold a pass in place
    pub fn fold(&mut self, pass: &FusionPass) -> PassOutcome {
        let outcome = match pass.strategy {
            LinkStrategy::Create => self.fold_create(pass),
            LinkStrategy::ByKey => self.fold_by_key(pass),
            LinkStrategy::ByPrimaryName => self.fold_by_name(pass, NameField::Primary),
            LinkStrategy::BySecondaryName => self.fold_by_name(pass, NameField::Secondary),
            LinkStrategy::KeyThenSecondaryName => self.fold_key_then_name(pass),
        };

        debug!(
            source = pass.source,
            rows = outcome.rows,
            created = outcome.created,
            duplicates = outcome.duplicates,
            by_key = outcome.linked_by_key,
            by_name = outcome.linked_by_name,
            unlinked = outcome.unlinked,
            "Pass folded"
        );
        outcome
    }

    /// Attach a statistics entry to every record whose primary name resolves
    ///
    /// Returns the number of records that received an entry.
    pub fn attach_stats<F>(&mut self, context: StatsContext, lookup: F) -> usize
    where
        F: Fn(&str) -> Option<StatsEntry>,
    {
        let mut attached = 0;
        for record in &mut self.records {
            if record.primary_name.is_empty() {
                continue;
            }
            if let Some(entry) = lookup(&record.primary_name) {
                record.stats.get_or_insert_with(Default::default).set(context, entry);
                attached += 1;
            }
        }
        attached
    }

    // ------------------------------------------------------------------------
    // Strategies
    // ------------------------------------------------------------------------

    fn fold_create(&mut self, pass: &FusionPass) -> PassOutcome {
        let mut outcome = PassOutcome::new(pass);

        for row in &pass.rows {
            let Some(key) = &row.hint.key else {
                outcome.rejected += 1;
                continue;
            };

            if self.positions.contains_key(key) {
                debug!(source = pass.source, key = %key, "Duplicate key dropped");
                outcome.duplicates += 1;
                continue;
            }

            let primary = row.updates.primary_name.as_deref().unwrap_or_default();
            let ruling = row.updates.ruling.as_deref().unwrap_or_default();
            let record = FusedRecord::new(key.clone(), primary, ruling);

            let index = self.records.len();
            self.primary_names.insert(&record.primary_name, key);
            self.positions.insert(key.clone(), index);
            self.records.push(record);

            self.apply(index, &row.updates, pass.always_keep);
            outcome.created += 1;
            outcome.claims.insert(key.clone(), LinkState::LinkedByKey);
        }

        outcome
    }

    fn fold_by_key(&mut self, pass: &FusionPass) -> PassOutcome {
        let mut outcome = PassOutcome::new(pass);
        let table = last_wins(&pass.rows, |row| row.hint.key.as_ref().map(|k| k.as_str().to_string()));
        outcome.rejected = pass.rows.iter().filter(|r| r.hint.key.is_none()).count();

        for (link, row) in table {
            match self.positions.get(link.as_str()).copied() {
                Some(index) => {
                    self.apply(index, &row.updates, pass.always_keep);
                    outcome.linked_by_key += 1;
                    outcome.claims.insert(self.records[index].key().clone(), LinkState::LinkedByKey);
                }
                None => outcome.unlinked += 1,
            }
        }

        outcome
    }

    fn fold_by_name(&mut self, pass: &FusionPass, field: NameField) -> PassOutcome {
        let mut outcome = PassOutcome::new(pass);
        let table = last_wins(&pass.rows, |row| row.hint.name.clone());
        outcome.rejected = pass.rows.iter().filter(|r| r.hint.name.is_none()).count();

        for (name, row) in table {
            let keys = self.index(field).lookup(&name).to_vec();
            if keys.is_empty() {
                outcome.unlinked += 1;
                continue;
            }

            for key in keys {
                if let Some(index) = self.positions.get(&key).copied() {
                    self.apply(index, &row.updates, pass.always_keep);
                    outcome.claims.insert(key, LinkState::LinkedByName);
                }
            }
            outcome.linked_by_name += 1;
        }

        outcome
    }

    fn fold_key_then_name(&mut self, pass: &FusionPass) -> PassOutcome {
        let mut outcome = PassOutcome::new(pass);
        outcome.rejected = pass
            .rows
            .iter()
            .filter(|r| r.hint.key.is_none() && r.hint.name.is_none())
            .count();

        // Pass 1: claim by key
        let by_key = last_wins(&pass.rows, |row| row.hint.key.as_ref().map(|k| k.as_str().to_string()));
        for (link, row) in by_key {
            match self.positions.get(link.as_str()).copied() {
                Some(index) => {
                    self.apply(index, &row.updates, pass.always_keep);
                    outcome.linked_by_key += 1;
                    outcome.claims.insert(self.records[index].key().clone(), LinkState::LinkedByKey);
                }
                None if row.hint.name.is_none() => outcome.unlinked += 1,
                None => {}
            }
        }

        // Pass 2: remaining rows by secondary name, never onto a claimed identity
        let claimed_by_key = outcome.claims.clone();
        let by_name = last_wins(&pass.rows, |row| {
            let unresolved = row
                .hint
                .key
                .as_ref()
                .map_or(true, |k| !claimed_by_key.contains_key(k));
            if unresolved {
                row.hint.name.clone()
            } else {
                None
            }
        });

        for (name, row) in by_name {
            let keys: Vec<CanonicalKey> = self
                .secondary_names
                .lookup(&name)
                .iter()
                .filter(|k| !outcome.claims.contains_key(*k))
                .cloned()
                .collect();

            if keys.is_empty() {
                outcome.unlinked += 1;
                continue;
            }

            for key in keys {
                if let Some(index) = self.positions.get(&key).copied() {
                    self.apply(index, &row.updates, pass.always_keep);
                    outcome.claims.insert(key, LinkState::LinkedByName);
                }
            }
            outcome.linked_by_name += 1;
        }

        outcome
    }

    // ------------------------------------------------------------------------
    // Field writes
    // ------------------------------------------------------------------------

    fn index(&self, field: NameField) -> &NameIndex {
        match field {
            NameField::Primary => &self.primary_names,
            NameField::Secondary => &self.secondary_names,
        }
    }

    fn apply(&mut self, index: usize, updates: &FieldUpdates, pin: bool) {
        let key = self.records[index].key().clone();

        if let Some(name) = &updates.primary_name {
            let old = std::mem::replace(&mut self.records[index].primary_name, name.clone());
            if old != *name {
                self.primary_names.remove(&old, &key);
                self.primary_names.insert(name, &key);
            }
        }

        if let Some(update) = &updates.secondary_name {
            let current = self.records[index].secondary_name.clone();
            let next = match update {
                NameUpdate::Overwrite(name) => Some(name),
                NameUpdate::FillIfEmpty(name) if current.is_none() => Some(name),
                NameUpdate::FillIfEmpty(_) => None,
            };
            if let Some(name) = next {
                if current.as_deref() != Some(name.as_str()) {
                    if let Some(old) = &current {
                        self.secondary_names.remove(old, &key);
                    }
                    self.secondary_names.insert(name, &key);
                    self.records[index].secondary_name = Some(name.clone());
                }
            }
        }

        let record = &mut self.records[index];

        if let Some(ruling) = &updates.ruling {
            record.ruling = ruling.clone();
        }

        if let Some(opinion) = &updates.opinion {
            record.put_opinion(opinion.clone());
        }

        // A translation renders an existing rationale; without one there is nothing to translate
        if let Some(translation) = &updates.translation {
            if let Some(opinion) = record
                .opinion_mut(translation.rater)
                .filter(|opinion| !opinion.rationale.is_empty())
            {
                opinion
                    .localized
                    .insert(translation.locale.clone(), translation.text.clone());
            }
        }

        if pin {
            record.pin();
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum NameField {
    Primary,
    Secondary,
}

/// Deduplicate rows by link value: first-seen order, last-seen row
fn last_wins<'a, F>(rows: &'a [PartialRecord], mut link: F) -> Vec<(String, &'a PartialRecord)>
where
    F: FnMut(&'a PartialRecord) -> Option<String>,
{
    let mut table: Vec<(String, &PartialRecord)> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let Some(value) = link(row) else { continue };
        match seen.get(&value) {
            Some(&slot) => table[slot].1 = row,
            None => {
                seen.insert(value.clone(), table.len());
                table.push((value, row));
            }
        }
    }

    table
}

// ============================================================================
// Tests
// ============================================================================
