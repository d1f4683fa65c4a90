//! Core types for catalog fusion
//!
//! Identity (`CanonicalKey`), the accumulated `FusedRecord`, rater opinions,
//! statistics, and the partial records every source adapter emits.

use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Locale tag for English text
pub const LOCALE_EN: &str = "en";
/// Locale tag for Chinese text
pub const LOCALE_ZH: &str = "zh";

// ============================================================================
// Identity
// ============================================================================

/// Stable per-card identity: deck code plus zero-padded number (`A007`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// Accept an already-normalized key; blank input has no identity
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CanonicalKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Raters, tiers and scores
// ============================================================================

/// Who produced an opinion. Declaration order is projection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rater {
    /// Chinese tier list keyed by canonical key
    Baitu,
    /// English ratings linked by primary name
    Mark,
    /// Chinese tier list with late supplements
    Chen,
    /// External 10-point ratings from the export overlay
    Jpwiki,
}

impl Rater {
    pub const ALL: [Rater; 4] = [Rater::Baitu, Rater::Mark, Rater::Chen, Rater::Jpwiki];

    /// Author tag in the structured projection
    pub fn author(self) -> &'static str {
        match self {
            Rater::Baitu => "baitu",
            Rater::Mark => "mark",
            Rater::Chen => "chen",
            Rater::Jpwiki => "jpwiki",
        }
    }

    /// Language the rater writes rationales in
    pub fn native_locale(self) -> &'static str {
        match self {
            Rater::Mark => LOCALE_EN,
            Rater::Baitu | Rater::Chen | Rater::Jpwiki => LOCALE_ZH,
        }
    }
}

impl fmt::Display for Rater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.author())
    }
}

/// Letter tier, ordered worst (`F`) to best (`A`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    F,
    E,
    D,
    C,
    B,
    A,
}

impl Tier {
    pub fn parse(label: &str) -> Option<Tier> {
        match label.trim() {
            "A" => Some(Tier::A),
            "B" => Some(Tier::B),
            "C" => Some(Tier::C),
            "D" => Some(Tier::D),
            "E" => Some(Tier::E),
            "F" => Some(Tier::F),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
            Tier::E => "E",
            Tier::F => "F",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric score attached to an opinion
///
/// `Rank` is the five-point scale derived from a tier; `Rating` is a raw
/// external rating kept as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Score {
    Rank(u8),
    Rating(f64),
}

// ============================================================================
// Opinions
// ============================================================================

/// One rater's assessment of a card
#[derive(Debug, Clone, PartialEq)]
pub struct Opinion {
    pub rater: Rater,
    /// Tier label as the rater wrote it (trimmed); may be outside `A`–`F`
    pub tier: String,
    pub score: Option<Score>,
    pub rationale: String,
    /// Rationale per locale tag
    pub localized: BTreeMap<String, String>,
}

impl Opinion {
    /// Build an opinion, recording the rationale under the rater's own locale
    pub fn new(rater: Rater, tier: &str, rationale: &str) -> Self {
        let tier = tier.trim().to_string();
        let rationale = rationale.trim().to_string();

        let mut localized = BTreeMap::new();
        if !rationale.is_empty() {
            localized.insert(rater.native_locale().to_string(), rationale.clone());
        }

        Self {
            rater,
            tier,
            score: None,
            rationale,
            localized,
        }
    }

    pub fn with_score(mut self, score: Option<Score>) -> Self {
        self.score = score;
        self
    }

    pub fn with_localized(mut self, locale: &str, text: &str) -> Self {
        let text = text.trim();
        if !text.is_empty() {
            self.localized.insert(locale.to_string(), text.to_string());
        }
        self
    }

    /// Opinions without a tier, a rationale or a score are never stored
    pub fn has_signal(&self) -> bool {
        !self.tier.is_empty() || !self.rationale.is_empty() || self.score.is_some()
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Play context a statistics table was collected in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatsContext {
    /// Primary context; also decides catalog retention
    Default,
    /// Alternate draft format
    Alternate,
}

impl StatsContext {
    pub fn label(self) -> &'static str {
        match self {
            StatsContext::Default => "default",
            StatsContext::Alternate => "nb",
        }
    }
}

/// Numeric statistics for one card in one context; `None` means unknown
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatsEntry {
    pub pwr: Option<f64>,
    pub adp: Option<f64>,
    pub apr: Option<f64>,
    #[serde(rename = "drawPlayRate")]
    pub draw_play_rate: Option<f64>,
}

/// Statistics sub-record, one optional entry per context
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CardStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<StatsEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nb: Option<StatsEntry>,
}

impl CardStats {
    pub fn get(&self, context: StatsContext) -> Option<&StatsEntry> {
        match context {
            StatsContext::Default => self.default.as_ref(),
            StatsContext::Alternate => self.nb.as_ref(),
        }
    }

    pub fn set(&mut self, context: StatsContext, entry: StatsEntry) {
        match context {
            StatsContext::Default => self.default = Some(entry),
            StatsContext::Alternate => self.nb = Some(entry),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.nb.is_none()
    }
}

// ============================================================================
// Fused record
// ============================================================================

/// The unit of identity: everything known about one card
#[derive(Debug, Clone, PartialEq)]
pub struct FusedRecord {
    key: CanonicalKey,
    /// English display name from the catalog
    pub primary_name: String,
    /// Chinese display name, filled in by later passes
    pub secondary_name: Option<String>,
    /// Card text from the catalog
    pub ruling: String,
    opinions: BTreeMap<Rater, Opinion>,
    pub stats: Option<CardStats>,
    pinned: bool,
}

impl FusedRecord {
    pub fn new(key: CanonicalKey, primary_name: &str, ruling: &str) -> Self {
        Self {
            key,
            primary_name: primary_name.trim().to_string(),
            secondary_name: None,
            ruling: ruling.trim().to_string(),
            opinions: BTreeMap::new(),
            stats: None,
            pinned: false,
        }
    }

    /// The key is fixed at creation; merges only touch field values
    pub fn key(&self) -> &CanonicalKey {
        &self.key
    }

    pub fn secondary_name(&self) -> Option<&str> {
        self.secondary_name.as_deref()
    }

    pub fn opinion(&self, rater: Rater) -> Option<&Opinion> {
        self.opinions.get(&rater)
    }

    /// Opinions in rater order
    pub fn opinions(&self) -> impl Iterator<Item = &Opinion> {
        self.opinions.values()
    }

    pub fn has_opinion(&self) -> bool {
        !self.opinions.is_empty()
    }

    /// Touched by a source whose matches are always published
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub(crate) fn pin(&mut self) {
        self.pinned = true;
    }

    /// Replace the rater's opinion; one without signal clears the slot
    pub(crate) fn put_opinion(&mut self, opinion: Opinion) {
        if opinion.has_signal() {
            self.opinions.insert(opinion.rater, opinion);
        } else {
            self.opinions.remove(&opinion.rater);
        }
    }

    pub(crate) fn opinion_mut(&mut self, rater: Rater) -> Option<&mut Opinion> {
        self.opinions.get_mut(&rater)
    }
}

// ============================================================================
// Partial records (adapter output)
// ============================================================================

/// Identity fields a source row actually carries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkHint {
    pub key: Option<CanonicalKey>,
    pub name: Option<String>,
}

impl LinkHint {
    pub fn key(key: Option<CanonicalKey>) -> Self {
        Self { key, name: None }
    }

    pub fn name(name: &str) -> Self {
        Self {
            key: None,
            name: non_empty(name),
        }
    }

    pub fn both(key: Option<CanonicalKey>, name: &str) -> Self {
        Self {
            key,
            name: non_empty(name),
        }
    }
}

/// How a pass writes the secondary display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameUpdate {
    /// Last write wins
    Overwrite(String),
    /// Only when the record has no secondary name yet
    FillIfEmpty(String),
}

/// Locale variant added to an existing opinion's rationale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub rater: Rater,
    pub locale: String,
    pub text: String,
}

/// Field values a source row contributes; `None` means "not mentioned"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldUpdates {
    pub primary_name: Option<String>,
    pub ruling: Option<String>,
    pub secondary_name: Option<NameUpdate>,
    pub opinion: Option<Opinion>,
    pub translation: Option<Translation>,
}

/// One adapter row: where it links and what it changes
#[derive(Debug, Clone, PartialEq)]
pub struct PartialRecord {
    pub hint: LinkHint,
    pub updates: FieldUpdates,
}

impl PartialRecord {
    pub fn new(hint: LinkHint, updates: FieldUpdates) -> Self {
        Self { hint, updates }
    }
}

/// Trimmed copy of `value`, `None` when blank
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
