// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// Vote counts split by the way the ballot was cast.
///
/// Only some exports carry these columns.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct BallotTypeCounts {
    pub absentee_mail: u64,
    pub election_day: u64,
    pub provisional: u64,
}

impl BallotTypeCounts {
    pub fn total(&self) -> u64 {
        self.absentee_mail + self.election_day + self.provisional
    }
}

/// One line of a long-format results export: the votes of one candidate
/// in one precinct for one contest.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteRecord {
    pub contest: String,
    pub candidate: String,
    pub precinct: String,
    pub votes: u64,
    pub ballot_types: Option<BallotTypeCounts>,
}

impl VoteRecord {
    pub fn new(contest: &str, candidate: &str, precinct: &str, votes: u64) -> VoteRecord {
        VoteRecord {
            contest: contest.to_string(),
            candidate: candidate.to_string(),
            precinct: precinct.to_string(),
            votes,
            ballot_types: None,
        }
    }
}

/// A precinct after the pivot, before any metric is derived.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct WideRow {
    pub precinct: String,
    pub votes: Vec<u64>,
}

/// The pivoted table. `votes` of every row is aligned with `candidates`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct WideTable {
    pub contest: String,
    pub candidates: Vec<String>,
    pub rows: Vec<WideRow>,
}

// ******** Output data structures *********

/// The categorical bucket of a lead, in display order.
///
/// Buckets are mirrored around zero and half-open away from zero:
/// `(-inf,-50] (-50,-25] (-25,-10] (-10,0) [0,10) [10,25) [25,50) [50,inf)`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum LeadBin {
    SecondOver50,
    Second25To50,
    Second10To25,
    Second0To10,
    First0To10,
    First10To25,
    First25To50,
    FirstOver50,
}

impl LeadBin {
    pub const ALL: [LeadBin; 8] = [
        LeadBin::SecondOver50,
        LeadBin::Second25To50,
        LeadBin::Second10To25,
        LeadBin::Second0To10,
        LeadBin::First0To10,
        LeadBin::First10To25,
        LeadBin::First25To50,
        LeadBin::FirstOver50,
    ];

    /// Position of the bucket in `LeadBin::ALL`.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// One precinct of the wide table.
///
/// `votes` and `percentages` are aligned with `PrecinctTable::candidates`.
#[derive(PartialEq, Debug, Clone)]
pub struct PrecinctRow {
    pub precinct: String,
    pub votes: Vec<u64>,
    pub total: u64,
    pub percentages: Vec<f64>,
    pub lead: f64,
    /// None when the precinct recorded no votes at all.
    pub bin: Option<LeadBin>,
}

impl PrecinctRow {
    pub fn has_votes(&self) -> bool {
        self.total > 0
    }
}

/// The wide table: one row per precinct, one vote column per candidate.
#[derive(PartialEq, Debug, Clone)]
pub struct PrecinctTable {
    pub contest: String,
    pub candidates: Vec<String>,
    pub rows: Vec<PrecinctRow>,
}

impl PrecinctTable {
    pub fn candidate_index(&self, name: &str) -> Option<usize> {
        self.candidates.iter().position(|c| c == name)
    }

    pub fn row(&self, precinct: &str) -> Option<&PrecinctRow> {
        self.rows.iter().find(|r| r.precinct == precinct)
    }
}

/// The presentation fields of a row, as handed to the rendering layer.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PresentedRow {
    pub precinct: String,
    pub bin_label: String,
    pub color: String,
    pub lead_text: String,
    pub hover: String,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// County-wide result of one candidate.
#[derive(PartialEq, Debug, Clone)]
pub struct CandidateSummary {
    pub candidate: String,
    pub votes: u64,
    /// Share of all votes, rounded to 2 decimals.
    pub percentage: f64,
    pub votes_text: String,
    pub percentage_text: String,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct BallotBreakdown {
    pub candidate: String,
    pub counts: BallotTypeCounts,
}

/// Identifiers that did not find a partner on the other side of the join.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct JoinReport {
    /// Precincts with results but no region.
    pub unmatched_precincts: Vec<String>,
    /// Regions with no results.
    pub unmatched_regions: Vec<String>,
}

impl JoinReport {
    pub fn is_clean(&self) -> bool {
        self.unmatched_precincts.is_empty() && self.unmatched_regions.is_empty()
    }
}

/// Everything the rendering layer needs. Built once, never modified.
#[derive(PartialEq, Debug, Clone)]
pub struct DashboardDataset {
    pub table: PrecinctTable,
    pub presented: Vec<PresentedRow>,
    pub summary: Vec<CandidateSummary>,
    pub breakdown: Vec<BallotBreakdown>,
    pub legend: Vec<LegendEntry>,
    pub join: JoinReport,
}

/// Errors that prevent the transformation from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TransformErrors {
    /// No record carries the requested contest name.
    UnknownContest {
        contest: String,
        available: Vec<String>,
    },
    /// The same (precinct, candidate) pair appears more than once.
    DuplicateRecord { precinct: String, candidate: String },
    /// A tracked or displayed candidate has no column in the table.
    UnknownCandidate { name: String },
    /// Several raw identifiers end up with the same normalized identifier.
    PrecinctCollision {
        precinct: String,
        sources: Vec<String>,
    },
    /// Applying the normalization rules never settled on a fixed identifier.
    NormalizationDiverged { identifier: String },
    InvalidRules { reason: String },
}

impl Error for TransformErrors {}

impl Display for TransformErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformErrors::UnknownContest { contest, available } => write!(
                f,
                "no record for contest {:?} (available contests: {:?})",
                contest, available
            ),
            TransformErrors::DuplicateRecord {
                precinct,
                candidate,
            } => write!(
                f,
                "duplicate record for precinct {:?} and candidate {:?}",
                precinct, candidate
            ),
            TransformErrors::UnknownCandidate { name } => {
                write!(f, "candidate {:?} has no votes in this contest", name)
            }
            TransformErrors::PrecinctCollision { precinct, sources } => write!(
                f,
                "precincts {:?} all normalize to {:?}",
                sources, precinct
            ),
            TransformErrors::NormalizationDiverged { identifier } => write!(
                f,
                "normalization rules do not settle on identifier {:?}",
                identifier
            ),
            TransformErrors::InvalidRules { reason } => write!(f, "invalid rules: {}", reason),
        }
    }
}

// ********* Configuration **********

/// One of the two candidates whose margin is mapped.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TrackedCandidate {
    /// The candidate name, as found in the export.
    pub name: String,
    /// The short name used in labels (usually the last name).
    pub label: String,
    /// Color of the lead indicator when this candidate is ahead.
    pub color: String,
}

impl TrackedCandidate {
    pub fn new(name: &str, label: &str, color: &str) -> TrackedCandidate {
        TrackedCandidate {
            name: name.to_string(),
            label: label.to_string(),
            color: color.to_string(),
        }
    }
}

/// A literal find/replace applied to every precinct identifier.
///
/// Occurrences of `find` that sit inside an occurrence of one of the
/// `protected` terms are left alone.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct NormalizationRule {
    pub find: String,
    pub replace: String,
    pub protected: Vec<String>,
}

impl NormalizationRule {
    pub fn new(find: &str, replace: &str) -> NormalizationRule {
        NormalizationRule {
            find: find.to_string(),
            replace: replace.to_string(),
            protected: Vec::new(),
        }
    }

    pub fn protect(mut self, term: &str) -> NormalizationRule {
        self.protected.push(term.to_string());
        self
    }
}

/// The clean-up needed by the county exports before they join with the
/// precinct boundaries.
pub fn default_normalization_rules() -> Vec<NormalizationRule> {
    vec![
        NormalizationRule::new("# ", "#"),
        NormalizationRule::new("  ", " "),
        NormalizationRule::new("Boro", "Borough")
            .protect("Borough")
            .protect("Doylestown Boro"),
    ]
}

pub const DEFAULT_BIN_COLORS: [&str; 8] = [
    "#c93135", "#db7171", "#eaa9a9", "#fce0e0", "#ceeafd", "#92bde0", "#5295cc", "#1375b7",
];

/// Color used for precincts without any vote.
pub const NO_DATA_COLOR: &str = "#d3d3d3";

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TransformRules {
    pub contest: String,
    /// Positive leads favor this candidate.
    pub first: TrackedCandidate,
    pub second: TrackedCandidate,
    pub normalization: Vec<NormalizationRule>,
    /// One color per `LeadBin`, in `LeadBin::ALL` order.
    pub bin_colors: Vec<String>,
    /// The candidates listed in the hover text, in order.
    pub display_order: Vec<String>,
}

impl TransformRules {
    pub fn new(contest: &str, first: TrackedCandidate, second: TrackedCandidate) -> TransformRules {
        let display_order = vec![first.name.clone(), second.name.clone()];
        TransformRules {
            contest: contest.to_string(),
            first,
            second,
            normalization: default_normalization_rules(),
            bin_colors: DEFAULT_BIN_COLORS.iter().map(|s| s.to_string()).collect(),
            display_order,
        }
    }

    pub fn validate(&self) -> Result<(), TransformErrors> {
        let invalid = |reason: String| Err(TransformErrors::InvalidRules { reason });
        if self.first.name == self.second.name {
            return invalid(format!(
                "the two tracked candidates are both {:?}",
                self.first.name
            ));
        }
        if self.bin_colors.len() != LeadBin::ALL.len() {
            return invalid(format!(
                "expected {} bin colors, got {}",
                LeadBin::ALL.len(),
                self.bin_colors.len()
            ));
        }
        if let Some(rule) = self.normalization.iter().find(|r| r.find.is_empty()) {
            return invalid(format!(
                "normalization rule with an empty pattern (replacement {:?})",
                rule.replace
            ));
        }
        Ok(())
    }
}
