pub mod builder;
mod config;
pub mod manual;
mod metrics;
mod normalize;
mod presentation;

use log::{debug, info, warn};

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

pub use crate::config::*;
pub use crate::metrics::*;
pub use crate::normalize::*;
pub use crate::presentation::*;

/// Keeps the records of one contest, in their original order.
///
/// Asking for a contest that no record mentions is a configuration error,
/// reported with the list of contests that do exist.
pub fn filter_contest<'a>(
    records: &'a [VoteRecord],
    contest: &str,
) -> Result<Vec<&'a VoteRecord>, TransformErrors> {
    let res: Vec<&VoteRecord> = records.iter().filter(|r| r.contest == contest).collect();
    if res.is_empty() {
        let available: BTreeSet<String> = records.iter().map(|r| r.contest.clone()).collect();
        return Err(TransformErrors::UnknownContest {
            contest: contest.to_string(),
            available: available.into_iter().collect(),
        });
    }
    debug!("filter_contest: {} of {} records", res.len(), records.len());
    Ok(res)
}

/// Turns the long table (one record per precinct and candidate) into the wide
/// table (one row per precinct, one column per candidate).
///
/// Rows are sorted by precinct, columns follow the first appearance of each
/// candidate. A candidate without a record in a precinct got 0 votes there.
pub fn pivot(contest: &str, records: &[&VoteRecord]) -> Result<WideTable, TransformErrors> {
    let mut candidates: Vec<String> = Vec::new();
    let mut candidate_ids: HashMap<&str, usize> = HashMap::new();
    for r in records.iter() {
        if !candidate_ids.contains_key(r.candidate.as_str()) {
            candidate_ids.insert(r.candidate.as_str(), candidates.len());
            candidates.push(r.candidate.clone());
        }
    }

    let mut cells: BTreeMap<&str, Vec<Option<u64>>> = BTreeMap::new();
    for r in records.iter() {
        let cid = candidate_ids[r.candidate.as_str()];
        let row = cells
            .entry(r.precinct.as_str())
            .or_insert_with(|| vec![None; candidates.len()]);
        if row[cid].is_some() {
            return Err(TransformErrors::DuplicateRecord {
                precinct: r.precinct.clone(),
                candidate: r.candidate.clone(),
            });
        }
        row[cid] = Some(r.votes);
    }

    let rows: Vec<WideRow> = cells
        .into_iter()
        .map(|(precinct, votes)| {
            let missing = votes.iter().filter(|v| v.is_none()).count();
            if missing > 0 {
                debug!(
                    "pivot: precinct {:?}: {} candidate(s) without record, counted as 0",
                    precinct, missing
                );
            }
            WideRow {
                precinct: precinct.to_string(),
                votes: votes.into_iter().map(|v| v.unwrap_or(0)).collect(),
            }
        })
        .collect();

    info!(
        "pivot: {} precincts, candidates: {:?}",
        rows.len(),
        candidates
    );
    Ok(WideTable {
        contest: contest.to_string(),
        candidates,
        rows,
    })
}

/// Sums the ballot-type columns per candidate, for the records of the contest
/// that carry them. Candidates come in order of first appearance.
pub fn ballot_breakdown(records: &[VoteRecord], contest: &str) -> Vec<BallotBreakdown> {
    let mut res: Vec<BallotBreakdown> = Vec::new();
    for r in records.iter().filter(|r| r.contest == contest) {
        let Some(counts) = r.ballot_types else {
            continue;
        };
        match res.iter_mut().find(|b| b.candidate == r.candidate) {
            Some(b) => {
                b.counts.absentee_mail += counts.absentee_mail;
                b.counts.election_day += counts.election_day;
                b.counts.provisional += counts.provisional;
            }
            None => res.push(BallotBreakdown {
                candidate: r.candidate.clone(),
                counts,
            }),
        }
    }
    res
}

/// Checks the precinct identifiers against the identifiers of the regions.
///
/// Both lists of leftovers are sorted.
pub fn match_geometry(table: &PrecinctTable, region_ids: &[String]) -> JoinReport {
    let regions: HashSet<&str> = region_ids.iter().map(|s| s.as_str()).collect();
    let precincts: HashSet<&str> = table.rows.iter().map(|r| r.precinct.as_str()).collect();

    let mut unmatched_precincts: Vec<String> = precincts
        .difference(&regions)
        .map(|s| s.to_string())
        .collect();
    let mut unmatched_regions: Vec<String> = regions
        .difference(&precincts)
        .map(|s| s.to_string())
        .collect();
    unmatched_precincts.sort();
    unmatched_regions.sort();

    for p in unmatched_precincts.iter() {
        warn!("match_geometry: precinct {:?} has no region", p);
    }
    for p in unmatched_regions.iter() {
        warn!("match_geometry: region {:?} has no results", p);
    }
    JoinReport {
        unmatched_precincts,
        unmatched_regions,
    }
}

/// Runs filter, pivot, normalization and metrics for the contest of the rules.
pub fn run_transform(
    records: &[VoteRecord],
    rules: &TransformRules,
) -> Result<PrecinctTable, TransformErrors> {
    info!(
        "run_transform: {} records, contest: {:?}",
        records.len(),
        rules.contest
    );
    rules.validate()?;
    let contest_records = filter_contest(records, &rules.contest)?;
    let wide = pivot(&rules.contest, &contest_records)?;
    let normalized = normalize_table(wide, &rules.normalization)?;
    derive_metrics(normalized, rules)
}

/// The whole pipeline: the precinct table and everything derived from it.
///
/// `summary_records` is a county-wide export used for the ballot-type
/// breakdown. Without it, the breakdown is summed from the precinct records.
pub fn build_dataset(
    records: &[VoteRecord],
    summary_records: Option<&[VoteRecord]>,
    region_ids: &[String],
    rules: &TransformRules,
    format: &dyn HoverFormat,
) -> Result<DashboardDataset, TransformErrors> {
    let table = run_transform(records, rules)?;
    let presented = present(&table, rules, format)?;
    let summary = summarize(&table, rules);
    let breakdown = ballot_breakdown(summary_records.unwrap_or(records), &rules.contest);
    let join = match_geometry(&table, region_ids);
    if !join.is_clean() {
        warn!(
            "build_dataset: {} precinct(s) without region, {} region(s) without results",
            join.unmatched_precincts.len(),
            join.unmatched_regions.len()
        );
    }
    Ok(DashboardDataset {
        legend: legend(rules),
        table,
        presented,
        summary,
        breakdown,
        join,
    })
}
