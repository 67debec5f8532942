// Shared by the CSV and Excel readers: both hand over lines of text cells.

use crate::dash::*;

/// The header names of the columns of a results export.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnNames {
    pub contest: String,
    pub candidate: String,
    pub precinct: String,
    pub votes: String,
    pub absentee: String,
    pub election_day: String,
    pub provisional: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            contest: "Contest Name".to_string(),
            candidate: "Candidate Name".to_string(),
            precinct: "nameplace".to_string(),
            votes: "Votes".to_string(),
            absentee: "Absentee and Mail-In Ballots Votes".to_string(),
            election_day: "Election Day Votes".to_string(),
            provisional: "Provisional Votes".to_string(),
        }
    }
}

/// Whether the export has one line per precinct, or one line per candidate
/// for the whole county.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ExportKind {
    Precinct,
    Summary,
}

#[derive(Eq, PartialEq, Debug, Clone)]
struct ColumnMap {
    contest: usize,
    candidate: usize,
    precinct: Option<usize>,
    votes: usize,
    // absentee, election day, provisional
    ballot_types: Option<[usize; 3]>,
}

fn map_columns(
    path: &str,
    header: &[String],
    names: &ColumnNames,
    kind: ExportKind,
) -> DashResult<ColumnMap> {
    let find = |name: &String| header.iter().position(|h| h.trim() == name.as_str());
    let mut missing: Vec<String> = Vec::new();
    let mut required = |name: &String| {
        let idx = find(name);
        if idx.is_none() {
            missing.push(name.clone());
        }
        idx.unwrap_or(0)
    };
    let contest = required(&names.contest);
    let candidate = required(&names.candidate);
    let votes = required(&names.votes);
    let precinct = match kind {
        ExportKind::Precinct => Some(required(&names.precinct)),
        ExportKind::Summary => None,
    };
    ensure!(
        missing.is_empty(),
        SchemaMismatchSnafu {
            path,
            missing: missing.clone()
        }
    );

    let ballot_types = match (
        find(&names.absentee),
        find(&names.election_day),
        find(&names.provisional),
    ) {
        (Some(a), Some(e), Some(p)) => Some([a, e, p]),
        (None, None, None) => None,
        x => {
            warn!(
                "{}: only some of the ballot type columns are present ({:?}), ignoring them",
                path, x
            );
            None
        }
    };

    Ok(ColumnMap {
        contest,
        candidate,
        precinct,
        votes,
        ballot_types,
    })
}

/// Parses a vote count. Thousands separators are accepted.
pub fn parse_count(path: &str, lineno: usize, value: &str) -> DashResult<u64> {
    value
        .trim()
        .replace(',', "")
        .parse::<u64>()
        .ok()
        .context(InvalidVoteCountSnafu {
            path,
            lineno,
            value,
        })
}

// Both the exports and the boundaries drop the spaces around identifiers.
fn cell<'a>(path: &str, lineno: usize, fields: &'a [String], idx: usize) -> DashResult<&'a str> {
    fields
        .get(idx)
        .map(|s| s.trim())
        .context(LineTooShortSnafu { path, lineno })
}

fn build_record(
    path: &str,
    lineno: usize,
    fields: &[String],
    map: &ColumnMap,
) -> DashResult<VoteRecord> {
    let precinct = match map.precinct {
        Some(idx) => cell(path, lineno, fields, idx)?.to_string(),
        None => String::new(),
    };
    let ballot_types = match map.ballot_types {
        Some([a, e, p]) => Some(BallotTypeCounts {
            absentee_mail: parse_count(path, lineno, cell(path, lineno, fields, a)?)?,
            election_day: parse_count(path, lineno, cell(path, lineno, fields, e)?)?,
            provisional: parse_count(path, lineno, cell(path, lineno, fields, p)?)?,
        }),
        None => None,
    };
    Ok(VoteRecord {
        contest: cell(path, lineno, fields, map.contest)?.to_string(),
        candidate: cell(path, lineno, fields, map.candidate)?.to_string(),
        precinct,
        votes: parse_count(path, lineno, cell(path, lineno, fields, map.votes)?)?,
        ballot_types,
    })
}

/// Turns the lines that follow the skipped rows into records. The first line is
/// the header. Lines are given with their line number in the file.
///
/// Blank lines are ignored.
pub fn records_from_rows(
    path: &str,
    rows: impl IntoIterator<Item = (usize, Vec<String>)>,
    names: &ColumnNames,
    kind: ExportKind,
) -> DashResult<Vec<VoteRecord>> {
    let mut rows = rows
        .into_iter()
        .filter(|(_, fields)| fields.iter().any(|f| !f.trim().is_empty()));
    let (header_lineno, header) = rows.next().context(MissingHeaderSnafu { path })?;
    debug!("{}: header at line {}: {:?}", path, header_lineno, header);
    let map = map_columns(path, &header, names, kind)?;

    let mut res: Vec<VoteRecord> = Vec::new();
    for (lineno, fields) in rows {
        let record = build_record(path, lineno, &fields, &map)?;
        debug!("{}: line {}: {:?}", path, lineno, record);
        res.push(record);
    }
    info!("{}: {} records", path, res.len());
    Ok(res)
}
