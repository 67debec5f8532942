//! The text shown next to the map: hover boxes, lead labels and the summary table.
//!
//! All numbers shown to the user are rounded half away from zero (`f64::round`).

use crate::config::*;

/// Spaces between the longest candidate name and its vote count.
const COLUMN_GAP: usize = 4;

/// Who is ahead in a precinct, as displayed.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum LeadIndicator {
    /// The first candidate leads by this many (rounded) points.
    First(u64),
    Second(u64),
    Tied,
    NoVotes,
}

impl LeadIndicator {
    pub fn of(row: &PrecinctRow) -> LeadIndicator {
        if !row.has_votes() {
            LeadIndicator::NoVotes
        } else if row.lead > 0.0 {
            LeadIndicator::First(row.lead.round() as u64)
        } else if row.lead < 0.0 {
            LeadIndicator::Second((-row.lead).round() as u64)
        } else {
            LeadIndicator::Tied
        }
    }
}

/// One candidate line of a hover box.
#[derive(PartialEq, Debug, Clone)]
pub struct CandidateLine<'a> {
    pub name: &'a str,
    pub votes: u64,
    pub percentage: f64,
    /// Spaces between the name and the vote count, so that counts line up.
    pub padding: usize,
}

impl CandidateLine<'_> {
    pub fn rounded_percentage(&self) -> u64 {
        self.percentage.round() as u64
    }
}

/// A way of rendering the hover text of a precinct.
pub trait HoverFormat {
    fn lead_text(&self, indicator: LeadIndicator, rules: &TransformRules) -> String;

    fn hover_text(&self, precinct: &str, lines: &[CandidateLine], lead_text: &str) -> String;
}

/// The markup understood by the map hover boxes.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct HtmlHover;

impl HoverFormat for HtmlHover {
    fn lead_text(&self, indicator: LeadIndicator, rules: &TransformRules) -> String {
        let (color, text) = match indicator {
            LeadIndicator::First(n) => (
                rules.first.color.as_str(),
                format!("{} +{}", rules.first.label, n),
            ),
            LeadIndicator::Second(n) => (
                rules.second.color.as_str(),
                format!("{} +{}", rules.second.label, n),
            ),
            LeadIndicator::Tied => ("black", "Tied".to_string()),
            LeadIndicator::NoVotes => ("gray", "No votes".to_string()),
        };
        // The second closing span ends the one opened by hover_text.
        format!(
            "<br /><span style=\"color:{};\"><b>{}</b></span></span><extra></extra>",
            color, text
        )
    }

    fn hover_text(&self, precinct: &str, lines: &[CandidateLine], lead_text: &str) -> String {
        let mut text = format!(
            "<br /><span style=\"font-family: Overpass, monospace; color:black;\"><b>{}</b><br /><br />",
            precinct
        );
        for line in lines {
            text.push_str(&format!(
                "{}{}{} <b>{}%</b><br />",
                line.name,
                " ".repeat(line.padding),
                line.votes,
                line.rounded_percentage()
            ));
        }
        text.push_str(lead_text);
        text
    }
}

/// Plain multi-line text, for terminals and text exports.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct PlainHover;

impl HoverFormat for PlainHover {
    fn lead_text(&self, indicator: LeadIndicator, rules: &TransformRules) -> String {
        match indicator {
            LeadIndicator::First(n) => format!("{} +{}", rules.first.label, n),
            LeadIndicator::Second(n) => format!("{} +{}", rules.second.label, n),
            LeadIndicator::Tied => "Tied".to_string(),
            LeadIndicator::NoVotes => "No votes".to_string(),
        }
    }

    fn hover_text(&self, precinct: &str, lines: &[CandidateLine], lead_text: &str) -> String {
        let mut text = format!("{}\n", precinct);
        for line in lines {
            text.push_str(&format!(
                "{}{}{} {}%\n",
                line.name,
                " ".repeat(line.padding),
                line.votes,
                line.rounded_percentage()
            ));
        }
        text.push_str(lead_text);
        text
    }
}

fn digits(n: u64) -> usize {
    n.to_string().len()
}

/// The hover lines of a row, for the candidates at the given column indexes.
pub fn candidate_lines<'a>(
    table: &'a PrecinctTable,
    row: &PrecinctRow,
    columns: &[usize],
) -> Vec<CandidateLine<'a>> {
    let width = columns
        .iter()
        .map(|idx| table.candidates[*idx].chars().count() + digits(row.votes[*idx]))
        .max()
        .unwrap_or(0)
        + COLUMN_GAP;
    columns
        .iter()
        .map(|idx| {
            let name = table.candidates[*idx].as_str();
            let used = name.chars().count() + digits(row.votes[*idx]);
            CandidateLine {
                name,
                votes: row.votes[*idx],
                percentage: row.percentages[*idx],
                padding: width - used,
            }
        })
        .collect()
}

fn display_columns(
    table: &PrecinctTable,
    rules: &TransformRules,
) -> Result<Vec<usize>, TransformErrors> {
    rules
        .display_order
        .iter()
        .map(|name| {
            table
                .candidate_index(name)
                .ok_or_else(|| TransformErrors::UnknownCandidate { name: name.clone() })
        })
        .collect()
}

/// Builds the presentation fields of every row, in table order.
pub fn present(
    table: &PrecinctTable,
    rules: &TransformRules,
    format: &dyn HoverFormat,
) -> Result<Vec<PresentedRow>, TransformErrors> {
    let columns = display_columns(table, rules)?;
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let (bin_label, color) = match row.bin {
                Some(bin) => (
                    bin.label(&rules.first.label, &rules.second.label),
                    rules.bin_colors[bin.index()].clone(),
                ),
                None => ("No votes".to_string(), NO_DATA_COLOR.to_string()),
            };
            let lead_text = format.lead_text(LeadIndicator::of(row), rules);
            let lines = candidate_lines(table, row, &columns);
            let hover = format.hover_text(&row.precinct, &lines, &lead_text);
            PresentedRow {
                precinct: row.precinct.clone(),
                bin_label,
                color,
                lead_text,
                hover,
            }
        })
        .collect();
    Ok(rows)
}

/// Formats a count with comma thousands separators: 12345 -> "12,345".
pub fn group_thousands(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    for (idx, c) in s.chars().enumerate() {
        if idx > 0 && (s.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// The county-wide table: the two tracked candidates first, then all the others
/// in column order.
pub fn summarize(table: &PrecinctTable, rules: &TransformRules) -> Vec<CandidateSummary> {
    let grand_total: u64 = table.rows.iter().map(|r| r.total).sum();
    let mut order: Vec<usize> = [&rules.first.name, &rules.second.name]
        .iter()
        .filter_map(|name| table.candidate_index(name))
        .collect();
    for idx in 0..table.candidates.len() {
        if !order.contains(&idx) {
            order.push(idx);
        }
    }

    order
        .into_iter()
        .map(|idx| {
            let votes: u64 = table.rows.iter().map(|r| r.votes[idx]).sum();
            let percentage = if grand_total == 0 {
                0.0
            } else {
                round2(100.0 * (votes as f64) / (grand_total as f64))
            };
            CandidateSummary {
                candidate: table.candidates[idx].clone(),
                votes,
                percentage,
                votes_text: group_thousands(votes),
                percentage_text: format!("{:.2}%", percentage),
            }
        })
        .collect()
}
