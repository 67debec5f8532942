//! Clean-up of precinct identifiers so they match the names used by the
//! precinct boundaries.

use log::debug;
use std::collections::BTreeMap;

use crate::config::*;

// More passes than any sensible rule set needs to settle.
const MAX_PASSES: usize = 16;

/// Applies the rules in order, over and over, until the identifier stops changing.
///
/// Running the result through the same rules again returns it unchanged.
pub fn normalize_identifier(
    identifier: &str,
    rules: &[NormalizationRule],
) -> Result<String, TransformErrors> {
    let mut current = identifier.to_string();
    for _ in 0..MAX_PASSES {
        let next = rules
            .iter()
            .fold(current.clone(), |acc, rule| apply_rule(&acc, rule));
        if next == current {
            return Ok(current);
        }
        current = next;
    }
    Err(TransformErrors::NormalizationDiverged {
        identifier: identifier.to_string(),
    })
}

/// Rewrites the precinct column of the table.
///
/// Fails if two distinct precincts end up with the same identifier.
pub fn normalize_table(
    table: WideTable,
    rules: &[NormalizationRule],
) -> Result<WideTable, TransformErrors> {
    let mut sources: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut rows: Vec<WideRow> = Vec::with_capacity(table.rows.len());
    for row in table.rows {
        let precinct = normalize_identifier(&row.precinct, rules)?;
        if precinct != row.precinct {
            debug!("normalize_table: {:?} -> {:?}", row.precinct, precinct);
        }
        sources
            .entry(precinct.clone())
            .or_default()
            .push(row.precinct.clone());
        rows.push(WideRow {
            precinct,
            votes: row.votes,
        });
    }

    if let Some((precinct, raw)) = sources.into_iter().find(|(_, raw)| raw.len() > 1) {
        return Err(TransformErrors::PrecinctCollision {
            precinct,
            sources: raw,
        });
    }

    rows.sort_by(|a, b| a.precinct.cmp(&b.precinct));
    Ok(WideTable {
        contest: table.contest,
        candidates: table.candidates,
        rows,
    })
}

fn apply_rule(s: &str, rule: &NormalizationRule) -> String {
    if rule.protected.is_empty() {
        return s.replace(&rule.find, &rule.replace);
    }
    let mask = protected_mask(s, &rule.protected);
    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for (start, part) in s.match_indices(rule.find.as_str()) {
        let end = start + part.len();
        out.push_str(&s[last..start]);
        if mask[start..end].iter().all(|m| *m) {
            out.push_str(part);
        } else {
            out.push_str(&rule.replace);
        }
        last = end;
    }
    out.push_str(&s[last..]);
    out
}

// For each byte of s, whether it belongs to an occurrence of a protected term.
fn protected_mask(s: &str, terms: &[String]) -> Vec<bool> {
    let mut mask = vec![false; s.len()];
    for term in terms.iter().filter(|t| !t.is_empty()) {
        for (start, part) in s.match_indices(term.as_str()) {
            for m in mask[start..start + part.len()].iter_mut() {
                *m = true;
            }
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn norm(s: &str) -> String {
        normalize_identifier(s, &default_normalization_rules()).unwrap()
    }

    #[test]
    fn strips_space_after_number_sign() {
        assert_eq!(norm("Bensalem Twp # 3"), "Bensalem Twp #3");
    }

    #[test]
    fn collapses_runs_of_spaces() {
        assert_eq!(norm("Bristol  Twp   Dist 2"), "Bristol Twp Dist 2");
        assert_eq!(norm("Warminster #  4"), "Warminster #4");
    }

    #[test]
    fn expands_boro() {
        assert_eq!(norm("Bristol Boro 1"), "Bristol Borough 1");
        assert_eq!(norm("Quakertown Boro #2"), "Quakertown Borough #2");
    }

    #[test]
    fn leaves_expanded_borough_alone() {
        assert_eq!(norm("Morrisville Borough 1"), "Morrisville Borough 1");
    }

    #[test]
    fn protected_township_keeps_its_name() {
        assert_eq!(norm("Doylestown Boro 1"), "Doylestown Boro 1");
        assert_eq!(norm("Doylestown  Boro # 2"), "Doylestown Boro #2");
        // Only the borough is protected.
        assert_eq!(norm("Doylestown Twp 3"), "Doylestown Twp 3");
    }

    #[test]
    fn rules_run_in_declared_order() {
        let rules = vec![
            NormalizationRule::new("a", "b"),
            NormalizationRule::new("b", "c"),
        ];
        assert_eq!(normalize_identifier("aab", &rules).unwrap(), "ccc");
    }

    #[test]
    fn growing_rule_without_protection_diverges() {
        let rules = vec![NormalizationRule::new("Boro", "Borough")];
        assert_eq!(
            normalize_identifier("Tullytown Boro", &rules),
            Err(TransformErrors::NormalizationDiverged {
                identifier: "Tullytown Boro".to_string()
            })
        );
    }

    #[test]
    fn collision_is_reported() {
        let table = WideTable {
            contest: "c".to_string(),
            candidates: vec!["A".to_string()],
            rows: vec![
                WideRow {
                    precinct: "Hilltown #1".to_string(),
                    votes: vec![1],
                },
                WideRow {
                    precinct: "Hilltown # 1".to_string(),
                    votes: vec![2],
                },
            ],
        };
        match normalize_table(table, &default_normalization_rules()) {
            Err(TransformErrors::PrecinctCollision { precinct, sources }) => {
                assert_eq!(precinct, "Hilltown #1");
                assert_eq!(sources.len(), 2);
            }
            x => panic!("expected a collision, got {:?}", x),
        }
    }

    #[test]
    fn table_rows_are_sorted_after_renaming() {
        let table = WideTable {
            contest: "c".to_string(),
            candidates: vec!["A".to_string()],
            rows: vec![
                WideRow {
                    precinct: "B  2".to_string(),
                    votes: vec![1],
                },
                WideRow {
                    precinct: "B 1".to_string(),
                    votes: vec![2],
                },
            ],
        };
        let res = normalize_table(table, &default_normalization_rules()).unwrap();
        let names: Vec<&str> = res.rows.iter().map(|r| r.precinct.as_str()).collect();
        assert_eq!(names, vec!["B 1", "B 2"]);
        assert_eq!(res.rows[1].votes, vec![1]);
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(s in "[#a-zA-Z0-9 ]{0,24}|(Doylestown |Bristol )?Boro(ugh)?( #)? {0,3}[0-9]") {
            let once = norm(&s);
            let twice = norm(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
