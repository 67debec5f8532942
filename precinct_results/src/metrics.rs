use log::{debug, info};

use crate::config::*;

impl LeadBin {
    /// The bucket of a lead, in percentage points.
    ///
    /// Boundaries go to the bucket further away from zero: 10.0 is
    /// `First10To25` and -10.0 is `Second10To25`. A lead of exactly 0 is
    /// `First0To10`.
    pub fn from_lead(lead: f64) -> LeadBin {
        if lead >= 0.0 {
            if lead >= 50.0 {
                LeadBin::FirstOver50
            } else if lead >= 25.0 {
                LeadBin::First25To50
            } else if lead >= 10.0 {
                LeadBin::First10To25
            } else {
                LeadBin::First0To10
            }
        } else if lead > -10.0 {
            LeadBin::Second0To10
        } else if lead > -25.0 {
            LeadBin::Second10To25
        } else if lead > -50.0 {
            LeadBin::Second25To50
        } else {
            LeadBin::SecondOver50
        }
    }

    /// The legend label, for instance "Houck 25-50%".
    pub fn label(&self, first: &str, second: &str) -> String {
        match self {
            LeadBin::SecondOver50 => format!("{} >50%", second),
            LeadBin::Second25To50 => format!("{} 25-50%", second),
            LeadBin::Second10To25 => format!("{} 10-25%", second),
            LeadBin::Second0To10 => format!("{} 0-10%", second),
            LeadBin::First0To10 => format!("{} 0-10%", first),
            LeadBin::First10To25 => format!("{} 10-25%", first),
            LeadBin::First25To50 => format!("{} 25-50%", first),
            LeadBin::FirstOver50 => format!("{} >50%", first),
        }
    }
}

/// The ordered legend of the map: every bucket with its color.
pub fn legend(rules: &TransformRules) -> Vec<LegendEntry> {
    LeadBin::ALL
        .iter()
        .zip(rules.bin_colors.iter())
        .map(|(bin, color)| LegendEntry {
            label: bin.label(&rules.first.label, &rules.second.label),
            color: color.clone(),
        })
        .collect()
}

/// Adds totals, percentages, lead and lead bucket to every row.
///
/// A precinct without any vote gets 0.0 everywhere and no bucket.
pub fn derive_metrics(
    table: WideTable,
    rules: &TransformRules,
) -> Result<PrecinctTable, TransformErrors> {
    let lookup = |name: &String| {
        table
            .candidates
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TransformErrors::UnknownCandidate { name: name.clone() })
    };
    let first_idx = lookup(&rules.first.name)?;
    let second_idx = lookup(&rules.second.name)?;

    let mut empty_precincts = 0;
    let rows: Vec<PrecinctRow> = table
        .rows
        .into_iter()
        .map(|row| {
            let total: u64 = row.votes.iter().sum();
            let percentages: Vec<f64> = if total == 0 {
                empty_precincts += 1;
                vec![0.0; row.votes.len()]
            } else {
                row.votes
                    .iter()
                    .map(|v| 100.0 * (*v as f64) / (total as f64))
                    .collect()
            };
            let lead = percentages[first_idx] - percentages[second_idx];
            let bin = if total == 0 {
                None
            } else {
                Some(LeadBin::from_lead(lead))
            };
            debug!(
                "derive_metrics: {:?} total: {} lead: {:.3} bin: {:?}",
                row.precinct, total, lead, bin
            );
            PrecinctRow {
                precinct: row.precinct,
                votes: row.votes,
                total,
                percentages,
                lead,
                bin,
            }
        })
        .collect();

    if empty_precincts > 0 {
        info!(
            "derive_metrics: {} precinct(s) without any vote, no lead bucket assigned",
            empty_precincts
        );
    }

    Ok(PrecinctTable {
        contest: table.contest,
        candidates: table.candidates,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rules() -> TransformRules {
        TransformRules::new(
            "Congress",
            TrackedCandidate::new("Anna", "A", "blue"),
            TrackedCandidate::new("Bob", "B", "red"),
        )
    }

    fn wide(rows: &[(&str, Vec<u64>)]) -> WideTable {
        WideTable {
            contest: "Congress".to_string(),
            candidates: vec!["Anna".to_string(), "Bob".to_string(), "Write-in".to_string()],
            rows: rows
                .iter()
                .map(|(p, v)| WideRow {
                    precinct: p.to_string(),
                    votes: v.clone(),
                })
                .collect(),
        }
    }

    #[test]
    fn boundaries_go_away_from_zero() {
        assert_eq!(LeadBin::from_lead(0.0), LeadBin::First0To10);
        assert_eq!(LeadBin::from_lead(9.999), LeadBin::First0To10);
        assert_eq!(LeadBin::from_lead(10.0), LeadBin::First10To25);
        assert_eq!(LeadBin::from_lead(25.0), LeadBin::First25To50);
        assert_eq!(LeadBin::from_lead(50.0), LeadBin::FirstOver50);
        assert_eq!(LeadBin::from_lead(100.0), LeadBin::FirstOver50);
        assert_eq!(LeadBin::from_lead(-0.001), LeadBin::Second0To10);
        assert_eq!(LeadBin::from_lead(-10.0), LeadBin::Second10To25);
        assert_eq!(LeadBin::from_lead(-25.0), LeadBin::Second25To50);
        assert_eq!(LeadBin::from_lead(-50.0), LeadBin::SecondOver50);
        assert_eq!(LeadBin::from_lead(-100.0), LeadBin::SecondOver50);
    }

    #[test]
    fn labels_follow_legend_order() {
        let labels: Vec<String> = legend(&rules()).into_iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec![
                "B >50%", "B 25-50%", "B 10-25%", "B 0-10%", "A 0-10%", "A 10-25%", "A 25-50%",
                "A >50%"
            ]
        );
        assert_eq!(legend(&rules())[7].color, "#1375b7");
    }

    #[test]
    fn example_precincts() {
        let res = derive_metrics(wide(&[("P1", vec![60, 40, 0]), ("P2", vec![30, 70, 0])]), &rules())
            .unwrap();
        let p1 = res.row("P1").unwrap();
        assert_eq!(p1.total, 100);
        assert_eq!(p1.lead, 20.0);
        assert_eq!(p1.bin, Some(LeadBin::First10To25));
        let p2 = res.row("P2").unwrap();
        assert_eq!(p2.lead, -40.0);
        assert_eq!(p2.bin, Some(LeadBin::Second25To50));
        assert_eq!(p2.bin.unwrap().label("A", "B"), "B 25-50%");
    }

    #[test]
    fn write_ins_count_in_total() {
        let res = derive_metrics(wide(&[("P1", vec![50, 25, 25])]), &rules()).unwrap();
        let p1 = &res.rows[0];
        assert_eq!(p1.total, 100);
        assert_eq!(p1.percentages, vec![50.0, 25.0, 25.0]);
        assert_eq!(p1.lead, 25.0);
    }

    #[test]
    fn empty_precinct_gets_sentinel() {
        let res = derive_metrics(wide(&[("P0", vec![0, 0, 0])]), &rules()).unwrap();
        let p0 = &res.rows[0];
        assert!(!p0.has_votes());
        assert_eq!(p0.percentages, vec![0.0, 0.0, 0.0]);
        assert_eq!(p0.lead, 0.0);
        assert_eq!(p0.bin, None);
    }

    #[test]
    fn untracked_candidate_is_an_error() {
        let mut r = rules();
        r.second = TrackedCandidate::new("Clara", "C", "green");
        assert_eq!(
            derive_metrics(wide(&[("P1", vec![1, 1, 0])]), &r),
            Err(TransformErrors::UnknownCandidate {
                name: "Clara".to_string()
            })
        );
    }

    // The interval of each bucket, as listed on `LeadBin`.
    fn bounds_contain(bin: LeadBin, lead: f64) -> bool {
        match bin {
            LeadBin::SecondOver50 => lead <= -50.0,
            LeadBin::Second25To50 => -50.0 < lead && lead <= -25.0,
            LeadBin::Second10To25 => -25.0 < lead && lead <= -10.0,
            LeadBin::Second0To10 => -10.0 < lead && lead < 0.0,
            LeadBin::First0To10 => (0.0..10.0).contains(&lead),
            LeadBin::First10To25 => (10.0..25.0).contains(&lead),
            LeadBin::First25To50 => (25.0..50.0).contains(&lead),
            LeadBin::FirstOver50 => lead >= 50.0,
        }
    }

    proptest! {
        #[test]
        fn every_lead_falls_in_its_bucket(lead in -100.0f64..=100.0) {
            let bin = LeadBin::from_lead(lead);
            prop_assert!(bounds_contain(bin, lead), "{} is not in {:?}", lead, bin);
            // No other bucket claims it.
            for other in LeadBin::ALL.iter().filter(|b| **b != bin) {
                prop_assert!(!bounds_contain(*other, lead));
            }
        }

        #[test]
        fn percentages_sum_to_100(votes in prop::collection::vec(0u64..100_000, 3)) {
            let res = derive_metrics(wide(&[("P", votes.clone())]), &rules()).unwrap();
            let row = &res.rows[0];
            prop_assert_eq!(row.total, votes.iter().sum::<u64>());
            if row.total > 0 {
                let sum: f64 = row.percentages.iter().sum();
                prop_assert!((sum - 100.0).abs() < 1e-6);
                prop_assert!(row.lead >= -100.0 && row.lead <= 100.0);
            } else {
                prop_assert_eq!(row.bin, None);
            }
        }
    }
}
