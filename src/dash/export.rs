// The dataset as handed to the map: JSON for the page, CSV for spreadsheets.

use serde_json::json;

use crate::dash::*;

fn candidate_object<T: Clone + Into<JSValue>>(candidates: &[String], values: &[T]) -> JSValue {
    let m: serde_json::Map<String, JSValue> = candidates
        .iter()
        .cloned()
        .zip(values.iter().cloned().map(|v| v.into()))
        .collect();
    JSValue::Object(m)
}

pub fn dataset_to_json(dataset: &DashboardDataset) -> JSValue {
    let table = &dataset.table;
    let precincts: Vec<JSValue> = table
        .rows
        .iter()
        .zip(dataset.presented.iter())
        .map(|(row, p)| {
            json!({
                "nameplace": row.precinct,
                "votes": candidate_object(&table.candidates, &row.votes),
                "percentages": candidate_object(&table.candidates, &row.percentages),
                "total": row.total,
                "lead": row.lead,
                "binnedLead": p.bin_label,
                "color": p.color,
                "leadText": p.lead_text,
                "hover": p.hover,
            })
        })
        .collect();

    let legend: Vec<JSValue> = dataset
        .legend
        .iter()
        .map(|e| json!({"label": e.label, "color": e.color}))
        .collect();

    let summary: Vec<JSValue> = dataset
        .summary
        .iter()
        .map(|s| {
            json!({
                "candidate": s.candidate,
                "votes": s.votes,
                "votesText": s.votes_text,
                "percentage": s.percentage,
                "pct": s.percentage_text,
            })
        })
        .collect();

    let breakdown: Vec<JSValue> = dataset
        .breakdown
        .iter()
        .map(|b| {
            json!({
                "candidate": b.candidate,
                "absenteeMail": b.counts.absentee_mail,
                "electionDay": b.counts.election_day,
                "provisional": b.counts.provisional,
                "total": b.counts.total(),
            })
        })
        .collect();

    json!({
        "contest": table.contest,
        "candidates": table.candidates,
        "precincts": precincts,
        "legend": legend,
        "summary": summary,
        "ballotTypes": breakdown,
        "unmatched": {
            "precincts": dataset.join.unmatched_precincts,
            "regions": dataset.join.unmatched_regions,
        },
    })
}

/// Writes the precinct table, one line per precinct.
pub fn write_wide_csv(path: &str, dataset: &DashboardDataset) -> DashResult<()> {
    let table = &dataset.table;
    let mut wtr = csv::Writer::from_path(path).context(CsvWriteSnafu { path })?;

    let mut header: Vec<String> = vec!["nameplace".to_string()];
    header.extend(table.candidates.iter().cloned());
    header.push("Total".to_string());
    header.extend(table.candidates.iter().map(|c| format!("{} Percentage", c)));
    for h in ["Lead", "Binned Lead", "Color", "Lead Text", "hover"] {
        header.push(h.to_string());
    }
    wtr.write_record(&header).context(CsvWriteSnafu { path })?;

    for (row, p) in table.rows.iter().zip(dataset.presented.iter()) {
        let mut line: Vec<String> = vec![row.precinct.clone()];
        line.extend(row.votes.iter().map(|v| v.to_string()));
        line.push(row.total.to_string());
        line.extend(row.percentages.iter().map(|x| x.to_string()));
        line.push(row.lead.to_string());
        line.push(p.bin_label.clone());
        line.push(p.color.clone());
        line.push(p.lead_text.clone());
        line.push(p.hover.clone());
        wtr.write_record(&line).context(CsvWriteSnafu { path })?;
    }
    wtr.flush().context(WritingSnafu { path })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> DashboardDataset {
        let rules = TransformRules::new(
            "Mayor",
            TrackedCandidate::new("Anna Smith", "Smith", "blue"),
            TrackedCandidate::new("Bob Jones", "Jones", "red"),
        );
        let records = vec![
            VoteRecord::new("Mayor", "Anna Smith", "Hilltown 1", 1500),
            VoteRecord::new("Mayor", "Bob Jones", "Hilltown 1", 500),
            VoteRecord::new("Mayor", "Anna Smith", "Hilltown 2", 0),
            VoteRecord::new("Mayor", "Bob Jones", "Hilltown 2", 0),
        ];
        build_dataset(
            &records,
            None,
            &["Hilltown 1".to_string()],
            &rules,
            &PlainHover,
        )
        .unwrap()
    }

    #[test]
    fn json_rows() {
        let js = dataset_to_json(&dataset());
        assert_eq!(js["contest"], "Mayor");
        assert_eq!(js["candidates"], json!(["Anna Smith", "Bob Jones"]));
        let p1 = &js["precincts"][0];
        assert_eq!(p1["votes"]["Anna Smith"], 1500);
        assert_eq!(p1["percentages"]["Bob Jones"], 25.0);
        assert_eq!(p1["lead"], 50.0);
        assert_eq!(p1["binnedLead"], "Smith >50%");
        assert_eq!(p1["leadText"], "Smith +50");
        let p2 = &js["precincts"][1];
        assert_eq!(p2["binnedLead"], "No votes");
        assert_eq!(p2["color"], NO_DATA_COLOR);
        assert_eq!(js["summary"][0]["votesText"], "1,500");
        assert_eq!(js["summary"][0]["pct"], "75.00%");
        assert_eq!(js["unmatched"]["regions"], json!([]));
        assert_eq!(js["unmatched"]["precincts"], json!(["Hilltown 2"]));
    }

    #[test]
    fn csv_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv").display().to_string();
        write_wide_csv(&path, &dataset()).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = rdr.headers().unwrap().iter().map(|s| s.to_string()).collect();
        assert_eq!(
            header,
            vec![
                "nameplace",
                "Anna Smith",
                "Bob Jones",
                "Total",
                "Anna Smith Percentage",
                "Bob Jones Percentage",
                "Lead",
                "Binned Lead",
                "Color",
                "Lead Text",
                "hover"
            ]
        );
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "Hilltown 1");
        assert_eq!(&rows[0][3], "2000");
        assert_eq!(&rows[0][4], "75");
        assert_eq!(&rows[1][7], "No votes");
        // The hover text keeps its line breaks.
        assert_eq!(rows[1][10].lines().count(), 4);
    }
}
