// Reading the CSV exports of the county.

use std::fs::File;

use crate::dash::io_common::{records_from_rows, ExportKind};
use crate::dash::*;

pub fn read_csv_records(
    path: &str,
    source: &FileSource,
    kind: ExportKind,
) -> DashResult<Vec<VoteRecord>> {
    let file = File::open(path).context(SourceUnavailableSnafu { path })?;
    // The preamble lines do not have the width of the table.
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let skip_rows = source.skip_rows();
    let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
    for line_r in rdr.into_records() {
        let line = line_r.context(CsvReadSnafu { path })?;
        // The line in the file, starting at 1. Blank lines never reach this
        // loop but still count.
        let lineno = line.position().map(|p| p.line() as usize).unwrap_or(0);
        if lineno <= skip_rows {
            debug!("read_csv_records: skipping line {}: {:?}", lineno, line);
            continue;
        }
        rows.push((lineno, line.iter().map(|s| s.to_string()).collect()));
    }
    records_from_rows(path, rows, &source.columns(), kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path.display().to_string()
    }

    #[test]
    fn skips_the_preamble() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "votes.csv",
            "Bucks County General Primary\n\
             Unofficial results\n\
             Contest Name,Candidate Name,nameplace,Votes\n\
             Mayor,Anna Smith,Tinicum,\"1,204\"\n\
             Mayor,Bob Jones,Tinicum,98\n",
        );
        let res = read_csv_records(&path, &FileSource::new(&path), ExportKind::Precinct).unwrap();
        assert_eq!(
            res,
            vec![
                VoteRecord::new("Mayor", "Anna Smith", "Tinicum", 1204),
                VoteRecord::new("Mayor", "Bob Jones", "Tinicum", 98),
            ]
        );
    }

    #[test]
    fn errors_carry_the_file_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "votes.csv",
            "Contest Name,Candidate Name,nameplace,Votes\nMayor,Anna,Tinicum,many\n",
        );
        let mut source = FileSource::new(&path);
        source.skip_rows = Some(0);
        match read_csv_records(&path, &source, ExportKind::Precinct) {
            Err(DashError::InvalidVoteCount { lineno, .. }) => assert_eq!(lineno, 2),
            x => panic!("expected an invalid count, got {:?}", x),
        }
    }

    #[test]
    fn blank_lines_in_the_preamble_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "votes.csv",
            "Bucks County General Primary\n\
             \n\
             Unofficial results\n\
             Contest Name,Candidate Name,nameplace,Votes\n\
             Mayor,Anna Smith,Tinicum,12\n\
             \n\
             Mayor,Bob Jones,Tinicum,many\n",
        );
        let mut source = FileSource::new(&path);
        source.skip_rows = Some(3);
        match read_csv_records(&path, &source, ExportKind::Precinct) {
            Err(DashError::InvalidVoteCount { lineno, value, .. }) => {
                assert_eq!(lineno, 7);
                assert_eq!(value, "many");
            }
            x => panic!("expected an invalid count, got {:?}", x),
        }

        let path = write_file(
            &dir,
            "votes2.csv",
            "Bucks County General Primary\n\
             \n\
             Unofficial results\n\
             Contest Name,Candidate Name,nameplace,Votes\n\
             Mayor,Anna Smith,Tinicum,12\n",
        );
        let mut source = FileSource::new(&path);
        source.skip_rows = Some(3);
        let res = read_csv_records(&path, &source, ExportKind::Precinct).unwrap();
        assert_eq!(res, vec![VoteRecord::new("Mayor", "Anna Smith", "Tinicum", 12)]);
    }

    #[test]
    fn custom_column_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "votes.csv",
            "Race,Choice,Precinct,Total\nMayor,Anna,Tinicum,4\n",
        );
        let mut source = FileSource::new(&path);
        source.skip_rows = Some(0);
        source.contest_column = Some("Race".to_string());
        source.candidate_column = Some("Choice".to_string());
        source.precinct_column = Some("Precinct".to_string());
        source.votes_column = Some("Total".to_string());
        let res = read_csv_records(&path, &source, ExportKind::Precinct).unwrap();
        assert_eq!(res, vec![VoteRecord::new("Mayor", "Anna", "Tinicum", 4)]);
    }

    #[test]
    fn missing_file() {
        let path = "/nonexistent/votes.csv";
        assert!(matches!(
            read_csv_records(path, &FileSource::new(path), ExportKind::Precinct),
            Err(DashError::SourceUnavailable { .. })
        ));
    }
}
