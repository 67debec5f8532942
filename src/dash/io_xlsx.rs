// Reading the Excel exports of the county.

use std::fs::File;
use std::io::BufReader;

use calamine::{DataType, Reader, Xlsx};

use crate::dash::io_common::{records_from_rows, ExportKind};
use crate::dash::*;

fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        // Counts are stored as floats by most spreadsheet programs.
        DataType::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => String::new(),
        x => format!("{:?}", x),
    }
}

pub fn read_xlsx_records(
    path: &str,
    source: &FileSource,
    kind: ExportKind,
) -> DashResult<Vec<VoteRecord>> {
    let file = File::open(path).context(SourceUnavailableSnafu { path })?;
    let mut workbook: Xlsx<_> =
        Xlsx::new(BufReader::new(file)).context(OpeningExcelSnafu { path })?;
    let (sheet, wrange) = match &source.excel_worksheet_name {
        Some(name) => (name.clone(), workbook.worksheet_range(name)),
        None => ("#0".to_string(), workbook.worksheet_range_at(0)),
    };
    let wrange = wrange
        .context(MissingWorksheetSnafu { path, sheet })?
        .context(OpeningExcelSnafu { path })?;

    // The range starts at its first used row, not at the top of the sheet.
    let first_row = wrange.start().map(|(r, _)| r as usize).unwrap_or(0);
    let skip_rows = source.skip_rows();
    let rows: Vec<(usize, Vec<String>)> = wrange
        .rows()
        .enumerate()
        .map(|(idx, row)| (first_row + idx + 1, row))
        .filter(|(lineno, _)| *lineno > skip_rows)
        .map(|(lineno, row)| (lineno, row.iter().map(cell_text).collect()))
        .collect();
    debug!("read_xlsx_records: {} rows after the preamble", rows.len());
    records_from_rows(path, rows, &source.columns(), kind)
}
