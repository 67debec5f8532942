use log::{debug, info, warn};

use precinct_results::*;
use snafu::prelude::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::dash::config_reader::*;
use crate::dash::export::{dataset_to_json, write_wide_csv};
use crate::dash::io_common::ExportKind;

pub mod config_reader;
mod export;
mod io_common;
mod io_csv;
mod io_geojson;
mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum DashError {
    #[snafu(display("Source {path} is unavailable"))]
    SourceUnavailable {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading CSV file {path}"))]
    CsvRead { source: csv::Error, path: String },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Excel file {path} has no worksheet {sheet}"))]
    MissingWorksheet { path: String, sheet: String },
    #[snafu(display("File {path} has no header line"))]
    MissingHeader { path: String },
    #[snafu(display("File {path} is missing the columns {missing:?}"))]
    SchemaMismatch { path: String, missing: Vec<String> },
    #[snafu(display("File {path}, line {lineno}: {value:?} is not a vote count"))]
    InvalidVoteCount {
        path: String,
        lineno: usize,
        value: String,
    },
    #[snafu(display("File {path}, line {lineno}: the line is too short"))]
    LineTooShort { path: String, lineno: usize },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Feature #{index} of {path} has no text property {key:?}"))]
    GeometryMissingKey {
        path: String,
        index: usize,
        key: String,
    },
    #[snafu(display("Could not build the precinct table"))]
    Transform { source: TransformErrors },
    #[snafu(display("{count} identifier(s) do not join with the precinct boundaries"))]
    JoinMismatch { count: usize },
    #[snafu(display("Error serializing the dataset"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    Writing {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing CSV file {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Difference detected between the dataset and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DashResult<T> = Result<T, DashError>;

fn resolve_path(root: &Path, file_path: &str) -> String {
    let p: PathBuf = [root, Path::new(file_path)].iter().collect();
    p.as_path().display().to_string()
}

/// Reads the configuration file if any, then applies the command line on top of it.
///
/// The paths of the configuration file are relative to the file itself. The
/// paths given on the command line are used as they are.
fn resolve_config(args: &Args) -> DashResult<DashConfig> {
    let mut config = match &args.config {
        Some(config_path) => {
            let mut config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            config.vote_source.file_path = resolve_path(&root, &config.vote_source.file_path);
            if let Some(s) = config.summary_source.as_mut() {
                s.file_path = resolve_path(&root, &s.file_path);
            }
            config.geometry_source.file_path =
                resolve_path(&root, &config.geometry_source.file_path);
            let out = &mut config.output_settings;
            for p in [&mut out.output_path, &mut out.csv_output_path] {
                if let Some(x) = p.as_mut() {
                    if !x.is_empty() && x.as_str() != "stdout" {
                        *x = resolve_path(&root, x);
                    }
                }
            }
            config
        }
        None => {
            let votes = match &args.votes {
                Some(x) => x,
                None => whatever!("Missing --votes: the results export is required without --config"),
            };
            let geometry = match &args.geometry {
                Some(x) => x,
                None => whatever!(
                    "Missing --geometry: the precinct boundaries are required without --config"
                ),
            };
            let contest = match &args.contest {
                Some(x) => x,
                None => whatever!("Missing --contest: required without --config"),
            };
            DashConfig {
                output_settings: OutputSettings {
                    contest_name: contest.clone(),
                    output_path: None,
                    csv_output_path: None,
                    hover_style: None,
                },
                vote_source: FileSource::new(votes),
                summary_source: None,
                geometry_source: GeometrySource {
                    file_path: geometry.clone(),
                    id_property: None,
                },
                candidates: Vec::new(),
                display_order: None,
                normalization: None,
                bin_colors: None,
                join_policy: None,
            }
        }
    };

    if let Some(votes) = &args.votes {
        config.vote_source.file_path = votes.clone();
    }
    if let Some(geometry) = &args.geometry {
        config.geometry_source.file_path = geometry.clone();
    }
    if let Some(summary) = &args.summary {
        let mut source = config
            .summary_source
            .clone()
            .unwrap_or_else(|| FileSource::new(summary));
        source.file_path = summary.clone();
        config.summary_source = Some(source);
    }
    if let Some(contest) = &args.contest {
        config.output_settings.contest_name = contest.clone();
    }
    if !args.candidates.is_empty() {
        config.candidates = args
            .candidates
            .iter()
            .map(|c| DashCandidate::from_arg(c))
            .collect();
        config.display_order = None;
    }
    if let Some(input_type) = &args.input_type {
        config.vote_source.provider = Some(input_type.clone());
        if let Some(s) = config.summary_source.as_mut() {
            s.provider = Some(input_type.clone());
        }
    }
    if let Some(skip_rows) = args.skip_rows {
        config.vote_source.skip_rows = Some(skip_rows);
        if let Some(s) = config.summary_source.as_mut() {
            s.skip_rows = Some(skip_rows);
        }
    }
    if let Some(hover) = &args.hover {
        config.output_settings.hover_style = Some(hover.clone());
    }
    if let Some(out) = &args.out {
        config.output_settings.output_path = Some(out.clone());
    }
    if let Some(csv_out) = &args.csv_out {
        config.output_settings.csv_output_path = Some(csv_out.clone());
    }
    Ok(config)
}

fn read_vote_records(source: &FileSource, kind: ExportKind) -> DashResult<Vec<VoteRecord>> {
    let path = source.file_path.as_str();
    info!("Attempting to read results file {:?}", path);
    match source.provider()? {
        Provider::Csv => io_csv::read_csv_records(path, source, kind),
        Provider::Xlsx => io_xlsx::read_xlsx_records(path, source, kind),
    }
}

fn apply_join_policy(join: &JoinReport, policy: JoinPolicy) -> DashResult<()> {
    if join.is_clean() {
        return Ok(());
    }
    if !join.unmatched_precincts.is_empty() {
        warn!(
            "Precincts with results but without boundary (check the normalization rules): {:?}",
            join.unmatched_precincts
        );
    }
    if !join.unmatched_regions.is_empty() {
        warn!(
            "Boundaries without results: {:?}",
            join.unmatched_regions
        );
    }
    ensure!(
        policy == JoinPolicy::Warn,
        JoinMismatchSnafu {
            count: join.unmatched_precincts.len() + join.unmatched_regions.len()
        }
    );
    Ok(())
}

/// Compares the produced dataset with a reference dataset, printing the
/// differences if any.
fn check_reference(reference_path: &str, pretty_dataset: &str) -> DashResult<()> {
    let contents = fs::read_to_string(reference_path).context(SourceUnavailableSnafu {
        path: reference_path,
    })?;
    let reference: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {
        path: reference_path,
    })?;
    let pretty_reference =
        serde_json::to_string_pretty(&reference).context(SerializingJsonSnafu {})?;
    if pretty_reference != pretty_dataset {
        warn!("Found differences with the reference dataset");
        print_diff(pretty_reference.as_str(), pretty_dataset, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("The dataset matches the reference {:?}", reference_path);
    Ok(())
}

pub fn run_dashboard(args: &Args) -> DashResult<()> {
    let config = resolve_config(args)?;
    info!("config: {:?}", config);

    let rules = config.transform_rules()?;
    let hover_style = config.hover_style()?;
    let join_policy = config.join_policy()?;

    let records = read_vote_records(&config.vote_source, ExportKind::Precinct)?;
    let summary_records = match &config.summary_source {
        Some(source) => Some(read_vote_records(source, ExportKind::Summary)?),
        None => None,
    };

    let geometry_path = config.geometry_source.file_path.as_str();
    info!("Attempting to read boundaries file {:?}", geometry_path);
    let region_ids =
        io_geojson::read_region_ids(geometry_path, config.geometry_source.id_property())?;

    let format: Box<dyn HoverFormat> = match hover_style {
        HoverStyle::Html => Box::new(HtmlHover),
        HoverStyle::Plain => Box::new(PlainHover),
    };
    let dataset = build_dataset(
        &records,
        summary_records.as_deref(),
        &region_ids,
        &rules,
        format.as_ref(),
    )
    .context(TransformSnafu {})?;
    debug!("dataset: {:?}", dataset);

    apply_join_policy(&dataset.join, join_policy)?;

    let pretty_js = serde_json::to_string_pretty(&dataset_to_json(&dataset))
        .context(SerializingJsonSnafu {})?;
    match config.output_settings.output_path.as_deref() {
        None | Some("") | Some("stdout") => println!("{}", pretty_js),
        Some(out_path) => {
            info!("Writing dataset to {:?}", out_path);
            fs::write(out_path, &pretty_js).context(WritingSnafu { path: out_path })?;
        }
    }
    if let Some(csv_path) = config.output_settings.csv_output_path.as_deref() {
        info!("Writing precinct table to {:?}", csv_path);
        write_wide_csv(csv_path, &dataset)?;
    }

    // The reference dataset, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &pretty_js)?;
    }

    Ok(())
}
