use clap::Parser;

/// This program prepares precinct-level election results for a choropleth dashboard.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the contest, the sources and the candidates.
    /// The other options override the values of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The precinct-level results export.
    #[clap(short = 'i', long, value_parser)]
    pub votes: Option<String>,

    /// (file path) The GeoJSON file with the precinct boundaries.
    #[clap(short, long, value_parser)]
    pub geometry: Option<String>,

    /// (file path, optional) The county-wide summary export, used for the breakdown by ballot type.
    #[clap(long, value_parser)]
    pub summary: Option<String>,

    /// The name of the contest, exactly as it appears in the export.
    #[clap(long, value_parser)]
    pub contest: Option<String>,

    /// (NAME or NAME=LABEL, given twice) The two candidates whose lead is mapped. Positive leads
    /// favor the first one.
    #[clap(long = "candidate", value_parser)]
    pub candidates: Vec<String>,

    /// (default csv) The type of the results exports: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default 2) The number of lines before the header line in the results exports.
    #[clap(long, value_parser)]
    pub skip_rows: Option<usize>,

    /// (default html) The style of the hover text: html or plain.
    #[clap(long, value_parser)]
    pub hover: Option<String>,

    /// (file path, 'stdout' or empty) Where the dataset is written in JSON format.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, optional) Also writes the precinct table in CSV format.
    #[clap(long, value_parser)]
    pub csv_out: Option<String>,

    /// (file path) A reference dataset in JSON format. If provided, the program checks that the
    /// produced dataset matches it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
