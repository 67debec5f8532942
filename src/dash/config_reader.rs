use crate::dash::io_common::ColumnNames;
use crate::dash::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
    #[serde(rename = "csvOutputPath")]
    pub csv_output_path: Option<String>,
    #[serde(rename = "hoverStyle")]
    pub hover_style: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "skipRows")]
    pub skip_rows: Option<usize>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "contestColumn")]
    pub contest_column: Option<String>,
    #[serde(rename = "candidateColumn")]
    pub candidate_column: Option<String>,
    #[serde(rename = "precinctColumn")]
    pub precinct_column: Option<String>,
    #[serde(rename = "votesColumn")]
    pub votes_column: Option<String>,
    #[serde(rename = "absenteeColumn")]
    pub absentee_column: Option<String>,
    #[serde(rename = "electionDayColumn")]
    pub election_day_column: Option<String>,
    #[serde(rename = "provisionalColumn")]
    pub provisional_column: Option<String>,
}

/// The kind of file the results come in.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Csv,
    Xlsx,
}

impl FileSource {
    pub fn new(file_path: &str) -> FileSource {
        FileSource {
            provider: None,
            file_path: file_path.to_string(),
            skip_rows: None,
            excel_worksheet_name: None,
            contest_column: None,
            candidate_column: None,
            precinct_column: None,
            votes_column: None,
            absentee_column: None,
            election_day_column: None,
            provisional_column: None,
        }
    }

    pub fn provider(&self) -> DashResult<Provider> {
        match self.provider.as_deref() {
            None | Some("csv") => Ok(Provider::Csv),
            Some("xlsx") => Ok(Provider::Xlsx),
            Some(x) => whatever!("Provider not implemented {:?}", x),
        }
    }

    /// The county exports start with a title line and a date line.
    pub fn skip_rows(&self) -> usize {
        self.skip_rows.unwrap_or(2)
    }

    pub fn columns(&self) -> ColumnNames {
        let d = ColumnNames::default();
        let pick = |x: &Option<String>, default: String| x.clone().unwrap_or(default);
        ColumnNames {
            contest: pick(&self.contest_column, d.contest),
            candidate: pick(&self.candidate_column, d.candidate),
            precinct: pick(&self.precinct_column, d.precinct),
            votes: pick(&self.votes_column, d.votes),
            absentee: pick(&self.absentee_column, d.absentee),
            election_day: pick(&self.election_day_column, d.election_day),
            provisional: pick(&self.provisional_column, d.provisional),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct GeometrySource {
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "idProperty")]
    pub id_property: Option<String>,
}

impl GeometrySource {
    pub fn id_property(&self) -> &str {
        self.id_property.as_deref().unwrap_or("nameplace")
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DashCandidate {
    pub name: String,
    pub label: Option<String>,
    pub color: Option<String>,
}

impl DashCandidate {
    /// Parses the command line form `NAME` or `NAME=LABEL`.
    pub fn from_arg(arg: &str) -> DashCandidate {
        match arg.split_once('=') {
            Some((name, label)) => DashCandidate {
                name: name.trim().to_string(),
                label: Some(label.trim().to_string()),
                color: None,
            },
            None => DashCandidate {
                name: arg.trim().to_string(),
                label: None,
                color: None,
            },
        }
    }

    // The last name by default.
    fn label(&self) -> String {
        match &self.label {
            Some(l) => l.clone(),
            None => self
                .name
                .split_whitespace()
                .last()
                .unwrap_or(self.name.as_str())
                .to_string(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DashRule {
    pub find: String,
    pub replace: String,
    pub protected: Option<Vec<String>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum HoverStyle {
    Html,
    Plain,
}

/// What to do when precincts and boundaries do not join.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum JoinPolicy {
    Warn,
    Strict,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DashConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "voteSource")]
    pub vote_source: FileSource,
    #[serde(rename = "summarySource")]
    pub summary_source: Option<FileSource>,
    #[serde(rename = "geometrySource")]
    pub geometry_source: GeometrySource,
    pub candidates: Vec<DashCandidate>,
    #[serde(rename = "displayOrder")]
    pub display_order: Option<Vec<String>>,
    pub normalization: Option<Vec<DashRule>>,
    #[serde(rename = "binColors")]
    pub bin_colors: Option<Vec<String>>,
    #[serde(rename = "joinPolicy")]
    pub join_policy: Option<String>,
}

impl DashConfig {
    pub fn transform_rules(&self) -> DashResult<TransformRules> {
        let (first, second) = match self.candidates.as_slice() {
            [first, second] => (first, second),
            x => whatever!(
                "Exactly two candidates must be tracked, found {}: {:?}",
                x.len(),
                x
            ),
        };
        let tracked = |c: &DashCandidate, default_color: &str| {
            TrackedCandidate::new(
                &c.name,
                &c.label(),
                c.color.as_deref().unwrap_or(default_color),
            )
        };
        let mut rules = TransformRules::new(
            &self.output_settings.contest_name,
            tracked(first, "blue"),
            tracked(second, "red"),
        );
        if let Some(order) = &self.display_order {
            rules.display_order = order.clone();
        }
        if let Some(norm) = &self.normalization {
            rules.normalization = norm
                .iter()
                .map(|r| NormalizationRule {
                    find: r.find.clone(),
                    replace: r.replace.clone(),
                    protected: r.protected.clone().unwrap_or_default(),
                })
                .collect();
        }
        if let Some(colors) = &self.bin_colors {
            rules.bin_colors = colors.clone();
        }
        rules.validate().context(TransformSnafu {})?;
        Ok(rules)
    }

    pub fn hover_style(&self) -> DashResult<HoverStyle> {
        match self.output_settings.hover_style.as_deref() {
            None | Some("html") => Ok(HoverStyle::Html),
            Some("plain") => Ok(HoverStyle::Plain),
            Some(x) => whatever!("Unknown hover style {:?}", x),
        }
    }

    pub fn join_policy(&self) -> DashResult<JoinPolicy> {
        match self.join_policy.as_deref() {
            None | Some("warn") => Ok(JoinPolicy::Warn),
            Some("strict") => Ok(JoinPolicy::Strict),
            Some(x) => whatever!("Unknown join policy {:?}", x),
        }
    }
}

pub fn read_config(path: &str) -> DashResult<DashConfig> {
    let contents = fs::read_to_string(path).context(SourceUnavailableSnafu { path })?;
    debug!("read_config: {:?}", contents);
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}
