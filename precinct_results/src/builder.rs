pub use crate::config::*;

use crate::{build_dataset, HoverFormat};

/// A builder for adding vote records one at a time.
///
/// Handy when the records do not come from one of the usual exports.
///
/// ```
/// use precinct_results::builder::Builder;
/// use precinct_results::{PlainHover, TrackedCandidate, TransformErrors, TransformRules};
///
/// let rules = TransformRules::new(
///     "Representative in Congress",
///     TrackedCandidate::new("Anna Smith", "Smith", "blue"),
///     TrackedCandidate::new("Bob Jones", "Jones", "red"),
/// );
/// let mut builder = Builder::new(&rules)?;
/// builder.add_record("Anna Smith", "Tinicum", 60)?;
/// builder.add_record("Bob Jones", "Tinicum", 40)?;
///
/// let dataset = builder.build(&["Tinicum".to_string()], &PlainHover)?;
/// assert_eq!(dataset.presented[0].lead_text, "Smith +20");
/// # Ok::<(), TransformErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: TransformRules,
    pub(crate) _records: Vec<VoteRecord>,
}

impl Builder {
    pub fn new(rules: &TransformRules) -> Result<Builder, TransformErrors> {
        rules.validate()?;
        Ok(Builder {
            _rules: rules.clone(),
            _records: Vec::new(),
        })
    }

    /// Adds the votes of a candidate in a precinct, for the contest of the rules.
    pub fn add_record(
        &mut self,
        candidate: &str,
        precinct: &str,
        votes: u64,
    ) -> Result<(), TransformErrors> {
        let record = VoteRecord::new(&self._rules.contest, candidate, precinct, votes);
        self.record(&record)
    }

    /// Adds a full record. Records of other contests are accepted and ignored
    /// by the pipeline.
    pub fn record(&mut self, record: &VoteRecord) -> Result<(), TransformErrors> {
        self._records.push(record.clone());
        Ok(())
    }

    pub fn build(
        &self,
        region_ids: &[String],
        format: &dyn HoverFormat,
    ) -> Result<DashboardDataset, TransformErrors> {
        build_dataset(&self._records, None, region_ids, &self._rules, format)
    }
}
