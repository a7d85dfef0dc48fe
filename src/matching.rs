//! The four-rule name matcher over the unified dataset.

use tracing::{debug, instrument};

use crate::columns::NAME_NEEDLE;
use crate::model::{Dataset, Record};
use crate::names::MatchQuery;

/// Returns every record whose stored name matches `input` under any of the
/// four equivalence rules: exact normalized equality, query-initials against
/// stored name, query against stored initials, and initials against
/// initials.
///
/// The result preserves dataset row order and is unbounded; one person
/// legitimately matches across many years. A dataset without a resolvable
/// name column yields an empty result, not an error, as do records whose
/// name cell is missing.
#[instrument(level = "debug", skip(dataset), fields(records = dataset.records.len()))]
pub fn match_records<'a>(dataset: &'a Dataset, input: &str) -> Vec<&'a Record> {
    let Some(name_column) = dataset.resolve_column(NAME_NEEDLE) else {
        debug!("no name column resolved; returning no matches");
        return Vec::new();
    };

    let query = MatchQuery::new(input);
    let hits: Vec<&Record> = dataset
        .records
        .iter()
        .filter(|record| {
            record
                .value(name_column)
                .is_some_and(|stored| query.matches(stored))
        })
        .collect();
    debug!(name_column, hits = hits.len(), "name match finished");
    hits
}
