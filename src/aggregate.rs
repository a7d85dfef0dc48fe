//! Ranked summaries over a year-filtered record subset.

use serde::Serialize;
use tracing::debug;

use crate::columns::{PARTY_NEEDLE, POSITION_NEEDLE};
use crate::model::{CountRow, CountsSummary, Dataset, Record};

/// Label of the synthetic long-tail bucket.
pub const OTHERS_LABEL: &str = "Others";
/// Canonical label for records without a recognised party membership.
pub const NON_PARTY_LABEL: &str = "Non-Party";

/// Distinct categories kept before the remainder collapses into
/// [`OTHERS_LABEL`].
const TOP_POSITIONS: usize = 7;

/// Spellings that collapse to [`NON_PARTY_LABEL`], compared
/// case-insensitively against the trimmed cell value.
const NON_PARTY_SPELLINGS: [&str; 3] = ["non-party", "non party", "nonparty"];

/// Party summary plus the per-record normalized values, index-aligned with
/// the input records so callers can drill into a chosen category without
/// re-normalizing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyBreakdown {
    /// The resolved party-membership column.
    pub column: String,
    pub summary: CountsSummary,
    pub normalized: Vec<String>,
}

impl PartyBreakdown {
    /// Indices of the records whose normalized party equals `label`,
    /// compared case-insensitively.
    pub fn indices_for(&self, label: &str) -> Vec<usize> {
        let label = label.to_lowercase();
        self.normalized
            .iter()
            .enumerate()
            .filter(|(_, value)| value.to_lowercase() == label)
            .map(|(index, _)| index)
            .collect()
    }
}

/// Ranks position/title values by descending count. `None` when no
/// position column resolves; the feature is unavailable for this dataset,
/// not an error.
///
/// With more than seven distinct values the top seven are kept and the rest
/// are summed into an "Others" row appended last, even when its total would
/// outrank kept rows. Ties at the cutoff are broken by first appearance
/// among the records (stable sort).
pub fn position_distribution(dataset: &Dataset, records: &[&Record]) -> Option<CountsSummary> {
    let column = dataset.resolve_column(POSITION_NEEDLE)?;
    let mut ranked = count_in_first_seen_order(
        records
            .iter()
            .filter_map(|record| record.value(column).map(str::to_string)),
    );

    if ranked.len() > TOP_POSITIONS {
        let tail: usize = ranked[TOP_POSITIONS..].iter().map(|row| row.count).sum();
        ranked.truncate(TOP_POSITIONS);
        ranked.push(CountRow {
            label: OTHERS_LABEL.to_string(),
            count: tail,
        });
    }

    debug!(column, categories = ranked.len(), "position distribution built");
    Some(CountsSummary { rows: ranked })
}

/// Groups records by normalized party membership. `None` when no party
/// column resolves.
///
/// Missing, blank, and recognised no-party spellings all collapse into the
/// canonical "Non-Party" label; every other value keeps its trimmed original
/// casing.
pub fn party_distribution(dataset: &Dataset, records: &[&Record]) -> Option<PartyBreakdown> {
    let column = dataset.resolve_column(PARTY_NEEDLE)?;
    let normalized: Vec<String> = records
        .iter()
        .map(|record| normalize_party(record.value(column)))
        .collect();

    let rows = count_in_first_seen_order(normalized.iter().cloned());
    debug!(column, categories = rows.len(), "party distribution built");
    Some(PartyBreakdown {
        column: column.to_string(),
        summary: CountsSummary { rows },
        normalized,
    })
}

/// Canonicalises one party-membership cell.
pub fn normalize_party(value: Option<&str>) -> String {
    match value {
        None => NON_PARTY_LABEL.to_string(),
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty()
                || NON_PARTY_SPELLINGS
                    .iter()
                    .any(|spelling| trimmed.eq_ignore_ascii_case(spelling))
            {
                NON_PARTY_LABEL.to_string()
            } else {
                trimmed.to_string()
            }
        }
    }
}

/// Counts values into descending-count rows; equal counts keep the order in
/// which the values first appeared.
fn count_in_first_seen_order(values: impl Iterator<Item = String>) -> Vec<CountRow> {
    let mut rows: Vec<CountRow> = Vec::new();
    for value in values {
        match rows.iter_mut().find(|row| row.label == value) {
            Some(row) => row.count += 1,
            None => rows.push(CountRow {
                label: value,
                count: 1,
            }),
        }
    }
    rows.sort_by(|lhs, rhs| rhs.count.cmp(&lhs.count));
    rows
}
