use std::collections::BTreeMap;

use serde::Serialize;

/// Header of the synthetic column holding each record's originating sheet.
/// The name mirrors the convention already used by roster workbooks, so the
/// year column resolves through the same substring lookup as every other
/// column.
pub const SOURCE_YEAR_COLUMN: &str = "Year(sheet)";

/// One row of the unified dataset.
///
/// Cells are an open-ended column → value mapping; any column may be absent
/// or empty for a given record. A cell holding `None` is the explicit
/// "no value" marker used both for empty cells and for columns the record's
/// source sheet never had. `source_year` is assigned once at load time and
/// never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Identifier of the sheet this record was read from.
    pub source_year: String,
    cells: BTreeMap<String, Option<String>>,
}

impl Record {
    /// Creates an empty record tagged with its originating sheet. The
    /// source-year cell is populated immediately so the tag also shows up as
    /// a regular column.
    pub fn new(source_year: impl Into<String>) -> Self {
        let source_year = source_year.into();
        let mut cells = BTreeMap::new();
        cells.insert(SOURCE_YEAR_COLUMN.to_string(), Some(source_year.clone()));
        Self { source_year, cells }
    }

    /// Inserts or replaces a cell value.
    pub fn insert(&mut self, column: impl Into<String>, value: Option<String>) {
        self.cells.insert(column.into(), value);
    }

    /// Returns the cell value for `column`, flattening both "column absent"
    /// and the explicit no-value marker to `None`.
    pub fn value(&self, column: &str) -> Option<&str> {
        self.cells.get(column).and_then(|cell| cell.as_deref())
    }

    /// Column → value mapping, including explicit no-value markers.
    pub fn cells(&self) -> &BTreeMap<String, Option<String>> {
        &self.cells
    }
}

/// The unified table built from every parsable sheet of a workbook.
///
/// `columns` is the union of per-sheet column names in first-seen order
/// across sheets. Records keep the concatenation order: sheets in workbook
/// order, rows in sheet order. Treated as read-only once constructed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolves a column by case-insensitive substring lookup over the
    /// first-seen column order. See [`crate::columns::find_column`].
    pub fn resolve_column(&self, needle: &str) -> Option<&str> {
        crate::columns::find_column(&self.columns, needle)
    }

    /// Records originating from the given sheet.
    pub fn records_for_year(&self, year: &str) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|record| record.source_year == year)
            .collect()
    }

    /// Distinct source years in first-seen order.
    pub fn years(&self) -> Vec<&str> {
        let mut years: Vec<&str> = Vec::new();
        for record in &self.records {
            if !years.contains(&record.source_year.as_str()) {
                years.push(&record.source_year);
            }
        }
        years
    }
}

/// Per-sheet load result. Skipped sheets are not failures; the reason is
/// retained for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SheetOutcome {
    Loaded { sheet: String, rows: usize },
    Skipped { sheet: String, reason: String },
}

impl SheetOutcome {
    pub fn sheet(&self) -> &str {
        match self {
            SheetOutcome::Loaded { sheet, .. } => sheet,
            SheetOutcome::Skipped { sheet, .. } => sheet,
        }
    }
}

/// A category → count summary ordered by descending count, optionally ending
/// in a synthetic long-tail bucket. Produced fresh per aggregation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CountsSummary {
    pub rows: Vec<CountRow>,
}

/// One ranked row of a [`CountsSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountRow {
    pub label: String,
    pub count: usize,
}

impl CountsSummary {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Count for an exact label, if present.
    pub fn count(&self, label: &str) -> Option<usize> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.count)
    }
}
