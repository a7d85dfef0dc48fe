use std::collections::HashSet;
use std::io::{Read, Seek};
use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook_auto};
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::model::{Dataset, Record, SOURCE_YEAR_COLUMN, SheetOutcome};

/// Result of loading a workbook: the unified dataset plus the per-sheet
/// outcomes, with skip reasons retained for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub dataset: Dataset,
    pub sheets: Vec<SheetOutcome>,
}

impl LoadReport {
    /// Sheets that were skipped, with their reasons.
    pub fn skipped(&self) -> impl Iterator<Item = &SheetOutcome> {
        self.sheets
            .iter()
            .filter(|outcome| matches!(outcome, SheetOutcome::Skipped { .. }))
    }
}

/// Header row plus data rows of one parsed sheet. Cells are already reduced
/// to optional text; `None` marks empty cells.
pub(crate) struct SheetRows {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Loads every sheet of the workbook at `path` into one unified dataset.
///
/// Each parsed row is tagged with its sheet name as `source_year`; sheets
/// that fail to parse are skipped with the reason recorded, never failing
/// the overall load. A workbook with zero parsable sheets yields an empty
/// dataset. Only failure to open the workbook at all is an error.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_workbook(path: &Path) -> Result<LoadReport> {
    let workbook = open_workbook_auto(path)?;
    load_sheets(workbook)
}

/// Same as [`load_workbook`] but for an in-memory or streamed `.xlsx`
/// source, e.g. bytes received from an upload widget.
pub fn load_from_reader<R: Read + Seek>(reader: R) -> Result<LoadReport> {
    let workbook = Xlsx::new(reader).map_err(calamine::Error::from)?;
    load_sheets(workbook)
}

fn load_sheets<R>(mut workbook: R) -> Result<LoadReport>
where
    R: Reader,
    calamine::Error: From<R::Error>,
{
    let sheet_names = workbook.sheet_names().to_vec();
    let mut parsed: Vec<(String, SheetRows)> = Vec::new();
    let mut outcomes = Vec::with_capacity(sheet_names.len());

    for sheet in sheet_names {
        let range = match workbook.worksheet_range(&sheet) {
            Some(Ok(range)) => range,
            Some(Err(error)) => {
                let reason = calamine::Error::from(error).to_string();
                warn!(%sheet, %reason, "skipping unreadable sheet");
                outcomes.push(SheetOutcome::Skipped { sheet, reason });
                continue;
            }
            None => {
                let reason = "sheet not found in workbook".to_string();
                warn!(%sheet, %reason, "skipping unreadable sheet");
                outcomes.push(SheetOutcome::Skipped { sheet, reason });
                continue;
            }
        };

        match parse_range(&range) {
            Some(table) => {
                debug!(%sheet, rows = table.rows.len(), "parsed sheet");
                outcomes.push(SheetOutcome::Loaded {
                    sheet: sheet.clone(),
                    rows: table.rows.len(),
                });
                parsed.push((sheet, table));
            }
            None => {
                let reason = "sheet has no header row".to_string();
                warn!(%sheet, %reason, "skipping empty sheet");
                outcomes.push(SheetOutcome::Skipped { sheet, reason });
            }
        }
    }

    let dataset = assemble(parsed);
    debug!(
        records = dataset.records.len(),
        columns = dataset.columns.len(),
        "dataset assembled"
    );
    Ok(LoadReport {
        dataset,
        sheets: outcomes,
    })
}

/// Splits a sheet range into header row and data rows. Returns `None` for a
/// sheet without a header row; columns with an empty header are dropped.
pub(crate) fn parse_range(range: &Range<DataType>) -> Option<SheetRows> {
    let mut rows = range.rows();
    let header_row = rows.next()?;

    let mut columns: Vec<(usize, String)> = Vec::new();
    for (index, cell) in header_row.iter().enumerate() {
        let header = cell_to_string(Some(cell));
        let header = header.trim();
        if !header.is_empty() {
            columns.push((index, header.to_string()));
        }
    }
    if columns.is_empty() {
        return None;
    }

    let data = rows
        .map(|row| {
            columns
                .iter()
                .map(|(index, _)| cell_to_value(row.get(*index)))
                .collect()
        })
        .collect();

    Some(SheetRows {
        headers: columns.into_iter().map(|(_, header)| header).collect(),
        rows: data,
    })
}

/// Concatenates parsed sheets in processing order, tagging every record with
/// its sheet and building the first-seen union of column names. Records are
/// backfilled with explicit no-value markers for union columns their source
/// sheet never had.
fn assemble(sheets: Vec<(String, SheetRows)>) -> Dataset {
    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut records: Vec<Record> = Vec::new();
    let year_column = SOURCE_YEAR_COLUMN.to_string();

    for (sheet, table) in sheets {
        for header in table.headers.iter().chain(std::iter::once(&year_column)) {
            if seen.insert(header.clone()) {
                columns.push(header.clone());
            }
        }

        for row in table.rows {
            let mut record = Record::new(sheet.clone());
            for (header, cell) in table.headers.iter().zip(row) {
                record.insert(header.clone(), cell);
            }
            // The tag wins over any same-named column in the source sheet.
            record.insert(year_column.clone(), Some(sheet.clone()));
            records.push(record);
        }
    }

    for record in &mut records {
        for column in &columns {
            if !record.cells().contains_key(column) {
                record.insert(column.clone(), None);
            }
        }
    }

    Dataset { columns, records }
}

/// Reduces a cell to optional text; empty and whitespace-only cells become
/// the explicit no-value marker.
pub(crate) fn cell_to_value(cell: Option<&DataType>) -> Option<String> {
    let text = cell_to_string(cell);
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => {
            // Whole floats render without the trailing ".0" so numeric years
            // and ids read back as they were typed.
            if value.fract() == 0.0 {
                (*value as i64).to_string()
            } else {
                value.to_string()
            }
        }
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
