//! Standalone per-sheet lookup.
//!
//! A minimal variant of the matcher for one-off, scripted use: exact
//! case/whitespace-insensitive equality only, no initials logic, applied
//! sheet by sheet rather than over the merged dataset.

use std::collections::HashSet;
use std::path::Path;

use calamine::{Reader, open_workbook_auto};
use tracing::{debug, instrument, warn};

use crate::columns::{NAME_NEEDLE, find_column};
use crate::error::Result;
use crate::io::excel_read::parse_range;
use crate::model::{Dataset, Record, SOURCE_YEAR_COLUMN};

/// Searches every sheet of the workbook for rows whose name cell equals
/// `search_name` after trimming and lowercasing both sides. Matches are
/// tagged with their sheet as `source_year` and returned as a small dataset
/// whose column order follows the contributing sheets, so callers can render
/// the rows transposed for inspection.
///
/// Sheets without a resolvable name column are ignored; per-sheet read
/// errors are logged and skipped. `Ok(None)` means nothing matched anywhere
/// and is a valid, non-error outcome.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn search_person(path: &Path, search_name: &str) -> Result<Option<Dataset>> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_vec();
    let target = search_name.trim().to_lowercase();
    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut records: Vec<Record> = Vec::new();

    for sheet in sheet_names {
        let range = match workbook.worksheet_range(&sheet) {
            Some(Ok(range)) => range,
            Some(Err(error)) => {
                warn!(%sheet, %error, "skipping unreadable sheet");
                continue;
            }
            None => continue,
        };
        let Some(table) = parse_range(&range) else {
            continue;
        };
        let Some(name_column) = find_column(&table.headers, NAME_NEEDLE) else {
            debug!(%sheet, "no name column; sheet ignored");
            continue;
        };
        let name_index = table
            .headers
            .iter()
            .position(|header| header.as_str() == name_column);
        let Some(name_index) = name_index else {
            continue;
        };

        let mut sheet_hit = false;
        for row in &table.rows {
            let stored = row.get(name_index).and_then(|cell| cell.as_deref());
            let matched = stored
                .map(|value| value.trim().to_lowercase() == target)
                .unwrap_or(false);
            if matched {
                sheet_hit = true;
                let mut record = Record::new(sheet.clone());
                for (header, cell) in table.headers.iter().zip(row) {
                    record.insert(header.clone(), cell.clone());
                }
                records.push(record);
            }
        }

        // Only sheets that contributed rows shape the output column order.
        if sheet_hit {
            let year_column = SOURCE_YEAR_COLUMN.to_string();
            for header in table.headers.iter().chain(std::iter::once(&year_column)) {
                if seen.insert(header.clone()) {
                    columns.push(header.clone());
                }
            }
        }
    }

    if records.is_empty() {
        debug!("no rows matched");
        return Ok(None);
    }

    for record in &mut records {
        for column in &columns {
            if !record.cells().contains_key(column) {
                record.insert(column.clone(), None);
            }
        }
    }

    debug!(hits = records.len(), "lookup finished");
    Ok(Some(Dataset { columns, records }))
}
