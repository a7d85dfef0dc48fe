//! Column resolution over the unified table.
//!
//! Roster workbooks never agree on exact headers ("Name", "Full Name
//! (Latin)", "Position/Title", ...), so columns are located at runtime by
//! case-insensitive substring lookup rather than by position or exact name.

/// Substring identifying the person-name column.
pub const NAME_NEEDLE: &str = "name";
/// Substring identifying the position/title column.
pub const POSITION_NEEDLE: &str = "position";
/// Substring identifying the party-membership column.
pub const PARTY_NEEDLE: &str = "party";
/// Substring identifying the synthetic source-year column.
pub const YEAR_NEEDLE: &str = "year(sheet)";

/// Returns the first column whose name contains `needle`, comparing
/// case-insensitively and scanning in first-seen column order. `None` when
/// nothing matches.
///
/// Known limitation: when several headers match (say "Name (English)" and
/// "Name (Local)") the first in column order wins and the rest are silently
/// ignored.
pub fn find_column<'a>(columns: &'a [String], needle: &str) -> Option<&'a str> {
    let needle = needle.to_lowercase();
    columns
        .iter()
        .find(|column| column.to_lowercase().contains(&needle))
        .map(String::as_str)
}
