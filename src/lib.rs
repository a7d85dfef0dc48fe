//! Core library for the roster-search command line application.
//!
//! The library merges every sheet of a personnel workbook into one unified
//! dataset tagged by source year and answers three questions about it: which
//! records belong to a person whose name may be written inconsistently
//! across years, how position/title values distribute within a year, and how
//! party-membership groups break down within a year. Responsibilities stay
//! narrow and composable: workbook ingestion lives in [`io::excel_read`],
//! data representations in [`model`], name canonicalisation in [`names`],
//! the matcher in [`matching`], summaries in [`aggregate`], and the
//! session-level cache in [`session`]. The library never renders output;
//! presentation belongs to the binary.

pub mod aggregate;
pub mod columns;
pub mod error;
pub mod io;
pub mod lookup;
pub mod matching;
pub mod model;
pub mod names;
pub mod session;

pub use error::{Result, RosterError};
