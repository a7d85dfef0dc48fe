use std::path::Path;

use roster_search::aggregate;
use roster_search::io::excel_read::load_workbook;
use roster_search::lookup;
use roster_search::matching;
use roster_search::model::{Record, SOURCE_YEAR_COLUMN, SheetOutcome};
use roster_search::session::DatasetCache;
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

/// Writes one sheet per entry; the first row of each sheet is the header.
fn write_fixture(path: &Path, sheets: &[(&str, &[&[&str]])]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).expect("sheet name set");
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                worksheet
                    .write_string(row_idx as u32, col_idx as u16, *cell)
                    .expect("cell written");
            }
        }
    }
    workbook.save(path).expect("workbook saved");
}

#[test]
fn merges_sheets_and_unions_columns_in_first_seen_order() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("roster.xlsx");
    write_fixture(
        &path,
        &[
            (
                "2019",
                &[
                    &["Name", "Position/Title"],
                    &["Ivanov I.I.", "Clerk"],
                    &["Petrov P.P.", "Chair"],
                ],
            ),
            (
                "2020",
                &[
                    &["Name", "Party membership"],
                    &["Ivanov I.I.", "Communist"],
                ],
            ),
        ],
    );

    let report = load_workbook(&path).expect("workbook loaded");
    let dataset = report.dataset;

    assert_eq!(
        dataset.columns,
        vec!["Name", "Position/Title", SOURCE_YEAR_COLUMN, "Party membership"]
    );
    assert_eq!(dataset.records.len(), 3);
    assert_eq!(dataset.records[0].source_year, "2019");
    assert_eq!(dataset.records[2].source_year, "2020");
    assert_eq!(dataset.records[2].value(SOURCE_YEAR_COLUMN), Some("2020"));
    assert_eq!(dataset.years(), vec!["2019", "2020"]);

    // Columns absent from a record's source sheet carry an explicit
    // no-value marker rather than being silently omitted.
    let first = &dataset.records[0];
    assert_eq!(
        first.cells().get("Party membership"),
        Some(&None::<String>)
    );
    assert_eq!(first.value("Party membership"), None);
    assert_eq!(dataset.records[2].value("Position/Title"), None);
}

#[test]
fn unusable_sheet_is_skipped_with_reason_retained() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("roster.xlsx");
    // "2019" has no header row at all; "2020" is fine.
    write_fixture(
        &path,
        &[
            ("2019", &[]),
            ("2020", &[&["Name"], &["Ivanov I.I."]]),
        ],
    );

    let report = load_workbook(&path).expect("workbook loaded");
    assert_eq!(report.dataset.records.len(), 1);
    assert_eq!(report.dataset.records[0].source_year, "2020");

    let skipped: Vec<&SheetOutcome> = report.skipped().collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].sheet(), "2019");
    match skipped[0] {
        SheetOutcome::Skipped { reason, .. } => assert!(!reason.is_empty()),
        other => panic!("expected skipped outcome, got {other:?}"),
    }
}

#[test]
fn byte_stream_sources_load_like_paths() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("roster.xlsx");
    write_fixture(&path, &[("2020", &[&["Name"], &["Ivanov I.I."]])]);

    let bytes = std::fs::read(&path).expect("workbook bytes");
    let report = roster_search::io::excel_read::load_from_reader(std::io::Cursor::new(bytes))
        .expect("workbook loaded from memory");
    assert_eq!(report.dataset, load_workbook(&path).expect("path load").dataset);
}

#[test]
fn workbook_with_no_parsable_sheets_yields_empty_dataset() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("empty.xlsx");
    write_fixture(&path, &[("2019", &[]), ("2020", &[])]);

    let report = load_workbook(&path).expect("workbook loaded");
    assert!(report.dataset.is_empty());
    assert!(report.dataset.columns.is_empty());
    assert_eq!(report.skipped().count(), 2);
}

#[test]
fn full_name_search_finds_initials_record() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("roster.xlsx");
    write_fixture(
        &path,
        &[(
            "2020",
            &[&["Full Name (Latin)"], &["Ivanov I.I."], &["Petrov P.P."]],
        )],
    );

    let dataset = load_workbook(&path).expect("workbook loaded").dataset;
    let hits = matching::match_records(&dataset, "Ivanov Ivan Ivanovich");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].source_year, "2020");
    assert_eq!(hits[0].value("Full Name (Latin)"), Some("Ivanov I.I."));
}

#[test]
fn search_matches_across_multiple_years() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("roster.xlsx");
    write_fixture(
        &path,
        &[
            ("2019", &[&["Name"], &["Nemchinov Vasily Sergeevich"]]),
            ("2020", &[&["Name"], &["Nemchinov V.S."], &["Orlov O.O."]]),
            ("2021", &[&["Name"], &["NEMCHINOV  VASILY SERGEEVICH"]]),
        ],
    );

    let dataset = load_workbook(&path).expect("workbook loaded").dataset;
    let hits = matching::match_records(&dataset, "Nemchinov V.S.");
    let years: Vec<&str> = hits.iter().map(|hit| hit.source_year.as_str()).collect();
    assert_eq!(years, vec!["2019", "2020", "2021"]);
}

#[test]
fn aggregations_work_over_a_loaded_year_subset() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("roster.xlsx");
    write_fixture(
        &path,
        &[
            (
                "2020",
                &[
                    &["Name", "Position/Title", "Party membership"],
                    &["Ivanov I.I.", "Clerk", "Communist"],
                    &["Petrov P.P.", "Clerk", ""],
                    &["Orlov O.O.", "Chair", "non-party"],
                ],
            ),
            (
                "2021",
                &[
                    &["Name", "Position/Title", "Party membership"],
                    &["Ivanov I.I.", "Director", "Communist"],
                ],
            ),
        ],
    );

    let dataset = load_workbook(&path).expect("workbook loaded").dataset;
    let records = dataset.records_for_year("2020");

    let positions =
        aggregate::position_distribution(&dataset, &records).expect("position column resolves");
    assert_eq!(positions.count("Clerk"), Some(2));
    assert_eq!(positions.count("Chair"), Some(1));
    assert_eq!(positions.count("Director"), None);

    let parties =
        aggregate::party_distribution(&dataset, &records).expect("party column resolves");
    assert_eq!(parties.summary.count("Non-Party"), Some(2));
    assert_eq!(parties.summary.count("Communist"), Some(1));
    let non_party_rows = parties.indices_for("non-party");
    assert_eq!(non_party_rows.len(), 2);
    assert_eq!(records[non_party_rows[0]].value("Name"), Some("Petrov P.P."));
}

#[test]
fn standalone_lookup_is_exact_only_and_tags_years() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("roster.xlsx");
    write_fixture(
        &path,
        &[
            ("2019", &[&["Name"], &["Ivanov Ivan Ivanovich"]]),
            ("2020", &[&["Name"], &["Ivanov I.I."]]),
        ],
    );

    let hits = lookup::search_person(&path, "  ivanov ivan ivanovich ")
        .expect("lookup ran")
        .expect("a row matched");
    assert_eq!(hits.records.len(), 1);
    assert_eq!(hits.records[0].source_year, "2019");

    // No initials equivalence here: the full-name query does not reach the
    // 2020 initials row, and an unknown name is a valid empty outcome.
    let miss = lookup::search_person(&path, "Ivanov I. I.").expect("lookup ran");
    assert!(miss.is_none());
}

#[test]
fn standalone_lookup_preserves_sheet_column_order() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("roster.xlsx");
    write_fixture(
        &path,
        &[(
            "2020",
            &[
                &["No.", "Name", "Position/Title"],
                &["17", "Ivanov I.I.", "Clerk"],
            ],
        )],
    );

    let hits = lookup::search_person(&path, "Ivanov I.I.")
        .expect("lookup ran")
        .expect("a row matched");
    // Sheet order, not alphabetical: transposed output renders fields as
    // they appear in the workbook.
    assert_eq!(
        hits.columns,
        vec!["No.", "Name", "Position/Title", SOURCE_YEAR_COLUMN]
    );
    assert_eq!(hits.records[0].value("No."), Some("17"));
}

#[test]
fn dataset_cache_hits_on_same_content_and_replaces_on_new_content() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("roster.xlsx");
    write_fixture(&path, &[("2020", &[&["Name"], &["Ivanov I.I."]])]);

    let mut cache = DatasetCache::new();
    assert!(cache.cached().is_none());

    let first = cache.load(&path).expect("first load").clone();
    assert_eq!(first.records.len(), 1);
    let second = cache.load(&path).expect("cached load").clone();
    assert_eq!(first, second);

    // New upload replaces the single entry wholesale.
    write_fixture(
        &path,
        &[(
            "2021",
            &[&["Name"], &["Ivanov I.I."], &["Petrov P.P."]],
        )],
    );
    let third = cache.load(&path).expect("reload after replace");
    assert_eq!(third.records.len(), 2);
    assert_eq!(third.records[0].source_year, "2021");

    cache.clear();
    assert!(cache.cached().is_none());
}

#[test]
fn dataset_cache_keeps_previous_entry_when_reload_fails() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("roster.xlsx");
    write_fixture(&path, &[("2020", &[&["Name"], &["Ivanov I.I."]])]);

    let mut cache = DatasetCache::new();
    cache.load(&path).expect("first load");

    // Replacing the source with something unopenable fails the reload but
    // must not evict the dataset already held by the session.
    std::fs::write(&path, b"definitely not a workbook").expect("file replaced");
    assert!(cache.load(&path).is_err());

    let cached = cache.cached().expect("previous dataset retained");
    assert_eq!(cached.records.len(), 1);
    assert_eq!(cached.records[0].source_year, "2020");
}

#[test]
fn records_are_plain_data_for_presentation_layers() {
    let mut record = Record::new("2020");
    record.insert("Name", Some("Ivanov I.I.".to_string()));
    record.insert("Party membership", None);

    let json = serde_json::to_value(&record).expect("record serialises");
    assert_eq!(json["source_year"], "2020");
    assert_eq!(json["cells"]["Name"], "Ivanov I.I.");
    assert_eq!(json["cells"]["Party membership"], serde_json::Value::Null);
}
