//! トラッカー更新の統合テスト
//!
//! rust_xlsxwriterで実ファイルのトラッカー・アラームログを作成し、
//! 取込 → 更新 → 保存 → 再読み込みまでを検証する。

use alarm_tracker::config::Config;
use alarm_tracker::extractor;
use alarm_tracker::ingest::{self, SourceFile};
use alarm_tracker::updater::TrackerUpdater;
use alarm_tracker::workbook::load_workbook;
use alarm_tracker_common::{column_index, Cell, ExtractedBatch, MergePolicy, TrackerGrid};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const COMMENT_COL: u32 = 293;

/// March（GS〜HW）の見出しと GDB-101 を持つトラッカー
fn create_tracker(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Tracker").unwrap();
    sheet.write_string(0, 0, "Fire & Gas alarm tracker").unwrap();

    let march_start = (column_index("GS").unwrap() - 1) as u16;
    for day in 0..31u16 {
        sheet.write_number(10, march_start + day, (day + 1) as f64).unwrap();
    }
    sheet.write_string(9, 292, "COMMENTS").unwrap();
    sheet.write_string(9, 293, "ACTION BY").unwrap();
    sheet.write_string(9, 294, "REMARKS").unwrap();

    sheet.write_string(11, 1, "GDB-101").unwrap();
    sheet.write_string(11, 2, "Gas compressor").unwrap();
    for col in 4..10u16 {
        sheet.write_string(11, col, "NO").unwrap();
    }
    sheet.write_string(11, 292, "01/03/2024 OTHERS").unwrap();
    sheet.write_formula(11, 3, "=1+1").unwrap();

    let summary = workbook.add_worksheet();
    summary.set_name("Summary").unwrap();
    summary.write_string(0, 0, "Open alarms").unwrap();
    summary.write_formula(0, 1, "=COUNTA(Tracker!B12:B100)").unwrap();

    workbook.save(path).unwrap();
}

/// アラームログ（シート名は All_DD-MM-YYYY）
fn create_alarm_log(path: &Path, sheet_name: &str, rows: &[(&str, &str, &str, &str)]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name).unwrap();
    for (col, header) in ["DATE", "TAG", "DESCRIPTION", "ALARM DESC2", "ACT/UNACK"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (i, (tag, description, alarm, status)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, "2024-03-15 08:00").unwrap();
        sheet.write_string(row, 1, *tag).unwrap();
        sheet.write_string(row, 2, *description).unwrap();
        sheet.write_string(row, 3, *alarm).unwrap();
        sheet.write_string(row, 4, *status).unwrap();
    }
    workbook.save(path).unwrap();
}

fn day_column(day: u32) -> u32 {
    column_index("GS").unwrap() + day - 1
}

fn status_values(grid: &TrackerGrid, row: u32) -> Vec<String> {
    Config::default()
        .layout
        .status_columns
        .all()
        .iter()
        .map(|&col| grid.get(row, col).to_display_string())
        .collect()
}

fn batch_for(path: &Path) -> ExtractedBatch {
    let source = SourceFile::from_path(path).unwrap();
    extractor::extract_batch(&source, &Config::default().layout).unwrap()
}

struct Fixture {
    _dir: tempfile::TempDir,
    tracker: PathBuf,
    log: PathBuf,
    out_dir: PathBuf,
}

fn fixture(rows: &[(&str, &str, &str, &str)]) -> Fixture {
    let dir = tempdir().expect("Failed to create temp dir");
    let tracker = dir.path().join("tracker.xlsx");
    let log = dir.path().join("alarm_log_2024-03-15.xlsx");
    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();

    create_tracker(&tracker);
    create_alarm_log(&log, "All_15-03-2024", rows);

    Fixture {
        _dir: dir,
        tracker,
        log,
        out_dir,
    }
}

#[test]
fn test_extract_filters_keywords() {
    let fx = fixture(&[
        ("GDB-101", "Gas compressor", "Flame Detection", "ACT"),
        ("PT-330", "Pressure", "High Gas Level Detection", "ACT"),
        ("NFD-12", "Control room", "SMOKE Detection", "UNACK"),
    ]);

    let batch = batch_for(&fx.log);

    let tags: Vec<&str> = batch.records.iter().map(|r| r.tag.as_str()).collect();
    assert_eq!(tags, vec!["GDB-101", "NFD-12"]);
    assert_eq!(batch.formatted_date(), "15/03/2024");
    assert_eq!(batch.records[1].status, Cell::text("UNACK"));
}

#[test]
fn test_latest_updates_existing_tag() {
    let fx = fixture(&[("GDB-101", "Gas compressor", "Flame Detection", "ACT")]);
    let updater = TrackerUpdater::new(Config::default());

    let outcome = updater
        .run(&fx.tracker, &[batch_for(&fx.log)], MergePolicy::Latest, &fx.out_dir)
        .unwrap();

    assert_eq!(outcome.output_path, fx.out_dir.join("updated_latest_tracker.xlsx"));
    let workbook = load_workbook(&outcome.output_path).unwrap();
    let grid = workbook.active();
    assert_eq!(grid.get(12, day_column(15)), &Cell::text("ACT"));
    assert_eq!(status_values(&grid, 12), vec!["NO", "NO", "YES", "NO", "NO", "NO"]);
    assert_eq!(grid.get(12, 10), &Cell::text("YES"));
    assert_eq!(
        grid.get(12, COMMENT_COL),
        &Cell::text("01/03/2024 OTHERS\n15/03/2024 FLAME")
    );
    // 他のセルは保持される
    assert_eq!(grid.get(1, 1), &Cell::text("Fire & Gas alarm tracker"));
    assert_eq!(grid.max_row(), 12);
}

#[test]
fn test_latest_appends_new_tag() {
    let fx = fixture(&[("GDB-202", "Boiler house", "Flame Detection", "ACT")]);
    let updater = TrackerUpdater::new(Config::default());

    let outcome = updater
        .run(&fx.tracker, &[batch_for(&fx.log)], MergePolicy::Latest, &fx.out_dir)
        .unwrap();

    assert_eq!(outcome.summary.rows_appended, 1);
    let workbook = load_workbook(&outcome.output_path).unwrap();
    let grid = workbook.active();
    assert_eq!(grid.get(13, 2), &Cell::text("GDB-202"));
    assert_eq!(grid.get(13, 3), &Cell::text("Boiler house"));
    assert_eq!(grid.get(13, day_column(15)), &Cell::text("ACT"));
    assert_eq!(grid.get(13, COMMENT_COL), &Cell::text("15/03/2024 FLAME"));
    assert_eq!(status_values(&grid, 13), vec!["NO", "NO", "YES", "NO", "NO", "NO"]);
    // 既存行はRESETのみ
    assert_eq!(status_values(&grid, 12), vec!["NO"; 6]);
}

#[test]
fn test_backlog_never_sets_yes() {
    let fx = fixture(&[
        ("GDB-101", "Gas compressor", "Flame Detection", "ACT"),
        ("GDB-202", "Boiler house", "High High Gas level Detection", "UNACK"),
    ]);
    let updater = TrackerUpdater::new(Config::default());

    let outcome = updater
        .run(&fx.tracker, &[batch_for(&fx.log)], MergePolicy::Backlog, &fx.out_dir)
        .unwrap();

    assert_eq!(outcome.output_path, fx.out_dir.join("updated_backlog_tracker.xlsx"));
    let workbook = load_workbook(&outcome.output_path).unwrap();
    let grid = workbook.active();
    assert_eq!(grid.get(12, day_column(15)), &Cell::text("ACT"));
    assert_eq!(
        grid.get(12, COMMENT_COL),
        &Cell::text("01/03/2024 OTHERS\n15/03/2024 FLAME")
    );
    assert_eq!(status_values(&grid, 12), vec!["NO"; 6]);
    assert_eq!(status_values(&grid, 13), vec!["NO"; 6]);
    assert_eq!(grid.get(13, COMMENT_COL), &Cell::text("15/03/2024 HH_ALM"));
}

#[test]
fn test_backlog_from_folder_in_date_order() {
    let dir = tempdir().unwrap();
    let logs = dir.path().join("logs");
    std::fs::create_dir(&logs).unwrap();
    let tracker = dir.path().join("tracker.xlsx");
    create_tracker(&tracker);
    create_alarm_log(
        &logs.join("alarm_log_2024-03-17.xlsx"),
        "All_17-03-2024",
        &[("GDB-101", "Gas compressor", "SMOKE Detection", "UNACK")],
    );
    create_alarm_log(
        &logs.join("alarm_log_2024-03-16.xlsx"),
        "All_16-03-2024",
        &[("GDB-101", "Gas compressor", "Invalidity State", "ACT")],
    );

    let batches: Vec<ExtractedBatch> = ingest::collect_sources(&logs)
        .unwrap()
        .iter()
        .map(|path| batch_for(path))
        .collect();
    let outcome = TrackerUpdater::new(Config::default())
        .run(&tracker, &batches, MergePolicy::Backlog, dir.path())
        .unwrap();

    let workbook = load_workbook(&outcome.output_path).unwrap();
    let grid = workbook.active();
    assert_eq!(grid.get(12, day_column(16)), &Cell::text("ACT"));
    assert_eq!(grid.get(12, day_column(17)), &Cell::text("UNACK"));
    assert_eq!(
        grid.get(12, COMMENT_COL),
        &Cell::text("01/03/2024 OTHERS\n16/03/2024 INVALIDITY\n17/03/2024 BEAM")
    );
    assert_eq!(outcome.summary.batches, 2);
    assert_eq!(outcome.summary.rows_updated, 2);
}

#[test]
fn test_rerun_never_duplicates_rows() {
    let fx = fixture(&[("NSD-7", "Battery room", "SMOKE Detection", "ACT")]);
    let updater = TrackerUpdater::new(Config::default());
    let batch = batch_for(&fx.log);

    let first = updater
        .run(&fx.tracker, &[batch.clone()], MergePolicy::Backlog, &fx.out_dir)
        .unwrap();
    let second_out = fx.out_dir.join("second.xlsx");
    let second = updater
        .run(&first.output_path, &[batch], MergePolicy::Backlog, &second_out)
        .unwrap();

    let workbook = load_workbook(&second.output_path).unwrap();
    let grid = workbook.active();
    let rows: Vec<u32> = (12..=grid.max_row())
        .filter(|&row| grid.get(row, 2) == &Cell::text("NSD-7"))
        .collect();
    assert_eq!(rows, vec![13]);
    assert_eq!(
        grid.get(13, COMMENT_COL),
        &Cell::text("15/03/2024 BEAM\n15/03/2024 BEAM")
    );
}

#[test]
fn test_original_tracker_untouched() {
    let fx = fixture(&[("GDB-101", "Gas compressor", "Flame Detection", "ACT")]);
    let before = std::fs::read(&fx.tracker).unwrap();

    TrackerUpdater::new(Config::default())
        .run(&fx.tracker, &[batch_for(&fx.log)], MergePolicy::Latest, &fx.out_dir)
        .unwrap();

    assert_eq!(std::fs::read(&fx.tracker).unwrap(), before);
}

#[test]
fn test_other_sheets_and_formulas_survive() {
    let fx = fixture(&[("GDB-202", "Boiler house", "SMOKE Detection", "ACT")]);

    let outcome = TrackerUpdater::new(Config::default())
        .run(&fx.tracker, &[batch_for(&fx.log)], MergePolicy::Backlog, &fx.out_dir)
        .unwrap();

    let workbook = load_workbook(&outcome.output_path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Tracker", "Summary"]);

    let tracker_formulas: Vec<(u32, u32, &str)> = workbook.sheets()[0]
        .formulas
        .iter()
        .map(|f| (f.row, f.col, f.formula.as_str()))
        .collect();
    assert_eq!(tracker_formulas, vec![(12, 4, "1+1")]);

    let summary = &workbook.sheets()[1];
    assert_eq!(summary.grid.get(1, 1), &Cell::text("Open alarms"));
    assert_eq!(summary.formulas.len(), 1);
    assert_eq!(summary.formulas[0].formula, "COUNTA(Tracker!B12:B100)");

    // 追加行はアクティブシートのみ
    assert_eq!(workbook.active().get(13, 2), &Cell::text("GDB-202"));
    assert_eq!(summary.grid.max_row(), 1);
}
