//! トラッカーの保存（rust_xlsxwriter）
//!
//! 全シートの値と数式を書き出す。マージで値が変わったセルは値で上書きする。
//! 書式・列幅・結合セルは引き継がない。

use super::model::{SheetData, TrackerWorkbook};
use crate::error::{Result, TrackerError};
use alarm_tracker_common::Cell;
use rust_xlsxwriter::{Formula, Workbook, Worksheet};
use std::collections::HashSet;
use std::path::Path;

/// Excelの列数上限
const MAX_COLUMNS: u32 = 16_384;

pub fn save_workbook(workbook: &TrackerWorkbook, output_path: &Path) -> Result<()> {
    let to_persist_error = |reason: String| TrackerError::Persist {
        path: output_path.display().to_string(),
        reason,
    };

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| to_persist_error(e.to_string()))?;
        }
    }

    let mut xlsx = Workbook::new();
    for sheet in workbook.sheets() {
        let worksheet = xlsx.add_worksheet();
        write_sheet(worksheet, sheet).map_err(to_persist_error)?;
    }
    xlsx.save(output_path)
        .map_err(|e| to_persist_error(e.to_string()))?;

    log::info!(
        "Saved tracker to {} ({} sheets)",
        output_path.display(),
        workbook.sheets().len()
    );
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &SheetData) -> std::result::Result<(), String> {
    if !sheet.name().is_empty() {
        worksheet.set_name(sheet.name()).map_err(|e| e.to_string())?;
    }

    let mut formula_cells = HashSet::new();
    for cell in sheet.live_formulas() {
        let (r, c) = zero_based(cell.row, cell.col)?;
        let formula = Formula::new(&cell.formula).set_result(cell.cached.to_display_string());
        worksheet
            .write_formula(r, c, formula)
            .map_err(|e| format!("({}, {}): {}", cell.row, cell.col, e))?;
        formula_cells.insert((cell.row, cell.col));
    }

    for (row, col, cell) in sheet.grid.cells() {
        if formula_cells.contains(&(row, col)) {
            continue;
        }
        let (r, c) = zero_based(row, col)?;
        let written = match cell {
            Cell::Empty => continue,
            Cell::Text(s) => worksheet.write_string(r, c, s),
            Cell::Number(n) => worksheet.write_number(r, c, *n),
            Cell::Bool(b) => worksheet.write_boolean(r, c, *b),
        };
        written.map_err(|e| format!("({}, {}): {}", row, col, e))?;
    }

    Ok(())
}

/// グリッドは1始まり、rust_xlsxwriterは0始まり
fn zero_based(row: u32, col: u32) -> std::result::Result<(u32, u16), String> {
    if col > MAX_COLUMNS {
        return Err(format!("列 {} はExcelの上限（{}列）を超えています", col, MAX_COLUMNS));
    }
    Ok((row - 1, (col - 1) as u16))
}
