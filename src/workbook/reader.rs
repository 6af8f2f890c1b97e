//! ワークブック読み込み（calamine）
//!
//! 全シートを値と数式の両方で読み込む。calamineはブックのアクティブタブ
//! 番号を公開していないため、先頭のワークシートをアクティブシート
//! （マージ対象）として扱う。
//! 旧形式（.xls）は読み込み時に変換し、失敗は変換エラーとする。

use super::model::{FormulaCell, SheetData, TrackerWorkbook};
use crate::error::{Result, TrackerError};
use alarm_tracker_common::{Cell, TrackerGrid};
use calamine::{open_workbook, Data, Range, Reader, Xls, Xlsx};
use std::io::{Read, Seek};
use std::path::Path;

/// トラッカーの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerFormat {
    Xlsx,
    LegacyXls,
}

impl TrackerFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" => Some(TrackerFormat::Xlsx),
            "xls" => Some(TrackerFormat::LegacyXls),
            _ => None,
        }
    }
}

/// トラッカーのワークブックを読み込む
pub fn load_workbook(path: &Path) -> Result<TrackerWorkbook> {
    let file = path.display().to_string();
    if !path.is_file() {
        return Err(TrackerError::TrackerLoad {
            file,
            reason: "ファイルが存在しません".into(),
        });
    }

    let workbook = match TrackerFormat::from_path(path) {
        Some(TrackerFormat::Xlsx) => {
            let mut workbook = open_workbook::<Xlsx<_>, _>(path).map_err(|e| {
                TrackerError::TrackerLoad {
                    file: file.clone(),
                    reason: e.to_string(),
                }
            })?;
            read_all_sheets(&mut workbook)
                .map_err(|reason| TrackerError::TrackerLoad { file, reason })?
        }
        Some(TrackerFormat::LegacyXls) => load_legacy(path)?,
        None => {
            return Err(TrackerError::TrackerLoad {
                file,
                reason: "未対応の形式です（.xlsx / .xls）".into(),
            })
        }
    };

    let active = workbook.active();
    log::info!(
        "Loaded tracker {} (active '{}' of [{}], {} rows x {} columns)",
        path.display(),
        active.sheet_name(),
        workbook.sheet_names().join(", "),
        active.max_row(),
        active.max_column()
    );
    Ok(workbook)
}

/// 旧形式（.xls）の変換
pub fn load_legacy(path: &Path) -> Result<TrackerWorkbook> {
    let file = path.display().to_string();
    let mut workbook = open_workbook::<Xls<_>, _>(path).map_err(|e| TrackerError::Conversion {
        file: file.clone(),
        reason: e.to_string(),
    })?;
    read_all_sheets(&mut workbook).map_err(|reason| TrackerError::Conversion { file, reason })
}

fn read_all_sheets<RS, R>(workbook: &mut R) -> std::result::Result<TrackerWorkbook, String>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let names = workbook.sheet_names();
    let (first, rest) = names
        .split_first()
        .ok_or_else(|| "ワークシートがありません".to_string())?;

    let active = read_sheet(workbook, first)?;
    let mut others = Vec::with_capacity(rest.len());
    for name in rest {
        match read_sheet(workbook, name) {
            Ok(sheet) => others.push(sheet),
            // グラフシートなど値を持たないシート
            Err(e) => log::warn!("Skipping sheet '{}': {}", name, e),
        }
    }

    Ok(TrackerWorkbook::new(active, others))
}

fn read_sheet<RS, R>(workbook: &mut R, name: &str) -> std::result::Result<SheetData, String>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let range = workbook.worksheet_range(name).map_err(|e| e.to_string())?;
    let grid = range_to_grid(name, &range);

    let formulas = match workbook.worksheet_formula(name) {
        Ok(formulas) => formulas_of(&grid, &formulas),
        Err(e) => {
            log::warn!("Formulas of '{}' not readable, keeping values: {}", name, e);
            Vec::new()
        }
    };
    if !formulas.is_empty() {
        log::debug!("Sheet '{}': {} formulas", name, formulas.len());
    }

    Ok(SheetData { grid, formulas })
}

/// 数式のRangeを1始まりの数式セルに変換（キャッシュ値はグリッドから）
fn formulas_of(grid: &TrackerGrid, formulas: &Range<String>) -> Vec<FormulaCell> {
    let (start_row, start_col) = formulas.start().unwrap_or((0, 0));

    formulas
        .cells()
        .filter(|(_, _, formula)| !formula.is_empty())
        .map(|(r, c, formula)| {
            let row = start_row + r as u32 + 1;
            let col = start_col + c as u32 + 1;
            FormulaCell {
                row,
                col,
                formula: formula.trim_start_matches('=').to_string(),
                cached: grid.get(row, col).clone(),
            }
        })
        .collect()
}

/// calamineのRangeをグリッドに変換（Rangeの開始位置を考慮）
pub fn range_to_grid(sheet_name: &str, range: &Range<Data>) -> TrackerGrid {
    let mut grid = TrackerGrid::new(sheet_name);
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    for (r, c, data) in range.cells() {
        let cell = data_to_cell(data);
        if cell.is_empty() {
            continue;
        }
        // calamineは0始まり、グリッドは1始まり
        grid.set(start_row + r as u32 + 1, start_col + c as u32 + 1, cell);
    }

    grid
}

/// calamineのセル値を変換
pub fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}
