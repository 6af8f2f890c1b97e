//! 読み込んだトラッカーのワークブック
//!
//! 全シートを保持し、マージ対象はアクティブシート（先頭）のグリッドのみ。
//! 数式は読み込み時のキャッシュ値と一緒に保持し、保存時に
//! セルがマージで書き換えられていなければ数式のまま書き戻す。

use alarm_tracker_common::{Cell, TrackerGrid};

/// 数式セル（行・列は1始まり）
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaCell {
    pub row: u32,
    pub col: u32,
    /// 先頭の "=" を含まない数式
    pub formula: String,
    /// 読み込み時のキャッシュ値
    pub cached: Cell,
}

/// 1シート分
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub grid: TrackerGrid,
    pub formulas: Vec<FormulaCell>,
}

impl SheetData {
    pub fn new(grid: TrackerGrid) -> Self {
        Self {
            grid,
            formulas: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.grid.sheet_name()
    }

    /// まだ数式として書き戻せるセル（値が読み込み時から変わっていない）
    pub fn live_formulas(&self) -> impl Iterator<Item = &FormulaCell> {
        self.formulas
            .iter()
            .filter(|f| self.grid.get(f.row, f.col) == &f.cached)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerWorkbook {
    sheets: Vec<SheetData>,
}

impl TrackerWorkbook {
    /// 先頭のシートがアクティブシート（1シート以上必須）
    pub fn new(active: SheetData, others: Vec<SheetData>) -> Self {
        let mut sheets = Vec::with_capacity(others.len() + 1);
        sheets.push(active);
        sheets.extend(others);
        Self { sheets }
    }

    pub fn sheets(&self) -> &[SheetData] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(SheetData::name).collect()
    }

    pub fn active(&self) -> &TrackerGrid {
        &self.sheets[0].grid
    }

    pub fn active_mut(&mut self) -> &mut TrackerGrid {
        &mut self.sheets[0].grid
    }
}
