//! トラッカーのセルグリッド
//!
//! 行・列は Excel と同じ1始まり。範囲外の読み出しは空セル、
//! 範囲外への書き込みはグリッドを拡張する。

use crate::types::Cell;

static EMPTY: Cell = Cell::Empty;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerGrid {
    sheet_name: String,
    rows: Vec<Vec<Cell>>,
    max_column: u32,
}

impl TrackerGrid {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            rows: Vec::new(),
            max_column: 0,
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// 最終行（データが無ければ0）
    pub fn max_row(&self) -> u32 {
        self.rows.len() as u32
    }

    /// 最終列（データが無ければ0）
    pub fn max_column(&self) -> u32 {
        self.max_column
    }

    pub fn get(&self, row: u32, col: u32) -> &Cell {
        if row == 0 || col == 0 {
            return &EMPTY;
        }
        self.rows
            .get((row - 1) as usize)
            .and_then(|r| r.get((col - 1) as usize))
            .unwrap_or(&EMPTY)
    }

    /// セルに書き込み（row, col は1以上）
    pub fn set(&mut self, row: u32, col: u32, value: impl Into<Cell>) {
        if row == 0 || col == 0 {
            return;
        }
        let (r, c) = ((row - 1) as usize, (col - 1) as usize);
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        let cells = &mut self.rows[r];
        if cells.len() <= c {
            cells.resize(c + 1, Cell::Empty);
        }
        cells[c] = value.into();
        self.max_column = self.max_column.max(col);
    }

    /// 空でないセルを (row, col, cell) で列挙
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, &Cell)> {
        self.rows.iter().enumerate().flat_map(|(r, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| !matches!(cell, Cell::Empty))
                .map(move |(c, cell)| (r as u32 + 1, c as u32 + 1, cell))
        })
    }
}
