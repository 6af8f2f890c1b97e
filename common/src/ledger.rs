//! タグ台帳（タグ → 行）とupsert
//!
//! ## 処理フロー
//! 1. タグ行（データ開始行〜最終行）から索引を1回だけ作成
//! 2. 既存タグは該当行を更新、新規タグは最終行の次に追加
//! 3. latest の場合のみ、分類した種別のステータス列を YES にする
//!
//! 同じタグが複数行にある場合は後の行が索引に残る。

use crate::classifier::AlarmCategory;
use crate::grid::TrackerGrid;
use crate::layout::TrackerLayout;
use crate::types::{Cell, ExtractedRecord, MergePolicy, STATUS_NO, STATUS_YES};
use std::collections::HashMap;

/// 1バッチ内で共通の書き込み先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub day_column: u32,
    pub comment_column: u32,
}

/// upsertの結果（行番号）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Updated(u32),
    Appended(u32),
}

impl Upsert {
    pub fn row(&self) -> u32 {
        match self {
            Upsert::Updated(row) | Upsert::Appended(row) => *row,
        }
    }
}

pub struct TagLedger<'a> {
    layout: &'a TrackerLayout,
    policy: MergePolicy,
    index: HashMap<String, u32>,
}

impl<'a> TagLedger<'a> {
    /// 既存のタグ行から索引を作成
    pub fn build(grid: &TrackerGrid, layout: &'a TrackerLayout, policy: MergePolicy) -> Self {
        let mut index = HashMap::new();
        for row in layout.first_data_row..=grid.max_row() {
            if let Some(tag) = grid.get(row, layout.tag_column).as_text() {
                if !tag.is_empty() {
                    index.insert(tag.to_string(), row);
                }
            }
        }
        log::debug!("Indexed {} tags", index.len());

        Self {
            layout,
            policy,
            index,
        }
    }

    pub fn row_of(&self, tag: &str) -> Option<u32> {
        self.index.get(tag).copied()
    }

    /// 1レコードを反映
    pub fn upsert(
        &mut self,
        grid: &mut TrackerGrid,
        record: &ExtractedRecord,
        category: AlarmCategory,
        placement: Placement,
        comment: &str,
    ) -> Upsert {
        let outcome = match self.row_of(&record.tag) {
            Some(row) => {
                grid.set(row, placement.day_column, record.status.clone());

                let existing = grid.get(row, placement.comment_column).to_display_string();
                let trail = format!("{}\n{}", existing, comment).trim().to_string();
                grid.set(row, placement.comment_column, trail);

                Upsert::Updated(row)
            }
            None => {
                let row = self.next_row(grid);
                grid.set(row, self.layout.tag_column, record.tag.as_str());
                grid.set(row, self.layout.location_column, record.location.clone());
                grid.set(row, placement.day_column, record.status.clone());
                grid.set(row, placement.comment_column, comment);
                self.clear_flags(grid, row);

                self.index.insert(record.tag.clone(), row);
                log::debug!("New row added at {} for {}", row, record.tag);
                Upsert::Appended(row)
            }
        };

        if self.policy.sets_status_flags() {
            let row = outcome.row();
            // 最後に分類した種別だけをYESとして残す
            self.clear_flags(grid, row);
            let col = self.layout.status_columns.column_for(category);
            grid.set(row, col, STATUS_YES);
            log::debug!("Row {}: {} (column {}) → YES", row, category, col);
        }

        outcome
    }

    fn next_row(&self, grid: &TrackerGrid) -> u32 {
        grid.max_row().max(self.layout.first_data_row - 1) + 1
    }

    fn clear_flags(&self, grid: &mut TrackerGrid, row: u32) {
        for col in self.layout.status_columns.all() {
            grid.set(row, col, STATUS_NO);
        }
    }
}

/// 既存の全タグ行のステータス列を NO にする（戻り値: 対象行数）
pub fn reset_status_flags(grid: &mut TrackerGrid, layout: &TrackerLayout) -> u32 {
    let last_row = grid.max_row();
    if last_row < layout.first_data_row {
        return 0;
    }
    for row in layout.first_data_row..=last_row {
        for col in layout.status_columns.all() {
            grid.set(row, col, Cell::text(STATUS_NO));
        }
    }
    last_row - layout.first_data_row + 1
}
