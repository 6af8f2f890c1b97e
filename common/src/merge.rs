//! トラッカーへのマージ（RESET → APPLY_BATCHES）
//!
//! グリッドはメモリ上でのみ変更する。途中でエラーになった場合、
//! 呼び出し側はグリッドを破棄し、何も保存しない。

use crate::calendar::CalendarResolver;
use crate::classifier::AlarmCategory;
use crate::column::column_letters;
use crate::error::Result;
use crate::grid::TrackerGrid;
use crate::layout::TrackerLayout;
use crate::ledger::{reset_status_flags, Placement, TagLedger, Upsert};
use crate::types::{ExtractedBatch, MergePolicy};
use serde::Serialize;

/// マージ結果の集計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeSummary {
    pub batches: usize,
    pub records: usize,
    pub rows_reset: u32,
    pub rows_updated: usize,
    pub rows_appended: usize,
}

pub struct Merger<'a> {
    layout: &'a TrackerLayout,
}

impl<'a> Merger<'a> {
    pub fn new(layout: &'a TrackerLayout) -> Self {
        Self { layout }
    }

    /// 既存タグ行のステータス列を NO に（リクエストごとに1回）
    pub fn reset(&self, grid: &mut TrackerGrid) -> u32 {
        let rows = reset_status_flags(grid, self.layout);
        log::info!("Reset status columns to NO for {} existing rows", rows);
        rows
    }

    /// バッチを順に反映（RESETは含まない）
    pub fn apply_batches(
        &self,
        grid: &mut TrackerGrid,
        batches: &[ExtractedBatch],
        policy: MergePolicy,
    ) -> Result<MergeSummary> {
        let mut summary = MergeSummary {
            batches: batches.len(),
            ..MergeSummary::default()
        };

        let comment_column = self.layout.comment_column(grid.max_column())?;
        let resolver = CalendarResolver::new(self.layout);
        let mut ledger = TagLedger::build(grid, self.layout, policy);

        for batch in batches {
            let formatted_date = batch.formatted_date();
            let day_column = resolver.column_for_date(grid, batch.date)?;
            let placement = Placement {
                day_column,
                comment_column,
            };
            log::info!(
                "Applying {} records for {} (column {}, {})",
                batch.records.len(),
                formatted_date,
                column_letters(day_column),
                policy
            );

            for record in &batch.records {
                let category = AlarmCategory::classify(&record.alarm_description);
                let comment = format!("{} {}", formatted_date, category);

                match ledger.upsert(grid, record, category, placement, &comment) {
                    Upsert::Updated(_) => summary.rows_updated += 1,
                    Upsert::Appended(_) => summary.rows_appended += 1,
                }
                summary.records += 1;
            }
        }

        Ok(summary)
    }
}
