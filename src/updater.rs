//! トラッカー更新の実行
//!
//! ## 処理フロー
//! 1. INIT: トラッカー読み込み（.xls は変換）
//! 2. RESET: 既存タグ行のステータス列を NO に
//! 3. APPLY_BATCHES: バッチごとに日付列を解決してupsert
//! 4. PERSIST: 新しいファイルに保存（元のトラッカーは変更しない）
//! 5. DONE: 出力パスを返す
//!
//! どの段階で失敗してもグリッドは破棄され、ファイルは出力されない。

use crate::config::Config;
use crate::error::{Result, TrackerError};
use crate::workbook::{load_workbook, save_workbook};
use alarm_tracker_common::{ExtractedBatch, MergePolicy, MergeSummary, Merger};
use std::path::{Path, PathBuf};

/// 処理段階（ログ用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStage {
    Init,
    Reset,
    ApplyBatches,
    Persist,
    Done,
}

impl std::fmt::Display for MergeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeStage::Init => write!(f, "INIT"),
            MergeStage::Reset => write!(f, "RESET"),
            MergeStage::ApplyBatches => write!(f, "APPLY_BATCHES"),
            MergeStage::Persist => write!(f, "PERSIST"),
            MergeStage::Done => write!(f, "DONE"),
        }
    }
}

/// 更新結果
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub output_path: PathBuf,
    pub summary: MergeSummary,
}

pub struct TrackerUpdater {
    config: Config,
}

impl TrackerUpdater {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 出力先を決める（ディレクトリ指定時は方針ごとの固定ファイル名）
    pub fn output_path(&self, output: &Path, policy: MergePolicy) -> PathBuf {
        if output.is_dir() || output.extension().is_none() {
            output.join(self.config.output_file_name(policy))
        } else {
            output.to_path_buf()
        }
    }

    /// トラッカーを更新して新しいファイルに保存
    pub fn run(
        &self,
        tracker_path: &Path,
        batches: &[ExtractedBatch],
        policy: MergePolicy,
        output: &Path,
    ) -> Result<MergeOutcome> {
        if policy == MergePolicy::Latest && batches.len() != 1 {
            return Err(TrackerError::Config(format!(
                "latest は1ファイルのみ指定できます（{}件）",
                batches.len()
            )));
        }

        let output_path = self.output_path(output, policy);
        if same_file(tracker_path, &output_path) {
            return Err(TrackerError::Persist {
                path: output_path.display().to_string(),
                reason: "元のトラッカーは上書きできません".into(),
            });
        }

        let mut stage = MergeStage::Init;
        let result = self.run_stages(tracker_path, batches, policy, &output_path, &mut stage);
        match &result {
            Ok(outcome) => log::info!(
                "[{}] {} merge wrote {}",
                MergeStage::Done,
                policy,
                outcome.output_path.display()
            ),
            Err(e) => log::error!("[{}] tracker update failed: {}", stage, e),
        }
        result
    }

    fn run_stages(
        &self,
        tracker_path: &Path,
        batches: &[ExtractedBatch],
        policy: MergePolicy,
        output_path: &Path,
        stage: &mut MergeStage,
    ) -> Result<MergeOutcome> {
        log::info!("[{}] loading {}", stage, tracker_path.display());
        let mut workbook = load_workbook(tracker_path)?;
        let grid = workbook.active_mut();

        let merger = Merger::new(&self.config.layout);

        *stage = MergeStage::Reset;
        let rows_reset = merger.reset(grid);

        *stage = MergeStage::ApplyBatches;
        log::info!("[{}] {} batches, policy {}", stage, batches.len(), policy);
        let summary = MergeSummary {
            rows_reset,
            ..merger.apply_batches(grid, batches, policy)?
        };

        *stage = MergeStage::Persist;
        save_workbook(&workbook, output_path)?;

        *stage = MergeStage::Done;
        Ok(MergeOutcome {
            output_path: output_path.to_path_buf(),
            summary,
        })
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
