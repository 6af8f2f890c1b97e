//! エラー型定義

use thiserror::Error;

/// マージエンジンのエラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid month: {month} (configured: {configured})")]
    InvalidMonth { month: String, configured: String },

    #[error("Day {day} not found in {month}. Check tracker format.")]
    DayNotFound { month: String, day: u32 },

    #[error("Invalid column letters: {0}")]
    InvalidColumn(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
