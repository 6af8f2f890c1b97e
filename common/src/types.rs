//! トラッカー更新で共有される型:
//! - Cell: グリッドのセル値
//! - ExtractedRecord: アラームログから抽出した1行
//! - ExtractedBatch: 1ファイル分の抽出結果と日付
//! - MergePolicy: latest / backlog

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

/// ステータス列の値
pub const STATUS_YES: &str = "YES";
pub const STATUS_NO: &str = "NO";

/// セル値
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// 数値セルが日（整数）と一致するか
    ///
    /// 文字列 "15" は一致しない。
    pub fn equals_day(&self, day: u32) -> bool {
        match self {
            Cell::Number(n) => *n == day as f64,
            _ => false,
        }
    }

    /// 表示用文字列（整数値の数値は小数点なし）
    pub fn to_display_string(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// アラームログから抽出した1行（TAG / DESCRIPTION / ALARM DESC2 / ACT/UNACK）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecord {
    pub tag: String,
    #[serde(default)]
    pub location: Cell,
    #[serde(default)]
    pub alarm_description: String,
    #[serde(default)]
    pub status: Cell,
}

/// 1ソースファイル分の抽出結果
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedBatch {
    pub records: Vec<ExtractedRecord>,
    pub date: NaiveDate,
}

impl ExtractedBatch {
    pub fn new(records: Vec<ExtractedRecord>, date: NaiveDate) -> Self {
        Self { records, date }
    }

    /// コメント用の日付（DD/MM/YYYY）
    pub fn formatted_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }
}

/// 日付から英語の月名を取得
pub fn month_name(date: NaiveDate) -> &'static str {
    match Month::try_from(date.month() as u8) {
        Ok(month) => month.name(),
        // NaiveDate::month() は常に1..=12
        Err(_) => "",
    }
}

/// マージ方針
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// 当日分の更新。ステータス列をYESに設定する
    Latest,
    /// 過去分の取込。ステータス列はNOのまま
    Backlog,
}

impl MergePolicy {
    pub fn sets_status_flags(&self) -> bool {
        matches!(self, MergePolicy::Latest)
    }
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergePolicy::Latest => write!(f, "latest"),
            MergePolicy::Backlog => write!(f, "backlog"),
        }
    }
}
