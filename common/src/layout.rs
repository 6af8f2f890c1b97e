//! トラッカーのレイアウト定義
//!
//! 見出し行・データ開始行・月ごとの列範囲・ステータス列などを
//! 1つの不変値にまとめ、マージエンジンに渡す。

use crate::classifier::AlarmCategory;
use crate::column::column_index;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 月ごとの日付列範囲（列記号）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonthColumns {
    pub month: String,
    pub start: String,
    pub end: String,
}

impl MonthColumns {
    fn new(month: &str, start: &str, end: &str) -> Self {
        Self {
            month: month.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

/// 種別ごとのステータス列（1始まり）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct StatusColumns {
    pub invalidity: u32,
    pub h_alm: u32,
    pub flame: u32,
    pub hh_alm: u32,
    pub beam: u32,
    pub others: u32,
}

impl StatusColumns {
    pub fn column_for(&self, category: AlarmCategory) -> u32 {
        match category {
            AlarmCategory::Invalidity => self.invalidity,
            AlarmCategory::HAlm => self.h_alm,
            AlarmCategory::Flame => self.flame,
            AlarmCategory::HhAlm => self.hh_alm,
            AlarmCategory::Beam => self.beam,
            AlarmCategory::Others => self.others,
        }
    }

    /// 全ステータス列
    pub fn all(&self) -> [u32; 6] {
        AlarmCategory::ALL.map(|c| self.column_for(c))
    }
}

impl Default for StatusColumns {
    fn default() -> Self {
        Self {
            invalidity: 5,
            h_alm: 7,
            flame: 10,
            hh_alm: 6,
            beam: 8,
            others: 9,
        }
    }
}

/// アラームログ側の必須列名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SourceColumns {
    pub tag: String,
    pub description: String,
    pub alarm_description: String,
    pub status: String,
}

impl SourceColumns {
    pub fn required(&self) -> [&str; 4] {
        [&self.tag, &self.description, &self.alarm_description, &self.status]
    }
}

impl Default for SourceColumns {
    fn default() -> Self {
        Self {
            tag: "TAG".into(),
            description: "DESCRIPTION".into(),
            alarm_description: "ALARM DESC2".into(),
            status: "ACT/UNACK".into(),
        }
    }
}

/// トラッカーのレイアウト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TrackerLayout {
    /// 日付見出し行
    pub header_row: u32,
    /// タグ行の開始行
    pub first_data_row: u32,
    pub tag_column: u32,
    pub location_column: u32,
    /// コメント列 = 最終列 - この値
    pub comment_column_from_end: u32,
    pub month_columns: Vec<MonthColumns>,
    pub status_columns: StatusColumns,
    pub filter_keywords: Vec<String>,
    pub source_columns: SourceColumns,
}

impl Default for TrackerLayout {
    fn default() -> Self {
        Self {
            header_row: 11,
            first_data_row: 12,
            tag_column: 2,
            location_column: 3,
            comment_column_from_end: 2,
            month_columns: vec![
                MonthColumns::new("November", "CC", "DF"),
                MonthColumns::new("December", "DG", "EK"),
                MonthColumns::new("January", "EL", "FP"),
                MonthColumns::new("February", "FQ", "GR"),
                MonthColumns::new("March", "GS", "HW"),
                MonthColumns::new("April", "HX", "JA"),
                MonthColumns::new("May", "JB", "KF"),
            ],
            status_columns: StatusColumns::default(),
            filter_keywords: vec!["GDB".into(), "NFD".into(), "NSD".into(), "GDIR".into()],
            source_columns: SourceColumns::default(),
        }
    }
}

impl TrackerLayout {
    /// JSON文字列から読み込み（未指定項目はデフォルト）
    pub fn from_json(json: &str) -> Result<Self> {
        let layout: TrackerLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// 月名から列範囲（1始まり、両端含む）を取得
    pub fn month_range(&self, month: &str) -> Result<(u32, u32)> {
        let entry = self
            .month_columns
            .iter()
            .find(|m| m.month == month)
            .ok_or_else(|| Error::InvalidMonth {
                month: month.to_string(),
                configured: self.configured_months(),
            })?;

        Ok((column_index(&entry.start)?, column_index(&entry.end)?))
    }

    pub fn configured_months(&self) -> String {
        self.month_columns
            .iter()
            .map(|m| m.month.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// 最終列からコメント列を算出
    pub fn comment_column(&self, max_column: u32) -> Result<u32> {
        if max_column <= self.comment_column_from_end {
            return Err(Error::Layout(format!(
                "tracker has {} columns; comment column needs more than {}",
                max_column, self.comment_column_from_end
            )));
        }
        Ok(max_column - self.comment_column_from_end)
    }

    /// 整合性チェック
    pub fn validate(&self) -> Result<()> {
        if self.header_row == 0 || self.tag_column == 0 || self.location_column == 0 {
            return Err(Error::Layout("rows and columns are 1-based".into()));
        }
        if self.first_data_row <= self.header_row {
            return Err(Error::Layout(format!(
                "first data row {} must come after header row {}",
                self.first_data_row, self.header_row
            )));
        }
        if self.status_columns.all().contains(&0) {
            return Err(Error::Layout("status columns are 1-based".into()));
        }
        for entry in &self.month_columns {
            let start = column_index(&entry.start)?;
            let end = column_index(&entry.end)?;
            if start > end {
                return Err(Error::Layout(format!(
                    "{}: start column {} is after end column {}",
                    entry.month, entry.start, entry.end
                )));
            }
        }
        if self.filter_keywords.iter().any(|k| k.is_empty()) {
            return Err(Error::Layout("filter keywords must not be empty".into()));
        }
        if self.source_columns.required().iter().any(|name| name.trim().is_empty()) {
            return Err(Error::Layout("source column names must not be empty".into()));
        }
        Ok(())
    }
}

/// テスト用の小さなレイアウト
///
/// 見出し行2、タグ行3以降、March = K..O（13〜17日）、April = D、
/// 最終列18想定でコメント列16
#[cfg(test)]
pub(crate) fn test_layout() -> TrackerLayout {
    TrackerLayout {
        header_row: 2,
        first_data_row: 3,
        month_columns: vec![
            MonthColumns::new("March", "K", "O"),
            MonthColumns::new("April", "D", "D"),
        ],
        ..TrackerLayout::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_is_valid() {
        let layout = TrackerLayout::default();
        assert!(layout.validate().is_ok());
        assert_eq!(layout.month_columns.len(), 7);
    }

    #[test]
    fn test_month_range() {
        let layout = TrackerLayout::default();
        assert_eq!(layout.month_range("March").unwrap(), (201, 231));
        assert_eq!(layout.month_range("April").unwrap(), (232, 261));
    }

    #[test]
    fn test_unknown_month() {
        let layout = TrackerLayout::default();
        let err = layout.month_range("July").unwrap_err();
        assert!(matches!(err, Error::InvalidMonth { ref month, .. } if month == "July"));
    }

    #[test]
    fn test_comment_column() {
        let layout = TrackerLayout::default();
        assert_eq!(layout.comment_column(295).unwrap(), 293);
        assert!(matches!(layout.comment_column(2), Err(Error::Layout(_))));
    }

    #[test]
    fn test_status_columns_default() {
        let columns = StatusColumns::default();
        assert_eq!(columns.column_for(AlarmCategory::Flame), 10);
        assert_eq!(columns.column_for(AlarmCategory::HhAlm), 6);
        assert_eq!(columns.all(), [5, 7, 10, 6, 8, 9]);
    }

    #[test]
    fn test_from_json_partial() {
        let layout = TrackerLayout::from_json(r#"{ "headerRow": 5, "firstDataRow": 6 }"#).unwrap();
        assert_eq!(layout.header_row, 5);
        assert_eq!(layout.tag_column, 2);
        assert_eq!(layout.filter_keywords, vec!["GDB", "NFD", "NSD", "GDIR"]);
    }

    #[test]
    fn test_from_json_rejects_reversed_range() {
        let json = r#"{ "monthColumns": [ { "month": "March", "start": "HW", "end": "GS" } ] }"#;
        assert!(matches!(TrackerLayout::from_json(json), Err(Error::Layout(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let json = r#"{ "layout": { "headerRow": 5 } }"#;
        assert!(matches!(TrackerLayout::from_json(json), Err(Error::Json(_))));
    }

    #[test]
    fn test_blank_source_column_rejected() {
        let json = r#"{ "sourceColumns": { "tag": " " } }"#;
        assert!(matches!(TrackerLayout::from_json(json), Err(Error::Layout(_))));
    }

    #[test]
    fn test_status_columns_json_keys() {
        let json = serde_json::to_value(StatusColumns::default()).unwrap();
        assert_eq!(json["FLAME"], 10);
        assert_eq!(json["HH_ALM"], 6);
    }
}
