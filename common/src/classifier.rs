//! アラーム種別の分類
//!
//! ALARM DESC2 の文字列を完全一致で6種別に振り分ける。
//! 部分一致・表記揺れの吸収は行わない。

use serde::{Deserialize, Serialize};

/// アラーム種別（ステータス列に対応）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmCategory {
    Invalidity,
    HAlm,
    Flame,
    HhAlm,
    Beam,
    Others,
}

/// 既知のアラーム文言 → 種別
const KNOWN_PHRASES: &[(&str, AlarmCategory)] = &[
    ("Invalidity State", AlarmCategory::Invalidity),
    ("High Gas Level Detection", AlarmCategory::HAlm),
    ("Flame Detection", AlarmCategory::Flame),
    ("High High Gas level Detection", AlarmCategory::HhAlm),
    ("SMOKE Detection", AlarmCategory::Beam),
];

impl AlarmCategory {
    pub const ALL: [AlarmCategory; 6] = [
        AlarmCategory::Invalidity,
        AlarmCategory::HAlm,
        AlarmCategory::Flame,
        AlarmCategory::HhAlm,
        AlarmCategory::Beam,
        AlarmCategory::Others,
    ];

    /// アラーム文言を分類（一致しなければ OTHERS）
    pub fn classify(description: &str) -> Self {
        KNOWN_PHRASES
            .iter()
            .find(|(phrase, _)| *phrase == description)
            .map(|(_, category)| *category)
            .unwrap_or(AlarmCategory::Others)
    }

    /// コメント欄に書き込むラベル
    pub fn label(&self) -> &'static str {
        match self {
            AlarmCategory::Invalidity => "INVALIDITY",
            AlarmCategory::HAlm => "H_ALM",
            AlarmCategory::Flame => "FLAME",
            AlarmCategory::HhAlm => "HH_ALM",
            AlarmCategory::Beam => "BEAM",
            AlarmCategory::Others => "OTHERS",
        }
    }
}

impl std::fmt::Display for AlarmCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
