use crate::error::{Result, TrackerError};
use alarm_tracker_common::{MergePolicy, TrackerLayout};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Config {
    pub layout: TrackerLayout,
    pub latest_file_name: String,
    pub backlog_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: TrackerLayout::default(),
            latest_file_name: "updated_latest_tracker.xlsx".into(),
            backlog_file_name: "updated_backlog_tracker.xlsx".into(),
        }
    }
}

impl Config {
    /// 設定を読み込み（~/.config/alarm-tracker/config.json > 既定値）
    ///
    /// `layout` を指定した場合はレイアウトだけをそのファイルで置き換える。
    pub fn load(layout: Option<&Path>) -> Result<Self> {
        let mut config = match Self::config_path() {
            Ok(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };

        if let Some(path) = layout {
            config.layout = Self::load_layout(path)?;
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.layout.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// レイアウトファイル（TrackerLayout のJSON）を読み込み
    pub fn load_layout(path: &Path) -> Result<TrackerLayout> {
        if !path.exists() {
            return Err(TrackerError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let layout = TrackerLayout::from_json(&content)?;
        log::info!(
            "Using layout {} (header row {}, first data row {})",
            path.display(),
            layout.header_row,
            layout.first_data_row
        );
        Ok(layout)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TrackerError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("alarm-tracker").join("config.json"))
    }

    /// 出力ファイル名（方針ごとに固定）
    pub fn output_file_name(&self, policy: MergePolicy) -> &str {
        match policy {
            MergePolicy::Latest => &self.latest_file_name,
            MergePolicy::Backlog => &self.backlog_file_name,
        }
    }
}
