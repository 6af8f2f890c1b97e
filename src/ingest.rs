//! 取込境界
//!
//! アラームログのファイル名に含まれる日付（YYYY-MM-DD）から
//! 対象シート名（All_DD-MM-YYYY）を決める。

use crate::error::{Result, TrackerError};
use chrono::NaiveDate;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const SOURCE_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "XLSX", "XLSM", "XLS"];

/// 取込対象のアラームログ
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub date: NaiveDate,
}

impl SourceFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let date = date_from_file_name(&file_name)?;

        Ok(Self {
            path: path.to_path_buf(),
            date,
        })
    }

    /// 対象シート名（All_DD-MM-YYYY）
    pub fn sheet_name(&self) -> String {
        format!("All_{}", self.date.format("%d-%m-%Y"))
    }

    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// ファイル名から最初の YYYY-MM-DD を取り出す
pub fn date_from_file_name(file_name: &str) -> Result<NaiveDate> {
    lazy_static::lazy_static! {
        static ref DATE_RE: Regex = Regex::new(r"(\d{4}-\d{2}-\d{2})").unwrap();
    }

    let caps = DATE_RE
        .captures(file_name)
        .ok_or_else(|| TrackerError::InvalidFilenameFormat(file_name.to_string()))?;

    NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d")
        .map_err(|_| TrackerError::InvalidFilenameFormat(file_name.to_string()))
}

/// フォルダ直下のExcelファイルを列挙（ファイル名順）
pub fn collect_sources(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(TrackerError::FolderNotFound(folder.display().to_string()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .map(|ext| SOURCE_EXTENSIONS.iter().any(|&e| e == ext.to_string_lossy()))
                .unwrap_or(false)
        })
        // Excelの一時ファイル（~$で始まる）は除外
        .filter(|path| {
            !path
                .file_name()
                .map(|n| n.to_string_lossy().starts_with("~$"))
                .unwrap_or(false)
        })
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}
