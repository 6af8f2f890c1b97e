use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイル名に日付(YYYY-MM-DD)がありません: {0}")]
    InvalidFilenameFormat(String),

    #[error("シート '{sheet}' が見つかりません: {file}")]
    SheetNotFound { file: String, sheet: String },

    #[error("列 '{column}' が見つかりません: {file}")]
    MissingColumn { file: String, column: String },

    #[error("アラームログの読み込みに失敗: {file}: {reason}")]
    SourceLoad { file: String, reason: String },

    #[error("トラッカーの読み込みに失敗: {file}: {reason}")]
    TrackerLoad { file: String, reason: String },

    #[error("xls変換に失敗: {file}: {reason}")]
    Conversion { file: String, reason: String },

    #[error("トラッカーの保存に失敗: {path}: {reason}")]
    Persist { path: String, reason: String },

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error(transparent)]
    Merge(#[from] alarm_tracker_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
