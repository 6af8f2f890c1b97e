pub mod model;
pub mod reader;
pub mod writer;

pub use model::{FormulaCell, SheetData, TrackerWorkbook};
pub use reader::{data_to_cell, load_legacy, load_workbook, TrackerFormat};
pub use writer::save_workbook;

use crate::error::{Result, TrackerError};
use std::path::{Path, PathBuf};

/// 旧形式（.xls）を .xlsx に変換
///
/// 出力先を省略した場合は入力と同じ場所に拡張子 .xlsx で保存する。
pub fn convert_legacy(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    if TrackerFormat::from_path(input) != Some(TrackerFormat::LegacyXls) {
        return Err(TrackerError::Conversion {
            file: input.display().to_string(),
            reason: ".xls ファイルを指定してください".into(),
        });
    }

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("xlsx"));

    let workbook = load_legacy(input)?;
    save_workbook(&workbook, &output_path)?;

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_convert_rejects_non_xls() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tracker.xlsx");
        std::fs::write(&path, b"").unwrap();
        assert!(matches!(
            convert_legacy(&path, None),
            Err(TrackerError::Conversion { .. })
        ));
    }

    #[test]
    fn test_convert_broken_xls_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tracker.xls");
        std::fs::write(&path, b"broken").unwrap();

        let result = convert_legacy(&path, None);
        assert!(matches!(result, Err(TrackerError::Conversion { .. })));
        assert!(!dir.path().join("tracker.xlsx").exists());
    }
}
