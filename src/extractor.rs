//! アラームログからの行抽出
//!
//! 対象シートのTAG列にキーワード（GDB / NFD / NSD / GDIR など）を
//! 含む行だけを取り出し、必須4列に絞り込む。読み込みのみ。

use crate::error::{Result, TrackerError};
use crate::ingest::SourceFile;
use crate::workbook::data_to_cell;
use alarm_tracker_common::{Cell, ExtractedBatch, ExtractedRecord, TrackerLayout};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// 必須列の位置（0始まり）
struct ColumnIndexes {
    tag: usize,
    description: usize,
    alarm_description: usize,
    status: usize,
}

/// シートから対象行を抽出
pub fn extract_records(
    path: &Path,
    sheet_name: &str,
    layout: &TrackerLayout,
) -> Result<Vec<ExtractedRecord>> {
    let file = path.display().to_string();
    let mut workbook = open_workbook_auto(path).map_err(|e| TrackerError::SourceLoad {
        file: file.clone(),
        reason: e.to_string(),
    })?;

    if !workbook.sheet_names().iter().any(|name| name == sheet_name) {
        log::error!("Sheet '{}' not found in '{}'", sheet_name, file);
        return Err(TrackerError::SheetNotFound {
            file,
            sheet: sheet_name.to_string(),
        });
    }

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| TrackerError::SourceLoad {
            file: file.clone(),
            reason: e.to_string(),
        })?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(header_text).collect())
        .unwrap_or_default();
    let columns = locate_columns(&headers, layout, &file)?;

    let records: Vec<ExtractedRecord> = rows
        .filter_map(|row| project_row(row, &columns, &layout.filter_keywords))
        .collect();

    log::info!(
        "Extracted {} rows from '{}' in {}",
        records.len(),
        sheet_name,
        file
    );
    Ok(records)
}

/// ソースファイル1件分をバッチにする
pub fn extract_batch(source: &SourceFile, layout: &TrackerLayout) -> Result<ExtractedBatch> {
    let records = extract_records(&source.path, &source.sheet_name(), layout)?;
    Ok(ExtractedBatch::new(records, source.date))
}

fn header_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.clone(),
        other => data_to_cell(other).to_display_string(),
    }
}

fn locate_columns(headers: &[String], layout: &TrackerLayout, file: &str) -> Result<ColumnIndexes> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| {
                log::error!("Column '{}' not found in the data from '{}'", name, file);
                TrackerError::MissingColumn {
                    file: file.to_string(),
                    column: name.to_string(),
                }
            })
    };

    let source = &layout.source_columns;
    Ok(ColumnIndexes {
        tag: find(&source.tag)?,
        description: find(&source.description)?,
        alarm_description: find(&source.alarm_description)?,
        status: find(&source.status)?,
    })
}

fn project_row(row: &[Data], columns: &ColumnIndexes, keywords: &[String]) -> Option<ExtractedRecord> {
    let cell_at = |idx: usize| row.get(idx).map(data_to_cell).unwrap_or_default();

    // TAGが文字列でない行は対象外
    let tag = match row.get(columns.tag) {
        Some(Data::String(s)) if !s.is_empty() => s.clone(),
        _ => return None,
    };
    if !keywords.iter().any(|k| tag.contains(k.as_str())) {
        return None;
    }

    let alarm_description = match cell_at(columns.alarm_description) {
        Cell::Empty => String::new(),
        other => other.to_display_string(),
    };

    Some(ExtractedRecord {
        tag,
        location: cell_at(columns.description),
        alarm_description,
        status: cell_at(columns.status),
    })
}
