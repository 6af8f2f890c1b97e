//! Alarm Tracker Common Library
//!
//! トラッカー更新のマージエンジン（I/Oなし）。
//! CLI側でワークブックを読み込み、ここでグリッドを更新する。

pub mod calendar;
pub mod classifier;
pub mod column;
pub mod error;
pub mod grid;
pub mod layout;
pub mod ledger;
pub mod merge;
pub mod types;

pub use calendar::CalendarResolver;
pub use classifier::AlarmCategory;
pub use column::{column_index, column_letters};
pub use error::{Error, Result};
pub use grid::TrackerGrid;
pub use layout::{MonthColumns, SourceColumns, StatusColumns, TrackerLayout};
pub use ledger::{reset_status_flags, Placement, TagLedger, Upsert};
pub use merge::{MergeSummary, Merger};
pub use types::{Cell, ExtractedBatch, ExtractedRecord, MergePolicy, STATUS_NO, STATUS_YES};
