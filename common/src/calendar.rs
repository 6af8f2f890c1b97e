//! 日付列の解決
//!
//! 月名から列範囲を引き、見出し行を左から走査して日の列を見つける。

use crate::error::{Error, Result};
use crate::grid::TrackerGrid;
use crate::layout::TrackerLayout;
use chrono::{Datelike, NaiveDate};

pub struct CalendarResolver<'a> {
    layout: &'a TrackerLayout,
}

impl<'a> CalendarResolver<'a> {
    pub fn new(layout: &'a TrackerLayout) -> Self {
        Self { layout }
    }

    /// 月名と日から列番号を取得（最初に一致した列）
    pub fn day_column(&self, grid: &TrackerGrid, month: &str, day: u32) -> Result<u32> {
        let (start, end) = self.layout.month_range(month)?;
        let header_row = self.layout.header_row;

        (start..=end)
            .find(|&col| grid.get(header_row, col).equals_day(day))
            .ok_or_else(|| Error::DayNotFound {
                month: month.to_string(),
                day,
            })
    }

    pub fn column_for_date(&self, grid: &TrackerGrid, date: NaiveDate) -> Result<u32> {
        self.day_column(grid, crate::types::month_name(date), date.day())
    }
}
