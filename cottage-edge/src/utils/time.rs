//! 日期/时间工具
//!
//! 课程日期是纯日期 (`YYYY-MM-DD`)，比较时不考虑时刻。
//! "今天" 取本地时区。

use chrono::{Datelike, Local, NaiveDate, NaiveTime};

use super::{AppError, AppResult};

/// 本地时区的今天
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析开始时间 (HH:MM, 24 小时制)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time format: {}", time)))
}

/// 验证日期不早于今天
pub fn validate_not_past(date: NaiveDate, today: NaiveDate) -> AppResult<()> {
    if date < today {
        return Err(AppError::with_message(
            shared::ErrorCode::ClassDateInPast,
            format!("Date {} is in the past (today is {})", date, today),
        ));
    }
    Ok(())
}

/// `date` 是否在指定年月内 (month: 1-12)
pub fn in_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}
