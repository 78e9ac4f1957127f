//! 时间工具函数 — 业务时区转换
//!
//! 所有日期→时间戳转换统一在 service 层完成，
//! repository 层只接收 `i64` Unix millis 或纯文本日期。

use chrono::{NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use super::{BookingError, BookingResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> BookingResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| BookingError::validation(format!("Invalid date format: {}", date)))
}

/// 解析时间字符串 (HH:MM)
pub fn parse_time(time: &str) -> BookingResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| BookingError::validation(format!("Invalid time format: {}", time)))
}

/// 日期 + 时间 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_time_to_millis(date: NaiveDate, time: NaiveTime, tz: Tz) -> i64 {
    let naive = date.and_time(time);
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 当前营业时区的日期
pub fn local_date(now_millis: i64, tz: Tz) -> NaiveDate {
    tz.timestamp_millis_opt(now_millis)
        .latest()
        .map(|dt| dt.date_naive())
        .unwrap_or_else(|| {
            chrono::DateTime::from_timestamp_millis(now_millis)
                .map(|dt| dt.date_naive())
                .unwrap_or_default()
        })
}
