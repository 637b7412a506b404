use chrono::NaiveDate;

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current calendar date in the server's local timezone.
///
/// Discount windows are whole days, so "now" is compared as a date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
