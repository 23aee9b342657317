//! Time-related utilities.

use chrono::{DateTime, Local, Utc};

/// Get the current Unix timestamp (milliseconds)
pub fn get_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a Unix timestamp (milliseconds) to a local wall-clock time (`HH:MM:SS`).
///
/// Timestamps outside the range chrono can represent are rendered as `--:--:--`.
pub fn timestamp_to_local_time(timestamp_millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_millis) {
        Some(dt) => dt.with_timezone(&Local).format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_timestamp_returns_positive_value() {
        // テスト項目: get_timestamp が正の値を返す
        // given (前提条件):

        // when (操作):
        let timestamp = get_timestamp();

        // then (期待する結果):
        assert!(timestamp > 0);
    }

    #[test]
    fn test_get_timestamp_is_non_decreasing() {
        // テスト項目: get_timestamp が呼び出すたびに減少しない値を返す
        // given (前提条件):
        let timestamp1 = get_timestamp();

        // when (操作):
        std::thread::sleep(std::time::Duration::from_millis(10));
        let timestamp2 = get_timestamp();

        // then (期待する結果):
        assert!(timestamp2 >= timestamp1);
    }

    #[test]
    fn test_timestamp_to_local_time_format() {
        // テスト項目: タイムスタンプが HH:MM:SS 形式に変換される
        // given (前提条件):
        let timestamp = 1672498800123;

        // when (操作):
        let result = timestamp_to_local_time(timestamp);

        // then (期待する結果):
        assert_eq!(result.len(), 8);
        assert_eq!(result.matches(':').count(), 2);
        assert!(result.ends_with(":00"));
    }

    #[test]
    fn test_timestamp_to_local_time_out_of_range() {
        // テスト項目: 表現できないタイムスタンプはプレースホルダになる
        // given (前提条件):
        let timestamp = i64::MAX;

        // when (操作):
        let result = timestamp_to_local_time(timestamp);

        // then (期待する結果):
        assert_eq!(result, "--:--:--");
    }
}
