use chrono::{DateTime, SecondsFormat, Utc};

/// Get current Unix timestamp in UTC (milliseconds)
pub fn get_utc_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format a Unix timestamp (milliseconds) as an RFC 3339 string in UTC.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_rfc3339() {
        // テスト項目: ミリ秒タイムスタンプを RFC 3339 形式に変換できる
        // given (前提条件):
        let timestamp = 1_672_531_200_123i64; // 2023-01-01T00:00:00.123Z

        // when (操作):
        let formatted = timestamp_to_rfc3339(timestamp);

        // then (期待する結果):
        assert_eq!(formatted, "2023-01-01T00:00:00.123Z");
    }

    #[test]
    fn test_get_utc_timestamp_is_positive() {
        // テスト項目: 現在時刻のタイムスタンプは正の値
        assert!(get_utc_timestamp() > 0);
    }
}
