/// ドメインサービス: 表示用フォーマット
///
/// Unixタイムスタンプをユーザー設定のタイムゾーンオフセットで時刻文字列に変換する。
use chrono::{FixedOffset, TimeZone, Utc};

/// Unixタイムスタンプ（秒）をフォーマット
///
/// # 戻り値
/// - オフセット0: "2025-11-29 16:49:10 UTC"
/// - それ以外:    "2025-11-30 01:49:10 +09:00"
///
/// 範囲外のタイムスタンプやオフセットの場合は数値をそのまま返す。
pub fn format_timestamp(timestamp: i64, offset_seconds: i32) -> String {
    let Some(datetime_utc) = Utc.timestamp_opt(timestamp, 0).single() else {
        return timestamp.to_string();
    };

    if offset_seconds == 0 {
        return datetime_utc.format("%Y-%m-%d %H:%M:%S UTC").to_string();
    }

    match FixedOffset::east_opt(offset_seconds) {
        Some(offset) => datetime_utc
            .with_timezone(&offset)
            .format("%Y-%m-%d %H:%M:%S %:z")
            .to_string(),
        None => timestamp.to_string(),
    }
}

/// バイト数を "12,345,678 bytes (11.77 MB)" 形式にする
pub fn format_bytes(bytes: u64) -> String {
    let digits = bytes.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{} bytes ({:.2} MB)", grouped, bytes as f64 / 1_048_576.0)
}

/// プロンプトを表示用に切り詰める（文字境界を守る）
pub fn preview_prompt(prompt: &str, max_chars: usize) -> String {
    let single_line = prompt.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let truncated: String = single_line.chars().take(max_chars).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_utc() {
        // 1764434950 = 2025-11-29 16:49:10 UTC
        assert_eq!(format_timestamp(1764434950, 0), "2025-11-29 16:49:10 UTC");
    }

    #[test]
    fn test_format_timestamp_jst() {
        // UTC 16:49:10 → +09:00 01:49:10（翌日）
        assert_eq!(
            format_timestamp(1764434950, 32400),
            "2025-11-30 01:49:10 +09:00"
        );
    }

    #[test]
    fn test_format_timestamp_negative_offset() {
        let result = format_timestamp(1764434950, -28800);
        assert_eq!(result, "2025-11-29 08:49:10 -08:00");
    }

    #[test]
    fn test_format_timestamp_invalid_offset() {
        // 範囲外のオフセットは数値のまま
        assert_eq!(format_timestamp(1764434950, 100_000), "1764434950");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 bytes (0.00 MB)");
        assert_eq!(format_bytes(999), "999 bytes (0.00 MB)");
        assert_eq!(format_bytes(10_485_760), "10,485,760 bytes (10.00 MB)");
    }

    #[test]
    fn test_preview_prompt() {
        assert_eq!(preview_prompt("a cat", 100), "a cat");
        assert_eq!(preview_prompt("a\n  red panda", 100), "a red panda");
        assert_eq!(preview_prompt("abcdef", 3), "abc...");
    }
}
