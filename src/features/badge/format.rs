/// 将计数压缩为简短可读的字符串：`1000 -> 1.0k`，`1500000 -> 1.5M`。
///
/// 保留一位小数：先做 `f64` 除法，再按商的精确十进制值四舍五入（.5 远离零进位）。
/// 因此 `1150 -> 1.1k`（1.15 的二进制近似略小于 1.15），而 `1250 -> 1.3k`。
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        return format!("{}M", round_one_decimal(n as f64 / 1_000_000.0));
    }
    if n >= 1_000 {
        return format!("{}k", round_one_decimal(n as f64 / 1_000.0));
    }
    n.to_string()
}

/// 对非负数保留一位小数。
///
/// 商不小于 1，尾数最多 52 位二进制小数，对应最多 52 位十进制小数，
/// 60 位定点格式化即为精确展开，只需看第二位小数决定是否进位。
fn round_one_decimal(x: f64) -> String {
    let exact = format!("{x:.60}");
    let (int_part, frac) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut digits = frac.bytes().map(|b| u128::from(b.saturating_sub(b'0')));
    let first = digits.next().unwrap_or(0);
    let round_up = digits.next().is_some_and(|d| d >= 5);
    let whole: u128 = int_part.parse().unwrap_or(0);
    let tenths = whole * 10 + first + u128::from(round_up);
    format!("{}.{}", tenths / 10, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::format_count;

    #[test]
    fn boundary_values() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1.0k");
        assert_eq!(format_count(999_999), "1000.0k");
        assert_eq!(format_count(1_000_000), "1.0M");
        assert_eq!(format_count(1_500_000), "1.5M");
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(format_count(1_049), "1.0k");
        assert_eq!(format_count(1_050), "1.1k");
        assert_eq!(format_count(1_250), "1.3k");
        assert_eq!(format_count(12_345), "12.3k");
        assert_eq!(format_count(2_960_000), "3.0M");
    }

    #[test]
    fn ties_follow_the_binary_value_of_the_quotient() {
        // 1.15 / 2.05 在 f64 中略小于真实值，不进位；1.25 可精确表示，进位
        assert_eq!(format_count(1_150), "1.1k");
        assert_eq!(format_count(1_450), "1.4k");
        assert_eq!(format_count(2_050), "2.0k");
        assert_eq!(format_count(1_250), "1.3k");
        assert_eq!(format_count(1_150_000), "1.1M");
        assert_eq!(format_count(1_250_000), "1.3M");
    }

    #[test]
    fn largest_count_does_not_overflow() {
        let s = format_count(u64::MAX);
        assert!(s.starts_with("18446744073709."), "got {s}");
        assert!(s.ends_with('M'));
    }
}
