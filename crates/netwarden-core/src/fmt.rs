//! Human-readable byte formatting helpers.

const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

/// Format a byte count with base-1024 scaling and two decimal places
/// (e.g. `"1.50 KB"`, `"3.27 GB"`). Zero renders as `"0 B"` and
/// sub-kilobyte values stay integral (`"512 B"`).
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".into();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

/// Format a per-interval rate as `"<bytes>/s"`.
pub fn format_rate(bytes_per_sec: u64) -> String {
    format!("{}/s", format_bytes(bytes_per_sec))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_zero_b() {
        assert_eq!(format_bytes(0), "0 B");
    }

    #[test]
    fn sub_kilobyte_stays_integral() {
        assert_eq!(format_bytes(1), "1 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1023), "1023 B");
    }

    #[test]
    fn kilobytes_carry_two_decimals() {
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1024), "1.00 KB");
    }

    #[test]
    fn larger_units_scale_by_1024() {
        assert_eq!(format_bytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_bytes(1_288_490_188_800), "1.17 TB");
    }

    #[test]
    fn rate_appends_per_second() {
        assert_eq!(format_rate(1536), "1.50 KB/s");
    }
}
