use crate::cpu::clamp_percent;

const MIB: f64 = (1u64 << 20) as f64;

/// Convert a byte count to mebibytes.
#[inline]
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / MIB
}

/// RAM usage percentage from total and available memory (same unit).
///
/// Returns `0` when `total` is missing, zero or negative; the result is
/// always within `[0, 100]` and never NaN.
pub fn compute_ram_percent(total: f64, available: f64) -> f32 {
    if !(total.is_finite() && total > 0.0) {
        return 0.0;
    }
    let used = (total - available).max(0.0);
    clamp_percent(used / total * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_total_is_zero() {
        assert_eq!(compute_ram_percent(0.0, 123.0), 0.0);
        assert_eq!(compute_ram_percent(0.0, f64::NAN), 0.0);
        assert_eq!(compute_ram_percent(-5.0, 0.0), 0.0);
        assert_eq!(compute_ram_percent(f64::NAN, 1.0), 0.0);
    }

    #[test]
    fn half_used() {
        assert_eq!(compute_ram_percent(16_384.0, 8_192.0), 50.0);
    }

    #[test]
    fn available_above_total_is_zero_used() {
        assert_eq!(compute_ram_percent(1_000.0, 2_000.0), 0.0);
    }

    #[test]
    fn negative_available_clamps_to_full() {
        assert_eq!(compute_ram_percent(1_000.0, -10.0), 100.0);
    }

    #[test]
    fn bytes_to_mb_uses_binary_units() {
        assert_eq!(bytes_to_mb(512 * 1024 * 1024), 512.0);
    }
}
