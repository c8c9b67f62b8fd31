/// Whether `name` is a loopback interface (`lo`, `lo0`, …).
pub fn is_loopback(name: &str) -> bool {
    match name.strip_prefix("lo") {
        Some(rest) => rest.chars().all(|c| c.is_ascii_digit()),
        None       => false,
    }
}

/// Rescale raw throughput samples onto the chart's 0–100 range.
///
/// Full scale is the larger of `floor` and the peak of `samples`, so a quiet
/// link draws near the bottom instead of every blip filling the icon.
pub fn normalize_throughput(samples: &[f32], floor: f64) -> Vec<f32> {
    let peak = samples
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0f64, |acc, v| acc.max(v as f64));
    let scale = peak.max(floor);
    if !(scale.is_finite() && scale > 0.0) {
        return vec![0.0; samples.len()];
    }

    samples
        .iter()
        .map(|&v| {
            if v.is_finite() {
                (v as f64 / scale * 100.0).clamp(0.0, 100.0) as f32
            } else {
                0.0
            }
        })
        .collect()
}

/// Format a bytes-per-second rate, e.g. `"1.2 MB/s"`.
pub fn format_rate(bps: f64) -> String {
    const GB: f64 = 1_000_000_000.0;
    const MB: f64 = 1_000_000.0;
    const KB: f64 = 1_000.0;

    let bps = if bps.is_finite() { bps.max(0.0) } else { 0.0 };
    if bps >= GB {
        format!("{:.1} GB/s", bps / GB)
    } else if bps >= MB {
        format!("{:.1} MB/s", bps / MB)
    } else if bps >= KB {
        format!("{:.1} KB/s", bps / KB)
    } else {
        format!("{bps:.0} B/s")
    }
}

/// Compact rate for the chart overlay, at most four characters
/// (e.g. `"1.2M"`, `"340K"`, `"12"`).
pub fn format_rate_short(bps: f64) -> String {
    const GB: f64 = 1_000_000_000.0;
    const MB: f64 = 1_000_000.0;
    const KB: f64 = 1_000.0;

    let bps = if bps.is_finite() { bps.max(0.0) } else { 0.0 };
    let scaled = |value: f64, unit: char| {
        if value < 9.95 {
            format!("{value:.1}{unit}")
        } else {
            format!("{:.0}{unit}", value.min(999.0))
        }
    };

    if bps >= GB {
        scaled(bps / GB, 'G')
    } else if bps >= MB {
        scaled(bps / MB, 'M')
    } else if bps >= KB {
        scaled(bps / KB, 'K')
    } else {
        format!("{bps:.0}")
    }
}
