/// Clamp a percentage into `[0, 100]`; NaN becomes `0`.
pub fn clamp_percent(value: f64) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0) as f32
}
