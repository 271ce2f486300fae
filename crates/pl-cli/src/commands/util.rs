//! Shared output helpers.

/// Formats fractional hours as "Xh Ym".
///
/// Negative values are treated as 0m (defensive).
#[must_use]
pub fn format_hours(hours: f64) -> String {
    if !hours.is_finite() || hours <= 0.0 {
        return "0h 0m".to_string();
    }
    #[allow(clippy::cast_possible_truncation)]
    let total_minutes = (hours * 60.0).round() as i64;
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

/// Generates a 10-character progress bar from a 0..=1 fill ratio.
#[must_use]
pub fn progress_bar(filled_ratio: f64) -> String {
    let ratio = filled_ratio.clamp(0.0, 1.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = (ratio * 10.0).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}
