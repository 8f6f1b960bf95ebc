//! Progress and clock presentation helpers

/// Percentage of the session already elapsed, rounded half up and clamped to `0..=100`
pub fn progress_percent(total_seconds: u64, remaining_seconds: u64) -> u8 {
    if total_seconds == 0 {
        return 100;
    }

    let elapsed = total_seconds.saturating_sub(remaining_seconds) as u128;
    let total = total_seconds as u128;
    let rounded = (200 * elapsed + total) / (2 * total);
    rounded.min(100) as u8
}

/// Render seconds as `MM:SS`
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
