//! Duration formatting for display.
//!
//! Elapsed seconds render either as decimal hours rounded *up* to a
//! configurable minute granularity (billing convention: any partial tick
//! counts as a full tick) or as a compound `XhYmZs` string when the
//! granularity is 1 or less.

/// Formats seconds as hours with one decimal place, ceiling to the next
/// `round_up_minutes` tick.
///
/// Granularities of 6, 12, 30 and 60 minutes land exactly on one decimal
/// place (tenths, fifths, halves and whole hours). A granularity of 1 or
/// less disables rounding and falls through to [`format_hms`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_hours_tenths(total_seconds: i64, round_up_minutes: i64) -> String {
    if round_up_minutes <= 1 {
        return format_hms(total_seconds);
    }
    if total_seconds <= 0 {
        return "0.0h".to_string();
    }
    // div_ceil is only stable for unsigned integers; both operands are
    // positive past the guards above.
    let granularity = round_up_minutes.unsigned_abs();
    let minutes = total_seconds.unsigned_abs().div_ceil(60);
    let ticks = minutes.div_ceil(granularity);
    let ticks_per_hour = 60 / granularity;
    let hours = ticks as f64 / ticks_per_hour as f64;
    format!("{hours:.1}h")
}

/// Formats seconds as a compound `XhYmZs` string, omitting zero units.
/// Zero or negative durations render as `0m`.
#[must_use]
pub fn format_hms(total_seconds: i64) -> String {
    if total_seconds <= 0 {
        return "0m".to_string();
    }
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if seconds > 0 {
        out.push_str(&format!("{seconds}s"));
    }
    if out.is_empty() {
        out.push_str("0m");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_partial_tick_up_to_tenth_of_hour() {
        // 359s is just under 6 minutes; any partial tick bills as a full one.
        assert_eq!(format_hours_tenths(359, 6), "0.1h");
        assert_eq!(format_hours_tenths(360, 6), "0.1h");
        assert_eq!(format_hours_tenths(361, 6), "0.2h");
    }

    #[test]
    fn zero_renders_as_zero_hours() {
        assert_eq!(format_hours_tenths(0, 6), "0.0h");
    }

    #[test]
    fn whole_hours_render_exactly() {
        assert_eq!(format_hours_tenths(3600, 6), "1.0h");
        assert_eq!(format_hours_tenths(5400, 6), "1.5h");
    }

    #[test]
    fn coarser_granularities_still_round_up() {
        assert_eq!(format_hours_tenths(60, 30), "0.5h");
        assert_eq!(format_hours_tenths(1801, 30), "1.0h");
        assert_eq!(format_hours_tenths(1, 60), "1.0h");
    }

    #[test]
    fn granularity_of_one_disables_rounding() {
        assert_eq!(format_hours_tenths(3725, 1), "1h2m5s");
        assert_eq!(format_hours_tenths(3725, 0), "1h2m5s");
    }

    #[test]
    fn hms_omits_zero_units() {
        assert_eq!(format_hms(59), "59s");
        assert_eq!(format_hms(60), "1m");
        assert_eq!(format_hms(3600), "1h");
        assert_eq!(format_hms(3660), "1h1m");
        assert_eq!(format_hms(0), "0m");
        assert_eq!(format_hms(-5), "0m");
    }
}
