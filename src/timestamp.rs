/// Separator between seconds and milliseconds in a cue timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MillisSeparator {
    /// SRT: `HH:MM:SS,mmm`
    Comma,
    /// WebVTT: `HH:MM:SS.mmm`
    Period,
}

impl MillisSeparator {
    fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Period => '.',
        }
    }
}

/// Slack for `f64` representation error, so e.g. `0.3` doesn't floor to 299 ms.
const FLOOR_EPSILON_MS: f64 = 1e-6;

/// Format seconds as `HH:MM:SS<sep>mmm`.
///
/// Rounding policy:
/// - Whole seconds are floored and the fractional remainder is truncated to milliseconds.
/// - Missing, negative, and non-finite values render as zero rather than failing.
pub(crate) fn format_timestamp(seconds: Option<f64>, sep: MillisSeparator) -> String {
    let seconds = match seconds {
        Some(s) if s.is_finite() && s > 0.0 => s,
        _ => 0.0,
    };

    let total_ms = (seconds * 1000.0 + FLOOR_EPSILON_MS).floor() as u64;

    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;

    let s = total_s % 60;
    let total_m = total_s / 60;

    let m = total_m % 60;
    let h = total_m / 60;

    let sep = sep.as_char();
    format!("{h:02}:{m:02}:{s:02}{sep}{ms:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_fixed_width_fields() {
        assert_eq!(format_timestamp(Some(1.5), MillisSeparator::Comma), "00:00:01,500");
        assert_eq!(format_timestamp(Some(61.2), MillisSeparator::Period), "00:01:01.200");
        assert_eq!(format_timestamp(Some(3723.004), MillisSeparator::Comma), "01:02:03,004");
    }

    #[test]
    fn truncates_sub_millisecond_remainder() {
        assert_eq!(format_timestamp(Some(1.2345), MillisSeparator::Period), "00:00:01.234");
        assert_eq!(format_timestamp(Some(0.0004), MillisSeparator::Period), "00:00:00.000");
        assert_eq!(format_timestamp(Some(0.3), MillisSeparator::Period), "00:00:00.300");
    }

    #[test]
    fn invalid_values_render_as_zero() {
        for bad in [None, Some(f64::NAN), Some(f64::INFINITY), Some(-2.0)] {
            assert_eq!(format_timestamp(bad, MillisSeparator::Comma), "00:00:00,000");
        }
    }

    #[test]
    fn hours_are_not_wrapped() {
        assert_eq!(
            format_timestamp(Some(100.0 * 3600.0), MillisSeparator::Comma),
            "100:00:00,000"
        );
    }
}
