//! Clock-time parsing and formatting.
//!
//! Clip boundaries are whole seconds everywhere in the pipeline, so these
//! helpers work on `u64` rather than fractional time. Accepted input shapes
//! match what users paste into the front ends: `HH:MM:SS`, `MM:SS`, or a bare
//! seconds count.

use thiserror::Error;

/// Parse a clock string to total seconds.
///
/// Supports:
/// - `HH:MM:SS` (hours may exceed two digits)
/// - `MM:SS`
/// - `SS` (any digit string)
///
/// Colon-separated fields after the first must be exactly two digits, the way
/// a player displays them; anything else is rejected rather than guessed at.
///
/// # Examples
/// ```
/// use ppuclip_models::timestamp::parse_hms;
/// assert_eq!(parse_hms("01:23:45").unwrap(), 5025);
/// assert_eq!(parse_hms("23:45").unwrap(), 1425);
/// assert_eq!(parse_hms("145").unwrap(), 145);
/// ```
pub fn parse_hms(input: &str) -> Result<u64, TimestampError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TimestampError::Empty);
    }

    let parts: Vec<&str> = input.split(':').collect();
    if parts.len() > 3 {
        return Err(TimestampError::InvalidFormat(input.to_string()));
    }

    // Leading field: one or more digits. Trailing fields: exactly two digits.
    for (idx, part) in parts.iter().enumerate() {
        let shape_ok = if idx == 0 {
            !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
        } else {
            part.len() == 2 && part.chars().all(|c| c.is_ascii_digit())
        };
        if !shape_ok {
            return Err(TimestampError::InvalidFormat(input.to_string()));
        }
    }

    // Base-60 fold covers all three shapes: a bare count stays as-is, M:S
    // becomes M*60+S, H:M:S becomes H*3600+M*60+S.
    let mut total: u64 = 0;
    for part in &parts {
        let field: u64 = part
            .parse()
            .map_err(|_| TimestampError::InvalidFormat(input.to_string()))?;
        total = total
            .checked_mul(60)
            .and_then(|t| t.checked_add(field))
            .ok_or(TimestampError::OutOfRange)?;
    }
    Ok(total)
}

/// Format seconds as zero-padded `HH:MM:SS` for display.
///
/// Hours widen past two digits instead of wrapping, so
/// `parse_hms(format_hms(x)) == x` holds for every value.
pub fn format_hms(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Format seconds as zero-padded `HHMMSS`, the filename form.
pub fn format_compact(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    format!("{:02}{:02}{:02}", hours, minutes, secs)
}

/// Clock string parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// Input is empty or whitespace only
    #[error("time string is empty")]
    Empty,

    /// Input does not match HH:MM:SS, MM:SS, or SS
    #[error("invalid time '{0}': use HH:MM:SS, MM:SS, or seconds")]
    InvalidFormat(String),

    /// Value does not fit in 64 bits of seconds
    #[error("time value out of range")]
    OutOfRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hh_mm_ss() {
        assert_eq!(parse_hms("00:00:00").unwrap(), 0);
        assert_eq!(parse_hms("01:23:45").unwrap(), 5025);
        assert_eq!(parse_hms("10:00:00").unwrap(), 36000);
        assert_eq!(parse_hms("100:00:01").unwrap(), 360001);
    }

    #[test]
    fn parses_mm_ss() {
        assert_eq!(parse_hms("23:45").unwrap(), 1425);
        assert_eq!(parse_hms("0:30").unwrap(), 30);
    }

    #[test]
    fn parses_bare_seconds() {
        assert_eq!(parse_hms("145").unwrap(), 145);
        assert_eq!(parse_hms("0").unwrap(), 0);
        assert_eq!(parse_hms(" 90 ").unwrap(), 90);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_hms(""), Err(TimestampError::Empty));
        assert_eq!(parse_hms("   "), Err(TimestampError::Empty));
        assert!(matches!(parse_hms("bad"), Err(TimestampError::InvalidFormat(_))));
        assert!(matches!(parse_hms("1:2:3"), Err(TimestampError::InvalidFormat(_))));
        assert!(matches!(parse_hms("1:2"), Err(TimestampError::InvalidFormat(_))));
        assert!(matches!(parse_hms("1:23:45:00"), Err(TimestampError::InvalidFormat(_))));
        assert!(matches!(parse_hms("-5"), Err(TimestampError::InvalidFormat(_))));
        assert!(matches!(parse_hms("12:3a"), Err(TimestampError::InvalidFormat(_))));
    }

    #[test]
    fn formats_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(5025), "01:23:45");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(360000), "100:00:00");
    }

    #[test]
    fn formats_compact() {
        assert_eq!(format_compact(0), "000000");
        assert_eq!(format_compact(5025), "012345");
        assert_eq!(format_compact(2293), "003813");
    }

    #[test]
    fn parse_inverts_format() {
        for x in [0, 1, 59, 60, 61, 3599, 3600, 5025, 86399, 86400, 360001] {
            assert_eq!(parse_hms(&format_hms(x)).unwrap(), x, "roundtrip {}", x);
        }
    }
}
