//! Timecode parsing, formatting, and frame-rate reconciliation.
//!
//! Two string formats flow through the pipeline and they are never
//! interchangeable: the editor exports `HH:MM:SS:FF` (a frame count in the
//! last field), while the encoder reports `HH:MM:SS.ff` (a centisecond
//! fraction). Both are parsed strictly; a field of the wrong width is an
//! error, not a best-effort guess.

use std::sync::OnceLock;

use regex::Regex;

use super::{FrameRate, Rational, Timestamp};
use crate::error::{TapecutError, TapecutResult};

static TIMECODE_RE: OnceLock<Regex> = OnceLock::new();
static TIMESTAMP_RE: OnceLock<Regex> = OnceLock::new();

/// Parse an editor timecode (`HH:MM:SS:FF`) into seconds under the given
/// nominal rate.
///
/// The frame field contributes `FF / rate` seconds. No drop-frame correction
/// happens here; callers that need to reconcile against the actual media rate
/// go through [`reconcile_timecode`].
pub fn timecode_to_seconds(timecode: &str, rate: FrameRate) -> TapecutResult<Timestamp> {
    let re = TIMECODE_RE
        .get_or_init(|| Regex::new(r"^(\d{2}):(\d{2}):(\d{2}):(\d{2})$").unwrap());
    let caps = re
        .captures(timecode)
        .ok_or_else(|| TapecutError::InvalidTimecode {
            timecode: timecode.to_string(),
        })?;

    let hours: u32 = caps[1].parse().unwrap();
    let minutes: u32 = caps[2].parse().unwrap();
    let seconds: u32 = caps[3].parse().unwrap();
    let frames: i128 = caps[4].parse().unwrap();

    let whole = Timestamp::from_parts(hours, minutes, seconds, "")?;
    let frac = Rational::from_int(frames) / rate.as_rational();
    Ok(Timestamp::from_rational(whole.as_rational() + frac))
}

/// Parse an encoder timestamp (`HH:MM:SS.ff`) into seconds.
///
/// This is the format of the encoder's `Duration:` announcement and `time=`
/// progress fields. The fraction is centiseconds, parsed digit-by-digit.
pub fn timestamp_to_seconds(timestamp: &str) -> TapecutResult<Timestamp> {
    let re = TIMESTAMP_RE
        .get_or_init(|| Regex::new(r"^(\d{2}):(\d{2}):(\d{2})\.(\d{2})$").unwrap());
    let caps = re
        .captures(timestamp)
        .ok_or_else(|| TapecutError::InvalidTimestamp {
            timestamp: timestamp.to_string(),
        })?;

    let hours: u32 = caps[1].parse().unwrap();
    let minutes: u32 = caps[2].parse().unwrap();
    let seconds: u32 = caps[3].parse().unwrap();
    Timestamp::from_parts(hours, minutes, seconds, &caps[4])
}

/// Format a timestamp as `HH:MM:SS.ff`.
///
/// Round-trips any value produced by [`timestamp_to_seconds`] digit-for-digit.
/// Values that do not fall exactly on a centisecond are rounded ties-to-even.
pub fn format_hmsff(t: Timestamp) -> String {
    let centis = (t.as_rational() * Rational::from_int(100)).round_ties_even();
    let (whole, frac) = (centis / 100, centis % 100);
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let seconds = whole % 60;
    format!("{:02}:{:02}:{:02}.{:02}", hours, minutes, seconds, frac)
}

/// Convert an editor-exported timecode into true elapsed seconds in the
/// source media.
///
/// The editor labels frames assuming an exact 60 fps, but the capture really
/// runs at 60000/1001. Parsing at the nominal rate and then dividing by
/// (actual / nominal) = 1000/1001 stretches the elapsed time back out, so
/// `00:00:01:00` reconciles to exactly 1001/1000 seconds.
pub fn reconcile_timecode(timecode: &str) -> TapecutResult<Timestamp> {
    let at_nominal = timecode_to_seconds(timecode, FrameRate::Nominal60)?;
    let ratio = FrameRate::NtscDrop.as_rational() / FrameRate::Nominal60.as_rational();
    Ok(Timestamp::from_rational(at_nominal.as_rational() / ratio))
}
