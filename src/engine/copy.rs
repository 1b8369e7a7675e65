//! Zero-recode stream-copy trimming.

use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::config::Config;
use crate::error::{TapecutError, TapecutResult};
use crate::exec::run_checked;
use crate::interchange::ClipDescriptor;
use crate::probe::KeyframeIndex;
use crate::time::{reconcile_timecode, Timestamp};

use super::TrimBounds;

/// Compute stream-copy trim bounds for the desired in/out points.
///
/// The copied stream can only begin decoding at a keyframe, so the in-point
/// is pulled back to the nearest keyframe at or before the desired one. The
/// duration is measured from the snapped in-point to the desired out-point:
/// snapping may only extend the clip's head, never shift or shrink its tail.
pub fn compute_copy_bounds(
    index: &KeyframeIndex,
    desired_in: Timestamp,
    desired_out: Timestamp,
) -> TapecutResult<TrimBounds> {
    if desired_out <= desired_in {
        return Err(TapecutError::InvalidClipRange {
            in_point: desired_in.to_decimal_string(),
            out_point: desired_out.to_decimal_string(),
        });
    }
    let snapped_in = index.nearest_at_or_before(desired_in)?;
    Ok(TrimBounds {
        start: snapped_in,
        duration: desired_out.as_rational() - snapped_in.as_rational(),
    })
}

/// Trim one clip by copying every stream into a new container.
pub fn trim_stream_copy(
    config: &Config,
    src: &Path,
    dst: &Path,
    clip: &ClipDescriptor,
    index: &KeyframeIndex,
) -> TapecutResult<()> {
    let desired_in = reconcile_timecode(&clip.in_timecode)?;
    let desired_out = reconcile_timecode(&clip.out_timecode)?;
    let bounds = compute_copy_bounds(index, desired_in, desired_out)?;

    let mut cmd = Command::new(&config.ffmpeg_program);
    cmd.arg("-ss")
        .arg(bounds.start.to_decimal_string())
        .arg("-i")
        .arg(src)
        .arg("-t")
        .arg(bounds.duration.to_decimal_string(9))
        .args(["-map", "0", "-c", "copy"])
        .arg(dst);

    info!(
        "Stream-copying {} -> {} (in {}, duration {})",
        src.display(),
        dst.display(),
        bounds.start.to_decimal_string(),
        bounds.duration.to_decimal_string(9)
    );
    run_checked(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Rational;

    fn index(values: &[&str]) -> KeyframeIndex {
        KeyframeIndex::from_times(
            "test.mkv",
            values
                .iter()
                .map(|v| Timestamp::parse_decimal(v).unwrap())
                .collect(),
        )
    }

    fn at(v: &str) -> Timestamp {
        Timestamp::parse_decimal(v).unwrap()
    }

    #[test]
    fn test_snap_preserves_out_point() {
        let idx = index(&["0.0", "1.0", "2.0", "3.0"]);
        let bounds = compute_copy_bounds(&idx, at("1.4"), at("3.2")).unwrap();
        assert_eq!(bounds.start, at("1.0"));
        // Duration measured from the snapped in-point: 2.2, not 1.8
        assert_eq!(bounds.duration, Rational::new(22, 10));
    }

    #[test]
    fn test_in_point_on_keyframe_does_not_move() {
        let idx = index(&["0.0", "1.0", "2.0"]);
        let bounds = compute_copy_bounds(&idx, at("2.0"), at("2.5")).unwrap();
        assert_eq!(bounds.start, at("2.0"));
        assert_eq!(bounds.duration, Rational::new(1, 2));
    }

    #[test]
    fn test_in_point_before_first_keyframe_fails() {
        let idx = index(&["1.0", "2.0"]);
        assert!(matches!(
            compute_copy_bounds(&idx, at("0.5"), at("1.5")),
            Err(TapecutError::NoKeyframeBefore { .. })
        ));
    }

    #[test]
    fn test_inverted_range_fails() {
        let idx = index(&["0.0", "1.0"]);
        assert!(matches!(
            compute_copy_bounds(&idx, at("1.5"), at("1.5")),
            Err(TapecutError::InvalidClipRange { .. })
        ));
    }

    #[test]
    fn test_empty_index_fails() {
        let idx = index(&[]);
        assert!(matches!(
            compute_copy_bounds(&idx, at("1.0"), at("2.0")),
            Err(TapecutError::EmptyKeyframeIndex { .. })
        ));
    }
}
