//! Quality re-encode trimming at exact boundaries.

use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::config::Config;
use crate::error::{TapecutError, TapecutResult};
use crate::exec::run_checked;
use crate::interchange::ClipDescriptor;
use crate::time::{reconcile_timecode, Timestamp};

use super::TrimBounds;

/// Compute exact trim bounds with no keyframe snapping.
pub fn compute_reencode_bounds(
    desired_in: Timestamp,
    desired_out: Timestamp,
) -> TapecutResult<TrimBounds> {
    if desired_out <= desired_in {
        return Err(TapecutError::InvalidClipRange {
            in_point: desired_in.to_decimal_string(),
            out_point: desired_out.to_decimal_string(),
        });
    }
    Ok(TrimBounds {
        start: desired_in,
        duration: desired_out.as_rational() - desired_in.as_rational(),
    })
}

/// Trim one clip by re-encoding video at the given CRF and copying audio.
///
/// The re-encode lets the cut land exactly on the requested boundary; the
/// slow preset with a low CRF keeps the generational loss imperceptible.
pub fn trim_with_reencode(
    config: &Config,
    src: &Path,
    dst: &Path,
    clip: &ClipDescriptor,
    crf: u8,
) -> TapecutResult<()> {
    let desired_in = reconcile_timecode(&clip.in_timecode)?;
    let desired_out = reconcile_timecode(&clip.out_timecode)?;
    let bounds = compute_reencode_bounds(desired_in, desired_out)?;

    let mut cmd = Command::new(&config.ffmpeg_program);
    cmd.arg("-ss")
        .arg(bounds.start.to_decimal_string())
        .arg("-i")
        .arg(src)
        .arg("-t")
        .arg(bounds.duration.to_decimal_string(9))
        .args(["-map", "0"])
        .args(["-c:v", "libx264", "-preset", "slow"])
        .args(["-crf", &crf.to_string()])
        .args(["-c:a", "copy"])
        .arg(dst);

    info!(
        "Re-encoding {} -> {} (in {}, duration {}, crf {})",
        src.display(),
        dst.display(),
        bounds.start.to_decimal_string(),
        bounds.duration.to_decimal_string(9),
        crf
    );
    run_checked(cmd)
}
