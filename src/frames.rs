//! Cut-frame derivation.
//!
//! Detected cut timestamps are continuous values in true seconds; the editor
//! collaborator wants integer frame indices at the capture rate. Two nearby
//! scene changes can round to the same frame, so the result is a
//! deduplicated ascending list.

use std::collections::BTreeSet;

use crate::time::{FrameRate, Timestamp};

/// Convert cut timestamps to frame indices at 60000/1001 fps.
///
/// Rounding is ties-to-even: a timestamp exactly between two frames resolves
/// to the even index. Output is sorted ascending with duplicates collapsed,
/// regardless of input order.
pub fn derive_cut_frames(cut_times: &[Timestamp]) -> Vec<u64> {
    let rate = FrameRate::NtscDrop.as_rational();
    let frames: BTreeSet<u64> = cut_times
        .iter()
        .map(|t| (t.as_rational() * rate).round_ties_even() as u64)
        .collect();
    frames.into_iter().collect()
}
