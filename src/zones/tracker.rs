//! Post-anchor violation tracking
//!
//! A zone is violated by every later bar whose low dips below the anchor's
//! ceiling. Appending bars can only add violations, never remove them.

use super::{helpers::suffix_min_lows, scanner::AnchorStructure};
use crate::{ZoneCandidate, OHLCV};

/// Bars strictly after `anchor_index`, up to and including the last bar.
#[inline]
pub fn age(anchor_index: usize, len: usize) -> usize {
  len.saturating_sub(1).saturating_sub(anchor_index)
}

/// Count violations by scanning every bar after the anchor.
pub fn track<T: OHLCV>(anchor: &AnchorStructure, bars: &[T]) -> ZoneCandidate {
  let after = bars.get(anchor.anchor_index + 1..).unwrap_or(&[]);
  let violation_count = after.iter().filter(|b| b.low() < anchor.ceiling).count();
  ZoneCandidate::from_anchor(anchor, violation_count, age(anchor.anchor_index, bars.len()))
}

/// Classify a batch of anchors.
///
/// The lowest low to the right of each anchor is precomputed once, so anchors
/// that were never re-entered skip the bar-by-bar count entirely.
pub fn track_all<T: OHLCV>(anchors: &[AnchorStructure], bars: &[T]) -> Vec<ZoneCandidate> {
  if anchors.is_empty() {
    return Vec::new();
  }
  let lowest_from = suffix_min_lows(bars);

  anchors
    .iter()
    .map(|anchor| {
      let lowest_after = lowest_from.get(anchor.anchor_index + 1).copied().unwrap_or(f64::INFINITY);
      if lowest_after >= anchor.ceiling {
        ZoneCandidate::from_anchor(anchor, 0, age(anchor.anchor_index, bars.len()))
      } else {
        track(anchor, bars)
      }
    })
    .collect()
}

// ============================================================
// TESTS
// ============================================================
