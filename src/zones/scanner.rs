//! Leg-in / anchor / leg-out structure scanner
//!
//! For every bar `i` with a neighbour on each side, the anchor's range is
//! compared against the bars before (leg-in) and after (leg-out) it. All
//! qualifying anchors are emitted in chronological order; no selection happens
//! here so downstream policies can choose without rescanning.

use chrono::NaiveDate;
use tracing::trace;

use crate::{Multiple, OHLCV};

/// Minimum leg multiples of the anchor range
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StructureThresholds {
  /// leg_in / anchor required to qualify
  pub k_in_min: Multiple,
  /// leg_out / anchor required to qualify
  pub k_out_min: Multiple,
  pub k_in_golden: Multiple,
  pub k_out_golden: Multiple,
}

impl Default for StructureThresholds {
  fn default() -> Self {
    Self {
      k_in_min: Multiple::new_const(1.5),
      k_out_min: Multiple::new_const(2.0),
      k_in_golden: Multiple::new_const(2.0),
      k_out_golden: Multiple::new_const(4.0),
    }
  }
}

/// A qualifying anchor before post-anchor tracking
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct AnchorStructure {
  pub anchor_index: usize,
  pub anchor_date: Option<NaiveDate>,
  pub ceiling: f64,
  pub floor: f64,
  pub leg_in_ratio: f64,
  pub leg_out_ratio: f64,
  pub is_golden: bool,
}

/// Enumerate every qualifying anchor in `[1, n - 2]`.
///
/// `range_size` must be aligned with `bars`; extra entries on either side are ignored.
pub fn scan_anchors<T: OHLCV>(
  bars: &[T],
  range_size: &[f64],
  thresholds: &StructureThresholds,
) -> Vec<AnchorStructure> {
  let n = bars.len().min(range_size.len());
  if n < 3 {
    return Vec::new();
  }

  (1..n - 1).filter_map(|i| anchor_at(bars, range_size, i, thresholds)).collect()
}

/// Test a single index as the anchor of a structure.
pub fn anchor_at<T: OHLCV>(
  bars: &[T],
  range_size: &[f64],
  index: usize,
  thresholds: &StructureThresholds,
) -> Option<AnchorStructure> {
  let leg_in = *range_size.get(index.checked_sub(1)?)?;
  let anchor = *range_size.get(index)?;
  let leg_out = *range_size.get(index + 1)?;
  let bar = bars.get(index)?;

  // A zero-range bar cannot anchor a structure
  if anchor <= 0.0 {
    return None;
  }

  // Compare on the ratios themselves so reported ratios never sit below the thresholds
  let leg_in_ratio = leg_in / anchor;
  let leg_out_ratio = leg_out / anchor;
  if leg_in_ratio < thresholds.k_in_min.get() || leg_out_ratio < thresholds.k_out_min.get() {
    return None;
  }

  let is_golden =
    leg_in_ratio >= thresholds.k_in_golden.get() && leg_out_ratio >= thresholds.k_out_golden.get();

  trace!(index, leg_in_ratio, leg_out_ratio, is_golden, "anchor qualified");

  Some(AnchorStructure {
    anchor_index: index,
    anchor_date: bar.date(),
    ceiling: bar.high(),
    floor: bar.low(),
    leg_in_ratio,
    leg_out_ratio,
    is_golden,
  })
}

// ============================================================
// TESTS
// ============================================================
