//! Bar geometry shared by the scanner and the indicator engine

use crate::{OHLCVExt, Result, ZoneError, OHLCV};

/// Range size of a single bar. Fails on `high < low`; malformed bars are never corrected.
#[inline]
pub fn range_size<T: OHLCV>(bar: &T) -> Result<f64> {
  let size = bar.range_size();
  if size < 0.0 {
    return Err(ZoneError::InvalidBar { index: 0, reason: "high < low" });
  }
  Ok(size)
}

/// Range sizes for a whole series, reporting the index of the first malformed bar.
pub fn range_sizes<T: OHLCV>(bars: &[T]) -> Result<Vec<f64>> {
  bars
    .iter()
    .enumerate()
    .map(|(i, bar)| {
      range_size(bar).map_err(|e| match e {
        ZoneError::InvalidBar { reason, .. } => ZoneError::InvalidBar { index: i, reason },
        other => other,
      })
    })
    .collect()
}

/// Lowest low over `bars[i..]` for every `i`.
pub fn suffix_min_lows<T: OHLCV>(bars: &[T]) -> Vec<f64> {
  let mut out = vec![f64::INFINITY; bars.len()];
  let mut lowest = f64::INFINITY;
  for (i, bar) in bars.iter().enumerate().rev() {
    lowest = lowest.min(bar.low());
    out[i] = lowest;
  }
  out
}
