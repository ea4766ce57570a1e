//! Per-bar indicator series
//!
//! Everything here is aligned 1:1 with the input bars. Rolling windows are
//! trailing-inclusive (the window ending at `i` includes bar `i`) and yield
//! `None` until a full window is available; nothing is back-filled with zero.
//!
//! # Example
//!
//! ```rust
//! use basezone::indicators::{ema, rolling_mean};
//! use basezone::Period;
//!
//! let closes = [1.0, 2.0, 3.0];
//! let fast = ema(&closes, Period::new(3).unwrap());
//! assert_eq!(fast, vec![1.0, 1.5, 2.25]);
//!
//! let avg = rolling_mean(&closes, Period::new(2).unwrap());
//! assert_eq!(avg, vec![None, Some(1.5), Some(2.5)]);
//! ```

use crate::{params::ScanConfig, zones::helpers::range_sizes, Period, Result, Trend, OHLCV};

// ============================================================
// FRAME
// ============================================================

/// Derived series for a whole bar slice
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct IndicatorFrame {
  /// high - low
  pub range_size: Vec<f64>,
  pub true_range: Vec<f64>,
  /// Simple mean of true range over `atr_window`
  pub atr: Vec<Option<f64>>,
  pub ema_fast: Vec<f64>,
  pub ema_slow: Vec<f64>,
  /// Simple mean of volume over `volume_window`
  pub volume_avg: Vec<Option<f64>>,
}

/// One row of an [`IndicatorFrame`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRow {
  pub range_size: f64,
  pub true_range: f64,
  pub atr: Option<f64>,
  pub ema_fast: f64,
  pub ema_slow: f64,
  pub volume_avg: Option<f64>,
}

impl IndicatorRow {
  /// Bullish iff the fast EMA is strictly above the slow one
  #[inline]
  pub fn trend(&self) -> Trend {
    if self.ema_fast > self.ema_slow {
      Trend::Bullish
    } else {
      Trend::Bearish
    }
  }
}

impl IndicatorFrame {
  #[inline]
  pub fn len(&self) -> usize {
    self.range_size.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.range_size.is_empty()
  }

  /// All columns have the same length
  pub fn is_aligned(&self) -> bool {
    let n = self.len();
    self.true_range.len() == n
      && self.atr.len() == n
      && self.ema_fast.len() == n
      && self.ema_slow.len() == n
      && self.volume_avg.len() == n
  }

  pub fn row(&self, index: usize) -> Option<IndicatorRow> {
    Some(IndicatorRow {
      range_size: *self.range_size.get(index)?,
      true_range: *self.true_range.get(index)?,
      atr:        *self.atr.get(index)?,
      ema_fast:   *self.ema_fast.get(index)?,
      ema_slow:   *self.ema_slow.get(index)?,
      volume_avg: *self.volume_avg.get(index)?,
    })
  }

  pub fn last(&self) -> Option<IndicatorRow> {
    self.len().checked_sub(1).and_then(|i| self.row(i))
  }
}

// ============================================================
// PROVIDER
// ============================================================

/// Source of the indicator frame consumed by the scanner and scorer
pub trait IndicatorProvider: Send + Sync {
  fn compute_all<T: OHLCV>(&self, bars: &[T], config: &ScanConfig) -> Result<IndicatorFrame>;

  /// Bars needed before the last row is fully defined (ATR window + 3-bar structure)
  fn min_history(&self, config: &ScanConfig) -> usize {
    config.atr_window.get() + 3
  }
}

/// EMA / true range / SMA implementation driven by [`ScanConfig`] spans and windows
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIndicatorProvider;

impl IndicatorProvider for DefaultIndicatorProvider {
  fn compute_all<T: OHLCV>(&self, bars: &[T], config: &ScanConfig) -> Result<IndicatorFrame> {
    let range_size = range_sizes(bars)?;
    let closes: Vec<f64> = bars.iter().map(|b| b.close()).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume()).collect();
    let true_range = true_range(bars);

    Ok(IndicatorFrame {
      atr: rolling_mean(&true_range, config.atr_window),
      ema_fast: ema(&closes, config.fast_span),
      ema_slow: ema(&closes, config.slow_span),
      volume_avg: rolling_mean(&volumes, config.volume_window),
      range_size,
      true_range,
    })
  }
}

// ============================================================
// SERIES FUNCTIONS
// ============================================================

/// Exponential moving average with `alpha = 2 / (span + 1)`, seeded with the first value.
pub fn ema(values: &[f64], span: Period) -> Vec<f64> {
  let alpha = 2.0 / (span.get() as f64 + 1.0);
  let mut out = Vec::with_capacity(values.len());
  let mut prev: Option<f64> = None;

  for &value in values {
    let next = match prev {
      None => value,
      Some(p) => alpha * value + (1.0 - alpha) * p,
    };
    out.push(next);
    prev = Some(next);
  }

  out
}

/// True range per bar. The first bar has no previous close, so its TR is its own range.
pub fn true_range<T: OHLCV>(bars: &[T]) -> Vec<f64> {
  let mut out = Vec::with_capacity(bars.len());
  let mut prev_close: Option<f64> = None;

  for bar in bars {
    let range = bar.high() - bar.low();
    let tr = match prev_close {
      None => range,
      Some(pc) => range.max((bar.high() - pc).abs()).max((bar.low() - pc).abs()),
    };
    out.push(tr);
    prev_close = Some(bar.close());
  }

  out
}

/// Trailing simple mean over `window` values, `None` until the window is full.
pub fn rolling_mean(values: &[f64], window: Period) -> Vec<Option<f64>> {
  let mut acc = RollingMean::new(window);
  values.iter().map(|&v| acc.push(v)).collect()
}

/// Ring buffer of the last `window` values with a running sum
#[derive(Debug, Clone)]
pub struct RollingMean {
  buf: Vec<f64>,
  head: usize,
  filled: usize,
  sum: f64,
}

impl RollingMean {
  pub fn new(window: Period) -> Self {
    Self { buf: vec![0.0; window.get()], head: 0, filled: 0, sum: 0.0 }
  }

  /// Push a value and return the mean if the window is full.
  pub fn push(&mut self, value: f64) -> Option<f64> {
    let window = self.buf.len();
    if self.filled == window {
      self.sum -= self.buf[self.head];
    } else {
      self.filled += 1;
    }
    self.buf[self.head] = value;
    self.sum += value;
    self.head = (self.head + 1) % window;

    (self.filled == window).then(|| self.sum / window as f64)
  }
}

// ============================================================
// TESTS
// ============================================================
