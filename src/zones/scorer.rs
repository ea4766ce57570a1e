//! Zone selection, reliability scoring and entry verdict
//!
//! # Score
//!
//! | Component | Points |
//! |-----------|--------|
//! | Base (bullish EMAs / bearish EMAs / flat) | 40 / 20 / 40 |
//! | Age | `min(age, 30)` |
//! | Momentum (`TR / ATR > momentum_bonus_ratio`) | +15 |
//! | Volume (`volume / avg > volume_bonus_ratio`) | +15 |
//!
//! The total is clamped to `0..=100`. Undefined ratios never earn a bonus.

use std::cmp::Ordering;

use crate::{
  indicators::IndicatorFrame, params::ScanConfig, MarketSnapshot, Period, Trend, Verdict,
  WhiteArea, ZoneCandidate, OHLCV,
};

pub const BASE_BULLISH: u32 = 40;
pub const BASE_BEARISH: u32 = 20;
pub const BASE_FLAT: u32 = 40;
pub const AGE_CAP: usize = 30;
pub const MOMENTUM_BONUS: u32 = 15;
pub const VOLUME_BONUS: u32 = 15;
pub const MAX_SCORE: u32 = 100;

// ============================================================
// POLICIES
// ============================================================

/// Which candidate represents the series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
  /// Any pristine zone beats any violated one, then largest leg-out ratio
  #[default]
  PristineThenStrongest,
  /// Largest leg-out ratio regardless of violations
  Strongest,
  /// Latest anchor
  MostRecent,
  /// Earliest anchor (largest age)
  Oldest,
  /// Any pristine zone beats any violated one, then largest age
  PristineThenOldest,
}

/// How the score's base points are assigned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBase {
  /// 40 when the fast EMA is above the slow one, otherwise 20
  #[default]
  TrendWeighted,
  /// Constant 40
  Flat,
}

// ============================================================
// SELECTION
// ============================================================

/// Pick the representative candidate. Ties on the policy key go to the most recent anchor.
pub fn select(
  candidates: &[ZoneCandidate],
  policy: SelectionPolicy,
  require_golden: bool,
) -> Option<&ZoneCandidate> {
  candidates
    .iter()
    .filter(|c| !require_golden || c.is_golden)
    .max_by(|a, b| compare(policy, a, b).then(a.anchor_index.cmp(&b.anchor_index)))
}

fn compare(policy: SelectionPolicy, a: &ZoneCandidate, b: &ZoneCandidate) -> Ordering {
  match policy {
    SelectionPolicy::PristineThenStrongest => a
      .is_pristine
      .cmp(&b.is_pristine)
      .then_with(|| a.strength().total_cmp(&b.strength())),
    SelectionPolicy::Strongest => a.strength().total_cmp(&b.strength()),
    SelectionPolicy::MostRecent => a.anchor_index.cmp(&b.anchor_index),
    SelectionPolicy::Oldest => a.age.cmp(&b.age),
    SelectionPolicy::PristineThenOldest => {
      a.is_pristine.cmp(&b.is_pristine).then(a.age.cmp(&b.age))
    },
  }
}

// ============================================================
// MARKET SNAPSHOT
// ============================================================

/// Ratio with an undefined or zero denominator propagated as `None`.
#[inline]
pub fn safe_ratio(numerator: f64, denominator: Option<f64>) -> Option<f64> {
  denominator.filter(|d| *d != 0.0 && d.is_finite()).map(|d| numerator / d)
}

/// Highest high over the `lookback` bars before the last one, and whether the last low clears it.
pub fn white_area<T: OHLCV>(bars: &[T], lookback: Period) -> Option<WhiteArea> {
  let last_index = bars.len().checked_sub(1)?;
  let start = last_index.checked_sub(lookback.get())?;
  let barrier = bars[start..last_index].iter().map(|b| b.high()).fold(f64::NEG_INFINITY, f64::max);
  Some(WhiteArea { barrier, clear: bars[last_index].low() > barrier })
}

/// Market state on the last bar. `None` for an empty series.
pub fn snapshot<T: OHLCV>(
  bars: &[T],
  frame: &IndicatorFrame,
  config: &ScanConfig,
) -> Option<MarketSnapshot> {
  let last = bars.last()?;
  let row = frame.last()?;
  let ema_status = row.trend();

  Some(MarketSnapshot {
    price: last.close(),
    ema_status,
    momentum_ratio: safe_ratio(row.true_range, row.atr),
    volume_ratio: safe_ratio(last.volume(), row.volume_avg),
    pulse: ema_status.is_bullish() && last.close() > last.open(),
    white_area: white_area(bars, config.white_area_lookback),
  })
}

// ============================================================
// SCORING
// ============================================================

/// Percent distance of `price` above `ceiling`. `None` for a non-positive ceiling.
#[inline]
pub fn distance_pct(price: f64, ceiling: f64) -> Option<f64> {
  (ceiling > 0.0).then(|| (price - ceiling) * 100.0 / ceiling)
}

/// Composite reliability score, clamped to `0..=100`.
pub fn reliability_score(
  ema_status: Trend,
  age: usize,
  momentum_ratio: Option<f64>,
  volume_ratio: Option<f64>,
  config: &ScanConfig,
) -> u8 {
  let base = match (config.score_base, ema_status) {
    (ScoreBase::Flat, _) => BASE_FLAT,
    (ScoreBase::TrendWeighted, Trend::Bullish) => BASE_BULLISH,
    (ScoreBase::TrendWeighted, Trend::Bearish) => BASE_BEARISH,
  };

  let mut score = base + age.min(AGE_CAP) as u32;
  if momentum_ratio.is_some_and(|r| r > config.momentum_bonus_ratio.get()) {
    score += MOMENTUM_BONUS;
  }
  if volume_ratio.is_some_and(|r| r > config.volume_bonus_ratio.get()) {
    score += VOLUME_BONUS;
  }

  score.min(MAX_SCORE) as u8
}

/// Entry verdict for a selected zone.
pub fn verdict(distance_pct: f64, ema_status: Trend, score: u8, config: &ScanConfig) -> Verdict {
  if distance_pct >= config.entry_threshold_pct {
    Verdict::DoNotChase
  } else if ema_status.is_bullish() && score >= config.reliability_threshold {
    Verdict::BuyAuthorized
  } else {
    Verdict::Watching
  }
}

/// Distance, score and verdict for one selected zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
  pub distance_pct: Option<f64>,
  pub score: Option<u8>,
  pub verdict: Verdict,
}

impl Assessment {
  pub fn no_setup() -> Self {
    Self { distance_pct: None, score: None, verdict: Verdict::NoSetup }
  }
}

pub fn assess(zone: &ZoneCandidate, ctx: &MarketSnapshot, config: &ScanConfig) -> Assessment {
  let Some(distance) = distance_pct(ctx.price, zone.ceiling) else {
    return Assessment::no_setup();
  };
  let score =
    reliability_score(ctx.ema_status, zone.age, ctx.momentum_ratio, ctx.volume_ratio, config);

  Assessment {
    distance_pct: Some(distance),
    score: Some(score),
    verdict: verdict(distance, ctx.ema_status, score, config),
  }
}

// ============================================================
// TESTS
// ============================================================
