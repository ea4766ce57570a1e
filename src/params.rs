//! Scan configuration and parameter metadata
//!
//! Every numeric option of [`ScanConfig`] is described by a [`ParamMeta`]
//! entry, enabling:
//! - Parameter documentation
//! - Range validation of externally supplied values
//! - Construction from a flat name -> value map
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use basezone::params::ScanConfig;
//!
//! let mut params = HashMap::new();
//! params.insert("entry_threshold_pct", 5.0);
//! params.insert("volume_bonus_ratio", 1.2);
//!
//! let config = ScanConfig::with_params(&params).unwrap();
//! assert_eq!(config.entry_threshold_pct, 5.0);
//! assert_eq!(config.fast_span.get(), 20);
//! ```

use std::collections::HashMap;

use crate::{
  zones::{ScoreBase, SelectionPolicy, StructureThresholds},
  Multiple, Period, Result, ZoneError,
};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Positive multiplier (leg ratios, bonus thresholds)
  Multiple,
  /// Period value (positive integer)
  Period,
  /// Percentage distance
  Percent,
  /// Integer score in 0..=100
  Score,
}

/// Metadata for a single configuration parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "k_out_min")
  pub name: &'static str,
  pub param_type: ParamType,
  pub default: f64,
  /// Accepted range (min, max), inclusive
  pub range: (f64, f64),
  /// Human-readable description
  pub description: &'static str,
}

impl ParamMeta {
  pub const fn multiple(name: &'static str, default: f64, range: (f64, f64), description: &'static str) -> Self {
    Self { name, param_type: ParamType::Multiple, default, range, description }
  }

  pub const fn period(name: &'static str, default: f64, range: (f64, f64), description: &'static str) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description }
  }

  pub const fn percent(name: &'static str, default: f64, range: (f64, f64), description: &'static str) -> Self {
    Self { name, param_type: ParamType::Percent, default, range, description }
  }

  pub const fn score(name: &'static str, default: f64, range: (f64, f64), description: &'static str) -> Self {
    Self { name, param_type: ParamType::Score, default, range, description }
  }

  /// Validate a value for this parameter
  pub fn validate(&self, value: f64) -> Result<()> {
    if value.is_nan() {
      return Err(ZoneError::InvalidValue("parameter cannot be NaN"));
    }
    let (min, max) = self.range;
    if value < min || value > max {
      return Err(ZoneError::OutOfRange { field: self.name, value, min, max });
    }
    match self.param_type {
      ParamType::Period | ParamType::Score if value.fract() != 0.0 => {
        Err(ZoneError::InvalidValue("Period and score parameters must be integers"))
      },
      _ => Ok(()),
    }
  }
}

static SCAN_PARAMS: [ParamMeta; 13] = [
  ParamMeta::period("fast_span", 20.0, (1.0, 500.0), "Span of the fast close EMA"),
  ParamMeta::period("slow_span", 50.0, (2.0, 1000.0), "Span of the slow close EMA"),
  ParamMeta::period("atr_window", 14.0, (1.0, 500.0), "Trailing window of the true-range mean"),
  ParamMeta::period("volume_window", 20.0, (1.0, 500.0), "Trailing window of the volume mean"),
  ParamMeta::multiple("k_in_min", 1.5, (0.1, 100.0), "Leg-in / anchor range required to qualify"),
  ParamMeta::multiple("k_out_min", 2.0, (0.1, 100.0), "Leg-out / anchor range required to qualify"),
  ParamMeta::multiple("k_in_golden", 2.0, (0.1, 100.0), "Leg-in / anchor range for the golden tag"),
  ParamMeta::multiple("k_out_golden", 4.0, (0.1, 100.0), "Leg-out / anchor range for the golden tag"),
  ParamMeta::percent("entry_threshold_pct", 3.5, (0.0, 100.0), "Max % above the ceiling still considered an entry"),
  ParamMeta::score("reliability_threshold", 60.0, (0.0, 100.0), "Minimum score for BuyAuthorized"),
  ParamMeta::multiple("momentum_bonus_ratio", 1.0, (0.1, 10.0), "TR / ATR above which momentum bonus is granted"),
  ParamMeta::multiple("volume_bonus_ratio", 1.0, (0.1, 10.0), "Volume / average above which volume bonus is granted"),
  ParamMeta::period("white_area_lookback", 7.0, (1.0, 250.0), "Bars before the last one forming the maturity barrier"),
];

// ============================================================
// SCAN CONFIG
// ============================================================

/// Engine configuration. Missing fields deserialize to their defaults.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScanConfig {
  pub fast_span: Period,
  pub slow_span: Period,
  pub atr_window: Period,
  pub volume_window: Period,
  pub k_in_min: Multiple,
  pub k_out_min: Multiple,
  pub k_in_golden: Multiple,
  pub k_out_golden: Multiple,
  pub entry_threshold_pct: f64,
  pub reliability_threshold: u8,
  pub momentum_bonus_ratio: Multiple,
  pub volume_bonus_ratio: Multiple,
  pub white_area_lookback: Period,
  pub selection: SelectionPolicy,
  pub score_base: ScoreBase,
  pub require_golden: bool,
}

impl Default for ScanConfig {
  fn default() -> Self {
    Self {
      fast_span: Period::new_const(20),
      slow_span: Period::new_const(50),
      atr_window: Period::new_const(14),
      volume_window: Period::new_const(20),
      k_in_min: Multiple::new_const(1.5),
      k_out_min: Multiple::new_const(2.0),
      k_in_golden: Multiple::new_const(2.0),
      k_out_golden: Multiple::new_const(4.0),
      entry_threshold_pct: 3.5,
      reliability_threshold: 60,
      momentum_bonus_ratio: Multiple::new_const(1.0),
      volume_bonus_ratio: Multiple::new_const(1.0),
      white_area_lookback: Period::new_const(7),
      selection: SelectionPolicy::default(),
      score_base: ScoreBase::default(),
      require_golden: false,
    }
  }
}

impl ScanConfig {
  /// Metadata for all numeric parameters
  pub fn param_meta() -> &'static [ParamMeta] {
    &SCAN_PARAMS
  }

  /// Build a config from a name -> value map.
  ///
  /// Missing parameters use their default values; unknown names are rejected.
  pub fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    for (&key, &value) in params {
      let meta = Self::param_meta()
        .iter()
        .find(|m| m.name == key)
        .ok_or_else(|| ZoneError::InvalidConfig(format!("unknown parameter `{key}`")))?;
      meta.validate(value)?;
    }

    let d = Self::default();
    let config = Self {
      fast_span: get_period(params, "fast_span", d.fast_span.get())?,
      slow_span: get_period(params, "slow_span", d.slow_span.get())?,
      atr_window: get_period(params, "atr_window", d.atr_window.get())?,
      volume_window: get_period(params, "volume_window", d.volume_window.get())?,
      k_in_min: get_multiple(params, "k_in_min", d.k_in_min.get())?,
      k_out_min: get_multiple(params, "k_out_min", d.k_out_min.get())?,
      k_in_golden: get_multiple(params, "k_in_golden", d.k_in_golden.get())?,
      k_out_golden: get_multiple(params, "k_out_golden", d.k_out_golden.get())?,
      entry_threshold_pct: params.get("entry_threshold_pct").copied().unwrap_or(d.entry_threshold_pct),
      reliability_threshold: params
        .get("reliability_threshold")
        .map(|&v| v as u8)
        .unwrap_or(d.reliability_threshold),
      momentum_bonus_ratio: get_multiple(params, "momentum_bonus_ratio", d.momentum_bonus_ratio.get())?,
      volume_bonus_ratio: get_multiple(params, "volume_bonus_ratio", d.volume_bonus_ratio.get())?,
      white_area_lookback: get_period(params, "white_area_lookback", d.white_area_lookback.get())?,
      ..d
    };
    config.validate()?;
    Ok(config)
  }

  /// Cross-field consistency checks
  pub fn validate(&self) -> Result<()> {
    if self.k_in_golden < self.k_in_min || self.k_out_golden < self.k_out_min {
      return Err(ZoneError::InvalidConfig(
        "golden thresholds must be >= structural thresholds".to_string(),
      ));
    }
    if self.fast_span >= self.slow_span {
      return Err(ZoneError::InvalidConfig(format!(
        "fast_span ({}) must be shorter than slow_span ({})",
        self.fast_span.get(),
        self.slow_span.get()
      )));
    }
    if !self.entry_threshold_pct.is_finite() {
      return Err(ZoneError::InvalidConfig("entry_threshold_pct must be finite".to_string()));
    }
    if self.reliability_threshold > 100 {
      return Err(ZoneError::OutOfRange {
        field: "reliability_threshold",
        value: self.reliability_threshold as f64,
        min: 0.0,
        max: 100.0,
      });
    }
    Ok(())
  }

  /// Scanner thresholds extracted from the config
  pub fn thresholds(&self) -> StructureThresholds {
    StructureThresholds {
      k_in_min: self.k_in_min,
      k_out_min: self.k_out_min,
      k_in_golden: self.k_in_golden,
      k_out_golden: self.k_out_golden,
    }
  }
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Helper to get a Multiple from params with default fallback
pub fn get_multiple(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Multiple> {
  let value = params.get(key).copied().unwrap_or(default);
  Multiple::new(value)
}

/// Helper to get a Period from params with default fallback
pub fn get_period(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<Period> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  Period::new(value as usize)
}

// ============================================================
// TESTS
// ============================================================
