//! # basezone - leg-in / base / leg-out zone scanner
//!
//! Scans a daily OHLCV series for three-bar range structures: a narrow "base"
//! (anchor) bar flanked by a wider incoming leg and a much wider outgoing leg.
//! Every structure is tracked for later re-entries into its range, and the most
//! relevant one is scored and turned into an entry verdict.
//!
//! ## Quick Start
//!
//! ```rust
//! use basezone::prelude::*;
//!
//! // Define your OHLCV data
//! struct Candle { o: f64, h: f64, l: f64, c: f64, v: f64 }
//!
//! impl OHLCV for Candle {
//!     fn open(&self) -> f64 { self.o }
//!     fn high(&self) -> f64 { self.h }
//!     fn low(&self) -> f64 { self.l }
//!     fn close(&self) -> f64 { self.c }
//!     fn volume(&self) -> f64 { self.v }
//! }
//!
//! // Create engine with default thresholds
//! let engine = EngineBuilder::new().build().unwrap();
//!
//! // Scan your data
//! let bars: Vec<Candle> = vec![];
//! let result = engine.scan(&bars).unwrap();
//! assert_eq!(result.verdict, Verdict::NoSetup);
//! ```

use chrono::NaiveDate;
use tracing::{debug, warn};

pub mod indicators;
pub mod params;
pub mod zones;

pub mod prelude {
    pub use crate::{
        // Indicators
        indicators::{DefaultIndicatorProvider, IndicatorFrame, IndicatorProvider, IndicatorRow},
        // Parameters
        params::{ParamMeta, ParamType, ScanConfig},
        // Zones
        zones::{AnchorStructure, ScoreBase, SelectionPolicy, StructureThresholds},
        Bar,
        DefaultEngine,
        EngineBuilder,
        MarketSnapshot,
        Multiple,
        OHLCVExt,
        Period,
        Result,
        ScanResult,
        Trend,
        Verdict,
        WhiteArea,
        ZoneCandidate,
        ZoneEngine,
        ZoneError,
        OHLCV,
    };
}

use indicators::{DefaultIndicatorProvider, IndicatorFrame, IndicatorProvider};
use params::ScanConfig;
use zones::{scanner, scorer, tracker, AnchorStructure, ScoreBase, SelectionPolicy};

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, ZoneError>;

/// Errors that can occur while scanning a series
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ZoneError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Insufficient data: need {need} bars, got {got}")]
    InsufficientData { need: usize, got: usize },

    #[error("Invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: &'static str },
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Strictly positive, finite multiplier (size ratios, bonus thresholds)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Multiple(f64);

impl Multiple {
    /// Create a new Multiple, validating the value is finite and > 0
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(ZoneError::InvalidValue(
                "Multiple cannot be NaN or infinite",
            ));
        }
        if value <= 0.0 {
            return Err(ZoneError::InvalidValue("Multiple must be > 0"));
        }
        Ok(Self(value))
    }

    /// Create a Multiple from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Multiple {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Multiple {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Multiple::new(value).map_err(serde::de::Error::custom)
    }
}

/// Period (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(ZoneError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLCV TRAITS
// ============================================================

/// Core OHLCV data trait
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;

    /// Trading session date, if the source carries one
    fn date(&self) -> Option<NaiveDate> {
        None
    }
}

/// Extension trait with computed properties for OHLCV data
pub trait OHLCVExt: OHLCV {
    /// Raw high - low. See [`zones::helpers::range_size`] for the checked variant.
    #[inline]
    fn range_size(&self) -> f64 {
        self.high() - self.low()
    }

    #[inline]
    fn is_bullish(&self) -> bool {
        self.close() > self.open()
    }

    /// Validate OHLCV data consistency
    fn validate(&self) -> Result<()> {
        let prices = [self.open(), self.high(), self.low(), self.close()];
        if prices.iter().any(|p| p.is_nan()) {
            return Err(ZoneError::InvalidBar {
                index: 0,
                reason: "NaN in OHLCV",
            });
        }
        if prices.iter().any(|p| p.is_infinite()) {
            return Err(ZoneError::InvalidBar {
                index: 0,
                reason: "Infinite value in OHLCV",
            });
        }
        if self.high() < self.low() {
            return Err(ZoneError::InvalidBar {
                index: 0,
                reason: "high < low",
            });
        }
        if prices.iter().any(|p| *p <= 0.0) {
            return Err(ZoneError::InvalidBar {
                index: 0,
                reason: "non-positive price",
            });
        }
        let volume = self.volume();
        if !volume.is_finite() || volume < 0.0 {
            return Err(ZoneError::InvalidBar {
                index: 0,
                reason: "volume must be finite and non-negative",
            });
        }
        Ok(())
    }
}

impl<T: OHLCV> OHLCVExt for T {}

/// One daily trading session, as supplied by a market-data source
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl OHLCV for Bar {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume as f64
    }

    fn date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

// ============================================================
// SCAN RESULT TYPES
// ============================================================

/// Fast/slow EMA relationship on the last bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Trend {
    Bullish,
    Bearish,
}

impl Trend {
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, Trend::Bullish)
    }
}

/// Trade-readiness verdict for the selected zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Verdict {
    /// No candidate selected
    NoSetup,
    /// Close to the ceiling, bullish trend and reliable enough
    BuyAuthorized,
    /// Close to the ceiling, but trend or score falls short
    Watching,
    /// Price already ran too far above the ceiling
    DoNotChase,
}

/// A detected base structure with its post-anchor history
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ZoneCandidate {
    pub anchor_index: usize,
    pub anchor_date: Option<NaiveDate>,
    /// High of the anchor bar
    pub ceiling: f64,
    /// Low of the anchor bar
    pub floor: f64,
    pub leg_in_ratio: f64,
    pub leg_out_ratio: f64,
    pub is_golden: bool,
    /// Bars after the anchor whose low dropped below the ceiling
    pub violation_count: usize,
    pub is_pristine: bool,
    /// Bars strictly after the anchor, up to and including the last bar
    pub age: usize,
}

impl ZoneCandidate {
    pub fn from_anchor(anchor: &AnchorStructure, violation_count: usize, age: usize) -> Self {
        Self {
            anchor_index: anchor.anchor_index,
            anchor_date: anchor.anchor_date,
            ceiling: anchor.ceiling,
            floor: anchor.floor,
            leg_in_ratio: anchor.leg_in_ratio,
            leg_out_ratio: anchor.leg_out_ratio,
            is_golden: anchor.is_golden,
            violation_count,
            is_pristine: violation_count == 0,
            age,
        }
    }

    /// Expansion strength used by the selection policies
    #[inline]
    pub fn strength(&self) -> f64 {
        self.leg_out_ratio
    }
}

/// Maturity barrier: highest high over the bars preceding the last one
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct WhiteArea {
    pub barrier: f64,
    /// Last bar's low sits above the barrier
    pub clear: bool,
}

/// Market state on the last bar
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct MarketSnapshot {
    pub price: f64,
    pub ema_status: Trend,
    /// true_range / ATR; `None` while the ATR window is incomplete
    pub momentum_ratio: Option<f64>,
    /// volume / volume average; `None` while the window is incomplete or the average is zero
    pub volume_ratio: Option<f64>,
    /// Bullish EMAs and a bullish last candle
    pub pulse: bool,
    pub white_area: Option<WhiteArea>,
}

/// Full outcome of a single scan
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScanResult {
    /// All structural candidates, chronological
    pub candidates: Vec<ZoneCandidate>,
    pub selected: Option<ZoneCandidate>,
    /// `None` only for an empty series
    pub context: Option<MarketSnapshot>,
    pub distance_pct: Option<f64>,
    pub score: Option<u8>,
    pub verdict: Verdict,
}

impl ScanResult {
    fn empty() -> Self {
        Self {
            candidates: Vec::new(),
            selected: None,
            context: None,
            distance_pct: None,
            score: None,
            verdict: Verdict::NoSetup,
        }
    }

    /// Candidates that still satisfy the golden thresholds
    pub fn golden(&self) -> impl Iterator<Item = &ZoneCandidate> {
        self.candidates.iter().filter(|c| c.is_golden)
    }

    /// Candidates never re-entered since formation
    pub fn pristine(&self) -> impl Iterator<Item = &ZoneCandidate> {
        self.candidates.iter().filter(|c| c.is_pristine)
    }
}

// ============================================================
// ZONE ENGINE
// ============================================================

/// Main zone scanning engine
#[derive(Debug, Clone)]
pub struct ZoneEngine<P: IndicatorProvider = DefaultIndicatorProvider> {
    provider: P,
    config: ScanConfig,
    require_full_history: bool,
}

impl<P: IndicatorProvider> ZoneEngine<P> {
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Bars required before a zone may be selected
    pub fn min_history(&self) -> usize {
        self.provider.min_history(&self.config)
    }

    // ===========================================
    // LOW-LEVEL: Primitives
    // ===========================================

    /// Validate bars and compute the indicator frame.
    pub fn compute_frame<T: OHLCV>(&self, bars: &[T]) -> Result<IndicatorFrame> {
        validate_bars(bars)?;
        self.frame_unchecked(bars)
    }

    // ===========================================
    // MID-LEVEL: Candidates only
    // ===========================================

    /// Enumerate and classify every structure without selection or scoring.
    pub fn scan_candidates<T: OHLCV>(&self, bars: &[T]) -> Result<Vec<ZoneCandidate>> {
        validate_bars(bars)?;
        let sizes = zones::helpers::range_sizes(bars)?;
        let anchors = scanner::scan_anchors(bars, &sizes, &self.config.thresholds());
        Ok(tracker::track_all(&anchors, bars))
    }

    // ===========================================
    // HIGH-LEVEL: Full scan
    // ===========================================

    /// Scan the series end-to-end and produce a verdict.
    pub fn scan<T: OHLCV>(&self, bars: &[T]) -> Result<ScanResult> {
        validate_bars(bars)?;

        let need = self.min_history();
        let full_history = bars.len() >= need;
        if !full_history {
            if self.require_full_history {
                return Err(ZoneError::InsufficientData {
                    need,
                    got: bars.len(),
                });
            }
            if !bars.is_empty() {
                warn!(bars = bars.len(), need, "series shorter than indicator warm-up, selection skipped");
            }
        }

        if bars.is_empty() {
            return Ok(ScanResult::empty());
        }

        let frame = self.frame_unchecked(bars)?;
        let context = scorer::snapshot(bars, &frame, &self.config);
        let anchors = scanner::scan_anchors(bars, &frame.range_size, &self.config.thresholds());
        let candidates = tracker::track_all(&anchors, bars);

        let selected = if full_history {
            scorer::select(&candidates, self.config.selection, self.config.require_golden).copied()
        } else {
            None
        };

        let assessment = match (&selected, &context) {
            (Some(zone), Some(ctx)) => scorer::assess(zone, ctx, &self.config),
            _ => scorer::Assessment::no_setup(),
        };

        debug!(
            bars = bars.len(),
            candidates = candidates.len(),
            selected = ?selected.map(|z| z.anchor_index),
            score = ?assessment.score,
            verdict = ?assessment.verdict,
            "zone scan complete"
        );

        Ok(ScanResult {
            candidates,
            selected,
            context,
            distance_pct: assessment.distance_pct,
            score: assessment.score,
            verdict: assessment.verdict,
        })
    }

    // ===========================================
    // Internal helpers
    // ===========================================

    fn frame_unchecked<T: OHLCV>(&self, bars: &[T]) -> Result<IndicatorFrame> {
        let frame = self.provider.compute_all(bars, &self.config)?;
        if frame.len() != bars.len() || !frame.is_aligned() {
            return Err(ZoneError::InvalidValue(
                "indicator frame is not aligned with the bar series",
            ));
        }
        Ok(frame)
    }
}

fn validate_bars<T: OHLCV>(bars: &[T]) -> Result<()> {
    let mut prev_date: Option<NaiveDate> = None;
    for (i, bar) in bars.iter().enumerate() {
        bar.validate().map_err(|e| match e {
            ZoneError::InvalidBar { reason, .. } => ZoneError::InvalidBar { index: i, reason },
            other => other,
        })?;
        if let Some(date) = bar.date() {
            if prev_date.is_some_and(|prev| date <= prev) {
                return Err(ZoneError::InvalidBar {
                    index: i,
                    reason: "dates not strictly increasing",
                });
            }
            prev_date = Some(date);
        }
    }
    Ok(())
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating ZoneEngine instances
#[derive(Debug, Clone)]
pub struct EngineBuilder<P: IndicatorProvider = DefaultIndicatorProvider> {
    provider: P,
    config: ScanConfig,
    require_full_history: bool,
}

impl Default for EngineBuilder<DefaultIndicatorProvider> {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder<DefaultIndicatorProvider> {
    pub fn new() -> Self {
        Self {
            provider: DefaultIndicatorProvider,
            config: ScanConfig::default(),
            require_full_history: false,
        }
    }
}

impl<P: IndicatorProvider> EngineBuilder<P> {
    /// Change indicator provider
    pub fn indicator_provider<P2: IndicatorProvider>(self, provider: P2) -> EngineBuilder<P2> {
        EngineBuilder {
            provider,
            config: self.config,
            require_full_history: self.require_full_history,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    pub fn selection(mut self, policy: SelectionPolicy) -> Self {
        self.config.selection = policy;
        self
    }

    pub fn score_base(mut self, base: ScoreBase) -> Self {
        self.config.score_base = base;
        self
    }

    /// Only golden candidates are eligible for selection
    pub fn require_golden(mut self, enable: bool) -> Self {
        self.config.require_golden = enable;
        self
    }

    /// Fail with `InsufficientData` instead of degrading to `NoSetup`
    pub fn require_full_history(mut self, enable: bool) -> Self {
        self.require_full_history = enable;
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<ZoneEngine<P>> {
        self.config.validate()?;
        Ok(ZoneEngine {
            provider: self.provider,
            config: self.config,
            require_full_history: self.require_full_history,
        })
    }
}

// ============================================================
// TYPE ALIASES
// ============================================================

/// Default engine with DefaultIndicatorProvider
pub type DefaultEngine = ZoneEngine<DefaultIndicatorProvider>;

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test OHLCV bar without dates
    #[derive(Debug, Clone)]
    struct Candle {
        o: f64,
        h: f64,
        l: f64,
        c: f64,
        v: f64,
    }

    impl Candle {
        fn new(o: f64, h: f64, l: f64, c: f64) -> Self {
            Self {
                o,
                h,
                l,
                c,
                v: 1000.0,
            }
        }
    }

    impl OHLCV for Candle {
        fn open(&self) -> f64 {
            self.o
        }

        fn high(&self) -> f64 {
            self.h
        }

        fn low(&self) -> f64 {
            self.l
        }

        fn close(&self) -> f64 {
            self.c
        }

        fn volume(&self) -> f64 {
            self.v
        }
    }

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset)
    }

    /// Sizes 10, 2, 1, 4, 1 followed by flat bars of size 1
    fn make_sized_bars(n: usize) -> Vec<Candle> {
        let sizes = [10.0, 2.0, 1.0, 4.0, 1.0];
        (0..n)
            .map(|i| {
                let size = sizes.get(i).copied().unwrap_or(1.0);
                let low = 100.0 + i as f64;
                Candle::new(low, low + size, low, low + size / 2.0)
            })
            .collect()
    }

    /// Stand-in provider returning a fixed frame regardless of input
    struct FixedProvider(IndicatorFrame);

    impl IndicatorProvider for FixedProvider {
        fn compute_all<T: OHLCV>(&self, _bars: &[T], _config: &ScanConfig) -> Result<IndicatorFrame> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_multiple_validation() {
        assert!(Multiple::new(0.5).is_ok());
        assert!(Multiple::new(4.0).is_ok());
        assert!(Multiple::new(0.0).is_err());
        assert!(Multiple::new(-1.0).is_err());
        assert!(Multiple::new(f64::NAN).is_err());
        assert!(Multiple::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_period_validation() {
        assert!(Period::new(1).is_ok());
        assert!(Period::new(100).is_ok());
        assert!(Period::new(0).is_err());
    }

    #[test]
    fn test_ohlcv_ext() {
        let bar = Candle::new(100.0, 110.0, 90.0, 105.0);
        assert_eq!(bar.range_size(), 20.0);
        assert!(bar.is_bullish());
        assert!(bar.validate().is_ok());
    }

    #[test]
    fn test_bar_validation_reasons() {
        let inverted = Candle::new(100.0, 90.0, 110.0, 100.0);
        assert_eq!(
            inverted.validate(),
            Err(ZoneError::InvalidBar { index: 0, reason: "high < low" })
        );

        let nan = Candle::new(f64::NAN, 110.0, 90.0, 100.0);
        assert!(matches!(nan.validate(), Err(ZoneError::InvalidBar { reason: "NaN in OHLCV", .. })));

        let zero = Candle::new(0.0, 110.0, 0.0, 100.0);
        assert!(zero.validate().is_err());

        let mut negative_volume = Candle::new(100.0, 110.0, 90.0, 100.0);
        negative_volume.v = -1.0;
        assert!(negative_volume.validate().is_err());
    }

    #[test]
    fn test_engine_builder() {
        let engine = EngineBuilder::new().build();
        assert!(engine.is_ok());
        assert_eq!(engine.unwrap().min_history(), 17);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let mut config = ScanConfig::default();
        config.k_in_golden = Multiple::new(1.0).unwrap();
        let engine = EngineBuilder::new().config(config).build();
        assert!(matches!(engine, Err(ZoneError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_scan() {
        let engine = EngineBuilder::new().build().unwrap();
        let bars: Vec<Candle> = vec![];
        let result = engine.scan(&bars).unwrap();
        assert!(result.candidates.is_empty());
        assert!(result.context.is_none());
        assert_eq!(result.verdict, Verdict::NoSetup);
    }

    #[test]
    fn test_two_bars_no_setup() {
        let engine = EngineBuilder::new().build().unwrap();
        let bars = make_sized_bars(2);
        let result = engine.scan(&bars).unwrap();
        assert!(result.candidates.is_empty());
        assert!(result.context.is_some());
        assert_eq!(result.verdict, Verdict::NoSetup);
    }

    #[test]
    fn test_short_series_best_effort() {
        let engine = EngineBuilder::new().build().unwrap();
        let bars = make_sized_bars(6);
        let result = engine.scan(&bars).unwrap();

        // Candidates are still enumerated for the audit table
        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.candidates[0].anchor_index, 2);
        assert!(result.selected.is_none());
        assert!(result.score.is_none());
        assert_eq!(result.verdict, Verdict::NoSetup);
    }

    #[test]
    fn test_strict_mode_insufficient_data() {
        let engine = EngineBuilder::new().require_full_history(true).build().unwrap();
        let bars = make_sized_bars(10);
        assert_eq!(
            engine.scan(&bars),
            Err(ZoneError::InsufficientData { need: 17, got: 10 })
        );
    }

    #[test]
    fn test_invalid_bar_reports_index() {
        let engine = EngineBuilder::new().build().unwrap();
        let mut bars = make_sized_bars(20);
        bars[7] = Candle::new(100.0, 90.0, 110.0, 100.0);
        assert_eq!(
            engine.scan(&bars),
            Err(ZoneError::InvalidBar { index: 7, reason: "high < low" })
        );
    }

    #[test]
    fn test_dates_must_increase() {
        let engine = EngineBuilder::new().build().unwrap();
        let mut bars: Vec<Bar> = (0..5)
            .map(|i| Bar {
                date: day(i),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.5,
                volume: 1000,
            })
            .collect();
        bars[3].date = bars[2].date;

        assert_eq!(
            engine.scan(&bars),
            Err(ZoneError::InvalidBar { index: 3, reason: "dates not strictly increasing" })
        );
    }

    #[test]
    fn test_anchor_date_carried_from_bar() {
        let engine = EngineBuilder::new().build().unwrap();
        let bars: Vec<Bar> = make_sized_bars(5)
            .into_iter()
            .enumerate()
            .map(|(i, c)| Bar {
                date: day(i as i64),
                open: c.o,
                high: c.h,
                low: c.l,
                close: c.c,
                volume: 1000,
            })
            .collect();

        let candidates = engine.scan_candidates(&bars).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].anchor_date, Some(day(2)));
    }

    #[test]
    fn test_misaligned_provider_frame_rejected() {
        let engine = EngineBuilder::new()
            .indicator_provider(FixedProvider(IndicatorFrame::default()))
            .build()
            .unwrap();
        let bars = make_sized_bars(20);
        assert!(matches!(engine.scan(&bars), Err(ZoneError::InvalidValue(_))));
    }

    #[test]
    fn test_compute_frame() {
        let engine = EngineBuilder::new().build().unwrap();
        let bars = make_sized_bars(20);
        let frame = engine.compute_frame(&bars).unwrap();
        assert_eq!(frame.len(), bars.len());
        assert!(frame.atr[12].is_none());
        assert!(frame.atr[13].is_some());
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DefaultEngine>();
        assert_send_sync::<ScanResult>();
    }
}
