//! Integration tests for the basezone scanning engine.
//!
//! These tests drive the public API end-to-end on a hand-built daily series.

use std::collections::HashMap;

use basezone::prelude::*;
use chrono::NaiveDate;

fn day(offset: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + chrono::Duration::days(offset as i64)
}

fn bar(i: usize, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Bar {
    Bar {
        date: day(i),
        open,
        high,
        low,
        close,
        volume,
    }
}

/// 24 steady uptrend bars (range 1.2), then a base at index 25 flanked by a
/// wide leg-in and leg-out, then three bars holding above the base ceiling (116.0).
fn base_zone_series() -> Vec<Bar> {
    let mut bars: Vec<Bar> = (0..24)
        .map(|i| {
            let close = 100.0 + i as f64 * 0.5;
            bar(i, close - 0.2, close + 0.5, close - 0.7, close, 1000)
        })
        .collect();

    bars.push(bar(24, 111.5, 116.0, 111.0, 115.5, 1000)); // leg-in, range 5.0
    bars.push(bar(25, 115.5, 116.0, 115.5, 115.8, 1000)); // base, range 0.5
    bars.push(bar(26, 116.0, 120.5, 116.0, 120.0, 1000)); // leg-out, range 4.5
    bars.push(bar(27, 120.0, 120.4, 119.2, 119.5, 1000));
    bars.push(bar(28, 119.5, 119.9, 118.7, 119.6, 1000));
    bars.push(bar(29, 119.0, 120.0, 118.0, 119.8, 1500));
    bars
}

/// Default indicators with every rolling window blanked out
struct NoWindowsProvider;

impl IndicatorProvider for NoWindowsProvider {
    fn compute_all<T: OHLCV>(&self, bars: &[T], config: &ScanConfig) -> Result<IndicatorFrame> {
        let mut frame = DefaultIndicatorProvider.compute_all(bars, config)?;
        frame.atr.iter_mut().for_each(|v| *v = None);
        frame.volume_avg.iter_mut().for_each(|v| *v = None);
        Ok(frame)
    }
}

// ============================================================
// FULL SCAN
// ============================================================

#[test]
fn test_buy_authorized_setup() {
    let engine = EngineBuilder::new().build().unwrap();
    let result = engine.scan(&base_zone_series()).unwrap();

    assert_eq!(result.candidates.len(), 1, "only the base at index 25 qualifies");
    let zone = result.selected.expect("zone should be selected");
    assert_eq!(zone.anchor_index, 25);
    assert_eq!(zone.anchor_date, Some(day(25)));
    assert_eq!(zone.ceiling, 116.0);
    assert_eq!(zone.floor, 115.5);
    assert_eq!(zone.leg_in_ratio, 10.0);
    assert_eq!(zone.leg_out_ratio, 9.0);
    assert!(zone.is_golden);
    assert!(zone.is_pristine);
    assert_eq!(zone.age, 4);

    let ctx = result.context.unwrap();
    assert_eq!(ctx.price, 119.8);
    assert_eq!(ctx.ema_status, Trend::Bullish);
    assert!(ctx.pulse);
    // TR 2.0 against ATR 24.2 / 14
    assert!((ctx.momentum_ratio.unwrap() - 2.0 / (24.2 / 14.0)).abs() < 1e-9);
    // 1500 against (19 * 1000 + 1500) / 20
    assert!((ctx.volume_ratio.unwrap() - 1500.0 / 1025.0).abs() < 1e-9);

    let white = ctx.white_area.unwrap();
    assert_eq!(white.barrier, 120.5);
    assert!(!white.clear);

    assert!((result.distance_pct.unwrap() - 3.8 * 100.0 / 116.0).abs() < 1e-9);
    // 40 base + 4 age + 15 momentum + 15 volume
    assert_eq!(result.score, Some(74));
    assert_eq!(result.verdict, Verdict::BuyAuthorized);
}

#[test]
fn test_do_not_chase_after_run_up() {
    let mut bars = base_zone_series();
    bars.push(bar(30, 120.0, 124.5, 120.0, 124.0, 1000));

    let engine = EngineBuilder::new().build().unwrap();
    let result = engine.scan(&bars).unwrap();

    assert_eq!(result.selected.map(|z| z.anchor_index), Some(25));
    assert!(result.distance_pct.unwrap() > 3.5);
    assert_eq!(result.verdict, Verdict::DoNotChase);
}

#[test]
fn test_reentry_marks_zone_violated() {
    let mut bars = base_zone_series();
    bars.push(bar(30, 119.0, 119.5, 115.0, 116.5, 1000));

    let engine = EngineBuilder::new().build().unwrap();
    let result = engine.scan(&bars).unwrap();

    let zone = result.selected.unwrap();
    assert_eq!(zone.anchor_index, 25);
    assert_eq!(zone.violation_count, 1);
    assert!(!zone.is_pristine);
    assert_eq!(result.pristine().count(), 0);
    assert_eq!(result.golden().count(), 1);
}

#[test]
fn test_undefined_windows_grant_no_bonus() {
    let engine = EngineBuilder::new()
        .indicator_provider(NoWindowsProvider)
        .build()
        .unwrap();
    let result = engine.scan(&base_zone_series()).unwrap();

    let ctx = result.context.unwrap();
    assert!(ctx.momentum_ratio.is_none());
    assert!(ctx.volume_ratio.is_none());
    // 40 base + 4 age
    assert_eq!(result.score, Some(44));
    assert_eq!(result.verdict, Verdict::Watching);
}

#[test]
fn test_tighter_entry_threshold_from_params() {
    let mut params = HashMap::new();
    params.insert("entry_threshold_pct", 3.0);
    let config = ScanConfig::with_params(&params).unwrap();

    let engine = EngineBuilder::new().config(config).build().unwrap();
    let result = engine.scan(&base_zone_series()).unwrap();
    assert_eq!(result.verdict, Verdict::DoNotChase);
}

#[test]
fn test_higher_reliability_threshold_watches() {
    let config = ScanConfig {
        reliability_threshold: 80,
        ..ScanConfig::default()
    };
    let engine = EngineBuilder::new().config(config).build().unwrap();
    let result = engine.scan(&base_zone_series()).unwrap();
    assert_eq!(result.score, Some(74));
    assert_eq!(result.verdict, Verdict::Watching);
}

#[test]
fn test_require_golden_filters_selection() {
    let config = ScanConfig {
        k_in_golden: Multiple::new(12.0).unwrap(),
        ..ScanConfig::default()
    };
    let engine = EngineBuilder::new()
        .config(config)
        .require_golden(true)
        .build()
        .unwrap();
    let result = engine.scan(&base_zone_series()).unwrap();

    assert_eq!(result.candidates.len(), 1);
    assert!(!result.candidates[0].is_golden);
    assert!(result.selected.is_none());
    assert_eq!(result.verdict, Verdict::NoSetup);
}

// ============================================================
// SHORT / INVALID INPUT
// ============================================================

#[test]
fn test_short_series_no_setup() {
    let engine = EngineBuilder::new().build().unwrap();
    let bars = base_zone_series();

    for n in 0..3 {
        let result = engine.scan(&bars[..n]).unwrap();
        assert!(result.candidates.is_empty());
        assert_eq!(result.verdict, Verdict::NoSetup);
    }

    let result = engine.scan(&bars[..16]).unwrap();
    assert_eq!(result.verdict, Verdict::NoSetup);
    assert!(result.score.is_none());
}

#[test]
fn test_strict_history_requirement() {
    let engine = EngineBuilder::new()
        .require_full_history(true)
        .build()
        .unwrap();
    let bars = base_zone_series();

    assert!(matches!(
        engine.scan(&bars[..16]),
        Err(ZoneError::InsufficientData { need: 17, got: 16 })
    ));
    assert!(engine.scan(&bars[..17]).is_ok());
}

#[test]
fn test_malformed_bar_rejected_before_scan() {
    let mut bars = base_zone_series();
    bars[12].high = bars[12].low - 1.0;

    let engine = EngineBuilder::new().build().unwrap();
    assert_eq!(
        engine.scan(&bars),
        Err(ZoneError::InvalidBar {
            index: 12,
            reason: "high < low"
        })
    );
}

// ============================================================
// DETERMINISM / OUTPUT
// ============================================================

#[test]
fn test_scan_is_idempotent() {
    let engine = EngineBuilder::new().build().unwrap();
    let bars = base_zone_series();
    assert_eq!(engine.scan(&bars).unwrap(), engine.scan(&bars).unwrap());
}

#[test]
fn test_scan_candidates_matches_full_scan() {
    let engine = EngineBuilder::new().build().unwrap();
    let bars = base_zone_series();
    assert_eq!(
        engine.scan_candidates(&bars).unwrap(),
        engine.scan(&bars).unwrap().candidates
    );
}

#[test]
fn test_result_serializes_for_presentation() {
    let engine = EngineBuilder::new().build().unwrap();
    let result = engine.scan(&base_zone_series()).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["verdict"], "BuyAuthorized");
    assert_eq!(json["selected"]["anchor_index"], 25);
    assert_eq!(json["selected"]["anchor_date"], "2024-03-26");
    assert_eq!(json["candidates"].as_array().unwrap().len(), 1);
}

#[test]
fn test_bars_deserialize_from_source() {
    let json = r#"[
        {"date": "2024-01-02", "open": 10.0, "high": 11.0, "low": 9.5, "close": 10.5, "volume": 1200},
        {"date": "2024-01-03", "open": 10.5, "high": 10.7, "low": 10.4, "close": 10.6, "volume": 800}
    ]"#;
    let bars: Vec<Bar> = serde_json::from_str(json).unwrap();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[1].volume(), 800.0);
    assert_eq!(bars[0].range_size(), 1.5);
}
