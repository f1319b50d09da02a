//! Indicator math.
//!
//! Free functions that evaluate one indicator at the end of a series,
//! returning `None` when the input is too short. The engine maps `None`
//! onto the documented neutral defaults.

use scalper_core::Bar;

/// MACD evaluated at the last bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Bollinger bands evaluated at the last bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerValue {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    /// (upper - lower) / middle, 0 when middle is 0
    pub width: f64,
}

/// Simple moving average of the last `period` values.
pub fn sma(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }
    let window = &data[data.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Exponential moving average over the whole series, seeded with the SMA of
/// the first `period` values.
pub fn ema_series(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len() - period + 1);

    let seed: f64 = data[..period].iter().sum::<f64>() / period as f64;
    result.push(seed);

    let mut ema = seed;
    for &value in &data[period..] {
        ema = value * multiplier + ema * (1.0 - multiplier);
        result.push(ema);
    }

    result
}

/// Exponential moving average evaluated at the last value.
pub fn ema(data: &[f64], period: usize) -> Option<f64> {
    ema_series(data, period).last().copied()
}

/// Wilder smoothing: seed with the plain average of the first `period`
/// values, then `avg = (avg * (period - 1) + value) / period`.
fn wilder_smooth(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let period_f64 = period as f64;
    let mut avg: f64 = values[..period].iter().sum::<f64>() / period_f64;
    for &value in &values[period..] {
        avg = (avg * (period_f64 - 1.0) + value) / period_f64;
    }
    Some(avg)
}

/// Wilder RSI evaluated at the last close. Needs `period + 1` closes.
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if closes.len() <= period {
        return None;
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    let avg_gain = wilder_smooth(&gains, period)?;
    let avg_loss = wilder_smooth(&losses, period)?;

    if avg_loss == 0.0 {
        return Some(100.0);
    }
    Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
}

/// MACD(fast, slow, signal) evaluated at the last close.
/// Needs `slow + signal_period` closes.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> Option<MacdValue> {
    if fast >= slow || closes.len() < slow + signal_period {
        return None;
    }

    let fast_ema = ema_series(closes, fast);
    let slow_ema = ema_series(closes, slow);

    // The fast series starts earlier; align its tail with the slow series.
    let offset = slow - fast;
    let macd_line: Vec<f64> = fast_ema[offset..]
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = ema_series(&macd_line, signal_period);
    let signal = *signal_line.last()?;
    let macd = *macd_line.last()?;

    Some(MacdValue {
        macd,
        signal,
        histogram: macd - signal,
    })
}

/// Bollinger(period, k sigma) over the last `period` closes, using the
/// population standard deviation.
pub fn bollinger(closes: &[f64], period: usize, k: f64) -> Option<BollingerValue> {
    if period < 2 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];
    let period_f64 = period as f64;
    let mean: f64 = window.iter().sum::<f64>() / period_f64;
    let variance: f64 = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period_f64;
    let std_dev = variance.sqrt();

    let upper = mean + k * std_dev;
    let lower = mean - k * std_dev;
    let width = if mean != 0.0 { (upper - lower) / mean } else { 0.0 };

    Some(BollingerValue {
        upper,
        middle: mean,
        lower,
        width,
    })
}

/// Wilder ATR evaluated at the last bar. Needs `period + 1` bars.
pub fn atr(bars: &[Bar], period: usize) -> Option<f64> {
    if bars.len() < period + 1 {
        return None;
    }

    let tr: Vec<f64> = bars
        .windows(2)
        .map(|pair| pair[1].true_range(Some(pair[0].close)))
        .collect();

    wilder_smooth(&tr, period)
}

/// Session VWAP: cumulative (typical price x volume) / cumulative volume
/// over the whole series. `None` when total volume is 0.
pub fn session_vwap(bars: &[Bar]) -> Option<f64> {
    let mut pv = 0.0;
    let mut v = 0.0;
    for bar in bars {
        pv += bar.typical_price() * bar.volume;
        v += bar.volume;
    }
    if v == 0.0 {
        return None;
    }
    Some(pv / v)
}

/// Last volume relative to the average of the last `window` volumes.
pub fn volume_ratio(volumes: &[f64], window: usize) -> Option<f64> {
    if window == 0 || volumes.len() < window {
        return None;
    }
    let avg = sma(volumes, window)?;
    if avg == 0.0 {
        return None;
    }
    Some(volumes[volumes.len() - 1] / avg)
}

/// Signed percent change between the last close and the close `window`
/// bars earlier. Needs `window + 1` closes.
pub fn price_change_pct(closes: &[f64], window: usize) -> Option<f64> {
    if closes.len() < window + 1 {
        return None;
    }
    let base = closes[closes.len() - 1 - window];
    if base == 0.0 {
        return None;
    }
    Some((closes[closes.len() - 1] - base) / base * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_last_window() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((sma(&data, 3).unwrap() - 4.0).abs() < 1e-10);
        assert!(sma(&data, 6).is_none());
    }

    #[test]
    fn test_ema_converges_toward_recent_values() {
        let data: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let ema12 = ema(&data, 12).unwrap();
        let ema26 = ema(&data, 26).unwrap();
        // In a rising series the faster EMA sits above the slower one.
        assert!(ema12 > ema26);
    }

    #[test]
    fn test_rsi_all_gains() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert!((rsi(&data, 5).unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_all_losses() {
        let data = vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        assert!(rsi(&data, 5).unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_rsi_bounded() {
        let data: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0).collect();
        let value = rsi(&data, 14).unwrap();
        assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn test_rsi_needs_period_plus_one() {
        let data = vec![1.0; 14];
        assert!(rsi(&data, 14).is_none());
    }

    #[test]
    fn test_macd_uptrend_positive() {
        let data: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let value = macd(&data, 12, 26, 9).unwrap();
        assert!(value.macd > 0.0);
        assert!((value.histogram - (value.macd - value.signal)).abs() < 1e-10);
    }

    #[test]
    fn test_macd_too_short() {
        let data = vec![100.0; 34];
        assert!(macd(&data, 12, 26, 9).is_none());
    }

    #[test]
    fn test_bollinger_ordering() {
        let data: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.1).sin() * 5.0).collect();
        let bands = bollinger(&data, 20, 2.0).unwrap();
        assert!(bands.upper > bands.middle);
        assert!(bands.middle > bands.lower);
        assert!(bands.width > 0.0);
    }

    #[test]
    fn test_bollinger_constant_price_collapses() {
        let data = vec![100.0; 20];
        let bands = bollinger(&data, 20, 2.0).unwrap();
        assert!((bands.upper - 100.0).abs() < 1e-10);
        assert!((bands.lower - 100.0).abs() < 1e-10);
        assert_eq!(bands.width, 0.0);
    }

    #[test]
    fn test_atr_positive() {
        let bars: Vec<Bar> = (0..20)
            .map(|i| {
                let c = 100.0 + i as f64;
                Bar::new(i, c - 0.5, c + 1.0, c - 1.0, c, 1000.0)
            })
            .collect();
        let value = atr(&bars, 14).unwrap();
        assert!(value > 0.0);
    }

    #[test]
    fn test_session_vwap_weighted_by_volume() {
        let bars = vec![
            Bar::new(1, 10.0, 10.0, 10.0, 10.0, 100.0),
            Bar::new(2, 20.0, 20.0, 20.0, 20.0, 300.0),
        ];
        // (10*100 + 20*300) / 400 = 17.5
        assert!((session_vwap(&bars).unwrap() - 17.5).abs() < 1e-10);
    }

    #[test]
    fn test_session_vwap_zero_volume() {
        let bars = vec![Bar::new(1, 10.0, 10.0, 10.0, 10.0, 0.0)];
        assert!(session_vwap(&bars).is_none());
    }

    #[test]
    fn test_volume_ratio() {
        let mut volumes = vec![1000.0; 19];
        volumes.push(3000.0);
        // avg = (19*1000 + 3000) / 20 = 1100
        let ratio = volume_ratio(&volumes, 20).unwrap();
        assert!((ratio - 3000.0 / 1100.0).abs() < 1e-10);
    }

    #[test]
    fn test_price_change_pct() {
        let mut closes = vec![100.0; 21];
        closes[20] = 110.0;
        assert!((price_change_pct(&closes, 20).unwrap() - 10.0).abs() < 1e-10);
        assert!(price_change_pct(&closes[1..], 20).is_none());
    }
}
