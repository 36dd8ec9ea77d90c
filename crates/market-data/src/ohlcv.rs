//! OHLCV bar aggregation.
//!
//! A single current-bar accumulator per resolution, flushed to storage
//! on bucket rollover or at session end. Higher resolutions are never
//! accumulated directly; they're derived downstream from the base
//! resolution by [`rebucket`].

use serde::{Deserialize, Serialize};

/// One OHLCV bar for `(resolution, interval_start)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub resolution_ms: i64,
    pub interval_start: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub trade_count: u64,
}

impl OhlcvBar {
    fn opening(resolution_ms: i64, interval_start: i64, price: f64, quantity: u32) -> Self {
        Self {
            resolution_ms,
            interval_start,
            open: price,
            high: price,
            low: price,
            close: price,
            volume: quantity as u64,
            trade_count: 1,
        }
    }

    fn extend(&mut self, price: f64, quantity: u32) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.volume += quantity as u64;
        self.trade_count += 1;
    }
}

/// Accumulates trades into bars of a fixed `resolution_ms`, flushing a
/// bar to `on_flush` whenever a trade falls outside the current bucket
/// (and once more at session end, via [`OhlcvBuilder::close`]).
pub struct OhlcvBuilder {
    resolution_ms: i64,
    current: Option<OhlcvBar>,
}

impl OhlcvBuilder {
    pub fn new(resolution_ms: i64) -> Self {
        Self {
            resolution_ms,
            current: None,
        }
    }

    fn bucket_of(&self, timestamp: i64) -> i64 {
        (timestamp / self.resolution_ms) * self.resolution_ms
    }

    /// Feed one trade into the accumulator. Returns the bar that was
    /// flushed, if this trade rolled the bucket over.
    pub fn add_trade(&mut self, timestamp: i64, price: f64, quantity: u32) -> Option<OhlcvBar> {
        let bucket = self.bucket_of(timestamp);
        match &mut self.current {
            Some(bar) if bar.interval_start == bucket => {
                bar.extend(price, quantity);
                None
            }
            Some(_) => {
                let flushed = self.current.replace(OhlcvBar::opening(
                    self.resolution_ms,
                    bucket,
                    price,
                    quantity,
                ));
                flushed
            }
            None => {
                self.current = Some(OhlcvBar::opening(self.resolution_ms, bucket, price, quantity));
                None
            }
        }
    }

    /// The bar currently being accumulated, if any trades have landed.
    pub fn current_bar(&self) -> Option<&OhlcvBar> {
        self.current.as_ref()
    }

    /// Flush and return the in-flight bar, e.g. at session end.
    pub fn close(&mut self) -> Option<OhlcvBar> {
        self.current.take()
    }
}

/// Derive bars at a coarser resolution `target_resolution_ms` (an
/// integer multiple of the base bars' resolution) by bucket-aggregating
/// already-persisted base bars. Base bars must be given in
/// `interval_start` order; the result is also in `interval_start` order.
pub fn rebucket(base_bars: &[OhlcvBar], target_resolution_ms: i64) -> Vec<OhlcvBar> {
    let mut out: Vec<OhlcvBar> = Vec::new();
    for bar in base_bars {
        let bucket = (bar.interval_start / target_resolution_ms) * target_resolution_ms;
        match out.last_mut() {
            Some(last) if last.interval_start == bucket => {
                last.high = last.high.max(bar.high);
                last.low = last.low.min(bar.low);
                last.close = bar.close;
                last.volume += bar.volume;
                last.trade_count += bar.trade_count;
            }
            _ => out.push(OhlcvBar {
                resolution_ms: target_resolution_ms,
                interval_start: bucket,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                trade_count: bar.trade_count,
            }),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_trade_opens_a_bar() {
        let mut builder = OhlcvBuilder::new(1000);
        let flushed = builder.add_trade(500, 100.0, 5);
        assert!(flushed.is_none());
        let bar = builder.current_bar().unwrap();
        assert_eq!(bar.open, 100.0);
        assert_eq!(bar.close, 100.0);
        assert_eq!(bar.volume, 5);
        assert_eq!(bar.trade_count, 1);
    }

    #[test]
    fn trades_in_same_bucket_extend_the_bar() {
        let mut builder = OhlcvBuilder::new(1000);
        builder.add_trade(100, 100.0, 5);
        builder.add_trade(900, 110.0, 3);
        builder.add_trade(200, 90.0, 2);
        let bar = builder.current_bar().unwrap();
        assert_eq!(bar.open, 100.0);
        assert_eq!(bar.high, 110.0);
        assert_eq!(bar.low, 90.0);
        assert_eq!(bar.close, 90.0);
        assert_eq!(bar.volume, 10);
        assert_eq!(bar.trade_count, 3);
    }

    #[test]
    fn trade_in_new_bucket_flushes_previous_bar() {
        let mut builder = OhlcvBuilder::new(1000);
        builder.add_trade(100, 100.0, 5);
        let flushed = builder.add_trade(1500, 120.0, 1);
        let flushed = flushed.expect("bucket rolled over");
        assert_eq!(flushed.interval_start, 0);
        assert_eq!(flushed.close, 100.0);

        let current = builder.current_bar().unwrap();
        assert_eq!(current.interval_start, 1000);
        assert_eq!(current.open, 120.0);
    }

    #[test]
    fn close_flushes_in_flight_bar() {
        let mut builder = OhlcvBuilder::new(1000);
        builder.add_trade(100, 100.0, 5);
        let closed = builder.close().unwrap();
        assert_eq!(closed.volume, 5);
        assert!(builder.current_bar().is_none());
    }

    #[test]
    fn rebucket_matches_running_at_coarser_resolution() {
        let base = vec![
            OhlcvBar {
                resolution_ms: 1000,
                interval_start: 0,
                open: 100.0,
                high: 105.0,
                low: 99.0,
                close: 102.0,
                volume: 10,
                trade_count: 2,
            },
            OhlcvBar {
                resolution_ms: 1000,
                interval_start: 1000,
                open: 102.0,
                high: 108.0,
                low: 101.0,
                close: 107.0,
                volume: 8,
                trade_count: 1,
            },
            OhlcvBar {
                resolution_ms: 1000,
                interval_start: 5000,
                open: 107.0,
                high: 107.0,
                low: 103.0,
                close: 103.0,
                volume: 4,
                trade_count: 1,
            },
        ];

        let derived = rebucket(&base, 5000);
        assert_eq!(derived.len(), 2);
        assert_eq!(derived[0].interval_start, 0);
        assert_eq!(derived[0].open, 100.0);
        assert_eq!(derived[0].high, 108.0);
        assert_eq!(derived[0].low, 99.0);
        assert_eq!(derived[0].close, 107.0);
        assert_eq!(derived[0].volume, 18);
        assert_eq!(derived[0].trade_count, 3);

        assert_eq!(derived[1].interval_start, 5000);
        assert_eq!(derived[1].volume, 4);
    }
}
