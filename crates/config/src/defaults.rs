//! Default values for optional [`crate::SimulationConfig`] fields.

pub fn default_tick_interval_ms() -> i64 {
    100
}

pub fn default_snapshot_interval_ms() -> i64 {
    1000
}

pub fn default_ohlcv_resolution_ms() -> i64 {
    1000
}

pub fn default_snapshot_depth() -> usize {
    10
}

pub fn default_news_magnitude() -> crate::NewsMagnitude {
    crate::NewsMagnitude::Medium
}
