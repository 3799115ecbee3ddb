// ── Rate derivation engine ──
//
// Converts consecutive cumulative counter snapshots into per-interval
// rates. A backend restart rolls the counters back below the previous
// reading; saturating subtraction clamps that interval to zero so the
// chart never shows a negative spike. This is an expected, recoverable
// condition — it is not reported as an error.

use chrono::{DateTime, Utc};

use crate::model::{CounterSnapshot, RatePoint};

/// Derives one [`RatePoint`] per poll tick from the cumulative
/// upload/download counters.
#[derive(Debug, Default)]
pub struct RateEngine {
    prev: Option<(u64, u64)>,
}

impl RateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the rate point for `snapshot`, received at `received_at`.
    ///
    /// The first tick has no baseline and emits a zero-valued point —
    /// a point is still produced so the time axis stays dense.
    /// Live points are stamped with the *client's* receive time; the
    /// backend clock is never consulted here.
    pub fn push(&mut self, snapshot: &CounterSnapshot, received_at: DateTime<Utc>) -> RatePoint {
        let (upload_rate, download_rate) = match self.prev {
            Some((up, down)) => (
                snapshot.total_upload.saturating_sub(up),
                snapshot.total_download.saturating_sub(down),
            ),
            None => (0, 0),
        };
        self.prev = Some((snapshot.total_upload, snapshot.total_download));

        RatePoint {
            label: received_at.format("%H:%M:%S").to_string(),
            timestamp: received_at,
            upload_rate,
            download_rate,
        }
    }

    /// Drop the baseline. Used when the time range switches and the
    /// window is reseeded — the next live point starts from zero again.
    pub fn reset(&mut self) {
        self.prev = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use chrono::{TimeZone, Utc};

    use super::*;

    fn snap(up: u64, down: u64) -> CounterSnapshot {
        CounterSnapshot {
            total_upload: up,
            total_download: down,
            active_connections: 0,
            top_domains: HashMap::new(),
            adblock_hits: 0,
        }
    }

    fn at(secs: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, secs).unwrap()
    }

    #[test]
    fn first_tick_emits_zero_point() {
        let mut engine = RateEngine::new();
        let point = engine.push(&snap(1000, 2000), at(0));
        assert_eq!(point.upload_rate, 0);
        assert_eq!(point.download_rate, 0);
        assert_eq!(point.label, "10:00:00");
    }

    #[test]
    fn non_decreasing_counters_yield_exact_deltas() {
        let mut engine = RateEngine::new();
        engine.push(&snap(1000, 2000), at(0));

        let p1 = engine.push(&snap(1100, 2500), at(1));
        assert_eq!(p1.upload_rate, 100);
        assert_eq!(p1.download_rate, 500);

        let p2 = engine.push(&snap(1100, 2500), at(2));
        assert_eq!(p2.upload_rate, 0);
        assert_eq!(p2.download_rate, 0);

        let p3 = engine.push(&snap(1101, 2501), at(3));
        assert_eq!(p3.upload_rate, 1);
        assert_eq!(p3.download_rate, 1);
    }

    #[test]
    fn counter_reset_clamps_to_zero_without_disturbing_neighbors() {
        let mut engine = RateEngine::new();
        engine.push(&snap(5000, 9000), at(0));
        let before = engine.push(&snap(5100, 9200), at(1));

        // Backend restarted: counters rolled back below the baseline.
        let reset = engine.push(&snap(50, 80), at(2));
        let after = engine.push(&snap(150, 380), at(3));

        assert_eq!((before.upload_rate, before.download_rate), (100, 200));
        assert_eq!((reset.upload_rate, reset.download_rate), (0, 0));
        assert_eq!((after.upload_rate, after.download_rate), (100, 300));
    }

    #[test]
    fn reset_forgets_the_baseline() {
        let mut engine = RateEngine::new();
        engine.push(&snap(1000, 1000), at(0));
        engine.reset();

        let point = engine.push(&snap(9999, 9999), at(1));
        assert_eq!(point.upload_rate, 0);
        assert_eq!(point.download_rate, 0);
    }

    #[test]
    fn timestamp_is_client_receive_time() {
        let mut engine = RateEngine::new();
        let ts = at(42);
        let point = engine.push(&snap(0, 0), ts);
        assert_eq!(point.timestamp, ts);
    }
}
