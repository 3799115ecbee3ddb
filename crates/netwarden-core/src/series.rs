// ── Sliding window buffer ──
//
// Fixed-capacity, time-ordered rate series feeding the chart.
// Bulk seeding replaces the buffer wholesale; live appends evict from
// the head, strict FIFO. No operation reorders existing points.

use std::collections::VecDeque;

use chrono::Utc;

use crate::model::RatePoint;

/// Fixed-capacity FIFO buffer of [`RatePoint`]s.
#[derive(Debug)]
pub struct SlidingWindow {
    points: VecDeque<RatePoint>,
    capacity: usize,
}

impl SlidingWindow {
    /// Create an empty window. `capacity` is fixed for the window's
    /// lifetime — switching time ranges builds a fresh window.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Replace the buffer wholesale with a seeded history.
    ///
    /// An empty history fills the window with `capacity` zero-value
    /// placeholders so the chart renders a full-width empty grid.
    /// An oversized history keeps only the most recent `capacity`
    /// points.
    pub fn seed(&mut self, mut points: Vec<RatePoint>) {
        if points.is_empty() {
            let now = Utc::now();
            self.points = (0..self.capacity)
                .map(|_| RatePoint::placeholder(now))
                .collect();
            return;
        }
        if points.len() > self.capacity {
            points.drain(..points.len() - self.capacity);
        }
        self.points = points.into();
    }

    /// Append one live point to the tail, evicting the oldest point
    /// when the window is full.
    pub fn append(&mut self, point: RatePoint) {
        if self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate head→tail (oldest→newest).
    pub fn iter(&self) -> impl Iterator<Item = &RatePoint> {
        self.points.iter()
    }

    /// Copy the current contents out, oldest first.
    pub fn to_vec(&self) -> Vec<RatePoint> {
        self.points.iter().cloned().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn point(n: u64) -> RatePoint {
        RatePoint {
            label: n.to_string(),
            timestamp: Utc.timestamp_opt(i64::try_from(n).unwrap(), 0).unwrap(),
            upload_rate: n,
            download_rate: n * 2,
        }
    }

    #[test]
    fn seeding_empty_history_fills_with_placeholders() {
        let mut window = SlidingWindow::new(8);
        window.seed(Vec::new());

        assert_eq!(window.len(), 8);
        assert!(window.iter().all(|p| p.upload_rate == 0 && p.download_rate == 0));
    }

    #[test]
    fn seeding_replaces_wholesale() {
        let mut window = SlidingWindow::new(8);
        window.append(point(99));
        window.seed(vec![point(1), point(2)]);

        let values: Vec<u64> = window.iter().map(|p| p.upload_rate).collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn oversized_seed_keeps_most_recent_points() {
        let mut window = SlidingWindow::new(3);
        window.seed((0..10).map(point).collect());

        let values: Vec<u64> = window.iter().map(|p| p.upload_rate).collect();
        assert_eq!(values, vec![7, 8, 9]);
    }

    #[test]
    fn append_beyond_capacity_evicts_oldest_first() {
        let mut window = SlidingWindow::new(3);
        for n in 0..5 {
            window.append(point(n));
        }

        assert_eq!(window.len(), 3);
        let values: Vec<u64> = window.iter().map(|p| p.upload_rate).collect();
        assert_eq!(values, vec![2, 3, 4]);
    }

    #[test]
    fn append_after_placeholder_seed_stays_at_capacity() {
        let mut window = SlidingWindow::new(4);
        window.seed(Vec::new());
        window.append(point(1));

        assert_eq!(window.len(), 4);
        assert_eq!(window.iter().last().unwrap().upload_rate, 1);
    }

    #[test]
    fn order_is_preserved() {
        let mut window = SlidingWindow::new(10);
        window.seed(vec![point(1), point(2), point(3)]);
        window.append(point(4));

        let timestamps: Vec<_> = window.iter().map(|p| p.timestamp).collect();
        let mut sorted = timestamps.clone();
        sorted.sort();
        assert_eq!(timestamps, sorted);
    }
}
