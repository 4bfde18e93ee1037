use std::collections::VecDeque;

/// Ring buffer of recent transaction timestamps used to estimate TPS
/// (spec.md §4.2). Capacity is bounded per `SimulatorConfig::window_capacity`
/// (spec.md §7 "Capacity exhaustion") rather than growing without limit.
pub struct SlidingWindow {
    window_size_secs: f64,
    capacity: usize,
    timestamps: VecDeque<f64>,
}

impl SlidingWindow {
    pub fn new(window_size_secs: f64, capacity: usize) -> Self {
        Self { window_size_secs, capacity, timestamps: VecDeque::with_capacity(capacity.min(1024)) }
    }

    /// Record a transaction at `now` (seconds since experiment start) and
    /// evict everything older than `window_size_secs`.
    pub fn record(&mut self, now: f64) {
        self.timestamps.push_back(now);
        self.evict(now);
        // The window should self-limit via eviction; this only guards
        // against a pathological burst within a single window.
        while self.timestamps.len() > self.capacity {
            self.timestamps.pop_front();
        }
    }

    fn evict(&mut self, now: f64) {
        let cutoff = now - self.window_size_secs;
        while matches!(self.timestamps.front(), Some(&t) if t < cutoff) {
            self.timestamps.pop_front();
        }
    }

    /// Transactions per second over the trailing window, as of `now`.
    pub fn tps(&mut self, now: f64) -> f64 {
        self.evict(now);
        self.timestamps.len() as f64 / self.window_size_secs
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tps_counts_only_events_within_the_trailing_window() {
        let mut window = SlidingWindow::new(10.0, 1000);
        for t in [0.0, 1.0, 2.0, 3.0] {
            window.record(t);
        }
        assert_eq!(window.tps(3.0), 4.0 / 10.0);

        window.record(15.0);
        // everything before (15.0 - 10.0) = 5.0 should now be evicted
        assert_eq!(window.len(), 1);
        assert_eq!(window.tps(15.0), 1.0 / 10.0);
    }

    #[test]
    fn capacity_bounds_growth_under_a_burst() {
        let mut window = SlidingWindow::new(60.0, 5);
        for i in 0..50 {
            window.record(i as f64 * 0.01);
        }
        assert!(window.len() <= 5);
    }
}
