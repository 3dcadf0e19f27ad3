//! Rolling REST-latency window (spec §4.5 item 6, §8 testable property 8): every successful
//! request's round-trip duration is folded into a fixed-size ring buffer behind each venue
//! client, from which p50/p95/p99 and an HFT sub-50ms compliance counter are derived on demand.

use parking_lot::Mutex;
use std::{
    collections::VecDeque,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

const WINDOW_CAPACITY: usize = 512;
const HFT_LATENCY_BUDGET_MS: u64 = 50;

/// Lock-protected ring buffer of the last [`WINDOW_CAPACITY`] request latencies, plus two
/// monotonic lifetime counters used to compute the HFT sub-50ms compliance ratio.
#[derive(Debug)]
pub struct LatencyWindow {
    samples: Mutex<VecDeque<u64>>,
    total_count: AtomicU64,
    sub_budget_count: AtomicU64,
}

impl Default for LatencyWindow {
    fn default() -> Self {
        Self {
            samples: Mutex::new(VecDeque::with_capacity(WINDOW_CAPACITY)),
            total_count: AtomicU64::new(0),
            sub_budget_count: AtomicU64::new(0),
        }
    }
}

impl LatencyWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed request's round-trip duration, evicting the oldest sample once the
    /// window is full.
    pub fn record(&self, latency: Duration) {
        let millis = latency.as_millis() as u64;

        {
            let mut samples = self.samples.lock();
            if samples.len() == WINDOW_CAPACITY {
                samples.pop_front();
            }
            samples.push_back(millis);
        }

        self.total_count.fetch_add(1, Ordering::Relaxed);
        if millis <= HFT_LATENCY_BUDGET_MS {
            self.sub_budget_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn p50(&self) -> Option<u64> {
        self.percentile(50)
    }

    pub fn p95(&self) -> Option<u64> {
        self.percentile(95)
    }

    pub fn p99(&self) -> Option<u64> {
        self.percentile(99)
    }

    fn percentile(&self, pct: u64) -> Option<u64> {
        let samples = self.samples.lock();
        if samples.is_empty() {
            return None;
        }

        let mut sorted: Vec<u64> = samples.iter().copied().collect();
        sorted.sort_unstable();

        let rank = (sorted.len() - 1) * pct as usize / 100;
        sorted.get(rank).copied()
    }

    /// Lifetime count of samples recorded, independent of the ring buffer's eviction window.
    pub fn total_count(&self) -> u64 {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Lifetime count of samples at or under the 50ms HFT-compliance budget (spec §4.5 item 6).
    pub fn sub_budget_count(&self) -> u64 {
        self.sub_budget_count.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentiles_reflect_recorded_samples() {
        let window = LatencyWindow::new();
        for ms in [10, 20, 30, 40, 50, 60, 70, 80, 90, 100] {
            window.record(Duration::from_millis(ms));
        }

        assert_eq!(window.p50(), Some(50));
        assert_eq!(window.p95(), Some(90));
        assert_eq!(window.total_count(), 10);
        assert_eq!(window.sub_budget_count(), 5);
    }

    #[test]
    fn empty_window_has_no_percentiles() {
        let window = LatencyWindow::new();
        assert_eq!(window.p50(), None);
        assert_eq!(window.total_count(), 0);
    }

    #[test]
    fn evicts_oldest_sample_once_full() {
        let window = LatencyWindow::new();
        for _ in 0..WINDOW_CAPACITY {
            window.record(Duration::from_millis(100));
        }
        window.record(Duration::from_millis(1));

        assert_eq!(window.p99(), Some(100));
        assert_eq!(window.total_count(), WINDOW_CAPACITY as u64 + 1);
    }
}
