//! Bounded latency histogram

use std::collections::VecDeque;
use std::time::Duration;

/// Maximum number of samples to keep in histogram (prevents unbounded memory growth)
pub const HISTOGRAM_MAX_SAMPLES: usize = 1000;

/// Rolling window of latency samples, in milliseconds
#[derive(Debug, Clone)]
pub struct BoundedHistogram {
    samples: VecDeque<f64>,
    max_samples: usize,
    /// Sum of the samples currently in the window
    sum: f64,
    /// Every sample ever recorded, including evicted ones
    total_count: u64,
}

impl BoundedHistogram {
    pub fn new(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            samples: VecDeque::with_capacity(max_samples),
            max_samples,
            sum: 0.0,
            total_count: 0,
        }
    }

    pub fn record(&mut self, elapsed: Duration) {
        let value = elapsed.as_secs_f64() * 1000.0;
        self.total_count += 1;
        self.sum += value;

        if self.samples.len() >= self.max_samples {
            if let Some(oldest) = self.samples.pop_front() {
                self.sum -= oldest;
            }
        }

        self.samples.push_back(value);
    }

    /// Mean of the current window in milliseconds
    pub fn mean_ms(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum / self.samples.len() as f64
        }
    }

    /// Percentile (0-100) of the current window in milliseconds, linearly interpolated
    pub fn percentile_ms(&self, p: f64) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }

        let mut sorted: Vec<f64> = self.samples.iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len();
        if n == 1 {
            return sorted[0];
        }

        let pos = (p.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
        let lower = pos.floor() as usize;
        let upper = pos.ceil() as usize;
        let frac = pos - lower as f64;
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }

    pub fn count(&self) -> u64 {
        self.total_count
    }

    pub fn window_size(&self) -> usize {
        self.samples.len()
    }
}

impl Default for BoundedHistogram {
    fn default() -> Self {
        Self::new(HISTOGRAM_MAX_SAMPLES)
    }
}
