use std::collections::VecDeque;
use std::sync::Arc;

use crate::core::clock::Clock;

/// Seconds of history kept per metric (and plotted by the renderer).
pub const WINDOW_SECONDS: f64 = 60.0;

/// One recorded measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub value: f64,
}

/// Time-windowed sample store for a single metric.
///
/// Samples are kept in insertion order, which is also time order. Anything
/// older than the window is dropped from the front on the next `add`.
pub struct RetentionBuffer {
    window: f64,
    samples: VecDeque<Sample>,
    clock: Arc<dyn Clock>,
}

impl RetentionBuffer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_window(clock, WINDOW_SECONDS)
    }

    pub fn with_window(clock: Arc<dyn Clock>, window: f64) -> Self {
        Self {
            window,
            samples: VecDeque::new(),
            clock,
        }
    }

    /// Record `value` at the current time and evict stale samples.
    pub fn add(&mut self, value: f64) {
        let now = self.clock.now();
        self.samples.push_back(Sample { time: now, value });

        let cutoff = now - self.window;
        while let Some(oldest) = self.samples.front() {
            if oldest.time >= cutoff {
                break;
            }
            self.samples.pop_front();
        }
    }

    pub fn points(&self) -> &VecDeque<Sample> {
        &self.samples
    }

    pub fn latest(&self) -> Option<f64> {
        self.samples.back().map(|s| s.value)
    }

    /// Largest retained value
    pub fn max_value(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.value).reduce(f64::max)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn window(&self) -> f64 {
        self.window
    }
}
