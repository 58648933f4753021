use serde::{Deserialize, Serialize};

/// Linear `domain -> pixel` mapping.
///
/// The range may be inverted (`range_start > range_end`); the bar chart uses
/// that so larger values land further left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        }
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    /// Maps `value` into the range. A degenerate domain maps everything to
    /// the range start.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        if span == 0.0 || !span.is_finite() {
            return self.range_start;
        }
        let normalized = (value - self.domain_start) / span;
        self.range_start + normalized * (self.range_end - self.range_start)
    }
}
