use serde::{Deserialize, Serialize};

/// Categorical scale that splits a pixel range into one band per category.
///
/// Padding is expressed in step units: `padding_inner` is the fraction of each
/// step left empty between bands, `padding_outer` the number of steps left
/// empty before the first and after the last band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    range_start: f64,
    range_end: f64,
    count: usize,
    padding_inner: f64,
    padding_outer: f64,
}

impl BandScale {
    #[must_use]
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            range_start: range.0,
            range_end: range.1,
            count,
            padding_inner: 0.0,
            padding_outer: 0.0,
        }
    }

    #[must_use]
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Same padding and count over a different pixel range.
    #[must_use]
    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range_start = range.0;
        self.range_end = range.1;
        self
    }

    #[must_use]
    pub fn count(self) -> usize {
        self.count
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    fn step(self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let span = (self.range_end - self.range_start).abs();
        let denom = self.count as f64 - self.padding_inner + 2.0 * self.padding_outer;
        if denom <= 0.0 { 0.0 } else { span / denom }
    }

    /// Thickness of every band.
    #[must_use]
    pub fn band_width(self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Leading edge of the band at `index`, or `None` when out of range.
    ///
    /// A reversed range (`end < start`) assigns bands from the end backwards.
    #[must_use]
    pub fn position(self, index: usize) -> Option<f64> {
        if index >= self.count {
            return None;
        }
        let step = self.step();
        let reversed = self.range_end < self.range_start;
        let start = self.range_start.min(self.range_end);
        let slot = if reversed {
            self.count - 1 - index
        } else {
            index
        };
        Some(start + step * self.padding_outer + step * slot as f64)
    }

    /// Centre of the band at `index`.
    #[must_use]
    pub fn center(self, index: usize) -> Option<f64> {
        self.position(index)
            .map(|position| position + self.band_width() * 0.5)
    }
}
