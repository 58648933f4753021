use serde::{Deserialize, Serialize};

/// Host panel size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[must_use]
    pub fn width_px(self) -> f64 {
        f64::from(self.width)
    }

    #[must_use]
    pub fn height_px(self) -> f64 {
        f64::from(self.height)
    }
}
