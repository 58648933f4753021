use std::cell::RefCell;

use indexmap::IndexMap;

/// Deterministic `category -> colour` assignment.
pub trait ColorPalette {
    fn color_for(&self, key: &str) -> String;
}

/// Default 8-colour theme of the hosting report canvas.
pub const DEFAULT_THEME_COLORS: [&str; 8] = [
    "#01B8AA", "#374649", "#FD625E", "#F2C80F", "#5F6B6D", "#8AD4EB", "#FE9666", "#A66999",
];

/// Palette that hands out theme colours in first-seen key order and keeps the
/// assignment stable for the palette's lifetime.
#[derive(Debug)]
pub struct DefaultColorPalette {
    colors: Vec<String>,
    assigned: RefCell<IndexMap<String, usize>>,
}

impl DefaultColorPalette {
    #[must_use]
    pub fn new(colors: Vec<String>) -> Self {
        let colors = if colors.is_empty() {
            theme_colors()
        } else {
            colors
        };
        Self {
            colors,
            assigned: RefCell::new(IndexMap::new()),
        }
    }

    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.assigned.borrow().len()
    }
}

impl Default for DefaultColorPalette {
    fn default() -> Self {
        Self::new(theme_colors())
    }
}

impl ColorPalette for DefaultColorPalette {
    fn color_for(&self, key: &str) -> String {
        let mut assigned = self.assigned.borrow_mut();
        let next = assigned.len();
        let slot = *assigned.entry(key.to_owned()).or_insert(next);
        self.colors[slot % self.colors.len()].clone()
    }
}

fn theme_colors() -> Vec<String> {
    DEFAULT_THEME_COLORS
        .iter()
        .map(|color| (*color).to_owned())
        .collect()
}
