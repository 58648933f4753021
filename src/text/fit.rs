use serde::{Deserialize, Serialize};

use super::{FontSpec, TextMeasurer};

pub const ELLIPSIS: &str = "...";

/// Label text after fitting, plus the untruncated text for hover display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FittedText {
    pub text: String,
    pub full_text: String,
}

impl FittedText {
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.text != self.full_text
    }
}

/// Shortens `text` with a trailing ellipsis until it fits `max_width_px`.
///
/// Text that already fits is returned unchanged. Otherwise the longest
/// prefix whose ellipsized form fits is kept; when no prefix fits the result
/// is the bare ellipsis.
#[must_use]
pub fn fit_text(
    text: &str,
    font: &FontSpec,
    max_width_px: f64,
    measurer: &dyn TextMeasurer,
) -> FittedText {
    let full_text = text.to_owned();
    if measurer.measure(text, font).width <= max_width_px {
        return FittedText {
            text: full_text.clone(),
            full_text,
        };
    }

    // Byte offsets of every char boundary after the first char.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .skip(1)
        .chain(std::iter::once(text.len()))
        .collect();

    let fits = |chars: usize| -> bool {
        let end = if chars == 0 { 0 } else { boundaries[chars - 1] };
        let candidate = format!("{}{ELLIPSIS}", &text[..end]);
        measurer.measure(&candidate, font).width <= max_width_px
    };

    let (mut low, mut high) = (0usize, boundaries.len());
    while low < high {
        let mid = (low + high).div_ceil(2);
        if fits(mid) {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    let end = if low == 0 { 0 } else { boundaries[low - 1] };
    FittedText {
        text: format!("{}{ELLIPSIS}", &text[..end]),
        full_text,
    }
}
