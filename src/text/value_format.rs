use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::style::LabelSettings;

/// Magnitude divisor and suffix applied to numeric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayUnit {
    None,
    Thousands,
    Millions,
    Billions,
    Trillions,
}

impl DisplayUnit {
    /// Maps a configured units value (`1e3`, `1e6`, ...) to a unit. Values
    /// below one thousand, including the "tens" bucket, show raw numbers.
    #[must_use]
    pub fn from_units(units: f64) -> Self {
        if units >= 1e12 {
            Self::Trillions
        } else if units >= 1e9 {
            Self::Billions
        } else if units >= 1e6 {
            Self::Millions
        } else if units >= 1e3 {
            Self::Thousands
        } else {
            Self::None
        }
    }

    #[must_use]
    pub fn divisor(self) -> f64 {
        match self {
            Self::None => 1.0,
            Self::Thousands => 1e3,
            Self::Millions => 1e6,
            Self::Billions => 1e9,
            Self::Trillions => 1e12,
        }
    }

    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Thousands => "K",
            Self::Millions => "M",
            Self::Billions => "bn",
            Self::Trillions => "T",
        }
    }
}

/// Units picked from the digit count of the rounded maximum:
/// more than 9 digits -> billions, 7..=9 -> millions, 4..=6 -> thousands,
/// otherwise tens.
#[must_use]
pub fn auto_display_units(data_max: f64) -> f64 {
    let rounded = data_max.round();
    let digits = if rounded == 0.0 {
        1
    } else {
        format!("{rounded:.0}").len()
    };
    match digits {
        d if d > 9 => 1e9,
        7..=9 => 1e6,
        4..=6 => 1e3,
        _ => 10.0,
    }
}

/// Formatter for one measure's value labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueFormatter {
    percent: bool,
    grouping: bool,
    unit: DisplayUnit,
    precision: u8,
}

impl ValueFormatter {
    /// Chooses units and precision for a format code.
    ///
    /// Percentage formats use the configured units directly (`0` means
    /// none). Other formats resolve the auto sentinel `0` from `data_max`.
    #[must_use]
    pub fn new(format: Option<&str>, label: &LabelSettings, data_max: f64) -> Self {
        let format = format.unwrap_or_default();
        let percent = format.contains('%');
        let units = if percent || label.display_units != 0.0 {
            label.display_units
        } else {
            auto_display_units(data_max)
        };
        Self {
            percent,
            grouping: format.contains(','),
            unit: DisplayUnit::from_units(units),
            precision: label.precision,
        }
    }

    #[must_use]
    pub fn unit(&self) -> DisplayUnit {
        self.unit
    }

    #[must_use]
    pub fn is_percent(&self) -> bool {
        self.percent
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return "nan".to_owned();
        }
        let scaled = if self.percent { value * 100.0 } else { value } / self.unit.divisor();
        let mut text = format_fixed(scaled, self.precision);
        if self.grouping {
            text = group_thousands(&text);
        }
        text.push_str(self.unit.suffix());
        if self.percent {
            text.push('%');
        }
        text
    }
}

/// Shortest round-trip text of a raw value, as shown in tooltips.
/// Magnitudes outside `[1e-6, 1e21)` switch to exponent notation with an
/// explicit sign (`1e+21`, `1.5e-7`).
#[must_use]
pub fn plain_number_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if value == 0.0 {
        return "0".to_owned();
    }
    if (1e-6..1e21).contains(&value.abs()) {
        return value.to_string();
    }
    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

fn format_fixed(value: f64, precision: u8) -> String {
    let precision = usize::from(precision);
    match Decimal::from_f64(value) {
        Some(decimal) => {
            let mut rounded = decimal
                .round_dp_with_strategy(precision as u32, RoundingStrategy::MidpointAwayFromZero);
            if rounded.is_zero() {
                rounded.set_sign_positive(true);
            }
            format!("{rounded:.precision$}")
        }
        None => format!("{value:.precision$}"),
    }
}

fn group_thousands(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(text.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (index, ch) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
