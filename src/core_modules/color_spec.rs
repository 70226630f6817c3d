//! Validated hex color specification.
//!
//! Colors arrive from pickers and palette tables as `#RRGGBB` strings in
//! arbitrary case. `ColorSpec` normalizes them to lowercase at construction so
//! comparison and storage are canonical, and keeps the decoded channel values
//! alongside for the compositor's per-pixel math.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PaintError, Result};

/// A normalized `#rrggbb` color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorSpec {
    hex: String,
    rgb: [u8; 3],
}

impl ColorSpec {
    /// Parse a `#RRGGBB` string, case-insensitive. The stored form is always
    /// lowercase.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let digits = trimmed.strip_prefix('#').ok_or_else(|| invalid(trimmed))?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid(trimmed));
        }
        let mut rgb = [0u8; 3];
        for (i, channel) in rgb.iter_mut().enumerate() {
            *channel = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
                .map_err(|_| invalid(trimmed))?;
        }
        Ok(Self {
            hex: format!("#{}", digits.to_ascii_lowercase()),
            rgb,
        })
    }

    /// Build a spec from raw channel values.
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        Self {
            hex: format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2]),
            rgb,
        }
    }

    /// The normalized lowercase `#rrggbb` form.
    pub fn as_str(&self) -> &str {
        &self.hex
    }

    /// Decoded channel values.
    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }
}

fn invalid(value: &str) -> PaintError {
    PaintError::InvalidColor {
        value: value.to_string(),
    }
}

impl FromStr for ColorSpec {
    type Err = PaintError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

impl TryFrom<String> for ColorSpec {
    type Error = PaintError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ColorSpec> for String {
    fn from(color: ColorSpec) -> Self {
        color.hex
    }
}
