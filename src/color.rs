use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ShowroomError, ShowroomResult};

/// A color value as it appears in the configuration schema.
///
/// Tokens are opaque to the palette: two tokens are the same color only when their text is
/// identical. The cascade membership test relies on exactly this comparison, so `"#FF0000"` and
/// `"#ff0000"` are different options.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ColorToken(String);

impl ColorToken {
    /// Wrap a token, rejecting blank text.
    pub fn new(token: impl Into<String>) -> ShowroomResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ShowroomError::validation("color token must be non-empty"));
        }
        Ok(Self(token))
    }

    /// Borrow the raw token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode `#RRGGBB` / `#RRGGBBAA` tokens into straight-alpha RGBA8.
    ///
    /// Named or functional colors return `None`; the renderer collaborator interprets them.
    pub fn rgba8(&self) -> Option<Rgba8> {
        parse_hex(&self.0).ok()
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ColorToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Straight-alpha RGBA8 used to fill color swatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

fn parse_hex(s: &str) -> Result<Rgba8, String> {
    let s = s.trim();
    let Some(s) = s.strip_prefix('#') else {
        return Err("hex color must start with '#'".to_owned());
    };

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be ascii".to_owned());
    }

    let (r, g, b, a) = match s.len() {
        6 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned());
        }
    };

    Ok(Rgba8 { r, g, b, a })
}
