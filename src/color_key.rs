//! The canonical histogram key for an RGB color and its `#rrggbb` form.

use palette::Srgb;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// An RGB color packed as `0x00RRGGBB`.
///
/// Two pixels share a [`ColorKey`] if and only if their (possibly quantized) red, green,
/// and blue channels are identical; alpha never takes part.
/// Keys order the same way as their `(red, green, blue)` triples.
///
/// The [`Display`](fmt::Display) form is the lowercase hex string `#rrggbb`,
/// which [`FromStr`] parses back.
///
/// # Examples
/// ```
/// # use colortally::ColorKey;
/// let key = ColorKey::new(3, 83, 164);
/// assert_eq!(key.to_string(), "#0353a4");
/// assert_eq!("#0353A4".parse(), Ok(key));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ColorKey(u32);

impl ColorKey {
    /// Creates a key from its channels.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self((red as u32) << 16 | (green as u32) << 8 | blue as u32)
    }

    /// Creates a key from the low 24 bits of `packed`.
    #[must_use]
    pub const fn from_u32(packed: u32) -> Self {
        Self(packed & 0x00FF_FFFF)
    }

    /// Returns the packed `0x00RRGGBB` value.
    #[must_use]
    pub const fn into_u32(self) -> u32 {
        self.0
    }

    /// Returns the `[red, green, blue]` channels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn channels(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    /// Returns the lowercase `#rrggbb` string for this color.
    #[must_use]
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl From<[u8; 3]> for ColorKey {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<ColorKey> for [u8; 3] {
    fn from(key: ColorKey) -> Self {
        key.channels()
    }
}

impl From<Srgb<u8>> for ColorKey {
    fn from(color: Srgb<u8>) -> Self {
        Self::new(color.red, color.green, color.blue)
    }
}

impl From<ColorKey> for Srgb<u8> {
    fn from(key: ColorKey) -> Self {
        let [r, g, b] = key.channels();
        Srgb::new(r, g, b)
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.channels();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// An error from parsing a [`ColorKey`] out of a hex string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseHexError {
    /// The string (after an optional leading `#`) was not six characters long.
    #[error("expected 6 hex digits, found {0} characters")]
    Length(usize),
    /// A character was not a hex digit.
    #[error("invalid hex digit in `{0}`")]
    Digit(String),
}

impl FromStr for ColorKey {
    type Err = ParseHexError;

    /// Parses `#rrggbb` or `rrggbb`, in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 {
            return Err(ParseHexError::Length(hex.chars().count()));
        }
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseHexError::Digit(s.to_owned()));
        }

        u32::from_str_radix(hex, 16)
            .map(Self)
            .map_err(|_| ParseHexError::Digit(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_every_channel_value() {
        for v in 0..=u8::MAX {
            for key in [
                ColorKey::new(v, 0, 0),
                ColorKey::new(0, v, 0),
                ColorKey::new(0, 0, v),
                ColorKey::new(v, v.wrapping_mul(7), v.wrapping_add(128)),
            ] {
                let hex = key.to_hex();
                assert_eq!(hex.len(), 7);
                assert_eq!(hex, hex.to_lowercase());
                assert_eq!(hex.parse::<ColorKey>().unwrap(), key);
            }
        }
    }

    #[test]
    fn formats_zero_padded_lowercase() {
        assert_eq!(ColorKey::new(255, 0, 0).to_string(), "#ff0000");
        assert_eq!(ColorKey::new(0, 10, 1).to_string(), "#000a01");
        assert_eq!(ColorKey::from_u32(0xFF12_3456).to_string(), "#123456");
    }

    #[test]
    fn parse_accepts_uppercase_and_missing_hash() {
        assert_eq!("ABCDEF".parse(), Ok(ColorKey::new(0xab, 0xcd, 0xef)));
        assert_eq!("#aBcDeF".parse(), Ok(ColorKey::new(0xab, 0xcd, 0xef)));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!("#fff".parse::<ColorKey>(), Err(ParseHexError::Length(3)));
        assert_eq!("".parse::<ColorKey>(), Err(ParseHexError::Length(0)));
        assert_eq!(
            "#12345g".parse::<ColorKey>(),
            Err(ParseHexError::Digit("#12345g".to_owned()))
        );
        // `from_str_radix` alone would accept a sign.
        assert!("+12345".parse::<ColorKey>().is_err());
        assert!("#ffééff".parse::<ColorKey>().is_err());
    }

    #[test]
    fn key_order_matches_channel_order() {
        let mut keys = vec![
            ColorKey::new(1, 0, 0),
            ColorKey::new(0, 255, 255),
            ColorKey::new(0, 1, 0),
            ColorKey::new(0, 0, 2),
        ];
        keys.sort();
        let channels: Vec<[u8; 3]> = keys.into_iter().map(Into::into).collect();
        let mut sorted = channels.clone();
        sorted.sort_unstable();
        assert_eq!(channels, sorted);
    }

    #[test]
    fn srgb_conversion() {
        let key = ColorKey::from(Srgb::new(1u8, 2, 3));
        assert_eq!(Srgb::<u8>::from(key), Srgb::new(1, 2, 3));
    }
}
