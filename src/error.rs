//! The error type shared by decoding, validation, and the clipboard port.

use crate::{AboveMaxLen, ParseHexError};
use thiserror::Error;

/// Errors produced while turning user input into a palette.
///
/// Building a [`Histogram`](crate::Histogram) or ranking it never fails;
/// every variant here comes from validating or decoding input, or from an output port.
#[derive(Debug, Error)]
pub enum Error {
    /// The input was rejected before decoding, e.g. a non-`image/*` content type
    /// or bytes that do not start with a known image signature.
    #[error("not a supported image: {0}")]
    NotAnImage(String),

    /// The input looked like an image but could not be decoded.
    #[cfg(feature = "image")]
    #[error("unable to decode image")]
    Decode(#[from] image::ImageError),

    /// A pixel buffer did not match the given dimensions.
    #[error("expected {expected} values for a {width}x{height} bitmap, found {actual}")]
    DimensionMismatch {
        /// The bitmap width.
        width: u32,
        /// The bitmap height.
        height: u32,
        /// The number of values required by the dimensions.
        expected: usize,
        /// The number of values supplied.
        actual: usize,
    },

    /// The image has more pixels than [`MAX_PIXELS`](crate::MAX_PIXELS).
    #[error("image is too large: {0}")]
    TooLarge(#[from] AboveMaxLen<u32>),

    /// A hex color string could not be parsed.
    #[error(transparent)]
    ParseHex(#[from] ParseHexError),

    /// Writing to a clipboard port failed.
    #[error("clipboard write failed")]
    Clipboard(#[from] std::io::Error),
}
