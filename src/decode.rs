//! The image decoding port: raw bytes in, [`Bitmap`] out.

use crate::{Bitmap, Error};
#[cfg(feature = "image")]
use image::ImageFormat;

/// Turns encoded image bytes into a [`Bitmap`].
///
/// Decoding is the only fallible step of extraction; [`Histogram`](crate::Histogram)
/// and [`RankedPalette`](crate::RankedPalette) never fail on a valid bitmap.
/// Closures of the right shape are decoders too, which keeps tests free of real image files.
pub trait ImageDecoder {
    /// Decodes `bytes`.
    ///
    /// # Errors
    /// Returns [`Error::NotAnImage`] if the bytes are not a supported image format,
    /// or another [`Error`] if decoding fails.
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, Error>;
}

impl<F> ImageDecoder for F
where
    F: Fn(&[u8]) -> Result<Bitmap, Error>,
{
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, Error> {
        self(bytes)
    }
}

/// Checks a MIME content type for the `image/` prefix, as a file picker reports it.
///
/// # Errors
/// Returns [`Error::NotAnImage`] for anything outside `image/*`.
///
/// # Examples
/// ```
/// # use colortally::check_content_type;
/// assert!(check_content_type("image/png").is_ok());
/// assert!(check_content_type("IMAGE/WEBP").is_ok());
/// assert!(check_content_type("text/plain").is_err());
/// ```
pub fn check_content_type(content_type: &str) -> Result<(), Error> {
    let prefix = content_type.get(..6);
    if prefix.is_some_and(|p| p.eq_ignore_ascii_case("image/")) {
        Ok(())
    } else {
        Err(Error::NotAnImage(format!("content type `{content_type}`")))
    }
}

/// An [`ImageDecoder`] backed by the [`image`] crate.
///
/// The format is detected from the leading bytes; PNG, JPEG, WebP, GIF, and BMP are supported.
/// Animated formats yield their first frame.
#[cfg(feature = "image")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

#[cfg(feature = "image")]
impl ImageCrateDecoder {
    /// The formats this decoder accepts.
    pub const FORMATS: [ImageFormat; 5] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::WebP,
        ImageFormat::Gif,
        ImageFormat::Bmp,
    ];
}

#[cfg(feature = "image")]
impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, Error> {
        let format = image::guess_format(bytes)
            .ok()
            .filter(|format| Self::FORMATS.contains(format))
            .ok_or_else(|| Error::NotAnImage("unrecognized image data".to_owned()))?;

        let image = image::load_from_memory_with_format(bytes, format)?.into_rgba8();
        log::debug!(
            "decoded {format:?} image of {}x{}",
            image.width(),
            image.height()
        );
        Bitmap::try_from(&image)
    }
}
