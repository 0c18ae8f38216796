//! Contains various types needed across the crate.

use crate::{Error, MAX_PIXELS};
use palette::{cast::ComponentsAs, Srgba};
use std::{
    error,
    fmt::{self, Debug, Display},
    num::{NonZeroU32, NonZeroU8},
};
#[cfg(feature = "image")]
use image::{RgbImage, RgbaImage};

/// An error type for when the length of an input (e.g., `Vec` or slice)
/// is above the maximum supported value.
///
/// The inner value is the maximum supported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AboveMaxLen<T>(pub T);

impl<T: Display> Display for AboveMaxLen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "above the maximum length of {}", self.0)
    }
}

impl<T: Debug + Display> error::Error for AboveMaxLen<T> {}

/// Returned when a zero is given for an option that must be non-zero,
/// like a [`Stride`] or a [`QuantizeStep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("value must be greater than zero")]
pub struct ZeroValue;

/// A decoded raster image: a row-major grid of 8-bit RGBA samples.
///
/// The number of pixels is always `width * height` and never more than [`MAX_PIXELS`].
/// A bitmap with a zero dimension is valid and simply has no pixels.
///
/// # Examples
/// ```
/// # use colortally::Bitmap;
/// # use palette::Srgba;
/// # fn main() -> Result<(), colortally::Error> {
/// let bitmap = Bitmap::new(2, 1, vec![Srgba::new(255, 0, 0, 255), Srgba::new(0, 0, 255, 255)])?;
/// assert_eq!(bitmap.num_pixels(), 2);
///
/// let same = Bitmap::from_rgba_bytes(2, 1, &[255, 0, 0, 255, 0, 0, 255, 255])?;
/// assert_eq!(bitmap, same);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// The samples, `width * height` of them.
    pixels: Vec<Srgba<u8>>,
}

impl Bitmap {
    /// Creates a [`Bitmap`] from its dimensions and row-major pixels.
    ///
    /// # Errors
    /// Returns [`Error::TooLarge`] if `width * height` is above [`MAX_PIXELS`],
    /// or [`Error::DimensionMismatch`] if `pixels` does not hold exactly `width * height` samples.
    pub fn new(width: u32, height: u32, pixels: Vec<Srgba<u8>>) -> Result<Self, Error> {
        let expected = pixel_count(width, height)?;
        if pixels.len() == expected {
            Ok(Self { width, height, pixels })
        } else {
            Err(Error::DimensionMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            })
        }
    }

    /// Creates a [`Bitmap`] from a packed `RGBA` byte buffer, four bytes per pixel.
    ///
    /// # Errors
    /// Same as [`Bitmap::new`], where the expected length is counted in bytes.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, Error> {
        let expected = pixel_count(width, height)? * 4;
        if bytes.len() != expected {
            return Err(Error::DimensionMismatch {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }

        let pixels: &[Srgba<u8>] = bytes.components_as();
        Ok(Self {
            width,
            height,
            pixels: pixels.to_vec(),
        })
    }

    /// Returns the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the row-major pixel samples.
    #[must_use]
    pub fn pixels(&self) -> &[Srgba<u8>] {
        &self.pixels
    }

    /// Returns the number of pixels as a `u32`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn num_pixels(&self) -> u32 {
        self.pixels.len() as u32
    }

    /// Whether or not the bitmap has no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// `width * height`, checked against [`MAX_PIXELS`].
fn pixel_count(width: u32, height: u32) -> Result<usize, AboveMaxLen<u32>> {
    let count = u64::from(width) * u64::from(height);
    if count <= u64::from(MAX_PIXELS) {
        #[allow(clippy::cast_possible_truncation)]
        Ok(count as usize)
    } else {
        Err(AboveMaxLen(MAX_PIXELS))
    }
}

#[cfg(feature = "image")]
impl TryFrom<&RgbaImage> for Bitmap {
    type Error = Error;

    fn try_from(image: &RgbaImage) -> Result<Self, Self::Error> {
        let (width, height) = image.dimensions();
        let len = pixel_count(width, height)? * 4;
        Self::from_rgba_bytes(width, height, &image.as_raw()[..len])
    }
}

#[cfg(feature = "image")]
impl TryFrom<RgbaImage> for Bitmap {
    type Error = Error;

    fn try_from(image: RgbaImage) -> Result<Self, Self::Error> {
        Self::try_from(&image)
    }
}

#[cfg(feature = "image")]
impl TryFrom<&RgbImage> for Bitmap {
    type Error = Error;

    fn try_from(image: &RgbImage) -> Result<Self, Self::Error> {
        let (width, height) = image.dimensions();
        let pixels = image
            .pixels()
            .map(|p| {
                let [r, g, b] = p.0;
                Srgba::new(r, g, b, u8::MAX)
            })
            .collect();
        Self::new(width, height, pixels)
    }
}

/// This type is used to specify the (maximum) number of colors to include in a palette.
///
/// If a [`PaletteSize`] of `0` is provided, an empty [`RankedPalette`](crate::RankedPalette) is returned.
///
/// # Examples
/// ```
/// # use colortally::PaletteSize;
/// let size = PaletteSize::from(16u8);
/// let size: PaletteSize = 300u16.into();
/// assert_eq!(PaletteSize::DOMINANT.into_inner(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PaletteSize(u16);

impl PaletteSize {
    /// A single color: the dominant color of an image.
    pub const DOMINANT: Self = Self(1);

    /// The default palette size of `12`.
    pub const PALETTE: Self = Self(12);

    /// Gets the inner `u16` value.
    #[must_use]
    pub const fn into_inner(self) -> u16 {
        self.0
    }
}

impl Default for PaletteSize {
    fn default() -> Self {
        Self::PALETTE
    }
}

impl From<PaletteSize> for u16 {
    fn from(val: PaletteSize) -> Self {
        val.into_inner()
    }
}

impl From<u8> for PaletteSize {
    fn from(value: u8) -> Self {
        Self(value.into())
    }
}

impl From<u16> for PaletteSize {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl Display for PaletteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}

/// Visit every `n`-th pixel of a bitmap when building a histogram.
///
/// Pixels are visited by their flat row-major index, so sampling does not restart on each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Stride(NonZeroU32);

impl Stride {
    /// Visit every pixel.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Visit every fourth pixel.
    pub const EVERY_FOURTH: Self = match NonZeroU32::new(4) {
        Some(n) => Self(n),
        None => Self::ONE,
    };

    /// Creates a new [`Stride`], returning `None` for `0`.
    #[must_use]
    pub const fn new(step: u32) -> Option<Self> {
        match NonZeroU32::new(step) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Gets the inner value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// The number of positions visited in a bitmap of `len` pixels.
    #[must_use]
    pub fn num_samples(self, len: usize) -> usize {
        len.div_ceil(self.get() as usize)
    }
}

impl Default for Stride {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u32> for Stride {
    type Error = ZeroValue;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ZeroValue)
    }
}

impl Display for Stride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// The step that each color channel is rounded to a multiple of, collapsing near-duplicate colors.
///
/// A step of `16` reduces the roughly 16.7 million 8-bit RGB colors to about 4096 buckets.
/// See [`Rounding`](crate::Rounding) for how values are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct QuantizeStep(NonZeroU8);

impl QuantizeStep {
    /// A step of `16`.
    pub const DEFAULT: Self = match NonZeroU8::new(16) {
        Some(n) => Self(n),
        None => Self(NonZeroU8::MIN),
    };

    /// Creates a new [`QuantizeStep`], returning `None` for `0`.
    #[must_use]
    pub const fn new(step: u8) -> Option<Self> {
        match NonZeroU8::new(step) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Gets the inner value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl Default for QuantizeStep {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for QuantizeStep {
    type Error = ZeroValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ZeroValue)
    }
}

impl Display for QuantizeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
