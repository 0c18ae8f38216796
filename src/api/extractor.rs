//! Decoding front end that turns encoded images into ranked palettes.

use crate::{
    check_content_type, copy_color, Bitmap, ClipboardWriter, ColorKey, Error, Histogram,
    ImageDecoder, PalettePipeline, PaletteSize, QuantizeStep, RankedPalette, SamplingOptions,
};
#[cfg(feature = "image")]
use crate::ImageCrateDecoder;

/// The two ways the color extractor reports an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The single most frequent exact color, counted over every pixel.
    Dominant,
    /// The twelve most frequent colors, sampling every fourth pixel with channels
    /// rounded to the nearest multiple of `16`.
    #[default]
    Palette,
}

impl Mode {
    /// The palette size used by this mode.
    #[must_use]
    pub const fn palette_size(self) -> PaletteSize {
        match self {
            Mode::Dominant => PaletteSize::DOMINANT,
            Mode::Palette => PaletteSize::PALETTE,
        }
    }

    /// The sampling options used by this mode.
    #[must_use]
    pub const fn sampling(self) -> SamplingOptions {
        match self {
            Mode::Dominant => SamplingOptions::new(),
            Mode::Palette => SamplingOptions::coarse(),
        }
    }
}

/// Decodes user supplied images and extracts their colors.
///
/// An [`Extractor`] starts from the settings of a [`Mode`];
/// individual settings can then be overridden.
///
/// # Examples
/// ```
/// # use colortally::{Bitmap, Error, Extractor, Mode, MemoryClipboard};
/// # fn main() -> Result<(), Error> {
/// // Any `Fn(&[u8]) -> Result<Bitmap, Error>` can stand in for a real decoder.
/// let decoder = |bytes: &[u8]| Bitmap::from_rgba_bytes(2, 1, bytes);
/// let extractor = Extractor::new(decoder, Mode::Dominant);
///
/// let palette = extractor.extract_with_content_type("image/x-raw", &[9, 9, 9, 255, 9, 9, 9, 0])?;
/// assert_eq!(palette.hex_colors(), ["#090909"]);
///
/// let mut clipboard = MemoryClipboard::default();
/// extractor.copy(palette.dominant().unwrap(), &mut clipboard)?;
/// assert_eq!(clipboard.contents(), Some("#090909"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Extractor<D> {
    /// Turns bytes into a bitmap.
    decoder: D,
    /// The number of colors to report.
    k: PaletteSize,
    /// How pixels are sampled and quantized.
    sampling: SamplingOptions,
    /// Whether to build histograms in parallel.
    #[cfg(feature = "threads")]
    parallel: bool,
}

#[cfg(feature = "image")]
impl Extractor<ImageCrateDecoder> {
    /// Creates an [`Extractor`] that decodes with the [`image`] crate.
    #[must_use]
    pub fn with_image_decoder(mode: Mode) -> Self {
        Self::new(ImageCrateDecoder, mode)
    }
}

impl<D: ImageDecoder> Extractor<D> {
    /// Creates a new [`Extractor`] with the settings of `mode`.
    #[must_use]
    pub fn new(decoder: D, mode: Mode) -> Self {
        Self {
            decoder,
            k: mode.palette_size(),
            sampling: mode.sampling(),
            #[cfg(feature = "threads")]
            parallel: false,
        }
    }

    /// Overrides the palette size.
    #[must_use]
    pub fn palette_size(mut self, size: PaletteSize) -> Self {
        self.k = size;
        self
    }

    /// Overrides the sampling options.
    #[must_use]
    pub fn sampling(mut self, sampling: SamplingOptions) -> Self {
        self.sampling = sampling;
        self
    }

    /// Sets whether histograms are built in parallel. The default is `false`.
    #[must_use]
    #[cfg(feature = "threads")]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns the configured sampling options.
    #[must_use]
    pub fn sampling_options(&self) -> &SamplingOptions {
        &self.sampling
    }

    /// Returns the configured palette size.
    #[must_use]
    pub fn get_palette_size(&self) -> PaletteSize {
        self.k
    }

    /// Decodes `bytes` and ranks the colors of the image.
    ///
    /// # Errors
    /// Returns the decoder's error; nothing after decoding can fail.
    pub fn extract(&self, bytes: &[u8]) -> Result<RankedPalette, Error> {
        let bitmap = self.decoder.decode(bytes)?;
        Ok(self.extract_bitmap(&bitmap))
    }

    /// Like [`Extractor::extract`], but first rejects content types outside `image/*`
    /// without attempting to decode.
    ///
    /// # Errors
    /// Returns [`Error::NotAnImage`] for a non-image content type, otherwise the decoder's error.
    pub fn extract_with_content_type(
        &self,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<RankedPalette, Error> {
        check_content_type(content_type)?;
        self.extract(bytes)
    }

    /// Ranks the colors of an already decoded image.
    #[must_use]
    pub fn extract_bitmap(&self, bitmap: &Bitmap) -> RankedPalette {
        let pipeline = PalettePipeline::new(bitmap)
            .palette_size(self.k)
            .sampling(self.sampling);

        #[cfg(feature = "threads")]
        if self.parallel {
            return pipeline.palette_par();
        }

        pipeline.palette()
    }

    /// Builds the histogram of an already decoded image with this extractor's sampling options.
    #[must_use]
    pub fn histogram(&self, bitmap: &Bitmap) -> Histogram {
        PalettePipeline::new(bitmap).sampling(self.sampling).histogram()
    }

    /// Copies a color to `clipboard` as `#rrggbb`, returning the copied string.
    ///
    /// # Errors
    /// Propagates the clipboard's error.
    pub fn copy(
        &self,
        color: ColorKey,
        clipboard: &mut impl ClipboardWriter,
    ) -> Result<String, Error> {
        copy_color(color, clipboard)
    }
}

/// Returns the `k` most frequent colors of `bitmap` as `#rrggbb` strings,
/// counting every pixel and optionally rounding channels to the nearest multiple of `step`.
///
/// # Examples
/// ```
/// # use colortally::{extract_palette, Bitmap, PaletteSize};
/// # use palette::Srgba;
/// # fn main() -> Result<(), colortally::Error> {
/// let red = Srgba::new(255, 0, 0, 255);
/// let bitmap = Bitmap::new(2, 2, vec![red, red, Srgba::new(0, 255, 0, 255), Srgba::new(0, 0, 255, 255)])?;
/// assert_eq!(extract_palette(&bitmap, PaletteSize::DOMINANT, None), ["#ff0000"]);
/// assert!(extract_palette(&Bitmap::default(), PaletteSize::PALETTE, None).is_empty());
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn extract_palette(
    bitmap: &Bitmap,
    k: PaletteSize,
    step: Option<QuantizeStep>,
) -> Vec<String> {
    PalettePipeline::new(bitmap)
        .palette_size(k)
        .quantize(step)
        .hex_palette()
}
