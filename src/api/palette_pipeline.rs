//! The builder that runs the histogram and ranking steps over a [`Bitmap`].

use crate::{
    Bitmap, Histogram, PaletteSize, QuantizeStep, RankedPalette, Rounding, SamplingOptions, Stride,
};

/// A builder struct to specify options to extract a color palette from a [`Bitmap`].
///
/// The defaults rank the [`PaletteSize::PALETTE`] most frequent exact colors over every pixel.
///
/// # Examples
/// ```
/// # use colortally::{Bitmap, PalettePipeline, PaletteSize, QuantizeStep, Rounding, Stride};
/// # use palette::Srgba;
/// # fn main() -> Result<(), colortally::Error> {
/// let bitmap = Bitmap::new(1, 2, vec![Srgba::new(250, 10, 10, 255), Srgba::new(255, 0, 0, 255)])?;
///
/// let palette = PalettePipeline::new(&bitmap)
///     .palette_size(PaletteSize::DOMINANT)
///     .stride(Stride::ONE)
///     .quantize(Some(QuantizeStep::DEFAULT))
///     .rounding(Rounding::Floor)
///     .palette();
///
/// assert_eq!(palette.hex_colors(), ["#f00000"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PalettePipeline<'a> {
    /// The input image.
    pub(crate) bitmap: &'a Bitmap,
    /// The number of colors to keep.
    pub(crate) k: PaletteSize,
    /// How pixels are sampled and quantized.
    pub(crate) sampling: SamplingOptions,
}

impl<'a> PalettePipeline<'a> {
    /// Creates a new [`PalettePipeline`] with default options.
    #[must_use]
    pub fn new(bitmap: &'a Bitmap) -> Self {
        Self {
            bitmap,
            k: PaletteSize::default(),
            sampling: SamplingOptions::new(),
        }
    }

    /// Sets the palette size, which is the maximum number of colors returned.
    ///
    /// The default is [`PaletteSize::PALETTE`].
    #[must_use]
    pub fn palette_size(mut self, size: PaletteSize) -> Self {
        self.k = size;
        self
    }

    /// Replaces all sampling options at once.
    #[must_use]
    pub fn sampling(mut self, sampling: SamplingOptions) -> Self {
        self.sampling = sampling;
        self
    }

    /// Sets the sampling stride. The default visits every pixel.
    #[must_use]
    pub fn stride(mut self, stride: Stride) -> Self {
        self.sampling = self.sampling.stride(stride);
        self
    }

    /// Sets the channel quantization step. The default is `None`: exact colors.
    #[must_use]
    pub fn quantize(mut self, step: Option<QuantizeStep>) -> Self {
        self.sampling = self.sampling.quantize(step);
        self
    }

    /// Sets the rounding mode for quantization. The default is [`Rounding::Nearest`].
    #[must_use]
    pub fn rounding(mut self, rounding: Rounding) -> Self {
        self.sampling = self.sampling.rounding(rounding);
        self
    }

    /// Sets the minimum alpha a pixel needs to be counted. The default of `0` counts every pixel.
    #[must_use]
    pub fn min_alpha(mut self, min_alpha: u8) -> Self {
        self.sampling = self.sampling.min_alpha(min_alpha);
        self
    }

    /// Builds the histogram without ranking it.
    #[must_use]
    pub fn histogram(&self) -> Histogram {
        Histogram::new(self.bitmap, &self.sampling)
    }

    /// Runs the pipeline, returning the ranked palette.
    #[must_use]
    pub fn palette(self) -> RankedPalette {
        RankedPalette::from_histogram(&self.histogram(), self.k)
    }

    /// Runs the pipeline, returning the `#rrggbb` strings of the ranked palette.
    #[must_use]
    pub fn hex_palette(self) -> Vec<String> {
        self.palette().hex_colors()
    }
}

#[cfg(feature = "threads")]
impl<'a> PalettePipeline<'a> {
    /// Builds the histogram in parallel without ranking it.
    #[must_use]
    pub fn histogram_par(&self) -> Histogram {
        Histogram::new_par(self.bitmap, &self.sampling)
    }

    /// Runs the pipeline in parallel, returning the ranked palette.
    #[must_use]
    pub fn palette_par(self) -> RankedPalette {
        RankedPalette::from_histogram(&self.histogram_par(), self.k)
    }

    /// Runs the pipeline in parallel, returning the `#rrggbb` strings of the ranked palette.
    #[must_use]
    pub fn hex_palette_par(self) -> Vec<String> {
        self.palette_par().hex_colors()
    }
}
