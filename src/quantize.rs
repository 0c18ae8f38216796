//! Per-pixel sampling options: which pixels are counted and how their channels are quantized.

use crate::{QuantizeStep, Stride};
use palette::Srgba;

/// How a channel value is mapped onto a multiple of a [`QuantizeStep`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round to the nearest multiple, halves rounding up, then clamp to `255`.
    ///
    /// With a step of `16`, `250` becomes `255` (from `256`) and `10` becomes `16`.
    #[default]
    Nearest,
    /// Round down to the multiple below, so every value in `[k * step, (k + 1) * step)` shares a bucket.
    ///
    /// With a step of `16`, both `250` and `255` become `240`.
    Floor,
}

impl Rounding {
    /// Quantizes a single channel value.
    #[must_use]
    pub fn apply(self, value: u8, step: QuantizeStep) -> u8 {
        let v = u32::from(value);
        let q = u32::from(step.get());
        let rounded = match self {
            Rounding::Nearest => (2 * v + q) / (2 * q) * q,
            Rounding::Floor => v / q * q,
        };

        #[allow(clippy::cast_possible_truncation)]
        {
            rounded.min(u32::from(u8::MAX)) as u8
        }
    }
}

/// Options controlling how pixels of a [`Bitmap`](crate::Bitmap) become histogram samples.
///
/// The defaults count every pixel at full precision:
/// a [`Stride`] of `1`, no quantization, and no alpha threshold.
///
/// # Examples
/// ```
/// # use colortally::{QuantizeStep, Rounding, SamplingOptions, Stride};
/// let options = SamplingOptions::new()
///     .stride(Stride::EVERY_FOURTH)
///     .quantize(Some(QuantizeStep::DEFAULT))
///     .rounding(Rounding::Floor)
///     .min_alpha(1); // skip fully transparent pixels
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SamplingOptions {
    /// Visit every `stride`-th pixel.
    stride: Stride,
    /// The channel quantization step, if any.
    quantize: Option<QuantizeStep>,
    /// How channels are rounded to the quantization step.
    rounding: Rounding,
    /// Pixels with an alpha below this value are not counted.
    min_alpha: u8,
}

impl SamplingOptions {
    /// Creates a new [`SamplingOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stride: Stride::ONE,
            quantize: None,
            rounding: Rounding::Nearest,
            min_alpha: 0,
        }
    }

    /// The settings of the multi-color palette tool:
    /// every fourth pixel, channels rounded to the nearest multiple of `16`.
    #[must_use]
    pub const fn coarse() -> Self {
        Self {
            stride: Stride::EVERY_FOURTH,
            quantize: Some(QuantizeStep::DEFAULT),
            rounding: Rounding::Nearest,
            min_alpha: 0,
        }
    }

    /// Sets the sampling stride.
    #[must_use]
    pub const fn stride(mut self, stride: Stride) -> Self {
        self.stride = stride;
        self
    }

    /// Sets the quantization step, or `None` to count exact colors.
    #[must_use]
    pub const fn quantize(mut self, step: Option<QuantizeStep>) -> Self {
        self.quantize = step;
        self
    }

    /// Sets the rounding mode used when a quantization step is set.
    #[must_use]
    pub const fn rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Sets the minimum alpha a pixel needs to be counted.
    ///
    /// The default of `0` counts every pixel regardless of transparency.
    #[must_use]
    pub const fn min_alpha(mut self, min_alpha: u8) -> Self {
        self.min_alpha = min_alpha;
        self
    }

    /// Returns the sampling stride.
    #[must_use]
    pub const fn get_stride(&self) -> Stride {
        self.stride
    }

    /// Returns the quantization step.
    #[must_use]
    pub const fn get_quantize(&self) -> Option<QuantizeStep> {
        self.quantize
    }

    /// Returns the rounding mode.
    #[must_use]
    pub const fn get_rounding(&self) -> Rounding {
        self.rounding
    }

    /// Returns the alpha threshold.
    #[must_use]
    pub const fn get_min_alpha(&self) -> u8 {
        self.min_alpha
    }

    /// Maps a pixel to the channels it is counted under, or `None` if it is skipped.
    #[inline]
    pub(crate) fn sample(&self, pixel: Srgba<u8>) -> Option<[u8; 3]> {
        if pixel.alpha < self.min_alpha {
            return None;
        }

        let channels = [pixel.red, pixel.green, pixel.blue];
        Some(match self.quantize {
            Some(step) => channels.map(|c| self.rounding.apply(c, step)),
            None => channels,
        })
    }
}
