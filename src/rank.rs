//! Selecting the most frequent colors of a [`Histogram`].

use crate::{ColorKey, Histogram, PaletteSize};
use std::cmp::Ordering;

/// Most frequent first; equal counts fall back to ascending key order.
fn rank_order(a: &(ColorKey, u32), b: &(ColorKey, u32)) -> Ordering {
    b.1.cmp(&a.1).then(a.0.cmp(&b.0))
}

/// The top-K colors of a [`Histogram`], most frequent first.
///
/// Colors with equal counts are ordered by ascending [`ColorKey`],
/// so the same histogram always ranks the same way.
/// A palette never holds more entries than the histogram has distinct colors.
///
/// # Examples
/// ```
/// # use colortally::{Bitmap, Histogram, PaletteSize, RankedPalette, SamplingOptions};
/// # use palette::Srgba;
/// # fn main() -> Result<(), colortally::Error> {
/// let red = Srgba::new(255, 0, 0, 255);
/// let green = Srgba::new(0, 255, 0, 255);
/// let blue = Srgba::new(0, 0, 255, 255);
/// let bitmap = Bitmap::new(2, 2, vec![red, red, green, blue])?;
///
/// let histogram = Histogram::new(&bitmap, &SamplingOptions::new());
/// let palette = RankedPalette::from_histogram(&histogram, PaletteSize::DOMINANT);
/// assert_eq!(palette.hex_colors(), ["#ff0000"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedPalette {
    /// `(color, count)` pairs in rank order.
    entries: Vec<(ColorKey, u32)>,
    /// The number of samples in the source histogram.
    total_count: u32,
}

impl RankedPalette {
    /// Ranks the colors of `histogram` and keeps the first `k`.
    #[must_use]
    pub fn from_histogram(histogram: &Histogram, k: PaletteSize) -> Self {
        let k = usize::from(k.into_inner()).min(histogram.len());
        let total_count = histogram.total_count();

        if k == 0 {
            return Self { entries: Vec::new(), total_count };
        }

        let mut entries = histogram.iter().collect::<Vec<_>>();
        if k < entries.len() {
            entries.select_nth_unstable_by(k - 1, rank_order);
            entries.truncate(k);
        }
        entries.sort_unstable_by(rank_order);

        log::trace!(
            "ranked {} of {} distinct colors",
            entries.len(),
            histogram.len()
        );

        Self { entries, total_count }
    }

    /// Returns the `(color, count)` pairs in rank order.
    #[must_use]
    pub fn entries(&self) -> &[(ColorKey, u32)] {
        &self.entries
    }

    /// Returns the number of colors in the palette.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether or not the palette has no colors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the most frequent color, if there is one.
    #[must_use]
    pub fn dominant(&self) -> Option<ColorKey> {
        self.entries.first().map(|&(key, _)| key)
    }

    /// Returns the colors in rank order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = ColorKey> + '_ {
        self.entries.iter().map(|&(key, _)| key)
    }

    /// Returns the colors as lowercase `#rrggbb` strings, in rank order.
    #[must_use]
    pub fn hex_colors(&self) -> Vec<String> {
        self.keys().map(ColorKey::to_hex).collect()
    }

    /// Returns the number of samples in the histogram this palette was ranked from.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    /// Returns the share of all samples held by the `i`-th color, in `[0, 1]`.
    #[must_use]
    pub fn coverage(&self, i: usize) -> Option<f64> {
        let &(_, count) = self.entries.get(i)?;
        Some(f64::from(count) / f64::from(self.total_count))
    }
}

impl<'a> IntoIterator for &'a RankedPalette {
    type Item = &'a (ColorKey, u32);
    type IntoIter = std::slice::Iter<'a, (ColorKey, u32)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for RankedPalette {
    type Item = (ColorKey, u32);
    type IntoIter = std::vec::IntoIter<(ColorKey, u32)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
