//! Contains the code for counting color frequencies in a [`Bitmap`].

use crate::{Bitmap, ColorKey, SamplingOptions};
use bitvec::vec::BitVec;
#[cfg(feature = "threads")]
use rayon::prelude::*;
use std::ops::Range;

/// A byte-sized Radix
const RADIX: usize = u8::MAX as usize + 1;

/// Below this many samples in a red bucket, only the touched green/blue cells are visited.
const SPARSE_LIMIT: usize = RADIX * RADIX / 4;

/// Returns the range associated with the `i`-th chunk.
#[inline]
fn chunk_range(chunks: &[u32], i: usize) -> Range<usize> {
    (chunks[i] as usize)..(chunks[i + 1] as usize)
}

/// Count the red component of each sample.
fn red_counts(samples: &[[u8; 3]]) -> [u32; RADIX + 1] {
    let mut counts = [0; RADIX + 1];
    for &[r, ..] in samples {
        counts[usize::from(r)] += 1;
    }
    counts
}

/// Computes the prefix sum of the array in place.
#[inline]
fn prefix_sum<const M: usize>(counts: &mut [u32; M]) {
    for i in 1..M {
        counts[i] += counts[i - 1];
    }
}

/// Groups the green and blue components of `samples` by red component.
///
/// Returns the start offset of each red bucket (with the total at index [`RADIX`])
/// and the reordered green/blue pairs.
fn partition_by_red(
    samples: &[[u8; 3]],
    mut red_prefix: [u32; RADIX + 1],
) -> ([u32; RADIX + 1], Vec<[u8; 2]>) {
    prefix_sum(&mut red_prefix);

    let mut green_blue = vec![[0; 2]; samples.len()];
    for &[r, g, b] in samples {
        let r = usize::from(r);
        let j = red_prefix[r] - 1;
        green_blue[j as usize] = [g, b];
        red_prefix[r] = j;
    }

    #[allow(clippy::cast_possible_truncation)]
    {
        red_prefix[RADIX] = samples.len() as u32;
    }

    (red_prefix, green_blue)
}

/// Parallel version of [`partition_by_red`], scattering each chunk of `chunk_size` samples on its own task.
///
/// Every chunk owns a disjoint region of each red bucket, so the green/blue pairs of a bucket
/// may be ordered differently than [`partition_by_red`] orders them.
#[cfg(feature = "threads")]
fn partition_by_red_par(
    samples: &[[u8; 3]],
    chunk_size: usize,
) -> ([u32; RADIX + 1], Vec<[u8; 2]>) {
    let chunk_counts = samples
        .par_chunks(chunk_size)
        .map(red_counts)
        .collect::<Vec<_>>();

    let mut red_prefix = [0; RADIX + 1];
    for r in 0..RADIX {
        let bucket_len: u32 = chunk_counts.iter().map(|counts| counts[r]).sum();
        red_prefix[r + 1] = red_prefix[r] + bucket_len;
    }

    let mut green_blue = vec![[0; 2]; samples.len()];
    {
        // regions[chunk][red]
        let mut regions = chunk_counts
            .iter()
            .map(|_| Vec::with_capacity(RADIX))
            .collect::<Vec<Vec<&mut [[u8; 2]]>>>();

        let mut rest = green_blue.as_mut_slice();
        for r in 0..RADIX {
            for (chunk_regions, counts) in regions.iter_mut().zip(&chunk_counts) {
                let (region, tail) = std::mem::take(&mut rest).split_at_mut(counts[r] as usize);
                chunk_regions.push(region);
                rest = tail;
            }
        }

        samples
            .par_chunks(chunk_size)
            .zip(regions)
            .for_each(|(chunk, mut regions)| {
                let mut next = [0; RADIX];
                for &[r, g, b] in chunk {
                    let r = usize::from(r);
                    regions[r][next[r]] = [g, b];
                    next[r] += 1;
                }
            });
    }

    (red_prefix, green_blue)
}

/// Reusable scratch space for counting the green/blue pairs of one red bucket.
struct GreenBlueCounter {
    /// Counts indexed by `g * RADIX + b`. All zero between calls to `count`.
    counts: Vec<u32>,
    /// Marks the touched cells of `counts` on the sparse path. All false between calls.
    touched: BitVec,
}

impl GreenBlueCounter {
    /// Creates a counter with zeroed counts and no touched cells.
    fn new() -> Self {
        Self {
            counts: vec![0; RADIX * RADIX],
            touched: BitVec::repeat(false, RADIX * RADIX),
        }
    }

    /// Appends the distinct colors of one red bucket, in ascending order, with their counts.
    fn count(
        &mut self,
        red: u8,
        green_blue: &[[u8; 2]],
        keys: &mut Vec<ColorKey>,
        counts: &mut Vec<u32>,
    ) {
        #[allow(clippy::cast_possible_truncation)]
        let key = |i: usize| ColorKey::new(red, (i / RADIX) as u8, (i % RADIX) as u8);

        if green_blue.len() < SPARSE_LIMIT {
            for &[g, b] in green_blue {
                let i = usize::from(g) * RADIX + usize::from(b);
                self.counts[i] += 1;
                self.touched.set(i, true);
            }

            for i in self.touched.iter_ones() {
                keys.push(key(i));
                counts.push(self.counts[i]);
                self.counts[i] = 0;
            }

            self.touched.fill(false);
        } else {
            log::trace!("dense count of {} samples with red {red}", green_blue.len());
            for &[g, b] in green_blue {
                self.counts[usize::from(g) * RADIX + usize::from(b)] += 1;
            }

            for (i, count) in self.counts.iter_mut().enumerate() {
                if *count > 0 {
                    keys.push(key(i));
                    counts.push(*count);
                    *count = 0;
                }
            }
        }
    }
}

/// The frequency of each distinct [`ColorKey`] among the sampled pixels of a [`Bitmap`].
///
/// Keys are unique and stored in ascending order, so two histograms built from
/// the same samples compare equal no matter the order the pixels appeared in.
/// The sum of [`Histogram::counts`] is always [`Histogram::total_count`].
///
/// # Examples
/// ```
/// # use colortally::{Bitmap, ColorKey, Histogram, SamplingOptions};
/// # use palette::Srgba;
/// # fn main() -> Result<(), colortally::Error> {
/// let red = Srgba::new(255, 0, 0, 255);
/// let bitmap = Bitmap::new(3, 1, vec![red, red, Srgba::new(0, 0, 255, 255)])?;
///
/// let histogram = Histogram::new(&bitmap, &SamplingOptions::new());
/// assert_eq!(histogram.count_of(ColorKey::new(255, 0, 0)), 2);
/// assert_eq!(histogram.total_count(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    /// The distinct colors, ascending.
    keys: Vec<ColorKey>,
    /// The number of samples of each color in `keys`. Each count is nonzero.
    counts: Vec<u32>,
    /// The number of samples counted.
    total_count: u32,
}

impl Histogram {
    /// Returns the slice of distinct colors, in ascending order.
    #[must_use]
    pub fn keys(&self) -> &[ColorKey] {
        &self.keys
    }

    /// Returns the number of samples of each color in [`Histogram::keys`].
    #[must_use]
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Returns the number of samples counted.
    ///
    /// This is equal to the sum of [`Histogram::counts`].
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    /// Returns the number of distinct colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether or not no samples were counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the count of `key`, which is `0` if it was never seen.
    #[must_use]
    pub fn count_of(&self, key: ColorKey) -> u32 {
        self.keys
            .binary_search(&key)
            .map_or(0, |i| self.counts[i])
    }

    /// Iterates over `(key, count)` pairs in ascending key order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (ColorKey, u32)> + '_ {
        self.keys.iter().copied().zip(self.counts.iter().copied())
    }

    /// Builds the histogram of `bitmap` under the given sampling options.
    #[must_use]
    pub fn new(bitmap: &Bitmap, options: &SamplingOptions) -> Self {
        let samples = bitmap
            .pixels()
            .iter()
            .step_by(options.get_stride().get() as usize)
            .filter_map(|&pixel| options.sample(pixel))
            .collect::<Vec<_>>();

        let histogram = Self::from_samples(&samples);
        log::debug!(
            "histogram of {}x{} bitmap: {} samples, {} distinct colors",
            bitmap.width(),
            bitmap.height(),
            histogram.total_count,
            histogram.len(),
        );
        histogram
    }

    /// Counts already sampled (and quantized) colors.
    fn from_samples(samples: &[[u8; 3]]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let (red_prefix, green_blue) = partition_by_red(samples, red_counts(samples));

        let mut keys = Vec::new();
        let mut counts = Vec::new();
        let mut counter = GreenBlueCounter::new();

        for r in 0..RADIX {
            let chunk = chunk_range(&red_prefix, r);
            if !chunk.is_empty() {
                #[allow(clippy::cast_possible_truncation)]
                counter.count(r as u8, &green_blue[chunk], &mut keys, &mut counts);
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let total_count = samples.len() as u32;

        Self { keys, counts, total_count }
    }
}

#[cfg(feature = "threads")]
impl Histogram {
    /// Builds the histogram of `bitmap` in parallel.
    ///
    /// The result is identical to [`Histogram::new`].
    #[must_use]
    pub fn new_par(bitmap: &Bitmap, options: &SamplingOptions) -> Self {
        let samples = bitmap
            .pixels()
            .par_iter()
            .step_by(options.get_stride().get() as usize)
            .filter_map(|&pixel| options.sample(pixel))
            .collect::<Vec<_>>();

        let histogram = Self::from_samples_par(&samples);
        log::debug!(
            "histogram of {}x{} bitmap (parallel): {} samples, {} distinct colors",
            bitmap.width(),
            bitmap.height(),
            histogram.total_count,
            histogram.len(),
        );
        histogram
    }

    /// Counts already sampled colors, one red bucket per task.
    fn from_samples_par(samples: &[[u8; 3]]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let chunk_size = samples.len().div_ceil(rayon::current_num_threads()).max(RADIX);
        let (red_prefix, green_blue) = partition_by_red_par(samples, chunk_size);

        let buckets = (0..RADIX)
            .into_par_iter()
            .filter(|&r| !chunk_range(&red_prefix, r).is_empty())
            .map_init(GreenBlueCounter::new, |counter, r| {
                let mut keys = Vec::new();
                let mut counts = Vec::new();
                #[allow(clippy::cast_possible_truncation)]
                counter.count(
                    r as u8,
                    &green_blue[chunk_range(&red_prefix, r)],
                    &mut keys,
                    &mut counts,
                );
                (keys, counts)
            })
            .collect::<Vec<_>>();

        let len = buckets.iter().map(|(keys, _)| keys.len()).sum();
        let mut keys = Vec::with_capacity(len);
        let mut counts = Vec::with_capacity(len);
        for (k, c) in buckets {
            keys.extend(k);
            counts.extend(c);
        }

        #[allow(clippy::cast_possible_truncation)]
        let total_count = samples.len() as u32;

        Self { keys, counts, total_count }
    }
}

impl<'a> IntoIterator for &'a Histogram {
    type Item = (ColorKey, u32);
    type IntoIter = std::iter::Zip<
        std::iter::Copied<std::slice::Iter<'a, ColorKey>>,
        std::iter::Copied<std::slice::Iter<'a, u32>>,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter().copied().zip(self.counts.iter().copied())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{tests::*, QuantizeStep, Rounding, Stride};
    use palette::Srgba;
    use rand::{seq::SliceRandom, SeedableRng};
    use rand_xoshiro::Xoroshiro128PlusPlus;

    /// Checks the count and ordering invariants of a histogram.
    fn assert_valid(histogram: &Histogram, expected_total: u32) {
        assert_eq!(histogram.total_count(), expected_total);
        assert_eq!(histogram.counts().iter().sum::<u32>(), expected_total);
        assert_eq!(histogram.keys().len(), histogram.counts().len());
        assert!(histogram.counts().iter().all(|&c| c > 0));

        let keys = histogram.keys();
        for i in 1..keys.len() {
            assert!(keys[i - 1] < keys[i]);
        }
    }

    /// Random colors squeezed into red `0` and `1`, so both red buckets exceed [`SPARSE_LIMIT`].
    fn dense_test_data() -> Vec<[u8; 3]> {
        let colors = test_data_1024()
            .into_iter()
            .map(|[r, g, b]| [r % 2, g, b])
            .collect::<Vec<_>>();
        let colors = [colors.as_slice(); 40].concat();

        let red_zero = colors.iter().filter(|[r, ..]| *r == 0).count();
        assert!(red_zero > SPARSE_LIMIT && colors.len() - red_zero > SPARSE_LIMIT);
        colors
    }

    /// Parses a `#rrggbb` test color.
    fn key(hex: &str) -> ColorKey {
        hex.parse().unwrap()
    }

    /// Builds the histogram sequentially and, when available, checks the parallel build agrees.
    fn build(bitmap: &Bitmap, options: &SamplingOptions) -> Histogram {
        let histogram = Histogram::new(bitmap, options);
        #[cfg(feature = "threads")]
        assert_eq!(histogram, Histogram::new_par(bitmap, options));
        histogram
    }

    #[test]
    fn empty_input() {
        let histogram = build(&Bitmap::default(), &SamplingOptions::new());
        assert!(
            histogram.is_empty() && histogram.keys().is_empty() && histogram.counts().is_empty()
        );
        assert_eq!(histogram.total_count(), 0);

        let zero_width = Bitmap::new(0, 5, Vec::new()).unwrap();
        assert!(build(&zero_width, &SamplingOptions::coarse()).is_empty());
    }

    #[test]
    fn two_by_two_scenario() {
        let bitmap = bitmap_from_rgb(
            2,
            2,
            &[[255, 0, 0], [255, 0, 0], [0, 255, 0], [0, 0, 255]],
        );
        let histogram = build(&bitmap, &SamplingOptions::new());
        assert_valid(&histogram, 4);

        let entries = histogram
            .iter()
            .map(|(key, count)| (key.to_string(), count))
            .collect::<Vec<_>>();
        assert_eq!(
            entries,
            vec![
                ("#0000ff".to_owned(), 1),
                ("#00ff00".to_owned(), 1),
                ("#ff0000".to_owned(), 2),
            ]
        );
    }

    #[test]
    fn counts_are_conserved_for_any_stride() {
        let colors = test_data_1024();
        let bitmap = bitmap_from_rgb(32, 32, &colors);
        for stride in [1, 2, 3, 4, 7, 16, 1023, 1024, 5000] {
            let stride = Stride::new(stride).unwrap();
            let options = SamplingOptions::new().stride(stride);
            let histogram = build(&bitmap, &options);
            #[allow(clippy::cast_possible_truncation)]
            let expected = stride.num_samples(colors.len()) as u32;
            assert_valid(&histogram, expected);
        }
    }

    #[test]
    fn stride_samples_flat_indices() {
        // Stride 4 over a 3-wide bitmap visits indices 0, 4, 8: one per row, shifting column.
        #[rustfmt::skip]
        let colors = [
            [1, 0, 0], [2, 0, 0], [3, 0, 0],
            [4, 0, 0], [5, 0, 0], [6, 0, 0],
            [7, 0, 0], [8, 0, 0], [9, 0, 0],
        ];
        let bitmap = bitmap_from_rgb(3, 3, &colors);
        let histogram = build(&bitmap, &SamplingOptions::new().stride(Stride::EVERY_FOURTH));
        assert_eq!(
            histogram.keys(),
            &[ColorKey::new(1, 0, 0), ColorKey::new(5, 0, 0), ColorKey::new(9, 0, 0)]
        );
    }

    #[test]
    fn repeated_builds_are_identical() {
        let bitmap = bitmap_from_rgb(32, 32, &test_data_1024());
        let options = SamplingOptions::new();
        assert_eq!(build(&bitmap, &options), build(&bitmap, &options));
    }

    fn add_duplicate_color_with_data(colors: Vec<[u8; 3]>) {
        let colors = {
            let mut colors = colors;
            let len = colors.len();
            colors[len - 1] = colors[0];
            colors
        };

        let duplicate = ColorKey::from(colors[0]);
        let without_duplicate = row_bitmap(&colors[..(colors.len() - 1)]);
        let with_duplicate = row_bitmap(&colors);

        let expected = {
            let mut histogram = build(&without_duplicate, &SamplingOptions::new());
            let i = histogram.keys().binary_search(&duplicate).unwrap();
            histogram.counts[i] += 1;
            histogram.total_count += 1;
            histogram
        };
        let actual = build(&with_duplicate, &SamplingOptions::new());
        #[allow(clippy::cast_possible_truncation)]
        assert_valid(&actual, colors.len() as u32);
        assert_eq!(actual, expected);
    }

    #[test]
    fn add_duplicate_color() {
        add_duplicate_color_with_data(test_data_1024());
        add_duplicate_color_with_data(dense_test_data());
    }

    fn reordered_input_with_data(colors: &[[u8; 3]]) {
        let reordered = {
            let mut reordered = colors.to_vec();
            let mut rng = Xoroshiro128PlusPlus::seed_from_u64(0);
            reordered.shuffle(&mut rng);
            row_bitmap(&reordered)
        };

        let expected = build(&row_bitmap(colors), &SamplingOptions::new());
        let actual = build(&reordered, &SamplingOptions::new());
        #[allow(clippy::cast_possible_truncation)]
        assert_valid(&actual, colors.len() as u32);
        assert_eq!(actual, expected);
    }

    #[test]
    fn reordered_input() {
        reordered_input_with_data(&test_data_1024());
        reordered_input_with_data(&dense_test_data());
    }

    #[test]
    fn dense_and_sparse_buckets_agree() {
        // One red bucket above the sparse limit, one below.
        let mut colors = Vec::new();
        for i in 0..(SPARSE_LIMIT + 10) {
            #[allow(clippy::cast_possible_truncation)]
            colors.push([7, (i % 13) as u8, (i % 251) as u8]);
        }
        colors.extend([[8, 0, 0], [8, 0, 0], [8, 1, 0]]);

        let histogram = build(&row_bitmap(&colors), &SamplingOptions::new());
        #[allow(clippy::cast_possible_truncation)]
        assert_valid(&histogram, colors.len() as u32);
        assert_eq!(histogram.count_of(ColorKey::new(8, 0, 0)), 2);
        assert_eq!(histogram.count_of(ColorKey::new(8, 1, 0)), 1);

        let sevens: u32 = histogram
            .iter()
            .filter(|(key, _)| key.channels()[0] == 7)
            .map(|(_, count)| count)
            .sum();
        #[allow(clippy::cast_possible_truncation)]
        let expected = (SPARSE_LIMIT + 10) as u32;
        assert_eq!(sevens, expected);
    }

    #[test]
    fn quantization_collapses_near_duplicates() {
        let bitmap = row_bitmap(&[[250, 10, 10], [255, 0, 0]]);

        let exact = build(&bitmap, &SamplingOptions::new());
        assert_eq!(exact.len(), 2);

        let step = Some(QuantizeStep::DEFAULT);

        // Rounding to the nearest multiple keeps 10 and 0 apart on green and blue.
        let nearest = build(&bitmap, &SamplingOptions::new().quantize(step));
        assert_eq!(nearest.keys(), &[key("#ff0000"), key("#ff1010")]);

        let floor = SamplingOptions::new().quantize(step).rounding(Rounding::Floor);
        let floor = build(&bitmap, &floor);
        assert_eq!(floor.len(), 1);
        assert_eq!(floor.count_of(key("#f00000")), 2);

        let close = row_bitmap(&[[250, 10, 10], [255, 12, 9]]);
        let nearest = build(&close, &SamplingOptions::new().quantize(step));
        assert_eq!(nearest.iter().collect::<Vec<_>>(), vec![(key("#ff1010"), 2)]);
    }

    #[test]
    fn alpha_threshold_skips_transparent_pixels() {
        let pixels = vec![
            Srgba::new(0, 0, 0, 0),
            Srgba::new(0, 0, 0, 0),
            Srgba::new(0, 0, 0, 0),
            Srgba::new(200, 100, 50, 255),
        ];
        let bitmap = Bitmap::new(2, 2, pixels).unwrap();

        let all = build(&bitmap, &SamplingOptions::new());
        assert_eq!(all.count_of(ColorKey::new(0, 0, 0)), 3);
        assert_valid(&all, 4);

        let opaque = build(&bitmap, &SamplingOptions::new().min_alpha(1));
        assert_eq!(opaque.keys(), &[ColorKey::new(200, 100, 50)]);
        assert_valid(&opaque, 1);
    }

    #[cfg(feature = "threads")]
    #[test]
    fn parallel_partition_matches_sequential_buckets() {
        let samples = [test_data_1024().as_slice(); 3].concat();
        let (expected_prefix, expected) = partition_by_red(&samples, red_counts(&samples));

        for chunk_size in [1, 7, RADIX, 1000, samples.len(), samples.len() * 2] {
            let (prefix, green_blue) = partition_by_red_par(&samples, chunk_size);
            assert_eq!(prefix, expected_prefix);
            for r in 0..RADIX {
                let range = chunk_range(&prefix, r);
                let mut actual = green_blue[range.clone()].to_vec();
                let mut expected = expected[range].to_vec();
                actual.sort_unstable();
                expected.sort_unstable();
                assert_eq!(actual, expected, "red {r}, chunk size {chunk_size}");
            }
        }
    }
}
