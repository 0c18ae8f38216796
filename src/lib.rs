//! A library for finding the dominant color or the most frequent colors of an image.
//!
//! `colortally` builds a frequency histogram over (optionally sampled and quantized) pixels
//! and ranks the colors by how often they occur. Results are reported as [`ColorKey`]s,
//! which format as lowercase `#rrggbb` hex strings.
//!
//! # Features
//! `colortally` has several `cargo` features that can be turned off or on:
//! - `pipelines`: exposes the [`PalettePipeline`] builder and the [`Extractor`] front end.
//! - `threads`: exposes parallel versions of the histogram builder via [`rayon`].
//! - `image`: enables decoding and conversions through the [`image`] crate.
//! - `cli`: builds the `colortally` command line tool.
//!
//! # High-Level API
//! ```no_run
//! # use colortally::{Bitmap, PalettePipeline, PaletteSize, QuantizeStep, Stride};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some image")?.into_rgba8();
//! let bitmap = Bitmap::try_from(&img)?;
//!
//! let palette = PalettePipeline::new(&bitmap)
//!     .palette_size(PaletteSize::PALETTE)
//!     .stride(Stride::EVERY_FOURTH)
//!     .quantize(Some(QuantizeStep::DEFAULT))
//!     .palette();
//!
//! for (key, count) in &palette {
//!     println!("{key} {count}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Or, working directly from encoded image bytes (needs the `image` feature):
//! ```no_run
//! # use colortally::{Extractor, Mode};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("some image")?;
//! let dominant = Extractor::with_image_decoder(Mode::Dominant).extract(&bytes)?.dominant();
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod clipboard;
mod color_key;
mod decode;
mod error;
mod histogram;
mod quantize;
mod rank;
mod types;

#[cfg(feature = "pipelines")]
mod api;

pub use clipboard::*;
pub use color_key::*;
pub use decode::*;
pub use error::Error;
pub use histogram::Histogram;
pub use quantize::*;
pub use rank::RankedPalette;
pub use types::*;

#[cfg(feature = "pipelines")]
pub use api::*;

/// The maximum supported image size in number of pixels is `u32::MAX`.
pub const MAX_PIXELS: u32 = u32::MAX;
