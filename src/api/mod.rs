//! Contains the high level pipeline builder and the extractor front end.

mod extractor;
mod palette_pipeline;

pub use extractor::{extract_palette, Extractor, Mode};
pub use palette_pipeline::PalettePipeline;
