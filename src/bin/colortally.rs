#![deny(unsafe_code)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use colortally::{
    copy_color, ClipboardWriter, ColorKey, Extractor, Mode, Osc52Clipboard, PaletteSize,
    QuantizeStep, RankedPalette, Rounding, SamplingOptions, Stride,
};
use rayon::prelude::*;
use serde_json::json;

/// Find the dominant color or the most frequent colors of images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Options {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Report only the single most frequent exact color
    #[arg(long)]
    dominant: bool,

    /// Number of colors to report (defaults to 1 with --dominant, otherwise 12)
    #[arg(short = 'k', long)]
    palette_size: Option<u16>,

    /// Sample every n-th pixel (defaults to 1 with --dominant or --raw, otherwise 4)
    #[arg(long, value_parser = parse_stride)]
    stride: Option<Stride>,

    /// Round channels to multiples of this step (defaults to 16 in palette mode)
    #[arg(long, value_parser = parse_quantize_step, conflicts_with = "raw")]
    quantize: Option<QuantizeStep>,

    /// Round channels down instead of to the nearest multiple
    #[arg(long)]
    floor: bool,

    /// Count every pixel at full precision
    #[arg(long)]
    raw: bool,

    /// Skip pixels with an alpha below this value
    #[arg(long, default_value_t = 0)]
    min_alpha: u8,

    /// Number of threads to use (0 picks one per core)
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Copy the color at this rank (0 is the most frequent) to the terminal clipboard
    #[arg(long)]
    copy: Option<usize>,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Parses a nonzero `--stride`.
fn parse_stride(s: &str) -> Result<Stride, String> {
    let value = s.parse::<u32>().map_err(|e| e.to_string())?;
    Stride::try_from(value).map_err(|e| e.to_string())
}

/// Parses a nonzero `--quantize` step.
fn parse_quantize_step(s: &str) -> Result<QuantizeStep, String> {
    let value = s.parse::<u8>().map_err(|e| e.to_string())?;
    QuantizeStep::try_from(value).map_err(|e| e.to_string())
}

impl Options {
    /// The mode selected by `--dominant`.
    fn mode(&self) -> Mode {
        if self.dominant {
            Mode::Dominant
        } else {
            Mode::Palette
        }
    }

    /// The mode's sampling options with `--raw`, `--stride`, `--quantize`, `--floor`,
    /// and `--min-alpha` applied on top.
    fn sampling(&self) -> SamplingOptions {
        let mut sampling = if self.raw {
            SamplingOptions::new()
        } else {
            self.mode().sampling()
        };

        if let Some(stride) = self.stride {
            sampling = sampling.stride(stride);
        }
        if self.quantize.is_some() {
            sampling = sampling.quantize(self.quantize);
        }
        if self.floor {
            sampling = sampling.rounding(Rounding::Floor);
        }
        sampling.min_alpha(self.min_alpha)
    }

    /// `-k` if given, otherwise the mode's palette size.
    fn palette_size(&self) -> PaletteSize {
        self.palette_size
            .map_or_else(|| self.mode().palette_size(), PaletteSize::from)
    }
}

/// Writes one `#rrggbb  count  share%` line per color.
fn write_text(out: &mut impl Write, path: &str, palette: &RankedPalette) -> io::Result<()> {
    writeln!(out, "{path}")?;
    if palette.is_empty() {
        writeln!(out, "  (no colors)")?;
    }
    for (i, (key, count)) in palette.entries().iter().enumerate() {
        let share = palette.coverage(i).unwrap_or_default() * 100.0;
        writeln!(out, "  {key}  {count:>10}  {share:6.2}%")?;
    }
    Ok(())
}

/// The JSON document for one input.
fn to_json(path: &str, palette: &RankedPalette) -> serde_json::Value {
    let colors = palette
        .entries()
        .iter()
        .enumerate()
        .map(|(i, (key, count))| {
            json!({
                "hex": key.to_hex(),
                "count": count,
                "share": palette.coverage(i).unwrap_or_default(),
            })
        })
        .collect::<Vec<_>>();

    json!({
        "path": path,
        "samples": palette.total_count(),
        "colors": colors,
    })
}

/// Writes the reports to `out`, then copies the color at `--copy` through `clipboard`.
///
/// The clipboard gets its own sink so escape sequences never end up in the report.
/// Returns the copied color, if any.
fn emit(
    options: &Options,
    reports: &[(String, RankedPalette)],
    out: &mut impl Write,
    clipboard: &mut impl ClipboardWriter,
) -> Result<Option<ColorKey>> {
    if options.json {
        let documents = reports
            .iter()
            .map(|(path, palette)| to_json(path, palette))
            .collect::<Vec<_>>();
        serde_json::to_writer_pretty(&mut *out, &documents)?;
        writeln!(out)?;
    } else {
        for (path, palette) in reports {
            write_text(out, path, palette)?;
        }
    }
    out.flush()?;

    let Some(rank) = options.copy else {
        return Ok(None);
    };

    let copied = reports
        .iter()
        .find_map(|(_, palette)| palette.entries().get(rank).map(|&(key, _)| key));
    match copied {
        Some(key) => {
            copy_color(key, clipboard)?;
        }
        None => log::warn!("no color at rank {rank} to copy"),
    }
    Ok(copied)
}

fn main() -> Result<()> {
    let options = Options::parse();

    let default_filter = if options.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build_global()
        .context("failed to configure the thread pool")?;

    let sampling = options.sampling();
    log::debug!(
        "stride {}, quantize {}, min alpha {}",
        sampling.get_stride(),
        sampling
            .get_quantize()
            .map_or_else(|| "off".to_owned(), |step| step.to_string()),
        sampling.get_min_alpha(),
    );

    let extractor = Extractor::with_image_decoder(options.mode())
        .palette_size(options.palette_size())
        .sampling(sampling)
        .parallel(options.inputs.len() == 1);

    let results = options
        .inputs
        .par_iter()
        .map(|input| {
            let bytes =
                fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
            extractor
                .extract(&bytes)
                .with_context(|| format!("failed to extract colors from {}", input.display()))
        })
        .collect::<Vec<_>>();

    let mut failed = 0;
    let mut reports = Vec::with_capacity(results.len());
    for (input, result) in options.inputs.iter().zip(results) {
        match result {
            Ok(palette) => reports.push((input.display().to_string(), palette)),
            Err(e) => {
                failed += 1;
                log::error!("{e:#}");
            }
        }
    }

    // stdout may be redirected, so the clipboard sequence goes to the terminal on stderr
    let mut clipboard = Osc52Clipboard::new(io::stderr());
    if let Some(key) = emit(&options, &reports, &mut io::stdout().lock(), &mut clipboard)? {
        log::info!("copied {key}");
    }

    if failed > 0 {
        bail!("{failed} of {} inputs failed", options.inputs.len());
    }

    Ok(())
}
