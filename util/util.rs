#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use colortally::Bitmap;
use palette::Srgba;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;

pub const SIZES: [(u32, u32); 4] = [(480, 270), (960, 540), (1920, 1080), (3840, 2160)];

pub const IMG_DIR: &str = "img";

/// Every pixel an independent random color, which drives the dense counting path.
pub fn noise(width: u32, height: u32) -> Bitmap {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(42);
    let pixels = (0..width * height)
        .map(|_| {
            let [r, g, b] = rng.gen::<[u8; 3]>();
            Srgba::new(r, g, b, 255)
        })
        .collect();

    Bitmap::new(width, height, pixels).unwrap()
}

/// A handful of flat colors with light noise, which mostly stays on the sparse path.
pub fn posterized(width: u32, height: u32) -> Bitmap {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(7);
    let swatches = (0..24).map(|_| rng.gen::<[u8; 3]>()).collect::<Vec<_>>();
    let pixels = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            let [r, g, b] = swatches[((x / 64 + y / 48) as usize) % swatches.len()];
            let jitter = rng.gen_range(0..4);
            Srgba::new(r.saturating_add(jitter), g, b, 255)
        })
        .collect();

    Bitmap::new(width, height, pixels).unwrap()
}

/// A smooth two axis gradient.
pub fn gradient(width: u32, height: u32) -> Bitmap {
    let pixels = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            Srgba::new(r, g, r ^ g, 255)
        })
        .collect();

    Bitmap::new(width, height, pixels).unwrap()
}

pub fn synthetic_bitmaps() -> &'static [(String, Bitmap)] {
    static SYNTHETIC: OnceLock<Vec<(String, Bitmap)>> = OnceLock::new();
    SYNTHETIC.get_or_init(|| {
        let generators: [(&str, fn(u32, u32) -> Bitmap); 3] =
            [("noise", noise), ("posterized", posterized), ("gradient", gradient)];

        generators
            .into_iter()
            .flat_map(|(name, generate)| {
                SIZES
                    .into_iter()
                    .map(move |(w, h)| (format!("{name}/{w}x{h}"), generate(w, h)))
            })
            .collect()
    })
}

pub fn load_images(images: &[PathBuf]) -> Vec<(String, Bitmap)> {
    images
        .iter()
        .map(|path| {
            let image = image::open(path).expect("decoded image").into_rgba8();
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            (name, Bitmap::try_from(&image).unwrap())
        })
        .collect()
}

/// Loads every image under `img/` at the crate root, if that directory exists.
pub fn image_dir_bitmaps() -> &'static [(String, Bitmap)] {
    static IMAGES: OnceLock<Vec<(String, Bitmap)>> = OnceLock::new();
    IMAGES.get_or_init(|| {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join(IMG_DIR);
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };

        let mut paths = entries
            .collect::<Result<Vec<_>, _>>()
            .expect("read each file")
            .iter()
            .map(std::fs::DirEntry::path)
            .collect::<Vec<_>>();

        paths.sort();

        load_images(&paths)
    })
}

pub fn benchmark_bitmaps() -> impl Iterator<Item = &'static (String, Bitmap)> {
    synthetic_bitmaps().iter().chain(image_dir_bitmaps())
}
