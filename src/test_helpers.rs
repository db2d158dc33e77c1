//! Shared test utilities for the imgconv test suite.
//!
//! Builds small synthetic images in every supported format so tests never
//! depend on fixture files checked into the repository.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_sample(&tmp.path().join("bear.jpeg"), Format::Jpeg, 64, 48);
//! write_text(&tmp.path().join("notes.txt"), "not an image");
//! ```

use crate::codec::{Encoder, Format};
use image::{DynamicImage, RgbImage};
use std::path::Path;

// =========================================================================
// Synthetic images
// =========================================================================

/// A deterministic RGB gradient.
pub fn sample_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 11 % 256) as u8, 128])
    }))
}

/// [`sample_image`] encoded as `format`.
pub fn encode_sample(format: Format, width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    Encoder::new(format, 90)
        .unwrap()
        .encode(&mut bytes, &sample_image(width, height))
        .unwrap();
    bytes
}

// =========================================================================
// Filesystem fixtures
// =========================================================================

/// Write [`sample_image`] encoded as `format` to `path`, creating parents.
pub fn write_sample(path: &Path, format: Format, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, encode_sample(format, width, height)).unwrap();
}

/// Write a plain text file to `path`, creating parents.
pub fn write_text(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// Sorted file names directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
