//! Image codecs: decode, validate and re-encode through the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Sniff** | `image::ImageReader::with_guessed_format` |
//! | **Decode** | `image::ImageReader::decode` (png, jpeg, gif decoders) |
//! | **Encode → PNG** | `image::codecs::png::PngEncoder` |
//! | **Encode → JPEG** | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//! | **Encode → GIF** | `image::codecs::gif::GifEncoder` |
//!
//! The module is split into:
//! - **Format**: the closed set of formats the converter speaks
//! - **Encoder**: [`Encoder`] values with their quality fixed at construction
//! - **Registry**: [`CodecRegistry`], the explicit capability table built at
//!   startup and passed by reference to the conversion engine

mod encoder;
mod format;
mod registry;

pub use encoder::{Encoder, Quality};
pub use format::Format;
pub use registry::{CodecRegistry, DecodedImage};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid quality {0}: must be between 1 and 100")]
    InvalidQuality(i64),
    /// Sniffing, decoding and format mismatch all collapse into this one
    /// variant. Callers cannot tell an unreadable file from a wrong one.
    #[error("invalid format")]
    InvalidFormat,
    #[error("encode failed: {0}")]
    Encode(#[from] image::ImageError),
}
