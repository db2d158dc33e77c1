use super::CodecError;
use super::format::Format;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType};
use std::borrow::Cow;
use std::io::Write;

/// Quality setting for lossy encoding (1-100). Rejected, not clamped, when
/// out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: i64) -> Result<Self, CodecError> {
        if (1..=100).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(CodecError::InvalidQuality(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// Encode capability for one output format.
///
/// Only JPEG carries a quality; PNG is lossless and GIF is palette-quantized
/// regardless of what the caller asked for. An `Encoder` holds no state
/// between calls, so one value serves every file of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoder {
    Png,
    Jpeg(Quality),
    Gif,
}

impl Encoder {
    /// Build an encoder for `format`.
    ///
    /// `quality` is validated for JPEG only; PNG and GIF accept any value.
    pub fn new(format: Format, quality: i64) -> Result<Self, CodecError> {
        match format {
            Format::Png => Ok(Encoder::Png),
            Format::Jpeg => Quality::new(quality).map(Encoder::Jpeg),
            Format::Gif => Ok(Encoder::Gif),
        }
    }

    pub fn format(&self) -> Format {
        match self {
            Encoder::Png => Format::Png,
            Encoder::Jpeg(_) => Format::Jpeg,
            Encoder::Gif => Format::Gif,
        }
    }

    /// Encode `image` into `writer`.
    ///
    /// The writer is not flushed; callers owning a buffered writer flush it
    /// themselves so flush failures surface as I/O errors of the destination.
    pub fn encode<W: Write>(&self, writer: &mut W, image: &DynamicImage) -> Result<(), CodecError> {
        match self {
            Encoder::Png => image.write_with_encoder(PngEncoder::new(writer))?,
            Encoder::Jpeg(quality) => {
                flatten_for_jpeg(image)
                    .write_with_encoder(JpegEncoder::new_with_quality(writer, quality.value()))?;
            }
            Encoder::Gif => {
                let rgba = image.to_rgba8();
                // The GIF trailer is written when the encoder drops, at the
                // end of this arm.
                let mut encoder = GifEncoder::new(writer);
                encoder.encode(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    ExtendedColorType::Rgba8,
                )?;
            }
        }
        Ok(())
    }
}

/// JPEG has no alpha channel and only 8-bit samples.
fn flatten_for_jpeg(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => Cow::Borrowed(image),
        DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_) => Cow::Owned(DynamicImage::ImageLuma8(image.to_luma8())),
        _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}
