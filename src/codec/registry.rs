use super::encoder::Encoder;
use super::format::Format;
use super::CodecError;
use image::{DynamicImage, ImageReader};
use log::{debug, trace};
use std::collections::BTreeSet;
use std::io::{BufRead, Seek};

/// A decoded image together with the format its header announced.
#[derive(Debug)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: Format,
}

/// Table of the formats a run may decode and encode.
///
/// Built once at startup and handed to the conversion engine by reference.
/// The `image` crate compiles its decoders in statically; this table is what
/// decides which of them a run is allowed to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecRegistry {
    formats: BTreeSet<Format>,
}

impl CodecRegistry {
    pub fn new(formats: impl IntoIterator<Item = Format>) -> Self {
        Self {
            formats: formats.into_iter().collect(),
        }
    }

    pub fn supports(&self, format: Format) -> bool {
        self.formats.contains(&format)
    }

    pub fn formats(&self) -> impl Iterator<Item = Format> + '_ {
        self.formats.iter().copied()
    }

    /// Look up an encoder by format name.
    ///
    /// Names are case-sensitive. Unknown names, and known formats missing
    /// from this table, fail with [`CodecError::UnsupportedFormat`]. JPEG
    /// quality outside 1-100 fails with [`CodecError::InvalidQuality`].
    pub fn new_encoder(&self, name: &str, quality: i64) -> Result<Encoder, CodecError> {
        let format: Format = name.parse()?;
        if !self.supports(format) {
            return Err(CodecError::UnsupportedFormat(name.to_string()));
        }
        Encoder::new(format, quality)
    }

    /// Sniff, decode and check that the content really is `expected`.
    ///
    /// Every failure, whether the bytes are unreadable, the header names a
    /// different format, or the format is not in this table, is reported as
    /// the same [`CodecError::InvalidFormat`].
    pub fn decode_and_validate<R: BufRead + Seek>(
        &self,
        reader: R,
        expected: Format,
    ) -> Result<DecodedImage, CodecError> {
        let reader = ImageReader::new(reader)
            .with_guessed_format()
            .map_err(|_| CodecError::InvalidFormat)?;

        let detected = reader
            .format()
            .and_then(Format::from_image_format)
            .filter(|f| self.supports(*f))
            .ok_or(CodecError::InvalidFormat)?;
        if detected != expected {
            debug!("expected {expected}, content is {detected}");
            return Err(CodecError::InvalidFormat);
        }

        let image = reader.decode().map_err(|e| {
            debug!("{detected} decode failed: {e}");
            CodecError::InvalidFormat
        })?;
        trace!("decoded {detected} {}x{}", image.width(), image.height());

        Ok(DecodedImage {
            image,
            format: detected,
        })
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new(Format::ALL)
    }
}
