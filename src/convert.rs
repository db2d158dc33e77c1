//! Single-file conversion: open → decode and validate → create → encode.
//!
//! The destination is only created once the source has decoded cleanly, so a
//! file that turns out not to be a valid image never leaves an empty output
//! behind. Both files are closed when their handles drop, on every path out
//! of [`convert_file`].

use crate::codec::{CodecError, CodecRegistry, Encoder, Format};
use log::debug;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name used in messages for images read from standard input.
pub const STDIN_NAME: &str = "<stdin>";

#[derive(Error, Debug)]
pub enum ConvertError {
    /// `op` is the failed operation (`open`, `create`, `read`, `write`).
    #[error("{op} {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Unreadable content and a format other than the declared one are
    /// deliberately reported the same way.
    #[error("{0} is not a valid file")]
    InvalidFormat(PathBuf),
    #[error("write {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

impl ConvertError {
    fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Convert `source` (declared as `input_format`) into `destination`.
///
/// `destination` is created or truncated; resolving a free name is the
/// caller's job (see [`crate::naming`]).
pub fn convert_file(
    registry: &CodecRegistry,
    source: &Path,
    destination: &Path,
    input_format: Format,
    encoder: &Encoder,
) -> Result<(), ConvertError> {
    let input = File::open(source).map_err(|e| ConvertError::io("open", source, e))?;
    let decoded = registry
        .decode_and_validate(BufReader::new(input), input_format)
        .map_err(|_| ConvertError::InvalidFormat(source.to_path_buf()))?;
    debug!(
        "{}: {} {}x{}",
        source.display(),
        decoded.format,
        decoded.image.width(),
        decoded.image.height()
    );

    let output =
        File::create(destination).map_err(|e| ConvertError::io("create", destination, e))?;
    let mut writer = BufWriter::new(output);
    encoder
        .encode(&mut writer, &decoded.image)
        .map_err(|source| ConvertError::Encode {
            path: destination.to_path_buf(),
            source,
        })?;
    writer
        .flush()
        .map_err(|e| ConvertError::io("write", destination, e))
}

/// Convert one image read from `reader` and write the result to `writer`.
///
/// The whole input is buffered first: format sniffing needs to seek, and
/// standard input cannot.
pub fn convert_stream<R: Read, W: Write>(
    registry: &CodecRegistry,
    mut reader: R,
    writer: W,
    input_format: Format,
    encoder: &Encoder,
) -> Result<(), ConvertError> {
    let stdin = Path::new(STDIN_NAME);
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| ConvertError::io("read", stdin, e))?;

    let decoded = registry
        .decode_and_validate(Cursor::new(bytes), input_format)
        .map_err(|_| ConvertError::InvalidFormat(stdin.to_path_buf()))?;

    let stdout = Path::new("<stdout>");
    let mut writer = BufWriter::new(writer);
    encoder
        .encode(&mut writer, &decoded.image)
        .map_err(|source| ConvertError::Encode {
            path: stdout.to_path_buf(),
            source,
        })?;
    writer
        .flush()
        .map_err(|e| ConvertError::io("write", stdout, e))
}
