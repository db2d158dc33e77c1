//! Batch conversion of a directory tree.
//!
//! ## Order
//!
//! The tree is walked once, pre-order, with entries sorted by file name, and
//! every non-directory entry is collected before the first conversion. Files
//! written during the run are therefore never picked up as inputs, and a
//! traversal error (an unreadable subdirectory, a root that vanished) aborts
//! the run before anything is converted.
//!
//! ## Failure policy
//!
//! Stop on first error. Outputs already written stay on disk, nothing after
//! the failing file is attempted, and the error is returned as is. There is
//! no partial-failure mode and no retry.
//!
//! ## Progress
//!
//! [`run`] reports [`BatchEvent`]s to a callback. Rendering them is the
//! caller's business (see [`crate::output`]).

use crate::codec::{CodecRegistry, Encoder, Format};
use crate::convert::{ConvertError, convert_file};
use crate::naming::{NamingError, resolve_output_path};
use log::debug;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("{0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Naming(#[from] NamingError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// What every file of a batch is converted with.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    /// Format every discovered file must be in.
    pub input_format: Format,
    /// Target format and quality.
    pub encoder: Encoder,
    /// Flat destination directory; `None` writes next to each source.
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// Emitted before a file is opened.
    Converting {
        source: PathBuf,
        destination: PathBuf,
    },
    /// Emitted once, after every file converted successfully.
    Finished { converted: usize },
}

/// All non-directory entries under `root`, in traversal order.
///
/// A `root` that is itself a file yields just that file.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter(|entry| entry.as_ref().map_or(true, |e| !e.file_type().is_dir()))
        .map(|entry| entry.map(walkdir::DirEntry::into_path))
        .collect()
}

/// Convert every file under `root`. Returns the number of files converted.
pub fn run(
    registry: &CodecRegistry,
    root: &Path,
    options: &BatchOptions,
    mut on_event: impl FnMut(&BatchEvent),
) -> Result<usize, BatchError> {
    let files = collect_files(root)?;
    debug!("{} files under {}", files.len(), root.display());

    let ext = options.encoder.format().extension();
    let mut converted = 0;
    for source in files {
        let destination = resolve_output_path(&source, options.output_dir.as_deref(), ext)?;
        on_event(&BatchEvent::Converting {
            source: source.clone(),
            destination: destination.clone(),
        });
        convert_file(
            registry,
            &source,
            &destination,
            options.input_format,
            &options.encoder,
        )?;
        converted += 1;
    }

    on_event(&BatchEvent::Finished { converted });
    Ok(converted)
}
