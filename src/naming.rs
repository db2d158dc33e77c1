//! Output path resolution for converted files.
//!
//! A converted file keeps its source's base name and takes the target
//! format's extension. It lands next to the source, or in the output
//! directory when one is given. An existing entry is never overwritten: the
//! first free ` (n)` suffix is chosen instead, starting at 2.
//!
//! ```text
//! image/bear.jpeg  →  image/bear.png
//! image/bear.jpeg  →  output/bear.png        (--dir output)
//! image/bear.jpeg  →  output/bear (2).png    (output/bear.png exists)
//! image/bear.jpeg  →  output/bear (3).png    (… and output/bear (2).png)
//! ```
//!
//! The probe is a linear scan, so the result only depends on the inputs and
//! on which names are already taken: the lowest unoccupied `n` always wins.
//! It is also a plain check-then-create. Another process creating the chosen
//! name between the probe and the write is not detected.

use log::trace;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NamingError {
    /// The existence check itself failed, so the path may or may not exist.
    #[error("cannot determine whether {path} exists: {source}")]
    IndeterminateState {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0} has no file name")]
    NoFileName(PathBuf),
}

/// Resolve a destination for `source` with extension `ext` (no leading dot).
///
/// - `output_dir` of `None` or empty keeps the source's directory
/// - the source extension is the part after the last dot of the file name;
///   a leading dot (`.hidden`) is part of the name, not an extension
/// - existing entries of any kind, dangling symlinks included, count as taken
pub fn resolve_output_path(
    source: &Path,
    output_dir: Option<&Path>,
    ext: &str,
) -> Result<PathBuf, NamingError> {
    let stem = source
        .file_stem()
        .ok_or_else(|| NamingError::NoFileName(source.to_path_buf()))?;
    let dir = match output_dir {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => source.parent().unwrap_or(Path::new("")),
    };

    let mut n: u64 = 1;
    loop {
        let candidate = dir.join(numbered_name(stem, n, ext));
        if !entry_exists(&candidate)? {
            return Ok(candidate);
        }
        trace!("{} is taken", candidate.display());
        n += 1;
    }
}

/// `stem.ext` for n = 1, `stem (n).ext` otherwise.
fn numbered_name(stem: &OsStr, n: u64, ext: &str) -> OsString {
    let mut name = stem.to_os_string();
    if n > 1 {
        name.push(format!(" ({n})"));
    }
    name.push(".");
    name.push(ext);
    name
}

fn entry_exists(path: &Path) -> Result<bool, NamingError> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(NamingError::IndeterminateState {
            path: path.to_path_buf(),
            source,
        }),
    }
}
