//! The `concat` companion tool: copy files, or stdin, to stdout.
//!
//! A file that cannot be opened or read is reported on the error sink as
//! `concat: <path>: <error>` and the remaining files are still copied.

use log::debug;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Copy every file in `files` to `output` in order, or `input` when there
/// are none. Returns the exit status: 1 if any file failed.
pub fn run_concat<R, W, E>(
    files: &[PathBuf],
    input: &mut R,
    output: &mut W,
    err_output: &mut E,
) -> i32
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    E: Write + ?Sized,
{
    if files.is_empty() {
        return match io::copy(input, output).and_then(|_| output.flush()) {
            Ok(()) => 0,
            Err(e) => {
                let _ = writeln!(err_output, "concat: {e}");
                1
            }
        };
    }

    let mut status = 0;
    for path in files {
        match copy_file(path, output) {
            Ok(bytes) => debug!("{}: {bytes} bytes", path.display()),
            Err(e) => {
                let _ = writeln!(err_output, "concat: {}: {e}", path.display());
                status = 1;
            }
        }
    }
    if let Err(e) = output.flush() {
        let _ = writeln!(err_output, "concat: {e}");
        status = 1;
    }
    status
}

fn copy_file<W: Write + ?Sized>(path: &Path, output: &mut W) -> io::Result<u64> {
    let mut file = File::open(path)?;
    io::copy(&mut file, output)
}
