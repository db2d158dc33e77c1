//! CLI output formatting.
//!
//! # Output Format
//!
//! Verbose runs print the effective options, one line per file before it is
//! converted, and a count once the whole tree is done:
//!
//! ```text
//! Options:
//!   input: jpeg
//!   output: png
//!   root: photos
//!   quality: 75
//!   dir: converted
//!   verbose: true
//! converting photos/bear.jpeg → converted/bear.png
//! converting photos/zoo/bear.jpeg → converted/bear (2).png
//! converted 2 files
//! ```
//!
//! Errors are a single line on the error sink:
//!
//! ```text
//! error: photos/notes.txt is not a valid file
//! ```
//!
//! # Architecture
//!
//! `format_*` functions return lines and do no I/O, so they are tested
//! directly. [`write_lines`] puts them on whatever sink the caller owns.

use crate::batch::BatchEvent;
use crate::config::{Options, STDIN_ROOT, Source};
use std::fmt::Display;
use std::io::{self, Write};

/// The options block printed at the start of a verbose run.
pub fn format_options(options: &Options) -> Vec<String> {
    let root = match &options.source {
        Source::Stdin => STDIN_ROOT.to_string(),
        Source::Tree(path) => path.display().to_string(),
    };
    let dir = options
        .output_dir
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_default();
    vec![
        "Options:".to_string(),
        format!("  input: {}", options.input_format),
        format!("  output: {}", options.output_format),
        format!("  root: {root}"),
        format!("  quality: {}", options.quality),
        format!("  dir: {dir}"),
        format!("  verbose: {}", options.verbose),
    ]
}

pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Converting {
            source,
            destination,
        } => vec![format!(
            "converting {} → {}",
            source.display(),
            destination.display()
        )],
        BatchEvent::Finished { converted } => {
            let noun = if *converted == 1 { "file" } else { "files" };
            vec![format!("converted {converted} {noun}")]
        }
    }
}

/// The one line a terminal error is reported with.
pub fn format_error(err: &dyn Display) -> String {
    format!("error: {err}")
}

pub fn write_lines<W: Write + ?Sized>(sink: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(sink, "{line}")?;
    }
    Ok(())
}
