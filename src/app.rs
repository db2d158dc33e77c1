//! Command-line front end.
//!
//! [`App`] owns the three streams of a run (input, output, error output), so
//! the whole tool can be driven from tests with in-memory buffers. It parses
//! flags, layers them over the config file, validates everything, and only
//! then starts converting. Every failure ends up as exactly one
//! `error: …` line on the error sink and exit status 1.

use crate::batch::{self, BatchError, BatchOptions};
use crate::codec::{CodecError, CodecRegistry};
use crate::config::{self, ConfigError, Settings, Source};
use crate::convert::{ConvertError, convert_stream};
use crate::output::{format_batch_event, format_error, format_options, write_lines};
use clap::Parser;
use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use thiserror::Error;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("output: {0}")]
    Output(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "imgconv")]
#[command(about = "Convert every image under a directory to another format")]
#[command(long_about = "\
Convert every image under a directory to another format

Every file below ROOT is decoded as the input format and re-encoded to the
output format. A file that is not a valid image of the input format stops
the run; files converted before it are kept.

Outputs keep the source's base name with the new extension. Existing files
are never overwritten; a numbered name is picked instead:

  photos/bear.jpeg  →  photos/bear.png
                    →  photos/bear (2).png   (when bear.png exists)

Use ROOT '-' to convert a single image from stdin to stdout.

Run 'imgconv --gen-config' to print a documented config file.")]
#[command(version)]
pub struct Cli {
    /// Input file format <png, jpeg, gif> [default: jpeg]
    #[arg(short, long, value_name = "FORMAT")]
    pub input: Option<String>,

    /// Output file format <png, jpeg, gif> [default: png]
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<String>,

    /// Destination directory for output files
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<String>,

    /// Output encoding quality, higher is better <1-100> [default: 75]
    #[arg(short, long, value_name = "QUALITY", allow_negative_numbers = true)]
    pub quality: Option<i64>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Read defaults from a TOML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print a stock config file with every option documented
    #[arg(long)]
    pub gen_config: bool,

    /// Directory or file to convert, or '-' for stdin
    pub root: Option<String>,
}

impl Cli {
    /// Flags given on the command line win over file and stock values.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(input) = &self.input {
            settings.input = input.clone();
        }
        if let Some(output) = &self.output {
            settings.output = output.clone();
        }
        if let Some(dir) = &self.dir {
            settings.dir = Some(dir.clone());
        }
        if let Some(quality) = self.quality {
            settings.quality = quality;
        }
        if self.verbose {
            settings.verbose = true;
        }
    }
}

/// The converter bound to its input, output and error streams.
pub struct App<R, W, E> {
    pub input: R,
    pub output: W,
    pub err_output: E,
    registry: CodecRegistry,
}

impl<R: Read, W: Write, E: Write> App<R, W, E> {
    pub fn new(input: R, output: W, err_output: E) -> Self {
        Self {
            input,
            output,
            err_output,
            registry: CodecRegistry::default(),
        }
    }

    /// Replace the default codec table.
    pub fn with_registry(mut self, registry: CodecRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Parse `args` (program name first) and run. Returns the exit status.
    pub fn run<I, T>(&mut self, args: I) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = match Cli::try_parse_from(args) {
            Ok(cli) => cli,
            Err(e) => {
                // --help and --version arrive here too, and are not failures.
                return if e.use_stderr() {
                    let _ = write!(self.err_output, "{}", e.render());
                    EXIT_FAILURE
                } else {
                    let _ = write!(self.output, "{}", e.render());
                    EXIT_OK
                };
            }
        };

        let result = self.execute(&cli).and_then(|()| Ok(self.output.flush()?));
        match result {
            Ok(()) => EXIT_OK,
            Err(e) => {
                let _ = writeln!(self.err_output, "{}", format_error(&e));
                EXIT_FAILURE
            }
        }
    }

    fn execute(&mut self, cli: &Cli) -> Result<(), AppError> {
        if cli.gen_config {
            write!(self.output, "{}", config::stock_config_toml())?;
            return Ok(());
        }

        let mut settings = config::load_settings(cli.config.as_deref())?;
        cli.apply_to(&mut settings);
        let options = settings.into_options(cli.root.as_deref())?;
        let encoder = self
            .registry
            .new_encoder(options.output_format.name(), options.quality)?;

        match &options.source {
            Source::Stdin => {
                // Verbose lines would corrupt the image on stdout.
                convert_stream(
                    &self.registry,
                    &mut self.input,
                    &mut self.output,
                    options.input_format,
                    &encoder,
                )?;
            }
            Source::Tree(root) => {
                if options.verbose {
                    write_lines(&mut self.output, &format_options(&options))?;
                }
                let batch_options = BatchOptions {
                    input_format: options.input_format,
                    encoder,
                    output_dir: options.output_dir.clone(),
                };

                let verbose = options.verbose;
                let output = &mut self.output;
                let mut sink_error = None;
                batch::run(&self.registry, root, &batch_options, |event| {
                    if verbose && sink_error.is_none() {
                        sink_error = write_lines(&mut *output, &format_batch_event(event)).err();
                    }
                })?;
                if let Some(e) = sink_error {
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }
}
