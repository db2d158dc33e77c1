//! # imgconv
//!
//! Batch image format conversion. Point it at a directory and every file
//! below it is decoded as one format (PNG, JPEG or GIF) and re-encoded as
//! another, next to the source or into a flat output directory.
//!
//! # Pipeline
//!
//! ```text
//! root/  ──walk──▶  [files]  ──for each──▶  resolve name ─▶ decode+validate ─▶ create ─▶ encode
//!                                              naming          codec            convert
//! ```
//!
//! One file is fully converted before the next is looked at. The first file
//! that fails stops the run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`codec`] | Formats, encoders, and the explicit codec table (sniff, decode, validate) |
//! | [`naming`] | Collision-free output names: `bear.png`, `bear (2).png`, … |
//! | [`convert`] | One file (or stdin) through decode → validate → encode |
//! | [`batch`] | Tree walk and stop-on-first-error batch driver |
//! | [`config`] | TOML defaults file, flag layering, validation into run options |
//! | [`output`] | Verbose and error line formatting |
//! | [`app`] | The command-line front end bound to its I/O streams |
//! | [`concat`] | The small `concat` companion tool |
//!
//! # Design Decisions
//!
//! ## Never Overwrite
//!
//! An output name that is already taken, by an earlier output, a source file
//! or anything else, is skipped in favour of the next ` (n)` suffix. Running
//! the tool twice over the same tree therefore produces a second set of
//! numbered files rather than clobbering the first.
//!
//! ## No Output Before a Good Decode
//!
//! The destination is created only after the source decoded as the declared
//! format. A bad input leaves nothing behind on disk.
//!
//! ## One Error Message for Bad Inputs
//!
//! A file that cannot be decoded and a file that decodes as the wrong format
//! both report `<path> is not a valid file`.
//!
//! ## Explicit Codec Table
//!
//! Which formats a run accepts is a [`codec::CodecRegistry`] value built at
//! startup and passed down, not process-wide registration.

pub mod app;
pub mod batch;
pub mod codec;
pub mod concat;
pub mod config;
pub mod convert;
pub mod naming;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
