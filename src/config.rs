//! Converter configuration.
//!
//! Settings are layered: stock defaults are overridden by an optional TOML
//! file (`--config`), which is in turn overridden by command-line flags. The
//! merged [`Settings`] are then checked against the filesystem and turned
//! into validated [`Options`] before any file is touched.
//!
//! ## Configuration File
//!
//! ```toml
//! # All keys are optional - defaults shown below
//!
//! input = "jpeg"      # Format every source file must be in (png, jpeg, gif)
//! output = "png"      # Format to convert to (png, jpeg, gif)
//! quality = 75        # JPEG quality, 1-100 (ignored for png and gif)
//! # dir = "converted" # Write every output into this existing directory
//! verbose = false     # Print the options, each conversion and a summary
//! ```
//!
//! Unknown keys are rejected to catch typos early. Format names and the
//! quality range are checked when the configuration is turned into
//! [`Options`] and an encoder, not while parsing, so a file and a flag with
//! the same bad value fail with the same message.

use crate::codec::Format;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Root argument that selects stdin → stdout conversion.
pub const STDIN_ROOT: &str = "-";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid argument")]
    InvalidArgument,
    #[error("{0}: no such file or directory")]
    NotFound(PathBuf),
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("invalid input format: {0}")]
    InvalidInputFormat(String),
    #[error("invalid output format: {0}")]
    InvalidOutputFormat(String),
}

/// Converter settings as read from defaults, a config file and flags.
///
/// Nothing here has been validated yet; see [`Settings::into_options`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Declared format of every source file.
    pub input: String,
    /// Target format.
    pub output: String,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: i64,
    /// Destination directory. Absent or empty writes next to each source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Print options, per-file notices and a final count.
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: Format::Jpeg.to_string(),
            output: Format::Png.to_string(),
            quality: 75,
            dir: None,
            verbose: false,
        }
    }
}

/// Where the images of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// One image on standard input, written to standard output.
    Stdin,
    /// A file or directory tree on disk.
    Tree(PathBuf),
}

/// Validated run options.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub source: Source,
    pub input_format: Format,
    pub output_format: Format,
    /// Range-checked by the encoder registry, not here.
    pub quality: i64,
    pub output_dir: Option<PathBuf>,
    pub verbose: bool,
}

impl Settings {
    /// Validate against the filesystem and produce run [`Options`].
    ///
    /// Checks run in a fixed order and the first failure wins: root given,
    /// root exists, input format, output format, output directory.
    pub fn into_options(self, root: Option<&str>) -> Result<Options, ConfigError> {
        let root = root.filter(|r| !r.is_empty()).ok_or(ConfigError::InvalidArgument)?;
        let source = if root == STDIN_ROOT {
            Source::Stdin
        } else {
            let path = PathBuf::from(root);
            stat(&path)?;
            Source::Tree(path)
        };

        let input_format: Format = self
            .input
            .parse()
            .map_err(|_| ConfigError::InvalidInputFormat(self.input.clone()))?;
        let output_format: Format = self
            .output
            .parse()
            .map_err(|_| ConfigError::InvalidOutputFormat(self.output.clone()))?;

        let output_dir = match self.dir.filter(|d| !d.is_empty()) {
            Some(dir) => {
                let dir = PathBuf::from(dir);
                if !stat(&dir)?.is_dir() {
                    return Err(ConfigError::NotADirectory(dir));
                }
                Some(dir)
            }
            None => None,
        };

        Ok(Options {
            source,
            input_format,
            output_format,
            quality: self.quality,
            output_dir,
            verbose: self.verbose,
        })
    }
}

fn stat(path: &Path) -> Result<fs::Metadata, ConfigError> {
    fs::metadata(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

// =============================================================================
// Config loading and merging
// =============================================================================

/// Returns the stock default settings as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(Settings::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. The file must exist.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto the stock defaults and deserialize.
pub fn resolve_settings(overlay: Option<toml::Value>) -> Result<Settings, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    Ok(merged.try_into()?)
}

/// Load settings from `path`, or the stock defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_settings(overlay)
}

/// Returns a fully-commented stock config file.
///
/// Used by the `--gen-config` flag.
pub fn stock_config_toml() -> &'static str {
    r##"# imgconv configuration
# =====================
# Pass this file with `imgconv --config <file> <root>`.
# Every key is optional; the values below are the defaults.
# Command-line flags override values from this file.

# Format every source file must be in: "png", "jpeg" or "gif".
# A file whose content is in any other format stops the run.
input = "jpeg"

# Format to convert to: "png", "jpeg" or "gif".
output = "png"

# JPEG encoding quality, 1 (smallest) to 100 (best).
# Ignored when the output format is png or gif.
quality = 75

# Existing directory that receives every converted file.
# When unset, each output is written next to its source.
# dir = "converted"

# Print the effective options, one line per converted file
# and the number of converted files at the end.
verbose = false
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("imgconv.toml");
        fs::write(&path, content).unwrap();
        path
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn defaults_without_file() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.input, "jpeg");
        assert_eq!(settings.output, "png");
        assert_eq!(settings.quality, 75);
        assert_eq!(settings.dir, None);
        assert!(!settings.verbose);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "output = \"gif\"\nquality = 40\n");

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.output, "gif");
        assert_eq!(settings.quality, 40);
        assert_eq!(settings.input, "jpeg");
    }

    #[test]
    fn full_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
input = "png"
output = "jpeg"
quality = 90
dir = "out"
verbose = true
"#,
        );

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(
            settings,
            Settings {
                input: "png".into(),
                output: "jpeg".into(),
                quality: 90,
                dir: Some("out".into()),
                verbose: true,
            }
        );
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "qualty = 40\n");
        assert!(matches!(load_settings(Some(&path)), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "this is not toml [[[");
        assert!(matches!(load_settings(Some(&path)), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn wrong_value_type_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "quality = \"high\"\n");
        assert!(matches!(load_settings(Some(&path)), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.toml");
        match load_settings(Some(&path)) {
            Err(ConfigError::Io { path: p, source }) => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn stock_config_matches_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(resolve_settings(Some(value)).unwrap(), Settings::default());
    }

    // =========================================================================
    // merge_toml
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("quality = 75\ninput = \"jpeg\"").unwrap();
        let overlay: toml::Value = toml::from_str("quality = 10").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["quality"].as_integer(), Some(10));
        assert_eq!(merged["input"].as_str(), Some("jpeg"));
    }

    #[test]
    fn merge_toml_nested_tables() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\nz = 4").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
        assert_eq!(merged["a"]["z"].as_integer(), Some(4));
    }

    // =========================================================================
    // into_options
    // =========================================================================

    fn root_str(tmp: &TempDir) -> String {
        tmp.path().to_string_lossy().into_owned()
    }

    #[test]
    fn options_from_defaults() {
        let tmp = TempDir::new().unwrap();
        let root = root_str(&tmp);

        let options = Settings::default().into_options(Some(&root)).unwrap();
        assert_eq!(options.source, Source::Tree(tmp.path().to_path_buf()));
        assert_eq!(options.input_format, Format::Jpeg);
        assert_eq!(options.output_format, Format::Png);
        assert_eq!(options.quality, 75);
        assert_eq!(options.output_dir, None);
    }

    #[test]
    fn missing_or_empty_root_is_invalid_argument() {
        assert!(matches!(
            Settings::default().into_options(None),
            Err(ConfigError::InvalidArgument)
        ));
        let err = Settings::default().into_options(Some("")).unwrap_err();
        assert_eq!(err.to_string(), "invalid argument");
    }

    #[test]
    fn nonexistent_root_is_not_found() {
        let err = Settings::default()
            .into_options(Some("nosuchdir-imgconv"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert_eq!(err.to_string(), "nosuchdir-imgconv: no such file or directory");
    }

    #[test]
    fn dash_root_selects_stdin_without_stat() {
        let options = Settings::default().into_options(Some("-")).unwrap();
        assert_eq!(options.source, Source::Stdin);
    }

    #[test]
    fn bad_formats_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let root = root_str(&tmp);

        let settings = Settings {
            input: "jpg".into(),
            ..Settings::default()
        };
        let err = settings.into_options(Some(&root)).unwrap_err();
        assert_eq!(err.to_string(), "invalid input format: jpg");

        let settings = Settings {
            output: "PNG".into(),
            ..Settings::default()
        };
        let err = settings.into_options(Some(&root)).unwrap_err();
        assert_eq!(err.to_string(), "invalid output format: PNG");
    }

    #[test]
    fn root_is_checked_before_formats() {
        let settings = Settings {
            input: "bmp".into(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.into_options(Some("nosuchdir-imgconv")),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn output_dir_must_exist() {
        let tmp = TempDir::new().unwrap();
        let root = root_str(&tmp);
        let settings = Settings {
            dir: Some(tmp.path().join("missing").to_string_lossy().into_owned()),
            ..Settings::default()
        };
        assert!(matches!(
            settings.into_options(Some(&root)),
            Err(ConfigError::NotFound(p)) if p == tmp.path().join("missing")
        ));
    }

    #[test]
    fn output_dir_must_be_a_directory() {
        let tmp = TempDir::new().unwrap();
        let root = root_str(&tmp);
        let file = tmp.path().join("file.txt");
        fs::write(&file, "").unwrap();

        let settings = Settings {
            dir: Some(file.to_string_lossy().into_owned()),
            ..Settings::default()
        };
        let err = settings.into_options(Some(&root)).unwrap_err();
        assert!(matches!(err, ConfigError::NotADirectory(_)));
        assert_eq!(err.to_string(), format!("{} is not a directory", file.display()));
    }

    #[test]
    fn empty_output_dir_means_none() {
        let tmp = TempDir::new().unwrap();
        let root = root_str(&tmp);
        let settings = Settings {
            dir: Some(String::new()),
            ..Settings::default()
        };
        assert_eq!(settings.into_options(Some(&root)).unwrap().output_dir, None);
    }

    #[test]
    fn quality_is_not_checked_here() {
        let tmp = TempDir::new().unwrap();
        let root = root_str(&tmp);
        let settings = Settings {
            quality: 0,
            ..Settings::default()
        };
        assert_eq!(settings.into_options(Some(&root)).unwrap().quality, 0);
    }
}
