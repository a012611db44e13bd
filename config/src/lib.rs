//! Minimal read-only INI configuration reader.
//!
//! Reads one or more files into named sections of key/value pairs:
//!
//! ```ini
//! [server]
//! host = localhost
//! banner = "hello world"
//! ```
//!
//! # Format
//!
//! - Every line is trimmed before it is classified.
//! - Blank lines are ignored.
//! - `[name]` opens a section; repeating a name, in the same file or a later
//!   one, continues the existing section.
//! - `key = value` splits on the first `=`. One pair of surrounding double
//!   quotes is stripped from the value. The last assignment of a key wins.
//! - There are no comments, escapes or multi-line values.
//!
//! Parsing is fail-fast: the first bad line in any file aborts the whole
//! parse with the file path, line number and offending text.

#![allow(missing_docs)]

mod error;
mod line;
mod reader;
mod store;

pub use error::{ConfigError, LineError, LineErrorKind, LookupError};
pub use line::{parse_line, Line, ParseState};
pub use reader::{ConfigReader, FsOpener, Opener};
pub use store::{Section, SectionId, SectionStore};

use std::path::PathBuf;

/// Read and parse `paths` in order.
pub fn load<I, P>(paths: I) -> Result<ConfigReader, ConfigError>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut reader = ConfigReader::new(paths);
    reader.parse()?;
    Ok(reader)
}

/// Read and parse a single file.
pub fn load_from_file(path: &str) -> Result<ConfigReader, ConfigError> {
    load([path])
}
