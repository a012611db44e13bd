//! Multi-file configuration reader.
//!
//! Files are opened up front, parsed in the order given, and released on every
//! exit path. Parse state carries over from one file to the next, so a section
//! started in one file can be continued by a later one.

use crate::line::{parse_line, ParseState};
use crate::store::{Section, SectionStore};
use crate::{ConfigError, LookupError};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Source of configuration file contents.
pub trait Opener {
    type Reader: BufRead;

    fn open(&self, path: &Path) -> io::Result<Self::Reader>;
}

/// Opens files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsOpener;

impl Opener for FsOpener {
    type Reader = BufReader<File>;

    fn open(&self, path: &Path) -> io::Result<Self::Reader> {
        File::open(path).map(BufReader::new)
    }
}

enum FileSlot<R> {
    Pending(PathBuf),
    Open { path: PathBuf, reader: R },
}

impl<R> FileSlot<R> {
    fn path(&self) -> &Path {
        match self {
            Self::Pending(path) | Self::Open { path, .. } => path.as_path(),
        }
    }

    fn open<O>(&mut self, opener: &O) -> Result<(), ConfigError>
    where
        O: Opener<Reader = R>,
    {
        if let Self::Pending(path) = self {
            let reader = opener.open(path).map_err(|source| ConfigError::Open {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "Opened config file");
            let path = std::mem::take(path);
            *self = Self::Open { path, reader };
        }
        Ok(())
    }

    fn close(self) -> Self {
        match self {
            Self::Open { path, reader } => {
                drop(reader);
                debug!(path = %path.display(), "Closed config file");
                Self::Pending(path)
            }
            pending @ Self::Pending(_) => pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Unparsed,
    Parsed,
    Failed,
}

/// Reads a set of INI files into one [`SectionStore`].
///
/// Construction does no I/O. [`parse`](Self::parse) may run once; afterwards
/// the reader is queried read-only through [`get`](Self::get).
pub struct ConfigReader<O: Opener = FsOpener> {
    opener: O,
    files: Vec<FileSlot<O::Reader>>,
    store: SectionStore,
    phase: Phase,
}

impl<O: Opener> std::fmt::Debug for ConfigReader<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigReader")
            .field("paths", &self.paths().collect::<Vec<_>>())
            .field("store", &self.store)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl ConfigReader<FsOpener> {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::with_opener(paths, FsOpener)
    }
}

impl<O: Opener> ConfigReader<O> {
    pub fn with_opener<I, P>(paths: I, opener: O) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            opener,
            files: paths
                .into_iter()
                .map(|p| FileSlot::Pending(p.into()))
                .collect(),
            store: SectionStore::new(),
            phase: Phase::Unparsed,
        }
    }

    /// Append another file, parsed after those already listed.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(FileSlot::Pending(path.into()));
        self
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(FileSlot::path)
    }

    #[must_use]
    pub fn is_parsed(&self) -> bool {
        self.phase == Phase::Parsed
    }

    /// Open every file, then parse them in order.
    ///
    /// Fails fast: the first open, read or line error aborts the whole parse.
    /// Any handles opened so far are closed before returning, whatever the
    /// outcome. After a failure the store may be partially built.
    pub fn parse(&mut self) -> Result<(), ConfigError> {
        if self.phase != Phase::Unparsed {
            return Err(ConfigError::AlreadyParsed);
        }

        let mut files = std::mem::take(&mut self.files);
        let result = self
            .open_all(&mut files)
            .and_then(|()| self.parse_all(&mut files));
        self.files = files.into_iter().map(FileSlot::close).collect();

        match &result {
            Ok(()) => {
                self.phase = Phase::Parsed;
                debug!(sections = self.store.len(), "Configuration parsed");
            }
            Err(e) => {
                self.phase = Phase::Failed;
                error!(error = %e, "Failed to parse configuration");
            }
        }
        result
    }

    fn open_all(&self, files: &mut [FileSlot<O::Reader>]) -> Result<(), ConfigError> {
        for slot in files {
            slot.open(&self.opener)?;
        }
        Ok(())
    }

    fn parse_all(&mut self, files: &mut [FileSlot<O::Reader>]) -> Result<(), ConfigError> {
        let mut state = ParseState::default();
        for slot in files {
            if let FileSlot::Open { path, reader } = slot {
                parse_file(path, reader, &mut state, &mut self.store)?;
            }
        }
        Ok(())
    }

    /// Look up `key` under `section`.
    pub fn get(&self, section: &str, key: &str) -> Result<&str, LookupError> {
        self.store.lookup(section, key)
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.store.section(name)
    }

    /// Sections in the order their headers were first seen.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.store.sections()
    }

    #[must_use]
    pub const fn store(&self) -> &SectionStore {
        &self.store
    }
}

// A line that arrives together with a read error is never parsed; the error
// is reported instead.
fn parse_file<R: BufRead>(
    path: &Path,
    reader: &mut R,
    state: &mut ParseState,
    store: &mut SectionStore,
) -> Result<(), ConfigError> {
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_line(&line, state, store).map_err(|source| ConfigError::Line {
            path: path.to_path_buf(),
            line_no: index + 1,
            source,
        })?;
    }
    Ok(())
}
