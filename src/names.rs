use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::ops::Deref;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("{} is not a regular file", .0.display())]
    NotAFile(PathBuf),
    #[error("Could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Ordered list of candidate names, one per line of the source.
///
/// Every line is trimmed, but blank lines are kept as empty entries so the
/// list always mirrors the line structure of the file it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameList(Vec<String>);

impl NameList {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();

        let metadata = match path.metadata() {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(LoadError::NotFound(path.into()));
            }
            Err(source) => {
                return Err(LoadError::Io {
                    path: path.into(),
                    source,
                });
            }
        };

        if !metadata.is_file() {
            return Err(LoadError::NotAFile(path.into()));
        }

        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.into(),
            source,
        })?;

        let names = Self::from_reader(BufReader::new(file)).map_err(|source| LoadError::Io {
            path: path.into(),
            source,
        })?;

        debug!(path = %path.display(), count = names.len(), "Loaded names");

        Ok(names)
    }

    pub fn from_reader(mut reader: impl BufRead) -> io::Result<Self> {
        let mut names = Vec::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            // NOTE: Lossy on purpose, a stray byte should not make the whole list unreadable
            let line = String::from_utf8_lossy(&buf);
            trace!(?line, "line");
            names.push(line.trim().to_string());
        }

        Ok(Self(names))
    }
}

impl Deref for NameList {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<String>> for NameList {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}
