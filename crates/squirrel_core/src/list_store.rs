//! Flat-file store for an ordered list of strings.
//!
//! # Responsibility
//! - Persist a `Vec<String>` as one JSON array in a single file.
//! - Offer whole-list load/save plus append-one on top of it.
//!
//! # Invariants
//! - After any completed operation the file holds a valid JSON string array.
//! - Writes replace the whole file through a temp-file rename; readers never
//!   observe a partially written list.
//! - Replacing the file keeps its permissions.
//! - Single caller only; overlapping writers are not coordinated.

use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub type ListStoreResult<T> = Result<T, ListStoreError>;

/// Failure while reading or writing the list file.
#[derive(Debug)]
pub enum ListStoreError {
    Io { path: PathBuf, source: io::Error },
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for ListStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "list store i/o failed at `{}`: {source}", path.display())
            }
            Self::Corrupt { path, source } => write!(
                f,
                "list store file `{}` is not a valid string list: {source}",
                path.display()
            ),
        }
    }
}

impl Error for ListStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Corrupt { source, .. } => Some(source),
        }
    }
}

/// Whole-list persistence contract.
pub trait StringListStore {
    fn load_strings(&self) -> ListStoreResult<Vec<String>>;
    fn save_strings(&self, strings: &[String]) -> ListStoreResult<()>;

    /// Appends one value; equivalent to load, push, save.
    fn save_string(&self, value: &str) -> ListStoreResult<()> {
        let mut strings = self.load_strings()?;
        strings.push(value.to_string());
        self.save_strings(&strings)
    }
}

/// JSON-file backed [`StringListStore`].
#[derive(Debug, Clone)]
pub struct ListStore {
    path: PathBuf,
}

impl ListStore {
    /// Opens the store at `path`, creating the file with an empty list when absent.
    ///
    /// An existing file is left untouched; its content is only validated on load.
    ///
    /// # Errors
    /// - `ListStoreError::Io` when the file cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> ListStoreResult<Self> {
        let store = Self { path: path.into() };
        if !store.path.exists() {
            store.create_empty()?;
            debug!(
                "event=list_store_init module=list_store status=ok created=true path={}",
                store.path.display()
            );
        }
        Ok(store)
    }

    /// Returns the backing file path given at construction.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> ListStoreError {
        error!(
            "event=list_store_io module=list_store status=error path={} error={}",
            self.path.display(),
            source
        );
        ListStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    // Created in place rather than staged, so the file gets the process umask
    // instead of the temp file's owner-only mode.
    fn create_empty(&self) -> ListStoreResult<()> {
        let encoded = serde_json::to_vec(&Vec::<String>::new()).map_err(|source| {
            ListStoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .map_err(|err| self.io_error(err))?;
        file.write_all(&encoded)
            .and_then(|()| file.sync_all())
            .map_err(|err| self.io_error(err))
    }

    fn carry_permissions(&self, staged: &File) -> io::Result<()> {
        match std::fs::metadata(&self.path) {
            Ok(current) => staged.set_permissions(current.permissions()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl StringListStore for ListStore {
    fn load_strings(&self) -> ListStoreResult<Vec<String>> {
        let bytes = std::fs::read(&self.path).map_err(|err| self.io_error(err))?;
        serde_json::from_slice(&bytes).map_err(|source| ListStoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save_strings(&self, strings: &[String]) -> ListStoreResult<()> {
        let encoded = serde_json::to_vec(strings).map_err(|source| ListStoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let mut staged = NamedTempFile::new_in(self.parent_dir()).map_err(|err| self.io_error(err))?;
        staged
            .write_all(&encoded)
            .and_then(|()| self.carry_permissions(staged.as_file()))
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|err| self.io_error(err))?;
        staged
            .persist(&self.path)
            .map_err(|err| self.io_error(err.error))?;

        debug!(
            "event=list_store_save module=list_store status=ok count={}",
            strings.len()
        );
        Ok(())
    }
}
