#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! File-backed [`HighscoreStore`] holding the best score as a decimal integer.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use jumpy_core::{HighscoreError, HighscoreStore};
use tracing::debug;

/// Stores the highscore in a plain text file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileHighscoreStore {
    path: PathBuf,
}

impl FileHighscoreStore {
    /// Creates a store backed by the file at `path`. The file is not touched
    /// until the first load or save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> HighscoreError {
        HighscoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl HighscoreStore for FileHighscoreStore {
    fn load(&mut self) -> Result<u64, HighscoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no highscore record yet");
                return Ok(0);
            }
            Err(error) => return Err(self.io_error(error)),
        };

        let highscore = contents
            .trim()
            .parse::<u64>()
            .map_err(|_| HighscoreError::Corrupt {
                path: self.path.clone(),
                contents: contents.clone(),
            })?;
        debug!(path = %self.path.display(), highscore, "loaded highscore");
        Ok(highscore)
    }

    fn save(&mut self, highscore: u64) -> Result<(), HighscoreError> {
        fs::write(&self.path, highscore.to_string()).map_err(|error| self.io_error(error))?;
        debug!(path = %self.path.display(), highscore, "saved highscore");
        Ok(())
    }
}
