use crate::render::{EntryPage, PAGE_FILE_NAME};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes rendered documents into the output tree. The only file system
/// operations it performs are directory creation (idempotent, creating parents)
/// and whole-file UTF-8 writes that overwrite any existing file.
pub struct Writer<'a> {
    /// The root of the output tree. The index page is written to
    /// `{output_directory}/index.html` and each detail page to
    /// `{output_directory}/{date}/index.html`, next to an
    /// `{output_directory}/{date}/images/` directory.
    pub output_directory: &'a Path,
}

impl Writer<'_> {
    /// Writes the index document and returns the path it was written to.
    pub fn write_index(&self, html: &str) -> Result<PathBuf> {
        create_dir_all(self.output_directory)?;
        let path = self.output_directory.join(PAGE_FILE_NAME);
        write_file(&path, html)?;
        Ok(path)
    }

    /// Ensures the page's directory and its images directory exist, then
    /// writes the document. Returns the path it was written to. A page for a
    /// date that has already been written replaces the earlier one.
    pub fn write_entry(&self, page: &EntryPage) -> Result<PathBuf> {
        create_dir_all(&self.output_directory.join(page.images_directory()))?;
        let path = self.output_directory.join(page.file_path());
        write_file(&path, &page.html)?;
        Ok(path)
    }
}

fn create_dir_all(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|err| Error::CreateDirectory {
        path: path.to_owned(),
        err,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|err| Error::WriteFile {
        path: path.to_owned(),
        err,
    })?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote page");
    Ok(())
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// Returned when an output directory can't be created.
    CreateDirectory { path: PathBuf, err: io::Error },

    /// Returned when an output file can't be written.
    WriteFile { path: PathBuf, err: io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::CreateDirectory { path, err } => {
                write!(f, "Creating directory '{}': {}", path.display(), err)
            }
            Error::WriteFile { path, err } => {
                write!(f, "Writing file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::CreateDirectory { path: _, err } => Some(err),
            Error::WriteFile { path: _, err } => Some(err),
        }
    }
}
