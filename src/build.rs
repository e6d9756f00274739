//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output site: loading the entries ([`crate::entry`]),
//! ordering them newest first, rendering the index and detail pages
//! ([`crate::render`]) and writing them to disk ([`crate::write`]).

use crate::config::Config;
use crate::entry::{duplicate_dates, load_entries, sort_entries, Error as LoadError};
use crate::render::{
    parse_template, Error as RenderError, Renderer, DEFAULT_ENTRY_TEMPLATE,
    DEFAULT_INDEX_TEMPLATE,
};
use crate::write::{Error as WriteError, Writer};
use gtmpl::Template;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a build wrote, in the order it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSummary {
    /// The path of the index page.
    pub index_path: PathBuf,

    /// One record per detail page written. Dates that appear more than once
    /// appear here more than once too.
    pub entry_pages: Vec<WrittenPage>,
}

/// A detail page that was written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenPage {
    pub date: String,
    pub path: PathBuf,
}

/// Builds the site from a [`Config`] object. Entries are loaded and sorted,
/// every page is rendered, and only then is anything written, so bad input or
/// a broken template leaves the output tree untouched. A write failure stops
/// the build; pages written before it stay on disk.
pub fn build_site(config: &Config) -> Result<BuildSummary> {
    let entries = sort_entries(load_entries(&config.data_file)?);
    for date in duplicate_dates(&entries) {
        warn!(date, "several entries share this date, the last one wins");
    }

    // Parse the template files.
    let index_template = load_template(&config.index_template, DEFAULT_INDEX_TEMPLATE)?;
    let entry_template = load_template(&config.entry_template, DEFAULT_ENTRY_TEMPLATE)?;

    let renderer = Renderer {
        index_template: &index_template,
        entry_template: &entry_template,
        title: &config.title,
        subtitle: &config.subtitle,
    };
    let index = renderer.render_index(&entries)?;
    let pages = entries
        .iter()
        .map(|entry| renderer.render_entry(entry))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let writer = Writer {
        output_directory: &config.output_directory,
    };
    let index_path = writer.write_index(&index)?;
    let mut entry_pages = Vec::with_capacity(pages.len());
    for page in &pages {
        entry_pages.push(WrittenPage {
            date: page.date.clone(),
            path: writer.write_entry(page)?,
        });
    }

    info!(
        output = %config.output_directory.display(),
        pages = entry_pages.len(),
        "built site"
    );
    Ok(BuildSummary {
        index_path,
        entry_pages,
    })
}

// Loads the template file contents, concatenating them in order, and parses
// the result into a template. With no files the built-in template is used.
fn load_template<P: AsRef<Path>>(template_files: &[P], builtin: &str) -> Result<Template> {
    if template_files.is_empty() {
        return Ok(parse_template(builtin)?);
    }

    let mut contents = String::new();
    for template_file in template_files {
        use std::io::Read;
        let template_file = template_file.as_ref();
        File::open(template_file)
            .and_then(|mut file| file.read_to_string(&mut contents))
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?;
        contents.push(' ');
    }

    parse_template(&contents).map_err(|err| Error::ParseTemplate(err.to_string()))
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during loading,
/// rendering, writing, and reading or parsing template files.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading entries.
    Load(LoadError),

    /// Returned for errors rendering pages.
    Render(RenderError),

    /// Returned for errors writing pages to disk.
    Write(WriteError),

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Load(err) => err.fmt(f),
            Error::Render(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => write!(f, "Parsing template: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Load(err) => Some(err),
            Error::Render(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
        }
    }
}

impl From<LoadError> for Error {
    /// Converts [`LoadError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: LoadError) -> Error {
        Error::Load(err)
    }
}

impl From<RenderError> for Error {
    /// Converts [`RenderError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: RenderError) -> Error {
        Error::Render(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}
