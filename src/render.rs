//! Renders [`Entry`] objects into HTML documents. Rendering is a pure function
//! of the entries and the templates; nothing here touches the file system (see
//! [`crate::write`] for that).

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use gtmpl::{Context, Template, Value};

use crate::entry::Entry;
use crate::format::escape_text;

/// The built-in template for the index page.
pub const DEFAULT_INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// The built-in template for detail pages.
pub const DEFAULT_ENTRY_TEMPLATE: &str = include_str!("../templates/entry.html");

/// The file name of every rendered document within its directory.
pub const PAGE_FILE_NAME: &str = "index.html";

/// The name of the subdirectory, beneath each entry's directory, that holds
/// the entry's images.
pub const IMAGES_DIRECTORY: &str = "images";

/// Responsible for templating index and detail documents.
pub struct Renderer<'a> {
    /// The template for the index page.
    pub index_template: &'a Template,

    /// The template for detail pages.
    pub entry_template: &'a Template,

    /// The site title. This is made available to both templates.
    pub title: &'a str,

    /// The tagline under the title on the index page.
    pub subtitle: &'a str,
}

/// A rendered detail page along with where it belongs in the output tree.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryPage {
    /// The date the page was rendered for.
    pub date: String,

    /// The page's directory relative to the output root. This is the entry's
    /// date.
    pub directory: PathBuf,

    /// The rendered document.
    pub html: String,
}

impl EntryPage {
    /// The page's file path relative to the output root.
    pub fn file_path(&self) -> PathBuf {
        self.directory.join(PAGE_FILE_NAME)
    }

    /// The images directory relative to the output root.
    pub fn images_directory(&self) -> PathBuf {
        self.directory.join(IMAGES_DIRECTORY)
    }
}

impl Renderer<'_> {
    /// Renders the index document: one card per entry, in the given order, or
    /// an empty-state block when there are no entries.
    pub fn render_index(&self, entries: &[Entry]) -> Result<String> {
        let mut m = self.site_fields();
        m.insert("has_entries".to_owned(), Value::Bool(!entries.is_empty()));
        m.insert(
            "entries".to_owned(),
            Value::Array(entries.iter().map(Entry::summarize).collect()),
        );
        execute(self.index_template, Value::Object(m))
    }

    /// Renders the detail document for a single entry.
    pub fn render_entry(&self, entry: &Entry) -> Result<EntryPage> {
        let mut value = entry.to_value();
        if let Value::Object(obj) = &mut value {
            obj.extend(self.site_fields());
        }
        Ok(EntryPage {
            date: entry.date.clone(),
            directory: PathBuf::from(&entry.date),
            html: execute(self.entry_template, value)?,
        })
    }

    fn site_fields(&self) -> HashMap<String, Value> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "title".to_owned(),
            Value::String(escape_text(self.title)),
        );
        m.insert(
            "subtitle".to_owned(),
            Value::String(escape_text(self.subtitle)),
        );
        m
    }
}

/// Parses template source text into a [`Template`].
pub fn parse_template(contents: &str) -> Result<Template> {
    let mut template = Template::default();
    template.parse(contents)?;
    Ok(template)
}

fn execute(template: &Template, value: Value) -> Result<String> {
    let context = Context::from(value)?;
    let mut out: Vec<u8> = Vec::new();
    template.execute(&mut out, &context)?;
    Ok(String::from_utf8(out)?)
}

/// The result of a fallible rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a rendering operation.
#[derive(Debug)]
pub enum Error {
    /// An error parsing or executing a template.
    Template(String),

    /// Returned when a template produces bytes that aren't valid UTF-8.
    Utf8(std::string::FromUtf8Error),
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Error {
        Error::Utf8(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => write!(f, "template error: {}", err),
            Error::Utf8(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Utf8(err) => Some(err),
        }
    }
}
