use crate::util::read_optional;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// The name of the optional project file, looked up in the project directory.
pub const PROJECT_FILE_NAME: &str = "tracker.yaml";

const DEFAULT_TITLE: &str = "Frank's Weight Tracker";
const DEFAULT_SUBTITLE: &str = "体重追踪 & 身体数据记录";
const DEFAULT_DATA_FILE: &str = "data.json";

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct Project {
    title: Option<String>,
    subtitle: Option<String>,
    data_file: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    index_template: Vec<PathBuf>,
    entry_template: Vec<PathBuf>,
}

/// Everything a build needs to know. Relative paths in the project file are
/// resolved against the project directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub title: String,
    pub subtitle: String,
    pub data_file: PathBuf,
    pub output_directory: PathBuf,

    /// Template files for the index page, concatenated in order. Empty means
    /// the built-in template.
    pub index_template: Vec<PathBuf>,

    /// Template files for detail pages, concatenated in order. Empty means
    /// the built-in template.
    pub entry_template: Vec<PathBuf>,
}

impl Config {
    /// Loads the configuration for the project in `dir`. Without a
    /// `tracker.yaml` every setting takes its default: entries are read from
    /// `{dir}/data.json` and pages are written into `dir` itself.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE_NAME);
        let project: Project = match read_optional(&path)? {
            Some(contents) if contents.trim().is_empty() => Project::default(),
            Some(contents) => serde_yaml::from_str(&contents).map_err(|err| Error::Yaml {
                path: path.clone(),
                err,
            })?,
            None => Project::default(),
        };
        Ok(Config::from_project(dir, project))
    }

    fn from_project(dir: &Path, project: Project) -> Config {
        Config {
            title: project.title.unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
            subtitle: project
                .subtitle
                .unwrap_or_else(|| DEFAULT_SUBTITLE.to_owned()),
            data_file: dir.join(
                project
                    .data_file
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
            ),
            output_directory: match project.output_directory {
                Some(output_directory) => dir.join(output_directory),
                None => dir.to_owned(),
            },
            index_template: project
                .index_template
                .iter()
                .map(|relpath| dir.join(relpath))
                .collect(),
            entry_template: project
                .entry_template
                .iter()
                .map(|relpath| dir.join(relpath))
                .collect(),
        }
    }
}

/// The result of loading a [`Config`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the project file.
#[derive(Debug)]
pub enum Error {
    /// Returned when the project file exists but can't be read.
    Io(std::io::Error),

    /// Returned when the project file isn't valid.
    Yaml { path: PathBuf, err: serde_yaml::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "Reading project file: {}", err),
            Error::Yaml { path, err } => {
                write!(f, "Parsing project file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Yaml { path: _, err } => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
