//! Loads the project configuration from a `quill.yaml` file. Every key is
//! optional; a project file containing nothing at all is valid and yields the
//! defaults below.
//!
//! ```yaml
//! articles_directory: src/routes/articles
//! extensions: [".svelte.md", ".md", ".svx"]
//! recursive: false
//! resolve_timeout_ms: 2000
//! address: 127.0.0.1:3000
//! output_directory: build
//! ```

use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "quill.yaml";

/// The extensions recognized when a project doesn't list its own, longest
/// first.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".svelte.md", ".md", ".svx"];

#[derive(Deserialize)]
struct ArticlesDirectory(PathBuf);
impl Default for ArticlesDirectory {
    fn default() -> Self {
        ArticlesDirectory(PathBuf::from("articles"))
    }
}

#[derive(Deserialize)]
struct Extensions(Vec<String>);
impl Default for Extensions {
    fn default() -> Self {
        Extensions(DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect())
    }
}

#[derive(Deserialize)]
struct Address(SocketAddr);
impl Default for Address {
    fn default() -> Self {
        Address(SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)))
    }
}

#[derive(Deserialize)]
struct OutputDirectory(PathBuf);
impl Default for OutputDirectory {
    fn default() -> Self {
        OutputDirectory(PathBuf::from("build"))
    }
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct Project {
    #[serde(default)]
    articles_directory: ArticlesDirectory,

    #[serde(default)]
    extensions: Extensions,

    #[serde(default)]
    recursive: bool,

    #[serde(default)]
    resolve_timeout_ms: Option<u64>,

    #[serde(default)]
    address: Address,

    #[serde(default)]
    output_directory: OutputDirectory,
}

/// The resolved configuration. Relative directories from the project file
/// have already been joined onto the project root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The directory holding the article source files.
    pub articles_directory: PathBuf,

    /// The recognized source file extensions, each with a leading `.`,
    /// longest first so that `.svelte.md` wins over `.md`.
    pub extensions: Vec<String>,

    /// Whether subdirectories of `articles_directory` are searched too.
    pub recursive: bool,

    /// An upper bound on reading and parsing any single article.
    pub resolve_timeout: Option<Duration>,

    /// The socket address `quill serve` listens on.
    pub address: SocketAddr,

    /// The directory `quill build` writes the prerendered index into.
    pub output_directory: PathBuf,
}

impl Config {
    /// Builds a configuration with the defaults for everything except the
    /// article directory.
    pub fn new(articles_directory: impl Into<PathBuf>) -> Config {
        let project = Project::default();
        Config {
            articles_directory: articles_directory.into(),
            extensions: project.extensions.0,
            recursive: project.recursive,
            resolve_timeout: None,
            address: project.address.0,
            output_directory: project.output_directory.0,
        }
    }

    /// Looks for [`PROJECT_FILE`] in `dir` and then in each of its ancestors,
    /// loading the first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let start = std::fs::canonicalize(dir).map_err(|err| Error::Open {
            path: dir.to_owned(),
            err,
        })?;
        for ancestor in start.ancestors() {
            let path = ancestor.join(PROJECT_FILE);
            if path.is_file() {
                tracing::debug!(path = %path.display(), "found project file");
                return Config::from_project_file(&path);
            }
        }
        Err(Error::NotFound(start))
    }

    /// Loads the configuration from the project file at `path`. Relative
    /// directories are resolved against the file's parent directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let project_root = path.parent().unwrap_or_else(|| Path::new(""));
        Config::from_yaml(project_root, &contents).map_err(|err| match err {
            Error::DeserializeYaml { path: _, err } => Error::DeserializeYaml {
                path: path.to_owned(),
                err,
            },
            err => err,
        })
    }

    /// Parses project file `contents` as though the file lived in
    /// `project_root`. YAML errors name `{project_root}/quill.yaml`.
    pub fn from_yaml(project_root: &Path, contents: &str) -> Result<Config> {
        let project: Project = if contents.trim().is_empty() {
            Project::default()
        } else {
            serde_yaml::from_str(contents)
                .map_err(|err| Error::DeserializeYaml {
                    path: project_root.join(PROJECT_FILE),
                    err,
                })?
        };

        Ok(Config {
            articles_directory: project_root.join(project.articles_directory.0),
            extensions: normalize_extensions(project.extensions.0)?,
            recursive: project.recursive,
            resolve_timeout: project.resolve_timeout_ms.map(Duration::from_millis),
            address: project.address.0,
            output_directory: project_root.join(project.output_directory.0),
        })
    }
}

/// Prefixes each extension with `.` where it's missing, drops duplicates, and
/// orders the list longest first so suffix matching picks the most specific
/// extension.
fn normalize_extensions(extensions: Vec<String>) -> Result<Vec<String>> {
    let mut normalized: Vec<String> = Vec::with_capacity(extensions.len());
    for ext in extensions {
        let ext = ext.trim();
        let ext = if ext.starts_with('.') {
            ext.to_owned()
        } else {
            format!(".{}", ext)
        };
        if ext.len() < 2 {
            return Err(Error::InvalidExtension(ext));
        }
        if !normalized.contains(&ext) {
            normalized.push(ext);
        }
    }
    if normalized.is_empty() {
        return Err(Error::NoExtensions);
    }
    normalized.sort_by(|a, b| b.len().cmp(&a.len()));
    Ok(normalized)
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading the project configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when no project file exists in the directory or any parent.
    #[error(
        "could not find `{}` in `{}` or any parent directory",
        PROJECT_FILE,
        .0.display()
    )]
    NotFound(PathBuf),

    /// Returned for I/O problems while opening the project file.
    #[error("opening project file `{}`: {err}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// Returned when the project file isn't valid YAML or has unknown keys.
    #[error("loading configuration from `{}`: {err}", .path.display())]
    DeserializeYaml {
        path: PathBuf,
        #[source]
        err: serde_yaml::Error,
    },

    /// Returned when `extensions` is an empty list.
    #[error("`extensions` must list at least one extension")]
    NoExtensions,

    /// Returned for an extension that is blank or just `.`.
    #[error("invalid extension `{0}`")]
    InvalidExtension(String),
}
