//! Finds article source files under the article directory and derives the
//! `path` each one is addressed by.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// A source file that will become one [`crate::article::ArticleEntry`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Where the source file lives on disk.
    pub source: PathBuf,

    /// The derived identifier: the location relative to the article
    /// directory, `/`-separated, less the extension.
    pub path: String,
}

/// Walks the directory on the blocking pool so the runtime isn't stalled on
/// `readdir` calls. See [`discover_blocking`].
pub async fn discover(
    directory: &Path,
    extensions: &[String],
    recursive: bool,
) -> Result<Vec<Document>> {
    let directory = directory.to_owned();
    let extensions = extensions.to_vec();
    tokio::task::spawn_blocking(move || discover_blocking(&directory, &extensions, recursive))
        .await?
}

/// Lists every file in `directory` whose name ends with one of `extensions`,
/// sorted by file name. `extensions` is checked in order, so longer
/// extensions that share a suffix (`.svelte.md` vs `.md`) must come first.
/// Hidden files and directories are skipped. Only the top level is listed
/// unless `recursive` is set.
pub fn discover_blocking(
    directory: &Path,
    extensions: &[String],
    recursive: bool,
) -> Result<Vec<Document>> {
    if !std::fs::metadata(directory)?.is_dir() {
        return Err(Error::NotADirectory(directory.to_owned()));
    }

    let walker = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    let mut documents = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    for result in walker {
        let entry = result?;
        if !entry.file_type().is_file() {
            continue;
        }

        // every entry is yielded from beneath `directory`
        let relative = match entry.path().strip_prefix(directory) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let path = match derive_path(relative, extensions)? {
            Some(path) => path,
            None => continue,
        };

        if let Some(first) = seen.insert(path.clone(), entry.path().to_owned()) {
            return Err(Error::DuplicatePath {
                path,
                first,
                second: entry.path().to_owned(),
            });
        }
        tracing::trace!(source = %entry.path().display(), %path, "discovered article");
        documents.push(Document {
            source: entry.path().to_owned(),
            path,
        });
    }

    Ok(documents)
}

/// Derives the article path for a file at `relative` (relative to the
/// article directory). Returns `None` if the file name doesn't carry one of
/// `extensions`, or is nothing but the extension.
pub fn derive_path(relative: &Path, extensions: &[String]) -> Result<Option<String>> {
    let mut components = Vec::new();
    for component in relative.components() {
        match component.as_os_str().to_str() {
            Some(s) => components.push(s),
            None => return Err(Error::NonUtf8Path(relative.to_owned())),
        }
    }
    let joined = components.join("/");

    let file_name = components.last().copied().unwrap_or_default();
    Ok(extensions
        .iter()
        .find(|ext| file_name.len() > ext.len() && file_name.ends_with(ext.as_str()))
        .map(|ext| joined[..joined.len() - ext.len()].to_owned()))
}

fn is_hidden(entry: &DirEntry) -> bool {
    // the root itself may be a dot-directory (e.g. a temp dir)
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem enumerating the article directory.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the article directory can't be stat'ed (usually because
    /// it doesn't exist).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Returned when the article directory is a file or something else.
    #[error("`{}` is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Returned for errors while walking the directory tree.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// Returned when a source file's path isn't valid UTF-8 and so can't be
    /// turned into an article path.
    #[error("path `{}` is not valid UTF-8", .0.display())]
    NonUtf8Path(PathBuf),

    /// Returned when two source files derive the same article path, e.g.
    /// `a.md` and `a.svx`.
    #[error(
        "`{}` and `{}` both map to article path `{path}`",
        .first.display(),
        .second.display()
    )]
    DuplicatePath {
        path: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Returned when the blocking walk task panicked or was cancelled.
    #[error("directory walk did not complete: {0}")]
    Interrupted(#[from] tokio::task::JoinError),
}
