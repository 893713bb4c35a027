//! Builds the article index: discovers the source files, resolves every
//! file's front matter concurrently, and orders the results newest first.
//! See [`Indexer::build_index`].

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tracing::{debug, info};

use crate::article::ArticleEntry;
use crate::config::Config;
use crate::date;
use crate::discovery::{self, Document};
use crate::frontmatter;

/// Builds [`ArticleEntry`] lists from the article directory. Nothing is
/// cached; every call to [`Indexer::build_index`] reads the sources afresh.
#[derive(Clone, Debug)]
pub struct Indexer {
    /// The directory holding the article source files.
    articles_directory: PathBuf,

    /// The recognized source file extensions, longest first.
    extensions: Vec<String>,

    /// Whether subdirectories are searched too.
    recursive: bool,

    /// An upper bound on reading and parsing any single article.
    resolve_timeout: Option<Duration>,
}

/// An entry paired with the parsed instant it sorts by.
struct Resolved {
    published: DateTime<Utc>,
    entry: ArticleEntry,
}

impl Indexer {
    /// Constructs an indexer from the relevant parts of a [`Config`].
    pub fn new(config: &Config) -> Indexer {
        Indexer {
            articles_directory: config.articles_directory.clone(),
            extensions: config.extensions.clone(),
            recursive: config.recursive,
            resolve_timeout: config.resolve_timeout,
        }
    }

    pub fn articles_directory(&self) -> &Path {
        &self.articles_directory
    }

    /// Returns every article under the article directory, most recent first.
    ///
    /// All source files are read and parsed concurrently on the current task,
    /// and the build waits for every one of them. The first failure aborts the
    /// whole build; the resolutions still in flight are dropped and no partial
    /// index is returned. Articles whose dates resolve to the same instant
    /// keep their discovery (file name) order.
    #[tracing::instrument(skip(self), fields(directory = %self.articles_directory.display()))]
    pub async fn build_index(&self) -> Result<Vec<ArticleEntry>> {
        let started = Instant::now();
        let documents =
            discovery::discover(&self.articles_directory, &self.extensions, self.recursive)
                .await
                .map_err(|err| Error::Discovery {
                    path: self.articles_directory.clone(),
                    err,
                })?;
        debug!(count = documents.len(), "discovered articles");

        let mut resolved =
            try_join_all(documents.into_iter().map(|document| self.resolve(document))).await?;

        // `sort_by` is stable, so ties keep discovery order.
        resolved.sort_by(|a, b| b.published.cmp(&a.published));

        info!(
            count = resolved.len(),
            elapsed = ?started.elapsed(),
            "built article index"
        );
        Ok(resolved.into_iter().map(|r| r.entry).collect())
    }

    async fn resolve(&self, document: Document) -> Result<Resolved> {
        let source = document.source.clone();
        within(source, self.resolve_timeout, resolve_document(document)).await
    }
}

/// Awaits `resolution`, failing with [`Error::Timeout`] for `source` if a
/// `timeout` is set and elapses first.
async fn within<T>(
    source: PathBuf,
    timeout: Option<Duration>,
    resolution: impl Future<Output = Result<T>>,
) -> Result<T> {
    match timeout {
        None => resolution.await,
        Some(timeout) => tokio::time::timeout(timeout, resolution)
            .await
            .map_err(|_| Error::Timeout {
                path: source,
                timeout,
            })?,
    }
}

/// Reads one source file and validates its front matter. The `date` must
/// parse, but the entry keeps the string exactly as it was written.
async fn resolve_document(document: Document) -> Result<Resolved> {
    let Document { source, path } = document;

    let contents = tokio::fs::read_to_string(&source)
        .await
        .map_err(|err| Error::MetadataResolution {
            path: source.clone(),
            err: ResolveError::Io(err),
        })?;

    let meta = frontmatter::parse(&contents).map_err(|err| match err {
        frontmatter::Error::MissingDate => Error::DateParse {
            path: source.clone(),
            err: date::Error::Missing,
        },
        err => Error::MetadataResolution {
            path: source.clone(),
            err: ResolveError::Frontmatter(err),
        },
    })?;

    let published = date::parse(&meta.date).map_err(|err| Error::DateParse {
        path: source.clone(),
        err,
    })?;

    debug!(source = %source.display(), %path, %published, "resolved article");
    Ok(Resolved {
        published,
        entry: ArticleEntry { meta, path },
    })
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failed index build. Each variant names the file or directory
/// at fault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the article directory can't be enumerated, or when two
    /// source files derive the same article path.
    #[error("discovering articles in `{}`: {err}", .path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        err: discovery::Error,
    },

    /// Returned when an article can't be read or its front matter is
    /// malformed.
    #[error("resolving metadata for `{}`: {err}", .path.display())]
    MetadataResolution {
        path: PathBuf,
        #[source]
        err: ResolveError,
    },

    /// Returned when an article's `date` is missing or unrecognized.
    #[error("parsing date of `{}`: {err}", .path.display())]
    DateParse {
        path: PathBuf,
        #[source]
        err: date::Error,
    },

    /// Returned when resolving an article took longer than the configured
    /// timeout.
    #[error("resolving metadata for `{}` timed out after {timeout:?}", .path.display())]
    Timeout { path: PathBuf, timeout: Duration },
}

/// The underlying cause of an [`Error::MetadataResolution`].
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Returned for I/O errors reading the source file.
    #[error(transparent)]
    Io(std::io::Error),

    /// Returned when the front matter is missing, malformed, or incomplete.
    #[error(transparent)]
    Frontmatter(frontmatter::Error),
}
