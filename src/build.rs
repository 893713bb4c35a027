//! Exports the [`build_site`] function, which prerenders the article index
//! for static hosting: it builds the index once ([`crate::index`]) and writes
//! the same JSON body the server would send to
//! `{output_directory}/api/articles.json`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::index::{Error as IndexError, Indexer};

/// The location of the prerendered index, relative to the output directory.
/// Mirrors [`crate::server::ARTICLES_ROUTE`].
pub const ARTICLES_FILE: &str = "api/articles.json";

/// Builds the article index from a [`Config`] and writes it under
/// `config.output_directory`. Returns the path of the written file. Nothing
/// is written if the index can't be built.
pub async fn build_site(config: &Config) -> Result<PathBuf> {
    let entries = Indexer::new(config).build_index().await?;
    let path = config.output_directory.join(ARTICLES_FILE);
    write_json(&path, &entries)?;
    tracing::info!(path = %path.display(), count = entries.len(), "wrote article index");
    Ok(path)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|err| Error::Write {
            path: dir.to_owned(),
            err,
        })?;
    }
    let file = File::create(path).map_err(|err| Error::Write {
        path: path.to_owned(),
        err,
    })?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer(&mut w, value)?;
    w.flush().map_err(|err| Error::Write {
        path: path.to_owned(),
        err,
    })?;
    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for prerendering the site.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the index itself can't be built.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Returned for I/O problems creating the output directory or file.
    #[error("writing `{}`: {err}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// Returned when the index can't be serialized.
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}
