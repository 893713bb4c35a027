//! Fixture helpers shared by the unit tests.

use std::io;
use std::path::Path;

use crate::config::DEFAULT_EXTENSIONS;

pub fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

/// Writes `contents` to `{dir}/{relative}`, creating parent directories.
pub fn write_file(dir: &Path, relative: &str, contents: &str) -> io::Result<()> {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)
}

/// Renders an article source file with the given front matter fields.
pub fn article(title: &str, date: &str, tags: &[&str]) -> String {
    format!(
        "---\ntitle: {}\ndate: {}\ntags: [{}]\n---\n\nSome words about {}.\n",
        title,
        date,
        tags.join(", "),
        title
    )
}
