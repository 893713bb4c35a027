//! Defines the [`ArticleMetadata`] and [`ArticleEntry`] types, which make up
//! the article index served to the site.

use serde::{Deserialize, Serialize};

/// The attributes read from an article's front matter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    /// The title of the article. Never blank.
    pub title: String,

    /// The date of the article exactly as the author wrote it. Ordering uses
    /// the parsed instant, never this string.
    pub date: String,

    /// The tags associated with the article, in the order they were written.
    pub tags: Vec<String>,
}

/// One article in the index: its metadata plus the `path` used to address it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleEntry {
    pub meta: ArticleMetadata,

    /// The source file's location relative to the article directory, less the
    /// extension (e.g., the path for `{articles_directory}/foo.md` is `foo`
    /// and, when walking recursively, `{articles_directory}/foo/bar.md` is
    /// `foo/bar`).
    pub path: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_json_shape() -> serde_json::Result<()> {
        let entry = ArticleEntry {
            meta: ArticleMetadata {
                title: String::from("Simple"),
                date: String::from("2023-01-01"),
                tags: vec![String::from("rust")],
            },
            path: String::from("simple"),
        };
        assert_eq!(
            serde_json::json!({
                "meta": {"title": "Simple", "date": "2023-01-01", "tags": ["rust"]},
                "path": "simple",
            }),
            serde_json::to_value(&entry)?
        );
        Ok(())
    }
}
