//! Reads the fenced YAML block at the top of an article and validates it into
//! an [`ArticleMetadata`]. Each article source file must be structured as
//! follows:
//!
//! 1. Initial frontmatter fence (`---`) on its own line
//! 2. YAML frontmatter with fields `title`, `date`, and optionally `tags`
//! 3. Terminal frontmatter fence (`---`) on its own line
//! 4. Article body
//!
//! For example:
//!
//! ```md
//! ---
//! title: Hello, world!
//! date: 2021-04-16
//! tags: [greet]
//! ---
//! # Hello
//!
//! World
//! ```

use serde::Deserialize;

use crate::article::ArticleMetadata;

const FENCE: &str = "---";

#[derive(Deserialize)]
struct Frontmatter {
    /// The title of the article.
    title: Option<String>,

    /// The date of the article, kept verbatim.
    date: Option<String>,

    /// The tags associated with the article. `tags:` with no value comes
    /// through as `None`, same as a missing key. A `~` item inside the list
    /// is kept as `None` so it can be rejected instead of becoming `"~"`.
    tags: Option<Vec<Option<String>>>,
}

/// Splits `input` into its YAML block and its body. The fences must each sit
/// alone on a line; trailing whitespace and `\r` are ignored.
pub fn split(input: &str) -> Result<(&str, &str)> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let (first, rest) = match input.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (input, ""),
    };
    if first.trim_end() != FENCE {
        return Err(Error::MissingStartFence);
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return Ok((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    Err(Error::MissingEndFence)
}

/// Parses and validates the front matter of an article source file. The
/// returned metadata keeps `date` exactly as written; callers that need to
/// order articles parse it with [`crate::date::parse`].
pub fn parse(input: &str) -> Result<ArticleMetadata> {
    let (yaml, _body) = split(input)?;

    // An empty block deserializes from YAML `null`, which serde_yaml won't
    // map onto a struct.
    let frontmatter: Frontmatter = if yaml.trim().is_empty() {
        Frontmatter {
            title: None,
            date: None,
            tags: None,
        }
    } else {
        serde_yaml::from_str(yaml)?
    };

    let title = match frontmatter.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => return Err(Error::MissingTitle),
    };

    let date = frontmatter.date.ok_or(Error::MissingDate)?;
    let tags = frontmatter
        .tags
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, tag)| tag.ok_or(Error::NullTag(i)))
        .collect::<Result<Vec<String>>>()?;

    Ok(ArticleMetadata { title, date, tags })
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem reading an article's front matter.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a source file doesn't begin with a `---` line.
    #[error("article must begin with `---`")]
    MissingStartFence,

    /// Returned when the starting fence was found but the terminal one
    /// wasn't.
    #[error("missing closing `---`")]
    MissingEndFence,

    /// Returned when the frontmatter isn't valid YAML or has the wrong shape.
    #[error(transparent)]
    DeserializeYaml(#[from] serde_yaml::Error),

    /// Returned when `title` is missing or blank.
    #[error("missing or empty `title`")]
    MissingTitle,

    /// Returned when an item of `tags` is null (`~` or `null`).
    #[error("`tags` item {0} is null")]
    NullTag(usize),

    /// Returned when there is no `date` key. Callers fold this into their
    /// date-parse failures.
    #[error("missing `date`")]
    MissingDate,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() -> Result<()> {
        let meta = parse(
            "---\ntitle: Hello, world!\ndate: 2021-04-16\ntags: [greet, rust]\n---\n# Hello\n",
        )?;
        assert_eq!(
            ArticleMetadata {
                title: String::from("Hello, world!"),
                date: String::from("2021-04-16"),
                tags: vec![String::from("greet"), String::from("rust")],
            },
            meta
        );
        Ok(())
    }

    #[test]
    fn test_split_crlf() -> Result<()> {
        let (yaml, body) = split("---\r\ntitle: x\r\n---  \r\nbody\r\n")?;
        assert_eq!("title: x\r\n", yaml);
        assert_eq!("body\r\n", body);
        Ok(())
    }

    #[test]
    fn test_split_ignores_dashes_inside_values() -> Result<()> {
        let (yaml, body) = split("---\ntitle: a --- b\n---\nrest")?;
        assert_eq!("title: a --- b\n", yaml);
        assert_eq!("rest", body);
        Ok(())
    }

    #[test]
    fn test_missing_fences() {
        assert!(matches!(parse("title: x\n"), Err(Error::MissingStartFence)));
        assert!(matches!(parse("----\ntitle: x\n----\n"), Err(Error::MissingStartFence)));
        assert!(matches!(parse("---\ntitle: x\n"), Err(Error::MissingEndFence)));
    }

    #[test]
    fn test_tags_default_to_empty() -> Result<()> {
        assert!(parse("---\ntitle: a\ndate: 2020-01-01\n---\n")?.tags.is_empty());
        assert!(parse("---\ntitle: a\ndate: 2020-01-01\ntags:\n---\n")?.tags.is_empty());
        Ok(())
    }

    #[test]
    fn test_date_is_kept_verbatim() -> Result<()> {
        let meta = parse("---\ntitle: a\ndate: June 15, 2023\n---\n")?;
        assert_eq!("June 15, 2023", meta.date);
        Ok(())
    }

    #[test]
    fn test_validation() {
        assert!(matches!(parse("---\ndate: 2020-01-01\n---\n"), Err(Error::MissingTitle)));
        assert!(matches!(
            parse("---\ntitle: \"  \"\ndate: 2020-01-01\n---\n"),
            Err(Error::MissingTitle)
        ));
        assert!(matches!(parse("---\ntitle: a\n---\n"), Err(Error::MissingDate)));
        assert!(matches!(parse("---\n---\n"), Err(Error::MissingTitle)));
        assert!(matches!(
            parse("---\ntitle: [unterminated\n---\n"),
            Err(Error::DeserializeYaml(_))
        ));
        assert!(matches!(
            parse("---\ntitle: a\ndate: 2020-01-01\ntags: nope\n---\n"),
            Err(Error::DeserializeYaml(_))
        ));
        assert!(matches!(
            parse("---\ntitle: a\ndate: 2023-01-01\ntags: [a, ~]\n---\n"),
            Err(Error::NullTag(1))
        ));
        assert!(matches!(
            parse("---\ntitle: a\ndate: 2023-01-01\ntags:\n  - null\n  - b\n---\n"),
            Err(Error::NullTag(0))
        ));
    }
}
