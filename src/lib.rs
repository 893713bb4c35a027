//! The library code for the `quill` article index. A blog keeps its articles
//! as markdown files with a YAML front matter block; this crate turns that
//! directory into the JSON list the site's front end renders its article
//! listing from. The work breaks down into three steps:
//!
//! 1. Finding the article source files on disk ([`crate::discovery`])
//! 2. Reading each file's front matter ([`crate::frontmatter`]) and parsing
//!    its date ([`crate::date`])
//! 3. Ordering the articles newest first ([`crate::index`])
//!
//! Step 2 runs concurrently across all files, and a single bad file fails the
//! whole build. The resulting list is either served over HTTP on every
//! request ([`crate::server`]) or written out once as a static file
//! ([`crate::build`]).

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod article;
pub mod build;
pub mod config;
pub mod date;
pub mod discovery;
pub mod frontmatter;
pub mod index;
pub mod server;

#[cfg(test)]
mod testing;
