use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;
use serde::Serialize;

use super::{Document, Node};
use crate::error::PipelineError;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

pub const DEFAULT_CONTAINER: &str = "div.quote";
pub const DEFAULT_TEXT: &str = "span.text";
pub const DEFAULT_AUTHOR: &str = "small.author";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub text: String,
    pub author: String,
}

/// Compiled container selector plus the field selectors scoped inside it.
#[derive(Debug, Clone)]
pub struct Selectors {
    pub container: Selector,
    pub text: Selector,
    pub author: Selector,
}

impl Selectors {
    pub fn compile(container: &str, text: &str, author: &str) -> Result<Self, PipelineError> {
        Ok(Self {
            container: compile_one("container", container)?,
            text: compile_one("text", text)?,
            author: compile_one("author", author)?,
        })
    }
}

fn compile_one(field: &'static str, css: &str) -> Result<Selector, PipelineError> {
    Selector::parse(css).map_err(|e| PipelineError::Selector {
        field,
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Lazy view over the records of one document.
///
/// Nothing is matched until [`Extractor::records`] is iterated, and every
/// call starts a fresh pass over the tree.
pub struct Extractor<'a> {
    document: &'a Document,
    selectors: &'a Selectors,
    squash_whitespace: bool,
}

impl<'a> Extractor<'a> {
    pub fn new(document: &'a Document, selectors: &'a Selectors) -> Self {
        Self {
            document,
            selectors,
            squash_whitespace: false,
        }
    }

    /// Collapse whitespace runs and trim each field.
    pub fn squash_whitespace(mut self, on: bool) -> Self {
        self.squash_whitespace = on;
        self
    }

    pub fn records(&self) -> impl Iterator<Item = Record> + 'a {
        let selectors = self.selectors;
        let squash = self.squash_whitespace;
        self.document
            .find_all(&selectors.container)
            .map(move |container| Record {
                text: field_text(container, &selectors.text, squash),
                author: field_text(container, &selectors.author, squash),
            })
    }
}

/// Missing elements read as an empty string.
fn field_text(container: Node<'_>, selector: &Selector, squash: bool) -> String {
    let raw = container.find(selector).map(|n| n.text()).unwrap_or_default();
    if squash {
        WHITESPACE_RE.replace_all(raw.trim(), " ").into_owned()
    } else {
        raw
    }
}
