use std::path::PathBuf;
use std::time::Duration;

use crate::emitter::OutputFormat;
use crate::error::PipelineError;
use crate::fetcher::DEFAULT_TIMEOUT;
use crate::parser::extract::{Selectors, DEFAULT_AUTHOR, DEFAULT_CONTAINER, DEFAULT_TEXT};

pub const DEFAULT_URL: &str = "https://quotes.toscrape.com";

/// Where the document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    /// Local file, or stdin when `None`.
    File(Option<PathBuf>),
}

/// Everything one run needs. Built once from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub source: Source,
    pub timeout: Duration,
    pub container: String,
    pub text_selector: String,
    pub author_selector: String,
    pub format: OutputFormat,
    pub squash_whitespace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: Source::Url(DEFAULT_URL.to_string()),
            timeout: DEFAULT_TIMEOUT,
            container: DEFAULT_CONTAINER.to_string(),
            text_selector: DEFAULT_TEXT.to_string(),
            author_selector: DEFAULT_AUTHOR.to_string(),
            format: OutputFormat::Text,
            squash_whitespace: false,
        }
    }
}

impl Config {
    /// Check the URL and compile selectors before any I/O happens.
    pub fn validate(&self) -> Result<Selectors, PipelineError> {
        if let Source::Url(url) = &self.source {
            let lower = url.to_ascii_lowercase();
            if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                return Err(PipelineError::Config(format!(
                    "url must start with http:// or https://, got `{}`",
                    url
                )));
            }
        }
        if self.timeout.is_zero() {
            return Err(PipelineError::Config("timeout must be positive".into()));
        }
        Selectors::compile(&self.container, &self.text_selector, &self.author_selector)
    }
}
