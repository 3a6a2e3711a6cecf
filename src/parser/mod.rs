pub mod document;
pub mod extract;

use scraper::Html;
use tracing::debug;

use crate::error::PipelineError;
pub use document::{Document, Node};

const PREVIEW_CHARS: usize = 500;

/// Build a document tree from a response body.
///
/// html5ever recovers from malformed markup, so the only rejection is for
/// bodies that are not text at all.
pub fn parse(body: &str) -> Result<Document, PipelineError> {
    check_readable(body)?;

    let document = Document::new(Html::parse_document(body));
    debug!(
        "parsed {} bytes ({} recovered markup errors)",
        body.len(),
        document.parse_errors()
    );
    debug!("preview: {}", document.preview(PREVIEW_CHARS));
    Ok(document)
}

fn check_readable(body: &str) -> Result<(), PipelineError> {
    if body.contains('\0') {
        return Err(PipelineError::Parse("body contains NUL bytes".into()));
    }

    let total = body.chars().count();
    let replaced = body.chars().filter(|&c| c == char::REPLACEMENT_CHARACTER).count();
    if total > 0 && replaced * 4 > total {
        return Err(PipelineError::Parse(format!(
            "{} of {} characters failed to decode",
            replaced, total
        )));
    }
    Ok(())
}
