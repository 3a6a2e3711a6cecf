use std::borrow::Cow;
use std::io::Write;
use std::sync::LazyLock;

use clap::ValueEnum;
use regex::Regex;

use crate::error::PipelineError;
use crate::parser::extract::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `{text} - {author}`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n|[\r\n]").unwrap());

/// Writes records to a sink, one line each, in the order received.
pub struct Emitter<W: Write> {
    sink: W,
    format: OutputFormat,
}

impl<W: Write> Emitter<W> {
    pub fn new(sink: W, format: OutputFormat) -> Self {
        Self { sink, format }
    }

    /// Drain `records` into the sink and flush. Returns how many were written.
    pub fn emit_all<I>(&mut self, records: I) -> Result<usize, PipelineError>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut count = 0;
        for record in records {
            self.emit(&record)?;
            count += 1;
        }
        self.sink.flush().map_err(PipelineError::Emit)?;
        Ok(count)
    }

    fn emit(&mut self, record: &Record) -> Result<(), PipelineError> {
        let written = match self.format {
            OutputFormat::Text => writeln!(
                self.sink,
                "{} - {}",
                single_line(&record.text),
                single_line(&record.author)
            ),
            OutputFormat::Json => {
                let line = serde_json::to_string(record)
                    .map_err(|e| PipelineError::Emit(e.into()))?;
                writeln!(self.sink, "{}", line)
            }
        };
        written.map_err(PipelineError::Emit)
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// A record is one output line, so embedded breaks become spaces.
fn single_line(field: &str) -> Cow<'_, str> {
    LINE_BREAK_RE.replace_all(field, " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str, author: &str) -> Record {
        Record {
            text: text.into(),
            author: author.into(),
        }
    }

    fn emit(format: OutputFormat, records: Vec<Record>) -> String {
        let mut emitter = Emitter::new(Vec::new(), format);
        emitter.emit_all(records).unwrap();
        String::from_utf8(emitter.into_inner()).unwrap()
    }

    #[test]
    fn text_lines() {
        let out = emit(
            OutputFormat::Text,
            vec![record("A", "X"), record("B", "Y")],
        );
        assert_eq!(out, "A - X\nB - Y\n");
    }

    #[test]
    fn empty_author_keeps_separator() {
        let out = emit(OutputFormat::Text, vec![record("alone", "")]);
        assert_eq!(out, "alone - \n");
    }

    #[test]
    fn line_breaks_inside_fields_stay_on_one_line() {
        let out = emit(
            OutputFormat::Text,
            vec![record("line one\nline two", "X\r\nY"), record("B", "Z")],
        );
        assert_eq!(out, "line one line two - X Y\nB - Z\n");
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn json_lines() {
        let out = emit(OutputFormat::Json, vec![record("say \"hi\"", "X")]);
        assert_eq!(out, "{\"text\":\"say \\\"hi\\\"\",\"author\":\"X\"}\n");
    }

    #[test]
    fn nothing_to_emit() {
        let mut emitter = Emitter::new(Vec::new(), OutputFormat::Text);
        assert_eq!(emitter.emit_all(Vec::new()).unwrap(), 0);
        assert!(emitter.into_inner().is_empty());
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_failure_is_emit_error() {
        let mut emitter = Emitter::new(Broken, OutputFormat::Text);
        assert!(matches!(
            emitter.emit_all(vec![record("A", "X")]),
            Err(PipelineError::Emit(_))
        ));
    }
}
