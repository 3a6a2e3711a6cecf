use std::io::{Read, Write};
use std::process::ExitCode;

use tracing::{debug, error, info};

use crate::config::{Config, Source};
use crate::emitter::Emitter;
use crate::error::PipelineError;
use crate::fetcher::{Fetch, HttpFetcher};
use crate::parser::{self, extract::Extractor};

/// Linear run state. There are no back-edges: once `Done` or `Failed`
/// the pipeline stays there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching,
    Parsing,
    Extracting,
    Done,
    Failed,
}

impl Stage {
    pub fn next(self) -> Stage {
        match self {
            Stage::Idle => Stage::Fetching,
            Stage::Fetching => Stage::Parsing,
            Stage::Parsing => Stage::Extracting,
            Stage::Extracting => Stage::Done,
            Stage::Done | Stage::Failed => self,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }
}

pub struct Pipeline<F: Fetch, W: Write> {
    fetcher: F,
    emitter: Emitter<W>,
    stage: Stage,
}

impl<F: Fetch, W: Write> Pipeline<F, W> {
    pub fn new(fetcher: F, emitter: Emitter<W>) -> Self {
        Self {
            fetcher,
            emitter,
            stage: Stage::Idle,
        }
    }

    #[cfg(test)]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Run every stage once. Records reach the sink only after the fetch
    /// and the parse have both succeeded.
    pub fn run(&mut self, config: &Config) -> Result<usize, PipelineError> {
        if self.stage != Stage::Idle {
            return Err(PipelineError::Config(format!(
                "pipeline already ran (stage {:?})",
                self.stage
            )));
        }
        let result = self.run_stages(config);
        if result.is_err() {
            self.stage = Stage::Failed;
        }
        debug_assert!(self.stage.is_terminal());
        result
    }

    fn run_stages(&mut self, config: &Config) -> Result<usize, PipelineError> {
        let selectors = config.validate()?;

        self.advance();
        let body = self.load(&config.source)?;

        self.advance();
        let document = parser::parse(&body)?;

        self.advance();
        let extractor =
            Extractor::new(&document, &selectors).squash_whitespace(config.squash_whitespace);
        let count = self.emitter.emit_all(extractor.records())?;
        if count == 0 {
            info!("no elements matched container selector `{}`", config.container);
        } else {
            info!("emitted {} records", count);
        }

        self.advance();
        Ok(count)
    }

    fn advance(&mut self) {
        let next = self.stage.next();
        debug!("stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    fn load(&self, source: &Source) -> Result<String, PipelineError> {
        match source {
            Source::Url(url) => {
                let fetched = self.fetcher.fetch(url)?;
                debug!("status {}, {} bytes", fetched.status_code, fetched.body.len());
                Ok(fetched.body)
            }
            Source::File(Some(path)) => {
                info!("reading {}", path.display());
                let bytes = std::fs::read(path).map_err(PipelineError::Input)?;
                Ok(decode_lossy(bytes))
            }
            Source::File(None) => {
                info!("reading stdin");
                let mut bytes = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut bytes)
                    .map_err(PipelineError::Input)?;
                Ok(decode_lossy(bytes))
            }
        }
    }

    #[cfg(test)]
    pub fn into_emitter(self) -> Emitter<W> {
        self.emitter
    }
}

/// Local input has no charset header, so undecodable bytes become U+FFFD
/// and the parser decides whether what is left is readable.
fn decode_lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(body) => body,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Process entry point: build the real fetcher, write to stdout, map the
/// outcome to an exit status.
pub fn run(config: &Config) -> ExitCode {
    let fetcher = match HttpFetcher::new(config.timeout) {
        Ok(f) => f,
        Err(e) => {
            error!("{}", e);
            return e.exit_code();
        }
    };
    let stdout = std::io::stdout();
    let emitter = Emitter::new(stdout.lock(), config.format);
    let mut pipeline = Pipeline::new(fetcher, emitter);

    match pipeline.run(config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            e.exit_code()
        }
    }
}
