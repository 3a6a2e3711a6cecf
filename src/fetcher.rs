use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::error::PipelineError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("quote_scraper/", env!("CARGO_PKG_VERSION"));

/// Response of a successful fetch. Only ever built for 2xx statuses.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status_code: u16,
    pub body: String,
}

/// One blocking GET. Implementations never retry.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<FetchResult, PipelineError>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    fn fetch(&self, url: &str) -> Result<FetchResult, PipelineError> {
        (**self).fetch(url)
    }
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResult, PipelineError> {
        info!("fetching {}", url);
        let start = Instant::now();
        let response = self.client.get(url).send()?;
        let status = response.status();
        info!(
            "response code {} ({} ms)",
            status.as_u16(),
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            warn!("failed response code {}", status.as_u16());
            return Err(PipelineError::Fetch {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text()?;
        Ok(FetchResult {
            status_code: status.as_u16(),
            body,
        })
    }
}
