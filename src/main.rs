mod config;
mod emitter;
mod error;
mod fetcher;
mod parser;
mod pipeline;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use config::{Config, Source, DEFAULT_URL};
use emitter::OutputFormat;
use parser::extract::{DEFAULT_AUTHOR, DEFAULT_CONTAINER, DEFAULT_TEXT};

#[derive(Parser)]
#[command(
    name = "quote_scraper",
    version,
    about = "Fetch a page and print one line per quote block"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a URL and extract records from it
    Scrape {
        /// Page to fetch
        #[arg(short, long, env = "QUOTES_URL", default_value = DEFAULT_URL)]
        url: String,
        /// Request timeout in seconds
        #[arg(short, long, env = "QUOTES_TIMEOUT_SECS", default_value = "10")]
        timeout_secs: u64,
        #[command(flatten)]
        extract: ExtractArgs,
    },
    /// Extract records from a local HTML file (stdin when omitted)
    Extract {
        path: Option<PathBuf>,
        #[command(flatten)]
        extract: ExtractArgs,
    },
}

#[derive(Args)]
struct ExtractArgs {
    /// CSS selector for each repeated record block
    #[arg(long, env = "QUOTES_CONTAINER", default_value = DEFAULT_CONTAINER)]
    container: String,
    /// CSS selector for the text field, scoped to the container
    #[arg(long, env = "QUOTES_TEXT_SELECTOR", default_value = DEFAULT_TEXT)]
    text_selector: String,
    /// CSS selector for the author field, scoped to the container
    #[arg(long, env = "QUOTES_AUTHOR_SELECTOR", default_value = DEFAULT_AUTHOR)]
    author_selector: String,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Collapse whitespace runs inside each field
    #[arg(long)]
    squash_whitespace: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        let (source, timeout, args) = match self.command {
            Commands::Scrape {
                url,
                timeout_secs,
                extract,
            } => (Source::Url(url), Duration::from_secs(timeout_secs), extract),
            Commands::Extract { path, extract } => {
                (Source::File(path), fetcher::DEFAULT_TIMEOUT, extract)
            }
        };
        Config {
            source,
            timeout,
            container: args.container,
            text_selector: args.text_selector,
            author_selector: args.author_selector,
            format: args.format,
            squash_whitespace: args.squash_whitespace,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse().into_config();
    pipeline::run(&config)
}
