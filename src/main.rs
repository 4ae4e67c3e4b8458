//! # news_digest
//!
//! Fetches the tagesschau.de homepage feed, asks a chat model to summarize it
//! and renders the summary into a static HTML page.
//!
//! ## Usage
//!
//! ```sh
//! OPENAI_API_KEY=sk-... news_digest --profile lite
//! ```
//!
//! ## Architecture
//!
//! The application is a single linear pass:
//! 1. **Fetching**: Load the homepage feed, select regional and nationwide
//!    items, cut the list to the payload budget
//! 2. **Summarizing**: Offer the items to the model as the `get_latest_news`
//!    tool and collect its markdown answer (placeholder on failure)
//! 3. **Rendering**: Embed the markdown in a page that renders it with marked
//!    and write it to the profile's output path

use clap::Parser;
use reqwest::Client;
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod summarizer;
mod utils;

use api::OpenAiClient;
use cli::Cli;
use config::{Config, Environment, Settings};

fn init_tracing(debug_default: bool) {
    let fallback = if debug_default {
        "news_digest=debug,info"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    // .env must be loaded before the environment is read
    let dotenv = dotenvy::from_path(&args.env_file);
    let env = Environment::from_env();
    let config = Config::load(args.config.as_deref()).await?;
    let settings = Settings::resolve(&args, config, env)?;
    init_tracing(!settings.ci && settings.verbose);

    let start_time = std::time::Instant::now();
    info!("news_digest starting up");
    match dotenv {
        Ok(()) => debug!(path = %args.env_file.display(), "Loaded .env file"),
        Err(e) if e.not_found() => debug!(path = %args.env_file.display(), "No .env file"),
        Err(e) => warn!(path = %args.env_file.display(), error = %e, "Failed to load .env file"),
    }
    info!(
        config = ?args.config,
        profile = %settings.profile,
        model = %settings.model,
        output = %settings.output.display(),
        ci = settings.ci,
        "Resolved settings"
    );

    let client = Client::builder().timeout(settings.timeout).build()?;
    let model = OpenAiClient::new(client.clone(), &settings.base_url, settings.api_key.clone());

    let report = match pipeline::run(&client, model, &settings).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Run failed");
            return Err(e.into());
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        items = report.items,
        payload_bytes = report.payload_bytes,
        fallback = report.fallback,
        path = %report.output.display(),
        "Execution complete"
    );
    Ok(())
}
