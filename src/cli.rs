//! Command-line interface definitions for news_digest.
//!
//! Every option is optional: a bare `news_digest` run uses the `standard`
//! profile, the built-in configuration and the `.env` file in the working
//! directory.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for news_digest.
///
/// # Examples
///
/// ```sh
/// # Default run, writes public/news.html
/// news_digest
///
/// # Cheaper model, separate output file
/// news_digest --profile lite
///
/// # Custom config file and output path
/// news_digest -c digest.yaml -o site/index.html
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Profile to run (standard, lite, debug, or one from the config file)
    #[arg(short, long, env = "NEWS_DIGEST_PROFILE", default_value = crate::config::DEFAULT_PROFILE)]
    pub profile: String,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path of the .env file to load
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    /// Override the profile's output file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the profile's chat model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Log tool calls at info level
    #[arg(short, long)]
    pub verbose: bool,
}
