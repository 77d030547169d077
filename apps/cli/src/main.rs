//! SkillPress CLI — documentation fetch-and-convert plus skill bundling.
//!
//! `fetch` crawls a documentation site via its sitemap and converts
//! articles to markdown; `bundle` builds single-file skill distributions.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
