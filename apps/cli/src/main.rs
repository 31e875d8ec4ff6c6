//! notion-sync CLI: export completed Notion pages to a local markdown tree.
//!
//! Queries a Notion database for pages with the configured status, renders
//! each page's blocks to Markdown, and writes one front-mattered file per page.

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
