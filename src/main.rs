//! fbexporter - Export Facebook page conversations and users through templates.
//!
//! Reads the page id and access tokens from a JSON config file, walks the
//! page's conversations through the Graph API and renders each result page
//! with a user-supplied template.
//!
//!   fbexporter -c fb.json messages -t messages.sql.tmpl -o messages.sql
//!   fbexporter -c fb.json users --ll -t users.sql.tmpl
//!
//! Config file:
//!   { "pageId": "...", "shortLivedToken": "...", "appId": "...", "appSecret": "..." }

mod application;
mod cli;
mod domain;
mod infrastructure;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    export_messages, export_users, resolve_access_token, EscapeMode, TemplateRenderer,
};
use cli::{Cli, Commands, ExportArgs};
use domain::{AppError, ExportStats};
use infrastructure::{open_output, ConfigFile, GraphClient};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
async fn run(cli: Cli) -> domain::Result<()> {
    let config_path = cli.config.ok_or_else(|| AppError::Config {
        message: "Config file is required (--config or FB_CONFIG_FILE)".into(),
    })?;
    let mut store = ConfigFile::load(&config_path)?;
    tracing::info!(config = %store.path().display(), page_id = %store.config().page_id, "Starting export");

    let stats = match cli.command {
        Commands::Messages {
            export,
            legacy_escape,
        } => {
            let escape = if legacy_escape {
                EscapeMode::Legacy
            } else {
                EscapeMode::Standard
            };
            cmd_messages(&mut store, &cli.graph_url, &export, escape).await?
        }
        Commands::Users { export } => cmd_users(&mut store, &cli.graph_url, &export).await?,
    };

    tracing::info!(
        pages = stats.pages,
        skipped_pages = stats.skipped_pages,
        render_failures = stats.render_failures,
        "DONE"
    );
    eprintln!(
        "{} Exported {} records from {} conversations",
        "✓".green().bold(),
        stats.records,
        stats.conversations
    );

    Ok(())
}

/// Export messages command.
async fn cmd_messages(
    store: &mut ConfigFile,
    graph_url: &str,
    args: &ExportArgs,
    escape: EscapeMode,
) -> domain::Result<ExportStats> {
    let renderer = TemplateRenderer::from_file("messages", &args.template)?;
    let mut out = open_output(args.output.as_deref())?;
    let api = connect(store, graph_url, args.long_lived).await?;

    export_messages(&api, &store.config().page_id, &renderer, &mut out, escape).await
}

/// Export users command.
async fn cmd_users(
    store: &mut ConfigFile,
    graph_url: &str,
    args: &ExportArgs,
) -> domain::Result<ExportStats> {
    let renderer = TemplateRenderer::from_file("users", &args.template)?;
    let mut out = open_output(args.output.as_deref())?;
    let api = connect(store, graph_url, args.long_lived).await?;

    export_users(&api, &store.config().page_id, &renderer, &mut out).await
}

/// Resolve the access token and build a client bound to it.
async fn connect(
    store: &mut ConfigFile,
    graph_url: &str,
    long_lived: bool,
) -> domain::Result<GraphClient> {
    let client = GraphClient::new(graph_url)?;
    let token = resolve_access_token(store, long_lived, &client).await?;
    Ok(client.with_access_token(token))
}

/// Setup tracing/logging based on verbosity level.
///
/// Logs go to stderr; stdout carries template output.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
