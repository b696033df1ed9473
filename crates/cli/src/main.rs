use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_app::catalog::CatalogStore;
use shelf_kernel::settings::Settings;

/// Command-line entrypoint for the Shelf catalog service
#[derive(Debug, Parser)]
#[command(name = "shelf-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print every HTTP route as `METHOD PATH`
    Routes,
    /// Print the effective configuration as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().with_context(|| "failed to load Shelf settings")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            shelf_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "shelf-cli serving");
            shelf_app::run(settings).await
        }
        Command::Routes => {
            let registry = shelf_app::build_registry(Arc::new(CatalogStore::seeded()))?;
            let document = shelf_http::router::openapi_document(&registry);
            for line in route_lines(&document) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render configuration")?;
            println!("{rendered}");
            Ok(())
        }
    }
}

/// `METHOD PATH` lines from an OpenAPI document, sorted by path
fn route_lines(document: &serde_json::Value) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(paths) = document.get("paths").and_then(|p| p.as_object()) {
        for (path, item) in paths {
            let Some(operations) = item.as_object() else {
                continue;
            };
            for method in operations.keys() {
                lines.push(format!("{} {}", method.to_uppercase(), path));
            }
        }
    }
    lines.sort_by(|a, b| {
        let path = |line: &str| line.split_once(' ').map(|(_, p)| p.to_string());
        path(a).cmp(&path(b)).then_with(|| a.cmp(b))
    });
    lines
}
