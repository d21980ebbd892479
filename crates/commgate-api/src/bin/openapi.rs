//! # commgate-openapi
//!
//! Writes the gateway's OpenAPI document to disk and prints a summary of
//! the documented endpoints.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use utoipa::OpenApi;

use commgate_api::openapi::ApiDoc;

#[derive(Parser, Debug)]
#[command(name = "commgate-openapi", version, about = "Export the OpenAPI document")]
struct Cli {
    /// Output file.
    #[arg(short, long, default_value = "openapi_spec.json")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let doc = ApiDoc::openapi();
    let json = doc
        .to_pretty_json()
        .context("serializing OpenAPI document")?;
    std::fs::write(&cli.output, json)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    println!("OpenAPI document written to {}", cli.output.display());
    println!("  title:   {}", doc.info.title);
    println!("  version: {}", doc.info.version);
    println!("  paths:   {}", doc.paths.paths.len());
    println!();

    for (path, item) in &doc.paths.paths {
        for (method, operation) in &item.operations {
            let method = serde_json::to_value(method)
                .ok()
                .and_then(|v| v.as_str().map(str::to_uppercase))
                .unwrap_or_default();
            println!(
                "  {method:<6} {path:<20} {}",
                operation.summary.as_deref().unwrap_or("")
            );
        }
    }

    Ok(())
}
