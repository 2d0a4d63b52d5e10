//! API Explorer CLI
//!
//! Command-line interface for importing OpenAPI documents, building request
//! URLs, structuring response bodies and packing text into share links.

use anyhow::{bail, Context, Result};
use api_explorer_common::{
    build_url, decode_from_path, encode_to_path, format_response_time, truncate_strings,
    ParameterDescriptor, ParsedDocument,
};
use api_explorer_parser::{structure_response, OpenApiParser, ResponseBody};
use clap::{Parser, Subcommand};
use colored::*;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "api-explorer")]
#[command(version, about = "Explore HTTP APIs from OpenAPI documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the endpoints and base URLs of an OpenAPI document
    #[command(after_help = "EXAMPLES:\n  \
        # List endpoints with their query parameters\n  \
        api-explorer endpoints --spec petstore.yaml\n\n  \
        # Print the imported document as JSON\n  \
        cat petstore.yaml | api-explorer endpoints --spec - --json")]
    Endpoints {
        /// Path to the OpenAPI document (YAML or JSON), `-` for stdin
        #[arg(short, long)]
        spec: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a request URL from a base URL, a path and query values
    #[command(after_help = "EXAMPLES:\n  \
        api-explorer url \\\n    \
        --base https://api.example.com/ \\\n    \
        --path /search \\\n    \
        --param q=rust --param limit=10")]
    Url {
        /// Base URL
        #[arg(short, long)]
        base: String,

        /// Endpoint path, may carry its own query string
        #[arg(short, long)]
        path: String,

        /// Query parameter as name=value, in the order they should appear; each name once
        #[arg(long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,
    },

    /// Structure a response body (JSON, XML or text) and print it as JSON
    Structure {
        /// File containing the body (stdin if omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Truncate string values longer than this many characters
        #[arg(long)]
        truncate: Option<usize>,
    },

    /// Pack text into a URL-safe share token
    Encode {
        /// File containing the text (stdin if omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Unpack a share token
    Decode {
        /// Token produced by `encode`
        token: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match cli.command {
        Commands::Endpoints { spec, json } => {
            endpoints_command(spec.as_path(), json, cli.verbose)?;
        }
        Commands::Url { base, path, params } => {
            url_command(&base, &path, &params)?;
        }
        Commands::Structure { file, truncate } => {
            structure_command(file.as_deref(), truncate, cli.verbose)?;
        }
        Commands::Encode { file } => {
            let text = read_input(file.as_deref())?;
            println!("{}", encode_to_path(&text));
        }
        Commands::Decode { token } => {
            println!("{}", decode_from_path(&token));
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn endpoints_command(spec_path: &Path, json: bool, verbose: bool) -> Result<()> {
    let parser = if spec_path == Path::new("-") {
        OpenApiParser::from_yaml(read_input(None)?)
    } else {
        OpenApiParser::from_file(spec_path).context("Failed to load OpenAPI document")?
    };

    let parsed = parser.parse();
    tracing::debug!(
        "Imported {} endpoints from {}",
        parsed.endpoints.len(),
        spec_path.display()
    );

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&parsed).context("Failed to serialize result")?
        );
    } else {
        print_parsed_document(&parsed, verbose);
    }

    if let Some(error) = parsed.error {
        bail!("Failed to parse OpenAPI document: {}", error);
    }

    Ok(())
}

fn print_parsed_document(parsed: &ParsedDocument, verbose: bool) {
    if parsed.is_error() {
        return;
    }

    println!("{}", "Base URLs:".bold());
    for url in &parsed.base_urls {
        if url.is_empty() {
            println!("  • {}", "(none, paths are relative)".dimmed());
        } else {
            println!("  • {}", url.yellow());
        }
    }

    println!("\n{} ({})", "Endpoints:".bold(), parsed.endpoints.len());
    for endpoint in &parsed.endpoints {
        println!(
            "  {:<7} {}",
            endpoint.method.to_string().cyan(),
            endpoint.path
        );

        for param in &endpoint.query_params {
            let marker = if param.required == Some(true) { "*" } else { "" };
            match (&param.description, verbose) {
                (Some(description), true) => println!(
                    "          ?{}{} {}",
                    param.name.green(),
                    marker.red(),
                    description.dimmed()
                ),
                _ => println!("          ?{}{}", param.name.green(), marker.red()),
            }
        }
    }
}

fn url_command(base: &str, path: &str, raw_params: &[String]) -> Result<()> {
    let mut params = Vec::new();
    let mut values = HashMap::new();

    for raw in raw_params {
        let Some((name, value)) = raw.split_once('=') else {
            bail!("Invalid parameter '{}', expected NAME=VALUE", raw);
        };
        if values
            .insert(name.to_string(), Value::String(value.to_string()))
            .is_some()
        {
            bail!("Parameter '{}' given more than once", name);
        }
        params.push(ParameterDescriptor::new(name));
    }

    println!("{}", build_url(base, path, &params, &values));
    Ok(())
}

fn structure_command(file: Option<&Path>, truncate: Option<usize>, verbose: bool) -> Result<()> {
    let text = read_input(file)?;

    let started = Instant::now();
    let body = structure_response(&text);
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;

    if verbose {
        let kind = match &body {
            ResponseBody::Json(_) => "JSON",
            ResponseBody::Xml(_) => "XML",
            ResponseBody::Text(_) => "text",
        };
        eprintln!(
            "{} Read body as {} in {}",
            "→".cyan(),
            kind.yellow(),
            format_response_time(elapsed)
        );
    }

    let mut value = body.to_json();
    if let Some(max_length) = truncate {
        value = truncate_strings(&value, max_length);
    }

    match value {
        Value::String(text) => println!("{}", text),
        other => println!(
            "{}",
            serde_json::to_string_pretty(&other).context("Failed to serialize body")?
        ),
    }

    Ok(())
}

/// Read a file, or stdin when no path (or `-`) is given
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_url_command() {
        let cli = Cli::try_parse_from([
            "api-explorer",
            "url",
            "--base",
            "https://api.example.com",
            "--path",
            "/search",
            "--param",
            "q=rust",
            "--param",
            "limit=10",
        ])
        .unwrap();

        match cli.command {
            Commands::Url { params, .. } => assert_eq!(params, vec!["q=rust", "limit=10"]),
            _ => panic!("expected url command"),
        }
    }

    #[test]
    fn test_url_command_rejects_malformed_param() {
        assert!(url_command("https://api.example.com", "/x", &["novalue".to_string()]).is_err());
    }

    #[test]
    fn test_url_command_rejects_repeated_param() {
        let params = ["tag=a".to_string(), "tag=b".to_string()];
        let err = url_command("https://api.example.com", "/pets", &params).unwrap_err();
        assert!(err.to_string().contains("tag"));
    }
}
