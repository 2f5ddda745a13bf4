//! Discovery Client CLI
//!
//! Command-line interface for generating API clients from discovery
//! documents and calling their methods.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use discovery_client_common::GenerateOptions;
use discovery_client_generator::{generate_api, ApiTree, CallArgs, GeneratedApi};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "discovery-client")]
#[command(version, about = "Generate and call REST APIs from discovery documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    source: SourceArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Where the discovery document comes from
#[derive(Args, Debug, Default)]
struct SourceArgs {
    /// YAML or JSON file with generation options (camelCase keys)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// File containing a discovery service document
    #[arg(long, global = true)]
    service_file: Option<PathBuf>,

    /// URL of a discovery service document
    #[arg(long, global = true)]
    service_url: Option<String>,

    /// File containing a single API's discovery document
    #[arg(long, global = true)]
    rest_file: Option<PathBuf>,

    /// URL of a single API's discovery document
    #[arg(long, global = true)]
    rest_url: Option<String>,

    /// API key appended to every call as `key=<API_KEY>`
    #[arg(long, global = true, env = "DISCOVERY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the compiled resource and method tree
    #[command(after_help = "EXAMPLES:\n  \
        # Tree of a single API\n  \
        discovery-client tree --rest-url 'https://storage.googleapis.com/$discovery/rest?version=v1'\n\n  \
        # Tree of every preferred API in a local directory document\n  \
        discovery-client tree --service-file apis.json")]
    Tree,

    /// List the APIs of a discovery service document
    List,

    /// Call a generated method
    #[command(after_help = "EXAMPLES:\n  \
        # Search people through the public discovery service\n  \
        discovery-client call plus.people.search query=Dave maxResults=5\n\n  \
        # Call a method of a single API\n  \
        discovery-client call buckets.get bucket=logs \\\n    \
        --rest-file storage-v1.json")]
    Call {
        /// Dotted method path; in directory mode the API name comes first
        method: String,

        /// Call arguments as key=value
        #[arg(value_parser = parse_key_value)]
        args: Vec<(String, String)>,

        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

impl SourceArgs {
    fn into_options(self) -> Result<GenerateOptions> {
        let base = match &self.config {
            Some(path) => GenerateOptions::load(path)
                .with_context(|| format!("Failed to load options from {}", path.display()))?,
            None => GenerateOptions::default(),
        };

        Ok(base.merge(GenerateOptions {
            discovery_service_file: self.service_file,
            discovery_service_url: self.service_url,
            discovery_rest_file: self.rest_file,
            discovery_rest_url: self.rest_url,
            api_key: self.api_key,
        }))
    }
}

/// Install the tracing subscriber; `--verbose` forces debug output
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = cli.source.into_options()?;
    let source = options.resolve().source;

    eprintln!("{} Loading discovery document: {}", "→".cyan(), source);
    let api = generate_api(options)
        .await
        .with_context(|| format!("Failed to generate API from {}", source))?;

    match cli.command {
        Commands::Tree => tree_command(&api),
        Commands::List => list_command(&api)?,
        Commands::Call { method, args, body } => {
            call_command(&api, &method, args, body.as_deref()).await?
        }
    }

    Ok(())
}

fn tree_command(api: &GeneratedApi) {
    match api {
        GeneratedApi::Api(tree) => print_tree(tree, 0),
        GeneratedApi::Directory(directory) => {
            for (name, tree) in directory.iter() {
                println!("{}", name.green().bold());
                print_tree(tree, 1);
            }
        }
    }
}

fn print_tree(tree: &ApiTree, depth: usize) {
    let indent = "  ".repeat(depth);
    for (name, method) in tree.methods() {
        println!(
            "{}• {} {} {}",
            indent,
            name.cyan(),
            method.http_method().as_str().yellow(),
            method.path().dimmed()
        );
    }
    for (name, resource) in tree.resources() {
        println!("{}{}", indent, name.bold());
        print_tree(resource, depth + 1);
    }
}

fn list_command(api: &GeneratedApi) -> Result<()> {
    let directory = api
        .as_directory()
        .ok_or_else(|| anyhow!("`list` needs a discovery service document, not a single API"))?;

    println!(
        "\n{} {} APIs",
        "✓".green(),
        directory.len().to_string().bold()
    );
    for (name, tree) in directory.iter() {
        println!("  • {} ({} methods)", name.cyan(), tree.method_count());
    }
    Ok(())
}

async fn call_command(
    api: &GeneratedApi,
    path: &str,
    args: Vec<(String, String)>,
    body: Option<&str>,
) -> Result<()> {
    let Some(method) = api.lookup(path) else {
        bail!("No method '{}' in the generated API", path);
    };

    let body = body
        .map(serde_json::from_str)
        .transpose()
        .context("Request body is not valid JSON")?;
    let args: CallArgs = args.into_iter().collect();

    eprintln!(
        "{} {} {}",
        "→".cyan(),
        method.http_method().as_str().yellow(),
        method.request_url(&args)
    );

    let response = method
        .call_with_body(&args, body)
        .await
        .with_context(|| format!("Call to {} failed", path))?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
