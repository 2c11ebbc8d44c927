//! apidoc CLI
//!
//! Command-line interface for generating Swagger 1.2 documentation from
//! discovered endpoints.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::process::ExitCode;

use apidoc_model::{
    load_config, load_discovered_api, to_api_listing_dtos, validate_api_listing,
    validate_resource_listing, ApiListingDto, ConfigError, Docket, DocumentResponse,
    DocumentationService, ResourceListingDto, SwaggerResourceDto, ValidateError,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "apidoc")]
#[command(about = "Generate Swagger 1.2 documentation from discovered endpoints")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Source {
    /// Discovery output: endpoints and models as JSON
    endpoints: PathBuf,

    /// Docket configuration file, one per group (default group if omitted)
    #[arg(long = "config", short)]
    configs: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every configured group and print the rendered documents
    Generate {
        #[command(flatten)]
        source: Source,

        /// Only print this group
        #[arg(long, short)]
        group: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Check the rendered documents against the Swagger 1.2 schemas
        #[arg(long)]
        validate: bool,
    },

    /// Print the API declaration of one resource group
    Listing {
        #[command(flatten)]
        source: Source,

        /// Resource group key (e.g., pets)
        key: String,

        /// Documentation group (default group if not specified)
        #[arg(long, short)]
        group: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the index of generated groups
    Groups {
        #[command(flatten)]
        source: Source,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupDocuments {
    resource_listing: ResourceListingDto,
    api_listings: BTreeMap<String, ApiListingDto>,
}

#[derive(Serialize)]
struct GenerateOutput {
    resources: Vec<SwaggerResourceDto>,
    groups: BTreeMap<String, GroupDocuments>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let result = match cli.command {
        Commands::Generate {
            source,
            group,
            output,
            pretty,
            validate,
        } => run_generate(&source, group.as_deref(), output, pretty, validate),
        Commands::Listing {
            source,
            key,
            group,
            pretty,
        } => run_listing(&source, &key, group.as_deref(), pretty),
        Commands::Groups { source } => run_groups(&source),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = fmt::layer().with_writer(std::io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry().with(filter).with(layer).init();
    }
}

/// Load discovery output and dockets, then run one generation pass per group.
fn build_service(source: &Source) -> Result<DocumentationService, u8> {
    let api = load_discovered_api(&source.endpoints).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let dockets = load_dockets(&source.configs).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let service = DocumentationService::default();
    for docket in &dockets {
        debug!(group = %docket.group_name, endpoints = api.endpoints.len(), "generating group");
        service.generate(docket, &api).map_err(|e| {
            eprintln!("Error generating group '{}': {}", docket.group_name, e);
            e.exit_code() as u8
        })?;
    }
    Ok(service)
}

fn load_dockets(configs: &[PathBuf]) -> Result<Vec<Docket>, ConfigError> {
    if configs.is_empty() {
        return Ok(vec![Docket::default()]);
    }

    let mut seen = BTreeSet::new();
    let mut dockets = Vec::with_capacity(configs.len());
    for path in configs {
        let docket = Docket::from_config(&load_config(path)?)?;
        if !seen.insert(docket.group_name.clone()) {
            return Err(ConfigError::DuplicateGroup {
                name: docket.group_name,
            });
        }
        dockets.push(docket);
    }
    Ok(dockets)
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

fn run_generate(
    source: &Source,
    group: Option<&str>,
    output: Option<PathBuf>,
    pretty: bool,
    validate: bool,
) -> Result<(), u8> {
    let service = build_service(source)?;

    let names = match group {
        Some(name) if service.documentation_by_group(name).is_none() => {
            eprintln!("Error: group not found: {}", name);
            return Err(1);
        }
        Some(name) => vec![name.to_string()],
        None => service.cache().group_names(),
    };

    let mut groups = BTreeMap::new();
    for name in names {
        let Some(documentation) = service.documentation_by_group(&name) else {
            continue;
        };
        let DocumentResponse::Found(resource_listing) = service.resource_listing(Some(&name))
        else {
            continue;
        };
        groups.insert(
            name,
            GroupDocuments {
                resource_listing,
                api_listings: to_api_listing_dtos(&documentation),
            },
        );
    }

    if validate {
        validate_groups(&groups)?;
    }

    let output_doc = GenerateOutput {
        resources: service.resources(),
        groups,
    };
    let json_output = render(&output_doc, pretty)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn validate_groups(groups: &BTreeMap<String, GroupDocuments>) -> Result<(), u8> {
    let mut failed = false;
    for (name, documents) in groups {
        let mut outcomes = vec![(
            format!("{name} resource listing"),
            validate_resource_listing(&documents.resource_listing),
        )];
        for (key, listing) in &documents.api_listings {
            outcomes.push((format!("{name}/{key}"), validate_api_listing(listing)));
        }

        for (label, outcome) in outcomes {
            match outcome {
                Ok(()) => {}
                Err(ValidateError::Invalid { errors }) => {
                    failed = true;
                    eprintln!("Validation failed for {}:", label);
                    for error in errors {
                        eprintln!("  {}", error);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return Err(e.exit_code() as u8);
                }
            }
        }
    }

    if failed {
        Err(1)
    } else {
        Ok(())
    }
}

fn run_listing(source: &Source, key: &str, group: Option<&str>, pretty: bool) -> Result<(), u8> {
    let service = build_service(source)?;

    match service.api_listing(group, key) {
        DocumentResponse::Found(listing) => {
            println!("{}", render(&listing, pretty)?);
            Ok(())
        }
        DocumentResponse::NotFound => {
            eprintln!("Error: listing not found: {}", key);
            Err(1)
        }
    }
}

fn run_groups(source: &Source) -> Result<(), u8> {
    let service = build_service(source)?;
    println!("{}", render(&service.resources(), true)?);
    Ok(())
}
