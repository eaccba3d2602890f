use clap::{Parser, Subcommand};
use libscry::{Credentials, Scry};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Scry - Container Registry Metadata Resolver
///
/// Discovers an organization's container image repositories, lists their
/// tags, and resolves human-readable descriptions without pulling images.
#[derive(Parser, Debug)]
#[command(name = "scry")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Organization whose packages are resolved
    #[arg(short, long, env = "SCRY_ORG")]
    org: String,

    /// Registry URL
    #[arg(long, env = "SCRY_REGISTRY")]
    registry: Option<String>,

    /// Package metadata API URL
    #[arg(long, env = "SCRY_API")]
    api: Option<String>,

    /// Path to a YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Access token for the registry and metadata API
    #[arg(long, env = "SCRY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Bypass the resolution cache
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the organization's packages
    #[command(visible_alias = "ls")]
    Packages {
        /// Resolve missing descriptions from the registry
        #[arg(long)]
        enrich: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List tags for an image, canonical order
    Tags {
        /// Image name (bare, org-prefixed, or a full reference)
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve the description of one image
    Describe {
        /// Image name (bare, org-prefixed, or a full reference)
        name: String,
        /// Tag to resolve
        #[arg(short, long, default_value = "latest")]
        tag: String,
    },
}

fn build_scry(cli: &Cli) -> libscry::Result<Scry> {
    let mut builder = Scry::builder().organization(&cli.org);

    if let Some(registry) = &cli.registry {
        builder = builder.registry_url(registry);
    }
    if let Some(api) = &cli.api {
        builder = builder.api_url(api);
    }
    if let Some(path) = &cli.config {
        builder = builder.with_config_file(path);
    }
    if let Some(token) = &cli.token {
        builder = builder.with_credentials(Credentials::basic("", token));
    }

    builder.build()
}

async fn run(cli: Cli) -> libscry::Result<()> {
    let scry = build_scry(&cli)?;
    let bypass = cli.no_cache;

    match cli.command {
        Commands::Packages { enrich, json } => {
            let mut packages = scry.list_packages(bypass).await;
            if enrich {
                packages = scry.enrich(packages, bypass).await;
            }

            if json {
                let rows: Vec<serde_json::Value> = packages
                    .iter()
                    .map(|entry| {
                        serde_json::json!({
                            "name": entry.name.to_string(),
                            "description": entry.description,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows).unwrap_or_default());
            } else if packages.is_empty() {
                eprintln!("{}", "no packages found".dimmed());
            } else {
                for entry in &packages {
                    if entry.description.is_empty() {
                        println!("{}", entry.name);
                    } else {
                        println!("{}  {}", entry.name, entry.description.dimmed());
                    }
                }
            }
        }
        Commands::Tags { name, json } => {
            let tags = scry.list_tags(&name, bypass).await?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&tags).unwrap_or_default()
                );
            } else {
                for tag in &tags {
                    println!("{}", tag);
                }
            }
        }
        Commands::Describe { name, tag } => {
            match scry.describe(&name, &tag, bypass).await? {
                Some(description) if !description.is_empty() => println!("{}", description),
                Some(_) => println!("{}", "(no description)".dimmed()),
                None => println!("{}", "(resolution failed)".dimmed()),
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
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
    fn test_parse_packages_command() {
        let cli = Cli::try_parse_from(["scry", "--org", "acme", "packages", "--enrich"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Packages { enrich: true, json: false }
        ));
    }

    #[test]
    fn test_parse_describe_defaults_to_latest() {
        let cli = Cli::try_parse_from(["scry", "--org", "acme", "describe", "web"]).unwrap();
        match cli.command {
            Commands::Describe { name, tag } => {
                assert_eq!(name, "web");
                assert_eq!(tag, "latest");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_org_is_required() {
        assert!(Cli::try_parse_from(["scry", "packages"]).is_err());
    }
}
