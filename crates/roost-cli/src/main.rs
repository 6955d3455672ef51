//! Roost CLI - inspect and dry-run a route authorization table
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. Environment variables (`ROOST_*`) (highest priority)
//! 2. Explicit file (`--config`)
//! 3. Project config (`.roost/config.toml` under `--project`)
//! 4. Global config (`~/.roost/config.toml`, unless `--no-global`)
//! 5. Default values (lowest priority)
//!
//! # Commands
//!
//! | Command | Output |
//! |---------|--------|
//! | `validate` | rule count, or the first configuration error |
//! | `match <path>` | JSON description of the matched rule |
//! | `gate <path>` | `allow` or `redirect <location>` |
//! | `permissions` | the catalog, JSON |
//! | `config` | effective configuration, TOML |

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use roost_auth::{
    catalog, Credentials, Resource, ResourceType, Role, RouteTable, SessionClaims,
};
use roost_runtime::auth::{InMemoryMemberships, StaticSessions};
use roost_runtime::config::{ConfigLoader, GateConfig};
use roost_runtime::enforcement::{Gate, GateOutcome};
use roost_runtime::routes::load_table;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Token under which the dry-run principal's session is registered.
const DRY_RUN_TOKEN: &str = "roost-cli";

/// Roost CLI - route authorization tooling
#[derive(Parser, Debug)]
#[command(name = "roost")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    project: Option<PathBuf>,

    /// Additional config file, applied after global and project config
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skip ~/.roost/config.toml
    #[arg(long, global = true)]
    no_global: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the effective route table
    Validate,

    /// Show which rule a path matches
    Match {
        /// Request path
        path: String,
    },

    /// Run the gate for a path with a made-up principal
    Gate {
        /// Request path
        path: String,

        /// Principal id; omit for an anonymous request
        #[arg(long)]
        principal: Option<String>,

        /// Role claim as an identity provider would send it
        #[arg(long, requires = "principal")]
        role: Option<String>,

        /// Active membership, as `type:id` (repeatable)
        #[arg(long = "member", value_name = "TYPE:ID", requires = "principal")]
        members: Vec<String>,
    },

    /// List the permission catalog
    Permissions {
        /// Only the permissions this role claim grants
        #[arg(long)]
        role: Option<String>,
    },

    /// Print the effective configuration
    Config,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<GateConfig> {
    let project_root = args.project.clone().unwrap_or_else(|| {
        std::env::current_dir().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to get current directory, using '.'");
            PathBuf::from(".")
        })
    });

    let mut loader = ConfigLoader::new().with_project_root(project_root);
    if args.no_global {
        loader = loader.skip_global_config();
    }
    if let Some(ref path) = args.config {
        loader = loader.with_config_file(path);
    }

    loader.load().context("Config error")
}

/// Parses a `type:id` membership argument.
fn parse_member(raw: &str) -> Result<Resource> {
    let Some((kind, id)) = raw.split_once(':') else {
        bail!("membership '{raw}' must look like TYPE:ID");
    };
    let Some(resource_type) = ResourceType::parse(kind) else {
        bail!("unknown resource type '{kind}'");
    };
    Resource::new(resource_type, id).with_context(|| format!("invalid membership '{raw}'"))
}

fn describe_match(table: &RouteTable, path: &str) -> Result<serde_json::Value> {
    let Some(m) = table.match_path(path) else {
        return Ok(serde_json::json!({ "path": path, "matched": null }));
    };

    let rule = m.rule();
    let resource = m
        .resource()
        .with_context(|| format!("route parameter in '{path}' is not a valid id"))?
        .map(|r| {
            serde_json::json!({
                "type": r.resource_type().as_str(),
                "id": r.id().as_str(),
            })
        });

    Ok(serde_json::json!({
        "path": path,
        "matched": m.pattern().as_str(),
        "public": m.is_public(),
        "permission": rule.required_permission,
        "resource": resource,
        "fallback": rule.fallback_path,
        "params": m.params(),
    }))
}

async fn dry_run_gate(
    config: GateConfig,
    path: &str,
    principal: Option<String>,
    role: Option<String>,
    members: &[String],
) -> Result<GateOutcome> {
    let sessions = StaticSessions::new();
    let memberships = Arc::new(InMemoryMemberships::new());

    let credentials = match principal {
        Some(ref id) => {
            sessions.insert(DRY_RUN_TOKEN, SessionClaims::new(id.as_str(), role.as_deref()));
            for raw in members {
                memberships.grant(id.as_str(), parse_member(raw)?);
            }
            Credentials::with_token(DRY_RUN_TOKEN)
        }
        None => Credentials::anonymous(),
    };

    let mut builder = Gate::builder(config).session_provider(Arc::new(sessions));
    for resource_type in ResourceType::ALL {
        builder = builder.oracle(resource_type, memberships.clone());
    }
    let gate = builder.build().context("Invalid gate configuration")?;

    Ok(gate.evaluate(path, &credentials).await)
}

fn list_permissions(role: Option<&str>) -> Result<serde_json::Value> {
    match role {
        // Unknown claims grant nothing.
        Some(claim) => Ok(serde_json::json!({
            "claim": claim,
            "role": Role::from_claim(claim).map(Role::as_str),
            "permissions": catalog::permissions_for_claim(claim).names(),
        })),
        None => Ok(serde_json::to_value(catalog::permissions_by_category())?),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let config = load_config(&args)?;

    match args.command {
        Command::Validate => {
            let table = load_table(&config).context("Invalid route table")?;
            let public = table.rules().filter(|r| r.is_public).count();
            println!(
                "Route table OK: {} rules ({} public, {} protected)",
                table.len(),
                public,
                table.len() - public
            );
        }
        Command::Match { ref path } => {
            let table = load_table(&config).context("Invalid route table")?;
            println!("{}", serde_json::to_string_pretty(&describe_match(&table, path)?)?);
        }
        Command::Gate {
            ref path,
            ref principal,
            ref role,
            ref members,
        } => {
            let outcome =
                dry_run_gate(config, path, principal.clone(), role.clone(), members).await?;
            match outcome {
                GateOutcome::Allow => println!("allow"),
                GateOutcome::Redirect(location) => println!("redirect {location}"),
            }
        }
        Command::Permissions { ref role } => {
            println!(
                "{}",
                serde_json::to_string_pretty(&list_permissions(role.as_deref())?)?
            );
        }
        Command::Config => {
            print!("{}", config.to_toml().context("Failed to serialize config")?);
        }
    }

    Ok(())
}
