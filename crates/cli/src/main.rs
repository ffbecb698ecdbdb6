mod host;
mod shell;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use opsdash_api::{CapabilitySource, DashboardClient, FileCapabilitySource};
use opsdash_engine::{CatalogLoader, Msg, NavigationSession, render_text};
use opsdash_registry::{DashboardConfig, IssueSeverity, NavigationTree, load_navigation};
use opsdash_types::{NavigationNode, SessionUser};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::host::Host;

/// Credential used when the catalog comes from a local file.
const OFFLINE_CREDENTIAL: &str = "offline";

#[derive(Debug, Parser)]
#[command(name = "opsdash", version, about = "Permission-gated dashboard navigation")]
struct Cli {
    /// Navigation tree (YAML or JSON); defaults to the configured or built-in menu
    #[arg(long, global = true, value_name = "FILE")]
    tree: Option<PathBuf>,
    /// Read the capability catalog from a JSON file instead of the API
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,
    /// Bearer credential for the permission service
    #[arg(long, global = true, env = "OPSDASH_API_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Permission service base URL
    #[arg(long, global = true, value_name = "URL")]
    api_base: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the sidebar for a user and route
    Sidebar(SidebarArgs),
    /// Validate and print the navigation tree
    Tree {
        #[arg(long)]
        json: bool,
    },
    /// List the capability catalog
    Capabilities {
        #[arg(long)]
        json: bool,
    },
    /// Drive a sidebar session interactively from stdin
    Shell,
}

#[derive(Debug, Args)]
struct SidebarArgs {
    #[arg(long, default_value = "/")]
    route: String,
    /// Capability ids granted to the user
    #[arg(long, value_delimiter = ',')]
    refs: Vec<String>,
    /// Render in collapsed-width mode
    #[arg(long)]
    collapsed: bool,
    /// Group to toggle after the route is applied; repeatable
    #[arg(long = "toggle", value_name = "NAME")]
    toggles: Vec<String>,
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = DashboardConfig::load();

    match &cli.command {
        Command::Sidebar(args) => run_sidebar(&cli, &config, args).await,
        Command::Tree { json } => run_tree(&cli, &config, *json),
        Command::Capabilities { json } => run_capabilities(&cli, &config, *json).await,
        Command::Shell => {
            let (mut host, receiver) = new_host(&cli, &config)?;
            if let Some(credential) = credential(&cli) {
                host.dispatch(Msg::CredentialChanged(Some(credential)));
            }
            shell::run(host, receiver).await
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_tree(cli: &Cli, config: &DashboardConfig) -> Result<Arc<NavigationTree>> {
    match &cli.tree {
        Some(path) => Ok(Arc::new(NavigationTree::from_path(path)?)),
        None => load_navigation(config),
    }
}

fn capability_source(cli: &Cli, config: &DashboardConfig) -> Result<Arc<dyn CapabilitySource>> {
    if let Some(path) = &cli.catalog {
        debug!(path = %path.display(), "reading capabilities from file");
        return Ok(Arc::new(FileCapabilitySource::new(path)));
    }
    let client = match &cli.api_base {
        Some(base) => DashboardClient::new(base)?,
        None => DashboardClient::from_env(config.api_base.as_deref())?,
    };
    let client = match &config.capabilities_path {
        Some(path) => client.with_capabilities_path(path.clone()),
        None => client,
    };
    Ok(Arc::new(client))
}

/// The session credential: the token, or a placeholder for file catalogs.
fn credential(cli: &Cli) -> Option<String> {
    cli.token
        .clone()
        .filter(|token| !token.trim().is_empty())
        .or_else(|| cli.catalog.as_ref().map(|_| OFFLINE_CREDENTIAL.to_string()))
}

fn new_host(cli: &Cli, config: &DashboardConfig) -> Result<(Host, tokio::sync::mpsc::UnboundedReceiver<Msg>)> {
    let session = NavigationSession::new(load_tree(cli, config)?).with_notification_ttl(config.notification_ttl());
    let loader = CatalogLoader::new(capability_source(cli, config)?);
    Ok(Host::new(session, loader))
}

async fn run_sidebar(cli: &Cli, config: &DashboardConfig, args: &SidebarArgs) -> Result<()> {
    let (mut host, mut receiver) = new_host(cli, config)?;

    host.dispatch(Msg::UserChanged(SessionUser::with_refs(args.refs.iter().map(String::as_str))));
    match credential(cli) {
        Some(credential) => host.dispatch(Msg::CredentialChanged(Some(credential))),
        None => warn!("no credential (use --token or OPSDASH_API_TOKEN); nothing is visible"),
    }
    host.settle(&mut receiver).await;

    host.dispatch(Msg::RouteChanged(args.route.clone()));
    for name in &args.toggles {
        host.dispatch(Msg::ToggleNode(name.clone()));
    }
    if args.collapsed && !host.session.expansion().collapsed_width() {
        host.dispatch(Msg::ToggleWidth);
    }

    let snapshot = host.session.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else if snapshot.rows.is_empty() {
        println!("(no accessible pages)");
    } else {
        print!("{}", render_text(&snapshot.rows));
    }
    Ok(())
}

fn run_tree(cli: &Cli, config: &DashboardConfig, json: bool) -> Result<()> {
    let tree = load_tree(cli, config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&*tree)?);
        return Ok(());
    }

    for (depth, node) in tree.iter() {
        println!("{}", describe_node(depth, node));
    }
    for issue in tree.validate() {
        if issue.severity() == IssueSeverity::Warning {
            eprintln!("warning: {issue}");
        }
    }
    let required: Vec<&str> = tree.required_capabilities().into_iter().collect();
    println!("\nrequired capabilities: {}", required.join(", "));
    Ok(())
}

fn describe_node(depth: usize, node: &NavigationNode) -> String {
    let mut line = format!("{}{}", "  ".repeat(depth), node.name);
    if let Some(path) = &node.path {
        line.push_str(&format!("  {path}"));
    }
    if let Some(capability) = node.required_capability_name() {
        line.push_str(&format!("  [{capability}]"));
    }
    line
}

async fn run_capabilities(cli: &Cli, config: &DashboardConfig, json: bool) -> Result<()> {
    let Some(credential) = credential(cli) else {
        bail!("a credential is required: pass --token or set OPSDASH_API_TOKEN");
    };
    let source = capability_source(cli, config)?;
    let records = source
        .fetch_capabilities(&credential)
        .await
        .context("Failed to load the capability catalog")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    for record in &records {
        let state = if record.active { "active" } else { "inactive" };
        println!("{}\t{}\t{state}", record.id, record.name);
    }
    Ok(())
}
