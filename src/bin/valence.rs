//! `valence`: command-line front end for the Valence API.
//!
//! Resources are printed as JSON on stdout. Failures are printed as a single
//! line on stderr and the process exits with status 1.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde_json::{json, Map, Value};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use valence_client::{
    BaseUrl, Client, ConfigError, HttpError, Resource, ResourceError, ValenceConfig,
};

/// Command-line client for the Valence composition service.
#[derive(Parser, Debug)]
#[command(name = "valence", version, about, long_about = None)]
struct Cli {
    /// Valence API endpoint, e.g. http://valence.local:8181
    #[arg(long, value_name = "URL")]
    valence_url: String,

    /// Retries after a connection failure.
    #[arg(long, default_value_t = 5)]
    max_retries: u32,

    /// Seconds between retries (at least 1).
    #[arg(long, value_name = "SECONDS", default_value_t = 2)]
    retry_interval: u64,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECONDS", default_value_t = 60)]
    timeout: u64,

    /// Log requests and responses to stderr.
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage pod managers.
    #[command(subcommand)]
    Podmanager(PodManagerCommand),
    /// Manage composed nodes.
    #[command(subcommand)]
    Node(NodeCommand),
    /// Manage flavors.
    #[command(subcommand)]
    Flavor(FlavorCommand),
    /// Inspect systems.
    #[command(subcommand)]
    System(SystemCommand),
}

#[derive(Subcommand, Debug)]
enum PodManagerCommand {
    /// List pod managers.
    List,
    /// Show one pod manager.
    Show { id: String },
    /// Register a pod manager.
    Create {
        name: String,
        /// Redfish endpoint of the pod manager.
        url: String,
        #[arg(long, default_value = "redfishv1")]
        driver: String,
        #[arg(long)]
        username: Option<String>,
        #[arg(long, requires = "username")]
        password: Option<String>,
    },
    /// Update a pod manager.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        driver: Option<String>,
    },
    /// Delete one or more pod managers.
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Repeatable requirement groups.
#[derive(Args, Debug, Default)]
struct Requirements {
    /// Processor requirement, e.g. --processor model=Xeon
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    processor: Vec<(String, String)>,
    /// Memory requirement, e.g. --memory capacity_mib=4096
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    memory: Vec<(String, String)>,
}

#[derive(Subcommand, Debug)]
enum NodeCommand {
    /// List composed nodes.
    List,
    /// Show one node.
    Show { id: String },
    /// Compose a node from a flavor or from explicit requirements.
    Compose {
        name: String,
        #[arg(long)]
        flavor_id: Option<String>,
        #[arg(long)]
        podm_id: Option<String>,
        #[command(flatten)]
        requirements: Requirements,
    },
    /// Delete (disassemble) one or more nodes.
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Bring an existing node under Valence management.
    Manage { node_index: String, podm_id: String },
}

#[derive(Subcommand, Debug)]
enum FlavorCommand {
    /// List flavors.
    List,
    /// Show one flavor.
    Show { id: String },
    /// Create a flavor.
    Create {
        name: String,
        #[command(flatten)]
        requirements: Requirements,
        /// Storage requirement, e.g. --storage capacity_gib=100
        #[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_value)]
        storage: Vec<(String, String)>,
    },
    /// Update a flavor.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        requirements: Requirements,
        #[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_value)]
        storage: Vec<(String, String)>,
    },
    /// Delete one or more flavors.
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum SystemCommand {
    /// List systems.
    List {
        #[arg(long)]
        podm_id: Option<String>,
    },
    /// Show one system.
    Show {
        id: String,
        #[arg(long)]
        podm_id: Option<String>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("Unable to delete {failed} of {total} {kind}(s)")]
    Delete {
        kind: &'static str,
        failed: usize,
        total: usize,
    },
    #[error("Unable to render output: {0}")]
    Output(#[from] serde_json::Error),
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

fn group(pairs: &[(String, String)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

/// Builds `{"processor": {...}, "memory": {...}, "storage": {...}}`,
/// leaving out empty groups.
fn properties(requirements: &Requirements, storage: &[(String, String)]) -> Map<String, Value> {
    let mut properties = Map::new();
    for (name, pairs) in [
        ("processor", requirements.processor.as_slice()),
        ("memory", requirements.memory.as_slice()),
        ("storage", storage),
    ] {
        if !pairs.is_empty() {
            properties.insert(name.to_string(), Value::Object(group(pairs)));
        }
    }
    properties
}

fn print_one<R: AsRef<Resource>>(resource: &R) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(resource.as_ref().attributes())?);
    Ok(())
}

fn print_many<R: AsRef<Resource>>(resources: &[R]) -> Result<(), CliError> {
    let items: Vec<&Map<String, Value>> =
        resources.iter().map(|r| r.as_ref().attributes()).collect();
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

fn print_found<R: AsRef<Resource>>(
    resource: Option<R>,
    kind: &'static str,
    id: &str,
) -> Result<(), CliError> {
    match resource {
        Some(resource) => print_one(&resource),
        None => Err(CliError::NotFound {
            kind,
            id: id.to_string(),
        }),
    }
}

/// Attempts every deletion, reporting each failure, and fails if any did.
async fn delete_all<F, Fut>(kind: &'static str, ids: &[String], delete: F) -> Result<(), CliError>
where
    F: Fn(String) -> Fut,
    Fut: std::future::Future<Output = Result<(), ResourceError>>,
{
    let mut failed = 0;
    for id in ids {
        match delete(id.clone()).await {
            Ok(()) => println!("Deleted {kind} {id}"),
            Err(e) => {
                failed += 1;
                eprintln!("Failed to delete {kind} {id}: {e}");
            }
        }
    }
    if failed > 0 {
        return Err(CliError::Delete {
            kind,
            failed,
            total: ids.len(),
        });
    }
    Ok(())
}

fn object(value: &Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

async fn run_podmanager(client: &Client, command: PodManagerCommand) -> Result<(), CliError> {
    let pod_managers = &client.pod_managers;
    match command {
        PodManagerCommand::List => print_many(&pod_managers.list_podmanagers().await?),
        PodManagerCommand::Show { id } => {
            print_found(pod_managers.show_podmanager(&id).await?, "pod manager", &id)
        }
        PodManagerCommand::Create {
            name,
            url,
            driver,
            username,
            password,
        } => {
            let mut request = object(&json!({ "name": name, "url": url, "driver": driver }));
            if let Some(username) = username {
                request.insert(
                    "authentication".to_string(),
                    json!([{
                        "type": "basic",
                        "auth_items": {"username": username, "password": password.unwrap_or_default()}
                    }]),
                );
            }
            print_one(&pod_managers.create_podmanager(request).await?)
        }
        PodManagerCommand::Update {
            id,
            name,
            url,
            driver,
        } => {
            let mut patch = Map::new();
            for (key, value) in [("name", name), ("url", url), ("driver", driver)] {
                if let Some(value) = value {
                    patch.insert(key.to_string(), Value::String(value));
                }
            }
            let updated = pod_managers
                .update_podmanager(&id, &Value::Object(patch))
                .await?;
            print_found(updated, "pod manager", &id)
        }
        PodManagerCommand::Delete { ids } => {
            delete_all("pod manager", &ids, |id| async move {
                pod_managers.delete_podmanager(&id).await
            })
            .await
        }
    }
}

async fn run_node(client: &Client, command: NodeCommand) -> Result<(), CliError> {
    let nodes = &client.nodes;
    match command {
        NodeCommand::List => print_many(&nodes.list_nodes().await?),
        NodeCommand::Show { id } => print_found(nodes.show_node(&id).await?, "node", &id),
        NodeCommand::Compose {
            name,
            flavor_id,
            podm_id,
            requirements,
        } => {
            let mut request = Map::new();
            request.insert("name".to_string(), Value::String(name));
            if let Some(podm_id) = podm_id {
                request.insert("podm_id".to_string(), Value::String(podm_id));
            }
            match flavor_id {
                Some(flavor_id) => {
                    request.insert("flavor_id".to_string(), Value::String(flavor_id));
                }
                None => {
                    request.insert(
                        "properties".to_string(),
                        Value::Object(properties(&requirements, &[])),
                    );
                }
            }
            print_one(&nodes.compose_node(request).await?)
        }
        NodeCommand::Delete { ids } => {
            delete_all("node", &ids, |id| async move { nodes.delete_node(&id).await }).await
        }
        NodeCommand::Manage {
            node_index,
            podm_id,
        } => print_one(&nodes.manage_node(&node_index, &podm_id).await?),
    }
}

async fn run_flavor(client: &Client, command: FlavorCommand) -> Result<(), CliError> {
    let flavors = &client.flavors;
    match command {
        FlavorCommand::List => print_many(&flavors.list_flavors().await?),
        FlavorCommand::Show { id } => print_found(flavors.show_flavor(&id).await?, "flavor", &id),
        FlavorCommand::Create {
            name,
            requirements,
            storage,
        } => {
            let mut request = Map::new();
            request.insert("name".to_string(), Value::String(name));
            request.insert(
                "properties".to_string(),
                Value::Object(properties(&requirements, &storage)),
            );
            print_one(&flavors.create_flavor(request).await?)
        }
        FlavorCommand::Update {
            id,
            name,
            requirements,
            storage,
        } => {
            let mut patch = Map::new();
            if let Some(name) = name {
                patch.insert("name".to_string(), Value::String(name));
            }
            let properties = properties(&requirements, &storage);
            if !properties.is_empty() {
                patch.insert("properties".to_string(), Value::Object(properties));
            }
            let updated = flavors.update_flavor(&id, &Value::Object(patch)).await?;
            print_found(updated, "flavor", &id)
        }
        FlavorCommand::Delete { ids } => {
            delete_all("flavor", &ids, |id| async move { flavors.delete_flavor(&id).await }).await
        }
    }
}

async fn run_system(client: &Client, command: SystemCommand) -> Result<(), CliError> {
    let systems = &client.systems;
    match command {
        SystemCommand::List { podm_id } => {
            let filters: Vec<(&str, &str)> =
                podm_id.as_deref().map(|p| ("podm_id", p)).into_iter().collect();
            print_many(&systems.list_systems(&filters).await?)
        }
        SystemCommand::Show { id, podm_id } => {
            let filters: Vec<(&str, &str)> =
                podm_id.as_deref().map(|p| ("podm_id", p)).into_iter().collect();
            print_found(systems.show_system(&id, &filters).await?, "system", &id)
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ValenceConfig::builder()
        .base_url(BaseUrl::new(cli.valence_url)?)
        .max_retries(cli.max_retries)
        .retry_interval(Duration::from_secs(cli.retry_interval))
        .timeout(Duration::from_secs(cli.timeout))
        .build()?;
    let client = Client::new(&config)?;

    match cli.command {
        Commands::Podmanager(command) => run_podmanager(&client, command).await,
        Commands::Node(command) => run_node(&client, command).await,
        Commands::Flavor(command) => run_flavor(&client, command).await,
        Commands::System(command) => run_system(&client, command).await,
    }
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("valence_client={level},valence={level}")));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}
