//! `supabridge` command-line entry point.
//!
//! ```text
//! supabridge [--config <path>] [--bind <addr>] [serve]
//! supabridge verify [--project-url <url> --api-key <key>]
//! supabridge organizations
//! supabridge regions
//! supabridge provision --name <name> --region <region> --db-pass <password>
//! ```
//!
//! Without a subcommand the HTTP service is started.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use supabridge::api::{AppState, router};
use supabridge::config::AppConfig;
use supabridge::credentials::{
    adapters::FileKeyValueStore,
    domain::{ConnectionConfig, ManagementKey},
    ports::KeyValueStore,
    services::CredentialVault,
};
use supabridge::executor::domain::SqlSanitizer;
use supabridge::platform::adapters::http::{
    HttpDataApiConnector, HttpManagementApi, HttpOAuthClient, build_client,
};
use supabridge::platform::ports::DataApiConnector;
use supabridge::provisioning::{
    adapters::TracingProgressSink,
    services::{CreateProjectRequest, ProvisioningService},
};
use supabridge::verification::{ConnectionVerifier, Verification};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum CliError {
    #[error("no project connection is stored; pass --project-url and --api-key")]
    MissingConnection,
    #[error("connection could not be verified: {0}")]
    Unverified(String),
}

#[derive(Debug, Parser)]
#[command(name = "supabridge", version, about = "Hosted Postgres bridge for coding assistants")]
struct Cli {
    /// Configuration file (defaults to `supabridge.toml` when present).
    #[arg(long, env = "SUPABRIDGE_CONFIG")]
    config: Option<Utf8PathBuf>,
    /// Listen address, overriding the configuration.
    #[arg(long)]
    bind: Option<SocketAddr>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API.
    Serve,
    /// Verify a connection, defaulting to the stored one.
    Verify {
        /// Project URL to verify.
        #[arg(long, requires = "api_key")]
        project_url: Option<String>,
        /// Data API key to verify.
        #[arg(long, requires = "project_url")]
        api_key: Option<String>,
        /// Store the connection when it verifies.
        #[arg(long)]
        save: bool,
    },
    /// List organizations visible to the stored management key.
    Organizations {
        /// Management key to store before listing.
        #[arg(long, env = "SUPABRIDGE_MANAGEMENT_KEY", hide_env_values = true)]
        management_key: Option<String>,
    },
    /// List regions a project can be created in.
    Regions,
    /// Create a project and make it the active connection.
    Provision {
        /// Project name.
        #[arg(long)]
        name: String,
        /// Region identifier, such as `us-east-1`.
        #[arg(long)]
        region: String,
        /// Database password.
        #[arg(long, env = "SUPABRIDGE_DB_PASS", hide_env_values = true)]
        db_pass: String,
        /// Organization id; the first visible organization otherwise.
        #[arg(long)]
        organization: Option<String>,
        /// Billing plan.
        #[arg(long)]
        plan: Option<String>,
        /// Management key to store before provisioning.
        #[arg(long, env = "SUPABRIDGE_MANAGEMENT_KEY", hide_env_values = true)]
        management_key: Option<String>,
    },
}

struct Services {
    config: AppConfig,
    vault: CredentialVault<dyn KeyValueStore>,
    management: Arc<HttpManagementApi>,
    oauth: Arc<HttpOAuthClient>,
    connector: Arc<HttpDataApiConnector>,
}

impl Services {
    fn build(config: AppConfig) -> Result<Self, BoxError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::open(&config.credentials_dir)?);
        let plain_vault = CredentialVault::new(store);
        let vault = match config.obfuscator() {
            Some(obfuscator) => plain_vault.with_obfuscator(obfuscator),
            None => plain_vault,
        };
        let client = build_client()?;
        Ok(Self {
            management: Arc::new(HttpManagementApi::new(
                client.clone(),
                &config.management_api_url,
            )?),
            oauth: Arc::new(HttpOAuthClient::new(
                client.clone(),
                config.oauth_token_url.clone(),
            )),
            connector: Arc::new(HttpDataApiConnector::new(client)),
            vault,
            config,
        })
    }

    fn provisioning(&self) -> ProvisioningService<HttpManagementApi, dyn KeyValueStore> {
        ProvisioningService::new(
            Arc::clone(&self.management),
            self.vault.clone(),
            self.config.poll_policy(),
        )
    }

    async fn store_management_key(&self, raw: Option<String>) -> Result<(), BoxError> {
        if let Some(value) = raw {
            self.vault
                .save_management_key(&ManagementKey::new(value)?)
                .await?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    supabridge::telemetry::init()?;
    let config = AppConfig::load(cli.config.as_deref())?;
    let bind = cli.bind.unwrap_or(config.bind_address);
    let services = Services::build(config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(services, bind).await,
        Command::Verify {
            project_url,
            api_key,
            save,
        } => verify(&services, project_url.zip(api_key), save).await,
        Command::Organizations { management_key } => {
            services.store_management_key(management_key).await?;
            organizations(&services).await
        }
        Command::Regions => regions(&services).await,
        Command::Provision {
            name,
            region,
            db_pass,
            organization,
            plan,
            management_key,
        } => {
            services.store_management_key(management_key).await?;
            let base = CreateProjectRequest::new(name, region, db_pass);
            let with_org = match organization {
                Some(id) => base.with_organization(id),
                None => base,
            };
            let request = match plan {
                Some(tier) => with_org.with_plan(tier),
                None => with_org,
            };
            provision(&services, request).await
        }
    }
}

async fn serve(services: Services, bind: SocketAddr) -> Result<(), BoxError> {
    let state = AppState::new(
        services.vault,
        services.management,
        services.oauth,
        services.connector,
        services.config.oauth_urls(),
        services.config.schema_cache_ttl(),
        SqlSanitizer::new()?,
    );
    let listener = TcpListener::bind(bind).await?;
    info!(address = %bind, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn verify(
    services: &Services,
    supplied: Option<(String, String)>,
    save: bool,
) -> Result<(), BoxError> {
    let connection = match supplied {
        Some((project_url, api_key)) => ConnectionConfig::parse(project_url, api_key)?,
        None => services
            .vault
            .connection()
            .await?
            .ok_or(CliError::MissingConnection)?,
    };
    let connector: Arc<dyn DataApiConnector> = Arc::<HttpDataApiConnector>::clone(&services.connector);
    let verifier = ConnectionVerifier::new(connector);
    let verification = verifier.verify_config(&connection).await;
    write_json(&verification)?;
    match verification {
        Verification::Verified { .. } => {
            if save {
                services.vault.save_connection(&connection).await?;
            }
            Ok(())
        }
        Verification::Unverified { reason } => Err(CliError::Unverified(reason).into()),
    }
}

async fn organizations(services: &Services) -> Result<(), BoxError> {
    write_json(&services.provisioning().organizations().await?)
}

async fn regions(services: &Services) -> Result<(), BoxError> {
    write_json(&services.provisioning().regions().await?)
}

async fn provision(services: &Services, request: CreateProjectRequest) -> Result<(), BoxError> {
    let service = services.provisioning();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.cancel();
    });

    let project = service
        .create_project(request, &TracingProgressSink, &cancel)
        .await?;
    if !project.bootstrap.is_complete() {
        warn!(
            failed = project.bootstrap.failed.len(),
            "baseline schema partially applied"
        );
    }
    write_json(&project)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c");
    }
}

fn write_json(value: &impl serde::Serialize) -> Result<(), BoxError> {
    let rendered = serde_json::to_string_pretty(value)?;
    writeln!(std::io::stdout().lock(), "{rendered}")?;
    Ok(())
}
