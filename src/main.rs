use anyhow::Context;
use clap::{Parser, Subcommand};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use paysuper_management_api::{
    api::{
        create_router,
        router::{format_route_table, RouteGroups},
        AppState,
    },
    application::gateway::{Gateway, RemoteServices},
    infrastructure::{
        micro_client::{BILLING_HANDLER, GEO_HANDLER, REPORTER_HANDLER, TAX_HANDLER},
        Auth1Client, MicroClient, S3Storage,
    },
    Config,
};

#[derive(Parser)]
#[command(name = "paysuper-management-api", version, about = "PaySuper management API gateway")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API (default)
    Http,
    /// Print the route table
    Routes {
        /// Write the table to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}

fn write_routes(output: Option<&Path>) -> anyhow::Result<()> {
    let table = format_route_table(&RouteGroups::build().route_table());
    match output {
        Some(path) => std::fs::write(path, table)
            .with_context(|| format!("failed to write route table to {}", path.display())),
        None => {
            print!("{table}");
            Ok(())
        }
    }
}

fn build_state(config: Config) -> anyhow::Result<AppState> {
    let http = Client::builder()
        .timeout(config.micro_request_timeout())
        .build()
        .context("failed to build HTTP client")?;

    let service = |name: &str, handler: &'static str| -> Arc<MicroClient> {
        Arc::new(MicroClient::new(
            http.clone(),
            &config.micro_api_url,
            name,
            handler,
            config.micro_request_timeout(),
        ))
    };

    let gateway = Gateway::new(RemoteServices {
        billing: service(&config.billing_service_name, BILLING_HANDLER),
        tax: service(&config.tax_service_name, TAX_HANDLER),
        geo: service(&config.geo_service_name, GEO_HANDLER),
        reporter: service(&config.reporter_service_name, REPORTER_HANDLER),
    });

    // Bucket transfers are not bounded by the RPC timeout
    let storage_http = Client::new();

    Ok(AppState {
        gateway,
        agreement_storage: Arc::new(S3Storage::new(
            storage_http.clone(),
            config.agreement_bucket.clone(),
        )),
        report_storage: Arc::new(S3Storage::new(storage_http, config.reporter_bucket.clone())),
        identity: Arc::new(Auth1Client::new(http.clone(), &config.auth1_issuer)),
        config: Arc::new(config),
    })
}

async fn serve(config: Config) -> anyhow::Result<()> {
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;
    info!(micro_api_url = %config.micro_api_url, "configuration loaded");

    if let Some(path) = &config.route_dump_path {
        write_routes(Some(path))?;
        info!(path = %path.display(), "route table written");
    }

    let listen_addr = config.listen_addr.clone();
    let app = create_router(build_state(config)?);

    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    info!(address = %listen_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Http) {
        Command::Http => {
            init_tracing();
            info!("starting management API");
            serve(Config::from_env()).await
        }
        Command::Routes { output } => write_routes(output.as_deref()),
    }
}
