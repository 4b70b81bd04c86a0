//! Process entry point
//!
//! Grounded on `examples/original_source/api/cmd/{root,server/server}.go`:
//! a `--config` path and a transport selector, here a `clap` subcommand
//! rather than an env var, since a flag is the idiomatic Rust CLI
//! equivalent. Wires the Postgres stores, the AMQP sink and one of the two
//! transports around a single `RotationService`.

use std::sync::Arc;

use banner_engine::RotationService;
use clap::{Parser, Subcommand};

/// Microservice banner-rotation.
#[derive(Debug, Parser)]
#[command(name = "banner-rotation", about = "Microservice banner-rotation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP/JSON server.
    HttpServer {
        /// Path to the TOML configuration file.
        #[arg(short, long, default_value = "config/development/config.toml")]
        config: String,
    },
    /// Run the gRPC server.
    GrpcServer {
        /// Path to the TOML configuration file.
        #[arg(short, long, default_value = "config/development/config.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Command::HttpServer { config } => run_http(&config).await,
        Command::GrpcServer { config } => run_grpc(&config).await,
    }
}

async fn build_service(config_path: &str) -> anyhow::Result<(Arc<RotationService>, banner_config::Config)> {
    let config = banner_config::Config::load(config_path)?;

    let pool = banner_postgres::connect_pool(&(&config.postgres).into())
        .await
        .map_err(|err| anyhow::anyhow!("failing to connect to the database {err}"))?;

    let rotations = Arc::new(banner_postgres::PostgresRotationStore::new(pool.clone()));
    let stats = Arc::new(banner_postgres::PostgresStatsStore::new(pool));

    let sink: Arc<dyn banner_core::EventSink> = match banner_rabbit::AmqpSink::connect(&config.rabbitmq).await {
        Ok(sink) => Arc::new(sink),
        Err(err) => {
            tracing::error!(error = %err, "failing to connect to rabbitmq; falling back to a log-only sink");
            Arc::new(banner_engine::NullSink)
        }
    };

    let service = Arc::new(RotationService::new(rotations, stats, sink));
    Ok((service, config))
}

async fn run_http(config_path: &str) -> anyhow::Result<()> {
    let (service, config) = build_service(config_path).await?;

    let app = banner_transport_http::router(service);
    let listener = tokio::net::TcpListener::bind(config.http_server.domain()).await?;

    tracing::info!(domain = %config.http_server.domain(), "starting http server");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn run_grpc(config_path: &str) -> anyhow::Result<()> {
    let (service, config) = build_service(config_path).await?;

    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(banner_transport_grpc::pb::FILE_DESCRIPTOR_SET)
        .build()?;

    let addr = config.grpc_server.domain().parse()?;
    tracing::info!(domain = %config.grpc_server.domain(), "starting grpc server");

    tonic::transport::Server::builder()
        .add_service(banner_transport_grpc::into_service(service))
        .add_service(reflection)
        .serve(addr)
        .await?;

    Ok(())
}
