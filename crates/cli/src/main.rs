//! `rdispatch` entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: load the optional TOML file and apply
//!    command-line overrides.
//! 2. **Wire observability**: configure `tracing-subscriber` (text or JSON)
//!    and, when an OTLP endpoint is set, an OpenTelemetry exporter.
//! 3. **Run a command**:
//!    - `serve`: expose a dispatch core over HTTP. With `--upstream` the core
//!      forwards every request to a remote peer; otherwise it echoes.
//!    - `call`: send one request to a remote peer and print the outcome.

mod config;
mod echo;
mod telemetry;

use std::io::Write as _;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand, ValueEnum};
use dispatch::{Address, ContentKind, Context, Credentials, Request, Sink};
use http_adapter::{parse_duration, RemoteDest, RemoteDispatcher, ReqwestTransport};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::FileConfig;
use crate::echo::EchoCore;
use crate::telemetry::LogFormat;

/// Serve or call a dispatch core over HTTP.
#[derive(Parser)]
#[command(name = "rdispatch", version, about, long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "RDISPATCH_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log output format (overrides the config file).
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    /// OTLP collector endpoint (overrides the config file).
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT", global = true)]
    otlp_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve a dispatch core over HTTP.
    Serve {
        /// Listen address (overrides `server.bind_addr`).
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Forward every request to this peer instead of echoing.
        #[arg(short, long)]
        upstream: Option<String>,
    },

    /// Send one request to a remote peer.
    Call {
        /// Base address of the peer, e.g. `http://127.0.0.1:8080/`.
        url: String,

        /// Request address (path and query), e.g. `/svc/op?id=1`.
        address: String,

        /// Fire-and-acknowledge instead of waiting for a result.
        #[arg(long)]
        send: bool,

        /// Request body.
        #[arg(short, long)]
        data: Option<String>,

        /// Content kind of the body.
        #[arg(long = "content-type", value_enum, default_value = "bytes")]
        kind: KindArg,

        /// Deadline propagated to the peer, e.g. `1.5s`.
        #[arg(short, long, value_parser = parse_duration)]
        timeout: Option<Duration>,

        /// Username for basic credentials.
        #[arg(short, long)]
        user: Option<String>,

        /// Secret for basic credentials.
        #[arg(long, env = "RDISPATCH_PASSWORD", requires = "user", hide_env_values = true)]
        password: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Bytes,
    Text,
    Structured,
}

impl From<KindArg> for ContentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Bytes => ContentKind::RawBytes,
            KindArg::Text => ContentKind::Text,
            KindArg::Structured => ContentKind::StructuredBinary,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = FileConfig::load(cli.config.as_deref())?;
    if let Some(format) = cli.log_format {
        config.telemetry.log_format = format;
    }
    if cli.otlp_endpoint.is_some() {
        config.telemetry.otlp_endpoint = cli.otlp_endpoint;
    }

    let telemetry = telemetry::init(&config.telemetry)?;
    let result = run(cli.command, config).await;
    telemetry.shutdown();
    result
}

async fn run(command: Commands, config: FileConfig) -> anyhow::Result<()> {
    match command {
        Commands::Serve { bind, upstream } => serve(config, bind, upstream).await,
        Commands::Call {
            url,
            address,
            send,
            data,
            kind,
            timeout,
            user,
            password,
        } => {
            let address = Address::new(address).context("request address must not be empty")?;
            let mut request = Request::new(address);
            if let Some(data) = data {
                request = request.with_body(Sink::new(data.into_bytes(), kind.into()));
            }
            if let Some(user) = user {
                request = request.with_credentials(Credentials::new(user, password.unwrap_or_default()));
            }
            if let Some(timeout) = timeout {
                request = request.with_deadline(timeout);
            }
            call(config, url, request, send).await
        }
    }
}

async fn serve(
    config: FileConfig,
    bind: Option<SocketAddr>,
    upstream: Option<String>,
) -> anyhow::Result<()> {
    let mut server_config = config.server;
    if let Some(bind) = bind {
        server_config.bind_addr = bind;
    }
    server_config.validate()?;

    let listener = TcpListener::bind(server_config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", server_config.bind_addr))?;

    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
        }
    };

    match upstream {
        Some(upstream) => {
            info!(%upstream, "forwarding to upstream peer");
            let transport = ReqwestTransport::from_config(&config.client)?;
            let core = Arc::new(RemoteDest::with_transport(upstream, transport));
            Arc::new(RemoteDispatcher::with_config(core, &server_config))
                .serve(listener, shutdown)
                .await?;
        }
        None => {
            info!("serving built-in echo core");
            Arc::new(RemoteDispatcher::with_config(Arc::new(EchoCore), &server_config))
                .serve(listener, shutdown)
                .await?;
        }
    }
    Ok(())
}

async fn call(config: FileConfig, url: String, request: Request, send: bool) -> anyhow::Result<()> {
    let transport = ReqwestTransport::from_config(&config.client)?;
    let dest = RemoteDest::with_transport(url, transport);

    let response = if send {
        dest.send(request).await
    } else {
        dest.call(&Context::default(), request).await
    };

    if let Some(err) = response.error {
        bail!("remote request failed: {err}");
    }
    if let Some(body) = response.body {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(body.payload())?;
        stdout.flush()?;
    }
    Ok(())
}
