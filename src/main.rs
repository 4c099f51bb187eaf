//! tileserve: local development server.
//!
//! # Architecture Overview
//!
//! ```text
//!   Browser ──▶ listener ──▶ CORS ──┬─▶ /proxy/...  ──▶ resolver ─▶ header filter
//!                                   │                   ─▶ upstream selector ─▶ forwarder ──▶ Remote
//!                                   │                                                (direct or via
//!                                   │                                                 upstream proxy)
//!                                   └─▶ everything else ──▶ gzip sniffer ─▶ static files (cwd)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use tileserve::config::validation::validate_config;
use tileserve::config::{load_config, ConfigError, LogFormat, ServerConfig};
use tileserve::http::HttpServer;
use tileserve::lifecycle::{signals, startup, Shutdown};
use tileserve::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "tileserve", version)]
#[command(about = "Development server for static 3D tiles with a cross-origin passthrough proxy")]
struct Cli {
    /// Port to listen on.
    #[arg(long)]
    port: Option<u16>,

    /// Run a public server that listens on all interfaces.
    #[arg(long)]
    public: bool,

    /// A standard proxy server that will be used to retrieve data.
    /// Specify a URL including port, e.g. "http://proxy:8000".
    #[arg(long, value_name = "URL")]
    upstream_proxy: Option<String>,

    /// A comma separated list of hosts that will bypass the specified
    /// upstream proxy, e.g. "lanhost1,lanhost2".
    #[arg(long, value_name = "HOSTS")]
    bypass_upstream_proxy_hosts: Option<String>,

    /// Directory to serve static files from.
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Optional TOML configuration file; flags override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if self.public {
            config.listener.public = true;
        }
        if let Some(upstream) = self.upstream_proxy {
            config.proxy.upstream_proxy = Some(upstream);
        }
        if let Some(hosts) = self.bypass_upstream_proxy_hosts {
            config.proxy.bypass_hosts = hosts
                .split(',')
                .filter(|h| !h.trim().is_empty())
                .map(str::to_owned)
                .collect();
        }
        if let Some(root) = self.root {
            config.static_files.root = root;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    cli.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);
    tracing::info!("tileserve v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener = startup::bind_listener(&config.listener).await?;
    let local_addr = listener.local_addr()?;
    let public = config.listener.public;

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    let server = HttpServer::new(config)?;
    startup::announce(local_addr, public);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Development server stopped.");
    Ok(())
}
