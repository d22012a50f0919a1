// provider-proxy - Multi-provider AI chat and image proxy
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use provider_proxy::cli::{Args, Command};
use provider_proxy::client::{ChatTransport, DirectTransport, FallbackChat, ProxyTransport, ReplySource};
use provider_proxy::config::AppConfig;
use provider_proxy::models::ChatProvider;
use provider_proxy::proxy::ProviderProxy;
use provider_proxy::server::create_router;
use provider_proxy::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load .env (optional) and configuration
    if let Ok(path) = dotenvy::dotenv() {
        eprintln!("Loaded environment from {}", path.display());
    }
    let mut config = AppConfig::load()?;

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting provider-proxy v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        None => serve(config).await,
        Some(Command::Serve { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Some(Command::Chat {
            provider,
            model,
            proxy_url,
            multiturn,
            direct,
        }) => chat(config, &provider, model, &proxy_url, multiturn, direct).await,
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    let config = Arc::new(config);

    // Phase 3: Build and start HTTP server
    let app = create_router(config.clone())?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Provider proxy listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 4: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn chat(
    config: AppConfig,
    provider: &str,
    model: Option<String>,
    proxy_url: &str,
    multiturn: bool,
    direct: bool,
) -> Result<()> {
    let provider: ChatProvider = provider.parse()?;

    // Keys from the local environment play the role of client-held keys
    let direct_transport: Box<dyn ChatTransport> =
        Box::new(DirectTransport::new(ProviderProxy::new(Arc::new(config))?));

    let session = if direct {
        FallbackChat::new(direct_transport, provider)
    } else {
        FallbackChat::new(Box::new(ProxyTransport::new(proxy_url)?), provider)
            .with_fallback(direct_transport)
    };
    let mut session = session.with_model(model).with_multiturn(multiturn);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("Chatting with {} (empty line or Ctrl+D to quit)\n> ", provider).as_bytes())
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            break;
        }

        let reply = session.send(text).await;
        for notice in &reply.notices {
            warn!("{}", notice);
        }
        let prefix = match reply.source {
            ReplySource::Canned => "(offline) ",
            _ => "",
        };
        stdout
            .write_all(format!("{}{}\n> ", prefix, reply.text).as_bytes())
            .await?;
        stdout.flush().await?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
