// CLI module for provider-proxy
// Author: kelexine (https://github.com/kelexine)

use clap::{Parser, Subcommand};

/// provider-proxy - Multi-provider AI chat and image proxy
#[derive(Parser, Debug)]
#[command(name = "provider-proxy", version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP proxy (default)
    Serve {
        /// Address to bind, overriding the configuration
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on, overriding `PORT`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Interactive chat through the proxy, falling back to direct provider calls
    Chat {
        /// huggingface, hf_router or openrouter
        #[arg(long, default_value = "huggingface")]
        provider: String,

        /// Model identifier; provider default when omitted
        #[arg(long)]
        model: Option<String>,

        /// Base URL of a running proxy
        #[arg(long, env = "PROVIDER_PROXY_URL", default_value = "http://localhost:3000")]
        proxy_url: String,

        /// Replay the recent transcript with each message
        #[arg(long)]
        multiturn: bool,

        /// Skip the proxy and call the provider directly
        #[arg(long)]
        direct: bool,
    },
}
