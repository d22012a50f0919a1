// provider-proxy - Multi-provider AI chat and image proxy
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod metrics;
pub mod models;
pub mod proxy;
pub mod server;
pub mod translation;
pub mod upstream;
pub mod utils;
