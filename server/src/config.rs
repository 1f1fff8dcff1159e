use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment, Provider,
};
use serde::{Deserialize, Serialize};

use crate::identity::DEFAULT_AVATAR_URL_TEMPLATE;

/// Command-line flags. Only flags actually passed are serialized, so an
/// absent flag never masks a value from the TOML file or the environment.
#[derive(Parser, Serialize, Clone, Debug)]
#[command(name = "relay-server", version, about = "Real-time chat relay server")]
pub struct CliArgs {
    /// Port to listen on [default: 5000]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Bind address [default: 0.0.0.0]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_address: Option<String>,

    /// Path to TOML config file
    #[arg(long, default_value = "./relay.toml")]
    #[serde(skip)]
    pub config: String,

    /// Enable structured JSON logging (for Docker/production)
    #[arg(long)]
    #[serde(skip_serializing_if = "is_false")]
    pub json_logs: bool,

    /// Output a commented TOML config template and exit
    #[arg(long)]
    #[serde(skip)]
    pub generate_config: bool,

    /// Avatar URL template; `{category}` and `{username}` are substituted
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url_template: Option<String>,

    /// Seed for identity generation (random from the OS when unset)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,

    /// Seconds between server pings on each WebSocket [default: 30]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping_interval_secs: Option<u64>,

    /// Seconds to wait for a pong before closing the socket [default: 10]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pong_timeout_secs: Option<u64>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Resolved server configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,
    pub json_logs: bool,
    pub avatar_url_template: String,
    #[serde(default)]
    pub rng_seed: Option<u64>,
    pub ping_interval_secs: u64,
    pub pong_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            bind_address: "0.0.0.0".to_string(),
            json_logs: false,
            avatar_url_template: DEFAULT_AVATAR_URL_TEMPLATE.to_string(),
            rng_seed: None,
            ping_interval_secs: 30,
            pong_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load config with layered precedence:
    /// built-in defaults < TOML file < env vars (RELAY_*) < CLI args
    pub fn load(cli: &CliArgs) -> Result<Self, figment::Error> {
        Self::figment(cli, Env::prefixed("RELAY_")).extract()
    }

    fn figment(cli: &CliArgs, env: impl Provider) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&cli.config))
            .merge(env)
            .merge(Serialized::defaults(cli))
    }
}

/// Generate a commented TOML config template
pub fn generate_config_template() -> String {
    r#"# Chat Relay Server Configuration
# Place this file at ./relay.toml or specify with --config <path>
# All settings can be overridden via environment variables (RELAY_PORT, etc.)
# or CLI flags (--port, etc.)

# Server port (default: 5000)
# port = 5000

# Bind address (default: 0.0.0.0, all interfaces)
# bind_address = "0.0.0.0"

# Enable structured JSON logging for Docker/production
# json_logs = false

# Avatar service URL; {category} is "girl" or "boy", {username} the display name
# avatar_url_template = "https://avatar.iran.liara.run/public/{category}?username={username}"

# Fixed seed for identity generation (useful for reproducible demos)
# rng_seed = 1234

# ---- WebSocket liveness ----
# ping_interval_secs = 30
# pong_timeout_secs = 10
"#
    .to_string()
}
