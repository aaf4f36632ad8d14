//! Auth Config

use clap::Args;

use rave_app::auth::OpenBaoConfig;

/// `OpenBao` settings used to verify bearer API tokens.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// `OpenBao` server address
    #[arg(long, env = "OPENBAO_ADDR")]
    pub addr: String,

    /// `OpenBao` authentication token
    #[arg(long, env = "OPENBAO_TOKEN", hide_env_values = true)]
    pub token: String,

    /// `OpenBao` Transit key used to verify API tokens
    #[arg(long, env = "OPENBAO_TRANSIT_KEY")]
    pub transit_key: String,
}

impl From<AuthConfig> for OpenBaoConfig {
    fn from(config: AuthConfig) -> Self {
        OpenBaoConfig {
            addr: config.addr,
            token: config.token,
            transit_key: config.transit_key,
        }
    }
}
