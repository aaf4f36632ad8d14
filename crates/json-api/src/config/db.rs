//! Database Config

use clap::Args;

/// Promotions database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string holding promotions, users and the error log
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}
