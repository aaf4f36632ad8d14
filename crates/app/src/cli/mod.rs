use clap::{Args, Parser, Subcommand};
use rave_app::{
    auth::{OpenBaoClient, OpenBaoConfig},
    database,
};
use sqlx::PgPool;

mod token;
mod user;

#[derive(Debug, Parser)]
#[command(name = "rave-app", about = "RAVE administration CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Token(token::TokenCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Token(command) => token::run(command).await,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

impl DatabaseArgs {
    pub(crate) async fn connect(&self) -> Result<PgPool, String> {
        database::connect(&self.database_url)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))
    }
}

#[derive(Debug, Args)]
pub(crate) struct OpenBaoArgs {
    /// OpenBao server address
    #[arg(long, env = "OPENBAO_ADDR")]
    openbao_addr: String,

    /// OpenBao authentication token
    #[arg(long, env = "OPENBAO_TOKEN", hide_env_values = true)]
    openbao_token: String,

    /// OpenBao Transit key name
    #[arg(long, env = "OPENBAO_TRANSIT_KEY")]
    openbao_transit_key: String,
}

impl OpenBaoArgs {
    pub(crate) fn client(self) -> OpenBaoClient {
        OpenBaoClient::new(OpenBaoConfig {
            addr: self.openbao_addr,
            token: self.openbao_token,
            transit_key: self.openbao_transit_key,
        })
    }
}
