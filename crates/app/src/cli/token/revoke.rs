use clap::Args;
use rave_app::auth::PgAuthRepository;
use uuid::Uuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct RevokeTokenArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Token UUID to revoke
    #[arg(long)]
    token_uuid: Uuid,
}

pub(crate) async fn run(args: RevokeTokenArgs) -> Result<(), String> {
    let pool = args.database.connect().await?;

    let revoked = PgAuthRepository::new(pool)
        .revoke_api_token(args.token_uuid)
        .await
        .map_err(|error| format!("failed to revoke token: {error}"))?
        .is_some();

    if revoked {
        println!("revoked token {}", args.token_uuid);
    } else {
        println!("token {} was not active", args.token_uuid);
    }

    Ok(())
}
