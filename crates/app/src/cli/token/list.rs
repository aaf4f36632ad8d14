use clap::Args;
use rave_app::{auth::PgAuthRepository, domain::users::records::UserUuid};
use uuid::Uuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct ListTokensArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// User UUID whose tokens should be listed
    #[arg(long)]
    user_uuid: Uuid,
}

pub(crate) async fn run(args: ListTokensArgs) -> Result<(), String> {
    let pool = args.database.connect().await?;

    let tokens = PgAuthRepository::new(pool)
        .list_api_tokens(UserUuid::from_uuid(args.user_uuid))
        .await
        .map_err(|error| format!("failed to list tokens: {error}"))?;

    if tokens.is_empty() {
        println!("no tokens found for user {}", args.user_uuid);
        return Ok(());
    }

    for token in tokens {
        println!("token_uuid: {}", token.uuid);
        println!("user_uuid: {}", token.user_uuid);
        println!("token_version: {}", token.version.as_i16());
        println!("created_at: {}", token.created_at);
        println!(
            "last_used_at: {}",
            token
                .last_used_at
                .map_or_else(|| "never".to_string(), |value| value.to_string())
        );
        println!(
            "expires_at: {}",
            token
                .expires_at
                .map_or_else(|| "none".to_string(), |value| value.to_string())
        );
        println!(
            "revoked_at: {}",
            token
                .revoked_at
                .map_or_else(|| "active".to_string(), |value| value.to_string())
        );
        println!();
    }

    Ok(())
}
