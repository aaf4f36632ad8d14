use clap::Args;
use jiff::Timestamp;
use rave_app::{auth::PgAuthService, domain::users::records::UserUuid};
use uuid::Uuid;

use crate::cli::{DatabaseArgs, OpenBaoArgs};

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    #[command(flatten)]
    openbao: OpenBaoArgs,

    /// User UUID that should own the token
    #[arg(long)]
    user_uuid: Uuid,

    /// Optional token expiration timestamp (RFC 3339)
    #[arg(long)]
    token_expires_at: Option<String>,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    let token_expires_at = parse_token_expires_at(args.token_expires_at.as_deref())?;

    if let Some(expires_at) = token_expires_at.as_ref()
        && *expires_at <= Timestamp::now()
    {
        return Err("token-expires-at must be in the future".to_string());
    }

    let pool = args.database.connect().await?;
    let service = PgAuthService::new(pool, args.openbao.client());

    let issued = service
        .issue_api_token(UserUuid::from_uuid(args.user_uuid), token_expires_at)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("user_uuid: {}", issued.metadata.user_uuid);
    println!("token_version: {}", issued.metadata.version.as_i16());
    println!("token_created_at: {}", issued.metadata.created_at);
    if let Some(expires_at) = issued.metadata.expires_at {
        println!("token_expires_at: {expires_at}");
    }
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}

fn parse_token_expires_at(raw: Option<&str>) -> Result<Option<Timestamp>, String> {
    raw.map(|value| {
        value
            .parse::<Timestamp>()
            .map_err(|error| format!("invalid token-expires-at timestamp: {error}"))
    })
    .transpose()
}
