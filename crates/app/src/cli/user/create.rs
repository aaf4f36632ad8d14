use clap::Args;
use rave_app::domain::users::{
    PgUsersService, UsersService,
    data::NewUser,
    records::{UserRole, UserUuid},
};
use uuid::Uuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Display name
    #[arg(long)]
    name: String,

    /// Email address; must be unique
    #[arg(long)]
    email: String,

    /// One of creator, sales_agent, company, freelancer, client, admin
    #[arg(long, value_parser = parse_role)]
    role: UserRole,

    /// Optional user UUID; generated when omitted
    #[arg(long)]
    user_uuid: Option<Uuid>,
}

fn parse_role(value: &str) -> Result<UserRole, String> {
    value.parse().map_err(|error| format!("{error}"))
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let pool = args.database.connect().await?;

    let user = PgUsersService::new(pool)
        .create_user(NewUser {
            uuid: args.user_uuid.map_or_else(UserUuid::new, UserUuid::from_uuid),
            name: args.name,
            email: args.email,
            role: args.role,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_name: {}", user.name);
    println!("user_email: {}", user.email);
    println!("user_role: {}", user.role);

    Ok(())
}
