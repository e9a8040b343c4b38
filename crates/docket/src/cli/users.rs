//! the `users` subcommand - manage users
//!
//! the register endpoint is administrator-gated, so the very first
//! administrator has to come from here.

use clap::{Args, Subcommand};
use color_eyre::eyre::{bail, Context, Result};

use docket_db::Database;
use docket_types::{Role, UserId};

use crate::service::users as users_service;

use super::DbArgs;

/// manage users
#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// create a new user
    Create(CreateUserArgs),

    /// list all users
    List(ListUsersArgs),

    /// delete a user
    Delete(DeleteUserArgs),
}

/// create a new user
#[derive(Args, Debug)]
pub struct CreateUserArgs {
    #[command(flatten)]
    db: DbArgs,

    /// username
    username: String,

    /// password (hashed before storage)
    #[arg(long, env = "DOCKET_USER_PASSWORD")]
    password: String,

    /// role (administrator or viewer)
    #[arg(long, default_value = "viewer")]
    role: String,
}

/// list users
#[derive(Args, Debug)]
pub struct ListUsersArgs {
    #[command(flatten)]
    db: DbArgs,
}

/// delete a user
#[derive(Args, Debug)]
pub struct DeleteUserArgs {
    #[command(flatten)]
    db: DbArgs,

    /// user id to delete
    user_id: u64,
}

impl UsersCommand {
    /// run the users command
    pub async fn run(self) -> Result<()> {
        match self {
            UsersCommand::Create(args) => create_user(args).await,
            UsersCommand::List(args) => list_users(args).await,
            UsersCommand::Delete(args) => delete_user(args).await,
        }
    }
}

async fn create_user(args: CreateUserArgs) -> Result<()> {
    let role: Role = match args.role.parse() {
        Ok(role) => role,
        Err(e) => bail!("{}", e),
    };

    let db = args.db.connect().await?;

    let created = users_service::create_user(
        &db,
        users_service::CreateUser {
            username: args.username,
            password: args.password,
            role: Some(role),
        },
    )
    .await
    .context("failed to create user")?;

    println!("Created user:");
    println!("  ID:       {}", created.id.0);
    println!("  Username: {}", created.username);
    println!("  Role:     {}", created.role);

    Ok(())
}

async fn list_users(args: ListUsersArgs) -> Result<()> {
    let db = args.db.connect().await?;

    let users = db.list_users().await.context("failed to list users")?;

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!("{:<6} {:<24} {:<15}", "ID", "USERNAME", "ROLE");
    println!("{}", "-".repeat(45));

    for user in users {
        println!("{:<6} {:<24} {:<15}", user.id.0, user.username, user.role);
    }

    Ok(())
}

async fn delete_user(args: DeleteUserArgs) -> Result<()> {
    let db = args.db.connect().await?;

    let user = db
        .get_user(UserId(args.user_id))
        .await
        .context("failed to query user")?;

    if user.is_none() {
        bail!("user {} not found", args.user_id);
    }

    db.delete_user(UserId(args.user_id))
        .await
        .context("failed to delete user")?;

    println!("Deleted user {}", args.user_id);

    Ok(())
}
