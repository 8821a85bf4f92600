use clap::Subcommand;
use serde_json::json;

use crate::auth::password::hash_password;
use crate::cli::utils::{output_lines, output_success};
use crate::cli::OutputFormat;
use crate::state::AppState;
use crate::types::User;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user, or replace its password with --force")]
    Add {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Plaintext password, stored only as a salted hash")]
        password: String,
        #[arg(long, default_value = "admin", help = "Role carried in issued tokens")]
        role: String,
        #[arg(long, help = "Overwrite an existing user")]
        force: bool,
    },

    #[command(about = "Print the stored hash form of a password")]
    Hash {
        #[arg(help = "Plaintext password")]
        password: String,
    },

    #[command(about = "List usernames and roles")]
    List,
}

pub async fn handle(
    cmd: UserCommands,
    state: &AppState,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Add {
            username,
            password,
            role,
            force,
        } => {
            let username = username.trim().to_string();
            if username.is_empty() || password.is_empty() {
                anyhow::bail!("username and password must not be empty");
            }

            let user = User {
                username: username.clone(),
                password_hash: hash_password(&password, state.config.security.password_hash_cost)?,
                role: role.clone(),
            };
            let replaced = state
                .store
                .users
                .mutate(|users| {
                    match users.iter_mut().find(|u| u.username == user.username) {
                        Some(_) if !force => {
                            anyhow::bail!("user '{}' already exists (use --force)", user.username)
                        }
                        Some(existing) => {
                            *existing = user;
                            Ok(true)
                        }
                        None => {
                            users.push(user);
                            Ok(false)
                        }
                    }
                })
                .await?;

            let verb = if replaced { "Updated" } else { "Created" };
            output_success(
                &output_format,
                &format!("{} user '{}' with role '{}'", verb, username, role),
                Some(json!({ "username": username, "role": role, "replaced": replaced })),
            )
        }
        UserCommands::Hash { password } => {
            let hash = hash_password(&password, state.config.security.password_hash_cost)?;
            match output_format {
                OutputFormat::Text => {
                    println!("{}", hash);
                    Ok(())
                }
                OutputFormat::Json => {
                    output_success(&output_format, "Password hashed", Some(json!({ "hash": hash })))
                }
            }
        }
        UserCommands::List => {
            let users = state.store.users.snapshot().await;
            let lines: Vec<String> = users
                .iter()
                .map(|u| format!("{}\t{}", u.username, u.role))
                .collect();
            let data = users
                .iter()
                .map(|u| json!({ "username": u.username, "role": u.role }))
                .collect();
            output_lines(&output_format, &lines, serde_json::Value::Array(data))
        }
    }
}
