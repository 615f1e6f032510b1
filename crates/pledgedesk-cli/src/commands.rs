//! Command parsing and execution.

use std::io::{self, Write};

use anyhow::{anyhow, bail, Result};
use tracing::warn;

use pledgedesk_core::models::Credentials;
use pledgedesk_core::{App, AuthState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(Option<String>),
    Logout,
    Whoami,
    Status,
    Projects(Vec<(String, String)>),
    Users(Vec<(String, String)>),
    Categories(Vec<(String, String)>),
    Transactions(Vec<(String, String)>),
    Stats,
    Get {
        endpoint: String,
        params: Vec<(String, String)>,
    },
    Help,
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(Command::Help);
        };

        let command = match name.as_str() {
            "login" => {
                if rest.len() > 1 {
                    bail!("login takes at most one argument");
                }
                Command::Login(rest.first().cloned())
            }
            "logout" => Command::Logout,
            "whoami" => Command::Whoami,
            "status" => Command::Status,
            "projects" => Command::Projects(parse_params(rest)?),
            "users" => Command::Users(parse_params(rest)?),
            "categories" => Command::Categories(parse_params(rest)?),
            "transactions" => Command::Transactions(parse_params(rest)?),
            "stats" => Command::Stats,
            "get" => {
                let (endpoint, params) = rest
                    .split_first()
                    .ok_or_else(|| anyhow!("get requires an endpoint"))?;
                Command::Get {
                    endpoint: endpoint.clone(),
                    params: parse_params(params)?,
                }
            }
            "help" | "-h" | "--help" => Command::Help,
            other => bail!("Unknown command: {}", other),
        };
        Ok(command)
    }

    fn needs_session(&self) -> bool {
        matches!(
            self,
            Command::Projects(_)
                | Command::Users(_)
                | Command::Categories(_)
                | Command::Transactions(_)
                | Command::Stats
                | Command::Get { .. }
        )
    }
}

/// Parse `key=value` arguments into query parameters
fn parse_params(args: &[String]) -> Result<Vec<(String, String)>> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| anyhow!("Expected key=value, got '{}'", arg))
        })
        .collect()
}

pub async fn run(app: &mut App, command: Command) -> Result<()> {
    if command.needs_session() && !app.auth().is_authenticated() {
        bail!("Not logged in. Run `pledgedesk login` first.");
    }

    match command {
        Command::Login(login) => login_interactive(app, login).await,
        Command::Logout => {
            app.auth().logout();
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami => {
            match app.auth().current_user() {
                Some(user) => println!("{} ({}) - {}", user.name, user.login, user.role),
                None => println!("Not logged in."),
            }
            Ok(())
        }
        Command::Status => {
            let state = match app.auth().state() {
                AuthState::Authenticated(user) => format!("logged in as {}", user.login),
                AuthState::Error(message) => format!("error: {}", message),
                AuthState::Authenticating => "authenticating".to_string(),
                AuthState::Anonymous => "not logged in".to_string(),
            };
            println!("Mode:    {}", app.mode());
            println!("API:     {}", app.config().api_base_url);
            println!("Session: {}", state);
            Ok(())
        }
        Command::Projects(params) => {
            for project in app.api().projects(&params).await? {
                println!(
                    "{:<12} {:<40} {:>12.2} / {:<12.2} {:>5.1}%  {}",
                    project.id,
                    project.title,
                    project.current_amount,
                    project.funding_goal,
                    project.progress,
                    project.status
                );
            }
            Ok(())
        }
        Command::Users(params) => {
            for user in app.api().users(&params).await? {
                println!(
                    "{:<12} {:<24} {:<32} {:<10} {}",
                    user.id, user.name, user.email, user.role, user.status
                );
            }
            Ok(())
        }
        Command::Categories(params) => {
            for category in app.api().categories(&params).await? {
                println!(
                    "{:<12} {:<24} {:>5} projects  {}",
                    category.id, category.name, category.projects, category.status
                );
                for sub in &category.subcategories {
                    println!("  {:<10} {:<22} {:>5} projects", sub.id, sub.name, sub.projects);
                }
            }
            Ok(())
        }
        Command::Transactions(params) => {
            for tx in app.api().transactions(&params).await? {
                println!(
                    "{:<12} {:<32} {:<24} {:>12} {:<12} {}",
                    tx.id, tx.project, tx.backer, tx.amount, tx.date, tx.status
                );
            }
            Ok(())
        }
        Command::Stats => {
            let overview = app.api().overview().await?;
            println!("{}", serde_json::to_string_pretty(&overview)?);
            Ok(())
        }
        Command::Get { endpoint, params } => {
            let value: serde_json::Value = app.api().http().get_with_params(&endpoint, &params).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Command::Help => Ok(()),
    }
}

async fn login_interactive(app: &mut App, login: Option<String>) -> Result<()> {
    let login = match login {
        Some(login) => login,
        None => prompt_login(app.config().last_login.as_deref())?,
    };
    if login.is_empty() {
        bail!("A login is required");
    }
    let password = rpassword::prompt_password("Password: ")?;

    println!("Authenticating...");
    let user = app.auth().login(Credentials::new(login.clone(), password)).await?;

    let config = app.config_mut();
    config.last_login = Some(login);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    println!("Logged in as {} ({}).", user.name, user.role);
    Ok(())
}

fn prompt_login(last_login: Option<&str>) -> Result<String> {
    match last_login {
        Some(last) => print!("Login [{}]: ", last),
        None => print!("Login: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match (input.is_empty(), last_login) {
        (true, Some(last)) => last.to_string(),
        _ => input.to_string(),
    })
}
