mod api;
mod form;
mod views;

#[cfg(test)]
mod test_support;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use api::ApiClient;
use form::MemberForm;
use views::MemberChanges;

/// Terminal client for the gym member records API.
#[derive(Parser, Debug)]
#[command(name = "gym", version)]
struct Cli {
    /// Base url of the API server
    #[arg(long, env = "GYM_API_URL", default_value = "http://localhost:5000")]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all members
    List {
        /// Only show members whose name, email or membership type contains this
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Show one member
    Show { id: i64 },
    /// Add a new member
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "Basic")]
        membership_type: String,
        /// Register the member as inactive
        #[arg(long)]
        inactive: bool,
    },
    /// Change fields of an existing member
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        membership_type: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a member
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

async fn run(cli: Cli) -> views::ViewResult {
    let api = ApiClient::new(reqwest::Client::new(), cli.api_url);
    let mut out = io::stdout().lock();

    match cli.command {
        Command::List { search } => views::list(&api, search.as_deref(), &mut out).await,
        Command::Show { id } => views::show(&api, id, &mut out).await,
        Command::Add {
            name,
            email,
            phone,
            membership_type,
            inactive,
        } => {
            let form = MemberForm {
                name,
                email,
                phone,
                membership_type,
                active: !inactive,
            };
            views::add(&api, form, &mut out).await
        }
        Command::Edit {
            id,
            name,
            email,
            phone,
            membership_type,
            active,
        } => {
            let changes = MemberChanges {
                name,
                email,
                phone,
                membership_type,
                active,
            };
            views::edit(&api, id, changes, &mut out).await
        }
        Command::Delete { id, yes } => {
            if !yes && !confirm("Are you sure you want to delete this member?")? {
                writeln!(out, "Cancelled")?;
                return Ok(());
            }
            views::delete(&api, id, &mut out).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    run(Cli::parse()).await?;

    Ok(())
}
