//! `loanportal` command-line front end.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;

use loanportal_auth::{LoginForm, SignupForm};
use loanportal_client::format::render_dashboard;
use loanportal_client::{
    AuthClient, ClientConfig, Dashboard, FileSessionStore, HttpLoanGateway, SessionStore,
    StatusFilter, ViewMode, authorize_delete,
};
use loanportal_core::LoanId;

#[derive(Debug, Parser)]
#[command(name = "loanportal", about = "Loan management portal client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store the session.
    Login {
        #[arg(long, env = "LOANPORTAL_EMAIL")]
        email: String,
        #[arg(long, env = "LOANPORTAL_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        remember_me: bool,
    },
    /// Create a new account (does not sign in).
    Signup {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, env = "LOANPORTAL_EMAIL")]
        email: String,
        #[arg(long, env = "LOANPORTAL_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        /// Accept the terms of service and privacy policy.
        #[arg(long)]
        agree_to_terms: bool,
    },
    /// Forget the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// List loans visible to the signed-in user.
    Loans {
        /// all | my-loans | expired
        #[arg(long, default_value = "all")]
        view: ViewMode,
        /// all | pending | active | completed | rejected (all view only)
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// Print the displayed records as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Delete a loan (superadmin only).
    Delete {
        id: LoanId,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    loanportal_observability::init_cli();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;
    let store = FileSessionStore::new(config.session_dir.clone());

    match cli.command {
        Command::Login {
            email,
            password,
            remember_me,
        } => {
            let auth = AuthClient::new(&config)?;
            let form = LoginForm::new(email, password).remember_me(remember_me);
            let session = auth.login(&form, &store).await?;
            println!("Signed in as {} ({})", session.user.name, session.user.role);
        }
        Command::Signup {
            first_name,
            last_name,
            email,
            password,
            confirm_password,
            agree_to_terms,
        } => {
            let form = SignupForm {
                first_name,
                last_name,
                email,
                password,
                confirm_password,
                agree_to_terms,
            };
            let created = AuthClient::new(&config)?.signup(&form).await?;
            println!(
                "{}; sign in with `loanportal login`",
                created.message.as_deref().unwrap_or("Account created")
            );
        }
        Command::Logout => {
            AuthClient::new(&config)?.logout(&store)?;
            println!("Signed out");
        }
        Command::Whoami => match store.load() {
            Some(session) => println!(
                "{} <{}> ({})",
                session.user.name, session.user.email, session.user.role
            ),
            None => println!("Not signed in"),
        },
        Command::Loans { view, status, json } => {
            let mut dashboard = Dashboard::open(HttpLoanGateway::new(&config)?, &store)?;
            if view == ViewMode::All {
                dashboard.start().await?;
            } else {
                // Straight into the requested view: one fetch.
                dashboard.switch_view(view).await?;
            }

            if status != StatusFilter::All && !dashboard.filter_status(status) {
                eprintln!("status filter applies to the all view only; ignoring --status");
            }

            let shown = dashboard.displayed();
            if json {
                let out = serde_json::to_string_pretty(&shown).context("failed to encode loans")?;
                println!("{out}");
            } else {
                let can_delete = authorize_delete(dashboard.role());
                print!(
                    "{}",
                    render_dashboard(&shown, dashboard.view_mode(), dashboard.status_filter(), can_delete)
                );
            }
        }
        Command::Delete { id, yes } => {
            let mut dashboard = Dashboard::open(HttpLoanGateway::new(&config)?, &store)?;
            // Unauthorized roles are rejected by `delete_loan` without a prompt.
            let needs_prompt = !yes && authorize_delete(dashboard.role());
            if needs_prompt && !confirm(DELETE_PROMPT)? {
                println!("Delete cancelled");
                return Ok(());
            }
            dashboard.delete_loan(&id).await?;
            println!("Loan {id} deleted");
        }
    }

    Ok(())
}

const DELETE_PROMPT: &str = "Are you sure you want to delete this loan? [y/N] ";

/// Ask on the terminal; end-of-input or Ctrl-C counts as "no".
fn confirm(prompt: &str) -> anyhow::Result<bool> {
    let mut editor = rustyline::DefaultEditor::new().context("failed to open terminal")?;
    match editor.readline(prompt) {
        Ok(answer) => Ok(is_affirmative(&answer)),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(false),
        Err(e) => Err(e).context("failed to read confirmation"),
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
