//! Application shell: owns the context, runs one command, reacts to
//! pipeline events.

use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::Result;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use budgetbaba_core::models::TransactionKind;
use budgetbaba_core::{AppContext, Config, PipelineEvent};

use crate::cli::{CategoryAction, Command, TransactionAction};
use crate::commands;
use crate::ui::notify;

/// Environment variable consulted before prompting for a password.
pub const PASSWORD_ENV: &str = "BUDGETBABA_PASSWORD";

pub struct App {
    pub ctx: AppContext,
    events: broadcast::Receiver<PipelineEvent>,
    interactive: bool,
}

impl App {
    pub fn new(ctx: AppContext) -> Self {
        let events = ctx.subscribe();
        Self {
            ctx,
            events,
            interactive: io::stdin().is_terminal(),
        }
    }

    /// Run a command, report its failure, then handle any login request the
    /// pipeline raised while it ran.
    pub async fn run(&mut self, command: Command) -> ExitCode {
        let fallback = fallback_message(&command);
        let was_login = matches!(command, Command::Login { .. });

        let outcome = self.dispatch(command).await;
        if let Err(ref err) = outcome {
            debug!(error = ?err, "Command failed");
            notify::error(&notify::describe(err, fallback));
        }

        if should_reprompt(was_login, &mut self.events) {
            notify::warning("Your session has expired. Please log in again.");
            if self.interactive {
                if let Err(err) = self.login_interactive(None).await {
                    notify::error(&notify::describe(&err, "Login failed"));
                }
            } else {
                eprintln!("Run `budgetbaba login` to continue.");
            }
        }

        if outcome.is_ok() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    async fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Login { email } => self.login_interactive(email).await,
            Command::Register { name, email, photo } => {
                let password = prompt_password()?;
                commands::account::register(&self.ctx, &name, &email, &password, photo.as_deref())
                    .await
            }
            Command::Logout => commands::account::logout(&self.ctx),
            Command::Whoami => commands::account::whoami(&self.ctx),
            Command::Health => commands::account::health(&self.ctx).await,
            Command::Dashboard => commands::overview::dashboard(&self.ctx).await,
            Command::Categories { action } => match action {
                CategoryAction::List { kind } => commands::categories::list(&self.ctx, kind).await,
                CategoryAction::Add { name, kind, icon } => {
                    commands::categories::add(&self.ctx, &name, kind, icon).await
                }
                CategoryAction::Update { id, name, kind, icon } => {
                    commands::categories::update(&self.ctx, id, name, kind, icon).await
                }
            },
            Command::Incomes { action } => self.transactions(TransactionKind::Income, action).await,
            Command::Expenses { action } => self.transactions(TransactionKind::Expense, action).await,
            Command::Filter(args) => commands::overview::filter(&self.ctx, args).await,
            Command::Report { kind } => commands::overview::report(&self.ctx, kind).await,
            Command::Upload { file } => commands::account::upload(&self.ctx, &file).await,
        }
    }

    async fn transactions(&self, kind: TransactionKind, action: TransactionAction) -> Result<()> {
        let ctx = &self.ctx;
        match action {
            TransactionAction::List => commands::transactions::list(ctx, kind).await,
            TransactionAction::Add { name, amount, category, date, icon } => {
                commands::transactions::add(ctx, kind, &name, amount, category, date, icon).await
            }
            TransactionAction::Delete { id, yes } => {
                if !yes && !confirm(&format!("Delete {} {}?", kind, id))? {
                    eprintln!("Cancelled.");
                    return Ok(());
                }
                commands::transactions::delete(ctx, kind, id).await
            }
        }
    }

    /// Prompt for credentials, log in, and remember the email for next time.
    pub async fn login_interactive(&mut self, email: Option<String>) -> Result<()> {
        let email = match email {
            Some(email) => email,
            None => prompt_email(self.ctx.config.last_email.as_deref())?,
        };
        let password = prompt_password()?;

        eprintln!("Authenticating...");
        let user = self.ctx.login(&email, &password).await?;

        if let Err(e) = Config::remember_last_email(email.trim()) {
            warn!(error = %e, "Failed to save config");
        }

        // Anything queued before this login is stale now
        drain_login_requests(&mut self.events);

        notify::success(&format!("Welcome, {}!", user.display_name()));
        Ok(())
    }
}

/// Drain pending pipeline events; true if any asked for a fresh login.
/// Missed events count as a login request since they cannot be inspected.
fn drain_login_requests(events: &mut broadcast::Receiver<PipelineEvent>) -> bool {
    let mut required = false;
    loop {
        match events.try_recv() {
            Ok(PipelineEvent::LoginRequired { path }) => {
                info!(path = %path, "Login required");
                required = true;
            }
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "Missed pipeline events");
                required = true;
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    required
}

/// Whether the shell should send the user back to the login prompt.
///
/// Events are always drained. A 401 on the `login` command itself means bad
/// credentials, which that command has already reported.
fn should_reprompt(was_login: bool, events: &mut broadcast::Receiver<PipelineEvent>) -> bool {
    let required = drain_login_requests(events);
    required && !was_login
}

/// What to say when a command fails without a server message.
fn fallback_message(command: &Command) -> &'static str {
    match command {
        Command::Login { .. } => "Login failed",
        Command::Register { .. } => "Registration failed",
        Command::Logout => "Failed to log out",
        Command::Whoami => "Failed to read session",
        Command::Health => "API is not reachable",
        Command::Dashboard => "Failed to fetch dashboard data",
        Command::Categories { action } => match action {
            CategoryAction::List { .. } => "Failed to fetch categories",
            CategoryAction::Add { .. } => "Failed to add category",
            CategoryAction::Update { .. } => "Failed to update category",
        },
        Command::Incomes { action } => match action {
            TransactionAction::List => "Failed to fetch income details",
            TransactionAction::Add { .. } => "Failed to add income",
            TransactionAction::Delete { .. } => "Failed to delete income",
        },
        Command::Expenses { action } => match action {
            TransactionAction::List => "Failed to fetch expense details",
            TransactionAction::Add { .. } => "Failed to add expense",
            TransactionAction::Delete { .. } => "Failed to delete expense",
        },
        Command::Filter(_) => "Failed to fetch transactions",
        Command::Report { .. } => "Failed to send email",
        Command::Upload { .. } => "Failed to upload image",
    }
}

fn prompt_email(last_email: Option<&str>) -> Result<String> {
    match last_email {
        Some(last) => eprint!("Email [{}]: ", last),
        None => eprint!("Email: "),
    }
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match (input.is_empty(), last_email) {
        (true, Some(last)) => last.to_string(),
        _ => input.to_string(),
    })
}

fn prompt_password() -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    let password = rpassword::prompt_password("Password: ")?;
    Ok(password)
}

fn confirm(question: &str) -> Result<bool> {
    eprint!("{} [y/N]: ", question);
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn test_fallback_messages() {
        assert_eq!(
            fallback_message(&parse(&["budgetbaba", "incomes", "list"])),
            "Failed to fetch income details"
        );
        assert_eq!(
            fallback_message(&parse(&["budgetbaba", "expenses", "delete", "3", "-y"])),
            "Failed to delete expense"
        );
        assert_eq!(
            fallback_message(&parse(&["budgetbaba", "report", "income"])),
            "Failed to send email"
        );
    }

    fn login_required(path: &str) -> PipelineEvent {
        PipelineEvent::LoginRequired {
            path: path.to_string(),
        }
    }

    #[test]
    fn test_reprompt_after_unauthorized_command() {
        let (tx, mut rx) = broadcast::channel(16);
        tx.send(login_required("/expenses")).unwrap();
        assert!(should_reprompt(false, &mut rx));
        // Drained, so the next command starts clean
        assert!(!should_reprompt(false, &mut rx));
    }

    #[test]
    fn test_no_reprompt_without_events() {
        let (_tx, mut rx) = broadcast::channel::<PipelineEvent>(16);
        assert!(!should_reprompt(false, &mut rx));
    }

    #[test]
    fn test_failed_login_does_not_reprompt() {
        let (tx, mut rx) = broadcast::channel(16);
        tx.send(login_required("/login")).unwrap();
        assert!(!should_reprompt(true, &mut rx));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_lagged_receiver_counts_as_login_request() {
        let (tx, mut rx) = broadcast::channel(1);
        tx.send(login_required("/incomes")).unwrap();
        tx.send(login_required("/expenses")).unwrap();
        tx.send(login_required("/dashboard")).unwrap();
        assert!(drain_login_requests(&mut rx));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_drain_after_login_clears_stale_requests() {
        let (tx, mut rx) = broadcast::channel(16);
        tx.send(login_required("/incomes")).unwrap();
        tx.send(login_required("/dashboard")).unwrap();
        drain_login_requests(&mut rx);
        assert!(!should_reprompt(false, &mut rx));
        drop(tx);
        assert!(!drain_login_requests(&mut rx));
    }
}
