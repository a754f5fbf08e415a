use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use opsdesk_application::{ChatUseCase, SendOutcome};
use opsdesk_core::config::ChatConfig;
use opsdesk_infrastructure::JsonStoreRepository;
use opsdesk_interaction::{AssistantApiClient, OpsApiClient};

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/new".to_string(),
                "/sessions".to_string(),
                "/switch".to_string(),
                "/rename".to_string(),
                "/delete".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// The main entry point for the opsdesk readline REPL.
///
/// Sets up a rustyline-based REPL that:
/// 1. Rehydrates the session store from the snapshot on disk
/// 2. Wires the assistant and ops HTTP clients from secret.json
/// 3. Provides command completion for the session-management commands
/// 4. Sends everything else through the turn-processing pipeline
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // ===== Backend Initialization =====
    let config = ChatConfig::default();
    let repository = Arc::new(JsonStoreRepository::default_location()?);
    let backend = Arc::new(AssistantApiClient::try_from_secrets(&config)?);
    let gateway = Arc::new(OpsApiClient::try_from_secrets(&config)?);
    let usecase = ChatUseCase::new(repository, backend, gateway, config).await?;

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl: Editor<CliHelper, rustyline::history::DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== opsdesk ===".bright_magenta().bold());
    println!(
        "{}",
        "Chat with the assistant, or manage sessions with /new, /sessions, /switch, /rename, /delete. Type 'quit' to exit."
            .bright_black()
    );
    if let Some(session) = usecase.active_session().await {
        println!("{}", format!("Resumed session: {}", session.title).bright_black());
    }
    println!();

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if trimmed.starts_with('/') {
                    handle_command(&usecase, trimmed).await;
                    continue;
                }

                println!("{}", format!("> {}", trimmed).green());

                match usecase.send_message(trimmed).await {
                    SendOutcome::Replied { reply, .. } => {
                        for line in reply.lines() {
                            println!("{}", line.bright_blue());
                        }
                        println!();
                    }
                    SendOutcome::Ignored => {
                        println!("{}", "A reply is still on its way.".bright_black());
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

/// Handles the local session-management commands.
async fn handle_command(usecase: &ChatUseCase, line: &str) {
    let mut parts = line.splitn(2, ' ');
    let command = parts.next().unwrap_or("");
    let arg = parts.next().map(str::trim).unwrap_or("");

    match command {
        "/new" => {
            let session = usecase.create_session().await;
            println!("{}", format!("Started {}", session.title).bright_green());
        }
        "/sessions" => {
            let sessions = usecase.sessions().await;
            if sessions.is_empty() {
                println!("{}", "No sessions yet.".bright_black());
                return;
            }
            let active_id = usecase.active_session_id().await;
            for (index, session) in sessions.iter().enumerate() {
                let marker = if Some(&session.id) == active_id.as_ref() {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{}",
                    format!(
                        "{} {:>2}. {} ({} messages)",
                        marker,
                        index + 1,
                        session.title,
                        session.messages.len()
                    )
                    .bright_black()
                );
            }
        }
        "/switch" => match resolve_index(usecase, arg).await {
            Some(id) => {
                usecase.select_session(&id).await;
                let title = usecase
                    .active_session()
                    .await
                    .map(|s| s.title)
                    .unwrap_or_default();
                println!("{}", format!("Switched to {}", title).bright_green());
            }
            None => println!("{}", "Usage: /switch <session number>".yellow()),
        },
        "/rename" => {
            if arg.is_empty() {
                println!("{}", "Usage: /rename <new title>".yellow());
                return;
            }
            match usecase.active_session_id().await {
                Some(id) => {
                    usecase.rename_session(&id, arg).await;
                    println!("{}", format!("Renamed to {}", arg.trim()).bright_green());
                }
                None => println!("{}", "No active session to rename.".yellow()),
            }
        }
        "/delete" => match resolve_index(usecase, arg).await {
            Some(id) => {
                usecase.delete_session(&id).await;
                println!("{}", "Session deleted.".bright_green());
            }
            None => println!("{}", "Usage: /delete <session number>".yellow()),
        },
        _ => println!("{}", "Unknown command".bright_black()),
    }
}

/// Resolves a 1-based session number from `/sessions` to a session ID.
async fn resolve_index(usecase: &ChatUseCase, arg: &str) -> Option<String> {
    let index: usize = arg.parse().ok()?;
    let sessions = usecase.sessions().await;
    sessions.get(index.checked_sub(1)?).map(|s| s.id.clone())
}
