//! medvise: terminal front-end for the Medvise chat assistant.
//!
//! Usage:
//!   medvise [--base-url <url>] [--config <file>] [--timeout-secs <n>] [--locale ko|en]
//!
//! Plain lines are sent as chat messages. Lines starting with `/` are commands;
//! `/help` lists them.

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use medvise_client::guidelines::{Notice, NoticeKind};
use medvise_client::render::markdown;
use medvise_client::render::terminal::{format_blocks, format_guidelines, format_message, TerminalStyle};
use medvise_client::{render, App, ClientConfig, Confirm, Error, Locale, UploadFile};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "medvise", version, about = "Chat with the Medvise guideline assistant")]
struct Args {
    /// Backend origin, e.g. http://localhost:5000
    #[arg(long)]
    base_url: Option<String>,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Interface language (ko, en)
    #[arg(long)]
    locale: Option<String>,
}

type InputLines = Mutex<Lines<BufReader<Stdin>>>;

/// Asks on the terminal and reads the answer from the shared input.
struct StdinConfirm<'a> {
    input: &'a InputLines,
}

#[async_trait]
impl Confirm for StdinConfirm<'_> {
    async fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        let _ = std::io::stdout().flush();
        match self.input.lock().await.next_line().await {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = resolve_config(&args).await?;
    let app = App::from_config(&config).context("failed to build API client")?;
    let style = if std::io::stdout().is_terminal() {
        TerminalStyle::ansi()
    } else {
        TerminalStyle::plain()
    };

    run(app, style).await
}

/// Flags override environment, which overrides the file, which overrides defaults.
async fn resolve_config(args: &Args) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::load(args.config.as_deref())
        .await
        .context("failed to load configuration")?;
    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    if let Some(secs) = args.timeout_secs {
        config.timeout_secs = secs;
    }
    if let Some(locale) = &args.locale {
        config.locale = locale.parse::<Locale>()?;
    }
    // Surface a bad URL before the prompt appears.
    config.api_base()?;
    Ok(config)
}

async fn run(mut app: App, style: TerminalStyle) -> anyhow::Result<()> {
    let strings = app.strings();
    let input: InputLines = Mutex::new(BufReader::new(tokio::io::stdin()).lines());

    let (health, ()) = futures::join!(app.health(), app.start());
    match health {
        Ok(status) if status.is_healthy() => {}
        Ok(status) => eprintln!("backend status: {}", status.status),
        Err(e) => eprintln!("backend unreachable: {}", e),
    }

    for message in app.rendered_log() {
        println!("{}\n", format_message(&message, style));
    }
    print_notices(&app);
    println!("{}", strings.disclaimer);

    loop {
        print!("\n> ");
        std::io::stdout().flush()?;
        let Some(line) = input.lock().await.next_line().await? else {
            break;
        };
        let line = line.trim_end();

        let Some(command) = line.strip_prefix('/') else {
            if line.trim().is_empty() {
                continue;
            }
            println!("{}", strings.waiting);
            if let Some(reply) = app.send(line).await {
                let rendered = render::render(&reply, strings);
                println!("\n{}", format_message(&rendered, style));
            }
            continue;
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };
        match name {
            "upload" => {
                if arg.is_empty() {
                    println!("{}", strings.select_file);
                    continue;
                }
                match UploadFile::from_path(arg).await {
                    Ok(file) => {
                        let _ = app.guidelines().upload_file(file).await;
                    }
                    Err(e) => eprintln!("{}: {}", arg, e),
                }
                print_notices(&app);
                print_guidelines(&app);
            }
            "delete" => {
                if arg.is_empty() {
                    println!("usage: /delete <filename>");
                    continue;
                }
                let confirm = StdinConfirm { input: &input };
                if let Err(Error::UserCancelledConfirmation) = app.guidelines().delete(arg, &confirm).await {
                    continue;
                }
                print_notices(&app);
                print_guidelines(&app);
            }
            "guidelines" | "list" => {
                let _ = app.guidelines().refresh().await;
                print_notices(&app);
                print_guidelines(&app);
            }
            "show" => {
                if arg.is_empty() {
                    println!("usage: /show <filename>");
                    continue;
                }
                match app.guidelines().content(arg).await {
                    Ok(content) => {
                        for line in format_blocks(&markdown::parse(&content), style) {
                            println!("{}", line);
                        }
                    }
                    Err(_) => print_notices(&app),
                }
            }
            "health" => match app.health().await {
                Ok(status) => println!("{}", serde_json::to_string_pretty(&status)?),
                Err(e) => eprintln!("{}", e),
            },
            "help" => print_help(),
            "quit" | "exit" => break,
            other => println!("unknown command: /{} (try /help)", other),
        }
    }
    Ok(())
}

fn print_guidelines(app: &App) {
    for line in format_guidelines(&app.guidelines().guidelines(), app.strings()) {
        println!("{}", line);
    }
}

fn print_notices(app: &App) {
    for Notice { kind, text } in app.guidelines().notices() {
        match kind {
            NoticeKind::Error => eprintln!("! {}", text),
            NoticeKind::Success => println!("✓ {}", text),
        }
    }
    app.guidelines().clear_notices();
}

fn print_help() {
    println!(
        r#"COMMANDS:
    /upload <path>        Upload a guideline (.txt, .md, .markdown, .pdf)
    /delete <filename>    Delete a guideline after confirmation
    /guidelines           Refresh and list uploaded guidelines
    /show <filename>      Print a guideline's content
    /health               Show backend health
    /help                 Show this help message
    /quit                 Exit

Any other line is sent as a chat message.

ENVIRONMENT:
    MEDVISE_BASE_URL              Backend origin
    MEDVISE_HTTP_TIMEOUT_SECS     Per-request timeout
    MEDVISE_LOCALE                ko or en
    RUST_LOG                      Log filter (default: warn)"#
    );
}
