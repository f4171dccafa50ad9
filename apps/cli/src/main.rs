mod commands;
mod render;

use std::{future::Future, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    load_settings, ClientError, Confirmation, DocumentUpload, HttpDocumentService, Orchestrator,
};
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

use crate::commands::{parse_command, Command, HELP};

#[derive(Parser, Debug)]
#[command(
    name = "ragvault",
    about = "Ask questions about indexed documents and jump to the cited page"
)]
struct Args {
    /// Backend base url; overrides ragvault.toml and RAGVAULT_API_URL.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    request_timeout_secs: Option<u64>,
    /// Skip the delete confirmation prompt.
    #[arg(long)]
    yes: bool,
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_filter: String,
}

type InputLines = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut settings = load_settings()?;
    if let Some(api_url) = &args.api_url {
        settings = settings.with_api_url(api_url)?;
    }
    if let Some(secs) = args.request_timeout_secs {
        settings.request_timeout_secs = secs;
    }
    tracing::info!(api_url = %settings.api_url, "starting ragvault");

    let service = HttpDocumentService::new(&settings).context("failed to build http client")?;
    let orchestrator = Orchestrator::new(Arc::new(service));
    let printer = tokio::spawn(render::print_events(Arc::clone(&orchestrator)));

    if let Err(err) = orchestrator.refresh().await {
        tracing::warn!("could not load document list: {err}");
    }

    println!("{HELP}");
    let mut lines = BufReader::new(stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                eprintln!("{usage}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Err(err) = run_command(&orchestrator, command, &args, &mut lines).await {
            report(err);
        }
    }

    printer.abort();
    Ok(())
}

fn report(err: ClientError) {
    match err {
        ClientError::Busy(kind) => eprintln!("{kind} still in progress; ignored"),
        // Already shown as a notice or a transcript turn.
        ClientError::Transport(_) | ClientError::StaleResponse { .. } => {}
        other => eprintln!("{other}"),
    }
}

/// Runs a network command in the background so the prompt stays responsive.
fn spawn_reported<F, Fut>(orchestrator: &Arc<Orchestrator>, command: F)
where
    F: FnOnce(Arc<Orchestrator>) -> Fut,
    Fut: Future<Output = Result<(), ClientError>> + Send + 'static,
{
    let task = command(Arc::clone(orchestrator));
    tokio::spawn(async move {
        if let Err(err) = task.await {
            report(err);
        }
    });
}

async fn confirm_delete(
    filename: &str,
    lines: &mut InputLines,
) -> Result<Confirmation, ClientError> {
    println!("Delete {filename}? [y/N]");
    let answer = lines
        .next_line()
        .await
        .map_err(|err| ClientError::validation(format!("could not read confirmation: {err}")))?
        .unwrap_or_default();
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes").into())
}

async fn run_command(
    orchestrator: &Arc<Orchestrator>,
    command: Command,
    args: &Args,
    lines: &mut InputLines,
) -> Result<(), ClientError> {
    match command {
        Command::Files => {
            if let Err(err) = orchestrator.refresh().await {
                eprintln!("could not list documents: {err}");
            }
        }
        Command::Upload { path } => {
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| ClientError::validation("no file selected"))?;
            let bytes = tokio::fs::read(&path).await.map_err(|err| {
                ClientError::validation(format!("cannot read {}: {err}", path.display()))
            })?;
            let upload = DocumentUpload::new(filename, bytes);
            spawn_reported(orchestrator, |orchestrator| async move {
                orchestrator.upload(upload).await
            });
        }
        Command::Delete { filename } => {
            let confirmation = if args.yes {
                Confirmation::Confirmed
            } else {
                confirm_delete(&filename, lines).await?
            };
            spawn_reported(orchestrator, |orchestrator| async move {
                orchestrator.remove(&filename, confirmation).await
            });
        }
        Command::Ask { question } => {
            spawn_reported(orchestrator, |orchestrator| async move {
                orchestrator.ask(&question).await?;
                orchestrator.load_active_document().await
            });
        }
        Command::Open { turn } => {
            match turn {
                Some(turn) => orchestrator.open_citation(turn, 0).await?,
                None => {
                    if !orchestrator.reopen().await {
                        println!("nothing to reopen");
                    }
                }
            }
            orchestrator.load_active_document().await?;
        }
        Command::Close => orchestrator.close_viewer().await,
        Command::NextPage => {
            orchestrator.next_page().await;
        }
        Command::PrevPage => {
            orchestrator.prev_page().await;
        }
        Command::ZoomIn => {
            orchestrator.zoom_in().await;
        }
        Command::ZoomOut => {
            orchestrator.zoom_out().await;
        }
        Command::History => {
            let snapshot = orchestrator.snapshot().await;
            for (index, turn) in snapshot.transcript.iter().enumerate() {
                println!("{}", render::format_turn(index, turn));
            }
        }
        Command::Viewer => {
            let snapshot = orchestrator.snapshot().await;
            println!("{}", render::format_viewer(&snapshot.viewer));
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}
