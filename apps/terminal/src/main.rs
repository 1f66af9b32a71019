use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{ControllerCommand, HttpPipelineBackend, PipelineController, UiSession};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;

use commands::{parse_line, Input, HELP};
use config::{load_settings, normalize_server_url, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(about = "Terminal controller for the job-application pipeline")]
struct Args {
    /// Config file with flat `key = value` settings.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    poll_interval_ms: Option<u64>,
    #[arg(long)]
    num_jobs: Option<u32>,
    /// Tracing filter directive, e.g. `client_core=debug`.
    #[arg(long)]
    log_filter: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (mut settings, config_error) = load_settings(&args.config);
    if let Some(server_url) = args.server_url {
        settings.server_url = normalize_server_url(&server_url);
    }
    if let Some(poll_interval_ms) = args.poll_interval_ms {
        settings.poll_interval_ms = poll_interval_ms;
    }
    if let Some(num_jobs) = args.num_jobs {
        settings.default_num_jobs = num_jobs;
    }
    if let Some(log_filter) = args.log_filter {
        settings.log_filter = log_filter;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();
    if let Some(error) = config_error {
        warn!(path = %args.config.display(), %error, "ignoring unreadable config file");
    }
    settings.validate()?;

    let backend = Arc::new(HttpPipelineBackend::new(&settings.server_url)?);
    let controller = PipelineController::new(
        backend,
        UiSession::new(settings.default_num_jobs),
        settings.poll_interval(),
    );
    info!(
        server_url = %settings.server_url,
        poll_interval_ms = settings.poll_interval_ms,
        "pipeline controller starting"
    );

    let printer = tokio::spawn(render::print_events(controller.subscribe_events()));
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    tokio::spawn(read_commands(cmd_tx));

    println!("{HELP}");
    // `run` drops the event sender, so the printer drains and stops.
    let session = controller.run(cmd_rx).await;
    if let Err(error) = printer.await {
        warn!(%error, "event printer stopped abnormally");
    }

    for (step, view) in session.board.iter() {
        println!("{step}: {}", view.label());
    }
    Ok(())
}

async fn read_commands(cmd_tx: mpsc::Sender<ControllerCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                warn!(%error, "failed to read terminal input");
                break;
            }
        };

        match parse_line(&line) {
            Ok(Input::Command(command)) => {
                if cmd_tx.send(command).await.is_err() {
                    break;
                }
            }
            Ok(Input::Help) => println!("{HELP}"),
            Ok(Input::Blank) => {}
            Err(error) => println!("!! {error}"),
        }
    }
}
