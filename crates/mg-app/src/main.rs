mod cli;
mod config;
mod error;
mod present;
mod progress_bar;
mod record;
mod worker;

use std::fs;
use std::process::ExitCode;

use anyhow::Context;
use log::{error, info};
use mg_client::GenerationJobPoller;

use crate::cli::Args;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::progress_bar::ProgressBar;
use crate::worker::{GenerationWorker, WorkerResponse};

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args: Args = argh::from_env();
    let _span = tracing::info_span!("meshgen", image = %args.image.display()).entered();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    cli::check_upload(&args.image)?;
    let image = fs::read(&args.image)
        .with_context(|| format!("Failed to read {}", args.image.display()))?;
    present::describe_upload(&args.image, &image)?;

    let config = AppConfig::load()?.with_overrides(args);
    info!("Using {:?}", config.generator);

    let poller = GenerationJobPoller::new(config.generator.clone())?;
    let mut worker = GenerationWorker::new(poller);
    worker.send_image(image)?;

    let mut bar = ProgressBar::new();
    let outcome = loop {
        match worker.recv_response() {
            Some(WorkerResponse::Status(message)) => {
                bar.finish();
                info!("{message}");
            }
            Some(WorkerResponse::Progress(percent)) => bar.update(percent),
            Some(WorkerResponse::Success(outcome)) => {
                bar.finish();
                break outcome;
            }
            Some(WorkerResponse::Error(message)) => {
                bar.finish();
                return Err(AppError::GeneratorError(message).into());
            }
            None => {
                bar.finish();
                return Err(AppError::WorkerGone.into());
            }
        }
    };
    worker.shutdown();

    info!("3D model generation completed!");
    present::present(args, &config.generator, &outcome)
}
