// SPDX-License-Identifier: AGPL-3.0
// Freightdesk Headless - Form session driver for scripts and CI

mod client;
mod script;
mod services;

use async_channel::Receiver;
use clap::Parser;
use client::RestContactApi;
use freightdesk_core::{AppError, SettingsStore, API_URL_ENV};
use services::{FormBridge, FormCommand, FormEvent};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Exit code when the draft did not pass local validation
const EXIT_INVALID: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "freightdesk-headless", version, about = "Drive a contact form session without a UI")]
struct Args {
    /// Load an existing contact before applying the script
    #[arg(long, value_name = "ID")]
    load: Option<u64>,

    /// JSON file with a list of form actions to apply
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Submit the draft after the script has been applied
    #[arg(long)]
    submit: bool,

    /// API base URL, overriding the settings file
    #[arg(long, value_name = "URL", env = API_URL_ENV)]
    base_url: Option<String>,

    /// Settings file to use instead of the platform config directory
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Initialize logging; stdout is reserved for JSON output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("freightdesk_headless=info".parse().unwrap())
                .add_directive("freightdesk_core=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Freightdesk headless v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode, AppError> {
    let settings_store = match &args.settings {
        Some(path) => SettingsStore::open(path.clone())?,
        None => SettingsStore::new()?,
    };
    let settings = settings_store.get().with_base_url(args.base_url.clone());
    tracing::info!("Using API at {}", settings.api_base_url);

    let api = Arc::new(RestContactApi::new(&settings)?);
    let bridge = FormBridge::new(api)?;
    tracing::info!(session = %bridge.session_id(), "Form session opened");

    let result = drive(&bridge, &args);
    bridge.close();
    result
}

/// Load, replay, print and submit against an open session
fn drive(bridge: &FormBridge, args: &Args) -> Result<ExitCode, AppError> {
    let events = bridge.event_receiver();

    if let Some(id) = args.load {
        bridge.send_blocking(FormCommand::Load { id })?;
        loop {
            match next_event(&events)? {
                FormEvent::Loaded { .. } => break,
                FormEvent::LoadFailed { message, error } => {
                    tracing::error!("{}", message);
                    return Err(error.into());
                }
                _ => {}
            }
        }
        // Hydration is followed by one change notification
        expect_changed(&events)?;
    }

    if let Some(path) = &args.script {
        let actions = script::load_script(path)?;
        tracing::info!("Applying {} action(s) from {:?}", actions.len(), path);
        for action in actions {
            bridge.send_blocking(FormCommand::Dispatch(action))?;
            expect_changed(&events)?;
        }
    }

    let view = bridge.snapshot_blocking()?;
    print_json(&view)?;

    if !args.submit {
        return Ok(ExitCode::SUCCESS);
    }

    bridge.send_blocking(FormCommand::Submit)?;
    loop {
        match next_event(&events)? {
            FormEvent::Submitting => tracing::info!("Submitting contact"),
            FormEvent::Submitted { record } => {
                tracing::info!(id = record.id, "Contact saved");
                print_json(&record)?;
                return Ok(ExitCode::SUCCESS);
            }
            FormEvent::SubmitInvalid { errors } => {
                tracing::warn!("Draft has {} invalid field(s), not submitted", errors.len());
                print_json(&errors)?;
                return Ok(ExitCode::from(EXIT_INVALID));
            }
            FormEvent::SubmitFailed { failure } => {
                tracing::error!("Submission failed: {}", failure.message);
                print_json(&failure)?;
                return Ok(ExitCode::FAILURE);
            }
            FormEvent::SubmitRejected => {
                tracing::warn!("Submission rejected, another one is in flight");
                return Ok(ExitCode::FAILURE);
            }
            _ => {}
        }
    }
}

fn next_event(events: &Receiver<FormEvent>) -> Result<FormEvent, AppError> {
    events.recv_blocking().map_err(|_| AppError::SessionClosed)
}

fn expect_changed(events: &Receiver<FormEvent>) -> Result<(), AppError> {
    loop {
        if let FormEvent::Changed { .. } = next_event(events)? {
            return Ok(());
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
