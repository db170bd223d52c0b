//! Runs one contact session against the real terminal.

use std::io::BufRead;

use anyhow::{Context, Result};
use contact_core::{Delivery, InputHandle, Phase, Recipient, RevealPacing, Sequencer, TerminalOutput};
use contact_relay::EmailJsClient;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, DRY_RUN_RECIPIENT};
use crate::dry_run::DryRunDelivery;
use crate::terminal::{AnsiTerminal, EchoTracker};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The message was delivered.
    Delivered,
    /// Input ended before a message was delivered.
    InputClosed,
    /// Interrupted with Ctrl+C.
    Interrupted,
}

impl SessionEnd {
    /// Process exit code for this ending.
    pub fn exit_code(self) -> i32 {
        match self {
            SessionEnd::Delivered | SessionEnd::InputClosed => 0,
            SessionEnd::Interrupted => 130,
        }
    }
}

/// Pick the delivery for this run.
pub fn build_delivery(config: &AppConfig, dry_run: bool) -> Result<(Box<dyn Delivery>, Recipient)> {
    if dry_run {
        let recipient = config
            .recipient()
            .unwrap_or_else(|_| Recipient::new(DRY_RUN_RECIPIENT, ""));
        return Ok((Box::new(DryRunDelivery::stderr()), recipient));
    }

    let relay = config.relay_config().context("Relay is not configured")?;
    let recipient = config.recipient().context("Recipient is not configured")?;
    let client = EmailJsClient::new(relay).context("Failed to create relay client")?;
    Ok((Box::new(client), recipient))
}

/// Forward stdin lines to the sequencer from a dedicated thread.
///
/// Stdin is read with blocking IO so that a pending read never holds up
/// runtime shutdown. The thread stops at end of input or once the
/// sequencer has gone away; dropping the handle closes the line stream.
pub fn spawn_stdin_reader(
    handle: InputHandle,
    echo: EchoTracker,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("contact-stdin".to_string())
        .spawn(move || forward_lines(std::io::stdin().lock(), &handle, &echo))
}

/// Commit each line from `reader`, logging the ones the sequencer drops.
///
/// Every line read is counted on `echo`, dropped or not, so the renderer
/// can wipe all of them from the screen.
pub fn forward_lines(reader: impl BufRead, handle: &InputHandle, echo: &EchoTracker) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "Failed to read input");
                break;
            }
        };
        echo.record_line();
        if handle.is_closed() {
            break;
        }
        if !handle.commit(line) {
            debug!(enabled = handle.is_enabled(), "Input line dropped");
        }
    }
    debug!("Input reader finished");
}

/// Drive a session to its end.
pub async fn run_session<O>(
    output: O,
    delivery: Box<dyn Delivery>,
    recipient: Recipient,
    pacing: RevealPacing,
    echo: EchoTracker,
) -> Result<(SessionEnd, Sequencer<O, Box<dyn Delivery>>)>
where
    O: TerminalOutput,
{
    let sequencer = Sequencer::new(output, delivery, recipient).with_pacing(pacing);
    let (handle, lines) = sequencer.input_channel();
    spawn_stdin_reader(handle, echo).context("Failed to start input reader")?;

    tokio::select! {
        sequencer = sequencer.run(lines) => {
            let end = if sequencer.phase() == Phase::Completed {
                SessionEnd::Delivered
            } else {
                SessionEnd::InputClosed
            };
            info!(?end, attempts = sequencer.delivery_attempts(), "Session finished");
            Ok((end, sequencer))
        }
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for Ctrl+C")?;
            info!("Session interrupted");
            Err(Interrupted.into())
        }
    }
}

/// Marker error for a session cut short by Ctrl+C.
#[derive(Debug, thiserror::Error)]
#[error("Interrupted")]
pub struct Interrupted;

/// Run the interactive session on stdout and return the exit code.
pub async fn run_terminal(
    config: &AppConfig,
    output: AnsiTerminal<std::io::Stdout>,
    pacing: RevealPacing,
    dry_run: bool,
) -> Result<i32> {
    let (delivery, recipient) = build_delivery(config, dry_run)?;
    info!(delivery = delivery.name(), dry_run, "Starting contact session");

    let echo = EchoTracker::new();
    let output = output.with_echo_tracker(echo.clone());
    match run_session(output, delivery, recipient, pacing, echo).await {
        Ok((end, mut sequencer)) => {
            sequencer
                .output_mut()
                .finish()
                .context("Failed to restore terminal")?;
            Ok(end.exit_code())
        }
        Err(err) if err.is::<Interrupted>() => {
            crate::restore_terminal();
            Ok(SessionEnd::Interrupted.exit_code())
        }
        Err(err) => Err(err),
    }
}
