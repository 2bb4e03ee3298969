//! Application entry point — headless mock-interview runner.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Build the collaborators from config ([`FfmpegTranscoder`],
//!    [`HttpTranscriber`], [`HttpGenerator`]).
//! 4. Create the command / update / chunk channels.
//! 5. Spawn the orchestrator, the one-second ticker, and the chunk pump.
//! 6. Drive a complete session over the configured answer file and print
//!    the per-question records and the final summary.

use std::sync::{mpsc as std_mpsc, Arc};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use interview_coach::{
    capture::{CaptureController, FileSource},
    config::AppConfig,
    pipeline::{InterviewOrchestrator, SessionCommand, SessionUpdate},
    services::{HttpGenerator, HttpTranscriber},
    session::{built_in_catalog, Session},
    transcode::FfmpegTranscoder,
};

/// How long the driver lets each capture run before stopping and
/// submitting. A real front end would wire this to the stop button; the
/// file-backed source drains well within a second.
const CAPTURE_WINDOW: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // ── 1. Config ───────────────────────────────────────────────────────
    let config = AppConfig::load().context("failed to load settings.toml")?;

    let Some(media_file) = config.capture.media_file.clone() else {
        bail!(
            "no answer media file configured — set `capture.media_file` in \
             settings.toml to a pre-recorded answer clip"
        );
    };

    log::info!("interview-coach starting (answer file: {})", media_file.display());

    // ── 2. Collaborators ────────────────────────────────────────────────
    let transcoder = Arc::new(FfmpegTranscoder::from_config(&config.transcode));
    let transcriber = Arc::new(HttpTranscriber::from_config(&config.services));
    let generator = Arc::new(HttpGenerator::from_config(&config.services));

    let source = FileSource::new(&media_file, config.capture.chunk_bytes);
    let capture = CaptureController::new(Box::new(source), config.capture.answer_secs);

    // ── 3. Channels ─────────────────────────────────────────────────────
    let (chunk_tx, chunk_rx) = std_mpsc::channel();
    let (command_tx, command_rx) = tokio::sync::mpsc::channel::<SessionCommand>(32);
    let (update_tx, mut update_rx) = tokio::sync::mpsc::channel::<SessionUpdate>(64);

    // ── 4. Orchestrator ─────────────────────────────────────────────────
    let catalog = built_in_catalog();
    let first_topic = catalog[0].topics[0].clone();
    let orchestrator = InterviewOrchestrator::new(
        Session::new(catalog),
        capture,
        chunk_tx,
        transcoder,
        transcriber,
        generator,
        update_tx,
    );
    tokio::spawn(orchestrator.run(command_rx));

    // ── 5. Ticker (one Tick per second while the session lives) ─────────
    let ticker_tx = command_tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            if ticker_tx.send(SessionCommand::Tick).await.is_err() {
                break;
            }
        }
    });

    // ── 6. Chunk pump (source thread → command queue) ───────────────────
    let pump_tx = command_tx.clone();
    std::thread::spawn(move || {
        while let Ok(chunk) = chunk_rx.recv() {
            if pump_tx.blocking_send(SessionCommand::Chunk { chunk }).is_err() {
                break;
            }
        }
    });

    // ── 7. Drive the wizard into the interview ──────────────────────────
    send(&command_tx, SessionCommand::ChooseCategory { index: 0 }).await?;
    send(&command_tx, SessionCommand::ChooseTopic { topic: first_topic }).await?;

    // ── 8. React to updates until the summary lands ─────────────────────
    let mut answered = 0usize;
    while let Some(update) = update_rx.recv().await {
        match update {
            SessionUpdate::StageChanged { stage } => {
                log::info!("stage: {}", stage.label());
            }
            SessionUpdate::QuestionChanged { index, question } => {
                println!("\nQuestion {}: {question}", index + 1);
                send(&command_tx, SessionCommand::BeginCapture).await?;

                let stop_tx = command_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(CAPTURE_WINDOW).await;
                    let _ = stop_tx.send(SessionCommand::EndCapture).await;
                    let _ = stop_tx.send(SessionCommand::Submit).await;
                });
            }
            SessionUpdate::CaptureStarted => {
                log::info!("recording…");
            }
            SessionUpdate::CountdownTick { label, .. } => {
                log::debug!("time left: {label}");
            }
            SessionUpdate::CaptureStopped => {
                log::info!("recording stopped");
            }
            SessionUpdate::Submission { status } => {
                log::info!("submission: {}", status.label());
            }
            SessionUpdate::RecordAppended { record } => {
                answered += 1;
                println!("Your response: {}", record.transcript);
                println!("Feedback: {}", record.feedback);
            }
            SessionUpdate::SummaryReady { summary } => {
                println!("\nOverall feedback:\n{}", summary.feedback);
                println!("\nOverall score: {} / 10", summary.score);
                log::info!("session complete — {answered} question(s) answered");
                break;
            }
            SessionUpdate::CaptureUnavailable { message } => {
                bail!("{message}");
            }
            SessionUpdate::Error { message } => {
                // Submission failures are retryable in a front end; the
                // headless driver treats them as fatal.
                bail!("{message}");
            }
        }
    }

    Ok(())
}

async fn send(
    tx: &tokio::sync::mpsc::Sender<SessionCommand>,
    command: SessionCommand,
) -> Result<()> {
    tx.send(command)
        .await
        .map_err(|_| anyhow::anyhow!("orchestrator stopped unexpectedly"))
}
