//! polish: sentence-level review of AI-polished proposal text.
//!
//! Wires together the terminal lifecycle (`tui`), the event bus (`event`),
//! the polish worker thread (`polish`), rendering (`ui`) and the SQLite draft
//! store from `polish-core`.
//!
//! # Startup sequence
//!
//! 1. Parse arguments and load config. `polish diff` prints its report here
//!    and exits without touching the data directory.
//! 2. Create the data directory and start the file logger.
//! 3. Open the database and load (or create) the draft.
//! 4. Spawn the event task and the polish worker.
//! 5. `install_panic_hook()`, `register_sigterm()`, then `init_tui()`.
//!
//! The event loop exits only via `break`, so `restore_tui()` always runs.

mod app;
mod cli;
mod config;
mod event;
mod logging;
mod polish;
mod theme;
mod tui;
mod ui;

use std::io;
use std::path::Path;
use std::sync::atomic::Ordering;

use clap::Parser;
use log::{error, info};
use polish_core::{db, Draft, PolishResult};
use tokio_rusqlite::Connection;

use crate::app::AppState;
use crate::cli::Args;
use crate::event::AppEvent;
use crate::ui::keybindings::{self, KeyAction};

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let config = config::load_config();

    if let Some(report) = cli::run_subcommand(&args, config.diff.options())? {
        print!("{report}");
        return Ok(());
    }

    let data_dir = Path::new(&args.db).parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(data_dir)?;
    logging::init_file_logger(&data_dir.join("polish.log"))?;

    let conn = db::open_db(&args.db).await.map_err(io::Error::other)?;
    let draft = open_draft(&conn, &args).await?;
    info!("opened draft {} ({})", draft.id, draft.title);

    let theme = theme::Theme::from_name(&config.theme);
    let mut state = AppState::new(draft, config.diff.options());

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    let (polish_tx, polish_rx) = crossbeam_channel::unbounded();
    let worker_tx = handler.tx.clone();
    let ai_config = config.ai.clone();
    std::thread::Builder::new()
        .name("polish-worker".to_owned())
        .spawn(move || polish::worker::polish_worker_loop(ai_config, polish_rx, worker_tx))?;
    state.polish_tx = Some(polish_tx);

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm();
    let mut terminal = tui::init_tui()?;

    'event_loop: loop {
        tokio::select! {
            // Heartbeat: a quiet terminal would otherwise block in rx.recv()
            // and never observe the SIGTERM flag.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                let action = match maybe_event {
                    Some(AppEvent::Render) => {
                        if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            error!("draw failed: {e}");
                            break 'event_loop;
                        }
                        KeyAction::Continue
                    }
                    Some(AppEvent::Tick) => {
                        state.on_tick();
                        KeyAction::Continue
                    }
                    Some(AppEvent::Key(key)) => keybindings::handle_key(key, &mut state),
                    Some(AppEvent::Mouse(mouse)) => keybindings::handle_mouse(mouse, &mut state),
                    Some(AppEvent::PolishResult(response)) => {
                        match state.apply_polish_response(*response) {
                            Some(superseded) => KeyAction::RecordReview(superseded),
                            None => KeyAction::Continue,
                        }
                    }
                    // ratatui picks up the new size from frame.area() on the next Render.
                    Some(AppEvent::Resize(_, _)) => KeyAction::Continue,
                    Some(AppEvent::Quit) | None => break 'event_loop,
                };

                match action {
                    KeyAction::Continue => {}
                    KeyAction::Quit => break 'event_loop,
                    KeyAction::Save => save_draft(&conn, &mut state).await,
                    KeyAction::RecordReview(review) => {
                        record_review(&conn, &state.draft.id, &review).await;
                    }
                }

                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    tui::restore_tui()?;

    if let Some(review) = state.review.take() {
        record_review(&conn, &state.draft.id, &review).await;
    }
    info!("exiting");
    Ok(())
}

/// Loads the draft named by `--draft`, else the most recent one, else
/// creates a new draft titled `--title`.
async fn open_draft(conn: &Connection, args: &Args) -> io::Result<Draft> {
    if let Some(id) = &args.draft {
        return db::load_draft(conn, id)
            .await
            .map_err(io::Error::other)?
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no draft with id {id}")));
    }
    if let Some(draft) = db::latest_draft(conn).await.map_err(io::Error::other)? {
        return Ok(draft);
    }
    db::create_draft(conn, &args.title).await.map_err(io::Error::other)
}

async fn save_draft(conn: &Connection, state: &mut AppState) {
    match db::save_draft(conn, &state.draft).await {
        Ok(()) => {
            info!("draft {} saved", state.draft.id);
            state.mark_saved();
        }
        Err(e) => {
            error!("saving draft {} failed: {e}", state.draft.id);
            state.message = Some(format!("保存失败: {e}"));
        }
    }
}

/// Records a closed review. Failures are logged only; history is advisory.
async fn record_review(conn: &Connection, draft_id: &str, review: &PolishResult) {
    match db::record_polish(conn, draft_id, review).await {
        Ok(record) => info!(
            "review of {} recorded: {}/{} segments applied",
            record.field_type, record.applied_count, record.segment_count
        ),
        Err(e) => error!("recording review for draft {draft_id} failed: {e}"),
    }
}
