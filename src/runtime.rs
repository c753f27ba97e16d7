use crate::app::{App, AppEvent, Command};
use crate::config::Config;
use crate::search::client::HttpSearchClient;
use crate::search::SearchBackend;
use crate::ui;
use crate::ui::widgets::cloud::PlacedWord;
use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinError;

/// Start the work a command asks for. Completions come back on `tx`.
pub fn dispatch(
    command: Command,
    backend: &Arc<dyn SearchBackend>,
    tx: &UnboundedSender<AppEvent>,
) {
    match command {
        Command::Search(request) => {
            let backend = Arc::clone(backend);
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = backend.search(&request.query).await;
                let _ = tx.send(AppEvent::SearchFinished {
                    token: request.token,
                    result,
                });
            });
        }
        Command::Layout(job) => {
            let tx = tx.clone();
            tokio::spawn(async move {
                let generation = job.generation;
                let outcome = tokio::task::spawn_blocking(move || job.run()).await;
                let _ = tx.send(layout_finished(generation, outcome));
            });
        }
    }
}

/// A failed layout still completes, with no words, so the summary never
/// waits on it forever.
fn layout_finished(generation: u64, outcome: Result<Vec<PlacedWord>, JoinError>) -> AppEvent {
    let words = outcome.unwrap_or_else(|e| {
        tracing::error!(error = %e, generation, "word cloud layout task failed");
        Vec::new()
    });
    AppEvent::LayoutFinished { generation, words }
}

/// Run the interactive UI until the user quits.
pub async fn run(config: Config, initial_query: Option<String>) -> Result<()> {
    let client = HttpSearchClient::new(&config.server).context("Failed to build HTTP client")?;
    let backend: Arc<dyn SearchBackend> = Arc::new(client);
    run_with_backend(config, backend, initial_query).await
}

pub async fn run_with_backend(
    config: Config,
    backend: Arc<dyn SearchBackend>,
    initial_query: Option<String>,
) -> Result<()> {
    let mut app = App::new(&config);
    let (tx, rx) = mpsc::unbounded_channel::<AppEvent>();

    if let Some(query) = initial_query {
        app.query = query;
        if let Some(request) = app.search() {
            dispatch(Command::Search(request), &backend, &tx);
        }
    }

    // Also installs a panic hook that puts the terminal back.
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app, &config, &backend, &tx, rx).await;
    ratatui::restore();
    result
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    config: &Config,
    backend: &Arc<dyn SearchBackend>,
    tx: &UnboundedSender<AppEvent>,
    mut rx: mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(config.ui.tick_rate());
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        terminal.draw(|frame| ui::render(frame, app, Instant::now()))?;

        tokio::select! {
            _ = tick.tick() => {
                app.on_tick();
            }

            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if let Some(command) = app.handle_key(key) {
                            dispatch(command, backend, tx);
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "terminal input error");
                        return Err(e.into());
                    }
                    None => break,
                }
            }

            Some(event) = rx.recv() => {
                if let Some(command) = app.handle_event(event) {
                    dispatch(command, backend, tx);
                }
            }
        }

        if app.should_quit() {
            tracing::info!("quitting");
            break;
        }
    }

    Ok(())
}
