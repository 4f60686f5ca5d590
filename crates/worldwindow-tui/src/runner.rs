// TUI event loop and terminal management
use crate::app::{Command, Completion};
use crate::App;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info};
use worldwindow_core::CardApi;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub async fn run_tui(mut app: App, api: Arc<dyn CardApi>) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, api).await;

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    api: Arc<dyn CardApi>,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    for command in app.startup() {
        dispatch(app, command, &api, &tx);
    }

    loop {
        // Results are applied here, never from the spawned tasks
        while let Ok(completion) = rx.try_recv() {
            app.apply(completion);
        }
        app.tick(Instant::now());

        terminal.draw(|f| crate::ui::render(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(command) = app.handle_key(key) {
                        dispatch(app, command, &api, &tx);
                    }
                }
            }
        }

        if app.should_quit {
            info!("Leaving TUI");
            return Ok(());
        }

        // let spawned tasks make progress between frames
        tokio::task::yield_now().await;
    }
}

fn dispatch(
    app: &mut App,
    command: Command,
    api: &Arc<dyn CardApi>,
    tx: &UnboundedSender<Completion>,
) {
    match command {
        Command::Feed(ticket, request) => {
            debug!("Dispatching feed request {:?} (seq {})", request, ticket.seq());
            let api = Arc::clone(api);
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = request.run(api.as_ref()).await;
                // receiver is gone only after quitting
                let _ = tx.send(Completion::Feed(ticket, result));
            });
        }
        Command::Favorites(ticket, request) => {
            debug!("Dispatching favorites request {:?} (seq {})", request, ticket.seq());
            let api = Arc::clone(api);
            let tx = tx.clone();
            tokio::spawn(async move {
                let reply = request.run(api.as_ref()).await;
                let _ = tx.send(Completion::Favorites(ticket, reply));
            });
        }
        Command::OpenLink(url) => {
            info!("Opening {}", url);
            if let Err(e) = open::that(&url) {
                app.report_open_failure(e);
            }
        }
    }
}
