use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::Mutex;

use songfeed_rs::controller::{AppController, SongFeedController, ViewSettings};
use songfeed_rs::model::{AppModel, HttpSongFeedClient, SongFeedCache};
use songfeed_rs::settings::PreferenceStore;
use songfeed_rs::view::AppView;
use songfeed_rs::{logging, AppConfig};

const SERVER_STATUS_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    if let Err(e) = logging::init_logging(&config.log_dir()) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!(server = %config.server_url, data_dir = %config.data_dir().display(), "=== songfeed-rs starting ===");

    let prefs = PreferenceStore::open(config.preferences_path()).context("Failed to open preferences")?;

    let client = HttpSongFeedClient::new(config.server_url.clone(), config.api_key.clone())
        .context("Failed to build feed server client")?;
    let cache = SongFeedCache::in_dir(config.data_dir());
    let feed = SongFeedController::new(Arc::new(client.clone()), cache, config.feed_config(&prefs));

    let model = Arc::new(Mutex::new(AppModel::new()));
    let settings = Arc::new(ViewSettings::new(&prefs));
    let controller = AppController::new(model.clone(), feed.clone(), settings).with_server(client);

    feed.open_page();

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    if let Err(e) = prefs.flush() {
        tracing::warn!(error = %e, "Failed to save preferences on exit");
    }

    tracing::info!("songfeed-rs shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    // Force a status check on the first iteration
    let mut last_status_check: Option<std::time::Instant> = None;

    loop {
        if last_status_check.is_none_or(|checked| checked.elapsed() >= SERVER_STATUS_INTERVAL) {
            last_status_check = Some(std::time::Instant::now());
            let controller = controller.clone();
            tokio::spawn(async move {
                controller.load_server_status().await;
            });
        }

        let (ui_state, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;

            (model_guard.get_ui_state().await, model_guard.should_quit().await)
        };
        let feed_state = controller.feed().state();
        let options = controller.view_options();

        terminal.draw(|f| {
            AppView::render(f, &feed_state, &ui_state, options);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
