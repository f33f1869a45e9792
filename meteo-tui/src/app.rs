//! Dashboard state and event loop.

use std::{io, sync::Arc, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use meteo_core::{
    Language, Store, TextKey, Theme, WeatherError, WeatherProvider, WeatherQuery, WeatherSnapshot,
    provider_from_store,
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    widgets::ListState,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::map::{CITY_ZOOM, MapView};
use crate::ui;

/// What the weather panel currently shows.
#[derive(Debug)]
pub enum Panel {
    Idle,
    Displaying(WeatherSnapshot),
    Error(TextKey),
}

/// Result of one spawned lookup, reported back to the event loop.
#[derive(Debug)]
struct FetchOutcome {
    result: Result<WeatherSnapshot, WeatherError>,
    /// Whether a success should be recorded in the search history.
    record: bool,
}

/// All mutable dashboard state, owned by the event loop.
pub struct App {
    store: Store,
    provider: Option<Arc<dyn WeatherProvider>>,
    pub input: String,
    pub panel: Panel,
    /// Transient message shown in the input panel (empty-input prompt).
    pub notice: Option<TextKey>,
    /// Canonical name of the last successfully displayed city; cleared on
    /// error, used for the silent re-fetch after a language switch.
    last_city: Option<String>,
    pub history_state: ListState,
    pub map: MapView,
    tx: UnboundedSender<FetchOutcome>,
    rx: UnboundedReceiver<FetchOutcome>,
}

impl App {
    pub fn new(store: Store) -> Self {
        let provider = provider_from_store(&store).ok();
        Self::with_provider(store, provider)
    }

    fn with_provider(store: Store, provider: Option<Arc<dyn WeatherProvider>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            store,
            provider,
            input: String::new(),
            panel: Panel::Idle,
            notice: None,
            last_city: None,
            history_state: ListState::default(),
            map: MapView::new(),
            tx,
            rx,
        }
    }

    pub fn theme(&self) -> Theme {
        self.store.theme()
    }

    pub fn language(&self) -> Language {
        self.store.language()
    }

    pub fn history(&self) -> &[String] {
        self.store.history()
    }

    pub fn displayed_cloud_cover(&self) -> Option<u8> {
        match &self.panel {
            Panel::Displaying(snapshot) => Some(snapshot.cloud_cover_pct),
            _ => None,
        }
    }

    /// Search for whatever is in the input field.
    pub fn submit_search(&mut self) {
        let city = self.input.trim().to_owned();
        if city.is_empty() {
            // No network call; the user is prompted to type a city first.
            self.notice = Some(TextKey::Placeholder);
            return;
        }
        self.spawn_fetch(city, true);
    }

    /// Re-fetch the selected history entry.
    ///
    /// A passive re-view does not reorder the history list.
    fn select_history_item(&mut self) {
        let Some(index) = self.history_state.selected() else { return };
        let Some(city) = self.store.history().get(index).cloned() else { return };
        self.input = city.clone();
        self.spawn_fetch(city, false);
    }

    fn spawn_fetch(&mut self, city: String, record: bool) {
        self.notice = None;

        let Some(provider) = self.provider.clone() else {
            tracing::warn!("weather lookup attempted without a configured API key");
            self.panel = Panel::Error(TextKey::ErrorApiKey);
            self.last_city = None;
            return;
        };

        let language = self.store.language();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = provider.current(&WeatherQuery { city, language }).await;
            // The dashboard may already be gone when a late response lands.
            let _ = tx.send(FetchOutcome { result, record });
        });
    }

    /// Apply one fetch outcome. Outcomes of overlapping searches are applied
    /// in arrival order; the last one wins the display.
    fn apply_outcome(&mut self, outcome: FetchOutcome) {
        match outcome.result {
            Ok(snapshot) => {
                self.last_city = Some(snapshot.city.clone());
                self.map.recenter(snapshot.coord.lat, snapshot.coord.lon, CITY_ZOOM);
                self.map.show_marker(snapshot.coord.lat, snapshot.coord.lon);
                if outcome.record {
                    self.store.record_search(&snapshot.city);
                    self.history_state.select(None);
                }
                self.panel = Panel::Displaying(snapshot);
            }
            Err(err) => {
                tracing::warn!(error = %err, "weather lookup failed");
                self.panel = Panel::Error(error_text_key(&err));
                self.last_city = None;
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        self.store.set_theme(self.store.theme().toggled());
    }

    /// Flip the language; every label re-renders on the next frame, and a
    /// displayed city is silently re-fetched so its description localizes.
    pub fn toggle_language(&mut self) {
        self.store.set_language(self.store.language().toggled());
        if let Some(city) = self.last_city.clone() {
            self.spawn_fetch(city, false);
        }
    }

    fn select_previous(&mut self) {
        let len = self.store.history().len();
        if len == 0 {
            return;
        }
        let next = match self.history_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.history_state.select(Some(next));
    }

    fn select_next(&mut self) {
        let len = self.store.history().len();
        if len == 0 {
            return;
        }
        let next = match self.history_state.selected() {
            None => 0,
            Some(i) if i + 1 >= len => 0,
            Some(i) => i + 1,
        };
        self.history_state.select(Some(next));
    }

    /// Handle one key press. Returns `true` when the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('t') | KeyCode::Char('T') => self.toggle_theme(),
                KeyCode::Char('l') | KeyCode::Char('L') => self.toggle_language(),
                KeyCode::Char('c') => return true,
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Enter => {
                if self.history_state.selected().is_some() {
                    self.select_history_item();
                } else {
                    self.submit_search();
                }
            }
            KeyCode::Up => self.select_previous(),
            KeyCode::Down => self.select_next(),
            KeyCode::Backspace => {
                self.input.pop();
                self.notice = None;
            }
            KeyCode::Char(c) => {
                // Typing leaves history-selection mode.
                self.history_state.select(None);
                self.input.push(c);
                self.notice = None;
            }
            _ => {}
        }
        false
    }
}

fn error_text_key(err: &WeatherError) -> TextKey {
    match err {
        WeatherError::NotFound => TextKey::ErrorNotFound,
        WeatherError::MissingCredential => TextKey::ErrorApiKey,
        WeatherError::Network(_) | WeatherError::Status { .. } | WeatherError::Parse(_) => {
            TextKey::ErrorFetch
        }
    }
}

/// Launch the dashboard, optionally searching a city immediately.
pub async fn run(initial_city: Option<String>) -> Result<()> {
    let store = Store::open();
    let mut app = App::new(store);
    if let Some(city) = initial_city {
        app.input = city;
        app.submit_search();
    }

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, &mut app).await;

    // restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        while let Ok(outcome) = app.rx.try_recv() {
            app.apply_outcome(outcome);
        }

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.on_key(key) {
                    return Ok(());
                }
            }
        }
    }
}
