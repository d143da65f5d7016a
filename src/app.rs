use crate::api::client::JokeClient;
use crate::api::types::Joke;
use crate::commands::{self, Command};
use crate::config::Config;
use crate::event::{ApiEvent, Event, EventHandler};
use crate::store::{CategoryCount, JokeRecord, JokeStore, TIMESTAMP_FORMAT};
use crate::ui;
use chrono::Local;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use rand::seq::SliceRandom;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// How long the fetch action stays ignored after a fetch was triggered
const FETCH_COOLDOWN: Duration = Duration::from_secs(1);

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Command,
  Search,
}

/// The joke currently shown in the joke view
#[derive(Debug, Clone)]
pub struct JokeCard {
  pub id: String,
  pub text: String,
  pub category: Option<String>,
  /// Local fetch time, formatted like the archived `created_at` column
  pub fetched_at: String,
}

impl JokeCard {
  fn new(joke: &Joke) -> Self {
    Self {
      id: joke.id.clone(),
      text: joke.text.clone(),
      category: joke.category.clone(),
      fetched_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
    }
  }
}

/// What archiving did with a fetched joke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveOutcome {
  /// New id; a record was inserted
  Archived,
  /// Id already present; the stored record stays as it is
  Duplicate,
  /// The API attached no category; displayed but never stored
  Uncategorized,
}

/// View state - each variant owns its data
#[derive(Debug)]
pub enum ViewState {
  // Root views (set via : commands)
  Joke,
  Archive {
    jokes: Vec<JokeRecord>,
    selected: usize,
    /// Set when the view was opened from a category row
    category: Option<String>,
  },
  Categories {
    rows: Vec<CategoryCount>,
    selected: usize,
  },
}

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<ViewState>,

  /// Current input mode
  mode: Mode,

  /// Command input buffer (after pressing :)
  command_input: String,

  /// Archive filter input (after pressing /)
  search_filter: String,

  /// Selected autocomplete suggestion index
  selected_suggestion: usize,

  /// Application configuration
  config: Config,

  /// Jokes API client
  client: JokeClient,

  /// Local joke archive; only ever touched from the event loop
  store: JokeStore,

  /// The joke currently on screen
  current: Option<JokeCard>,

  /// Whether a user-triggered fetch is in flight
  fetching: bool,

  /// When the last fetch was triggered, for the cooldown
  last_fetch: Option<Instant>,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let store = JokeStore::open_default()?;
    Self::with_store(config, store)
  }

  fn with_store(config: Config, store: JokeStore) -> Result<Self> {
    let client = JokeClient::new(&config)?;
    let (tx, _rx) = mpsc::unbounded_channel();

    Ok(Self {
      view_stack: vec![ViewState::Joke],
      mode: Mode::Normal,
      command_input: String::new(),
      search_filter: String::new(),
      selected_suggestion: 0,
      config,
      client,
      store,
      current: None,
      fetching: false,
      last_fetch: None,
      event_tx: tx,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler
    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = events.sender();

    // Initial data load
    self.bootstrap();

    // A failure inside the loop must not skip the terminal cleanup, or the
    // shell is left in raw mode
    let result = self.event_loop(&mut terminal, &mut events).await;

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop<B: Backend>(
    &mut self,
    terminal: &mut Terminal<B>,
    events: &mut EventHandler,
  ) -> Result<()> {
    // Main loop
    while !self.should_quit {
      // Draw UI
      terminal.draw(|frame| ui::draw(frame, self))?;

      // Handle events
      if let Some(event) = events.next().await {
        self.handle_event(event)?;
      }
    }
    Ok(())
  }

  /// Request startup data: the category seed (only while the table is
  /// empty) and one joke for display
  fn bootstrap(&self) {
    if self.needs_category_seed() {
      self.spawn_fetch_categories();
    }

    self.spawn_welcome_joke();
  }

  /// Whether the remote category seed should be requested. True only while
  /// the category table is empty.
  fn needs_category_seed(&self) -> bool {
    match self.store.has_categories() {
      Ok(has) => !has,
      Err(e) => {
        warn!(error = %e, "failed to check category table");
        false
      }
    }
  }

  fn spawn_welcome_joke(&self) {
    let client = self.client.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      match client.random_joke(None).await {
        Ok(joke) => {
          let _ = tx.send(Event::Api(ApiEvent::WelcomeJoke(joke)));
        }
        Err(e) => {
          let _ = tx.send(Event::Error(e.to_string()));
        }
      }
    });
  }

  fn spawn_fetch_joke(&self, category: Option<String>) {
    let client = self.client.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      match client.random_joke(category.as_deref()).await {
        Ok(joke) => {
          let _ = tx.send(Event::Api(ApiEvent::JokeFetched(joke)));
        }
        Err(e) => {
          let _ = tx.send(Event::Error(e.to_string()));
        }
      }
    });
  }

  fn spawn_fetch_categories(&self) {
    let client = self.client.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      match client.categories().await {
        Ok(categories) => {
          let _ = tx.send(Event::Api(ApiEvent::CategoriesFetched(categories)));
        }
        Err(e) => {
          let _ = tx.send(Event::Error(e.to_string()));
        }
      }
    });
  }

  /// Trigger a random joke fetch unless the cooldown is still running
  fn request_fetch(&mut self) {
    if let Some(last) = self.last_fetch {
      if last.elapsed() < FETCH_COOLDOWN {
        debug!("fetch ignored during cooldown");
        return;
      }
    }
    self.last_fetch = Some(Instant::now());
    self.fetching = true;

    let stored = self.store.categories().unwrap_or_else(|e| {
      warn!(error = %e, "failed to read stored categories");
      Vec::new()
    });
    let category = fetch_category(self.config.default_category.as_deref(), &stored);

    debug!(category = ?category, "fetching random joke");
    self.spawn_fetch_joke(category);
  }

  fn handle_event(&mut self, event: Event) -> Result<()> {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {} // UI refresh happens automatically
      Event::Api(api_event) => self.handle_api_event(api_event),
      Event::Error(msg) => {
        // Transport and decode failures are logged and nothing else; the
        // current view stays as it is.
        self.fetching = false;
        warn!(error = %msg, "api request failed");
      }
    }
    Ok(())
  }

  fn handle_api_event(&mut self, event: ApiEvent) {
    match event {
      ApiEvent::WelcomeJoke(joke) => {
        debug!(id = %joke.id, "welcome joke fetched");
        self.current = Some(JokeCard::new(&joke));
      }
      ApiEvent::JokeFetched(joke) => {
        self.fetching = false;
        let card = JokeCard::new(&joke);

        match archive_joke(&self.store, &joke, &card.fetched_at) {
          Ok(ArchiveOutcome::Archived) => {
            info!(id = %joke.id, category = ?joke.category, "joke archived");
            self.refresh_views();
          }
          Ok(ArchiveOutcome::Duplicate) => {
            debug!(id = %joke.id, "joke already archived");
          }
          Ok(ArchiveOutcome::Uncategorized) => {
            debug!(id = %joke.id, "joke has no category, not archived");
          }
          Err(e) => {
            error!(id = %joke.id, error = %e, "failed to archive joke");
          }
        }

        self.current = Some(card);
      }
      ApiEvent::CategoriesFetched(names) => {
        if names.is_empty() {
          debug!("remote category list is empty, nothing to seed");
          return;
        }
        match self.store.seed_categories(&names) {
          Ok(added) => {
            info!(added, total = names.len(), "categories seeded");
            self.refresh_views();
          }
          Err(e) => error!(error = %e, "failed to seed categories"),
        }
      }
    }
  }

  /// Re-read the store snapshots held by open views
  fn refresh_views(&mut self) {
    for view in self.view_stack.iter_mut() {
      match view {
        ViewState::Joke => {}
        ViewState::Archive {
          jokes,
          selected,
          category,
        } => {
          let fresh = match category.as_deref() {
            Some(name) => self.store.jokes_by_category(name),
            None => self.store.jokes(),
          };
          match fresh {
            Ok(fresh) => {
              *jokes = fresh;
              *selected = (*selected).min(jokes.len().saturating_sub(1));
            }
            Err(e) => warn!(error = %e, "failed to refresh archive view"),
          }
        }
        ViewState::Categories { rows, selected } => match self.store.category_counts() {
          Ok(fresh) => {
            *rows = fresh;
            *selected = (*selected).min(rows.len().saturating_sub(1));
          }
          Err(e) => warn!(error = %e, "failed to refresh category view"),
        },
      }
    }
  }

  fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Command => self.handle_command_mode_key(key),
      Mode::Search => self.handle_search_mode_key(key),
    }
  }

  fn handle_normal_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    match key.code {
      // Quit
      KeyCode::Char('q') => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }

      // Fetch another joke
      KeyCode::Char('f') => self.request_fetch(),

      // Navigation
      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
      KeyCode::Enter => {
        if matches!(self.view_stack.last(), Some(ViewState::Joke)) {
          self.request_fetch();
        } else {
          self.enter_selected();
        }
      }
      KeyCode::Esc => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        }
      }

      // Mode switches
      KeyCode::Char(':') => {
        self.mode = Mode::Command;
        self.command_input.clear();
      }
      KeyCode::Char('/') => {
        self.mode = Mode::Search;
        self.search_filter.clear();
      }

      _ => {}
    }
  }

  fn handle_command_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }
      KeyCode::Enter => {
        self.execute_command();
        self.mode = Mode::Normal;
        self.selected_suggestion = 0;
      }
      KeyCode::Tab | KeyCode::Down => {
        // Navigate autocomplete suggestions
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = (self.selected_suggestion + 1) % suggestions.len();
        }
      }
      KeyCode::BackTab | KeyCode::Up => {
        // Navigate autocomplete suggestions backwards
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = if self.selected_suggestion == 0 {
            suggestions.len() - 1
          } else {
            self.selected_suggestion - 1
          };
        }
      }
      KeyCode::Backspace => {
        self.command_input.pop();
        self.selected_suggestion = 0; // Reset selection on input change
      }
      KeyCode::Char(c) => {
        self.command_input.push(c);
        self.selected_suggestion = 0; // Reset selection on input change
      }
      _ => {}
    }
  }

  fn handle_search_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.search_filter.clear();
        self.reset_archive_selection();
      }
      KeyCode::Enter => {
        // Apply filter and return to normal mode
        self.mode = Mode::Normal;
      }
      KeyCode::Backspace => {
        self.search_filter.pop();
        self.reset_archive_selection();
      }
      KeyCode::Char(c) => {
        self.search_filter.push(c);
        self.reset_archive_selection();
      }
      _ => {}
    }
  }

  /// The filter changed, so any archive selection index is stale
  fn reset_archive_selection(&mut self) {
    if let Some(ViewState::Archive { selected, .. }) = self.view_stack.last_mut() {
      *selected = 0;
    }
  }

  fn execute_command(&mut self) {
    // Get the command to execute - either from selected suggestion or direct input
    let suggestions = commands::get_suggestions(&self.command_input);
    let cmd = if !suggestions.is_empty() && self.selected_suggestion < suggestions.len() {
      suggestions[self.selected_suggestion].name.to_string()
    } else {
      self.command_input.trim().to_lowercase()
    };

    match cmd.as_str() {
      "joke" => {
        self.view_stack[0] = ViewState::Joke;
        self.view_stack.truncate(1);
      }
      "archive" => match self.store.jokes() {
        Ok(jokes) => {
          self.view_stack[0] = ViewState::Archive {
            jokes,
            selected: 0,
            category: None,
          };
          self.view_stack.truncate(1);
        }
        Err(e) => warn!(error = %e, "failed to load archive"),
      },
      "categories" => match self.store.category_counts() {
        Ok(rows) => {
          self.view_stack[0] = ViewState::Categories { rows, selected: 0 };
          self.view_stack.truncate(1);
        }
        Err(e) => warn!(error = %e, "failed to load categories"),
      },
      "clear" => self.clear_archive(),
      "quit" => {
        self.should_quit = true;
      }
      _ => {
        // Unknown command
      }
    }
    self.command_input.clear();
  }

  /// Wipe the archive, then reseed categories from the remote list
  fn clear_archive(&mut self) {
    if let Err(e) = self.store.delete_all() {
      error!(error = %e, "failed to clear archive");
      return;
    }
    info!("archive cleared");

    // The category table is empty again, so request a fresh seed
    self.spawn_fetch_categories();
    self.refresh_views();
  }

  fn move_selection(&mut self, delta: i32) {
    if let Some(view) = self.view_stack.last_mut() {
      match view {
        ViewState::Joke => {}
        ViewState::Archive {
          jokes, selected, ..
        } => {
          let len = filter_records(jokes, &self.search_filter).len();
          if len > 0 {
            *selected = (*selected as i32 + delta).rem_euclid(len as i32) as usize;
          }
        }
        ViewState::Categories { rows, selected } => {
          let len = rows.len();
          if len > 0 {
            *selected = (*selected as i32 + delta).rem_euclid(len as i32) as usize;
          }
        }
      }
    }
  }

  fn enter_selected(&mut self) {
    let name = match self.view_stack.last() {
      Some(ViewState::Categories { rows, selected }) => match rows.get(*selected) {
        Some(row) => row.name.clone(),
        None => return,
      },
      _ => return,
    };
    self.open_category(name);
  }

  /// Push an archive view restricted to one category
  fn open_category(&mut self, name: String) {
    match self.store.jokes_by_category(&name) {
      Ok(jokes) => self.view_stack.push(ViewState::Archive {
        jokes,
        selected: 0,
        category: Some(name),
      }),
      Err(e) => warn!(error = %e, category = %name, "failed to load category jokes"),
    }
  }

  // Accessors for UI rendering
  pub fn current_view(&self) -> Option<&ViewState> {
    self.view_stack.last()
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn command_input(&self) -> &str {
    &self.command_input
  }

  pub fn search_filter(&self) -> &str {
    &self.search_filter
  }

  pub fn current_card(&self) -> Option<&JokeCard> {
    self.current.as_ref()
  }

  pub fn is_fetching(&self) -> bool {
    self.fetching
  }

  pub fn api_url(&self) -> &str {
    self.client.base_url()
  }

  pub fn title(&self) -> Option<&str> {
    self.config.title.as_deref()
  }

  /// Label for the fetch scope shown in the header: the configured category
  /// or "random"
  pub fn category_mode(&self) -> &str {
    self.config.default_category.as_deref().unwrap_or("random")
  }

  pub fn autocomplete_suggestions(&self) -> Vec<&'static Command> {
    commands::get_suggestions(&self.command_input)
  }

  pub fn selected_suggestion(&self) -> usize {
    self.selected_suggestion
  }
}

/// Pick the category for the next fetch: explicit override first, then a
/// random stored category, otherwise none (unfiltered fetch)
fn fetch_category(override_category: Option<&str>, stored: &[String]) -> Option<String> {
  if let Some(category) = override_category {
    return Some(category.to_string());
  }
  stored.choose(&mut rand::thread_rng()).cloned()
}

/// Archive a fetched joke: ids already stored and jokes without a category
/// are skipped, otherwise the category row is created if needed and the
/// record inserted with the formatted fetch time.
fn archive_joke(store: &JokeStore, joke: &Joke, fetched_at: &str) -> Result<ArchiveOutcome> {
  let category = match joke.category.as_deref() {
    Some(category) => category,
    None => return Ok(ArchiveOutcome::Uncategorized),
  };

  if store.joke_exists(&joke.id)? {
    return Ok(ArchiveOutcome::Duplicate);
  }

  store.insert_category(category)?;
  store.insert_joke(&JokeRecord {
    id: joke.id.clone(),
    text: joke.text.clone(),
    category: category.to_string(),
    created_at: fetched_at.to_string(),
  })?;

  Ok(ArchiveOutcome::Archived)
}

/// Case-insensitive substring filter over joke text and category
pub fn filter_records<'a>(records: &'a [JokeRecord], filter: &str) -> Vec<&'a JokeRecord> {
  if filter.is_empty() {
    return records.iter().collect();
  }
  let needle = filter.to_lowercase();
  records
    .iter()
    .filter(|r| {
      r.text.to_lowercase().contains(&needle) || r.category.to_lowercase().contains(&needle)
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyEvent;
  use ratatui::backend::TestBackend;

  fn joke(id: &str, category: Option<&str>) -> Joke {
    Joke {
      id: id.to_string(),
      text: format!("joke {}", id),
      category: category.map(String::from),
    }
  }

  /// Config pointing at an unroutable address so stray spawned fetches
  /// fail fast instead of reaching the real API
  fn test_config() -> Config {
    let mut config = Config::default();
    config.api.base_url = "http://127.0.0.1:0".to_string();
    config
  }

  fn test_app() -> App {
    App::with_store(test_config(), JokeStore::open_in_memory().unwrap()).unwrap()
  }

  #[test]
  fn test_archive_joke_inserts_new_id() {
    let store = JokeStore::open_in_memory().unwrap();

    let outcome = archive_joke(&store, &joke("a1", Some("animal")), "01-02-2024 12:00").unwrap();

    assert_eq!(outcome, ArchiveOutcome::Archived);
    let records = store.jokes().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "a1");
    assert_eq!(records[0].category, "animal");
    assert_eq!(records[0].created_at, "01-02-2024 12:00");
  }

  #[test]
  fn test_archive_joke_skips_duplicate_id() {
    let store = JokeStore::open_in_memory().unwrap();
    archive_joke(&store, &joke("a1", Some("animal")), "01-02-2024 12:00").unwrap();

    // Same id again, even with different text, must not create a second
    // record or overwrite the first
    let mut second = joke("a1", Some("animal"));
    second.text = "different text".to_string();
    let outcome = archive_joke(&store, &second, "01-02-2024 13:00").unwrap();

    assert_eq!(outcome, ArchiveOutcome::Duplicate);
    let records = store.jokes().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "joke a1");
    assert_eq!(records[0].created_at, "01-02-2024 12:00");
  }

  #[test]
  fn test_archive_joke_creates_missing_category() {
    let store = JokeStore::open_in_memory().unwrap();
    assert!(!store.category_exists("dev").unwrap());

    let outcome = archive_joke(&store, &joke("d1", Some("dev")), "01-02-2024 12:00").unwrap();

    assert_eq!(outcome, ArchiveOutcome::Archived);
    assert!(store.category_exists("dev").unwrap());
  }

  #[test]
  fn test_archive_joke_skips_uncategorized() {
    let store = JokeStore::open_in_memory().unwrap();

    let outcome = archive_joke(&store, &joke("u1", None), "01-02-2024 12:00").unwrap();

    assert_eq!(outcome, ArchiveOutcome::Uncategorized);
    assert!(store.jokes().unwrap().is_empty());
    assert!(!store.has_categories().unwrap());
  }

  #[test]
  fn test_fetch_category_prefers_override() {
    let stored = vec!["animal".to_string(), "dev".to_string()];
    assert_eq!(
      fetch_category(Some("career"), &stored).as_deref(),
      Some("career")
    );
  }

  #[test]
  fn test_fetch_category_picks_from_store() {
    let stored = vec!["animal".to_string(), "dev".to_string()];
    let picked = fetch_category(None, &stored).unwrap();
    assert!(stored.contains(&picked));
  }

  #[test]
  fn test_fetch_category_empty_store_is_unfiltered() {
    assert_eq!(fetch_category(None, &[]), None);
  }

  #[test]
  fn test_filter_records() {
    let records = vec![
      JokeRecord {
        id: "a1".to_string(),
        text: "A bear story".to_string(),
        category: "animal".to_string(),
        created_at: "01-02-2024 12:00".to_string(),
      },
      JokeRecord {
        id: "d1".to_string(),
        text: "A compiler story".to_string(),
        category: "dev".to_string(),
        created_at: "01-02-2024 12:00".to_string(),
      },
    ];

    assert_eq!(filter_records(&records, "").len(), 2);
    assert_eq!(filter_records(&records, "BEAR").len(), 1);
    assert_eq!(filter_records(&records, "dev").len(), 1);
    assert!(filter_records(&records, "nothing").is_empty());
  }

  #[tokio::test]
  async fn test_welcome_joke_is_not_archived() {
    let mut app = test_app();

    app.handle_api_event(ApiEvent::WelcomeJoke(joke("w1", Some("animal"))));

    assert_eq!(app.current_card().unwrap().id, "w1");
    assert!(app.store.jokes().unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_fetched_joke_is_displayed_and_archived_once() {
    let mut app = test_app();

    app.handle_api_event(ApiEvent::JokeFetched(joke("a1", Some("animal"))));
    assert_eq!(app.current_card().unwrap().id, "a1");
    assert_eq!(app.store.jokes().unwrap().len(), 1);

    // The same id fetched again stays a single record
    app.handle_api_event(ApiEvent::JokeFetched(joke("a1", Some("animal"))));
    assert_eq!(app.store.jokes().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_seed_requested_only_when_store_is_empty() {
    let mut app = test_app();
    assert!(app.needs_category_seed());

    app.handle_api_event(ApiEvent::CategoriesFetched(vec!["animal".to_string()]));

    assert!(!app.needs_category_seed());
  }

  #[tokio::test]
  async fn test_categories_seeded_idempotently() {
    let mut app = test_app();
    let names = vec!["animal".to_string(), "dev".to_string()];

    app.handle_api_event(ApiEvent::CategoriesFetched(names.clone()));
    assert_eq!(app.store.categories().unwrap().len(), 2);

    app.handle_api_event(ApiEvent::CategoriesFetched(names));
    assert_eq!(app.store.categories().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn test_empty_category_list_is_skipped() {
    let mut app = test_app();

    app.handle_api_event(ApiEvent::CategoriesFetched(Vec::new()));

    assert!(!app.store.has_categories().unwrap());
  }

  #[tokio::test]
  async fn test_clear_wipes_store() {
    let mut app = test_app();
    app.handle_api_event(ApiEvent::CategoriesFetched(vec!["animal".to_string()]));
    app.handle_api_event(ApiEvent::JokeFetched(joke("a1", Some("animal"))));
    assert_eq!(app.store.jokes().unwrap().len(), 1);

    app.clear_archive();

    assert!(app.store.jokes().unwrap().is_empty());
    assert!(!app.store.has_categories().unwrap());

    // The reseed response arriving afterwards restores the categories
    app.handle_api_event(ApiEvent::CategoriesFetched(vec![
      "animal".to_string(),
      "dev".to_string(),
    ]));
    assert!(app.store.has_categories().unwrap());
  }

  #[tokio::test]
  async fn test_fetch_respects_cooldown() {
    let mut app = test_app();

    app.last_fetch = Some(Instant::now());
    app.request_fetch();
    assert!(!app.fetching);

    app.last_fetch = Some(Instant::now() - Duration::from_secs(2));
    app.request_fetch();
    assert!(app.fetching);
  }

  #[tokio::test]
  async fn test_commands_switch_root_view() {
    let mut app = test_app();
    app.handle_api_event(ApiEvent::CategoriesFetched(vec!["animal".to_string()]));

    app.command_input = "archive".to_string();
    app.execute_command();
    assert!(matches!(
      app.current_view(),
      Some(ViewState::Archive { category: None, .. })
    ));

    app.command_input = "categories".to_string();
    app.execute_command();
    assert!(matches!(app.current_view(), Some(ViewState::Categories { .. })));

    app.command_input = "joke".to_string();
    app.execute_command();
    assert!(matches!(app.current_view(), Some(ViewState::Joke)));

    app.command_input = "quit".to_string();
    app.execute_command();
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_open_views_pick_up_new_jokes() {
    let mut app = test_app();
    app.handle_api_event(ApiEvent::CategoriesFetched(vec!["animal".to_string()]));

    // Open the archive while it is still empty
    app.command_input = "archive".to_string();
    app.execute_command();
    assert!(matches!(
      app.current_view(),
      Some(ViewState::Archive { jokes, .. }) if jokes.is_empty()
    ));

    app.handle_api_event(ApiEvent::JokeFetched(joke("a1", Some("animal"))));

    // The open view re-reads the store when the joke is archived
    match app.current_view() {
      Some(ViewState::Archive { jokes, .. }) => {
        assert_eq!(jokes.len(), 1);
        assert_eq!(jokes[0].id, "a1");
      }
      other => panic!("expected archive view, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_enter_on_category_opens_filtered_archive() {
    let mut app = test_app();
    app.handle_api_event(ApiEvent::CategoriesFetched(vec![
      "animal".to_string(),
      "dev".to_string(),
    ]));
    app.handle_api_event(ApiEvent::JokeFetched(joke("a1", Some("animal"))));

    app.command_input = "categories".to_string();
    app.execute_command();
    app.enter_selected();

    match app.current_view() {
      Some(ViewState::Archive {
        jokes,
        category: Some(name),
        ..
      }) => {
        assert_eq!(name, "animal");
        assert_eq!(jokes.len(), 1);
        assert_eq!(jokes[0].id, "a1");
      }
      other => panic!("expected filtered archive view, got {:?}", other),
    }
  }

  // The spawned input reader blocks its worker, so this needs more than the
  // single-threaded test runtime
  #[tokio::test(flavor = "multi_thread")]
  async fn test_event_loop_exits_on_quit() {
    let mut app = test_app();
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

    let mut events = EventHandler::new(Duration::from_millis(10));
    app.event_tx = events.sender();
    events
      .sender()
      .send(Event::Key(KeyEvent::new(
        KeyCode::Char('q'),
        KeyModifiers::NONE,
      )))
      .unwrap();

    app.event_loop(&mut terminal, &mut events).await.unwrap();

    assert!(app.should_quit);
  }
}
