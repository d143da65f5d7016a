use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::api::types::Joke;

/// Results delivered by background API tasks
#[derive(Debug)]
pub enum ApiEvent {
  /// Random joke fetched for the initial display; never archived
  WelcomeJoke(Joke),
  /// Random joke fetched by a user action; archived when its id is new
  JokeFetched(Joke),
  /// Remote category list, fetched to seed an empty store
  CategoriesFetched(Vec<String>),
}

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Periodic tick for UI refresh
  Tick,
  /// Completed API call
  Api(ApiEvent),
  /// Failed API call; logged, never surfaced beyond that
  Error(String),
}

/// Event handler that produces events from terminal input and a tick timer
pub struct EventHandler {
  tx: mpsc::UnboundedSender<Event>,
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // Spawn terminal event reader
    let input_tx = tx.clone();
    tokio::spawn(async move {
      loop {
        if event::poll(tick_rate).unwrap_or(false) {
          if let Ok(evt) = event::read() {
            if let CrosstermEvent::Key(key) = evt {
              if input_tx.send(Event::Key(key)).is_err() {
                break;
              }
            }
          }
        } else {
          // Tick
          if input_tx.send(Event::Tick).is_err() {
            break;
          }
        }
      }
    });

    Self { tx, rx }
  }

  /// A sender for background tasks to push API results into the loop
  pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
    self.tx.clone()
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
