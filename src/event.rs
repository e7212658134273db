use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::i18n::Msg;

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Mouse press, release, drag or scroll
  Mouse(MouseEvent),
  /// Periodic tick for cache polling, long-press timing and toast expiry
  Tick,
  /// Message for the toast area, sent from background tasks
  Notice(Msg),
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

    let input_tx = tx.clone();
    tokio::task::spawn_blocking(move || loop {
      let event = if event::poll(tick_rate).unwrap_or(false) {
        match event::read() {
          Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
          Ok(CrosstermEvent::Mouse(mouse)) => Event::Mouse(mouse),
          _ => continue,
        }
      } else {
        Event::Tick
      };
      if input_tx.send(event).is_err() {
        break;
      }
    });

    Self { tx, rx }
  }

  /// Handle for background tasks that report back to the UI
  pub fn notifier(&self) -> Notifier {
    Notifier {
      tx: self.tx.clone(),
    }
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}

/// Sends toast messages into the event loop.
#[derive(Debug, Clone)]
pub struct Notifier {
  tx: mpsc::UnboundedSender<Event>,
}

impl Notifier {
  pub fn new(tx: mpsc::UnboundedSender<Event>) -> Self {
    Self { tx }
  }

  pub fn notify(&self, msg: Msg) {
    // The loop is gone only during shutdown
    let _ = self.tx.send(Event::Notice(msg));
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::EntityKind;
  use crate::i18n::Outcome;

  #[test]
  fn test_notifier_forwards_messages() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let notifier = Notifier::new(tx);

    notifier.notify(Msg::Done(EntityKind::Post, Outcome::Deleted));

    match rx.try_recv() {
      Ok(Event::Notice(msg)) => assert_eq!(msg, Msg::Done(EntityKind::Post, Outcome::Deleted)),
      other => panic!("unexpected event: {:?}", other),
    }
  }

  #[test]
  fn test_notify_after_shutdown_is_silent() {
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    Notifier::new(tx).notify(Msg::Refreshing);
  }
}
