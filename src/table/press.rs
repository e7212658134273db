//! Long-press detection for table rows.
//!
//! Terminals only report press, drag and release, so a held button is
//! recognised by checking the armed press on every tick.

use std::time::{Duration, Instant};

/// Hold time after which a press opens the context menu.
pub const LONG_PRESS: Duration = Duration::from_millis(500);

/// Screen cell a press started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
  pub column: u16,
  pub row: u16,
}

impl Position {
  pub const fn new(column: u16, row: u16) -> Self {
    Self { column, row }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressState {
  Idle,
  Armed { since: Instant, at: Position },
  /// Long press already reported; waiting for the release
  Fired,
}

/// What a finished or held press amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
  /// Released before the threshold
  Click(Position),
  /// Held past the threshold
  LongPress(Position),
}

/// `Idle → Armed → (held) LongPress` or `Armed → (released) Click`.
/// Leaving the pressed row while armed cancels.
#[derive(Debug, Clone)]
pub struct PressTracker {
  state: PressState,
  threshold: Duration,
}

impl Default for PressTracker {
  fn default() -> Self {
    Self::new(LONG_PRESS)
  }
}

impl PressTracker {
  pub fn new(threshold: Duration) -> Self {
    Self {
      state: PressState::Idle,
      threshold,
    }
  }

  pub fn press(&mut self, at: Position, now: Instant) {
    self.state = PressState::Armed { since: now, at };
  }

  /// Pointer moved while the button is down. Moving off the pressed row
  /// cancels.
  pub fn drag(&mut self, to: Position) {
    if let PressState::Armed { at, .. } = self.state {
      if at.row != to.row {
        self.state = PressState::Idle;
      }
    }
  }

  pub fn cancel(&mut self) {
    self.state = PressState::Idle;
  }

  /// Button released. Yields a click if the threshold was not reached.
  pub fn release(&mut self, now: Instant) -> Option<PressOutcome> {
    let outcome = match self.state {
      PressState::Armed { since, at } if now.duration_since(since) < self.threshold => {
        Some(PressOutcome::Click(at))
      }
      PressState::Armed { at, .. } => Some(PressOutcome::LongPress(at)),
      PressState::Idle | PressState::Fired => None,
    };
    self.state = PressState::Idle;
    outcome
  }

  /// Fire the long press once the button has been held long enough.
  pub fn tick(&mut self, now: Instant) -> Option<PressOutcome> {
    match self.state {
      PressState::Armed { since, at } if now.duration_since(since) >= self.threshold => {
        self.state = PressState::Fired;
        Some(PressOutcome::LongPress(at))
      }
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const AT: Position = Position::new(4, 7);

  #[test]
  fn test_quick_release_is_click() {
    let start = Instant::now();
    let mut press = PressTracker::default();
    press.press(AT, start);

    assert_eq!(press.tick(start + Duration::from_millis(100)), None);
    assert_eq!(
      press.release(start + Duration::from_millis(120)),
      Some(PressOutcome::Click(AT))
    );
    assert!(!matches!(press.state, PressState::Armed { .. }));
  }

  #[test]
  fn test_hold_fires_once_at_threshold() {
    let start = Instant::now();
    let mut press = PressTracker::default();
    press.press(AT, start);

    assert_eq!(press.tick(start + Duration::from_millis(499)), None);
    assert_eq!(
      press.tick(start + Duration::from_millis(500)),
      Some(PressOutcome::LongPress(AT))
    );
    assert_eq!(press.tick(start + Duration::from_millis(600)), None);
    assert_eq!(press.release(start + Duration::from_millis(700)), None);
  }

  #[test]
  fn test_late_release_without_tick_is_long_press() {
    let start = Instant::now();
    let mut press = PressTracker::default();
    press.press(AT, start);

    assert_eq!(
      press.release(start + Duration::from_millis(800)),
      Some(PressOutcome::LongPress(AT))
    );
  }

  #[test]
  fn test_leaving_row_cancels() {
    let start = Instant::now();
    let mut press = PressTracker::default();
    press.press(AT, start);

    press.drag(Position::new(10, 7));
    assert!(matches!(press.state, PressState::Armed { .. }));

    press.drag(Position::new(10, 8));
    assert!(!matches!(press.state, PressState::Armed { .. }));
    assert_eq!(press.tick(start + Duration::from_secs(1)), None);
    assert_eq!(press.release(start + Duration::from_secs(1)), None);
  }

  #[test]
  fn test_release_without_press() {
    let mut press = PressTracker::default();
    assert_eq!(press.release(Instant::now()), None);
  }
}
