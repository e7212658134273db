use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::ui::view::RenderCtx;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Events emitted by search input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// Filter text changed (on each keystroke; empty string on cancel)
  Changed(String),
  /// Search submitted (input closed, filter persists)
  Submitted,
}

/// Filter line above a table, activated with `/`
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
  input: TextInput,
  active: bool,
}

impl SearchInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn query(&self) -> &str {
    self.input.value()
  }

  /// Start editing, keeping the current filter
  pub fn activate(&mut self) {
    self.active = true;
  }

  /// Handle a key event
  /// Call this regardless of active state - it handles activation too
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SearchEvent> {
    if !self.active {
      if key.code == KeyCode::Char('/') {
        self.activate();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(_) => {
        self.active = false;
        KeyResult::Event(SearchEvent::Submitted)
      }
      InputResult::Cancelled => {
        self.active = false;
        self.input.clear();
        KeyResult::Event(SearchEvent::Changed(String::new()))
      }
      InputResult::Consumed => KeyResult::Event(SearchEvent::Changed(self.input.value().to_string())),
      InputResult::NotHandled => KeyResult::Handled,
    }
  }

  /// Render the filter line; shows `placeholder` while empty and idle
  pub fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderCtx, placeholder: &str) {
    let p = ctx.palette;
    let prompt_style = if self.active {
      Style::default().fg(p.warning)
    } else {
      p.muted()
    };

    let mut spans = vec![Span::styled(" / ", prompt_style)];
    if self.input.is_empty() && !self.active {
      spans.push(Span::styled(placeholder.to_string(), p.muted()));
    } else {
      spans.push(Span::styled(self.input.value().to_string(), Style::default().fg(p.fg)));
    }
    if self.active {
      spans.push(Span::styled("_", Style::default().fg(p.warning)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_slash_activates() {
    let mut search = SearchInput::new();
    assert_eq!(search.handle_key(key(KeyCode::Char('x'))), KeyResult::NotHandled);
    assert_eq!(search.handle_key(key(KeyCode::Char('/'))), KeyResult::Handled);
    assert!(search.is_active());
  }

  #[test]
  fn test_typing_emits_changes_and_submit_keeps_filter() {
    let mut search = SearchInput::new();
    search.activate();
    search.handle_key(key(KeyCode::Char('w')));
    assert_eq!(
      search.handle_key(key(KeyCode::Char('o'))),
      KeyResult::Event(SearchEvent::Changed("wo".to_string()))
    );

    assert_eq!(
      search.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(SearchEvent::Submitted)
    );
    assert!(!search.is_active());
    assert_eq!(search.query(), "wo");
  }

  #[test]
  fn test_escape_clears_filter() {
    let mut search = SearchInput::new();
    search.activate();
    search.handle_key(key(KeyCode::Char('a')));
    assert_eq!(
      search.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(SearchEvent::Changed(String::new()))
    );
    assert_eq!(search.query(), "");
  }
}
