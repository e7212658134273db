use super::KeyResult;
use crate::ui::view::RenderCtx;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmEvent {
  Confirmed(u64),
  Cancelled,
}

/// Modal yes/no question about one entity, e.g. a pending delete.
///
/// The message is picked at render time so it follows the active language.
#[derive(Debug, Clone, Default)]
pub struct ConfirmDialog {
  pending: Option<u64>,
}

impl ConfirmDialog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.pending.is_some()
  }

  pub fn ask(&mut self, id: u64) {
    self.pending = Some(id);
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<ConfirmEvent> {
    let Some(id) = self.pending else {
      return KeyResult::NotHandled;
    };

    match key.code {
      KeyCode::Char('y') | KeyCode::Enter => {
        self.pending = None;
        KeyResult::Event(ConfirmEvent::Confirmed(id))
      }
      KeyCode::Char('n') | KeyCode::Esc | KeyCode::Char('q') => {
        self.pending = None;
        KeyResult::Event(ConfirmEvent::Cancelled)
      }
      _ => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect, ctx: &RenderCtx, message: &str) {
    if self.pending.is_none() {
      return;
    }
    let p = ctx.palette;
    let t = ctx.texts;

    let width = 56.min(area.width);
    let height = 7.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(p.error))
      .style(p.base())
      .title(format!(" {} ", t.confirm_delete));

    let body = vec![
      Line::from(message.to_string()),
      Line::from(""),
      Line::from(vec![
        Span::styled("<y>", p.error()),
        Span::raw(format!(" {}   ", t.delete)),
        Span::styled("<n>", p.accent()),
        Span::raw(format!(" {}", t.cancel)),
      ]),
    ];

    let paragraph = Paragraph::new(body).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, overlay_area);
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
  fn test_confirm() {
    let mut dialog = ConfirmDialog::new();
    dialog.ask(9);
    assert!(dialog.is_active());
    assert_eq!(
      dialog.handle_key(key(KeyCode::Char('y'))),
      KeyResult::Event(ConfirmEvent::Confirmed(9))
    );
    assert!(!dialog.is_active());
  }

  #[test]
  fn test_cancel() {
    let mut dialog = ConfirmDialog::new();
    dialog.ask(9);
    assert_eq!(
      dialog.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(ConfirmEvent::Cancelled)
    );
  }

  #[test]
  fn test_other_keys_are_swallowed() {
    let mut dialog = ConfirmDialog::new();
    dialog.ask(1);
    assert_eq!(dialog.handle_key(key(KeyCode::Char('d'))), KeyResult::Handled);
    assert!(dialog.is_active());
  }

  #[test]
  fn test_inactive_passes_through() {
    let mut dialog = ConfirmDialog::new();
    assert_eq!(dialog.handle_key(key(KeyCode::Char('y'))), KeyResult::NotHandled);
  }
}
