use super::KeyResult;
use crate::i18n::Texts;
use crate::table::{Position, RowAction};
use crate::ui::view::RenderCtx;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

const WIDTH: u16 = 18;
const HEIGHT: u16 = RowAction::ALL.len() as u16 + 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
  Chosen(RowAction, u64),
  Dismissed,
}

#[derive(Debug, Clone, Copy)]
struct OpenMenu {
  id: u64,
  rect: Rect,
  selected: usize,
}

/// Row context menu with View/Edit/Delete, drawn at the pointer.
///
/// Closes on a choice, Esc, an outside click, a scroll, or when another
/// menu is opened.
#[derive(Debug, Clone, Default)]
pub struct ContextMenu {
  open: Option<OpenMenu>,
}

fn action_label(t: &Texts, action: RowAction) -> &'static str {
  match action {
    RowAction::View => t.view,
    RowAction::Edit => t.edit,
    RowAction::Delete => t.delete,
  }
}

impl ContextMenu {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_open(&self) -> bool {
    self.open.is_some()
  }

  /// Open for row `id` at `at`, kept inside `bounds`. Replaces any open menu.
  pub fn open(&mut self, id: u64, at: Position, bounds: Rect) {
    let width = WIDTH.min(bounds.width);
    let height = HEIGHT.min(bounds.height);
    let max_x = bounds.right().saturating_sub(width);
    let max_y = bounds.bottom().saturating_sub(height);
    let rect = Rect::new(
      at.column.clamp(bounds.x, max_x.max(bounds.x)),
      at.row.clamp(bounds.y, max_y.max(bounds.y)),
      width,
      height,
    );
    self.open = Some(OpenMenu {
      id,
      rect,
      selected: 0,
    });
  }

  pub fn close(&mut self) {
    self.open = None;
  }

  fn choose(&mut self, index: usize) -> KeyResult<MenuEvent> {
    let Some(menu) = self.open.take() else {
      return KeyResult::NotHandled;
    };
    match RowAction::ALL.get(index) {
      Some(action) => KeyResult::Event(MenuEvent::Chosen(*action, menu.id)),
      None => KeyResult::Event(MenuEvent::Dismissed),
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<MenuEvent> {
    let Some(menu) = self.open.as_mut() else {
      return KeyResult::NotHandled;
    };
    let count = RowAction::ALL.len();

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => {
        self.close();
        KeyResult::Event(MenuEvent::Dismissed)
      }
      KeyCode::Char('j') | KeyCode::Down => {
        menu.selected = (menu.selected + 1) % count;
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        menu.selected = (menu.selected + count - 1) % count;
        KeyResult::Handled
      }
      KeyCode::Enter => {
        let index = menu.selected;
        self.choose(index)
      }
      KeyCode::Char(c) => match RowAction::ALL.iter().position(|a| a.key() == c) {
        Some(index) => self.choose(index),
        None => KeyResult::Handled,
      },
      _ => KeyResult::Handled,
    }
  }

  /// Mouse handling while open. Every event is consumed so the table
  /// underneath never sees the click that dismissed the menu.
  pub fn handle_mouse(&mut self, mouse: MouseEvent) -> KeyResult<MenuEvent> {
    let Some(menu) = self.open else {
      return KeyResult::NotHandled;
    };
    let inside = menu
      .rect
      .contains(layout::Position::new(mouse.column, mouse.row));

    match mouse.kind {
      MouseEventKind::Down(MouseButton::Left) if inside => {
        let first_item = menu.rect.y + 1;
        if mouse.row < first_item {
          return KeyResult::Handled;
        }
        self.choose((mouse.row - first_item) as usize)
      }
      MouseEventKind::Moved if inside => {
        if let Some(open) = self.open.as_mut() {
          let index = mouse.row.saturating_sub(menu.rect.y + 1) as usize;
          if index < RowAction::ALL.len() {
            open.selected = index;
          }
        }
        KeyResult::Handled
      }
      MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
        self.close();
        KeyResult::Event(MenuEvent::Dismissed)
      }
      _ => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, ctx: &RenderCtx) {
    let Some(menu) = self.open else {
      return;
    };
    let p = ctx.palette;

    frame.render_widget(Clear, menu.rect);

    let items: Vec<ListItem> = RowAction::ALL
      .iter()
      .map(|action| {
        let style = if *action == RowAction::Delete {
          p.error()
        } else {
          Style::default().fg(p.fg)
        };
        ListItem::new(Line::from(vec![
          Span::styled(format!(" {} ", action.key()), p.accent()),
          Span::styled(action_label(ctx.texts, *action), style),
        ]))
      })
      .collect();

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(p.border())
      .style(p.base());
    let list = List::new(items).block(block).highlight_style(p.selected());

    let mut state = ListState::default();
    state.select(Some(menu.selected));
    frame.render_stateful_widget(list, menu.rect, &mut state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  const BOUNDS: Rect = Rect {
    x: 0,
    y: 0,
    width: 80,
    height: 24,
  };

  fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
      kind,
      column,
      row,
      modifiers: KeyModifiers::NONE,
    }
  }

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn opened(id: u64) -> ContextMenu {
    let mut menu = ContextMenu::new();
    menu.open(id, Position::new(10, 5), BOUNDS);
    menu
  }

  #[test]
  fn test_escape_closes() {
    let mut menu = opened(3);
    assert_eq!(
      menu.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(MenuEvent::Dismissed)
    );
    assert!(!menu.is_open());
  }

  #[test]
  fn test_keyboard_selection() {
    let mut menu = opened(3);
    menu.handle_key(key(KeyCode::Down));
    assert_eq!(
      menu.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(MenuEvent::Chosen(RowAction::Edit, 3))
    );
    assert!(!menu.is_open());
  }

  #[test]
  fn test_shortcut_key_chooses() {
    let mut menu = opened(4);
    assert_eq!(
      menu.handle_key(key(KeyCode::Char('d'))),
      KeyResult::Event(MenuEvent::Chosen(RowAction::Delete, 4))
    );
  }

  #[test]
  fn test_click_on_item() {
    let mut menu = opened(7);
    // Border on row 5, items on rows 6..=8
    let result = menu.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 12, 8));
    assert_eq!(result, KeyResult::Event(MenuEvent::Chosen(RowAction::Delete, 7)));
  }

  #[test]
  fn test_outside_click_closes() {
    let mut menu = opened(7);
    let result = menu.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 60, 20));
    assert_eq!(result, KeyResult::Event(MenuEvent::Dismissed));
    assert!(!menu.is_open());
  }

  #[test]
  fn test_scroll_closes() {
    let mut menu = opened(7);
    menu.handle_mouse(mouse(MouseEventKind::ScrollDown, 12, 6));
    assert!(!menu.is_open());
  }

  #[test]
  fn test_reopen_replaces_menu() {
    let mut menu = opened(1);
    menu.open(2, Position::new(30, 10), BOUNDS);
    assert_eq!(menu.open.map(|m| m.id), Some(2));
  }

  #[test]
  fn test_menu_stays_inside_bounds() {
    let mut menu = ContextMenu::new();
    menu.open(1, Position::new(79, 23), BOUNDS);
    let rect = menu.open.map(|m| m.rect).unwrap();
    assert!(rect.right() <= BOUNDS.right());
    assert!(rect.bottom() <= BOUNDS.bottom());
  }

  #[test]
  fn test_closed_menu_ignores_input() {
    let mut menu = ContextMenu::new();
    assert_eq!(menu.handle_key(key(KeyCode::Enter)), KeyResult::NotHandled);
    assert_eq!(
      menu.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 1, 1)),
      KeyResult::NotHandled
    );
  }
}
