use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::prelude::*;

use crate::i18n::Texts;
use crate::ui::theme::Palette;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }
}

/// Language and colors for one frame.
#[derive(Clone, Copy)]
pub struct RenderCtx {
  pub texts: &'static Texts,
  pub palette: &'static Palette,
}

/// Actions that a view can request in response to user input
pub enum ViewAction {
  /// No action needed
  None,
  /// Push a new view onto the stack
  Push(Box<dyn View>),
  /// Pop current view from stack (go back)
  Pop,
}

/// Trait for view behavior
///
/// Views handle their own input modes (search, forms, menus) and return
/// actions for the App to execute: App → View → Components.
///
/// Views read the shared cache on every render, so they never hold a copy of
/// remote data. In-flight writes are `Mutation<T>`s polled from `tick()`.
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  /// Handle a mouse event inside the content area
  fn handle_mouse(&mut self, _mouse: MouseEvent) -> ViewAction {
    ViewAction::None
  }

  /// Render the view to the frame
  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderCtx);

  /// Get the breadcrumb label for this view
  fn breadcrumb_label(&self, t: &Texts) -> String;

  /// Called on each tick to poll mutations and timers
  fn tick(&mut self) -> ViewAction {
    ViewAction::None
  }

  /// Whether a write started here is still in flight. Busy views keep
  /// being ticked after they are closed so their outcome is still reported.
  fn is_busy(&self) -> bool {
    false
  }

  /// Whether the view is consuming raw text (search box, form), in which
  /// case global single-key shortcuts must not fire
  fn captures_input(&self) -> bool {
    false
  }

  /// Get keyboard shortcuts to display in the header
  fn shortcuts(&self, t: &Texts) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", t.command).with_priority(10),
      ShortcutInfo::new("q", t.back).with_priority(90),
    ]
  }
}
