use crate::i18n::Msg;
use crate::ui::view::RenderCtx;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const TOAST_TTL: Duration = Duration::from_secs(3);
const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone)]
struct Toast {
  msg: Msg,
  expires: Instant,
}

/// Stack of transient notices in the bottom-right corner.
#[derive(Debug, Default)]
pub struct Toasts {
  items: VecDeque<Toast>,
}

impl Toasts {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, msg: Msg, now: Instant) {
    self.items.push_back(Toast {
      msg,
      expires: now + TOAST_TTL,
    });
    while self.items.len() > MAX_VISIBLE {
      self.items.pop_front();
    }
  }

  /// Drop expired toasts. Returns true if any were removed.
  pub fn expire(&mut self, now: Instant) -> bool {
    let before = self.items.len();
    self.items.retain(|t| t.expires > now);
    self.items.len() != before
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderCtx) {
    if self.is_empty() {
      return;
    }
    let p = ctx.palette;
    let width = 48.min(area.width);
    let mut bottom = area.bottom();

    for toast in self.items.iter().rev() {
      let text = toast.msg.render(ctx.texts);
      let lines = (text.chars().count() as u16 / width.saturating_sub(4).max(1)) + 1;
      let height = (lines + 2).min(area.height);
      if bottom < area.y + height {
        break;
      }
      let rect = Rect::new(area.right().saturating_sub(width), bottom - height, width, height);
      bottom -= height;

      let color = if toast.msg.is_error() { p.error } else { p.success };
      let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .style(p.base());

      frame.render_widget(Clear, rect);
      frame.render_widget(
        Paragraph::new(text)
          .style(Style::default().fg(color))
          .wrap(Wrap { trim: true })
          .block(block),
        rect,
      );
    }
  }
}
