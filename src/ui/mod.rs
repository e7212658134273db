pub mod components;
pub mod renderfns;
pub mod theme;
pub mod view;
pub mod views;

pub use theme::Theme;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use renderfns::{draw_footer, draw_header};

/// Top-level sections reachable from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  Users,
  Posts,
}

impl Tab {
  pub const ALL: [Tab; 2] = [Tab::Users, Tab::Posts];
}

/// Header, content and footer rows of the screen
pub fn layout(area: Rect) -> [Rect; 3] {
  Layout::vertical([
    Constraint::Length(2), // Header
    Constraint::Min(1),    // Main content
    Constraint::Length(1), // Breadcrumb
  ])
  .areas(area)
}

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let ctx = app.render_ctx();
  let area = frame.area();
  app.set_screen(area);
  let [header, content, footer] = layout(area);

  frame.render_widget(Block::default().style(ctx.palette.base()), area);
  draw_header(frame, header, &ctx, &app.header_info());

  if let Some(view) = app.current_view_mut() {
    view.render(frame, content, &ctx);
  }

  draw_footer(frame, footer, &ctx, &app.breadcrumb());
  app.toasts().render(frame, content, &ctx);
  app.command_input().render_overlay(frame, area, &ctx);
}
