use super::user_detail::{field, section};
use super::{PostFormView, Services, UserDetailView};
use crate::api::types::Post;
use crate::cache::EntityKind;
use crate::i18n::Texts;
use crate::query::QueryState;
use crate::ui::components::{ConfirmDialog, ConfirmEvent, KeyResult};
use crate::ui::theme::Palette;
use crate::ui::view::{RenderCtx, ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Read-only post page with its author
pub struct PostDetailView {
  services: Services,
  post_id: u64,
  scroll: u16,
  confirm: ConfirmDialog,
}

impl PostDetailView {
  pub fn new(services: Services, post_id: u64) -> Self {
    Self {
      services,
      post_id,
      scroll: 0,
      confirm: ConfirmDialog::new(),
    }
  }

  fn post(&self) -> QueryState<Post> {
    self.services.store.posts().get(self.post_id)
  }

  fn author_lines(&self, user_id: u64, t: &Texts, p: &Palette) -> Vec<Line<'static>> {
    let mut lines = vec![section(p, t.author_details)];
    match self.services.store.users().get(user_id) {
      QueryState::Idle | QueryState::Loading => lines.push(Line::styled(format!("  {}", t.loading), p.muted())),
      QueryState::Success(user) => {
        lines.push(field(p, t.name, &user.name));
        lines.push(field(p, t.username, &user.username));
        lines.push(field(p, t.email, &user.email));
      }
      // Posts may point at users that do not exist
      QueryState::Error(_) => lines.push(field(p, t.author, &format!("User{}", user_id))),
    }
    lines
  }
}

impl View for PostDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.confirm.handle_key(key) {
      KeyResult::Event(ConfirmEvent::Confirmed(id)) => {
        self.services.delete(EntityKind::Post, id);
        return ViewAction::Pop;
      }
      KeyResult::Event(ConfirmEvent::Cancelled) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      KeyCode::Char('e') => {
        if let QueryState::Success(post) = self.post() {
          return ViewAction::Push(Box::new(PostFormView::edit(self.services.clone(), &post)));
        }
      }
      KeyCode::Char('d') => {
        if self.post().is_success() {
          self.confirm.ask(self.post_id);
        }
      }
      KeyCode::Char('u') => {
        if let QueryState::Success(post) = self.post() {
          return ViewAction::Push(Box::new(UserDetailView::new(self.services.clone(), post.user_id)));
        }
      }
      KeyCode::Char('r') => self.services.refresh(),
      KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
      KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
      _ => {}
    }
    ViewAction::None
  }

  fn handle_mouse(&mut self, mouse: MouseEvent) -> ViewAction {
    match mouse.kind {
      MouseEventKind::ScrollDown => self.scroll = self.scroll.saturating_add(1),
      MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderCtx) {
    let p = ctx.palette;
    let t = ctx.texts;

    let block = Block::default()
      .title(format!(" {} ", t.post_details))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(p.border())
      .style(p.base());

    let lines = match self.post() {
      QueryState::Idle | QueryState::Loading => vec![Line::styled(t.loading, p.muted())],
      QueryState::Error(e) => vec![
        Line::styled(format!("{}: {}", t.error_loading_posts, e), p.error()),
        Line::styled(t.retry_hint, p.muted()),
      ],
      QueryState::Success(post) => {
        let mut lines = vec![
          field(p, t.id, &post.id.to_string()),
          field(p, t.user_id, &post.user_id.to_string()),
          Line::from(""),
          section(p, t.title_field),
          Line::styled(format!("  {}", post.title), Style::default().fg(p.fg).bold()),
          Line::from(""),
          section(p, t.content),
        ];
        lines.extend(
          post
            .body
            .lines()
            .map(|l| Line::styled(format!("  {}", l), Style::default().fg(p.fg))),
        );
        lines.push(Line::from(""));
        lines.extend(self.author_lines(post.user_id, t, p));
        lines
      }
    };

    let paragraph = Paragraph::new(lines)
      .block(block)
      .wrap(Wrap { trim: false })
      .scroll((self.scroll, 0));
    frame.render_widget(paragraph, area);

    let message = format!("{} (#{})", t.delete_post_confirmation, self.post_id);
    self.confirm.render_overlay(frame, area, ctx, &message);
  }

  fn breadcrumb_label(&self, t: &Texts) -> String {
    format!("{} [#{}]", t.post_details, self.post_id)
  }

  fn captures_input(&self) -> bool {
    self.confirm.is_active()
  }

  fn shortcuts(&self, t: &Texts) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", t.command).with_priority(10),
      ShortcutInfo::new("e", t.edit).with_priority(20),
      ShortcutInfo::new("d", t.delete).with_priority(21),
      ShortcutInfo::new("u", t.author).with_priority(25),
      ShortcutInfo::new("r", t.refresh).with_priority(30),
      ShortcutInfo::new("q", t.back).with_priority(90),
    ]
  }
}
