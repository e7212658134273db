use super::{PostDetailView, Services, UserFormView};
use crate::api::types::{Post, User};
use crate::cache::EntityKind;
use crate::i18n::Texts;
use crate::query::QueryState;
use crate::ui::components::{ConfirmDialog, ConfirmEvent, KeyResult};
use crate::ui::theme::Palette;
use crate::ui::view::{RenderCtx, ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

const LABEL_WIDTH: usize = 18;

/// Read-only user page with the user's posts below
pub struct UserDetailView {
  services: Services,
  user_id: u64,
  scroll: u16,
  /// Post row selected with `j/k` in the posts section
  selected_post: usize,
  confirm: ConfirmDialog,
}

pub(super) fn field<'a>(p: &Palette, label: &str, value: &str) -> Line<'a> {
  Line::from(vec![
    Span::styled(format!("  {:<width$}", label, width = LABEL_WIDTH), p.muted()),
    Span::styled(value.to_string(), Style::default().fg(p.fg)),
  ])
}

pub(super) fn section<'a>(p: &Palette, title: &str) -> Line<'a> {
  Line::from(Span::styled(title.to_string(), p.heading()))
}

impl UserDetailView {
  pub fn new(services: Services, user_id: u64) -> Self {
    Self {
      services,
      user_id,
      scroll: 0,
      selected_post: 0,
      confirm: ConfirmDialog::new(),
    }
  }

  fn user(&self) -> QueryState<User> {
    self.services.store.users().get(self.user_id)
  }

  fn posts(&self) -> Vec<Post> {
    self
      .services
      .store
      .posts_by_user(self.user_id)
      .data()
      .cloned()
      .unwrap_or_default()
  }

  fn user_lines(&self, user: &User, t: &Texts, p: &Palette) -> Vec<Line<'static>> {
    vec![
      section(p, t.basic_information),
      field(p, t.id, &user.id.to_string()),
      field(p, t.name, &user.name),
      field(p, t.username, &user.username),
      field(p, t.email, &user.email),
      Line::from(""),
      section(p, t.contact_information),
      field(p, t.phone, &user.phone),
      field(p, t.website, &user.website),
      Line::from(""),
      section(p, t.address_information),
      field(p, t.street, &user.address.street),
      field(p, t.suite, &user.address.suite),
      field(p, t.city, &user.address.city),
      field(p, t.zipcode, &user.address.zipcode),
      field(p, t.latitude, &user.address.geo.lat),
      field(p, t.longitude, &user.address.geo.lng),
      Line::from(""),
      section(p, t.company_information),
      field(p, t.company_name, &user.company.name),
      field(p, t.catch_phrase, &user.company.catch_phrase),
      field(p, t.business_strategy, &user.company.bs),
      Line::from(""),
    ]
  }

  fn post_lines(&self, t: &Texts, p: &Palette) -> Vec<Line<'static>> {
    let posts = self.services.store.posts_by_user(self.user_id);
    let mut lines = vec![section(p, &format!("{} ({})", t.user_posts, posts.data().map_or(0, |v| v.len())))];
    match &posts {
      QueryState::Idle | QueryState::Loading => lines.push(Line::styled(format!("  {}", t.loading), p.muted())),
      QueryState::Error(e) => lines.push(Line::styled(format!("  {}: {}", t.error_loading_posts, e), p.error())),
      QueryState::Success(list) if list.is_empty() => {
        lines.push(Line::styled(format!("  {}", t.no_posts_found), p.muted()))
      }
      QueryState::Success(list) => {
        for (i, post) in list.iter().enumerate() {
          let style = if i == self.selected_post {
            p.selected()
          } else {
            Style::default().fg(p.fg)
          };
          lines.push(Line::from(vec![
            Span::styled(format!("  {:>4} ", post.id), p.accent()),
            Span::styled(post.title.clone(), style),
          ]));
        }
      }
    }
    lines
  }
}

impl View for UserDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.confirm.handle_key(key) {
      KeyResult::Event(ConfirmEvent::Confirmed(id)) => {
        self.services.delete(EntityKind::User, id);
        return ViewAction::Pop;
      }
      KeyResult::Event(ConfirmEvent::Cancelled) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      KeyCode::Char('e') => {
        if let QueryState::Success(user) = self.user() {
          return ViewAction::Push(Box::new(UserFormView::edit(self.services.clone(), &user)));
        }
      }
      KeyCode::Char('d') => {
        if self.user().is_success() {
          self.confirm.ask(self.user_id);
        }
      }
      KeyCode::Char('r') => self.services.refresh(),
      KeyCode::Char('j') | KeyCode::Down => {
        let count = self.posts().len();
        if self.selected_post + 1 < count {
          self.selected_post += 1;
        }
      }
      KeyCode::Char('k') | KeyCode::Up => self.selected_post = self.selected_post.saturating_sub(1),
      KeyCode::PageDown => self.scroll = self.scroll.saturating_add(5),
      KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(5),
      KeyCode::Enter => {
        if let Some(post) = self.posts().get(self.selected_post) {
          return ViewAction::Push(Box::new(PostDetailView::new(self.services.clone(), post.id)));
        }
      }
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
      .title(format!(" {} ", t.user_details))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(p.border())
      .style(p.base());

    let lines = match self.user() {
      QueryState::Idle | QueryState::Loading => vec![Line::styled(t.loading, p.muted())],
      QueryState::Error(e) => vec![
        Line::styled(format!("{}: {}", t.error_loading_users, e), p.error()),
        Line::styled(t.retry_hint, p.muted()),
      ],
      QueryState::Success(user) => {
        let mut lines = self.user_lines(&user, t, p);
        lines.extend(self.post_lines(t, p));
        lines
      }
    };

    let paragraph = Paragraph::new(lines)
      .block(block)
      .wrap(Wrap { trim: false })
      .scroll((self.scroll, 0));
    frame.render_widget(paragraph, area);

    let message = format!("{} (#{})", t.delete_user_confirmation, self.user_id);
    self.confirm.render_overlay(frame, area, ctx, &message);
  }

  fn breadcrumb_label(&self, t: &Texts) -> String {
    match self.user().data() {
      Some(user) => format!("{} [{}]", t.user_details, user.username),
      None => format!("{} [#{}]", t.user_details, self.user_id),
    }
  }

  fn captures_input(&self) -> bool {
    self.confirm.is_active()
  }

  fn shortcuts(&self, t: &Texts) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", t.command).with_priority(10),
      ShortcutInfo::new("e", t.edit).with_priority(20),
      ShortcutInfo::new("d", t.delete).with_priority(21),
      ShortcutInfo::new("r", t.refresh).with_priority(30),
      ShortcutInfo::new("q", t.back).with_priority(90),
    ]
  }
}
