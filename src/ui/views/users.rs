use super::{Services, UserDetailView, UserFormView};
use crate::api::types::{post_count, User};
use crate::cache::EntityKind;
use crate::i18n::Texts;
use crate::table::RowAction;
use crate::ui::components::{Column, ConfirmDialog, ConfirmEvent, DataTable, KeyResult, TableText};
use crate::ui::view::{RenderCtx, ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::prelude::*;
use std::time::Instant;

const COLUMNS: [Column; 4] = [
  Column::new(|t| t.name, Constraint::Percentage(30)),
  Column::new(|t| t.username, Constraint::Percentage(20)),
  Column::new(|t| t.email, Constraint::Percentage(35)),
  Column::new(|t| t.post_count, Constraint::Length(14)),
];

/// Users tab: the users table with search, paging and row actions
pub struct UsersView {
  services: Services,
  table: DataTable,
  confirm: ConfirmDialog,
}

impl UsersView {
  pub fn new(services: Services) -> Self {
    let table = DataTable::new(services.tables.users.page_size, services.tables.users.sort);
    Self {
      services,
      table,
      confirm: ConfirmDialog::new(),
    }
  }

  fn cached(&self, id: u64) -> Option<User> {
    self
      .services
      .store
      .users()
      .peek()
      .data()
      .and_then(|users| users.iter().find(|u| u.id == id).cloned())
  }

  fn dispatch(&mut self, action: RowAction, id: u64) -> ViewAction {
    match action {
      RowAction::View => ViewAction::Push(Box::new(UserDetailView::new(self.services.clone(), id))),
      RowAction::Edit => match self.cached(id) {
        Some(user) => ViewAction::Push(Box::new(UserFormView::edit(self.services.clone(), &user))),
        None => ViewAction::None,
      },
      RowAction::Delete => {
        self.confirm.ask(id);
        ViewAction::None
      }
    }
  }

  fn text(t: &Texts) -> TableText {
    TableText {
      title: t.users_list,
      placeholder: t.search_users,
      loading: t.loading_users,
      error: t.error_loading_users,
      empty: t.no_users_found,
      no_match: t.no_users_matching,
    }
  }
}

impl View for UsersView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.confirm.handle_key(key) {
      KeyResult::Event(ConfirmEvent::Confirmed(id)) => {
        self.services.delete(EntityKind::User, id);
        return ViewAction::None;
      }
      KeyResult::Event(ConfirmEvent::Cancelled) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match self.table.handle_key(key) {
      KeyResult::Event((action, id)) => return self.dispatch(action, id),
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('a') => ViewAction::Push(Box::new(UserFormView::create(self.services.clone()))),
      KeyCode::Char('r') => {
        self.services.refresh();
        ViewAction::None
      }
      _ => ViewAction::None,
    }
  }

  fn handle_mouse(&mut self, mouse: MouseEvent) -> ViewAction {
    if self.confirm.is_active() {
      return ViewAction::None;
    }
    match self.table.handle_mouse(mouse, Instant::now()) {
      KeyResult::Event((action, id)) => self.dispatch(action, id),
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderCtx) {
    let users = self.services.store.users().list();
    let posts = self.services.store.posts().list();
    let counts = posts.data();

    self.table.render(
      frame,
      area,
      ctx,
      &Self::text(ctx.texts),
      &users,
      &COLUMNS,
      |user: &User| {
        vec![
          user.name.clone(),
          user.username.clone(),
          user.email.clone(),
          counts
            .map(|posts| post_count(posts, user.id).to_string())
            .unwrap_or_else(|| "-".to_string()),
        ]
      },
    );

    self
      .confirm
      .render_overlay(frame, area, ctx, ctx.texts.delete_user_confirmation);
  }

  fn breadcrumb_label(&self, t: &Texts) -> String {
    t.users_list.to_string()
  }

  fn tick(&mut self) -> ViewAction {
    self.table.tick(Instant::now());
    ViewAction::None
  }

  fn captures_input(&self) -> bool {
    self.table.captures_input() || self.confirm.is_active()
  }

  fn shortcuts(&self, t: &Texts) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", t.command).with_priority(10),
      ShortcutInfo::new("/", t.search).with_priority(20),
      ShortcutInfo::new("a", t.add_user).with_priority(30),
      ShortcutInfo::new("v", t.view).with_priority(40),
      ShortcutInfo::new("e", t.edit).with_priority(41),
      ShortcutInfo::new("d", t.delete).with_priority(42),
      ShortcutInfo::new("m", t.menu).with_priority(50),
      ShortcutInfo::new("r", t.refresh).with_priority(60),
    ]
  }
}
