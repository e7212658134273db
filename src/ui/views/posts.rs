use super::{PostDetailView, PostFormView, Services};
use crate::api::types::{author_name, Post};
use crate::cache::EntityKind;
use crate::i18n::Texts;
use crate::table::RowAction;
use crate::ui::components::{Column, ConfirmDialog, ConfirmEvent, DataTable, KeyResult, TableText};
use crate::ui::view::{RenderCtx, ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::prelude::*;
use std::time::Instant;

const COLUMNS: [Column; 3] = [
  Column::new(|t| t.title_field, Constraint::Percentage(60)),
  Column::new(|t| t.author, Constraint::Percentage(25)),
  Column::new(|t| t.user_id, Constraint::Length(14)),
];

/// Posts tab
pub struct PostsView {
  services: Services,
  table: DataTable,
  confirm: ConfirmDialog,
}

impl PostsView {
  pub fn new(services: Services) -> Self {
    let table = DataTable::new(services.tables.posts.page_size, services.tables.posts.sort);
    Self {
      services,
      table,
      confirm: ConfirmDialog::new(),
    }
  }

  fn cached(&self, id: u64) -> Option<Post> {
    self
      .services
      .store
      .posts()
      .peek()
      .data()
      .and_then(|posts| posts.iter().find(|p| p.id == id).cloned())
  }

  fn dispatch(&mut self, action: RowAction, id: u64) -> ViewAction {
    match action {
      RowAction::View => ViewAction::Push(Box::new(PostDetailView::new(self.services.clone(), id))),
      RowAction::Edit => match self.cached(id) {
        Some(post) => ViewAction::Push(Box::new(PostFormView::edit(self.services.clone(), &post))),
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
      title: t.posts_list,
      placeholder: t.search_posts,
      loading: t.loading_posts,
      error: t.error_loading_posts,
      empty: t.no_posts_found,
      no_match: t.no_posts_matching,
    }
  }
}

impl View for PostsView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.confirm.handle_key(key) {
      KeyResult::Event(ConfirmEvent::Confirmed(id)) => {
        self.services.delete(EntityKind::Post, id);
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
      KeyCode::Char('a') => ViewAction::Push(Box::new(PostFormView::create(self.services.clone()))),
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
    let posts = self.services.store.posts().list();
    let users = self.services.store.users().list();
    let users = users.data().map(|u| u.as_slice()).unwrap_or(&[]);

    self.table.render(
      frame,
      area,
      ctx,
      &Self::text(ctx.texts),
      &posts,
      &COLUMNS,
      |post: &Post| {
        vec![
          post.title.clone(),
          author_name(users, post.user_id),
          post.user_id.to_string(),
        ]
      },
    );

    self
      .confirm
      .render_overlay(frame, area, ctx, ctx.texts.delete_post_confirmation);
  }

  fn breadcrumb_label(&self, t: &Texts) -> String {
    t.posts_list.to_string()
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
      ShortcutInfo::new("a", t.add_post).with_priority(30),
      ShortcutInfo::new("v", t.view).with_priority(40),
      ShortcutInfo::new("e", t.edit).with_priority(41),
      ShortcutInfo::new("d", t.delete).with_priority(42),
      ShortcutInfo::new("s", t.sort).with_priority(50),
      ShortcutInfo::new("r", t.refresh).with_priority(60),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::testing::settle;
  use crate::event::Event;
  use crate::i18n::{Language, Msg, Outcome};
  use crate::ui::theme::Theme;
  use crate::ui::views::testing::{harness, post, user};
  use crossterm::event::KeyModifiers;
  use ratatui::backend::TestBackend;
  use ratatui::Terminal;

  fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
  }

  fn draw(view: &mut PostsView) -> String {
    let ctx = RenderCtx {
      texts: Language::En.texts(),
      palette: Theme::Light.palette(),
    };
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal
      .draw(|frame| view.render(frame, frame.area(), &ctx))
      .unwrap();
    terminal
      .backend()
      .buffer()
      .content()
      .iter()
      .map(|cell| cell.symbol())
      .collect()
  }

  #[tokio::test]
  async fn test_author_column_uses_placeholder_for_unknown_user() {
    let h = harness(vec![user(1, "Ada")], vec![post(5, 1, "Hello"), post(6, 9, "World")]);
    let mut view = PostsView::new(h.services.clone());
    settle(|| h.services.store.posts().list()).await;
    settle(|| h.services.store.users().list()).await;

    let screen = draw(&mut view);
    assert!(screen.contains("ada"));
    assert!(screen.contains("User9"));
  }

  #[tokio::test]
  async fn test_failed_delete_stays_removed() {
    let mut h = harness(vec![], vec![post(5, 1, "Hello"), post(6, 2, "World")]);
    let mut view = PostsView::new(h.services.clone());
    settle(|| h.services.store.posts().list()).await;
    draw(&mut view);

    h.posts.fail_writes(true);
    view.handle_key(key('d'));
    view.handle_key(key('y'));

    match h.events.recv().await {
      Some(Event::Notice(Msg::Failed(EntityKind::Post, Outcome::Deleted, detail))) => {
        assert!(detail.contains("500"))
      }
      other => panic!("unexpected event: {:?}", other),
    }
    let ids: Vec<u64> = h
      .services
      .store
      .posts()
      .peek()
      .data()
      .map(|p| p.iter().map(|p| p.id).collect())
      .unwrap_or_default();
    assert_eq!(ids, vec![6]);
  }

  #[tokio::test]
  async fn test_loading_message_before_data() {
    let h = harness(vec![], vec![post(5, 1, "Hello")]);
    h.posts.set_delay(std::time::Duration::from_millis(200));
    let mut view = PostsView::new(h.services.clone());

    let screen = draw(&mut view);
    assert!(screen.contains(Language::En.texts().loading_posts));
  }
}
