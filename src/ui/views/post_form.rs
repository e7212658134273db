use super::Services;
use crate::api::types::{author_name, Post, PostDraft, PostPatch};
use crate::cache::EntityKind;
use crate::i18n::{Msg, Outcome, Texts};
use crate::query::{Mutation, MutationState, QueryState};
use crate::ui::components::{Form, FormEvent, FormField, KeyResult};
use crate::ui::renderfns::centered_rect;
use crate::ui::view::{RenderCtx, ShortcutInfo, View, ViewAction};
use crate::validation::{validate_post, Field};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};
use tracing::debug;

const USER_ID: usize = 0;
const TITLE: usize = 1;
const BODY: usize = 2;

/// Create a post, or edit an existing one
pub struct PostFormView {
  services: Services,
  /// Post being edited; `None` when creating
  original: Option<Post>,
  form: Form,
  save: Mutation<Post>,
  /// Create submitted before the posts list loaded
  queued: bool,
}

fn fields(post: Option<&Post>) -> Vec<FormField> {
  let user_id = post.map(|p| p.user_id.to_string()).unwrap_or_default();
  let title = post.map(|p| p.title.clone()).unwrap_or_default();
  let body = post.map(|p| p.body.clone()).unwrap_or_default();
  vec![
    FormField::new(|t| t.user_id, user_id).required(Field::UserId),
    FormField::new(|t| t.title_field, title).required(Field::Title),
    FormField::new(|t| t.content, body).required(Field::Body),
  ]
}

impl PostFormView {
  pub fn create(services: Services) -> Self {
    Self {
      services,
      original: None,
      form: Form::new(fields(None)),
      save: Mutation::new(),
      queued: false,
    }
  }

  pub fn edit(services: Services, post: &Post) -> Self {
    Self {
      services,
      original: Some(post.clone()),
      form: Form::new(fields(Some(post))),
      save: Mutation::new(),
      queued: false,
    }
  }

  fn outcome(&self) -> Outcome {
    match self.original {
      Some(_) => Outcome::Updated,
      None => Outcome::Created,
    }
  }

  /// Unparseable ids become 0, which validation rejects
  fn draft(&self) -> PostDraft {
    PostDraft {
      user_id: self.form.text(USER_ID).parse().unwrap_or(0),
      title: self.form.text(TITLE),
      body: self.form.text(BODY),
    }
  }

  fn submit(&mut self) {
    if self.save.is_pending() {
      return;
    }
    let draft = self.draft();
    let errors = validate_post(&draft);
    if !errors.is_empty() {
      debug!(count = errors.len(), "Post form has validation errors");
      self.form.set_errors(errors);
      return;
    }

    let posts = self.services.store.posts();
    match &self.original {
      None => {
        // New ids are assigned against the full list
        if !posts.list().is_success() {
          debug!("Post list not loaded, queueing create");
          self.queued = true;
          return;
        }
        self.save.start(posts.create(draft));
      }
      Some(post) => {
        let patch = PostPatch {
          user_id: Some(draft.user_id),
          title: Some(draft.title),
          body: Some(draft.body),
        };
        self.save.start(posts.update(post.id, patch));
      }
    }
  }
}

impl View for PostFormView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.is_busy() {
      return match key.code {
        KeyCode::Esc => ViewAction::Pop,
        _ => ViewAction::None,
      };
    }

    match self.form.handle_key(key) {
      KeyResult::Event(FormEvent::Submit) => {
        self.submit();
        ViewAction::None
      }
      KeyResult::Event(FormEvent::Cancel) => ViewAction::Pop,
      KeyResult::Handled | KeyResult::NotHandled => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderCtx) {
    let t = ctx.texts;
    let p = ctx.palette;
    let title = match self.original {
      Some(_) => t.edit_post,
      None => t.add_post,
    };
    let status = if self.queued {
      Some(t.loading)
    } else {
      self.save.is_pending().then_some(t.saving)
    };

    let rect = centered_rect(area, 70, 12);
    frame.render_widget(Clear, rect);
    self.form.render(frame, rect, ctx, title, status);

    // Author of the typed user id, below the form
    let user_id = self.draft().user_id;
    if user_id > 0 && rect.bottom() < area.bottom() {
      let users = self.services.store.users().list();
      let name = users
        .data()
        .map(|u| author_name(u, user_id))
        .unwrap_or_else(|| t.loading.to_string());
      let hint = Line::from(vec![
        Span::styled(format!(" {}: ", t.author), p.muted()),
        Span::styled(name, p.accent()),
      ]);
      let line = Rect::new(rect.x, rect.bottom(), rect.width, 1);
      frame.render_widget(Paragraph::new(hint).style(p.base()), line);
    }
  }

  fn breadcrumb_label(&self, t: &Texts) -> String {
    match &self.original {
      Some(post) => format!("{} [#{}]", t.edit_post, post.id),
      None => t.add_post.to_string(),
    }
  }

  fn tick(&mut self) -> ViewAction {
    if self.queued {
      let list = self.services.store.posts().peek();
      match list {
        QueryState::Success(_) => {
          self.queued = false;
          self.submit();
        }
        QueryState::Error(e) => {
          self.queued = false;
          let msg = Msg::Failed(EntityKind::Post, Outcome::Created, e);
          self.services.notifier.notify(msg);
        }
        QueryState::Idle | QueryState::Loading => {}
      }
    }

    if !self.save.poll() {
      return ViewAction::None;
    }
    let notifier = &self.services.notifier;
    match self.save.state() {
      MutationState::Success(_) => {
        notifier.notify(Msg::Done(EntityKind::Post, self.outcome()));
        ViewAction::Pop
      }
      MutationState::Error(e) => {
        notifier.notify(Msg::Failed(EntityKind::Post, self.outcome(), e.clone()));
        ViewAction::None
      }
      _ => ViewAction::None,
    }
  }

  fn captures_input(&self) -> bool {
    true
  }

  fn is_busy(&self) -> bool {
    self.queued || self.save.is_pending()
  }

  fn shortcuts(&self, t: &Texts) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("Tab", t.edit).with_priority(10),
      ShortcutInfo::new("Ctrl-S", t.save).with_priority(20),
      ShortcutInfo::new("Esc", t.cancel).with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::testing::settle;
  use crate::event::Event;
  use crate::ui::views::testing::{harness, post};
  use crate::validation::Invalid;
  use crossterm::event::KeyModifiers;
  use std::time::Duration;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn type_str(view: &mut PostFormView, text: &str) {
    for c in text.chars() {
      view.handle_key(key(KeyCode::Char(c)));
    }
  }

  async fn finish(view: &mut PostFormView) -> ViewAction {
    for _ in 0..200 {
      let action = view.tick();
      if !view.is_busy() {
        return action;
      }
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("save did not settle");
  }

  #[tokio::test]
  async fn test_non_numeric_user_is_rejected() {
    let h = harness(vec![], vec![]);
    let mut view = PostFormView::create(h.services.clone());
    type_str(&mut view, "abc");
    view.handle_key(key(KeyCode::Tab));
    type_str(&mut view, "Title");
    view.handle_key(key(KeyCode::Tab));
    type_str(&mut view, "Body");
    view.handle_key(key(KeyCode::Enter));

    assert_eq!(view.form.error(Field::UserId), Some(Invalid::UserRequired));
    assert!(!view.save.is_pending());
  }

  #[tokio::test]
  async fn test_failed_create_is_rolled_back() {
    let mut h = harness(vec![], vec![post(5, 1, "Hello"), post(6, 2, "World")]);
    settle(|| h.services.store.posts().list()).await;
    h.posts.fail_writes(true);

    let mut view = PostFormView::create(h.services.clone());
    type_str(&mut view, "1");
    view.handle_key(key(KeyCode::Tab));
    type_str(&mut view, "New");
    view.handle_key(key(KeyCode::Tab));
    type_str(&mut view, "Text");
    view.handle_key(key(KeyCode::Enter));
    assert!(view.save.is_pending());

    let len = |h: &crate::ui::views::testing::Harness| {
      h.services.store.posts().peek().data().map(|p| p.len())
    };
    assert_eq!(len(&h), Some(3));

    assert!(matches!(finish(&mut view).await, ViewAction::None));
    assert_eq!(len(&h), Some(2));
    assert!(matches!(
      h.events.recv().await,
      Some(Event::Notice(Msg::Failed(EntityKind::Post, Outcome::Created, _)))
    ));
  }

  #[tokio::test]
  async fn test_create_waits_for_post_list() {
    let mut h = harness(vec![], vec![post(1, 1, "Server one"), post(2, 1, "Server two")]);
    h.posts.set_delay(Duration::from_millis(20));

    let mut view = PostFormView::create(h.services.clone());
    type_str(&mut view, "1");
    view.handle_key(key(KeyCode::Tab));
    type_str(&mut view, "Mine");
    view.handle_key(key(KeyCode::Tab));
    type_str(&mut view, "Text");
    view.handle_key(key(KeyCode::Enter));

    assert!(view.is_busy());
    assert!(!view.save.is_pending());
    assert_eq!(h.posts.create_calls(), 0);

    assert!(matches!(finish(&mut view).await, ViewAction::Pop));
    let posts = h.services.store.posts().peek().data().cloned().unwrap_or_default();
    let ids: Vec<u64> = posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(
      h.services.store.posts().get(1).data().map(|p| p.title.clone()),
      Some("Server one".to_string())
    );
    assert!(matches!(
      h.events.recv().await,
      Some(Event::Notice(Msg::Done(EntityKind::Post, Outcome::Created)))
    ));
  }

  #[tokio::test]
  async fn test_edit_updates_post() {
    let mut h = harness(vec![], vec![post(5, 1, "Hello")]);
    let posts = settle(|| h.services.store.posts().list()).await;

    let mut view = PostFormView::edit(h.services.clone(), &posts[0]);
    view.handle_key(key(KeyCode::Tab));
    type_str(&mut view, "!");
    view.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

    assert!(matches!(finish(&mut view).await, ViewAction::Pop));
    assert_eq!(h.posts.stored(5).map(|p| p.title), Some("Hello!".to_string()));
    assert!(matches!(
      h.events.recv().await,
      Some(Event::Notice(Msg::Done(EntityKind::Post, Outcome::Updated)))
    ));
  }
}
