use super::Services;
use crate::api::types::{Address, Company, User, UserDraft, UserPatch};
use crate::cache::{EntityKind, Resource};
use crate::i18n::{Msg, Outcome, Texts};
use crate::query::{Mutation, MutationState, QueryState};
use crate::ui::components::{Form, FormEvent, FormField, KeyResult};
use crate::ui::renderfns::centered_rect;
use crate::ui::view::{RenderCtx, ShortcutInfo, View, ViewAction};
use crate::validation::{validate_user, Field};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::Clear;
use tracing::debug;

const NAME: usize = 0;
const USERNAME: usize = 1;
const EMAIL: usize = 2;
const PHONE: usize = 3;
const WEBSITE: usize = 4;
const STREET: usize = 5;
const SUITE: usize = 6;
const CITY: usize = 7;
const ZIPCODE: usize = 8;
const COMPANY: usize = 9;
const CATCH_PHRASE: usize = 10;
const BS: usize = 11;

/// Create a user, or edit an existing one
pub struct UserFormView {
  services: Services,
  /// User being edited; `None` when creating
  original: Option<User>,
  form: Form,
  save: Mutation<User>,
  /// Create submitted before the users list loaded
  queued: bool,
}

fn fields(user: Option<&User>) -> Vec<FormField> {
  let u = user
    .cloned()
    .unwrap_or_else(|| User::from_draft(0, UserDraft::default()));
  vec![
    FormField::new(|t| t.name, u.name).required(Field::Name),
    FormField::new(|t| t.username, u.username).required(Field::Username),
    FormField::new(|t| t.email, u.email).required(Field::Email),
    FormField::new(|t| t.phone, u.phone),
    FormField::new(|t| t.website, u.website),
    FormField::new(|t| t.street, u.address.street),
    FormField::new(|t| t.suite, u.address.suite),
    FormField::new(|t| t.city, u.address.city),
    FormField::new(|t| t.zipcode, u.address.zipcode),
    FormField::new(|t| t.company_name, u.company.name),
    FormField::new(|t| t.catch_phrase, u.company.catch_phrase),
    FormField::new(|t| t.business_strategy, u.company.bs),
  ]
}

impl UserFormView {
  pub fn create(services: Services) -> Self {
    Self {
      services,
      original: None,
      form: Form::new(fields(None)),
      save: Mutation::new(),
      queued: false,
    }
  }

  pub fn edit(services: Services, user: &User) -> Self {
    Self {
      services,
      original: Some(user.clone()),
      form: Form::new(fields(Some(user))),
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

  fn draft(&self) -> UserDraft {
    let f = &self.form;
    // Coordinates are not editable here
    let geo = self
      .original
      .as_ref()
      .map(|u| u.address.geo.clone())
      .unwrap_or_default();
    UserDraft {
      name: f.text(NAME),
      username: f.text(USERNAME),
      email: f.text(EMAIL),
      phone: f.text(PHONE),
      website: f.text(WEBSITE),
      address: Address {
        street: f.text(STREET),
        suite: f.text(SUITE),
        city: f.text(CITY),
        zipcode: f.text(ZIPCODE),
        geo,
      },
      company: Company {
        name: f.text(COMPANY),
        catch_phrase: f.text(CATCH_PHRASE),
        bs: f.text(BS),
      },
    }
  }

  fn submit(&mut self) {
    if self.save.is_pending() {
      return;
    }
    let draft = self.draft();
    let errors = validate_user(&draft);
    if !errors.is_empty() {
      debug!(count = errors.len(), "User form has validation errors");
      self.form.set_errors(errors);
      return;
    }

    let users = self.services.store.users();
    match &self.original {
      None => {
        // New ids are assigned against the full list
        if !users.list().is_success() {
          debug!("User list not loaded, queueing create");
          self.queued = true;
          return;
        }
        self.save.start(users.create(draft));
      }
      Some(user) => {
        let patch = UserPatch {
          name: Some(draft.name),
          username: Some(draft.username),
          email: Some(draft.email),
          phone: Some(draft.phone),
          website: Some(draft.website),
          address: Some(draft.address),
          company: Some(draft.company),
        };
        self.save.start(users.update(user.id, patch));
      }
    }
  }
}

impl View for UserFormView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.is_busy() {
      // Leaving does not cancel the save
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
    let title = match self.original {
      Some(_) => t.edit_user,
      None => t.add_user,
    };
    let status = if self.queued {
      Some(t.loading)
    } else {
      self.save.is_pending().then_some(t.saving)
    };

    let rect = centered_rect(area, 70, 20);
    frame.render_widget(Clear, rect);
    self.form.render(frame, rect, ctx, title, status);
  }

  fn breadcrumb_label(&self, t: &Texts) -> String {
    match &self.original {
      Some(user) => format!("{} [{}]", t.edit_user, user.username),
      None => t.add_user.to_string(),
    }
  }

  fn tick(&mut self) -> ViewAction {
    if self.queued {
      let list = self.services.store.users().peek();
      match list {
        QueryState::Success(_) => {
          self.queued = false;
          self.submit();
        }
        QueryState::Error(e) => {
          self.queued = false;
          let msg = Msg::Failed(EntityKind::User, Outcome::Created, e);
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
        notifier.notify(Msg::Done(EntityKind::User, self.outcome()));
        ViewAction::Pop
      }
      MutationState::Error(e) => {
        notifier.notify(Msg::Failed(EntityKind::User, self.outcome(), e.clone()));
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
  use crate::ui::views::testing::{harness, user};
  use crossterm::event::KeyModifiers;
  use std::time::Duration;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
  }

  fn type_str(view: &mut UserFormView, text: &str) {
    for c in text.chars() {
      view.handle_key(key(KeyCode::Char(c)));
    }
  }

  /// Tick until the save settles
  async fn finish(view: &mut UserFormView) -> ViewAction {
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
  async fn test_create_inserts_with_next_id_and_closes() {
    let mut h = harness(vec![user(1, "Ada"), user(2, "Bob")], vec![]);
    settle(|| h.services.store.users().list()).await;

    let mut view = UserFormView::create(h.services.clone());
    type_str(&mut view, "Cem");
    view.handle_key(key(KeyCode::Tab));
    type_str(&mut view, "cem");
    view.handle_key(key(KeyCode::Tab));
    type_str(&mut view, "cem@example.com");
    view.handle_key(ctrl('s'));

    // Visible before the request settles
    let ids: Vec<u64> = h
      .services
      .store
      .users()
      .peek()
      .data()
      .map(|u| u.iter().map(|u| u.id).collect())
      .unwrap_or_default();
    assert_eq!(ids, vec![1, 2, 3]);

    assert!(matches!(finish(&mut view).await, ViewAction::Pop));
    match h.events.recv().await {
      Some(Event::Notice(msg)) => assert_eq!(msg, Msg::Done(EntityKind::User, Outcome::Created)),
      other => panic!("unexpected event: {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_invalid_form_never_reaches_network() {
    let h = harness(vec![], vec![]);
    let mut view = UserFormView::create(h.services.clone());
    type_str(&mut view, "Cem");
    view.handle_key(ctrl('s'));

    assert!(!view.save.is_pending());
    assert!(view.form.error(Field::Username).is_some());
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(h.users.create_calls(), 0);
  }

  #[tokio::test]
  async fn test_queued_create_fails_when_list_cannot_load() {
    let mut h = harness(vec![user(1, "Ada")], vec![]);
    h.users.fail_reads(true);

    let mut view = UserFormView::create(h.services.clone());
    type_str(&mut view, "Cem");
    view.handle_key(key(KeyCode::Tab));
    type_str(&mut view, "cem");
    view.handle_key(key(KeyCode::Tab));
    type_str(&mut view, "cem@example.com");
    view.handle_key(ctrl('s'));
    assert!(view.is_busy());

    assert!(matches!(finish(&mut view).await, ViewAction::None));
    assert_eq!(h.users.create_calls(), 0);
    assert!(matches!(
      h.events.recv().await,
      Some(Event::Notice(Msg::Failed(EntityKind::User, Outcome::Created, _)))
    ));
  }

  #[tokio::test]
  async fn test_failed_update_reverts_and_stays_open() {
    let mut h = harness(vec![user(1, "Ada"), user(2, "Bob")], vec![]);
    let users = settle(|| h.services.store.users().list()).await;
    h.users.fail_writes(true);

    let mut view = UserFormView::edit(h.services.clone(), &users[1]);
    view.handle_key(ctrl('u'));
    type_str(&mut view, "Y");
    view.handle_key(ctrl('s'));

    let name = |h: &crate::ui::views::testing::Harness| {
      h.services.store.users().peek().data().map(|u| u[1].name.clone())
    };
    assert_eq!(name(&h), Some("Y".to_string()));

    assert!(matches!(finish(&mut view).await, ViewAction::None));
    assert_eq!(name(&h), Some("Bob".to_string()));
    assert!(matches!(
      h.events.recv().await,
      Some(Event::Notice(Msg::Failed(EntityKind::User, Outcome::Updated, _)))
    ));
  }

  #[tokio::test]
  async fn test_edit_keeps_coordinates() {
    let h = harness(vec![], vec![]);
    let mut ada = user(1, "Ada");
    ada.address.geo.lat = "-37.3159".to_string();
    let view = UserFormView::edit(h.services.clone(), &ada);
    assert_eq!(view.draft().address.geo.lat, "-37.3159");
    assert_eq!(view.draft().name, "Ada");
  }
}
