mod post_detail;
mod post_form;
mod posts;
mod user_detail;
mod user_form;
mod users;

pub use post_detail::PostDetailView;
pub use post_form::PostFormView;
pub use posts::PostsView;
pub use user_detail::UserDetailView;
pub use user_form::UserFormView;
pub use users::UsersView;

use crate::cache::{EntityKind, MutationError, Store};
use crate::config::TablesConfig;
use crate::event::Notifier;
use crate::i18n::{Msg, Outcome};
use std::future::Future;
use tracing::{info, warn};

/// Handles every view gets: the shared cache, the toast channel and the
/// table settings.
#[derive(Clone)]
pub struct Services {
  pub store: Store,
  pub notifier: Notifier,
  pub tables: TablesConfig,
}

impl Services {
  pub fn new(store: Store, notifier: Notifier, tables: TablesConfig) -> Self {
    Self {
      store,
      notifier,
      tables,
    }
  }

  /// Remove the entity from the cache now and report the DELETE outcome as
  /// a toast when it settles.
  pub fn delete(&self, kind: EntityKind, id: u64) {
    info!(%kind, id, "Deleting");
    match kind {
      EntityKind::User => report(self.store.delete_user(id), self.notifier.clone(), kind, id),
      EntityKind::Post => report(self.store.delete_post(id), self.notifier.clone(), kind, id),
    }
  }

  /// Mark both collections stale and say so.
  pub fn refresh(&self) {
    self.store.invalidate_all();
    self.notifier.notify(Msg::Refreshing);
  }
}

fn report<F>(future: F, notifier: Notifier, kind: EntityKind, id: u64)
where
  F: Future<Output = Result<(), MutationError>> + Send + 'static,
{
  tokio::spawn(async move {
    match future.await {
      Ok(()) => notifier.notify(Msg::Done(kind, Outcome::Deleted)),
      Err(e) => {
        warn!(%kind, id, error = %e, "Delete failed");
        notifier.notify(Msg::Failed(kind, Outcome::Deleted, e.to_string()));
      }
    }
  });
}
