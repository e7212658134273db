//! Async state primitives shared by the cache and the views.
//!
//! `QueryState` is the observable state of any read (a cache slot, a detail
//! lookup). `Mutation<T>` tracks one in-flight write started from a view so
//! the view can poll for its outcome in `tick()`, TanStack style.
//!
//! # Example
//!
//! ```ignore
//! let mut save = Mutation::new();
//! save.start(store.users().update(id, patch));
//!
//! // In event loop tick
//! if save.poll() {
//!     match save.state() {
//!         MutationState::Success(_) => close_form(),
//!         MutationState::Error(e) => show_error(e),
//!         _ => {}
//!     }
//! }
//! ```

use std::fmt::Display;
use std::future::Future;
use tokio::sync::oneshot;

/// The state of a query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
  /// Query has not been started
  Idle,
  /// Query is currently fetching data
  Loading,
  /// Query completed successfully
  Success(T),
  /// Query failed with an error
  Error(String),
}

impl<T> QueryState<T> {
  pub fn is_success(&self) -> bool {
    matches!(self, QueryState::Success(_))
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }
}

/// The state of a mutation
#[derive(Debug, Clone, PartialEq)]
pub enum MutationState<T> {
  Idle,
  Pending,
  Success(T),
  Error(String),
}

/// A single write operation whose outcome is polled from the UI loop.
///
/// Dropping a `Mutation` does not cancel the underlying future; it keeps
/// running on the runtime and only its result is discarded.
#[derive(Debug)]
pub struct Mutation<T> {
  state: MutationState<T>,
  receiver: Option<oneshot::Receiver<Result<T, String>>>,
}

impl<T> Default for Mutation<T> {
  fn default() -> Self {
    Self {
      state: MutationState::Idle,
      receiver: None,
    }
  }
}

impl<T: Send + 'static> Mutation<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn state(&self) -> &MutationState<T> {
    &self.state
  }

  pub fn is_pending(&self) -> bool {
    matches!(self.state, MutationState::Pending)
  }

  /// Spawn `future` and track its result.
  ///
  /// No-op while another run is pending.
  pub fn start<F, E>(&mut self, future: F)
  where
    F: Future<Output = Result<T, E>> + Send + 'static,
    E: Display,
  {
    if self.is_pending() {
      return;
    }

    let (tx, rx) = oneshot::channel();
    self.receiver = Some(rx);
    self.state = MutationState::Pending;

    tokio::spawn(async move {
      let result = future.await.map_err(|e| e.to_string());
      // Ignore send errors - the view may have been closed
      let _ = tx.send(result);
    });
  }

  /// Poll for the outcome of the pending run.
  ///
  /// Returns `true` if the state changed.
  pub fn poll(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    match receiver.try_recv() {
      Ok(Ok(data)) => {
        self.state = MutationState::Success(data);
        self.receiver = None;
        true
      }
      Ok(Err(error)) => {
        self.state = MutationState::Error(error);
        self.receiver = None;
        true
      }
      Err(oneshot::error::TryRecvError::Empty) => false,
      Err(oneshot::error::TryRecvError::Closed) => {
        self.state = MutationState::Error("Mutation was cancelled".to_string());
        self.receiver = None;
        true
      }
    }
  }
}
