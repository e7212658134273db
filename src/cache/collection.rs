//! Cached view of one remote collection, with optimistic mutations.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiError, ApiResult, ResourceApi};
use crate::query::QueryState;

use super::patch::Patch;
use super::traits::{EntityKind, ListQuery, Resource};

/// Failure of an optimistic mutation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MutationError {
  /// The entity to update is not in the cache, so there is nothing to merge into
  #[error("{kind} {id} is not loaded")]
  NotLoaded { kind: EntityKind, id: u64 },
  /// Ids are only assigned once the full collection is known
  #[error("{kind} list is not loaded yet")]
  ListNotLoaded { kind: EntityKind },
  #[error(transparent)]
  Api(#[from] ApiError),
}

/// Behavior knobs for the mutation layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheOptions {
  /// Put a deleted entity back when the DELETE call fails.
  ///
  /// Off by default. The demo backend never persists deletes, so a rollback
  /// would bring back rows the operator just removed.
  pub rollback_failed_deletes: bool,
}

/// One cache slot: the observable state plus fetch bookkeeping.
#[derive(Debug, Clone)]
struct Slot<T> {
  state: QueryState<T>,
  stale: bool,
  in_flight: bool,
}

impl<T> Slot<T> {
  fn new() -> Self {
    Self {
      state: QueryState::Idle,
      stale: false,
      in_flight: false,
    }
  }

  fn seeded(data: T) -> Self {
    Self {
      state: QueryState::Success(data),
      stale: false,
      in_flight: false,
    }
  }

  /// Errors are not retried automatically; only an explicit invalidation
  /// (refresh) marks them stale again.
  fn needs_fetch(&self) -> bool {
    !self.in_flight && (matches!(self.state, QueryState::Idle) || self.stale)
  }

  fn begin_fetch(&mut self) {
    self.in_flight = true;
    if !self.state.is_success() {
      self.state = QueryState::Loading;
    }
  }

  /// Record a fetch result. A failed refetch keeps serving the data already
  /// in the slot.
  fn finish_fetch(&mut self, result: ApiResult<T>) {
    self.in_flight = false;
    self.stale = false;
    match result {
      Ok(data) => self.state = QueryState::Success(data),
      Err(e) if self.state.is_success() => {
        warn!(error = %e, "refetch failed, keeping cached data");
      }
      Err(e) => self.state = QueryState::Error(e.to_string()),
    }
  }

  fn data_mut(&mut self) -> Option<&mut T> {
    match &mut self.state {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }
}

#[derive(Debug)]
struct CollectionState<R> {
  list: Slot<Vec<R>>,
  by_id: HashMap<u64, Slot<R>>,
  queries: HashMap<ListQuery, Slot<Vec<R>>>,
  /// Next client-assigned id; never lowered
  next_id: u64,
}

impl<R: Resource> CollectionState<R> {
  fn new() -> Self {
    Self {
      list: Slot::new(),
      by_id: HashMap::new(),
      queries: HashMap::new(),
      next_id: 1,
    }
  }

  /// Largest id in the list or keying a per-id slot, loaded or not.
  fn max_known_id(&self) -> Option<u64> {
    let listed = self.list.state.data().into_iter().flatten().map(R::id);
    let slots = self.by_id.keys().copied();
    listed.chain(slots).max()
  }

  /// Next id past everything seen so far. Only meaningful once the list is
  /// loaded; before that the server's ids are unknown.
  fn allocate_id(&mut self) -> u64 {
    let id = self.max_known_id().map_or(1, |max| max + 1).max(self.next_id);
    self.next_id = id + 1;
    id
  }

  /// Assign an id and append the new entity, or `None` while the list is
  /// not loaded.
  fn insert_new(&mut self, draft: R::Draft) -> Option<(R, Patch<R>)> {
    if !self.list.state.is_success() {
      return None;
    }
    let entity = R::from_draft(self.allocate_id(), draft);
    let patch = self.insert(entity.clone())?;
    Some((entity, patch))
  }

  /// Current cached copy of an entity, from the list or its own slot.
  fn find(&self, id: u64) -> Option<R> {
    self
      .list
      .state
      .data()
      .and_then(|items| items.iter().find(|item| item.id() == id))
      .or_else(|| self.by_id.get(&id).and_then(|slot| slot.state.data()))
      .cloned()
  }

  /// Existing per-id slots are left alone.
  fn insert(&mut self, entity: R) -> Option<Patch<R>> {
    let patch = Patch::insert(self.list.data_mut()?, entity.clone());
    self
      .by_id
      .entry(entity.id())
      .or_insert_with(|| Slot::seeded(entity));
    self.mark_queries_stale();
    Some(patch)
  }

  fn replace(&mut self, old: R, new: R) -> Patch<R> {
    if let Some(data) = self.by_id.get_mut(&new.id()).and_then(Slot::data_mut) {
      *data = new.clone();
    }
    self.mark_queries_stale();
    self
      .list
      .data_mut()
      .and_then(|items| Patch::replace(items, new.clone()))
      .unwrap_or(Patch::Replaced { old, new })
  }

  fn remove(&mut self, id: u64) -> Option<Patch<R>> {
    let single = self.by_id.remove(&id).and_then(|slot| match slot.state {
      QueryState::Success(entity) => Some(entity),
      _ => None,
    });
    for slot in self.queries.values_mut() {
      if let Some(items) = slot.data_mut() {
        items.retain(|item| item.id() != id);
      }
    }
    let listed = self
      .list
      .data_mut()
      .and_then(|items| Patch::remove(items, id));
    listed.or_else(|| single.map(|old| Patch::Removed { old, index: None }))
  }

  fn revert(&mut self, patch: &Patch<R>) {
    if let Some(items) = self.list.data_mut() {
      patch.revert(items);
    }
    match patch {
      Patch::Inserted { id } => {
        self.by_id.remove(id);
      }
      Patch::Replaced { old, .. } => {
        if let Some(data) = self.by_id.get_mut(&old.id()).and_then(Slot::data_mut) {
          *data = old.clone();
        }
      }
      Patch::Removed { old, .. } => {
        self.by_id.insert(old.id(), Slot::seeded(old.clone()));
      }
    }
  }

  fn mark_queries_stale(&mut self) {
    for slot in self.queries.values_mut() {
      slot.stale = true;
    }
  }

  fn invalidate(&mut self) {
    self.list.stale = true;
    for slot in self.by_id.values_mut() {
      slot.stale = true;
    }
    self.mark_queries_stale();
  }
}

/// Cache and mutation layer for one resource kind.
///
/// Reads return a snapshot and start a background fetch when the slot is
/// empty or stale; concurrent readers share one in-flight fetch. Mutations
/// patch the cache synchronously, before the returned future is polled, and
/// the future carries the network call plus any rollback.
pub struct Collection<R: Resource> {
  api: Arc<dyn ResourceApi<R>>,
  state: Arc<Mutex<CollectionState<R>>>,
  options: CacheOptions,
}

impl<R: Resource> Clone for Collection<R> {
  fn clone(&self) -> Self {
    Self {
      api: Arc::clone(&self.api),
      state: Arc::clone(&self.state),
      options: self.options,
    }
  }
}

impl<R: Resource> Collection<R> {
  pub fn new(api: Arc<dyn ResourceApi<R>>, options: CacheOptions) -> Self {
    Self {
      api,
      state: Arc::new(Mutex::new(CollectionState::new())),
      options,
    }
  }

  /// Poisoning is ignored: the state is plain data and every write is a
  /// single assignment or splice.
  fn lock(&self) -> MutexGuard<'_, CollectionState<R>> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  // ==========================================================================
  // Reads
  // ==========================================================================

  /// Snapshot of the whole collection, fetching it if needed.
  pub fn list(&self) -> QueryState<Vec<R>> {
    let mut state = self.lock();
    if state.list.needs_fetch() {
      state.list.begin_fetch();
      self.spawn_list_fetch();
    }
    state.list.state.clone()
  }

  /// Snapshot of the collection without triggering a fetch.
  pub fn peek(&self) -> QueryState<Vec<R>> {
    self.lock().list.state.clone()
  }

  /// Snapshot of one entity, fetching it if needed.
  ///
  /// A slot that has never been fetched is seeded from the loaded list when
  /// the entity is already there.
  pub fn get(&self, id: u64) -> QueryState<R> {
    let mut state = self.lock();
    if !state.by_id.contains_key(&id) {
      let listed = state
        .list
        .state
        .data()
        .and_then(|items| items.iter().find(|item| item.id() == id))
        .cloned();
      let slot = listed.map_or_else(Slot::new, Slot::seeded);
      state.by_id.insert(id, slot);
    }

    let slot = state.by_id.entry(id).or_insert_with(Slot::new);
    if slot.needs_fetch() {
      slot.begin_fetch();
      self.spawn_get_fetch(id);
    }
    slot.state.clone()
  }

  /// Snapshot of a filtered list (`GET /{kind}?{field}={value}`).
  pub fn list_where(&self, query: ListQuery) -> QueryState<Vec<R>> {
    let mut state = self.lock();
    let slot = state.queries.entry(query).or_insert_with(Slot::new);
    if slot.needs_fetch() {
      slot.begin_fetch();
      self.spawn_query_fetch(query);
    }
    slot.state.clone()
  }

  /// Mark every slot stale; the next read refetches while still showing the
  /// cached data.
  pub fn invalidate(&self) {
    debug!(kind = %R::kind(), "invalidating cache");
    self.lock().invalidate();
  }

  fn spawn_list_fetch(&self) {
    let this = self.clone();
    tokio::spawn(async move {
      let result = this.api.list().await;
      match &result {
        Ok(items) => info!(kind = %R::kind(), count = items.len(), "collection loaded"),
        Err(e) => warn!(kind = %R::kind(), error = %e, "collection fetch failed"),
      }

      this.lock().list.finish_fetch(result);
    });
  }

  fn spawn_get_fetch(&self, id: u64) {
    let this = self.clone();
    tokio::spawn(async move {
      let result = this.api.get(id).await;
      if let Err(e) = &result {
        warn!(kind = %R::kind(), id, error = %e, "entity fetch failed");
      }

      let mut state = this.lock();
      // The entity may have been deleted while the request was in flight
      if let Some(slot) = state.by_id.get_mut(&id) {
        slot.finish_fetch(result);
      }
    });
  }

  fn spawn_query_fetch(&self, query: ListQuery) {
    let this = self.clone();
    tokio::spawn(async move {
      let result = this.api.list_where(query.field, query.value).await;
      if let Err(e) = &result {
        warn!(kind = %R::kind(), %query, error = %e, "filtered fetch failed");
      }

      let mut state = this.lock();
      if let Some(slot) = state.queries.get_mut(&query) {
        slot.finish_fetch(result);
      }
    });
  }

  // ==========================================================================
  // Mutations
  // ==========================================================================

  /// Optimistically append a new entity with the next client-assigned id,
  /// then POST it. The insert is reverted if the call fails.
  ///
  /// Fails with `ListNotLoaded` until the whole collection has been fetched
  /// once, and starts that fetch if needed.
  pub fn create(
    &self,
    draft: R::Draft,
  ) -> impl Future<Output = Result<R, MutationError>> + Send + 'static {
    let prepared = {
      let mut state = self.lock();
      let prepared = state.insert_new(draft);
      if prepared.is_none() && state.list.needs_fetch() {
        state.list.begin_fetch();
        self.spawn_list_fetch();
      }
      prepared
    };

    let this = self.clone();
    async move {
      let (entity, patch) = prepared.ok_or(MutationError::ListNotLoaded { kind: R::kind() })?;
      debug!(kind = %R::kind(), id = entity.id(), "optimistic insert");

      match this.api.create(&entity).await {
        Ok(()) => {
          info!(kind = %R::kind(), id = entity.id(), "created");
          Ok(entity)
        }
        Err(e) => {
          warn!(kind = %R::kind(), id = entity.id(), error = %e, "create failed, rolling back");
          this.lock().revert(&patch);
          Err(e.into())
        }
      }
    }
  }

  /// Optimistically merge `patch` into the cached entity, then PUT the
  /// merged entity. The previous value is restored if the call fails.
  pub fn update(
    &self,
    id: u64,
    patch: R::Patch,
  ) -> impl Future<Output = Result<R, MutationError>> + Send + 'static {
    let applied = {
      let mut state = self.lock();
      state.find(id).map(|current| {
        let merged = current.merged(&patch);
        let applied = state.replace(current, merged.clone());
        (merged, applied)
      })
    };

    let this = self.clone();
    async move {
      let (merged, applied) = applied.ok_or(MutationError::NotLoaded {
        kind: R::kind(),
        id,
      })?;
      debug!(kind = %R::kind(), id, "optimistic merge");

      match this.api.update(&merged).await {
        Ok(()) => {
          info!(kind = %R::kind(), id, "updated");
          Ok(merged)
        }
        Err(e) => {
          warn!(kind = %R::kind(), id, error = %e, "update failed, rolling back");
          this.lock().revert(&applied);
          Err(e.into())
        }
      }
    }
  }

  /// Optimistically remove the entity, then DELETE it.
  ///
  /// The removal stands even when the call fails, unless
  /// `rollback_failed_deletes` is set.
  pub fn delete(&self, id: u64) -> impl Future<Output = Result<(), MutationError>> + Send + 'static {
    let removed = self.lock().remove(id);
    debug!(kind = %R::kind(), id, found = removed.is_some(), "optimistic delete");

    let this = self.clone();
    async move {
      match this.api.delete(id).await {
        Ok(()) => {
          info!(kind = %R::kind(), id, "deleted");
          Ok(())
        }
        Err(e) => {
          warn!(kind = %R::kind(), id, error = %e, "delete failed");
          if this.options.rollback_failed_deletes {
            if let Some(patch) = &removed {
              this.lock().revert(patch);
            }
          }
          Err(e.into())
        }
      }
    }
  }
}
