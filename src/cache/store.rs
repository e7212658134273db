//! Process-wide cache of users and posts.

use std::future::Future;
use std::sync::Arc;

use crate::api::types::{Post, User};
use crate::api::{ApiClient, ResourceApi};
use crate::query::QueryState;

use super::collection::{CacheOptions, Collection, MutationError};
use super::traits::ListQuery;

/// Single source of truth for both collections, shared by every view.
///
/// Cloning is cheap; all clones see the same cache.
#[derive(Clone)]
pub struct Store {
  users: Collection<User>,
  posts: Collection<Post>,
}

impl Store {
  pub fn new(client: &ApiClient, options: CacheOptions) -> Self {
    let api = Arc::new(client.clone());
    Self::with_apis(api.clone(), api, options)
  }

  pub fn with_apis(
    users: Arc<dyn ResourceApi<User>>,
    posts: Arc<dyn ResourceApi<Post>>,
    options: CacheOptions,
  ) -> Self {
    Self {
      users: Collection::new(users, options),
      posts: Collection::new(posts, options),
    }
  }

  pub fn users(&self) -> &Collection<User> {
    &self.users
  }

  pub fn posts(&self) -> &Collection<Post> {
    &self.posts
  }

  /// Posts written by one user (`GET /posts?userId={id}`).
  pub fn posts_by_user(&self, user_id: u64) -> QueryState<Vec<Post>> {
    self.posts.list_where(ListQuery::new("userId", user_id))
  }

  /// Delete a user and invalidate the posts so author lookups are
  /// recomputed on the next read.
  pub fn delete_user(
    &self,
    id: u64,
  ) -> impl Future<Output = Result<(), MutationError>> + Send + 'static {
    let pending = self.users.delete(id);
    self.posts.invalidate();
    pending
  }

  pub fn delete_post(
    &self,
    id: u64,
  ) -> impl Future<Output = Result<(), MutationError>> + Send + 'static {
    self.posts.delete(id)
  }

  /// Refetch everything on next read.
  pub fn invalidate_all(&self) {
    self.users.invalidate();
    self.posts.invalidate();
  }
}
