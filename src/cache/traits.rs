//! Core traits and types for the resource cache.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// The two managed resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
  User,
  Post,
}

impl EntityKind {
  /// Collection path segment on the REST API.
  pub fn path(self) -> &'static str {
    match self {
      EntityKind::User => "users",
      EntityKind::Post => "posts",
    }
  }
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EntityKind::User => write!(f, "user"),
      EntityKind::Post => write!(f, "post"),
    }
  }
}

/// Trait for entities that live in the cache.
///
/// Implementors provide a stable numeric id, know how to build themselves
/// from a create payload, and how to merge a partial update.
pub trait Resource: Clone + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
  /// Create payload (the entity without its id)
  type Draft: Clone + Send + Sync + 'static;
  /// Partial update payload
  type Patch: Clone + Send + Sync + 'static;

  /// Unique, immutable identifier
  fn id(&self) -> u64;

  fn kind() -> EntityKind;

  /// Build the entity from a create payload and a client-assigned id.
  fn from_draft(id: u64, draft: Self::Draft) -> Self;

  /// Return a copy with every field present in `patch` overwritten.
  fn merged(&self, patch: &Self::Patch) -> Self;
}

/// Key of a filtered list query, e.g. `posts?userId=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListQuery {
  pub field: &'static str,
  pub value: u64,
}

impl ListQuery {
  pub const fn new(field: &'static str, value: u64) -> Self {
    Self { field, value }
  }
}

impl fmt::Display for ListQuery {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}={}", self.field, self.value)
  }
}
