//! Reversible records of optimistic edits to a cached list.

use super::traits::Resource;

/// One optimistic change applied to a cached list.
///
/// Each variant keeps what is needed to undo it, so a failed network call is
/// rolled back by re-applying the old value rather than by refetching.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<R> {
  /// An entity was appended
  Inserted { id: u64 },
  /// An entity was replaced by a merged copy
  Replaced { old: R, new: R },
  /// An entity was removed from `index`, or from outside the list when
  /// `index` is `None`
  Removed { old: R, index: Option<usize> },
}

impl<R: Resource> Patch<R> {
  /// Append `entity` to `items`.
  pub fn insert(items: &mut Vec<R>, entity: R) -> Self {
    let id = entity.id();
    items.push(entity);
    Patch::Inserted { id }
  }

  /// Replace the entity with the same id as `new`.
  ///
  /// Returns `None` if no such entity is present.
  pub fn replace(items: &mut [R], new: R) -> Option<Self> {
    let slot = items.iter_mut().find(|item| item.id() == new.id())?;
    let old = std::mem::replace(slot, new.clone());
    Some(Patch::Replaced { old, new })
  }

  /// Remove the entity with `id`.
  pub fn remove(items: &mut Vec<R>, id: u64) -> Option<Self> {
    let index = items.iter().position(|item| item.id() == id)?;
    let old = items.remove(index);
    Some(Patch::Removed {
      old,
      index: Some(index),
    })
  }

  /// Undo this patch on `items`.
  ///
  /// Reverting is a no-op when the list no longer has the shape the patch
  /// expects (the entity was since removed, or was re-added by a refetch).
  pub fn revert(&self, items: &mut Vec<R>) {
    match self {
      Patch::Inserted { id } => items.retain(|item| item.id() != *id),
      Patch::Replaced { old, .. } => {
        if let Some(slot) = items.iter_mut().find(|item| item.id() == old.id()) {
          *slot = old.clone();
        }
      }
      Patch::Removed {
        old,
        index: Some(index),
      } => {
        if items.iter().all(|item| item.id() != old.id()) {
          let index = (*index).min(items.len());
          items.insert(index, old.clone());
        }
      }
      Patch::Removed { index: None, .. } => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::types::{Post, PostDraft};

  fn post(id: u64, title: &str) -> Post {
    Post::from_draft(
      id,
      PostDraft {
        user_id: 1,
        title: title.to_string(),
        body: String::new(),
      },
    )
  }

  fn ids(items: &[Post]) -> Vec<u64> {
    items.iter().map(|p| p.id).collect()
  }

  #[test]
  fn test_insert_and_revert() {
    let mut items = vec![post(1, "a"), post(2, "b")];
    let patch = Patch::insert(&mut items, post(3, "c"));
    assert_eq!(ids(&items), vec![1, 2, 3]);

    patch.revert(&mut items);
    assert_eq!(ids(&items), vec![1, 2]);
  }

  #[test]
  fn test_replace_and_revert() {
    let mut items = vec![post(1, "a"), post(2, "b")];
    let patch = Patch::replace(&mut items, post(2, "changed")).unwrap();
    assert_eq!(items[1].title, "changed");
    assert!(matches!(&patch, Patch::Replaced { old, .. } if old.title == "b"));

    patch.revert(&mut items);
    assert_eq!(items[1].title, "b");
  }

  #[test]
  fn test_replace_missing_entity() {
    let mut items = vec![post(1, "a")];
    assert!(Patch::replace(&mut items, post(9, "x")).is_none());
  }

  #[test]
  fn test_remove_and_revert_restores_position() {
    let mut items = vec![post(1, "a"), post(2, "b"), post(3, "c")];
    let patch = Patch::remove(&mut items, 2).unwrap();
    assert_eq!(ids(&items), vec![1, 3]);

    patch.revert(&mut items);
    assert_eq!(ids(&items), vec![1, 2, 3]);
  }

  #[test]
  fn test_revert_remove_does_not_duplicate() {
    let mut items = vec![post(1, "a"), post(2, "b")];
    let patch = Patch::remove(&mut items, 2).unwrap();
    items.push(post(2, "refetched"));

    patch.revert(&mut items);
    assert_eq!(ids(&items), vec![1, 2]);
    assert_eq!(items[1].title, "refetched");
  }

  #[test]
  fn test_revert_unlisted_removal_leaves_list_alone() {
    let mut items = vec![post(1, "a")];
    let patch = Patch::Removed {
      old: post(7, "detail only"),
      index: None,
    };

    patch.revert(&mut items);
    assert_eq!(ids(&items), vec![1]);
  }

  #[test]
  fn test_revert_remove_clamps_index() {
    let mut items = vec![post(1, "a"), post(2, "b"), post(3, "c")];
    let patch = Patch::remove(&mut items, 3).unwrap();
    items.clear();

    patch.revert(&mut items);
    assert_eq!(ids(&items), vec![3]);
  }
}
