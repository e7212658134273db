//! Cache and table trait implementations for the API types.

use crate::cache::{EntityKind, Resource};
use crate::table::Searchable;

use super::types::{Post, PostDraft, PostPatch, User, UserDraft, UserPatch};

// ============================================================================
// Resource implementations
// ============================================================================

impl Resource for User {
  type Draft = UserDraft;
  type Patch = UserPatch;

  fn id(&self) -> u64 {
    self.id
  }

  fn kind() -> EntityKind {
    EntityKind::User
  }

  fn from_draft(id: u64, draft: UserDraft) -> Self {
    User {
      id,
      name: draft.name,
      username: draft.username,
      email: draft.email,
      phone: draft.phone,
      website: draft.website,
      address: draft.address,
      company: draft.company,
    }
  }

  fn merged(&self, patch: &UserPatch) -> Self {
    let mut user = self.clone();
    if let Some(name) = &patch.name {
      user.name = name.clone();
    }
    if let Some(username) = &patch.username {
      user.username = username.clone();
    }
    if let Some(email) = &patch.email {
      user.email = email.clone();
    }
    if let Some(phone) = &patch.phone {
      user.phone = phone.clone();
    }
    if let Some(website) = &patch.website {
      user.website = website.clone();
    }
    if let Some(address) = &patch.address {
      user.address = address.clone();
    }
    if let Some(company) = &patch.company {
      user.company = company.clone();
    }
    user
  }
}

impl Resource for Post {
  type Draft = PostDraft;
  type Patch = PostPatch;

  fn id(&self) -> u64 {
    self.id
  }

  fn kind() -> EntityKind {
    EntityKind::Post
  }

  fn from_draft(id: u64, draft: PostDraft) -> Self {
    Post {
      id,
      user_id: draft.user_id,
      title: draft.title,
      body: draft.body,
    }
  }

  fn merged(&self, patch: &PostPatch) -> Self {
    Post {
      id: self.id,
      user_id: patch.user_id.unwrap_or(self.user_id),
      title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
      body: patch.body.clone().unwrap_or_else(|| self.body.clone()),
    }
  }
}

// ============================================================================
// Searchable implementations
// ============================================================================

impl Searchable for User {
  fn search_fields(&self) -> Vec<&str> {
    vec![&self.name, &self.username, &self.email]
  }

  fn sort_key(&self) -> u64 {
    self.id
  }
}

impl Searchable for Post {
  fn search_fields(&self) -> Vec<&str> {
    vec![&self.title]
  }

  fn sort_key(&self) -> u64 {
    self.id
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::types::Address;

  fn user() -> User {
    User::from_draft(
      7,
      UserDraft {
        name: "Ada".to_string(),
        username: "ada".to_string(),
        email: "ada@example.com".to_string(),
        ..UserDraft::default()
      },
    )
  }

  #[test]
  fn test_merge_only_touches_present_fields() {
    let merged = user().merged(&UserPatch::name("Grace"));
    assert_eq!(merged.id, 7);
    assert_eq!(merged.name, "Grace");
    assert_eq!(merged.username, "ada");
    assert_eq!(merged.email, "ada@example.com");
  }

  #[test]
  fn test_merge_replaces_nested_objects_whole() {
    let patch = UserPatch {
      address: Some(Address {
        city: "Izmir".to_string(),
        ..Address::default()
      }),
      ..UserPatch::default()
    };
    let merged = user().merged(&patch);
    assert_eq!(merged.address.city, "Izmir");
    assert_eq!(merged.address.street, "");
  }

  #[test]
  fn test_post_merge_keeps_id() {
    let post = Post::from_draft(
      3,
      PostDraft {
        user_id: 1,
        title: "Hello".to_string(),
        body: "x".to_string(),
      },
    );
    let merged = post.merged(&PostPatch {
      title: Some("World".to_string()),
      ..PostPatch::default()
    });
    assert_eq!(merged.id, 3);
    assert_eq!(merged.user_id, 1);
    assert_eq!(merged.title, "World");
    assert_eq!(merged.body, "x");
  }

  #[test]
  fn test_search_fields() {
    assert_eq!(user().search_fields(), vec!["Ada", "ada", "ada@example.com"]);
  }
}
