//! Serde types matching the users/posts REST resources.
//!
//! The wire format is camelCase JSON; nested `address` and `company` objects
//! travel with every user.

use serde::{Deserialize, Serialize};

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geo {
  #[serde(default)]
  pub lat: String,
  #[serde(default)]
  pub lng: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
  #[serde(default)]
  pub street: String,
  #[serde(default)]
  pub suite: String,
  #[serde(default)]
  pub city: String,
  #[serde(default)]
  pub zipcode: String,
  #[serde(default)]
  pub geo: Geo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub catch_phrase: String,
  #[serde(default)]
  pub bs: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub id: u64,
  pub name: String,
  pub username: String,
  pub email: String,
  #[serde(default)]
  pub phone: String,
  #[serde(default)]
  pub website: String,
  #[serde(default)]
  pub address: Address,
  #[serde(default)]
  pub company: Company,
}

/// Create payload for a user (everything but the id).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserDraft {
  pub name: String,
  pub username: String,
  pub email: String,
  pub phone: String,
  pub website: String,
  pub address: Address,
  pub company: Company,
}

/// Partial update for a user. Absent fields are left untouched; nested
/// objects are replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
  pub name: Option<String>,
  pub username: Option<String>,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub website: Option<String>,
  pub address: Option<Address>,
  pub company: Option<Company>,
}

impl UserPatch {
  pub fn name(name: impl Into<String>) -> Self {
    Self {
      name: Some(name.into()),
      ..Self::default()
    }
  }
}

// ============================================================================
// Posts
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
  pub id: u64,
  pub user_id: u64,
  pub title: String,
  #[serde(default)]
  pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
  pub user_id: u64,
  pub title: String,
  pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
  pub user_id: Option<u64>,
  pub title: Option<String>,
  pub body: Option<String>,
}

// ============================================================================
// Display helpers
// ============================================================================

/// Username of the post's author, or a `User{id}` placeholder when the
/// author is not in the given collection.
pub fn author_name(users: &[User], user_id: u64) -> String {
  users
    .iter()
    .find(|u| u.id == user_id)
    .map(|u| u.username.clone())
    .unwrap_or_else(|| format!("User{}", user_id))
}

/// Number of posts authored by `user_id`.
pub fn post_count(posts: &[Post], user_id: u64) -> usize {
  posts.iter().filter(|p| p.user_id == user_id).count()
}
