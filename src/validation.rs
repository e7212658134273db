//! Form validation rules for users and posts.

use regex::Regex;
use std::sync::OnceLock;

use crate::api::types::{PostDraft, UserDraft};
use crate::i18n::Texts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalid {
  NameRequired,
  UsernameRequired,
  EmailRequired,
  InvalidEmail,
  UserRequired,
  TitleRequired,
  ContentRequired,
}

impl Invalid {
  pub fn message(self, t: &Texts) -> &'static str {
    match self {
      Invalid::NameRequired => t.name_required,
      Invalid::UsernameRequired => t.username_required,
      Invalid::EmailRequired => t.email_required,
      Invalid::InvalidEmail => t.invalid_email,
      Invalid::UserRequired => t.user_required,
      Invalid::TitleRequired => t.title_required,
      Invalid::ContentRequired => t.content_required,
    }
  }
}

/// Form field a validation error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
  Name,
  Username,
  Email,
  UserId,
  Title,
  Body,
}

fn email_pattern() -> &'static Regex {
  static EMAIL: OnceLock<Regex> = OnceLock::new();
  EMAIL.get_or_init(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("static regex should not panic")
  })
}

pub fn is_valid_email(email: &str) -> bool {
  email_pattern().is_match(email.trim())
}

pub fn validate_user(draft: &UserDraft) -> Vec<(Field, Invalid)> {
  let mut errors = Vec::new();
  if draft.name.trim().is_empty() {
    errors.push((Field::Name, Invalid::NameRequired));
  }
  if draft.username.trim().is_empty() {
    errors.push((Field::Username, Invalid::UsernameRequired));
  }
  if draft.email.trim().is_empty() {
    errors.push((Field::Email, Invalid::EmailRequired));
  } else if !is_valid_email(&draft.email) {
    errors.push((Field::Email, Invalid::InvalidEmail));
  }
  errors
}

pub fn validate_post(draft: &PostDraft) -> Vec<(Field, Invalid)> {
  let mut errors = Vec::new();
  if draft.user_id == 0 {
    errors.push((Field::UserId, Invalid::UserRequired));
  }
  if draft.title.trim().is_empty() {
    errors.push((Field::Title, Invalid::TitleRequired));
  }
  if draft.body.trim().is_empty() {
    errors.push((Field::Body, Invalid::ContentRequired));
  }
  errors
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::i18n::EN;

  #[test]
  fn test_email_pattern() {
    assert!(is_valid_email("Sincere@april.biz"));
    assert!(is_valid_email(" a.b+c@mail.example.org "));
    assert!(!is_valid_email("no-at-sign"));
    assert!(!is_valid_email("a@b"));
    assert!(!is_valid_email("a b@example.com"));
  }

  #[test]
  fn test_empty_user_reports_all_required_fields() {
    let errors = validate_user(&UserDraft::default());
    assert_eq!(
      errors,
      vec![
        (Field::Name, Invalid::NameRequired),
        (Field::Username, Invalid::UsernameRequired),
        (Field::Email, Invalid::EmailRequired),
      ]
    );
  }

  #[test]
  fn test_malformed_email() {
    let draft = UserDraft {
      name: "Ada".to_string(),
      username: "ada".to_string(),
      email: "ada@".to_string(),
      ..UserDraft::default()
    };
    assert_eq!(validate_user(&draft), vec![(Field::Email, Invalid::InvalidEmail)]);
  }

  #[test]
  fn test_valid_user() {
    let draft = UserDraft {
      name: "Ada".to_string(),
      username: "ada".to_string(),
      email: "ada@example.com".to_string(),
      ..UserDraft::default()
    };
    assert!(validate_user(&draft).is_empty());
  }

  #[test]
  fn test_post_rules() {
    let errors = validate_post(&PostDraft::default());
    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0], (Field::UserId, Invalid::UserRequired));

    let draft = PostDraft {
      user_id: 2,
      title: "t".to_string(),
      body: "  ".to_string(),
    };
    assert_eq!(validate_post(&draft), vec![(Field::Body, Invalid::ContentRequired)]);
  }

  #[test]
  fn test_messages() {
    assert_eq!(Invalid::InvalidEmail.message(&EN), "Please enter a valid email address");
  }
}
