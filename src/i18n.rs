//! Turkish and English UI text.
//!
//! Views hold no strings of their own; they read a `Texts` table picked by
//! the active `Language` on every render, so switching language takes
//! effect on the next frame.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cache::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum Language {
  #[default]
  #[serde(rename = "TR")]
  Tr,
  #[serde(rename = "EN")]
  En,
}

impl Language {
  pub fn as_str(self) -> &'static str {
    match self {
      Language::Tr => "TR",
      Language::En => "EN",
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      Language::Tr => Language::En,
      Language::En => Language::Tr,
    }
  }

  pub fn texts(self) -> &'static Texts {
    match self {
      Language::Tr => &TR,
      Language::En => &EN,
    }
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Language {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_uppercase().as_str() {
      "TR" => Ok(Language::Tr),
      "EN" => Ok(Language::En),
      other => Err(format!("unknown language: {}", other)),
    }
  }
}

/// Every user-visible string, per language.
#[derive(Debug)]
pub struct Texts {
  pub users: &'static str,
  pub posts: &'static str,
  pub users_list: &'static str,
  pub posts_list: &'static str,
  pub add_user: &'static str,
  pub add_post: &'static str,
  pub edit_user: &'static str,
  pub edit_post: &'static str,
  pub loading_users: &'static str,
  pub loading_posts: &'static str,
  pub loading: &'static str,
  pub error_loading_users: &'static str,
  pub error_loading_posts: &'static str,
  pub no_users_found: &'static str,
  pub no_posts_found: &'static str,
  pub no_users_matching: &'static str,
  pub no_posts_matching: &'static str,
  pub retry_hint: &'static str,
  pub search_users: &'static str,
  pub search_posts: &'static str,
  pub page: &'static str,

  pub id: &'static str,
  pub name: &'static str,
  pub username: &'static str,
  pub email: &'static str,
  pub post_count: &'static str,
  pub user_id: &'static str,
  pub title_field: &'static str,
  pub content: &'static str,
  pub author: &'static str,

  pub user_details: &'static str,
  pub post_details: &'static str,
  pub basic_information: &'static str,
  pub contact_information: &'static str,
  pub address_information: &'static str,
  pub company_information: &'static str,
  pub author_details: &'static str,
  pub user_posts: &'static str,
  pub phone: &'static str,
  pub website: &'static str,
  pub street: &'static str,
  pub suite: &'static str,
  pub city: &'static str,
  pub zipcode: &'static str,
  pub latitude: &'static str,
  pub longitude: &'static str,
  pub company_name: &'static str,
  pub catch_phrase: &'static str,
  pub business_strategy: &'static str,

  pub view: &'static str,
  pub edit: &'static str,
  pub delete: &'static str,
  pub cancel: &'static str,
  pub save: &'static str,
  pub saving: &'static str,
  pub back: &'static str,
  pub sort: &'static str,
  pub refresh: &'static str,
  pub search: &'static str,
  pub command: &'static str,
  pub menu: &'static str,
  pub optional: &'static str,

  pub confirm_delete: &'static str,
  pub delete_post_confirmation: &'static str,
  pub delete_user_confirmation: &'static str,

  pub user_add_success: &'static str,
  pub user_add_error: &'static str,
  pub user_update_success: &'static str,
  pub user_update_error: &'static str,
  pub user_delete_success: &'static str,
  pub user_delete_error: &'static str,
  pub post_add_success: &'static str,
  pub post_add_error: &'static str,
  pub post_update_success: &'static str,
  pub post_update_error: &'static str,
  pub post_delete_success: &'static str,
  pub post_delete_error: &'static str,

  pub name_required: &'static str,
  pub username_required: &'static str,
  pub email_required: &'static str,
  pub invalid_email: &'static str,
  pub user_required: &'static str,
  pub title_required: &'static str,
  pub content_required: &'static str,

  pub unknown_command: &'static str,
  pub preferences_error: &'static str,
  pub refreshing: &'static str,
}

pub static TR: Texts = Texts {
  users: "Kullanıcılar",
  posts: "Gönderiler",
  users_list: "Kullanıcı Listesi",
  posts_list: "Gönderi Listesi",
  add_user: "Kullanıcı Ekle",
  add_post: "Gönderi Ekle",
  edit_user: "Kullanıcıyı Düzenle",
  edit_post: "Gönderiyi Düzenle",
  loading_users: "Kullanıcılar yükleniyor...",
  loading_posts: "Gönderiler yükleniyor...",
  loading: "Yükleniyor...",
  error_loading_users: "Kullanıcılar yüklenirken hata oluştu",
  error_loading_posts: "Gönderiler yüklenirken hata oluştu",
  no_users_found: "Kullanıcı bulunamadı",
  no_posts_found: "Gönderi bulunamadı",
  no_users_matching: "eşleşen kullanıcı bulunamadı",
  no_posts_matching: "eşleşen gönderi bulunamadı",
  retry_hint: "Tekrar denemek için 'r' tuşuna basın.",
  search_users: "İsim, kullanıcı adı veya e-posta ile ara",
  search_posts: "Başlık ile ara",
  page: "Sayfa",

  id: "ID",
  name: "İsim",
  username: "Kullanıcı Adı",
  email: "E-posta",
  post_count: "Gönderi Sayısı",
  user_id: "Kullanıcı ID",
  title_field: "Başlık",
  content: "İçerik",
  author: "Yazar",

  user_details: "Kullanıcı Detayları",
  post_details: "Gönderi Detayları",
  basic_information: "Temel Bilgiler",
  contact_information: "İletişim Bilgileri",
  address_information: "Adres Bilgileri",
  company_information: "Şirket Bilgileri",
  author_details: "Yazar Bilgileri",
  user_posts: "Kullanıcının Gönderileri",
  phone: "Telefon",
  website: "Web Sitesi",
  street: "Sokak",
  suite: "Apartman/Daire",
  city: "Şehir",
  zipcode: "Posta Kodu",
  latitude: "Enlem",
  longitude: "Boylam",
  company_name: "Şirket Adı",
  catch_phrase: "Slogan",
  business_strategy: "İş Stratejisi",

  view: "Görüntüle",
  edit: "Düzenle",
  delete: "Sil",
  cancel: "İptal",
  save: "Kaydet",
  saving: "Kaydediliyor...",
  back: "geri",
  sort: "sırala",
  refresh: "yenile",
  search: "ara",
  command: "komut",
  menu: "menü",
  optional: "opsiyonel",

  confirm_delete: "Silmeyi Onayla",
  delete_post_confirmation:
    "Bu gönderiyi silmek istediğinizden emin misiniz? Bu işlem geri alınamaz.",
  delete_user_confirmation:
    "Bu kullanıcıyı silmek istediğinizden emin misiniz? Bu işlem geri alınamaz.",

  user_add_success: "Kullanıcı başarıyla eklendi!",
  user_add_error: "Kullanıcı eklenirken hata oluştu!",
  user_update_success: "Kullanıcı başarıyla güncellendi!",
  user_update_error: "Kullanıcı güncellenirken hata oluştu!",
  user_delete_success: "Kullanıcı başarıyla silindi!",
  user_delete_error: "Kullanıcı silinirken hata oluştu!",
  post_add_success: "Gönderi başarıyla eklendi!",
  post_add_error: "Gönderi eklenirken hata oluştu!",
  post_update_success: "Gönderi başarıyla güncellendi!",
  post_update_error: "Gönderi güncellenirken hata oluştu!",
  post_delete_success: "Gönderi başarıyla silindi!",
  post_delete_error: "Gönderi silinirken hata oluştu!",

  name_required: "İsim gerekli",
  username_required: "Kullanıcı adı gerekli",
  email_required: "E-posta gerekli",
  invalid_email: "Geçerli bir e-posta adresi girin",
  user_required: "Kullanıcı seçimi gerekli",
  title_required: "Başlık gerekli",
  content_required: "İçerik gerekli",

  unknown_command: "Bilinmeyen komut",
  preferences_error: "Tercihler kaydedilemedi",
  refreshing: "Veriler yenileniyor",
};

pub static EN: Texts = Texts {
  users: "Users",
  posts: "Posts",
  users_list: "Users List",
  posts_list: "Posts List",
  add_user: "Add User",
  add_post: "Add Post",
  edit_user: "Edit User",
  edit_post: "Edit Post",
  loading_users: "Loading users...",
  loading_posts: "Loading posts...",
  loading: "Loading...",
  error_loading_users: "Error loading users",
  error_loading_posts: "Error loading posts",
  no_users_found: "No users found",
  no_posts_found: "No posts found",
  no_users_matching: "No users found matching",
  no_posts_matching: "No posts found matching",
  retry_hint: "Press 'r' to retry.",
  search_users: "Search by name, username or email",
  search_posts: "Search by title",
  page: "Page",

  id: "ID",
  name: "Name",
  username: "Username",
  email: "Email",
  post_count: "Post Count",
  user_id: "User ID",
  title_field: "Title",
  content: "Content",
  author: "Author",

  user_details: "User Details",
  post_details: "Post Details",
  basic_information: "Basic Information",
  contact_information: "Contact Information",
  address_information: "Address Information",
  company_information: "Company Information",
  author_details: "Author Details",
  user_posts: "Posts by User",
  phone: "Phone",
  website: "Website",
  street: "Street",
  suite: "Suite",
  city: "City",
  zipcode: "Zipcode",
  latitude: "Latitude",
  longitude: "Longitude",
  company_name: "Company Name",
  catch_phrase: "Catch Phrase",
  business_strategy: "Business Strategy",

  view: "View",
  edit: "Edit",
  delete: "Delete",
  cancel: "Cancel",
  save: "Save",
  saving: "Saving...",
  back: "back",
  sort: "sort",
  refresh: "refresh",
  search: "search",
  command: "command",
  menu: "menu",
  optional: "optional",

  confirm_delete: "Confirm Delete",
  delete_post_confirmation:
    "Are you sure you want to delete this post? This action cannot be undone.",
  delete_user_confirmation:
    "Are you sure you want to delete this user? This action cannot be undone.",

  user_add_success: "User added successfully!",
  user_add_error: "Error adding user!",
  user_update_success: "User updated successfully!",
  user_update_error: "Error updating user!",
  user_delete_success: "User deleted successfully!",
  user_delete_error: "Error deleting user!",
  post_add_success: "Post added successfully!",
  post_add_error: "Error adding post!",
  post_update_success: "Post updated successfully!",
  post_update_error: "Error updating post!",
  post_delete_success: "Post deleted successfully!",
  post_delete_error: "Error deleting post!",

  name_required: "Name is required",
  username_required: "Username is required",
  email_required: "Email is required",
  invalid_email: "Please enter a valid email address",
  user_required: "User selection is required",
  title_required: "Title is required",
  content_required: "Content is required",

  unknown_command: "Unknown command",
  preferences_error: "Could not save preferences",
  refreshing: "Refreshing data",
};

/// Mutation outcome, kept language-neutral until it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Created,
  Updated,
  Deleted,
}

/// A toast message. Rendered with the language active at display time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
  Done(EntityKind, Outcome),
  Failed(EntityKind, Outcome, String),
  Refreshing,
  UnknownCommand(String),
  PreferencesFailed(String),
}

impl Msg {
  pub fn is_error(&self) -> bool {
    matches!(
      self,
      Msg::Failed(..) | Msg::UnknownCommand(_) | Msg::PreferencesFailed(_)
    )
  }

  pub fn render(&self, t: &Texts) -> String {
    match self {
      Msg::Done(kind, outcome) => outcome_text(t, *kind, *outcome, true).to_string(),
      Msg::Failed(kind, outcome, detail) => {
        format!("{} ({})", outcome_text(t, *kind, *outcome, false), detail)
      }
      Msg::Refreshing => t.refreshing.to_string(),
      Msg::UnknownCommand(cmd) => format!("{}: {}", t.unknown_command, cmd),
      Msg::PreferencesFailed(detail) => format!("{} ({})", t.preferences_error, detail),
    }
  }
}

fn outcome_text(t: &Texts, kind: EntityKind, outcome: Outcome, ok: bool) -> &'static str {
  match (kind, outcome, ok) {
    (EntityKind::User, Outcome::Created, true) => t.user_add_success,
    (EntityKind::User, Outcome::Created, false) => t.user_add_error,
    (EntityKind::User, Outcome::Updated, true) => t.user_update_success,
    (EntityKind::User, Outcome::Updated, false) => t.user_update_error,
    (EntityKind::User, Outcome::Deleted, true) => t.user_delete_success,
    (EntityKind::User, Outcome::Deleted, false) => t.user_delete_error,
    (EntityKind::Post, Outcome::Created, true) => t.post_add_success,
    (EntityKind::Post, Outcome::Created, false) => t.post_add_error,
    (EntityKind::Post, Outcome::Updated, true) => t.post_update_success,
    (EntityKind::Post, Outcome::Updated, false) => t.post_update_error,
    (EntityKind::Post, Outcome::Deleted, true) => t.post_delete_success,
    (EntityKind::Post, Outcome::Deleted, false) => t.post_delete_error,
  }
}
