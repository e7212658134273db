//! Filter, sort and paginate a collection into one visible page.
//!
//! Everything here is pure: the same `(items, filter, sort, page)` always
//! produces the same page, and nothing touches the cache.

use serde::{Deserialize, Serialize};

/// Rows that can be searched and ordered by the table pipeline.
pub trait Searchable {
  /// Fields matched against the filter text
  fn search_fields(&self) -> Vec<&str>;

  /// Numeric key the table sorts by
  fn sort_key(&self) -> u64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  #[default]
  Asc,
  Desc,
}

impl SortOrder {
  pub fn toggled(self) -> Self {
    match self {
      SortOrder::Asc => SortOrder::Desc,
      SortOrder::Desc => SortOrder::Asc,
    }
  }

  /// Arrow shown next to the sorted column header.
  pub fn arrow(self) -> &'static str {
    match self {
      SortOrder::Asc => "▲",
      SortOrder::Desc => "▼",
    }
  }
}

/// Keep items with at least one search field containing `filter`,
/// ignoring case. A blank filter keeps everything.
pub fn filter_items<'a, T: Searchable>(items: &'a [T], filter: &str) -> Vec<&'a T> {
  let needle = filter.trim().to_lowercase();
  if needle.is_empty() {
    return items.iter().collect();
  }
  items
    .iter()
    .filter(|item| {
      item
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    })
    .collect()
}

/// Stable sort by `sort_key`.
pub fn sort_items<T: Searchable>(items: &mut [&T], order: SortOrder) {
  match order {
    SortOrder::Asc => items.sort_by_key(|item| item.sort_key()),
    SortOrder::Desc => items.sort_by(|a, b| b.sort_key().cmp(&a.sort_key())),
  }
}

/// Number of pages for `len` rows; zero rows still make one (empty) page.
pub fn total_pages(len: usize, page_size: usize) -> usize {
  len.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a 1-based page number into `[1, total_pages]`.
pub fn clamp_page(page: usize, len: usize, page_size: usize) -> usize {
  page.clamp(1, total_pages(len, page_size))
}

/// Rows on the given 1-based page, after clamping.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
  let size = page_size.max(1);
  let page = clamp_page(page, items.len(), size);
  items
    .iter()
    .skip((page - 1) * size)
    .take(size)
    .cloned()
    .collect()
}

/// One rendered page of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a, T> {
  pub rows: Vec<&'a T>,
  /// Effective (clamped) page number
  pub page: usize,
  pub total_pages: usize,
  /// Rows left after filtering, across all pages
  pub matched: usize,
}

/// Per-table view state: filter text, sort order and current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
  filter: String,
  sort: SortOrder,
  page: usize,
  page_size: usize,
}

impl TableState {
  pub fn new(page_size: usize, sort: SortOrder) -> Self {
    Self {
      filter: String::new(),
      sort,
      page: 1,
      page_size: page_size.max(1),
    }
  }

  pub fn filter(&self) -> &str {
    &self.filter
  }

  pub fn sort(&self) -> SortOrder {
    self.sort
  }

  pub fn page(&self) -> usize {
    self.page
  }

  /// Replace the filter text. Any change sends the table back to page 1.
  pub fn set_filter(&mut self, filter: impl Into<String>) {
    let filter = filter.into();
    if filter != self.filter {
      self.filter = filter;
      self.page = 1;
    }
  }

  pub fn toggle_sort(&mut self) {
    self.sort = self.sort.toggled();
  }

  /// Advance one page, staying on the last page of `len` filtered rows.
  pub fn next_page(&mut self, len: usize) {
    self.page = clamp_page(self.page + 1, len, self.page_size);
  }

  pub fn prev_page(&mut self, len: usize) {
    self.page = clamp_page(self.page.saturating_sub(1), len, self.page_size);
  }

  /// Run the whole pipeline over `items`.
  ///
  /// The stored page is clamped too, so a table whose data shrank (after a
  /// delete or a refetch) never points past its last page.
  pub fn view<'a, T: Searchable>(&mut self, items: &'a [T]) -> PageView<'a, T> {
    let mut matched = filter_items(items, &self.filter);
    sort_items(&mut matched, self.sort);

    self.page = clamp_page(self.page, matched.len(), self.page_size);
    let rows = paginate(&matched, self.page, self.page_size);

    PageView {
      rows,
      page: self.page,
      total_pages: total_pages(matched.len(), self.page_size),
      matched: matched.len(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::types::{Post, PostDraft, User, UserDraft};
  use crate::cache::Resource;

  fn post(id: u64, user_id: u64, title: &str) -> Post {
    Post::from_draft(
      id,
      PostDraft {
        user_id,
        title: title.to_string(),
        body: "lorem".to_string(),
      },
    )
  }

  fn user(id: u64, name: &str, username: &str, email: &str) -> User {
    User::from_draft(
      id,
      UserDraft {
        name: name.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        ..UserDraft::default()
      },
    )
  }

  fn numbered(n: u64) -> Vec<Post> {
    (1..=n).map(|id| post(id, 1, &format!("post {}", id))).collect()
  }

  fn ids<T: Searchable>(rows: &[&T]) -> Vec<u64> {
    rows.iter().map(|r| r.sort_key()).collect()
  }

  #[test]
  fn test_filter_posts_by_title() {
    let posts = vec![post(5, 1, "Hello"), post(6, 2, "World")];
    let matched = filter_items(&posts, "wor");
    assert_eq!(ids(&matched), vec![6]);
  }

  #[test]
  fn test_blank_filter_keeps_everything() {
    let posts = vec![post(5, 1, "Hello"), post(6, 2, "World")];
    assert_eq!(filter_items(&posts, "").len(), 2);
    assert_eq!(filter_items(&posts, "   ").len(), 2);
  }

  #[test]
  fn test_filter_is_case_insensitive_and_trimmed() {
    let posts = vec![post(5, 1, "Hello"), post(6, 2, "World")];
    assert_eq!(ids(&filter_items(&posts, "  HELL ")), vec![5]);
  }

  #[test]
  fn test_filter_users_across_fields() {
    let users = vec![
      user(1, "Leanne Graham", "Bret", "Sincere@april.biz"),
      user(2, "Ervin Howell", "Antonette", "Shanna@melissa.tv"),
      user(3, "Clementine Bauch", "Samantha", "Nathan@yesenia.net"),
    ];
    assert_eq!(ids(&filter_items(&users, "graham")), vec![1]);
    assert_eq!(ids(&filter_items(&users, "antonette")), vec![2]);
    assert_eq!(ids(&filter_items(&users, "yesenia")), vec![3]);
    assert!(filter_items(&users, "nobody").is_empty());
  }

  #[test]
  fn test_post_body_is_not_searched() {
    let posts = vec![post(1, 1, "Title")];
    assert!(filter_items(&posts, "lorem").is_empty());
  }

  #[test]
  fn test_sort_orders_by_id() {
    let posts = vec![post(3, 1, "c"), post(1, 1, "a"), post(2, 1, "b")];
    let mut rows: Vec<&Post> = posts.iter().collect();

    sort_items(&mut rows, SortOrder::Asc);
    assert_eq!(ids(&rows), vec![1, 2, 3]);

    sort_items(&mut rows, SortOrder::Desc);
    assert_eq!(ids(&rows), vec![3, 2, 1]);
  }

  #[test]
  fn test_total_pages() {
    assert_eq!(total_pages(0, 10), 1);
    assert_eq!(total_pages(10, 10), 1);
    assert_eq!(total_pages(11, 10), 2);
    assert_eq!(total_pages(100, 20), 5);
  }

  #[test]
  fn test_paginate_clamps_page() {
    let items: Vec<u32> = (1..=25).collect();
    assert_eq!(paginate(&items, 3, 10), vec![21, 22, 23, 24, 25]);
    assert_eq!(paginate(&items, 9, 10), vec![21, 22, 23, 24, 25]);
    assert_eq!(paginate(&items, 0, 10), (1..=10).collect::<Vec<_>>());
    assert!(paginate(&Vec::<u32>::new(), 4, 10).is_empty());
  }

  #[test]
  fn test_paginate_is_idempotent() {
    let items: Vec<u32> = (1..=25).collect();
    assert_eq!(paginate(&items, 2, 10), paginate(&items, 2, 10));
  }

  #[test]
  fn test_filter_change_resets_page() {
    let posts = numbered(50);
    let mut table = TableState::new(10, SortOrder::Asc);
    table.next_page(posts.len());
    table.next_page(posts.len());
    assert_eq!(table.page(), 3);

    table.set_filter("post");
    assert_eq!(table.page(), 1);
  }

  #[test]
  fn test_same_filter_keeps_page() {
    let posts = numbered(50);
    let mut table = TableState::new(10, SortOrder::Asc);
    table.set_filter("post");
    table.next_page(posts.len());

    table.set_filter("post");
    assert_eq!(table.page(), 2);
  }

  #[test]
  fn test_page_navigation_is_clamped() {
    let mut table = TableState::new(20, SortOrder::Asc);
    table.prev_page(45);
    assert_eq!(table.page(), 1);

    for _ in 0..10 {
      table.next_page(45);
    }
    assert_eq!(table.page(), 3);
  }

  #[test]
  fn test_view_runs_full_pipeline() {
    let posts = numbered(25);
    let mut table = TableState::new(10, SortOrder::Desc);
    table.next_page(posts.len());

    let view = table.view(&posts);
    assert_eq!(view.page, 2);
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.matched, 25);
    assert_eq!(view.rows.first().map(|p| p.id), Some(15));
    assert_eq!(view.rows.len(), 10);
  }

  #[test]
  fn test_view_clamps_after_data_shrinks() {
    let posts = numbered(25);
    let mut table = TableState::new(10, SortOrder::Asc);
    table.next_page(posts.len());
    table.next_page(posts.len());
    assert_eq!(table.page(), 3);

    let view = table.view(&posts[..12]);
    assert_eq!(view.page, 2);
    assert_eq!(table.page(), 2);
    assert_eq!(ids(&view.rows), vec![11, 12]);
  }

  #[test]
  fn test_view_with_no_matches() {
    let posts = numbered(5);
    let mut table = TableState::new(10, SortOrder::Asc);
    table.set_filter("zzz");

    let view = table.view(&posts);
    assert!(view.rows.is_empty());
    assert_eq!(view.page, 1);
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.matched, 0);
  }

  #[test]
  fn test_sort_order_serde() {
    let order: SortOrder = serde_yaml::from_str("desc").unwrap();
    assert_eq!(order, SortOrder::Desc);
    assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
  }
}
