//! In-memory `ResourceApi` used by cache and view tests.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{ApiError, ApiResult, ResourceApi};
use crate::query::QueryState;

use super::traits::Resource;

fn server_error() -> ApiError {
  ApiError::Status {
    status: 500,
    message: "Internal Server Error".to_string(),
  }
}

/// Backend double holding a mutable list, with switchable failures and an
/// optional response delay.
pub struct FakeApi<R> {
  items: Mutex<Vec<R>>,
  fail_reads: AtomicBool,
  fail_writes: AtomicBool,
  delay_ms: AtomicU64,
  list_calls: AtomicUsize,
  get_calls: AtomicUsize,
  create_calls: AtomicUsize,
  update_calls: AtomicUsize,
}

impl<R: Resource> FakeApi<R> {
  pub fn new(items: Vec<R>) -> Self {
    Self {
      items: Mutex::new(items),
      fail_reads: AtomicBool::new(false),
      fail_writes: AtomicBool::new(false),
      delay_ms: AtomicU64::new(0),
      list_calls: AtomicUsize::new(0),
      get_calls: AtomicUsize::new(0),
      create_calls: AtomicUsize::new(0),
      update_calls: AtomicUsize::new(0),
    }
  }

  pub fn fail_reads(&self, fail: bool) {
    self.fail_reads.store(fail, Ordering::SeqCst);
  }

  pub fn fail_writes(&self, fail: bool) {
    self.fail_writes.store(fail, Ordering::SeqCst);
  }

  pub fn set_delay(&self, delay: Duration) {
    self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
  }

  pub fn list_calls(&self) -> usize {
    self.list_calls.load(Ordering::SeqCst)
  }

  pub fn get_calls(&self) -> usize {
    self.get_calls.load(Ordering::SeqCst)
  }

  pub fn create_calls(&self) -> usize {
    self.create_calls.load(Ordering::SeqCst)
  }

  pub fn update_calls(&self) -> usize {
    self.update_calls.load(Ordering::SeqCst)
  }

  /// Server-side copy of an entity.
  pub fn stored(&self, id: u64) -> Option<R> {
    self.items.lock().unwrap().iter().find(|i| i.id() == id).cloned()
  }

  async fn respond(&self, fail: &AtomicBool) -> ApiResult<()> {
    let delay = self.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
      tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    if fail.load(Ordering::SeqCst) {
      return Err(server_error());
    }
    Ok(())
  }
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for FakeApi<R> {
  async fn list(&self) -> ApiResult<Vec<R>> {
    self.list_calls.fetch_add(1, Ordering::SeqCst);
    self.respond(&self.fail_reads).await?;
    Ok(self.items.lock().unwrap().clone())
  }

  async fn list_where(&self, field: &str, value: u64) -> ApiResult<Vec<R>> {
    self.respond(&self.fail_reads).await?;
    let items = self.items.lock().unwrap().clone();
    Ok(
      items
        .into_iter()
        .filter(|item| {
          serde_json::to_value(item)
            .ok()
            .and_then(|json| json.get(field).and_then(|v| v.as_u64()))
            == Some(value)
        })
        .collect(),
    )
  }

  async fn get(&self, id: u64) -> ApiResult<R> {
    self.get_calls.fetch_add(1, Ordering::SeqCst);
    self.respond(&self.fail_reads).await?;
    self.stored(id).ok_or(ApiError::Status {
      status: 404,
      message: "Not Found".to_string(),
    })
  }

  async fn create(&self, item: &R) -> ApiResult<()> {
    self.create_calls.fetch_add(1, Ordering::SeqCst);
    self.respond(&self.fail_writes).await?;
    self.items.lock().unwrap().push(item.clone());
    Ok(())
  }

  async fn update(&self, item: &R) -> ApiResult<()> {
    self.update_calls.fetch_add(1, Ordering::SeqCst);
    self.respond(&self.fail_writes).await?;
    let mut items = self.items.lock().unwrap();
    if let Some(slot) = items.iter_mut().find(|i| i.id() == item.id()) {
      *slot = item.clone();
    }
    Ok(())
  }

  async fn delete(&self, id: u64) -> ApiResult<()> {
    self.respond(&self.fail_writes).await?;
    self.items.lock().unwrap().retain(|i| i.id() != id);
    Ok(())
  }
}

/// Poll a read until it succeeds, driving the runtime in between.
///
/// Panics on an error state or if nothing arrives within a second.
pub async fn settle<T>(mut read: impl FnMut() -> QueryState<T>) -> T {
  for _ in 0..200 {
    match read() {
      QueryState::Success(data) => return data,
      QueryState::Error(e) => panic!("query failed: {}", e),
      _ => tokio::time::sleep(Duration::from_millis(5)).await,
    }
  }
  panic!("query did not settle");
}

/// Poll a read until it fails, returning the error text.
pub async fn settle_error<T>(mut read: impl FnMut() -> QueryState<T>) -> String {
  for _ in 0..200 {
    match read() {
      QueryState::Error(e) => return e,
      QueryState::Success(_) => panic!("query unexpectedly succeeded"),
      _ => tokio::time::sleep(Duration::from_millis(5)).await,
    }
  }
  panic!("query did not settle");
}
