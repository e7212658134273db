//! REST API surface for users and posts.

mod client;
mod error;
mod resources;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};

use crate::cache::Resource;
use async_trait::async_trait;

/// Remote operations on one resource collection.
///
/// Create/update/delete only report success or failure; the server's echo is
/// not merged back into the cache.
#[async_trait]
pub trait ResourceApi<R: Resource>: Send + Sync {
  /// `GET /{kind}`
  async fn list(&self) -> ApiResult<Vec<R>>;

  /// `GET /{kind}?{field}={value}`
  async fn list_where(&self, field: &str, value: u64) -> ApiResult<Vec<R>>;

  /// `GET /{kind}/{id}`
  async fn get(&self, id: u64) -> ApiResult<R>;

  /// `POST /{kind}`
  async fn create(&self, item: &R) -> ApiResult<()>;

  /// `PUT /{kind}/{id}`
  async fn update(&self, item: &R) -> ApiResult<()>;

  /// `DELETE /{kind}/{id}`
  async fn delete(&self, id: u64) -> ApiResult<()>;
}
