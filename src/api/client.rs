use crate::cache::Resource;
use crate::config::ApiConfig;
use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::error::{ApiError, ApiResult};
use super::ResourceApi;

/// REST client for the users/posts API
#[derive(Clone)]
pub struct ApiClient {
  http: reqwest::Client,
  base_url: Url,
}

impl ApiClient {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    let base_url = normalize_base_url(&config.base_url)?;

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(concat!("upcon/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, base_url })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// URL of a collection (`users`) or member (`users/3`).
  fn endpoint(&self, path: &str) -> ApiResult<Url> {
    Ok(self.base_url.join(path)?)
  }

  async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
    debug!(%url, "GET");
    let response = check_status(self.http.get(url).send().await?)?;
    Ok(response.json::<T>().await?)
  }
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for ApiClient {
  async fn list(&self) -> ApiResult<Vec<R>> {
    let url = self.endpoint(R::kind().path())?;
    self.get_json(url).await
  }

  async fn list_where(&self, field: &str, value: u64) -> ApiResult<Vec<R>> {
    let mut url = self.endpoint(R::kind().path())?;
    url
      .query_pairs_mut()
      .append_pair(field, &value.to_string());
    self.get_json(url).await
  }

  async fn get(&self, id: u64) -> ApiResult<R> {
    let url = self.endpoint(&format!("{}/{}", R::kind().path(), id))?;
    self.get_json(url).await
  }

  async fn create(&self, item: &R) -> ApiResult<()> {
    let url = self.endpoint(R::kind().path())?;
    debug!(%url, id = item.id(), "POST");
    check_status(self.http.post(url).json(item).send().await?)?;
    Ok(())
  }

  async fn update(&self, item: &R) -> ApiResult<()> {
    let url = self.endpoint(&format!("{}/{}", R::kind().path(), item.id()))?;
    debug!(%url, "PUT");
    check_status(self.http.put(url).json(item).send().await?)?;
    Ok(())
  }

  async fn delete(&self, id: u64) -> ApiResult<()> {
    let url = self.endpoint(&format!("{}/{}", R::kind().path(), id))?;
    debug!(%url, "DELETE");
    check_status(self.http.delete(url).send().await?)?;
    Ok(())
  }
}

fn check_status(response: Response) -> ApiResult<Response> {
  let status = response.status();
  if status.is_success() {
    Ok(response)
  } else {
    Err(status_error(status))
  }
}

fn status_error(status: StatusCode) -> ApiError {
  ApiError::Status {
    status: status.as_u16(),
    message: status
      .canonical_reason()
      .unwrap_or("request failed")
      .to_string(),
  }
}

/// Parse the base URL, making sure it ends with a slash so that relative
/// joins append to the path instead of replacing its last segment.
fn normalize_base_url(raw: &str) -> Result<Url> {
  let mut raw = raw.trim().to_string();
  if !raw.ends_with('/') {
    raw.push('/');
  }
  Url::parse(&raw).map_err(|e| eyre!("Invalid API base URL '{}': {}", raw, e))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client(base: &str) -> ApiClient {
    ApiClient::new(&ApiConfig {
      base_url: base.to_string(),
      timeout_secs: 10,
    })
    .unwrap()
  }

  #[test]
  fn test_base_url_gets_trailing_slash() {
    let client = client("https://example.com/api");
    assert_eq!(client.base_url().as_str(), "https://example.com/api/");
  }

  #[test]
  fn test_member_endpoint() {
    let client = client("https://jsonplaceholder.typicode.com");
    let url = client.endpoint("users/3").unwrap();
    assert_eq!(url.as_str(), "https://jsonplaceholder.typicode.com/users/3");
  }

  #[test]
  fn test_endpoint_keeps_base_path() {
    let client = client("http://localhost:3000/v1/");
    let url = client.endpoint("posts").unwrap();
    assert_eq!(url.as_str(), "http://localhost:3000/v1/posts");
  }

  #[test]
  fn test_invalid_base_url_is_rejected() {
    let result = ApiClient::new(&ApiConfig {
      base_url: "not a url".to_string(),
      timeout_secs: 10,
    });
    assert!(result.is_err());
  }

  #[test]
  fn test_status_error_uses_reason() {
    let err = status_error(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
  }
}
