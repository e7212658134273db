use thiserror::Error;

/// Failure of a single REST call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
  /// The server answered with a non-success status
  #[error("HTTP {status}: {message}")]
  Status { status: u16, message: String },
  /// No answer within the configured request timeout
  #[error("request timed out")]
  Timeout,
  /// Connection, TLS or other transport failure
  #[error("network error: {0}")]
  Transport(String),
  /// Response body did not match the expected shape
  #[error("invalid response: {0}")]
  Decode(String),
  #[error("invalid url: {0}")]
  Url(String),
}

impl From<reqwest::Error> for ApiError {
  fn from(e: reqwest::Error) -> Self {
    if e.is_timeout() {
      return ApiError::Timeout;
    }
    if let Some(status) = e.status() {
      return ApiError::Status {
        status: status.as_u16(),
        message: status
          .canonical_reason()
          .unwrap_or("request failed")
          .to_string(),
      };
    }
    if e.is_decode() {
      return ApiError::Decode(e.to_string());
    }
    ApiError::Transport(e.to_string())
  }
}

impl From<url::ParseError> for ApiError {
  fn from(e: url::ParseError) -> Self {
    ApiError::Url(e.to_string())
  }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_status_is_displayed() {
    let err = ApiError::Status {
      status: 404,
      message: "Not Found".to_string(),
    };
    assert_eq!(err.to_string(), "HTTP 404: Not Found");
  }
}
