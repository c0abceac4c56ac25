//! Remote Transport Module
//!
//! Request/response boundary to the remote API. Managers only depend on the
//! [`RestTransport`] trait; [`HttpTransport`] is the reqwest implementation.

pub mod endpoints;
mod http;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientResult, RestResult};
use crate::models::Attachment;

pub use http::HttpTransport;

/// HTTP status the remote uses for a successful call with no body.
pub const NO_CONTENT: u16 = 204;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

// == Rest Request ==
/// One outgoing call.
#[derive(Debug, Clone)]
pub struct RestRequest {
    pub method: Method,
    /// Resource path, e.g. `/channels/1/messages`
    pub path: String,
    pub body: Option<Value>,
    /// Files to upload alongside the JSON body
    pub files: Vec<Attachment>,
}

impl RestRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            files: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_files(mut self, files: Vec<Attachment>) -> Self {
        self.files = files;
        self
    }
}

// == Rest Response ==
/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq)]
pub struct RestResponse {
    pub status: u16,
    /// Parsed body; `None` for empty responses such as 204
    pub body: Option<Value>,
}

impl RestResponse {
    /// Deserializes the body into a payload type.
    pub fn json<T: DeserializeOwned>(self) -> ClientResult<T> {
        Ok(serde_json::from_value(self.body.unwrap_or(Value::Null))?)
    }
}

// == Rest Transport ==
/// Remote call primitive. Non-success statuses come back as `RestError::Status`.
#[async_trait]
pub trait RestTransport: Send + Sync {
    async fn request(&self, request: RestRequest) -> RestResult<RestResponse>;

    async fn get(&self, path: &str) -> RestResult<RestResponse> {
        self.request(RestRequest::new(Method::Get, path)).await
    }

    async fn post(&self, path: &str, body: Value) -> RestResult<RestResponse> {
        self.request(RestRequest::new(Method::Post, path).with_body(body))
            .await
    }

    async fn patch(&self, path: &str, body: Value) -> RestResult<RestResponse> {
        self.request(RestRequest::new(Method::Patch, path).with_body(body))
            .await
    }

    async fn put(&self, path: &str) -> RestResult<RestResponse> {
        self.request(RestRequest::new(Method::Put, path)).await
    }

    async fn delete(&self, path: &str) -> RestResult<RestResponse> {
        self.request(RestRequest::new(Method::Delete, path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let req = RestRequest::new(Method::Post, "/channels/1/messages")
            .with_body(json!({"content": "hi"}));
        assert_eq!(req.method.as_str(), "POST");
        assert_eq!(req.body, Some(json!({"content": "hi"})));
        assert!(req.files.is_empty());
    }

    #[test]
    fn test_response_json() {
        #[derive(serde::Deserialize)]
        struct Payload {
            id: String,
        }
        let resp = RestResponse {
            status: 200,
            body: Some(json!({"id": "5"})),
        };
        assert_eq!(resp.json::<Payload>().unwrap().id, "5");
    }

    #[test]
    fn test_empty_response_json_fails() {
        let resp = RestResponse {
            status: NO_CONTENT,
            body: None,
        };
        assert!(resp.json::<std::collections::HashMap<String, String>>().is_err());
    }
}
