//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{Method, RestRequest, RestResponse, RestTransport};
use crate::error::{RestError, RestResult};

/// HTTP transport against a REST API base URL, authenticating as a bot.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> RestResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("entity_cache/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl RestTransport for HttpTransport {
    async fn request(&self, request: RestRequest) -> RestResult<RestResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!("{} {}", request.method.as_str(), request.path);

        let mut builder = self.client.request(Self::method(request.method), url);
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Bot {token}"));
        }

        // attachments go multipart with the JSON body as `payload_json`
        if request.files.is_empty() {
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }
        } else {
            let payload = request.body.clone().unwrap_or(Value::Null);
            let mut form = Form::new().text("payload_json", payload.to_string());
            for (index, file) in request.files.into_iter().enumerate() {
                let part = Part::bytes(file.blob).file_name(file.name);
                form = form.part(format!("files[{index}]"), part);
            }
            builder = builder.multipart(form);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        let body = if bytes.is_empty() {
            None
        } else {
            Some(
                serde_json::from_slice(&bytes)
                    .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned())),
            )
        };

        if !(200..300).contains(&status) {
            return Err(RestError::Status { status, body });
        }
        Ok(RestResponse { status, body })
    }
}
