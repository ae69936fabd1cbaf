use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{BatchItemResponse, MetadataService};
use crate::config::ServiceConfig;
use crate::errors::{ServiceError, ServiceResult};
use crate::models::{ChangeRequest, Locale};

#[derive(Serialize)]
struct BatchRequestBody<'a> {
    continue_on_error: bool,
    requests: &'a [ChangeRequest],
}

#[derive(Deserialize)]
struct BatchResponseBody {
    responses: Vec<BatchItemResponse>,
}

#[derive(Deserialize, Default)]
struct FaultBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error_details: HashMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct LocaleBody {
    #[serde(default)]
    language_code: Option<u32>,
}

/// Metadata service reached over JSON/HTTP.
#[derive(Debug, Clone)]
pub struct HttpMetadataService {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpMetadataService {
    pub fn new(config: &ServiceConfig) -> ServiceResult<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send `builder` and return the body of a successful reply.
    async fn send(&self, builder: RequestBuilder) -> ServiceResult<String> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(fault_from_reply(status, &body))
        }
    }
}

/// Turn a non-success reply into a call-level error.
fn fault_from_reply(status: StatusCode, body: &str) -> ServiceError {
    let fault: FaultBody = serde_json::from_str(body).unwrap_or_default();
    let message = if fault.message.is_empty() {
        format!("{} {}", status, body.trim()).trim().to_string()
    } else {
        fault.message
    };

    let max_batch_size = fault.error_details.get("MaxBatchSize").and_then(|value| match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });

    match max_batch_size {
        Some(max_batch_size) => ServiceError::BatchSizeExceeded {
            max_batch_size,
            message,
        },
        None => ServiceError::fault(message),
    }
}

#[async_trait]
impl MetadataService for HttpMetadataService {
    async fn execute_batch(
        &self,
        requests: &[ChangeRequest],
        continue_on_error: bool,
    ) -> ServiceResult<Vec<BatchItemResponse>> {
        debug!("Submitting batch of {} requests to {}", requests.len(), self.base_url);
        let body = BatchRequestBody {
            continue_on_error,
            requests,
        };
        let reply = self.send(self.request(Method::POST, "batch").json(&body)).await?;
        let parsed: BatchResponseBody = serde_json::from_str(&reply)
            .map_err(|e| ServiceError::protocol(format!("Malformed batch reply: {e}")))?;
        Ok(parsed.responses)
    }

    async fn publish_all(&self) -> ServiceResult<()> {
        debug!("Publishing all customizations on {}", self.base_url);
        self.send(self.request(Method::POST, "publish")).await?;
        Ok(())
    }

    async fn current_locale(&self) -> ServiceResult<Option<Locale>> {
        let reply = self.send(self.request(Method::GET, "locale")).await?;
        let parsed: LocaleBody = serde_json::from_str(&reply)
            .map_err(|e| ServiceError::protocol(format!("Malformed locale reply: {e}")))?;
        Ok(parsed.language_code.filter(|code| *code > 0).map(Locale))
    }
}
