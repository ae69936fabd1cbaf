//! Remote metadata service boundary
//!
//! The pipelines talk to the service only through [`MetadataService`]:
//! batch submission with continue-on-error semantics, a publish call and the
//! locale lookup. [`HttpMetadataService`] is the JSON/HTTP implementation
//! used by the binary.

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceResult;
use crate::models::{ChangeRequest, Locale};

pub use http::HttpMetadataService;

/// Outcome of one request inside a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItemResponse {
    /// Index of the request within the submitted batch.
    pub request_index: usize,
    #[serde(default)]
    pub fault: Option<ItemFault>,
}

impl BatchItemResponse {
    pub fn success(request_index: usize) -> Self {
        Self {
            request_index,
            fault: None,
        }
    }

    pub fn fault<S: Into<String>>(request_index: usize, message: S) -> Self {
        Self {
            request_index,
            fault: Some(ItemFault {
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFault {
    pub message: String,
}

/// Operations offered by the remote metadata service.
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Submit `requests` as one batch.
    ///
    /// Item faults come back inside the returned responses. A call-level
    /// failure, including an oversized batch, is returned as an error.
    async fn execute_batch(
        &self,
        requests: &[ChangeRequest],
        continue_on_error: bool,
    ) -> ServiceResult<Vec<BatchItemResponse>>;

    /// Make all pending metadata changes effective.
    async fn publish_all(&self) -> ServiceResult<()>;

    /// Language the service uses for labels, if it reports one.
    async fn current_locale(&self) -> ServiceResult<Option<Locale>>;
}
